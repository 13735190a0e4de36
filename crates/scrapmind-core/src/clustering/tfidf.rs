//! TF-IDF vectorization over a scrap corpus.
//!
//! [`TfidfVectorizer`] accumulates tokenized scraps across
//! [`add_document`](TfidfVectorizer::add_document) /
//! [`remove_document`](TfidfVectorizer::remove_document) calls. Vocabulary
//! and IDF are not maintained incrementally - they are rebuilt from the whole
//! corpus on every [`calculate_all_vectors`](TfidfVectorizer::calculate_all_vectors)
//! call, which keeps the weights consistent at the cost of a full
//! recomputation.
//!
//! # Formulas
//!
//! - `tf(term) = count(term) / total_tokens` (length-normalized)
//! - `idf(term) = ln((N + 1) / (df + 1)) + 1` (smoothed; always positive)
//! - `weight(term) = tf(term) * idf(term)`

use super::tokenizer::tokenize;
use super::types::TermVector;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Result of a full vectorization pass.
///
/// `vocabulary` is sorted, and its order defines the dense index layout used
/// by the k-means engine: dense index `i` corresponds to `vocabulary[i]`.
#[derive(Debug, Clone)]
pub struct VectorizedCorpus {
    /// One sparse vector per stored scrap, ordered by scrap id
    pub vectors: Vec<TermVector>,
    /// Sorted distinct terms across the corpus
    pub vocabulary: Vec<String>,
    /// Smoothed inverse document frequency per vocabulary term
    pub idf: HashMap<String, f64>,
}

/// Stateful TF-IDF calculator.
///
/// Holds tokenized scraps and their normalized term frequencies. Cheap to
/// clone, which the orchestrator exploits to classify a new scrap against a
/// transient snapshot without disturbing the live corpus state.
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    /// Scrap id -> token list
    documents: HashMap<String, Vec<String>>,
    /// Scrap id -> length-normalized term frequencies
    term_frequencies: HashMap<String, HashMap<String, f64>>,
    /// Smoothed IDF per term, valid as of the last full recomputation
    idf: HashMap<String, f64>,
    /// Distinct terms across stored scraps, kept sorted
    vocabulary: BTreeSet<String>,
}

impl TfidfVectorizer {
    /// Creates an empty vectorizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenizes `text` and stores it under `id`.
    ///
    /// Replaces any scrap previously stored under the same id. IDF is not
    /// refreshed here; call [`calculate_all_vectors`](Self::calculate_all_vectors)
    /// after the corpus has been populated.
    pub fn add_document(&mut self, id: impl Into<String>, text: &str) {
        let id = id.into();
        let tokens = tokenize(text);

        self.vocabulary.extend(tokens.iter().cloned());
        self.term_frequencies
            .insert(id.clone(), term_frequency(&tokens));
        self.documents.insert(id, tokens);
    }

    /// Drops the scrap stored under `id`, if any.
    ///
    /// Stale vocabulary entries are purged on the next full recomputation.
    pub fn remove_document(&mut self, id: &str) {
        self.documents.remove(id);
        self.term_frequencies.remove(id);
    }

    /// Drops all stored state.
    pub fn clear(&mut self) {
        self.documents.clear();
        self.term_frequencies.clear();
        self.idf.clear();
        self.vocabulary.clear();
    }

    /// Number of stored scraps.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Number of distinct terms as of the last vocabulary rebuild.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Computes the TF-IDF vector for a single stored scrap against the
    /// current IDF table.
    ///
    /// Returns `None` if no scrap is stored under `id`. Terms missing from
    /// the IDF table weigh zero and are omitted from the sparse vector.
    pub fn calculate_vector(&self, id: &str) -> Option<TermVector> {
        let tf = self.term_frequencies.get(id)?;

        let weights: HashMap<String, f64> = tf
            .iter()
            .filter_map(|(term, tf_value)| {
                let idf_value = self.idf.get(term).copied().unwrap_or(0.0);
                let weight = tf_value * idf_value;
                (weight != 0.0).then(|| (term.clone(), weight))
            })
            .collect();

        Some(TermVector::new(id, weights))
    }

    /// Rebuilds vocabulary and IDF from the entire stored corpus, then
    /// computes every scrap's TF-IDF vector.
    ///
    /// Vectors are returned in sorted scrap-id order so downstream stages see
    /// a deterministic layout regardless of map iteration order.
    pub fn calculate_all_vectors(&mut self) -> VectorizedCorpus {
        self.recompute_idf();

        let mut ids: Vec<String> = self.documents.keys().cloned().collect();
        ids.sort();

        let vectors: Vec<TermVector> = ids
            .iter()
            .filter_map(|id| self.calculate_vector(id))
            .collect();

        debug!(
            documents = vectors.len(),
            vocabulary = self.vocabulary.len(),
            "computed TF-IDF vectors"
        );

        VectorizedCorpus {
            vectors,
            vocabulary: self.vocabulary.iter().cloned().collect(),
            idf: self.idf.clone(),
        }
    }

    /// Rebuilds the vocabulary as the union of stored token sets and
    /// recomputes the smoothed IDF for every term.
    fn recompute_idf(&mut self) {
        self.vocabulary.clear();
        for tokens in self.documents.values() {
            self.vocabulary.extend(tokens.iter().cloned());
        }

        let num_docs = self.documents.len() as f64;
        self.idf = self
            .vocabulary
            .iter()
            .map(|term| {
                let docs_with_term = self
                    .term_frequencies
                    .values()
                    .filter(|tf| tf.contains_key(term))
                    .count() as f64;
                let idf = ((num_docs + 1.0) / (docs_with_term + 1.0)).ln() + 1.0;
                (term.clone(), idf)
            })
            .collect();
    }
}

/// Length-normalized term frequency of a token list.
fn term_frequency(tokens: &[String]) -> HashMap<String, f64> {
    let total = tokens.len();
    if total == 0 {
        return HashMap::new();
    }

    let mut counts: HashMap<String, f64> = HashMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0.0) += 1.0;
    }

    for count in counts.values_mut() {
        *count /= total as f64;
    }
    counts
}
