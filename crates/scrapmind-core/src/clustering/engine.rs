//! Cluster orchestrator tying the pipeline stages together.
//!
//! [`ClusterEngine`] owns the corpus state between calls: the TF-IDF
//! vectorizer contents and the vectors from the last full rebuild. A rebuild
//! fully supersedes prior state; incremental classification and similarity
//! queries read the last computed vectors. The engine is synchronous and not
//! reentrant - callers serialize access to a given instance.

use super::kmeans::{find_optimal_k, k_means};
use super::quality::silhouette_score;
use super::similarity::{cosine_similarity, find_most_similar};
use super::tfidf::{TfidfVectorizer, VectorizedCorpus};
use super::types::{
    Cluster, ClusterId, ClusteringResult, ScrapDocument, ScrapKind, ScrapSimilarity, TermVector,
};
use crate::config::{
    ASSIGNMENT_THRESHOLD, CLUSTER_COLORS, CLUSTER_KEYWORD_LIMIT, CLUSTER_NAME_TERMS,
    KMEANS_MAX_ITERATIONS, MAX_CLUSTER_CANDIDATES, SIMILARITY_NOISE_FLOOR,
};
use crate::error::ClusterError;
use instant::Instant;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Outcome of classifying a single scrap against existing clusters.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAssignment {
    /// Best-matching cluster, or `None` when every average similarity fell
    /// below the assignment threshold
    pub cluster_id: Option<ClusterId>,
    /// Average similarity to the best cluster's members (0 when unmatched)
    pub score: f64,
}

impl ClusterAssignment {
    fn unmatched(score: f64) -> Self {
        Self {
            cluster_id: None,
            score,
        }
    }
}

/// End-to-end clustering engine.
///
/// Holds the vectorizer corpus and the vectors of the last rebuild. Not safe
/// for concurrent or reentrant use; run one rebuild at a time and off any
/// interactive thread (a rebuild is an atomic, non-preemptible unit of work).
pub struct ClusterEngine {
    /// TF-IDF state, repopulated on every rebuild
    vectorizer: TfidfVectorizer,
    /// Vectors and vocabulary from the last full vectorization
    last_corpus: Option<VectorizedCorpus>,
    /// Scrap id -> kind, for cluster descriptions
    kinds: HashMap<String, ScrapKind>,
    /// Seeding RNG for k-means; entropy in production, fixed in tests
    rng: StdRng,
}

impl ClusterEngine {
    /// Creates an engine with a nondeterministic RNG.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Creates an engine with a fixed seed for reproducible clustering.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            vectorizer: TfidfVectorizer::new(),
            last_corpus: None,
            kinds: HashMap::new(),
            rng,
        }
    }

    /// Re-clusters the whole corpus from scratch.
    ///
    /// Replaces all prior vectorizer and vector state, chooses k via the
    /// elbow sweep, partitions with k-means, scores the partition, and
    /// synthesizes display metadata (name, description, keywords, color) per
    /// cluster. Fewer than two scraps, or a corpus whose tokens produce an
    /// empty vocabulary, yield the neutral empty result rather than an error.
    ///
    /// # Errors
    ///
    /// Propagates [`ClusterError::DimensionMismatch`] from the numeric
    /// layers; this indicates a bug rather than bad input.
    #[instrument(skip_all, fields(corpus_size = scraps.len()))]
    pub fn rebuild_clusters(
        &mut self,
        scraps: &[ScrapDocument],
    ) -> Result<ClusteringResult, ClusterError> {
        if scraps.len() < 2 {
            debug!("not enough scraps to cluster");
            return Ok(ClusteringResult::empty());
        }

        let start = Instant::now();

        self.vectorizer.clear();
        self.kinds.clear();
        for scrap in scraps {
            self.kinds.insert(scrap.id.clone(), scrap.kind);
            self.vectorizer.add_document(scrap.id.clone(), &scrap.text);
        }

        let corpus = self.vectorizer.calculate_all_vectors();

        if corpus.vectors.len() < 2 || corpus.vocabulary.is_empty() {
            debug!("corpus vectorized to nothing usable");
            self.last_corpus = Some(corpus);
            return Ok(ClusteringResult::empty());
        }

        let max_k = MAX_CLUSTER_CANDIDATES.min(scraps.len() / 2);
        let elbow = find_optimal_k(&corpus.vectors, &corpus.vocabulary, max_k, &mut self.rng)?;
        debug!(
            optimal_k = elbow.optimal_k,
            candidates = max_k,
            "cluster count selected"
        );

        let kmeans = k_means(
            &corpus.vectors,
            &corpus.vocabulary,
            elbow.optimal_k,
            KMEANS_MAX_ITERATIONS,
            &mut self.rng,
        )?;
        let quality = silhouette_score(&corpus.vectors, &corpus.vocabulary, &kmeans.assignments)?;

        let vectors_by_id: HashMap<&str, &TermVector> = corpus
            .vectors
            .iter()
            .map(|v| (v.id.as_str(), v))
            .collect();

        let mut clusters = Vec::with_capacity(kmeans.clusters.len());
        let mut assignments = HashMap::new();

        for (index, partition) in kmeans.clusters.iter().enumerate() {
            if partition.member_ids.is_empty() {
                continue;
            }

            let term_scores = aggregate_term_scores(&partition.member_ids, &vectors_by_id);
            let id = ClusterId::new();

            for member in &partition.member_ids {
                assignments.insert(member.clone(), id);
            }

            clusters.push(Cluster {
                id,
                name: cluster_name(&term_scores, index),
                description: self.cluster_description(&partition.member_ids),
                keywords: top_terms(&term_scores, CLUSTER_KEYWORD_LIMIT),
                member_ids: partition.member_ids.clone(),
                centroid: partition.centroid.clone(),
                inertia: partition.inertia,
                coherence: 1.0 - partition.inertia / partition.member_ids.len().max(1) as f64,
                color: CLUSTER_COLORS[index % CLUSTER_COLORS.len()].to_string(),
            });
        }

        info!(
            clusters = clusters.len(),
            quality,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "rebuilt clusters"
        );

        self.last_corpus = Some(corpus);
        Ok(ClusteringResult {
            clusters,
            assignments,
            quality,
        })
    }

    /// Classifies a new scrap against existing clusters without altering
    /// engine state.
    ///
    /// The scrap is vectorized against a transient snapshot of the corpus
    /// (clone, add, vectorize, discard), then scored by its average cosine
    /// similarity to each cluster's member vectors. Scores below the
    /// assignment threshold leave the scrap unassigned.
    #[instrument(skip_all, fields(scrap_id = %scrap.id))]
    pub fn assign_to_cluster(
        &self,
        scrap: &ScrapDocument,
        existing_clusters: &[Cluster],
    ) -> ClusterAssignment {
        if self.last_corpus.is_none() || existing_clusters.is_empty() {
            return ClusterAssignment::unmatched(0.0);
        }

        let mut snapshot = self.vectorizer.clone();
        snapshot.add_document(scrap.id.clone(), &scrap.text);
        let corpus = snapshot.calculate_all_vectors();

        let Some(scrap_vector) = corpus.vectors.iter().find(|v| v.id == scrap.id) else {
            return ClusterAssignment::unmatched(0.0);
        };

        let mut best_cluster = None;
        let mut best_score = 0.0;

        for cluster in existing_clusters {
            let member_vectors: Vec<&TermVector> = corpus
                .vectors
                .iter()
                .filter(|v| cluster.member_ids.contains(&v.id))
                .collect();
            if member_vectors.is_empty() {
                continue;
            }

            let total: f64 = member_vectors
                .iter()
                .map(|member| cosine_similarity(scrap_vector, member))
                .sum();
            let average = total / member_vectors.len() as f64;

            if average > best_score {
                best_score = average;
                best_cluster = Some(cluster.id);
            }
        }

        if best_score < ASSIGNMENT_THRESHOLD {
            debug!(best_score, "below assignment threshold");
            return ClusterAssignment::unmatched(best_score);
        }

        ClusterAssignment {
            cluster_id: best_cluster,
            score: best_score,
        }
    }

    /// Nearest neighbors of a scrap from the last rebuild, noise-filtered.
    ///
    /// Returns up to `limit` scraps whose cosine similarity exceeds the
    /// noise floor, best first. Unknown ids and engines without a prior
    /// rebuild return an empty list.
    pub fn similar_scraps(&self, scrap_id: &str, limit: usize) -> Vec<ScrapSimilarity> {
        let Some(corpus) = &self.last_corpus else {
            return Vec::new();
        };
        let Some(target) = corpus.vectors.iter().find(|v| v.id == scrap_id) else {
            return Vec::new();
        };

        let mut neighbors = find_most_similar(target, &corpus.vectors, corpus.vectors.len());
        neighbors.retain(|neighbor| neighbor.similarity > SIMILARITY_NOISE_FLOOR);
        neighbors.truncate(limit);
        neighbors
    }

    /// Average cosine similarity between a scrap and a cluster's other
    /// members, from the last rebuild.
    pub fn cluster_similarity(&self, scrap_id: &str, cluster: &Cluster) -> f64 {
        let Some(corpus) = &self.last_corpus else {
            return 0.0;
        };
        let Some(target) = corpus.vectors.iter().find(|v| v.id == scrap_id) else {
            return 0.0;
        };

        let member_vectors: Vec<&TermVector> = corpus
            .vectors
            .iter()
            .filter(|v| v.id != scrap_id && cluster.member_ids.contains(&v.id))
            .collect();
        if member_vectors.is_empty() {
            return 0.0;
        }

        let total: f64 = member_vectors
            .iter()
            .map(|member| cosine_similarity(target, member))
            .sum();
        total / member_vectors.len() as f64
    }

    /// Builds the per-kind member summary, e.g.
    /// `"Contains 3 scraps: 2 notes, 1 link"`.
    fn cluster_description(&self, member_ids: &[String]) -> String {
        // First-seen order keeps the summary stable for a given member order
        let mut counts: Vec<(ScrapKind, usize)> = Vec::new();
        for id in member_ids {
            if let Some(kind) = self.kinds.get(id) {
                match counts.iter_mut().find(|(k, _)| *k == *kind) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((*kind, 1)),
                }
            }
        }

        let summary = counts
            .iter()
            .map(|(kind, count)| {
                format!("{} {}{}", count, kind, if *count > 1 { "s" } else { "" })
            })
            .collect::<Vec<_>>()
            .join(", ");

        format!("Contains {} scraps: {}", member_ids.len(), summary)
    }
}

impl Default for ClusterEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Sums each member's TF-IDF weights per term across a cluster.
fn aggregate_term_scores(
    member_ids: &[String],
    vectors_by_id: &HashMap<&str, &TermVector>,
) -> HashMap<String, f64> {
    let mut scores: HashMap<String, f64> = HashMap::new();
    for id in member_ids {
        if let Some(vector) = vectors_by_id.get(id.as_str()) {
            for (term, weight) in &vector.weights {
                *scores.entry(term.clone()).or_insert(0.0) += weight;
            }
        }
    }
    scores
}

/// Top terms by aggregate score, ties broken alphabetically.
fn top_terms(scores: &HashMap<String, f64>, limit: usize) -> Vec<String> {
    let mut entries: Vec<(&String, &f64)> = scores.iter().collect();
    entries.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .take(limit)
        .map(|(term, _)| term.clone())
        .collect()
}

/// Synthesizes a cluster name from its top terms, falling back to a numbered
/// placeholder when the cluster has no terms at all.
fn cluster_name(scores: &HashMap<String, f64>, index: usize) -> String {
    let top = top_terms(scores, CLUSTER_NAME_TERMS);
    if top.is_empty() {
        return format!("Cluster {}", index + 1);
    }

    top.iter()
        .map(|term| capitalize(term))
        .collect::<Vec<_>>()
        .join(", ")
}

fn capitalize(term: &str) -> String {
    let mut chars = term.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
