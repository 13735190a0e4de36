//! Similarity and distance functions over scrap vectors.
//!
//! Sparse [`TermVector`]s are compared with cosine similarity; the dense
//! vectors used inside k-means are compared with Euclidean distance. Dense
//! layout is defined by the sorted corpus vocabulary: dense index `i` holds
//! the weight of `vocabulary[i]`.

use super::types::{ScrapSimilarity, TermVector};
use crate::error::{validate_dimension, ClusterError};
use std::collections::HashMap;

/// Cosine similarity between two sparse vectors.
///
/// Defined as exactly `0.0` when either magnitude is zero, so empty scraps
/// never produce NaN. With non-negative TF-IDF weights the result lies in
/// `[0, 1]`. Iterates the smaller weight map and probes the larger one, so
/// cost is proportional to the smaller vector.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    if a.magnitude == 0.0 || b.magnitude == 0.0 {
        return 0.0;
    }

    let (smaller, larger) = if a.weights.len() <= b.weights.len() {
        (&a.weights, &b.weights)
    } else {
        (&b.weights, &a.weights)
    };

    let dot: f64 = smaller
        .iter()
        .filter_map(|(term, weight_a)| larger.get(term).map(|weight_b| weight_a * weight_b))
        .sum();

    dot / (a.magnitude * b.magnitude)
}

/// Cosine distance: `1 - cosine_similarity`.
pub fn cosine_distance(a: &TermVector, b: &TermVector) -> f64 {
    1.0 - cosine_similarity(a, b)
}

/// Euclidean (L2) distance between two dense vectors.
///
/// # Errors
///
/// Returns [`ClusterError::DimensionMismatch`] if the lengths differ; that is
/// a caller bug, not a recoverable condition.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> Result<f64, ClusterError> {
    validate_dimension(a.len(), b.len())?;

    let sum_squares: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum();

    Ok(sum_squares.sqrt())
}

/// Expands a sparse vector into dense form over the given vocabulary order.
///
/// Terms absent from the vocabulary are dropped; vocabulary terms absent
/// from the vector become zeros.
pub fn to_dense_vector(vector: &TermVector, vocabulary: &[String]) -> Vec<f64> {
    vocabulary
        .iter()
        .map(|term| vector.weights.get(term).copied().unwrap_or(0.0))
        .collect()
}

/// Collapses a dense vector back into sparse form, omitting exact zeros.
///
/// Inverse of [`to_dense_vector`] for any vector whose terms all appear in
/// `vocabulary`.
pub fn to_sparse_vector(dense: &[f64], vocabulary: &[String], id: &str) -> TermVector {
    let weights: HashMap<String, f64> = vocabulary
        .iter()
        .zip(dense.iter())
        .filter(|(_, weight)| **weight != 0.0)
        .map(|(term, weight)| (term.clone(), *weight))
        .collect();

    TermVector::new(id, weights)
}

/// Full pairwise cosine similarity matrix.
///
/// Symmetric with a unit diagonal; `matrix[i][j]` compares `vectors[i]` and
/// `vectors[j]`.
pub fn pairwise_similarity_matrix(vectors: &[TermVector]) -> Vec<Vec<f64>> {
    let n = vectors.len();
    let mut matrix = vec![vec![0.0; n]; n];

    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let similarity = cosine_similarity(&vectors[i], &vectors[j]);
            matrix[i][j] = similarity;
            matrix[j][i] = similarity;
        }
    }

    matrix
}

/// Top-K cosine neighbors of `target` among `candidates`.
///
/// The target itself (matched by id) is excluded. Results are sorted by
/// similarity descending with ties broken by id so the ordering is stable.
pub fn find_most_similar(
    target: &TermVector,
    candidates: &[TermVector],
    top_k: usize,
) -> Vec<ScrapSimilarity> {
    let mut similarities: Vec<ScrapSimilarity> = candidates
        .iter()
        .filter(|candidate| candidate.id != target.id)
        .map(|candidate| ScrapSimilarity {
            id: candidate.id.clone(),
            similarity: cosine_similarity(target, candidate),
        })
        .collect();

    similarities.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| a.id.cmp(&b.id))
    });
    similarities.truncate(top_k);
    similarities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(id: &str, entries: &[(&str, f64)]) -> TermVector {
        let weights = entries
            .iter()
            .map(|(term, weight)| (term.to_string(), *weight))
            .collect();
        TermVector::new(id, weights)
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let a = vector("a", &[("rust", 0.5), ("code", 0.3)]);
        let b = vector("b", &[("rust", 0.5), ("code", 0.3)]);
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let a = vector("a", &[("rust", 1.0)]);
        let b = vector("b", &[("paint", 1.0)]);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_is_symmetric() {
        let a = vector("a", &[("rust", 0.7), ("code", 0.1), ("types", 0.4)]);
        let b = vector("b", &[("code", 0.9), ("types", 0.2)]);
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn test_cosine_zero_magnitude_is_zero() {
        let empty = vector("empty", &[]);
        let full = vector("full", &[("rust", 1.0)]);

        assert_eq!(cosine_similarity(&empty, &full), 0.0);
        assert_eq!(cosine_similarity(&full, &empty), 0.0);
        assert_eq!(cosine_similarity(&empty, &empty), 0.0);
    }

    #[test]
    fn test_cosine_range_with_nonnegative_weights() {
        let a = vector("a", &[("x", 0.2), ("y", 0.8)]);
        let b = vector("b", &[("y", 0.5), ("z", 0.5)]);
        let similarity = cosine_similarity(&a, &b);
        assert!((0.0..=1.0).contains(&similarity));
    }

    #[test]
    fn test_cosine_distance_complements_similarity() {
        let a = vector("a", &[("x", 1.0)]);
        let b = vector("b", &[("x", 1.0), ("y", 1.0)]);
        let total = cosine_similarity(&a, &b) + cosine_distance(&a, &b);
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_euclidean_distance() {
        let d = euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]).unwrap();
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_euclidean_dimension_mismatch() {
        let result = euclidean_distance(&[1.0, 2.0, 3.0], &[1.0, 2.0]);
        assert_eq!(
            result,
            Err(ClusterError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_dense_sparse_round_trip() {
        let vocabulary: Vec<String> = ["alpha", "beta", "gamma", "delta"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let original = vector("v", &[("beta", 0.25), ("delta", 0.75)]);

        let dense = to_dense_vector(&original, &vocabulary);
        assert_eq!(dense, vec![0.0, 0.25, 0.0, 0.75]);

        let sparse = to_sparse_vector(&dense, &vocabulary, "v");
        assert_eq!(sparse.weights.len(), original.weights.len());
        for (term, weight) in &original.weights {
            assert!((sparse.weights[term] - weight).abs() < 1e-12);
        }
        assert!((sparse.magnitude - original.magnitude).abs() < 1e-12);
    }

    #[test]
    fn test_sparse_conversion_omits_zeros() {
        let vocabulary: Vec<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        let sparse = to_sparse_vector(&[0.0, 1.5], &vocabulary, "v");
        assert!(!sparse.weights.contains_key("a"));
        assert!(sparse.weights.contains_key("b"));
    }

    #[test]
    fn test_pairwise_matrix_is_symmetric_with_unit_diagonal() {
        let vectors = vec![
            vector("a", &[("x", 1.0)]),
            vector("b", &[("x", 1.0), ("y", 1.0)]),
            vector("c", &[("y", 1.0)]),
        ];
        let matrix = pairwise_similarity_matrix(&vectors);

        for i in 0..3 {
            assert_eq!(matrix[i][i], 1.0);
            for j in 0..3 {
                assert_eq!(matrix[i][j], matrix[j][i]);
            }
        }
        assert_eq!(matrix[0][2], 0.0);
        assert!(matrix[0][1] > 0.0);
    }

    #[test]
    fn test_find_most_similar_excludes_target_and_sorts() {
        let target = vector("t", &[("rust", 1.0)]);
        let candidates = vec![
            vector("t", &[("rust", 1.0)]),
            vector("near", &[("rust", 1.0), ("code", 0.2)]),
            vector("far", &[("paint", 1.0)]),
        ];

        let neighbors = find_most_similar(&target, &candidates, 5);
        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors[0].id, "near");
        assert!(neighbors[0].similarity > neighbors[1].similarity);
    }

    #[test]
    fn test_find_most_similar_respects_top_k() {
        let target = vector("t", &[("x", 1.0)]);
        let candidates: Vec<TermVector> = (0..10)
            .map(|i| vector(&format!("c{}", i), &[("x", 1.0 + i as f64)]))
            .collect();

        let neighbors = find_most_similar(&target, &candidates, 3);
        assert_eq!(neighbors.len(), 3);
    }
}
