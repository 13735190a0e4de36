//! Silhouette scoring of a finished partition.
//!
//! The silhouette combines cohesion (mean distance to the point's own
//! cluster) and separation (mean distance to the nearest other cluster) into
//! a per-point score in `[-1, 1]`; the corpus score is the mean over all
//! points. Distances are Euclidean over the dense expansion, matching what
//! k-means optimized.

use super::similarity::{euclidean_distance, to_dense_vector};
use super::types::TermVector;
use crate::error::ClusterError;
use std::collections::HashMap;

/// Mean silhouette score of `assignments` over `vectors`.
///
/// - Returns `0.0` for corpora of one or zero vectors.
/// - A point that is the sole member of its cluster has cohesion `a = 0`.
/// - With no other clusters, separation `b = 0`.
/// - A point with `a == 0 && b == 0` contributes `0`, otherwise
///   `(b - a) / max(a, b)`.
///
/// # Errors
///
/// Propagates [`ClusterError::DimensionMismatch`] from the distance layer.
pub fn silhouette_score(
    vectors: &[TermVector],
    vocabulary: &[String],
    assignments: &HashMap<String, usize>,
) -> Result<f64, ClusterError> {
    if vectors.len() <= 1 {
        return Ok(0.0);
    }

    let dense: Vec<Vec<f64>> = vectors
        .iter()
        .map(|v| to_dense_vector(v, vocabulary))
        .collect();

    let mut total = 0.0;

    for i in 0..vectors.len() {
        let Some(&own_cluster) = assignments.get(&vectors[i].id) else {
            continue;
        };

        let mut intra_sum = 0.0;
        let mut intra_count = 0usize;
        // cluster index -> (distance sum, count) for every other cluster
        let mut inter: HashMap<usize, (f64, usize)> = HashMap::new();

        for j in 0..vectors.len() {
            if i == j {
                continue;
            }
            let Some(&other_cluster) = assignments.get(&vectors[j].id) else {
                continue;
            };

            let dist = euclidean_distance(&dense[i], &dense[j])?;
            if other_cluster == own_cluster {
                intra_sum += dist;
                intra_count += 1;
            } else {
                let entry = inter.entry(other_cluster).or_insert((0.0, 0));
                entry.0 += dist;
                entry.1 += 1;
            }
        }

        let a = if intra_count > 0 {
            intra_sum / intra_count as f64
        } else {
            0.0
        };

        let mut b = f64::INFINITY;
        for (sum, count) in inter.values() {
            let avg = sum / *count as f64;
            if avg < b {
                b = avg;
            }
        }
        if b.is_infinite() {
            b = 0.0;
        }

        let silhouette = if a == 0.0 && b == 0.0 {
            0.0
        } else {
            (b - a) / a.max(b)
        };
        total += silhouette;
    }

    Ok(total / vectors.len() as f64)
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

    fn vocab(terms: &[&str]) -> Vec<String> {
        terms.iter().map(|s| s.to_string()).collect()
    }

    fn assign(pairs: &[(&str, usize)]) -> HashMap<String, usize> {
        pairs
            .iter()
            .map(|(id, cluster)| (id.to_string(), *cluster))
            .collect()
    }

    #[test]
    fn test_tiny_corpus_scores_zero() {
        let vectors = vec![vector("only", &[("x", 1.0)])];
        let score =
            silhouette_score(&vectors, &vocab(&["x"]), &assign(&[("only", 0)])).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_perfectly_separated_pairs_score_one() {
        let vectors = vec![
            vector("a1", &[("x", 1.0)]),
            vector("a2", &[("x", 1.0)]),
            vector("b1", &[("y", 1.0)]),
            vector("b2", &[("y", 1.0)]),
        ];
        let assignments = assign(&[("a1", 0), ("a2", 0), ("b1", 1), ("b2", 1)]);
        let score = silhouette_score(&vectors, &vocab(&["x", "y"]), &assignments).unwrap();

        // a = 0 within each pair, b > 0 across: per-point silhouette is 1
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_cluster_of_distinct_points_scores_negative_one() {
        let vectors = vec![vector("a", &[("x", 1.0)]), vector("b", &[("x", 3.0)])];
        let assignments = assign(&[("a", 0), ("b", 0)]);
        let score = silhouette_score(&vectors, &vocab(&["x"]), &assignments).unwrap();

        // a > 0 and b = 0 (no other cluster): (0 - a) / a = -1
        assert!((score + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_coincident_single_cluster_scores_zero() {
        let vectors = vec![vector("a", &[("x", 1.0)]), vector("b", &[("x", 1.0)])];
        let assignments = assign(&[("a", 0), ("b", 0)]);
        let score = silhouette_score(&vectors, &vocab(&["x"]), &assignments).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_sole_member_cluster_is_well_separated() {
        let vectors = vec![
            vector("solo", &[("x", 10.0)]),
            vector("b1", &[("y", 1.0)]),
            vector("b2", &[("y", 1.0)]),
        ];
        let assignments = assign(&[("solo", 0), ("b1", 1), ("b2", 1)]);
        let score = silhouette_score(&vectors, &vocab(&["x", "y"]), &assignments).unwrap();

        // solo: a = 0, b > 0 -> 1; b1/b2: a = 0, b > 0 -> 1
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_stays_in_range() {
        let vectors = vec![
            vector("a", &[("x", 1.0), ("y", 0.5)]),
            vector("b", &[("x", 0.9)]),
            vector("c", &[("y", 1.2)]),
            vector("d", &[("x", 0.2), ("y", 1.0)]),
        ];
        // Deliberately poor partition
        let assignments = assign(&[("a", 0), ("b", 1), ("c", 0), ("d", 1)]);
        let score = silhouette_score(&vectors, &vocab(&["x", "y"]), &assignments).unwrap();
        assert!((-1.0..=1.0).contains(&score));
    }
}
