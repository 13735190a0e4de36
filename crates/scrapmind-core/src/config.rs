//! Production configuration constants.
//!
//! This module contains the tuning constants used by the clustering pipeline.
//! They are referenced throughout the codebase and in benchmarks to keep
//! behavior consistent.

// =============================================================================
// Tokenization
// =============================================================================

/// Minimum token length in characters.
///
/// Tokens shorter than this are discarded before TF-IDF weighting. Two-letter
/// fragments ("a", "of", "js") carry almost no topical signal in short scraps.
pub const MIN_TOKEN_CHARS: usize = 3;

// =============================================================================
// K-Means
// =============================================================================

/// Maximum refinement iterations for a full k-means run.
pub const KMEANS_MAX_ITERATIONS: usize = 100;

/// Iteration cap for the k-means runs inside the elbow sweep.
///
/// The sweep runs k-means once per candidate k, so each run is capped lower
/// than [`KMEANS_MAX_ITERATIONS`] to bound the total cost.
pub const ELBOW_SWEEP_ITERATIONS: usize = 50;

/// Convergence tolerance for centroid movement.
///
/// Iteration stops early once every centroid has moved less than this
/// Euclidean distance since the previous update.
pub const CONVERGENCE_TOLERANCE: f64 = 1e-4;

/// Upper bound on the number of candidate clusters tried during a rebuild.
///
/// The effective cap is `min(MAX_CLUSTER_CANDIDATES, corpus_size / 2)`.
pub const MAX_CLUSTER_CANDIDATES: usize = 10;

// =============================================================================
// Orchestration Thresholds
// =============================================================================

/// Minimum average similarity for assigning a scrap to an existing cluster.
///
/// Below this the scrap is considered unrelated to every cluster and left
/// unassigned.
pub const ASSIGNMENT_THRESHOLD: f64 = 0.1;

/// Similarity floor for nearest-neighbor queries.
///
/// Pairwise cosine scores at or below this are treated as noise and filtered
/// from similar-scrap results.
pub const SIMILARITY_NOISE_FLOOR: f64 = 0.05;

/// Number of top TF-IDF terms used for a synthesized cluster name.
pub const CLUSTER_NAME_TERMS: usize = 3;

/// Number of top TF-IDF terms reported as cluster keywords.
pub const CLUSTER_KEYWORD_LIMIT: usize = 10;

/// Default result limit for similar-scrap queries.
pub const SIMILAR_SCRAPS_LIMIT: usize = 5;

// =============================================================================
// Visualization
// =============================================================================

/// Cluster color palette for visualization.
///
/// Clusters are colored by `index % CLUSTER_COLORS.len()`, so the mapping is
/// deterministic for a given partition.
pub const CLUSTER_COLORS: [&str; 10] = [
    "#8b5cf6", // violet
    "#06b6d4", // cyan
    "#10b981", // emerald
    "#f59e0b", // amber
    "#ec4899", // pink
    "#6366f1", // indigo
    "#14b8a6", // teal
    "#f97316", // orange
    "#84cc16", // lime
    "#a855f7", // purple
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_well_formed() {
        for color in CLUSTER_COLORS {
            assert!(color.starts_with('#'), "color {} missing # prefix", color);
            assert_eq!(color.len(), 7, "color {} is not #rrggbb", color);
        }
    }

    #[test]
    fn test_thresholds_are_sane() {
        // The assignment threshold must sit above the noise floor, otherwise
        // scraps could be assigned to clusters on pure noise.
        assert!(ASSIGNMENT_THRESHOLD > SIMILARITY_NOISE_FLOOR);
        assert!(CONVERGENCE_TOLERANCE > 0.0);
        assert!(ELBOW_SWEEP_ITERATIONS <= KMEANS_MAX_ITERATIONS);
    }

    #[test]
    fn test_keyword_limit_covers_name_terms() {
        assert!(CLUSTER_KEYWORD_LIMIT >= CLUSTER_NAME_TERMS);
    }
}
