//! Core data model for the clustering pipeline.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Unique cluster identifier.
///
/// IDs are generated atomically so concurrent engines never hand out
/// duplicates. Clusters are ephemeral (recomputed on every rebuild), so the
/// counter is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusterId(u64);

/// Global counter for generating unique cluster IDs.
static CLUSTER_ID_COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

impl ClusterId {
    /// Generates a new unique cluster ID.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        use std::sync::atomic::Ordering;
        Self(CLUSTER_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }

    /// Creates a ClusterId from a raw u64 value.
    ///
    /// Useful for deserialization or testing.
    pub fn from_u64(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw u64 value of this ID.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// The kind of content a scrap holds.
///
/// Supplied by the caller per scrap; the clustering core only uses it to
/// build human-readable cluster descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapKind {
    Thought,
    Link,
    Image,
    Snippet,
    Note,
}

impl ScrapKind {
    /// Singular lowercase label used in cluster descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            ScrapKind::Thought => "thought",
            ScrapKind::Link => "link",
            ScrapKind::Image => "image",
            ScrapKind::Snippet => "snippet",
            ScrapKind::Note => "note",
        }
    }
}

impl fmt::Display for ScrapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A scrap prepared for clustering.
///
/// The caller concatenates title, body, tags, and keywords into `text`;
/// this core treats the text as opaque beyond tokenization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapDocument {
    /// Caller-assigned scrap identifier
    pub id: String,
    /// Pre-concatenated searchable text
    pub text: String,
    /// Content kind, used only for cluster descriptions
    pub kind: ScrapKind,
}

impl ScrapDocument {
    /// Convenience constructor.
    pub fn new(id: impl Into<String>, text: impl Into<String>, kind: ScrapKind) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind,
        }
    }
}

/// Sparse TF-IDF vector for one scrap.
///
/// `weights` stores only nonzero term weights; `magnitude` is the L2 norm of
/// the weights and is precomputed so cosine similarity never rescans the map.
/// A scrap whose text produced no tokens has an empty `weights` map and a
/// magnitude of zero, and is excluded from similarity by the zero-magnitude
/// rule in [`cosine_similarity`](super::cosine_similarity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermVector {
    /// Scrap identifier this vector belongs to
    pub id: String,
    /// Nonzero term -> TF-IDF weight entries
    pub weights: HashMap<String, f64>,
    /// L2 norm of the weights
    pub magnitude: f64,
}

impl TermVector {
    /// Builds a term vector, computing the magnitude from the weights.
    pub fn new(id: impl Into<String>, weights: HashMap<String, f64>) -> Self {
        let magnitude = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        Self {
            id: id.into(),
            weights,
            magnitude,
        }
    }
}

/// A thematically coherent group of scraps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// Unique cluster identifier
    pub id: ClusterId,
    /// Human-readable name synthesized from top TF-IDF terms
    pub name: String,
    /// Short summary of member kinds ("Contains 3 scraps: 2 notes, 1 link")
    pub description: String,
    /// Top aggregate TF-IDF terms across members
    pub keywords: Vec<String>,
    /// IDs of member scraps; never empty in a returned cluster
    pub member_ids: Vec<String>,
    /// Mean vector of the members, `vocabulary.len()` wide
    pub centroid: Vec<f64>,
    /// Sum of squared member distances to the centroid
    pub inertia: f64,
    /// Inherited tightness heuristic: `1 - inertia / max(members, 1)`.
    ///
    /// Not a normalized score - it can go negative for loose clusters. The
    /// formula is preserved from the product as-is.
    pub coherence: f64,
    /// Palette color for visualization
    pub color: String,
}

/// Result of a full clustering rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringResult {
    /// Non-empty clusters in centroid index order
    pub clusters: Vec<Cluster>,
    /// Scrap id -> cluster id; covers exactly the union of all member lists
    pub assignments: HashMap<String, ClusterId>,
    /// Silhouette score of the partition, in [-1, 1]
    pub quality: f64,
}

impl ClusteringResult {
    /// Neutral result used when there is not enough data to cluster.
    pub fn empty() -> Self {
        Self {
            clusters: Vec::new(),
            assignments: HashMap::new(),
            quality: 0.0,
        }
    }
}

/// A (scrap id, similarity) pair from nearest-neighbor queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapSimilarity {
    /// Neighbor scrap identifier
    pub id: String,
    /// Cosine similarity to the query scrap
    pub similarity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_ids_are_unique() {
        let a = ClusterId::new();
        let b = ClusterId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_cluster_id_roundtrip() {
        let id = ClusterId::from_u64(42);
        assert_eq!(id.as_u64(), 42);
    }

    #[test]
    fn test_term_vector_magnitude() {
        let mut weights = HashMap::new();
        weights.insert("three".to_string(), 3.0);
        weights.insert("four".to_string(), 4.0);
        let vector = TermVector::new("v", weights);
        assert!((vector.magnitude - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_term_vector_has_zero_magnitude() {
        let vector = TermVector::new("empty", HashMap::new());
        assert_eq!(vector.magnitude, 0.0);
    }

    #[test]
    fn test_scrap_kind_labels() {
        assert_eq!(ScrapKind::Note.to_string(), "note");
        assert_eq!(ScrapKind::Link.label(), "link");
    }

    #[test]
    fn test_empty_result_is_neutral() {
        let result = ClusteringResult::empty();
        assert!(result.clusters.is_empty());
        assert!(result.assignments.is_empty());
        assert_eq!(result.quality, 0.0);
    }
}
