//! Text clustering pipeline: TF-IDF vectorization + k-means partitioning.
//!
//! This module implements the clustering core:
//! - **Tokenization**: lowercase word tokens with stopword filtering
//! - **TF-IDF**: sparse per-scrap term vectors over a corpus vocabulary
//! - **Similarity**: cosine over sparse vectors, Euclidean over dense vectors
//! - **K-means**: k-means++ seeded iterative refinement with empty-cluster
//!   reseeding, plus elbow-method selection of k
//! - **Quality**: silhouette scoring of a finished partition
//! - **Orchestration**: [`ClusterEngine`] tying the stages into rebuild,
//!   incremental assignment, and similarity queries
//!
//! # Architecture
//!
//! - `types`: Core types (ScrapDocument, TermVector, Cluster, ClusteringResult)
//! - `tokenizer`: Pure text-to-token splitting
//! - `tfidf`: TfidfVectorizer holding per-scrap token state
//! - `similarity`: Distance/similarity functions and sparse<->dense conversion
//! - `kmeans`: K-means engine and elbow-method k selection
//! - `quality`: Silhouette score
//! - `engine`: ClusterEngine orchestrator
//!
//! # Data Flow
//!
//! ```text
//! scraps -> tokenizer -> tfidf (vocabulary + vectors)
//!        -> elbow sweep (k-means per candidate k) -> k-means (final k)
//!        -> silhouette -> labeled ClusteringResult
//! ```
//!
//! # Determinism
//!
//! Centroid seeding and empty-cluster recovery are randomized. Every
//! randomized routine takes a caller-supplied RNG, and [`ClusterEngine`]
//! can be constructed with a fixed seed for reproducible runs. With a fixed
//! seed the whole pipeline is deterministic: vocabulary order is sorted and
//! all top-N selections break score ties explicitly.

pub mod types;

mod engine;
mod kmeans;
mod quality;
mod similarity;
mod tfidf;
mod tokenizer;

pub use engine::{ClusterAssignment, ClusterEngine};
pub use kmeans::{find_optimal_k, k_means, ElbowResult, KMeansCluster, KMeansResult};
pub use quality::silhouette_score;
pub use similarity::{
    cosine_distance, cosine_similarity, euclidean_distance, find_most_similar,
    pairwise_similarity_matrix, to_dense_vector, to_sparse_vector,
};
pub use tfidf::{TfidfVectorizer, VectorizedCorpus};
pub use tokenizer::tokenize;
pub use types::{
    Cluster, ClusterId, ClusteringResult, ScrapDocument, ScrapKind, ScrapSimilarity, TermVector,
};
