//! # Scrapmind Core
//!
//! Platform-independent clustering engine for the Scrapmind knowledge base.
//!
//! This crate turns a corpus of short free-text documents ("scraps") into
//! TF-IDF vectors, partitions them into thematically coherent clusters with
//! k-means, scores the partition with a silhouette quality measure, and
//! supports incremental classification of new scraps plus nearest-neighbor
//! similarity queries.
//!
//! ## Modules
//!
//! - [`clustering`] - Tokenization, TF-IDF, similarity, k-means, and the
//!   [`ClusterEngine`](clustering::ClusterEngine) orchestrator
//! - [`config`] - Production tuning constants
//! - [`error`] - Error types for vector operations
//!
//! ## Usage
//!
//! ```
//! use scrapmind_core::clustering::{ClusterEngine, ScrapDocument, ScrapKind};
//!
//! let scraps = vec![
//!     ScrapDocument::new("a", "rust borrow checker ownership", ScrapKind::Note),
//!     ScrapDocument::new("b", "rust borrow checker ownership", ScrapKind::Note),
//!     ScrapDocument::new("c", "sourdough starter hydration baking", ScrapKind::Thought),
//!     ScrapDocument::new("d", "sourdough starter hydration baking", ScrapKind::Thought),
//! ];
//!
//! let mut engine = ClusterEngine::with_seed(7);
//! let result = engine.rebuild_clusters(&scraps).unwrap();
//! assert_eq!(result.clusters.len(), 2);
//! ```
//!
//! The engine is synchronous and CPU-bound; callers that need a responsive UI
//! should run [`rebuild_clusters`](clustering::ClusterEngine::rebuild_clusters)
//! off the interaction thread. A given [`ClusterEngine`](clustering::ClusterEngine)
//! instance is not reentrant - serialize calls against it.

pub mod clustering;
pub mod config;
pub mod error;

pub use clustering::{Cluster, ClusterEngine, ClusteringResult, ScrapDocument, ScrapKind};
pub use error::{validate_dimension, ClusterError};
