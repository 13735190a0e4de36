//! K-means partitioning of scrap vectors, with elbow-method k selection.
//!
//! Sparse TF-IDF vectors are expanded to dense form once per run (dense
//! dimensionality = vocabulary size), seeded with k-means++ to spread the
//! initial centroids, then refined by alternating assignment and centroid
//! updates until movement falls below [`CONVERGENCE_TOLERANCE`] or the
//! iteration cap is hit. A cluster that loses all members mid-iteration is
//! reseeded with a random corpus vector; it is never surfaced empty.
//!
//! All randomness flows through a caller-supplied [`Rng`], so tests can pin
//! seeds and production callers can use entropy.

use super::similarity::{euclidean_distance, to_dense_vector};
use super::types::TermVector;
use crate::config::{CONVERGENCE_TOLERANCE, ELBOW_SWEEP_ITERATIONS};
use crate::error::ClusterError;
use rand::Rng;
use std::collections::HashMap;
use tracing::debug;

/// Total inertia at or below this is treated as a coincident corpus.
///
/// When every point lands on the same spot, every k fits perfectly and the
/// elbow curve is flat; k selection returns 1 instead of pretending the flat
/// curve has structure.
const DEGENERATE_INERTIA: f64 = 1e-9;

/// One partition produced by a k-means run.
#[derive(Debug, Clone)]
pub struct KMeansCluster {
    /// Componentwise mean of the assigned vectors
    pub centroid: Vec<f64>,
    /// Scrap ids assigned to this centroid; non-empty in returned results
    pub member_ids: Vec<String>,
    /// Sum of squared member distances to the centroid, post-convergence
    pub inertia: f64,
}

/// Result of a k-means run.
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Non-empty clusters in centroid index order
    pub clusters: Vec<KMeansCluster>,
    /// Scrap id -> index into `clusters`
    pub assignments: HashMap<String, usize>,
    /// Refinement iterations actually executed
    pub iterations: usize,
    /// Total inertia of the final assignment
    pub total_inertia: f64,
}

impl KMeansResult {
    fn empty() -> Self {
        Self {
            clusters: Vec::new(),
            assignments: HashMap::new(),
            iterations: 0,
            total_inertia: 0.0,
        }
    }
}

/// Result of the elbow-method sweep.
#[derive(Debug, Clone)]
pub struct ElbowResult {
    /// Selected number of clusters
    pub optimal_k: usize,
    /// Total inertia per candidate k, in k order starting at 1
    pub inertias: Vec<f64>,
}

/// Runs k-means over sparse vectors.
///
/// `k` is clamped to the number of vectors; `k == 0` or an empty input
/// yields an empty result. Assignment ties go to the lowest centroid index,
/// so a run is fully deterministic given the RNG state.
///
/// # Errors
///
/// Propagates [`ClusterError::DimensionMismatch`] from the distance layer;
/// with vectors and vocabulary from the same vectorization pass this cannot
/// happen.
pub fn k_means<R: Rng>(
    vectors: &[TermVector],
    vocabulary: &[String],
    k: usize,
    max_iterations: usize,
    rng: &mut R,
) -> Result<KMeansResult, ClusterError> {
    if vectors.is_empty() || k == 0 {
        return Ok(KMeansResult::empty());
    }

    let k = k.min(vectors.len());
    let dims = vocabulary.len();
    let dense: Vec<Vec<f64>> = vectors
        .iter()
        .map(|v| to_dense_vector(v, vocabulary))
        .collect();

    let mut centroids = seed_centroids(&dense, k, rng)?;
    let mut assignments: Vec<usize> = Vec::new();
    let mut total_inertia = 0.0;
    let mut iterations = 0;

    for _ in 0..max_iterations {
        iterations += 1;

        let (step_assignments, step_inertia) = assign_step(&dense, &centroids)?;
        assignments = step_assignments;
        total_inertia = step_inertia;

        let new_centroids = update_step(&dense, &assignments, k, dims, rng);
        let done = converged(&centroids, &new_centroids)?;
        centroids = new_centroids;
        if done {
            break;
        }
    }

    // Recompute per-cluster inertia against the converged centroids.
    let mut clusters: Vec<KMeansCluster> = centroids
        .into_iter()
        .map(|centroid| KMeansCluster {
            centroid,
            member_ids: Vec::new(),
            inertia: 0.0,
        })
        .collect();

    for (i, vector) in vectors.iter().enumerate() {
        let cluster_index = assignments[i];
        let dist = euclidean_distance(&dense[i], &clusters[cluster_index].centroid)?;
        clusters[cluster_index].inertia += dist * dist;
        clusters[cluster_index].member_ids.push(vector.id.clone());
    }

    // A reseed immediately before convergence can leave a memberless cluster
    // behind; compact those away and remap assignment indices.
    let mut remap = vec![usize::MAX; clusters.len()];
    let mut compacted: Vec<KMeansCluster> = Vec::with_capacity(clusters.len());
    for (old_index, cluster) in clusters.into_iter().enumerate() {
        if cluster.member_ids.is_empty() {
            continue;
        }
        remap[old_index] = compacted.len();
        compacted.push(cluster);
    }

    let assignment_map: HashMap<String, usize> = vectors
        .iter()
        .enumerate()
        .map(|(i, vector)| (vector.id.clone(), remap[assignments[i]]))
        .collect();

    debug!(
        k,
        iterations,
        total_inertia,
        clusters = compacted.len(),
        "k-means finished"
    );

    Ok(KMeansResult {
        clusters: compacted,
        assignments: assignment_map,
        iterations,
        total_inertia,
    })
}

/// Chooses k via the elbow method over the k-means inertia curve.
///
/// Runs a capped k-means for every candidate `k in 1..=max_k` (clamped to
/// `vectors.len() - 1`), then picks the interior k whose neighbor vectors
/// form the largest angle. Two guards apply: a corpus of coincident points
/// has no elbow and selects 1, and a detected k of 1 is bumped to 2 once the
/// corpus has at least four scraps.
pub fn find_optimal_k<R: Rng>(
    vectors: &[TermVector],
    vocabulary: &[String],
    max_k: usize,
    rng: &mut R,
) -> Result<ElbowResult, ClusterError> {
    if vectors.len() <= 2 {
        return Ok(ElbowResult {
            optimal_k: 1,
            inertias: Vec::new(),
        });
    }

    let max_k = max_k.min(vectors.len() - 1).max(1);
    let mut inertias = Vec::with_capacity(max_k);
    for k in 1..=max_k {
        let result = k_means(vectors, vocabulary, k, ELBOW_SWEEP_ITERATIONS, rng)?;
        inertias.push(result.total_inertia);
    }

    if inertias
        .first()
        .is_some_and(|&inertia| inertia <= DEGENERATE_INERTIA)
    {
        debug!("coincident corpus, no elbow to detect");
        return Ok(ElbowResult {
            optimal_k: 1,
            inertias,
        });
    }

    let mut optimal_k = 1;
    let mut max_angle = 0.0;

    for i in 1..inertias.len().saturating_sub(1) {
        let left = (-1.0, inertias[i - 1] - inertias[i]);
        let right = (1.0, inertias[i + 1] - inertias[i]);

        let dot = left.0 * right.0 + left.1 * right.1;
        let mag_left = (left.0 * left.0 + left.1 * left.1).sqrt();
        let mag_right = (right.0 * right.0 + right.1 * right.1).sqrt();
        let angle = (dot / (mag_left * mag_right)).acos();

        if angle > max_angle {
            max_angle = angle;
            optimal_k = i + 1;
        }
    }

    if optimal_k == 1 && vectors.len() >= 4 {
        optimal_k = 2;
    }

    debug!(optimal_k, candidates = max_k, "elbow selection");
    Ok(ElbowResult {
        optimal_k,
        inertias,
    })
}

/// K-means++ seeding: the first centroid is uniform, each later centroid is
/// sampled with probability proportional to its squared distance from the
/// nearest already-chosen centroid.
fn seed_centroids<R: Rng>(
    dense: &[Vec<f64>],
    k: usize,
    rng: &mut R,
) -> Result<Vec<Vec<f64>>, ClusterError> {
    let n = dense.len();
    let mut centroids: Vec<Vec<f64>> = Vec::with_capacity(k);
    centroids.push(dense[rng.gen_range(0..n)].clone());

    while centroids.len() < k {
        let mut squared_distances = Vec::with_capacity(n);
        let mut total = 0.0;

        for vector in dense {
            let mut min_dist = f64::INFINITY;
            for centroid in &centroids {
                let dist = euclidean_distance(vector, centroid)?;
                min_dist = min_dist.min(dist);
            }
            let weight = min_dist * min_dist;
            squared_distances.push(weight);
            total += weight;
        }

        let before = centroids.len();
        let mut remaining = rng.gen::<f64>() * total;
        for (i, weight) in squared_distances.iter().enumerate() {
            remaining -= weight;
            if remaining <= 0.0 {
                centroids.push(dense[i].clone());
                break;
            }
        }

        // Floating-point slack can leave the sample unresolved
        if centroids.len() == before {
            centroids.push(dense[rng.gen_range(0..n)].clone());
        }
    }

    Ok(centroids)
}

/// Assigns every vector to its nearest centroid and accumulates inertia.
fn assign_step(
    dense: &[Vec<f64>],
    centroids: &[Vec<f64>],
) -> Result<(Vec<usize>, f64), ClusterError> {
    let mut assignments = Vec::with_capacity(dense.len());
    let mut total_inertia = 0.0;

    for vector in dense {
        let mut min_dist = f64::INFINITY;
        let mut nearest = 0;

        for (index, centroid) in centroids.iter().enumerate() {
            let dist = euclidean_distance(vector, centroid)?;
            if dist < min_dist {
                min_dist = dist;
                nearest = index;
            }
        }

        assignments.push(nearest);
        total_inertia += min_dist * min_dist;
    }

    Ok((assignments, total_inertia))
}

/// Recomputes centroids as member means; empty clusters are reseeded with a
/// uniformly random corpus vector to avoid NaN means and centroid collapse.
fn update_step<R: Rng>(
    dense: &[Vec<f64>],
    assignments: &[usize],
    k: usize,
    dims: usize,
    rng: &mut R,
) -> Vec<Vec<f64>> {
    let mut sums = vec![vec![0.0; dims]; k];
    let mut counts = vec![0usize; k];

    for (vector, &cluster) in dense.iter().zip(assignments) {
        counts[cluster] += 1;
        for (d, value) in vector.iter().enumerate() {
            sums[cluster][d] += value;
        }
    }

    (0..k)
        .map(|c| {
            if counts[c] > 0 {
                sums[c].iter().map(|sum| sum / counts[c] as f64).collect()
            } else {
                dense[rng.gen_range(0..dense.len())].clone()
            }
        })
        .collect()
}

/// True once every centroid moved less than the convergence tolerance.
fn converged(old: &[Vec<f64>], new: &[Vec<f64>]) -> Result<bool, ClusterError> {
    for (old_centroid, new_centroid) in old.iter().zip(new.iter()) {
        if euclidean_distance(old_centroid, new_centroid)? > CONVERGENCE_TOLERANCE {
            return Ok(false);
        }
    }
    Ok(true)
}
