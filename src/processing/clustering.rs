//! K-means grouping of skill phrases over their embeddings

use crate::config::ClusteringConfig;
use crate::error::{Result, ResumeScreenerError};
use crate::processing::embeddings::{embedding_dimension, EmbeddingProvider};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Seeded k-means with k-means++ initialization and Lloyd iterations.
///
/// Minimizes the within-cluster sum of squared Euclidean distances. The best
/// of `n_init` restarts (lowest inertia) is kept. Clusters that lose all
/// their points keep their previous centroid.
#[derive(Debug, Clone)]
pub struct KMeans {
    n_clusters: usize,
    seed: u64,
    max_iterations: usize,
    n_init: usize,
    tolerance: f32,
}

/// Outcome of a k-means fit
#[derive(Debug, Clone)]
pub struct KMeansFit {
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f32>>,
    pub inertia: f64,
    pub iterations: usize,
}

impl KMeans {
    pub fn new(n_clusters: usize) -> Self {
        Self::from_config(&ClusteringConfig::default(), n_clusters)
    }

    pub fn from_config(config: &ClusteringConfig, n_clusters: usize) -> Self {
        Self {
            n_clusters,
            seed: config.seed,
            max_iterations: config.max_iterations.max(1),
            n_init: config.n_init.max(1),
            tolerance: config.tolerance,
        }
    }

    pub fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    pub fn fit(&self, data: &[Vec<f32>]) -> Result<KMeansFit> {
        if data.is_empty() {
            return Ok(KMeansFit {
                labels: Vec::new(),
                centroids: Vec::new(),
                inertia: 0.0,
                iterations: 0,
            });
        }
        if self.n_clusters == 0 {
            return Err(ResumeScreenerError::InvalidInput(
                "Number of clusters must be at least 1".to_string(),
            ));
        }
        embedding_dimension(data)?;

        let k = self.n_clusters.min(data.len());
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<KMeansFit> = None;

        for run in 0..self.n_init {
            let initial = self.init_centroids(data, k, &mut rng);
            let fit = self.lloyd(data, initial);
            debug!(
                "k-means run {}: inertia {:.6} after {} iterations",
                run, fit.inertia, fit.iterations
            );

            if best.as_ref().map_or(true, |b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }

        // n_init >= 1, so a run always exists
        let mut best = best.ok_or_else(|| {
            ResumeScreenerError::InvalidInput("k-means produced no runs".to_string())
        })?;
        relabel_by_first_appearance(&mut best);
        Ok(best)
    }

    /// k-means++ seeding: later centroids sampled proportional to squared distance
    fn init_centroids(&self, data: &[Vec<f32>], k: usize, rng: &mut StdRng) -> Vec<Vec<f32>> {
        let mut chosen: Vec<usize> = Vec::with_capacity(k);
        chosen.push(rng.gen_range(0..data.len()));

        let mut min_dist: Vec<f64> = data
            .iter()
            .map(|point| squared_distance(point, &data[chosen[0]]))
            .collect();

        while chosen.len() < k {
            let total: f64 = min_dist.iter().sum();

            let next = if total > 0.0 {
                let target = rng.gen::<f64>() * total;
                let mut cumulative = 0.0;
                let mut picked = data.len() - 1;
                for (idx, dist) in min_dist.iter().enumerate() {
                    cumulative += dist;
                    if cumulative > target {
                        picked = idx;
                        break;
                    }
                }
                picked
            } else {
                // Every point coincides with a centroid
                (0..data.len())
                    .find(|idx| !chosen.contains(idx))
                    .unwrap_or(0)
            };

            chosen.push(next);
            for (idx, point) in data.iter().enumerate() {
                let dist = squared_distance(point, &data[next]);
                if dist < min_dist[idx] {
                    min_dist[idx] = dist;
                }
            }
        }

        chosen.into_iter().map(|idx| data[idx].clone()).collect()
    }

    fn lloyd(&self, data: &[Vec<f32>], mut centroids: Vec<Vec<f32>>) -> KMeansFit {
        let dim = data[0].len();
        let mut labels = assign(data, &centroids);
        let mut iterations = 0;

        for _ in 0..self.max_iterations {
            iterations += 1;

            let mut sums = vec![vec![0.0f64; dim]; centroids.len()];
            let mut counts = vec![0usize; centroids.len()];
            for (point, &label) in data.iter().zip(labels.iter()) {
                counts[label] += 1;
                for (acc, value) in sums[label].iter_mut().zip(point.iter()) {
                    *acc += f64::from(*value);
                }
            }

            let mut max_shift = 0.0f64;
            for (cluster, centroid) in centroids.iter_mut().enumerate() {
                if counts[cluster] == 0 {
                    continue;
                }
                let updated: Vec<f32> = sums[cluster]
                    .iter()
                    .map(|sum| (sum / counts[cluster] as f64) as f32)
                    .collect();
                max_shift = max_shift.max(squared_distance(centroid, &updated));
                *centroid = updated;
            }

            labels = assign(data, &centroids);
            if max_shift <= f64::from(self.tolerance) {
                break;
            }
        }

        let inertia = data
            .iter()
            .zip(labels.iter())
            .map(|(point, &label)| squared_distance(point, &centroids[label]))
            .sum();

        KMeansFit {
            labels,
            centroids,
            inertia,
            iterations,
        }
    }
}

fn squared_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum()
}

/// Nearest centroid per point; ties go to the lowest index
fn assign(data: &[Vec<f32>], centroids: &[Vec<f32>]) -> Vec<usize> {
    data.iter()
        .map(|point| {
            let mut best = 0;
            let mut best_dist = f64::INFINITY;
            for (idx, centroid) in centroids.iter().enumerate() {
                let dist = squared_distance(point, centroid);
                if dist < best_dist {
                    best = idx;
                    best_dist = dist;
                }
            }
            best
        })
        .collect()
}

/// Renumber clusters so labels follow the order in which points first use them
fn relabel_by_first_appearance(fit: &mut KMeansFit) {
    let mut mapping: Vec<Option<usize>> = vec![None; fit.centroids.len()];
    let mut next = 0;
    for label in &fit.labels {
        if mapping[*label].is_none() {
            mapping[*label] = Some(next);
            next += 1;
        }
    }
    for old in 0..mapping.len() {
        if mapping[old].is_none() {
            mapping[old] = Some(next);
            next += 1;
        }
    }

    let mapping: Vec<usize> = mapping.into_iter().flatten().collect();
    let mut centroids = vec![Vec::new(); fit.centroids.len()];
    for (old, centroid) in fit.centroids.drain(..).enumerate() {
        centroids[mapping[old]] = centroid;
    }
    fit.centroids = centroids;
    for label in fit.labels.iter_mut() {
        *label = mapping[*label];
    }
}

/// Phrases that share a cluster label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCluster {
    pub label: usize,
    pub phrases: Vec<String>,
}

/// Groups skill phrases by semantic similarity
pub struct SkillClusterer<'a> {
    provider: &'a dyn EmbeddingProvider,
    config: ClusteringConfig,
}

impl<'a> SkillClusterer<'a> {
    pub fn new(provider: &'a dyn EmbeddingProvider, config: ClusteringConfig) -> Self {
        Self { provider, config }
    }

    /// One label per phrase, in `[0, min(k, phrases.len()))`
    pub fn cluster(&self, phrases: &[String], k: usize) -> Result<Vec<usize>> {
        if phrases.len() < 2 {
            return Ok(vec![0; phrases.len()]);
        }

        let embeddings = self.provider.embed(phrases)?;
        if embeddings.len() != phrases.len() {
            return Err(ResumeScreenerError::Embedding(format!(
                "Provider '{}' returned {} vectors for {} phrases",
                self.provider.model_name(),
                embeddings.len(),
                phrases.len()
            )));
        }

        KMeans::from_config(&self.config, k).fit_predict(&embeddings)
    }

    /// Phrases grouped by cluster, ordered by label
    pub fn cluster_groups(&self, phrases: &[String], k: usize) -> Result<Vec<SkillCluster>> {
        let labels = self.cluster(phrases, k)?;
        let cluster_count = labels.iter().max().map_or(0, |max| max + 1);

        let mut groups: Vec<SkillCluster> = (0..cluster_count)
            .map(|label| SkillCluster {
                label,
                phrases: Vec::new(),
            })
            .collect();
        for (phrase, label) in phrases.iter().zip(labels) {
            groups[label].phrases.push(phrase.clone());
        }

        Ok(groups)
    }
}
