use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SimilarityError;
use crate::prepare::{PlayerRecord, PreparedDataset};
use crate::weights::{FeatureWeight, WeightProfile, weights_for};

/// Euclidean scores decay over this many median neighbor distances.
const EUCLIDEAN_MEDIAN_SPREAD: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Cosine,
    Euclidean,
}

impl Metric {
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Cosine => "cosine",
            Metric::Euclidean => "euclidean",
        }
    }

    pub fn distance(self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Metric::Cosine => cosine_distance(a, b),
            Metric::Euclidean => euclidean_distance(a, b),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" | "cos" | "c" => Ok(Metric::Cosine),
            "euclidean" | "euclid" | "e" => Ok(Metric::Euclidean),
            other => Err(format!("unknown metric: {other}")),
        }
    }
}

/// Who to find neighbors for. The squad disambiguates players sharing a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRef {
    pub name: String,
    pub squad: Option<String>,
}

impl TargetRef {
    pub fn new(name: impl Into<String>, squad: Option<String>) -> Self {
        Self {
            name: name.into(),
            squad,
        }
    }

    pub fn of(player: &PlayerRecord) -> Self {
        Self::new(player.name.clone(), Some(player.squad.clone()))
    }
}

/// One ranked neighbor of the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarPlayer<'a> {
    pub row: usize,
    pub player: &'a PlayerRecord,
    pub distance: f64,
    pub score: f64,
}

/// Min-max scaled, weighted copy of the profile's columns for every player.
///
/// Scaling is fit on the whole dataset, so the space only depends on the
/// dataset and the profile, never on the queried player.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSpace {
    features: Vec<FeatureWeight>,
    rows: Vec<Vec<f64>>,
}

impl FeatureSpace {
    pub fn build(dataset: &PreparedDataset, profile: &WeightProfile) -> Option<Self> {
        let mut features = Vec::new();
        let mut columns = Vec::new();
        for fw in profile.features() {
            match dataset.column(fw.feature) {
                Some(col) => {
                    features.push(*fw);
                    columns.push(scale_column(col, fw.weight));
                }
                None => debug!(feature = fw.feature, "profile feature missing from dataset"),
            }
        }
        if features.is_empty() {
            return None;
        }

        let rows = (0..dataset.len())
            .map(|row| columns.iter().map(|col| col[row]).collect::<Vec<f64>>())
            .collect();
        Some(Self { features, rows })
    }

    pub fn features(&self) -> &[FeatureWeight] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, idx: usize) -> Option<&[f64]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    /// `k` nearest rows to `target` as `(row, distance)`, ascending, target excluded.
    /// Equal distances keep dataset order.
    pub fn nearest(&self, target: usize, metric: Metric, k: usize) -> Vec<(usize, f64)> {
        let Some(origin) = self.row(target) else {
            return Vec::new();
        };
        let mut hits: Vec<(usize, f64)> = self
            .rows
            .par_iter()
            .enumerate()
            .filter(|(idx, _)| *idx != target)
            .map(|(idx, row)| (idx, metric.distance(origin, row)))
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        hits.truncate(k);
        hits
    }
}

fn scale_column(values: &[f64], weight: f64) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    values
        .iter()
        .map(|v| {
            if range > 0.0 {
                (v - min) / range * weight
            } else {
                0.0
            }
        })
        .collect()
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// `1 - cosine similarity`, in `[0, 2]`. A zero vector has similarity 0.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a <= f64::EPSILON || norm_b <= f64::EPSILON {
        return 1.0;
    }
    (1.0 - dot / (norm_a * norm_b)).clamp(0.0, 2.0)
}

/// `sqrt(1 - d) * 100`; anything past orthogonal scores 0.
pub fn cosine_score(distance: f64) -> f64 {
    ((1.0 - distance).max(0.0).sqrt() * 100.0).clamp(0.0, 100.0)
}

/// Scores relative to the median neighbor distance of this query.
pub fn euclidean_scores(distances: &[f64]) -> Vec<f64> {
    let median = median(distances);
    if median <= 0.0 {
        return vec![100.0; distances.len()];
    }
    let scale = median * EUCLIDEAN_MEDIAN_SPREAD;
    distances
        .iter()
        .map(|d| (100.0 * (-d / scale).exp()).clamp(0.0, 100.0))
        .collect()
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

pub fn scores_for(metric: Metric, distances: &[f64]) -> Vec<f64> {
    match metric {
        Metric::Cosine => distances.iter().map(|d| cosine_score(*d)).collect(),
        Metric::Euclidean => euclidean_scores(distances),
    }
}

/// Row of the target: name and squad first, then name alone.
pub fn locate_target(dataset: &PreparedDataset, target: &TargetRef) -> Option<usize> {
    target
        .squad
        .as_deref()
        .and_then(|squad| dataset.find_exact(&target.name, squad))
        .or_else(|| dataset.find_by_name(&target.name))
}

/// The `k` players most similar to `target` under its role's weight profile,
/// best first.
pub fn find_similar<'a>(
    dataset: &'a PreparedDataset,
    target: &TargetRef,
    metric: Metric,
    k: usize,
) -> Result<Vec<SimilarPlayer<'a>>, SimilarityError> {
    if dataset.is_empty() {
        return Err(SimilarityError::EmptyDataset);
    }
    if k == 0 {
        return Err(SimilarityError::ZeroNeighbors);
    }
    let not_found = || SimilarityError::TargetNotFound {
        name: target.name.clone(),
        squad: target.squad.clone(),
    };
    let target_row = locate_target(dataset, target).ok_or_else(not_found)?;
    let role = dataset.player(target_row).ok_or_else(not_found)?.role;

    let profile = weights_for(role);
    let space = FeatureSpace::build(dataset, &profile).ok_or_else(|| {
        warn!(%role, "weight profile shares no columns with dataset");
        SimilarityError::NoUsableFeatures { role }
    })?;

    let neighbors = space.nearest(target_row, metric, k);
    let distances: Vec<f64> = neighbors.iter().map(|(_, d)| *d).collect();
    let scores = scores_for(metric, &distances);

    let mut out: Vec<SimilarPlayer<'a>> = neighbors
        .iter()
        .zip(scores)
        .filter_map(|(&(row, distance), score)| {
            dataset.player(row).map(|player| SimilarPlayer {
                row,
                player,
                distance,
                score,
            })
        })
        .collect();
    // Stable, so equal scores stay in distance order.
    out.sort_by(|a, b| b.score.total_cmp(&a.score));

    debug!(
        target = %target.name,
        %role,
        %metric,
        features = space.features().len(),
        returned = out.len(),
        "similarity query"
    );
    Ok(out)
}
