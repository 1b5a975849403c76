use std::path::PathBuf;

use crate::similarity::Metric;

pub const DEFAULT_DATASET: &str = "perfect_merge.csv";
pub const DEFAULT_NEIGHBORS: usize = 5;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub dataset: PathBuf,
    pub metric: Metric,
    pub neighbors: usize,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from(DEFAULT_DATASET),
            metric: Metric::default(),
            neighbors: DEFAULT_NEIGHBORS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Read `.env.local`, then `.env`, then the process environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let dataset = lookup("TRIDENT_DATA")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.dataset);
        let metric = lookup("TRIDENT_METRIC")
            .and_then(|v| v.parse::<Metric>().ok())
            .unwrap_or(defaults.metric);
        let neighbors = lookup("TRIDENT_NEIGHBORS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(defaults.neighbors)
            .max(1);
        let log_level = lookup("TRIDENT_LOG")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.log_level);
        Self {
            dataset,
            metric,
            neighbors,
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(Config::from_lookup(lookup(&[])), Config::default());
    }

    #[test]
    fn reads_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("TRIDENT_DATA", "data/2024.parquet"),
            ("TRIDENT_METRIC", "euclidean"),
            ("TRIDENT_NEIGHBORS", "12"),
            ("TRIDENT_LOG", "debug"),
        ]));
        assert_eq!(cfg.dataset, PathBuf::from("data/2024.parquet"));
        assert_eq!(cfg.metric, Metric::Euclidean);
        assert_eq!(cfg.neighbors, 12);
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn bad_values_fall_back() {
        let cfg = Config::from_lookup(lookup(&[
            ("TRIDENT_METRIC", "manhattan"),
            ("TRIDENT_NEIGHBORS", "0"),
        ]));
        assert_eq!(cfg.metric, Metric::Cosine);
        assert_eq!(cfg.neighbors, 1);
    }
}
