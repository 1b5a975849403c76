use std::path::PathBuf;

use thiserror::Error;

use crate::role::Role;

/// The dataset could not be turned into a prepared dataset at all.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("unsupported dataset format: {0}")]
    UnsupportedFormat(String),

    #[error("dataset is missing required column `{0}`")]
    MissingColumn(String),
}

/// A similarity query that produced no result. Never a silent low score.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimilarityError {
    #[error("dataset is empty")]
    EmptyDataset,

    #[error("no usable features for role {role}")]
    NoUsableFeatures { role: Role },

    #[error("target not found in dataset: {name}")]
    TargetNotFound { name: String, squad: Option<String> },

    #[error("neighbor count must be at least 1")]
    ZeroNeighbors,
}
