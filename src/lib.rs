pub mod columns;
pub mod config;
pub mod error;
pub mod export;
pub mod league;
pub mod logging;
pub mod prepare;
pub mod raw_table;
pub mod role;
pub mod shared;
pub mod similarity;
pub mod weights;

pub use error::{LoadError, SimilarityError};
pub use prepare::{PlayerRecord, PreparedDataset, load_dataset, prepare};
pub use role::{Role, StatLine, classify};
pub use similarity::{Metric, SimilarPlayer, TargetRef, find_similar};
pub use weights::{WeightProfile, weights_for, weights_for_label};
