//! Model module - Train/test split and random forest classifier

mod forest;
mod split;

pub use forest::{FeatureSubset, ForestParams, Probabilities, RandomForest};
pub use split::train_test_split;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Training set is empty")]
    EmptyTrainingSet,
    #[error("Feature matrix has {rows} rows but {labels} labels")]
    LabelCount { rows: usize, labels: usize },
    #[error("Expected {expected} features, got {found}")]
    FeatureCount { expected: usize, found: usize },
    #[error("Invalid forest parameters: {0}")]
    InvalidParams(String),
    #[error("Invalid train/test split: {0}")]
    InvalidSplit(String),
    #[error("Failed to fit decision tree: {0}")]
    Fit(String),
}
