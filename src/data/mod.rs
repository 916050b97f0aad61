//! Data module - CSV loading and feature definitions

mod features;
mod loader;

pub use features::{Feature, FeatureInput, InputKind, InputSpec, FEATURE_COUNT, OUTCOME_COLUMN};
pub use loader::{DataLoader, Dataset, NumericColumn};
