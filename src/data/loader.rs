//! CSV Data Loader Module
//! Handles CSV file loading, column resolution and training matrix extraction
//! using Polars.

use crate::data::{Feature, FEATURE_COUNT, OUTCOME_COLUMN};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Minimum number of usable rows for a train/test split.
pub const MIN_ROWS: usize = 2;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Dataset file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Missing column '{0}'")]
    MissingColumn(String),
    #[error("Column '{column}' is not numeric ({dtype})")]
    NonNumeric { column: String, dtype: String },
    #[error("Outcome must be 0 or 1, found {value} in row {row}")]
    InvalidOutcome { row: usize, value: f64 },
    #[error("Need at least 2 complete rows, found {0}")]
    NotEnoughRows(usize),
    #[error("Failed to build feature matrix: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("No data loaded")]
    NoData,
}

/// A numeric column with row alignment preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl NumericColumn {
    /// Non-missing values in row order.
    pub fn present(&self) -> Vec<f64> {
        self.values.iter().flatten().copied().collect()
    }
}

/// Handles CSV file loading with Polars.
pub struct DataLoader {
    df: Option<DataFrame>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { df: None }
    }

    /// Load a CSV file using Polars.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        if !file_path.exists() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        let path_str = file_path.to_string_lossy().to_string();
        let df = LazyCsvReader::new(&path_str)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        tracing::debug!(
            "Read {} rows x {} columns from {}",
            df.height(),
            df.width(),
            file_path.display()
        );
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Take ownership of the loaded DataFrame.
    pub fn take_dataframe(&mut self) -> Result<DataFrame, LoaderError> {
        self.df.take().ok_or(LoaderError::NoData)
    }

    /// Get list of numeric column names.
    pub fn get_numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| is_numeric(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// All numeric columns in file order. Nulls and NaNs become `None` so
    /// row alignment is kept for pairwise statistics.
    pub fn numeric_columns(df: &DataFrame) -> Vec<NumericColumn> {
        Self::get_numeric_columns(df)
            .into_iter()
            .filter_map(|name| {
                let values = column_as_f64(df, &name)
                    .ok()?
                    .into_iter()
                    .map(|v| v.filter(|x| !x.is_nan()))
                    .collect();
                Some(NumericColumn { name, values })
            })
            .collect()
    }

    /// Find a column by exact name, then by a normalized spelling that
    /// ignores case, underscores and spaces.
    pub fn resolve_column(df: &DataFrame, name: &str) -> Result<String, LoaderError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        if names.iter().any(|n| n == name) {
            return Ok(name.to_string());
        }

        let wanted = normalize_column_name(name);
        names
            .into_iter()
            .find(|n| normalize_column_name(n) == wanted)
            .ok_or_else(|| LoaderError::MissingColumn(name.to_string()))
    }
}

fn normalize_column_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Boolean
    )
}

fn column_as_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, LoaderError> {
    let column = df.column(name)?;
    if !is_numeric(column.dtype()) {
        return Err(LoaderError::NonNumeric {
            column: name.to_string(),
            dtype: column.dtype().to_string(),
        });
    }
    let as_f64 = column.cast(&DataType::Float64)?;
    let values = as_f64.f64()?.into_iter().collect();
    Ok(values)
}

/// Validated training data: eight predictors plus a binary outcome.
#[derive(Clone)]
pub struct Dataset {
    pub frame: DataFrame,
    pub source: PathBuf,
    pub features: Array2<f64>,
    pub outcome: Array1<usize>,
    pub skipped_rows: usize,
}

impl Dataset {
    /// Validate a loaded frame and extract the feature matrix and labels.
    pub fn from_frame(frame: DataFrame, source: PathBuf) -> Result<Self, LoaderError> {
        let mut columns: Vec<Vec<Option<f64>>> = Vec::with_capacity(FEATURE_COUNT);
        for feature in Feature::ALL {
            let name = DataLoader::resolve_column(&frame, feature.column_name())?;
            columns.push(column_as_f64(&frame, &name)?);
        }
        let outcome_name = DataLoader::resolve_column(&frame, OUTCOME_COLUMN)?;
        let outcome_values = column_as_f64(&frame, &outcome_name)?;

        let mut flat: Vec<f64> = Vec::with_capacity(frame.height() * FEATURE_COUNT);
        let mut labels: Vec<usize> = Vec::with_capacity(frame.height());
        let mut skipped_rows = 0;

        for row in 0..frame.height() {
            let label = match outcome_values[row] {
                Some(v) if !v.is_nan() => v,
                _ => {
                    skipped_rows += 1;
                    continue;
                }
            };

            let label = if label == 0.0 {
                0
            } else if label == 1.0 {
                1
            } else {
                return Err(LoaderError::InvalidOutcome { row, value: label });
            };

            let values: Option<Vec<f64>> = columns
                .iter()
                .map(|col| col[row].filter(|v| !v.is_nan()))
                .collect();
            let Some(values) = values else {
                skipped_rows += 1;
                continue;
            };

            flat.extend(values);
            labels.push(label);
        }

        if labels.len() < MIN_ROWS {
            return Err(LoaderError::NotEnoughRows(labels.len()));
        }
        if skipped_rows > 0 {
            tracing::warn!("Skipped {} rows with missing values", skipped_rows);
        }

        let features = Array2::from_shape_vec((labels.len(), FEATURE_COUNT), flat)?;
        Ok(Self {
            frame,
            source,
            features,
            outcome: Array1::from_vec(labels),
            skipped_rows,
        })
    }

    /// Load and validate a dataset in one step.
    pub fn load(path: &Path) -> Result<Self, LoaderError> {
        let mut loader = DataLoader::new();
        loader.load_csv(path)?;
        let frame = loader.take_dataframe()?;
        Self::from_frame(frame, path.to_path_buf())
    }

    /// Number of usable training rows.
    pub fn len(&self) -> usize {
        self.outcome.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcome.is_empty()
    }

    pub fn positive_count(&self) -> usize {
        self.outcome.iter().filter(|&&y| y == 1).count()
    }
}
