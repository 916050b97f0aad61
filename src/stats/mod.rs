//! Stats module - Dataset summaries

mod calculator;

pub use calculator::{abbreviate, Analysis, ColumnHistogram, CorrelationMatrix, StatsCalculator};
