//! Statistics Calculator Module
//! Handles dataset summaries: column info, descriptive stats, Pearson
//! correlation and histogram binning.

use crate::data::{DataLoader, NumericColumn};
use polars::prelude::*;
use rayon::prelude::*;
use statrs::statistics::Statistics;
use std::fmt::Write;

/// Column metadata for the info section.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub non_null: usize,
}

/// Shape and column metadata of a loaded table.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetInfo {
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
}

impl DatasetInfo {
    pub fn from_frame(df: &DataFrame) -> Self {
        let columns = df
            .get_columns()
            .iter()
            .map(|col| ColumnInfo {
                name: col.name().to_string(),
                dtype: col.dtype().to_string(),
                non_null: col.len() - col.null_count(),
            })
            .collect();
        Self {
            rows: df.height(),
            columns,
        }
    }
}

/// Descriptive statistics for one column.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

/// Pairwise Pearson correlations between numeric columns.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(f64::NAN)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One histogram bin `[start, end)`; the last bin of a histogram is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Histogram of one column.
#[derive(Debug, Clone)]
pub struct ColumnHistogram {
    pub name: String,
    pub bins: Vec<HistogramBin>,
}

/// Everything shown after a dataset load.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub info: DatasetInfo,
    pub summaries: Vec<ColumnSummary>,
    pub correlation: CorrelationMatrix,
    pub histograms: Vec<ColumnHistogram>,
}

impl Analysis {
    /// Text for the data analysis dialog.
    pub fn report(&self) -> String {
        format!(
            "Info:\n{}\n\nDescribe:\n{}\n\nCorrelation:\n{}",
            StatsCalculator::format_info(&self.info),
            StatsCalculator::format_describe(&self.summaries),
            StatsCalculator::format_correlation(&self.correlation)
        )
    }
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Run every analysis over the numeric columns of a table.
    pub fn analyze(df: &DataFrame, bins: usize) -> Analysis {
        let columns = DataLoader::numeric_columns(df);
        let summaries = Self::describe(&columns);
        let correlation = Self::correlation_matrix(&columns);
        let histograms = columns
            .par_iter()
            .map(|col| ColumnHistogram {
                name: col.name.clone(),
                bins: Self::histogram(&col.present(), bins),
            })
            .collect();

        Analysis {
            info: DatasetInfo::from_frame(df),
            summaries,
            correlation,
            histograms,
        }
    }

    /// Count, mean, std, min, quartiles and max for each column.
    pub fn describe(columns: &[NumericColumn]) -> Vec<ColumnSummary> {
        columns
            .iter()
            .map(|col| Self::summarize(&col.name, &col.present()))
            .collect()
    }

    fn summarize(name: &str, values: &[f64]) -> ColumnSummary {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let (min, max) = if values.is_empty() {
            (f64::NAN, f64::NAN)
        } else {
            (Statistics::min(values), Statistics::max(values))
        };

        ColumnSummary {
            name: name.to_string(),
            count: values.len(),
            mean: values.mean(),
            std: values.std_dev(),
            min,
            p25: Self::percentile(&sorted, 25.0),
            p50: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max,
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Pearson correlation over rows where both columns are present.
    pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
        let (xs, ys): (Vec<f64>, Vec<f64>) = x
            .iter()
            .zip(y.iter())
            .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
            .unzip();

        if xs.len() < 2 {
            return f64::NAN;
        }

        let sx = xs.iter().std_dev();
        let sy = ys.iter().std_dev();
        if sx == 0.0 || sy == 0.0 || sx.is_nan() || sy.is_nan() {
            return f64::NAN;
        }

        let cov = xs.iter().covariance(ys.iter());
        (cov / (sx * sy)).clamp(-1.0, 1.0)
    }

    /// Correlation matrix over all columns, computed row-parallel.
    pub fn correlation_matrix(columns: &[NumericColumn]) -> CorrelationMatrix {
        let values = columns
            .par_iter()
            .map(|a| {
                columns
                    .iter()
                    .map(|b| Self::pearson(&a.values, &b.values))
                    .collect()
            })
            .collect();

        CorrelationMatrix {
            names: columns.iter().map(|c| c.name.clone()).collect(),
            values,
        }
    }

    /// Equal-width histogram over `[min, max]`.
    pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        if values.is_empty() || bins == 0 {
            return Vec::new();
        }

        let mut lo = Statistics::min(values);
        let mut hi = Statistics::max(values);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: lo + i as f64 * width,
                end: if i + 1 == bins {
                    hi
                } else {
                    lo + (i + 1) as f64 * width
                },
                count,
            })
            .collect()
    }

    pub fn format_info(info: &DatasetInfo) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} entries, {} columns", info.rows, info.columns.len());
        let _ = writeln!(out, " #  {:<28} {:>14}  Dtype", "Column", "Non-Null Count");
        for (i, col) in info.columns.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>2}  {:<28} {:>5} non-null  {}",
                i, col.name, col.non_null, col.dtype
            );
        }
        out.trim_end().to_string()
    }

    pub fn format_describe(summaries: &[ColumnSummary]) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<28} {:>7} {:>10} {:>10} {:>9} {:>9} {:>9} {:>9} {:>9}",
            "", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
        );
        for s in summaries {
            let _ = writeln!(
                out,
                "{:<28} {:>7} {:>10.4} {:>10.4} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3}",
                s.name, s.count, s.mean, s.std, s.min, s.p25, s.p50, s.p75, s.max
            );
        }
        out.trim_end().to_string()
    }

    pub fn format_correlation(matrix: &CorrelationMatrix) -> String {
        let mut out = String::new();
        let _ = write!(out, "{:<28}", "");
        for name in &matrix.names {
            let _ = write!(out, " {:>8}", abbreviate(name, 8));
        }
        let _ = writeln!(out);
        for (i, name) in matrix.names.iter().enumerate() {
            let _ = write!(out, "{:<28}", name);
            for j in 0..matrix.len() {
                let _ = write!(out, " {:>8.3}", matrix.get(i, j));
            }
            let _ = writeln!(out);
        }
        out.trim_end().to_string()
    }
}

/// Shorten a column name to fit a fixed-width header.
pub fn abbreviate(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        name.to_string()
    } else {
        name.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, values: &[f64]) -> NumericColumn {
        NumericColumn {
            name: name.to_string(),
            values: values.iter().map(|v| Some(*v)).collect(),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn describe_matches_pandas_on_small_column() {
        let summaries = StatsCalculator::describe(&[column("Glucose", &[1.0, 2.0, 3.0, 4.0])]);
        let s = &summaries[0];
        assert_eq!(s.count, 4);
        assert!(approx(s.mean, 2.5));
        assert!(approx(s.std, 1.2909944487358056));
        assert!(approx(s.min, 1.0));
        assert!(approx(s.p25, 1.75));
        assert!(approx(s.p50, 2.5));
        assert!(approx(s.p75, 3.25));
        assert!(approx(s.max, 4.0));
    }

    #[test]
    fn describe_ignores_missing_values() {
        let col = NumericColumn {
            name: "Insulin".to_string(),
            values: vec![Some(10.0), None, Some(30.0)],
        };
        let s = &StatsCalculator::describe(&[col])[0];
        assert_eq!(s.count, 2);
        assert!(approx(s.mean, 20.0));
    }

    #[test]
    fn percentile_interpolates_linearly() {
        let sorted = [10.0, 20.0, 30.0];
        assert!(approx(StatsCalculator::percentile(&sorted, 50.0), 20.0));
        assert!(approx(StatsCalculator::percentile(&sorted, 75.0), 25.0));
        assert!(StatsCalculator::percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn pearson_of_linear_columns_is_one() {
        let x: Vec<Option<f64>> = (0..10).map(|i| Some(i as f64)).collect();
        let y: Vec<Option<f64>> = (0..10).map(|i| Some(3.0 * i as f64 + 1.0)).collect();
        let neg: Vec<Option<f64>> = (0..10).map(|i| Some(-(i as f64))).collect();
        assert!(approx(StatsCalculator::pearson(&x, &y), 1.0));
        assert!(approx(StatsCalculator::pearson(&x, &neg), -1.0));
    }

    #[test]
    fn pearson_uses_pairwise_complete_rows() {
        let x = vec![Some(1.0), Some(2.0), None, Some(4.0)];
        let y = vec![Some(2.0), Some(4.0), Some(100.0), Some(8.0)];
        assert!(approx(StatsCalculator::pearson(&x, &y), 1.0));
    }

    #[test]
    fn constant_column_has_undefined_correlation() {
        let matrix = StatsCalculator::correlation_matrix(&[
            column("A", &[1.0, 2.0, 3.0]),
            column("B", &[5.0, 5.0, 5.0]),
        ]);
        assert!(approx(matrix.get(0, 0), 1.0));
        assert!(matrix.get(0, 1).is_nan());
        assert!(matrix.get(1, 1).is_nan());
        assert_eq!(matrix.names, vec!["A", "B"]);
    }

    #[test]
    fn histogram_splits_range_into_equal_bins() {
        let bins = StatsCalculator::histogram(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], 5);
        assert_eq!(bins.len(), 5);
        assert!(approx(bins[0].start, 0.0));
        assert!(approx(bins[4].end, 5.0));
        assert!(approx(bins[0].width(), 1.0));
        // the maximum lands in the closed last bin
        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 1, 2]);
    }

    #[test]
    fn histogram_of_constant_column_widens_range() {
        let bins = StatsCalculator::histogram(&[7.0, 7.0, 7.0], 5);
        assert!(approx(bins[0].start, 6.5));
        assert!(approx(bins[4].end, 7.5));
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
        assert_eq!(bins[2].count, 3);
    }

    #[test]
    fn report_contains_all_sections() {
        let df = df!(
            "Glucose" => [148.0, 85.0, 183.0],
            "Outcome" => [1i64, 0, 1]
        )
        .unwrap();
        let analysis = StatsCalculator::analyze(&df, 5);
        let report = analysis.report();
        assert!(report.starts_with("Info:\n3 entries, 2 columns"));
        assert!(report.contains("\n\nDescribe:\n"));
        assert!(report.contains("\n\nCorrelation:\n"));
        assert_eq!(analysis.histograms.len(), 2);
        assert_eq!(analysis.info.columns[1].non_null, 3);
    }
}
