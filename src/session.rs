//! Session Module
//! One loaded dataset together with its analysis and fitted classifier.

use crate::config::AppConfig;
use crate::data::{Dataset, FeatureInput};
use crate::model::{train_test_split, Probabilities, RandomForest};
use crate::stats::{Analysis, StatsCalculator};
use anyhow::Context;
use ndarray::Axis;
use std::path::Path;
use std::time::Instant;

pub struct Session {
    pub dataset: Dataset,
    pub analysis: Analysis,
    pub model: RandomForest,
    /// Accuracy on the held-out rows.
    pub test_accuracy: f64,
    pub train_rows: usize,
    pub test_rows: usize,
}

impl Session {
    /// Load, analyze and fit in one step. Progress messages go to `progress`.
    pub fn load(
        path: &Path,
        config: &AppConfig,
        mut progress: impl FnMut(&str),
    ) -> anyhow::Result<Self> {
        let started = Instant::now();

        progress("Reading dataset...");
        let dataset = Dataset::load(path)
            .with_context(|| format!("could not read dataset {}", path.display()))?;
        tracing::info!(
            "Loaded {} rows ({} diabetic, {} skipped) from {}",
            dataset.len(),
            dataset.positive_count(),
            dataset.skipped_rows,
            path.display()
        );

        progress("Analyzing data...");
        let analysis = StatsCalculator::analyze(&dataset.frame, config.histogram_bins);

        progress("Training model...");
        let split = train_test_split(dataset.len(), config.test_fraction, config.seed)
            .context("could not split dataset")?;
        let x_train = dataset.features.select(Axis(0), &split.train);
        let y_train = dataset.outcome.select(Axis(0), &split.train);
        let x_test = dataset.features.select(Axis(0), &split.test);
        let y_test = dataset.outcome.select(Axis(0), &split.test);

        let model = RandomForest::fit(&config.forest_params(), x_train.view(), y_train.view())
            .context("could not train classifier")?;
        let test_accuracy = model
            .score(x_test.view(), y_test.view())
            .context("could not evaluate classifier")?;

        tracing::info!(
            "Trained {} trees on {} features in {:.2?}; held-out accuracy {:.2}% ({} rows)",
            model.n_trees(),
            model.n_features(),
            started.elapsed(),
            test_accuracy * 100.0,
            split.test.len()
        );

        Ok(Self {
            dataset,
            analysis,
            model,
            test_accuracy,
            train_rows: split.train.len(),
            test_rows: split.test.len(),
        })
    }

    pub fn predict(&self, input: &FeatureInput) -> anyhow::Result<Probabilities> {
        let probabilities = self
            .model
            .predict_proba(input.as_slice())
            .context("prediction failed")?;
        tracing::debug!(?input, ?probabilities, "Predicted");
        Ok(probabilities)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} rows loaded from {}; test accuracy {:.1}%",
            self.dataset.len(),
            self.dataset
                .source
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            self.test_accuracy * 100.0
        )
    }
}
