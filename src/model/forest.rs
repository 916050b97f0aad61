//! Random Forest Classifier
//! Bagged ensemble of Gini decision trees. Each tree is fitted on a bootstrap
//! sample and an optional random feature subset; class probabilities are the
//! share of trees voting for each class.

use crate::model::ModelError;
use linfa::prelude::*;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Features each tree may split on. The subset is drawn once per tree; no
/// per-split feature sampling takes place, so `All` is plain bagging rather
/// than the `max_features = "sqrt"` default of scikit-learn forests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureSubset {
    /// Every tree sees all features (plain bagging).
    #[default]
    All,
    /// Every tree sees a random `round(sqrt(p))` subset.
    Sqrt,
}

impl FeatureSubset {
    fn size(self, n_features: usize) -> usize {
        match self {
            FeatureSubset::All => n_features,
            FeatureSubset::Sqrt => ((n_features as f64).sqrt().round() as usize).clamp(1, n_features),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForestParams {
    pub n_trees: usize,
    pub seed: u64,
    pub max_depth: Option<usize>,
    pub feature_subset: FeatureSubset,
    pub min_samples_split: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 42,
            max_depth: None,
            feature_subset: FeatureSubset::All,
            min_samples_split: 2,
        }
    }
}

/// Class probabilities for one row. The two fields sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probabilities {
    pub not_diabetic: f64,
    pub diabetic: f64,
}

impl Probabilities {
    fn from_votes(positive: usize, total: usize) -> Self {
        let diabetic = positive as f64 / total as f64;
        Self {
            not_diabetic: 1.0 - diabetic,
            diabetic,
        }
    }

    /// `[not_diabetic, diabetic]`, in pie slice order.
    pub fn as_array(&self) -> [f64; 2] {
        [self.not_diabetic, self.diabetic]
    }

    pub fn predicted_class(&self) -> usize {
        usize::from(self.diabetic >= 0.5)
    }
}

struct ForestTree {
    features: Vec<usize>,
    tree: DecisionTree<f64, usize>,
}

pub struct RandomForest {
    trees: Vec<ForestTree>,
    n_features: usize,
}

impl RandomForest {
    /// Fit `params.n_trees` trees in parallel. Deterministic for a given seed.
    pub fn fit(
        params: &ForestParams,
        x: ArrayView2<f64>,
        y: ArrayView1<usize>,
    ) -> Result<Self, ModelError> {
        let (n_rows, n_features) = x.dim();
        if n_rows == 0 || n_features == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }
        if y.len() != n_rows {
            return Err(ModelError::LabelCount {
                rows: n_rows,
                labels: y.len(),
            });
        }
        if params.n_trees == 0 {
            return Err(ModelError::InvalidParams("n_trees must be at least 1".into()));
        }

        let mut master = StdRng::seed_from_u64(params.seed);
        let seeds: Vec<u64> = (0..params.n_trees).map(|_| master.random()).collect();
        let subset_size = params.feature_subset.size(n_features);

        let trees = seeds
            .into_par_iter()
            .map(|seed| Self::fit_tree(params, x, y, subset_size, seed))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            "Fitted {} trees on {} rows x {} features",
            trees.len(),
            n_rows,
            n_features
        );
        Ok(Self { trees, n_features })
    }

    fn fit_tree(
        params: &ForestParams,
        x: ArrayView2<f64>,
        y: ArrayView1<usize>,
        subset_size: usize,
        seed: u64,
    ) -> Result<ForestTree, ModelError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let (n_rows, n_features) = x.dim();

        let rows: Vec<usize> = (0..n_rows).map(|_| rng.random_range(0..n_rows)).collect();
        let mut features = if subset_size == n_features {
            (0..n_features).collect::<Vec<_>>()
        } else {
            rand::seq::index::sample(&mut rng, n_features, subset_size).into_vec()
        };
        features.sort_unstable();

        let records = x.select(Axis(0), &rows).select(Axis(1), &features);
        let targets = y.select(Axis(0), &rows);
        let dataset = Dataset::new(records, targets);

        let tree = DecisionTree::<f64, usize>::params()
            .split_quality(SplitQuality::Gini)
            .max_depth(params.max_depth)
            .min_weight_split(params.min_samples_split as f32)
            .min_weight_leaf(1.0)
            .fit(&dataset)
            .map_err(|e| ModelError::Fit(e.to_string()))?;

        Ok(ForestTree { features, tree })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Class probabilities for a single row.
    pub fn predict_proba(&self, row: &[f64]) -> Result<Probabilities, ModelError> {
        let x = Array2::from_shape_vec((1, row.len()), row.to_vec())
            .map_err(|e| ModelError::Fit(e.to_string()))?;
        self.predict_proba_batch(x.view())?
            .into_iter()
            .next()
            .ok_or(ModelError::EmptyTrainingSet)
    }

    /// Class probabilities for every row of `x`.
    pub fn predict_proba_batch(&self, x: ArrayView2<f64>) -> Result<Vec<Probabilities>, ModelError> {
        if x.ncols() != self.n_features {
            return Err(ModelError::FeatureCount {
                expected: self.n_features,
                found: x.ncols(),
            });
        }

        let votes: Array1<usize> = self
            .trees
            .par_iter()
            .map(|t| {
                let records = x.select(Axis(1), &t.features);
                let predicted: Array1<usize> = t.tree.predict(&records);
                predicted.mapv(|class| usize::from(class == 1))
            })
            .reduce(|| Array1::zeros(x.nrows()), |a, b| a + b);

        Ok(votes
            .iter()
            .map(|&positive| Probabilities::from_votes(positive, self.trees.len()))
            .collect())
    }

    /// Share of rows whose majority vote matches the label.
    pub fn score(&self, x: ArrayView2<f64>, y: ArrayView1<usize>) -> Result<f64, ModelError> {
        if y.is_empty() {
            return Ok(f64::NAN);
        }
        let predictions = self.predict_proba_batch(x)?;
        let correct = predictions
            .iter()
            .zip(y.iter())
            .filter(|(p, &label)| p.predicted_class() == label)
            .count();
        Ok(correct as f64 / y.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two features; label is 1 when the first exceeds 140.
    fn separable(n: usize) -> (Array2<f64>, Array1<usize>) {
        let mut rng = StdRng::seed_from_u64(1);
        let mut flat = Vec::with_capacity(n * 2);
        let mut labels = Vec::with_capacity(n);
        for _ in 0..n {
            let glucose: f64 = rng.random_range(60.0..200.0);
            let noise: f64 = rng.random_range(0.0..1.0);
            flat.push(glucose);
            flat.push(noise);
            labels.push(usize::from(glucose > 140.0));
        }
        (
            Array2::from_shape_vec((n, 2), flat).unwrap(),
            Array1::from_vec(labels),
        )
    }

    fn small_params() -> ForestParams {
        ForestParams {
            n_trees: 15,
            ..ForestParams::default()
        }
    }

    #[test]
    fn probabilities_are_bounded_and_sum_to_one() {
        let (x, y) = separable(120);
        let forest = RandomForest::fit(&small_params(), x.view(), y.view()).unwrap();
        assert_eq!(forest.n_trees(), 15);

        for row in [[60.0, 0.5], [139.0, 0.1], [141.0, 0.9], [200.0, 0.0], [-50.0, 3.0]] {
            let p = forest.predict_proba(&row).unwrap();
            assert!((0.0..=1.0).contains(&p.diabetic));
            assert!((0.0..=1.0).contains(&p.not_diabetic));
            assert!((p.diabetic + p.not_diabetic - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn learns_a_separable_threshold() {
        let (x, y) = separable(200);
        let forest = RandomForest::fit(&small_params(), x.view(), y.view()).unwrap();

        assert!(forest.predict_proba(&[195.0, 0.5]).unwrap().diabetic > 0.5);
        assert!(forest.predict_proba(&[70.0, 0.5]).unwrap().diabetic < 0.5);
        assert!(forest.score(x.view(), y.view()).unwrap() > 0.9);
    }

    #[test]
    fn fitting_is_deterministic_for_a_seed() {
        let (x, y) = separable(80);
        let a = RandomForest::fit(&small_params(), x.view(), y.view()).unwrap();
        let b = RandomForest::fit(&small_params(), x.view(), y.view()).unwrap();

        let pa = a.predict_proba_batch(x.view()).unwrap();
        let pb = b.predict_proba_batch(x.view()).unwrap();
        assert_eq!(pa, pb);
    }

    #[test]
    fn sqrt_subset_still_predicts_every_row() {
        let (x, y) = separable(60);
        let params = ForestParams {
            feature_subset: FeatureSubset::Sqrt,
            ..small_params()
        };
        let forest = RandomForest::fit(&params, x.view(), y.view()).unwrap();
        assert_eq!(forest.predict_proba_batch(x.view()).unwrap().len(), 60);
        assert_eq!(FeatureSubset::Sqrt.size(8), 3);
        assert_eq!(FeatureSubset::Sqrt.size(1), 1);
    }

    #[test]
    fn wrong_feature_count_is_rejected() {
        let (x, y) = separable(40);
        let forest = RandomForest::fit(&small_params(), x.view(), y.view()).unwrap();
        assert!(matches!(
            forest.predict_proba(&[1.0, 2.0, 3.0]),
            Err(ModelError::FeatureCount {
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn mismatched_labels_are_rejected() {
        let (x, _) = separable(10);
        let y = Array1::from_vec(vec![0usize; 9]);
        assert!(matches!(
            RandomForest::fit(&small_params(), x.view(), y.view()),
            Err(ModelError::LabelCount { rows: 10, labels: 9 })
        ));
    }
}
