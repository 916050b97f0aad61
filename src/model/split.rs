//! Train/Test Split
//! Seeded shuffle of row indices into a training and a held-out set.

use crate::model::ModelError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row indices of each side of a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_rows` with `seed` and hold out `ceil(n_rows * test_fraction)`
/// rows for testing.
pub fn train_test_split(n_rows: usize, test_fraction: f64, seed: u64) -> Result<Split, ModelError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ModelError::InvalidSplit(format!(
            "test fraction must be in (0, 1), got {}",
            test_fraction
        )));
    }

    let n_test = (n_rows as f64 * test_fraction).ceil() as usize;
    if n_test == 0 || n_test >= n_rows {
        return Err(ModelError::InvalidSplit(format!(
            "{} rows cannot be split with test fraction {}",
            n_rows, test_fraction
        )));
    }

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(Split {
        train,
        test: indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_partitions_all_rows() {
        let split = train_test_split(768, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 154);
        assert_eq!(split.train.len(), 614);

        let mut all: Vec<usize> = split.train.iter().chain(split.test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..768).collect::<Vec<_>>());
    }

    #[test]
    fn split_is_reproducible_for_a_seed() {
        let a = train_test_split(100, 0.2, 42).unwrap();
        let b = train_test_split(100, 0.2, 42).unwrap();
        let c = train_test_split(100, 0.2, 7).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.test, c.test);
    }

    #[test]
    fn tiny_tables_still_leave_a_training_row() {
        let split = train_test_split(2, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 1);
        assert_eq!(split.train.len(), 1);
        assert!(train_test_split(1, 0.2, 42).is_err());
    }

    #[test]
    fn rejects_bad_fraction() {
        assert!(matches!(
            train_test_split(10, 0.0, 42),
            Err(ModelError::InvalidSplit(_))
        ));
        assert!(train_test_split(10, 1.0, 42).is_err());
    }
}
