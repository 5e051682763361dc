use ndarray::{Array2, Zip};

use super::grid::Grid;

/// A decoded grid paired with its validity mask.
///
/// Negative ADC values are the readout's "no data" sentinel; such samples are marked
/// invalid and contribute nothing to sums, maxima or the aggregate frame. A MaskedGrid is
/// never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedGrid {
    values: Grid,
    valid: Array2<bool>,
}

/// Apply the sentinel rule to a grid. Total: every grid, even an all-invalid one, masks.
pub fn mask(grid: Grid) -> MaskedGrid {
    let valid = grid.mapv(|value| value >= 0.0);
    MaskedGrid {
        values: grid,
        valid,
    }
}

impl MaskedGrid {
    /// The raw samples, invalid ones included
    pub fn values(&self) -> &Grid {
        &self.values
    }

    pub fn valid(&self) -> &Array2<bool> {
        &self.valid
    }

    pub fn into_parts(self) -> (Grid, Array2<bool>) {
        (self.values, self.valid)
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn is_valid(&self, row: usize, column: usize) -> bool {
        self.valid[[row, column]]
    }

    /// Iterate over the valid samples in row-major order
    pub fn valid_samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.values
            .iter()
            .zip(self.valid.iter())
            .filter_map(|(value, valid)| (*valid).then_some(*value))
    }

    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|valid| **valid).count()
    }

    pub fn valid_sum(&self) -> f64 {
        self.valid_samples().sum()
    }

    /// Largest valid sample, None if every sample is masked
    pub fn valid_max(&self) -> Option<f64> {
        self.valid_samples().reduce(f64::max)
    }

    /// The samples with every invalid cell replaced by zero
    pub fn zero_filled(&self) -> Grid {
        let mut filled = self.values.clone();
        Zip::from(&mut filled)
            .and(&self.valid)
            .for_each(|value, valid| {
                if !*valid {
                    *value = 0.0;
                }
            });
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    #[test]
    fn test_negative_samples_are_invalid() {
        let masked = mask(array![[1.0, -1.0], [3.0, 4.0]]);
        assert_eq!(masked.valid(), &array![[true, false], [true, true]]);
        assert_eq!(masked.valid_count(), 3);
        assert_eq!(masked.valid_sum(), 8.0);
        assert_eq!(masked.valid_max(), Some(4.0));
        assert_eq!(masked.zero_filled(), array![[1.0, 0.0], [3.0, 4.0]]);
    }

    #[test]
    fn test_zero_is_valid() {
        let masked = mask(array![[0.0, -0.5]]);
        assert!(masked.is_valid(0, 0));
        assert!(!masked.is_valid(0, 1));
    }

    #[test]
    fn test_all_invalid_grid() {
        let masked = mask(array![[-1.0, -2.0]]);
        assert_eq!(masked.valid_count(), 0);
        assert_eq!(masked.valid_sum(), 0.0);
        assert_eq!(masked.valid_max(), None);
        assert_eq!(masked.shape(), (1, 2));
    }

    proptest! {
        #[test]
        fn prop_mask_is_exact(samples in prop::collection::vec(-1000.0_f64..1000.0, 12)) {
            let masked = mask(Array2::from_shape_vec((3, 4), samples.clone()).unwrap());
            for (idx, value) in samples.iter().enumerate() {
                prop_assert_eq!(masked.is_valid(idx / 4, idx % 4), *value >= 0.0);
            }
            prop_assert!(masked.valid_samples().all(|value| value >= 0.0));
            let expected: f64 = samples.iter().filter(|v| **v >= 0.0).sum();
            prop_assert!((masked.valid_sum() - expected).abs() < 1e-9);
        }
    }
}
