use serde::{Deserialize, Serialize};

use super::masked_grid::MaskedGrid;

/// Global statistics of a single masked grid, reported for static (hitmap) inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSummary {
    pub valid_samples: usize,
    pub sum: f64,
    /// Mean over valid samples only. None if nothing is valid
    pub mean: Option<f64>,
}

impl GridSummary {
    pub fn from_masked(grid: &MaskedGrid) -> Self {
        let valid_samples = grid.valid_count();
        let sum = grid.valid_sum();
        let mean = (valid_samples > 0).then(|| sum / valid_samples as f64);
        Self {
            valid_samples,
            sum,
            mean,
        }
    }
}
