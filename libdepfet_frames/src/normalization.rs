use serde::{Deserialize, Serialize};

use super::masked_grid::MaskedGrid;

/// The global intensity scale shared by every frame of a run.
///
/// Both maxima start at negative infinity and only ever grow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationBounds {
    /// Largest single valid sample seen in any frame
    pub max_sample: f64,
    /// Largest sum of valid samples within one frame
    pub max_frame_total: f64,
    pub frames_observed: usize,
}

impl Default for NormalizationBounds {
    fn default() -> Self {
        Self {
            max_sample: f64::NEG_INFINITY,
            max_frame_total: f64::NEG_INFINITY,
            frames_observed: 0,
        }
    }
}

impl NormalizationBounds {
    /// The `(0, max_sample)` range handed to a renderer, clamped so an empty or all-masked
    /// run still yields a usable scale
    pub fn intensity_range(&self) -> (f64, f64) {
        (0.0, self.max_sample.max(0.0))
    }
}

/// Tracks running maxima over all decoded frames.
///
/// Every frame must be observed, in frame order, before any frame is handed to a renderer.
#[derive(Debug, Clone, Default)]
pub struct NormalizationTracker {
    bounds: NormalizationBounds,
}

impl NormalizationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, grid: &MaskedGrid) {
        if let Some(peak) = grid.valid_max() {
            self.bounds.max_sample = self.bounds.max_sample.max(peak);
        }
        self.bounds.max_frame_total = self.bounds.max_frame_total.max(grid.valid_sum());
        self.bounds.frames_observed += 1;
    }

    /// Current bounds; final once the whole stream has been observed
    pub fn bounds(&self) -> NormalizationBounds {
        self.bounds
    }
}
