use ndarray::Zip;

use super::error::AggregatorError;
use super::grid::Grid;
use super::masked_grid::MaskedGrid;
use super::record::{EventId, ModuleRecord};

/// One stored frame: a module record tagged with the event it arrived in
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFrame {
    pub event: Option<EventId>,
    pub module_id: Option<u32>,
    pub grid: MaskedGrid,
}

/// Element-wise running sum of masked grids.
///
/// The first grid fixes the shape; every later grid must match it. Invalid samples add
/// zero, so the aggregate always has the per-frame shape.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    total: Option<Grid>,
    n_frames: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, grid: &MaskedGrid) -> Result<(), AggregatorError> {
        match self.total.as_mut() {
            Some(total) => {
                if total.dim() != grid.shape() {
                    return Err(AggregatorError::ShapeMismatch {
                        frame: self.n_frames,
                        expected: total.dim(),
                        found: grid.shape(),
                    });
                }
                Zip::from(total)
                    .and(grid.values())
                    .and(grid.valid())
                    .for_each(|sum, value, valid| {
                        if *valid {
                            *sum += *value;
                        }
                    });
            }
            None => self.total = Some(grid.zero_filled()),
        }
        self.n_frames += 1;
        Ok(())
    }

    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    /// Consume the aggregator. Fails if nothing was ever added.
    pub fn finish(self) -> Result<Grid, AggregatorError> {
        self.total.ok_or(AggregatorError::EmptyInput)
    }
}

/// FrameStore keeps every decoded frame in arrival order, which is also the rendering order.
#[derive(Debug, Clone, Default)]
pub struct FrameStore {
    frames: Vec<StoredFrame>,
}

impl FrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: Option<EventId>, record: ModuleRecord) {
        self.frames.push(StoredFrame {
            event,
            module_id: record.module_id,
            grid: record.grid,
        });
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[StoredFrame] {
        &self.frames
    }

    /// Sum every stored frame into one grid of the first frame's shape
    pub fn aggregate(&self) -> Result<Grid, AggregatorError> {
        let mut aggregator = Aggregator::new();
        for frame in self.frames.iter() {
            aggregator.add(&frame.grid)?;
        }
        aggregator.finish()
    }

    pub fn into_frames(self) -> Vec<StoredFrame> {
        self.frames
    }
}
