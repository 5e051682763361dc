use ndarray::Array2;

use super::constants::{AGGREGATE_FRAME_INDEX, AGGREGATE_FRAME_TITLE};
use super::frame_store::{FrameStore, StoredFrame};
use super::grid::Grid;

/// The unit handed across the boundary to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameHandle {
    pub index: usize,
    pub grid: Grid,
    pub valid: Array2<bool>,
    pub title: Option<String>,
}

/// A single-pass sequence of FrameHandles.
///
/// Index 0 is the aggregate frame ("All Frames", every cell valid). Stored frames follow
/// in arrival order with index `position + 1`. Frames from a static input carry no title.
/// The sequence owns the store's frames, so it cannot be restarted; rerunning requires
/// decoding the input again.
#[derive(Debug)]
pub struct FrameSequence {
    aggregate: Option<Grid>,
    frames: std::iter::Enumerate<std::vec::IntoIter<StoredFrame>>,
}

pub fn sequence(aggregate: Grid, store: FrameStore) -> FrameSequence {
    FrameSequence {
        aggregate: Some(aggregate),
        frames: store.into_frames().into_iter().enumerate(),
    }
}

impl Iterator for FrameSequence {
    type Item = FrameHandle;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(grid) = self.aggregate.take() {
            let valid = Array2::from_elem(grid.dim(), true);
            return Some(FrameHandle {
                index: AGGREGATE_FRAME_INDEX,
                grid,
                valid,
                title: Some(String::from(AGGREGATE_FRAME_TITLE)),
            });
        }

        let (position, frame) = self.frames.next()?;
        let StoredFrame { event, grid, .. } = frame;
        let (grid, valid) = grid.into_parts();
        Some(FrameHandle {
            index: position + 1,
            grid,
            valid,
            title: event.map(|id| id.to_string()),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.frames.len() + usize::from(self.aggregate.is_some());
        (n, Some(n))
    }
}

impl ExactSizeIterator for FrameSequence {}
