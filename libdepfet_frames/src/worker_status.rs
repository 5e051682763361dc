#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Decoding,
    Writing,
}

/// Progress message sent from the processing thread to a UI
#[derive(Debug, Clone, Default)]
pub struct WorkerStatus {
    pub progress: f32,
    pub frames: usize,
    pub stage: Stage,
}

impl WorkerStatus {
    pub fn new(progress: f32, frames: usize, stage: Stage) -> Self {
        Self {
            progress,
            frames,
            stage,
        }
    }
}
