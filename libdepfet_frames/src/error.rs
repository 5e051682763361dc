use std::path::PathBuf;
use thiserror::Error;

use super::worker_status::WorkerStatus;

#[derive(Debug, Error)]
pub enum MalformedGridError {
    #[error("Failed to read readout stream: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Grid ended early at line {line}; expected {expected} samples for a {rows}x{columns} grid, found {found}")]
    TruncatedGrid {
        line: usize,
        rows: usize,
        columns: usize,
        expected: usize,
        found: usize,
    },
    #[error("Invalid ADC sample '{token}' at line {line}")]
    BadSample { line: usize, token: String },
    #[error("Malformed static header '{text}' at line {line}; expected '<columns> <rows>'")]
    BadStaticHeader { line: usize, text: String },
    #[error("Malformed record header '{text}' at line {line}; expected '<tag> <run> <event> <moduleCount>'")]
    BadRecordHeader { line: usize, text: String },
    #[error("Malformed module header '{text}' at line {line}; expected '<tag> <moduleId> <columns> <rows>'")]
    BadModuleHeader { line: usize, text: String },
    #[error("Record (run {run}, event {event}) ended at line {line} before module {module} of {module_count}")]
    MissingModuleHeader {
        line: usize,
        run: u32,
        event: u32,
        module: usize,
        module_count: usize,
    },
    #[error("Grid dimensions {rows}x{columns} at line {line} are not allowed")]
    BadDimensions {
        line: usize,
        rows: usize,
        columns: usize,
    },
    #[error("Unexpected trailing data '{token}' at line {line} after a complete sample block")]
    TrailingTokens { line: usize, token: String },
    #[error("Failed to shape decoded samples into a grid: {0}")]
    ShapeError(#[from] ndarray::ShapeError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregatorError {
    #[error("Frame {frame} has shape {found:?} but the aggregate frame has shape {expected:?}")]
    ShapeMismatch {
        frame: usize,
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("Cannot aggregate an empty frame sequence")]
    EmptyInput,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config does not name any input files")]
    NoInputFiles,
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum FrameSinkError {
    #[error("FrameSink failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("FrameSink failed to convert to yaml: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("FrameSink received frame {0} before the normalization bounds")]
    MissingBounds(usize),
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to malformed input: {0}")]
    MalformedGrid(#[from] MalformedGridError),
    #[error("Processor failed due to Aggregator error: {0}")]
    AggregatorError(#[from] AggregatorError),
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Processor failed due to FrameSink error: {0}")]
    FrameSinkError(#[from] FrameSinkError),
    #[error("Processor failed due to Send error: {0}")]
    SendError(#[from] std::sync::mpsc::SendError<WorkerStatus>),
    #[error("Processor failed due to IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Processor failed to convert to yaml: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}
