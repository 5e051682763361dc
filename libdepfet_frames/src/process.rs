use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use super::config::{get_summary_path, Config};
use super::error::{AggregatorError, ProcessorError};
use super::frame_sink::{DirectorySink, FrameSink};
use super::frame_store::FrameStore;
use super::normalization::{NormalizationBounds, NormalizationTracker};
use super::record_parser::{InputVariant, RecordParser};
use super::sequencer::sequence;
use super::summary::GridSummary;
use super::worker_status::{Stage, WorkerStatus};

/// Fraction of the input between two progress updates
const FLUSH_FRACTION: f32 = 0.01;

/// What a completed run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub events_read: usize,
    pub frames_read: usize,
    pub frames_written: usize,
    pub bounds: NormalizationBounds,
    /// Only for static inputs
    pub summary: Option<GridSummary>,
}

/// Everything gathered in the decoding pass
#[derive(Debug)]
pub struct DecodedRun {
    pub events_read: usize,
    pub store: FrameStore,
    pub bounds: NormalizationBounds,
}

/// Pull every event from the parser, masking, observing and storing each module frame.
///
/// Events outside the configured selection are decoded but neither observed nor stored;
/// reading stops once every selected event has been seen.
pub fn decode_run<R: BufRead>(
    mut parser: RecordParser<R>,
    config: &Config,
    total_bytes: u64,
    tx: &Sender<WorkerStatus>,
) -> Result<DecodedRun, ProcessorError> {
    let mut store = FrameStore::new();
    let mut tracker = NormalizationTracker::new();
    let flush_val = (total_bytes as f64 * FLUSH_FRACTION as f64) as u64;
    let mut last_flush: u64 = 0;
    let mut position: usize = 0;
    let mut events_read: usize = 0;

    tx.send(WorkerStatus::new(0.0, 0, Stage::Decoding))?;
    while let Some(event) = parser.get_next_event()? {
        if config.is_event_selected(position) {
            for record in event.modules {
                tracker.observe(&record.grid);
                store.append(event.id, record);
            }
            events_read += 1;
        }
        position += 1;

        let bytes = parser.bytes_read();
        if bytes - last_flush > flush_val {
            last_flush = bytes;
            let progress = if total_bytes > 0 {
                bytes as f32 / total_bytes as f32
            } else {
                0.0
            };
            tx.send(WorkerStatus::new(progress, store.len(), Stage::Decoding))?;
        }

        if config.is_selection_done(position) {
            spdlog::info!("Reached the configured maximum of events, ignoring the rest");
            break;
        }
    }
    tx.send(WorkerStatus::new(1.0, store.len(), Stage::Decoding))?;

    Ok(DecodedRun {
        events_read,
        store,
        bounds: tracker.bounds(),
    })
}

/// Aggregate the stored frames and hand the full sequence to a sink.
///
/// The sink sees the final bounds before the first frame. Returns the number of frames
/// written, the aggregate included.
pub fn emit_frames<S: FrameSink>(
    store: FrameStore,
    bounds: &NormalizationBounds,
    sink: &mut S,
    tx: &Sender<WorkerStatus>,
) -> Result<usize, ProcessorError> {
    let aggregate = store.aggregate()?;
    let frames = sequence(aggregate, store);
    let total = frames.len();

    sink.begin(bounds)?;
    tx.send(WorkerStatus::new(0.0, total, Stage::Writing))?;
    let mut written: usize = 0;
    for frame in frames {
        sink.write_frame(frame)?;
        written += 1;
        tx.send(WorkerStatus::new(
            written as f32 / total as f32,
            total,
            Stage::Writing,
        ))?;
    }
    sink.finish()?;
    Ok(written)
}

/// Run the complete pipeline over any readout stream
pub fn process_stream<R: BufRead, S: FrameSink>(
    reader: R,
    config: &Config,
    total_bytes: u64,
    sink: &mut S,
    tx: &Sender<WorkerStatus>,
) -> Result<RunReport, ProcessorError> {
    let parser = RecordParser::new(reader, config.variant);
    let DecodedRun {
        events_read,
        store,
        bounds,
    } = decode_run(parser, config, total_bytes, tx)?;

    let frames_read = store.len();
    if frames_read == 0 {
        return Err(ProcessorError::AggregatorError(AggregatorError::EmptyInput));
    }
    spdlog::info!(
        "{} frames read, max ADC value is {} with at most {} total in one frame",
        frames_read,
        bounds.max_sample,
        bounds.max_frame_total
    );

    let summary = match config.variant {
        InputVariant::Static => store.frames().first().map(|frame| {
            let summary = GridSummary::from_masked(&frame.grid);
            spdlog::info!("Average ADC count: {:?}", summary.mean);
            spdlog::info!("Total ADC sum: {}", summary.sum);
            summary
        }),
        InputVariant::Sequence => None,
    };

    let frames_written = emit_frames(store, &bounds, sink, tx)?;

    Ok(RunReport {
        events_read,
        frames_read,
        frames_written,
        bounds,
        summary,
    })
}

/// Process one input file into its own frame directory
pub fn process_file(
    config: &Config,
    input_path: &Path,
    tx: &Sender<WorkerStatus>,
) -> Result<RunReport, ProcessorError> {
    let total_bytes = input_path.metadata()?.len();
    spdlog::info!(
        "Processing {} ({})",
        input_path.to_string_lossy(),
        human_bytes::human_bytes(total_bytes as f64)
    );

    let frame_dir: PathBuf = config.get_frame_directory(input_path)?;
    let mut sink = DirectorySink::new(&frame_dir, config.frame_rate)?;
    let reader = BufReader::new(File::open(input_path)?);
    let report = process_stream(reader, config, total_bytes, &mut sink, tx)?;

    if let Some(summary) = report.summary.as_ref() {
        std::fs::write(
            get_summary_path(&frame_dir),
            serde_yaml::to_string(summary)?,
        )?;
    }
    spdlog::info!(
        "Wrote {} frames to {}",
        report.frames_written,
        sink.frame_dir().to_string_lossy()
    );
    Ok(report)
}

/// The main entry point: process every input named by the config.
///
/// Each input is an independent run with its own bounds, aggregate and frame directory.
/// Reports are returned in input order. Intended to be called from a separate thread;
/// progress is reported over `tx`.
pub fn process(
    config: Config,
    tx: Sender<WorkerStatus>,
) -> Result<Vec<RunReport>, ProcessorError> {
    config.check_input_files()?;
    let mut reports = Vec::with_capacity(config.input_paths.len());
    for (idx, input_path) in config.input_paths.iter().enumerate() {
        spdlog::info!("Input {} of {}...", idx + 1, config.input_paths.len());
        reports.push(process_file(&config, input_path, &tx)?);
        spdlog::info!("Finished {}.", input_path.to_string_lossy());
    }
    Ok(reports)
}
