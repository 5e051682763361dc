//! # depfet_frames_cli
//!
//! Part of the depfet_frames crate family.
//!
//! Command line application to turn DEPFET readout files into masked frame sequences.
//!
//! ## Use
//!
//! Make a template configuration with `depfet_frames_cli -p config.yml new`, edit it, then
//! run `depfet_frames_cli -p config.yml`. Library logs are written to `depfet_frames.log`.
use clap::{Arg, Command};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};

use libdepfet_frames::config::Config;
use libdepfet_frames::process::process;
use libdepfet_frames::worker_status::{Stage, WorkerStatus};

fn make_template_config(path: &Path) {
    let config = Config::default();
    match config.write_config_file(path) {
        Ok(()) => log::info!("Done."),
        Err(e) => log::error!("Could not write template config: {e}"),
    }
}

/// Build the logger library logs are routed to, as the terminal belongs to the progress bar
fn build_file_logger(path: &Path) -> Result<Arc<spdlog::Logger>, spdlog::Error> {
    let file_sink = Arc::new(
        spdlog::sink::FileSink::builder()
            .path(path.to_path_buf())
            .formatter(Box::new(spdlog::formatter::PatternFormatter::new(
                spdlog::formatter::pattern!(
                    "[{date_short} {time_short}] - [thread: {tid}] - [{^{level}}] - {payload}{eol}"
                ),
            )))
            .truncate(true)
            .build()?,
    );
    Ok(Arc::new(
        spdlog::Logger::builder()
            .flush_level_filter(spdlog::LevelFilter::All)
            .sink(file_sink)
            .build()?,
    ))
}

fn init_file_logger() -> Result<(), spdlog::Error> {
    let logger = build_file_logger(Path::new("./depfet_frames.log"))?;
    spdlog::set_default_logger(logger);
    Ok(())
}

fn stage_message(stage: Stage) -> &'static str {
    match stage {
        Stage::Decoding => "Decoding",
        Stage::Writing => "Writing frames",
    }
}

fn main() {
    // Create a cli
    let matches = Command::new("depfet_frames_cli")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .required(true)
                .help("Path to the configuration file"),
        )
        .get_matches();

    // Initialize feedback
    let logger = simplelog::TermLogger::new(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );

    let pb_manager = MultiProgress::new();

    if let Err(e) = LogWrapper::new(pb_manager.clone(), logger).try_init() {
        eprintln!("Could not create logging/progress: {e}");
        return;
    }
    if let Err(e) = init_file_logger() {
        log::warn!("Could not create log file, library logs go to the terminal: {e}");
    }

    // Parse the cli
    let config_path = match matches.get_one::<String>("path") {
        Some(p) => PathBuf::from(p),
        None => {
            log::error!("A configuration path is required");
            return;
        }
    };

    if let Some(("new", _)) = matches.subcommand() {
        log::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );
        make_template_config(&config_path);
        return;
    }

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match Config::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    log::info!("Config successfully loaded.");
    for input_path in config.input_paths.iter() {
        log::info!("Input Path: {}", input_path.to_string_lossy());
    }
    log::info!("Input Variant: {:?}", config.variant);
    log::info!("Output Path: {}", config.output_path.to_string_lossy());
    log::info!(
        "Skip Events: {} Max Events: {:?}",
        config.skip_events,
        config.max_events
    );

    // Setup the progress bar
    let pb = pb_manager.add(ProgressBar::new(100));
    if let Ok(style) = ProgressStyle::with_template("{msg:>16} [{bar:40.cyan/blue}] {pos:>3}%") {
        pb.set_style(style);
    }
    let input_paths = config.input_paths.clone();
    let (tx, rx) = mpsc::channel::<WorkerStatus>();
    // Spawn the task!
    let handle = std::thread::spawn(move || process(config, tx));

    // The channel closes when the worker finishes, successfully or not
    for status in rx.iter() {
        pb.set_message(stage_message(status.stage));
        pb.set_position((status.progress * 100.0) as u64);
    }

    match handle.join() {
        Ok(result) => match result {
            Ok(reports) => {
                pb.finish();
                for (input_path, report) in input_paths.iter().zip(reports) {
                    log::info!(
                        "{}: processed {} events into {} frames",
                        input_path.to_string_lossy(),
                        report.events_read,
                        report.frames_written
                    );
                    log::info!(
                        "Max ADC value: {} Max frame total: {}",
                        report.bounds.max_sample,
                        report.bounds.max_frame_total
                    );
                    if let Some(summary) = report.summary {
                        log::info!("Average ADC count: {:?}", summary.mean);
                        log::info!("Total ADC sum: {}", summary.sum);
                    }
                }
                log::info!("Successfully processed {} input(s)!", input_paths.len());
            }
            Err(e) => {
                pb.abandon();
                log::error!("Processing failed with error: {e}");
            }
        },
        Err(_) => log::error!("Failed to join processing task!"),
    }

    log::info!("Done.");
}
