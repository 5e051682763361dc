//! # depfet_frames
//!
//! depfet_frames turns DEPFET detector readout text files into a sequence of masked ADC
//! frames ready for visualization. It reads either a single hitmap grid or a stream of
//! per-event, per-module grids, masks the "no data" samples, fixes one global intensity
//! scale for the whole run, sums every frame into an "All Frames" summary and hands the
//! frames, in a fixed order, to a renderer.
//!
//! Drawing the frames and encoding a movie are left to external tools. The bundled
//! [`frame_sink::DirectorySink`] writes every frame as a text grid together with a YAML
//! manifest carrying the shared intensity range and frame rate.
//!
//! ## Building & Install
//!
//! To build and install the CLI use `cargo install --path ./depfet_frames_cli` from the
//! top level repository.
//!
//! ## Configuration
//!
//! The YAML format of a configuration file is as follows:
//!
//! ```yml
//! input_paths:
//! - run_0001.dat
//! - run_0002.dat
//! variant: sequence
//! output_path: frames
//! skip_events: 0
//! max_events: null
//! frame_rate: 10
//! ```
//!
//! - `variant` is `static` for hitmap files and `sequence` for event dumps.
//! - `skip_events` and `max_events` select which events of a sequence enter the run.
//! - `frame_rate` is passed on to the movie encoder through the manifest.
//!
//! ## Input Formats
//!
//! Both formats are whitespace separated text. Samples of one grid are row-major and may
//! be wrapped across any number of lines. Negative samples mean "no data".
//!
//! Static (hitmap):
//!
//! ```text
//! <columns> <rows>
//! <columns * rows samples>
//! ```
//!
//! Sequence (movie):
//!
//! ```text
//! event <run> <event> <moduleCount>
//! module <moduleId> <columns> <rows>
//! <columns * rows samples>
//! module ...
//! ```
//!
//! ## Output
//!
//! ```text
//! <output_path>/<input stem>/
//! |---- 0000.dat      aggregate frame ("All Frames")
//! |---- 0001.dat ...  one file per module frame, in input order
//! |---- frames.yml    intensity range, max frame total, frame rate, titles
//! |---- summary.yml   static inputs only: valid samples, sum, mean
//! ```
pub mod config;
pub mod constants;
pub mod error;
pub mod frame_sink;
pub mod frame_store;
pub mod grid;
pub mod masked_grid;
pub mod normalization;
pub mod process;
pub mod record;
pub mod record_parser;
pub mod sequencer;
pub mod summary;
pub mod token_stream;
pub mod worker_status;
pub mod writer;
