use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::config::{get_frame_file_name, get_manifest_path};
use super::error::FrameSinkError;
use super::normalization::NormalizationBounds;
use super::sequencer::FrameHandle;
use super::writer::write_static;

/// The boundary between the frame pipeline and whatever draws the frames.
///
/// A sink first receives the final normalization bounds, then every FrameHandle exactly
/// once in sequence order, then `finish`.
pub trait FrameSink {
    fn begin(&mut self, bounds: &NormalizationBounds) -> Result<(), FrameSinkError>;
    fn write_frame(&mut self, frame: FrameHandle) -> Result<(), FrameSinkError>;
    fn finish(&mut self) -> Result<(), FrameSinkError>;
}

/// One line of the frame manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub index: usize,
    pub file: String,
    pub title: Option<String>,
    pub valid_samples: usize,
}

/// Everything an external renderer and video encoder need to turn the frame files into
/// images and a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameManifest {
    pub intensity_min: f64,
    pub intensity_max: f64,
    pub max_frame_total: f64,
    pub frame_rate: u32,
    pub frames: Vec<ManifestEntry>,
}

/// DirectorySink writes each frame as a static-layout text file named by its sequence
/// index (`0000.dat`, `0001.dat`, ...) plus a `frames.yml` manifest.
///
/// Masked samples keep their negative sentinel values in the frame files, so the validity
/// mask survives the hand-off.
#[derive(Debug)]
pub struct DirectorySink {
    frame_dir: PathBuf,
    frame_rate: u32,
    manifest: Option<FrameManifest>,
}

impl DirectorySink {
    /// Create the sink, creating the frame directory if needed
    pub fn new(frame_dir: &Path, frame_rate: u32) -> Result<Self, FrameSinkError> {
        std::fs::create_dir_all(frame_dir)?;
        Ok(Self {
            frame_dir: frame_dir.to_path_buf(),
            frame_rate,
            manifest: None,
        })
    }

    pub fn frame_dir(&self) -> &Path {
        &self.frame_dir
    }
}

impl FrameSink for DirectorySink {
    fn begin(&mut self, bounds: &NormalizationBounds) -> Result<(), FrameSinkError> {
        let (intensity_min, intensity_max) = bounds.intensity_range();
        self.manifest = Some(FrameManifest {
            intensity_min,
            intensity_max,
            max_frame_total: bounds.max_frame_total,
            frame_rate: self.frame_rate,
            frames: Vec::new(),
        });
        Ok(())
    }

    fn write_frame(&mut self, frame: FrameHandle) -> Result<(), FrameSinkError> {
        let manifest = self
            .manifest
            .as_mut()
            .ok_or(FrameSinkError::MissingBounds(frame.index))?;

        let file_name = get_frame_file_name(frame.index);
        let mut file = BufWriter::new(File::create(self.frame_dir.join(&file_name))?);
        write_static(&mut file, &frame.grid)?;
        file.flush()?;

        manifest.frames.push(ManifestEntry {
            index: frame.index,
            file: file_name,
            title: frame.title,
            valid_samples: frame.valid.iter().filter(|valid| **valid).count(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<(), FrameSinkError> {
        if let Some(manifest) = self.manifest.as_ref() {
            let yaml_str = serde_yaml::to_string(manifest)?;
            std::fs::write(get_manifest_path(&self.frame_dir), yaml_str)?;
        }
        Ok(())
    }
}

/// Collects frames in memory, for embedding the pipeline in another program
#[derive(Debug, Default)]
pub struct MemorySink {
    pub bounds: Option<NormalizationBounds>,
    pub frames: Vec<FrameHandle>,
    pub is_finished: bool,
}

impl FrameSink for MemorySink {
    fn begin(&mut self, bounds: &NormalizationBounds) -> Result<(), FrameSinkError> {
        self.bounds = Some(*bounds);
        Ok(())
    }

    fn write_frame(&mut self, frame: FrameHandle) -> Result<(), FrameSinkError> {
        if self.bounds.is_none() {
            return Err(FrameSinkError::MissingBounds(frame.index));
        }
        self.frames.push(frame);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), FrameSinkError> {
        self.is_finished = true;
        Ok(())
    }
}
