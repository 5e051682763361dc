use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::constants::{
    DEFAULT_FRAME_RATE, FRAME_FILE_EXTENSION, MANIFEST_FILE_NAME, SUMMARY_FILE_NAME,
};
use super::error::ConfigError;
use super::record_parser::InputVariant;

/// Structure representing the application configuration. Contains pathing and event selection
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub input_paths: Vec<PathBuf>,
    pub variant: InputVariant,
    pub output_path: PathBuf,
    pub skip_events: usize,
    pub max_events: Option<usize>,
    pub frame_rate: u32,
}

impl Default for Config {
    /// Generate a new Config object. Paths will be empty/invalid
    fn default() -> Self {
        Self {
            input_paths: vec![PathBuf::from("None")],
            variant: InputVariant::default(),
            output_path: PathBuf::from("None"),
            skip_events: 0,
            max_events: None,
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Write the configuration to a YAML file
    pub fn write_config_file(&self, config_path: &Path) -> Result<(), ConfigError> {
        let yaml_str = serde_yaml::to_string(self)?;
        std::fs::write(config_path, yaml_str)?;
        Ok(())
    }

    /// Check that at least one input is given and every input exists
    pub fn check_input_files(&self) -> Result<(), ConfigError> {
        if self.input_paths.is_empty() {
            return Err(ConfigError::NoInputFiles);
        }
        match self.input_paths.iter().find(|path| !path.exists()) {
            Some(missing) => Err(ConfigError::BadFilePath(missing.clone())),
            None => Ok(()),
        }
    }

    /// Get the directory frames of one input are written to: `<output_path>/<input file stem>`
    ///
    /// The output path itself must already exist.
    pub fn get_frame_directory(&self, input_path: &Path) -> Result<PathBuf, ConfigError> {
        if !self.output_path.exists() {
            return Err(ConfigError::BadFilePath(self.output_path.clone()));
        }
        let stem = input_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| String::from("frames"));
        Ok(self.output_path.join(stem))
    }

    /// Is an event at this position of the stream selected for processing
    pub fn is_event_selected(&self, position: usize) -> bool {
        if position < self.skip_events {
            return false;
        }
        match self.max_events {
            Some(max) => position - self.skip_events < max,
            None => true,
        }
    }

    /// Have all selected events already been seen
    pub fn is_selection_done(&self, position: usize) -> bool {
        if position < self.skip_events {
            return false;
        }
        match self.max_events {
            Some(max) => position - self.skip_events >= max,
            None => false,
        }
    }
}

/// File name of a frame, zero padded by sequence index
pub fn get_frame_file_name(index: usize) -> String {
    format!("{index:0>4}.{FRAME_FILE_EXTENSION}")
}

pub fn get_manifest_path(frame_dir: &Path) -> PathBuf {
    frame_dir.join(MANIFEST_FILE_NAME)
}

pub fn get_summary_path(frame_dir: &Path) -> PathBuf {
    frame_dir.join(SUMMARY_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        let config = Config {
            input_paths: vec![PathBuf::from("run_0001.dat"), PathBuf::from("run_0002.dat")],
            variant: InputVariant::Static,
            output_path: PathBuf::from("out"),
            skip_events: 2,
            max_events: Some(10),
            frame_rate: 25,
        };
        config.write_config_file(&path).unwrap();
        assert_eq!(Config::read_config_file(&path).unwrap(), config);
    }

    #[test]
    fn test_parse_yaml_variant() {
        let yaml = concat!(
            "input_paths:\n- a.dat\n- b.dat\nvariant: static\noutput_path: out\n",
            "skip_events: 0\nmax_events: null\nframe_rate: 10\n",
        );
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.variant, InputVariant::Static);
        assert_eq!(config.max_events, None);
        assert_eq!(config.input_paths.len(), 2);
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::read_config_file(Path::new("/definitely/not/here.yml"));
        assert!(matches!(result, Err(ConfigError::BadFilePath(_))));
    }

    #[test]
    fn test_event_selection() {
        let config = Config {
            skip_events: 2,
            max_events: Some(3),
            ..Default::default()
        };
        let selected: Vec<usize> = (0..10).filter(|p| config.is_event_selected(*p)).collect();
        assert_eq!(selected, vec![2, 3, 4]);
        assert!(!config.is_selection_done(4));
        assert!(config.is_selection_done(5));

        let skip_only = Config {
            skip_events: 3,
            ..Default::default()
        };
        assert!(!skip_only.is_event_selected(2));
        assert!(skip_only.is_event_selected(3));
        assert!(!skip_only.is_selection_done(usize::MAX));

        let all = Config::default();
        assert!((0..10).all(|p| all.is_event_selected(p)));
        assert!(!all.is_selection_done(1000));
    }

    #[test]
    fn test_unbounded_max_events() {
        let config = Config {
            skip_events: 1,
            max_events: Some(usize::MAX),
            ..Default::default()
        };
        assert!(!config.is_event_selected(0));
        assert!(config.is_event_selected(5));
        assert!(!config.is_selection_done(5));
        assert!(!config.is_selection_done(usize::MAX));

        let huge_skip = Config {
            skip_events: usize::MAX,
            max_events: Some(usize::MAX),
            ..Default::default()
        };
        assert!(!huge_skip.is_event_selected(10));
        assert!(!huge_skip.is_selection_done(10));
    }

    #[test]
    fn test_input_files_checked() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("a.dat");
        std::fs::write(&present, "1 1\n1\n").unwrap();
        let missing = dir.path().join("b.dat");

        let config = Config {
            input_paths: vec![present.clone(), missing.clone()],
            ..Default::default()
        };
        match config.check_input_files() {
            Err(ConfigError::BadFilePath(path)) => assert_eq!(path, missing),
            other => panic!("Expected a missing input, got {other:?}"),
        }

        let empty = Config {
            input_paths: vec![],
            ..Default::default()
        };
        assert!(matches!(
            empty.check_input_files(),
            Err(ConfigError::NoInputFiles)
        ));

        let good = Config {
            input_paths: vec![present],
            ..Default::default()
        };
        assert!(good.check_input_files().is_ok());
    }

    #[test]
    fn test_frame_file_names() {
        assert_eq!(get_frame_file_name(0), "0000.dat");
        assert_eq!(get_frame_file_name(42), "0042.dat");
    }

    #[test]
    fn test_frame_directory_uses_input_stem() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            output_path: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert_eq!(
            config
                .get_frame_directory(Path::new("/data/run_0007.dat"))
                .unwrap(),
            dir.path().join("run_0007")
        );
    }
}
