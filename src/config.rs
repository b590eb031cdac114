use crate::settings::ConfigSettings;
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
pub(crate) struct Config {
    /// Initial contents of the settings screen
    #[serde(default)]
    pub(crate) settings: ConfigSettings,

    /// Where and how much to log
    #[serde(default)]
    pub(crate) logging: LogConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("gridsnake").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct LogConfig {
    /// Messages less severe than this are discarded
    pub(crate) level: LevelFilter,

    /// File to write log messages to
    pub(crate) file: Option<PathBuf>,
}

impl LogConfig {
    /// Return the file that log messages should be written to: the file given
    /// in the configuration or, if that is not set, a file in the local data
    /// directory.  Returns `None` if no file is configured and the data
    /// directory could not be determined.
    pub(crate) fn log_file(&self) -> Option<PathBuf> {
        self.file.clone().or_else(|| {
            dirs::data_local_dir().map(|p| p.join("gridsnake").join("gridsnake.log"))
        })
    }
}

impl Default for LogConfig {
    fn default() -> LogConfig {
        LogConfig {
            level: LevelFilter::Info,
            file: None,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FoodPlacement;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load_str(src: &str) -> Result<Config, ConfigError> {
        let mut file = match NamedTempFile::new() {
            Ok(file) => file,
            Err(e) => panic!("failed to create temporary file: {e}"),
        };
        if let Err(e) = file.write_all(src.as_bytes()) {
            panic!("failed to write temporary file: {e}");
        }
        Config::load(file.path(), false)
    }

    #[test]
    fn empty_file() {
        assert!(matches!(load_str(""), Ok(cfg) if cfg == Config::default()));
    }

    #[test]
    fn full_file() {
        let cfg = load_str(concat!(
            "[settings]\n",
            "window-width = 1000\n",
            "window-height = 700\n",
            "cell-size = 25\n",
            "initial-snake-length = 5\n",
            "food-count = 4\n",
            "tick-interval-ms = 80\n",
            "food-placement = \"avoid-food-only\"\n",
            "\n",
            "[logging]\n",
            "level = \"debug\"\n",
            "file = \"/tmp/gridsnake-test.log\"\n",
        ));
        let expected = Config {
            settings: ConfigSettings {
                window_width: 1000,
                window_height: 700,
                cell_size: 25,
                initial_snake_length: 5,
                food_count: 4,
                tick_interval_ms: 80,
                food_placement: FoodPlacement::AvoidFoodOnly,
            },
            logging: LogConfig {
                level: LevelFilter::Debug,
                file: Some(PathBuf::from("/tmp/gridsnake-test.log")),
            },
        };
        assert!(matches!(cfg, Ok(cfg) if cfg == expected));
    }

    #[test]
    fn partial_settings() {
        let cfg = load_str("[settings]\nfood-count = 3\n");
        let expected = Config {
            settings: ConfigSettings {
                food_count: 3,
                ..ConfigSettings::default()
            },
            ..Config::default()
        };
        assert!(matches!(cfg, Ok(cfg) if cfg == expected));
    }

    #[test]
    fn bad_value() {
        assert!(matches!(
            load_str("[settings]\nfood-placement = \"everywhere\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file() {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(e) => panic!("failed to create temporary directory: {e}"),
        };
        let path = dir.path().join("config.toml");
        assert!(matches!(Config::load(&path, true), Ok(cfg) if cfg == Config::default()));
        assert!(matches!(
            Config::load(&path, false),
            Err(ConfigError::Read(_))
        ));
    }

    #[test]
    fn configured_log_file() {
        let logging = LogConfig {
            file: Some(PathBuf::from("snake.log")),
            ..LogConfig::default()
        };
        assert_eq!(logging.log_file(), Some(PathBuf::from("snake.log")));
    }
}
