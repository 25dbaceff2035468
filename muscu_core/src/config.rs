//! Configuration file support for muscu.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/muscu/config.toml`.

use crate::appender::MIN_CARDIO_DURATION;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Where the workbook lives
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Base name of the workbook, without extension
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            file_name: default_file_name(),
        }
    }
}

/// Pre-filled form values used when an exercise has no history
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DefaultsConfig {
    #[serde(default = "default_series")]
    pub series: u32,

    #[serde(default = "default_repetitions")]
    pub repetitions: u32,

    /// Category whose exercises start at `legs_repetitions`
    #[serde(default = "default_legs_category")]
    pub legs_category: String,

    #[serde(default = "default_legs_repetitions")]
    pub legs_repetitions: u32,

    /// Rest between series, in seconds
    #[serde(default = "default_rest")]
    pub rest: u32,

    /// Cardio duration in minutes offered when the exercise has no history
    #[serde(default = "default_cardio_duration")]
    pub cardio_duration: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            series: default_series(),
            repetitions: default_repetitions(),
            legs_category: default_legs_category(),
            legs_repetitions: default_legs_repetitions(),
            rest: default_rest(),
            cardio_duration: default_cardio_duration(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("muscu")
}

fn default_file_name() -> String {
    "musculation".into()
}

fn default_series() -> u32 {
    4
}

fn default_repetitions() -> u32 {
    10
}

fn default_legs_category() -> String {
    "Jambes".into()
}

fn default_legs_repetitions() -> u32 {
    20
}

fn default_rest() -> u32 {
    90
}

fn default_cardio_duration() -> f64 {
    5.0
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("muscu").join("config.toml")
    }

    /// Workbook used when no file is given on the command line
    pub fn default_workbook_path(&self) -> PathBuf {
        self.data
            .data_dir
            .join(format!("{}.{}", self.data.file_name, crate::workbook::DOCUMENT_EXTENSION))
    }

    /// Reject values the resolver cannot offer as form defaults
    pub fn validate(&self) -> Result<()> {
        let d = &self.defaults;
        if d.series == 0 || d.repetitions == 0 || d.legs_repetitions == 0 || d.rest == 0 {
            return Err(Error::Config(
                "series, repetitions and rest defaults must be at least 1".into(),
            ));
        }
        if !d.cardio_duration.is_finite() || d.cardio_duration < MIN_CARDIO_DURATION {
            return Err(Error::Config(format!(
                "cardio_duration must be at least {} minutes",
                MIN_CARDIO_DURATION
            )));
        }
        if self.data.file_name.trim().is_empty() {
            return Err(Error::Config("file_name must not be empty".into()));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.defaults.series, 4);
        assert_eq!(config.defaults.repetitions, 10);
        assert_eq!(config.defaults.legs_repetitions, 20);
        assert_eq!(config.defaults.legs_category, "Jambes");
        assert_eq!(config.defaults.rest, 90);
        assert_eq!(config.data.file_name, "musculation");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.defaults, parsed.defaults);
        assert_eq!(config.data.file_name, parsed.data.file_name);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[defaults]
rest = 120
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.defaults.rest, 120);
        assert_eq!(config.defaults.series, 4); // default
    }

    #[test]
    fn test_zero_default_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[defaults]\nseries = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_short_cardio_duration_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[defaults]\ncardio_duration = 3.0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("muscu").join("config.toml");

        let mut config = Config::default();
        config.data.file_name = "seances".into();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.data.file_name, "seances");
        assert!(loaded
            .default_workbook_path()
            .ends_with("seances.xlsx"));
    }
}
