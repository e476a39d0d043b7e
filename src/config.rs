use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use plateplan_core::models::DEFAULT_WINDOW_DAYS;

const DEFAULT_CREATED_BY: &str = "default";

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding recipes.json and mealplan.json
    pub data_dir: ConfigValue<PathBuf>,
    /// Days kept on each side of today when a plan window is created
    pub window_days: ConfigValue<i64>,
    /// Name recorded on recipes created from this machine
    pub created_by: ConfigValue<String>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    window_days: Option<i64>,
    created_by: Option<String>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut window_days = ConfigValue::new(DEFAULT_WINDOW_DAYS, ConfigSource::Default);
        let mut created_by =
            ConfigValue::new(DEFAULT_CREATED_BY.to_string(), ConfigSource::Default);
        let mut config_file = None;

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(days) = file_config.window_days {
                window_days = ConfigValue::new(validate_window(days)?, ConfigSource::File);
            }
            if let Some(name) = file_config.created_by {
                created_by = ConfigValue::new(name, ConfigSource::File);
            }
        }

        if let Ok(dir) = std::env::var("PLATEPLAN_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(days) = std::env::var("PLATEPLAN_WINDOW_DAYS") {
            let parsed = days
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidValue("PLATEPLAN_WINDOW_DAYS".into(), days))?;
            window_days = ConfigValue::new(validate_window(parsed)?, ConfigSource::Environment);
        }
        if let Ok(name) = std::env::var("PLATEPLAN_CREATED_BY") {
            created_by = ConfigValue::new(name, ConfigSource::Environment);
        }

        Ok(Self {
            data_dir,
            window_days,
            created_by,
            config_file,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/plateplan/
    /// - macOS: ~/Library/Application Support/plateplan/
    /// - Windows: %APPDATA%/plateplan/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("plateplan")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/plateplan/
    /// - macOS: ~/Library/Application Support/plateplan/
    /// - Windows: %APPDATA%/plateplan/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("plateplan")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

fn validate_window(days: i64) -> Result<i64, ConfigError> {
    if (0..=366).contains(&days) {
        Ok(days)
    } else {
        Err(ConfigError::InvalidValue(
            "window_days".into(),
            days.to_string(),
        ))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(String, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(key, value) => {
                write!(
                    f,
                    "Invalid value '{}' for {}: expected a day count between 0 and 366",
                    value, key
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
