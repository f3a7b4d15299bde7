//! Configuration for the sqlgen binary
//!
//! Loads configuration from:
//! 1. config.yaml - decoder mode, evaluation paths, logging
//! 2. .env file - local overrides
//!
//! Environment variables always override config.yaml values.

use serde::{Deserialize, Serialize};
use sqlgen_decode::{ColumnMatch, DecodeOptions};
use sqlgen_eval::EvalOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Decoder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// SELECT column matching: "exact" or "substring"
    pub column_match: String,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            column_match: "exact".to_string(),
        }
    }
}

/// Evaluation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Test-set rows, JSON lines
    pub dataset: PathBuf,
    /// One predicted query per line
    pub predictions: PathBuf,
    /// WikiSQL tables dump, JSON lines
    pub tables: PathBuf,
    /// Where to write the report JSON, if anywhere
    pub report: Option<PathBuf>,
    pub ordered: bool,
    pub progress_every: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("./data/test.jsonl"),
            predictions: PathBuf::from("./data/predictions.txt"),
            tables: PathBuf::from("./data/test.tables.jsonl"),
            report: None,
            ordered: false,
            progress_every: 100,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or module-specific
    pub level: String,

    /// Output format: pretty, json, compact
    pub format: String,

    /// Output destination: stdout, file, both
    pub output: String,

    /// Directory for log files
    pub directory: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            output: "stdout".to_string(),
            directory: "./logs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub decoder: DecoderConfig,
    #[serde(default)]
    pub eval: EvalConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        message: format!("cannot parse '{}'", value),
    })
}

impl Config {
    /// Load configuration from YAML file with environment variable overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;
        config.apply_env()?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            return Self::load(path);
        }
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Config path from `SQLGEN_CONFIG`, else `./config.yaml`
    pub fn path_from_env() -> PathBuf {
        std::env::var("SQLGEN_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(mode) = std::env::var("SQLGEN_COLUMN_MATCH") {
            self.decoder.column_match = mode;
        }

        if let Ok(path) = std::env::var("SQLGEN_DATASET") {
            self.eval.dataset = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("SQLGEN_PREDICTIONS") {
            self.eval.predictions = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("SQLGEN_TABLES") {
            self.eval.tables = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("SQLGEN_REPORT") {
            self.eval.report = Some(PathBuf::from(path));
        }
        if let Ok(ordered) = std::env::var("SQLGEN_ORDERED") {
            self.eval.ordered = parse_env("SQLGEN_ORDERED", &ordered)?;
        }
        if let Ok(every) = std::env::var("SQLGEN_PROGRESS_EVERY") {
            self.eval.progress_every = parse_env("SQLGEN_PROGRESS_EVERY", &every)?;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(output) = std::env::var("LOG_OUTPUT") {
            self.logging.output = output;
        }
        if let Ok(dir) = std::env::var("LOG_DIR") {
            self.logging.directory = dir;
        }

        Ok(())
    }

    pub fn column_match(&self) -> Result<ColumnMatch, ConfigError> {
        self.decoder
            .column_match
            .parse()
            .map_err(|message| ConfigError::Invalid {
                key: "decoder.column_match",
                message,
            })
    }

    pub fn decode_options(&self) -> Result<DecodeOptions, ConfigError> {
        Ok(DecodeOptions {
            column_match: self.column_match()?,
        })
    }

    pub fn eval_options(&self) -> Result<EvalOptions, ConfigError> {
        Ok(EvalOptions {
            ordered: self.eval.ordered,
            progress_every: self.eval.progress_every,
            decode: self.decode_options()?,
        })
    }

    /// Set logging environment variables for the logging module
    pub fn apply_logging_env(&self) {
        std::env::set_var("RUST_LOG", &self.logging.level);
        std::env::set_var("LOG_FORMAT", &self.logging.format);
        std::env::set_var("LOG_OUTPUT", &self.logging.output);
        std::env::set_var("LOG_DIR", &self.logging.directory);
    }
}
