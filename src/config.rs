use crate::error::{ExtractError, Result};
use crate::format::ts::{MAX_PID, TS_PACKET_SIZE};
use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// PID carrying the embedded container in the streams this crate targets.
pub const DEFAULT_TARGET_PID: u16 = 6530;

/// Packets read from the source per batch.
pub const DEFAULT_BATCH_PACKETS: usize = 20;

/// Batches between two progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 20;

/// Exclusive upper bound for a declared filename length.
pub const DEFAULT_MAX_FILENAME_LEN: u64 = u8::MAX as u64;

/// Upper bound of the staging buffer used for file bytes.
pub const DEFAULT_WRITE_BUFFER_SIZE: usize = 64 * 1024;

const CONFIG_PATHS: [&str; 2] = ["./tsextract.toml", "./config.toml"];

const CONFIG_TEMPLATE: &str = include_str!("config.template.toml");

lazy_static! {
    static ref CONFIG: RwLock<Config> = RwLock::new(Config::load());
}

/// Extraction settings.
///
/// All fields have defaults, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// PID of the elementary stream carrying the container
    pub target_pid: u16,
    /// Transport packets read per batch
    pub batch_packets: usize,
    /// Progress is reported every `progress_interval` batches
    pub progress_interval: usize,
    /// Declared filename lengths must be strictly below this value
    pub max_filename_len: u64,
    /// Bound of the in-memory staging buffer for file bytes
    pub write_buffer_size: usize,
    /// Skip packets whose transport error indicator is set
    pub skip_transport_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_pid: DEFAULT_TARGET_PID,
            batch_packets: DEFAULT_BATCH_PACKETS,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            max_filename_len: DEFAULT_MAX_FILENAME_LEN,
            write_buffer_size: DEFAULT_WRITE_BUFFER_SIZE,
            skip_transport_errors: true,
        }
    }
}

impl Config {
    /// Builds a config from defaults, the first config file found and
    /// `TSEXTRACT_*` environment variables, in that order of precedence.
    ///
    /// Unreadable files and malformed values are logged and ignored.
    pub fn load() -> Self {
        let mut config = Config::default();

        for path in &CONFIG_PATHS {
            if !Path::new(path).is_file() {
                continue;
            }
            match Config::from_file(path) {
                Ok(file_config) => {
                    config = file_config;
                    break;
                }
                Err(e) => log::warn!("ignoring config file {}: {}", path, e),
            }
        }

        config.apply_env();
        config
    }

    /// Parses a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Config::from_toml_str(&content)
    }

    /// Parses TOML text and validates the result.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| ExtractError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable by the extractor and feeder.
    pub fn validate(&self) -> Result<()> {
        if self.target_pid > MAX_PID {
            return Err(ExtractError::Config(format!(
                "target_pid {:#x} does not fit in 13 bits",
                self.target_pid
            )));
        }
        if self.batch_packets == 0 {
            return Err(ExtractError::Config("batch_packets must be positive".into()));
        }
        if self.progress_interval == 0 {
            return Err(ExtractError::Config(
                "progress_interval must be positive".into(),
            ));
        }
        if self.max_filename_len == 0 {
            return Err(ExtractError::Config(
                "max_filename_len must be positive".into(),
            ));
        }
        if self.write_buffer_size < TS_PACKET_SIZE {
            return Err(ExtractError::Config(format!(
                "write_buffer_size must be at least {} bytes",
                TS_PACKET_SIZE
            )));
        }
        Ok(())
    }

    fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Applies `TSEXTRACT_*` overrides one key at a time. A value that does
    /// not parse or fails validation is logged and the previous value kept.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = self;
        macro_rules! override_key {
            ($key:literal, $field:ident) => {
                if let Some(raw) = lookup($key) {
                    let mut candidate = config.clone();
                    match raw.trim().parse() {
                        Ok(value) => {
                            candidate.$field = value;
                            match candidate.validate() {
                                Ok(()) => *config = candidate,
                                Err(e) => log::warn!("ignoring {}={:?}: {}", $key, raw, e),
                            }
                        }
                        Err(_) => log::warn!("ignoring {}={:?}: not a valid value", $key, raw),
                    }
                }
            };
        }

        override_key!("TSEXTRACT_TARGET_PID", target_pid);
        override_key!("TSEXTRACT_BATCH_PACKETS", batch_packets);
        override_key!("TSEXTRACT_PROGRESS_INTERVAL", progress_interval);
        override_key!("TSEXTRACT_MAX_FILENAME_LEN", max_filename_len);
        override_key!("TSEXTRACT_WRITE_BUFFER_SIZE", write_buffer_size);
        override_key!("TSEXTRACT_SKIP_TRANSPORT_ERRORS", skip_transport_errors);
    }

    /// Returns a copy of the process-wide configuration.
    pub fn global() -> Config {
        CONFIG.read().clone()
    }

    /// Re-reads config files and environment into the process-wide copy.
    pub fn reload() {
        let new_config = Config::load();
        *CONFIG.write() = new_config;
    }
}

/// Writes a commented config template unless the file already exists.
pub fn create_default_config_template<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
    if !path.as_ref().exists() {
        std::fs::write(path, CONFIG_TEMPLATE)?;
    }
    Ok(())
}
