use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the YAML configuration file.
pub const CONFIG_ENV: &str = "WEBSERVER_CONFIG";

/// Configuration file read when `WEBSERVER_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "webserver.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {source}")]
    Parse {
        #[from]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {reason}")]
    Invalid { reason: String },
}

/// Server settings, immutable once loaded.
///
/// Every field may be omitted from the YAML file; omitted fields fall back
/// to the defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interface to listen on
    pub host: String,
    /// TCP port to listen on
    pub port: u16,
    /// Directory beneath which every request path is resolved
    pub document_root: PathBuf,
    /// Serve an HTML listing when a request resolves to a directory
    pub directory_listing: bool,
    /// Number of connection workers
    pub workers: usize,
    /// Chunk size used when streaming file bodies
    pub file_buffer_size: usize,
    /// How long to wait for the request line
    pub line_read_timeout_ms: u64,
    /// How long to wait for the header block
    pub header_read_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9090,
            document_root: PathBuf::from("wwwdocs/"),
            directory_listing: true,
            workers: 10,
            file_buffer_size: 64 * 1024,
            line_read_timeout_ms: 5000,
            header_read_timeout_ms: 2000,
        }
    }
}

impl Config {
    /// Loads the configuration file named by `WEBSERVER_CONFIG`, or
    /// `webserver.yaml` when the variable is unset.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(path)
    }

    /// Loads and validates a YAML file. A missing file yields the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let config = match std::fs::read_to_string(path) {
            Ok(text) => {
                tracing::info!(path = %path.display(), "Config file found");
                Self::from_yaml_str(&text)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        config.validate()?;

        tracing::debug!(
            address = %config.address(),
            document_root = %config.document_root.display(),
            directory_listing = config.directory_listing,
            workers = config.workers,
            file_buffer_size = config.file_buffer_size,
            line_read_timeout_ms = config.line_read_timeout_ms,
            header_read_timeout_ms = config.header_read_timeout_ms,
            "Config loaded"
        );

        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(invalid("port must be > 0"));
        }
        if self.workers == 0 {
            return Err(invalid("workers must be >= 1"));
        }
        if self.file_buffer_size == 0 {
            return Err(invalid("file_buffer_size must be > 0"));
        }
        Ok(())
    }

    /// `host:port`, ready for binding.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn line_read_timeout(&self) -> Duration {
        Duration::from_millis(self.line_read_timeout_ms)
    }

    pub fn header_read_timeout(&self) -> Duration {
        Duration::from_millis(self.header_read_timeout_ms)
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_string(),
    }
}
