//! Client configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use biolink_core::{ServerAddr, SessionConfig};

/// Top-level configuration for the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Where the streaming server lives.
    pub network: NetworkConfig,
    /// Credentials.
    pub auth: AuthConfig,
    /// Connect retry policy.
    pub retry: RetryConfig,
    /// Terminal output.
    pub display: DisplayConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

/// Network settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Server IP as shown on the device's streaming screen.
    pub server_ip: String,
    pub server_port: u16,
    /// Per-attempt connect timeout in milliseconds; 0 disables it.
    pub connect_timeout_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub api_key: String,
}

/// Connect retry policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total connect attempts.
    pub max_attempts: u32,
    /// Pause between attempts, in seconds.
    pub delay_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Print every incoming message instead of the metric line.
    pub verbose: bool,
}

/// Logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level, used when `RUST_LOG` is unset.
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            server_ip: "127.0.0.1".into(),
            server_port: 38641,
            connect_timeout_ms: 5000,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: biolink_core::session::DEFAULT_MAX_ATTEMPTS,
            delay_secs: biolink_core::session::DEFAULT_RETRY_DELAY.as_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

/// How [`ClientConfig::load`] resolved the configuration.
///
/// Loading happens before tracing is set up (the log level lives in the
/// file), so the outcome is returned and logged by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from the file.
    File,
    /// No readable file; defaults in use.
    Missing,
    /// The file did not parse; defaults in use.
    Invalid(String),
}

impl ConfigSource {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::File)
    }

    pub fn describe(&self, path: &Path) -> String {
        match self {
            Self::File => format!("loaded config from {}", path.display()),
            Self::Missing => format!("no config at {}; using defaults", path.display()),
            Self::Invalid(e) => format!("invalid config {}: {e}; using defaults", path.display()),
        }
    }

    /// Emit [`describe`](Self::describe) at a level matching the outcome.
    pub fn log(&self, path: &Path) {
        match self {
            Self::Invalid(_) => tracing::warn!("{}", self.describe(path)),
            _ => tracing::info!("{}", self.describe(path)),
        }
    }
}

impl ClientConfig {
    /// Load from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> (Self, ConfigSource) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, ConfigSource::File),
                Err(e) => (Self::default(), ConfigSource::Invalid(e.to_string())),
            },
            Err(_) => (Self::default(), ConfigSource::Missing),
        }
    }

    pub fn server_addr(&self) -> ServerAddr {
        ServerAddr::new(self.network.server_ip.clone(), self.network.server_port)
    }

    /// `None` when `connect_timeout_ms` is 0.
    pub fn connect_timeout(&self) -> Option<Duration> {
        match self.network.connect_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Session parameters for the core controller.
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig::new(self.server_addr(), self.auth.api_key.clone())
            .with_max_attempts(self.retry.max_attempts)
            .with_retry_delay(Duration::from_secs(self.retry.delay_secs))
    }
}

// ── Tests ────────────────────────────────────────────────────────
