//! Logging configuration and initialization.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FORMATS: [&str; 2] = ["pretty", "json"];

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Filter directive after applying `-v`/`-q` from the command line.
    pub fn effective_level(&self, verbose: u8, quiet: bool) -> &str {
        match (quiet, verbose) {
            (true, _) => "error",
            (false, 0) => &self.level,
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }

    /// Initialize the tracing subscriber. Logs go to stderr; `RUST_LOG` wins.
    pub fn init(&self, verbose: u8, quiet: bool) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.effective_level(verbose, quiet)));

        // A subscriber may already be installed (tests); keep the first one.
        let _ = match self.format.as_str() {
            "json" => fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init(),
            _ => fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init(),
        };
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "pretty".into(),
        }
    }
}
