//! Driver logging.
//!
//! Events are emitted with `tracing` under the `ignite_odbc_rs` target. The
//! first connection installs a `tracing-subscriber` registry; later
//! connections leave it untouched.
//!
//! Filter priority:
//!
//! 1. `LOG_LEVEL` connection string key
//! 2. `RUST_LOG` environment variable
//! 3. `warn`
//!
//! `LOG_FILE` appends to a file instead of writing to stderr.

use std::fs::OpenOptions;
use std::sync::OnceLock;

use tracing_subscriber::{
    fmt::{self, time::SystemTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const TARGET: &str = "ignite_odbc_rs";

static LOGGING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Logging options taken from the connection string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub level: Option<String>,
    /// Log file path; stderr when unset.
    pub file: Option<String>,
}

impl LogConfig {
    /// Whether logging is switched off explicitly.
    pub fn is_off(&self) -> bool {
        self.level
            .as_deref()
            .is_some_and(|level| level.eq_ignore_ascii_case("off"))
    }

    fn filter(&self) -> EnvFilter {
        match &self.level {
            Some(level) => EnvFilter::new(format!("{}={}", TARGET, level.to_lowercase())),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{}=warn", TARGET))),
        }
    }
}

/// Install the global subscriber. Only the first call has any effect.
pub fn init_logging(config: &LogConfig) {
    LOGGING_INITIALIZED.get_or_init(|| {
        if config.is_off() {
            return;
        }
        let registry = tracing_subscriber::registry().with(config.filter());

        match &config.file {
            Some(path) => {
                let file = match OpenOptions::new().create(true).append(true).open(path) {
                    Ok(file) => file,
                    Err(e) => {
                        eprintln!("ignite-odbc: cannot open log file {}: {}", path, e);
                        return;
                    }
                };
                registry
                    .with(
                        fmt::layer()
                            .with_writer(file)
                            .with_ansi(false)
                            .with_timer(SystemTime),
                    )
                    .try_init()
                    .ok();
            }
            None => {
                registry
                    .with(
                        fmt::layer()
                            .with_writer(std::io::stderr)
                            .with_timer(SystemTime),
                    )
                    .try_init()
                    .ok();
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_off() {
        assert!(!LogConfig::default().is_off());
        let config = LogConfig {
            level: Some("OFF".to_string()),
            file: None,
        };
        assert!(config.is_off());
    }

    #[test]
    fn test_explicit_level_filter() {
        let config = LogConfig {
            level: Some("DEBUG".to_string()),
            file: None,
        };
        assert_eq!(config.filter().to_string(), "ignite_odbc_rs=debug");
    }

    #[test]
    fn test_init_is_idempotent() {
        let config = LogConfig {
            level: Some("off".to_string()),
            file: None,
        };
        init_logging(&config);
        init_logging(&LogConfig::default());
        assert!(LOGGING_INITIALIZED.get().is_some());
    }
}
