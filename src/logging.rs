//! Logging set-up using `tracing` and `tracing-subscriber`.
//!
//! Logs go to stderr so that image bytes written to stdout stay intact.
//! `RUST_LOG` takes precedence over the verbosity flag when set.

use anyhow::{anyhow, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Map a `-v` count to a level: 0 = warn, 1 = info, 2 = debug, 3+ = trace.
pub fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Build the filter: `RUST_LOG` if present, otherwise this crate at `level`.
pub fn build_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,alcodash={}", level)))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(verbosity: u8) -> Result<()> {
    let level = level_from_verbosity(verbosity);
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_verbosity() {
        assert_eq!(level_from_verbosity(0), Level::WARN);
        assert_eq!(level_from_verbosity(1), Level::INFO);
        assert_eq!(level_from_verbosity(2), Level::DEBUG);
        assert_eq!(level_from_verbosity(9), Level::TRACE);
    }
}
