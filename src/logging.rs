//! Diagnostic logging
//!
//! Allocator activity is reported through `tracing` on stderr so that stdout
//! carries nothing but narration. Nothing is read from the environment.

use tracing::level_filters::LevelFilter;

use crate::config::{OutputMode, RunConfig};

/// Level implied by the configuration
pub fn level_for(config: &RunConfig) -> LevelFilter {
    match (config.mode, config.verbose) {
        // stderr would tear the alternate screen
        (OutputMode::Tui, _) => LevelFilter::OFF,
        (OutputMode::Plain, true) => LevelFilter::DEBUG,
        (OutputMode::Plain, false) => LevelFilter::WARN,
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(
    config: &RunConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_max_level(level_for(config))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        let mut config = RunConfig::default();
        assert_eq!(level_for(&config), LevelFilter::WARN);
        config.verbose = true;
        assert_eq!(level_for(&config), LevelFilter::DEBUG);
        config.mode = OutputMode::Tui;
        assert_eq!(level_for(&config), LevelFilter::OFF);
    }
}
