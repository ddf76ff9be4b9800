//! Log initialisation.

use earshot_core::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured log level.
pub const LOG_ENV_VAR: &str = "EARSHOT_LOG";

/// Build the filter: `EARSHOT_LOG` when set and valid, else the configured level.
#[must_use]
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global `fmt` subscriber.
///
/// Returns `false` if a subscriber was already installed; calling this more
/// than once is harmless.
pub fn init_logging(config: &LoggingConfig) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        let config = LoggingConfig::default();
        init_logging(&config);
        assert!(!init_logging(&config));
    }

    #[test]
    fn configured_level_applies_without_override() {
        let config = LoggingConfig {
            level: "debug".into(),
            ..LoggingConfig::default()
        };
        if std::env::var_os(LOG_ENV_VAR).is_none() {
            assert_eq!(env_filter(&config).to_string(), "debug");
        }
    }
}
