//! Logger installation for binaries embedding the crate.

use crate::errors::VelixaError;
use env_logger::{Builder, Env};

pub const LOGGER_ALREADY_SET: &str = "VELIXA_LOGGER_ALREADY_SET";

/// Installs `env_logger` at `level`. `RUST_LOG` wins when set.
///
/// Fails if a global logger is already installed.
pub fn init_logging(level: &str) -> Result<(), VelixaError> {
    Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .try_init()
        .map_err(|err| VelixaError::config(LOGGER_ALREADY_SET, err.to_string()))?;
    log::debug!("Logging initialised at {}", level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_config_error() {
        // Either this call or an earlier test installed the logger.
        let _ = init_logging("debug");
        match init_logging("info") {
            Err(VelixaError::Config { code, .. }) => assert_eq!(code, LOGGER_ALREADY_SET),
            other => panic!("Expected config error, got {:?}", other),
        }
    }
}
