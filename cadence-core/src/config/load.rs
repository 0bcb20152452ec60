//! TOML loading

use super::{ConfigError, RoutineConfig};

/// Parse and validate a routine configuration
///
/// Keys that are absent keep their defaults.
pub fn parse_routine(text: &str) -> Result<RoutineConfig, ConfigError> {
    let config: RoutineConfig = toml::from_str(text).map_err(|_e| {
        warn!("routine config rejected by parser");
        ConfigError::Syntax
    })?;
    config.validate()?;
    info!(
        "routine config loaded: {} cycles, tick {} ms",
        config.mission.cycles.len(),
        config.timing.tick_interval_ms
    );
    Ok(config)
}
