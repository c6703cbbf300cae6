//! Game configuration
//!
//! The only knob is the game timer: how many wall-clock minutes one full
//! replay lasts. It is read once at startup from a YAML file
//!
//! ```yaml
//! timer: 60
//! ```
//!
//! and may be overridden with the `REGATTA_TIMER` environment variable.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ReplayError, Result};

/// Environment variable overriding the configured timer.
pub const TIMER_ENV_VAR: &str = "REGATTA_TIMER";

/// Startup configuration for a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Total game duration in minutes
    pub timer: u64,
}

impl GameConfig {
    /// Create a validated configuration.
    pub fn new(timer_minutes: u64) -> Result<Self> {
        let config = Self { timer: timer_minutes };
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file, then apply environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ReplayError::file_error(path.to_path_buf(), e))?;
        debug!("Read game configuration from {}", path.display());
        Self::from_yaml_str(&text)?.with_env_overrides()
    }

    /// Parse from YAML text without consulting the environment.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: GameConfig = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `REGATTA_TIMER` if it is set.
    pub fn with_env_overrides(self) -> Result<Self> {
        match std::env::var(TIMER_ENV_VAR) {
            Ok(raw) => self.with_timer_override(&raw),
            Err(_) => Ok(self),
        }
    }

    fn with_timer_override(self, raw: &str) -> Result<Self> {
        let timer = raw.trim().parse::<u64>().map_err(|e| {
            ReplayError::invalid_configuration(format!("{TIMER_ENV_VAR}={raw:?} is not a number of minutes: {e}"))
        })?;
        debug!(timer, "Timer overridden from environment");
        Self::new(timer)
    }

    /// Timer as a wall-clock duration.
    pub fn game_duration(&self) -> Duration {
        Duration::from_secs(self.timer.saturating_mul(60))
    }

    fn validate(&self) -> Result<()> {
        if self.timer == 0 {
            return Err(ReplayError::invalid_configuration("timer must be greater than zero minutes"));
        }
        Ok(())
    }
}
