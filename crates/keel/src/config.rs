//! Simulation settings, loaded from TOML (see `keel.toml`).

use keel_core::{EcsConfig, KeelError, KeelResult};
use serde::{Deserialize, Serialize};

/// Settings of one simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Storage growth and slow-system budget.
    pub ecs: EcsConfig,
    /// Entities spawned at start.
    pub entities: usize,
    /// Frames to run.
    pub frames: u64,
    /// Fixed updates per simulated second.
    pub tick_rate: u32,
    /// Half the side of the square arena.
    pub arena_half_extent: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ecs: EcsConfig::default(),
            entities: 1_000,
            frames: 300,
            tick_rate: 60,
            arena_half_extent: 500.0,
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`KeelError::ConfigParse`] for malformed TOML and
    /// [`KeelError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> KeelResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| KeelError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`KeelError::InvalidConfig`] naming the offending key.
    pub fn validate(&self) -> KeelResult<()> {
        self.ecs.validate()?;
        if self.tick_rate == 0 {
            return Err(KeelError::InvalidConfig("tick_rate must be greater than zero".into()));
        }
        if self.arena_half_extent.is_nan() || self.arena_half_extent <= 0.0 {
            return Err(KeelError::InvalidConfig(
                "arena_half_extent must be a positive number".into(),
            ));
        }
        Ok(())
    }

    /// Seconds per fixed update.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn step(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}
