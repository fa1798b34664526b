//! # Configuration
//!
//! Growth policies for the entity table and component stores, plus the
//! dispatcher's slow-system budget. Loaded once at startup from TOML:
//!
//! ```toml
//! slow_system_micros = 2000
//!
//! [entity_table]
//! initial_capacity = 4096
//! grow_step = 256
//!
//! [component_stores]
//! initial_capacity = 1024
//! grow_step = 64
//! ```
//!
//! Every key is optional.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{KeelError, KeelResult};

/// Slots reserved up front.
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

/// Slots added each time a buffer is full.
pub const DEFAULT_GROW_STEP: usize = 64;

/// Fixed initial capacity plus fixed linear growth step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthPolicy {
    /// Slots allocated at creation.
    pub initial_capacity: usize,
    /// Slots added per growth. Must be non-zero.
    pub grow_step: usize,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            grow_step: DEFAULT_GROW_STEP,
        }
    }
}

impl GrowthPolicy {
    fn validate(&self, section: &str) -> KeelResult<()> {
        if self.grow_step == 0 {
            return Err(KeelError::InvalidConfig(format!(
                "{section}.grow_step must be greater than zero"
            )));
        }
        Ok(())
    }
}

/// ECS configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcsConfig {
    /// Growth of the entity table.
    pub entity_table: GrowthPolicy,
    /// Growth of every component store.
    pub component_stores: GrowthPolicy,
    /// Systems whose update takes longer than this are logged at `warn`.
    pub slow_system_micros: Option<u64>,
}

impl EcsConfig {
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
        self.entity_table.validate("entity_table")?;
        self.component_stores.validate("component_stores")?;
        Ok(())
    }

    /// The slow-system budget as a duration.
    #[must_use]
    pub fn slow_system_budget(&self) -> Option<Duration> {
        self.slow_system_micros.map(Duration::from_micros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EcsConfig::default();
        assert_eq!(config.entity_table.initial_capacity, 1024);
        assert_eq!(config.component_stores.grow_step, 64);
        assert!(config.slow_system_budget().is_none());
    }

    #[test]
    fn test_partial_document() {
        let config = EcsConfig::from_toml_str(
            r"
            slow_system_micros = 250

            [entity_table]
            grow_step = 8
            ",
        )
        .unwrap();

        assert_eq!(config.entity_table.initial_capacity, 1024);
        assert_eq!(config.entity_table.grow_step, 8);
        assert_eq!(config.component_stores, GrowthPolicy::default());
        assert_eq!(config.slow_system_budget(), Some(Duration::from_micros(250)));
    }

    #[test]
    fn test_zero_grow_step_rejected() {
        let err = EcsConfig::from_toml_str("[component_stores]\ngrow_step = 0\n").unwrap_err();
        assert_eq!(
            err,
            KeelError::InvalidConfig("component_stores.grow_step must be greater than zero".into())
        );
    }

    #[test]
    fn test_malformed_document() {
        let err = EcsConfig::from_toml_str("entity_table = 3").unwrap_err();
        assert!(matches!(err, KeelError::ConfigParse(_)));
    }
}
