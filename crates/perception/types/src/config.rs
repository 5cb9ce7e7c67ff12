//! Perception configuration
//!
//! Everything here is supplied by the host. `validate()` is called when an
//! engine or store is built so that mistakes fail at startup, not per call.

use crate::errors::{ConfigError, ConfigResult};
use crate::policy::{check_radius, AmbientThresholds, PrivacyPolicy};
use crate::upgrade::SeekUpgradeTables;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerceptionConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub overrides: OverrideStoreConfig,
}

impl PerceptionConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.engine.validate()?;
        self.overrides.validate()?;
        Ok(())
    }
}

/// Detection engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub privacy: PrivacyPolicy,

    #[serde(default)]
    pub ambient: AmbientThresholds,

    #[serde(default)]
    pub seek_upgrades: SeekUpgradeTables,

    /// Range of implicit hearing
    #[serde(default = "default_hearing_range")]
    pub default_hearing_range: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            privacy: PrivacyPolicy::default(),
            ambient: AmbientThresholds::default(),
            seek_upgrades: SeekUpgradeTables::default(),
            default_hearing_range: default_hearing_range(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.ambient.validate()?;
        self.seek_upgrades.validate()?;
        check_radius("default_hearing_range", self.default_hearing_range)?;
        Ok(())
    }
}

/// Override store configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideStoreConfig {
    /// Age after which `cleanup` drops an override
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// Period of the background cleanup task
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

impl Default for OverrideStoreConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

impl OverrideStoreConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.ttl_secs == 0 {
            return Err(ConfigError::ZeroDuration { field: "ttl_secs" });
        }
        if self.cleanup_interval_secs == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "cleanup_interval_secs",
            });
        }
        Ok(())
    }
}

// Default value helpers
fn default_hearing_range() -> f64 {
    30.0
}

fn default_ttl() -> u64 {
    5 * 60
}

fn default_cleanup_interval() -> u64 {
    30
}
