//! Privacy policy and ambient detection thresholds

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// How much positional precision perception may reveal.
///
/// Each level fixes two switches: `reveal_exact` lets a precise detection
/// expose the exact position, `require_action` suppresses passive awareness
/// that does not come from a deliberate action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyPolicy {
    /// Exact positions, passive awareness allowed
    Transparent,
    /// Exact positions, passive awareness needs an action
    #[default]
    Standard,
    /// Areas only, passive awareness allowed
    Obscured,
    /// Areas only, passive awareness needs an action
    Strict,
}

impl PrivacyPolicy {
    pub fn reveal_exact(&self) -> bool {
        matches!(self, PrivacyPolicy::Transparent | PrivacyPolicy::Standard)
    }

    pub fn require_action(&self) -> bool {
        matches!(self, PrivacyPolicy::Standard | PrivacyPolicy::Strict)
    }
}

/// Distances within which a source is noticed without any sense
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AmbientThresholds {
    /// Movement noise carries this far
    pub noise_radius: f64,

    /// Speech and signals carry this far
    pub communication_radius: f64,
}

impl Default for AmbientThresholds {
    fn default() -> Self {
        Self {
            noise_radius: 30.0,
            communication_radius: 60.0,
        }
    }
}

impl AmbientThresholds {
    pub fn validate(&self) -> ConfigResult<()> {
        check_radius("noise_radius", self.noise_radius)?;
        check_radius("communication_radius", self.communication_radius)?;
        Ok(())
    }
}

pub(crate) fn check_radius(field: &'static str, value: f64) -> ConfigResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidRadius { field, value });
    }
    Ok(())
}
