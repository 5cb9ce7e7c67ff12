//! Seek upgrade tables
//!
//! A successful seek moves the pre-resolved state up the certainty ladder.
//! Tables are total by construction (one entry per state) and validated to
//! be monotonic, with the critical table at least as strong as the plain
//! one for every input.

use crate::detection::DetectionState;
use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Output state for each input state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeTable {
    pub none: DetectionState,
    pub suspicious: DetectionState,
    // Layered config sources may fold keys to lowercase
    #[serde(alias = "lastknownarea")]
    pub last_known_area: DetectionState,
    pub hidden: DetectionState,
    pub observed: DetectionState,
}

impl UpgradeTable {
    /// Table that leaves every state unchanged
    pub fn identity() -> Self {
        Self {
            none: DetectionState::None,
            suspicious: DetectionState::Suspicious,
            last_known_area: DetectionState::LastKnownArea,
            hidden: DetectionState::Hidden,
            observed: DetectionState::Observed,
        }
    }

    pub fn upgrade(&self, state: DetectionState) -> DetectionState {
        match state {
            DetectionState::None => self.none,
            DetectionState::Suspicious => self.suspicious,
            DetectionState::LastKnownArea => self.last_known_area,
            DetectionState::Hidden => self.hidden,
            DetectionState::Observed => self.observed,
        }
    }

    /// Check that no entry lowers certainty
    pub fn validate(&self, table: &'static str) -> ConfigResult<()> {
        for from in DetectionState::ALL {
            let to = self.upgrade(from);
            if to < from {
                return Err(ConfigError::NonMonotonicUpgrade { table, from, to });
            }
        }
        Ok(())
    }
}

/// Plain and critical seek tables
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeekUpgradeTables {
    pub success: UpgradeTable,
    #[serde(alias = "criticalsuccess")]
    pub critical_success: UpgradeTable,
}

impl Default for SeekUpgradeTables {
    fn default() -> Self {
        Self {
            success: UpgradeTable {
                none: DetectionState::Suspicious,
                suspicious: DetectionState::LastKnownArea,
                last_known_area: DetectionState::Hidden,
                hidden: DetectionState::Hidden,
                observed: DetectionState::Observed,
            },
            critical_success: UpgradeTable {
                none: DetectionState::LastKnownArea,
                suspicious: DetectionState::Hidden,
                last_known_area: DetectionState::Observed,
                hidden: DetectionState::Observed,
                observed: DetectionState::Observed,
            },
        }
    }
}

impl SeekUpgradeTables {
    /// Pick the table for a success (`critical` selects the critical table)
    pub fn table(&self, critical: bool) -> &UpgradeTable {
        if critical {
            &self.critical_success
        } else {
            &self.success
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.success.validate("success")?;
        self.critical_success.validate("critical_success")?;

        for from in DetectionState::ALL {
            let plain = self.success.upgrade(from);
            let critical = self.critical_success.upgrade(from);
            if critical < plain {
                return Err(ConfigError::CriticalBelowSuccess {
                    from,
                    plain,
                    critical,
                });
            }
        }
        Ok(())
    }
}
