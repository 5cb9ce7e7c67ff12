//! Triggering actions

use serde::{Deserialize, Serialize};

/// The action that caused a detection pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerAction {
    /// Ambient update: movement, turn change, token refresh
    #[default]
    Passive,
    Hide,
    Sneak,
    CreateDiversion,
    /// An observer deliberately searching
    Seek,
    /// Anything that breaks stealth outright
    Attack,
}

impl TriggerAction {
    /// Deliberate actions lift the privacy policy's passive-awareness gate
    pub fn is_deliberate(&self) -> bool {
        matches!(self, TriggerAction::Seek | TriggerAction::Attack)
    }
}

/// Degree of success of a check
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckOutcome {
    CriticalSuccess,
    Success,
    Failure,
    CriticalFailure,
}

/// Action and, when a check was rolled, its outcome
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionContext {
    pub action: TriggerAction,

    #[serde(default)]
    pub outcome: Option<CheckOutcome>,
}

impl ActionContext {
    pub fn passive() -> Self {
        Self::default()
    }

    pub fn new(action: TriggerAction) -> Self {
        Self {
            action,
            outcome: None,
        }
    }

    pub fn seek(outcome: CheckOutcome) -> Self {
        Self {
            action: TriggerAction::Seek,
            outcome: Some(outcome),
        }
    }

    /// The seek outcome, when this is a successful seek.
    ///
    /// Returns `Some(true)` for a critical success, `Some(false)` for a
    /// plain success and `None` for everything else.
    pub fn seek_success(&self) -> Option<bool> {
        match (self.action, self.outcome) {
            (TriggerAction::Seek, Some(CheckOutcome::CriticalSuccess)) => Some(true),
            (TriggerAction::Seek, Some(CheckOutcome::Success)) => Some(false),
            _ => None,
        }
    }
}
