//! Override records and layers

use chrono::{DateTime, Duration, Utc};
use perception_types::{DetectionState, RollId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an override came from, highest priority first.
///
/// Each layer models a different lifetime: a single roll, a single dialog
/// session, and ambient quick picks that persist until changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OverrideLayer {
    #[serde(rename = "roll")]
    Roll,
    #[serde(rename = "dialog")]
    Dialog,
    /// Quick-pick overrides, tagged `popup` on the wire
    #[serde(rename = "popup")]
    Ambient,
}

impl OverrideLayer {
    /// Lookup order
    pub const PRECEDENCE: [OverrideLayer; 3] = [
        OverrideLayer::Roll,
        OverrideLayer::Dialog,
        OverrideLayer::Ambient,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OverrideLayer::Roll => "roll",
            OverrideLayer::Dialog => "dialog",
            OverrideLayer::Ambient => "popup",
        }
    }
}

impl fmt::Display for OverrideLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A manually chosen detection state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    pub state: DetectionState,
    /// The computed or default state the human deviated from
    pub original_state: DetectionState,
    pub timestamp: DateTime<Utc>,
    pub source: OverrideLayer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_id: Option<RollId>,
}

impl Override {
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.timestamp
    }

    /// Strictly older than `ttl`
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age(now) > ttl
    }
}
