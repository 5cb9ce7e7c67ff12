//! Detection states and results

use crate::sense::{Acuity, SenseType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How certain an observer is about a source.
///
/// Variant order is the certainty order, so `Ord` compares by rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DetectionState {
    None,
    Suspicious,
    LastKnownArea,
    Hidden,
    Observed,
}

impl DetectionState {
    pub const ALL: [DetectionState; 5] = [
        DetectionState::None,
        DetectionState::Suspicious,
        DetectionState::LastKnownArea,
        DetectionState::Hidden,
        DetectionState::Observed,
    ];

    /// Position on the certainty ladder, 0 for `None`
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionState::None => "none",
            DetectionState::Suspicious => "suspicious",
            DetectionState::LastKnownArea => "lastKnownArea",
            DetectionState::Hidden => "hidden",
            DetectionState::Observed => "observed",
        }
    }
}

impl fmt::Display for DetectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a detection happened. Serialized as its tag, e.g. `hearing-sense`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DetectionReason {
    LineOfSight,
    Sense(SenseType),
    Noise,
    Communication,
    /// Found by a successful seek with no prior detection
    Seek,
}

impl DetectionReason {
    pub fn tag(&self) -> String {
        match self {
            DetectionReason::LineOfSight => "line-of-sight".to_string(),
            DetectionReason::Sense(sense) => format!("{}-sense", sense.name()),
            DetectionReason::Noise => "noise".to_string(),
            DetectionReason::Communication => "communication".to_string(),
            DetectionReason::Seek => "seek".to_string(),
        }
    }
}

impl TryFrom<String> for DetectionReason {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "line-of-sight" => Ok(DetectionReason::LineOfSight),
            "noise" => Ok(DetectionReason::Noise),
            "communication" => Ok(DetectionReason::Communication),
            "seek" => Ok(DetectionReason::Seek),
            other => match other.strip_suffix("-sense") {
                Some(name) if !name.is_empty() => {
                    Ok(DetectionReason::Sense(SenseType::from(name.to_string())))
                }
                _ => Err(format!("unrecognized detection reason: {other}")),
            },
        }
    }
}

impl From<DetectionReason> for String {
    fn from(value: DetectionReason) -> Self {
        value.tag()
    }
}

impl fmt::Display for DetectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

/// Outcome of resolving one observer→source pair.
///
/// Built once per observer per triggering event and never mutated;
/// a fresh computation or an override supersedes it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub state: DetectionState,
    pub reason: Option<DetectionReason>,
    pub exact_position: bool,
    /// Uncertainty radius in world units, 0 when the position is exact
    pub fuzzy_radius: u32,
    pub sense_type: Option<SenseType>,
    pub acuity: Option<Acuity>,
}

impl DetectionResult {
    /// No detection
    pub fn none() -> Self {
        Self {
            state: DetectionState::None,
            reason: None,
            exact_position: false,
            fuzzy_radius: 0,
            sense_type: None,
            acuity: None,
        }
    }

    /// An observed result with an exact position
    pub fn exact(reason: DetectionReason, sense: Option<(SenseType, Acuity)>) -> Self {
        let (sense_type, acuity) = split(sense);
        Self {
            state: DetectionState::Observed,
            reason: Some(reason),
            exact_position: true,
            fuzzy_radius: 0,
            sense_type,
            acuity,
        }
    }

    /// A result that only reveals an area around the source
    pub fn approximate(
        state: DetectionState,
        reason: DetectionReason,
        fuzzy_radius: u32,
        sense: Option<(SenseType, Acuity)>,
    ) -> Self {
        let (sense_type, acuity) = split(sense);
        Self {
            state,
            reason: Some(reason),
            exact_position: false,
            fuzzy_radius,
            sense_type,
            acuity,
        }
    }

    /// Whether a sink should receive this result
    pub fn is_detected(&self) -> bool {
        self.state != DetectionState::None
    }

    /// The sense and acuity behind this result, if any
    pub fn sense(&self) -> Option<(SenseType, Acuity)> {
        match (&self.sense_type, self.acuity) {
            (Some(sense_type), Some(acuity)) => Some((sense_type.clone(), acuity)),
            _ => None,
        }
    }
}

fn split(sense: Option<(SenseType, Acuity)>) -> (Option<SenseType>, Option<Acuity>) {
    match sense {
        Some((sense_type, acuity)) => (Some(sense_type), Some(acuity)),
        None => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_order() {
        assert!(DetectionState::None < DetectionState::Suspicious);
        assert!(DetectionState::Suspicious < DetectionState::LastKnownArea);
        assert!(DetectionState::LastKnownArea < DetectionState::Hidden);
        assert!(DetectionState::Hidden < DetectionState::Observed);
        assert_eq!(DetectionState::Observed.rank(), 4);
    }

    #[test]
    fn test_state_wire_names() {
        let json = serde_json::to_string(&DetectionState::LastKnownArea).unwrap();
        assert_eq!(json, "\"lastKnownArea\"");
    }

    #[test]
    fn test_reason_tags() {
        assert_eq!(
            DetectionReason::Sense(SenseType::Hearing).tag(),
            "hearing-sense"
        );
        assert_eq!(DetectionReason::LineOfSight.tag(), "line-of-sight");

        let parsed = DetectionReason::try_from("vibration-sense".to_string()).unwrap();
        assert_eq!(parsed, DetectionReason::Sense(SenseType::Vibration));
        assert!(DetectionReason::try_from("-sense".to_string()).is_err());
    }

    #[test]
    fn test_exact_has_zero_radius() {
        let result = DetectionResult::exact(DetectionReason::LineOfSight, None);
        assert!(result.exact_position);
        assert_eq!(result.fuzzy_radius, 0);
        assert!(result.is_detected());
        assert!(!DetectionResult::none().is_detected());
    }
}
