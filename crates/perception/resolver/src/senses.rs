//! Sense resolution
//!
//! Picks the single best sense an observer can use against a source.
//! Tiers are searched precise first; the first tier with a qualifying
//! sense wins outright. Inside a tier the effective declaration order of
//! the profile decides (implicit sight, implicit hearing, then declared
//! senses as listed).

use crate::collaborators::GeometryFacts;
use perception_types::{Acuity, Sense, SenseProfile, SenseType};
use serde::{Deserialize, Serialize};

/// The sense selected for a pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenseMatch {
    pub sense_type: SenseType,
    pub acuity: Acuity,
}

impl SenseMatch {
    pub fn is_precise_sight(&self) -> bool {
        self.sense_type == SenseType::Sight && self.acuity == Acuity::Precise
    }
}

/// Selects the best available sense
#[derive(Clone, Copy, Debug)]
pub struct SenseResolver {
    default_hearing_range: f64,
}

impl SenseResolver {
    pub fn new(default_hearing_range: f64) -> Self {
        Self {
            default_hearing_range,
        }
    }

    /// Best sense for the given facts, or `None` when nothing qualifies.
    ///
    /// `None` is not an error: the caller falls back to ambient detection.
    pub fn resolve_best_sense(
        &self,
        profile: &SenseProfile,
        facts: &GeometryFacts,
    ) -> Option<SenseMatch> {
        let senses = profile.effective_senses(self.default_hearing_range);

        Acuity::TIERS.iter().find_map(|tier| {
            senses
                .iter()
                .filter(|sense| sense.acuity == *tier)
                .find(|sense| qualifies(sense, facts))
                .map(|sense| SenseMatch {
                    sense_type: sense.sense_type.clone(),
                    acuity: sense.acuity,
                })
        })
    }
}

fn qualifies(sense: &Sense, facts: &GeometryFacts) -> bool {
    let lit = !sense.requires_light || facts.light_adequate;

    match sense.sense_type {
        // Unbounded within the scene.
        SenseType::Sight => facts.has_line_of_sight && lit,
        SenseType::Unknown(_) => false,
        _ => sense.range > 0.0 && facts.distance <= sense.range && lit,
    }
}
