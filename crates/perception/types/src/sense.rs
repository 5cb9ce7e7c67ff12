//! Senses and sense profiles
//!
//! A profile is an ordered list of senses plus the blinded/deafened
//! conditions. Sight and hearing exist implicitly unless suppressed by a
//! condition; every other sense must be declared with a positive range.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Precision tier of a sense
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Acuity {
    /// Pinpoints the exact position
    Precise,
    /// General area only
    Imprecise,
    /// Mere presence
    Vague,
}

impl Acuity {
    /// Evaluation order, most precise first
    pub const TIERS: [Acuity; 3] = [Acuity::Precise, Acuity::Imprecise, Acuity::Vague];

    pub fn as_str(&self) -> &'static str {
        match self {
            Acuity::Precise => "precise",
            Acuity::Imprecise => "imprecise",
            Acuity::Vague => "vague",
        }
    }
}

impl fmt::Display for Acuity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of sense.
///
/// Names outside the known set deserialize to [`SenseType::Unknown`] so that
/// extended profiles still load; unknown senses never qualify during
/// resolution.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SenseType {
    Sight,
    Hearing,
    Vibration,
    Heat,
    Life,
    Scent,
    Echolocation,
    Unknown(String),
}

impl SenseType {
    pub fn name(&self) -> &str {
        match self {
            SenseType::Sight => "sight",
            SenseType::Hearing => "hearing",
            SenseType::Vibration => "vibration",
            SenseType::Heat => "heat",
            SenseType::Life => "life",
            SenseType::Scent => "scent",
            SenseType::Echolocation => "echolocation",
            SenseType::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, SenseType::Unknown(_))
    }
}

impl From<String> for SenseType {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "sight" | "vision" => SenseType::Sight,
            "hearing" => SenseType::Hearing,
            "vibration" | "tremorsense" => SenseType::Vibration,
            "heat" => SenseType::Heat,
            "life" | "lifesense" => SenseType::Life,
            "scent" => SenseType::Scent,
            "echolocation" => SenseType::Echolocation,
            _ => SenseType::Unknown(value),
        }
    }
}

impl From<SenseType> for String {
    fn from(value: SenseType) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for SenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One sense entry in a profile
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sense {
    pub sense_type: SenseType,
    pub acuity: Acuity,

    /// Range in world units. Ignored for sight.
    #[serde(default)]
    pub range: f64,

    #[serde(default)]
    pub requires_light: bool,
}

impl Sense {
    pub fn new(sense_type: SenseType, acuity: Acuity, range: f64) -> Self {
        Self {
            sense_type,
            acuity,
            range,
            requires_light: false,
        }
    }

    pub fn requiring_light(mut self) -> Self {
        self.requires_light = true;
        self
    }

    /// Implicit sight: precise and unbounded
    pub fn implicit_sight() -> Self {
        Self::new(SenseType::Sight, Acuity::Precise, f64::INFINITY)
    }

    /// Implicit hearing: imprecise within the given range
    pub fn implicit_hearing(range: f64) -> Self {
        Self::new(SenseType::Hearing, Acuity::Imprecise, range)
    }
}

/// The senses an entity can use
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SenseProfile {
    /// Declared senses, in declaration order
    #[serde(default)]
    pub senses: Vec<Sense>,

    #[serde(default)]
    pub blinded: bool,

    #[serde(default)]
    pub deafened: bool,
}

impl SenseProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sense(mut self, sense: Sense) -> Self {
        self.senses.push(sense);
        self
    }

    pub fn blinded(mut self) -> Self {
        self.blinded = true;
        self
    }

    pub fn deafened(mut self) -> Self {
        self.deafened = true;
        self
    }

    fn declared(&self, sense_type: &SenseType) -> Option<&Sense> {
        self.senses.iter().find(|s| &s.sense_type == sense_type)
    }

    /// Senses that can participate in resolution, in tie-break order.
    ///
    /// Order is sight, hearing, then declared special senses as listed. A
    /// declared sight or hearing entry replaces the implicit one. Unknown
    /// senses and special senses without a positive range are dropped.
    pub fn effective_senses(&self, default_hearing_range: f64) -> Vec<Sense> {
        let mut effective = Vec::with_capacity(self.senses.len() + 2);

        if !self.blinded {
            effective.push(
                self.declared(&SenseType::Sight)
                    .cloned()
                    .unwrap_or_else(Sense::implicit_sight),
            );
        }

        if !self.deafened {
            effective.push(
                self.declared(&SenseType::Hearing)
                    .cloned()
                    .unwrap_or_else(|| Sense::implicit_hearing(default_hearing_range)),
            );
        }

        effective.extend(
            self.senses
                .iter()
                .filter(|s| {
                    !matches!(s.sense_type, SenseType::Sight | SenseType::Hearing)
                        && s.sense_type.is_known()
                        && s.range > 0.0
                })
                .cloned(),
        );

        effective
    }
}
