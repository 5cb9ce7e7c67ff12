//! Entities participating in perception.

use crate::sense::SenseProfile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a scene entity
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A world position in scene units
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to another position
    pub fn distance_to(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A simulated participant on the scene.
///
/// `position` and `profile` are optional because hosts hand over whatever
/// they have; an entity missing either is treated as malformed and never
/// perceives or gets perceived.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,

    #[serde(default)]
    pub position: Option<Position>,

    /// Faction tag. Informational only, never used for filtering.
    #[serde(default)]
    pub alliance: Option<String>,

    #[serde(default)]
    pub profile: Option<SenseProfile>,
}

impl Entity {
    /// Create a well-formed entity with the standard sense profile
    pub fn new(id: impl Into<String>, position: Position) -> Self {
        Self {
            id: EntityId::new(id),
            position: Some(position),
            alliance: None,
            profile: Some(SenseProfile::default()),
        }
    }

    pub fn with_profile(mut self, profile: SenseProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_alliance(mut self, alliance: impl Into<String>) -> Self {
        self.alliance = Some(alliance.into());
        self
    }

    /// Whether the entity carries everything resolution needs
    pub fn is_well_formed(&self) -> bool {
        self.position.is_some() && self.profile.is_some()
    }
}
