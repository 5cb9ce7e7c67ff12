//! Narrow interfaces to the host scene.
//!
//! The engine never reaches into a scene graph. Hosts implement these
//! traits with whatever they have: a ray caster, a precomputed grid, or a
//! test double.

use perception_types::{ActionContext, DetectionResult, Entity, EntityId};
use serde::{Deserialize, Serialize};

/// Geometry between an observer and a source
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometryFacts {
    /// Distance in world units
    pub distance: f64,
    pub has_line_of_sight: bool,
    #[serde(default = "default_light")]
    pub light_adequate: bool,
}

fn default_light() -> bool {
    true
}

impl GeometryFacts {
    pub fn new(distance: f64, has_line_of_sight: bool) -> Self {
        Self {
            distance,
            has_line_of_sight,
            light_adequate: true,
        }
    }

    pub fn in_darkness(mut self) -> Self {
        self.light_adequate = false;
        self
    }

    /// Distances the engine can reason about
    pub fn is_usable(&self) -> bool {
        self.distance.is_finite() && self.distance >= 0.0
    }
}

/// Supplies line-of-sight and distance for a pair
pub trait GeometryOracle {
    /// Facts for `observer` looking at `source`, or `None` when the pair
    /// cannot be placed (for example a missing position).
    fn facts(&self, observer: &Entity, source: &Entity) -> Option<GeometryFacts>;
}

/// Enumerates candidate observers for a source, already range-filtered
pub trait EligibilityScanner {
    fn candidates(&self, source: &Entity, action: &ActionContext) -> Vec<Entity>;
}

/// Receives every detection that is not `none`
pub trait ResultSink {
    fn accept(&mut self, observer: &EntityId, result: &DetectionResult);
}

/// Oracle that derives distance from positions and trusts a fixed
/// line-of-sight answer. Useful for open terrain and tests.
#[derive(Clone, Copy, Debug)]
pub struct OpenFieldOracle {
    pub line_of_sight: bool,
    pub light_adequate: bool,
}

impl Default for OpenFieldOracle {
    fn default() -> Self {
        Self {
            line_of_sight: true,
            light_adequate: true,
        }
    }
}

impl GeometryOracle for OpenFieldOracle {
    fn facts(&self, observer: &Entity, source: &Entity) -> Option<GeometryFacts> {
        let from = observer.position?;
        let to = source.position?;
        Some(GeometryFacts {
            distance: from.distance_to(&to),
            has_line_of_sight: self.line_of_sight,
            light_adequate: self.light_adequate,
        })
    }
}

/// Sink that keeps everything it receives
#[derive(Clone, Debug, Default)]
pub struct CollectingSink {
    pub received: Vec<(EntityId, DetectionResult)>,
}

impl ResultSink for CollectingSink {
    fn accept(&mut self, observer: &EntityId, result: &DetectionResult) {
        self.received.push((observer.clone(), result.clone()));
    }
}
