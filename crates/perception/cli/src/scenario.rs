//! Scenario replay
//!
//! A scenario is a JSON snapshot of a scene: the entities, optional
//! per-pair geometry, the source that acted and how, and any overrides a
//! human recorded. Pairs without explicit geometry fall back to open-field
//! distance with clear line of sight.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use perception_overrides::{OverrideArbitrationStore, OverrideLayer};
use perception_resolver::{
    BatchReport, CollectingSink, DetectionEngine, EligibilityScanner, GeometryFacts,
    GeometryOracle, OpenFieldOracle,
};
use perception_types::{
    ActionContext, DetectionState, Entity, EntityId, PairKey, PerceptionConfig, RollId,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ScenarioError, ScenarioResult};

/// Scene snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub entities: Vec<Entity>,

    /// Entity that acted
    pub source: EntityId,

    #[serde(default)]
    pub action: ActionContext,

    #[serde(default)]
    pub geometry: Vec<PairGeometry>,

    /// Roll this replay belongs to, for roll-layer overrides
    #[serde(default)]
    pub roll_id: Option<RollId>,

    #[serde(default)]
    pub overrides: Vec<RecordedOverride>,
}

/// Explicit geometry for one observer looking at one source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairGeometry {
    pub observer: EntityId,
    pub source: EntityId,
    #[serde(flatten)]
    pub facts: GeometryFacts,
}

/// An override chosen for the observer/source pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedOverride {
    pub observer: EntityId,
    pub layer: OverrideLayer,
    pub state: DetectionState,
    #[serde(default)]
    pub roll_id: Option<RollId>,
}

/// Final state for one observer after overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedState {
    pub observer: EntityId,
    pub computed: DetectionState,
    pub state: DetectionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overridden_by: Option<OverrideLayer>,
}

/// Replay output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub report: BatchReport,
    pub states: Vec<ResolvedState>,
}

impl Scenario {
    pub fn from_path(path: impl AsRef<Path>) -> ScenarioResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> ScenarioResult<Self> {
        let scenario: Scenario = serde_json::from_str(raw)?;
        scenario.check()?;
        Ok(scenario)
    }

    fn check(&self) -> ScenarioResult<()> {
        let mut seen = HashSet::new();
        for entity in &self.entities {
            if !seen.insert(&entity.id) {
                return Err(ScenarioError::DuplicateEntity(entity.id.clone()));
            }
        }
        if !seen.contains(&self.source) {
            return Err(ScenarioError::UnknownSource(self.source.clone()));
        }

        let mut rolls: HashMap<&EntityId, &RollId> = HashMap::new();
        for recorded in &self.overrides {
            if recorded.layer != OverrideLayer::Roll {
                continue;
            }
            let Some(roll_id) = self.roll_for(recorded) else {
                return Err(ScenarioError::MissingRollId(recorded.observer.clone()));
            };
            if *rolls.entry(&recorded.observer).or_insert(roll_id) != roll_id {
                return Err(ScenarioError::ConflictingRollIds(recorded.observer.clone()));
            }
        }
        Ok(())
    }

    /// Roll id a recorded override is stored under
    fn roll_for<'a>(&'a self, recorded: &'a RecordedOverride) -> Option<&'a RollId> {
        recorded.roll_id.as_ref().or(self.roll_id.as_ref())
    }

    /// Roll id to consume with for `observer`: its roll override's id when
    /// it has one, else the scenario's
    fn consume_roll_for(&self, observer: &EntityId) -> Option<&RollId> {
        self.overrides
            .iter()
            .filter(|o| o.layer == OverrideLayer::Roll && &o.observer == observer)
            .find_map(|o| self.roll_for(o))
            .or(self.roll_id.as_ref())
    }

    fn source_entity(&self) -> ScenarioResult<&Entity> {
        self.entities
            .iter()
            .find(|e| e.id == self.source)
            .ok_or_else(|| ScenarioError::UnknownSource(self.source.clone()))
    }
}

/// Every entity other than the source is a candidate
struct SceneScanner<'a> {
    entities: &'a [Entity],
}

impl EligibilityScanner for SceneScanner<'_> {
    fn candidates(&self, source: &Entity, _action: &ActionContext) -> Vec<Entity> {
        self.entities
            .iter()
            .filter(|e| e.id != source.id)
            .cloned()
            .collect()
    }
}

struct SceneOracle {
    explicit: HashMap<(EntityId, EntityId), GeometryFacts>,
    fallback: OpenFieldOracle,
}

impl SceneOracle {
    fn new(geometry: &[PairGeometry]) -> Self {
        Self {
            explicit: geometry
                .iter()
                .map(|g| ((g.observer.clone(), g.source.clone()), g.facts))
                .collect(),
            fallback: OpenFieldOracle::default(),
        }
    }
}

impl GeometryOracle for SceneOracle {
    fn facts(&self, observer: &Entity, source: &Entity) -> Option<GeometryFacts> {
        observer.position?;
        source.position?;
        self.explicit
            .get(&(observer.id.clone(), source.id.clone()))
            .copied()
            .or_else(|| self.fallback.facts(observer, source))
    }
}

/// Resolve the scenario, then layer recorded overrides on top.
///
/// Overrides are recorded against the computed state and consumed once,
/// as a UI would after the human confirmed them.
pub fn replay(
    scenario: &Scenario,
    engine: &DetectionEngine,
    store: &OverrideArbitrationStore,
) -> ScenarioResult<ScenarioOutcome> {
    let source = scenario.source_entity()?;
    let scanner = SceneScanner {
        entities: &scenario.entities,
    };
    let oracle = SceneOracle::new(&scenario.geometry);

    let mut sink = CollectingSink::default();
    let report = engine.dispatch(source, &scenario.action, &scanner, &oracle, &mut sink);

    let computed: HashMap<EntityId, DetectionState> = sink
        .received
        .into_iter()
        .map(|(observer, result)| (observer, result.state))
        .collect();
    let computed_state =
        |id: &EntityId| computed.get(id).copied().unwrap_or(DetectionState::None);

    for recorded in &scenario.overrides {
        let pair = PairKey::new(&recorded.observer, &source.id);
        store.set(
            recorded.layer,
            &pair,
            recorded.state,
            computed_state(&recorded.observer),
            scenario.roll_for(recorded).cloned(),
        );
    }

    let states = scenario
        .entities
        .iter()
        .filter(|e| e.id != source.id)
        .map(|observer| {
            let pair = PairKey::new(&observer.id, &source.id);
            let computed = computed_state(&observer.id);
            let roll_id = scenario.consume_roll_for(&observer.id);
            let hit = store.consume(&pair, roll_id, true);
            if let Some(hit) = &hit {
                debug!(observer = %observer.id, layer = %hit.source, "Override applied");
            }
            ResolvedState {
                observer: observer.id.clone(),
                computed,
                state: hit.as_ref().map(|o| o.state).unwrap_or(computed),
                overridden_by: hit.map(|o| o.source),
            }
        })
        .collect::<Vec<_>>();

    info!(
        source = %source.id,
        observers = states.len(),
        overridden = states.iter().filter(|s| s.overridden_by.is_some()).count(),
        "Scenario replayed"
    );

    Ok(ScenarioOutcome { report, states })
}

/// Build the engine and store from validated configuration
pub fn build(
    config: &PerceptionConfig,
) -> ScenarioResult<(DetectionEngine, OverrideArbitrationStore)> {
    config.validate()?;
    let engine = DetectionEngine::new(config.engine.clone())?;
    let store = OverrideArbitrationStore::new(config.overrides.clone())?;
    Ok((engine, store))
}
