//! Detection resolution
//!
//! Turns the best available sense, the privacy policy and the triggering
//! action into a [`DetectionResult`]. Resolution order, first match wins:
//!
//! 1. direct sight
//! 2. best non-sight sense, mapped by acuity
//! 3. ambient noise
//! 4. ambient communication (gated by `require_action`)
//! 5. none
//!
//! A successful seek then moves the state up its upgrade table.
//!
//! This is a pure function of its inputs. Malformed entities and unusable
//! geometry resolve to `none` so that one bad entity never aborts a batch.

use crate::collaborators::GeometryFacts;
use crate::senses::{SenseMatch, SenseResolver};
use perception_types::{
    Acuity, ActionContext, ConfigResult, DetectionReason, DetectionResult, DetectionState,
    EngineConfig, Entity, PrivacyPolicy, SenseProfile,
};
use tracing::debug;

/// Radius used whenever only the last known area is revealed
pub const LAST_KNOWN_AREA_RADIUS: u32 = 5;

/// Radius for a `hidden` detection at `distance`
pub fn hidden_radius(distance: f64) -> u32 {
    floored(distance / 4.0).max(5)
}

/// Radius for a `suspicious` detection (and for noise) at `distance`
pub fn suspicious_radius(distance: f64) -> u32 {
    floored(distance / 2.0).max(10)
}

/// Radius for a communication detection at `distance`
pub fn communication_radius(distance: f64) -> u32 {
    floored(distance / 1.5).max(15)
}

fn floored(value: f64) -> u32 {
    // Saturating float-to-int cast; NaN maps to 0.
    value.floor() as u32
}

/// Resolves observer→source detection
#[derive(Clone, Debug)]
pub struct DetectionResolver {
    config: EngineConfig,
    senses: SenseResolver,
}

impl DetectionResolver {
    /// Build a resolver, rejecting invalid configuration
    pub fn new(config: EngineConfig) -> ConfigResult<Self> {
        config.validate()?;
        let senses = SenseResolver::new(config.default_hearing_range);
        Ok(Self { config, senses })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn policy(&self) -> PrivacyPolicy {
        self.config.privacy
    }

    /// Same resolver under a different privacy policy
    pub fn with_policy(&self, privacy: PrivacyPolicy) -> Self {
        let mut config = self.config.clone();
        config.privacy = privacy;
        Self {
            config,
            senses: self.senses,
        }
    }

    /// Resolve what `observer` perceives of `source`
    pub fn resolve(
        &self,
        observer: &Entity,
        source: &Entity,
        facts: &GeometryFacts,
        action: &ActionContext,
    ) -> DetectionResult {
        let Some(profile) = observer.profile.as_ref() else {
            debug!(observer = %observer.id, "Observer has no sense profile");
            return DetectionResult::none();
        };

        if observer.position.is_none() || source.position.is_none() {
            debug!(
                observer = %observer.id,
                source = %source.id,
                "Pair has no position"
            );
            return DetectionResult::none();
        }

        if !facts.is_usable() {
            debug!(
                observer = %observer.id,
                source = %source.id,
                distance = facts.distance,
                "Unusable distance"
            );
            return DetectionResult::none();
        }

        let base = self.resolve_base(profile, facts, action);
        let result = match action.seek_success() {
            Some(critical) => self.apply_seek(base, critical, facts.distance),
            None => base,
        };

        debug!(
            observer = %observer.id,
            source = %source.id,
            state = %result.state,
            radius = result.fuzzy_radius,
            "Resolved detection"
        );

        result
    }

    fn resolve_base(
        &self,
        profile: &SenseProfile,
        facts: &GeometryFacts,
        action: &ActionContext,
    ) -> DetectionResult {
        match self.senses.resolve_best_sense(profile, facts) {
            Some(best) if best.is_precise_sight() => {
                self.observed(DetectionReason::LineOfSight, Some(best))
            }
            Some(best) => self.from_sense(best, facts.distance),
            None => self.ambient(facts.distance, action),
        }
    }

    fn from_sense(&self, best: SenseMatch, distance: f64) -> DetectionResult {
        let reason = DetectionReason::Sense(best.sense_type.clone());
        match best.acuity {
            Acuity::Precise => self.observed(reason, Some(best)),
            Acuity::Imprecise => DetectionResult::approximate(
                DetectionState::Hidden,
                reason,
                hidden_radius(distance),
                Some((best.sense_type, best.acuity)),
            ),
            Acuity::Vague => DetectionResult::approximate(
                DetectionState::Suspicious,
                reason,
                suspicious_radius(distance),
                Some((best.sense_type, best.acuity)),
            ),
        }
    }

    /// `observed`, downgraded to the last known area when exact positions
    /// are not revealed
    fn observed(&self, reason: DetectionReason, best: Option<SenseMatch>) -> DetectionResult {
        let sense = best.map(|m| (m.sense_type, m.acuity));
        if self.config.privacy.reveal_exact() {
            DetectionResult::exact(reason, sense)
        } else {
            DetectionResult::approximate(
                DetectionState::LastKnownArea,
                reason,
                LAST_KNOWN_AREA_RADIUS,
                sense,
            )
        }
    }

    fn ambient(&self, distance: f64, action: &ActionContext) -> DetectionResult {
        let thresholds = &self.config.ambient;

        if distance <= thresholds.noise_radius {
            return DetectionResult::approximate(
                DetectionState::Hidden,
                DetectionReason::Noise,
                suspicious_radius(distance),
                None,
            );
        }

        let passive_allowed =
            !self.config.privacy.require_action() || action.action.is_deliberate();
        if distance <= thresholds.communication_radius && passive_allowed {
            return DetectionResult::approximate(
                DetectionState::Suspicious,
                DetectionReason::Communication,
                communication_radius(distance),
                None,
            );
        }

        DetectionResult::none()
    }

    /// Move a result up the seek table and re-render it for its new state.
    ///
    /// A privacy clamp never takes the state below where it started, and a
    /// critical success never ends below what a plain success would give.
    fn apply_seek(&self, base: DetectionResult, critical: bool, distance: f64) -> DetectionResult {
        let mut upgraded = self.seek_with_table(&base, critical, distance);

        if critical {
            let plain = self.seek_with_table(&base, false, distance);
            let rank = |r: &Option<DetectionResult>| r.as_ref().map(|r| r.state);
            if rank(&plain) > rank(&upgraded) {
                upgraded = plain;
            }
        }

        match upgraded {
            Some(upgraded) if upgraded.state > base.state => {
                debug!(
                    from = %base.state,
                    to = %upgraded.state,
                    critical,
                    "Seek upgrade applied"
                );
                upgraded
            }
            _ => base,
        }
    }

    /// Rendered result of one upgrade table, or `None` when it does not
    /// raise the state
    fn seek_with_table(
        &self,
        base: &DetectionResult,
        critical: bool,
        distance: f64,
    ) -> Option<DetectionResult> {
        let target = self
            .config
            .seek_upgrades
            .table(critical)
            .upgrade(base.state);

        if target <= base.state {
            return None;
        }

        let reason = base.reason.clone().unwrap_or(DetectionReason::Seek);
        let sense = base.sense();

        let rendered = match target {
            DetectionState::Observed if self.config.privacy.reveal_exact() => {
                DetectionResult::exact(reason, sense)
            }
            DetectionState::Observed | DetectionState::LastKnownArea => {
                DetectionResult::approximate(
                    DetectionState::LastKnownArea,
                    reason,
                    LAST_KNOWN_AREA_RADIUS,
                    sense,
                )
            }
            DetectionState::Hidden => DetectionResult::approximate(
                DetectionState::Hidden,
                reason,
                hidden_radius(distance),
                sense,
            ),
            DetectionState::Suspicious => DetectionResult::approximate(
                DetectionState::Suspicious,
                reason,
                suspicious_radius(distance),
                sense,
            ),
            DetectionState::None => return None,
        };

        (rendered.state > base.state).then_some(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perception_types::{CheckOutcome, Position, Sense, SenseType, TriggerAction};

    fn resolver(privacy: PrivacyPolicy) -> DetectionResolver {
        DetectionResolver::new(EngineConfig {
            privacy,
            ..EngineConfig::default()
        })
        .unwrap()
    }

    fn observer(profile: SenseProfile) -> Entity {
        Entity::new("observer", Position::new(0.0, 0.0)).with_profile(profile)
    }

    fn source() -> Entity {
        Entity::new("source", Position::new(10.0, 0.0))
    }

    #[test]
    fn test_radius_floors_at_point_blank() {
        assert_eq!(hidden_radius(0.0), 5);
        assert_eq!(suspicious_radius(0.0), 10);
        assert_eq!(communication_radius(0.0), 15);
    }

    #[test]
    fn test_radius_scales_with_distance() {
        assert_eq!(hidden_radius(41.0), 10);
        assert_eq!(suspicious_radius(45.0), 22);
        assert_eq!(communication_radius(46.0), 30);
    }

    #[test]
    fn test_sight_reveals_exact_position() {
        let result = resolver(PrivacyPolicy::Transparent).resolve(
            &observer(SenseProfile::new()),
            &source(),
            &GeometryFacts::new(10.0, true),
            &ActionContext::passive(),
        );

        assert_eq!(result.state, DetectionState::Observed);
        assert_eq!(result.reason, Some(DetectionReason::LineOfSight));
        assert!(result.exact_position);
        assert_eq!(result.fuzzy_radius, 0);
    }

    #[test]
    fn test_precise_sense_without_reveal_is_last_known_area() {
        let profile = SenseProfile::new()
            .blinded()
            .with_sense(Sense::new(SenseType::Vibration, Acuity::Precise, 30.0));
        let result = resolver(PrivacyPolicy::Strict).resolve(
            &observer(profile),
            &source(),
            &GeometryFacts::new(10.0, false),
            &ActionContext::passive(),
        );

        assert_eq!(result.state, DetectionState::LastKnownArea);
        assert_eq!(
            result.reason,
            Some(DetectionReason::Sense(SenseType::Vibration))
        );
        assert_eq!(result.fuzzy_radius, LAST_KNOWN_AREA_RADIUS);
    }

    #[test]
    fn test_vague_sense_is_suspicious() {
        let profile = SenseProfile::new()
            .deafened()
            .with_sense(Sense::new(SenseType::Life, Acuity::Vague, 60.0));
        let result = resolver(PrivacyPolicy::Standard).resolve(
            &observer(profile),
            &source(),
            &GeometryFacts::new(50.0, false),
            &ActionContext::passive(),
        );

        assert_eq!(result.state, DetectionState::Suspicious);
        assert_eq!(result.fuzzy_radius, 25);
    }

    #[test]
    fn test_communication_gated_by_policy() {
        let profile = SenseProfile::new().deafened();
        let facts = GeometryFacts::new(45.0, false);

        let gated = resolver(PrivacyPolicy::Standard).resolve(
            &observer(profile.clone()),
            &source(),
            &facts,
            &ActionContext::passive(),
        );
        assert_eq!(gated.state, DetectionState::None);

        let open = resolver(PrivacyPolicy::Transparent).resolve(
            &observer(profile.clone()),
            &source(),
            &facts,
            &ActionContext::passive(),
        );
        assert_eq!(open.state, DetectionState::Suspicious);
        assert_eq!(open.reason, Some(DetectionReason::Communication));
        assert_eq!(open.fuzzy_radius, 30);

        let deliberate = resolver(PrivacyPolicy::Standard).resolve(
            &observer(profile),
            &source(),
            &facts,
            &ActionContext::new(TriggerAction::Attack),
        );
        assert_eq!(deliberate.state, DetectionState::Suspicious);
    }

    #[test]
    fn test_beyond_every_threshold_is_none() {
        let result = resolver(PrivacyPolicy::Transparent).resolve(
            &observer(SenseProfile::new().deafened()),
            &source(),
            &GeometryFacts::new(200.0, false),
            &ActionContext::passive(),
        );
        assert_eq!(result, DetectionResult::none());
    }

    #[test]
    fn test_missing_profile_is_none() {
        let mut malformed = observer(SenseProfile::new());
        malformed.profile = None;

        let result = resolver(PrivacyPolicy::Transparent).resolve(
            &malformed,
            &source(),
            &GeometryFacts::new(1.0, true),
            &ActionContext::passive(),
        );
        assert!(!result.is_detected());
    }

    #[test]
    fn test_nan_distance_is_none() {
        let result = resolver(PrivacyPolicy::Transparent).resolve(
            &observer(SenseProfile::new()),
            &source(),
            &GeometryFacts::new(f64::NAN, true),
            &ActionContext::passive(),
        );
        assert!(!result.is_detected());
    }

    #[test]
    fn test_seek_from_nothing() {
        let result = resolver(PrivacyPolicy::Standard).resolve(
            &observer(SenseProfile::new().deafened()),
            &source(),
            &GeometryFacts::new(200.0, false),
            &ActionContext::seek(CheckOutcome::Success),
        );
        assert_eq!(result.state, DetectionState::Suspicious);
        assert_eq!(result.reason, Some(DetectionReason::Seek));
        assert_eq!(result.fuzzy_radius, 100);
    }

    #[test]
    fn test_seek_failure_changes_nothing() {
        let profile = SenseProfile::new().deafened();
        let facts = GeometryFacts::new(20.0, false);
        let r = resolver(PrivacyPolicy::Standard);

        let passive = r.resolve(
            &observer(profile.clone()),
            &source(),
            &facts,
            &ActionContext::passive(),
        );
        let failed = r.resolve(
            &observer(profile),
            &source(),
            &facts,
            &ActionContext::seek(CheckOutcome::CriticalFailure),
        );
        assert_eq!(passive, failed);
    }

    #[test]
    fn test_privacy_clamp_never_downgrades_seek() {
        // Imprecise hearing yields hidden; a critical seek targets observed,
        // which the policy clamps to lastKnownArea, below hidden.
        let r = resolver(PrivacyPolicy::Obscured);
        let result = r.resolve(
            &observer(SenseProfile::new().blinded()),
            &source(),
            &GeometryFacts::new(20.0, false),
            &ActionContext::seek(CheckOutcome::CriticalSuccess),
        );
        assert_eq!(result.state, DetectionState::Hidden);
        assert_eq!(result.reason, Some(DetectionReason::Sense(SenseType::Hearing)));
    }

    #[test]
    fn test_critical_seek_not_below_plain_seek_when_clamped() {
        // Sight without exact reveal yields lastKnownArea. The plain table
        // moves it to hidden; the critical table targets observed, which the
        // policy renders as lastKnownArea again.
        let r = resolver(PrivacyPolicy::Obscured);
        let guard = observer(SenseProfile::new());
        let facts = GeometryFacts::new(40.0, true);

        let passive = r.resolve(&guard, &source(), &facts, &ActionContext::passive());
        let plain = r.resolve(
            &guard,
            &source(),
            &facts,
            &ActionContext::seek(CheckOutcome::Success),
        );
        let critical = r.resolve(
            &guard,
            &source(),
            &facts,
            &ActionContext::seek(CheckOutcome::CriticalSuccess),
        );

        assert_eq!(passive.state, DetectionState::LastKnownArea);
        assert_eq!(plain.state, DetectionState::Hidden);
        assert_eq!(plain.fuzzy_radius, 10);
        assert_eq!(critical, plain);
        assert_eq!(critical.reason, Some(DetectionReason::LineOfSight));
    }

    #[test]
    fn test_with_policy_keeps_other_settings() {
        let r = resolver(PrivacyPolicy::Standard).with_policy(PrivacyPolicy::Strict);
        assert_eq!(r.policy(), PrivacyPolicy::Strict);
        assert_eq!(r.config().default_hearing_range, 30.0);
    }
}
