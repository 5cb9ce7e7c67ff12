//! End-to-end detection scenarios

use perception_resolver::{DetectionResolver, GeometryFacts};
use perception_types::{
    Acuity, ActionContext, AmbientThresholds, CheckOutcome, DetectionReason, DetectionResult,
    DetectionState, EngineConfig, Entity, Position, PrivacyPolicy, Sense, SenseProfile,
    SenseType,
};
use proptest::prelude::*;

fn resolver(privacy: PrivacyPolicy, noise_radius: f64) -> DetectionResolver {
    DetectionResolver::new(EngineConfig {
        privacy,
        ambient: AmbientThresholds {
            noise_radius,
            communication_radius: 60.0,
        },
        ..EngineConfig::default()
    })
    .expect("valid config")
}

fn entity(id: &str, profile: SenseProfile) -> Entity {
    Entity::new(id, Position::new(0.0, 0.0)).with_profile(profile)
}

#[test]
fn hearing_only_observer_hides_source() {
    let profile = SenseProfile::new()
        .blinded()
        .with_sense(Sense::new(SenseType::Hearing, Acuity::Imprecise, 60.0));

    let result = resolver(PrivacyPolicy::Transparent, 0.0).resolve(
        &entity("listener", profile),
        &entity("rogue", SenseProfile::new()),
        &GeometryFacts::new(40.0, false),
        &ActionContext::passive(),
    );

    assert_eq!(result.state, DetectionState::Hidden);
    assert_eq!(result.reason.as_ref().map(|r| r.tag()), Some("hearing-sense".to_string()));
    assert_eq!(result.fuzzy_radius, 10);
    assert!(!result.exact_position);
}

#[test]
fn sight_without_exact_reveal_gives_last_known_area() {
    let result = resolver(PrivacyPolicy::Obscured, 30.0).resolve(
        &entity("guard", SenseProfile::new()),
        &entity("rogue", SenseProfile::new()),
        &GeometryFacts::new(25.0, true),
        &ActionContext::passive(),
    );

    assert_eq!(result.state, DetectionState::LastKnownArea);
    assert_eq!(result.reason, Some(DetectionReason::LineOfSight));
    assert!(!result.exact_position);
    assert_eq!(result.fuzzy_radius, 5);
}

#[test]
fn noise_fallback_when_no_sense_qualifies() {
    let result = resolver(PrivacyPolicy::Standard, 30.0).resolve(
        &entity("sleeper", SenseProfile::new().deafened()),
        &entity("rogue", SenseProfile::new()),
        &GeometryFacts::new(20.0, false),
        &ActionContext::passive(),
    );

    assert_eq!(result.state, DetectionState::Hidden);
    assert_eq!(result.reason, Some(DetectionReason::Noise));
    assert_eq!(result.fuzzy_radius, 10);
}

#[test]
fn radius_floors_at_zero_distance() {
    let r = resolver(PrivacyPolicy::Standard, 0.0);
    let source = entity("rogue", SenseProfile::new());

    let hidden = r.resolve(
        &entity("listener", SenseProfile::new().blinded()),
        &source,
        &GeometryFacts::new(0.0, false),
        &ActionContext::passive(),
    );
    assert_eq!(hidden.state, DetectionState::Hidden);
    assert_eq!(hidden.fuzzy_radius, 5);

    let vague = SenseProfile::new()
        .blinded()
        .deafened()
        .with_sense(Sense::new(SenseType::Life, Acuity::Vague, 10.0));
    let suspicious = r.resolve(
        &entity("seer", vague),
        &source,
        &GeometryFacts::new(0.0, false),
        &ActionContext::passive(),
    );
    assert_eq!(suspicious.state, DetectionState::Suspicious);
    assert_eq!(suspicious.fuzzy_radius, 10);
}

#[test]
fn critical_seek_upgrades_suspicious_to_hidden() {
    let vague = SenseProfile::new()
        .deafened()
        .with_sense(Sense::new(SenseType::Scent, Acuity::Vague, 80.0));
    let r = resolver(PrivacyPolicy::Standard, 0.0);
    let observer = entity("hound", vague);
    let source = entity("rogue", SenseProfile::new());
    let facts = GeometryFacts::new(40.0, false);

    let passive = r.resolve(&observer, &source, &facts, &ActionContext::passive());
    assert_eq!(passive.state, DetectionState::Suspicious);

    let sought = r.resolve(
        &observer,
        &source,
        &facts,
        &ActionContext::seek(CheckOutcome::CriticalSuccess),
    );
    assert!(sought.state >= DetectionState::Hidden);
    assert_eq!(sought.reason, Some(DetectionReason::Sense(SenseType::Scent)));
}

#[test]
fn malformed_source_resolves_to_none() {
    let mut source = entity("rogue", SenseProfile::new());
    source.position = None;

    let result = resolver(PrivacyPolicy::Transparent, 30.0).resolve(
        &entity("guard", SenseProfile::new()),
        &source,
        &GeometryFacts::new(5.0, true),
        &ActionContext::passive(),
    );
    assert_eq!(result, DetectionResult::none());
}

fn profile_strategy() -> impl Strategy<Value = SenseProfile> {
    let acuity = prop_oneof![
        Just(Acuity::Precise),
        Just(Acuity::Imprecise),
        Just(Acuity::Vague),
    ];
    let sense = (acuity, 0.0f64..100.0)
        .prop_map(|(acuity, range)| Sense::new(SenseType::Vibration, acuity, range));
    (
        proptest::collection::vec(sense, 0..3),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(senses, blinded, deafened)| SenseProfile {
            senses,
            blinded,
            deafened,
        })
}

fn policy_strategy() -> impl Strategy<Value = PrivacyPolicy> {
    prop_oneof![
        Just(PrivacyPolicy::Transparent),
        Just(PrivacyPolicy::Standard),
        Just(PrivacyPolicy::Obscured),
        Just(PrivacyPolicy::Strict),
    ]
}

proptest! {
    #[test]
    fn property_successful_seek_never_lowers_state(
        profile in profile_strategy(),
        policy in policy_strategy(),
        distance in 0.0f64..150.0,
        los in any::<bool>(),
        critical in any::<bool>(),
    ) {
        let r = resolver(policy, 30.0);
        let observer = entity("observer", profile);
        let source = entity("source", SenseProfile::new());
        let facts = GeometryFacts::new(distance, los);

        let passive = r.resolve(&observer, &source, &facts, &ActionContext::passive());
        let outcome = if critical { CheckOutcome::CriticalSuccess } else { CheckOutcome::Success };
        let sought = r.resolve(&observer, &source, &facts, &ActionContext::seek(outcome));

        prop_assert!(sought.state >= passive.state);
    }

    #[test]
    fn property_critical_seek_at_least_plain_seek(
        profile in profile_strategy(),
        policy in policy_strategy(),
        distance in 0.0f64..150.0,
        los in any::<bool>(),
    ) {
        let r = resolver(policy, 30.0);
        let observer = entity("observer", profile);
        let source = entity("source", SenseProfile::new());
        let facts = GeometryFacts::new(distance, los);

        let plain = r.resolve(
            &observer,
            &source,
            &facts,
            &ActionContext::seek(CheckOutcome::Success),
        );
        let critical = r.resolve(
            &observer,
            &source,
            &facts,
            &ActionContext::seek(CheckOutcome::CriticalSuccess),
        );

        prop_assert!(critical.state >= plain.state);
    }

    #[test]
    fn property_radius_invariants(
        profile in profile_strategy(),
        policy in policy_strategy(),
        distance in 0.0f64..500.0,
        los in any::<bool>(),
    ) {
        let r = resolver(policy, 30.0);
        let result = r.resolve(
            &entity("observer", profile),
            &entity("source", SenseProfile::new()),
            &GeometryFacts::new(distance, los),
            &ActionContext::passive(),
        );

        if result.exact_position {
            prop_assert_eq!(result.fuzzy_radius, 0);
            prop_assert!(policy.reveal_exact());
        }
        if result.state == DetectionState::Hidden {
            prop_assert!(result.fuzzy_radius >= 5);
        }
        if result.state == DetectionState::Suspicious {
            prop_assert!(result.fuzzy_radius >= 10);
        }
    }
}
