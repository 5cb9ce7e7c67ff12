//! # perception-resolver
//!
//! Detection resolution for observer→source pairs.
//!
//! ## Key Components
//!
//! - [`SenseResolver`]: picks the best available sense, precise first
//! - [`DetectionResolver`]: maps sense, policy and action to a
//!   [`DetectionResult`](perception_types::DetectionResult)
//! - [`DetectionEngine`]: runs one triggering event across all candidate
//!   observers and feeds a [`ResultSink`]
//! - [`GeometryOracle`] / [`EligibilityScanner`]: host-supplied scene access
//!
//! ## Example
//!
//! ```rust
//! use perception_resolver::{DetectionResolver, GeometryFacts};
//! use perception_types::{ActionContext, DetectionState, EngineConfig, Entity, Position};
//!
//! let resolver = DetectionResolver::new(EngineConfig::default()).unwrap();
//! let guard = Entity::new("guard", Position::new(0.0, 0.0));
//! let rogue = Entity::new("rogue", Position::new(20.0, 0.0));
//!
//! let result = resolver.resolve(
//!     &guard,
//!     &rogue,
//!     &GeometryFacts::new(20.0, true),
//!     &ActionContext::passive(),
//! );
//! assert_eq!(result.state, DetectionState::Observed);
//! ```

#![deny(unsafe_code)]

pub mod collaborators;
pub mod detection;
pub mod engine;
pub mod senses;

pub use collaborators::{
    CollectingSink, EligibilityScanner, GeometryFacts, GeometryOracle, OpenFieldOracle,
    ResultSink,
};
pub use detection::{
    communication_radius, hidden_radius, suspicious_radius, DetectionResolver,
    LAST_KNOWN_AREA_RADIUS,
};
pub use engine::{BatchReport, DetectionEngine, ObserverDetection};
pub use senses::{SenseMatch, SenseResolver};
