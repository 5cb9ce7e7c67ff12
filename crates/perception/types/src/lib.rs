//! # perception-types
//!
//! Shared vocabulary for the perception stack: who is looking, with which
//! senses, how certain the outcome is, and how much of it the privacy
//! policy lets through.
//!
//! ## Components
//!
//! - **Entity / SenseProfile**: observers and sources with their senses
//! - **DetectionState / DetectionResult**: the ordered certainty ladder
//!   `none < suspicious < lastKnownArea < hidden < observed`
//! - **PrivacyPolicy / AmbientThresholds**: host-selected policy inputs
//! - **ActionContext / SeekUpgradeTables**: deliberate-action handling
//! - **PairKey / RollId**: canonical override keys
//! - **PerceptionConfig**: validated host configuration

#![deny(unsafe_code)]

pub mod action;
pub mod config;
pub mod detection;
pub mod entity;
pub mod errors;
pub mod pair;
pub mod policy;
pub mod sense;
pub mod upgrade;

pub use action::{ActionContext, CheckOutcome, TriggerAction};
pub use config::{EngineConfig, OverrideStoreConfig, PerceptionConfig};
pub use detection::{DetectionReason, DetectionResult, DetectionState};
pub use entity::{Entity, EntityId, Position};
pub use errors::{ConfigError, ConfigResult};
pub use pair::{PairKey, RollId};
pub use policy::{AmbientThresholds, PrivacyPolicy};
pub use sense::{Acuity, Sense, SenseProfile, SenseType};
pub use upgrade::{SeekUpgradeTables, UpgradeTable};
