//! # perception-overrides
//!
//! Layered store of manual detection overrides.
//!
//! ## Key Components
//!
//! - [`OverrideArbitrationStore`]: roll > dialog > ambient lookup, TTL
//!   cleanup and a background cleanup timer
//! - [`Override`] / [`OverrideLayer`]: stored records and their layers
//! - [`Clock`]: injectable time source ([`SystemClock`], [`ManualClock`])

#![deny(unsafe_code)]

pub mod clock;
pub mod record;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use record::{Override, OverrideLayer};
pub use store::OverrideArbitrationStore;
