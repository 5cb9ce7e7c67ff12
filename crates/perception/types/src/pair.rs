//! Override keys

use crate::entity::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical key for the relationship between two entities.
///
/// The ids are stored sorted, so `PairKey::new(a, b) == PairKey::new(b, a)`
/// regardless of which side a call site treats as the observer. Overrides
/// recorded from either side of a pair therefore share one entry. Keys are
/// only built through [`PairKey::new`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    low: EntityId,
    high: EntityId,
}

impl PairKey {
    pub fn new(a: &EntityId, b: &EntityId) -> Self {
        if a <= b {
            Self {
                low: a.clone(),
                high: b.clone(),
            }
        } else {
            Self {
                low: b.clone(),
                high: a.clone(),
            }
        }
    }

    /// Both ids, in canonical order
    pub fn members(&self) -> (&EntityId, &EntityId) {
        (&self.low, &self.high)
    }

    pub fn involves(&self, id: &EntityId) -> bool {
        &self.low == id || &self.high == id
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.low, self.high)
    }
}

/// Identifier of one roll or attempt
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RollId(pub String);

impl RollId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for RollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pair_key_display() {
        let key = PairKey::new(&EntityId::new("zombie"), &EntityId::new("archer"));
        assert_eq!(key.to_string(), "archer::zombie");
        assert!(key.involves(&EntityId::new("zombie")));
        assert!(!key.involves(&EntityId::new("rogue")));
    }

    proptest! {
        #[test]
        fn property_pair_key_is_order_independent(a in "[a-z0-9]{1,12}", b in "[a-z0-9]{1,12}") {
            let a = EntityId::new(a);
            let b = EntityId::new(b);
            prop_assert_eq!(PairKey::new(&a, &b), PairKey::new(&b, &a));
        }
    }
}
