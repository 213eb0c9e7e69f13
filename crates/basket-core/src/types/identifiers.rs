//! Typed identifiers.

use std::fmt;
use std::num::TryFromIntError;

use serde::{Deserialize, Serialize};

/// Dense id of a normalized item within one analysis run.
///
/// Ids are assigned in lexicographic order of the item names, so comparing ids
/// is the same as comparing names. This is the canonical item ordering every
/// itemset is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

impl ItemId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Ids are 32-bit, matching the interner's `Spur` keys; an index past
/// `u32::MAX` is rejected rather than wrapped.
impl TryFrom<usize> for ItemId {
    type Error = TryFromIntError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        u32::try_from(index).map(Self)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
