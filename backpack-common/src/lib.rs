#[cfg(test)]
#[macro_use]
mod test_util;

pub mod geometry;
pub mod grid;
pub mod item;
pub mod shape;
pub mod snapshot;

pub use nalgebra;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Fill color used for items whose definition does not name one.
pub const DEFAULT_ITEM_COLOR: &str = "#9f7aea";

/// Stable identity of an item. Survives across sessions, so it is the key of the memory snapshot
/// and the value written into grid occupancy.
#[repr(transparent)]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
