use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

/// Order in which a node emits its neighbors.
///
/// Only changes how the frontier breaks ties, never which neighbors exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NeighborOrder {
    /// Up, down, left, right.
    Forward,
    /// Right, left, down, up.
    Reversed,
}

impl Default for NeighborOrder {
    fn default() -> Self {
        NeighborOrder::Forward
    }
}

impl NeighborOrder {
    pub fn is_reversed(self) -> bool {
        self == NeighborOrder::Reversed
    }
}

impl Display for NeighborOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            NeighborOrder::Forward => write!(f, "forward"),
            NeighborOrder::Reversed => write!(f, "reversed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown neighbor order: {0} (expected forward or reversed)")]
pub struct UnknownOrder(String);

impl FromStr for NeighborOrder {
    type Err = UnknownOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(NeighborOrder::Forward),
            "reversed" => Ok(NeighborOrder::Reversed),
            _ => Err(UnknownOrder(s.to_owned())),
        }
    }
}
