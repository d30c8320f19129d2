//! Per-cell content codes.
//!
//! A cell's code is a weighted count of the occupants standing in it. Two cells
//! with the same code are indistinguishable to the learner, so the weights
//! decide how finely the neighborhood is perceived.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer summary of what occupies a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContentCode(pub i32);

impl ContentCode {
    /// Code reported for cells outside the grid.
    ///
    /// Deliberately the same as [`ContentCode::VACANT`]: the edge of the world
    /// looks like empty space.
    pub const OUT_OF_BOUNDS: ContentCode = ContentCode(0);

    /// Code of a cell with no occupants.
    pub const VACANT: ContentCode = ContentCode(0);

    pub fn value(&self) -> i32 {
        self.0
    }

    pub fn is_vacant(&self) -> bool {
        *self == Self::VACANT
    }
}

impl fmt::Display for ContentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of occupant that can stand in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OccupantKind {
    Small,
    Medium,
    Large,
    /// Any occupant the host reports under an unrecognized name.
    Other,
}

impl OccupantKind {
    /// Maps a host-side occupant name to its kind.
    pub fn from_name(name: &str) -> Self {
        match name {
            "small" => OccupantKind::Small,
            "medium" => OccupantKind::Medium,
            "large" => OccupantKind::Large,
            other => {
                tracing::warn!("Unknown occupant type: {}", other);
                OccupantKind::Other
            }
        }
    }
}

/// Weights used to turn a cell's occupants into a [`ContentCode`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellCodec {
    pub small: i32,
    pub medium: i32,
    pub large: i32,
    pub other: i32,
}

impl CellCodec {
    /// Weight contributed by one occupant of the given kind.
    pub fn weight(&self, kind: OccupantKind) -> i32 {
        match kind {
            OccupantKind::Small => self.small,
            OccupantKind::Medium => self.medium,
            OccupantKind::Large => self.large,
            OccupantKind::Other => self.other,
        }
    }

    /// Code for a cell holding the given occupants. Order does not matter.
    pub fn encode<'a, I>(&self, occupants: I) -> ContentCode
    where
        I: IntoIterator<Item = &'a OccupantKind>,
    {
        ContentCode(
            occupants
                .into_iter()
                .fold(0i32, |acc, k| acc.wrapping_add(self.weight(*k))),
        )
    }
}

impl Default for CellCodec {
    fn default() -> Self {
        Self {
            small: 1,
            medium: 10,
            large: 100,
            other: 7,
        }
    }
}
