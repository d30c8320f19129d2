//! Core types shared by the controller: compass directions, actuator
//! footprints and placements, and actuator type tags.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Power setting of an actuator. `0` means switched off.
pub type Power = u8;

/// Highest power setting an actuator accepts.
pub const MAX_POWER: Power = 4;

/// Facing direction of an actuator on the 8-point compass.
///
/// Grid `y` grows southwards, so [`Direction::North`] points to `-y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// Returns all directions in clockwise order starting at north.
    pub fn all() -> [Direction; 8] {
        [
            Direction::North,
            Direction::NorthEast,
            Direction::East,
            Direction::SouthEast,
            Direction::South,
            Direction::SouthWest,
            Direction::West,
            Direction::NorthWest,
        ]
    }

    /// Returns the index of this direction in [`Direction::all`].
    pub fn index(&self) -> usize {
        match self {
            Direction::North => 0,
            Direction::NorthEast => 1,
            Direction::East => 2,
            Direction::SouthEast => 3,
            Direction::South => 4,
            Direction::SouthWest => 5,
            Direction::West => 6,
            Direction::NorthWest => 7,
        }
    }

    /// Grid step `(dx, dy)` for this direction.
    pub fn vector(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// True if a cell lying on `side` (each component in `-1..=1`) is in the
    /// half-plane this direction faces.
    pub fn faces(&self, side: (i32, i32)) -> bool {
        let (vx, vy) = self.vector();
        vx * side.0 + vy * side.1 > 0
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::North => "N",
            Direction::NorthEast => "NE",
            Direction::East => "E",
            Direction::SouthEast => "SE",
            Direction::South => "S",
            Direction::SouthWest => "SW",
            Direction::West => "W",
            Direction::NorthWest => "NW",
        };
        write!(f, "{}", s)
    }
}

/// Size of an actuator in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Footprint {
    pub width: u32,
    pub height: u32,
}

impl Footprint {
    /// Creates a footprint. Both dimensions are clamped to at least one cell.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// A single-cell footprint.
    pub fn unit() -> Self {
        Self::new(1, 1)
    }

    /// Number of cells in the ring of the given radius around this footprint.
    pub fn ring_len(&self, radius: u32) -> usize {
        let (r, w, h) = (radius as usize, self.width as usize, self.height as usize);
        4 * r * r + 2 * r * h + 2 * r * w
    }
}

/// Where an actuator sits on the grid: its footprint and the grid cell of its
/// north-west corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub footprint: Footprint,
    pub x: i32,
    pub y: i32,
}

impl Placement {
    pub fn new(footprint: Footprint, x: i32, y: i32) -> Self {
        Self { footprint, x, y }
    }

    /// True if the grid cell `(x, y)` is covered by the footprint.
    pub fn covers(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x + self.footprint.width as i32
            && y < self.y + self.footprint.height as i32
    }
}

/// Identifies the kind of an actuator (e.g. a fan versus a vacuum).
///
/// The tag hash is computed once and feeds the state key hash.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeTag {
    name: String,
    hash: i64,
}

impl TypeTag {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        // Truncated to 32 bits so summing it with cell codes stays well away
        // from the i64 range.
        let hash = (hasher.finish() & 0xFFFF_FFFF) as i64;
        Self { name, hash }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity hash of this tag.
    pub fn tag_hash(&self) -> i64 {
        self.hash
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
