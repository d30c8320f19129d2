//! State keys: the discretized neighborhood of an actuator.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::cell::ContentCode;
use crate::types::{Footprint, Placement, TypeTag};

/// Radius of the observed ring around an actuator's footprint, in cells.
///
/// A larger radius sees further but grows the state space quickly.
pub const RADIUS: u32 = 1;

/// One sampled cell of a state key's ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingCell {
    /// Column offset from the footprint's north-west corner.
    pub dx: i32,
    /// Row offset from the footprint's north-west corner.
    pub dy: i32,
    /// Which side of the footprint the cell lies on, each component in `-1..=1`.
    pub side: (i32, i32),
    pub code: ContentCode,
}

/// Immutable, hashable summary of the cells surrounding an actuator plus the
/// actuator's type.
///
/// The hash is accumulated while sampling and stored; it is never recomputed.
/// Equality always compares the full code sequence, so hash collisions cannot
/// produce false positives.
#[derive(Debug, Clone)]
pub struct StateKey {
    footprint: Footprint,
    type_tag: Option<TypeTag>,
    codes: Box<[ContentCode]>,
    hash: i64,
}

impl StateKey {
    /// The distinguished "nothing nearby" key.
    pub fn empty() -> Self {
        Self {
            footprint: Footprint {
                width: 0,
                height: 0,
            },
            type_tag: None,
            codes: Box::new([]),
            hash: 0,
        }
    }

    /// Samples the ring around `placement` and builds its key.
    ///
    /// `sample` must return [`ContentCode::OUT_OF_BOUNDS`] for coordinates
    /// outside the grid. Cells are visited in scan order: the north strip left
    /// to right, then for each footprint row the west cells followed by the
    /// east cells, then the south strip left to right.
    ///
    /// A ring in which every cell is vacant yields [`StateKey::empty`].
    pub fn build<F>(placement: &Placement, type_tag: &TypeTag, mut sample: F) -> Self
    where
        F: FnMut(i32, i32) -> ContentCode,
    {
        let footprint = placement.footprint;
        let mut hash = (footprint.width as i64)
            .wrapping_add(footprint.height as i64)
            .wrapping_add(type_tag.tag_hash());

        let mut codes = Vec::with_capacity(footprint.ring_len(RADIUS));
        for (dx, dy) in ring_offsets(footprint) {
            let code = sample(placement.x + dx, placement.y + dy);
            hash = hash.wrapping_add(code.value() as i64);
            codes.push(code);
        }

        if codes.iter().all(ContentCode::is_vacant) {
            return Self::empty();
        }

        Self {
            footprint,
            type_tag: Some(type_tag.clone()),
            codes: codes.into_boxed_slice(),
            hash,
        }
    }

    /// True for the "nothing nearby" key.
    pub fn is_empty(&self) -> bool {
        self.type_tag.is_none()
    }

    /// The precomputed hash.
    pub fn hash_code(&self) -> i64 {
        self.hash
    }

    pub fn footprint(&self) -> Footprint {
        self.footprint
    }

    pub fn type_tag(&self) -> Option<&TypeTag> {
        self.type_tag.as_ref()
    }

    /// Content codes in scan order.
    pub fn codes(&self) -> &[ContentCode] {
        &self.codes
    }

    /// Number of ring cells with at least one occupant.
    pub fn occupied_cells(&self) -> usize {
        self.codes.iter().filter(|c| !c.is_vacant()).count()
    }

    /// The ring cells with their offsets, in scan order.
    pub fn ring_cells(&self) -> impl Iterator<Item = RingCell> + '_ {
        let (w, h) = (self.footprint.width as i32, self.footprint.height as i32);
        ring_offsets(self.footprint)
            .zip(self.codes.iter())
            .map(move |((dx, dy), &code)| RingCell {
                dx,
                dy,
                side: (side_of(dx, w), side_of(dy, h)),
                code,
            })
    }
}

/// Offsets of the ring cells relative to the footprint's north-west corner.
fn ring_offsets(footprint: Footprint) -> impl Iterator<Item = (i32, i32)> {
    let r = RADIUS as i32;
    let (w, h) = (footprint.width as i32, footprint.height as i32);

    let north = (-r..0).flat_map(move |y| (-r..w + r).map(move |x| (x, y)));
    let sides = (0..h).flat_map(move |y| (-r..0).chain(w..w + r).map(move |x| (x, y)));
    let south = (h..h + r).flat_map(move |y| (-r..w + r).map(move |x| (x, y)));

    north.chain(sides).chain(south)
}

fn side_of(offset: i32, extent: i32) -> i32 {
    if offset < 0 {
        -1
    } else if offset >= extent {
        1
    } else {
        0
    }
}

fn write_code(
    f: &mut fmt::Formatter<'_>,
    codes: &mut std::slice::Iter<'_, ContentCode>,
) -> fmt::Result {
    match codes.next() {
        Some(c) => write!(f, "{:4} ", c.value()),
        None => write!(f, "   ? "),
    }
}

impl PartialEq for StateKey {
    fn eq(&self, other: &Self) -> bool {
        if self.hash != other.hash {
            return false;
        }
        self.type_tag == other.type_tag
            && self.footprint == other.footprint
            && self.codes == other.codes
    }
}

impl Eq for StateKey {}

impl Hash for StateKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i64(self.hash);
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(tag) = &self.type_tag else {
            return write!(f, "Code: 0 [Empty State]");
        };
        writeln!(f, "Hash Code:{} Type: {}", self.hash, tag)?;
        writeln!(f, "Cells:")?;

        let r = RADIUS as usize;
        let (w, h) = (self.footprint.width as usize, self.footprint.height as usize);
        let mut codes = self.codes.iter();

        for _ in 0..r {
            for _ in 0..(2 * r + w) {
                write_code(f, &mut codes)?;
            }
            writeln!(f)?;
        }
        for _ in 0..h {
            for _ in 0..r {
                write_code(f, &mut codes)?;
            }
            for _ in 0..w {
                write!(f, "xxxx ")?;
            }
            for _ in 0..r {
                write_code(f, &mut codes)?;
            }
            writeln!(f)?;
        }
        for _ in 0..r {
            for _ in 0..(2 * r + w) {
                write_code(f, &mut codes)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
