//! Tri-state 3×3 masks for hit-and-miss matching.
//!
//! Cells are stored row-major, so the cell at offset `(dx, dy)` from the
//! center lives at index `4 + dx + 3 * dy`.
use crate::{Raster, DARK, LIGHT};

/// Byte used for "don't care" cells in mask literals.
pub const DONT_CARE_BYTE: u8 = 0xAA;

/// Index of the center cell.
pub const CENTER: usize = 4;

/// Source index for each destination cell of a 90° counter-clockwise turn.
const ROTATE_CCW: [usize; 9] = [2, 5, 8, 1, 4, 7, 0, 3, 6];

/// A single mask cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Dark,
    Light,
    DontCare,
}

impl Cell {
    /// Decode a literal byte: `0x00` dark, `0xFF` light, `0xAA` don't care.
    pub const fn from_byte(b: u8) -> Self {
        match b {
            DARK => Cell::Dark,
            LIGHT => Cell::Light,
            DONT_CARE_BYTE => Cell::DontCare,
            _ => panic!("mask cells must be 0x00, 0xFF or 0xAA"),
        }
    }

    #[inline]
    pub fn accepts(self, px: u8) -> bool {
        match self {
            Cell::Dark => px == DARK,
            Cell::Light => px == LIGHT,
            Cell::DontCare => true,
        }
    }
}

/// Immutable 3×3 hit-and-miss mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Mask([Cell; 9]);

impl Mask {
    /// Build a mask from a row-major byte literal (see [`Cell::from_byte`]).
    pub const fn from_bytes(bytes: [u8; 9]) -> Self {
        let mut cells = [Cell::DontCare; 9];
        let mut i = 0;
        while i < 9 {
            cells[i] = Cell::from_byte(bytes[i]);
            i += 1;
        }
        Mask(cells)
    }

    pub const fn from_cells(cells: [Cell; 9]) -> Self {
        Mask(cells)
    }

    #[inline]
    pub fn cells(&self) -> &[Cell; 9] {
        &self.0
    }

    /// True iff every cell that is not [`Cell::DontCare`] equals the window
    /// pixel at the same index.
    #[inline]
    pub fn matches(&self, window: &[u8; 9]) -> bool {
        self.0
            .iter()
            .zip(window.iter())
            .all(|(cell, &px)| cell.accepts(px))
    }

    /// The mask turned 90° counter-clockwise. The center stays put.
    pub fn rotate(&self) -> Mask {
        let mut cells = [Cell::DontCare; 9];
        for (dst, &src) in cells.iter_mut().zip(ROTATE_CCW.iter()) {
            *dst = self.0[src];
        }
        Mask(cells)
    }

    /// The mask followed by its three successive counter-clockwise rotations.
    pub fn rotations(&self) -> [Mask; 4] {
        let r90 = self.rotate();
        let r180 = r90.rotate();
        let r270 = r180.rotate();
        [*self, r90, r180, r270]
    }

    /// Offsets `(dx, dy)` of the non-center cells marked [`Cell::Dark`].
    pub fn dark_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|&(idx, cell)| idx != CENTER && *cell == Cell::Dark)
            .map(|(idx, _)| cell_offset(idx))
    }
}

/// Offset from the center for a row-major cell index.
#[inline]
pub const fn cell_offset(idx: usize) -> (i32, i32) {
    ((idx % 3) as i32 - 1, (idx / 3) as i32 - 1)
}

/// 3×3 neighborhood centered at `(x, y)`, row-major.
///
/// The caller keeps `(x, y)` at least one pixel away from every edge.
#[inline]
pub fn window(r: &Raster, x: usize, y: usize) -> [u8; 9] {
    let mut out = [0u8; 9];
    for dy in 0..3 {
        let row = (y + dy - 1) * r.w + x - 1;
        out[dy * 3..dy * 3 + 3].copy_from_slice(&r.data[row..row + 3]);
    }
    out
}
