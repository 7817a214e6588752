//! Core primitives for extracting fingerprint minutiae from 8‑bit rasters.
//!
//! # Overview
//!
//! The pipeline is strictly sequential and runs once per image:
//!
//! - [`binarize`] – RGB → two-level raster via a max-channel threshold.
//! - [`thinning`] – hit-and-miss thinning, repeated until a pass changes
//!   nothing, producing a 1‑pixel‑wide skeleton.
//! - [`detect`] – ridge ending and ridge branch classification on 3×3
//!   neighborhoods of the skeleton.
//! - [`trace`] – bounded ridge walk used by the branch detector to reject
//!   short, spurious arms.
//!
//! All of them build on the tri-state 3×3 masks in [`mask`]. The
//! [`pipeline`] module glues the stages together.
//!
//! Pixel values follow one convention everywhere: [`DARK`] (`0`) is ridge,
//! [`LIGHT`] (`255`) is background.
//!
//! # Features
//!
//! - `tracing` – emits spans for each stage and per-pass thinning progress
//!   through the `tracing` crate. Results are identical with or without it.

pub mod binarize;
pub mod detect;
pub mod mask;
pub mod pipeline;
pub mod thinning;
pub mod trace;

pub use crate::detect::{MarkerSink, Minutiae};
pub use crate::mask::{Cell, Mask};
pub use crate::pipeline::{run_pipeline, PipelineContext, PipelineOutput};
pub use crate::thinning::Skeleton;

/// Ridge pixel value.
pub const DARK: u8 = 0x00;
/// Background pixel value.
pub const LIGHT: u8 = 0xFF;

/// Tunable parameters for the extraction pipeline.
#[derive(Clone, Debug)]
pub struct PipelineParams {
    /// Pixels whose brightest channel is above this value become background.
    pub threshold: u8,
    /// Minimum traced length (in steps) of every arm of an accepted branch.
    pub branch_min_len: usize,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            threshold: binarize::DEFAULT_THRESHOLD,
            branch_min_len: detect::BRANCH_MIN_LEN,
        }
    }
}

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Kind of a detected minutia.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MinutiaKind {
    /// A ridge terminates.
    Ending,
    /// A ridge splits.
    Branch,
}

/// A detected minutia in skeleton pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Minutia {
    pub point: Point,
    pub kind: MinutiaKind,
}

/// Single-channel raster in row-major layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl Raster {
    /// Raster of the given size with every pixel set to `value`.
    pub fn filled(w: usize, h: usize, value: u8) -> Self {
        Self {
            w,
            h,
            data: vec![value; w * h],
        }
    }

    /// Wrap an owned buffer; `None` if its length is not `w * h`.
    pub fn from_vec(w: usize, h: usize, data: Vec<u8>) -> Option<Self> {
        if data.len() != w * h {
            return None;
        }
        Some(Self { w, h, data })
    }

    /// Pixel value at an integer coordinate.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.at(x, y) == DARK
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.data[y * self.w + x] = value;
    }

    /// Number of ridge pixels.
    pub fn count_dark(&self) -> usize {
        self.data.iter().filter(|&&v| v == DARK).count()
    }
}

/// Borrowed, tightly packed 3‑channel (RGB) image.
#[derive(Clone, Copy, Debug)]
pub struct RgbView<'a> {
    pub w: usize,
    pub h: usize,
    pub data: &'a [u8],
}

impl<'a> RgbView<'a> {
    /// `None` if `data` does not hold exactly `w * h` RGB triplets.
    pub fn from_slice(w: usize, h: usize, data: &'a [u8]) -> Option<Self> {
        if data.len() != w * h * 3 {
            return None;
        }
        Some(Self { w, h, data })
    }

    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.w + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}
