//! Ridge ending and ridge branch detection on a thinned skeleton.
//!
//! Both detectors scan `y` in `1..h-2` (outer) and `x` in `1..w-2` (inner),
//! so results come out in row-major order and are reproducible.
use crate::mask::{window, Mask, CENTER};
use crate::trace::trace_length;
use crate::{Minutia, MinutiaKind, PipelineParams, Point, Raster, DARK};
#[cfg(feature = "tracing")]
use tracing::{debug, instrument};

/// Minimum traced length of each branch arm.
pub const BRANCH_MIN_LEN: usize = 10;

/// Radius of the marker drawn around an accepted minutia.
pub const MARKER_RADIUS: u32 = 2;

/// Three dark arms meeting at the center; the bottom row is free.
pub const BRANCH_MASK: Mask = Mask::from_bytes([
    0xFF, 0x00, 0xFF, //
    0x00, 0x00, 0x00, //
    0xAA, 0xAA, 0xAA, //
]);

/// Receives every accepted minutia, e.g. to draw a marker around it.
pub trait MarkerSink {
    fn mark(&mut self, point: Point, kind: MinutiaKind);
}

/// Discards all markers.
impl MarkerSink for () {
    #[inline]
    fn mark(&mut self, _point: Point, _kind: MinutiaKind) {}
}

/// Collects markers in the order they are reported.
impl MarkerSink for Vec<Minutia> {
    fn mark(&mut self, point: Point, kind: MinutiaKind) {
        self.push(Minutia { point, kind });
    }
}

impl<S: MarkerSink + ?Sized> MarkerSink for &mut S {
    #[inline]
    fn mark(&mut self, point: Point, kind: MinutiaKind) {
        (**self).mark(point, kind);
    }
}

/// Endings and branches found on one skeleton, each in scan order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Minutiae {
    pub endings: Vec<Point>,
    pub branches: Vec<Point>,
}

impl Minutiae {
    /// Endings first, then branches.
    pub fn iter(&self) -> impl Iterator<Item = Minutia> + '_ {
        let endings = self.endings.iter().map(|&point| Minutia {
            point,
            kind: MinutiaKind::Ending,
        });
        let branches = self.branches.iter().map(|&point| Minutia {
            point,
            kind: MinutiaKind::Branch,
        });
        endings.chain(branches)
    }

    pub fn len(&self) -> usize {
        self.endings.len() + self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endings.is_empty() && self.branches.is_empty()
    }
}

fn interior(r: &Raster) -> impl Iterator<Item = (usize, usize)> {
    let (w, h) = (r.w, r.h);
    (1..h.saturating_sub(2)).flat_map(move |y| (1..w.saturating_sub(2)).map(move |x| (x, y)))
}

/// Whether a 3×3 window is centered on a ridge ending.
///
/// The window (center included) must hold exactly two dark pixels. When the
/// raw count is three, each dark corner is subtracted first, so a dark
/// center with one edge neighbor and one corner neighbor also qualifies.
pub fn is_ending(win: &[u8; 9]) -> bool {
    if win[CENTER] != DARK {
        return false;
    }
    let mut dark = win.iter().filter(|&&px| px == DARK).count();
    if dark == 3 {
        dark -= [0, 2, 6, 8].iter().filter(|&&i| win[i] == DARK).count();
    }
    dark == 2
}

/// The first of `rotations` that matches `win`, if any.
///
/// `rotations` is normally `BRANCH_MASK.rotations()`, built once per scan.
pub fn match_branch_mask(rotations: &[Mask; 4], win: &[u8; 9]) -> Option<Mask> {
    rotations.iter().copied().find(|m| m.matches(win))
}

/// Find ridge endings on a skeleton.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(skeleton, sink), fields(w = skeleton.w, h = skeleton.h))
)]
pub fn find_endings<S: MarkerSink>(skeleton: &Raster, mut sink: S) -> Vec<Point> {
    let mut found = Vec::new();
    for (x, y) in interior(skeleton) {
        if is_ending(&window(skeleton, x, y)) {
            let p = Point::new(x as i32, y as i32);
            sink.mark(p, MinutiaKind::Ending);
            found.push(p);
        }
    }

    #[cfg(feature = "tracing")]
    debug!(count = found.len(), "found {} ending(s)", found.len());

    found
}

/// Whether every arm of a matched branch is at least `min_len` steps long.
fn arms_are_long(skeleton: &Raster, center: Point, mask: &Mask, min_len: usize) -> bool {
    mask.dark_offsets().all(|(dx, dy)| {
        let len = trace_length(skeleton, center, center.offset(dx, dy), mask, min_len);
        len >= min_len
    })
}

/// Find ridge branches on a skeleton.
///
/// A pixel is a candidate when its window matches [`BRANCH_MASK`] in some
/// rotation. The candidate is kept only if the ridge tracer can follow each
/// of the mask's three arms for at least `min_len` steps.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(skeleton, sink), fields(w = skeleton.w, h = skeleton.h))
)]
pub fn find_branches<S: MarkerSink>(skeleton: &Raster, min_len: usize, mut sink: S) -> Vec<Point> {
    let rotations = BRANCH_MASK.rotations();
    let mut found = Vec::new();
    for (x, y) in interior(skeleton) {
        let Some(mask) = match_branch_mask(&rotations, &window(skeleton, x, y)) else {
            continue;
        };
        let p = Point::new(x as i32, y as i32);
        if arms_are_long(skeleton, p, &mask, min_len) {
            sink.mark(p, MinutiaKind::Branch);
            found.push(p);
        }
    }

    #[cfg(feature = "tracing")]
    debug!(count = found.len(), "found {} branch(es)", found.len());

    found
}

/// Run both detectors, endings first.
pub fn find_minutiae<S: MarkerSink>(
    skeleton: &Raster,
    params: &PipelineParams,
    mut sink: S,
) -> Minutiae {
    let endings = find_endings(skeleton, &mut sink);
    let branches = find_branches(skeleton, params.branch_min_len, &mut sink);
    Minutiae { endings, branches }
}
