//! Hit-and-miss morphological thinning.
//!
//! One pass applies eight half-steps, alternating two structuring elements
//! over their four counter-clockwise rotations:
//! `(A, 0°), (B, 0°), (A, 90°), (B, 90°), …`. Every half-step reads the result
//! of the previous one, so the order matters. Passes are repeated until one
//! leaves the raster untouched.
//!
//! Only pixels with `1 <= x < w - 2` and `1 <= y < h - 2` are ever examined;
//! the rest of the raster is carried through as-is.
use crate::mask::{window, Mask};
use crate::{Raster, DARK, LIGHT};
#[cfg(feature = "tracing")]
use tracing::{debug, instrument, trace};

/// Structuring element A.
pub const THINNING_KERNEL: Mask = Mask::from_bytes([
    0xFF, 0xFF, 0xFF, //
    0xAA, 0x00, 0xAA, //
    0x00, 0x00, 0x00, //
]);

/// Structuring element B.
pub const HIT_AND_MISS_MASK: Mask = Mask::from_bytes([
    0xAA, 0xFF, 0xFF, //
    0x00, 0x00, 0xFF, //
    0x00, 0x00, 0xAA, //
]);

/// Fully thinned raster.
#[derive(Clone, Debug)]
pub struct Skeleton {
    pub raster: Raster,
    /// Number of passes run, including the final one that changed nothing.
    pub passes: usize,
}

/// The eight masks of one pass, in application order.
pub fn pass_schedule() -> [Mask; 8] {
    let a = THINNING_KERNEL.rotations();
    let b = HIT_AND_MISS_MASK.rotations();
    [a[0], b[0], a[1], b[1], a[2], b[2], a[3], b[3]]
}

/// Apply one mask over the interior of `src`, writing into `dst`.
///
/// `dst` must already hold a copy of `src`; pixels outside the scan window
/// keep that value. Returns whether any ridge pixel was removed.
fn half_step(src: &Raster, dst: &mut Raster, mask: &Mask) -> bool {
    let mut changed = false;
    for y in 1..src.h.saturating_sub(2) {
        for x in 1..src.w.saturating_sub(2) {
            let win = window(src, x, y);
            let out = if win[crate::mask::CENTER] != DARK {
                LIGHT
            } else if mask.matches(&win) {
                changed = true;
                LIGHT
            } else {
                DARK
            };
            dst.set(x, y, out);
        }
    }
    changed
}

/// Run a single thinning pass (eight half-steps) over `input`.
///
/// Returns the thinned raster and whether any pixel changed. `input` is left
/// untouched.
pub fn thinning_pass(input: &Raster) -> (Raster, bool) {
    let mut source = input.clone();
    let mut work = input.clone();
    let mut changed = false;

    for mask in pass_schedule().iter() {
        work.data.copy_from_slice(&source.data);
        changed |= half_step(&source, &mut work, mask);
        // commit the half-step; the next one reads what this one wrote
        std::mem::swap(&mut source, &mut work);
    }

    (source, changed)
}

/// Thin a binarized raster down to its skeleton.
///
/// Passes repeat until one reports no change. There is no cap on the number
/// of passes: the two structuring elements are assumed to always converge.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(input), fields(w = input.w, h = input.h))
)]
pub fn thin(input: &Raster) -> Skeleton {
    let mut raster = input.clone();
    let mut passes = 0usize;
    loop {
        let (next, changed) = thinning_pass(&raster);
        raster = next;
        passes += 1;
        #[cfg(feature = "tracing")]
        trace!(pass = passes, changed, dark = raster.count_dark(), "thinning pass");
        if !changed {
            break;
        }
    }

    #[cfg(feature = "tracing")]
    debug!(passes, "thinning converged");

    Skeleton { raster, passes }
}
