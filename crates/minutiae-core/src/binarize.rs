//! Max-channel threshold binarization.
use crate::{Raster, RgbView, DARK, LIGHT};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Default binarization threshold.
pub const DEFAULT_THRESHOLD: u8 = 0x7F;

#[inline]
fn classify(max: u8, threshold: u8) -> u8 {
    if max > threshold {
        LIGHT
    } else {
        DARK
    }
}

/// Reduce an RGB image to a two-level raster.
///
/// A pixel becomes background ([`LIGHT`]) when its brightest channel is
/// strictly above `threshold`, otherwise it is ridge ([`DARK`]).
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(img), fields(w = img.w, h = img.h))
)]
pub fn binarize_rgb(img: RgbView<'_>, threshold: u8) -> Raster {
    let data = img
        .data
        .chunks_exact(3)
        .map(|px| classify(px[0].max(px[1]).max(px[2]), threshold))
        .collect();
    Raster {
        w: img.w,
        h: img.h,
        data,
    }
}

/// Single-channel variant of [`binarize_rgb`]; the pixel value is its own
/// maximum channel.
pub fn binarize_gray(img: &[u8], w: usize, h: usize, threshold: u8) -> Raster {
    debug_assert_eq!(img.len(), w * h);
    Raster {
        w,
        h,
        data: img.iter().map(|&v| classify(v, threshold)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightest_channel_decides() {
        #[rustfmt::skip]
        let rgb = [
            0, 0, 0,       200, 0, 0,
            0x7F, 0x7F, 0x7F, 0, 0, 0x80,
        ];
        let view = RgbView::from_slice(2, 2, &rgb).expect("2x2 rgb");
        let out = binarize_rgb(view, DEFAULT_THRESHOLD);
        assert_eq!(out.data, vec![DARK, LIGHT, DARK, LIGHT]);
        assert_eq!((out.w, out.h), (2, 2));
    }

    #[test]
    fn rebinarizing_is_idempotent() {
        let src: Vec<u8> = (0..64u32).map(|i| ((i * 37) % 256) as u8).collect();
        let once = binarize_gray(&src, 8, 8, 100);
        for t in [1u8, 17, 0x7F, 200, 253] {
            let twice = binarize_gray(&once.data, 8, 8, t);
            assert_eq!(twice, once, "threshold {t}");
        }
    }

    #[test]
    fn threshold_is_strict() {
        let out = binarize_gray(&[10, 11, 12], 3, 1, 11);
        assert_eq!(out.data, vec![DARK, DARK, LIGHT]);
    }
}
