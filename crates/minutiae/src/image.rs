//! `image` crate adapters for the extraction pipeline.
//!
//! These wrappers expose the `minutiae-core` stages in terms of
//! `image::RgbImage` and `image::GrayImage`, which is what most callers have
//! after decoding a file.

use image::{GrayImage, RgbImage};
use minutiae_core::binarize::binarize_rgb;
use minutiae_core::detect::MarkerSink;
use minutiae_core::thinning::thin;
use minutiae_core::{run_pipeline, PipelineContext, PipelineOutput, PipelineParams, Raster, RgbView};

#[inline]
fn rgb_view(img: &RgbImage) -> RgbView<'_> {
    RgbView {
        w: img.width() as usize,
        h: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Copy a single-channel raster into a `GrayImage`.
pub fn raster_to_gray(r: &Raster) -> GrayImage {
    GrayImage::from_raw(r.w as u32, r.h as u32, r.data.clone())
        .expect("raster buffer is always w * h bytes")
}

/// Copy a `GrayImage` into a core raster.
pub fn gray_to_raster(img: &GrayImage) -> Raster {
    Raster {
        w: img.width() as usize,
        h: img.height() as usize,
        data: img.as_raw().clone(),
    }
}

/// Binarize an `RgbImage` with the given max-channel threshold.
#[inline]
pub fn binarize_image(img: &RgbImage, threshold: u8) -> GrayImage {
    raster_to_gray(&binarize_rgb(rgb_view(img), threshold))
}

/// Thin a binarized `GrayImage` to its skeleton; also returns the pass count.
pub fn thin_image(binarized: &GrayImage) -> (GrayImage, usize) {
    let skel = thin(&gray_to_raster(binarized));
    (raster_to_gray(&skel.raster), skel.passes)
}

/// Run the whole pipeline on an `RgbImage`.
#[inline]
pub fn extract_minutiae_image<S: MarkerSink>(
    img: &RgbImage,
    params: &PipelineParams,
    ctx: &PipelineContext,
    sink: S,
) -> PipelineOutput {
    run_pipeline(rgb_view(img), params, ctx, sink)
}

/// The skeleton of a pipeline run as a `GrayImage`.
#[inline]
pub fn skeleton_image(out: &PipelineOutput) -> GrayImage {
    raster_to_gray(&out.skeleton.raster)
}
