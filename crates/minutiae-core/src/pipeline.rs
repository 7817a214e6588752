//! End-to-end extraction for a single image.
use crate::binarize::binarize_rgb;
use crate::detect::{find_minutiae, MarkerSink, Minutiae};
use crate::thinning::{thin, Skeleton};
use crate::{PipelineParams, RgbView};
#[cfg(feature = "tracing")]
use tracing::info_span;

/// Per-image execution context.
///
/// Carries the label that identifies this image in log output; with the
/// `tracing` feature every stage runs inside a `pipeline` span tagged with it.
#[derive(Clone, Debug)]
pub struct PipelineContext {
    pub label: String,
}

impl PipelineContext {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// Result of running the full pipeline on one image.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    pub skeleton: Skeleton,
    pub minutiae: Minutiae,
}

/// Binarize, thin to a fixpoint, then detect minutiae.
///
/// Accepted minutiae are also reported to `sink`, endings before branches.
pub fn run_pipeline<S: MarkerSink>(
    img: RgbView<'_>,
    params: &PipelineParams,
    ctx: &PipelineContext,
    sink: S,
) -> PipelineOutput {
    #[cfg(feature = "tracing")]
    let _span = info_span!("pipeline", label = %ctx.label).entered();
    #[cfg(not(feature = "tracing"))]
    let _ = ctx;

    let binarized = binarize_rgb(img, params.threshold);
    let skeleton = thin(&binarized);

    #[cfg(feature = "tracing")]
    tracing::info!(passes = skeleton.passes, "ran thinning {} times", skeleton.passes);

    let minutiae = find_minutiae(&skeleton.raster, params, sink);

    #[cfg(feature = "tracing")]
    tracing::info!(
        endings = minutiae.endings.len(),
        branches = minutiae.branches.len(),
        "found {} ending(s), {} branch(es)",
        minutiae.endings.len(),
        minutiae.branches.len()
    );

    PipelineOutput { skeleton, minutiae }
}
