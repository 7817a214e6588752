//! Fingerprint minutiae extraction on `image` buffers.
//!
//! This crate wraps `minutiae-core` for consumers that already work with the
//! `image` crate and adds the pieces around the core pipeline:
//! - [`image`] – `RgbImage`/`GrayImage` adapters for each pipeline stage.
//! - [`render`] – a marker sink drawing circles on an RGB copy of the skeleton.
//! - [`report`] – the `.dat` text report and a JSON dump of the results.
//! - [`app`] – per-image jobs and the batch runner shared by the CLI and
//!   examples.

pub mod app;
pub mod image;
pub mod render;
pub mod report;

// Re-export the core types most callers need. Lower-level primitives (masks,
// tracer, individual thinning passes) stay reachable through
// `minutiae_core` directly.
pub use minutiae_core::{
    MarkerSink, Minutia, MinutiaKind, Minutiae, PipelineContext, PipelineOutput, PipelineParams,
    Point, Raster,
};

pub use crate::image::{binarize_image, extract_minutiae_image, skeleton_image, thin_image};
pub use crate::render::Annotator;
