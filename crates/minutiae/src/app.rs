//! Shared application-level helpers for the CLI and examples.
//!
//! These functions wire up I/O (decode image, write the `.dat` report, the
//! annotated PNG and an optional JSON dump) around the extraction pipeline,
//! and run many images in parallel, one independent job per image.

use crate::image::{extract_minutiae_image, skeleton_image};
use crate::render::Annotator;
use crate::report::{write_json, write_report, MinutiaeDump, PointOut};
use anyhow::{Context, Result};
use image::ImageReader;
use minutiae_core::detect::MarkerSink;
use minutiae_core::{Minutia, PipelineContext, PipelineParams};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{error, info, info_span};

/// Images analyzed when no input is given.
pub const DEFAULT_SAMPLES: [&str; 2] = ["sample/fingerprint.png", "sample/fingerprint2.jpg"];

/// Output directory used when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub images: Vec<PathBuf>,
    pub threshold: Option<u32>,
    pub branch_min_len: Option<usize>,
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub output_json: bool,
    pub output_png: Option<bool>,
    pub log_level: Option<String>,
}

impl AnalysisConfig {
    /// Pipeline parameters with config overrides applied.
    pub fn params(&self) -> Result<PipelineParams> {
        let mut params = PipelineParams::default();
        if let Some(t) = self.threshold {
            if t > u8::MAX as u32 {
                anyhow::bail!("threshold must be in 0..=255, got {t}");
            }
            params.threshold = t as u8;
        }
        if let Some(n) = self.branch_min_len {
            if n == 0 {
                anyhow::bail!("branch-min-len must be >= 1");
            }
            params.branch_min_len = n;
        }
        Ok(params)
    }

    /// Configured images, or [`DEFAULT_SAMPLES`] when there are none.
    pub fn inputs(&self) -> Vec<PathBuf> {
        if self.images.is_empty() {
            DEFAULT_SAMPLES.iter().map(PathBuf::from).collect()
        } else {
            self.images.clone()
        }
    }

    pub fn output_options(&self) -> OutputOptions {
        OutputOptions {
            dir: self
                .output_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            png: self.output_png.unwrap_or(true),
            json: self.output_json,
        }
    }
}

/// Where and what to write for every analyzed image.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub dir: PathBuf,
    pub png: bool,
    pub json: bool,
}

/// Outcome of one successfully analyzed image.
#[derive(Debug, Clone)]
pub struct ImageSummary {
    pub image: PathBuf,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub passes: usize,
    pub endings: usize,
    pub branches: usize,
    pub report: PathBuf,
    pub annotated: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

/// Per-image outcomes of a batch, in input order.
pub struct BatchReport {
    pub results: Vec<(PathBuf, Result<ImageSummary>)>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &ImageSummary> {
        self.results.iter().filter_map(|(_, r)| r.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&Path, &anyhow::Error)> {
        self.results
            .iter()
            .filter_map(|(p, r)| r.as_ref().err().map(|e| (p.as_path(), e)))
    }

    pub fn all_failed(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(|(_, r)| r.is_err())
    }
}

/// Base name for output files: the file stem of `path`.
pub fn output_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "anonymous".to_string())
}

/// Decode, extract, render and serialize a single image.
pub fn analyze_image(
    path: &Path,
    params: &PipelineParams,
    out: &OutputOptions,
) -> Result<ImageSummary> {
    let name = output_name(path);
    let _span = info_span!("image", name = %name).entered();

    let img = ImageReader::open(path)
        .with_context(|| format!("opening image {}", path.display()))?
        .decode()
        .with_context(|| format!("decoding image {}", path.display()))?
        .to_rgb8();
    info!("processing {}", path.display());

    let mut markers: Vec<Minutia> = Vec::new();
    let res = extract_minutiae_image(&img, params, &PipelineContext::new(name.clone()), &mut markers);

    let report = write_report(&out.dir, &name, path, &res.minutiae)?;
    info!("output file written: {}", report.display());

    let annotated = if out.png {
        let mut annotator = Annotator::from_skeleton(&skeleton_image(&res));
        for m in &markers {
            annotator.mark(m.point, m.kind);
        }
        info!("{}", annotator.caption());
        let png_out = out.dir.join(format!("{name}.png"));
        annotator
            .canvas()
            .save(&png_out)
            .with_context(|| format!("saving {}", png_out.display()))?;
        Some(png_out)
    } else {
        None
    };

    let json = if out.json {
        let json_out = out.dir.join(format!("{name}.json"));
        let dump = MinutiaeDump {
            image: path.to_string_lossy().into_owned(),
            width: img.width(),
            height: img.height(),
            threshold: params.threshold,
            passes: res.skeleton.passes,
            endings: res.minutiae.endings.iter().map(PointOut::from).collect(),
            branches: res.minutiae.branches.iter().map(PointOut::from).collect(),
        };
        write_json(&json_out, &dump)?;
        Some(json_out)
    } else {
        None
    };

    Ok(ImageSummary {
        image: path.to_path_buf(),
        name,
        width: img.width(),
        height: img.height(),
        passes: res.skeleton.passes,
        endings: res.minutiae.endings.len(),
        branches: res.minutiae.branches.len(),
        report,
        annotated,
        json,
    })
}

fn analyze_logged(path: &Path, params: &PipelineParams, out: &OutputOptions) -> Result<ImageSummary> {
    let res = analyze_image(path, params, out);
    if let Err(e) = &res {
        error!("{}: {e:#}", path.display());
    }
    res
}

/// Analyze every configured image independently.
///
/// A failing image is logged and recorded in the returned report; the other
/// images are still processed. Only invalid configuration is an error here.
pub fn run_batch(cfg: &AnalysisConfig) -> Result<BatchReport> {
    let params = cfg.params()?;
    let out = cfg.output_options();
    let inputs = cfg.inputs();

    #[cfg(feature = "rayon")]
    let results = inputs
        .into_par_iter()
        .map(|p| {
            let r = analyze_logged(&p, &params, &out);
            (p, r)
        })
        .collect();

    #[cfg(not(feature = "rayon"))]
    let results = inputs
        .into_iter()
        .map(|p| {
            let r = analyze_logged(&p, &params, &out);
            (p, r)
        })
        .collect();

    Ok(BatchReport { results })
}

pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let cfg: AnalysisConfig = serde_json::from_reader(file)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let cfg: AnalysisConfig = serde_json::from_str("{}").expect("empty config");
        let params = cfg.params().expect("valid");
        assert_eq!(params.threshold, 0x7F);
        assert_eq!(params.branch_min_len, 10);
        assert_eq!(cfg.inputs().len(), DEFAULT_SAMPLES.len());
        let out = cfg.output_options();
        assert_eq!(out.dir, PathBuf::from("output"));
        assert!(out.png);
        assert!(!out.json);
    }

    #[test]
    fn config_rejects_out_of_range_threshold() {
        let cfg: AnalysisConfig =
            serde_json::from_str(r#"{"threshold": 300}"#).expect("parses");
        assert!(cfg.params().is_err());
        let cfg: AnalysisConfig =
            serde_json::from_str(r#"{"threshold": 200, "images": ["a.png"]}"#).expect("parses");
        assert_eq!(cfg.params().expect("valid").threshold, 200);
        assert_eq!(cfg.inputs(), vec![PathBuf::from("a.png")]);
    }

    #[test]
    fn output_name_is_the_file_stem() {
        assert_eq!(output_name(Path::new("sample/fingerprint2.jpg")), "fingerprint2");
        assert_eq!(output_name(Path::new("print")), "print");
    }
}
