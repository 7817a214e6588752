//! minutiae CLI: batch fingerprint minutiae extraction.

use anyhow::{Context, Result};
use clap::Parser;
use minutiae::app::{load_config, run_batch, AnalysisConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "minutiae")]
#[command(about = "Extract ridge endings and branches from fingerprint images")]
#[command(version)]
struct Cli {
    /// Input images. A leading all-digit argument is taken as the
    /// binarization threshold.
    inputs: Vec<String>,

    /// Binarization threshold (0..=255); pixels brighter than this are background.
    #[arg(long)]
    threshold: Option<u32>,

    /// JSON config file; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for `.dat` reports and annotated images.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Also write a JSON dump per image.
    #[arg(long)]
    json: bool,

    /// Do not write the annotated skeleton PNG.
    #[arg(long)]
    no_png: bool,

    /// Minimum traced length of every branch arm.
    #[arg(long)]
    branch_min_len: Option<usize>,

    /// Log filter used when RUST_LOG is not set (e.g. info, debug).
    #[arg(long)]
    log_level: Option<String>,
}

/// Split a leading numeric threshold off the positional arguments.
fn split_threshold(mut inputs: Vec<String>) -> Result<(Option<u32>, Vec<String>)> {
    match inputs.first() {
        Some(first) if !first.is_empty() && first.bytes().all(|b| b.is_ascii_digit()) => {
            let threshold = first
                .parse()
                .with_context(|| format!("invalid threshold {first:?}"))?;
            inputs.remove(0);
            Ok((Some(threshold), inputs))
        }
        _ => Ok((None, inputs)),
    }
}

fn build_config(cli: Cli) -> Result<AnalysisConfig> {
    let mut cfg = match &cli.config {
        Some(path) => load_config(path)?,
        None => AnalysisConfig::default(),
    };

    let (positional_threshold, inputs) = split_threshold(cli.inputs)?;
    if !inputs.is_empty() {
        cfg.images = inputs.into_iter().map(PathBuf::from).collect();
    }
    if let Some(t) = cli.threshold.or(positional_threshold) {
        cfg.threshold = Some(t);
    }
    if let Some(dir) = cli.output_dir {
        cfg.output_dir = Some(dir);
    }
    if cli.json {
        cfg.output_json = true;
    }
    if cli.no_png {
        cfg.output_png = Some(false);
    }
    if let Some(n) = cli.branch_min_len {
        cfg.branch_min_len = Some(n);
    }
    if let Some(level) = cli.log_level {
        cfg.log_level = Some(level);
    }
    Ok(cfg)
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn main() -> Result<()> {
    let cfg = build_config(Cli::parse())?;
    init_tracing(cfg.log_level.as_deref().unwrap_or("info"));

    let batch = run_batch(&cfg)?;

    for s in batch.succeeded() {
        println!(
            "{}: {} endings, {} branches ({} passes) -> {}",
            s.image.display(),
            s.endings,
            s.branches,
            s.passes,
            s.report.display()
        );
    }
    let failed = batch.failed().count();
    if failed > 0 {
        eprintln!("{failed} image(s) failed");
    }
    if batch.all_failed() {
        anyhow::bail!("no image could be analyzed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("minutiae").chain(args.iter().copied()))
            .expect("valid args")
    }

    #[test]
    fn leading_number_is_the_threshold() {
        let cfg = build_config(parse(&["100", "a.png", "b.jpg"])).expect("config");
        assert_eq!(cfg.threshold, Some(100));
        assert_eq!(cfg.images, vec![PathBuf::from("a.png"), PathBuf::from("b.jpg")]);
    }

    #[test]
    fn flag_threshold_wins() {
        let cfg = build_config(parse(&["--threshold", "50", "90", "a.png"])).expect("config");
        assert_eq!(cfg.threshold, Some(50));
        assert_eq!(cfg.images, vec![PathBuf::from("a.png")]);
    }

    #[test]
    fn no_inputs_fall_back_to_samples() {
        let cfg = build_config(parse(&["--no-png", "--json"])).expect("config");
        assert!(cfg.images.is_empty());
        assert_eq!(cfg.inputs().len(), 2);
        assert_eq!(cfg.output_png, Some(false));
        assert!(cfg.output_json);
    }

    #[test]
    fn paths_with_digits_are_not_thresholds() {
        let (t, rest) = split_threshold(vec!["print2.png".into()]).expect("split");
        assert_eq!(t, None);
        assert_eq!(rest, vec!["print2.png".to_string()]);
    }

    #[test]
    fn oversized_threshold_is_an_error() {
        assert!(split_threshold(vec!["99999999999".into(), "a.png".into()]).is_err());
        assert!(build_config(parse(&["99999999999", "a.png"])).is_err());
    }
}
