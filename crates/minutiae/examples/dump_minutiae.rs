use anyhow::Context;
use image::ImageReader;
use minutiae::report::{write_json, MinutiaeDump, PointOut};
use minutiae::{
    extract_minutiae_image, skeleton_image, Annotator, MarkerSink, PipelineContext, PipelineParams,
};
use std::path::PathBuf;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let input: PathBuf = args
        .next()
        .context("usage: dump_minutiae <image> [--threshold N]")?
        .into();

    let mut params = PipelineParams::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--threshold" => {
                let v = args
                    .next()
                    .context("expected an integer after --threshold")?;
                params.threshold = v
                    .parse()
                    .context("could not parse threshold (use integer 0..=255)")?;
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    let img = ImageReader::open(&input)?.decode()?.to_rgb8();

    let started = Instant::now();
    let res = extract_minutiae_image(&img, &params, &PipelineContext::new("dump"), ());
    let ms = started.elapsed().as_secs_f64() * 1000.0;

    println!("image {}x{} pixels", img.width(), img.height());
    println!("pipeline: {:5.2} ms ({} thinning passes)", ms, res.skeleton.passes);
    println!(
        "Detected {} endings, {} branches (threshold={})",
        res.minutiae.endings.len(),
        res.minutiae.branches.len(),
        params.threshold
    );

    let json_out = input.with_extension("minutiae.json");
    let dump = MinutiaeDump {
        image: input.to_string_lossy().into_owned(),
        width: img.width(),
        height: img.height(),
        threshold: params.threshold,
        passes: res.skeleton.passes,
        endings: res.minutiae.endings.iter().map(PointOut::from).collect(),
        branches: res.minutiae.branches.iter().map(PointOut::from).collect(),
    };
    write_json(&json_out, &dump)?;
    println!("Saved JSON dump to {}", json_out.display());

    let mut vis = Annotator::from_skeleton(&skeleton_image(&res));
    for m in res.minutiae.iter() {
        vis.mark(m.point, m.kind);
    }
    let out = input.with_extension("minutiae.png");
    vis.canvas().save(&out)?;
    println!("Saved visualization to {}", out.display());

    Ok(())
}
