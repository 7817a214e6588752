//! Text and JSON reports for extracted minutiae.
//!
//! The `.dat` layout is line oriented:
//!
//! ```text
//! DATE  : 2024.05.01. 13:45:10 +0200
//! SOURCE: /abs/path/to/print.png
//!
//! ENDING: 12 ; 40
//!
//! BRANCH: 30 ; 30
//!
//! ---------- ENDINGS  --------->
//! 0.00000x1.00000e
//! <--------- ENDINGS  ----------
//! ```
//!
//! followed by the same block for branches. The ratio block rescales every
//! point into `[0, 1] x [0, 1]` relative to the bounding box of all endings
//! and branches together, five entries per line.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use minutiae_core::{Minutiae, Point};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const KEY_RUN_DATE: &str = "DATE  ";
const KEY_SRC_PATH: &str = "SOURCE";
const KEY_ENDING: &str = "ENDING";
const KEY_BRANCH: &str = "BRANCH";

const ENDINGS_OPEN: &str = "---------- ENDINGS  --------->";
const ENDINGS_CLOSE: &str = "<--------- ENDINGS  ----------";
const BRANCHES_OPEN: &str = "---------- BRANCHES --------->";
const BRANCHES_CLOSE: &str = "<--------- BRANCHES ----------";

const RATIOS_PER_LINE: usize = 5;

/// Axis-aligned bounding box over a set of points (inclusive).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Bounds {
    /// `None` for an empty point set.
    pub fn of<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let init = Bounds {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        Some(it.fold(init, |b, p| Bounds {
            min_x: b.min_x.min(p.x),
            max_x: b.max_x.max(p.x),
            min_y: b.min_y.min(p.y),
            max_y: b.max_y.max(p.y),
        }))
    }

    /// Position of `p` inside the box, each axis in `[0, 1]`.
    ///
    /// An axis with zero extent maps to `0`.
    pub fn ratio(&self, p: Point) -> (f64, f64) {
        fn axis(v: i32, min: i32, max: i32) -> f64 {
            let len = (max - min) as f64;
            if len > 0.0 {
                (v - min) as f64 / len
            } else {
                0.0
            }
        }
        (
            axis(p.x, self.min_x, self.max_x),
            axis(p.y, self.min_y, self.max_y),
        )
    }
}

fn push_ratio_block(
    out: &mut String,
    points: &[Point],
    bounds: &Bounds,
    suffix: char,
    open: &str,
    close: &str,
) {
    if points.is_empty() {
        return;
    }
    out.push('\n');
    out.push_str(open);
    for (i, &p) in points.iter().enumerate() {
        if i % RATIOS_PER_LINE == 0 {
            out.push('\n');
        }
        let (xr, yr) = bounds.ratio(p);
        let _ = write!(out, "{xr:.5}x{yr:.5}{suffix} ");
    }
    out.push('\n');
    out.push_str(close);
}

/// Normalized-coordinate section of the report.
pub fn ratio_section(m: &Minutiae) -> String {
    let mut out = String::new();
    let Some(bounds) = Bounds::of(m.endings.iter().chain(m.branches.iter())) else {
        return out;
    };
    push_ratio_block(&mut out, &m.endings, &bounds, 'e', ENDINGS_OPEN, ENDINGS_CLOSE);
    push_ratio_block(&mut out, &m.branches, &bounds, 'b', BRANCHES_OPEN, BRANCHES_CLOSE);
    out
}

/// Full `.dat` report text. `source` is written as given.
pub fn format_report(source: &Path, m: &Minutiae, run_at: DateTime<Local>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{KEY_RUN_DATE}: {}",
        run_at.format("%Y.%m.%d. %H:%M:%S %z")
    );
    let _ = writeln!(out, "{KEY_SRC_PATH}: {}", source.display());

    if !m.endings.is_empty() {
        out.push('\n');
    }
    for p in &m.endings {
        let _ = writeln!(out, "{KEY_ENDING}: {} ; {}", p.x, p.y);
    }

    if !m.branches.is_empty() {
        out.push('\n');
    }
    for p in &m.branches {
        let _ = writeln!(out, "{KEY_BRANCH}: {} ; {}", p.x, p.y);
    }

    out.push_str(&ratio_section(m));
    out
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("resolving current directory")?;
    Ok(cwd.join(path))
}

/// Write `<out_dir>/<name>.dat`, creating `out_dir` if needed.
pub fn write_report(out_dir: &Path, name: &str, source: &Path, m: &Minutiae) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    let path = out_dir.join(format!("{name}.dat"));
    let text = format_report(&absolute(source)?, m, Local::now());
    std::fs::write(&path, text).with_context(|| format!("writing report {}", path.display()))?;
    Ok(path)
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct PointOut {
    pub x: i32,
    pub y: i32,
}

impl From<&Point> for PointOut {
    fn from(p: &Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// JSON dump of one analyzed image.
#[derive(Serialize)]
pub struct MinutiaeDump {
    pub image: String,
    pub width: u32,
    pub height: u32,
    pub threshold: u8,
    pub passes: usize,
    pub endings: Vec<PointOut>,
    pub branches: Vec<PointOut>,
}

pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let mut json_file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(&mut json_file, value)?;
    json_file.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Minutiae {
        Minutiae {
            endings: vec![
                Point::new(10, 40),
                Point::new(30, 20),
                Point::new(50, 60),
                Point::new(20, 25),
                Point::new(45, 35),
                Point::new(15, 55),
            ],
            branches: vec![Point::new(20, 30), Point::new(40, 50)],
        }
    }

    #[test]
    fn ratios_stay_in_unit_square_and_minimum_maps_to_zero() {
        let m = sample();
        let b = Bounds::of(m.endings.iter().chain(m.branches.iter())).expect("non-empty");
        assert_eq!(
            b,
            Bounds {
                min_x: 10,
                max_x: 50,
                min_y: 20,
                max_y: 60
            }
        );
        for p in m.iter() {
            let (xr, yr) = b.ratio(p.point);
            assert!((0.0..=1.0).contains(&xr) && (0.0..=1.0).contains(&yr));
        }
        assert_eq!(b.ratio(Point::new(10, 40)).0, 0.0);
        assert_eq!(b.ratio(Point::new(30, 20)).1, 0.0);
        assert_eq!(b.ratio(Point::new(50, 60)), (1.0, 1.0));
    }

    #[test]
    fn degenerate_extent_maps_to_zero() {
        let b = Bounds::of([Point::new(5, 7)].iter()).expect("one point");
        assert_eq!(b.ratio(Point::new(5, 7)), (0.0, 0.0));
        assert_eq!(Bounds::of([].iter()), None);
    }

    #[test]
    fn ratio_section_wraps_every_five_entries() {
        let section = ratio_section(&sample());
        let lines: Vec<&str> = section.lines().collect();
        assert_eq!(
            lines,
            vec![
                "",
                ENDINGS_OPEN,
                "0.00000x0.50000e 0.50000x0.00000e 1.00000x1.00000e 0.25000x0.12500e 0.87500x0.37500e ",
                "0.12500x0.87500e ",
                ENDINGS_CLOSE,
                BRANCHES_OPEN,
                "0.25000x0.25000b 0.75000x0.75000b ",
                BRANCHES_CLOSE,
            ]
        );
    }

    #[test]
    fn report_layout() {
        let m = Minutiae {
            endings: vec![Point::new(1, 2)],
            branches: vec![Point::new(3, 4)],
        };
        let at = Local
            .with_ymd_and_hms(2024, 5, 1, 13, 45, 10)
            .single()
            .expect("unambiguous local time");
        let text = format_report(Path::new("/data/print.png"), &m, at);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("DATE  : 2024.05.01. 13:45:10 "));
        assert_eq!(lines[1], "SOURCE: /data/print.png");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "ENDING: 1 ; 2");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "BRANCH: 3 ; 4");
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], ENDINGS_OPEN);
        assert_eq!(lines[8], "0.00000x0.00000e ");
        assert_eq!(lines.last(), Some(&BRANCHES_CLOSE));
    }

    #[test]
    fn empty_results_have_only_a_header() {
        let at = Local::now();
        let text = format_report(Path::new("/x.png"), &Minutiae::default(), at);
        assert_eq!(text.lines().count(), 2);
    }
}
