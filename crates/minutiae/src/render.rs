//! Marker rendering on top of the skeleton.

use image::{GrayImage, Rgb, RgbImage};
use minutiae_core::detect::{MarkerSink, MARKER_RADIUS};
use minutiae_core::{MinutiaKind, Point};

pub const ENDING_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const BRANCH_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

/// Marker sink that draws a small circle around every reported minutia.
///
/// Endings are drawn in red and branches in blue, on an RGB copy of the
/// image it was created from. Counts are kept for captions and logs.
pub struct Annotator {
    canvas: RgbImage,
    radius: u32,
    endings: usize,
    branches: usize,
}

impl Annotator {
    pub fn new(canvas: RgbImage) -> Self {
        Self {
            canvas,
            radius: MARKER_RADIUS,
            endings: 0,
            branches: 0,
        }
    }

    /// Start from a grayscale skeleton.
    pub fn from_skeleton(skeleton: &GrayImage) -> Self {
        let mut canvas = RgbImage::new(skeleton.width(), skeleton.height());
        for (dst, src) in canvas.pixels_mut().zip(skeleton.pixels()) {
            *dst = Rgb([src[0]; 3]);
        }
        Self::new(canvas)
    }

    pub fn endings(&self) -> usize {
        self.endings
    }

    pub fn branches(&self) -> usize {
        self.branches
    }

    /// Human-readable counts, e.g. `"3 endings, 1 branch"`.
    pub fn caption(&self) -> String {
        format!(
            "{} ending{}, {} branch{}",
            self.endings,
            if self.endings == 1 { "" } else { "s" },
            self.branches,
            if self.branches == 1 { "" } else { "es" },
        )
    }

    pub fn canvas(&self) -> &RgbImage {
        &self.canvas
    }

    pub fn into_canvas(self) -> RgbImage {
        self.canvas
    }
}

impl MarkerSink for Annotator {
    fn mark(&mut self, point: Point, kind: MinutiaKind) {
        let color = match kind {
            MinutiaKind::Ending => {
                self.endings += 1;
                ENDING_COLOR
            }
            MinutiaKind::Branch => {
                self.branches += 1;
                BRANCH_COLOR
            }
        };
        draw_circle(&mut self.canvas, point, self.radius, color);
    }
}

/// One-pixel-wide circle outline; pixels outside the canvas are skipped.
pub fn draw_circle(canvas: &mut RgbImage, center: Point, radius: u32, color: Rgb<u8>) {
    let r = radius as i32;
    let outer_sq = (r * r + r) as i64;
    let inner_sq = (r * r - r) as i64;
    let w = canvas.width() as i32;
    let h = canvas.height() as i32;

    for dy in -r..=r {
        for dx in -r..=r {
            let d2 = (dx * dx + dy * dy) as i64;
            if d2 > outer_sq || d2 < inner_sq {
                continue;
            }
            let x = center.x + dx;
            let y = center.y + dy;
            if x >= 0 && y >= 0 && x < w && y < h {
                canvas.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn circle_leaves_the_center_untouched() {
        let mut canvas = RgbImage::from_pixel(9, 9, Rgb([0, 0, 0]));
        draw_circle(&mut canvas, Point::new(4, 4), 2, ENDING_COLOR);
        assert_eq!(*canvas.get_pixel(4, 4), Rgb([0, 0, 0]));
        assert_eq!(*canvas.get_pixel(6, 4), ENDING_COLOR);
        assert_eq!(*canvas.get_pixel(4, 2), ENDING_COLOR);
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn circle_is_clipped_at_the_border() {
        let mut canvas = RgbImage::from_pixel(3, 3, Rgb([0, 0, 0]));
        draw_circle(&mut canvas, Point::new(0, 0), 2, BRANCH_COLOR);
        assert_eq!(*canvas.get_pixel(2, 0), BRANCH_COLOR);
    }

    #[test]
    fn annotator_counts_and_colors() {
        let skel = GrayImage::from_pixel(12, 12, Luma([255u8]));
        let mut ann = Annotator::from_skeleton(&skel);
        ann.mark(Point::new(3, 3), MinutiaKind::Ending);
        ann.mark(Point::new(8, 8), MinutiaKind::Branch);
        ann.mark(Point::new(8, 3), MinutiaKind::Ending);
        assert_eq!((ann.endings(), ann.branches()), (2, 1));
        assert_eq!(ann.caption(), "2 endings, 1 branch");
        let canvas = ann.into_canvas();
        assert_eq!(*canvas.get_pixel(5, 3), ENDING_COLOR);
        assert_eq!(*canvas.get_pixel(10, 8), BRANCH_COLOR);
        assert_eq!(*canvas.get_pixel(3, 3), Rgb([255, 255, 255]));
    }
}
