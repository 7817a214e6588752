//! Bounded ridge walk.
//!
//! Follows a single chain of dark pixels greedily, never revisiting a pixel,
//! to answer "is this ridge segment at least `limit` steps long" without
//! exploring the full connected component.
use crate::mask::Mask;
use crate::{Point, Raster};
use std::collections::HashSet;

/// Neighbor offsets in probing order: the four axis moves (up, down, left,
/// right) first, then the diagonals.
pub const NEIGHBOR_ORDER: [(i32, i32); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Count the steps a greedy walk can take from `first_step` along dark pixels.
///
/// `start` and every neighbor of `start` that `mask` marks dark are treated as
/// already visited, so the walk cannot fall back into the pattern that
/// spawned it. Moving onto `first_step` itself is not counted.
///
/// The walk stops when no unvisited dark neighbor is left, when the current
/// pixel lies on the outermost row or column, or after `limit` steps.
pub fn trace_length(
    raster: &Raster,
    start: Point,
    first_step: Point,
    mask: &Mask,
    limit: usize,
) -> usize {
    let w = raster.w as i32;
    let h = raster.h as i32;

    let mut visited: HashSet<Point> = HashSet::new();
    visited.insert(start);
    visited.extend(mask.dark_offsets().map(|(dx, dy)| start.offset(dx, dy)));

    let mut current = first_step;
    let mut moves = 0usize;

    while moves < limit {
        visited.insert(current);

        if current.x <= 0 || current.y <= 0 || current.x + 1 >= w || current.y + 1 >= h {
            break;
        }

        let next = NEIGHBOR_ORDER
            .iter()
            .map(|&(dx, dy)| current.offset(dx, dy))
            .find(|p| !visited.contains(p) && raster.is_dark(p.x as usize, p.y as usize));

        match next {
            Some(p) => {
                current = p;
                moves += 1;
            }
            None => break,
        }
    }

    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DARK, LIGHT};

    const ALL_LIGHT: Mask = Mask::from_bytes([0xFF; 9]);

    fn horizontal_line(w: usize, h: usize, y: usize, xs: std::ops::Range<usize>) -> Raster {
        let mut r = Raster::filled(w, h, LIGHT);
        for x in xs {
            r.set(x, y, DARK);
        }
        r
    }

    #[test]
    fn counts_steps_after_the_first_move() {
        let r = horizontal_line(20, 5, 2, 2..9);
        // start (2,2), first step (3,2), then 4..=8 -> 5 steps
        let n = trace_length(&r, Point::new(2, 2), Point::new(3, 2), &ALL_LIGHT, 10);
        assert_eq!(n, 5);
    }

    #[test]
    fn respects_the_limit() {
        let r = horizontal_line(40, 5, 2, 2..30);
        let n = trace_length(&r, Point::new(2, 2), Point::new(3, 2), &ALL_LIGHT, 10);
        assert_eq!(n, 10);
    }

    #[test]
    fn aborts_on_the_raster_edge() {
        let r = horizontal_line(10, 5, 2, 2..10);
        // reaches x = 9 (last column) after 6 steps and stops there
        let n = trace_length(&r, Point::new(2, 2), Point::new(3, 2), &ALL_LIGHT, 50);
        assert_eq!(n, 6);
    }

    #[test]
    fn zero_when_first_step_is_a_dead_end() {
        let r = horizontal_line(10, 5, 2, 2..4);
        let n = trace_length(&r, Point::new(2, 2), Point::new(3, 2), &ALL_LIGHT, 10);
        assert_eq!(n, 0);
    }

    #[test]
    fn mask_dark_cells_are_pre_visited() {
        // Ridge goes right from (3,2) and also continues down from the start's
        // lower neighbor (2,3).
        let mut r = horizontal_line(12, 10, 2, 2..4);
        for y in 3..8 {
            r.set(2, y, DARK);
        }
        let down_arm = Mask::from_bytes([
            0xAA, 0xAA, 0xAA, //
            0xAA, 0x00, 0x00, //
            0xAA, 0x00, 0xAA, //
        ]);
        // (3,2) has (2,3) as a diagonal neighbor; it is pre-visited.
        let n = trace_length(&r, Point::new(2, 2), Point::new(3, 2), &down_arm, 10);
        assert_eq!(n, 0);
        let n = trace_length(&r, Point::new(2, 2), Point::new(3, 2), &ALL_LIGHT, 10);
        assert!(n >= 5);
    }

    #[test]
    fn huge_limit_stops_at_the_ridge_end() {
        let r = horizontal_line(20, 5, 2, 2..9);
        let n = trace_length(&r, Point::new(2, 2), Point::new(3, 2), &ALL_LIGHT, usize::MAX);
        assert_eq!(n, 5);
    }

    #[test]
    fn prefers_axis_moves_over_diagonals() {
        // From (3,2): right (4,2) and diagonal (4,3) are both dark.
        let mut r = horizontal_line(12, 6, 2, 2..5);
        r.set(4, 3, DARK);
        let n = trace_length(&r, Point::new(2, 2), Point::new(3, 2), &ALL_LIGHT, 10);
        // (3,2) -> (4,2) -> (4,3): down is checked before anything else
        assert_eq!(n, 2);
    }
}
