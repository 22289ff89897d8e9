//! World shape: dimensions, per-axis wrapping, and the mapping from a circle
//! around a point to the patch index ranges that may intersect it.
//!
//! Patch centers sit on the integers `0..width` × `0..height`; patch `(px, py)`
//! covers `[px - 0.5, px + 0.5) × [py - 0.5, py + 0.5)`. The flattened patch
//! array is row-major: `index = py * width + px`.

use std::ops::Range;

use smallvec::{smallvec, SmallVec};

/// Index ranges `[start, end)` into the flattened patch array.
pub type Region = SmallVec<[Range<usize>; 8]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Topology {
    width: i32,
    height: i32,
    wrap_x: bool,
    wrap_y: bool,
}

impl Topology {
    /// Dimensions are clamped to at least one patch per axis.
    pub fn new(width: i32, height: i32, wrap_x: bool, wrap_y: bool) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            wrap_x,
            wrap_y,
        }
    }

    pub fn torus(width: i32, height: i32) -> Self {
        Self::new(width, height, true, true)
    }

    pub fn bounded(width: i32, height: i32) -> Self {
        Self::new(width, height, false, false)
    }

    pub fn width(&self) -> i32 { self.width }
    pub fn height(&self) -> i32 { self.height }
    pub fn wrap_x(&self) -> bool { self.wrap_x }
    pub fn wrap_y(&self) -> bool { self.wrap_y }

    pub fn patch_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn index_of(&self, pxcor: i32, pycor: i32) -> usize {
        pycor as usize * self.width as usize + pxcor as usize
    }

    /// The column or row whose cell contains coordinate `c`.
    pub fn cell_of(c: f64) -> i64 {
        (c + 0.5).floor() as i64
    }

    /// Bring `x` into `[-0.5, width - 0.5)`. `None` when the x axis does not
    /// wrap and `x` is outside that interval.
    pub fn wrap_xcor(&self, x: f64) -> Option<f64> {
        wrap_axis(x, self.width, self.wrap_x)
    }

    pub fn wrap_ycor(&self, y: f64) -> Option<f64> {
        wrap_axis(y, self.height, self.wrap_y)
    }

    /// Resolve a point to the patch index containing it, wrapping as the
    /// topology allows.
    pub fn patch_index_at(&self, x: f64, y: f64) -> Option<usize> {
        let x = self.wrap_xcor(x)?;
        let y = self.wrap_ycor(y)?;
        let px = Self::cell_of(x).clamp(0, self.width as i64 - 1) as i32;
        let py = Self::cell_of(y).clamp(0, self.height as i64 - 1) as i32;
        Some(self.index_of(px, py))
    }

    /// Index ranges covering every patch whose cell intersects the circle of
    /// `radius` around `(x, y)`. Conservative: the bounding square is used, so
    /// corner patches outside the circle may be included.
    ///
    /// Ranges are ascending within each row band and contiguous ranges are
    /// merged; a fully covered wrapping world yields a single range.
    pub fn region(&self, x: f64, y: f64, radius: f64) -> Region {
        let cols = axis_segments(
            Self::cell_of(x - radius),
            Self::cell_of(x + radius),
            self.width as i64,
            self.wrap_x,
        );
        let rows = axis_segments(
            Self::cell_of(y - radius),
            Self::cell_of(y + radius),
            self.height as i64,
            self.wrap_y,
        );

        let width = self.width as usize;
        let mut region: Region = SmallVec::new();
        for &(r0, r1) in &rows {
            for row in r0..=r1 {
                for &(c0, c1) in &cols {
                    let start = row as usize * width + c0 as usize;
                    let end = row as usize * width + c1 as usize + 1;
                    match region.last_mut() {
                        Some(last) if last.end == start => last.end = end,
                        _ => region.push(start..end),
                    }
                }
            }
        }
        region
    }
}

fn wrap_axis(c: f64, size: i32, wraps: bool) -> Option<f64> {
    let size = size as f64;
    if c >= -0.5 && c < size - 0.5 {
        return Some(c);
    }
    if !wraps {
        return None;
    }
    let shifted = (c + 0.5).rem_euclid(size);
    // rem_euclid may round up to `size` for inputs just below a multiple
    let shifted = if shifted >= size { 0.0 } else { shifted };
    Some(shifted - 0.5)
}

/// Inclusive cell segments of `lo..=hi` on one axis, sorted ascending.
fn axis_segments(lo: i64, hi: i64, size: i64, wraps: bool) -> SmallVec<[(i64, i64); 2]> {
    if lo > hi {
        return SmallVec::new();
    }
    if wraps {
        if hi.saturating_sub(lo) >= size - 1 {
            return smallvec![(0, size - 1)];
        }
        let a = lo.rem_euclid(size);
        let b = hi.rem_euclid(size);
        if a <= b {
            smallvec![(a, b)]
        } else {
            smallvec![(0, b), (a, size - 1)]
        }
    } else {
        let a = lo.max(0);
        let b = hi.min(size - 1);
        if a > b {
            SmallVec::new()
        } else {
            smallvec![(a, b)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covered(region: &Region) -> Vec<usize> {
        let mut all: Vec<usize> = region.iter().flat_map(|r| r.clone()).collect();
        all.sort_unstable();
        all
    }

    /// Distance from a point to the nearest point of a patch cell, along one axis.
    fn axis_gap(c: f64, cell: f64) -> f64 {
        ((c - cell).abs() - 0.5).max(0.0)
    }

    #[test]
    fn test_region_small_radius_is_one_patch() {
        let topo = Topology::bounded(10, 10);
        let region = topo.region(4.0, 4.0, 0.2);
        assert_eq!(covered(&region), vec![topo.index_of(4, 4)]);
    }

    #[test]
    fn test_region_wrapping_splits_columns() {
        let topo = Topology::torus(10, 10);
        let region = topo.region(0.0, 5.0, 1.0);
        let cells = covered(&region);
        for px in [9, 0, 1] {
            for py in [4, 5, 6] {
                assert!(cells.contains(&topo.index_of(px, py)), "missing ({px}, {py})");
            }
        }
        assert_eq!(cells.len(), 9);
    }

    #[test]
    fn test_region_bounded_world_clamps_at_edges() {
        let topo = Topology::bounded(10, 10);
        let cells = covered(&topo.region(0.0, 0.0, 1.0));
        assert_eq!(cells.len(), 4, "only the in-world quarter of the square survives");
        assert!(cells.contains(&topo.index_of(1, 1)));
    }

    #[test]
    fn test_region_larger_than_world_covers_everything_once() {
        let topo = Topology::torus(7, 5);
        let region = topo.region(3.0, 2.0, 40.0);
        assert_eq!(region.len(), 1, "full coverage should merge into one range");
        assert_eq!(region[0], 0..35);
    }

    #[test]
    fn test_region_ranges_do_not_overlap() {
        let topo = Topology::new(12, 9, true, false);
        let region = topo.region(11.3, 4.2, 3.7);
        let cells = covered(&region);
        let mut deduped = cells.clone();
        deduped.dedup();
        assert_eq!(cells, deduped);
    }

    #[test]
    fn test_region_covers_every_intersecting_patch() {
        let mut rng = fastrand::Rng::with_seed(7);
        for (wrap_x, wrap_y) in [(false, false), (true, false), (false, true), (true, true)] {
            let topo = Topology::new(11, 8, wrap_x, wrap_y);
            for _ in 0..200 {
                let x = rng.f64() * 11.0 - 0.5;
                let y = rng.f64() * 8.0 - 0.5;
                let radius = rng.f64() * 6.0;
                let cells = covered(&topo.region(x, y, radius));
                for py in 0..8 {
                    for px in 0..11 {
                        let gap = |c: f64, cell: i32, size: i32, wraps: bool| {
                            if wraps {
                                (-1..=1)
                                    .map(|k| axis_gap(c, (cell + k * size) as f64))
                                    .fold(f64::INFINITY, f64::min)
                            } else {
                                axis_gap(c, cell as f64)
                            }
                        };
                        let gx = gap(x, px, 11, wrap_x);
                        let gy = gap(y, py, 8, wrap_y);
                        if (gx * gx + gy * gy).sqrt() <= radius {
                            assert!(
                                cells.contains(&topo.index_of(px, py)),
                                "patch ({px}, {py}) intersects circle at ({x}, {y}) r={radius} but is not in region"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_wrap_coordinates() {
        let topo = Topology::new(10, 6, true, false);
        assert_eq!(topo.wrap_xcor(10.0), Some(0.0));
        assert_eq!(topo.wrap_xcor(-1.0), Some(9.0));
        assert_eq!(topo.wrap_xcor(9.4), Some(9.4));
        assert_eq!(topo.wrap_ycor(5.6), None);
        assert_eq!(topo.wrap_ycor(-0.5), Some(-0.5));
        assert_eq!(topo.patch_index_at(-0.6, 0.0), Some(topo.index_of(9, 0)));
    }
}
