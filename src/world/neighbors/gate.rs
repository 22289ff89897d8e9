use crate::world::agents::Patch;
use crate::world::roots::RootTable;
use crate::world::topology::Topology;

/// Largest possible gap between patch-center distance and turtle distance:
/// each of the two turtles can sit up to `sqrt(2)/2` from its patch center.
pub(crate) const GRID_SLACK: f64 = std::f64::consts::SQRT_2;

/// Where a patch falls relative to the query circle, judged from patch
/// centers only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Band {
    /// No turtle on the patch can be within the radius.
    Outside,
    /// Every turtle on the patch is within the radius.
    Inside,
    /// Turtles need an exact distance check.
    Boundary,
}

/// Lattice-distance filter for turtle candidates, using integer patch
/// offsets and the root table instead of floating-point distance.
pub(crate) struct DistanceGate<'a> {
    roots: &'a RootTable,
    origin_px: i64,
    origin_py: i64,
    width: i64,
    height: i64,
    reduce_x: bool,
    reduce_y: bool,
    inner: f64,
    outer: f64,
}

impl<'a> DistanceGate<'a> {
    pub(crate) fn new(
        topology: &Topology,
        roots: &'a RootTable,
        x: f64,
        y: f64,
        radius: f64,
        wrap: bool,
    ) -> Self {
        Self {
            roots,
            origin_px: Topology::cell_of(x),
            origin_py: Topology::cell_of(y),
            width: topology.width() as i64,
            height: topology.height() as i64,
            reduce_x: wrap && topology.wrap_x(),
            reduce_y: wrap && topology.wrap_y(),
            inner: radius - GRID_SLACK,
            outer: radius + GRID_SLACK,
        }
    }

    /// Distance between the patch center and the origin's patch center,
    /// taking the nearer image on axes the query wraps.
    pub(crate) fn grid_distance(&self, patch: &Patch) -> f64 {
        let mut dx = (patch.pxcor as i64 - self.origin_px).abs();
        if self.reduce_x && dx > self.width / 2 {
            dx = self.width - dx;
        }
        let mut dy = (patch.pycor as i64 - self.origin_py).abs();
        if self.reduce_y && dy > self.height / 2 {
            dy = self.height - dy;
        }
        self.roots.grid_root((dx * dx + dy * dy) as usize)
    }

    pub(crate) fn classify(&self, patch: &Patch) -> Band {
        let g = self.grid_distance(patch);
        if g > self.outer {
            Band::Outside
        } else if g <= self.inner {
            Band::Inside
        } else {
            Band::Boundary
        }
    }
}
