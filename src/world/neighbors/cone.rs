use crate::world::protractor::{plain_distance, plain_towards};
use crate::world::topology::Topology;

/// Is `(x, y)` inside the cone at `(cx, cy)` with the given radius, half-angle
/// and central heading? Distances and bearings do not wrap; callers emulate
/// wrap with [`WorldCopies`].
///
/// The apex itself is always inside.
pub fn is_in_cone(x: f64, y: f64, cx: f64, cy: f64, radius: f64, half_angle: f64, heading: f64) -> bool {
    if x == cx && y == cy {
        return true;
    }
    if plain_distance(cx, cy, x, y) > radius {
        return false;
    }
    let theta = match plain_towards(cx, cy, x, y) {
        Ok(theta) => theta,
        Err(err) => unreachable!("bearing failed after the apex check: {err}"),
    };
    let diff = (theta - heading).abs();
    // 5 and 355 are 10 degrees apart, not 350
    diff <= half_angle || (360.0 - diff) <= half_angle
}

/// A cone anchored at an unreplicated origin.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cone {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub half_angle: f64,
    pub heading: f64,
}

impl Cone {
    pub(crate) fn contains(&self, x: f64, y: f64) -> bool {
        is_in_cone(x, y, self.cx, self.cy, self.radius, self.half_angle, self.heading)
    }
}

/// The periodic copies of the world a cone of `radius` can reach.
///
/// On a wrapping axis the cone may wrap `ceil(radius / size)` times, so copies
/// span `-m..=m` horizontally and `-n..=n` vertically. Non-wrapping axes, or
/// queries that do not wrap, only use the original world.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WorldCopies {
    m: i64,
    n: i64,
    width: f64,
    height: f64,
}

impl WorldCopies {
    pub(crate) fn new(topology: &Topology, radius: f64, wrap: bool) -> Self {
        let width = topology.width() as f64;
        let height = topology.height() as f64;
        let reach = |size: f64, axis_wraps: bool| {
            if wrap && axis_wraps {
                (radius / size).ceil().max(0.0) as i64
            } else {
                0
            }
        };
        Self {
            m: reach(width, topology.wrap_x()),
            n: reach(height, topology.wrap_y()),
            width,
            height,
        }
    }

    /// Coordinate offsets of every copy, the original world included.
    pub(crate) fn offsets(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        (-self.m..=self.m).flat_map(move |ox| {
            (-self.n..=self.n).map(move |oy| (ox as f64 * self.width, oy as f64 * self.height))
        })
    }

    /// Stops at the first copy of `(x, y)` that lies in the cone.
    pub(crate) fn any_in_cone(&self, cone: &Cone, x: f64, y: f64) -> bool {
        self.offsets().any(|(ox, oy)| cone.contains(x + ox, y + oy))
    }

    pub(crate) fn count(&self) -> usize {
        ((2 * self.m + 1) * (2 * self.n + 1)) as usize
    }
}
