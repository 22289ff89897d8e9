//! Distance and bearing between points, with optional toroidal wrap.
//!
//! All arithmetic is plain IEEE-754 `f64` (`+ - * / sqrt` are correctly
//! rounded on every target) and the bearing goes through `libm::atan2`, so
//! results are bit-identical across platforms.

use std::fmt;

use super::topology::Topology;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProtractorError {
    /// A bearing between two identical points is undefined.
    CoincidentPoints,
}

impl fmt::Display for ProtractorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtractorError::CoincidentPoints => {
                write!(f, "no heading is defined from a point to itself")
            }
        }
    }
}

impl std::error::Error for ProtractorError {}

#[derive(Clone, Copy, Debug)]
pub struct Protractor {
    topology: Topology,
}

impl Protractor {
    pub fn new(topology: Topology) -> Self {
        Self { topology }
    }

    /// Euclidean distance. With `wrap`, each wrapping axis uses the
    /// minimum-image delta.
    pub fn distance(&self, x1: f64, y1: f64, x2: f64, y2: f64, wrap: bool) -> f64 {
        let (dx, dy) = self.deltas(x1, y1, x2, y2, wrap);
        (dx * dx + dy * dy).sqrt()
    }

    /// Heading from `(x1, y1)` towards `(x2, y2)` in `[0, 360)`, 0 = north,
    /// clockwise. With `wrap`, aims at the nearest image of the target.
    pub fn towards(
        &self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        wrap: bool,
    ) -> Result<f64, ProtractorError> {
        let (dx, dy) = self.deltas(x1, y1, x2, y2, wrap);
        if dx == 0.0 && dy == 0.0 {
            return Err(ProtractorError::CoincidentPoints);
        }
        Ok(heading_of(dx, dy))
    }

    /// Signed deltas from the first point to the second.
    fn deltas(&self, x1: f64, y1: f64, x2: f64, y2: f64, wrap: bool) -> (f64, f64) {
        let mut dx = x2 - x1;
        let mut dy = y2 - y1;
        if wrap {
            if self.topology.wrap_x() {
                dx = shortest_delta(dx, self.topology.width() as f64);
            }
            if self.topology.wrap_y() {
                dy = shortest_delta(dy, self.topology.height() as f64);
            }
        }
        (dx, dy)
    }
}

/// Non-wrapping distance; the cone test handles wrap by replicating the world.
pub fn plain_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}

/// Non-wrapping bearing.
pub fn plain_towards(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<f64, ProtractorError> {
    let dx = x2 - x1;
    let dy = y2 - y1;
    if dx == 0.0 && dy == 0.0 {
        return Err(ProtractorError::CoincidentPoints);
    }
    Ok(heading_of(dx, dy))
}

fn heading_of(dx: f64, dy: f64) -> f64 {
    let degrees = libm::atan2(dx, dy).to_degrees();
    if degrees < 0.0 {
        let wrapped = degrees + 360.0;
        // -tiny + 360 rounds to 360
        if wrapped >= 360.0 { 0.0 } else { wrapped }
    } else {
        degrees
    }
}

/// Minimum-image delta on an axis of length `size`.
fn shortest_delta(d: f64, size: f64) -> f64 {
    let d = d % size;
    if d > size / 2.0 {
        d - size
    } else if d < -size / 2.0 {
        d + size
    } else {
        d
    }
}
