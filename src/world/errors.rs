use std::fmt;

use super::agents::{PatchId, TurtleId};

/// Errors surfaced to the simulation host when it names agents or
/// positions the world cannot resolve.
#[derive(Clone, Debug, PartialEq)]
pub enum WorldError {
    UnknownTurtle(TurtleId),
    UnknownPatch(PatchId),
    /// The point lies past a non-wrapping edge of the world.
    OutOfBounds { x: f64, y: f64 },
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::UnknownTurtle(id) => write!(f, "turtle {} does not exist", id.0),
            WorldError::UnknownPatch(id) => write!(f, "patch index {} is outside the world", id.0),
            WorldError::OutOfBounds { x, y } => {
                write!(f, "point ({x}, {y}) is beyond a non-wrapping world edge")
            }
        }
    }
}

impl std::error::Error for WorldError {}
