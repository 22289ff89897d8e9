use bevy::prelude::*;

use super::agents::{normalize_heading, AgentRef, BreedId, Breeds, Patch, PatchId, Turtle, TurtleId};
use super::config::WorldConfig;
use super::errors::WorldError;
use super::protractor::Protractor;
use super::roots::RootTable;
use super::topology::Topology;

/// The patch grid and the turtles living on it.
///
/// # Layout
///
/// - Patches are stored row-major (`index = pycor * width + pxcor`) and never
///   move; each keeps the list of turtles currently standing on it.
/// - Turtles live in a slot vector indexed by their id. A dead turtle leaves
///   an empty slot so ids are never reused.
///
/// Neighbor queries (`in_radius`, `in_cone`, `in_radius_simple`) are
/// implemented in [`neighbors`](super::neighbors) and only read this state.
#[derive(Resource, Clone, Debug)]
pub struct PatchWorld {
    topology: Topology,
    protractor: Protractor,
    roots: RootTable,
    pub(crate) patches: Vec<Patch>,
    pub(crate) turtles: Vec<Option<Turtle>>,
    breeds: Breeds,
    live_turtles: usize,
}

impl PatchWorld {
    pub fn new(topology: Topology) -> Self {
        let patches = (0..topology.height())
            .flat_map(|py| (0..topology.width()).map(move |px| (px, py)))
            .enumerate()
            .map(|(idx, (px, py))| Patch::new(PatchId(idx), px, py))
            .collect();

        Self {
            topology,
            protractor: Protractor::new(topology),
            roots: RootTable::new(topology.width(), topology.height()),
            patches,
            turtles: Vec::new(),
            breeds: Breeds::default(),
            live_turtles: 0,
        }
    }

    /// Build an empty world shaped by `config`, with its breeds registered.
    pub fn from_config(config: &WorldConfig) -> Self {
        let mut world = Self::new(Topology::new(
            config.width,
            config.height,
            config.wrap_x,
            config.wrap_y,
        ));
        for name in &config.breeds {
            world.register_breed(name);
        }
        world
    }

    pub fn topology(&self) -> &Topology { &self.topology }
    pub fn protractor(&self) -> &Protractor { &self.protractor }
    pub fn roots(&self) -> &RootTable { &self.roots }
    pub fn breeds(&self) -> &Breeds { &self.breeds }

    pub fn register_breed(&mut self, name: &str) -> BreedId {
        self.breeds.register(name)
    }

    pub fn breed_named(&self, name: &str) -> Option<BreedId> {
        self.breeds.named(name)
    }

    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }

    pub fn turtle_count(&self) -> usize {
        self.live_turtles
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn patch(&self, id: PatchId) -> Result<&Patch, WorldError> {
        self.patches.get(id.0).ok_or(WorldError::UnknownPatch(id))
    }

    pub fn turtle(&self, id: TurtleId) -> Result<&Turtle, WorldError> {
        self.turtles
            .get(id.slot())
            .and_then(Option::as_ref)
            .ok_or(WorldError::UnknownTurtle(id))
    }

    /// Live turtles in id order.
    pub fn turtles(&self) -> impl Iterator<Item = &Turtle> {
        self.turtles.iter().flatten()
    }

    pub fn patch_at(&self, x: f64, y: f64) -> Option<PatchId> {
        self.topology.patch_index_at(x, y).map(PatchId)
    }

    /// Patch coordinates by `(pxcor, pycor)`, wrapping on wrapping axes.
    pub fn patch_xy(&self, pxcor: i32, pycor: i32) -> Option<PatchId> {
        self.patch_at(pxcor as f64, pycor as f64)
    }

    pub fn turtles_here(&self, patch: PatchId) -> Result<&[TurtleId], WorldError> {
        self.patch(patch).map(Patch::turtles_here)
    }

    /// Coordinates of any agent: patch centers for patches.
    pub fn location(&self, agent: AgentRef) -> Result<(f64, f64), WorldError> {
        match agent {
            AgentRef::Patch(id) => {
                let patch = self.patch(id)?;
                Ok((patch.pxcor as f64, patch.pycor as f64))
            }
            AgentRef::Turtle(id) => {
                let turtle = self.turtle(id)?;
                Ok((turtle.x, turtle.y))
            }
        }
    }

    pub fn spawn_turtle(
        &mut self,
        x: f64,
        y: f64,
        heading: f64,
        breed: BreedId,
    ) -> Result<TurtleId, WorldError> {
        let (x, y, patch) = self.resolve_point(x, y)?;
        let id = TurtleId(self.turtles.len() as u64);
        self.turtles.push(Some(Turtle {
            id,
            x,
            y,
            heading: normalize_heading(heading),
            breed,
            patch,
        }));
        self.patches[patch.0].turtles_here.push(id);
        self.live_turtles += 1;
        Ok(id)
    }

    /// Move a turtle, re-homing it when it crosses into another patch. Past a
    /// non-wrapping edge the turtle stays put and `OutOfBounds` is returned.
    pub fn set_xy(&mut self, id: TurtleId, x: f64, y: f64) -> Result<(), WorldError> {
        let (x, y, new_patch) = self.resolve_point(x, y)?;
        let turtle = self.turtle_mut(id)?;
        let old_patch = turtle.patch;
        turtle.x = x;
        turtle.y = y;
        turtle.patch = new_patch;

        if old_patch != new_patch {
            self.patches[old_patch.0].turtles_here.retain(|t| *t != id);
            self.patches[new_patch.0].turtles_here.push(id);
        }
        Ok(())
    }

    pub fn set_heading(&mut self, id: TurtleId, heading: f64) -> Result<(), WorldError> {
        self.turtle_mut(id)?.heading = normalize_heading(heading);
        Ok(())
    }

    /// Turn clockwise by `degrees` (negative turns left).
    pub fn right(&mut self, id: TurtleId, degrees: f64) -> Result<(), WorldError> {
        let turtle = self.turtle_mut(id)?;
        turtle.heading = normalize_heading(turtle.heading + degrees);
        Ok(())
    }

    /// Step `distance` along the current heading.
    pub fn forward(&mut self, id: TurtleId, distance: f64) -> Result<(), WorldError> {
        let turtle = self.turtle(id)?;
        let radians = turtle.heading.to_radians();
        let x = turtle.x + distance * libm::sin(radians);
        let y = turtle.y + distance * libm::cos(radians);
        self.set_xy(id, x, y)
    }

    pub fn die(&mut self, id: TurtleId) -> Result<(), WorldError> {
        let turtle = self
            .turtles
            .get_mut(id.slot())
            .and_then(Option::take)
            .ok_or(WorldError::UnknownTurtle(id))?;
        self.patches[turtle.patch.0].turtles_here.retain(|t| *t != id);
        self.live_turtles -= 1;
        Ok(())
    }

    fn turtle_mut(&mut self, id: TurtleId) -> Result<&mut Turtle, WorldError> {
        self.turtles
            .get_mut(id.slot())
            .and_then(Option::as_mut)
            .ok_or(WorldError::UnknownTurtle(id))
    }

    fn resolve_point(&self, x: f64, y: f64) -> Result<(f64, f64, PatchId), WorldError> {
        let out_of_bounds = || WorldError::OutOfBounds { x, y };
        let wx = self.topology.wrap_xcor(x).ok_or_else(out_of_bounds)?;
        let wy = self.topology.wrap_ycor(y).ok_or_else(out_of_bounds)?;
        let patch = self.topology.patch_index_at(wx, wy).ok_or_else(out_of_bounds)?;
        Ok((wx, wy, PatchId(patch)))
    }
}
