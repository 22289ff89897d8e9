//! Neighbor queries: which agents of a source set lie within a radius, or
//! within a radius and a view cone, of a reference agent.
//!
//! # Pipeline
//!
//! 1. **Region** - the topology bounds the query circle by patch index ranges;
//!    those patches are copied into a scratch buffer ([`region`]).
//! 2. **Membership** - the source set is resolved once per query
//!    ([`SourceSet`]), building an id set only for explicit sets.
//! 3. **Distance gate** - for turtle candidates, whole patches are rejected or
//!    accepted from integer patch offsets and the root table ([`gate`]).
//! 4. **Exact test** - remaining candidates get a full distance check, or the
//!    cone test repeated over periodic world copies ([`cone`]).
//!
//! Results are in patch-scan order, and in residency order within a patch.
//! Each agent appears at most once.

use bevy::log::trace;
use patchworld_macros::profile;

use super::agents::{AgentKind, AgentRef, Patch, Turtle, TurtleId};
use super::agentset::SourceSet;
use super::errors::WorldError;
use super::grid::PatchWorld;

mod cone;
mod gate;
mod region;
#[cfg(test)]
mod tests;

pub use cone::is_in_cone;

use cone::{Cone, WorldCopies};
use gate::{Band, DistanceGate};
use region::gather_candidates;

impl PatchWorld {
    /// Agents of `source` within `radius` of `origin`.
    ///
    /// With `wrap`, distance is measured to the nearest image on every
    /// wrapping axis. Patches are tested by their centers; turtles by their
    /// exact coordinates.
    #[profile]
    pub fn in_radius(
        &self,
        origin: AgentRef,
        source: &SourceSet,
        radius: f64,
        wrap: bool,
    ) -> Result<Vec<AgentRef>, WorldError> {
        let (x, y) = self.location(origin)?;
        let membership = source.membership(self.patch_count());
        let candidates = gather_candidates(self, x, y, radius);
        let mut result = Vec::new();

        match source.kind() {
            AgentKind::Patch => {
                for patch in &candidates {
                    if membership.admits_patch(patch.id)
                        && self.protractor().distance(patch.pxcor as f64, patch.pycor as f64, x, y, wrap) <= radius
                    {
                        result.push(AgentRef::Patch(patch.id));
                    }
                }
            }
            AgentKind::Turtle => {
                let gate = DistanceGate::new(self.topology(), self.roots(), x, y, radius, wrap);
                for patch in &candidates {
                    match gate.classify(patch) {
                        Band::Outside => {}
                        Band::Inside => {
                            for turtle in self.residents(patch) {
                                if membership.admits_turtle(turtle) {
                                    result.push(AgentRef::Turtle(turtle.id));
                                }
                            }
                        }
                        Band::Boundary => {
                            for turtle in self.residents(patch) {
                                if membership.admits_turtle(turtle)
                                    && self.protractor().distance(turtle.x, turtle.y, x, y, wrap) <= radius
                                {
                                    result.push(AgentRef::Turtle(turtle.id));
                                }
                            }
                        }
                    }
                }
            }
        }

        trace!(
            "in_radius r={} wrap={} candidates={} matched={}",
            radius,
            wrap,
            candidates.len(),
            result.len()
        );
        Ok(result)
    }

    /// Agents of `source` within `radius` of turtle `origin` and within
    /// `angle / 2` degrees either side of its heading.
    ///
    /// Wrap is emulated by testing periodic copies of each candidate against
    /// the cone at the origin's real position, so a candidate is found when
    /// any copy is visible. The approach assumes a torus; on a non-wrapping
    /// axis only the original world is searched.
    #[profile]
    pub fn in_cone(
        &self,
        origin: TurtleId,
        source: &SourceSet,
        radius: f64,
        angle: f64,
        wrap: bool,
    ) -> Result<Vec<AgentRef>, WorldError> {
        let seer = self.turtle(origin)?;
        let cone = Cone {
            cx: seer.x,
            cy: seer.y,
            radius,
            half_angle: angle / 2.0,
            heading: seer.heading,
        };
        let copies = WorldCopies::new(self.topology(), radius, wrap);
        let membership = source.membership(self.patch_count());
        let candidates = gather_candidates(self, cone.cx, cone.cy, radius);
        let mut result = Vec::new();

        match source.kind() {
            AgentKind::Patch => {
                for patch in &candidates {
                    if membership.admits_patch(patch.id)
                        && copies.any_in_cone(&cone, patch.pxcor as f64, patch.pycor as f64)
                    {
                        result.push(AgentRef::Patch(patch.id));
                    }
                }
            }
            AgentKind::Turtle => {
                let gate = DistanceGate::new(self.topology(), self.roots(), cone.cx, cone.cy, radius, wrap);
                for patch in &candidates {
                    if gate.classify(patch) == Band::Outside {
                        continue;
                    }
                    for turtle in self.residents(patch) {
                        if membership.admits_turtle(turtle) && copies.any_in_cone(&cone, turtle.x, turtle.y) {
                            result.push(AgentRef::Turtle(turtle.id));
                        }
                    }
                }
            }
        }

        trace!(
            "in_cone r={} angle={} copies={} candidates={} matched={}",
            radius,
            angle,
            copies.count(),
            candidates.len(),
            result.len()
        );
        Ok(result)
    }

    /// Reference radius query: walks the whole source set with exact
    /// distances, no region or gate. Patches come back in index order,
    /// turtles in id order.
    pub fn in_radius_simple(
        &self,
        origin: AgentRef,
        source: &SourceSet,
        radius: f64,
        wrap: bool,
    ) -> Result<Vec<AgentRef>, WorldError> {
        let (x, y) = self.location(origin)?;
        let membership = source.membership(self.patch_count());
        let within = |ax: f64, ay: f64| self.protractor().distance(ax, ay, x, y, wrap) <= radius;

        let result = match source.kind() {
            AgentKind::Patch => self
                .patches
                .iter()
                .filter(|patch| membership.admits_patch(patch.id))
                .filter(|patch| within(patch.pxcor as f64, patch.pycor as f64))
                .map(|patch| AgentRef::Patch(patch.id))
                .collect(),
            AgentKind::Turtle => self
                .turtles()
                .filter(|turtle| membership.admits_turtle(turtle))
                .filter(|turtle| within(turtle.x, turtle.y))
                .map(|turtle| AgentRef::Turtle(turtle.id))
                .collect(),
        };
        Ok(result)
    }

    /// Live turtles resident on `patch`, in arrival order.
    fn residents<'w>(&'w self, patch: &'w Patch) -> impl Iterator<Item = &'w Turtle> + 'w {
        patch
            .turtles_here
            .iter()
            .filter_map(move |id| self.turtles.get(id.slot()).and_then(Option::as_ref))
    }
}
