/// Simulation systems driving the patch world
///
/// This module contains systems responsible for:
/// - Seeding the initial turtle population
/// - Advancing the tick counter
/// - Moving turtles around (random wander)
/// - Surveying neighbors with radius and cone queries

use bevy::prelude::*;
use patchworld_macros::profile;
use rand::rngs::StdRng;
use rand::Rng;

use crate::world::agents::{AgentRef, BreedId, TurtleId};
use crate::world::agentset::SourceSet;
use crate::world::config::WorldConfig;
use crate::world::errors::WorldError;
use crate::world::grid::PatchWorld;

// ============================================================================
// Resources
// ============================================================================

/// Number of fixed ticks run so far.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimTick(pub u64);

/// Seeded generator shared by every random decision, so a run is
/// reproducible from `WorldConfig::seed`.
#[derive(Resource)]
pub struct SimRng(pub StdRng);

/// Running totals from [`survey_neighbors`].
#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct NeighborStats {
    pub queries: u64,
    pub radius_hits: u64,
    pub cone_hits: u64,
    /// Hits from the most recent tick only.
    pub last_radius_hits: u64,
    pub last_cone_hits: u64,
}

// ============================================================================
// Systems
// ============================================================================

/// Scatter `initial_turtles` over the world, cycling through every breed.
pub fn spawn_population(
    mut world: ResMut<PatchWorld>,
    mut rng: ResMut<SimRng>,
    config: Res<WorldConfig>,
) {
    let width = world.topology().width() as f64;
    let height = world.topology().height() as f64;
    let breed_count = world.breeds().len();

    for i in 0..config.initial_turtles {
        let x = rng.0.random_range(-0.5..width - 0.5);
        let y = rng.0.random_range(-0.5..height - 0.5);
        let heading = rng.0.random_range(0.0..360.0);
        let breed = BreedId((i % breed_count) as u16);
        if let Err(e) = world.spawn_turtle(x, y, heading, breed) {
            warn!("Failed to spawn turtle {}: {}", i, e);
        }
    }

    info!(
        "Spawned {} turtles on a {}x{} world (wrap x: {}, wrap y: {})",
        world.turtle_count(),
        world.topology().width(),
        world.topology().height(),
        world.topology().wrap_x(),
        world.topology().wrap_y()
    );
}

pub fn advance_tick(mut tick: ResMut<SimTick>) {
    tick.0 += 1;
}

/// Each turtle turns a random amount and steps forward. A turtle that would
/// leave a non-wrapping world turns around instead.
pub fn wander_turtles(
    mut world: ResMut<PatchWorld>,
    mut rng: ResMut<SimRng>,
    config: Res<WorldConfig>,
) {
    let ids: Vec<TurtleId> = world.turtles().map(|t| t.id()).collect();
    let max_turn = config.wander_turn.abs();

    for id in ids {
        let turn = rng.0.random_range(-max_turn..=max_turn);
        let moved = world
            .right(id, turn)
            .and_then(|_| world.forward(id, config.wander_step));
        match moved {
            Ok(()) => {}
            Err(WorldError::OutOfBounds { .. }) => {
                if let Err(e) = world.right(id, 180.0) {
                    warn!("Turtle {:?} vanished mid-step: {}", id, e);
                }
            }
            Err(e) => warn!("Turtle {:?} could not wander: {}", id, e),
        }
    }
}

/// Run a radius query over all turtles and a cone query over the seer's own
/// breed for a rotating sample of turtles.
#[profile(1000)]
pub fn survey_neighbors(
    world: Res<PatchWorld>,
    config: Res<WorldConfig>,
    mut stats: ResMut<NeighborStats>,
    tick: Res<SimTick>,
) {
    let ids: Vec<(TurtleId, BreedId)> = world.turtles().map(|t| (t.id(), t.breed())).collect();
    if ids.is_empty() {
        return;
    }
    let sample = config.survey_sample.min(ids.len());
    let offset = (tick.0 as usize).wrapping_mul(sample) % ids.len();

    let mut radius_hits = 0u64;
    let mut cone_hits = 0u64;
    for &(id, breed) in ids.iter().cycle().skip(offset).take(sample) {
        match world.in_radius(AgentRef::Turtle(id), &SourceSet::AllTurtles, config.survey_radius, true) {
            Ok(found) => radius_hits += found.len() as u64,
            Err(e) => warn!("Radius survey from {:?} failed: {}", id, e),
        }
        match world.in_cone(
            id,
            &SourceSet::Breed(breed),
            config.survey_radius,
            config.survey_cone_angle,
            true,
        ) {
            Ok(found) => cone_hits += found.len() as u64,
            Err(e) => warn!("Cone survey from {:?} failed: {}", id, e),
        }
    }

    stats.queries += 2 * sample as u64;
    stats.radius_hits += radius_hits;
    stats.cone_hits += cone_hits;
    stats.last_radius_hits = radius_hits;
    stats.last_cone_hits = cone_hits;

    debug!(
        "tick {}: surveyed {} turtles, {} in radius, {} in cone",
        tick.0, sample, radius_hits, cone_hits
    );
    crate::profile_log!(
        tick,
        "[SURVEY] tick {}: {} queries so far, avg {:.2} radius hits",
        tick.0,
        stats.queries,
        radius_hits as f64 / sample as f64
    );
}
