use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub mod agents;
pub mod agentset;
pub mod config;
pub mod errors;
pub mod grid;
pub mod neighbors;
pub mod protractor;
pub mod roots;
pub mod systems;
pub mod topology;

pub use agents::{AgentKind, AgentRef, BreedId, Patch, PatchId, Turtle, TurtleId};
pub use agentset::SourceSet;
pub use config::{WorldConfig, WORLD_CONFIG_PATH};
pub use errors::WorldError;
pub use grid::PatchWorld;
pub use neighbors::is_in_cone;
pub use protractor::{Protractor, ProtractorError};
pub use roots::RootTable;
pub use systems::{NeighborStats, SimRng, SimTick};
pub use topology::Topology;

/// Headless simulation host for the patch world.
///
/// Uses a pre-inserted [`WorldConfig`] when present, otherwise loads
/// [`WORLD_CONFIG_PATH`]. Turtles are spawned at `Startup`; each fixed tick
/// advances the counter, moves every turtle, and runs a neighbor survey.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        let config = match app.world().get_resource::<WorldConfig>() {
            Some(config) => config.clone(),
            None => WorldConfig::load_or_default(WORLD_CONFIG_PATH),
        };

        app.insert_resource(Time::<Fixed>::from_hz(config.tick_rate))
            .insert_resource(PatchWorld::from_config(&config))
            .insert_resource(SimRng(StdRng::seed_from_u64(config.seed)))
            .insert_resource(config)
            .init_resource::<SimTick>()
            .init_resource::<NeighborStats>()
            .add_systems(Startup, systems::spawn_population)
            .add_systems(
                FixedUpdate,
                (
                    systems::advance_tick,
                    systems::wander_turtles,
                    systems::survey_neighbors,
                )
                    .chain(),
            );
    }
}
