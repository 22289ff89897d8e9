use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub const WORLD_CONFIG_PATH: &str = "assets/world_config.ron";

/// World shape and simulation parameters, loaded once at startup.
///
/// Changing the shape mid-run would invalidate every patch index, so there is
/// no hot reload.
#[derive(Resource, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    // World shape
    pub width: i32,
    pub height: i32,
    pub wrap_x: bool,
    pub wrap_y: bool,
    /// Extra breeds besides the default `turtles`.
    pub breeds: Vec<String>,

    // Population
    pub initial_turtles: usize,
    pub seed: u64,

    // Ticking
    pub tick_rate: f64,
    pub wander_step: f64,
    /// Maximum random turn per tick, in degrees either way.
    pub wander_turn: f64,

    // Neighbor survey
    pub survey_radius: f64,
    pub survey_cone_angle: f64,
    /// How many turtles run queries each tick.
    pub survey_sample: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            wrap_x: true,
            wrap_y: true,
            breeds: vec!["wolves".to_string(), "sheep".to_string()],
            initial_turtles: 500,
            seed: 0x5EED,
            tick_rate: 30.0,
            wander_step: 0.5,
            wander_turn: 25.0,
            survey_radius: 5.0,
            survey_cone_angle: 90.0,
            survey_sample: 32,
        }
    }
}

impl WorldConfig {
    pub fn from_ron(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(ron::from_str::<WorldConfig>(contents)?)
    }

    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Load `path`, falling back to defaults (and logging why) on any failure.
    pub fn load_or_default(path: &str) -> Self {
        match Self::load(path) {
            Ok(config) => {
                info!("Loaded world config from {}", path);
                config
            }
            Err(e) => {
                error!("Failed to load world config from {}: {}", path, e);
                error!("Using default WorldConfig");
                Self::default()
            }
        }
    }
}
