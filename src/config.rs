//! Simulation tunables
//!
//! Everything a level designer might want to adjust without touching sim
//! code. Loaded from JSON by the demo binary; library callers can construct
//! one directly.

use serde::{Deserialize, Serialize};

use crate::consts;

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Grid width in cells
    pub grid_width: i32,
    /// Grid height in cells
    pub grid_height: i32,
    /// World-space size of one cell
    pub cell_size: f32,

    /// Seconds per cell traversed
    pub move_duration: f32,
    /// Movement-progress fraction below which a turn applies immediately
    pub early_turn_window: f32,

    /// Segments in a fresh snake (at least 2; the chain-shift rule needs a
    /// body behind the head)
    pub initial_snake_length: usize,

    /// Score per food item
    pub food_score: u32,
    /// Snake length that makes the special item appear
    pub special_item_threshold: usize,

    /// Attempt budget for occupancy-respecting random placement
    pub spawn_attempts: u32,

    /// Obstacles added per level beyond the first
    pub obstacles_per_level: usize,
    /// Hard cap on obstacle count regardless of level
    pub max_obstacles: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_width: consts::GRID_WIDTH,
            grid_height: consts::GRID_HEIGHT,
            cell_size: consts::CELL_SIZE,
            move_duration: consts::MOVE_DURATION,
            early_turn_window: consts::EARLY_TURN_WINDOW,
            initial_snake_length: consts::INITIAL_SNAKE_LENGTH,
            food_score: consts::FOOD_SCORE,
            special_item_threshold: consts::SPECIAL_ITEM_THRESHOLD,
            spawn_attempts: consts::SPAWN_ATTEMPTS,
            obstacles_per_level: consts::OBSTACLES_PER_LEVEL,
            max_obstacles: consts::MAX_OBSTACLES,
        }
    }
}

impl SimConfig {
    /// Parse a config from JSON, falling back to defaults for missing fields
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
