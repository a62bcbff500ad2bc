//! Game state, phases and events
//!
//! `GameState` owns everything the simulation needs for one run: the grid,
//! the snake, the loaded level, score and progression flags, and the seeded
//! RNG that makes every run reproducible.

use log::{info, warn};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, GridPos};
use super::level::{Level, SNAKE_START_ROW};
use super::snake::{Direction, Snake};
use crate::config::SimConfig;

/// Cell the snake's head starts on; the body extends leftward behind it
const SNAKE_START: GridPos = GridPos::new(2, SNAKE_START_ROW);

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended; terminal until an explicit restart
    GameOver,
    /// Exit reached; terminal until restart or the next level is loaded
    LevelComplete,
}

impl GamePhase {
    /// Whether ticking is over for this run
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::LevelComplete)
    }
}

/// Fire-and-forget notifications for audio/UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { score: u32 },
    FoodEaten,
    SpecialItemUnlocked,
    GameOver { final_score: u32 },
    LevelComplete,
}

/// Complete simulation state for one run
///
/// Not persisted across process runs; serialization stops at the value types
/// it is built from.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: SimConfig,
    pub grid: Grid,
    pub snake: Snake,
    pub level: Level,
    pub phase: GamePhase,
    pub score: u32,
    pub level_number: u32,
    /// A special item is on the board and collectible
    pub special_item_active: bool,
    /// Accumulated sim time; drives decorative animation phases
    pub elapsed: f32,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh Playing state on level 1 with the initial food placed
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let grid = Grid::new(config.grid_width, config.grid_height, config.cell_size);
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut level = Level::new(1, &config);
        level.load(&grid, &mut rng);
        let snake = Self::fresh_snake(&config);
        let mut state = Self {
            seed,
            config,
            grid,
            snake,
            level,
            phase: GamePhase::Playing,
            score: 0,
            level_number: 1,
            special_item_active: false,
            elapsed: 0.0,
            rng,
            events: Vec::new(),
        };
        state.spawn_initial_food();
        info!("new game: seed {seed}, level 1");
        state
    }

    fn fresh_snake(config: &SimConfig) -> Snake {
        Snake::new(
            SNAKE_START,
            Direction::Right,
            config.initial_snake_length,
            config.move_duration,
            config.early_turn_window,
        )
    }

    fn spawn_initial_food(&mut self) {
        if let Err(err) = self.level.spawn_food(&self.grid, &self.snake, &mut self.rng) {
            warn!("initial food spawn failed: {err}");
        }
    }

    /// Reload the current level number with a fresh snake and a locked door
    fn reload_level(&mut self) {
        self.level = Level::new(self.level_number, &self.config);
        self.level.load(&self.grid, &mut self.rng);
        self.snake = Self::fresh_snake(&self.config);
        self.special_item_active = false;
        self.phase = GamePhase::Playing;
        self.spawn_initial_food();
    }

    /// Back to a fresh Playing state: level 1, score 0
    pub fn restart(&mut self) {
        self.score = 0;
        self.level_number = 1;
        self.elapsed = 0.0;
        self.events.clear();
        self.reload_level();
        info!("restart: seed {}, level 1", self.seed);
    }

    /// Load the next level, keeping the score
    pub fn advance_level(&mut self) {
        self.level_number += 1;
        self.reload_level();
        info!("advancing to level {}", self.level_number);
    }

    /// Route a direction intent to the snake; dropped in terminal phases
    pub fn request_direction(&mut self, dir: Direction) {
        if self.phase.is_terminal() {
            return;
        }
        self.snake.request_direction(dir);
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain the events accumulated since the last call, oldest first
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
