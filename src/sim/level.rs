//! Level entities, occupancy and constrained spawning
//!
//! The level owns every static and dynamic entity except the snake: the
//! perimeter wall ring, level-dependent obstacles, at most one food item, at
//! most one special item, and the exit door. `is_occupied` is the single
//! source of truth for whether a cell is free.

use std::collections::HashSet;

use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::{Grid, GridPos};
use super::snake::Snake;
use crate::config::SimConfig;

/// Row the snake spawns on; kept clear of obstacles
pub(crate) const SNAKE_START_ROW: i32 = 2;

/// Occupancy-respecting random placement failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// No free cell found within the attempt budget. Non-fatal: the item
    /// stays absent and the level continues.
    #[error("no free cell found after {attempts} spawn attempts")]
    Exhausted { attempts: u32 },
}

/// The level exit; locked until the special item is collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitDoor {
    pub pos: GridPos,
    pub unlocked: bool,
}

/// Static and dynamic entity registries for one loaded level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    number: u32,
    walls: HashSet<GridPos>,
    obstacles: HashSet<GridPos>,
    food: Option<GridPos>,
    special_item: Option<GridPos>,
    exit_door: Option<ExitDoor>,
    spawn_attempts: u32,
    obstacles_per_level: usize,
    max_obstacles: usize,
}

impl Level {
    pub fn new(number: u32, cfg: &SimConfig) -> Self {
        Self {
            number,
            walls: HashSet::new(),
            obstacles: HashSet::new(),
            food: None,
            special_item: None,
            exit_door: None,
            spawn_attempts: cfg.spawn_attempts,
            obstacles_per_level: cfg.obstacles_per_level,
            max_obstacles: cfg.max_obstacles,
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// The fixed door cell: right edge, vertically centered
    pub fn door_cell(grid: &Grid) -> GridPos {
        GridPos::new(grid.width() - 1, grid.height() / 2)
    }

    /// Build the level's static entities: the perimeter wall ring (skipping
    /// the door cell), the locked exit door, and level-dependent obstacles.
    pub fn load<R: Rng>(&mut self, grid: &Grid, rng: &mut R) {
        self.clear();

        let door = Self::door_cell(grid);
        for pos in grid.positions() {
            let boundary = pos.x == 0
                || pos.z == 0
                || pos.x == grid.width() - 1
                || pos.z == grid.height() - 1;
            if boundary && pos != door {
                self.walls.insert(pos);
            }
        }
        self.exit_door = Some(ExitDoor {
            pos: door,
            unlocked: false,
        });

        if self.number > 1 {
            self.place_obstacles(grid, rng);
        }
        info!(
            "level {} loaded: {} walls, {} obstacles, door at {:?}",
            self.number,
            self.walls.len(),
            self.obstacles.len(),
            door
        );
    }

    /// Scatter obstacles for levels beyond the first, keeping the snake's
    /// starting row and the cell in front of the door clear.
    fn place_obstacles<R: Rng>(&mut self, grid: &Grid, rng: &mut R) {
        let count = (self.number as usize - 1)
            .saturating_mul(self.obstacles_per_level)
            .min(self.max_obstacles);
        let door = Self::door_cell(grid);
        let door_approach = GridPos::new(door.x - 1, door.z);

        for _ in 0..count {
            let mut placed = false;
            for _ in 0..self.spawn_attempts {
                let pos = grid.random_position(rng);
                if self.walls.contains(&pos)
                    || self.obstacles.contains(&pos)
                    || pos == door
                    || pos == door_approach
                    || pos.z == SNAKE_START_ROW
                {
                    continue;
                }
                self.obstacles.insert(pos);
                placed = true;
                break;
            }
            if !placed {
                warn!(
                    "obstacle placement gave up after {} attempts (level {})",
                    self.spawn_attempts, self.number
                );
                break;
            }
        }
    }

    /// Whether `pos` is claimed by any wall, obstacle, item, the door, or a
    /// live snake segment
    pub fn is_occupied(&self, pos: GridPos, snake: &Snake) -> bool {
        self.walls.contains(&pos)
            || self.obstacles.contains(&pos)
            || self.food == Some(pos)
            || self.special_item == Some(pos)
            || self.exit_door.is_some_and(|d| d.pos == pos)
            || snake.cells().any(|c| c == pos)
    }

    /// Rejection-sample a free cell within the attempt budget
    fn find_free_cell<R: Rng>(
        &self,
        grid: &Grid,
        snake: &Snake,
        rng: &mut R,
    ) -> Result<GridPos, SpawnError> {
        for _ in 0..self.spawn_attempts {
            let pos = grid.random_position(rng);
            if !self.is_occupied(pos, snake) {
                return Ok(pos);
            }
        }
        Err(SpawnError::Exhausted {
            attempts: self.spawn_attempts,
        })
    }

    /// Place a new food item on a free cell
    pub fn spawn_food<R: Rng>(
        &mut self,
        grid: &Grid,
        snake: &Snake,
        rng: &mut R,
    ) -> Result<GridPos, SpawnError> {
        debug_assert!(self.food.is_none(), "previous food not consumed");
        let pos = self.find_free_cell(grid, snake, rng)?;
        self.food = Some(pos);
        Ok(pos)
    }

    /// Place the special item on a free cell
    pub fn spawn_special_item<R: Rng>(
        &mut self,
        grid: &Grid,
        snake: &Snake,
        rng: &mut R,
    ) -> Result<GridPos, SpawnError> {
        debug_assert!(self.special_item.is_none(), "special item already placed");
        let pos = self.find_free_cell(grid, snake, rng)?;
        self.special_item = Some(pos);
        Ok(pos)
    }

    pub fn remove_food(&mut self) {
        self.food = None;
    }

    pub fn remove_special_item(&mut self) {
        self.special_item = None;
    }

    /// Idempotent locked-to-unlocked transition; no-op without a door
    pub fn unlock_exit_door(&mut self) {
        if let Some(door) = &mut self.exit_door {
            if !door.unlocked {
                door.unlocked = true;
                info!("exit door unlocked at {:?}", door.pos);
            }
        }
    }

    /// Solid-geometry collision: walls, obstacles, and the door while it is
    /// still locked
    pub fn wall_or_obstacle_hit(&self, pos: GridPos) -> bool {
        self.walls.contains(&pos)
            || self.obstacles.contains(&pos)
            || self.exit_door.is_some_and(|d| !d.unlocked && d.pos == pos)
    }

    pub fn food_hit(&self, pos: GridPos) -> bool {
        self.food == Some(pos)
    }

    pub fn special_item_hit(&self, pos: GridPos) -> bool {
        self.special_item == Some(pos)
    }

    /// Only meaningful while the door is unlocked
    pub fn exit_door_hit(&self, pos: GridPos) -> bool {
        self.exit_door.is_some_and(|d| d.unlocked && d.pos == pos)
    }

    pub fn walls(&self) -> &HashSet<GridPos> {
        &self.walls
    }

    pub fn obstacles(&self) -> &HashSet<GridPos> {
        &self.obstacles
    }

    pub fn food(&self) -> Option<GridPos> {
        self.food
    }

    pub fn special_item(&self) -> Option<GridPos> {
        self.special_item
    }

    pub fn exit_door(&self) -> Option<ExitDoor> {
        self.exit_door
    }

    /// Pin the food to a known cell for deterministic scenarios
    #[cfg(test)]
    pub(crate) fn set_food(&mut self, pos: GridPos) {
        self.food = Some(pos);
    }

    /// Pin the special item to a known cell for deterministic scenarios
    #[cfg(test)]
    pub(crate) fn set_special_item(&mut self, pos: GridPos) {
        self.special_item = Some(pos);
    }

    /// Release every entity and empty the occupancy registries. Safe to call
    /// on an already-empty level.
    pub fn clear(&mut self) {
        self.walls.clear();
        self.obstacles.clear();
        self.food = None;
        self.special_item = None;
        self.exit_door = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::snake::Direction;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn loaded_level(number: u32) -> (Grid, Level, Pcg32) {
        let grid = Grid::new(20, 20, 1.0);
        let cfg = SimConfig::default();
        let mut level = Level::new(number, &cfg);
        let mut rng = Pcg32::seed_from_u64(0x5EED);
        level.load(&grid, &mut rng);
        (grid, level, rng)
    }

    fn test_snake() -> Snake {
        Snake::new(GridPos::new(2, 2), Direction::Right, 3, 0.2, 0.1)
    }

    #[test]
    fn test_perimeter_walls_skip_door() {
        let (grid, level, _) = loaded_level(1);
        // 20x20 boundary has 76 cells; one is the door
        assert_eq!(level.walls().len(), 75);
        let door = Level::door_cell(&grid);
        assert_eq!(door, GridPos::new(19, 10));
        assert!(!level.walls().contains(&door));
        for &wall in level.walls() {
            assert!(
                wall.x == 0 || wall.z == 0 || wall.x == 19 || wall.z == 19,
                "interior cell registered as wall: {wall:?}"
            );
        }
    }

    #[test]
    fn test_first_level_has_no_obstacles() {
        let (_, level, _) = loaded_level(1);
        assert!(level.obstacles().is_empty());
    }

    #[test]
    fn test_obstacles_scale_with_level() {
        let (grid, level, _) = loaded_level(3);
        assert_eq!(level.obstacles().len(), 6);
        let door = Level::door_cell(&grid);
        for &pos in level.obstacles() {
            assert!(grid.is_in_bounds(pos));
            assert!(!level.walls().contains(&pos));
            assert_ne!(pos.z, SNAKE_START_ROW, "obstacle on the snake start row");
            assert_ne!(pos, GridPos::new(door.x - 1, door.z));
        }
    }

    #[test]
    fn test_locked_door_is_solid_unlocked_is_passable() {
        let (grid, mut level, _) = loaded_level(1);
        let door = Level::door_cell(&grid);
        assert!(level.wall_or_obstacle_hit(door));
        assert!(!level.exit_door_hit(door));

        level.unlock_exit_door();
        assert!(!level.wall_or_obstacle_hit(door));
        assert!(level.exit_door_hit(door));
    }

    #[test]
    fn test_unlock_is_idempotent() {
        let (_, mut level, _) = loaded_level(1);
        level.unlock_exit_door();
        let first = level.exit_door();
        level.unlock_exit_door();
        assert_eq!(level.exit_door(), first);

        // No-op without a door
        level.clear();
        level.unlock_exit_door();
        assert_eq!(level.exit_door(), None);
    }

    #[test]
    fn test_spawn_respects_occupancy() {
        let (grid, mut level, mut rng) = loaded_level(2);
        let snake = test_snake();
        let pos = level.spawn_food(&grid, &snake, &mut rng).unwrap();
        assert!(!level.walls().contains(&pos));
        assert!(!level.obstacles().contains(&pos));
        assert!(snake.cells().all(|c| c != pos));
        assert_ne!(pos, Level::door_cell(&grid));

        let special = level.spawn_special_item(&grid, &snake, &mut rng).unwrap();
        assert_ne!(special, pos, "special item landed on the food cell");
    }

    #[test]
    fn test_spawn_exhaustion_is_reported() {
        // 3x3 grid: the single interior cell is covered by the snake, so no
        // free cell exists
        let grid = Grid::new(3, 3, 1.0);
        let cfg = SimConfig::default();
        let mut level = Level::new(1, &cfg);
        let mut rng = Pcg32::seed_from_u64(7);
        level.load(&grid, &mut rng);
        let snake = Snake::new(GridPos::new(1, 1), Direction::Right, 2, 0.2, 0.1);
        assert_eq!(
            level.spawn_food(&grid, &snake, &mut rng),
            Err(SpawnError::Exhausted { attempts: 100 })
        );
        assert_eq!(level.food(), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (_, mut level, _) = loaded_level(2);
        level.clear();
        assert!(level.walls().is_empty());
        assert!(level.obstacles().is_empty());
        assert_eq!(level.exit_door(), None);
        level.clear();
        assert!(level.walls().is_empty());
    }

    #[test]
    fn test_is_occupied_covers_every_registry() {
        let (grid, mut level, mut rng) = loaded_level(1);
        let snake = test_snake();
        assert!(level.is_occupied(GridPos::new(0, 0), &snake)); // wall
        assert!(level.is_occupied(Level::door_cell(&grid), &snake)); // door
        assert!(level.is_occupied(GridPos::new(2, 2), &snake)); // snake head
        assert!(!level.is_occupied(GridPos::new(10, 5), &snake));
        let food = level.spawn_food(&grid, &snake, &mut rng).unwrap();
        assert!(level.is_occupied(food, &snake));
    }
}
