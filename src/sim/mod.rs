//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame delta times only; no internal clocks
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies
//!
//! One `tick` call per rendered frame advances the snake, resolves
//! collisions and drives level progression. The only outward surfaces are
//! drained [`GameEvent`]s and [`WorldSnapshot`]s.

pub mod grid;
pub mod level;
pub mod snake;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use grid::{Grid, GridPos};
pub use level::{ExitDoor, Level, SpawnError};
pub use snake::{Direction, Segment, Snake};
pub use snapshot::{ItemView, WorldSnapshot};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::tick;
