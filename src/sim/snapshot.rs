//! Renderer-facing world snapshot
//!
//! Translates logical grid state into world-space transforms once per frame.
//! Data flows strictly sim -> snapshot -> renderer; nothing here feeds back
//! into grid logic. Decorative idle motion (item spin and bob) is a pure
//! function of the sim clock - an item is live exactly while the level holds
//! it, never because some scene container still contains its mesh.

use glam::Vec3;

use super::state::GameState;

/// Idle spin rate for live collectibles, radians per second
const ITEM_SPIN_RATE: f32 = 1.2;
/// Vertical bob frequency (radians per second) and amplitude (world units)
const ITEM_BOB_RATE: f32 = 3.0;
const ITEM_BOB_AMPLITUDE: f32 = 0.08;

/// A collectible or door transform with its decorative animation state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemView {
    pub pos: Vec3,
    /// Y rotation for idle spin
    pub spin: f32,
}

/// World-space view of every live entity, rebuilt each frame
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSnapshot {
    /// Interpolated snake segments, head first
    pub snake: Vec<Vec3>,
    /// Wall cells in stable row-major order
    pub walls: Vec<Vec3>,
    /// Obstacle cells in stable row-major order
    pub obstacles: Vec<Vec3>,
    pub food: Option<Vec3>,
    pub special_item: Option<ItemView>,
    pub exit_door: Option<ItemView>,
    pub exit_door_unlocked: bool,
}

impl WorldSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let grid = &state.grid;
        let t = state.elapsed;

        let mut walls: Vec<_> = state.level.walls().iter().copied().collect();
        walls.sort_unstable_by_key(|p| (p.z, p.x));
        let mut obstacles: Vec<_> = state.level.obstacles().iter().copied().collect();
        obstacles.sort_unstable_by_key(|p| (p.z, p.x));

        let bob = (t * ITEM_BOB_RATE).sin() * ITEM_BOB_AMPLITUDE;
        let special_item = state.level.special_item().map(|pos| ItemView {
            pos: grid.grid_to_world(pos) + Vec3::Y * bob,
            spin: t * ITEM_SPIN_RATE,
        });

        let door = state.level.exit_door();
        let exit_door_unlocked = door.is_some_and(|d| d.unlocked);
        let exit_door = door.map(|d| ItemView {
            pos: grid.grid_to_world(d.pos),
            // The door starts spinning-in-place only once it opens
            spin: if d.unlocked { t * ITEM_SPIN_RATE } else { 0.0 },
        });

        Self {
            snake: state.snake.render_positions(grid),
            walls: walls.into_iter().map(|p| grid.grid_to_world(p)).collect(),
            obstacles: obstacles
                .into_iter()
                .map(|p| grid.grid_to_world(p))
                .collect(),
            food: state.level.food().map(|p| grid.grid_to_world(p)),
            special_item,
            exit_door,
            exit_door_unlocked,
        }
    }
}
