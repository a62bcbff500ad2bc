//! Grid coordinate space
//!
//! Integer cell coordinates on the horizontal plane, with world-space
//! transforms that center the grid on the origin. The world vertical axis is
//! fixed at the grid plane and never participates in grid logic.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An integer cell identifier within the level bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    /// Column, in `[0, width)`
    pub x: i32,
    /// Row, in `[0, height)`
    pub z: i32,
}

impl GridPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// Fixed-size grid with world-space transforms
///
/// Pure and stateless per call; width, height and cell size are set at
/// construction and never change for the lifetime of a level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    cell_size: f32,
    // World-space position of the grid's (0, 0) corner, centering the whole
    // grid on the origin
    offset_x: f32,
    offset_z: f32,
}

impl Grid {
    pub fn new(width: i32, height: i32, cell_size: f32) -> Self {
        debug_assert!(width > 0 && height > 0, "grid must have positive extent");
        debug_assert!(cell_size > 0.0, "cell size must be positive");
        Self {
            width,
            height,
            cell_size,
            offset_x: -(width as f32 * cell_size) / 2.0,
            offset_z: -(height as f32 * cell_size) / 2.0,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Convert a grid cell to the world-space center of that cell
    ///
    /// y is the grid plane (0); callers offset vertically as needed. Total
    /// over all integer cells - the head legitimately targets one cell past
    /// the edge on the step that ends the game.
    pub fn grid_to_world(&self, pos: GridPos) -> Vec3 {
        Vec3::new(
            self.offset_x + pos.x as f32 * self.cell_size + self.cell_size / 2.0,
            0.0,
            self.offset_z + pos.z as f32 * self.cell_size + self.cell_size / 2.0,
        )
    }

    /// Inverse of [`grid_to_world`](Self::grid_to_world) via floor division
    ///
    /// Exact for cell centers; arbitrary world points map to the cell that
    /// contains them.
    pub fn world_to_grid(&self, point: Vec3) -> GridPos {
        GridPos::new(
            ((point.x - self.offset_x) / self.cell_size).floor() as i32,
            ((point.z - self.offset_z) / self.cell_size).floor() as i32,
        )
    }

    /// Whether a cell lies within `[0, width) x [0, height)`
    #[inline]
    pub fn is_in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.z >= 0 && pos.z < self.height
    }

    /// Uniformly random cell within bounds
    ///
    /// Occupancy-unaware; callers filter against their own registries.
    pub fn random_position<R: Rng>(&self, rng: &mut R) -> GridPos {
        GridPos::new(
            rng.random_range(0..self.width),
            rng.random_range(0..self.height),
        )
    }

    /// Iterate every cell of the grid, row by row
    pub fn positions(&self) -> impl Iterator<Item = GridPos> + use<> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |z| (0..w).map(move |x| GridPos::new(x, z)))
    }
}
