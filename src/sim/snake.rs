//! Snake entity - movement and interpolation state machine
//!
//! The snake is always in motion: every frame accumulates movement progress,
//! and each time progress crosses a full step the move is committed on the
//! grid. Committed cells are the authoritative positions used for collision
//! checks; the eased interpolation between cells is purely visual.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, GridPos};
use crate::smoother_step;

/// One of the four cardinal movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The exact reverse of this direction
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit cell offset `(dx, dz)`; up decreases z, right increases x
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The neighboring cell one step in this direction
    pub fn apply(self, pos: GridPos) -> GridPos {
        let (dx, dz) = self.offset();
        GridPos::new(pos.x + dx, pos.z + dz)
    }
}

/// One unit of the snake's body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Committed cell - authoritative for all grid logic
    pub position: GridPos,
    /// Cell this segment is moving into, committed at the end of the step
    pub target: GridPos,
    /// Interpolation anchor: the cell committed at the start of the step
    pub previous: GridPos,
}

impl Segment {
    fn at(pos: GridPos) -> Self {
        Self {
            position: pos,
            target: pos,
            previous: pos,
        }
    }
}

/// The snake: an ordered segment chain plus the movement machine
///
/// Index 0 is the head. The chain never shrinks and never reorders except by
/// the chain-shift rule at each commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    segments: Vec<Segment>,
    /// Direction of the step currently in flight
    direction: Direction,
    /// Direction the next commit will turn to
    next_direction: Direction,
    /// Input that arrived mid-step; one deep, newest wins
    queued_direction: Option<Direction>,
    /// Fraction of the current per-cell traversal elapsed, in [0, 1)
    progress: f32,
    /// Seconds per cell
    move_duration: f32,
    /// Progress fraction below which a turn request applies immediately
    early_turn_window: f32,
}

impl Snake {
    /// Create a snake of `length` segments laid out in a line behind `head`,
    /// facing `direction`, with targets primed so the first commit moves it.
    pub fn new(
        head: GridPos,
        direction: Direction,
        length: usize,
        move_duration: f32,
        early_turn_window: f32,
    ) -> Self {
        debug_assert!(length >= 2, "snake needs a body behind its head");
        debug_assert!(move_duration > 0.0, "move duration must be positive");
        let back = direction.opposite();
        let mut segments = Vec::with_capacity(length);
        let mut pos = head;
        for _ in 0..length {
            segments.push(Segment::at(pos));
            pos = back.apply(pos);
        }
        let mut snake = Self {
            segments,
            direction,
            next_direction: direction,
            queued_direction: None,
            progress: 0.0,
            move_duration,
            early_turn_window,
        };
        snake.retarget();
        snake
    }

    /// Committed head cell
    pub fn head(&self) -> GridPos {
        self.segments[0].position
    }

    /// Cell the head will occupy after the current step commits
    pub fn head_target(&self) -> GridPos {
        self.segments[0].target
    }

    /// Direction of the step currently in flight
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        // Never true: construction guarantees at least a head
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Committed cells of every segment, head first
    pub fn cells(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.segments.iter().map(|s| s.position)
    }

    /// Advance the movement machine by `dt` seconds of wall-clock time.
    ///
    /// Returns true when a move committed this call, meaning the committed
    /// grid positions changed and collision checks are due.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.progress += dt / self.move_duration;
        if self.progress >= 1.0 {
            // The remainder beyond one step is dropped, not carried: a
            // stalled frame commits at most one cell and the next step
            // starts from rest.
            self.progress = 0.0;
            self.commit_move();
            true
        } else {
            false
        }
    }

    /// Commit the in-flight move and set up the next step
    fn commit_move(&mut self) {
        for seg in &mut self.segments {
            seg.position = seg.target;
            seg.previous = seg.position;
        }
        // Promote mid-step input, then turn
        if let Some(dir) = self.queued_direction.take() {
            self.next_direction = dir;
        }
        self.direction = self.next_direction;
        self.retarget();
    }

    /// Chain-shift: the head aims one cell along the active direction, every
    /// body segment aims at the freshly committed cell of the segment ahead.
    /// Walked tail-first so each target reads this commit's positions, never
    /// an already-shifted value.
    fn retarget(&mut self) {
        for i in (1..self.segments.len()).rev() {
            self.segments[i].target = self.segments[i - 1].position;
        }
        let head_target = self.direction.apply(self.segments[0].position);
        self.segments[0].target = head_target;
    }

    /// Request a direction change.
    ///
    /// Ignored when it is the exact reverse of the in-flight direction.
    /// Very early in a step the request replaces the pending turn outright;
    /// otherwise it is queued (one deep, newest wins) and promoted at the
    /// next commit.
    pub fn request_direction(&mut self, dir: Direction) {
        if dir == self.direction.opposite() {
            return;
        }
        if self.progress < self.early_turn_window {
            self.next_direction = dir;
            self.queued_direction = None;
        } else {
            self.queued_direction = Some(dir);
        }
    }

    /// Append a tail segment at the current tail cell; it holds still until
    /// the chain-shift picks it up on a later commit.
    pub fn grow(&mut self) {
        let tail = *self.segments.last().expect("snake always has segments");
        self.segments.push(Segment::at(tail.position));
    }

    /// Whether the committed head cell coincides with any committed body
    /// cell. Only meaningful on the tick a move committed.
    pub fn self_collision(&self) -> bool {
        let head = self.head();
        self.segments[1..].iter().any(|s| s.position == head)
    }

    /// Eased world-space position of each segment, head first.
    ///
    /// Interpolates from the step's anchor cell to its target cell with a
    /// smoother-step curve; never consulted by grid logic.
    pub fn render_positions(&self, grid: &Grid) -> Vec<Vec3> {
        let t = smoother_step(self.progress);
        self.segments
            .iter()
            .map(|seg| {
                grid.grid_to_world(seg.previous)
                    .lerp(grid.grid_to_world(seg.target), t)
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn progress(&self) -> f32 {
        self.progress
    }
}
