//! Gridsnake headless demo
//!
//! Runs the simulation without a renderer: a greedy autopilot steers the
//! snake toward the current goal while game events are logged as they fire.
//!
//! Usage: `gridsnake [config.json] [seed]`

use std::env;
use std::fs;
use std::process::ExitCode;

use gridsnake::SimConfig;
use gridsnake::sim::{
    Direction, GameEvent, GamePhase, GameState, GridPos, WorldSnapshot, tick,
};
use log::{error, info};

/// Frame delta fed to the sim, matching a 60 Hz render loop
const FRAME_DT: f32 = 1.0 / 60.0;
/// Hard stop so a looping autopilot cannot run forever
const MAX_FRAMES: u32 = 60 * 60 * 10;
/// Levels to play through before declaring the demo done
const DEMO_LEVELS: u32 = 3;

const DEFAULT_SEED: u64 = 0x5EED_CAFE;

fn main() -> ExitCode {
    env_logger::init();

    let mut config = SimConfig::default();
    let mut seed = DEFAULT_SEED;
    for arg in env::args().skip(1) {
        if let Ok(parsed) = arg.parse::<u64>() {
            seed = parsed;
            continue;
        }
        let json = match fs::read_to_string(&arg) {
            Ok(json) => json,
            Err(err) => {
                error!("cannot read config {arg}: {err}");
                return ExitCode::FAILURE;
            }
        };
        config = match SimConfig::from_json(&json) {
            Ok(config) => config,
            Err(err) => {
                error!("invalid config {arg}: {err}");
                return ExitCode::FAILURE;
            }
        };
    }

    let mut state = GameState::new(config, seed);
    for _ in 0..MAX_FRAMES {
        if let Some(dir) = autopilot(&state) {
            state.request_direction(dir);
        }
        tick(&mut state, FRAME_DT);

        for event in state.take_events() {
            match event {
                GameEvent::ScoreChanged { score } => info!("score: {score}"),
                GameEvent::FoodEaten => info!("chomp"),
                GameEvent::SpecialItemUnlocked => info!("exit door unlocked"),
                GameEvent::GameOver { final_score } => info!("game over: {final_score}"),
                GameEvent::LevelComplete => info!("level {} complete", state.level_number),
            }
        }

        match state.phase {
            GamePhase::Playing => {}
            GamePhase::GameOver => break,
            GamePhase::LevelComplete => {
                if state.level_number >= DEMO_LEVELS {
                    break;
                }
                state.advance_level();
            }
        }

        // A real frontend would hand this to its renderer each frame
        let _ = WorldSnapshot::capture(&state);
    }

    println!(
        "seed {seed}: reached level {} with score {} ({:?})",
        state.level_number, state.score, state.phase
    );
    ExitCode::SUCCESS
}

/// Greedy steering: chase the current goal, refusing any turn that commits
/// straight into something deadly when an alternative exists.
fn autopilot(state: &GameState) -> Option<Direction> {
    let goal = current_goal(state)?;
    // Plan from the cell the in-flight step ends on
    let origin = state.snake.head_target();

    let mut candidates = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
    candidates.sort_by_key(|d| {
        let next = d.apply(origin);
        (goal.x - next.x).abs() + (goal.z - next.z).abs()
    });
    candidates.into_iter().find(|d| is_safe(state, d.apply(origin)))
}

/// The cell the autopilot wants next: the open door, then the special item,
/// then food
fn current_goal(state: &GameState) -> Option<GridPos> {
    let door = state.level.exit_door()?;
    if door.unlocked {
        return Some(door.pos);
    }
    if state.special_item_active {
        if let Some(pos) = state.level.special_item() {
            return Some(pos);
        }
    }
    state.level.food()
}

fn is_safe(state: &GameState, pos: GridPos) -> bool {
    state.grid.is_in_bounds(pos)
        && !state.level.wall_or_obstacle_hit(pos)
        && state.snake.cells().all(|c| c != pos)
}
