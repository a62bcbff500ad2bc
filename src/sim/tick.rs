//! Per-frame simulation tick
//!
//! One call per rendered frame with the frame's wall-clock delta. All work
//! is synchronous and completes within the call; check order is fixed and
//! at most one terminal transition happens per tick.

use log::{info, warn};

use super::state::{GameEvent, GamePhase, GameState};

/// Advance the game by `dt` seconds of wall-clock time.
///
/// No-op in terminal phases. Discrete collision and progression checks run
/// only on the tick where the snake commits a move - committed positions
/// cannot change between commits.
pub fn tick(state: &mut GameState, dt: f32) {
    if state.phase.is_terminal() {
        return;
    }

    state.elapsed += dt;
    if !state.snake.advance(dt) {
        return;
    }

    let head = state.snake.head();

    // Solid geometry or the snake's own body ends the run
    if !state.grid.is_in_bounds(head)
        || state.level.wall_or_obstacle_hit(head)
        || state.snake.self_collision()
    {
        state.phase = GamePhase::GameOver;
        let final_score = state.score;
        info!("game over at {head:?}, final score {final_score}");
        state.push_event(GameEvent::GameOver { final_score });
        return;
    }

    if state.level.food_hit(head) {
        state.snake.grow();
        state.score += state.config.food_score;
        state.push_event(GameEvent::ScoreChanged { score: state.score });
        state.push_event(GameEvent::FoodEaten);
        state.level.remove_food();
        if let Err(err) = state
            .level
            .spawn_food(&state.grid, &state.snake, &mut state.rng)
        {
            // Non-fatal: play on without food until a cell frees up
            warn!("food spawn failed: {err}");
        }

        let door_locked = state.level.exit_door().is_some_and(|d| !d.unlocked);
        if state.snake.len() >= state.config.special_item_threshold
            && !state.special_item_active
            && door_locked
        {
            match state
                .level
                .spawn_special_item(&state.grid, &state.snake, &mut state.rng)
            {
                Ok(pos) => {
                    state.special_item_active = true;
                    info!("special item spawned at {pos:?}");
                }
                Err(err) => warn!("special item spawn failed: {err}"),
            }
        }
    }

    if state.special_item_active && state.level.special_item_hit(head) {
        state.level.unlock_exit_door();
        state.special_item_active = false;
        state.level.remove_special_item();
        state.push_event(GameEvent::SpecialItemUnlocked);
    }

    if state.level.exit_door_hit(head) {
        state.phase = GamePhase::LevelComplete;
        info!(
            "level {} complete, score {}",
            state.level_number, state.score
        );
        state.push_event(GameEvent::LevelComplete);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::grid::GridPos;
    use crate::sim::level::Level;
    use crate::sim::snake::{Direction, Snake};

    const STEP: f32 = 0.2;

    fn new_state() -> GameState {
        GameState::new(SimConfig::default(), 0xC0FFEE)
    }

    /// Park a fresh 3-segment snake with its head at `head`, facing `dir`
    fn place_snake(state: &mut GameState, head: GridPos, dir: Direction) {
        state.snake = Snake::new(head, dir, 3, STEP, state.config.early_turn_window);
    }

    #[test]
    fn test_no_commit_means_no_checks() {
        let mut state = new_state();
        state.level.remove_food();
        state.level.set_food(GridPos::new(3, 2));
        tick(&mut state, STEP * 0.5);
        // Head has not committed onto the food yet
        assert_eq!(state.score, 0);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_food_consumption_scores_and_respawns() {
        // Scenario: food sits on the snake's next head cell
        let mut state = new_state();
        state.level.remove_food();
        state.level.set_food(GridPos::new(3, 2));

        tick(&mut state, STEP);
        assert_eq!(state.score, 10);
        assert_eq!(state.snake.len(), 4);
        let food = state.level.food().expect("food respawned");
        assert_ne!(food, GridPos::new(3, 2));
        let events = state.take_events();
        assert_eq!(
            events,
            vec![GameEvent::ScoreChanged { score: 10 }, GameEvent::FoodEaten]
        );
    }

    #[test]
    fn test_missing_food_is_tolerated() {
        let mut state = new_state();
        state.level.remove_food();
        tick(&mut state, STEP);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_wall_collision_ends_run() {
        let mut state = new_state();
        state.level.remove_food();
        state.request_direction(Direction::Up);
        // (3,2) -> (3,1) -> (3,0): the third commit lands on the top wall
        tick(&mut state, STEP);
        tick(&mut state, STEP);
        assert_eq!(state.phase, GamePhase::Playing);
        tick(&mut state, STEP);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            state.take_events(),
            vec![GameEvent::GameOver { final_score: 0 }]
        );

        // Terminal: further ticks change nothing
        let head = state.snake.head();
        tick(&mut state, STEP);
        assert_eq!(state.snake.head(), head);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_self_collision_ends_run() {
        let mut state = new_state();
        state.level.remove_food();
        state.snake = Snake::new(GridPos::new(10, 10), Direction::Right, 5, STEP, 0.1);
        state.request_direction(Direction::Up);
        tick(&mut state, STEP);
        state.request_direction(Direction::Left);
        tick(&mut state, STEP);
        state.request_direction(Direction::Down);
        tick(&mut state, STEP);
        assert_eq!(state.phase, GamePhase::Playing);
        tick(&mut state, STEP);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_special_item_spawns_once_at_threshold() {
        // Scenario: two foods take the snake from 3 to 5 segments
        let mut state = new_state();
        state.level.remove_food();
        state.level.set_food(GridPos::new(3, 2));
        tick(&mut state, STEP);
        assert_eq!(state.snake.len(), 4);
        assert!(!state.special_item_active);

        state.level.remove_food();
        state.level.set_food(GridPos::new(4, 2));
        tick(&mut state, STEP);
        assert_eq!(state.snake.len(), 5);
        assert!(state.special_item_active);
        let first_special = state.level.special_item().expect("special item placed");

        // Eating again while the item is live must not spawn a second one
        state.level.set_special_item(GridPos::new(15, 15));
        state.level.remove_food();
        state.level.set_food(GridPos::new(5, 2));
        tick(&mut state, STEP);
        assert_eq!(state.snake.len(), 6);
        assert_eq!(state.level.special_item(), Some(GridPos::new(15, 15)));
        let _ = first_special;
    }

    #[test]
    fn test_special_item_unlocks_door_once() {
        // Scenario: head reaches the special item cell
        let mut state = new_state();
        state.level.remove_food();
        state.special_item_active = true;
        state.level.set_special_item(GridPos::new(3, 2));

        tick(&mut state, STEP);
        assert!(!state.special_item_active);
        assert_eq!(state.level.special_item(), None);
        assert!(state.level.exit_door().unwrap().unlocked);
        assert_eq!(state.take_events(), vec![GameEvent::SpecialItemUnlocked]);

        // The item is gone; revisiting the cell has no further effect
        tick(&mut state, STEP);
        assert!(state.level.exit_door().unwrap().unlocked);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_unlocked_door_completes_level() {
        // Scenario: head reaches the unlocked door cell
        let mut state = new_state();
        state.level.remove_food();
        state.level.unlock_exit_door();
        let door = Level::door_cell(&state.grid);
        place_snake(
            &mut state,
            GridPos::new(door.x - 2, door.z),
            Direction::Right,
        );

        tick(&mut state, STEP);
        assert_eq!(state.phase, GamePhase::Playing);
        tick(&mut state, STEP);
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert_eq!(state.take_events(), vec![GameEvent::LevelComplete]);

        // Terminal: nothing moves, nothing scores
        let head = state.snake.head();
        let score = state.score;
        tick(&mut state, STEP);
        assert_eq!(state.snake.head(), head);
        assert_eq!(state.score, score);
    }

    #[test]
    fn test_locked_door_is_deadly() {
        let mut state = new_state();
        state.level.remove_food();
        let door = Level::door_cell(&state.grid);
        place_snake(
            &mut state,
            GridPos::new(door.x - 1, door.z),
            Direction::Right,
        );
        tick(&mut state, STEP);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_elapsed_accumulates_only_while_playing() {
        let mut state = new_state();
        state.level.remove_food();
        tick(&mut state, 0.05);
        tick(&mut state, 0.05);
        assert!((state.elapsed - 0.1).abs() < 1e-6);
        state.phase = GamePhase::GameOver;
        tick(&mut state, 0.05);
        assert!((state.elapsed - 0.1).abs() < 1e-6);
    }
}
