use std::fmt;
use std::time::Duration;

use log::{error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::collision::{PositionGroup, collides_any, collides_indexed, collides_with};
use crate::config::{CELL_SIZE, GameConfig, GridSize};
use crate::error::GameError;
use crate::food::FoodController;
use crate::grid::Position;
use crate::input::{Direction, GameInput, direction_change_is_valid};
use crate::snake::Snake;
use crate::wall::WallController;

/// What ended the game.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    OutOfBounds,
    SelfCollision,
    WallCollision,
}

impl fmt::Display for DeathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => f.write_str("left the field"),
            Self::SelfCollision => f.write_str("hit yourself"),
            Self::WallCollision => f.write_str("hit a wall"),
        }
    }
}

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Running,
    /// Terminal: no further steps change the state.
    GameOver(DeathReason),
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub foods: FoodController,
    pub walls: WallController,
    pub score: u32,
    pub status: GameStatus,
    /// Cells per second the next frame should be paced at.
    pub speed: f64,
    /// Play time at the most recent step.
    pub elapsed: Duration,
    pub frame_count: u64,
    pending_direction: Option<Direction>,
    config: GameConfig,
    rng: StdRng,
}

impl GameState {
    /// Creates a session seeded from `config.seed`, or from OS entropy when unset.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::build(config, rng)
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    pub fn new_with_seed(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::build(config, StdRng::seed_from_u64(seed))
    }

    fn build(config: GameConfig, rng: StdRng) -> Result<Self, GameError> {
        config.validate()?;

        let grid = config.grid();
        let snake = Snake::starting(grid.center(), Direction::Right);
        let foods = FoodController::new(grid, config.max_food, config.max_spawn_attempts);
        let walls = WallController::new(grid, config.max_spawn_attempts);

        let mut state = Self {
            snake,
            foods,
            walls,
            score: 0,
            status: GameStatus::Running,
            speed: config.base_speed,
            elapsed: Duration::ZERO,
            frame_count: 0,
            pending_direction: None,
            config,
            rng,
        };
        state.refill_food();

        Ok(state)
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.config.grid()
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    /// Applies one external input event. Directions are buffered until the
    /// next step; the last one received wins.
    pub fn apply_input(&mut self, input: GameInput) {
        match input {
            GameInput::Direction(direction) => {
                if self.is_running() {
                    self.pending_direction = Some(direction);
                }
            }
            GameInput::Quit => {}
        }
    }

    /// Advances the game by one frame, `elapsed` after the session started.
    pub fn step(&mut self, elapsed: Duration) -> GameStatus {
        if !self.is_running() {
            return self.status;
        }

        self.elapsed = elapsed;
        self.frame_count += 1;

        if let Some(next) = self.pending_direction.take() {
            if direction_change_is_valid(self.snake.direction(), next) {
                self.snake.set_direction(next);
            }
        }

        let next_head = self
            .snake
            .head_position()
            .step(self.snake.direction(), CELL_SIZE);
        match collides_indexed(&[next_head], &self.foods.positions()) {
            Some((_, index)) => self.eat(index),
            None => self.snake.move_forward(CELL_SIZE),
        }
        self.refill_food();

        if let Some(reason) = self.detect_collision() {
            self.status = GameStatus::GameOver(reason);
            info!(
                "game over after {:.1}s: {reason}, score {}",
                elapsed.as_secs_f64(),
                self.score
            );
            return self.status;
        }

        self.maybe_spawn_wall(elapsed);
        self.speed = self.speed_at(elapsed);

        self.status
    }

    /// Target speed in cells per second after `elapsed` of play.
    #[must_use]
    pub fn speed_at(&self, elapsed: Duration) -> f64 {
        let ramp_seconds = (elapsed.as_secs_f64() - 1.0).max(0.0);
        self.config.base_speed + self.config.speed_ramp * ramp_seconds
    }

    fn eat(&mut self, index: usize) {
        let Some(food) = self.foods.remove(index) else {
            return;
        };

        self.score += food.score;
        self.snake.grow(food.color);
        info!(
            "ate food at ({}, {}) worth {}, score {}, length {}",
            food.position.x,
            food.position.y,
            food.score,
            self.score,
            self.snake.len()
        );
    }

    /// Tops the board back up to the food target. A starved spawn is retried
    /// on the next frame.
    fn refill_food(&mut self) {
        let missing = self.foods.missing();
        if missing == 0 {
            return;
        }

        let snake_cells = self.snake.positions();
        let wall_cells = self.walls.collision_cells();
        let result = self.foods.generate(
            &mut self.rng,
            missing,
            &[(&snake_cells).into(), (&wall_cells).into()],
        );
        report_spawn_failure("food", result);
    }

    fn detect_collision(&self) -> Option<DeathReason> {
        let head = self.snake.head_position();

        if !head.is_within_bounds(self.grid()) {
            return Some(DeathReason::OutOfBounds);
        }

        let body = self.snake.body_positions();
        if collides_any(&[head.into(), (&body).into()]) {
            return Some(DeathReason::SelfCollision);
        }

        let wall_cells = self.walls.collision_cells();
        if collides_with(head.into(), &[(&wall_cells).into()]) {
            return Some(DeathReason::WallCollision);
        }

        None
    }

    /// Adds a wall whenever another whole wall interval has elapsed.
    fn maybe_spawn_wall(&mut self, elapsed: Duration) {
        let intervals = elapsed.as_nanos() / self.config.wall_interval().as_nanos();
        if intervals <= self.walls.count() as u128 {
            return;
        }

        let food_cells = self.foods.positions();
        let snake_cells = self.snake.positions();
        let wall_cells = self.walls.collision_cells();
        let ahead = self.cell_ahead();
        let result = self.walls.generate(
            &mut self.rng,
            1,
            &[
                (&food_cells).into(),
                (&snake_cells).into(),
                (&wall_cells).into(),
                PositionGroup::Single(ahead),
            ],
        );
        report_spawn_failure("wall", result);
    }

    fn cell_ahead(&self) -> Position {
        self.snake
            .head_position()
            .step(self.snake.direction(), CELL_SIZE)
    }
}

fn report_spawn_failure<T>(entity: &str, result: Result<T, GameError>) {
    match result {
        Ok(_) => {}
        Err(spawn_error) if spawn_error.is_recoverable() => {
            warn!("skipping {entity} spawn this frame: {spawn_error}");
        }
        Err(spawn_error) => error!("{entity} spawn failed: {spawn_error}"),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{DeathReason, GameState, GameStatus};
    use crate::config::{GameConfig, WALL_COLOR, WHITE};
    use crate::food::FoodController;
    use crate::grid::Position;
    use crate::input::{Direction, GameInput};
    use crate::snake::Snake;
    use crate::wall::{Orientation, Wall, WallController};

    fn config() -> GameConfig {
        GameConfig {
            width: 200,
            height: 200,
            max_food: 1,
            ..GameConfig::default()
        }
    }

    /// A state whose food and walls are cleared, with a fixed snake.
    fn bare_state(snake: Snake) -> GameState {
        let mut state = GameState::new_with_seed(config(), 1).expect("valid config");
        let grid = state.grid();
        state.snake = snake;
        state.foods = FoodController::new(grid, 0, 100);
        state.walls = WallController::new(grid, 100);
        state
    }

    #[test]
    fn new_state_starts_with_full_food_and_no_walls() {
        let state = GameState::new_with_seed(
            GameConfig {
                max_food: 3,
                ..config()
            },
            4,
        )
        .expect("valid config");

        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.snake.head_position(), Position::new(100, 100));
        assert_eq!(state.foods.count(), 3);
        assert_eq!(state.walls.count(), 0);
        assert_eq!(state.status, GameStatus::Running);
        for food in state.foods.all() {
            assert!(!state.snake.occupies(food.position));
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = GameState::new_with_seed(
            GameConfig {
                width: 205,
                ..config()
            },
            1,
        );
        assert!(result.is_err());
    }

    /// A horizontal wall of `cells` cells starting at `position`.
    fn wall_row(position: Position, cells: i32) -> Wall {
        Wall::with_size(
            Orientation::Horizontal,
            position,
            cells * 10,
            10,
            WALL_COLOR,
        )
        .expect("aligned wall size")
    }

    #[test]
    fn eating_scores_grows_and_replaces_food() {
        let mut state = GameState::new_with_seed(
            GameConfig {
                width: 60,
                height: 60,
                ..config()
            },
            2,
        )
        .expect("valid config");
        let grid = state.grid();
        state.snake = Snake::starting(Position::new(10, 0), Direction::Right);
        state.foods = FoodController::new(grid, 1, 1000);
        state.walls = WallController::new(grid, 100);
        // the middle columns are walled off below the top row
        for x in [10, 20, 30, 40] {
            state
                .walls
                .add(Wall::new(Orientation::Vertical, Position::new(x, 10)));
        }
        let food = state.foods.spawn_at(Position::new(20, 0));
        assert_eq!((food.color, food.score), (WHITE, 10));

        state.step(Duration::ZERO);

        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.score, 10);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head_position(), Position::new(20, 0));
        assert_eq!(state.foods.count(), 1);

        let replacement = state.foods.position(0).expect("food replaced");
        assert!(!state.snake.occupies(replacement));
        assert!(!state.walls.collision_cells().contains(&replacement));
    }

    #[test]
    fn leaving_the_grid_ends_the_game() {
        let mut state = bare_state(Snake::starting(Position::new(190, 100), Direction::Right));

        let status = state.step(Duration::ZERO);

        assert_eq!(status, GameStatus::GameOver(DeathReason::OutOfBounds));
        assert!(state.snake.head_position().x > 200 - 10);
    }

    #[test]
    fn running_into_the_body_ends_the_game() {
        let snake = Snake::from_positions(
            &[
                Position::new(30, 20),
                Position::new(30, 30),
                Position::new(20, 30),
                Position::new(10, 30),
                Position::new(10, 20),
                Position::new(20, 20),
            ],
            Direction::Left,
        )
        .expect("body is not empty");
        let mut state = bare_state(snake);

        state.step(Duration::ZERO);

        assert_eq!(
            state.status,
            GameStatus::GameOver(DeathReason::SelfCollision)
        );
    }

    #[test]
    fn running_into_a_wall_ends_the_game() {
        let mut state = bare_state(Snake::starting(Position::new(110, 100), Direction::Right));
        state
            .walls
            .add(Wall::new(Orientation::Vertical, Position::new(120, 80)));

        state.step(Duration::ZERO);

        assert_eq!(
            state.status,
            GameStatus::GameOver(DeathReason::WallCollision)
        );
    }

    #[test]
    fn game_over_is_terminal() {
        let mut state = bare_state(Snake::starting(Position::new(190, 100), Direction::Right));
        state.step(Duration::ZERO);
        let frozen = state.snake.positions();

        state.apply_input(GameInput::Direction(Direction::Up));
        let status = state.step(Duration::from_secs(1));

        assert_eq!(status, GameStatus::GameOver(DeathReason::OutOfBounds));
        assert_eq!(state.snake.positions(), frozen);
        assert_eq!(state.frame_count, 1);
    }

    #[test]
    fn reversal_input_is_ignored() {
        for (current, reverse) in [
            (Direction::Right, Direction::Left),
            (Direction::Left, Direction::Right),
            (Direction::Up, Direction::Down),
            (Direction::Down, Direction::Up),
        ] {
            let mut state = bare_state(Snake::starting(Position::new(100, 100), current));

            state.apply_input(GameInput::Direction(reverse));
            state.step(Duration::ZERO);

            assert_eq!(state.snake.direction(), current);
            assert_eq!(state.status, GameStatus::Running);
        }
    }

    #[test]
    fn last_buffered_direction_wins() {
        let mut state = bare_state(Snake::starting(Position::new(100, 100), Direction::Right));

        state.apply_input(GameInput::Direction(Direction::Up));
        state.apply_input(GameInput::Direction(Direction::Down));
        state.step(Duration::ZERO);

        assert_eq!(state.snake.direction(), Direction::Down);
        assert_eq!(state.snake.head_position(), Position::new(100, 110));
    }

    #[test]
    fn length_is_conserved_without_food() {
        let mut state = bare_state(Snake::starting(Position::new(50, 100), Direction::Right));

        for frame in 0..10 {
            state.step(Duration::from_millis(frame * 50));
        }

        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.snake.head_position(), Position::new(150, 100));
    }

    #[test]
    fn a_wall_appears_per_whole_interval() {
        let mut state = bare_state(Snake::starting(Position::new(20, 100), Direction::Right));

        state.step(Duration::from_secs(9));
        assert_eq!(state.walls.count(), 0);

        state.step(Duration::from_secs(10));
        assert_eq!(state.walls.count(), 1);
        assert_eq!(state.status, GameStatus::Running);

        state.maybe_spawn_wall(Duration::from_millis(10_500));
        assert_eq!(state.walls.count(), 1);

        state.maybe_spawn_wall(Duration::from_secs(20));
        assert_eq!(state.walls.count(), 2);
    }

    #[test]
    fn new_walls_leave_the_snake_and_its_next_cell_free() {
        let mut state = bare_state(Snake::starting(Position::new(100, 100), Direction::Right));

        for seconds in 1..=5 {
            state.maybe_spawn_wall(Duration::from_secs(seconds * 10));
        }

        let cells = state.walls.collision_cells();
        assert_eq!(state.walls.count(), 5);
        assert!(!cells.contains(&Position::new(110, 100)));
        for position in state.snake.positions() {
            assert!(!cells.contains(&position));
        }
    }

    #[test]
    fn speed_ramps_linearly_after_the_first_second() {
        let mut state = bare_state(Snake::starting(Position::new(20, 100), Direction::Right));
        let base = state.config().base_speed;
        let ramp = state.config().speed_ramp;

        state.step(Duration::from_millis(500));
        assert_eq!(state.speed, base);

        state.step(Duration::from_secs(3));
        assert!((state.speed - (base + 2.0 * ramp)).abs() < 1e-9);
    }

    #[test]
    fn spawn_starvation_does_not_end_the_game() {
        let mut state = bare_state(Snake::starting(Position::new(100, 100), Direction::Right));
        state.foods = FoodController::new(state.grid(), 2, 0);

        state.step(Duration::ZERO);

        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.foods.count(), 0);
    }

    #[test]
    fn starved_food_is_placed_once_space_frees_up() {
        let mut state = GameState::new_with_seed(
            GameConfig {
                width: 40,
                height: 40,
                ..config()
            },
            6,
        )
        .expect("valid config");
        let grid = state.grid();
        state.snake = Snake::from_positions(
            &[
                Position::new(0, 0),
                Position::new(10, 0),
                Position::new(20, 0),
            ],
            Direction::Right,
        )
        .expect("body is not empty");
        state.foods = FoodController::new(grid, 1, 10_000);
        state.walls = WallController::new(grid, 100);
        state.walls.add(wall_row(Position::new(0, 0), 1));
        for y in [10, 20, 30] {
            state.walls.add(wall_row(Position::new(0, y), 4));
        }

        // after this move the snake and the walls cover every cell
        state.step(Duration::ZERO);
        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.snake.head_position(), Position::new(30, 0));
        assert_eq!(state.foods.count(), 0);

        state.walls.remove(1).expect("second row wall exists");
        state.apply_input(GameInput::Direction(Direction::Down));
        state.step(Duration::from_millis(100));

        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.snake.head_position(), Position::new(30, 10));
        assert_eq!(state.foods.count(), 1);
        let food = state.foods.position(0).expect("food placed");
        assert!(!state.snake.occupies(food));
        assert!(!state.walls.collision_cells().contains(&food));
    }

    #[test]
    fn starved_wall_is_placed_once_space_frees_up() {
        let mut state = GameState::new_with_seed(
            GameConfig {
                width: 60,
                height: 40,
                ..config()
            },
            8,
        )
        .expect("valid config");
        let grid = state.grid();
        state.snake = Snake::starting(Position::new(10, 30), Direction::Right);
        state.foods = FoodController::new(grid, 0, 100);
        state.walls = WallController::new(grid, 10_000);
        for y in [0, 10, 20, 30] {
            state.walls.add(wall_row(Position::new(0, y), 6));
        }

        state.maybe_spawn_wall(Duration::from_secs(50));
        assert_eq!(state.walls.count(), 4);

        state.walls.remove(0).expect("top row wall exists");
        state.maybe_spawn_wall(Duration::from_secs(50));

        assert_eq!(state.walls.count(), 4);
        let added = state.walls.get(3).expect("a wall was added");
        assert_eq!(added.orientation(), Orientation::Horizontal);
        assert_eq!(added.position().y, 0);
    }
}
