use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ratatui::style::Color;
use serde::Deserialize;

use crate::error::GameError;
use crate::grid::Position;

const APP_DIR_NAME: &str = "snake-arcade";
const CONFIG_FILE_NAME: &str = "config.json";
const LOG_FILE_NAME: &str = "snake-arcade.log";

/// Side length of one grid cell in game units. Every entity position is a
/// multiple of this value.
pub const CELL_SIZE: i32 = 10;

pub const WHITE: Color = Color::Rgb(255, 255, 255);
pub const BLACK: Color = Color::Rgb(0, 0, 0);
pub const GRAY: Color = Color::Rgb(128, 128, 128);
pub const YELLOW: Color = Color::Rgb(255, 255, 0);
pub const RED: Color = Color::Rgb(255, 0, 0);
pub const ORANGE: Color = Color::Rgb(255, 165, 0);
pub const BLUE: Color = Color::Rgb(0, 0, 255);
pub const GREEN: Color = Color::Rgb(0, 255, 0);

/// Color of a freshly created snake block (always the head).
pub const SNAKE_COLOR: Color = WHITE;

pub const WALL_COLOR: Color = GRAY;

pub const BACKGROUND_COLOR: Color = BLACK;

/// Food colors in spawn order. Index-aligned with [`FOOD_SCORES`].
pub const FOOD_COLORS: [Color; 6] = [WHITE, YELLOW, RED, ORANGE, BLUE, GREEN];

/// Points per food color. Index-aligned with [`FOOD_COLORS`].
pub const FOOD_SCORES: [u32; 6] = [10, 20, 30, 40, 50, 60];

/// Length of a wall along its long axis, in game units.
pub const DEFAULT_WALL_LENGTH: i32 = 50;

/// How long the final score stays on screen before the process exits.
pub const GAME_OVER_PAUSE: Duration = Duration::from_secs(2);

/// Shortest frame the loop will pace to, whatever the speed.
pub const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(5);

pub const DEFAULT_WIDTH: i32 = 600;
pub const DEFAULT_HEIGHT: i32 = 400;
pub const DEFAULT_MAX_FOOD: usize = 3;
pub const DEFAULT_BASE_SPEED: f64 = 15.0;
pub const DEFAULT_SPEED_RAMP: f64 = 0.05;
pub const DEFAULT_WALL_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_MAX_SPAWN_ATTEMPTS: u32 = 1000;

/// Smallest playable grid side, in cells.
const MIN_GRID_CELLS: i32 = 4;

/// Blocks in the snake a new game starts with.
pub const STARTING_SNAKE_LENGTH: usize = 2;

/// Play-field dimensions in game units.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: i32,
    pub height: i32,
}

impl GridSize {
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn cells_wide(self) -> i32 {
        self.width / CELL_SIZE
    }

    #[must_use]
    pub fn cells_high(self) -> i32 {
        self.height / CELL_SIZE
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::try_from(self.cells_wide() * self.cells_high()).unwrap_or(0)
    }

    /// Returns the cell-aligned midpoint of the grid.
    #[must_use]
    pub fn center(self) -> Position {
        Position::new(
            crate::grid::quantize(self.width / 2),
            crate::grid::quantize(self.height / 2),
        )
    }
}

/// Tunable game settings.
///
/// Loaded from an optional JSON file where every field may be omitted, then
/// overridden from the command line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    /// Number of foods kept alive on the board.
    pub max_food: usize,
    /// Cells per second at the start of a game.
    pub base_speed: f64,
    /// Cells per second added for every second played after the first.
    pub speed_ramp: f64,
    /// Seconds of play per additional wall.
    pub wall_interval_secs: u64,
    pub max_spawn_attempts: u32,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_food: DEFAULT_MAX_FOOD,
            base_speed: DEFAULT_BASE_SPEED,
            speed_ramp: DEFAULT_SPEED_RAMP,
            wall_interval_secs: DEFAULT_WALL_INTERVAL_SECS,
            max_spawn_attempts: DEFAULT_MAX_SPAWN_ATTEMPTS,
            seed: None,
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn grid(&self) -> GridSize {
        GridSize::new(self.width, self.height)
    }

    #[must_use]
    pub fn wall_interval(&self) -> Duration {
        Duration::from_secs(self.wall_interval_secs)
    }

    /// Parses a config file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, GameError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Loads the config from `explicit`, or from the per-user config file
    /// when it exists, or falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, GameError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };

        match Self::from_file(&path) {
            Err(GameError::Io(error)) if error.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Rejects settings the game cannot run with.
    pub fn validate(&self) -> Result<(), GameError> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if value % CELL_SIZE != 0 {
                return Err(GameError::InvalidConfig(format!(
                    "{name} {value} is not a multiple of the cell size {CELL_SIZE}"
                )));
            }
            if value < MIN_GRID_CELLS * CELL_SIZE {
                return Err(GameError::InvalidConfig(format!(
                    "{name} {value} is below the minimum of {}",
                    MIN_GRID_CELLS * CELL_SIZE
                )));
            }
        }

        if self.max_food == 0 {
            return Err(GameError::InvalidConfig(
                "max_food must be at least 1".to_owned(),
            ));
        }

        let free_cells = self
            .grid()
            .total_cells()
            .saturating_sub(STARTING_SNAKE_LENGTH);
        if self.max_food > free_cells {
            return Err(GameError::InvalidConfig(format!(
                "max_food {} does not fit the {free_cells} free cells of a {}x{} field",
                self.max_food, self.width, self.height
            )));
        }

        if !self.base_speed.is_finite() || self.base_speed <= 0.0 {
            return Err(GameError::InvalidConfig(format!(
                "base_speed must be positive, got {}",
                self.base_speed
            )));
        }

        if !self.speed_ramp.is_finite() || self.speed_ramp < 0.0 {
            return Err(GameError::InvalidConfig(format!(
                "speed_ramp must not be negative, got {}",
                self.speed_ramp
            )));
        }

        if self.wall_interval_secs == 0 {
            return Err(GameError::InvalidConfig(
                "wall_interval_secs must be at least 1".to_owned(),
            ));
        }

        if self.max_spawn_attempts == 0 {
            return Err(GameError::InvalidConfig(
                "max_spawn_attempts must be at least 1".to_owned(),
            ));
        }

        Ok(())
    }
}

/// Returns the per-user config file path, if the platform has one.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    Some(base)
}

/// Returns the platform-correct log file path.
#[must_use]
pub fn default_log_path() -> PathBuf {
    let mut base = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(LOG_FILE_NAME);
    base
}
