use std::io;

use thiserror::Error;

/// Errors raised while building or running a game session.
///
/// Collisions are not errors; they end the game through
/// [`GameStatus::GameOver`](crate::game::GameStatus::GameOver).
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid wall orientation `{0}`, expected `Horizontal` or `Vertical`")]
    InvalidOrientation(String),

    #[error("invalid wall size {width}x{height}, both sides must be positive multiples of the cell size")]
    InvalidWall { width: i32, height: i32 },

    #[error("food palette needs matching, non-empty color and score lists (got {colors} colors, {scores} scores)")]
    InvalidPalette { colors: usize, scores: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No free position was found within the retry bound.
    #[error("no free position for {entity} after {attempts} attempts")]
    SpawnStarvation { entity: &'static str, attempts: u32 },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("failed to parse config file: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl GameError {
    /// Returns true when the error only affects the current frame.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::SpawnStarvation { .. })
    }
}
