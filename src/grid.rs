use rand::Rng;
use rand_distr::StandardNormal;

use crate::config::{CELL_SIZE, GridSize};
use crate::input::Direction;

/// Spread of spawn positions around the grid midpoint, as a fraction of the
/// grid dimension.
const SPAWN_SPREAD: f64 = 0.15;

/// Top-left corner of a cell, in game units.
///
/// Two entities collide exactly when their positions are equal.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this position moved `distance` units towards `direction`.
    #[must_use]
    pub fn step(self, direction: Direction, distance: i32) -> Self {
        match direction {
            Direction::Up => Self::new(self.x, self.y - distance),
            Direction::Down => Self::new(self.x, self.y + distance),
            Direction::Left => Self::new(self.x - distance, self.y),
            Direction::Right => Self::new(self.x + distance, self.y),
        }
    }

    /// Returns true when the cell at this position lies fully inside the grid.
    #[must_use]
    pub fn is_within_bounds(self, grid: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x <= grid.width - CELL_SIZE
            && self.y <= grid.height - CELL_SIZE
    }
}

/// Rounds `value` down to the nearest multiple of the cell size.
#[must_use]
pub fn quantize(value: i32) -> i32 {
    value.div_euclid(CELL_SIZE) * CELL_SIZE
}

/// Samples a cell-aligned position inside `grid`.
///
/// Each axis is drawn from a normal distribution centered on the grid
/// midpoint, so spawns cluster towards the middle. Any in-bounds cell can be
/// returned; callers reject occupied cells and sample again.
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, grid: GridSize) -> Position {
    Position::new(
        sample_axis(rng, grid.width),
        sample_axis(rng, grid.height),
    )
}

fn sample_axis<R: Rng + ?Sized>(rng: &mut R, dimension: i32) -> i32 {
    let dimension_f = f64::from(dimension);
    let z: f64 = rng.sample(StandardNormal);
    let value = dimension_f / 2.0 + z * SPAWN_SPREAD * dimension_f;
    let clamped = value.clamp(0.0, f64::from(dimension - 1));

    // clamped lies in [0, dimension - 1], so the cast cannot overflow
    quantize(clamped.floor() as i32)
}
