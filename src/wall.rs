use std::fmt;
use std::str::FromStr;

use log::debug;
use rand::Rng;
use ratatui::style::Color;

use crate::collision::{PositionGroup, collides_with};
use crate::config::{CELL_SIZE, DEFAULT_WALL_LENGTH, GridSize, WALL_COLOR};
use crate::draw::{Drawable, Surface};
use crate::error::GameError;
use crate::grid::{Position, random_position};

/// Long axis of a wall.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Picks either orientation with equal probability.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }
}

impl FromStr for Orientation {
    type Err = GameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Horizontal" | "horizontal" => Ok(Self::Horizontal),
            "Vertical" | "vertical" => Ok(Self::Vertical),
            other => Err(GameError::InvalidOrientation(other.to_owned())),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => f.write_str("Horizontal"),
            Self::Vertical => f.write_str("Vertical"),
        }
    }
}

/// A straight obstacle. Collisions use its cell footprint, not its bounding box.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Wall {
    orientation: Orientation,
    position: Position,
    width: i32,
    height: i32,
    color: Color,
    footprint: Vec<Position>,
}

impl Wall {
    /// Creates a default-sized wall: 50 units long, one cell thick.
    #[must_use]
    pub fn new(orientation: Orientation, position: Position) -> Self {
        let (width, height) = match orientation {
            Orientation::Horizontal => (DEFAULT_WALL_LENGTH, CELL_SIZE),
            Orientation::Vertical => (CELL_SIZE, DEFAULT_WALL_LENGTH),
        };
        Self::build(orientation, position, width, height, WALL_COLOR)
    }

    /// Creates a wall with an explicit size and color.
    pub fn with_size(
        orientation: Orientation,
        position: Position,
        width: i32,
        height: i32,
        color: Color,
    ) -> Result<Self, GameError> {
        let aligned = |side: i32| side > 0 && side % CELL_SIZE == 0;
        if !aligned(width) || !aligned(height) {
            return Err(GameError::InvalidWall { width, height });
        }

        Ok(Self::build(orientation, position, width, height, color))
    }

    fn build(
        orientation: Orientation,
        position: Position,
        width: i32,
        height: i32,
        color: Color,
    ) -> Self {
        let footprint = match orientation {
            Orientation::Horizontal => (position.x..position.x + width)
                .step_by(CELL_SIZE as usize)
                .map(|x| Position::new(x, position.y))
                .collect(),
            Orientation::Vertical => (position.y..position.y + height)
                .step_by(CELL_SIZE as usize)
                .map(|y| Position::new(position.x, y))
                .collect(),
        };

        Self {
            orientation,
            position,
            width,
            height,
            color,
            footprint,
        }
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Cells the wall occupies along its long axis.
    #[must_use]
    pub fn footprint(&self) -> &[Position] {
        &self.footprint
    }

    fn fits(&self, grid: GridSize) -> bool {
        self.footprint
            .iter()
            .all(|cell| cell.is_within_bounds(grid))
    }
}

impl Drawable for Wall {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_rect(self.position, self.width, self.height, self.color);
    }
}

/// Owns the walls on the board and places new ones.
#[derive(Debug, Clone)]
pub struct WallController {
    walls: Vec<Wall>,
    grid: GridSize,
    max_attempts: u32,
}

impl WallController {
    #[must_use]
    pub fn new(grid: GridSize, max_attempts: u32) -> Self {
        Self {
            walls: Vec::new(),
            grid,
            max_attempts,
        }
    }

    pub fn add(&mut self, wall: Wall) {
        let position = wall.position();
        debug!(
            "{} wall added at ({}, {})",
            wall.orientation(),
            position.x,
            position.y
        );
        self.walls.push(wall);
    }

    /// Generates `count` default walls of random orientation whose whole
    /// footprint lies inside the grid and clear of `obstacles`.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        count: usize,
        obstacles: &[PositionGroup<'_>],
    ) -> Result<Vec<Wall>, GameError> {
        let mut generated = Vec::new();

        for _ in 0..count {
            let wall = self.free_wall(rng, obstacles)?;
            self.add(wall.clone());
            generated.push(wall);
        }

        Ok(generated)
    }

    fn free_wall<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        obstacles: &[PositionGroup<'_>],
    ) -> Result<Wall, GameError> {
        for _ in 0..self.max_attempts {
            let position = random_position(rng, self.grid);
            let wall = Wall::new(Orientation::random(rng), position);
            if wall.fits(self.grid)
                && !collides_with(PositionGroup::Many(wall.footprint()), obstacles)
            {
                return Ok(wall);
            }
        }

        Err(GameError::SpawnStarvation {
            entity: "wall",
            attempts: self.max_attempts,
        })
    }

    pub fn remove(&mut self, index: usize) -> Option<Wall> {
        (index < self.walls.len()).then(|| self.walls.remove(index))
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Wall> {
        self.walls.get(index)
    }

    #[must_use]
    pub fn all(&self) -> &[Wall] {
        &self.walls
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.walls.len()
    }

    /// Every cell covered by any wall, wall by wall.
    #[must_use]
    pub fn collision_cells(&self) -> Vec<Position> {
        self.walls
            .iter()
            .flat_map(|wall| wall.footprint().iter().copied())
            .collect()
    }
}

impl Drawable for WallController {
    fn draw(&self, surface: &mut dyn Surface) {
        for wall in &self.walls {
            wall.draw(surface);
        }
    }
}
