use log::debug;
use rand::Rng;
use ratatui::style::Color;

use crate::collision::{PositionGroup, collides_with};
use crate::config::{CELL_SIZE, FOOD_COLORS, FOOD_SCORES, GridSize};
use crate::draw::{Drawable, Surface};
use crate::error::GameError;
use crate::grid::{Position, random_position};

/// Food entity currently on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Food {
    pub position: Position,
    pub color: Color,
    pub score: u32,
    pub width: i32,
    pub height: i32,
}

impl Food {
    #[must_use]
    pub fn new(position: Position, color: Color, score: u32) -> Self {
        Self {
            position,
            color,
            score,
            width: CELL_SIZE,
            height: CELL_SIZE,
        }
    }
}

impl Drawable for Food {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_rect(self.position, self.width, self.height, self.color);
    }
}

/// Cyclic source of food colors and their scores.
///
/// The two lists are index-aligned, so a color always maps to the same score.
#[derive(Debug, Clone)]
pub struct FoodPalette {
    colors: Vec<Color>,
    scores: Vec<u32>,
    cursor: usize,
}

impl FoodPalette {
    pub fn new(colors: Vec<Color>, scores: Vec<u32>) -> Result<Self, GameError> {
        if colors.is_empty() || colors.len() != scores.len() {
            return Err(GameError::InvalidPalette {
                colors: colors.len(),
                scores: scores.len(),
            });
        }

        Ok(Self {
            colors,
            scores,
            cursor: 0,
        })
    }

    /// Returns the color and score the next food will get.
    #[must_use]
    pub fn current(&self) -> (Color, u32) {
        (self.colors[self.cursor], self.scores[self.cursor])
    }

    /// Moves to the next entry, wrapping after the last one.
    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % self.colors.len();
    }
}

impl Default for FoodPalette {
    fn default() -> Self {
        Self {
            colors: FOOD_COLORS.to_vec(),
            scores: FOOD_SCORES.to_vec(),
            cursor: 0,
        }
    }
}

/// Owns the foods on the board and places new ones.
#[derive(Debug, Clone)]
pub struct FoodController {
    foods: Vec<Food>,
    palette: FoodPalette,
    grid: GridSize,
    max_food: usize,
    max_attempts: u32,
}

impl FoodController {
    #[must_use]
    pub fn new(grid: GridSize, max_food: usize, max_attempts: u32) -> Self {
        Self::with_palette(grid, max_food, max_attempts, FoodPalette::default())
    }

    #[must_use]
    pub fn with_palette(
        grid: GridSize,
        max_food: usize,
        max_attempts: u32,
        palette: FoodPalette,
    ) -> Self {
        Self {
            foods: Vec::new(),
            palette,
            grid,
            max_food,
            max_attempts,
        }
    }

    /// Places a food at `position` using the palette's current entry, then
    /// advances the palette.
    pub fn spawn_at(&mut self, position: Position) -> Food {
        let (color, score) = self.palette.current();
        let food = Food::new(position, color, score);
        self.foods.push(food);
        self.palette.advance();
        debug!("food spawned at ({}, {}) worth {score}", position.x, position.y);
        food
    }

    /// Generates `count` foods at random positions free of `obstacles`.
    ///
    /// Each food gets at most `max_attempts` samples. Foods placed before a
    /// starved one are kept.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        count: usize,
        obstacles: &[PositionGroup<'_>],
    ) -> Result<Vec<Food>, GameError> {
        let mut generated = Vec::new();

        for _ in 0..count {
            let position = self.free_position(rng, obstacles)?;
            generated.push(self.spawn_at(position));
        }

        Ok(generated)
    }

    fn free_position<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        obstacles: &[PositionGroup<'_>],
    ) -> Result<Position, GameError> {
        let taken = self.positions();

        for _ in 0..self.max_attempts {
            let candidate = random_position(rng, self.grid);
            if collides_with(candidate.into(), obstacles)
                || collides_with(candidate.into(), &[(&taken).into()])
            {
                continue;
            }
            return Ok(candidate);
        }

        Err(GameError::SpawnStarvation {
            entity: "food",
            attempts: self.max_attempts,
        })
    }

    /// Removes and returns the food at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Food> {
        (index < self.foods.len()).then(|| self.foods.remove(index))
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Food> {
        self.foods.get(index)
    }

    #[must_use]
    pub fn all(&self) -> &[Food] {
        &self.foods
    }

    #[must_use]
    pub fn position(&self, index: usize) -> Option<Position> {
        self.foods.get(index).map(|food| food.position)
    }

    #[must_use]
    pub fn positions(&self) -> Vec<Position> {
        self.foods.iter().map(|food| food.position).collect()
    }

    /// Returns the first food lying on `position`.
    #[must_use]
    pub fn food_at(&self, position: Position) -> Option<&Food> {
        self.foods.iter().find(|food| food.position == position)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.foods.len()
    }

    /// Number of foods missing to reach the target.
    #[must_use]
    pub fn missing(&self) -> usize {
        self.max_food.saturating_sub(self.foods.len())
    }
}

impl Drawable for FoodController {
    fn draw(&self, surface: &mut dyn Surface) {
        for food in &self.foods {
            food.draw(surface);
        }
    }
}
