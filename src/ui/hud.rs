use std::time::Duration;

use ratatui::style::Color;

use crate::config::{CELL_SIZE, GridSize, WHITE};
use crate::draw::{Drawable, Surface, text_width};
use crate::grid::Position;

/// Score and play time shown in the top-right corner of the field.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo {
    pub score: u32,
    pub time_played: Duration,
    pub grid: GridSize,
    pub color: Color,
}

impl HudInfo {
    #[must_use]
    pub fn new(score: u32, time_played: Duration, grid: GridSize) -> Self {
        Self {
            score,
            time_played,
            grid,
            color: WHITE,
        }
    }

    #[must_use]
    pub fn score_line(&self) -> String {
        format!("Score: {}", self.score)
    }

    #[must_use]
    pub fn time_line(&self) -> String {
        format!("Time Played: {:.0}s", self.time_played.as_secs_f64())
    }

    fn right_aligned(&self, text: &str, y: i32) -> Position {
        let x = self.grid.width - CELL_SIZE - text_width(text);
        Position::new(x.max(0), y)
    }
}

impl Drawable for HudInfo {
    fn draw(&self, surface: &mut dyn Surface) {
        let score = self.score_line();
        let time = self.time_line();

        // one terminal row holds two grid rows
        surface.draw_text(&score, self.right_aligned(&score, 0), self.color);
        surface.draw_text(&time, self.right_aligned(&time, 2 * CELL_SIZE), self.color);
    }
}
