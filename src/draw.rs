use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use unicode_width::UnicodeWidthStr;

use crate::config::{CELL_SIZE, GridSize};
use crate::grid::Position;

/// Upper half-block glyph: foreground paints the top grid row of a terminal
/// cell, background paints the bottom one.
pub const GLYPH_HALF_UPPER: &str = "▀";

/// Paint target for game entities. Coordinates and sizes are in game units.
pub trait Surface {
    fn fill_rect(&mut self, position: Position, width: i32, height: i32, color: Color);

    fn draw_text(&mut self, text: &str, position: Position, color: Color);
}

/// Anything that knows how to paint itself onto a [`Surface`].
pub trait Drawable {
    fn draw(&self, surface: &mut dyn Surface);
}

/// Returns the width of `text` in game units when drawn on a [`Surface`].
#[must_use]
pub fn text_width(text: &str) -> i32 {
    i32::try_from(text.width()).unwrap_or(i32::MAX / CELL_SIZE) * CELL_SIZE
}

/// Number of terminal columns and rows needed to show `grid`.
#[must_use]
pub fn terminal_size_for(grid: GridSize) -> (u16, u16) {
    let columns = u16::try_from(grid.cells_wide()).unwrap_or(u16::MAX);
    let rows = u16::try_from((grid.cells_high() + 1) / 2).unwrap_or(u16::MAX);
    (columns, rows)
}

/// [`Surface`] over a ratatui buffer that packs two grid rows into every
/// terminal row. Anything outside `area` is clipped.
pub struct HalfBlockCanvas<'a> {
    buffer: &'a mut Buffer,
    area: Rect,
    background: Color,
}

impl<'a> HalfBlockCanvas<'a> {
    #[must_use]
    pub fn new(buffer: &'a mut Buffer, area: Rect, background: Color) -> Self {
        Self {
            buffer,
            area,
            background,
        }
    }

    /// Paints every cell of the canvas with the background color.
    pub fn clear(&mut self) {
        let style = Style::new().fg(self.background).bg(self.background);
        for y in self.area.top()..self.area.bottom() {
            for x in self.area.left()..self.area.right() {
                self.buffer.set_string(x, y, GLYPH_HALF_UPPER, style);
            }
        }
    }

    fn paint_cell(&mut self, column: i32, row: i32, color: Color) {
        let Some((x, y)) = self.terminal_cell(column, row / 2) else {
            return;
        };
        let Some(cell) = self.buffer.cell_mut((x, y)) else {
            return;
        };

        cell.set_symbol(GLYPH_HALF_UPPER);
        if row % 2 == 0 {
            cell.set_fg(color);
        } else {
            cell.set_bg(color);
        }
    }

    fn terminal_cell(&self, column: i32, row: i32) -> Option<(u16, u16)> {
        let x = self.area.x.checked_add(u16::try_from(column).ok()?)?;
        let y = self.area.y.checked_add(u16::try_from(row).ok()?)?;
        if x >= self.area.right() || y >= self.area.bottom() {
            return None;
        }
        Some((x, y))
    }
}

impl Surface for HalfBlockCanvas<'_> {
    fn fill_rect(&mut self, position: Position, width: i32, height: i32, color: Color) {
        let first_column = position.x.div_euclid(CELL_SIZE);
        let first_row = position.y.div_euclid(CELL_SIZE);
        let columns = (width + CELL_SIZE - 1) / CELL_SIZE;
        let rows = (height + CELL_SIZE - 1) / CELL_SIZE;

        for row in first_row..first_row + rows {
            for column in first_column..first_column + columns {
                self.paint_cell(column, row, color);
            }
        }
    }

    fn draw_text(&mut self, text: &str, position: Position, color: Color) {
        let column = position.x.div_euclid(CELL_SIZE);
        let row = position.y.div_euclid(CELL_SIZE) / 2;
        let Some((x, y)) = self.terminal_cell(column, row) else {
            return;
        };

        // bg is left alone so the lower grid row stays visible behind labels
        let available = usize::from(self.area.right() - x);
        let style = Style::new().fg(color);
        self.buffer.set_stringn(x, y, text, available, style);
    }
}
