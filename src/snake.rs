use std::collections::VecDeque;

use ratatui::style::Color;

use crate::config::{CELL_SIZE, SNAKE_COLOR};
use crate::draw::{Drawable, Surface};
use crate::grid::Position;
use crate::input::Direction;

/// One colored square of the snake body.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Block {
    pub position: Position,
    pub color: Color,
    pub width: i32,
    pub height: i32,
}

impl Block {
    /// Creates a one-cell block.
    #[must_use]
    pub fn new(position: Position, color: Color) -> Self {
        Self {
            position,
            color,
            width: CELL_SIZE,
            height: CELL_SIZE,
        }
    }
}

/// The player's snake. The front of the body is the tail, the back is the head.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Block>,
    direction: Direction,
    grow_pending: bool,
}

impl Snake {
    /// Creates a snake from explicit blocks, tail first.
    ///
    /// Returns `None` for an empty body.
    #[must_use]
    pub fn from_blocks(blocks: Vec<Block>, direction: Direction) -> Option<Self> {
        if blocks.is_empty() {
            return None;
        }

        Some(Self {
            body: VecDeque::from(blocks),
            direction,
            grow_pending: false,
        })
    }

    /// Creates a default-colored snake from positions, tail first.
    #[must_use]
    pub fn from_positions(positions: &[Position], direction: Direction) -> Option<Self> {
        let blocks = positions
            .iter()
            .map(|position| Block::new(*position, SNAKE_COLOR))
            .collect();
        Self::from_blocks(blocks, direction)
    }

    /// Creates the two-block starting snake with its head on `head`, the
    /// tail one cell behind it.
    #[must_use]
    pub fn starting(head: Position, direction: Direction) -> Self {
        let tail = head.step(direction.opposite(), CELL_SIZE);
        Self {
            body: VecDeque::from([
                Block::new(tail, SNAKE_COLOR),
                Block::new(head, SNAKE_COLOR),
            ]),
            direction,
            grow_pending: false,
        }
    }

    /// Sets the heading without any validation; reversal checks belong to the caller.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Advances the snake by `distance` units.
    ///
    /// A new default-colored head is appended. Without pending growth every
    /// older block takes the color of the block behind it and the tail is
    /// dropped, so colors keep their place along the body while it slides.
    pub fn move_forward(&mut self, distance: i32) {
        let new_head = self.head_position().step(self.direction, distance);
        self.body.push_back(Block::new(new_head, SNAKE_COLOR));

        if std::mem::take(&mut self.grow_pending) {
            return;
        }

        let last_old = self.body.len() - 2;
        for index in (1..=last_old).rev() {
            self.body[index].color = self.body[index - 1].color;
        }
        let _ = self.body.pop_front();
    }

    /// Advances one cell and keeps the tail, adding one block to the body.
    ///
    /// The block directly behind the new head takes `color`; the new head
    /// keeps the default color.
    pub fn grow(&mut self, color: Color) {
        self.grow_pending = true;
        self.move_forward(CELL_SIZE);

        let behind_head = self.body.len() - 2;
        self.body[behind_head].color = color;
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head_position(&self) -> Position {
        self.head().position
    }

    /// Returns the head block.
    #[must_use]
    pub fn head(&self) -> &Block {
        // the body is never empty: constructors reject it and moves add before removing
        &self.body[self.body.len() - 1]
    }

    /// Returns every body position, tail first.
    #[must_use]
    pub fn positions(&self) -> Vec<Position> {
        self.body.iter().map(|block| block.position).collect()
    }

    /// Returns every body position except the head, tail first.
    #[must_use]
    pub fn body_positions(&self) -> Vec<Position> {
        self.body
            .iter()
            .take(self.body.len() - 1)
            .map(|block| block.position)
            .collect()
    }

    /// Returns true if any block occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.iter().any(|block| block.position == position)
    }

    /// Iterates over body blocks from tail to head.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.body.iter()
    }

    /// Returns current block count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; kept for the `len` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

impl Drawable for Block {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_rect(self.position, self.width, self.height, self.color);
    }
}

impl Drawable for Snake {
    fn draw(&self, surface: &mut dyn Surface) {
        for block in &self.body {
            block.draw(surface);
        }
    }
}
