//! Snake arcade game: a snake grows on colored food while walls pile up and
//! the pace quickens.
//!
//! The game model ([`game::GameState`] and the entities it owns) is
//! independent of the terminal; [`renderer`] and [`terminal_runtime`] put it
//! on screen.

pub mod clock;
pub mod collision;
pub mod config;
pub mod draw;
pub mod error;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod renderer;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
pub mod wall;
