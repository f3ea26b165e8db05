//! **little_mazes** generates small, always solvable mazes for a children's maze game and tracks a
//! player walking through them under an optional fog of war.
//!
//! `maze::build_maze` is the entry point for generation. `moves::attempt_move` and
//! `fog::visibility_of` serve the player facing side, `session::GameSession` ties them together.

pub mod cells;
pub mod fog;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod levels;
pub mod maze;
pub mod moves;
pub mod pathing;
pub mod session;
pub mod units;
mod utils;
