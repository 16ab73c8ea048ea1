//! World module
//!
//! Terrain grid, coordinate conversion, and pathfinding.

pub mod grid;
pub mod pathfind;

pub use grid::{Terrain, WorldGrid, TILE_SIZE};
pub use pathfind::find_path;
