//! Ashfall - a tile-based survival RPG under the ash
//!
//! Scavenge the wasteland, fight what hunts you, and let the mutagen
//! remake your body one point at a time.

pub mod combat;
pub mod data;
pub mod ecs;
pub mod entities;
pub mod game;
pub mod mutations;
pub mod services;
pub mod ui;
pub mod world;

// Re-export commonly used types
pub use game::{Game, GameState};
pub use world::WorldGrid;
