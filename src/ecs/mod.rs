//! Entity Component System module
//!
//! Defines all components for the game.

pub mod components;

pub use components::*;
