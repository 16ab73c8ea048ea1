//! Game module - Core game logic and state management

mod input;
mod state;

pub use input::{InputFrame, MouseClick};
pub use state::{Game, GameState, DEATH_TO_GAME_OVER_SECS, DISPLAY_LOG_LINES};
