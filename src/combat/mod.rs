//! Combat system

pub mod damage;
pub mod manager;
pub mod status;

pub use damage::{mitigate, player_accuracy, player_damage, roll_hit};
pub use manager::{entity_tile, is_alive, CombatManager, AGGRO_RANGE, DEFAULT_MAX_AP};
pub use status::StatusTickResult;
