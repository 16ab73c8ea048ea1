//! Entity creation and management

pub mod enemies;
pub mod player;

pub use enemies::{def_for_kind, spawn_enemy, spawn_tiered_pack, EnemyDef};
pub use player::{spawn_player, PLAYER_START_HP};
