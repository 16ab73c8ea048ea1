//! Player entity creation

use hecs::{Entity, World};

use crate::ecs::{
    Experience, Health, MutationState, Name, Player, Renderable, StatusEffects, TilePos, TraitKind,
    Traits,
};

/// Starting health for a fresh survivor
pub const PLAYER_START_HP: f32 = 100.0;

/// Spawn the player entity at a tile
pub fn spawn_player(world: &mut World, tile: TilePos) -> Entity {
    world.spawn((
        Player,
        Name::new("Survivor"),
        tile.center(),
        Renderable::new('@', (255, 235, 180)).with_order(100),
        Health::new(PLAYER_START_HP),
        Experience::new(),
        MutationState::default(),
        // Character traits are fixed at creation
        Traits(vec![TraitKind::Survivor, TraitKind::SteadyHands]),
        StatusEffects::default(),
    ))
}
