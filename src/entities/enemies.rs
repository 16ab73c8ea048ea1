//! Enemy entity creation
//!
//! Defines the hostile archetypes and spawning functions.
//! Includes per-spawn tier scaling.

use hecs::{Entity, World};

use crate::ecs::{Enemy, EnemyKind, Health, Name, Renderable, StatusEffects, TilePos};

/// Enemy definition with base stats and rendering info
pub struct EnemyDef {
    pub kind: EnemyKind,
    pub glyph: char,
    pub fg: (u8, u8, u8),
    pub hp: f32,
    pub damage: f32,
    /// Hit-chance probability in [0, 1]
    pub accuracy: f32,
    pub xp_value: u32,
}

pub const RAIDER: EnemyDef = EnemyDef {
    kind: EnemyKind::Raider,
    glyph: 'r',
    fg: (200, 120, 70),
    hp: 30.0,
    damage: 6.0,
    accuracy: 0.65,
    xp_value: 20,
};

pub const MUTANT_BEAST: EnemyDef = EnemyDef {
    kind: EnemyKind::MutantBeast,
    glyph: 'b',
    fg: (130, 180, 90),
    hp: 45.0,
    damage: 9.0,
    accuracy: 0.55,
    xp_value: 30,
};

pub const HUNTER: EnemyDef = EnemyDef {
    kind: EnemyKind::Hunter,
    glyph: 'h',
    fg: (170, 150, 200),
    hp: 25.0,
    damage: 7.0,
    accuracy: 0.85,
    xp_value: 35,
};

pub const ABOMINATION: EnemyDef = EnemyDef {
    kind: EnemyKind::Abomination,
    glyph: 'A',
    fg: (190, 80, 160),
    hp: 70.0,
    damage: 12.0,
    accuracy: 0.5,
    xp_value: 60,
};

/// Look up the definition for a kind
pub fn def_for_kind(kind: EnemyKind) -> &'static EnemyDef {
    match kind {
        EnemyKind::Raider => &RAIDER,
        EnemyKind::MutantBeast => &MUTANT_BEAST,
        EnemyKind::Hunter => &HUNTER,
        EnemyKind::Abomination => &ABOMINATION,
    }
}

/// Health multiplier for a spawn tier
fn tier_hp_scale(tier: u32) -> f32 {
    1.0 + 0.35 * (tier.saturating_sub(1)) as f32
}

/// Damage multiplier for a spawn tier
fn tier_damage_scale(tier: u32) -> f32 {
    1.0 + 0.25 * (tier.saturating_sub(1)) as f32
}

/// Spawn an enemy of the given kind and tier at a tile
pub fn spawn_enemy(world: &mut World, kind: EnemyKind, tier: u32, tile: TilePos) -> Entity {
    let def = def_for_kind(kind);
    world.spawn((
        Name::new(def.kind.name()),
        tile.center(),
        Renderable::new(def.glyph, def.fg).with_order(50),
        Enemy {
            kind: def.kind,
            tier,
            damage: def.damage * tier_damage_scale(tier),
            accuracy: def.accuracy,
            xp_value: def.xp_value * tier,
        },
        Health::new(def.hp * tier_hp_scale(tier)),
        StatusEffects::default(),
    ))
}

/// Spawn the standard starting pack: one of each kind at tiers 1 through 4
pub fn spawn_tiered_pack(world: &mut World, tiles: [TilePos; 4]) -> Vec<Entity> {
    let kinds = [
        EnemyKind::Raider,
        EnemyKind::MutantBeast,
        EnemyKind::Hunter,
        EnemyKind::Abomination,
    ];
    kinds
        .iter()
        .zip(tiles)
        .enumerate()
        .map(|(i, (&kind, tile))| spawn_enemy(world, kind, i as u32 + 1, tile))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_scaling_raises_stats() {
        let mut world = World::new();
        let low = spawn_enemy(&mut world, EnemyKind::Raider, 1, TilePos::new(1, 1));
        let high = spawn_enemy(&mut world, EnemyKind::Raider, 4, TilePos::new(2, 2));

        let low_hp = world.get::<&Health>(low).unwrap().max;
        let high_hp = world.get::<&Health>(high).unwrap().max;
        assert!(high_hp > low_hp);

        let low_dmg = world.get::<&Enemy>(low).unwrap().damage;
        let high_dmg = world.get::<&Enemy>(high).unwrap().damage;
        assert!(high_dmg > low_dmg);
        assert_eq!(world.get::<&Enemy>(high).unwrap().xp_value, RAIDER.xp_value * 4);
    }

    #[test]
    fn test_tiered_pack_spawns_all_kinds_alive() {
        let mut world = World::new();
        let tiles = [
            TilePos::new(1, 1),
            TilePos::new(3, 1),
            TilePos::new(1, 3),
            TilePos::new(3, 3),
        ];
        let pack = spawn_tiered_pack(&mut world, tiles);
        assert_eq!(pack.len(), 4);
        for (i, &entity) in pack.iter().enumerate() {
            assert!(world.get::<&Health>(entity).unwrap().is_alive());
            assert_eq!(world.get::<&Enemy>(entity).unwrap().tier, i as u32 + 1);
        }
    }
}
