//! ECS Components
//!
//! All components used in the game's entity-component system.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::mutations::MutationKind;
use crate::world::TILE_SIZE;

// ============================================================================
// Position & Movement
// ============================================================================

/// Discrete tile coordinate on the world grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another tile
    pub fn manhattan(&self, other: &TilePos) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Chebyshev distance (allows diagonal)
    pub fn chebyshev(&self, other: &TilePos) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// World position at the center of this tile
    pub fn center(&self) -> WorldPos {
        WorldPos {
            x: (self.x as f32 + 0.5) * TILE_SIZE,
            y: (self.y as f32 + 0.5) * TILE_SIZE,
        }
    }

    /// The four cardinal neighbors
    pub fn cardinal_neighbors(&self) -> [TilePos; 4] {
        [
            TilePos::new(self.x + 1, self.y),
            TilePos::new(self.x - 1, self.y),
            TilePos::new(self.x, self.y + 1),
            TilePos::new(self.x, self.y - 1),
        ]
    }
}

/// Continuous position in world units
///
/// Entities live in world space; tile logic converts through `tile()`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
}

impl WorldPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The tile this world position falls in
    pub fn tile(&self) -> TilePos {
        TilePos {
            x: (self.x / TILE_SIZE).floor() as i32,
            y: (self.y / TILE_SIZE).floor() as i32,
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Visual representation of an entity
#[derive(Debug, Clone)]
pub struct Renderable {
    /// Character to display
    pub glyph: char,
    /// Foreground color (RGB)
    pub fg: (u8, u8, u8),
    /// Render order (higher = on top)
    pub render_order: i32,
}

impl Renderable {
    pub fn new(glyph: char, fg: (u8, u8, u8)) -> Self {
        Self {
            glyph,
            fg,
            render_order: 0,
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.render_order = order;
        self
    }
}

// ============================================================================
// Identity & Naming
// ============================================================================

/// Name component for entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Marks an entity as the player
#[derive(Debug, Clone, Copy, Default)]
pub struct Player;

/// Marks an entity as an enemy and carries its combat profile
#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Per-spawn scaling level
    pub tier: u32,
    /// Flat damage dealt on a hit
    pub damage: f32,
    /// Hit-chance probability in [0, 1]
    pub accuracy: f32,
    /// XP awarded to the player on kill
    pub xp_value: u32,
}

/// The kinds of hostiles roaming the wasteland
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Raider,
    MutantBeast,
    Hunter,
    Abomination,
}

impl EnemyKind {
    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Raider => "Raider",
            EnemyKind::MutantBeast => "Mutant Beast",
            EnemyKind::Hunter => "Hunter",
            EnemyKind::Abomination => "Abomination",
        }
    }

    /// Chance for this kind's connecting hit to stun the target
    pub fn stun_chance(&self) -> f32 {
        match self {
            EnemyKind::Abomination => 0.3,
            _ => 0.0,
        }
    }
}

// ============================================================================
// Vitals & Progression
// ============================================================================

/// Health pool
///
/// An entity is alive iff `current > 0`; `current` never exceeds `max`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.min(self.current);
        self.current -= actual;
        actual
    }

    pub fn heal(&mut self, amount: f32) -> f32 {
        let actual = amount.min(self.max - self.current);
        self.current += actual;
        actual
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn percentage(&self) -> f32 {
        self.current / self.max
    }
}

/// Experience and level
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Experience {
    pub level: u32,
    pub current_xp: u32,
    pub xp_to_next: u32,
}

impl Experience {
    pub fn new() -> Self {
        Self {
            level: 1,
            current_xp: 0,
            xp_to_next: 100,
        }
    }

    /// Add XP and return how many levels were gained
    pub fn add_xp(&mut self, amount: u32) -> u32 {
        self.current_xp += amount;
        let mut levels = 0;
        while self.current_xp >= self.xp_to_next {
            self.current_xp -= self.xp_to_next;
            self.level += 1;
            levels += 1;
            // XP curve: each level needs 50 more XP
            self.xp_to_next = 100 + (self.level - 1) * 50;
        }
        levels
    }
}

impl Default for Experience {
    fn default() -> Self {
        Self::new()
    }
}

/// The player's mutation economy: spendable points, free picks,
/// and acquired mutation levels keyed by kind.
#[derive(Debug, Clone, Default)]
pub struct MutationState {
    pub points: u32,
    pub free_picks: u32,
    pub levels: HashMap<MutationKind, u32>,
}

impl MutationState {
    /// Current level of a mutation (0 if not acquired)
    pub fn level(&self, kind: MutationKind) -> u32 {
        self.levels.get(&kind).copied().unwrap_or(0)
    }

    /// Whether the selection flow may open at all
    pub fn can_spend(&self) -> bool {
        self.points > 0 || self.free_picks > 0
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Immutable character traits fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraitKind {
    /// Started over more times than anyone should
    Survivor,
    /// +5% hit chance
    SteadyHands,
    /// Spoiled food never was a problem
    IronGut,
    /// Old wounds, old lessons
    Scarred,
}

impl TraitKind {
    pub fn name(&self) -> &'static str {
        match self {
            TraitKind::Survivor => "Survivor",
            TraitKind::SteadyHands => "Steady Hands",
            TraitKind::IronGut => "Iron Gut",
            TraitKind::Scarred => "Scarred",
        }
    }
}

/// The fixed list of traits on a character
#[derive(Debug, Clone, Default)]
pub struct Traits(pub Vec<TraitKind>);

impl Traits {
    pub fn has(&self, kind: TraitKind) -> bool {
        self.0.contains(&kind)
    }
}

// ============================================================================
// Status Effects
// ============================================================================

/// A status effect on an entity
#[derive(Debug, Clone)]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Remaining duration in seconds
    pub duration: f32,
    /// Effect strength (damage per tick for DoTs)
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Soaked; douses and blocks Burning
    Wet,
    /// Skips combat actions
    Stunned,
    /// Fire damage over time
    Burning,
    /// Physical damage over time
    Bleeding,
    /// Combat high; harder hits
    Adrenal,
}

/// Collection of active status effects
#[derive(Debug, Clone, Default)]
pub struct StatusEffects {
    pub effects: Vec<StatusEffect>,
}
