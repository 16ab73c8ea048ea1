//! Game services
//!
//! An explicitly constructed bundle of subsystem state, owned by the game
//! and passed by reference to whatever needs it. Construction builds every
//! subsystem unconditionally, so a partially initialized bundle cannot
//! exist; `reset` rolls session-scoped subsystems back to a blank slate
//! without touching catalog data; teardown is ordinary drop.

use std::collections::HashMap;

use crate::ecs::EnemyKind;
use crate::mutations::MutationCatalog;

/// Salvage cost of one stim
pub const STIM_SALVAGE_COST: u32 = 3;

/// Health restored by one stim
pub const STIM_HEAL: f32 = 15.0;

/// Research units needed to finish a project
pub const RESEARCH_PROJECT_COST: u32 = 5;

/// Seconds of exploration before the ash rain soaks through
pub const EXPOSURE_LIMIT: f32 = 45.0;

/// The full subsystem bundle
pub struct GameServices {
    /// Catalog-only; survives reset
    pub mutations: MutationCatalog,
    pub crafting: Crafting,
    pub research: Research,
    pub quests: Quests,
    pub factions: Factions,
    pub survival: Survival,
}

impl GameServices {
    /// Construct every subsystem
    pub fn new(mutations: MutationCatalog) -> Self {
        Self {
            mutations,
            crafting: Crafting::default(),
            research: Research::default(),
            quests: Quests::default(),
            factions: Factions::default(),
            survival: Survival::default(),
        }
    }

    /// Roll session-scoped subsystems back to a blank slate.
    ///
    /// The mutation catalog is static data and is left untouched.
    pub fn reset(&mut self) {
        log::debug!("Resetting session services");
        self.crafting = Crafting::default();
        self.research = Research::default();
        self.quests = Quests::default();
        self.factions = Factions::default();
        self.survival = Survival::default();
    }
}

// =============================================================================
// Crafting
// =============================================================================

/// Scrap-based field crafting
#[derive(Debug, Default)]
pub struct Crafting {
    salvage: u32,
}

impl Crafting {
    pub fn salvage(&self) -> u32 {
        self.salvage
    }

    pub fn add_salvage(&mut self, amount: u32) {
        self.salvage += amount;
    }

    /// Craft a healing stim if enough salvage is on hand.
    /// Returns the heal amount, or None with no state change.
    pub fn craft_stim(&mut self) -> Option<f32> {
        if self.salvage < STIM_SALVAGE_COST {
            return None;
        }
        self.salvage -= STIM_SALVAGE_COST;
        Some(STIM_HEAL)
    }
}

// =============================================================================
// Research
// =============================================================================

/// Slow-burn study of the mutagen
#[derive(Debug, Default)]
pub struct Research {
    progress: u32,
    completed: u32,
}

impl Research {
    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// Put one unit of work in. Returns true when a project completes;
    /// the caller awards a free mutation pick for it.
    pub fn advance(&mut self) -> bool {
        self.progress += 1;
        if self.progress >= RESEARCH_PROJECT_COST {
            self.progress = 0;
            self.completed += 1;
            true
        } else {
            false
        }
    }
}

// =============================================================================
// Quests
// =============================================================================

/// Kill ledger for bounty tracking
#[derive(Debug, Default)]
pub struct Quests {
    kills: HashMap<EnemyKind, u32>,
}

impl Quests {
    pub fn record_kill(&mut self, kind: EnemyKind) {
        *self.kills.entry(kind).or_insert(0) += 1;
    }

    pub fn kills(&self, kind: EnemyKind) -> u32 {
        self.kills.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_kills(&self) -> u32 {
        self.kills.values().sum()
    }
}

// =============================================================================
// Factions
// =============================================================================

/// The surviving powers of the wasteland
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactionId {
    Ashwalkers,
    Scrappers,
    Covenant,
}

impl FactionId {
    pub fn name(&self) -> &'static str {
        match self {
            FactionId::Ashwalkers => "Ashwalkers",
            FactionId::Scrappers => "Scrappers",
            FactionId::Covenant => "Covenant",
        }
    }
}

/// Session-scoped standing with each faction
#[derive(Debug, Default)]
pub struct Factions {
    reputation: HashMap<FactionId, i32>,
}

impl Factions {
    pub fn adjust(&mut self, faction: FactionId, delta: i32) {
        *self.reputation.entry(faction).or_insert(0) += delta;
    }

    pub fn reputation(&self, faction: FactionId) -> i32 {
        self.reputation.get(&faction).copied().unwrap_or(0)
    }

    /// Standing changes from a confirmed kill
    pub fn record_kill(&mut self, kind: EnemyKind) {
        match kind {
            // The Ashwalkers pay for raider scalps
            EnemyKind::Raider => self.adjust(FactionId::Ashwalkers, 1),
            // The Covenant wants the abominations purged
            EnemyKind::Abomination => self.adjust(FactionId::Covenant, 2),
            _ => {}
        }
    }
}

// =============================================================================
// Survival
// =============================================================================

/// What the wasteland did to you this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurvivalEvent {
    /// Ash rain soaked through; the player is Wet
    Soaked,
}

/// Exposure to the elements while above ground
#[derive(Debug, Default)]
pub struct Survival {
    exposure: f32,
}

impl Survival {
    pub fn exposure(&self) -> f32 {
        self.exposure
    }

    /// Accumulate exposure; crossing the limit emits an event and wraps.
    pub fn tick(&mut self, dt: f32) -> Option<SurvivalEvent> {
        self.exposure += dt;
        if self.exposure >= EXPOSURE_LIMIT {
            self.exposure -= EXPOSURE_LIMIT;
            Some(SurvivalEvent::Soaked)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutations::default_mutation_defs;

    #[test]
    fn test_reset_clears_session_state_but_not_catalog() {
        let catalog = MutationCatalog::new(default_mutation_defs());
        let catalog_len = catalog.len();
        let mut services = GameServices::new(catalog);

        services.crafting.add_salvage(10);
        services.quests.record_kill(EnemyKind::Raider);
        services.factions.record_kill(EnemyKind::Raider);
        services.research.advance();
        services.survival.tick(10.0);

        services.reset();
        assert_eq!(services.crafting.salvage(), 0);
        assert_eq!(services.quests.total_kills(), 0);
        assert_eq!(services.factions.reputation(FactionId::Ashwalkers), 0);
        assert_eq!(services.research.progress(), 0);
        assert_eq!(services.survival.exposure(), 0.0);
        assert_eq!(services.mutations.len(), catalog_len);
    }

    #[test]
    fn test_craft_stim_requires_salvage() {
        let mut crafting = Crafting::default();
        assert_eq!(crafting.craft_stim(), None);

        crafting.add_salvage(STIM_SALVAGE_COST);
        assert_eq!(crafting.craft_stim(), Some(STIM_HEAL));
        assert_eq!(crafting.salvage(), 0);
        assert_eq!(crafting.craft_stim(), None);
    }

    #[test]
    fn test_research_completes_at_project_cost() {
        let mut research = Research::default();
        for _ in 0..RESEARCH_PROJECT_COST - 1 {
            assert!(!research.advance());
        }
        assert!(research.advance());
        assert_eq!(research.completed(), 1);
        assert_eq!(research.progress(), 0);
    }

    #[test]
    fn test_survival_event_wraps_exposure() {
        let mut survival = Survival::default();
        assert_eq!(survival.tick(EXPOSURE_LIMIT - 1.0), None);
        assert_eq!(survival.tick(2.0), Some(SurvivalEvent::Soaked));
        assert!(survival.exposure() < EXPOSURE_LIMIT);
    }
}
