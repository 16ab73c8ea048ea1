//! Mutation catalog
//!
//! Static definitions for every mutation the player can acquire.
//! Immutable after load; defaults below, overridable from RON data.

use serde::{Deserialize, Serialize};

/// Unique mutation identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationKind {
    ThickHide,
    FeralStrength,
    Regrowth,
    AdrenalGlands,
    NightEye,
    AcidBlood,
    ChitinPlating,
    VenomSacs,
    Gills,
}

/// Broad grouping used for display and selection flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationCategory {
    Offense,
    Defense,
    Metabolism,
    Senses,
}

impl MutationCategory {
    pub fn name(&self) -> &'static str {
        match self {
            MutationCategory::Offense => "Offense",
            MutationCategory::Defense => "Defense",
            MutationCategory::Metabolism => "Metabolism",
            MutationCategory::Senses => "Senses",
        }
    }
}

/// A catalog entry for one mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationDef {
    pub kind: MutationKind,
    pub name: String,
    pub description: String,
    pub category: MutationCategory,
    /// Highest level this mutation can reach
    pub max_level: u32,
    /// Relative selection weight when rolling choices
    pub weight: u32,
}

/// The loaded, immutable set of mutation definitions
#[derive(Debug, Clone)]
pub struct MutationCatalog {
    defs: Vec<MutationDef>,
}

impl MutationCatalog {
    pub fn new(defs: Vec<MutationDef>) -> Self {
        Self { defs }
    }

    pub fn defs(&self) -> &[MutationDef] {
        &self.defs
    }

    pub fn find(&self, kind: MutationKind) -> Option<&MutationDef> {
        self.defs.iter().find(|d| d.kind == kind)
    }

    /// Max level for a kind; unknown kinds are treated as already maxed
    pub fn max_level(&self, kind: MutationKind) -> u32 {
        self.find(kind).map(|d| d.max_level).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl Default for MutationCatalog {
    fn default() -> Self {
        Self::new(default_mutation_defs())
    }
}

// =============================================================================
// Default definitions
// =============================================================================

pub fn mutation_thick_hide() -> MutationDef {
    MutationDef {
        kind: MutationKind::ThickHide,
        name: "Thick Hide".to_string(),
        description: "Leathery skin shrugs off a point of damage per level.".to_string(),
        category: MutationCategory::Defense,
        max_level: 3,
        weight: 10,
    }
}

pub fn mutation_feral_strength() -> MutationDef {
    MutationDef {
        kind: MutationKind::FeralStrength,
        name: "Feral Strength".to_string(),
        description: "Dense new muscle. Melee strikes hit harder per level.".to_string(),
        category: MutationCategory::Offense,
        max_level: 3,
        weight: 10,
    }
}

pub fn mutation_regrowth() -> MutationDef {
    MutationDef {
        kind: MutationKind::Regrowth,
        name: "Regrowth".to_string(),
        description: "Torn flesh knits visibly. Recover health each combat round.".to_string(),
        category: MutationCategory::Metabolism,
        max_level: 3,
        weight: 8,
    }
}

pub fn mutation_adrenal_glands() -> MutationDef {
    MutationDef {
        kind: MutationKind::AdrenalGlands,
        name: "Adrenal Glands".to_string(),
        description: "Taking a hit can flood you with adrenaline.".to_string(),
        category: MutationCategory::Metabolism,
        max_level: 2,
        weight: 6,
    }
}

pub fn mutation_night_eye() -> MutationDef {
    MutationDef {
        kind: MutationKind::NightEye,
        name: "Night Eye".to_string(),
        description: "Reflective pupils widen your sight in the gloom.".to_string(),
        category: MutationCategory::Senses,
        max_level: 2,
        weight: 6,
    }
}

pub fn mutation_acid_blood() -> MutationDef {
    MutationDef {
        kind: MutationKind::AcidBlood,
        name: "Acid Blood".to_string(),
        description: "Attackers that draw blood regret it.".to_string(),
        category: MutationCategory::Defense,
        max_level: 2,
        weight: 5,
    }
}

pub fn mutation_chitin_plating() -> MutationDef {
    MutationDef {
        kind: MutationKind::ChitinPlating,
        name: "Chitin Plating".to_string(),
        description: "Hard plates erupt along your back and forearms.".to_string(),
        category: MutationCategory::Defense,
        max_level: 1,
        weight: 4,
    }
}

pub fn mutation_venom_sacs() -> MutationDef {
    MutationDef {
        kind: MutationKind::VenomSacs,
        name: "Venom Sacs".to_string(),
        description: "Your strikes leave wounds that keep bleeding.".to_string(),
        category: MutationCategory::Offense,
        max_level: 2,
        weight: 5,
    }
}

pub fn mutation_gills() -> MutationDef {
    MutationDef {
        kind: MutationKind::Gills,
        name: "Gills".to_string(),
        description: "Fluttering slits on your neck. Water holds no fear.".to_string(),
        category: MutationCategory::Senses,
        max_level: 1,
        weight: 3,
    }
}

/// The built-in catalog, used when no data file overrides it
pub fn default_mutation_defs() -> Vec<MutationDef> {
    vec![
        mutation_thick_hide(),
        mutation_feral_strength(),
        mutation_regrowth(),
        mutation_adrenal_glands(),
        mutation_night_eye(),
        mutation_acid_blood(),
        mutation_chitin_plating(),
        mutation_venom_sacs(),
        mutation_gills(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_consistent() {
        let catalog = MutationCatalog::default();
        assert!(!catalog.is_empty());
        for def in catalog.defs() {
            assert!(def.max_level >= 1, "{} has zero max level", def.name);
            assert!(def.weight >= 1, "{} has zero weight", def.name);
        }
        // Kinds are unique
        for (i, a) in catalog.defs().iter().enumerate() {
            for b in &catalog.defs()[i + 1..] {
                assert_ne!(a.kind, b.kind);
            }
        }
    }

    #[test]
    fn test_unknown_kind_treated_as_maxed() {
        let catalog = MutationCatalog::new(vec![mutation_gills()]);
        assert_eq!(catalog.max_level(MutationKind::ThickHide), 0);
    }
}
