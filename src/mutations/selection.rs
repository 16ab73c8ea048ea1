//! Mutation selection flow
//!
//! Rolls weighted choice sets from the catalog, applies spends against the
//! point / free-pick economy, and tracks the modal selection cursor.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::ecs::MutationState;

use super::{MutationCatalog, MutationKind};

/// Choices offered on a normal (point) spend
pub const CHOICE_COUNT: usize = 3;

/// Produce up to `n` candidate mutations, weighted by catalog weight.
///
/// Mutations already at max level are never offered. If `n` covers the whole
/// eligible set, the full set is returned in catalog order with no duplicates
/// or padding; a free pick passes the catalog size here to surface everything.
pub fn mutation_choices(
    catalog: &MutationCatalog,
    state: &MutationState,
    n: usize,
    rng: &mut impl Rng,
) -> Vec<MutationKind> {
    let mut eligible: Vec<_> = catalog
        .defs()
        .iter()
        .filter(|def| state.level(def.kind) < def.max_level)
        .collect();

    if n >= eligible.len() {
        return eligible.into_iter().map(|d| d.kind).collect();
    }

    let mut choices = Vec::with_capacity(n);
    while choices.len() < n {
        let Ok(picked) = eligible.choose_weighted(rng, |d| d.weight) else {
            break;
        };
        let kind = picked.kind;
        choices.push(kind);
        eligible.retain(|d| d.kind != kind);
    }
    choices
}

/// Apply a selected mutation: raise its level by one and pay for it.
///
/// Returns false with no state change when the relevant counter is empty or
/// the mutation is already at its catalog max.
pub fn spend_mutation_point(
    state: &mut MutationState,
    catalog: &MutationCatalog,
    kind: MutationKind,
    use_free_pick: bool,
) -> bool {
    let level = state.level(kind);
    if level >= catalog.max_level(kind) {
        return false;
    }
    if use_free_pick {
        if state.free_picks == 0 {
            return false;
        }
        state.free_picks -= 1;
    } else {
        if state.points == 0 {
            return false;
        }
        state.points -= 1;
    }
    state.levels.insert(kind, level + 1);
    true
}

/// Cursor state for the modal selection screen
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    pub choices: Vec<MutationKind>,
    pub cursor: usize,
    /// Whether confirming spends a free pick instead of a point
    pub free_pick: bool,
}

impl SelectionState {
    pub fn new(choices: Vec<MutationKind>, free_pick: bool) -> Self {
        Self {
            choices,
            cursor: 0,
            free_pick,
        }
    }

    /// Move the cursor forward, wrapping past the end
    pub fn next(&mut self) {
        if !self.choices.is_empty() {
            self.cursor = (self.cursor + 1) % self.choices.len();
        }
    }

    /// Move the cursor back, wrapping below zero
    pub fn prev(&mut self) {
        if !self.choices.is_empty() {
            self.cursor = (self.cursor + self.choices.len() - 1) % self.choices.len();
        }
    }

    /// Numeric quick-select; out-of-range slots are ignored
    pub fn jump_to(&mut self, slot: usize) -> bool {
        if slot < self.choices.len() {
            self.cursor = slot;
            true
        } else {
            false
        }
    }

    /// The mutation under the cursor
    pub fn selected(&self) -> Option<MutationKind> {
        self.choices.get(self.cursor).copied()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::mutations::default_mutation_defs;

    fn catalog() -> MutationCatalog {
        MutationCatalog::new(default_mutation_defs())
    }

    #[test]
    fn test_choices_exclude_maxed_mutations() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = MutationState::default();
        state
            .levels
            .insert(MutationKind::ThickHide, catalog.max_level(MutationKind::ThickHide));

        for _ in 0..50 {
            let choices = mutation_choices(&catalog, &state, CHOICE_COUNT, &mut rng);
            assert!(choices.len() <= CHOICE_COUNT);
            assert!(!choices.contains(&MutationKind::ThickHide));
        }
    }

    #[test]
    fn test_large_n_returns_exact_eligible_set() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = MutationState::default();
        state
            .levels
            .insert(MutationKind::Gills, catalog.max_level(MutationKind::Gills));

        let choices = mutation_choices(&catalog, &state, usize::MAX, &mut rng);
        assert_eq!(choices.len(), catalog.len() - 1);
        // No duplicates
        for (i, a) in choices.iter().enumerate() {
            assert!(!choices[i + 1..].contains(a));
        }
    }

    #[test]
    fn test_choices_never_duplicate() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(99);
        let state = MutationState::default();
        for _ in 0..50 {
            let choices = mutation_choices(&catalog, &state, CHOICE_COUNT, &mut rng);
            assert_eq!(choices.len(), CHOICE_COUNT);
            for (i, a) in choices.iter().enumerate() {
                assert!(!choices[i + 1..].contains(a));
            }
        }
    }

    #[test]
    fn test_spend_respects_max_level() {
        let catalog = catalog();
        let mut state = MutationState {
            points: 10,
            ..Default::default()
        };
        let max = catalog.max_level(MutationKind::FeralStrength);

        for _ in 0..max {
            assert!(spend_mutation_point(
                &mut state,
                &catalog,
                MutationKind::FeralStrength,
                false
            ));
        }
        assert_eq!(state.level(MutationKind::FeralStrength), max);

        // Past max: always fails, nothing changes
        for _ in 0..3 {
            let before_points = state.points;
            assert!(!spend_mutation_point(
                &mut state,
                &catalog,
                MutationKind::FeralStrength,
                false
            ));
            assert_eq!(state.points, before_points);
            assert_eq!(state.level(MutationKind::FeralStrength), max);
        }
    }

    #[test]
    fn test_free_pick_and_point_spend_touch_separate_counters() {
        let catalog = catalog();
        let mut state = MutationState {
            points: 2,
            free_picks: 1,
            ..Default::default()
        };

        assert!(spend_mutation_point(
            &mut state,
            &catalog,
            MutationKind::ThickHide,
            true
        ));
        assert_eq!(state.free_picks, 0);
        assert_eq!(state.points, 2);

        assert!(spend_mutation_point(
            &mut state,
            &catalog,
            MutationKind::ThickHide,
            false
        ));
        assert_eq!(state.free_picks, 0);
        assert_eq!(state.points, 1);

        // Free pick with empty counter fails cleanly
        assert!(!spend_mutation_point(
            &mut state,
            &catalog,
            MutationKind::Regrowth,
            true
        ));
        assert_eq!(state.level(MutationKind::Regrowth), 0);
    }

    #[test]
    fn test_cursor_wraps_both_directions() {
        let mut sel = SelectionState::new(
            vec![
                MutationKind::ThickHide,
                MutationKind::Regrowth,
                MutationKind::Gills,
            ],
            false,
        );
        assert_eq!(sel.cursor, 0);
        sel.prev();
        assert_eq!(sel.cursor, 2);
        sel.next();
        assert_eq!(sel.cursor, 0);
        sel.next();
        sel.next();
        assert_eq!(sel.cursor, 2);
        sel.next();
        assert_eq!(sel.cursor, 0);
    }

    #[test]
    fn test_quick_select_ignores_out_of_range() {
        let mut sel = SelectionState::new(vec![MutationKind::ThickHide], false);
        assert!(!sel.jump_to(2));
        assert_eq!(sel.cursor, 0);
        assert!(sel.jump_to(0));
        assert_eq!(sel.selected(), Some(MutationKind::ThickHide));
    }
}
