//! Attack resolution
//!
//! Hit rolls against accuracy probabilities and flat-damage math, with
//! mutation and trait modifiers folded in.

use rand::Rng;

use crate::ecs::{MutationState, StatusEffects, StatusKind, TraitKind, Traits};
use crate::mutations::MutationKind;

/// Base melee damage for an unmutated survivor
pub const PLAYER_BASE_DAMAGE: f32 = 10.0;

/// Base hit probability for the player
pub const PLAYER_BASE_ACCURACY: f32 = 0.8;

/// Roll a hit against an accuracy probability in [0, 1]
pub fn roll_hit(accuracy: f32, rng: &mut impl Rng) -> bool {
    rng.gen::<f32>() < accuracy.clamp(0.0, 1.0)
}

/// The player's effective melee damage given mutations and status
pub fn player_damage(mutations: &MutationState, statuses: &StatusEffects) -> f32 {
    let mut damage = PLAYER_BASE_DAMAGE + 2.5 * mutations.level(MutationKind::FeralStrength) as f32;
    if statuses.has(StatusKind::Adrenal) {
        damage *= 1.5;
    }
    damage
}

/// The player's effective hit probability given traits
pub fn player_accuracy(traits: &Traits) -> f32 {
    let mut accuracy = PLAYER_BASE_ACCURACY;
    if traits.has(TraitKind::SteadyHands) {
        accuracy += 0.05;
    }
    accuracy.clamp(0.0, 1.0)
}

/// Reduce incoming damage by the player's defensive mutations.
///
/// A connecting hit always deals at least 1 damage.
pub fn mitigate(damage: f32, mutations: &MutationState) -> f32 {
    let mut reduced = damage - mutations.level(MutationKind::ThickHide) as f32;
    if mutations.level(MutationKind::ChitinPlating) > 0 {
        reduced -= 2.0;
    }
    reduced.max(1.0)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_roll_hit_extremes() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert!(roll_hit(1.0, &mut rng));
            assert!(!roll_hit(0.0, &mut rng));
        }
    }

    #[test]
    fn test_feral_strength_scales_damage() {
        let mut mutations = MutationState::default();
        let statuses = StatusEffects::default();
        let base = player_damage(&mutations, &statuses);
        mutations.levels.insert(MutationKind::FeralStrength, 2);
        assert_eq!(player_damage(&mutations, &statuses), base + 5.0);
    }

    #[test]
    fn test_adrenal_multiplies_damage() {
        let mutations = MutationState::default();
        let mut statuses = StatusEffects::default();
        statuses.add_effect(StatusKind::Adrenal, 2.0, 0.0);
        assert_eq!(
            player_damage(&mutations, &statuses),
            PLAYER_BASE_DAMAGE * 1.5
        );
    }

    #[test]
    fn test_mitigation_floors_at_one() {
        let mut mutations = MutationState::default();
        mutations.levels.insert(MutationKind::ThickHide, 3);
        mutations.levels.insert(MutationKind::ChitinPlating, 1);
        assert_eq!(mitigate(10.0, &mutations), 5.0);
        assert_eq!(mitigate(2.0, &mutations), 1.0);
    }
}
