//! Status effects system
//!
//! Handles DoT effects (burning, bleeding) and the wet/stun/adrenal modifiers.

use crate::ecs::{StatusEffect, StatusEffects, StatusKind};

/// Seconds of effect progression represented by one combat round
pub const ROUND_SECONDS: f32 = 1.0;

/// Result of ticking status effects for one combat round
#[derive(Debug, Clone, Default)]
pub struct StatusTickResult {
    /// Net damage from DoT effects (never negative)
    pub damage: f32,
    /// Messages to display
    pub messages: Vec<String>,
}

impl StatusEffects {
    /// Add a status effect, refreshing duration and keeping the stronger
    /// intensity if it is already present.
    ///
    /// Wet and Burning are mutually exclusive: applying Wet douses Burning,
    /// and Burning cannot take hold while Wet.
    pub fn add_effect(&mut self, kind: StatusKind, duration: f32, intensity: f32) {
        match kind {
            StatusKind::Burning if self.has(StatusKind::Wet) => return,
            StatusKind::Wet => self.remove(StatusKind::Burning),
            _ => {}
        }

        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.duration = existing.duration.max(duration);
            existing.intensity = existing.intensity.max(intensity);
        } else {
            self.effects.push(StatusEffect {
                kind,
                duration,
                intensity,
            });
        }
    }

    pub fn remove(&mut self, kind: StatusKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Tick one combat round's worth of effects.
    ///
    /// Returns DoT damage and log lines; expired effects are dropped.
    pub fn tick_round(&mut self, entity_name: &str) -> StatusTickResult {
        let mut result = StatusTickResult::default();

        for effect in &mut self.effects {
            effect.duration -= ROUND_SECONDS;
            match effect.kind {
                StatusKind::Burning => {
                    result.damage += effect.intensity;
                    result.messages.push(format!(
                        "Flames sear {} for {:.0} damage!",
                        entity_name, effect.intensity
                    ));
                }
                StatusKind::Bleeding => {
                    result.damage += effect.intensity;
                    result.messages.push(format!(
                        "Open wounds drain {} for {:.0} damage!",
                        entity_name, effect.intensity
                    ));
                }
                // Other effects don't do damage per round
                _ => {}
            }
        }

        self.effects.retain(|e| e.duration > 0.0);
        result
    }

    /// Tick real time outside combat; fractional DoT damage, no messages.
    pub fn tick_time(&mut self, dt: f32) -> f32 {
        let mut damage = 0.0;
        for effect in &mut self.effects {
            effect.duration -= dt;
            if matches!(effect.kind, StatusKind::Burning | StatusKind::Bleeding) {
                damage += effect.intensity * dt;
            }
        }
        self.effects.retain(|e| e.duration > 0.0);
        damage
    }
}

impl StatusKind {
    /// Display name for this effect
    pub fn name(&self) -> &'static str {
        match self {
            StatusKind::Wet => "Wet",
            StatusKind::Stunned => "Stunned",
            StatusKind::Burning => "Burning",
            StatusKind::Bleeding => "Bleeding",
            StatusKind::Adrenal => "Adrenal",
        }
    }

    /// Display color for this effect (RGB)
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            StatusKind::Wet => (100, 160, 220),
            StatusKind::Stunned => (220, 220, 100),
            StatusKind::Burning => (255, 120, 50),
            StatusKind::Bleeding => (200, 50, 50),
            StatusKind::Adrenal => (255, 170, 90),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wet_douses_and_blocks_burning() {
        let mut effects = StatusEffects::default();
        effects.add_effect(StatusKind::Burning, 3.0, 2.0);
        assert!(effects.has(StatusKind::Burning));

        effects.add_effect(StatusKind::Wet, 5.0, 0.0);
        assert!(!effects.has(StatusKind::Burning));

        effects.add_effect(StatusKind::Burning, 3.0, 2.0);
        assert!(!effects.has(StatusKind::Burning));
    }

    #[test]
    fn test_effects_expire_after_duration() {
        let mut effects = StatusEffects::default();
        effects.add_effect(StatusKind::Bleeding, 2.0, 1.5);

        let first = effects.tick_round("Raider");
        assert_eq!(first.damage, 1.5);
        assert!(effects.has(StatusKind::Bleeding));

        effects.tick_round("Raider");
        assert!(!effects.has(StatusKind::Bleeding));
    }

    #[test]
    fn test_refresh_keeps_stronger_intensity() {
        let mut effects = StatusEffects::default();
        effects.add_effect(StatusKind::Burning, 2.0, 3.0);
        effects.add_effect(StatusKind::Burning, 4.0, 1.0);
        assert_eq!(effects.effects.len(), 1);
        assert_eq!(effects.effects[0].duration, 4.0);
        assert_eq!(effects.effects[0].intensity, 3.0);
    }

    #[test]
    fn test_time_tick_accumulates_fractional_damage() {
        let mut effects = StatusEffects::default();
        effects.add_effect(StatusKind::Burning, 1.0, 2.0);
        let dmg = effects.tick_time(0.5);
        assert!((dmg - 1.0).abs() < 1e-5);
        let dmg = effects.tick_time(0.6);
        assert!((dmg - 1.2).abs() < 1e-5);
        assert!(!effects.has(StatusKind::Burning));
    }
}
