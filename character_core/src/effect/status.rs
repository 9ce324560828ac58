//! StatusEffect - A lingering effect on a character

use crate::types::{SourceRef, Stat};
use serde::{Deserialize, Serialize};

/// Status type that suppresses passive-sourced effects while active
pub const PASSIVE_BLOCK: &str = "passive_block";

/// Stat modifier carried by a boost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatBoost {
    pub stat_names: Vec<Stat>,
    /// Flat modifier
    pub value: f64,
    /// When set, the modifier is `base * boost_percentage` instead of `value`
    #[serde(default)]
    pub boost_percentage: Option<f64>,
}

impl StatBoost {
    pub fn targets(&self, stat: Stat) -> bool {
        self.stat_names.contains(&stat)
    }

    /// Modifier this boost grants to `stat` whose base value is `base`
    pub fn modifier(&self, stat: Stat, base: f64) -> Option<f64> {
        if !self.targets(stat) {
            return None;
        }
        Some(match self.boost_percentage {
            Some(percentage) => base * percentage,
            None => self.value,
        })
    }
}

/// What a status effect does while active
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusKind {
    StatBoost(StatBoost),
    DamageOverTime { amount: f64 },
    HealOverTime { amount: f64 },
    Stun,
    /// No per-turn action; only its type matters (e.g. `passive_block`)
    Marker,
}

/// Outcome of one turn of a status effect
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickResult {
    /// Positive heals, negative damages
    pub health_delta: f64,
}

/// An active effect on a character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    /// Free-form type tag, e.g. `stat_boost` or `passive_block`
    pub status_effect_type: String,
    pub kind: StatusKind,
    /// Turns remaining
    pub duration: i32,
    pub source: SourceRef,
}

impl StatusEffect {
    pub fn new(status_effect_type: impl Into<String>, kind: StatusKind, duration: i32, source: SourceRef) -> Self {
        StatusEffect {
            status_effect_type: status_effect_type.into(),
            kind,
            duration,
            source,
        }
    }

    /// Stat boost over time
    pub fn stat_boost(stat_names: &[Stat], value: f64, duration: i32, source: SourceRef) -> Self {
        StatusEffect::new(
            "stat_boost",
            StatusKind::StatBoost(StatBoost {
                stat_names: stat_names.to_vec(),
                value,
                boost_percentage: None,
            }),
            duration,
            source,
        )
    }

    pub fn passive_block(duration: i32, source: SourceRef) -> Self {
        StatusEffect::new(PASSIVE_BLOCK, StatusKind::Marker, duration, source)
    }

    /// Check if the effect is still active
    pub fn is_active(&self) -> bool {
        self.duration > 0
    }

    pub fn is_passive(&self) -> bool {
        self.source.is_passive
    }

    pub fn is_passive_block(&self) -> bool {
        self.status_effect_type == PASSIVE_BLOCK
    }

    pub fn as_boost(&self) -> Option<&StatBoost> {
        match &self.kind {
            StatusKind::StatBoost(boost) => Some(boost),
            _ => None,
        }
    }

    /// Apply this turn's action and spend one turn of duration
    pub fn tick(&mut self) -> TickResult {
        let health_delta = match self.kind {
            StatusKind::DamageOverTime { amount } => -amount,
            StatusKind::HealOverTime { amount } => amount,
            StatusKind::StatBoost(_) | StatusKind::Stun | StatusKind::Marker => 0.0,
        };
        self.duration -= 1;
        TickResult { health_delta }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> SourceRef {
        SourceRef::skill("Cheer", false)
    }

    #[test]
    fn test_tick_counts_down() {
        let mut effect = StatusEffect::stat_boost(&[Stat::Strength], 5.0, 2, source());
        assert!(effect.is_active());

        assert_eq!(effect.tick(), TickResult::default());
        assert!(effect.is_active());

        effect.tick();
        assert!(!effect.is_active());
    }

    #[test]
    fn test_over_time_health_delta() {
        let mut dot = StatusEffect::new("burn", StatusKind::DamageOverTime { amount: 4.0 }, 3, source());
        assert!((dot.tick().health_delta + 4.0).abs() < f64::EPSILON);

        let mut hot = StatusEffect::new("regen", StatusKind::HealOverTime { amount: 2.5 }, 3, source());
        assert!((hot.tick().health_delta - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_boost_modifier() {
        let flat = StatBoost {
            stat_names: vec![Stat::Strength, Stat::Focus],
            value: 12.0,
            boost_percentage: None,
        };
        assert_eq!(flat.modifier(Stat::Focus, 10.0), Some(12.0));
        assert_eq!(flat.modifier(Stat::Agility, 10.0), None);

        let percent = StatBoost {
            stat_names: vec![Stat::Strength],
            value: 0.0,
            boost_percentage: Some(1.1),
        };
        let modifier = percent.modifier(Stat::Strength, 10.0).unwrap();
        assert!((modifier - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_passive_flags() {
        let block = StatusEffect::passive_block(2, source());
        assert!(block.is_passive_block());
        assert!(!block.is_passive());

        let aura = StatusEffect::stat_boost(&[Stat::Strength], 1.0, 999, SourceRef::skill("Aura", true));
        assert!(aura.is_passive());
        assert!(aura.as_boost().is_some());
    }

    #[test]
    fn test_serde_round_trip() {
        let effect = StatusEffect::stat_boost(&[Stat::Endurance], 3.0, 4, source());
        let json = serde_json::to_string(&effect).unwrap();
        assert!(json.contains("\"type\":\"stat_boost\""));
        let back: StatusEffect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, effect);
    }
}
