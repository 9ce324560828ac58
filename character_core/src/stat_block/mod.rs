//! StatBlock - Base attributes and recovery rates of a character

use crate::config::RecoveryDefaults;
use crate::types::Stat;
use serde::{Deserialize, Serialize};

/// The seven base attributes plus three recovery rates
///
/// Only explicit stat-modifying effects change what a character sees;
/// they are layered on top at query time and never written back here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    // === Attributes ===
    pub strength: u32,
    pub endurance: u32,
    pub focus: u32,
    pub willpower: u32,
    pub agility: u32,
    #[serde(default)]
    pub luck: u32,
    #[serde(default)]
    pub charisma: u32,

    // === Recovery ===
    #[serde(default = "default_stamina_recovery")]
    pub base_stamina_recovery_rate: f64,
    #[serde(default = "default_mana_recovery")]
    pub base_mana_recovery_rate: f64,
    #[serde(default = "default_health_recovery")]
    pub base_health_recovery_rate: f64,
}

fn default_stamina_recovery() -> f64 {
    RecoveryDefaults::default().stamina
}
fn default_mana_recovery() -> f64 {
    RecoveryDefaults::default().mana
}
fn default_health_recovery() -> f64 {
    RecoveryDefaults::default().health
}

impl Default for StatBlock {
    fn default() -> Self {
        StatBlock::new(10, 10, 10, 10, 10)
    }
}

impl StatBlock {
    /// Create a stat block from the five combat attributes; luck and charisma start at 0
    pub fn new(strength: u32, endurance: u32, focus: u32, willpower: u32, agility: u32) -> Self {
        let recovery = RecoveryDefaults::default();
        StatBlock {
            strength,
            endurance,
            focus,
            willpower,
            agility,
            luck: 0,
            charisma: 0,
            base_stamina_recovery_rate: recovery.stamina,
            base_mana_recovery_rate: recovery.mana,
            base_health_recovery_rate: recovery.health,
        }
    }

    pub fn with_luck(mut self, luck: u32) -> Self {
        self.luck = luck;
        self
    }

    pub fn with_charisma(mut self, charisma: u32) -> Self {
        self.charisma = charisma;
        self
    }

    /// Override all three recovery rates
    pub fn with_recovery(mut self, recovery: RecoveryDefaults) -> Self {
        self.base_stamina_recovery_rate = recovery.stamina.max(0.0);
        self.base_mana_recovery_rate = recovery.mana.max(0.0);
        self.base_health_recovery_rate = recovery.health.max(0.0);
        self
    }

    /// Base (unmodified) value of a stat
    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Strength => self.strength as f64,
            Stat::Endurance => self.endurance as f64,
            Stat::Focus => self.focus as f64,
            Stat::Willpower => self.willpower as f64,
            Stat::Agility => self.agility as f64,
            Stat::Luck => self.luck as f64,
            Stat::Charisma => self.charisma as f64,
            Stat::StaminaRecoveryRate => self.base_stamina_recovery_rate,
            Stat::ManaRecoveryRate => self.base_mana_recovery_rate,
            Stat::HealthRecoveryRate => self.base_health_recovery_rate,
        }
    }

    /// Mean of the seven attributes
    pub fn attribute_mean(&self) -> f64 {
        let attributes = Stat::attributes();
        let total: f64 = attributes.iter().map(|stat| self.get(*stat)).sum();
        total / attributes.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_recovery_rates() {
        let stats = StatBlock::new(8, 10, 5, 5, 6);
        assert!((stats.base_stamina_recovery_rate - 0.1).abs() < f64::EPSILON);
        assert!((stats.base_mana_recovery_rate - 0.1).abs() < f64::EPSILON);
        assert!((stats.base_health_recovery_rate - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_get_by_stat() {
        let stats = StatBlock::new(1, 2, 3, 4, 5).with_luck(6).with_charisma(7);
        let values: Vec<f64> = Stat::attributes().iter().map(|s| stats.get(*s)).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert!((stats.attribute_mean() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_recovery_clamped_non_negative() {
        let stats = StatBlock::default().with_recovery(RecoveryDefaults {
            stamina: -1.0,
            mana: 0.2,
            health: 0.0,
        });
        assert_eq!(stats.base_stamina_recovery_rate, 0.0);
        assert!((stats.get(Stat::ManaRecoveryRate) - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deserialize_defaults() {
        let stats: StatBlock = toml::from_str(
            r#"
strength = 8
endurance = 10
focus = 12
willpower = 9
agility = 7
"#,
        )
        .unwrap();
        assert_eq!(stats.luck, 0);
        assert!((stats.base_health_recovery_rate - 0.05).abs() < f64::EPSILON);
    }
}
