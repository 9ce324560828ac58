//! Rules constants configuration

use serde::{Deserialize, Serialize};

/// Tunable rules constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesConstants {
    #[serde(default)]
    pub dodge: DodgeConstants,
    #[serde(default)]
    pub recovery: RecoveryDefaults,
}

/// Shape of the dodge logistic curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DodgeConstants {
    /// Speed difference is divided by this before the curve; larger = flatter
    #[serde(default = "default_scaling_factor")]
    pub scaling_factor: f64,
    /// Shifts the curve down so equal speeds dodge rarely
    #[serde(default = "default_bias")]
    pub bias: f64,
}

impl Default for DodgeConstants {
    fn default() -> Self {
        DodgeConstants {
            scaling_factor: 20.0,
            bias: -1.75,
        }
    }
}

fn default_scaling_factor() -> f64 {
    20.0
}
fn default_bias() -> f64 {
    -1.75
}

/// Default per-turn recovery rates, as a fraction of the pool maximum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryDefaults {
    #[serde(default = "default_stamina_rate")]
    pub stamina: f64,
    #[serde(default = "default_mana_rate")]
    pub mana: f64,
    #[serde(default = "default_health_rate")]
    pub health: f64,
}

impl Default for RecoveryDefaults {
    fn default() -> Self {
        RecoveryDefaults {
            stamina: 0.1,
            mana: 0.1,
            health: 0.05,
        }
    }
}

fn default_stamina_rate() -> f64 {
    0.1
}
fn default_mana_rate() -> f64 {
    0.1
}
fn default_health_rate() -> f64 {
    0.05
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let constants = RulesConstants::default();
        assert!((constants.dodge.scaling_factor - 20.0).abs() < f64::EPSILON);
        assert!((constants.dodge.bias + 1.75).abs() < f64::EPSILON);
        assert!((constants.recovery.health - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_constants() {
        let toml = r#"
[dodge]
scaling_factor = 10.0

[recovery]
mana = 0.2
"#;

        let constants: RulesConstants = toml::from_str(toml).unwrap();
        assert!((constants.dodge.scaling_factor - 10.0).abs() < f64::EPSILON);
        assert!((constants.dodge.bias + 1.75).abs() < f64::EPSILON);
        assert!((constants.recovery.mana - 0.2).abs() < f64::EPSILON);
        assert!((constants.recovery.stamina - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let constants: RulesConstants = toml::from_str("").unwrap();
        assert_eq!(constants, RulesConstants::default());
    }
}
