//! Dodge - Chance to avoid an attack from relative speed
//!
//! A logistic curve over the speed difference:
//!
//! dodge = 1 / (1 + e^-d), d = (speed - opponent_speed) / scaling_factor + bias
//!
//! Examples (with scaling_factor = 20, bias = -1.75):
//! - equal speed: d = -1.75, dodge ~ 0.148
//! - 35 faster: d = 0, dodge = 0.5
//! - 20 slower: d = -2.75, dodge ~ 0.060

use crate::config::DodgeConstants;

/// Dodge chance with the default curve
pub fn dodge_chance(speed: f64, opponent_speed: f64) -> f64 {
    dodge_chance_with(speed, opponent_speed, &DodgeConstants::default())
}

/// Dodge chance with a tuned curve
///
/// Always within [0, 1]; non-decreasing in `speed`.
pub fn dodge_chance_with(speed: f64, opponent_speed: f64, constants: &DodgeConstants) -> f64 {
    let difference = (speed - opponent_speed) / constants.scaling_factor + constants.bias;
    let chance = 1.0 / (1.0 + (-difference).exp());
    if chance.is_nan() {
        return 0.0;
    }
    chance.clamp(0.0, 1.0)
}
