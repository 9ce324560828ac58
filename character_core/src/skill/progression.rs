//! Skill experience curve and experience rewards

use crate::stat_block::StatBlock;

/// Highest level a skill can reach
pub const MAX_SKILL_LEVEL: u32 = 100;

/// Growth exponent of the experience curve
const EXP_CURVE_EXPONENT: f64 = 1.5;

/// Cumulative experience needed to reach `level`
///
/// `base_exp * (level - 1)^1.5`, so level 2 costs exactly `base_exp`.
pub fn exp_for_level(base_exp: f64, level: u32) -> f64 {
    if level <= 1 {
        return 0.0;
    }
    base_exp * ((level - 1) as f64).powf(EXP_CURVE_EXPONENT)
}

/// Thresholds for every level from 1 to [`MAX_SKILL_LEVEL`], indexed by `level - 1`
pub fn precalculate_level_requirements(base_exp: f64) -> Vec<f64> {
    (1..=MAX_SKILL_LEVEL).map(|level| exp_for_level(base_exp, level)).collect()
}

/// Experience a skill earns from one use against an opponent
///
/// Each level the opponent has over the user adds 10% (down to 10% and up
/// to 200% overall), and the ratio of the opponent's mean attribute to the
/// user's scales the result between 0.5x and 1.5x.
pub fn experience_reward(
    base_exp: f64,
    enemy_level: u32,
    character_level: u32,
    character_stats: &StatBlock,
    enemy_stats: &StatBlock,
) -> f64 {
    let level_gap = enemy_level as f64 - character_level as f64;
    let level_factor = (1.0 + 0.1 * level_gap).clamp(0.1, 2.0);

    let own_mean = character_stats.attribute_mean();
    let stat_factor = if own_mean > 0.0 {
        (enemy_stats.attribute_mean() / own_mean).clamp(0.5, 1.5)
    } else {
        1.5
    };

    (base_exp * level_factor * stat_factor).max(0.0)
}
