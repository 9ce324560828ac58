//! Effects carried by skills and items, and the status effects they leave behind

mod pipeline;
mod status;

pub use pipeline::{StatusEffects, TurnReport};
pub use status::{StatBoost, StatusEffect, StatusKind, TickResult, PASSIVE_BLOCK};

use crate::dice::{roll_pool, Dice};
use crate::formula::{Formula, FormulaError};
use crate::types::{SourceRef, Stat, Tags, TargetGroup};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

/// What an effect does when it lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectAction {
    Damage,
    Heal,
    Stun,
    Boost,
    Status,
}

/// A single effect of a skill or item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub action: EffectAction,
    /// Flat magnitude
    #[serde(default)]
    pub value: f64,
    /// Dice rolled on top of `value`
    #[serde(default)]
    pub dice: Vec<Dice>,
    /// Turns the effect lingers; 0 or absent means instantaneous
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub stat_names: Vec<Stat>,
    /// Multiplicative alternative to `value` for boosts, as a fraction of the base stat
    #[serde(default)]
    pub boost_percentage: Option<f64>,
    /// Status type for `status` actions, e.g. `passive_block`
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tags: Tags,
    /// Falls back to the owning skill/item's group when absent
    #[serde(default)]
    pub target_group: Option<TargetGroup>,
    #[serde(default)]
    pub level_up_formula: Formula,
    /// Skill or item this effect belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceRef>,
}

/// Accept either `"strength"` or `["strength", "focus"]`
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<Stat>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(Stat),
        Many(Vec<Stat>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(stat) => vec![stat],
        OneOrMany::Many(stats) => stats,
    })
}

impl Effect {
    /// Create an effect with every optional field empty
    pub fn new(action: EffectAction, value: f64) -> Self {
        Effect {
            action,
            value,
            dice: Vec::new(),
            duration: None,
            stat_names: Vec::new(),
            boost_percentage: None,
            status: None,
            tags: Tags::new(),
            target_group: None,
            level_up_formula: Formula::identity(),
            source: None,
        }
    }

    pub fn damage(value: f64) -> Self {
        Effect::new(EffectAction::Damage, value)
    }

    pub fn heal(value: f64) -> Self {
        Effect::new(EffectAction::Heal, value)
    }

    pub fn stun(duration: u32) -> Self {
        Effect::new(EffectAction::Stun, 0.0).with_duration(duration)
    }

    /// Flat boost to one or more stats
    pub fn boost(stat_names: &[Stat], value: f64, duration: u32) -> Self {
        let mut effect = Effect::new(EffectAction::Boost, value).with_duration(duration);
        effect.stat_names = stat_names.to_vec();
        effect
    }

    /// Named status such as `passive_block`
    pub fn status(name: impl Into<String>, duration: u32) -> Self {
        let mut effect = Effect::new(EffectAction::Status, 0.0).with_duration(duration);
        effect.status = Some(name.into());
        effect
    }

    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_dice(mut self, dice: Dice) -> Self {
        self.dice.push(dice);
        self
    }

    pub fn with_boost_percentage(mut self, percentage: f64) -> Self {
        self.boost_percentage = Some(percentage);
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn with_formula(mut self, formula: Formula) -> Self {
        self.level_up_formula = formula;
        self
    }

    pub fn with_target_group(mut self, group: TargetGroup) -> Self {
        self.target_group = Some(group);
        self
    }

    /// Whether the effect resolves immediately instead of lingering
    pub fn is_instantaneous(&self) -> bool {
        self.duration.unwrap_or(0) == 0
    }

    /// `value` plus a roll of every attached die
    pub fn roll_magnitude(&self, rng: &mut impl Rng) -> f64 {
        self.value + roll_pool(&self.dice, rng) as f64
    }

    /// Rescale magnitudes for a new level
    ///
    /// Both `value` and `boost_percentage` go through the formula; nothing is
    /// written unless every evaluation succeeds.
    pub fn level_up(&mut self, new_level: u32) -> Result<(), FormulaError> {
        let value = self.level_up_formula.eval(self.value, new_level)?;
        let percentage = self
            .boost_percentage
            .map(|p| self.level_up_formula.eval(p, new_level))
            .transpose()?;

        self.value = value;
        self.boost_percentage = percentage;
        Ok(())
    }

    /// Build the lingering status effect for this effect, if it lingers
    ///
    /// Instantaneous damage and heal resolve on the spot and return `None`.
    /// Boost, stun and status actions always linger, for one turn when no
    /// duration is given.
    pub fn to_status_effect(&self, magnitude: f64, source: SourceRef) -> Option<StatusEffect> {
        let duration = match (self.action, self.duration.unwrap_or(0)) {
            (EffectAction::Damage | EffectAction::Heal, 0) => return None,
            (_, 0) => 1,
            (_, turns) => turns,
        };

        let (status_effect_type, kind) = match self.action {
            EffectAction::Damage => ("damage_over_time".to_string(), StatusKind::DamageOverTime { amount: magnitude }),
            EffectAction::Heal => ("heal_over_time".to_string(), StatusKind::HealOverTime { amount: magnitude }),
            EffectAction::Stun => ("stun".to_string(), StatusKind::Stun),
            EffectAction::Boost => (
                "stat_boost".to_string(),
                StatusKind::StatBoost(StatBoost {
                    stat_names: self.stat_names.clone(),
                    value: magnitude,
                    boost_percentage: self.boost_percentage,
                }),
            ),
            EffectAction::Status => (
                self.status.clone().unwrap_or_else(|| "status".to_string()),
                StatusKind::Marker,
            ),
        };

        Some(StatusEffect {
            status_effect_type,
            kind,
            duration: i32::try_from(duration).unwrap_or(i32::MAX),
            source,
        })
    }
}
