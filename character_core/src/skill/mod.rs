//! Skills - resource costs, effects and per-skill progression

mod class;
pub mod progression;

pub use class::CharacterClass;
pub use progression::{exp_for_level, experience_reward, MAX_SKILL_LEVEL};

use crate::effect::Effect;
use crate::formula::{Formula, FormulaError};
use crate::stat_block::StatBlock;
use crate::types::{CharacterId, Rarity, Resource, SourceRef, Tags, TargetGroup};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Why a skill could not be used
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkillError {
    #[error("Not enough {resource:?}: need {cost}, have {available}")]
    InsufficientResource {
        resource: Resource,
        cost: f64,
        available: f64,
    },
}

/// Resource cost of using a skill
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillCost {
    #[serde(default)]
    pub resource: Resource,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub level_up_formula: Formula,
}

impl SkillCost {
    pub fn new(resource: Resource, amount: f64, level_up_formula: Formula) -> Self {
        SkillCost {
            resource,
            amount,
            level_up_formula,
        }
    }
}

/// Unlock described for a given skill level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneUpgrade {
    pub level: u32,
    pub description: String,
}

fn default_level() -> u32 {
    1
}

fn default_base_exp() -> f64 {
    100.0
}

fn default_toggled_on() -> bool {
    true
}

/// A skill belonging to a character class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_level")]
    pub level: u32,
    /// Cumulative experience
    #[serde(default)]
    pub experience: f64,
    #[serde(default = "default_base_exp")]
    pub base_exp: f64,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub cost: SkillCost,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub target_group: TargetGroup,
    #[serde(default)]
    pub is_passive: bool,
    /// Player toggle for passive skills
    #[serde(default = "default_toggled_on")]
    pub toggled_on: bool,
    #[serde(default)]
    pub milestone_upgrades: Vec<MilestoneUpgrade>,
    #[serde(default)]
    pub tags: Tags,
    #[serde(skip)]
    owner: Option<CharacterId>,
    /// Cumulative experience per level, indexed by `level - 1`
    #[serde(skip)]
    level_requirements: Vec<f64>,
}

impl Skill {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let base_exp = default_base_exp();
        Skill {
            name: name.into(),
            description: description.into(),
            level: 1,
            experience: 0.0,
            base_exp,
            rarity: Rarity::Common,
            cost: SkillCost::default(),
            effects: Vec::new(),
            target_group: TargetGroup::All,
            is_passive: false,
            toggled_on: true,
            milestone_upgrades: Vec::new(),
            tags: Tags::new(),
            owner: None,
            level_requirements: progression::precalculate_level_requirements(base_exp),
        }
    }

    pub fn with_cost(mut self, resource: Resource, amount: f64, level_up_formula: Formula) -> Self {
        self.cost = SkillCost::new(resource, amount, level_up_formula);
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self.refresh_sources();
        self
    }

    pub fn with_target_group(mut self, group: TargetGroup) -> Self {
        self.target_group = group;
        self
    }

    pub fn with_base_exp(mut self, base_exp: f64) -> Self {
        self.base_exp = base_exp;
        self.precompute_level_requirements();
        self
    }

    pub fn passive(mut self) -> Self {
        self.is_passive = true;
        self.refresh_sources();
        self
    }

    pub fn owner(&self) -> Option<&CharacterId> {
        self.owner.as_ref()
    }

    /// Back-reference used by effects this skill creates
    pub fn source_ref(&self) -> SourceRef {
        let source = SourceRef::skill(&self.name, self.is_passive);
        match &self.owner {
            Some(owner) => source.with_owner(owner.clone()),
            None => source,
        }
    }

    /// Point every effect's source back at this skill
    fn refresh_sources(&mut self) {
        let source = self.source_ref();
        for effect in &mut self.effects {
            effect.source = Some(source.clone());
        }
    }

    pub(crate) fn assign_owner(&mut self, owner: Option<CharacterId>) {
        self.owner = owner;
        self.refresh_sources();
    }

    /// Fill the level threshold table and effect sources after loading
    pub(crate) fn prepare(&mut self) {
        self.precompute_level_requirements();
        self.refresh_sources();
    }

    fn precompute_level_requirements(&mut self) {
        self.level_requirements = progression::precalculate_level_requirements(self.base_exp);
    }

    /// Cumulative experience needed to reach `level`
    pub fn level_requirement(&self, level: u32) -> f64 {
        level
            .checked_sub(1)
            .and_then(|index| self.level_requirements.get(index as usize))
            .copied()
            .unwrap_or_else(|| exp_for_level(self.base_exp, level))
    }

    /// Milestone unlocked at exactly `level`, if any
    pub fn milestone_at(&self, level: u32) -> Option<&MilestoneUpgrade> {
        self.milestone_upgrades.iter().find(|m| m.level == level)
    }

    /// Grant experience for one use, levelling up as many times as it covers
    ///
    /// Returns the number of levels gained. A formula failure stops levelling
    /// at the last good level; the experience is kept.
    pub fn gain_experience(
        &mut self,
        base_exp: f64,
        enemy_level: u32,
        character_level: u32,
        character_stats: &StatBlock,
        enemy_stats: &StatBlock,
    ) -> Result<u32, FormulaError> {
        self.experience += experience_reward(base_exp, enemy_level, character_level, character_stats, enemy_stats);

        let mut gained = 0;
        while self.level < MAX_SKILL_LEVEL && self.experience >= self.level_requirement(self.level + 1) {
            if let Err(err) = self.level_up() {
                warn!(skill = %self.name, level = self.level, error = %err, "skill level-up rejected");
                return Err(err);
            }
            gained += 1;
        }
        Ok(gained)
    }

    /// Advance one level and rescale the cost and every effect
    ///
    /// All new values are computed before any is written, so a failing
    /// formula leaves the skill exactly as it was.
    pub fn level_up(&mut self) -> Result<(), FormulaError> {
        let new_level = self.level + 1;
        let new_cost = self.cost.level_up_formula.eval(self.cost.amount, new_level)?;

        let mut new_effects = self.effects.clone();
        for effect in &mut new_effects {
            effect.level_up(new_level)?;
        }

        self.level = new_level;
        self.cost.amount = new_cost;
        self.effects = new_effects;

        debug!(skill = %self.name, level = new_level, cost = new_cost, "skill levelled up");
        if let Some(milestone) = self.milestone_at(new_level) {
            debug!(skill = %self.name, milestone = %milestone.description, "milestone reached");
        }
        Ok(())
    }
}
