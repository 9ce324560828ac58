//! CharacterClass - A named bundle of skills owned by one character

use super::Skill;
use crate::formula::FormulaError;
use crate::stat_block::StatBlock;
use crate::types::{CharacterId, Rarity, Tags};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A character class and its skills
///
/// Skill names are unique within a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterClass {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    skills: Vec<Skill>,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub tags: Tags,
    #[serde(skip)]
    owner: Option<CharacterId>,
}

impl CharacterClass {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        CharacterClass {
            name: name.into(),
            description: description.into(),
            skills: Vec::new(),
            rarity: Rarity::Common,
            tags: Tags::new(),
            owner: None,
        }
    }

    /// Add a skill; refused when the name is taken
    pub fn add_skill(&mut self, mut skill: Skill) -> bool {
        if self.skill(&skill.name).is_some() {
            return false;
        }
        skill.assign_owner(self.owner.clone());
        self.skills.push(skill);
        true
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn skill_names(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(|s| s.name.as_str())
    }

    pub fn skill(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.name == name)
    }

    pub fn skill_mut(&mut self, name: &str) -> Option<&mut Skill> {
        self.skills.iter_mut().find(|s| s.name == name)
    }

    pub fn owner(&self) -> Option<&CharacterId> {
        self.owner.as_ref()
    }

    /// Set the owner on the class, each skill and each skill's effects
    pub fn assign_owner(&mut self, owner: CharacterId) {
        self.set_owner(Some(owner));
    }

    pub fn clear_owner(&mut self) {
        self.set_owner(None);
    }

    fn set_owner(&mut self, owner: Option<CharacterId>) {
        for skill in &mut self.skills {
            skill.assign_owner(owner.clone());
        }
        self.owner = owner;
    }

    /// Check invariants that deserialization alone cannot
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for skill in &self.skills {
            if !seen.insert(skill.name.as_str()) {
                return Err(format!("class '{}' has duplicate skill '{}'", self.name, skill.name));
            }
            if skill.level == 0 {
                return Err(format!("skill '{}' has level 0", skill.name));
            }
            if skill.cost.amount < 0.0 {
                return Err(format!("skill '{}' has a negative cost", skill.name));
            }
        }
        Ok(())
    }

    /// Rebuild derived skill state after loading
    pub(crate) fn prepare(&mut self) {
        for skill in &mut self.skills {
            skill.prepare();
        }
    }

    /// Use a skill by name, granting it experience
    ///
    /// `Ok(None)` when the class has no such skill.
    pub fn use_skill(
        &mut self,
        skill_name: &str,
        base_exp: f64,
        enemy_level: u32,
        character_level: u32,
        character_stats: &StatBlock,
        enemy_stats: &StatBlock,
    ) -> Result<Option<&Skill>, FormulaError> {
        let Some(skill) = self.skill_mut(skill_name) else {
            return Ok(None);
        };
        skill.gain_experience(base_exp, enemy_level, character_level, character_stats, enemy_stats)?;
        Ok(Some(skill))
    }
}
