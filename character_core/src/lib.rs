//! character_core - Character rules engine for a text-adventure game
//!
//! This library provides:
//! - StatBlock: Base attributes and recovery rates
//! - Character: Derived stats, pools, inventory, equipment and turn flow
//! - EquipmentSlots: Slot rules for gear (two-handed exclusivity, accessory cap)
//! - StatusEffects: Per-turn ticking, expiry and passive suppression
//! - CharacterClass / Skill: Skill costs, effects and level progression
//! - Formula: Restricted scaling expressions used when skills level up

pub mod character;
pub mod config;
pub mod defense;
pub mod dice;
pub mod effect;
pub mod formula;
pub mod item;
pub mod prelude;
pub mod skill;
pub mod stat_block;
pub mod types;

// Re-export core types for convenience
pub use character::{Character, EffectOutcome};
pub use config::{default_classes, ConfigError, RulesConstants};
pub use dice::{Dice, DiceError};
pub use effect::{Effect, EffectAction, StatusEffect, StatusEffects, TurnReport};
pub use formula::{Formula, FormulaError};
pub use item::{EquipError, EquipmentItem, EquipmentSlots, Item, ItemData};
pub use skill::{CharacterClass, Skill, SkillCost, SkillError};
pub use stat_block::StatBlock;
pub use types::{Alignment, CharacterId, EquipmentSlot, Rarity, Resource, SourceRef, Stat, Tags, TargetGroup};
