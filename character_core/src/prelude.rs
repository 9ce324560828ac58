//! Prelude module for convenient imports
//!
//! ```rust
//! use character_core::prelude::*;
//! ```

// Core types
pub use crate::character::{Character, EffectOutcome};
pub use crate::stat_block::StatBlock;
pub use crate::types::{Alignment, CharacterId, EquipmentSlot, Rarity, Resource, SourceRef, Stat, Tags, TargetGroup};

// Items and equipment
pub use crate::item::{EquipError, EquipmentItem, EquipmentSlots, Item, ItemData};

// Effects
pub use crate::effect::{Effect, EffectAction, StatusEffect, StatusEffects, StatusKind, TurnReport};

// Skills
pub use crate::skill::{CharacterClass, Skill, SkillCost, SkillError};

// Dice and formulas
pub use crate::dice::Dice;
pub use crate::formula::Formula;

// Config
pub use crate::config::{default_classes, DodgeConstants, RulesConstants};
