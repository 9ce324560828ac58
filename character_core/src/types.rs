//! Core types shared across the rules engine

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Equipment slot for gear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Head,
    Chest,
    Legs,
    Hands,
    Feet,
    MainHand,
    OffHand,
    TwoHanded,
    Accessories,
}

impl EquipmentSlot {
    /// Get all equipment slots, in dump order
    pub fn all() -> &'static [EquipmentSlot] {
        &[
            EquipmentSlot::Head,
            EquipmentSlot::Chest,
            EquipmentSlot::Legs,
            EquipmentSlot::Hands,
            EquipmentSlot::Feet,
            EquipmentSlot::MainHand,
            EquipmentSlot::OffHand,
            EquipmentSlot::TwoHanded,
            EquipmentSlot::Accessories,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentSlot::Head => "head",
            EquipmentSlot::Chest => "chest",
            EquipmentSlot::Legs => "legs",
            EquipmentSlot::Hands => "hands",
            EquipmentSlot::Feet => "feet",
            EquipmentSlot::MainHand => "main_hand",
            EquipmentSlot::OffHand => "off_hand",
            EquipmentSlot::TwoHanded => "two_handed",
            EquipmentSlot::Accessories => "accessories",
        }
    }

    /// Whether the slot holds a one-handed weapon
    pub fn is_one_handed(&self) -> bool {
        matches!(self, EquipmentSlot::MainHand | EquipmentSlot::OffHand)
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EquipmentSlot::all()
            .iter()
            .copied()
            .find(|slot| slot.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Which characters an effect or skill applies to
///
/// Resolving a group to concrete characters is the caller's job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetGroup {
    #[serde(rename = "self")]
    OwnSelf,
    SingleAlly,
    RandomAlly,
    Allies,
    SingleEnemy,
    RandomEnemy,
    Enemies,
    SingleTarget,
    RandomTarget,
    #[default]
    All,
}

/// Side a character fights on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Ally,
    Enemy,
}

/// Content rarity tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Resource pool a skill cost is paid from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    #[default]
    Mana,
    Stamina,
    Health,
}

/// Attribute or recovery rate that a boost can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Strength,
    Endurance,
    Focus,
    Willpower,
    Agility,
    Luck,
    Charisma,
    StaminaRecoveryRate,
    ManaRecoveryRate,
    HealthRecoveryRate,
}

impl Stat {
    /// The seven base attributes
    pub fn attributes() -> &'static [Stat] {
        &[
            Stat::Strength,
            Stat::Endurance,
            Stat::Focus,
            Stat::Willpower,
            Stat::Agility,
            Stat::Luck,
            Stat::Charisma,
        ]
    }
}

/// Set of free-form tags ("magic", "fire", "shield", ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeSet<String>);

impl Tags {
    pub fn new() -> Self {
        Tags(BTreeSet::new())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        self.0.insert(tag.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Tags(iter.into_iter().map(Into::into).collect())
    }
}

/// Lookup key for a character; back-references hold this, never the character itself
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub String);

impl From<&str> for CharacterId {
    fn from(s: &str) -> Self {
        CharacterId(s.to_string())
    }
}

impl From<String> for CharacterId {
    fn from(s: String) -> Self {
        CharacterId(s)
    }
}

/// What a status effect originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Skill,
    Item,
    Effect,
}

/// Non-owning reference to the skill or item that created an effect
///
/// Carries the source's passive flag so the pipeline can answer
/// `is_passive` without reaching back into the caster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub kind: SourceKind,
    pub name: String,
    #[serde(default)]
    pub owner: Option<CharacterId>,
    #[serde(default)]
    pub is_passive: bool,
}

impl SourceRef {
    pub fn skill(name: impl Into<String>, is_passive: bool) -> Self {
        SourceRef {
            kind: SourceKind::Skill,
            name: name.into(),
            owner: None,
            is_passive,
        }
    }

    pub fn item(name: impl Into<String>) -> Self {
        SourceRef {
            kind: SourceKind::Item,
            name: name.into(),
            owner: None,
            is_passive: false,
        }
    }

    pub fn with_owner(mut self, owner: CharacterId) -> Self {
        self.owner = Some(owner);
        self
    }
}
