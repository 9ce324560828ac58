//! Equipment items and the slot manager

use super::ItemData;
use crate::dice::Dice;
use crate::types::{CharacterId, EquipmentSlot, Rarity, Tags};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Maximum number of equipped accessories
pub const MAX_ACCESSORIES: usize = 5;

/// Why an equip/unequip request was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EquipError {
    #[error("Unknown equipment slot '{0}'")]
    SlotUnknown(String),
    #[error("Level {level} is below the required level {required}")]
    LevelRequirementNotMet { required: u32, level: u32 },
    #[error("Cannot equip a one-handed item while a two-handed item is equipped")]
    TwoHandedConflict,
    #[error("Accessory limit of 5 reached")]
    AccessoryCapReached,
    #[error("Item '{0}' is not in the inventory")]
    NotInInventory(String),
    #[error("Item '{0}' is not equipment")]
    NotEquipment(String),
    #[error("Slot {0} is empty")]
    SlotEmpty(EquipmentSlot),
    #[error("Accessories must be unequipped by name")]
    AccessorySlotAmbiguous,
    #[error("Accessory '{0}' is not equipped")]
    AccessoryNotEquipped(String),
}

fn default_level_requirement() -> u32 {
    1
}

/// A wearable item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentItem {
    #[serde(flatten)]
    pub info: ItemData,
    /// Slot name as authored; unknown names are refused at equip time
    pub slot: String,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default = "default_level_requirement")]
    pub level_requirement: u32,

    // === Bonuses ===
    #[serde(default)]
    pub physical_attack: f64,
    #[serde(default)]
    pub physical_defense: f64,
    #[serde(default)]
    pub magic_attack: f64,
    #[serde(default)]
    pub magic_defense: f64,
    #[serde(default)]
    pub attack_dice: Vec<Dice>,
    #[serde(default)]
    pub defense_dice: Vec<Dice>,

    #[serde(default)]
    pub tags: Tags,
    #[serde(default)]
    pub equipped: bool,
    /// Character currently wearing this item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<CharacterId>,
}

impl EquipmentItem {
    pub fn new(info: ItemData, slot: impl Into<String>) -> Self {
        EquipmentItem {
            info,
            slot: slot.into(),
            rarity: Rarity::Common,
            level_requirement: 1,
            physical_attack: 0.0,
            physical_defense: 0.0,
            magic_attack: 0.0,
            magic_defense: 0.0,
            attack_dice: Vec::new(),
            defense_dice: Vec::new(),
            tags: Tags::new(),
            equipped: false,
            owner: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn with_level_requirement(mut self, level: u32) -> Self {
        self.level_requirement = level;
        self
    }

    pub fn with_physical(mut self, attack: f64, defense: f64) -> Self {
        self.physical_attack = attack;
        self.physical_defense = defense;
        self
    }

    pub fn with_magic(mut self, attack: f64, defense: f64) -> Self {
        self.magic_attack = attack;
        self.magic_defense = defense;
        self
    }

    pub fn with_attack_dice(mut self, dice: Dice) -> Self {
        self.attack_dice.push(dice);
        self
    }

    pub fn with_defense_dice(mut self, dice: Dice) -> Self {
        self.defense_dice.push(dice);
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Parsed slot
    pub fn slot(&self) -> Result<EquipmentSlot, EquipError> {
        self.slot.parse().map_err(EquipError::SlotUnknown)
    }

    fn attach(&mut self, owner: &CharacterId) {
        self.owner = Some(owner.clone());
        self.equipped = true;
    }

    fn detach(mut self) -> Self {
        self.owner = None;
        self.equipped = false;
        self
    }
}

/// An equip request that was refused, handing the item back
#[derive(Debug, Clone)]
pub struct Rejected {
    pub reason: EquipError,
    pub item: EquipmentItem,
}

/// Slot name to equipped item mapping
///
/// `two_handed` is never held together with `main_hand` or `off_hand`, and at
/// most [`MAX_ACCESSORIES`] accessories are worn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSlots {
    #[serde(default)]
    head: Option<EquipmentItem>,
    #[serde(default)]
    chest: Option<EquipmentItem>,
    #[serde(default)]
    legs: Option<EquipmentItem>,
    #[serde(default)]
    hands: Option<EquipmentItem>,
    #[serde(default)]
    feet: Option<EquipmentItem>,
    #[serde(default)]
    main_hand: Option<EquipmentItem>,
    #[serde(default)]
    off_hand: Option<EquipmentItem>,
    #[serde(default)]
    two_handed: Option<EquipmentItem>,
    #[serde(default)]
    accessories: Vec<EquipmentItem>,
}

impl EquipmentSlots {
    pub fn new() -> Self {
        Self::default()
    }

    fn single_slot(&self, slot: EquipmentSlot) -> Option<&Option<EquipmentItem>> {
        match slot {
            EquipmentSlot::Head => Some(&self.head),
            EquipmentSlot::Chest => Some(&self.chest),
            EquipmentSlot::Legs => Some(&self.legs),
            EquipmentSlot::Hands => Some(&self.hands),
            EquipmentSlot::Feet => Some(&self.feet),
            EquipmentSlot::MainHand => Some(&self.main_hand),
            EquipmentSlot::OffHand => Some(&self.off_hand),
            EquipmentSlot::TwoHanded => Some(&self.two_handed),
            EquipmentSlot::Accessories => None,
        }
    }

    fn single_slot_mut(&mut self, slot: EquipmentSlot) -> Option<&mut Option<EquipmentItem>> {
        match slot {
            EquipmentSlot::Head => Some(&mut self.head),
            EquipmentSlot::Chest => Some(&mut self.chest),
            EquipmentSlot::Legs => Some(&mut self.legs),
            EquipmentSlot::Hands => Some(&mut self.hands),
            EquipmentSlot::Feet => Some(&mut self.feet),
            EquipmentSlot::MainHand => Some(&mut self.main_hand),
            EquipmentSlot::OffHand => Some(&mut self.off_hand),
            EquipmentSlot::TwoHanded => Some(&mut self.two_handed),
            EquipmentSlot::Accessories => None,
        }
    }

    /// Item in a single-item slot; `None` for empty slots and for accessories
    pub fn get(&self, slot: EquipmentSlot) -> Option<&EquipmentItem> {
        self.single_slot(slot).and_then(Option::as_ref)
    }

    pub fn accessories(&self) -> &[EquipmentItem] {
        &self.accessories
    }

    pub fn is_empty(&self, slot: EquipmentSlot) -> bool {
        match slot {
            EquipmentSlot::Accessories => self.accessories.is_empty(),
            _ => self.get(slot).is_none(),
        }
    }

    /// Every equipped item, in slot order with accessories last
    pub fn iter(&self) -> impl Iterator<Item = &EquipmentItem> {
        [
            &self.head,
            &self.chest,
            &self.legs,
            &self.hands,
            &self.feet,
            &self.main_hand,
            &self.off_hand,
            &self.two_handed,
        ]
        .into_iter()
        .filter_map(Option::as_ref)
        .chain(self.accessories.iter())
    }

    /// Whether an item equal to `item`, once unequipped, is in a slot
    pub fn holds(&self, item: &EquipmentItem) -> bool {
        let wanted = item.clone().detach();
        self.iter().any(|equipped| equipped.clone().detach() == wanted)
    }

    /// Validate an equip request without changing anything
    pub fn check(&self, item: &EquipmentItem, level: u32) -> Result<EquipmentSlot, EquipError> {
        let slot = item.slot()?;
        if level < item.level_requirement {
            return Err(EquipError::LevelRequirementNotMet {
                required: item.level_requirement,
                level,
            });
        }
        match slot {
            s if s.is_one_handed() && self.two_handed.is_some() => Err(EquipError::TwoHandedConflict),
            EquipmentSlot::Accessories if self.accessories.len() >= MAX_ACCESSORIES => {
                Err(EquipError::AccessoryCapReached)
            }
            _ => Ok(slot),
        }
    }

    /// Equip an item, returning whatever it displaced
    ///
    /// A two-handed item displaces both hands; any other single slot displaces
    /// its occupant; accessories append. Displaced items come back detached
    /// from their owner. On refusal nothing changes and the item is handed back.
    pub fn equip(
        &mut self,
        mut item: EquipmentItem,
        level: u32,
        owner: &CharacterId,
    ) -> Result<Vec<EquipmentItem>, Rejected> {
        let slot = match self.check(&item, level) {
            Ok(slot) => slot,
            Err(reason) => return Err(Rejected { reason, item }),
        };

        let mut displaced = Vec::new();
        if slot == EquipmentSlot::TwoHanded {
            displaced.extend(self.main_hand.take());
            displaced.extend(self.off_hand.take());
        }

        debug!(item = %item.name(), %slot, owner = %owner.0, "equipped");
        item.attach(owner);

        match self.single_slot_mut(slot) {
            Some(cell) => displaced.extend(cell.replace(item)),
            None => self.accessories.push(item),
        }

        Ok(displaced.into_iter().map(EquipmentItem::detach).collect())
    }

    /// Take the item out of a single-item slot
    pub fn unequip(&mut self, slot: EquipmentSlot) -> Result<EquipmentItem, EquipError> {
        let cell = self.single_slot_mut(slot).ok_or(EquipError::AccessorySlotAmbiguous)?;
        let item = cell.take().ok_or(EquipError::SlotEmpty(slot))?;
        debug!(item = %item.name(), %slot, "unequipped");
        Ok(item.detach())
    }

    /// Take a named accessory off
    pub fn unequip_accessory(&mut self, name: &str) -> Result<EquipmentItem, EquipError> {
        let index = self
            .accessories
            .iter()
            .position(|item| item.name() == name)
            .ok_or_else(|| EquipError::AccessoryNotEquipped(name.to_string()))?;
        let item = self.accessories.remove(index);
        debug!(item = %item.name(), "accessory unequipped");
        Ok(item.detach())
    }

    /// The active weapon: two-handed, then main hand, then a non-shield off hand
    pub fn get_weapon(&self) -> Option<&EquipmentItem> {
        self.two_handed
            .as_ref()
            .or(self.main_hand.as_ref())
            .or(self.off_hand.as_ref().filter(|item| !item.tags.contains("shield")))
    }

    pub fn total_physical_attack(&self) -> f64 {
        self.iter().map(|item| item.physical_attack).sum()
    }

    pub fn total_physical_defense(&self) -> f64 {
        self.iter().map(|item| item.physical_defense).sum()
    }

    pub fn total_magic_attack(&self) -> f64 {
        self.iter().map(|item| item.magic_attack).sum()
    }

    pub fn total_magic_defense(&self) -> f64 {
        self.iter().map(|item| item.magic_defense).sum()
    }

    /// Attack dice granted by all equipped items
    pub fn attack_dice(&self) -> Vec<Dice> {
        self.iter().flat_map(|item| item.attack_dice.iter().copied()).collect()
    }

    /// Defense dice granted by all equipped items
    pub fn defense_dice(&self) -> Vec<Dice> {
        self.iter().flat_map(|item| item.defense_dice.iter().copied()).collect()
    }
}
