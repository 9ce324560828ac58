//! Character - Stats, pools, inventory, equipment, class and status effects

mod derived;
mod turn;

pub use turn::EffectOutcome;

use crate::config::ConfigError;
use crate::dice::Dice;
use crate::effect::StatusEffects;
use crate::item::{EquipError, EquipmentItem, EquipmentSlots, Item};
use crate::skill::CharacterClass;
use crate::stat_block::StatBlock;
use crate::types::{Alignment, CharacterId, EquipmentSlot, TargetGroup};
use serde::{Deserialize, Serialize};
use tracing::debug;

fn default_level() -> u32 {
    1
}

fn default_basic_attack_dice() -> Vec<Dice> {
    vec![Dice::new(1, 6)]
}

fn default_basic_attack_type() -> String {
    "physical".to_string()
}

fn default_basic_attack_target() -> TargetGroup {
    TargetGroup::RandomEnemy
}

/// A player character or an enemy
///
/// Current pools never exceed the maxima derived from the stats; every
/// mutation clamps them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub experience: f64,
    pub stats: StatBlock,

    // === Pools ===
    current_health: f64,
    current_mana: f64,
    current_stamina: f64,
    #[serde(default)]
    physical_barrier: f64,
    #[serde(default)]
    magic_barrier: f64,

    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    inventory: Vec<Item>,
    #[serde(default)]
    equipment: EquipmentSlots,
    #[serde(default)]
    status_effects: StatusEffects,
    #[serde(default)]
    character_class: Option<CharacterClass>,
    /// Experience granted for defeating this character; derived when absent
    #[serde(default)]
    rewarded_exp: Option<f64>,

    // === Basic attack ===
    #[serde(default = "default_basic_attack_dice")]
    pub default_basic_attack_dice: Vec<Dice>,
    #[serde(default = "default_basic_attack_type")]
    pub default_basic_attack_type: String,
    #[serde(default = "default_basic_attack_target")]
    pub default_basic_attack_target: TargetGroup,
}

impl Character {
    /// Create a level 1 ally with full pools
    pub fn new(name: impl Into<String>, stats: StatBlock) -> Self {
        let mut character = Character {
            name: name.into(),
            level: 1,
            experience: 0.0,
            stats,
            current_health: 0.0,
            current_mana: 0.0,
            current_stamina: 0.0,
            physical_barrier: 0.0,
            magic_barrier: 0.0,
            alignment: Alignment::Ally,
            inventory: Vec::new(),
            equipment: EquipmentSlots::new(),
            status_effects: StatusEffects::new(),
            character_class: None,
            rewarded_exp: None,
            default_basic_attack_dice: default_basic_attack_dice(),
            default_basic_attack_type: default_basic_attack_type(),
            default_basic_attack_target: default_basic_attack_target(),
        };
        character.refill_pools();
        character
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_rewarded_exp(mut self, exp: f64) -> Self {
        self.rewarded_exp = Some(exp);
        self
    }

    pub fn with_class(mut self, class: CharacterClass) -> Self {
        self.assign_class(class);
        self
    }

    /// Load a character from its JSON dump, relinking owner keys
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let mut character: Character = serde_json::from_str(content)?;
        if let Some(class) = character.character_class.as_mut() {
            class.validate().map_err(ConfigError::ValidationError)?;
            class.prepare();
            class.assign_owner(CharacterId(character.name.clone()));
        }
        character.clamp_pools();
        Ok(character)
    }

    /// Key other objects use to refer back to this character
    pub fn id(&self) -> CharacterId {
        CharacterId(self.name.clone())
    }

    // === Pools ===

    pub fn health(&self) -> f64 {
        self.current_health
    }

    pub fn mana(&self) -> f64 {
        self.current_mana
    }

    pub fn stamina(&self) -> f64 {
        self.current_stamina
    }

    pub fn physical_barrier(&self) -> f64 {
        self.physical_barrier
    }

    pub fn magic_barrier(&self) -> f64 {
        self.magic_barrier
    }

    pub fn set_health(&mut self, value: f64) {
        self.current_health = value.clamp(0.0, self.max_health());
    }

    pub fn set_mana(&mut self, value: f64) {
        self.current_mana = value.clamp(0.0, self.max_mana());
    }

    pub fn set_stamina(&mut self, value: f64) {
        self.current_stamina = value.clamp(0.0, self.max_stamina());
    }

    pub fn set_physical_barrier(&mut self, value: f64) {
        self.physical_barrier = value.max(0.0);
    }

    pub fn set_magic_barrier(&mut self, value: f64) {
        self.magic_barrier = value.max(0.0);
    }

    /// Fill health, mana and stamina to their maxima
    pub fn refill_pools(&mut self) {
        self.current_health = self.max_health();
        self.current_mana = self.max_mana();
        self.current_stamina = self.max_stamina();
    }

    /// Pull the pools back under maxima that may have shrunk
    fn clamp_pools(&mut self) {
        self.set_health(self.current_health);
        self.set_mana(self.current_mana);
        self.set_stamina(self.current_stamina);
    }

    pub fn is_incapacitated(&self) -> bool {
        self.current_health <= 0.0
    }

    pub fn receive_exp(&mut self, amount: f64) {
        self.experience += amount.max(0.0);
    }

    // === Inventory ===

    pub fn inventory(&self) -> &[Item] {
        &self.inventory
    }

    /// Add an item; refused when an identical item is already carried or worn
    pub fn add_to_inventory(&mut self, item: impl Into<Item>) -> bool {
        let item = item.into();
        let worn = item.as_equipment().is_some_and(|gear| self.equipment.holds(gear));
        if worn || self.inventory.contains(&item) {
            return false;
        }
        self.inventory.push(item);
        true
    }

    /// Take the first item with this name out of the inventory
    pub fn remove_from_inventory(&mut self, name: &str) -> Option<Item> {
        let index = self.inventory.iter().position(|item| item.name() == name)?;
        Some(self.inventory.remove(index))
    }

    // === Equipment ===

    pub fn equipment(&self) -> &EquipmentSlots {
        &self.equipment
    }

    /// Equip an item from the inventory by name
    ///
    /// Displaced items go back to the inventory. On refusal the inventory
    /// and the slots are unchanged.
    pub fn equip(&mut self, item_name: &str) -> Result<(), EquipError> {
        let index = self
            .inventory
            .iter()
            .position(|item| item.name() == item_name)
            .ok_or_else(|| EquipError::NotInInventory(item_name.to_string()))?;

        let item = match self.inventory.remove(index) {
            Item::Equipment(item) => item,
            basic => {
                self.inventory.insert(index, basic);
                return Err(EquipError::NotEquipment(item_name.to_string()));
            }
        };

        let owner = self.id();
        match self.equipment.equip(item, self.level, &owner) {
            Ok(displaced) => {
                self.return_to_inventory(displaced);
                Ok(())
            }
            Err(rejected) => {
                self.inventory.insert(index, Item::Equipment(rejected.item));
                Err(rejected.reason)
            }
        }
    }

    /// Move the item in `slot` back to the inventory
    pub fn unequip(&mut self, slot: EquipmentSlot) -> Result<(), EquipError> {
        let item = self.equipment.unequip(slot)?;
        self.return_to_inventory(vec![item]);
        Ok(())
    }

    /// Move a named accessory back to the inventory
    pub fn unequip_accessory(&mut self, name: &str) -> Result<(), EquipError> {
        let item = self.equipment.unequip_accessory(name)?;
        self.return_to_inventory(vec![item]);
        Ok(())
    }

    fn return_to_inventory(&mut self, items: Vec<EquipmentItem>) {
        for item in items {
            debug!(character = %self.name, item = %item.name(), "returned to inventory");
            self.inventory.push(Item::Equipment(item));
        }
    }

    // === Class ===

    pub fn character_class(&self) -> Option<&CharacterClass> {
        self.character_class.as_ref()
    }

    /// Take ownership of a class, handing back the previous one detached
    pub fn assign_class(&mut self, mut class: CharacterClass) -> Option<CharacterClass> {
        class.assign_owner(self.id());
        debug!(character = %self.name, class = %class.name, "class assigned");
        let mut previous = self.character_class.replace(class)?;
        previous.clear_owner();
        Some(previous)
    }

    /// Names of the skills granted by the class
    pub fn skills(&self) -> Vec<&str> {
        self.character_class
            .as_ref()
            .map(|class| class.skill_names().collect())
            .unwrap_or_default()
    }

    pub fn status_effects(&self) -> &StatusEffects {
        &self.status_effects
    }
}
