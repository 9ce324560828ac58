//! Items - consumables and equipment

mod equipment;

pub use equipment::{EquipError, EquipmentItem, EquipmentSlots, Rejected, MAX_ACCESSORIES};

use crate::effect::Effect;
use crate::types::{SourceRef, TargetGroup};
use serde::{Deserialize, Serialize};

fn default_item_target() -> TargetGroup {
    TargetGroup::SingleAlly
}

/// Fields every item has
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    pub name: String,
    pub item_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_item_target")]
    pub target_group: TargetGroup,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl ItemData {
    pub fn new(name: impl Into<String>, item_type: impl Into<String>) -> Self {
        ItemData {
            name: name.into(),
            item_type: item_type.into(),
            description: String::new(),
            target_group: default_item_target(),
            effects: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach an effect, pointing its source back at this item
    pub fn with_effect(mut self, mut effect: Effect) -> Self {
        effect.source = Some(SourceRef::item(&self.name));
        self.effects.push(effect);
        self
    }

    pub fn with_target_group(mut self, group: TargetGroup) -> Self {
        self.target_group = group;
        self
    }
}

/// An inventory item: either a plain item or a piece of equipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    Basic(ItemData),
    Equipment(EquipmentItem),
}

impl Item {
    pub fn info(&self) -> &ItemData {
        match self {
            Item::Basic(data) => data,
            Item::Equipment(equipment) => &equipment.info,
        }
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    pub fn effects(&self) -> &[Effect] {
        &self.info().effects
    }

    pub fn as_equipment(&self) -> Option<&EquipmentItem> {
        match self {
            Item::Equipment(equipment) => Some(equipment),
            Item::Basic(_) => None,
        }
    }

    pub fn is_equipment(&self) -> bool {
        matches!(self, Item::Equipment(_))
    }
}

impl From<ItemData> for Item {
    fn from(data: ItemData) -> Self {
        Item::Basic(data)
    }
}

impl From<EquipmentItem> for Item {
    fn from(equipment: EquipmentItem) -> Self {
        Item::Equipment(equipment)
    }
}
