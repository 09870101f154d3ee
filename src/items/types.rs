use serde::{Deserialize, Serialize};

use crate::character::types::{stat_value, StatKind, StatMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Weapon,
    Armor,
    Gloves,
    Amulet,
}

impl ItemCategory {
    pub fn name(&self) -> &'static str {
        match self {
            ItemCategory::Weapon => "Weapon",
            ItemCategory::Armor => "Armor",
            ItemCategory::Gloves => "Gloves",
            ItemCategory::Amulet => "Amulet",
        }
    }

    /// Stats an item of this category can roll. The first is always present.
    pub fn stat_pool(&self) -> &'static [StatKind] {
        match self {
            ItemCategory::Weapon => &[
                StatKind::Damage,
                StatKind::AttackSpeed,
                StatKind::AttackPower,
            ],
            ItemCategory::Armor => &[StatKind::Armor, StatKind::Health, StatKind::Vitality],
            ItemCategory::Gloves => &[StatKind::AttackSpeed, StatKind::AttackPower],
            ItemCategory::Amulet => &[StatKind::CastSpeed, StatKind::Mana, StatKind::Willpower],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common = 0,
    Uncommon = 1,
    Rare = 2,
}

impl Rarity {
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
        }
    }

    /// The next tier up, if any.
    pub fn upgraded(&self) -> Option<Rarity> {
        match self {
            Rarity::Common => Some(Rarity::Uncommon),
            Rarity::Uncommon => Some(Rarity::Rare),
            Rarity::Rare => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub category: ItemCategory,
    pub rarity: Rarity,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub quality: u32,
    #[serde(default)]
    pub stats: StatMap,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Item {
    pub fn stat(&self, kind: StatKind) -> f64 {
        stat_value(&self.stats, kind)
    }

    /// Raises quality by one. Quality never decreases.
    pub fn upgrade_quality(&mut self) -> u32 {
        self.quality = self.quality.saturating_add(1);
        self.quality
    }
}

/// An unopened reward box found while walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemBox {
    pub area: u32,
}

impl ItemBox {
    /// Level of the item the box yields.
    pub fn item_level(&self) -> u32 {
        self.area.max(1)
    }
}
