use serde::{Deserialize, Serialize};

use super::types::{Item, ItemCategory};

/// Equipped items, at most one per category.
///
/// Serialized as a plain JSON array of items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Equipment {
    items: Vec<Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: ItemCategory) -> Option<&Item> {
        self.items.iter().find(|i| i.category == category)
    }

    /// Puts `item` in its category slot, returning whatever it displaced.
    pub fn equip(&mut self, item: Item) -> Option<Item> {
        let displaced = self.unequip_category(item.category);
        self.items.push(item);
        displaced
    }

    pub fn unequip(&mut self, item_id: &str) -> Option<Item> {
        let idx = self.items.iter().position(|i| i.id == item_id)?;
        Some(self.items.remove(idx))
    }

    fn unequip_category(&mut self, category: ItemCategory) -> Option<Item> {
        let idx = self.items.iter().position(|i| i.category == category)?;
        Some(self.items.remove(idx))
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }

    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
