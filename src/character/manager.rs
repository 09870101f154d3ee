use std::sync::{Arc, Mutex};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use super::stats::PlayerStats;
use super::types::Character;
use crate::hooks::{NoHooks, SkillHooks};
use crate::items::{Equipment, Item};
use crate::utils::persistence::{load_json, load_json_or_default, save_json_logged, KeyValueStore};

pub const CHARACTER_KEY: &str = "currentCharacter";
pub const EQUIPPED_KEY: &str = "equipped_items";
pub const INVENTORY_KEY: &str = "inventory";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EquipError {
    #[error("item {0} is not in the inventory")]
    NotInInventory(String),

    #[error("item {0} is not equipped")]
    NotEquipped(String),
}

/// Owns the persisted character, its equipment and inventory.
///
/// Every mutation writes a complete new snapshot; storage failures are logged
/// and the returned value still reflects the change.
pub struct CharacterManager {
    store: Arc<dyn KeyValueStore>,
    skills: Arc<dyn SkillHooks>,
    write_lock: Mutex<()>,
}

impl CharacterManager {
    pub fn new(store: Arc<dyn KeyValueStore>, skills: Arc<dyn SkillHooks>) -> Self {
        Self {
            store,
            skills,
            write_lock: Mutex::new(()),
        }
    }

    /// Manager that discards skill points.
    pub fn without_hooks(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, Arc::new(NoHooks))
    }

    /// Loads the stored character, creating and persisting a new one if none
    /// is stored or the stored one is unreadable.
    pub fn character(&self) -> Character {
        match load_json::<Character>(self.store.as_ref(), CHARACTER_KEY) {
            Some(character) => character,
            None => self.create_new_character(),
        }
    }

    pub fn create_new_character(&self) -> Character {
        let now = Utc::now();
        let character = Character::new(Uuid::new_v4().to_string(), now.timestamp());
        tracing::info!(id = %character.id, "created new character");
        save_json_logged(self.store.as_ref(), CHARACTER_KEY, &character);
        character
    }

    pub fn equipment(&self) -> Equipment {
        load_json_or_default(self.store.as_ref(), EQUIPPED_KEY)
    }

    pub fn inventory(&self) -> Vec<Item> {
        load_json_or_default(self.store.as_ref(), INVENTORY_KEY)
    }

    /// Combat stats for the current character and equipment.
    pub fn player_stats(&self) -> PlayerStats {
        PlayerStats::resolve(&self.character(), self.equipment().as_slice())
    }

    /// Adds experience, awarding one skill point per level gained.
    pub fn add_experience(&self, amount: u64) -> Character {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut character = self.character();
        let levels = character.gain_experience(amount);
        save_json_logged(self.store.as_ref(), CHARACTER_KEY, &character);

        if levels > 0 {
            tracing::info!(level = character.level, "character leveled up");
        }
        for _ in 0..levels {
            self.skills.award_skill_point();
        }
        character
    }

    pub fn add_to_inventory(&self, item: Item) {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut inventory = self.inventory();
        inventory.push(item);
        save_json_logged(self.store.as_ref(), INVENTORY_KEY, &inventory);
    }

    /// Moves an inventory item into its equipment slot. A displaced item goes
    /// back to the inventory.
    pub fn equip(&self, item_id: &str) -> Result<Character, EquipError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut inventory = self.inventory();
        let idx = inventory
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| EquipError::NotInInventory(item_id.to_string()))?;
        let item = inventory.remove(idx);

        let mut equipment = self.equipment();
        if let Some(displaced) = equipment.equip(item) {
            inventory.push(displaced);
        }
        Ok(self.write_gear(equipment, inventory))
    }

    /// Moves an equipped item back to the inventory.
    pub fn unequip(&self, item_id: &str) -> Result<Character, EquipError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut equipment = self.equipment();
        let item = equipment
            .unequip(item_id)
            .ok_or_else(|| EquipError::NotEquipped(item_id.to_string()))?;

        let mut inventory = self.inventory();
        inventory.push(item);
        Ok(self.write_gear(equipment, inventory))
    }

    fn write_gear(&self, equipment: Equipment, inventory: Vec<Item>) -> Character {
        let mut character = self.character();
        character.gear = equipment.ids();

        let store = self.store.as_ref();
        save_json_logged(store, EQUIPPED_KEY, &equipment);
        save_json_logged(store, INVENTORY_KEY, &inventory);
        save_json_logged(store, CHARACTER_KEY, &character);
        character
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::types::StatKind;
    use crate::items::{ItemCategory, Rarity};
    use crate::utils::persistence::MemoryStore;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct CountingSkills(AtomicU32);

    impl SkillHooks for CountingSkills {
        fn award_skill_point(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn weapon(id: &str, damage: f64) -> Item {
        Item {
            id: id.to_string(),
            name: "Common Weapon".to_string(),
            category: ItemCategory::Weapon,
            rarity: Rarity::Common,
            level: 1,
            quality: 0,
            stats: [(StatKind::Damage, damage)].into_iter().collect(),
            description: String::new(),
        }
    }

    fn manager() -> (Arc<MemoryStore>, CharacterManager) {
        let store = Arc::new(MemoryStore::new());
        let mgr = CharacterManager::without_hooks(store.clone());
        (store, mgr)
    }

    #[test]
    fn test_missing_character_is_created_and_persisted() {
        let (store, mgr) = manager();
        let c = mgr.character();
        assert_eq!(c.level, 1);
        assert!(store.get(CHARACTER_KEY).unwrap().is_some());
        assert_eq!(mgr.character(), c);
        assert!(Uuid::parse_str(&c.id).is_ok());
    }

    #[test]
    fn test_corrupt_character_is_replaced() {
        let (store, mgr) = manager();
        store.set(CHARACTER_KEY, "][").unwrap();
        assert_eq!(mgr.character().level, 1);
        assert!(load_json::<Character>(store.as_ref(), CHARACTER_KEY).is_some());
    }

    #[test]
    fn test_add_experience_awards_skill_points() {
        let store = Arc::new(MemoryStore::new());
        let skills = Arc::new(CountingSkills::default());
        let mgr = CharacterManager::new(store, skills.clone());

        let c = mgr.add_experience(260);
        assert_eq!(c.level, 3);
        assert_eq!(skills.0.load(Ordering::SeqCst), 2);
        assert_eq!(mgr.character().level, 3);
    }

    #[test]
    fn test_equip_moves_item_and_updates_stats() {
        let (_store, mgr) = manager();
        mgr.add_to_inventory(weapon("w1", 0.5));

        let c = mgr.equip("w1").unwrap();
        assert_eq!(c.gear, vec!["w1".to_string()]);
        assert!(mgr.inventory().is_empty());
        assert_eq!(mgr.player_stats().damage, 1.5);
    }

    #[test]
    fn test_equip_swaps_displaced_item_into_inventory() {
        let (_store, mgr) = manager();
        mgr.add_to_inventory(weapon("w1", 0.5));
        mgr.add_to_inventory(weapon("w2", 1.0));
        mgr.equip("w1").unwrap();

        let c = mgr.equip("w2").unwrap();
        assert_eq!(c.gear, vec!["w2".to_string()]);
        let inventory: Vec<String> = mgr.inventory().into_iter().map(|i| i.id).collect();
        assert_eq!(inventory, vec!["w1".to_string()]);
    }

    #[test]
    fn test_unequip_returns_item() {
        let (_store, mgr) = manager();
        mgr.add_to_inventory(weapon("w1", 0.5));
        mgr.equip("w1").unwrap();

        let c = mgr.unequip("w1").unwrap();
        assert!(c.gear.is_empty());
        assert_eq!(mgr.inventory().len(), 1);
        assert_eq!(mgr.player_stats().damage, 1.0);
    }

    #[test]
    fn test_equip_errors() {
        let (_store, mgr) = manager();
        assert_eq!(
            mgr.equip("nope"),
            Err(EquipError::NotInInventory("nope".to_string()))
        );
        assert_eq!(
            mgr.unequip("nope"),
            Err(EquipError::NotEquipped("nope".to_string()))
        );
    }
}
