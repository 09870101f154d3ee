use rand::{Rng, RngCore};

use super::types::{Item, ItemCategory, Rarity};
use crate::character::types::{StatKind, StatMap};

/// Produces loot for opened item boxes.
pub trait ItemGenerator: Send + Sync {
    fn generate_random_item(&self, level: u32, rng: &mut dyn RngCore) -> Item;
}

/// The standard loot table.
///
/// Amulets carry spells, which the loot table does not roll, so only weapons,
/// armor and gloves drop.
#[derive(Debug, Clone, Default)]
pub struct LootTable;

const DROPPABLE: [ItemCategory; 3] = [
    ItemCategory::Weapon,
    ItemCategory::Armor,
    ItemCategory::Gloves,
];

impl ItemGenerator for LootTable {
    fn generate_random_item(&self, level: u32, rng: &mut dyn RngCore) -> Item {
        let category = DROPPABLE[rng.gen_range(0..DROPPABLE.len())];
        generate_item(category, level, rng)
    }
}

/// Generates an item of the given category, rolling rarity from `level`.
pub fn generate_item(category: ItemCategory, level: u32, rng: &mut dyn RngCore) -> Item {
    let rarity = pick_rarity_by_level(level, rng);
    let stats = generate_stats(category, rarity, rng);
    let id = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();

    Item {
        id: id.to_string(),
        name: format!("{} {}", rarity.name(), category.name()),
        category,
        rarity,
        level,
        quality: 0,
        description: describe(category, rarity, &stats),
        stats,
    }
}

/// Each level adds 10% to the chance of bumping rarity one tier; bumps stack.
pub fn pick_rarity_by_level(level: u32, rng: &mut dyn RngCore) -> Rarity {
    let upgrade_chance = (0.1 * level as f64).min(1.0);
    let mut rarity = Rarity::Common;
    while let Some(next) = rarity.upgraded() {
        if rng.gen::<f64>() >= upgrade_chance {
            break;
        }
        rarity = next;
    }
    rarity
}

/// Primary stat always; uncommon adds one secondary, rare rolls the whole pool.
fn generate_stats(category: ItemCategory, rarity: Rarity, rng: &mut dyn RngCore) -> StatMap {
    let pool = category.stat_pool();
    let mut stats = StatMap::new();

    stats.insert(pool[0], roll_stat_value(pool[0], rng));

    match rarity {
        Rarity::Common => {}
        Rarity::Uncommon => {
            let secondaries = &pool[1..];
            if !secondaries.is_empty() {
                let stat = secondaries[rng.gen_range(0..secondaries.len())];
                stats.insert(stat, roll_stat_value(stat, rng));
            }
        }
        Rarity::Rare => {
            for &stat in &pool[1..] {
                stats.insert(stat, roll_stat_value(stat, rng));
            }
        }
    }

    stats
}

/// Roll range for an item stat.
pub fn stat_range(stat: StatKind) -> (f64, f64) {
    match stat {
        StatKind::Damage | StatKind::AttackSpeed => (0.1, 1.5),
        StatKind::Armor => (0.1, 0.5),
        StatKind::AttackPower => (0.1, 1.0),
        StatKind::Health => (1.0, 5.0),
        StatKind::Mana => (1.0, 10.0),
        StatKind::CastSpeed => (0.1, 0.5),
        StatKind::Vitality | StatKind::Willpower => (1.0, 2.0),
        _ => (1.0, 1.0),
    }
}

/// Uniform roll within the stat's range, rounded to one decimal.
fn roll_stat_value(stat: StatKind, rng: &mut dyn RngCore) -> f64 {
    let (min, max) = stat_range(stat);
    let raw = if max > min {
        rng.gen_range(min..max)
    } else {
        min
    };
    (raw * 10.0).round() / 10.0
}

fn describe(category: ItemCategory, rarity: Rarity, stats: &StatMap) -> String {
    let parts: Vec<String> = stats
        .iter()
        .map(|(stat, value)| format!("{}: {}", stat.key(), value))
        .collect();
    format!(
        "A {} {} with {}",
        rarity.name().to_lowercase(),
        category.name().to_lowercase(),
        parts.join(", ")
    )
}
