use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::constants::{DEFAULT_CHARACTER_NAME, EXP_CURVE_BASE, EXP_CURVE_GROWTH};

/// Every stat a character or item can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatKind {
    Health,
    Damage,
    AttackPower,
    AttackSpeed,
    Mana,
    CastSpeed,
    CastChance,
    Armor,
    Strength,
    Intelligence,
    Dexterity,
    Vitality,
    Willpower,
}

impl StatKind {
    pub fn all() -> [StatKind; 13] {
        [
            StatKind::Health,
            StatKind::Damage,
            StatKind::AttackPower,
            StatKind::AttackSpeed,
            StatKind::Mana,
            StatKind::CastSpeed,
            StatKind::CastChance,
            StatKind::Armor,
            StatKind::Strength,
            StatKind::Intelligence,
            StatKind::Dexterity,
            StatKind::Vitality,
            StatKind::Willpower,
        ]
    }

    /// The camelCase key used in stored JSON.
    pub fn key(&self) -> &'static str {
        match self {
            StatKind::Health => "health",
            StatKind::Damage => "damage",
            StatKind::AttackPower => "attackPower",
            StatKind::AttackSpeed => "attackSpeed",
            StatKind::Mana => "mana",
            StatKind::CastSpeed => "castSpeed",
            StatKind::CastChance => "castChance",
            StatKind::Armor => "armor",
            StatKind::Strength => "strength",
            StatKind::Intelligence => "intelligence",
            StatKind::Dexterity => "dexterity",
            StatKind::Vitality => "vitality",
            StatKind::Willpower => "willpower",
        }
    }

}

/// Stat values keyed by kind. Absent entries read as zero.
pub type StatMap = BTreeMap<StatKind, f64>;

/// Reads a stat, treating a missing entry as zero.
pub fn stat_value(stats: &StatMap, kind: StatKind) -> f64 {
    stats.get(&kind).copied().unwrap_or(0.0)
}

/// The persisted player character.
///
/// IMPORTANT: new fields need `#[serde(default)]` so older snapshots keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub created_at: i64,
    pub level: u32,
    #[serde(rename = "exp")]
    pub experience: u64,
    #[serde(rename = "expToNextLevel")]
    pub experience_to_next_level: u64,
    #[serde(default)]
    pub stats: StatMap,
    /// Ids of equipped items.
    #[serde(default)]
    pub gear: Vec<String>,
}

fn default_name() -> String {
    DEFAULT_CHARACTER_NAME.to_string()
}

impl Character {
    /// A fresh level-1 character with the starting stat line.
    pub fn new(id: String, created_at: i64) -> Self {
        let stats: StatMap = [
            (StatKind::Health, 10.0),
            (StatKind::Damage, 1.0),
            (StatKind::AttackPower, 1.0),
            (StatKind::AttackSpeed, 1.0),
            (StatKind::Strength, 0.0),
            (StatKind::Intelligence, 0.0),
            (StatKind::Dexterity, 0.0),
            (StatKind::Vitality, 0.0),
            (StatKind::Willpower, 0.0),
            (StatKind::CastSpeed, 1.0),
            (StatKind::Mana, 10.0),
        ]
        .into_iter()
        .collect();

        Self {
            id,
            name: default_name(),
            created_at,
            level: 1,
            experience: 0,
            experience_to_next_level: exp_for_next_level(1),
            stats,
            gear: Vec::new(),
        }
    }

    pub fn base_stat(&self, kind: StatKind) -> f64 {
        stat_value(&self.stats, kind)
    }

    pub fn set_base_stat(&mut self, kind: StatKind, value: f64) {
        self.stats.insert(kind, value);
    }

    /// Adds experience and applies any level-ups. Returns the number of levels gained.
    pub fn gain_experience(&mut self, amount: u64) -> u32 {
        self.experience += amount;
        let mut levels = 0;
        while self.experience >= self.experience_to_next_level {
            self.experience -= self.experience_to_next_level;
            self.level += 1;
            self.experience_to_next_level = exp_for_next_level(self.level);
            levels += 1;
        }
        levels
    }
}

/// Experience needed to leave `level`: `floor(100 × 1.5^(level-1))`.
pub fn exp_for_next_level(level: u32) -> u64 {
    let exponent = level.saturating_sub(1) as i32;
    (EXP_CURVE_BASE * EXP_CURVE_GROWTH.powi(exponent)).floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_character_starting_stats() {
        let c = Character::new("c1".to_string(), 0);
        assert_eq!(c.name, "Joko");
        assert_eq!(c.level, 1);
        assert_eq!(c.experience, 0);
        assert_eq!(c.experience_to_next_level, 100);
        assert_eq!(c.base_stat(StatKind::Health), 10.0);
        assert_eq!(c.base_stat(StatKind::Mana), 10.0);
        assert_eq!(c.base_stat(StatKind::Armor), 0.0);
        assert!(c.gear.is_empty());
    }

    #[test]
    fn test_exp_curve() {
        assert_eq!(exp_for_next_level(1), 100);
        assert_eq!(exp_for_next_level(2), 150);
        assert_eq!(exp_for_next_level(3), 225);
        assert_eq!(exp_for_next_level(4), 337);
    }

    #[test]
    fn test_gain_experience_multiple_levels() {
        let mut c = Character::new("c1".to_string(), 0);
        // 100 to reach level 2, 150 to reach level 3, 10 left over
        let levels = c.gain_experience(260);
        assert_eq!(levels, 2);
        assert_eq!(c.level, 3);
        assert_eq!(c.experience, 10);
        assert_eq!(c.experience_to_next_level, 225);
    }

    #[test]
    fn test_gain_experience_below_threshold() {
        let mut c = Character::new("c1".to_string(), 0);
        assert_eq!(c.gain_experience(99), 0);
        assert_eq!(c.level, 1);
        assert_eq!(c.experience, 99);
    }

    #[test]
    fn test_stats_serialize_with_camel_case_keys() {
        let c = Character::new("c1".to_string(), 0);
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"attackPower\":1.0"));
        assert!(json.contains("\"expToNextLevel\":100"));

        let back: Character = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
