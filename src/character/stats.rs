//! Effective stat resolution.
//!
//! A stat's effective value is its base value plus the sum of the equipped
//! items' bonuses, then adjusted by one attribute:
//!
//! | stat        | attribute    | rule                      |
//! |-------------|--------------|---------------------------|
//! | attackPower | strength     | × (1 + str × 0.05)        |
//! | attackSpeed | dexterity    | × (1 + dex × 0.03)        |
//! | health      | vitality     | × (1 + vit × 0.10)        |
//! | mana        | willpower    | + wil × 0.15              |
//! | castChance  | intelligence | + int × 2 (percent points)|
//!
//! The attribute factor reads the character's base attribute only. Attributes
//! rolled on items add to the attribute stat itself but never scale others.

use super::types::{Character, StatKind};
use crate::core::constants::*;
use crate::items::Item;

/// Base plus item contribution, no attribute modifiers.
fn flat_stat(character: &Character, stat: StatKind, equipped: &[Item]) -> f64 {
    let items: f64 = equipped.iter().map(|item| item.stat(stat)).sum();
    character.base_stat(stat) + items
}

/// Effective value of `stat` for `character` wearing `equipped`.
///
/// Pure; missing values read as zero.
pub fn get_stat(character: &Character, stat: StatKind, equipped: &[Item]) -> f64 {
    let value = flat_stat(character, stat, equipped);
    let attr = |kind: StatKind| character.base_stat(kind);

    match stat {
        StatKind::AttackPower => {
            value * (1.0 + attr(StatKind::Strength) * STRENGTH_ATTACK_POWER_BONUS)
        }
        StatKind::AttackSpeed => {
            value * (1.0 + attr(StatKind::Dexterity) * DEXTERITY_ATTACK_SPEED_BONUS)
        }
        StatKind::Health => value * (1.0 + attr(StatKind::Vitality) * VITALITY_HEALTH_BONUS),
        StatKind::Mana => value + attr(StatKind::Willpower) * WILLPOWER_MANA_BONUS,
        StatKind::CastChance => {
            value + attr(StatKind::Intelligence) * INTELLIGENCE_CAST_CHANCE_BONUS
        }
        _ => value,
    }
}

/// The stat bundle the combat simulator needs, resolved once per battle.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStats {
    pub name: String,
    pub health: f64,
    pub mana: f64,
    pub armor: f64,
    pub damage: f64,
    pub attack_power: f64,
    pub attack_speed: f64,
}

impl PlayerStats {
    pub fn resolve(character: &Character, equipped: &[Item]) -> Self {
        Self {
            name: character.name.clone(),
            health: get_stat(character, StatKind::Health, equipped),
            mana: get_stat(character, StatKind::Mana, equipped),
            armor: get_stat(character, StatKind::Armor, equipped),
            damage: get_stat(character, StatKind::Damage, equipped),
            attack_power: get_stat(character, StatKind::AttackPower, equipped),
            attack_speed: get_stat(character, StatKind::AttackSpeed, equipped),
        }
    }

    /// Seconds between player swings. Infinite when attack speed is not positive.
    pub fn attack_interval(&self) -> f64 {
        if self.attack_speed > 0.0 {
            1.0 / self.attack_speed
        } else {
            f64::INFINITY
        }
    }
}
