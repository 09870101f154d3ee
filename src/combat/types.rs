use serde::{Deserialize, Serialize};

use crate::core::constants::SYSTEM_ACTOR;

/// A monster to fight: thematic name plus level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterSpec {
    pub id: String,
    pub level: u32,
}

impl MonsterSpec {
    pub fn new(id: impl Into<String>, level: u32) -> Self {
        Self {
            id: id.into(),
            level,
        }
    }
}

/// Health roll applied when a monster spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HealthVariation {
    Strong,
    Weak,
    #[default]
    Normal,
}

impl HealthVariation {
    pub fn name(&self) -> &'static str {
        match self {
            HealthVariation::Strong => "Strong",
            HealthVariation::Weak => "Weak",
            HealthVariation::Normal => "Normal",
        }
    }

    /// Fraction of base health added (or removed).
    pub fn factor(&self) -> f64 {
        match self {
            HealthVariation::Strong => crate::core::constants::MONSTER_HEALTH_VARIATION,
            HealthVariation::Weak => -crate::core::constants::MONSTER_HEALTH_VARIATION,
            HealthVariation::Normal => 0.0,
        }
    }
}

/// Live monster state inside one simulation. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MonsterState {
    pub id: String,
    pub level: u32,
    pub max_hp: u32,
    pub current_hp: f64,
    pub base_damage: f64,
    pub attack_speed: f64,
    pub attack_cooldown: f64,
    pub suffix: HealthVariation,
}

impl MonsterState {
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0.0
    }

    pub fn take_damage(&mut self, amount: f64) {
        self.current_hp = (self.current_hp - amount).max(0.0);
    }

    /// "Zombie (Weak)"
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.id, self.suffix.name())
    }
}

/// What a log line records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogKind {
    PlayerAttack,
    MonsterAttack,
    Victory,
    Defeat,
    ItemBox,
    /// Lines stored without a kind; classified from their text on replay.
    #[default]
    Unknown,
}

impl LogKind {
    pub fn is_system(&self) -> bool {
        matches!(self, LogKind::Victory | LogKind::Defeat | LogKind::ItemBox)
    }
}

/// One action in a battle log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogLine {
    pub actor: String,
    pub actor_max_hp: f64,
    pub actor_current_hp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_max_hp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_current_hp: Option<f64>,
    /// Simulation seconds since the battle started.
    pub timestamp: f64,
    pub display_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<HealthVariation>,
    #[serde(default)]
    pub kind: LogKind,
}

impl LogLine {
    /// A line spoken by the system rather than a combatant.
    pub fn system(kind: LogKind, max_hp: f64, current_hp: f64, timestamp: f64, text: &str) -> Self {
        Self {
            actor: SYSTEM_ACTOR.to_string(),
            actor_max_hp: max_hp,
            actor_current_hp: current_hp,
            target: None,
            target_max_hp: None,
            target_current_hp: None,
            timestamp,
            display_text: text.to_string(),
            suffix: None,
            kind,
        }
    }

    pub fn is_system(&self) -> bool {
        self.kind.is_system() || self.actor.eq_ignore_ascii_case(SYSTEM_ACTOR)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BattleOutcome {
    Victory,
    Defeat,
    /// The iteration cap ran out before either side fell.
    Inconclusive,
}

impl BattleOutcome {
    pub fn is_victory(&self) -> bool {
        matches!(self, BattleOutcome::Victory)
    }
}

/// Result of [`simulate_battle`](super::logic::simulate_battle).
#[derive(Debug, Clone)]
pub struct BattleResult {
    pub logs: Vec<LogLine>,
    pub outcome: BattleOutcome,
    /// True only for [`BattleOutcome::Victory`].
    pub success: bool,
    pub monsters: Vec<MonsterState>,
    pub player_hp: f64,
    /// Simulation seconds elapsed.
    pub duration: f64,
    pub iterations: u32,
}

impl BattleResult {
    /// Health roll of the monster with `id`, `Normal` if it never spawned.
    pub fn suffix_of(&self, id: &str) -> HealthVariation {
        self.monsters
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.suffix)
            .unwrap_or_default()
    }

    pub fn max_hp_of(&self, id: &str) -> Option<u32> {
        self.monsters.iter().find(|m| m.id == id).map(|m| m.max_hp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_line_json_uses_camel_case() {
        let line = LogLine::system(
            LogKind::Victory,
            10.0,
            4.5,
            1.0,
            "You have defeated all monsters!",
        );
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["actor"], "system");
        assert_eq!(json["actorMaxHp"], 10.0);
        assert_eq!(json["displayText"], "You have defeated all monsters!");
        assert_eq!(json["kind"], "victory");
        assert!(json.get("target").is_none());
    }

    #[test]
    fn test_legacy_line_without_kind_parses() {
        let json = r#"{"actor":"Joko","actorMaxHp":10,"actorCurrentHp":10,"timestamp":0,
            "displayText":"You hit Zombie (Weak) for 0.4 damage! (6.6/7 HP)"}"#;
        let line: LogLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.kind, LogKind::Unknown);
        assert!(line.target.is_none());
        assert!(!line.is_system());
    }

    #[test]
    fn test_system_actor_is_case_insensitive() {
        let mut line = LogLine::system(LogKind::Unknown, 0.0, 0.0, 0.0, "x");
        line.actor = "System".to_string();
        assert!(line.is_system());
    }

    #[test]
    fn test_monster_take_damage_floors_at_zero() {
        let mut m = MonsterState {
            id: "Zombie".to_string(),
            level: 1,
            max_hp: 10,
            current_hp: 10.0,
            base_damage: 1.5,
            attack_speed: 1.0,
            attack_cooldown: 0.0,
            suffix: HealthVariation::Normal,
        };
        m.take_damage(4.0);
        assert_eq!(m.current_hp, 6.0);
        m.take_damage(100.0);
        assert_eq!(m.current_hp, 0.0);
        assert!(!m.is_alive());
        assert_eq!(m.display_name(), "Zombie (Normal)");
    }

    #[test]
    fn test_suffix_serializes_capitalized() {
        assert_eq!(
            serde_json::to_string(&HealthVariation::Strong).unwrap(),
            "\"Strong\""
        );
    }
}
