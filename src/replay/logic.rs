//! Rebuilds an animation timeline from a stored battle log.
//!
//! Hit points come from the structured fields of each line. Lines stored
//! without a kind are classified from their display text, and their numbers
//! are read back out of it.

use std::collections::HashMap;

use super::types::{CombatantFrame, Replay, ReplayFrame};
use crate::combat::{LogKind, LogLine};
use crate::core::constants::*;
use crate::progression::BattleLogEntry;

/// Builds a replay for `entry`: an opening frame, frames every 0.1 s between
/// log events, one frame per event and a closing frame two seconds after the
/// last one.
pub fn create_replay(entry: &BattleLogEntry) -> Replay {
    let mut current = initial_frame(entry);
    let mut frames = vec![current.clone()];

    let mut clock = 0.0;
    let mut tick: u32 = 0;
    let mut player_last_action = 0.0;
    let mut monster_last_action: HashMap<String, f64> = HashMap::new();

    for line in &entry.logs {
        let kind = classify(line);
        if line.is_system() || kind.is_system() {
            apply_terminal(&mut current, kind);
            continue;
        }

        while clock < line.timestamp {
            tick += 1;
            clock = (tick as f64 * REPLAY_FRAME_INTERVAL).min(line.timestamp);
            current.timestamp = clock;
            current.player.attack_cooldown =
                bar_fill(clock, player_last_action, current.player.attack_speed);
            for monster in &mut current.monsters {
                let last = monster_last_action.get(&monster.name).copied().unwrap_or(0.0);
                monster.attack_cooldown = bar_fill(clock, last, monster.attack_speed);
            }
            frames.push(current.clone());
        }

        match kind {
            LogKind::PlayerAttack => {
                let target = line
                    .target
                    .clone()
                    .or_else(|| legacy_target(&line.display_text));
                if let Some(name) = target {
                    if let Some(monster) = current.monster_mut(&name) {
                        monster.current_hp = hit_points_after(line, monster.current_hp);
                    }
                }
                player_last_action = clock;
                current.player.attack_cooldown = 0.0;
            }
            LogKind::MonsterAttack => {
                current.player.current_hp = hit_points_after(line, current.player.current_hp);
                if let Some(monster) = current.monster_mut(&line.actor) {
                    monster_last_action.insert(line.actor.clone(), clock);
                    monster.attack_cooldown = 0.0;
                }
            }
            _ => {
                tracing::debug!(text = %line.display_text, "skipping unrecognized log line");
            }
        }
        current.timestamp = clock;
        frames.push(current.clone());
    }

    let mut closing = current;
    closing.timestamp = clock + REPLAY_TAIL_SECONDS;
    frames.push(closing);

    Replay::new(frames)
}

/// Builds a replay from a raw stored entry.
///
/// `None` if the entry has no `logs` array or does not otherwise parse; the
/// problem is logged rather than returned.
pub fn replay_from_json(raw: &serde_json::Value) -> Option<Replay> {
    if !raw.get("logs").is_some_and(|logs| logs.is_array()) {
        tracing::error!("battle log entry has no logs array, cannot replay");
        return None;
    }
    match serde_json::from_value::<BattleLogEntry>(raw.clone()) {
        Ok(entry) => Some(create_replay(&entry)),
        Err(e) => {
            tracing::error!(error = %e, "malformed battle log entry, cannot replay");
            None
        }
    }
}

fn initial_frame(entry: &BattleLogEntry) -> ReplayFrame {
    let (name, max_hp) = player_identity(&entry.logs);
    ReplayFrame {
        timestamp: 0.0,
        player: combatant(name, max_hp, 1.0),
        monsters: entry
            .monsters
            .iter()
            .map(|m| {
                let max_hp = m.max_hp.map(f64::from).unwrap_or(REPLAY_DEFAULT_MONSTER_HP);
                combatant(m.id.clone(), max_hp, MONSTER_ATTACK_SPEED)
            })
            .collect(),
    }
}

fn combatant(name: String, max_hp: f64, attack_speed: f64) -> CombatantFrame {
    CombatantFrame {
        name,
        current_hp: max_hp,
        max_hp,
        current_mana: REPLAY_PLACEHOLDER_MANA,
        max_mana: REPLAY_PLACEHOLDER_MANA,
        attack_cooldown: 0.0,
        attack_speed,
    }
}

/// Player name and max hp from the first combat line.
fn player_identity(logs: &[LogLine]) -> (String, f64) {
    let Some(line) = logs.iter().find(|l| !l.is_system()) else {
        return (PLAYER_FALLBACK_NAME.to_string(), REPLAY_DEFAULT_PLAYER_HP);
    };
    if classify(line) == LogKind::MonsterAttack {
        if let Some(name) = &line.target {
            let max_hp = line.target_max_hp.unwrap_or(REPLAY_DEFAULT_PLAYER_HP);
            return (name.clone(), max_hp);
        }
        let max_hp = trailing_hp(&line.display_text)
            .map(|(_, max)| max)
            .unwrap_or(REPLAY_DEFAULT_PLAYER_HP);
        return (PLAYER_FALLBACK_NAME.to_string(), max_hp);
    }
    let max_hp = if line.actor_max_hp > 0.0 {
        line.actor_max_hp
    } else {
        REPLAY_DEFAULT_PLAYER_HP
    };
    (line.actor.clone(), max_hp)
}

fn bar_fill(now: f64, last_action: f64, attack_speed: f64) -> f64 {
    ((now - last_action) * attack_speed).clamp(0.0, 1.0)
}

fn apply_terminal(frame: &mut ReplayFrame, kind: LogKind) {
    match kind {
        LogKind::Defeat => frame.player.current_hp = 0.0,
        LogKind::Victory => frame.monsters.iter_mut().for_each(|m| m.current_hp = 0.0),
        _ => {}
    }
}

/// The line's kind, or one inferred from its text for lines stored without one.
pub fn classify(line: &LogLine) -> LogKind {
    if line.kind != LogKind::Unknown {
        return line.kind;
    }
    let text = line.display_text.as_str();
    if text.starts_with("You hit ") {
        LogKind::PlayerAttack
    } else if text.contains(" hits you ") {
        LogKind::MonsterAttack
    } else if text.contains("have been defeated") {
        LogKind::Defeat
    } else if text.contains("defeated all") {
        LogKind::Victory
    } else if text.contains("item box") {
        LogKind::ItemBox
    } else {
        LogKind::Unknown
    }
}

/// Target hp after the attack on `line`: the recorded value, else the value
/// printed at the end of the text, else `before` minus the printed damage.
fn hit_points_after(line: &LogLine, before: f64) -> f64 {
    if let Some(hp) = line.target_current_hp {
        return hp;
    }
    if let Some((hp, _)) = trailing_hp(&line.display_text) {
        return hp;
    }
    match damage_in(&line.display_text) {
        Some(damage) => (before - damage).max(0.0),
        None => before,
    }
}

/// "You hit Zombie (Weak) for ..." -> "Zombie"
fn legacy_target(text: &str) -> Option<String> {
    let rest = text.strip_prefix("You hit ")?;
    let end = [rest.find(" ("), rest.find(" for ")]
        .into_iter()
        .flatten()
        .min()?;
    Some(rest[..end].to_string())
}

/// "... for 1.3 damage! ..." -> 1.3
fn damage_in(text: &str) -> Option<f64> {
    let start = text.find(" for ")? + " for ".len();
    let rest = &text[start..];
    let end = rest.find(" damage")?;
    rest[..end].trim().parse().ok()
}

/// "... (6.6/10 HP)" -> (6.6, 10.0)
fn trailing_hp(text: &str) -> Option<(f64, f64)> {
    let inner = text.trim_end().strip_suffix(" HP)")?;
    let open = inner.rfind('(')?;
    let (current, max) = inner[open + 1..].split_once('/')?;
    Some((current.trim().parse().ok()?, max.trim().parse().ok()?))
}
