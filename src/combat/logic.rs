use rand::Rng;

use super::types::*;
use crate::character::stats::PlayerStats;
use crate::core::constants::*;

/// Max HP for a monster of `level`, with its random health variation.
///
/// Base health is `10 + (level - 1) × 3`; Strong adds 30%, Weak removes 30%,
/// each outcome equally likely. Always at least 1.
pub fn calculate_monster_health<R: Rng + ?Sized>(
    level: u32,
    rng: &mut R,
) -> (u32, HealthVariation) {
    let base = MONSTER_BASE_HEALTH + level.saturating_sub(1) as f64 * MONSTER_HEALTH_PER_LEVEL;
    let suffix = match rng.gen_range(0..3) {
        0 => HealthVariation::Strong,
        1 => HealthVariation::Weak,
        _ => HealthVariation::Normal,
    };
    let health = (base + base * suffix.factor()).floor().max(1.0) as u32;
    (health, suffix)
}

/// `1 + level / 2`, not truncated.
pub fn calculate_monster_damage(level: u32) -> f64 {
    1.0 + level as f64 / 2.0
}

pub fn calculate_monster_attack_speed(_level: u32) -> f64 {
    MONSTER_ATTACK_SPEED
}

/// Rolls a fresh monster for `spec`.
pub fn spawn_monster<R: Rng + ?Sized>(spec: &MonsterSpec, rng: &mut R) -> MonsterState {
    let (max_hp, suffix) = calculate_monster_health(spec.level, rng);
    MonsterState {
        id: spec.id.clone(),
        level: spec.level,
        max_hp,
        current_hp: max_hp as f64,
        base_damage: calculate_monster_damage(spec.level),
        attack_speed: calculate_monster_attack_speed(spec.level),
        attack_cooldown: 0.0,
        suffix,
    }
}

struct Player<'a> {
    stats: &'a PlayerStats,
    current_hp: f64,
    attack_cooldown: f64,
}

/// Runs one battle to resolution at a fixed 1/30 s tick.
///
/// Each tick: the player swings at the first living monster when off cooldown,
/// then every living monster swings at the player when off cooldown. The battle
/// ends when the player or the whole party falls, or after
/// [`MAX_BATTLE_ITERATIONS`] ticks, in which case the outcome is
/// [`BattleOutcome::Inconclusive`] and no closing line is written.
pub fn simulate_battle<R: Rng + ?Sized>(
    stats: &PlayerStats,
    specs: &[MonsterSpec],
    rng: &mut R,
) -> BattleResult {
    let mut player = Player {
        stats,
        current_hp: stats.health,
        attack_cooldown: 0.0,
    };
    let mut monsters: Vec<MonsterState> = specs.iter().map(|s| spawn_monster(s, rng)).collect();
    for m in &monsters {
        tracing::debug!(
            monster = %m.id,
            level = m.level,
            max_hp = m.max_hp,
            suffix = m.suffix.name(),
            "spawned monster"
        );
    }

    let mut logs = Vec::new();
    let mut clock = 0.0;
    let mut iterations = 0;
    let mut outcome = BattleOutcome::Inconclusive;

    while iterations < MAX_BATTLE_ITERATIONS {
        player_turn(&mut player, &mut monsters, clock, &mut logs, rng);
        monsters_turn(&mut player, &mut monsters, clock, &mut logs, rng);

        if player.current_hp <= 0.0 {
            logs.push(LogLine::system(
                LogKind::Defeat,
                stats.health,
                0.0,
                clock,
                "You have been defeated!",
            ));
            outcome = BattleOutcome::Defeat;
            break;
        }

        if monsters.iter().all(|m| !m.is_alive()) {
            logs.push(LogLine::system(
                LogKind::Victory,
                stats.health,
                player.current_hp,
                clock,
                "You have defeated all monsters!",
            ));
            outcome = BattleOutcome::Victory;
            break;
        }

        clock += TICK_SECONDS;
        iterations += 1;
    }

    if outcome == BattleOutcome::Inconclusive {
        tracing::warn!(
            iterations,
            player_hp = player.current_hp,
            "battle hit the iteration cap without a winner"
        );
    }

    BattleResult {
        logs,
        outcome,
        success: outcome.is_victory(),
        monsters,
        player_hp: player.current_hp,
        duration: clock,
        iterations,
    }
}

fn player_turn<R: Rng + ?Sized>(
    player: &mut Player<'_>,
    monsters: &mut [MonsterState],
    clock: f64,
    logs: &mut Vec<LogLine>,
    rng: &mut R,
) {
    player.attack_cooldown = (player.attack_cooldown - TICK_SECONDS).max(0.0);
    if player.attack_cooldown > 0.0 {
        return;
    }
    let Some(target) = monsters.iter_mut().find(|m| m.is_alive()) else {
        return;
    };

    let damage = rng.gen::<f64>() * player.stats.damage * player.stats.attack_power;
    target.take_damage(damage);

    logs.push(LogLine {
        actor: player.stats.name.clone(),
        actor_max_hp: player.stats.health,
        actor_current_hp: player.current_hp,
        target: Some(target.id.clone()),
        target_max_hp: Some(target.max_hp as f64),
        target_current_hp: Some(target.current_hp),
        timestamp: clock,
        display_text: format!(
            "You hit {} for {:.1} damage! ({:.1}/{} HP)",
            target.display_name(),
            damage,
            target.current_hp,
            target.max_hp
        ),
        suffix: None,
        kind: LogKind::PlayerAttack,
    });

    player.attack_cooldown = player.stats.attack_interval();
}

fn monsters_turn<R: Rng + ?Sized>(
    player: &mut Player<'_>,
    monsters: &mut [MonsterState],
    clock: f64,
    logs: &mut Vec<LogLine>,
    rng: &mut R,
) {
    for monster in monsters.iter_mut().filter(|m| m.is_alive()) {
        monster.attack_cooldown = (monster.attack_cooldown - TICK_SECONDS).max(0.0);
        if monster.attack_cooldown > 0.0 {
            continue;
        }

        let raw = rng.gen::<f64>() * monster.base_damage;
        let damage = (raw - player.stats.armor).max(0.0);
        player.current_hp = (player.current_hp - damage).max(0.0);

        logs.push(LogLine {
            actor: monster.id.clone(),
            actor_max_hp: monster.max_hp as f64,
            actor_current_hp: monster.current_hp,
            target: Some(player.stats.name.clone()),
            target_max_hp: Some(player.stats.health),
            target_current_hp: Some(player.current_hp),
            timestamp: clock,
            display_text: format!(
                "{} hits you for {:.1} damage! ({:.1}/{} HP)",
                monster.display_name(),
                damage,
                player.current_hp,
                player.stats.health
            ),
            suffix: Some(monster.suffix),
            kind: LogKind::MonsterAttack,
        });

        monster.attack_cooldown = if monster.attack_speed > 0.0 {
            1.0 / monster.attack_speed
        } else {
            f64::INFINITY
        };
    }
}
