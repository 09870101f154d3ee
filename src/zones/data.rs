//! Area names and monster themes.

use crate::combat::MonsterSpec;
use crate::core::constants::BOSS_LEVEL_PER_AREA;

/// A themed area of the walking world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaTheme {
    pub name: &'static str,
    /// Monsters met in order of progress through the area.
    pub monsters: [&'static str; 4],
}

const AREA_THEMES: [AreaTheme; 4] = [
    AreaTheme {
        name: "Crypt of the Damned",
        monsters: ["Zombie", "Skeleton", "Ghoul", "Vampire"],
    },
    AreaTheme {
        name: "Slime Bog",
        monsters: ["Slime", "Evil Tree", "Fungus Monster", "Gelatinous Cube"],
    },
    AreaTheme {
        name: "Pirate Cove",
        monsters: ["Pirate Ghost", "Cursed Parrot", "Kraken Spawn", "Drowned Sailor"],
    },
    AreaTheme {
        name: "Volcanic Crater",
        monsters: ["Fire Imp", "Lava Golem", "Ash Wraith", "Magma Serpent"],
    },
];

/// Number of monsters in every theme.
pub const THEME_SIZE: u32 = 4;

/// Named areas; later areas reuse the themes in order.
pub fn area_count() -> u32 {
    AREA_THEMES.len() as u32
}

/// Theme for `area` (1-based). Areas past the table cycle through it.
pub fn area_theme(area: u32) -> &'static AreaTheme {
    let idx = (area.max(1) - 1) as usize % AREA_THEMES.len();
    &AREA_THEMES[idx]
}

/// "Crypt of the Damned" for area 1, "Area 7" past the named areas.
pub fn area_name(area: u32) -> String {
    if (1..=area_count()).contains(&area) {
        area_theme(area).name.to_string()
    } else {
        format!("Area {area}")
    }
}

/// Which theme monster to fight, by quartile of progress toward the boss.
pub fn monster_index(steps_in_area: u64, boss_threshold: u64) -> usize {
    if boss_threshold == 0 {
        return THEME_SIZE as usize - 1;
    }
    let progress = steps_in_area as f64 / boss_threshold as f64;
    let quartile = (progress * 4.0).floor().max(0.0) as usize;
    quartile.min(THEME_SIZE as usize - 1)
}

/// The regular encounter for `area` at `steps_in_area`.
pub fn normal_monster(area: u32, steps_in_area: u64, boss_threshold: u64) -> MonsterSpec {
    let index = monster_index(steps_in_area, boss_threshold);
    let level = (area.max(1) - 1) * THEME_SIZE + index as u32 + 1;
    MonsterSpec::new(area_theme(area).monsters[index], level)
}

/// The single boss guarding `area`.
pub fn boss_monster(area: u32) -> MonsterSpec {
    MonsterSpec::new(format!("Boss of {}", area_name(area)), area * BOSS_LEVEL_PER_AREA)
}
