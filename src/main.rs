use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use walkquest::character::{get_stat, StatKind};
use walkquest::core::constants::BOSS_THRESHOLD;
use walkquest::replay::{create_replay, ReplayFrame};
use walkquest::utils::build_info;
use walkquest::utils::logging::init_logging;
use walkquest::utils::persistence::{default_store_path, FileStore, KeyValueStore};
use walkquest::{ManualStepSource, ProgressReport, ProgressionEngine, StepSource};

fn main() -> io::Result<()> {
    init_logging("warn");

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let save_path = take_save_path(&mut args);

    let Some(command) = args.first().map(String::as_str) else {
        print_help();
        return Ok(());
    };

    match command {
        "--version" | "-v" => {
            println!("{}", build_info::version_string());
            return Ok(());
        }
        "--help" | "-h" => {
            print_help();
            return Ok(());
        }
        _ => {}
    }

    let path = match save_path {
        Some(path) => path,
        None => default_store_path().map_err(io::Error::other)?,
    };
    let store: Arc<dyn KeyValueStore> = match FileStore::open(&path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("Could not open save file {}: {}", path.display(), e);
            eprintln!("Move it aside or pass --save <path> to start fresh.");
            std::process::exit(1);
        }
    };
    let steps = Arc::new(ManualStepSource::persistent(store.clone()));
    let engine = ProgressionEngine::new(store, steps.clone());

    match command {
        "walk" => {
            let count = parse_arg::<u64>(&args, 1, "walk <steps>");
            engine.start_session();
            let report = engine.on_step_update(steps.walk(count));
            engine.end_session();
            print_walk(count, report.as_ref(), &engine);
        }
        "status" => print_status(&engine, steps.as_ref()),
        "history" => print_history(&engine),
        "replay" => {
            let n = parse_arg::<usize>(&args, 1, "replay <n>");
            match engine.history_entry(n.saturating_sub(1)) {
                Some(entry) => {
                    let replay = create_replay(&entry);
                    println!("{} ({:.1}s)", entry.summary(), replay.duration());
                    print_replay(&replay.frames);
                }
                None => {
                    eprintln!("No history entry #{}. Run 'walkquest history' to list them.", n);
                    std::process::exit(1);
                }
            }
        }
        "open-box" => match engine.open_item_box() {
            Some(item) => {
                println!("You open the box and find: {} (Lv {})", item.name, item.level);
                println!("  {}", item.description);
                println!("  id: {}", item.id);
            }
            None => println!("No item boxes to open. Keep walking!"),
        },
        "inventory" => {
            let characters = engine.characters();
            println!("Equipped:");
            for item in characters.equipment().iter_equipped() {
                println!("  {:<16} {}", item.name, item.id);
            }
            println!("Inventory:");
            for item in characters.inventory() {
                println!("  {:<16} {}  ({})", item.name, item.id, item.description);
            }
        }
        "equip" => {
            let Some(id) = args.get(1) else {
                eprintln!("Usage: walkquest equip <item-id>");
                std::process::exit(1);
            };
            match engine.characters().equip(id) {
                Ok(character) => println!("Equipped. Gear: {}", character.gear.join(", ")),
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            }
        }
        "reset" => {
            engine.reset();
            println!("Walk progress reset. Back to {}.", engine.current_area_name());
        }
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!("Run 'walkquest --help' for usage.");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Removes `--save <path>` from `args`, wherever it appears.
fn take_save_path(args: &mut Vec<String>) -> Option<PathBuf> {
    let idx = args.iter().position(|a| a == "--save")?;
    if idx + 1 >= args.len() {
        eprintln!("--save needs a path");
        std::process::exit(1);
    }
    let path = args.remove(idx + 1);
    args.remove(idx);
    Some(PathBuf::from(path))
}

fn parse_arg<T: std::str::FromStr>(args: &[String], idx: usize, usage: &str) -> T {
    match args.get(idx).and_then(|a| a.parse().ok()) {
        Some(value) => value,
        None => {
            eprintln!("Usage: walkquest {}", usage);
            std::process::exit(1);
        }
    }
}

fn print_help() {
    println!("Walkquest - walk to fight monsters\n");
    println!("Usage: walkquest [--save <path>] <command>\n");
    println!("Commands:");
    println!("  walk <steps>    Record steps and fight the battles they earn");
    println!("  status          Show area, character and pending item boxes");
    println!("  history         List recent battles and finds");
    println!("  replay <n>      Replay history entry n");
    println!("  open-box        Open the oldest item box");
    println!("  inventory       List equipped and carried items");
    println!("  equip <id>      Equip an item from the inventory");
    println!("  reset           Forget all walk progress");
    println!("  --version       Show version information");
    println!("  --help          Show this help message");
    println!();
    println!("The save file defaults to the platform data directory; set");
    println!("WALKQUEST_SAVE or pass --save to use another.");
}

fn print_walk(count: u64, report: Option<&ProgressReport>, engine: &ProgressionEngine) {
    println!("You walk {} steps.", count);
    let Some(report) = report else {
        println!("Nothing happened.");
        return;
    };
    if report.battles == 0 && report.item_boxes_found == 0 {
        println!("No monsters yet. Every 500 steps brings a battle.");
    }
    for _ in 0..report.item_boxes_found {
        println!("  You found an item box!");
    }
    if report.battles > 0 {
        println!(
            "  {} battles: {} won, {} lost{}",
            report.battles,
            report.victories,
            report.defeats,
            if report.inconclusive > 0 {
                format!(", {} drawn", report.inconclusive)
            } else {
                String::new()
            }
        );
    }
    if report.experience_gained > 0 {
        println!("  +{} exp", report.experience_gained);
    }
    if report.bosses_defeated > 0 {
        println!("  Boss defeated! Welcome to {}.", engine.current_area_name());
    }
}

fn print_status(engine: &ProgressionEngine, steps: &dyn StepSource) {
    let character = engine.characters().character();
    let equipped = engine.characters().equipment();
    let gear = equipped.as_slice();

    println!(
        "Area {}: {} ({}/{} steps to the boss)",
        engine.current_area(),
        engine.current_area_name(),
        engine.steps_in_area(),
        BOSS_THRESHOLD
    );
    println!(
        "{} - Level {} ({}/{} exp)",
        character.name, character.level, character.experience, character.experience_to_next_level
    );
    for stat in [
        StatKind::Health,
        StatKind::Damage,
        StatKind::AttackPower,
        StatKind::AttackSpeed,
        StatKind::Armor,
        StatKind::Mana,
    ] {
        println!("  {:<12} {:.2}", stat.key(), get_stat(&character, stat, gear));
    }
    println!("Item boxes waiting: {}", engine.pending_item_boxes());
    println!("Lifetime steps: {}", steps.lifetime());
}

fn print_history(engine: &ProgressionEngine) {
    let history = engine.history();
    if history.is_empty() {
        println!("No battles yet.");
        return;
    }
    for (i, entry) in history.iter().enumerate() {
        println!("{:>3}. {}", i + 1, entry.summary());
    }
}

fn print_replay(frames: &[ReplayFrame]) {
    let hp = |current: f64, max: f64| format!("{:.1}/{:.0}", current, max);
    // one line per second of battle, plus the last frame
    let mut next_second = 0.0;
    for (i, frame) in frames.iter().enumerate() {
        let last = i + 1 == frames.len();
        if frame.timestamp < next_second && !last {
            continue;
        }
        next_second = frame.timestamp.floor() + 1.0;

        let foes: Vec<String> = frame
            .monsters
            .iter()
            .map(|m| format!("{} {}", m.name, hp(m.current_hp, m.max_hp)))
            .collect();
        println!(
            "  t={:>5.1}s  {} {}  |  {}",
            frame.timestamp,
            frame.player.name,
            hp(frame.player.current_hp, frame.player.max_hp),
            foes.join(", ")
        );
    }
}
