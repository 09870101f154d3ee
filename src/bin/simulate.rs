//! Walk balance simulator CLI.
//!
//! Run Monte Carlo simulations of walkers to analyze game balance.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                          # Default: 100 walkers, 100k steps
//!   cargo run --bin simulate -- -n 20 --steps 50000   # 20 walkers, 50k steps each
//!   cargo run --bin simulate -- --seed 42             # Reproducible run

use std::env;

use walkquest::simulator::{run_simulation, SimConfig};
use walkquest::utils::logging::init_logging;

fn main() {
    init_logging("warn");

    let args: Vec<String> = env::args().collect();
    let config = parse_args(&args);

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              WALKQUEST BALANCE SIMULATOR                      ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Steps per run:  {}", config.steps_per_run);
    println!("  Update every:   {} steps", config.steps_per_update);
    println!("  Simulate Loot:  {}", config.simulate_loot);
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(&config);
    println!("{}", report.to_text());

    if args.iter().any(|a| a == "--json") {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, report.to_json()) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(e) => eprintln!("Failed to write JSON report: {}", e),
        }
    }
}

fn parse_args(args: &[String]) -> SimConfig {
    let mut config = SimConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(100);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--steps" => {
                if i + 1 < args.len() {
                    config.steps_per_run = args[i + 1].parse().unwrap_or(100_000);
                    i += 1;
                }
            }
            "--chunk" => {
                if i + 1 < args.len() {
                    config.steps_per_update = args[i + 1].parse().unwrap_or(2_000);
                    i += 1;
                }
            }
            "--casual" => {
                let runs = config.num_runs;
                config = SimConfig {
                    seed: config.seed,
                    ..SimConfig::casual_walker(runs)
                };
            }
            "--no-loot" => {
                config.simulate_loot = false;
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "-q" | "--quiet" => {
                config.verbosity = 0;
            }
            "--json" => {}
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Run with --help for usage.");
                std::process::exit(1);
            }
        }
        i += 1;
    }

    config
}

fn print_help() {
    println!("Walkquest Balance Simulator\n");
    println!("Usage: simulate [OPTIONS]\n");
    println!("Options:");
    println!("  -n, --runs <N>     Number of simulated walkers (default: 100)");
    println!("  -s, --seed <SEED>  Random seed for reproducible results");
    println!("      --steps <N>    Steps each walker takes (default: 100000)");
    println!("      --chunk <N>    Steps between pedometer updates (default: 2000)");
    println!("      --casual       A month at 5k steps a day");
    println!("      --no-loot      Leave item boxes unopened");
    println!("      --json         Also write the report as JSON");
    println!("  -v, --verbose      Print every run");
    println!("  -q, --quiet        Only print the report");
    println!("  -h, --help         Show this help message");
}
