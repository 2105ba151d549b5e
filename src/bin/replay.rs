// Standalone replay tool for analyzing coin duel game logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all rounds
//   --rounds <r1,r2>       Replay specific rounds (comma-separated)
//   --validate <r:m,...>   Check that recorded moves match expectations
//   --verbose              Show detailed output for each round
//   --config <path>        Path to CoinDuel.toml (default: CoinDuel.toml)

use std::env;
use std::process;

use coin_duel::config::Config;
use coin_duel::replay::ReplayEngine;
use coin_duel::types::Direction;

fn print_usage() {
    eprintln!("Coin Duel Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all rounds in the log");
    eprintln!("  --rounds <R1,R2,...>    Replay specific rounds (comma-separated)");
    eprintln!("  --validate <R:M,...>    Validate recorded moves (format: round:move|move,...)");
    eprintln!("  --verbose               Show detailed output for each round");
    eprintln!("  --config <path>         Path to CoinDuel.toml (default: CoinDuel.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  replay coin_duel_game.jsonl --all");
    eprintln!("  replay coin_duel_game.jsonl --rounds 5,10,15 --verbose");
    eprintln!("  replay coin_duel_game.jsonl --validate 1:down|right");
}

fn parse_rounds(s: &str) -> Result<Vec<u32>, String> {
    s.split(',')
        .map(|r| {
            r.trim()
                .parse::<u32>()
                .map_err(|e| format!("Invalid round number '{}': {}", r, e))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<(u32, Vec<Direction>)>, String> {
    s.split(',')
        .map(|pair| {
            let (round, moves) = pair
                .trim()
                .split_once(':')
                .ok_or_else(|| format!("Invalid format '{}'. Expected 'round:move'", pair))?;

            let round = round
                .parse::<u32>()
                .map_err(|e| format!("Invalid round number '{}': {}", round, e))?;

            // Several acceptable moves are separated by '|'
            let moves = moves
                .split('|')
                .map(|m| Direction::parse(m.trim()).ok_or_else(|| format!("Invalid direction: {}", m)))
                .collect::<Result<Vec<_>, _>>()?;

            Ok((round, moves))
        })
        .collect()
}

enum Mode {
    All,
    Rounds(String),
    Validate(String),
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) { 0 } else { 1 });
    }

    let log_file = &args[1];
    let mut config_path = "CoinDuel.toml".to_string();
    let mut verbose = false;
    let mut mode = None;

    let mut i = 2;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--all" => mode = Some(Mode::All),
            "--verbose" => verbose = true,
            "--rounds" | "--validate" | "--config" => {
                let Some(value) = args.get(i + 1).cloned() else {
                    eprintln!("Error: {} requires an argument", flag);
                    process::exit(1);
                };
                match flag {
                    "--rounds" => mode = Some(Mode::Rounds(value)),
                    "--validate" => mode = Some(Mode::Validate(value)),
                    _ => config_path = value,
                }
                i += 1;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", flag);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let Some(mode) = mode else {
        eprintln!("Error: Must specify --all, --rounds, or --validate");
        print_usage();
        process::exit(1);
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    match mode {
        Mode::All => {
            println!("Replaying all {} rounds...\n", entries.len());
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Rounds(arg) => {
            let rounds = parse_rounds(&arg).unwrap_or_else(|e| {
                eprintln!("Error parsing rounds: {}", e);
                process::exit(1);
            });

            println!("Replaying {} specific round(s)...\n", rounds.len());
            match engine.replay_rounds(&entries, &rounds) {
                Ok(results) => engine.print_report(&results),
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
        Mode::Validate(arg) => {
            let expected_moves = parse_expected_moves(&arg).unwrap_or_else(|e| {
                eprintln!("Error parsing expected moves: {}", e);
                process::exit(1);
            });

            println!("Validating {} expected move(s)...\n", expected_moves.len());
            match engine.validate_expected_moves(&entries, &expected_moves) {
                Ok(()) => println!("✓ All expected moves validated successfully!"),
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
