// Command line coin duel: two search-driven agents play a full game
//
// Usage:
//   coin-duel [--config <path>] [--seed <n>] [--quiet]

use log::info;
use std::env;
use std::process;

use coin_duel::agent::Agent;
use coin_duel::config::Config;
use coin_duel::game::{Game, TurnOutcome};
use coin_duel::render::render_status;

fn print_usage() {
    eprintln!("Coin Duel");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  coin-duel [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --config <path>   Path to CoinDuel.toml (default: CoinDuel.toml)");
    eprintln!("  --seed <n>        Override game.seed");
    eprintln!("  --quiet           Only print the final result");
    eprintln!("  --help            Show this help message");
}

fn main() {
    // Default to 'info' unless RUST_LOG says otherwise
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<String> = None;
    let mut seed: Option<u64> = None;
    let mut quiet = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires an argument");
                    process::exit(1);
                }
                config_path = Some(args[i + 1].clone());
                i += 1;
            }
            "--seed" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --seed requires an argument");
                    process::exit(1);
                }
                seed = match args[i + 1].parse() {
                    Ok(s) => Some(s),
                    Err(e) => {
                        eprintln!("Error: invalid seed '{}': {}", args[i + 1], e);
                        process::exit(1);
                    }
                };
                i += 1;
            }
            "--quiet" => quiet = true,
            "--help" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Error: Unknown option '{}'", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    // An explicit config path must load; the default one may fall back
    let config = match config_path {
        Some(path) => Config::from_file(&path).unwrap_or_else(|e| {
            eprintln!("Error: could not load config from '{}': {}", path, e);
            process::exit(1);
        }),
        None => Config::load_or_default(),
    };
    let seed = seed.unwrap_or(config.game.seed);
    let strategies = config.game.strategies;

    let mut game = match Game::with_seed(config, seed) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    info!(
        "Starting Coin Duel (seed {}, X plays {}, Y plays {})",
        seed, strategies[0], strategies[1]
    );
    if !quiet {
        println!("Initial board:");
        println!("{}", render_status(game.board(), game.agents()));
    }

    loop {
        match game.play_turn() {
            TurnOutcome::Finished => break,
            TurnOutcome::Passed { agent } => {
                if !quiet {
                    println!("Player {} cannot move and passes\n", Agent::label(agent));
                }
            }
            TurnOutcome::Moved {
                agent,
                direction,
                score_delta,
                collected,
            } => {
                if quiet {
                    continue;
                }
                print!(
                    "Round {}: Player {} moves {}.",
                    game.rounds(),
                    Agent::label(agent),
                    direction
                );
                if collected {
                    let mover = game.agents()[agent];
                    print!(" Collected a coin! Total score: {}.", mover.score);
                    if score_delta > 1 {
                        print!(
                            " Bonus applied for {} consecutive coins! (+{})",
                            mover.streak,
                            score_delta - 1
                        );
                    }
                }
                println!();
                println!("{}", render_status(game.board(), game.agents()));
            }
        }
    }

    let summary = game.summary();
    println!("Final scores after {} rounds:", summary.rounds);
    for (index, score) in summary.scores.iter().enumerate() {
        println!("Player {}: {}", Agent::label(index), score);
    }
    if summary.round_limit_hit {
        println!("Round limit reached with coins still on the board.");
    }
    match summary.winner {
        Some(winner) => println!("Player {} wins!", Agent::label(winner)),
        None => println!("It's a draw!"),
    }
}
