use std::io;

use tracing_subscriber::EnvFilter;

use crate::config::{load_config, load_config_or_default, LotteryConfig, DEFAULT_CONFIG_PATH};
use crate::console::ConsoleUi;
use crate::draw::{DrawEngine, DrawError, Rng};
use crate::game::{round_robin_tickets, GameId, GameSession};
use crate::parallel::{run_simulation_batches, WorkerPool};
use crate::report;
use crate::simulation::SimulationParams;

const USAGE: &str = "usage: lottery <play|draw|simulate|validate> [--config PATH]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    Draw,
    Simulate,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("play") => Some(Command::Play),
        Some("draw") => Some(Command::Draw),
        Some("simulate") => Some(Command::Simulate),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

/// Logs go to stderr so stdout stays clean for JSON/CSV output. `RUST_LOG` overrides.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Play) => handle_play(args),
        Some(Command::Draw) => handle_draw(args),
        Some(Command::Simulate) => handle_simulate(args),
        Some(Command::Validate) => handle_validate(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Arguments after the subcommand that are neither flags nor flag values.
fn positional(args: &[String]) -> Vec<&String> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args.iter().skip(2) {
        if skip_next {
            skip_next = false;
        } else if arg == "--config" || arg == "--workers" {
            skip_next = true;
        } else if !arg.starts_with("--") {
            out.push(arg);
        }
    }
    out
}

fn load_or_report(args: &[String]) -> Option<LotteryConfig> {
    match load_config_or_default(flag_value(args, "--config")) {
        Ok(config) => Some(config),
        Err(err) => {
            eprintln!("{err}");
            None
        }
    }
}

fn handle_play(args: &[String]) -> i32 {
    let Some(config) = load_or_report(args) else {
        return 1;
    };
    let tiers = match config.prize_tiers() {
        Ok(tiers) => tiers,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    let mut session = match GameSession::new(config.game, tiers, config.seed) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    let stdin = io::stdin();
    let mut ui = ConsoleUi::new(stdin.lock(), io::stdout());
    match ui.run(&mut session) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("An error occurred running the game: {err}");
            1
        }
    }
}

fn handle_draw(args: &[String]) -> i32 {
    let Some(config) = load_or_report(args) else {
        return 1;
    };
    let positional = positional(args);
    let players = parse_u32_arg(positional.first().copied(), "players", config.game.max_players);
    let per_player = parse_u32_arg(
        positional.get(1).copied(),
        "tickets_per_player",
        config.game.max_tickets,
    );
    let seed = positional
        .get(2)
        .map(|raw| parse_u64_arg(Some(*raw), "seed", 0))
        .or(config.seed);

    let engine = match config
        .prize_tiers()
        .map_err(|err| err.to_string())
        .and_then(|tiers| DrawEngine::new(config.game.clone(), tiers).map_err(|err| err.to_string()))
    {
        Ok(engine) => engine,
        Err(msg) => {
            eprintln!("{msg}");
            return 1;
        }
    };

    if players < config.game.min_players || players > config.game.max_players {
        let err = DrawError::PlayerCountOutOfRange {
            players: players as usize,
            min: config.game.min_players,
            max: config.game.max_players,
        };
        eprintln!("draw failed: {err}");
        return 1;
    }
    if per_player < config.game.min_tickets || per_player > config.game.max_tickets {
        eprintln!(
            "draw failed: tickets_per_player must be between {} and {}",
            config.game.min_tickets, config.game.max_tickets
        );
        return 1;
    }
    let tickets = round_robin_tickets(players, players as usize * per_player as usize, GameId::new());
    let drawn = match seed {
        Some(seed) => engine.draw_winners_with(&tickets, &mut Rng::new(seed)),
        None => engine.draw_winners(&tickets),
    };
    let result = match drawn {
        Ok(result) => result,
        Err(err) => {
            eprintln!("draw failed: {err}");
            return 1;
        }
    };

    if args.iter().any(|arg| arg == "--table") {
        println!("{}", report::render_draw_results(&result));
        println!("{}", report::render_house_revenue(result.house_revenue));
    } else if args.iter().any(|arg| arg == "--csv") {
        if let Err(err) = report::write_csv(&result, io::stdout()) {
            eprintln!("failed to write csv: {err}");
            return 1;
        }
    } else {
        match serde_json::to_string_pretty(&result) {
            Ok(payload) => println!("{payload}"),
            Err(err) => {
                eprintln!("failed to serialize draw result: {err}");
                return 1;
            }
        }
    }
    0
}

fn handle_simulate(args: &[String]) -> i32 {
    let Some(config) = load_or_report(args) else {
        return 1;
    };
    let tiers = match config.prize_tiers() {
        Ok(tiers) => tiers,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    let positional = positional(args);
    let params = SimulationParams {
        draws: parse_u32_arg(positional.first().copied(), "draws", 1_000) as usize,
        seed: parse_u64_arg(positional.get(1).copied(), "seed", config.seed.unwrap_or(7)),
        players: parse_u32_arg(positional.get(2).copied(), "players", config.game.max_players),
        tickets_per_player: parse_u32_arg(
            positional.get(3).copied(),
            "tickets_per_player",
            config.game.max_tickets,
        ) as usize,
    };
    let workers = flag_value(args, "--workers")
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(0);

    match run_simulation_batches(&config.game, &tiers, params, &WorkerPool::with_workers(workers)) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(payload) => {
                println!("{payload}");
                0
            }
            Err(err) => {
                eprintln!("failed to serialize simulation summary: {err}");
                1
            }
        },
        Err(err) => {
            eprintln!("simulation failed: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let path = positional(args)
        .first()
        .map(|s| s.as_str())
        .or_else(|| flag_value(args, "--config"))
        .unwrap_or(DEFAULT_CONFIG_PATH)
        .to_string();

    let config = match load_config(&path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("validation failed: {err}");
            return 1;
        }
    };

    let report = config.validate();
    for diag in &report.diagnostics {
        eprintln!("- {diag}");
    }
    if report.has_errors() {
        eprintln!("validation failed: {} issue(s)", report.errors().count());
        1
    } else {
        println!("validation passed: {path}");
        0
    }
}

fn parse_u32_arg(raw: Option<&String>, name: &str, default: u32) -> u32 {
    raw.and_then(|value| value.parse::<u32>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}

fn parse_u64_arg(raw: Option<&String>, name: &str, default: u64) -> u64 {
    raw.and_then(|value| value.parse::<u64>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}
