use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use uciboard::board::render_grid;
use uciboard::{spawn_game, EngineConfig, EngineSession, GameEvent, MatchConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Let a UCI engine play itself and show the board", long_about = None)]
struct Args {
    /// Path to the engine executable
    #[arg(long, env = "UCIBOARD_ENGINE", default_value = uciboard::uci::DEFAULT_ENGINE)]
    engine: PathBuf,

    /// Thinking time per move in milliseconds
    #[arg(long, default_value_t = 1000)]
    movetime: u64,

    /// Max plies before stopping the game
    #[arg(long, default_value_t = 300)]
    max_plies: usize,

    /// Pause between plies in milliseconds
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Give up on the engine if a read takes longer than this (milliseconds)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Engine option sent once at startup, as NAME=VALUE (repeatable)
    #[arg(long = "option", value_parser = parse_option)]
    options: Vec<(String, String)>,

    /// Print events as JSON lines instead of boards
    #[arg(long)]
    json: bool,
}

fn parse_option(s: &str) -> Result<(String, String), String> {
    let (name, value) = s.split_once('=').ok_or_else(|| format!("expected NAME=VALUE, got `{s}`"))?;
    let name = name.trim();
    if name.is_empty() { return Err(format!("empty option name in `{s}`")); }
    Ok((name.to_string(), value.trim().to_string()))
}

fn print_event(event: &GameEvent) {
    match event {
        GameEvent::Started { engine, board, turn } => {
            println!("Engine: {}", engine.name.as_deref().unwrap_or("(unnamed)"));
            println!("{}{} to move", render_grid(board), turn);
        }
        GameEvent::Moved { ply, mv, board, turn, score, .. } => {
            let eval = score.as_ref().map(|s| format!(" ({s:?})")).unwrap_or_default();
            println!("\nBest Move: {mv} [ply {ply}]{eval}");
            println!("{}{} to move", render_grid(board), turn);
        }
        GameEvent::Rejected { ply, mv, error } => {
            println!("\nBest Move: {mv} [ply {ply}] not applied: {error}");
        }
        GameEvent::Finished { reason, plies } => {
            println!("\nGame over: {} after {} plies", reason.reason(), plies);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut engine = EngineConfig::new(args.engine.clone());
    engine.options = args.options;
    if let Some(ms) = args.timeout_ms { engine = engine.with_timeout(Duration::from_millis(ms)); }
    let config = MatchConfig {
        movetime_ms: args.movetime,
        max_plies: args.max_plies,
        move_delay: Duration::from_millis(args.delay_ms),
    };

    let (events, handle) = spawn_game(EngineSession::new(engine), config).context("spawn engine thread")?;
    // Board updates are rendered here, on the main thread
    for event in events {
        if args.json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            print_event(&event);
        }
    }

    let summary = handle
        .join()
        .map_err(|_| anyhow!("engine thread panicked"))?
        .with_context(|| format!("engine `{}`", args.engine.display()))?;
    if args.json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!("Moves: {}", summary.moves.join(" "));
    }
    Ok(())
}
