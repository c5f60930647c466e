mod command;
mod config;
mod driver;
mod session;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use config::PerftConfig;
use driver::{run_divide, run_perft};
use movegen::Position;
use session::Session;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "perft")]
#[command(about = "Move generator node counter")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Position to start from, in FEN (defaults to the start position)
    #[arg(long, global = true)]
    fen: Option<String>,
    /// Deepest depth to count
    #[arg(short, long)]
    depth: Option<u32>,
    /// Break the final depth down by root move
    #[arg(long)]
    divide: bool,
    /// Configuration file (perft.toml in the working directory if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Read commands (position, go perft, d, quit) from standard input
    Repl,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = PerftConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_tracing(&config.log_level);

    let fen = cli.fen.or(config.default_fen);
    let position = match &fen {
        Some(fen) => Position::from_fen(fen).with_context(|| format!("invalid FEN {:?}", fen))?,
        None => Position::startpos(),
    };
    movegen::movegen::init();

    match cli.command {
        Some(Commands::Repl) => {
            let mut session = Session::new(position, cli.json);
            session.run(io::stdin().lock(), &mut io::stdout().lock())?;
            tracing::debug!(fen = %session.position().to_fen(), "session ended");
        }
        None => {
            let depth = cli.depth.unwrap_or(config.default_depth);
            if depth == 0 {
                bail!("depth must be at least 1");
            }
            run_once(position, depth, cli.divide || config.divide, cli.json)?;
        }
    }
    Ok(())
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Counts every depth up to `depth`, or only `depth` broken down by move.
fn run_once(mut position: Position, depth: u32, divide: bool, json: bool) -> Result<()> {
    tracing::info!(fen = %position.to_fen(), depth, divide, "starting perft");
    let mut out = io::stdout().lock();

    if divide {
        let report = run_divide(&mut position, depth);
        if json {
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", report)?;
        }
        return Ok(());
    }

    let mut reports = Vec::new();
    for d in 1..=depth {
        let report = run_perft(&mut position, d);
        if !json {
            writeln!(out, "{}", report)?;
            out.flush()?;
        }
        reports.push(report);
    }
    if json {
        serde_json::to_writer_pretty(&mut out, &reports)?;
        writeln!(out)?;
    }
    Ok(())
}
