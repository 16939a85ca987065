//! Hand Cricket CLI
//!
//! Interactive play against the computer, plus batch simulations of the
//! adaptive opponent.

mod config;
mod play;
mod render;
mod simulate;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use hand_cricket_core::{Difficulty, EntropyRng, Match, RandomSource, SeededRng};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hand-cricket")]
#[command(about = "Play hand cricket against an adaptive computer", long_about = None)]
struct Cli {
    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a match on the terminal
    Play {
        /// easy or hard; asked interactively when omitted
        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Seed for a reproducible match
        #[arg(long)]
        seed: Option<u64>,

        /// JSON match configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip the pauses between actions
        #[arg(long)]
        no_pacing: bool,
    },

    /// Autoplay many matches against a scripted human
    Simulate {
        /// Number of matches
        #[arg(long, default_value_t = 100)]
        games: u32,

        #[arg(long, default_value = "hard")]
        difficulty: Difficulty,

        /// Human cycles through these digits, e.g. 1,2,3
        #[arg(long, value_delimiter = ',', conflicts_with = "repeat")]
        pattern: Vec<u8>,

        /// Human plays this digit every ball
        #[arg(long)]
        repeat: Option<u8>,

        /// Seed of the first match; later matches use seed + i
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Abandon an innings after this many balls
        #[arg(long, default_value_t = 500)]
        ball_limit: u32,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Play {
            difficulty,
            seed,
            config,
            no_pacing,
        } => {
            let config = config::load(config.as_deref(), no_pacing)?;
            let rng: Box<dyn RandomSource> = match seed {
                Some(seed) => Box::new(SeededRng::new(seed)),
                None => Box::new(EntropyRng::new()),
            };
            let game = Match::new(config, rng)?;
            let stdin = io::stdin();
            let mut shell = play::Shell::new(game, stdin.lock(), io::stdout(), difficulty);
            shell.run()?;
        }

        Commands::Simulate {
            games,
            difficulty,
            pattern,
            repeat,
            seed,
            ball_limit,
        } => {
            let pilot = simulate::autopilot(&pattern, repeat)?;
            let stats = simulate::run(difficulty, &pilot, games, seed, ball_limit)?;
            println!("{}", stats);
        }
    }

    Ok(())
}
