//! Command-line interface.
//!
//! The shell integration calls one verb per keystroke or executed command
//! and reads the result from standard output.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::engine::{Direction, Engine};
use crate::store::Store;
use crate::utils::paths;

#[derive(Debug, Parser)]
#[command(
    name = "histrank",
    version,
    about = "Rank shell commands by frequency and recency for prefix completion"
)]
pub struct Cli {
    /// Command store file
    #[arg(long, global = true, env = "HISTRANK_STORE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge shell history from stdin with the store
    Init {
        /// Line to leave out of the history, usually the current buffer
        #[arg(default_value = "", allow_hyphen_values = true)]
        excluded: String,
    },
    /// Print the best completion for a prefix
    Ghost {
        #[arg(default_value = "", allow_hyphen_values = true)]
        buffer: String,
    },
    /// Step through history entries starting with the buffer
    History {
        #[arg(allow_hyphen_values = true)]
        buffer: String,
        direction: NavDirection,
        #[arg(default_value_t = 0, allow_negative_numbers = true)]
        index: i64,
    },
    /// Record one execution of a command
    Update {
        #[arg(allow_hyphen_values = true)]
        command: String,
    },
    /// List the highest ranked commands
    Top {
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum NavDirection {
    #[value(alias = "forward")]
    Up,
    #[value(alias = "backward")]
    Down,
}

impl From<NavDirection> for Direction {
    fn from(direction: NavDirection) -> Self {
        match direction {
            NavDirection::Up => Direction::Forward,
            NavDirection::Down => Direction::Backward,
        }
    }
}

impl Cli {
    pub fn open_store(&self) -> Store {
        Store::new(self.store.clone().unwrap_or_else(paths::default_store_path))
    }
}

/// Run the parsed command, writing its result to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let store = cli.open_store();
    match cli.command {
        Commands::Init { excluded } => {
            let stdin = io::stdin();
            Engine::initialize(store, stdin.lock(), &excluded)?;
        }
        Commands::Ghost { buffer } => {
            if let Some(completion) = Engine::open(store).best_completion(&buffer) {
                write!(out, "{}", completion)?;
            }
        }
        Commands::History {
            buffer,
            direction,
            index,
        } => {
            let selection = Engine::open(store).navigate_history(&buffer, direction.into(), index);
            write!(out, "{}|{}", selection.text, selection.index)?;
        }
        Commands::Update { command } => {
            Engine::open(store).record_usage(&command)?;
        }
        Commands::Top { limit, json } => {
            let engine = Engine::open(store);
            let now = engine.index().now();
            let top = engine.top(limit);
            if json {
                serde_json::to_writer_pretty(&mut *out, &top)?;
                writeln!(out)?;
            } else {
                for entry in &top {
                    writeln!(out, "{}\t{}\t{}", entry.score(now), entry.frequency, entry.command)?;
                }
            }
        }
    }
    out.flush()?;
    Ok(())
}
