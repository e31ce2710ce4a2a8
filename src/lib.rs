//! histrank - frequency and recency ranked shell command completion
//!
//! This library provides the engine behind a shell widget that suggests
//! previously used commands:
//! - A prefix index of every known command with usage counters
//! - A bounded max-heap of the highest ranked commands
//! - A line-oriented store that persists the ranking between processes
//! - Prefix-filtered history navigation with a cyclic cursor
//!
//! # Example
//!
//! ```no_run
//! use histrank::engine::{Direction, Engine, SENTINEL};
//! use histrank::store::Store;
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = Store::new("/tmp/histrank/commands.txt");
//!
//!     // Once per shell session, with the shell history on stdin
//!     let stdin = std::io::stdin();
//!     Engine::initialize(store.clone(), stdin.lock(), "")?;
//!
//!     // Every later invocation only reads the store
//!     let mut engine = Engine::open(store);
//!     if let Some(ghost) = engine.best_completion("git s") {
//!         println!("{ghost}");
//!     }
//!     let selection = engine.navigate_history("git", Direction::Forward, SENTINEL);
//!     println!("{}|{}", selection.text, selection.index);
//!
//!     engine.record_usage("git status")?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod engine;
pub mod rank;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use engine::{Direction, Engine, HistoryRecords, Selection};
pub use rank::{BoundedRankedSet, PrefixIndex, RankedEntry};
pub use store::{MergeOutcome, Store};
