//! Per-invocation ranking engine.
//!
//! Every process builds one [`Engine`] from the command store, runs a single
//! verb against it and exits. The engine owns the prefix index, the ordered
//! record set and the store handle; nothing outlives the process except what
//! is written back to the store.

mod history;

use std::io::BufRead;

use crate::rank::{BoundedRankedSet, MRU_CAPACITY, PrefixIndex, RankedEntry, priority_score};
use crate::store::{MergeOutcome, Store};

pub use history::{Direction, HistoryRecords, SENTINEL, Selection};

#[derive(Debug)]
pub struct Engine {
    store: Store,
    index: PrefixIndex,
    history: HistoryRecords,
    /// The store exists but could not be read, so it must not be overwritten.
    store_unreadable: bool,
}

impl Engine {
    /// Load the engine from the store without reading any input stream.
    ///
    /// An unreadable store degrades to an empty engine that still answers
    /// queries but refuses to save over the store.
    pub fn open(store: Store) -> Self {
        Self::open_at(store, crate::rank::now())
    }

    pub fn open_at(store: Store, now: i64) -> Self {
        let mut engine = Self::empty(store, now);
        if let Err(e) = engine.store.load_into(&mut engine.index, &mut engine.history) {
            tracing::warn!("Failed to load command store, starting empty: {:#}", e);
            engine.index = PrefixIndex::at(now);
            engine.history = HistoryRecords::new();
            engine.store_unreadable = true;
        }
        engine
    }

    /// Run the merge protocol between `input` and the store.
    ///
    /// This is the only verb that consumes the input stream; it blocks until
    /// the stream is closed.
    pub fn initialize(
        store: Store,
        input: impl BufRead,
        excluded_line: &str,
    ) -> anyhow::Result<(Self, MergeOutcome)> {
        Self::initialize_at(store, input, excluded_line, crate::rank::now())
    }

    pub fn initialize_at(
        store: Store,
        input: impl BufRead,
        excluded_line: &str,
        now: i64,
    ) -> anyhow::Result<(Self, MergeOutcome)> {
        let mut engine = Self::empty(store, now);
        let outcome =
            engine
                .store
                .merge(input, excluded_line, &mut engine.index, &mut engine.history)?;
        tracing::info!(?outcome, commands = engine.index.len(), "Initialized command store");
        Ok((engine, outcome))
    }

    fn empty(store: Store, now: i64) -> Self {
        Self {
            store,
            index: PrefixIndex::at(now),
            history: HistoryRecords::new(),
            store_unreadable: false,
        }
    }

    pub fn index(&self) -> &PrefixIndex {
        &self.index
    }

    pub fn history(&self) -> &HistoryRecords {
        &self.history
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Best completion for what the user has typed so far.
    pub fn best_completion(&self, prefix: &str) -> Option<String> {
        if prefix.is_empty() {
            return None;
        }
        let completion = self.index.best_completion(prefix).map(str::to_string);
        tracing::debug!(prefix, ?completion, "Best completion");
        completion
    }

    /// Step through the recorded commands starting with `buffer`.
    pub fn navigate_history(
        &self,
        buffer: &str,
        direction: Direction,
        current_index: i64,
    ) -> Selection {
        let selection = self.history.navigate(buffer, direction, current_index);
        tracing::debug!(
            buffer,
            ?direction,
            current_index,
            index = selection.index,
            "Navigated history"
        );
        selection
    }

    /// Count one execution of `command` and persist the store.
    ///
    /// An execution is recorded as an insert followed by a usage bump, so a
    /// new command starts at frequency 2 and a known one gains 2.
    pub fn record_usage(&mut self, command: &str) -> anyhow::Result<()> {
        if command.trim().is_empty() {
            return Ok(());
        }
        if self.store_unreadable {
            anyhow::bail!(
                "Not recording {:?}: {} could not be loaded",
                command,
                self.store.path().display()
            );
        }

        self.index.insert(command);
        self.index.update_usage(command);
        self.history.push(command);
        self.store.save(&self.index, &self.history)?;

        tracing::info!(
            command,
            frequency = self.index.usage(command).map(|u| u.frequency),
            "Recorded command usage"
        );
        Ok(())
    }

    /// The `limit` highest priority commands, best first.
    pub fn top(&self, limit: usize) -> Vec<RankedEntry> {
        let now = self.index.now();
        let mut ranked = BoundedRankedSet::with_capacity_at(MRU_CAPACITY, now);

        // Eviction always makes room for the newcomer, so feed the weakest
        // commands first to end up with the strongest ones.
        let mut candidates: Vec<_> = self.index.iter().collect();
        candidates.sort_by_key(|(_, usage)| priority_score(usage.frequency, usage.last_used, now));
        for (command, usage) in candidates {
            ranked.insert_or_touch(command, usage.frequency, usage.last_used);
        }

        std::iter::from_fn(|| ranked.extract_max())
            .take(limit)
            .collect()
    }
}
