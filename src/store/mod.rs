//! On-disk command store.
//!
//! The store is a plain text file with one `command|frequency|last_used`
//! record per line. It is the only state shared between invocations, so it
//! is always rewritten as a whole: the new content goes to a temporary file
//! next to the store, which is then renamed over it. Concurrent sessions can
//! still overwrite each other's updates, but never leave a torn file behind.

mod record;

use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::engine::HistoryRecords;
use crate::rank::PrefixIndex;
use crate::utils::paths;

pub use record::{RecordError, StoredCommand};

/// Which dataset the merge protocol kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The input stream was larger and replaced the store.
    Incoming { count: usize },
    /// The store was at least as large and was loaded as is.
    Cached { count: usize },
}

/// Handle to the command store file.
#[derive(Clone, Debug)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every well-formed record. A missing store has no records.
    ///
    /// Lines are decoded one at a time, so a stray byte sequence that is not
    /// UTF-8 only costs the record it appears in.
    pub fn read_records(&self) -> anyhow::Result<Vec<StoredCommand>> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };

        let mut records = Vec::new();
        for (number, line) in raw.split(|&byte| byte == b'\n').enumerate() {
            match StoredCommand::parse_bytes(line) {
                Ok(record) => records.push(record),
                Err(RecordError::Blank) => {}
                Err(e) => tracing::debug!(line = number + 1, "Skipping store record: {}", e),
            }
        }
        Ok(records)
    }

    /// Number of well-formed records in the store.
    pub fn count(&self) -> anyhow::Result<usize> {
        Ok(self.read_records()?.len())
    }

    /// Rebuild the index and the ordered record set from the store.
    ///
    /// Stored counters are restored exactly, not accumulated.
    pub fn load_into(
        &self,
        index: &mut PrefixIndex,
        history: &mut HistoryRecords,
    ) -> anyhow::Result<usize> {
        let records = self.read_records()?;
        for record in &records {
            index.restore(&record.command, record.frequency, record.last_used);
            history.push(&record.command);
        }
        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            commands = index.len(),
            "Loaded command store"
        );
        Ok(records.len())
    }

    /// Write one record per command of `history`, in order.
    pub fn save(&self, index: &PrefixIndex, history: &HistoryRecords) -> anyhow::Result<()> {
        let mut data = String::new();
        let mut written = 0usize;
        for command in history.iter() {
            let (frequency, last_used) = match index.usage(command) {
                Some(usage) => (usage.frequency, usage.last_used),
                None => (1, index.now()),
            };
            let record = StoredCommand::new(command, frequency, last_used);
            if !record.is_representable() {
                tracing::warn!(command, "Skipping command that cannot be stored on one line");
                continue;
            }
            data.push_str(&record.to_string());
            data.push('\n');
            written += 1;
        }

        write_atomic(&self.path, data.as_bytes())?;
        tracing::debug!(path = %self.path.display(), records = written, "Saved command store");
        Ok(())
    }

    /// Reconcile an input stream of history with the store.
    ///
    /// The larger dataset wins. A truncated or rotated shell history therefore
    /// never wipes the accumulated ranking, while a grown one replaces it.
    pub fn merge(
        &self,
        input: impl BufRead,
        excluded_line: &str,
        index: &mut PrefixIndex,
        history: &mut HistoryRecords,
    ) -> anyhow::Result<MergeOutcome> {
        let lines = read_incoming(input, excluded_line)?;
        let mut incoming = HistoryRecords::new();
        for line in &lines {
            incoming.push(line);
        }

        let incoming_count = incoming.len();
        let cache_count = self.count()?;
        tracing::info!(incoming_count, cache_count, "Merging history input with store");

        if incoming_count > cache_count {
            let mut fresh = PrefixIndex::at(index.now());
            for line in &lines {
                fresh.insert(line);
            }
            self.save(&fresh, &incoming)?;
            *index = fresh;
            *history = incoming;
            Ok(MergeOutcome::Incoming {
                count: incoming_count,
            })
        } else {
            let mut cached_index = PrefixIndex::at(index.now());
            let mut cached_history = HistoryRecords::new();
            self.load_into(&mut cached_index, &mut cached_history)?;
            *index = cached_index;
            *history = cached_history;
            Ok(MergeOutcome::Cached { count: cache_count })
        }
    }
}

/// Read history lines, dropping blank lines and the excluded line.
///
/// Lines that are not valid UTF-8 are skipped rather than failing the merge.
fn read_incoming(mut input: impl BufRead, excluded_line: &str) -> anyhow::Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    let mut number = 0usize;
    loop {
        buf.clear();
        let read = input
            .read_until(b'\n', &mut buf)
            .context("Failed to read history input")?;
        if read == 0 {
            break;
        }
        number += 1;

        let raw = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let Ok(line) = std::str::from_utf8(raw) else {
            tracing::debug!(line = number, "Skipping history line that is not valid UTF-8");
            continue;
        };
        if line.is_empty() || (!excluded_line.is_empty() && line == excluded_line) {
            continue;
        }
        lines.push(line.to_string());
    }
    Ok(lines)
}

fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        paths::ensure_private_dir(parent)?;
    }
    // Per-process name so concurrent sessions never share a temp file
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(format!(".{}.tmp", std::process::id()));
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, data).with_context(|| format!("Failed to write temp file: {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| {
        format!(
            "Failed to replace {} with {}",
            path.display(),
            tmp.display()
        )
    })?;
    Ok(())
}
