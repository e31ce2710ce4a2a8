//! Recorded command set and prefix-filtered history navigation.
//!
//! Commands are kept in the order they were first observed. Navigation
//! filters them by the buffer the user typed and steps a cursor through the
//! matches from newest to oldest, with `-1` standing for the original input.

use std::collections::HashSet;

/// Cursor value meaning "no history entry selected".
pub const SENTINEL: i64 = -1;

/// Direction of a navigation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards older commands.
    Forward,
    /// Towards newer commands, then back to the original input.
    Backward,
}

/// Text to show together with the cursor it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub text: String,
    pub index: i64,
}

#[derive(Clone, Debug, Default)]
pub struct HistoryRecords {
    commands: Vec<String>,
    seen: HashSet<String>,
}

impl HistoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command unless it was already recorded.
    /// Skips empty commands. Returns true if the command was added.
    pub fn push(&mut self, command: &str) -> bool {
        if command.is_empty() || self.seen.contains(command) {
            return false;
        }
        self.seen.insert(command.to_string());
        self.commands.push(command.to_string());
        true
    }

    pub fn contains(&self, command: &str) -> bool {
        self.seen.contains(command)
    }

    /// All commands, oldest first.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands starting with `prefix`, oldest first.
    pub fn filter_by_prefix(&self, prefix: &str) -> Vec<&str> {
        self.iter().filter(|cmd| cmd.starts_with(prefix)).collect()
    }

    /// Step the cursor through the commands matching `prefix`.
    ///
    /// Index 0 is the most recent match. Stepping past the oldest match
    /// returns to the original input, and stepping back from the original
    /// input wraps to the oldest match.
    pub fn navigate(&self, prefix: &str, direction: Direction, current_index: i64) -> Selection {
        let matches = self.filter_by_prefix(prefix);
        let count = matches.len() as i64;

        let original = || Selection {
            text: prefix.to_string(),
            index: SENTINEL,
        };
        if count == 0 {
            return original();
        }

        let mut index = match direction {
            Direction::Forward => current_index.saturating_add(1),
            Direction::Backward => current_index.saturating_sub(1),
        };
        if index >= count {
            index = SENTINEL;
        } else if index < SENTINEL {
            index = count - 1;
        }

        if index == SENTINEL {
            return original();
        }

        // Newest first
        let text = matches[(count - 1 - index) as usize].to_string();
        Selection { text, index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(commands: &[&str]) -> HistoryRecords {
        let mut records = HistoryRecords::new();
        for cmd in commands {
            records.push(cmd);
        }
        records
    }

    #[test]
    fn test_push_skips_duplicates_and_empty() {
        let mut history = HistoryRecords::new();
        assert!(history.push("ls"));
        assert!(history.push("pwd"));
        assert!(!history.push("ls"));
        assert!(!history.push(""));

        assert_eq!(history.commands(), ["ls", "pwd"]);
        assert!(history.contains("pwd"));
    }

    #[test]
    fn test_filter_by_prefix_keeps_order() {
        let history = records(&["git status", "ls", "git log", "git push"]);

        assert_eq!(history.filter_by_prefix("git"), ["git status", "git log", "git push"]);
        assert_eq!(history.filter_by_prefix("").len(), 4);
        assert!(history.filter_by_prefix("cargo").is_empty());
    }

    #[test]
    fn test_navigate_forward_wraps_to_sentinel() {
        let history = records(&["git a", "git b", "git c"]);

        let step = history.navigate("git", Direction::Forward, 0);
        assert_eq!(step, Selection { text: "git b".into(), index: 1 });

        let step = history.navigate("git", Direction::Forward, step.index);
        assert_eq!(step, Selection { text: "git a".into(), index: 2 });

        let step = history.navigate("git", Direction::Forward, step.index);
        assert_eq!(step, Selection { text: "git".into(), index: SENTINEL });

        let step = history.navigate("git", Direction::Forward, step.index);
        assert_eq!(step, Selection { text: "git c".into(), index: 0 });
    }

    #[test]
    fn test_navigate_backward_wraps_to_oldest() {
        let history = records(&["git a", "git b", "git c"]);

        let step = history.navigate("git", Direction::Backward, 0);
        assert_eq!(step, Selection { text: "git".into(), index: SENTINEL });

        let step = history.navigate("git", Direction::Backward, step.index);
        assert_eq!(step, Selection { text: "git a".into(), index: 2 });
    }

    #[test]
    fn test_navigate_filters_by_prefix() {
        let history = records(&["cargo build", "ls", "cargo test", "pwd"]);

        let step = history.navigate("cargo", Direction::Forward, SENTINEL);
        assert_eq!(step, Selection { text: "cargo test".into(), index: 0 });

        // Empty prefix matches everything
        let step = history.navigate("", Direction::Forward, SENTINEL);
        assert_eq!(step, Selection { text: "pwd".into(), index: 0 });
    }

    #[test]
    fn test_navigate_without_matches_returns_original() {
        let history = records(&["ls", "pwd"]);

        for direction in [Direction::Forward, Direction::Backward] {
            let step = history.navigate("docker", direction, 3);
            assert_eq!(step, Selection { text: "docker".into(), index: SENTINEL });
        }

        let empty = HistoryRecords::new();
        let step = empty.navigate("", Direction::Forward, 0);
        assert_eq!(step, Selection { text: String::new(), index: SENTINEL });
    }

    #[test]
    fn test_navigate_out_of_range_index() {
        let history = records(&["a", "b"]);

        assert_eq!(history.navigate("", Direction::Forward, 40).index, SENTINEL);
        assert_eq!(history.navigate("", Direction::Backward, -9).index, 1);
        assert_eq!(history.navigate("", Direction::Backward, i64::MIN).index, 1);
    }
}
