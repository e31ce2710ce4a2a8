//! Prefix index over command text.
//!
//! Every distinct command ever seen is stored as a path of byte-keyed nodes.
//! The node at the end of the path holds the full command together with its
//! usage counters, so completions are found by walking to the prefix node
//! and searching the subtree beneath it.

use std::collections::BTreeMap;

use super::{Usage, completion_score};

#[derive(Debug, Default)]
struct TrieNode {
    children: BTreeMap<u8, TrieNode>,
    /// Full command text, present only on terminal nodes.
    command: Option<String>,
    frequency: u32,
    last_used: i64,
}

impl TrieNode {
    fn is_terminal(&self) -> bool {
        self.command.is_some()
    }

    fn usage(&self) -> Usage {
        Usage {
            frequency: self.frequency,
            last_used: self.last_used,
        }
    }
}

impl Drop for TrieNode {
    // Tear the subtree down level by level so long commands cannot exhaust
    // the call stack through recursive drops.
    fn drop(&mut self) {
        let mut stack: Vec<TrieNode> = std::mem::take(&mut self.children).into_values().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(std::mem::take(&mut node.children).into_values());
        }
    }
}

/// Bytes that take part in the trie path. Anything else is skipped, while
/// the stored command keeps its original text.
///
/// Two texts that differ only in skipped bytes, such as `"a\0b"` and `"ab"`,
/// share one node. The first text inserted owns it and later inserts of the
/// other text count towards it. Whole-command lookups compare the stored
/// text, so only the owning text is reported as known.
fn is_supported(byte: u8) -> bool {
    byte != 0
}

fn key_bytes(text: &str) -> impl Iterator<Item = u8> + '_ {
    text.bytes().filter(|b| is_supported(*b))
}

/// Trie of known commands with frequency and recency metadata.
#[derive(Debug)]
pub struct PrefixIndex {
    root: TrieNode,
    total_commands: usize,
    now: i64,
}

impl Default for PrefixIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self::at(super::now())
    }

    /// Create an empty index whose clock reads `now`.
    pub fn at(now: i64) -> Self {
        Self {
            root: TrieNode::default(),
            total_commands: 0,
            now,
        }
    }

    /// The clock reading used for timestamps and recency scoring.
    pub fn now(&self) -> i64 {
        self.now
    }

    /// Number of distinct commands.
    pub fn len(&self) -> usize {
        self.total_commands
    }

    pub fn is_empty(&self) -> bool {
        self.total_commands == 0
    }

    /// Register a use of `command`, adding it if it is new.
    ///
    /// Repeated inserts of the same text count the command once but raise
    /// its frequency every time.
    pub fn insert(&mut self, command: &str) {
        if command.is_empty() {
            return;
        }

        let mut current = &mut self.root;
        let mut depth = 0usize;
        for byte in key_bytes(command) {
            current = current.children.entry(byte).or_default();
            depth += 1;
        }
        // Nothing supported in the text; the root must stay non-terminal.
        if depth == 0 {
            return;
        }

        if !current.is_terminal() {
            current.command = Some(command.to_string());
            self.total_commands += 1;
        }
        current.frequency = current.frequency.saturating_add(1);
        current.last_used = self.now;
    }

    /// Insert `command` and overwrite its counters with stored values.
    pub fn restore(&mut self, command: &str, frequency: u32, last_used: i64) {
        self.insert(command);
        if let Some(node) = self.node_mut(command).filter(|node| node.is_terminal()) {
            node.frequency = frequency;
            node.last_used = last_used;
        }
    }

    /// Returns true if some inserted command starts with `prefix`.
    pub fn prefix_exists(&self, prefix: &str) -> bool {
        self.node(prefix).is_some()
    }

    /// Returns true if `command` was inserted as a whole command.
    pub fn contains(&self, command: &str) -> bool {
        self.terminal(command).is_some()
    }

    /// Usage counters of a known command.
    pub fn usage(&self, command: &str) -> Option<Usage> {
        self.terminal(command).map(TrieNode::usage)
    }

    /// Bump the counters of a known command. Unknown commands are left alone
    /// and `false` is returned.
    pub fn update_usage(&mut self, command: &str) -> bool {
        let now = self.now;
        match self.terminal_mut(command) {
            Some(node) => {
                node.frequency = node.frequency.saturating_add(1);
                node.last_used = now;
                true
            }
            None => false,
        }
    }

    /// Highest scoring command reachable from `prefix`.
    ///
    /// Among equally scored candidates the one returned depends on traversal
    /// order and is not part of the contract.
    pub fn best_completion(&self, prefix: &str) -> Option<&str> {
        let start = self.node(prefix)?;

        let mut best: Option<(&str, i64)> = None;
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if let Some(command) = node.command.as_deref() {
                let score = completion_score(node.usage(), self.now);
                if best.is_none_or(|(_, top)| score > top) {
                    best = Some((command, score));
                }
            }
            stack.extend(node.children.values());
        }

        best.map(|(command, _)| command)
    }

    /// Iterate over every known command with its counters.
    pub fn iter(&self) -> Commands<'_> {
        Commands {
            stack: vec![&self.root],
        }
    }

    fn node(&self, key: &str) -> Option<&TrieNode> {
        let mut current = &self.root;
        for byte in key_bytes(key) {
            current = current.children.get(&byte)?;
        }
        Some(current)
    }

    fn node_mut(&mut self, key: &str) -> Option<&mut TrieNode> {
        let mut current = &mut self.root;
        for byte in key_bytes(key) {
            current = current.children.get_mut(&byte)?;
        }
        Some(current)
    }

    /// Terminal node holding exactly `command`.
    fn terminal(&self, command: &str) -> Option<&TrieNode> {
        self.node(command).filter(|node| node.command.as_deref() == Some(command))
    }

    fn terminal_mut(&mut self, command: &str) -> Option<&mut TrieNode> {
        self.node_mut(command).filter(|node| node.command.as_deref() == Some(command))
    }
}

/// Depth-first iterator over the commands of a [`PrefixIndex`], in byte order.
pub struct Commands<'a> {
    stack: Vec<&'a TrieNode>,
}

impl<'a> Iterator for Commands<'a> {
    type Item = (&'a str, Usage);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            self.stack.extend(node.children.values().rev());
            if let Some(command) = node.command.as_deref() {
                return Some((command, node.usage()));
            }
        }
        None
    }
}
