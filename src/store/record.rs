//! Line codec for the command store.
//!
//! Each record is `command|frequency|last_used`. The command is everything
//! before the last two separators, so pipelines survive a round trip.

use std::fmt;

use thiserror::Error;

const SEPARATOR: char = '|';

/// One persisted command with its usage counters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredCommand {
    pub command: String,
    pub frequency: u32,
    pub last_used: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("blank line")]
    Blank,

    #[error("invalid UTF-8 after byte {0}")]
    Encoding(usize),

    #[error("expected 3 fields, found {0}")]
    FieldCount(usize),

    #[error("empty command")]
    EmptyCommand,

    #[error("invalid frequency: {0:?}")]
    Frequency(String),

    #[error("invalid timestamp: {0:?}")]
    Timestamp(String),
}

impl StoredCommand {
    pub fn new(command: impl Into<String>, frequency: u32, last_used: i64) -> Self {
        Self {
            command: command.into(),
            frequency,
            last_used,
        }
    }

    /// Parse one raw line from the store, without its line terminator.
    pub fn parse_bytes(line: &[u8]) -> Result<Self, RecordError> {
        let line = std::str::from_utf8(line).map_err(|e| RecordError::Encoding(e.valid_up_to()))?;
        Self::parse(line)
    }

    /// Parse one line, without its line terminator.
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            return Err(RecordError::Blank);
        }

        let mut fields = line.rsplitn(3, SEPARATOR);
        let (Some(ts), Some(freq), Some(command)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(RecordError::FieldCount(line.matches(SEPARATOR).count() + 1));
        };

        if command.is_empty() {
            return Err(RecordError::EmptyCommand);
        }
        let frequency = freq
            .parse::<u32>()
            .map_err(|_| RecordError::Frequency(freq.to_string()))?;
        let last_used = ts
            .parse::<i64>()
            .map_err(|_| RecordError::Timestamp(ts.to_string()))?;

        Ok(Self::new(command, frequency, last_used))
    }

    /// Whether the command can be written as a single line.
    pub fn is_representable(&self) -> bool {
        !self.command.is_empty() && !self.command.contains(['\n', '\r'])
    }
}

impl fmt::Display for StoredCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.command, self.frequency, self.last_used
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_line() {
        let record = StoredCommand::parse("git status|3|1700000000").unwrap();
        assert_eq!(record, StoredCommand::new("git status", 3, 1_700_000_000));
    }

    #[test]
    fn test_parse_command_with_pipes() {
        let record = StoredCommand::parse("ps aux | grep ssh|2|42").unwrap();
        assert_eq!(record.command, "ps aux | grep ssh");
        assert_eq!(record.to_string(), "ps aux | grep ssh|2|42");
    }

    #[test]
    fn test_parse_tolerates_carriage_return() {
        let record = StoredCommand::parse("ls|1|5\r").unwrap();
        assert_eq!(record, StoredCommand::new("ls", 1, 5));
    }

    #[test]
    fn test_parse_bytes_rejects_invalid_utf8() {
        assert_eq!(
            StoredCommand::parse_bytes(b"echo \xff\xfe|1|0"),
            Err(RecordError::Encoding(5))
        );
        let record = StoredCommand::parse_bytes("echo café|2|9".as_bytes()).unwrap();
        assert_eq!(record, StoredCommand::new("echo café", 2, 9));
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        assert_eq!(StoredCommand::parse(""), Err(RecordError::Blank));
        assert_eq!(StoredCommand::parse("ls"), Err(RecordError::FieldCount(1)));
        assert_eq!(StoredCommand::parse("ls|4"), Err(RecordError::FieldCount(2)));
        assert_eq!(StoredCommand::parse("|4|5"), Err(RecordError::EmptyCommand));
        assert_eq!(
            StoredCommand::parse("ls|many|5"),
            Err(RecordError::Frequency("many".into()))
        );
        assert_eq!(
            StoredCommand::parse("ls|-1|5"),
            Err(RecordError::Frequency("-1".into()))
        );
        assert_eq!(
            StoredCommand::parse("ls|1|"),
            Err(RecordError::Timestamp(String::new()))
        );
    }

    #[test]
    fn test_representable() {
        assert!(StoredCommand::new("echo hi", 1, 0).is_representable());
        assert!(!StoredCommand::new("for x in a b\ndo echo $x; done", 1, 0).is_representable());
    }
}
