//! Ranking primitives for previously used commands.
//!
//! Two independent scoring policies live here. The prefix index ranks
//! completions with a coarse one-hour recency bonus, while the bounded ranked
//! set uses a finer step function. Both weigh a single use at 100 points.

pub mod mru;
pub mod trie;

pub use mru::{BoundedRankedSet, MRU_CAPACITY, RankedEntry};
pub use trie::PrefixIndex;

/// Points awarded per recorded use.
const FREQUENCY_WEIGHT: i64 = 100;

/// Usage counters attached to a known command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Usage {
    pub frequency: u32,
    /// Seconds since the Unix epoch, 0 when never used.
    pub last_used: i64,
}

/// Current wall-clock time in seconds since the Unix epoch.
///
/// Each structure reads this once when it is created and keeps the value for
/// its whole lifetime, which matches the one-operation-per-process model.
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Score used when picking the best completion for a prefix.
pub fn completion_score(usage: Usage, now: i64) -> i64 {
    let recency_bonus = if now - usage.last_used < 3600 { 50 } else { 0 };
    i64::from(usage.frequency) * FREQUENCY_WEIGHT + recency_bonus
}

/// Score used to order the bounded ranked set.
pub fn priority_score(frequency: u32, last_used: i64, now: i64) -> i64 {
    i64::from(frequency) * FREQUENCY_WEIGHT + recency_tier(now - last_used)
}

/// Step function over the age of the last use, in seconds.
pub fn recency_tier(age: i64) -> i64 {
    match age {
        a if a < 300 => 200,
        a if a < 1800 => 100,
        a if a < 3600 => 50,
        a if a < 86_400 => 25,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recency_tier_boundaries() {
        assert_eq!(recency_tier(0), 200);
        assert_eq!(recency_tier(299), 200);
        assert_eq!(recency_tier(300), 100);
        assert_eq!(recency_tier(1799), 100);
        assert_eq!(recency_tier(1800), 50);
        assert_eq!(recency_tier(3599), 50);
        assert_eq!(recency_tier(3600), 25);
        assert_eq!(recency_tier(86_399), 25);
        assert_eq!(recency_tier(86_400), 0);
    }

    #[test]
    fn test_completion_score() {
        let now = 1_700_000_000;
        let fresh = Usage { frequency: 3, last_used: now - 10 };
        let stale = Usage { frequency: 3, last_used: now - 3600 };
        assert_eq!(completion_score(fresh, now), 350);
        assert_eq!(completion_score(stale, now), 300);

        // Never used
        let never = Usage { frequency: 1, last_used: 0 };
        assert_eq!(completion_score(never, now), 100);
    }

    #[test]
    fn test_priority_score() {
        let now = 1_700_000_000;
        assert_eq!(priority_score(2, now, now), 400);
        assert_eq!(priority_score(2, now - 600, now), 300);
        assert_eq!(priority_score(2, now - 2000, now), 250);
        assert_eq!(priority_score(2, now - 7200, now), 225);
        assert_eq!(priority_score(2, 0, now), 200);
    }
}
