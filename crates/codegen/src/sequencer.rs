//! # Timestamp Sequencer
//!
//! Hands out the date prefixes that order migration files. Keys are
//! `YYYY_MM_DD_HHMMSS`, so lexicographic order equals chronological order.
//! Every key is the base instant advanced by a fixed step per key already
//! issued, which keeps keys strictly increasing no matter how fast artifacts
//! are produced. A sequencer belongs to one generation run.

use chrono::{Datelike, NaiveDateTime, TimeDelta, Utc};
use schemer_core::{EngineError, EngineResult};

/// Format of a timestamp key
pub const KEY_FORMAT: &str = "%Y_%m_%d_%H%M%S";

/// Last year whose keys still sort lexicographically
const MAX_KEY_YEAR: i32 = 9999;

/// Default distance between consecutive keys
pub const DEFAULT_STEP_SECONDS: i64 = 60;

#[derive(Debug, Clone)]
pub struct TimestampSequencer {
    base: NaiveDateTime,
    step: TimeDelta,
    issued: i32,
}

impl TimestampSequencer {
    /// Create a sequencer starting at `base`.
    ///
    /// The step must be at least one second, the resolution of a key.
    pub fn new(base: NaiveDateTime, step_seconds: i64) -> EngineResult<Self> {
        if step_seconds < 1 {
            return Err(EngineError::InvalidConfig(format!(
                "sequencer step must be at least one second, got {}",
                step_seconds
            )));
        }

        let step = TimeDelta::try_seconds(step_seconds).ok_or_else(|| {
            EngineError::InvalidConfig(format!("sequencer step {} is out of range", step_seconds))
        })?;

        Ok(Self {
            base,
            step,
            issued: 0,
        })
    }

    /// Create a sequencer starting at the current UTC time
    pub fn starting_now(step_seconds: i64) -> EngineResult<Self> {
        Self::new(Utc::now().naive_utc(), step_seconds)
    }

    /// Allocate the next key.
    ///
    /// Keys only sort chronologically while the year has four digits, so an
    /// instant outside years 0000 to 9999 is refused.
    pub fn next_key(&mut self) -> EngineResult<String> {
        let at = self
            .step
            .checked_mul(self.issued)
            .and_then(|offset| self.base.checked_add_signed(offset))
            .ok_or_else(|| {
                EngineError::InvalidConfig("timestamp sequence overflowed".to_string())
            })?;

        if !(0..=MAX_KEY_YEAR).contains(&at.year()) {
            return Err(EngineError::InvalidConfig(format!(
                "timestamp key for {} is outside years 0000 to {}",
                at, MAX_KEY_YEAR
            )));
        }

        self.issued += 1;
        Ok(at.format(KEY_FORMAT).to_string())
    }

    /// Number of keys handed out so far
    pub fn issued(&self) -> usize {
        self.issued as usize
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(23, 58, 30)
            .unwrap()
    }

    #[test]
    fn test_keys_advance_by_step() {
        let mut seq = TimestampSequencer::new(base(), 60).unwrap();
        assert_eq!(seq.next_key().unwrap(), "2024_03_09_235830");
        assert_eq!(seq.next_key().unwrap(), "2024_03_09_235930");
        assert_eq!(seq.next_key().unwrap(), "2024_03_10_000030");
        assert_eq!(seq.issued(), 3);
    }

    #[test]
    fn test_keys_strictly_increase() {
        let mut seq = TimestampSequencer::new(base(), 1).unwrap();
        let keys: Vec<String> = (0..200).map(|_| seq.next_key().unwrap()).collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_fresh_sequencer_restarts() {
        let mut first = TimestampSequencer::new(base(), 60).unwrap();
        first.next_key().unwrap();
        first.next_key().unwrap();

        let mut second = TimestampSequencer::new(base(), 60).unwrap();
        assert_eq!(second.next_key().unwrap(), "2024_03_09_235830");
    }

    #[test]
    fn test_step_must_be_positive() {
        assert!(matches!(
            TimestampSequencer::new(base(), 0),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_keys_past_year_9999_are_refused() {
        let base = NaiveDate::from_ymd_opt(9999, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        let mut sequencer = TimestampSequencer::new(base, 60).unwrap();

        assert_eq!(sequencer.next_key().unwrap(), "9999_12_31_235900");
        let err = sequencer.next_key().unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
        assert_eq!(sequencer.issued(), 1);
    }
}
