//! End-of-shift ("Feierabend") calculation.
//!
//! A start time in `H:MM` or `HH:MM` is shifted by the length of a working
//! day. Results past midnight wrap around the clock and remember how many
//! midnights were crossed.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Duration, NaiveTime, Timelike};
use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Default working day: 8 hours 42 minutes
pub const SHIFT_HOURS: u32 = 8;
pub const SHIFT_MINUTES: u32 = 42;

const SECS_PER_DAY: i64 = 24 * 60 * 60;

static START_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-1]?[0-9]|2[0-3]):([0-5][0-9])$").expect("start time pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShiftError {
    #[error("invalid format: enter a start time as HH:MM (got {0:?})")]
    InvalidFormat(String),
}

/// Clock time at which a shift ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndTime {
    pub time: NaiveTime,
    /// midnights crossed between start and end
    pub days_later: u32,
}

impl EndTime {
    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    pub fn minute(&self) -> u32 {
        self.time.minute()
    }

    /// `(next day)` or `(+N days)` once midnight has been crossed
    pub fn day_suffix(&self) -> Option<String> {
        match self.days_later {
            0 => None,
            1 => Some("(next day)".to_string()),
            n => Some(format!("(+{n} days)")),
        }
    }
}

impl fmt::Display for EndTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftCalculator {
    shift_length: Duration,
}

impl Default for ShiftCalculator {
    fn default() -> Self {
        Self::from_hours_minutes(SHIFT_HOURS, SHIFT_MINUTES)
    }
}

impl ShiftCalculator {
    pub fn new(shift_length: Duration) -> Self {
        Self { shift_length }
    }

    pub fn from_hours_minutes(hours: u32, minutes: u32) -> Self {
        Self::new(Duration::minutes(i64::from(hours) * 60 + i64::from(minutes)))
    }

    pub fn shift_length(&self) -> Duration {
        self.shift_length
    }

    pub fn calculate(&self, start: &str) -> Result<EndTime, ShiftError> {
        let start_time = parse_start_time(start)?;
        let (time, overflow_secs) = start_time.overflowing_add_signed(self.shift_length);
        let days_later = u32::try_from(overflow_secs / SECS_PER_DAY).unwrap_or(0);

        let end = EndTime { time, days_later };
        debug!(start, end = %end, days_later, "calculated end of shift");
        Ok(end)
    }
}

/// End of a default-length shift starting at `start`
pub fn calculate_end_time(start: &str) -> Result<EndTime, ShiftError> {
    ShiftCalculator::default().calculate(start)
}

fn parse_start_time(start: &str) -> Result<NaiveTime, ShiftError> {
    let invalid = || ShiftError::InvalidFormat(start.to_string());

    let caps = START_TIME.captures(start).ok_or_else(invalid)?;
    let hours: u32 = caps[1].parse().map_err(|_| invalid())?;
    let minutes: u32 = caps[2].parse().map_err(|_| invalid())?;

    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}

/// Latest calculation attempt as shown next to the start time field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftResult {
    pub start_time: String,
    pub outcome: Option<Result<EndTime, ShiftError>>,
}

impl ShiftResult {
    pub fn end_time(&self) -> Option<&EndTime> {
        self.outcome.as_ref().and_then(|o| o.as_ref().ok())
    }

    pub fn error_message(&self) -> Option<String> {
        self.outcome
            .as_ref()
            .and_then(|o| o.as_ref().err())
            .map(ToString::to_string)
    }
}
