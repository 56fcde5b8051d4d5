use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_MINUTES: u32 = 15;
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("enter the duration as a whole number of minutes (got {0:?})")]
    NotANumber(String),
    #[error("the duration must be at least one minute")]
    NotPositive,
    #[error("{0} minutes is too long for the timer")]
    TooLong(u64),
    #[error("pause or reset the timer before changing its duration")]
    Running,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Expired,
}

/// Which controls the view should offer for the current state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerControls {
    pub start: bool,
    pub pause: bool,
    pub reset: bool,
}

/// Recurring one-second schedule of a running countdown.
///
/// A handle is acquired when the timer starts and released when it is
/// dropped, which happens on every transition out of the running phase.
#[derive(Debug)]
pub struct TickHandle {
    next_due: Instant,
    live: Rc<Cell<usize>>,
}

impl TickHandle {
    fn acquire(live: &Rc<Cell<usize>>, now: Instant) -> Self {
        live.set(live.get() + 1);
        Self {
            next_due: now + TICK_PERIOD,
            live: Rc::clone(live),
        }
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.live.set(self.live.get().saturating_sub(1));
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    Running(TickHandle),
    Paused,
    Expired,
}

#[derive(Debug)]
pub struct CountdownTimer {
    total_secs: u32,
    remaining_secs: u32,
    phase: Phase,
    live_handles: Rc<Cell<usize>>,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownTimer {
    pub fn new() -> Self {
        let total_secs = DEFAULT_MINUTES * 60;
        Self {
            total_secs,
            remaining_secs: total_secs,
            phase: Phase::Idle,
            live_handles: Rc::new(Cell::new(0)),
        }
    }

    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn status(&self) -> TimerStatus {
        match self.phase {
            Phase::Idle => TimerStatus::Idle,
            Phase::Running(_) => TimerStatus::Running,
            Phase::Paused => TimerStatus::Paused,
            Phase::Expired => TimerStatus::Expired,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    pub fn tick_handle(&self) -> Option<&TickHandle> {
        match &self.phase {
            Phase::Running(handle) => Some(handle),
            _ => None,
        }
    }

    /// Number of tick handles currently alive; never more than one
    pub fn live_tick_handles(&self) -> usize {
        self.live_handles.get()
    }

    pub fn controls(&self) -> TimerControls {
        let running = self.is_running();
        TimerControls {
            start: !running && self.status() != TimerStatus::Expired,
            pause: running,
            reset: running || self.remaining_secs != self.total_secs,
        }
    }

    /// Remaining time as `MM:SS`
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }

    pub fn set_duration(&mut self, minutes: u32) -> Result<(), TimerError> {
        if self.is_running() {
            return Err(TimerError::Running);
        }
        if minutes == 0 {
            return Err(TimerError::NotPositive);
        }
        let total_secs = minutes
            .checked_mul(60)
            .ok_or(TimerError::TooLong(u64::from(minutes)))?;

        self.total_secs = total_secs;
        self.remaining_secs = total_secs;
        self.phase = Phase::Idle;
        info!(minutes, "timer duration set");
        Ok(())
    }

    /// Parses a duration typed by the user and applies it
    pub fn set_duration_input(&mut self, input: &str) -> Result<(), TimerError> {
        let trimmed = input.trim();
        let minutes: i64 = trimmed
            .parse()
            .map_err(|_| TimerError::NotANumber(input.to_string()))?;
        if minutes <= 0 {
            return Err(TimerError::NotPositive);
        }
        let minutes = u32::try_from(minutes).map_err(|_| TimerError::TooLong(minutes as u64))?;
        self.set_duration(minutes)
    }

    pub fn start(&mut self, now: Instant) {
        match self.phase {
            Phase::Running(_) => return,
            Phase::Expired => {
                debug!("start ignored, timer expired");
                return;
            }
            Phase::Idle | Phase::Paused => {}
        }

        self.phase = Phase::Running(TickHandle::acquire(&self.live_handles, now));
        info!(remaining = self.remaining_secs, "timer started");
    }

    pub fn pause(&mut self) {
        if !self.is_running() {
            return;
        }
        self.phase = Phase::Paused;
        info!(remaining = self.remaining_secs, "timer paused");
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.remaining_secs = self.total_secs;
        info!(total = self.total_secs, "timer reset");
    }

    /// Counts down one second. Does nothing unless running.
    pub fn tick(&mut self) {
        if !self.is_running() {
            return;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.phase = Phase::Expired;
            info!("timer expired");
        }
    }

    /// Fires every tick that has come due by `now` and returns how many fired
    pub fn advance_to(&mut self, now: Instant) -> u32 {
        let mut fired = 0;
        loop {
            let Phase::Running(handle) = &mut self.phase else {
                break;
            };
            if handle.next_due > now {
                break;
            }
            handle.next_due += TICK_PERIOD;
            self.tick();
            fired += 1;
        }
        fired
    }
}
