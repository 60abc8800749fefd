//! Clock capability
//!
//! Handlers never read the wall clock directly; they ask the `Clock` held in
//! `AppState`, so tests can pin time to a known instant.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl FixedClock {
    /// Fixed clock at the given Unix timestamp (seconds)
    pub fn at(secs: i64) -> Self {
        Self(DateTime::from_timestamp(secs, 0).expect("timestamp in range"))
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
