//! Lockout Policy
//!
//! Pure decision logic for progressive account lockout. Given the current
//! failure count and lock timestamp, decide whether login is permitted and
//! compute the next state after an attempt. No store access, no side
//! effects; expiry is detected by timestamp comparison, never by a sweep.

use chrono::{DateTime, Duration, Utc};

/// Failed attempts before the account locks
pub const LOCKOUT_THRESHOLD: u32 = 5;

/// Lock duration in minutes once the threshold is reached
pub const LOCKOUT_MINUTES: i64 = 30;

/// Lockout state carried on a credential record
///
/// A `locked_until` in the past is equivalent to absent (lazy expiry); no
/// clearing write is required for a lock to expire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockState {
    pub failed_attempts: u32,
    pub locked_until: Option<DateTime<Utc>>,
}

impl LockState {
    /// Fresh state for a new account
    pub const fn new() -> Self {
        Self {
            failed_attempts: 0,
            locked_until: None,
        }
    }

    /// Whether login is currently blocked
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        match self.locked_until {
            Some(until) => until > now,
            None => false,
        }
    }

    /// Remaining lock time, `None` when not locked
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.locked_until.filter(|until| *until > now).map(|until| until - now)
    }

    /// Remaining lock time in seconds, rounded up to the whole minute
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> u64 {
        match self.remaining(now) {
            Some(remaining) => {
                let secs = remaining.num_seconds().max(0) as u64;
                secs.div_ceil(60) * 60
            }
            None => 0,
        }
    }

    /// Next state after a failed attempt
    ///
    /// Reaching the threshold engages the lock and resets the counter to
    /// zero; the lock timestamp alone gates access from then on, which
    /// keeps the counter bounded.
    pub fn on_failure(self, now: DateTime<Utc>) -> Self {
        let attempts = self.failed_attempts + 1;
        if attempts >= LOCKOUT_THRESHOLD {
            Self {
                failed_attempts: 0,
                locked_until: Some(now + Duration::minutes(LOCKOUT_MINUTES)),
            }
        } else {
            Self {
                failed_attempts: attempts,
                locked_until: None,
            }
        }
    }

    /// Next state after a successful authentication
    pub const fn on_success(self) -> Self {
        Self::new()
    }
}

impl Default for LockState {
    fn default() -> Self {
        Self::new()
    }
}
