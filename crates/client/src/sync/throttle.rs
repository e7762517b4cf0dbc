// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Leading and trailing edge throttle.
//!
//! A hit with no open window fires at once and opens a window. Hits
//! inside the window collapse into one pending fire, delivered when the
//! window closes; that fire opens a fresh window. The caller owns the
//! clock and the timer, so the state machine stays synchronous.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct Throttle {
    window: Duration,
    deadline: Option<Instant>,
    pending: bool,
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Throttle {
            window,
            deadline: None,
            pending: false,
        }
    }

    /// Records a hit at `now`. Returns true if the caller should fire now.
    pub fn hit(&mut self, now: Instant) -> bool {
        if self.deadline.is_some() {
            self.pending = true;
            return false;
        }
        self.deadline = Some(now + self.window);
        true
    }

    /// Closes the window at `now`. Returns true if a trailing fire is due.
    pub fn expire(&mut self, now: Instant) -> bool {
        if std::mem::take(&mut self.pending) {
            self.deadline = Some(now + self.window);
            true
        } else {
            self.deadline = None;
            false
        }
    }

    /// When the open window closes, if one is open.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
#[path = "throttle_tests.rs"]
mod tests;
