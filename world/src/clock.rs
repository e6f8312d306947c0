//! Wall-clock gating of discrete simulation steps.

use std::time::Duration;

/// Admits at most one step per elapsed interval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TickGate {
    last_open: Option<Duration>,
}

impl TickGate {
    /// Gate whose interval is measured from `now`.
    pub(crate) fn started_at(now: Duration) -> Self {
        Self {
            last_open: Some(now),
        }
    }

    /// Opens when `interval` has elapsed since the gate last opened.
    ///
    /// A gate that never opened admits its first poll. Opening records `now`,
    /// so polling twice with the same time opens at most once unless the
    /// interval is zero.
    pub(crate) fn poll(&mut self, now: Duration, interval: Duration) -> bool {
        let open = match self.last_open {
            None => true,
            Some(last) => now.saturating_sub(last) >= interval && now > last,
        };
        if open {
            self.last_open = Some(now);
        }
        open
    }

    pub(crate) fn reset(&mut self) {
        self.last_open = None;
    }
}
