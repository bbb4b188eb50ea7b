#![forbid(unsafe_code)]

//! Trailing-edge coalescing for continuous pointer updates.
//!
//! A live drag or resize can deliver pointer positions far faster than a host
//! redraws. [`PointerCoalescer`] keeps only the latest position and releases
//! it once the stream has been quiet for the coalescing window (16 ms by
//! default, one frame at 60 Hz). On pointer release the host calls
//! [`PointerCoalescer::flush`] so the final position is never dropped.
//!
//! Timestamps are passed in by the caller, which keeps the coalescer
//! deterministic under test.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use tessel_core::coalesce::PointerCoalescer;
//! use tessel_core::geometry::Vec2;
//! use web_time::Instant;
//!
//! let start = Instant::now();
//! let mut coalescer = PointerCoalescer::default();
//! coalescer.push(Vec2::new(10.0, 10.0), start);
//! coalescer.push(Vec2::new(12.0, 11.0), start + Duration::from_millis(4));
//!
//! // Still inside the window: nothing released yet.
//! assert!(coalescer.poll(start + Duration::from_millis(10)).is_none());
//!
//! // Quiet for a full window: the latest position wins.
//! let released = coalescer.poll(start + Duration::from_millis(30));
//! assert_eq!(released, Some(Vec2::new(12.0, 11.0)));
//! ```

use std::time::Duration;

use web_time::Instant;

use crate::geometry::Vec2;

/// Default trailing-edge window (one 60 Hz frame).
pub const DEFAULT_COALESCE_WINDOW: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy)]
struct PendingPointer {
    position: Vec2,
    last_update: Instant,
}

/// Latest-wins, trailing-edge pointer coalescer.
///
/// Not thread-safe; drive it from the host's event thread.
#[derive(Debug, Clone)]
pub struct PointerCoalescer {
    window: Duration,
    pending: Option<PendingPointer>,
    coalesced: u64,
}

impl Default for PointerCoalescer {
    fn default() -> Self {
        Self::new(DEFAULT_COALESCE_WINDOW)
    }
}

impl PointerCoalescer {
    /// Create a coalescer with a custom window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            coalesced: 0,
        }
    }

    /// Coalescing window.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Record a new pointer position, replacing any pending one.
    pub fn push(&mut self, position: Vec2, now: Instant) {
        if self.pending.is_some() {
            self.coalesced = self.coalesced.saturating_add(1);
        }
        self.pending = Some(PendingPointer {
            position,
            last_update: now,
        });
    }

    /// Release the pending position if the stream has been quiet for at
    /// least one window.
    pub fn poll(&mut self, now: Instant) -> Option<Vec2> {
        let pending = self.pending?;
        if now.saturating_duration_since(pending.last_update) < self.window {
            return None;
        }
        self.pending = None;
        Some(pending.position)
    }

    /// Release the pending position immediately (pointer release / commit).
    pub fn flush(&mut self) -> Option<Vec2> {
        self.pending.take().map(|pending| pending.position)
    }

    /// Whether a position is waiting to be released.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of positions replaced before being released.
    #[must_use]
    pub const fn coalesced_count(&self) -> u64 {
        self.coalesced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn latest_position_wins() {
        let t0 = Instant::now();
        let mut c = PointerCoalescer::default();
        c.push(Vec2::new(1.0, 1.0), t0);
        c.push(Vec2::new(2.0, 2.0), t0 + ms(1));
        c.push(Vec2::new(3.0, 3.0), t0 + ms(2));
        assert_eq!(c.coalesced_count(), 2);
        assert_eq!(c.poll(t0 + ms(40)), Some(Vec2::new(3.0, 3.0)));
        assert!(!c.has_pending());
    }

    #[test]
    fn poll_waits_for_quiet_window() {
        let t0 = Instant::now();
        let mut c = PointerCoalescer::new(ms(16));
        c.push(Vec2::new(5.0, 5.0), t0);
        c.push(Vec2::new(6.0, 5.0), t0 + ms(10));
        // 16ms after the first push but only 6ms after the latest one.
        assert_eq!(c.poll(t0 + ms(16)), None);
        assert_eq!(c.poll(t0 + ms(26)), Some(Vec2::new(6.0, 5.0)));
    }

    #[test]
    fn flush_releases_immediately() {
        let t0 = Instant::now();
        let mut c = PointerCoalescer::default();
        c.push(Vec2::new(9.0, 9.0), t0);
        assert_eq!(c.flush(), Some(Vec2::new(9.0, 9.0)));
        assert_eq!(c.flush(), None);
        assert_eq!(c.poll(t0 + ms(100)), None);
    }

    #[test]
    fn poll_before_any_push_is_empty() {
        let mut c = PointerCoalescer::default();
        assert_eq!(c.poll(Instant::now()), None);
        assert_eq!(c.window(), DEFAULT_COALESCE_WINDOW);
    }
}
