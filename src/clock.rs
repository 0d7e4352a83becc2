//! Time sources for section timing
//!
//! The profiler never reads the system clock directly; it asks a [`Clock`]
//! for a timestamp in seconds. [`MonotonicClock`] is the production source,
//! [`ManualClock`] lets tests and replay tools drive time explicitly.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A time source that never runs backward within a session
pub trait Clock {
    /// Current timestamp in seconds since an arbitrary, fixed origin
    fn now_seconds(&self) -> f64;
}

/// Monotonic wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_seconds(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock whose time only changes when told to
///
/// # Example
/// ```
/// use sectimer::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// clock.set(0.5);
/// clock.advance(0.25);
/// assert_eq!(clock.now_seconds(), 0.75);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(seconds: f64) -> Self {
        Self {
            now: Cell::new(seconds),
        }
    }

    pub fn set(&self, seconds: f64) {
        self.now.set(seconds);
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn now_seconds(&self) -> f64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_seconds(&self) -> f64 {
        (**self).now_seconds()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now_seconds(&self) -> f64 {
        (**self).now_seconds()
    }
}
