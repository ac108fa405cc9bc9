//! Clock and named timing spans.
//!
//! - [`Clock`] - Time provider, mockable for testing
//! - [`Timings`] - Named start/stop spans recorded against a [`Clock`]
//!
//! # Example
//!
//! ```
//! use umbed_core::{Clock, Timings};
//!
//! let timings = Timings::new(Clock::default());
//! timings.start("dependencies");
//! // ... inject and await resources ...
//! let elapsed = timings.stop("dependencies");
//! assert!(elapsed.is_some());
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

// ─────────────────────────────────────────────────────────────────────────────
// ClockProvider Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for providing current time.
///
/// Implement this for custom time providers (e.g., mock clock for testing).
pub trait ClockProvider: Send + Sync + 'static {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// System clock provider using `std::time::Instant`.
#[derive(Debug, Clone, Copy, Default)]
struct SystemClock;

impl ClockProvider for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clock
// ─────────────────────────────────────────────────────────────────────────────

/// Time provider handle.
///
/// Uses the system clock by default; [`Clock::with_provider`] swaps in any
/// [`ClockProvider`].
#[derive(Clone)]
pub struct Clock {
    provider: Arc<dyn ClockProvider>,
}

impl core::fmt::Debug for Clock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Clock").finish_non_exhaustive()
    }
}

impl Clock {
    /// Creates a Clock using the system clock.
    #[must_use]
    pub fn system() -> Self {
        Self {
            provider: Arc::new(SystemClock),
        }
    }

    /// Creates a Clock with a custom provider.
    #[must_use]
    pub fn with_provider(provider: Arc<dyn ClockProvider>) -> Self {
        Self { provider }
    }

    /// Returns the current instant.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.provider.now()
    }

    /// Returns the duration elapsed since the given instant.
    #[must_use]
    pub fn elapsed_since(&self, earlier: Instant) -> Duration {
        self.now().saturating_duration_since(earlier)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Timings
// ─────────────────────────────────────────────────────────────────────────────

/// Named start/stop timing spans.
///
/// Starting a span that is already running restarts it.
#[derive(Debug, Default)]
pub struct Timings {
    clock: Clock,
    running: Mutex<HashMap<&'static str, Instant>>,
}

impl Timings {
    /// Creates an empty span set backed by `clock`.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            running: Mutex::new(HashMap::new()),
        }
    }

    /// Starts (or restarts) the span `name`.
    pub fn start(&self, name: &'static str) {
        self.running.lock().insert(name, self.clock.now());
    }

    /// Stops the span `name`, returning its duration.
    ///
    /// Returns `None` if the span was never started.
    pub fn stop(&self, name: &'static str) -> Option<Duration> {
        let started = self.running.lock().remove(name)?;
        Some(self.clock.elapsed_since(started))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MockClock for Testing
// ─────────────────────────────────────────────────────────────────────────────

/// Mock clock for testing with controllable time.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use std::time::{Duration, Instant};
/// use umbed_core::{Clock, MockClock, Timings};
///
/// let mock = Arc::new(MockClock::new(Instant::now()));
/// let timings = Timings::new(Clock::with_provider(mock.clone()));
///
/// timings.start("load");
/// mock.advance(Duration::from_millis(250));
/// assert_eq!(timings.stop("load"), Some(Duration::from_millis(250)));
/// ```
#[cfg(any(test, feature = "test-utils"))]
pub struct MockClock {
    current: Mutex<Instant>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockClock {
    /// Creates a mock clock set to the given instant.
    #[must_use]
    pub fn new(start: Instant) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, duration: Duration) {
        *self.current.lock() += duration;
    }

    /// Returns the current instant.
    #[must_use]
    pub fn current(&self) -> Instant {
        *self.current.lock()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl ClockProvider for MockClock {
    fn now(&self) -> Instant {
        self.current()
    }
}
