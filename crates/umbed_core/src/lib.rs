//! Core infrastructure for umbed.
//!
//! This crate provides the ambient pieces every loader invocation uses:
//!
//! - [`Diagnostics`] - Leveled, context-labelled diagnostics over `tracing`
//! - [`TracingSetup`] - Optional global subscriber installation
//! - [`Timings`] - Named start/stop timing spans with a mockable [`Clock`]
//!
//! # Feature Flags
//!
//! - `test-utils` - Enables [`MockClock`] for deterministic timing tests
//!
//! # Architecture
//!
//! This crate is part of Layer 1 infrastructure:
//!
//! - **Layer 1** (`umbed_core`, `umbed_host`): Diagnostics and host capabilities
//! - **Layer 2** (`umbed_deps`): Dependency descriptors, URL resolution, presence detection
//! - **Layer 3** (`umbed_loader`): Strategies, injection, aggregation and container binding

mod diagnostics;
mod time;
mod tracing_setup;

pub use diagnostics::{Diagnostics, LogLevel};
pub use time::{Clock, ClockProvider, Timings};
pub use tracing_setup::{TracingFormat, TracingSetup};

// Re-export test utilities
#[cfg(any(test, feature = "test-utils"))]
pub use time::MockClock;
