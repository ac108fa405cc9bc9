//! Host capability interfaces for umbed (Layer 1).
//!
//! The loader never inspects ambient globals. Everything it needs from the
//! embedding environment arrives through the traits defined here:
//!
//! - [`Document`] / [`Element`] - element enumeration, head insertion, load signals, styling
//! - [`BindingResolver`] - reading and assigning global bindings by [`BindingPath`]
//! - [`ModuleLoader`] - asynchronous module loader (path config plus module requests)
//! - [`RequireHost`] - synchronous package-host `require`
//! - [`CapabilityProbe`] - reports which of the loading capabilities exist
//!
//! # Feature Flags
//!
//! - `test-utils` - Enables the [`memory`] module with in-memory host fakes

mod binding;
mod document;
mod error;
mod module;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use binding::{BindingPath, BindingResolver, HostValue};
pub use document::{Document, Element, ElementSpec, LoadSignal, ResourceKind};
pub use error::HostError;
pub use module::{CapabilityProbe, ModuleConfig, ModuleLoader, RequireHost, ShimConfig, StaticProbe};
