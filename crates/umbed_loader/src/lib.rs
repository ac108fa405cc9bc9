//! Environment-adaptive loading for umbed (Layer 3).
//!
//! A [`Loader`] takes one [`EmbedOptions`] per invocation and:
//!
//! 1. registers the declared dependencies,
//! 2. brings them into the host with the selected [`Strategy`],
//! 3. waits until every injected resource has loaded,
//! 4. validates and styles the container element, verifies that every
//!    declared global binding resolves, and calls `init`.
//!
//! Failures at any step stop the invocation before `init` runs. They are
//! logged through the invocation's diagnostics and also returned as an
//! [`EmbedError`], so a caller that ignores the result still gets an
//! explanation in the log.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use umbed_host::{HostValue, memory::{MemoryDocument, MemoryGlobals}};
//! use umbed_loader::{EmbedOptions, Host, Loader};
//!
//! let document = Arc::new(MemoryDocument::auto_load());
//! document.add_element("map");
//! let globals = Arc::new(MemoryGlobals::new());
//!
//! let hook = globals.clone();
//! document.on_load("/leaflet.js", move || hook.define("L", Arc::new(()) as HostValue));
//!
//! let loader = Loader::new(Host::new(document.clone(), globals));
//! let options = EmbedOptions::new("map")
//!     .with_dependencies(json!([{ "obj": "L", "js": ["/leaflet.js"], "css": ["/leaflet.css"] }]))
//!     .with_init(|| {});
//!
//! let report = futures::executor::block_on(loader.embed(options)).unwrap();
//! assert!(report.init_invoked);
//! assert_eq!(document.insertions(), 1);
//! ```

mod aggregate;
mod binder;
mod error;
mod injector;
mod loader;
mod options;
mod outcome;
mod queue;
mod strategy;

pub use error::{EmbedError, LoadFailure};
pub use loader::{Host, Loader};
pub use options::{ContainerCss, EmbedOptions, InitCallback};
pub use outcome::{EmbedReport, LoadOutcome, ResourceOutcome, SkipReason};
pub use queue::CallQueue;
pub use strategy::{Strategy, StrategyKind};
