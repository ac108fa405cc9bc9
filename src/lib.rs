//! Environment-adaptive JS/CSS dependency loading for embedded widgets.
//!
//! The umbed crates, re-exported in layer order:

/// Layer 1: diagnostics, subscriber setup and timing.
pub use umbed_core;

/// Layer 1: host capability traits.
pub use umbed_host;

/// Layer 2: dependency descriptors, registry and duplicate detection.
pub use umbed_deps;

/// Layer 3: strategies, injection, aggregation and container binding.
pub use umbed_loader;

/// Re-export all common types for easy access.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use serde_json::json;
/// use umbed::prelude::*;
/// use umbed::umbed_host::memory::{MemoryDocument, MemoryGlobals};
///
/// let document = Arc::new(MemoryDocument::auto_load());
/// let container = document.add_element("widget");
/// let globals = Arc::new(MemoryGlobals::new());
/// let hook = globals.clone();
/// document.on_load("/widget.js", move || {
///     hook.define("Widget.Core", Arc::new(()) as HostValue);
/// });
///
/// let host = Host::new(document.clone(), globals).detect(&StaticProbe::default());
/// let options = EmbedOptions::from_json(json!({
///     "container_id": "widget",
///     "container_css": "height: 300px",
///     "dependencies": [
///         { "obj": "Widget.Core", "js": ["/widget.js"], "css": ["/widget.css"] }
///     ],
///     "log_level": "error"
/// }))
/// .unwrap()
/// .with_init(|| {});
///
/// let report = futures::executor::block_on(Loader::new(host).embed(options)).unwrap();
/// assert!(report.init_invoked);
/// assert_eq!(report.inserted().count(), 2);
/// assert_eq!(container.style("height").as_deref(), Some("300px"));
/// assert_eq!(document.insertions(), 1);
/// ```
pub mod prelude {
    pub use umbed_core::{Diagnostics, LogLevel, TracingFormat, TracingSetup};
    pub use umbed_deps::{DependencyDescriptor, DependencyRegistry};
    pub use umbed_host::{
        BindingPath, BindingResolver, CapabilityProbe, Document, Element, HostValue,
        ModuleLoader, RequireHost, StaticProbe,
    };
    pub use umbed_loader::{
        CallQueue, ContainerCss, EmbedError, EmbedOptions, EmbedReport, Host, Loader, Strategy,
    };
}
