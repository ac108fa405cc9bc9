//! Dependency handling for umbed (Layer 2).
//!
//! - [`DependencyDescriptor`] - one declared requirement (module, binding, URLs, version)
//! - [`DependencyRegistry`] - validated, ordered descriptors for one invocation
//! - [`PresenceDetector`] - filename-suffix duplicate detection
//! - [`resolve_url`], [`filename_suffix`], [`module_path_for`] - pure URL helpers
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use umbed_core::Diagnostics;
//! use umbed_deps::DependencyRegistry;
//!
//! let mut registry = DependencyRegistry::new();
//! registry.register(
//!     &json!([
//!         { "obj": "L", "js": ["https://unpkg.com/leaflet@{vers}/dist/leaflet.js"], "vers": "1.9.4" },
//!         { "obj": "Orphan" }
//!     ]),
//!     &Diagnostics::default(),
//! );
//! assert_eq!(registry.len(), 1);
//! ```

mod descriptor;
mod presence;
mod registry;
mod url;

pub use descriptor::DependencyDescriptor;
pub use presence::PresenceDetector;
pub use registry::{DependencyRegistry, RegistryRejection};
pub use url::{VERSION_PLACEHOLDER, ends_with_filename, filename_suffix, module_path_for, resolve_url};
