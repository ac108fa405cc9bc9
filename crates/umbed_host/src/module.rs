//! Module-loader and require-host capabilities, plus capability probing.

use std::sync::Arc;

use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde::Serialize;

use crate::{HostError, HostValue};

// ─────────────────────────────────────────────────────────────────────────────
// ModuleConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Path and shim configuration handed to an asynchronous module loader.
///
/// Serializes to the `{ "paths": {..}, "shim": {..} }` shape module loaders
/// expect; `shim` is omitted when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleConfig {
    /// Module name to candidate paths (extension stripped), in declaration order.
    pub paths: IndexMap<String, Vec<String>>,
    /// Modules that export their value only through a global binding.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub shim: IndexMap<String, ShimConfig>,
}

/// Shim entry for a module loaded as a plain global-exporting script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShimConfig {
    /// Global binding path the script exports through.
    pub exports: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// ModuleLoader / RequireHost
// ─────────────────────────────────────────────────────────────────────────────

/// Asynchronous module loader (path registration plus module-set requests).
pub trait ModuleLoader: Send + Sync {
    /// Registers path and shim configuration.
    fn configure(&self, config: &ModuleConfig);

    /// Requests `modules`, yielding their values in matching order.
    fn request(&self, modules: Vec<String>) -> BoxFuture<'static, Result<Vec<HostValue>, HostError>>;
}

/// Synchronous package host `require`.
pub trait RequireHost: Send + Sync {
    /// Requires the module at `path`.
    fn require(&self, path: &str) -> Result<HostValue, HostError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// CapabilityProbe
// ─────────────────────────────────────────────────────────────────────────────

/// Reports which loading capabilities the host offers.
pub trait CapabilityProbe: Send + Sync {
    /// The host's module loader, if one is present.
    fn module_loader(&self) -> Option<Arc<dyn ModuleLoader>>;

    /// The host's require function, if one is present.
    fn require_host(&self) -> Option<Arc<dyn RequireHost>>;
}

/// Probe with fixed answers, for hosts that know their capabilities up front.
#[derive(Clone, Default)]
pub struct StaticProbe {
    /// Module loader to report.
    pub module_loader: Option<Arc<dyn ModuleLoader>>,
    /// Require host to report.
    pub require_host: Option<Arc<dyn RequireHost>>,
}

impl CapabilityProbe for StaticProbe {
    fn module_loader(&self) -> Option<Arc<dyn ModuleLoader>> {
        self.module_loader.clone()
    }

    fn require_host(&self) -> Option<Arc<dyn RequireHost>> {
        self.require_host.clone()
    }
}
