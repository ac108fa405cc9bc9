//! Environment strategies.
//!
//! Exactly one [`Strategy`] runs per invocation. It is chosen before any work
//! starts, either explicitly by the embedder or by [`Strategy::detect`] from a
//! [`CapabilityProbe`], and is never re-evaluated mid-flight.
//!
//! | Strategy | Module JS | Other JS and CSS |
//! |----------|-----------|------------------|
//! | [`Module`](Strategy::Module) | requested from the module loader | injected as elements |
//! | [`Require`](Strategy::Require) | required synchronously | injected as elements |
//! | [`Dom`](Strategy::Dom) | injected as elements | injected as elements |
//!
//! In every strategy, a dependency whose binding already resolves has no JS
//! requested for it.

use core::fmt;
use core::time::Duration;
use std::sync::Arc;

use umbed_core::Diagnostics;
use umbed_deps::{DependencyRegistry, module_path_for};
use umbed_host::{
    BindingPath, BindingResolver, CapabilityProbe, Document, HostValue, ModuleConfig,
    ModuleLoader, RequireHost, ResourceKind, ShimConfig,
};

use crate::injector::ResourceInjector;
use crate::{EmbedError, ResourceOutcome};

/// Discriminant of a [`Strategy`], carried in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Module-loader strategy.
    Module,
    /// Synchronous require strategy.
    Require,
    /// Browser-global fallback.
    Dom,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module => f.write_str("module"),
            Self::Require => f.write_str("require"),
            Self::Dom => f.write_str("dom"),
        }
    }
}

/// How dependencies are brought into the host.
#[derive(Clone, Default)]
pub enum Strategy {
    /// Configure and request modules through an asynchronous module loader.
    Module(Arc<dyn ModuleLoader>),
    /// Require module paths synchronously.
    Require(Arc<dyn RequireHost>),
    /// Inject every resource as a document element.
    #[default]
    Dom,
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Strategy").field(&self.kind()).finish()
    }
}

impl Strategy {
    /// Picks the highest-priority strategy the probe reports.
    #[must_use]
    pub fn detect(probe: &dyn CapabilityProbe) -> Self {
        if let Some(loader) = probe.module_loader() {
            return Self::Module(loader);
        }
        if let Some(host) = probe.require_host() {
            return Self::Require(host);
        }
        Self::Dom
    }

    /// Returns the strategy's discriminant.
    #[must_use]
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Module(_) => StrategyKind::Module,
            Self::Require(_) => StrategyKind::Require,
            Self::Dom => StrategyKind::Dom,
        }
    }

    /// Brings every registered dependency into the host.
    pub(crate) async fn load(
        &self,
        cx: &LoadContext<'_>,
    ) -> Result<Vec<ResourceOutcome>, EmbedError> {
        match self {
            Self::Module(loader) => load_modules(loader.as_ref(), cx).await,
            Self::Require(host) => require_modules(host.as_ref(), cx).await,
            Self::Dom => {
                let aggregator = cx.injector().inject(cx.registry, false);
                aggregator
                    .settle(cx.timeout, cx.diagnostics)
                    .await
                    .map_err(EmbedError::ResourceLoad)
            }
        }
    }
}

/// Everything a strategy needs for one invocation.
pub(crate) struct LoadContext<'a> {
    pub(crate) document: &'a dyn Document,
    pub(crate) globals: &'a dyn BindingResolver,
    pub(crate) registry: &'a DependencyRegistry,
    pub(crate) diagnostics: &'a Diagnostics,
    pub(crate) timeout: Option<Duration>,
}

impl LoadContext<'_> {
    fn injector(&self) -> ResourceInjector<'_> {
        ResourceInjector::new(self.document, self.globals, self.diagnostics)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Module loader
// ─────────────────────────────────────────────────────────────────────────────

/// Module name and the binding its value is assigned to.
type ModuleRequest = (String, Option<BindingPath>);

async fn load_modules(
    loader: &dyn ModuleLoader,
    cx: &LoadContext<'_>,
) -> Result<Vec<ResourceOutcome>, EmbedError> {
    let aggregator = cx.injector().inject(cx.registry, true);
    let settle = aggregator.settle(cx.timeout, cx.diagnostics);

    let (requests, config) = module_config(cx);
    if requests.is_empty() {
        return settle.await.map_err(EmbedError::ResourceLoad);
    }

    loader.configure(&config);
    let names: Vec<String> = requests.iter().map(|(name, _)| name.clone()).collect();
    let request = async {
        let pending = loader.request(names);
        match cx.timeout {
            Some(limit) => match tokio::time::timeout(limit, pending).await {
                Ok(result) => result.map_err(EmbedError::ModuleRequest),
                Err(_) => Err(EmbedError::ModuleTimeout(limit)),
            },
            None => pending.await.map_err(EmbedError::ModuleRequest),
        }
    };

    let (values, outcomes) = futures::join!(request, settle);
    let values = values?;
    let outcomes = outcomes.map_err(EmbedError::ResourceLoad)?;

    for ((module, binding), value) in requests.into_iter().zip(values) {
        if let Some(binding) = binding {
            cx.diagnostics.info(format_args!(
                "setting global variable '{binding}' for '{module}' module..."
            ));
            cx.globals.assign(&binding, value);
        }
    }
    Ok(outcomes)
}

/// Builds the loader configuration and the ordered module request.
fn module_config(cx: &LoadContext<'_>) -> (Vec<ModuleRequest>, ModuleConfig) {
    let mut requests = Vec::new();
    let mut config = ModuleConfig::default();

    for dependency in cx.registry {
        let Some(module) = dependency.loadable_module() else {
            continue;
        };
        if let Some(binding) = &dependency.binding
            && binding.is_bound(cx.globals)
        {
            cx.diagnostics.warn(format_args!(
                "global '{binding}' already exists, not requesting '{module}' module."
            ));
            continue;
        }

        cx.diagnostics
            .info(format_args!("preparing dependency for '{module}' module..."));
        let paths = config.paths.entry(module.to_string()).or_default();
        for url in dependency.resolved(ResourceKind::Script) {
            let path = module_path_for(&url, ResourceKind::Script.extension());
            cx.diagnostics.info(format_args!(
                "adding '{module}' module config path: '{path}'"
            ));
            paths.push(path);
        }
        if let Some(exports) = dependency.shim_exports() {
            config.shim.insert(
                module.to_string(),
                ShimConfig {
                    exports: exports.to_string(),
                },
            );
        }
        requests.push((module.to_string(), dependency.binding.clone()));
    }

    (requests, config)
}

// ─────────────────────────────────────────────────────────────────────────────
// Require host
// ─────────────────────────────────────────────────────────────────────────────

async fn require_modules(
    host: &dyn RequireHost,
    cx: &LoadContext<'_>,
) -> Result<Vec<ResourceOutcome>, EmbedError> {
    let aggregator = cx.injector().inject(cx.registry, true);

    for dependency in cx.registry {
        let Some(module) = dependency.loadable_module() else {
            continue;
        };
        if let Some(binding) = &dependency.binding
            && binding.is_bound(cx.globals)
        {
            cx.diagnostics.warn(format_args!(
                "global '{binding}' already exists, not requiring '{module}' module."
            ));
            continue;
        }

        for path in dependency.resolved(ResourceKind::Script) {
            cx.diagnostics
                .debug(format_args!("requiring '{path}' for '{module}' module."));
            let value: HostValue = host.require(&path).map_err(EmbedError::Require)?;
            if let Some(binding) = &dependency.binding {
                cx.diagnostics.info(format_args!(
                    "setting global variable '{binding}' for '{module}' module..."
                ));
                cx.globals.assign(binding, value);
            }
        }
    }

    aggregator
        .settle(cx.timeout, cx.diagnostics)
        .await
        .map_err(EmbedError::ResourceLoad)
}
