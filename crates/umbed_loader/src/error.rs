//! Error types for loader invocations.

use core::fmt;
use core::time::Duration;

use thiserror::Error;
use umbed_host::HostError;

use crate::ResourceOutcome;

/// Why an invocation stopped before calling `init`.
///
/// Every error is logged by the loader before it is returned, so callers may
/// ignore the result without losing the explanation.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// `container_id` was absent or empty.
    #[error("requires a valid container_id, unable to proceed")]
    MissingContainerId,

    /// No element with the configured identifier exists.
    #[error("couldn't find element '{0}' to attach to, unable to proceed")]
    ContainerNotFound(String),

    /// Declared global bindings did not resolve after loading.
    #[error("can't find required global(s) {}, cannot proceed", .0.join(", "))]
    MissingBindings(Vec<String>),

    /// One or more injected resources failed (or never settled before the timeout).
    #[error("{0}")]
    ResourceLoad(LoadFailure),

    /// The module loader rejected the module request.
    #[error("module loader failed: {0}")]
    ModuleRequest(#[source] HostError),

    /// A synchronous require failed.
    #[error(transparent)]
    Require(HostError),

    /// The module loader did not answer before the configured timeout.
    #[error("module loader did not respond within {0:?}")]
    ModuleTimeout(Duration),
}

/// Aggregate failure of injected resources.
///
/// Carries the outcome of every resource of the invocation, not only the
/// failed ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    /// Every resource in declaration order.
    pub resources: Vec<ResourceOutcome>,
    /// Set when the aggregate wait was cut short by the load timeout.
    pub timed_out: Option<Duration>,
}

impl LoadFailure {
    /// Resources that failed or never settled.
    pub fn failed(&self) -> impl Iterator<Item = &ResourceOutcome> {
        self.resources
            .iter()
            .filter(|resource| resource.outcome.is_failed() || resource.outcome.is_pending())
    }
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed: Vec<String> = self.failed().map(ToString::to_string).collect();
        match self.timed_out {
            Some(limit) => write!(
                f,
                "timed out after {limit:?} waiting for injected resources: {}",
                failed.join(", ")
            ),
            None => write!(
                f,
                "{} injected resource(s) failed to load: {}",
                failed.len(),
                failed.join(", ")
            ),
        }
    }
}
