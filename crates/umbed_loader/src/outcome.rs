//! Per-resource outcomes and the invocation report.

use core::fmt;
use core::time::Duration;

use umbed_host::ResourceKind;

use crate::StrategyKind;

/// What happened to one declared resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Inserted; the host has not reported a result yet.
    Pending,
    /// Inserted and reported loaded by the host.
    Loaded,
    /// A matching resource was already in the document, nothing was inserted.
    AlreadyPresent,
    /// Not requested as an element.
    Skipped(SkipReason),
    /// Inserted and reported failed by the host.
    Failed(String),
}

impl LoadOutcome {
    /// Returns `true` for [`LoadOutcome::Failed`].
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns `true` for [`LoadOutcome::Pending`].
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Why a resource was not requested as an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The dependency's global binding already resolved.
    BindingPresent,
    /// The dependency is loaded through the module loader or require host.
    ModuleManaged,
}

/// Outcome of one resolved resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceOutcome {
    /// Resource kind.
    pub kind: ResourceKind,
    /// Version-resolved URL.
    pub url: String,
    /// What happened to it.
    pub outcome: LoadOutcome,
}

impl ResourceOutcome {
    /// Creates an outcome record.
    pub fn new(kind: ResourceKind, url: impl Into<String>, outcome: LoadOutcome) -> Self {
        Self {
            kind,
            url: url.into(),
            outcome,
        }
    }
}

impl fmt::Display for ResourceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} file '{}'", self.kind, self.url)?;
        match &self.outcome {
            LoadOutcome::Pending => f.write_str(" (never settled)"),
            LoadOutcome::Failed(reason) => write!(f, " ({reason})"),
            _ => Ok(()),
        }
    }
}

/// Summary of a successful invocation.
#[derive(Debug, Clone)]
pub struct EmbedReport {
    /// Strategy that ran.
    pub strategy: StrategyKind,
    /// Every resolved resource in declaration order.
    pub resources: Vec<ResourceOutcome>,
    /// Whether an `init` callback was supplied and invoked.
    pub init_invoked: bool,
    /// Time from the start of the invocation until `init` returned.
    pub elapsed: Option<Duration>,
}

impl EmbedReport {
    /// Resources inserted into the document during this invocation.
    pub fn inserted(&self) -> impl Iterator<Item = &ResourceOutcome> {
        self.resources
            .iter()
            .filter(|resource| resource.outcome == LoadOutcome::Loaded)
    }
}
