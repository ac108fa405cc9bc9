//! Error types reported by host collaborators.

use thiserror::Error;

/// Failures reported by a host environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host reported that an injected resource failed to load.
    #[error("failed to load '{url}': {reason}")]
    LoadFailed {
        /// Resolved URL of the resource.
        url: String,
        /// Host-supplied reason.
        reason: String,
    },

    /// The host dropped a load notification without settling it.
    #[error("load notification for '{url}' was dropped before settling")]
    Abandoned {
        /// Resolved URL of the resource.
        url: String,
    },

    /// The module loader could not resolve the requested module set.
    #[error("module request failed: {0}")]
    ModuleRequest(String),

    /// A synchronous `require` call failed.
    #[error("require('{path}') failed: {reason}")]
    Require {
        /// Path passed to `require`.
        path: String,
        /// Host-supplied reason.
        reason: String,
    },
}

impl HostError {
    /// Creates a [`LoadFailed`](Self::LoadFailed).
    pub fn load_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a [`Require`](Self::Require).
    pub fn require(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Require {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
