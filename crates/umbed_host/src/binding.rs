//! Global binding paths and their resolution.
//!
//! A dependency may declare the global binding it is expected to create, as a
//! dot-separated path (`"L.Control.Draw"`). Whether that binding exists is
//! answered by walking the path one property at a time through an injected
//! [`BindingResolver`], so nothing here touches an ambient global object.

use core::any::Any;
use core::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Opaque value owned by the host (a module export, a global object, ...).
pub type HostValue = Arc<dyn Any + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// BindingResolver
// ─────────────────────────────────────────────────────────────────────────────

/// Read/write access to the host's global binding namespace.
pub trait BindingResolver: Send + Sync {
    /// Reads the property `name` of `parent`, or of the global object when
    /// `parent` is `None`.
    fn property(&self, parent: Option<&HostValue>, name: &str) -> Option<HostValue>;

    /// Assigns `value` to the binding at `path`.
    fn assign(&self, path: &BindingPath, value: HostValue);
}

// ─────────────────────────────────────────────────────────────────────────────
// BindingPath
// ─────────────────────────────────────────────────────────────────────────────

/// Dot-separated path to a nested global binding.
///
/// # Example
///
/// ```
/// use umbed_host::BindingPath;
///
/// let path = BindingPath::new("L.Control.Draw");
/// assert_eq!(path.segments().collect::<Vec<_>>(), ["L", "Control", "Draw"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingPath(String);

impl BindingPath {
    /// Creates a path from its dotted form.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the dotted form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the path's property names, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Looks the path up through `resolver`.
    ///
    /// Returns `None` as soon as any segment is missing.
    pub fn resolve(&self, resolver: &dyn BindingResolver) -> Option<HostValue> {
        let mut segments = self.segments();
        let first = segments.next()?;
        let mut current = resolver.property(None, first)?;
        for name in segments {
            current = resolver.property(Some(&current), name)?;
        }
        Some(current)
    }

    /// Returns `true` if the path currently resolves.
    pub fn is_bound(&self, resolver: &dyn BindingResolver) -> bool {
        self.resolve(resolver).is_some()
    }
}

impl fmt::Display for BindingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BindingPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}
