//! Document capabilities: element enumeration, head insertion, load signals.

use core::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::HostError;

/// Settles once the host reports an inserted element as loaded (or failed).
pub type LoadSignal = BoxFuture<'static, Result<(), HostError>>;

// ─────────────────────────────────────────────────────────────────────────────
// ResourceKind
// ─────────────────────────────────────────────────────────────────────────────

/// Kind of external resource a dependency can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A `link rel="stylesheet"` element.
    Stylesheet,
    /// A `script` element.
    Script,
}

impl ResourceKind {
    /// File extension used to recognise resources of this kind.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Stylesheet => "css",
            Self::Script => "js",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stylesheet => f.write_str("CSS"),
            Self::Script => f.write_str("JS"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ElementSpec
// ─────────────────────────────────────────────────────────────────────────────

/// Element to be created and appended to the document head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementSpec {
    /// `<link rel="stylesheet" media=.. href=..>`
    Stylesheet {
        /// Resolved stylesheet URL.
        href: String,
        /// Media query, `"screen"` for injected stylesheets.
        media: String,
    },
    /// `<script src=.. async defer>`
    Script {
        /// Resolved script URL.
        src: String,
        /// Whether the script is marked asynchronous.
        is_async: bool,
        /// Whether the script is marked deferred.
        defer: bool,
    },
}

impl ElementSpec {
    /// Screen stylesheet for `href`.
    pub fn stylesheet(href: impl Into<String>) -> Self {
        Self::Stylesheet {
            href: href.into(),
            media: "screen".to_string(),
        }
    }

    /// Asynchronous, deferred script for `src`.
    pub fn script(src: impl Into<String>) -> Self {
        Self::Script {
            src: src.into(),
            is_async: true,
            defer: true,
        }
    }

    /// Returns the element's resource kind.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Stylesheet { .. } => ResourceKind::Stylesheet,
            Self::Script { .. } => ResourceKind::Script,
        }
    }

    /// Returns the element's source attribute.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Stylesheet { href, .. } => href,
            Self::Script { src, .. } => src,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document / Element
// ─────────────────────────────────────────────────────────────────────────────

/// The document-like host the loader injects into.
///
/// The loader only ever appends; it never removes or rewrites elements it did
/// not create.
pub trait Document: Send + Sync {
    /// Source attributes of every element of `kind` currently in the document.
    fn sources(&self, kind: ResourceKind) -> Vec<String>;

    /// Appends `batch` to the document head as a single mutation.
    ///
    /// Returns one load signal per element, in batch order.
    fn append_to_head(&self, batch: Vec<ElementSpec>) -> Vec<LoadSignal>;

    /// Looks up an element by identifier.
    fn element_by_id(&self, id: &str) -> Option<Arc<dyn Element>>;
}

/// Styling access to a container element.
pub trait Element: Send + Sync {
    /// Sets one inline style property.
    fn set_style_property(&self, name: &str, value: &str);

    /// Replaces the whole inline style with `style_text`.
    fn replace_style(&self, style_text: &str);
}
