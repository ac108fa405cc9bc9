//! Duplicate detection against resources already in the document.
//!
//! # Matching policy
//!
//! A resource counts as present when some element of the same kind has a
//! source that *ends with* the resource's filename (`lib-1.2.3.js`). Exact URL
//! comparison would miss the same file served from another host, CDN or
//! protocol. The price is that two unrelated files sharing a generic name
//! (`/a/main.js`, `/b/main.js`) are treated as the same resource. Callers
//! that need exact matching must give their files distinctive names.

use umbed_host::{Document, ResourceKind};

use crate::url::{ends_with_filename, filename_suffix};

/// Checks resolved URLs against the document and the batch being assembled.
///
/// Every check reads a fresh snapshot of the document's elements.
pub struct PresenceDetector<'a> {
    document: &'a dyn Document,
    queued: Vec<(ResourceKind, String)>,
}

impl<'a> PresenceDetector<'a> {
    /// Creates a detector over `document` with an empty pending batch.
    #[must_use]
    pub fn new(document: &'a dyn Document) -> Self {
        Self {
            document,
            queued: Vec::new(),
        }
    }

    /// Records `url` as queued for insertion, so later checks see it.
    pub fn queue(&mut self, kind: ResourceKind, url: impl Into<String>) {
        self.queued.push((kind, url.into()));
    }

    /// Returns `true` if an element of `kind` matching `url`'s filename is
    /// already in the document or queued.
    ///
    /// A URL without a recognisable filename never matches.
    #[must_use]
    pub fn has_resource(&self, kind: ResourceKind, url: &str) -> bool {
        let Some(filename) = filename_suffix(url, kind.extension()) else {
            return false;
        };

        let queued = self
            .queued
            .iter()
            .filter(|(queued_kind, _)| *queued_kind == kind)
            .map(|(_, queued_url)| queued_url.as_str());

        self.document
            .sources(kind)
            .iter()
            .map(String::as_str)
            .chain(queued)
            .any(|source| ends_with_filename(source, filename))
    }
}
