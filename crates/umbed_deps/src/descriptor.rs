//! Dependency descriptors.
//!
//! A [`DependencyDescriptor`] is one requirement that must be satisfied before
//! initialization may proceed. Descriptors deserialize from the loader's
//! configuration using the short keys embedders already write:
//!
//! ```json
//! {
//!   "mod": "leaflet",
//!   "obj": "L",
//!   "js": ["https://unpkg.com/leaflet@{vers}/dist/leaflet.js"],
//!   "css": ["https://unpkg.com/leaflet@{vers}/dist/leaflet.css"],
//!   "vers": "1.9.4"
//! }
//! ```

use serde::{Deserialize, Deserializer};
use umbed_host::{BindingPath, ResourceKind};

use crate::url::resolve_url;

/// One declared requirement: resource URLs plus the module and global binding
/// they are expected to provide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DependencyDescriptor {
    /// Module identifier used by module loaders and require hosts.
    #[serde(default, rename = "mod")]
    pub module: Option<String>,

    /// Global binding the dependency is expected to create.
    #[serde(default, rename = "obj")]
    pub binding: Option<BindingPath>,

    /// JS resource URL templates, in load order.
    #[serde(default)]
    pub js: Option<Vec<String>>,

    /// CSS resource URL templates, in load order.
    #[serde(default)]
    pub css: Option<Vec<String>>,

    /// Version substituted into `{vers}` placeholders.
    #[serde(default, rename = "vers", deserialize_with = "version_string")]
    pub version: Option<String>,

    /// Whether the module, loaded as a plain script, exports only through `binding`.
    #[serde(default)]
    pub shim: bool,
}

impl DependencyDescriptor {
    /// Creates an empty descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the module identifier.
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Sets the expected global binding.
    #[must_use]
    pub fn with_binding(mut self, binding: impl Into<String>) -> Self {
        self.binding = Some(BindingPath::new(binding));
        self
    }

    /// Appends a JS URL template.
    #[must_use]
    pub fn with_js(mut self, url: impl Into<String>) -> Self {
        self.js.get_or_insert_with(Vec::new).push(url.into());
        self
    }

    /// Appends a CSS URL template.
    #[must_use]
    pub fn with_css(mut self, url: impl Into<String>) -> Self {
        self.css.get_or_insert_with(Vec::new).push(url.into());
        self
    }

    /// Sets the version substituted into URL templates.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Marks the module as a global-exporting script.
    #[must_use]
    pub fn with_shim(mut self, shim: bool) -> Self {
        self.shim = shim;
        self
    }

    /// Returns `true` if the descriptor declares `js` or `css`.
    #[must_use]
    pub fn has_resources(&self) -> bool {
        self.js.is_some() || self.css.is_some()
    }

    /// Returns the raw URL templates of `kind`.
    #[must_use]
    pub fn templates(&self, kind: ResourceKind) -> &[String] {
        let urls = match kind {
            ResourceKind::Stylesheet => &self.css,
            ResourceKind::Script => &self.js,
        };
        urls.as_deref().unwrap_or_default()
    }

    /// Returns the version-resolved URLs of `kind`, in declaration order.
    pub fn resolved(&self, kind: ResourceKind) -> impl Iterator<Item = String> + '_ {
        self.templates(kind)
            .iter()
            .map(|template| resolve_url(template, self.version.as_deref()))
    }

    /// Returns the module identifier if the dependency can be loaded as a module.
    ///
    /// Only dependencies that declare both a module and JS resources qualify.
    #[must_use]
    pub fn loadable_module(&self) -> Option<&str> {
        match (&self.module, &self.js) {
            (Some(module), Some(_)) => Some(module),
            _ => None,
        }
    }

    /// Returns the binding a shimmed module exports through.
    #[must_use]
    pub fn shim_exports(&self) -> Option<&BindingPath> {
        if self.shim { self.binding.as_ref() } else { None }
    }

    /// Short human-readable label for diagnostics.
    #[must_use]
    pub fn label(&self) -> String {
        if let Some(module) = &self.module {
            return format!("module '{module}'");
        }
        if let Some(binding) = &self.binding {
            return format!("global '{binding}'");
        }
        let first = self
            .templates(ResourceKind::Script)
            .first()
            .or_else(|| self.templates(ResourceKind::Stylesheet).first());
        match first {
            Some(url) => format!("'{url}'"),
            None => "unnamed dependency".to_string(),
        }
    }
}

/// Accepts versions written as strings or bare numbers (`"1.2"` or `1.2`).
fn version_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Version {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Version>::deserialize(deserializer)?.map(|version| match version {
        Version::Text(text) => text,
        Version::Number(number) => number.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_short_keys() {
        let descriptor: DependencyDescriptor = serde_json::from_value(json!({
            "mod": "leaflet",
            "obj": "L",
            "js": ["https://unpkg.com/leaflet@{vers}/dist/leaflet.js"],
            "css": ["https://unpkg.com/leaflet@{vers}/dist/leaflet.css"],
            "vers": "1.9.4",
            "shim": true
        }))
        .unwrap();

        assert_eq!(descriptor.module.as_deref(), Some("leaflet"));
        assert_eq!(descriptor.binding, Some(BindingPath::new("L")));
        assert_eq!(descriptor.version.as_deref(), Some("1.9.4"));
        assert!(descriptor.shim);
    }

    #[test]
    fn numeric_version_is_stringified() {
        let descriptor: DependencyDescriptor =
            serde_json::from_value(json!({ "js": ["/a-{vers}.js"], "vers": 2 })).unwrap();
        assert_eq!(descriptor.version.as_deref(), Some("2"));
    }

    #[test]
    fn resolved_applies_version() {
        let descriptor = DependencyDescriptor::new()
            .with_js("/lib/{vers}/a.js")
            .with_js("/lib/{vers}/b.js")
            .with_version("3.1");

        let urls: Vec<_> = descriptor.resolved(ResourceKind::Script).collect();
        assert_eq!(urls, vec!["/lib/3.1/a.js", "/lib/3.1/b.js"]);
        assert_eq!(descriptor.resolved(ResourceKind::Stylesheet).count(), 0);
    }

    #[test]
    fn loadable_module_requires_js() {
        let css_only = DependencyDescriptor::new().with_module("theme").with_css("/t.css");
        assert_eq!(css_only.loadable_module(), None);

        let module = DependencyDescriptor::new().with_module("lib").with_js("/lib.js");
        assert_eq!(module.loadable_module(), Some("lib"));
    }

    #[test]
    fn shim_exports_requires_flag_and_binding() {
        let descriptor = DependencyDescriptor::new().with_module("draw").with_binding("L.Draw");
        assert_eq!(descriptor.shim_exports(), None);

        let descriptor = descriptor.with_shim(true);
        assert_eq!(descriptor.shim_exports(), Some(&BindingPath::new("L.Draw")));
    }

    #[test]
    fn label_prefers_module_then_binding_then_url() {
        assert_eq!(
            DependencyDescriptor::new().with_module("m").with_binding("B").label(),
            "module 'm'"
        );
        assert_eq!(DependencyDescriptor::new().with_binding("B").label(), "global 'B'");
        assert_eq!(DependencyDescriptor::new().with_css("/a.css").label(), "'/a.css'");
    }
}
