//! In-memory host implementations for tests.
//!
//! - [`MemoryDocument`] - records head insertions and lets tests settle loads by URL
//! - [`MemoryGlobals`] - nested global namespace built from [`MemoryObject`]s
//! - [`MemoryModuleLoader`] / [`MemoryRequire`] - canned module values
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use umbed_host::{Document, ElementSpec, HostValue};
//! use umbed_host::memory::{MemoryDocument, MemoryGlobals};
//!
//! let document = MemoryDocument::new();
//! let globals = Arc::new(MemoryGlobals::new());
//!
//! let hook_globals = globals.clone();
//! document.on_load("/a.js", move || hook_globals.define("Foo", Arc::new(1_u8) as HostValue));
//!
//! let _signals = document.append_to_head(vec![ElementSpec::script("/a.js")]);
//! assert!(globals.get("Foo").is_none());
//!
//! document.complete("/a.js");
//! assert!(globals.get("Foo").is_some());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::{
    BindingPath, BindingResolver, Document, Element, ElementSpec, HostError, HostValue,
    LoadSignal, ModuleConfig, ModuleLoader, RequireHost, ResourceKind,
};

type LoadHook = Box<dyn FnOnce() + Send>;
type LoadSender = oneshot::Sender<Result<(), HostError>>;

// ─────────────────────────────────────────────────────────────────────────────
// MemoryDocument
// ─────────────────────────────────────────────────────────────────────────────

/// Document fake with manually settled load signals.
///
/// Loads stay pending until [`complete`](Self::complete) or
/// [`fail`](Self::fail) is called for their URL, unless the document was
/// created with [`auto_load`](Self::auto_load).
#[derive(Default)]
pub struct MemoryDocument {
    state: Mutex<DocumentState>,
}

#[derive(Default)]
struct DocumentState {
    head: Vec<ElementSpec>,
    inserted: Vec<ElementSpec>,
    batches: usize,
    elements: HashMap<String, Arc<MemoryElement>>,
    waiting: HashMap<String, Vec<LoadSender>>,
    hooks: HashMap<String, Vec<LoadHook>>,
    auto_load: bool,
}

impl MemoryDocument {
    /// Creates an empty document whose loads settle manually.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty document whose loads succeed as soon as they are inserted.
    #[must_use]
    pub fn auto_load() -> Self {
        let document = Self::default();
        document.state.lock().auto_load = true;
        document
    }

    /// Adds a pre-existing element of `kind` (not counted as an insertion).
    pub fn with_existing(self, kind: ResourceKind, url: impl Into<String>) -> Self {
        let url = url.into();
        let spec = match kind {
            ResourceKind::Stylesheet => ElementSpec::stylesheet(url),
            ResourceKind::Script => ElementSpec::script(url),
        };
        self.state.lock().head.push(spec);
        self
    }

    /// Adds an addressable element and returns it.
    pub fn add_element(&self, id: impl Into<String>) -> Arc<MemoryElement> {
        let element = Arc::new(MemoryElement::default());
        self.state.lock().elements.insert(id.into(), element.clone());
        element
    }

    /// Registers `hook` to run when the resource at `url` finishes loading,
    /// before its load signal settles.
    pub fn on_load(&self, url: impl Into<String>, hook: impl FnOnce() + Send + 'static) {
        self.state
            .lock()
            .hooks
            .entry(url.into())
            .or_default()
            .push(Box::new(hook));
    }

    /// Reports every pending load of `url` as successful.
    ///
    /// Returns `false` if nothing was waiting on `url`.
    pub fn complete(&self, url: &str) -> bool {
        self.settle(url, Ok(()))
    }

    /// Reports every pending load of `url` as failed.
    pub fn fail(&self, url: &str, reason: &str) -> bool {
        self.settle(url, Err(HostError::load_failed(url, reason)))
    }

    /// Completes every pending load.
    pub fn complete_all(&self) {
        let urls: Vec<String> = self.state.lock().waiting.keys().cloned().collect();
        for url in urls {
            self.complete(&url);
        }
    }

    /// Number of head mutations performed so far.
    #[must_use]
    pub fn insertions(&self) -> usize {
        self.state.lock().batches
    }

    /// Every element inserted by [`Document::append_to_head`], in order.
    #[must_use]
    pub fn inserted(&self) -> Vec<ElementSpec> {
        self.state.lock().inserted.clone()
    }

    /// URLs with loads that have not settled yet.
    #[must_use]
    pub fn pending(&self) -> Vec<String> {
        self.state.lock().waiting.keys().cloned().collect()
    }

    fn settle(&self, url: &str, result: Result<(), HostError>) -> bool {
        let (senders, hooks) = {
            let mut state = self.state.lock();
            let senders = state.waiting.remove(url).unwrap_or_default();
            let hooks = if result.is_ok() {
                state.hooks.remove(url).unwrap_or_default()
            } else {
                Vec::new()
            };
            (senders, hooks)
        };

        for hook in hooks {
            hook();
        }
        let settled = !senders.is_empty();
        for sender in senders {
            sender.send(result.clone()).ok();
        }
        settled
    }
}

impl Document for MemoryDocument {
    fn sources(&self, kind: ResourceKind) -> Vec<String> {
        self.state
            .lock()
            .head
            .iter()
            .filter(|spec| spec.kind() == kind)
            .map(|spec| spec.url().to_string())
            .collect()
    }

    fn append_to_head(&self, batch: Vec<ElementSpec>) -> Vec<LoadSignal> {
        let mut signals = Vec::with_capacity(batch.len());
        let mut ready = Vec::new();
        let auto_load = {
            let mut state = self.state.lock();
            state.batches += 1;
            for spec in batch {
                let url = spec.url().to_string();
                let (sender, receiver) = oneshot::channel();
                state.head.push(spec.clone());
                state.inserted.push(spec);
                state.waiting.entry(url.clone()).or_default().push(sender);
                signals.push(
                    receiver
                        .map(move |settled| settled.unwrap_or(Err(HostError::Abandoned { url })))
                        .boxed(),
                );
            }
            if state.auto_load {
                ready = state.waiting.keys().cloned().collect();
            }
            state.auto_load
        };

        if auto_load {
            for url in ready {
                self.complete(&url);
            }
        }
        signals
    }

    fn element_by_id(&self, id: &str) -> Option<Arc<dyn Element>> {
        self.state
            .lock()
            .elements
            .get(id)
            .map(|element| element.clone() as Arc<dyn Element>)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MemoryElement
// ─────────────────────────────────────────────────────────────────────────────

/// Container element fake holding an ordered inline style.
#[derive(Debug, Default)]
pub struct MemoryElement {
    style: Mutex<IndexMap<String, String>>,
}

impl MemoryElement {
    /// Returns one inline style property.
    #[must_use]
    pub fn style(&self, name: &str) -> Option<String> {
        self.style.lock().get(name).cloned()
    }

    /// Renders the inline style as `name: value;` pairs.
    #[must_use]
    pub fn style_text(&self) -> String {
        self.style
            .lock()
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Element for MemoryElement {
    fn set_style_property(&self, name: &str, value: &str) {
        self.style.lock().insert(name.to_string(), value.to_string());
    }

    fn replace_style(&self, style_text: &str) {
        let mut style = self.style.lock();
        style.clear();
        for declaration in style_text.split(';') {
            if let Some((name, value)) = declaration.split_once(':') {
                let name = name.trim();
                if !name.is_empty() {
                    style.insert(name.to_string(), value.trim().to_string());
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MemoryGlobals
// ─────────────────────────────────────────────────────────────────────────────

/// Plain object in the memory global namespace.
#[derive(Debug, Default)]
pub struct MemoryObject {
    properties: Mutex<IndexMap<String, HostValue>>,
}

impl MemoryObject {
    /// Reads a property.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<HostValue> {
        self.properties.lock().get(name).cloned()
    }

    /// Writes a property.
    pub fn set(&self, name: impl Into<String>, value: HostValue) {
        self.properties.lock().insert(name.into(), value);
    }
}

/// Global namespace fake.
///
/// Intermediate objects along a defined path are created as [`MemoryObject`]s.
pub struct MemoryGlobals {
    root: HostValue,
    assignments: Mutex<Vec<String>>,
}

impl Default for MemoryGlobals {
    fn default() -> Self {
        Self {
            root: Arc::new(MemoryObject::default()),
            assignments: Mutex::new(Vec::new()),
        }
    }
}

impl MemoryGlobals {
    /// Creates an empty namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines `value` at the dotted `path`, creating intermediate objects.
    pub fn define(&self, path: &str, value: HostValue) {
        let segments: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut current = self.root.clone();
        for name in parents {
            let Some(object) = (*current).downcast_ref::<MemoryObject>() else {
                return;
            };
            let next = match object.get(name) {
                Some(existing) if (*existing).is::<MemoryObject>() => existing,
                _ => {
                    let child: HostValue = Arc::new(MemoryObject::default());
                    object.set(*name, child.clone());
                    child
                }
            };
            current = next;
        }

        if let Some(object) = (*current).downcast_ref::<MemoryObject>() {
            object.set(*last, value);
        }
    }

    /// Reads the value at the dotted `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<HostValue> {
        BindingPath::new(path).resolve(self)
    }

    /// Paths written through [`BindingResolver::assign`], in order.
    #[must_use]
    pub fn assignments(&self) -> Vec<String> {
        self.assignments.lock().clone()
    }
}

impl BindingResolver for MemoryGlobals {
    fn property(&self, parent: Option<&HostValue>, name: &str) -> Option<HostValue> {
        let parent = parent.unwrap_or(&self.root);
        (**parent).downcast_ref::<MemoryObject>()?.get(name)
    }

    fn assign(&self, path: &BindingPath, value: HostValue) {
        self.assignments.lock().push(path.to_string());
        self.define(path.as_str(), value);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MemoryModuleLoader / MemoryRequire
// ─────────────────────────────────────────────────────────────────────────────

/// Module loader fake resolving from a fixed module table.
#[derive(Default)]
pub struct MemoryModuleLoader {
    modules: IndexMap<String, HostValue>,
    configs: Mutex<Vec<ModuleConfig>>,
    requests: Mutex<Vec<Vec<String>>>,
}

impl MemoryModuleLoader {
    /// Creates a loader with no modules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resolvable module.
    #[must_use]
    pub fn with_module(mut self, name: impl Into<String>, value: HostValue) -> Self {
        self.modules.insert(name.into(), value);
        self
    }

    /// Configurations received, in order.
    #[must_use]
    pub fn configs(&self) -> Vec<ModuleConfig> {
        self.configs.lock().clone()
    }

    /// Module sets requested, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().clone()
    }
}

impl ModuleLoader for MemoryModuleLoader {
    fn configure(&self, config: &ModuleConfig) {
        self.configs.lock().push(config.clone());
    }

    fn request(&self, modules: Vec<String>) -> BoxFuture<'static, Result<Vec<HostValue>, HostError>> {
        self.requests.lock().push(modules.clone());
        let resolved = modules
            .iter()
            .map(|name| {
                self.modules
                    .get(name)
                    .cloned()
                    .ok_or_else(|| HostError::ModuleRequest(format!("no module named '{name}'")))
            })
            .collect::<Result<Vec<_>, _>>();
        futures::future::ready(resolved).boxed()
    }
}

/// Require host fake resolving from a fixed path table.
#[derive(Default)]
pub struct MemoryRequire {
    paths: IndexMap<String, HostValue>,
    calls: Mutex<Vec<String>>,
}

impl MemoryRequire {
    /// Creates a host with no resolvable paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resolvable path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>, value: HostValue) -> Self {
        self.paths.insert(path.into(), value);
        self
    }

    /// Paths required so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl RequireHost for MemoryRequire {
    fn require(&self, path: &str) -> Result<HostValue, HostError> {
        self.calls.lock().push(path.to_string());
        self.paths
            .get(path)
            .cloned()
            .ok_or_else(|| HostError::require(path, "cannot find module"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_signal_settles_after_complete() {
        let document = MemoryDocument::new();
        let mut signals = document.append_to_head(vec![ElementSpec::script("/a.js")]);
        assert_eq!(document.pending(), vec!["/a.js".to_string()]);

        assert!(document.complete("/a.js"));
        assert_eq!(signals.remove(0).await, Ok(()));
        assert!(document.pending().is_empty());
    }

    #[tokio::test]
    async fn failed_load_skips_hooks() {
        let document = MemoryDocument::new();
        let globals = Arc::new(MemoryGlobals::new());
        let hook_globals = globals.clone();
        document.on_load("/a.js", move || hook_globals.define("Foo", Arc::new(()) as HostValue));

        let mut signals = document.append_to_head(vec![ElementSpec::script("/a.js")]);
        document.fail("/a.js", "404");

        assert!(matches!(signals.remove(0).await, Err(HostError::LoadFailed { .. })));
        assert!(globals.get("Foo").is_none());
    }

    #[test]
    fn existing_elements_are_listed_but_not_counted() {
        let document = MemoryDocument::new()
            .with_existing(ResourceKind::Script, "https://cdn.example.com/lib.js")
            .with_existing(ResourceKind::Stylesheet, "https://cdn.example.com/lib.css");

        assert_eq!(
            document.sources(ResourceKind::Script),
            vec!["https://cdn.example.com/lib.js".to_string()]
        );
        assert_eq!(document.insertions(), 0);
    }

    #[test]
    fn globals_define_creates_intermediate_objects() {
        let globals = MemoryGlobals::new();
        globals.define("L.Control.Draw", Arc::new(7_u32) as HostValue);

        assert!(globals.get("L").is_some());
        assert!(globals.get("L.Control").is_some());
        let value = globals.get("L.Control.Draw").unwrap();
        assert_eq!(value.downcast_ref::<u32>(), Some(&7));
    }

    #[test]
    fn element_replace_style_parses_declarations() {
        let element = MemoryElement::default();
        element.set_style_property("color", "red");
        element.replace_style("width: 50%; height: 50%;");

        assert_eq!(element.style("color"), None);
        assert_eq!(element.style_text(), "width: 50%; height: 50%;");
    }

    #[tokio::test]
    async fn module_loader_reports_unknown_module() {
        let loader = MemoryModuleLoader::new().with_module("a", Arc::new(()) as HostValue);
        let result = loader.request(vec!["a".to_string(), "b".to_string()]).await;

        assert!(matches!(result, Err(HostError::ModuleRequest(_))));
        assert_eq!(loader.requests().len(), 1);
    }
}
