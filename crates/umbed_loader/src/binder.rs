//! Container validation, styling, binding verification and `init`.

use serde_json::Value;
use umbed_core::Diagnostics;
use umbed_deps::DependencyRegistry;
use umbed_host::{BindingResolver, Document, Element};

use crate::{ContainerCss, EmbedError, InitCallback};

/// Final step of an invocation, run once dependencies are ready.
///
/// Each step stops the invocation on failure, except invalid styling which is
/// reported and skipped.
pub(crate) struct ContainerBinder<'a> {
    document: &'a dyn Document,
    globals: &'a dyn BindingResolver,
    diagnostics: &'a Diagnostics,
}

impl<'a> ContainerBinder<'a> {
    pub(crate) fn new(
        document: &'a dyn Document,
        globals: &'a dyn BindingResolver,
        diagnostics: &'a Diagnostics,
    ) -> Self {
        Self {
            document,
            globals,
            diagnostics,
        }
    }

    /// Binds to the container and runs `init`. Returns whether `init` ran.
    pub(crate) fn bind(
        &self,
        container_id: Option<&str>,
        css: Option<&ContainerCss>,
        registry: &DependencyRegistry,
        init: Option<InitCallback>,
    ) -> Result<bool, EmbedError> {
        let id = container_id.ok_or(EmbedError::MissingContainerId)?;
        let container = self
            .document
            .element_by_id(id)
            .ok_or_else(|| EmbedError::ContainerNotFound(id.to_string()))?;

        if let Some(css) = css {
            self.apply_css(container.as_ref(), css);
        }

        self.verify_bindings(registry)?;

        let Some(init) = init else {
            return Ok(false);
        };
        self.diagnostics.info("calling init...");
        init();
        Ok(true)
    }

    fn apply_css(&self, container: &dyn Element, css: &ContainerCss) {
        match css {
            ContainerCss::Properties(properties) => {
                for (name, value) in properties {
                    match value {
                        Value::String(text) => container.set_style_property(name, text),
                        Value::Number(_) | Value::Bool(_) => {
                            container.set_style_property(name, &value.to_string());
                        }
                        _ => self.diagnostics.error(format_args!(
                            "invalid container_css value for '{name}': {value}"
                        )),
                    }
                }
            }
            ContainerCss::Text(text) => container.replace_style(text),
            ContainerCss::Invalid(value) => {
                self.diagnostics
                    .error(format_args!("invalid container_css value: {value}"));
            }
        }
    }

    fn verify_bindings(&self, registry: &DependencyRegistry) -> Result<(), EmbedError> {
        let missing: Vec<String> = registry
            .iter()
            .filter_map(|dependency| dependency.binding.as_ref())
            .filter(|binding| !binding.is_bound(self.globals))
            .map(ToString::to_string)
            .collect();

        for binding in &missing {
            self.diagnostics
                .error(format_args!("couldn't find required global '{binding}'."));
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(EmbedError::MissingBindings(missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use indexmap::IndexMap;
    use serde_json::json;
    use umbed_core::LogLevel;
    use umbed_host::HostValue;
    use umbed_host::memory::{MemoryDocument, MemoryGlobals};

    fn quiet() -> Diagnostics {
        Diagnostics::new(LogLevel::None, None::<String>)
    }

    fn counter() -> (Arc<AtomicUsize>, InitCallback) {
        let calls = Arc::new(AtomicUsize::new(0));
        let hook = calls.clone();
        (
            calls,
            Box::new(move || {
                hook.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    #[test]
    fn missing_container_stops_before_init() {
        let document = MemoryDocument::new();
        let globals = MemoryGlobals::new();
        let diagnostics = quiet();
        let binder = ContainerBinder::new(&document, &globals, &diagnostics);
        let (calls, init) = counter();

        let result = binder.bind(Some("x"), None, &DependencyRegistry::new(), Some(init));

        assert!(matches!(result, Err(EmbedError::ContainerNotFound(id)) if id == "x"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn property_map_is_applied_in_order() {
        let document = MemoryDocument::new();
        let element = document.add_element("x");
        let globals = MemoryGlobals::new();
        let diagnostics = quiet();
        let binder = ContainerBinder::new(&document, &globals, &diagnostics);

        let mut properties = IndexMap::new();
        properties.insert("width".to_string(), json!("50%"));
        properties.insert("height".to_string(), json!("50%"));
        let css = ContainerCss::Properties(properties);

        let ran = binder
            .bind(Some("x"), Some(&css), &DependencyRegistry::new(), None)
            .unwrap();

        assert!(!ran);
        assert_eq!(element.style_text(), "width: 50%; height: 50%;");
    }

    #[test]
    fn scalar_values_apply_and_others_are_skipped() {
        let document = MemoryDocument::new();
        let element = document.add_element("x");
        let globals = MemoryGlobals::new();
        let diagnostics = quiet();
        let binder = ContainerBinder::new(&document, &globals, &diagnostics);

        let mut properties = IndexMap::new();
        properties.insert("width".to_string(), json!("50%"));
        properties.insert("z-index".to_string(), json!(5));
        properties.insert("margin".to_string(), json!({ "top": 1 }));
        properties.insert("opacity".to_string(), json!(0.5));
        let css = ContainerCss::Properties(properties);

        binder
            .bind(Some("x"), Some(&css), &DependencyRegistry::new(), None)
            .unwrap();

        assert_eq!(element.style("width").as_deref(), Some("50%"));
        assert_eq!(element.style("z-index").as_deref(), Some("5"));
        assert_eq!(element.style("opacity").as_deref(), Some("0.5"));
        assert_eq!(element.style("margin"), None);
    }

    #[test]
    fn invalid_css_does_not_block_init() {
        let document = MemoryDocument::new();
        document.add_element("x");
        let globals = MemoryGlobals::new();
        let diagnostics = quiet();
        let binder = ContainerBinder::new(&document, &globals, &diagnostics);
        let (calls, init) = counter();

        let css = ContainerCss::Invalid(json!(42));
        let ran = binder
            .bind(Some("x"), Some(&css), &DependencyRegistry::new(), Some(init))
            .unwrap();

        assert!(ran);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn every_missing_binding_is_reported() {
        let document = MemoryDocument::new();
        document.add_element("x");
        let globals = MemoryGlobals::new();
        globals.define("L", Arc::new(0_u8) as HostValue);
        let diagnostics = quiet();
        let binder = ContainerBinder::new(&document, &globals, &diagnostics);
        let (calls, init) = counter();

        let mut registry = DependencyRegistry::new();
        registry.register(
            &json!([
                { "obj": "L", "js": ["/l.js"] },
                { "obj": "L.Draw", "js": ["/draw.js"] },
                { "obj": "Other", "css": ["/o.css"] }
            ]),
            &diagnostics,
        );

        let result = binder.bind(Some("x"), None, &registry, Some(init));

        let Err(EmbedError::MissingBindings(missing)) = result else {
            panic!("expected missing bindings");
        };
        assert_eq!(missing, ["L.Draw", "Other"]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
