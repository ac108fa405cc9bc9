//! Batch injection of stylesheet and script elements.

use umbed_core::Diagnostics;
use umbed_deps::{DependencyDescriptor, DependencyRegistry, PresenceDetector};
use umbed_host::{BindingResolver, Document, ElementSpec, ResourceKind};

use crate::aggregate::CompletionAggregator;
use crate::{LoadOutcome, ResourceOutcome, SkipReason};

/// Builds one head insertion for every resource that still needs loading.
///
/// Dependencies are walked in declaration order, CSS before JS within each
/// dependency. Resources already present (or already queued earlier in the
/// same batch) are skipped, as is the JS of any dependency whose binding
/// already resolves.
pub(crate) struct ResourceInjector<'a> {
    document: &'a dyn Document,
    globals: &'a dyn BindingResolver,
    diagnostics: &'a Diagnostics,
}

impl<'a> ResourceInjector<'a> {
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

    /// Queues every missing resource and inserts them in a single batch.
    ///
    /// With `module_aware` set, JS of dependencies that declare a module is
    /// left to the module loader or require host.
    pub(crate) fn inject(
        &self,
        registry: &DependencyRegistry,
        module_aware: bool,
    ) -> CompletionAggregator {
        let mut presence = PresenceDetector::new(self.document);
        let mut aggregator = CompletionAggregator::new();
        let mut batch: Vec<(usize, ElementSpec)> = Vec::new();

        for dependency in registry {
            self.queue_stylesheets(dependency, &mut presence, &mut aggregator, &mut batch);
            self.queue_scripts(
                dependency,
                module_aware,
                &mut presence,
                &mut aggregator,
                &mut batch,
            );
        }

        if batch.is_empty() {
            self.diagnostics
                .warn("did not insert any elements into document HEAD.");
            return aggregator;
        }

        self.diagnostics.info(format_args!(
            "inserting {} element(s) into document HEAD.",
            batch.len()
        ));
        let (indices, elements): (Vec<usize>, Vec<ElementSpec>) = batch.into_iter().unzip();
        let mut signals = self.document.append_to_head(elements).into_iter();
        for index in indices {
            match signals.next() {
                Some(signal) => aggregator.attach(index, signal),
                None => aggregator.fail(index, "host returned no load notification"),
            }
        }
        self.diagnostics.debug(format_args!(
            "waiting on {} load notification(s).",
            aggregator.outstanding()
        ));
        aggregator
    }

    fn queue_stylesheets(
        &self,
        dependency: &DependencyDescriptor,
        presence: &mut PresenceDetector<'_>,
        aggregator: &mut CompletionAggregator,
        batch: &mut Vec<(usize, ElementSpec)>,
    ) {
        let kind = ResourceKind::Stylesheet;
        for url in dependency.resolved(kind) {
            if presence.has_resource(kind, &url) {
                self.diagnostics.warn(format_args!(
                    "CSS file '{url}' is already present, not injecting it again."
                ));
                aggregator.record(ResourceOutcome::new(kind, url, LoadOutcome::AlreadyPresent));
                continue;
            }

            self.diagnostics
                .debug(format_args!("queueing injected CSS file '{url}'."));
            presence.queue(kind, url.clone());
            let index = aggregator.record(ResourceOutcome::new(kind, url.clone(), LoadOutcome::Pending));
            batch.push((index, ElementSpec::stylesheet(url)));
        }
    }

    fn queue_scripts(
        &self,
        dependency: &DependencyDescriptor,
        module_aware: bool,
        presence: &mut PresenceDetector<'_>,
        aggregator: &mut CompletionAggregator,
        batch: &mut Vec<(usize, ElementSpec)>,
    ) {
        let kind = ResourceKind::Script;

        if let Some(binding) = &dependency.binding
            && binding.is_bound(self.globals)
        {
            if !dependency.templates(kind).is_empty() {
                self.diagnostics.warn(format_args!(
                    "global '{binding}' already exists, skipping JS for {}.",
                    dependency.label()
                ));
            }
            for url in dependency.resolved(kind) {
                aggregator.record(ResourceOutcome::new(
                    kind,
                    url,
                    LoadOutcome::Skipped(SkipReason::BindingPresent),
                ));
            }
            return;
        }

        for url in dependency.resolved(kind) {
            if presence.has_resource(kind, &url) {
                self.diagnostics.error(format_args!(
                    "JS file '{url}' for {} is already present, check for conflicting dependencies.",
                    dependency.label()
                ));
                aggregator.record(ResourceOutcome::new(kind, url, LoadOutcome::AlreadyPresent));
                continue;
            }

            if module_aware && dependency.module.is_some() {
                self.diagnostics.debug(format_args!(
                    "leaving JS file '{url}' to the module loader for {}.",
                    dependency.label()
                ));
                aggregator.record(ResourceOutcome::new(
                    kind,
                    url,
                    LoadOutcome::Skipped(SkipReason::ModuleManaged),
                ));
                continue;
            }

            self.diagnostics
                .debug(format_args!("queueing injected JS file '{url}'."));
            presence.queue(kind, url.clone());
            let index = aggregator.record(ResourceOutcome::new(kind, url.clone(), LoadOutcome::Pending));
            batch.push((index, ElementSpec::script(url)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;
    use umbed_core::LogLevel;
    use umbed_host::HostValue;
    use umbed_host::memory::{MemoryDocument, MemoryGlobals};

    fn quiet() -> Diagnostics {
        Diagnostics::new(LogLevel::None, None::<String>)
    }

    fn registry(list: serde_json::Value) -> DependencyRegistry {
        let mut registry = DependencyRegistry::new();
        registry.register(&list, &quiet());
        registry
    }

    #[test]
    fn css_precedes_js_within_a_dependency() {
        let document = MemoryDocument::new();
        let globals = MemoryGlobals::new();
        let diagnostics = quiet();
        let injector = ResourceInjector::new(&document, &globals, &diagnostics);

        let aggregator = injector.inject(
            &registry(json!([
                { "js": ["/a.js"], "css": ["/a.css"] },
                { "js": ["/b-{vers}.js"], "vers": "2.0" }
            ])),
            false,
        );

        assert_eq!(aggregator.outstanding(), 3);
        assert_eq!(document.insertions(), 1);
        assert_eq!(
            document.inserted(),
            vec![
                ElementSpec::stylesheet("/a.css"),
                ElementSpec::script("/a.js"),
                ElementSpec::script("/b-2.0.js"),
            ]
        );
    }

    #[test]
    fn nothing_queued_means_no_insertion() {
        let document = MemoryDocument::new()
            .with_existing(ResourceKind::Stylesheet, "https://cdn.example.com/a.css");
        let globals = MemoryGlobals::new();
        let diagnostics = quiet();
        let injector = ResourceInjector::new(&document, &globals, &diagnostics);

        let aggregator = injector.inject(&registry(json!([{ "css": ["/a.css"] }])), false);

        assert_eq!(aggregator.outstanding(), 0);
        assert_eq!(document.insertions(), 0);
    }

    #[test]
    fn bound_global_skips_js_but_not_css() {
        let document = MemoryDocument::new();
        let globals = MemoryGlobals::new();
        globals.define("Foo", Arc::new(1_u8) as HostValue);
        let diagnostics = quiet();
        let injector = ResourceInjector::new(&document, &globals, &diagnostics);

        injector.inject(
            &registry(json!([{ "obj": "Foo", "js": ["/foo.js"], "css": ["/foo.css"] }])),
            false,
        );

        assert_eq!(document.inserted(), vec![ElementSpec::stylesheet("/foo.css")]);
    }

    #[test]
    fn same_filename_in_two_dependencies_is_queued_once() {
        let document = MemoryDocument::new();
        let globals = MemoryGlobals::new();
        let diagnostics = quiet();
        let injector = ResourceInjector::new(&document, &globals, &diagnostics);

        injector.inject(
            &registry(json!([
                { "js": ["https://cdn-a.example.com/lib.js"] },
                { "js": ["https://cdn-b.example.com/lib.js"] }
            ])),
            false,
        );

        assert_eq!(
            document.inserted(),
            vec![ElementSpec::script("https://cdn-a.example.com/lib.js")]
        );
    }

    #[test]
    fn module_aware_leaves_module_js_alone() {
        let document = MemoryDocument::new();
        let globals = MemoryGlobals::new();
        let diagnostics = quiet();
        let injector = ResourceInjector::new(&document, &globals, &diagnostics);

        injector.inject(
            &registry(json!([
                { "mod": "leaflet", "js": ["/leaflet.js"], "css": ["/leaflet.css"] },
                { "js": ["/plain.js"] }
            ])),
            true,
        );

        assert_eq!(
            document.inserted(),
            vec![
                ElementSpec::stylesheet("/leaflet.css"),
                ElementSpec::script("/plain.js"),
            ]
        );
    }
}
