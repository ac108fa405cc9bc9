//! The loader entry point.

use std::sync::Arc;

use tracing::Instrument;
use umbed_core::{Clock, Diagnostics, Timings};
use umbed_deps::DependencyRegistry;
use umbed_host::{BindingResolver, CapabilityProbe, Document};

use crate::binder::ContainerBinder;
use crate::strategy::LoadContext;
use crate::{EmbedError, EmbedOptions, EmbedReport, Strategy};

/// Host collaborators shared by every invocation of a [`Loader`].
#[derive(Clone)]
pub struct Host {
    document: Arc<dyn Document>,
    globals: Arc<dyn BindingResolver>,
    strategy: Strategy,
}

impl Host {
    /// Creates a host using the browser-global strategy.
    pub fn new(document: Arc<dyn Document>, globals: Arc<dyn BindingResolver>) -> Self {
        Self {
            document,
            globals,
            strategy: Strategy::Dom,
        }
    }

    /// Uses `strategy` for every invocation.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Uses the highest-priority strategy `probe` reports.
    #[must_use]
    pub fn detect(self, probe: &dyn CapabilityProbe) -> Self {
        self.with_strategy(Strategy::detect(probe))
    }

    /// Returns the selected strategy.
    #[must_use]
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }
}

/// Loads dependencies, binds to a container and runs `init`.
///
/// A loader holds no per-invocation state; the same loader may run any number
/// of invocations, including concurrently.
pub struct Loader {
    host: Host,
    clock: Clock,
}

impl Loader {
    /// Creates a loader over `host`.
    #[must_use]
    pub fn new(host: Host) -> Self {
        Self {
            host,
            clock: Clock::system(),
        }
    }

    /// Replaces the clock used for timing spans.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the host collaborators.
    #[must_use]
    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Runs one invocation.
    ///
    /// Either every dependency becomes ready, the container is validated and
    /// `init` (if any) is called exactly once, or `init` is never called and
    /// the returned error explains why. The error has already been logged at
    /// error level when this returns.
    ///
    /// # Errors
    ///
    /// See [`EmbedError`].
    pub async fn embed(&self, mut options: EmbedOptions) -> Result<EmbedReport, EmbedError> {
        let diagnostics = Diagnostics::new(options.log_level, options.log_context.clone());
        let span = tracing::info_span!(
            "umbed.embed",
            context = diagnostics.context(),
            strategy = %self.host.strategy.kind()
        );

        let result = self.run(&mut options, &diagnostics).instrument(span).await;
        if let Err(err) = &result {
            diagnostics.error(err);
        }
        result
    }

    async fn run(
        &self,
        options: &mut EmbedOptions,
        diagnostics: &Diagnostics,
    ) -> Result<EmbedReport, EmbedError> {
        let timings = Timings::new(self.clock.clone());
        timings.start("embed");

        let init = options.take_init();
        // Checked before anything touches the document.
        if options.container_id().is_none() {
            return Err(EmbedError::MissingContainerId);
        }

        let mut registry = DependencyRegistry::new();
        let accepted = registry.register(&options.dependencies, &diagnostics.scoped("register"));
        diagnostics.debug(format_args!("registered {accepted} dependencies."));

        timings.start("dependencies");
        let cx = LoadContext {
            document: self.host.document.as_ref(),
            globals: self.host.globals.as_ref(),
            registry: &registry,
            diagnostics,
            timeout: options.load_timeout(),
        };
        let resources = self.host.strategy.load(&cx).await?;
        if let Some(elapsed) = timings.stop("dependencies") {
            diagnostics.debug(format_args!("dependencies ready after {elapsed:?}."));
        }

        let binder = ContainerBinder::new(
            self.host.document.as_ref(),
            self.host.globals.as_ref(),
            diagnostics,
        );
        let init_invoked = binder.bind(
            options.container_id(),
            options.container_css.as_ref(),
            &registry,
            init,
        )?;
        let elapsed = timings.stop("embed");
        if let Some(elapsed) = elapsed {
            diagnostics.debug(format_args!("embed finished after {elapsed:?}."));
        }

        Ok(EmbedReport {
            strategy: self.host.strategy.kind(),
            resources,
            init_invoked,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;
    use std::time::Instant;

    use serde_json::json;
    use umbed_core::MockClock;
    use umbed_host::memory::{MemoryDocument, MemoryGlobals};
    use umbed_host::{HostValue, StaticProbe};

    use crate::StrategyKind;

    fn host() -> (Arc<MemoryDocument>, Arc<MemoryGlobals>, Host) {
        let document = Arc::new(MemoryDocument::auto_load());
        let globals = Arc::new(MemoryGlobals::new());
        let host = Host::new(document.clone(), globals.clone());
        (document, globals, host)
    }

    #[test]
    fn new_host_uses_browser_globals() {
        let (_, _, host) = host();
        assert_eq!(host.strategy().kind(), StrategyKind::Dom);
        assert_eq!(
            host.detect(&StaticProbe::default()).strategy().kind(),
            StrategyKind::Dom
        );
    }

    #[test]
    fn report_measures_time_until_init_returns() {
        let (document, _, host) = host();
        document.add_element("x");
        let mock = Arc::new(MockClock::new(Instant::now()));
        let loader = Loader::new(host).with_clock(Clock::with_provider(mock.clone()));

        let advance = mock.clone();
        let options = EmbedOptions::new("x")
            .with_init(move || advance.advance(Duration::from_millis(40)));
        let report = futures::executor::block_on(loader.embed(options)).unwrap();

        assert!(report.init_invoked);
        assert_eq!(report.elapsed, Some(Duration::from_millis(40)));
    }

    #[test]
    fn unregistered_entries_do_not_reach_the_binder() {
        let (document, globals, host) = host();
        document.add_element("x");
        globals.define("Ready", Arc::new(()) as HostValue);
        let loader = Loader::new(host);

        let options = EmbedOptions::new("x")
            .with_dependencies(json!([{ "obj": "Missing" }, { "obj": "Ready", "css": ["/r.css"] }]));
        let report = futures::executor::block_on(loader.embed(options)).unwrap();

        assert_eq!(report.resources.len(), 1);
    }
}
