//! Shared helpers for `umbed_loader` integration tests.
//!
//! Import via `mod common;` in test files.

#![allow(
    dead_code,
    missing_docs,
    reason = "shared test utilities, not all items used in every test binary"
)]

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use umbed_host::HostValue;
use umbed_host::memory::{MemoryDocument, MemoryGlobals};
use umbed_loader::{Host, Loader, Strategy};

// ═══════════════════════════════════════════════════════════════════════════════
// HOST FIXTURE
// ═══════════════════════════════════════════════════════════════════════════════

/// In-memory document and globals shared by a test and its loader.
pub struct Fixture {
    pub document: Arc<MemoryDocument>,
    pub globals: Arc<MemoryGlobals>,
}

impl Fixture {
    /// Loads settle only when the test says so.
    pub fn manual() -> Self {
        Self::with_document(MemoryDocument::new())
    }

    /// Loads succeed as soon as they are inserted.
    pub fn auto_load() -> Self {
        Self::with_document(MemoryDocument::auto_load())
    }

    pub fn with_document(document: MemoryDocument) -> Self {
        Self {
            document: Arc::new(document),
            globals: Arc::new(MemoryGlobals::new()),
        }
    }

    /// Defines `binding` as soon as `url` finishes loading.
    pub fn defines_on_load(&self, url: &str, binding: &'static str) {
        let globals = self.globals.clone();
        self.document
            .on_load(url, move || globals.define(binding, Arc::new(()) as HostValue));
    }

    /// Loader using the browser-global strategy.
    pub fn loader(&self) -> Loader {
        self.loader_with(Strategy::Dom)
    }

    pub fn loader_with(&self, strategy: Strategy) -> Loader {
        Loader::new(
            Host::new(self.document.clone(), self.globals.clone()).with_strategy(strategy),
        )
    }
}

/// Returns a call counter and an `init` callback that bumps it.
pub fn init_counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
    let calls = Arc::new(AtomicUsize::new(0));
    let hook = calls.clone();
    (calls, move || {
        hook.fetch_add(1, Ordering::SeqCst);
    })
}

pub fn count(calls: &AtomicUsize) -> usize {
    calls.load(Ordering::SeqCst)
}

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC CAPTURE
// ═══════════════════════════════════════════════════════════════════════════════

/// One captured `tracing` event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
    pub context: Option<String>,
}

/// Events recorded while the capture guard is alive.
#[derive(Clone, Default)]
pub struct Captured {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl Captured {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn at(&self, level: Level) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.level == level)
            .collect()
    }

    pub fn errors(&self) -> Vec<CapturedEvent> {
        self.at(Level::ERROR)
    }
}

struct CaptureLayer(Captured);

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        self.0.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.message,
            context: visitor.context,
        });
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    context: Option<String>,
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "context" {
            self.context = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}

/// Captures events on the current thread until the guard is dropped.
///
/// Use with current-thread tests only.
pub fn capture() -> (Captured, DefaultGuard) {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer(captured.clone()));
    let guard = tracing::subscriber::set_default(subscriber);
    (captured, guard)
}
