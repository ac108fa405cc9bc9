//! Invocation options.
//!
//! [`EmbedOptions`] deserializes from the configuration object embedders
//! already write:
//!
//! ```json
//! {
//!   "container_id": "map",
//!   "container_css": { "width": "50%", "height": "50%" },
//!   "dependencies": [{ "obj": "L", "js": ["https://unpkg.com/leaflet@{vers}/dist/leaflet.js"], "vers": "1.9.4" }],
//!   "log_level": "info",
//!   "log_context": "MapWidget"
//! }
//! ```
//!
//! The `init` callback cannot be expressed in JSON and is attached with
//! [`EmbedOptions::with_init`].

use core::fmt;
use core::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use umbed_core::{Diagnostics, LogLevel};

/// Zero-argument callback invoked once the container is ready.
pub type InitCallback = Box<dyn FnOnce() + Send>;

/// Styling applied to the container element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ContainerCss {
    /// Individual style properties, applied in order.
    ///
    /// String, number and boolean values are applied as text; any other value
    /// skips its property.
    Properties(IndexMap<String, Value>),
    /// Inline style text replacing the container's whole style.
    Text(String),
    /// Anything else. Reported as invalid and otherwise ignored.
    Invalid(Value),
}

/// Options for one [`Loader::embed`](crate::Loader::embed) invocation.
#[derive(Deserialize)]
#[serde(default)]
pub struct EmbedOptions {
    /// Identifier of the element to bind to. Required.
    pub container_id: Option<String>,

    /// Optional container styling.
    pub container_css: Option<ContainerCss>,

    /// Raw dependency descriptors, validated individually at registration.
    pub dependencies: Value,

    /// Diagnostic verbosity threshold.
    pub log_level: LogLevel,

    /// Label attached to every diagnostic. Defaults to `"UMbed"`.
    pub log_context: Option<String>,

    /// Upper bound on the wait for injected resources and module requests.
    ///
    /// Unset by default, in which case a load that never settles keeps the
    /// invocation pending forever.
    pub load_timeout_ms: Option<u64>,

    #[serde(skip)]
    init: Option<InitCallback>,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            container_id: None,
            container_css: None,
            dependencies: Value::Array(Vec::new()),
            log_level: LogLevel::default(),
            log_context: None,
            load_timeout_ms: None,
            init: None,
        }
    }
}

impl fmt::Debug for EmbedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbedOptions")
            .field("container_id", &self.container_id)
            .field("container_css", &self.container_css)
            .field("dependencies", &self.dependencies)
            .field("log_level", &self.log_level)
            .field("log_context", &self.log_context)
            .field("load_timeout_ms", &self.load_timeout_ms)
            .field("init", &self.init.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl EmbedOptions {
    /// Creates options targeting `container_id`.
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: Some(container_id.into()),
            ..Self::default()
        }
    }

    /// Parses options from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns the deserialization error if a known field has the wrong shape.
    /// The error is also logged at error level, honouring `log_level` and
    /// `log_context` when those fields are themselves readable.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        let threshold = value
            .get("log_level")
            .and_then(Value::as_str)
            .and_then(LogLevel::parse)
            .unwrap_or_default();
        let context = value
            .get("log_context")
            .and_then(Value::as_str)
            .map(str::to_owned);
        serde_json::from_value(value).inspect_err(|err| {
            Diagnostics::new(threshold, context)
                .scoped("options")
                .error(format_args!("invalid options: {err}"));
        })
    }

    /// Sets the container styling.
    #[must_use]
    pub fn with_container_css(mut self, css: ContainerCss) -> Self {
        self.container_css = Some(css);
        self
    }

    /// Sets the raw dependency list.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: Value) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Attaches the initialization callback.
    #[must_use]
    pub fn with_init(mut self, init: impl FnOnce() + Send + 'static) -> Self {
        self.init = Some(Box::new(init));
        self
    }

    /// Sets the diagnostic threshold.
    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Sets the diagnostic context label.
    #[must_use]
    pub fn with_log_context(mut self, context: impl Into<String>) -> Self {
        self.log_context = Some(context.into());
        self
    }

    /// Bounds the wait for injected resources and module requests.
    #[must_use]
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Returns the container identifier, treating an empty string as absent.
    #[must_use]
    pub fn container_id(&self) -> Option<&str> {
        self.container_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Returns the configured load timeout.
    #[must_use]
    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_ms.map(Duration::from_millis)
    }

    /// Returns `true` if an `init` callback is attached.
    #[must_use]
    pub fn has_init(&self) -> bool {
        self.init.is_some()
    }

    pub(crate) fn take_init(&mut self) -> Option<InitCallback> {
        self.init.take()
    }
}
