//! Completion aggregation for injected resources.
//!
//! The aggregate succeeds only once every attached load signal has settled
//! successfully. Any single failure fails the aggregate, but the remaining
//! signals are still drained so the failure can report every resource's
//! outcome. Completion order across resources is not controlled here.

use core::time::Duration;

use futures::FutureExt;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use umbed_core::Diagnostics;
use umbed_host::LoadSignal;

use crate::{LoadFailure, LoadOutcome, ResourceOutcome};

/// Outcomes in declaration order plus the signals still outstanding.
#[derive(Default)]
pub(crate) struct CompletionAggregator {
    resources: Vec<ResourceOutcome>,
    signals: Vec<(usize, LoadSignal)>,
}

impl CompletionAggregator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records a resource outcome and returns its position.
    pub(crate) fn record(&mut self, resource: ResourceOutcome) -> usize {
        self.resources.push(resource);
        self.resources.len() - 1
    }

    /// Ties a load signal to the resource recorded at `index`.
    pub(crate) fn attach(&mut self, index: usize, signal: LoadSignal) {
        self.signals.push((index, signal));
    }

    /// Marks the resource at `index` as failed without waiting.
    pub(crate) fn fail(&mut self, index: usize, reason: impl Into<String>) {
        if let Some(resource) = self.resources.get_mut(index) {
            resource.outcome = LoadOutcome::Failed(reason.into());
        }
    }

    /// Number of signals that will be awaited.
    pub(crate) fn outstanding(&self) -> usize {
        self.signals.len()
    }

    /// Waits for every attached signal, bounded by `timeout` when set.
    pub(crate) async fn settle(
        self,
        timeout: Option<Duration>,
        diagnostics: &Diagnostics,
    ) -> Result<Vec<ResourceOutcome>, LoadFailure> {
        let Self {
            mut resources,
            signals,
        } = self;
        let waited = !signals.is_empty();

        let mut pending: FuturesUnordered<_> = signals
            .into_iter()
            .map(|(index, signal)| signal.map(move |result| (index, result)))
            .collect();

        let drain = async {
            while let Some((index, result)) = pending.next().await {
                let Some(resource) = resources.get_mut(index) else {
                    continue;
                };
                match result {
                    Ok(()) => {
                        diagnostics.info(format_args!(
                            "browser has completed loading injected {} file '{}'.",
                            resource.kind, resource.url
                        ));
                        resource.outcome = LoadOutcome::Loaded;
                    }
                    Err(err) => {
                        diagnostics.warn(format_args!(
                            "injected {} file '{}' failed to load: {err}",
                            resource.kind, resource.url
                        ));
                        resource.outcome = LoadOutcome::Failed(err.to_string());
                    }
                }
            }
        };

        let timed_out = match timeout {
            Some(limit) => tokio::time::timeout(limit, drain).await.is_err().then_some(limit),
            None => {
                drain.await;
                None
            }
        };

        let failed = resources
            .iter()
            .any(|resource| resource.outcome.is_failed() || resource.outcome.is_pending());
        if failed {
            return Err(LoadFailure {
                resources,
                timed_out,
            });
        }

        if waited {
            diagnostics.info("all injected CSS/JS files loaded successfully.");
        }
        Ok(resources)
    }
}
