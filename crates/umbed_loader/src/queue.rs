//! Queueing shim for invocations made before a loader exists.
//!
//! Embed snippets may run before the loader itself is available. A
//! [`CallQueue`] accepts their options early, and replays them once
//! [`install`](CallQueue::install) supplies a loader: most recent first, each
//! to completion before the next starts. Submissions after installation run
//! immediately.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{EmbedError, EmbedOptions, EmbedReport, Loader};

enum QueueState {
    Waiting(Vec<EmbedOptions>),
    Ready(Arc<Loader>),
}

/// Captures invocations until a [`Loader`] is installed.
pub struct CallQueue {
    state: Mutex<QueueState>,
}

impl Default for CallQueue {
    fn default() -> Self {
        Self {
            state: Mutex::new(QueueState::Waiting(Vec::new())),
        }
    }
}

impl CallQueue {
    /// Creates an empty queue with no loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `options` now if a loader is installed, otherwise queues them.
    ///
    /// Returns `None` when the call was queued.
    pub async fn submit(&self, options: EmbedOptions) -> Option<Result<EmbedReport, EmbedError>> {
        let loader = {
            let mut state = self.state.lock();
            match &mut *state {
                QueueState::Waiting(queued) => {
                    queued.push(options);
                    return None;
                }
                QueueState::Ready(loader) => loader.clone(),
            }
        };
        Some(loader.embed(options).await)
    }

    /// Installs `loader` and replays queued calls, most recent first.
    ///
    /// Results are returned in replay order. Installing again replaces the
    /// loader for later submissions; nothing is replayed twice.
    pub async fn install(&self, loader: Arc<Loader>) -> Vec<Result<EmbedReport, EmbedError>> {
        let queued = {
            let mut state = self.state.lock();
            match core::mem::replace(&mut *state, QueueState::Ready(loader.clone())) {
                QueueState::Waiting(queued) => queued,
                QueueState::Ready(_) => Vec::new(),
            }
        };

        let mut results = Vec::with_capacity(queued.len());
        for options in queued.into_iter().rev() {
            results.push(loader.embed(options).await);
        }
        results
    }

    /// Number of calls waiting for a loader.
    #[must_use]
    pub fn queued(&self) -> usize {
        match &*self.state.lock() {
            QueueState::Waiting(queued) => queued.len(),
            QueueState::Ready(_) => 0,
        }
    }

    /// Returns `true` once a loader is installed.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        matches!(&*self.state.lock(), QueueState::Ready(_))
    }
}
