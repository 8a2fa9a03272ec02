//! One-shot session bootstrap.
//!
//! The sequencer starts in [`BootstrapPhase::Loading`] and settles exactly once
//! per process into `Authenticated` or `Unauthenticated`. Later calls return
//! the first outcome without running again; only explicit login/logout move
//! the phase afterwards.

use std::future::Future;

use serde::Serialize;
use tokio::sync::{OnceCell, watch};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapPhase {
    Loading,
    Authenticated,
    Unauthenticated,
}

impl BootstrapPhase {
    #[must_use]
    pub fn is_settled(self) -> bool {
        !matches!(self, Self::Loading)
    }
}

pub struct BootstrapSequencer {
    once: OnceCell<()>,
    phase: watch::Sender<BootstrapPhase>,
}

impl Default for BootstrapSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl BootstrapSequencer {
    #[must_use]
    pub fn new() -> Self {
        let (phase, _rx) = watch::channel(BootstrapPhase::Loading);
        Self {
            once: OnceCell::new(),
            phase,
        }
    }

    #[must_use]
    pub fn phase(&self) -> BootstrapPhase {
        *self.phase.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<BootstrapPhase> {
        self.phase.subscribe()
    }

    /// Whether the bootstrap routine has already settled.
    #[must_use]
    pub fn has_run(&self) -> bool {
        self.once.initialized()
    }

    /// Run `establish` unless it already ran, and publish its terminal phase.
    ///
    /// Concurrent callers wait for the single in-flight run. Every caller gets
    /// the currently published phase, which a later `settle` may have moved.
    pub async fn run<F, Fut>(&self, establish: F) -> BootstrapPhase
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = BootstrapPhase>,
    {
        self.once
            .get_or_init(|| async move {
                let phase = establish().await;
                self.phase.send_replace(phase);
                info!(?phase, "Bootstrap settled");
            })
            .await;
        self.phase()
    }

    /// Move to a new terminal phase after an explicit login or logout.
    pub fn settle(&self, phase: BootstrapPhase) {
        self.phase.send_replace(phase);
    }

    /// Wait until the phase leaves `Loading`.
    pub async fn settled(&self) -> BootstrapPhase {
        let mut rx = self.phase.subscribe();
        match rx.wait_for(|phase| phase.is_settled()).await {
            Ok(phase) => *phase,
            // The sender lives in `self`, so the channel cannot close here.
            Err(_) => self.phase(),
        }
    }
}
