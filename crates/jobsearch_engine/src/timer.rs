use std::sync::mpsc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::EngineEvent;

/// A single pending debounce timer. Scheduling replaces the previous one.
#[derive(Debug, Default)]
pub(crate) struct DebounceTimer {
    pending: Option<CancellationToken>,
}

impl DebounceTimer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn schedule(
        &mut self,
        runtime: &Handle,
        generation: u64,
        delay: Duration,
        event_tx: mpsc::Sender<EngineEvent>,
    ) {
        self.cancel();
        let token = CancellationToken::new();
        self.pending = Some(token.clone());
        runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = event_tx.send(EngineEvent::DebounceElapsed { generation, delay });
                }
            }
        });
    }

    /// Returns whether a timer was pending.
    pub(crate) fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}
