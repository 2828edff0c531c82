use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use jobsearch_logging::{search_debug, search_info, search_warn};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::fetch::{FetchSettings, JobsClient, ReqwestJobsClient};
use crate::timer::DebounceTimer;
use crate::{EngineError, EngineEvent, RequestSeq};

const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

enum EngineCommand {
    Fetch {
        seq: RequestSeq,
        query: Option<String>,
    },
    Cancel {
        seq: RequestSeq,
    },
    ScheduleDebounce {
        generation: u64,
        delay: Duration,
    },
    CancelDebounce,
    Shutdown,
}

type InFlight = Arc<Mutex<HashMap<RequestSeq, CancellationToken>>>;

/// Handle to the engine thread. Cheap to clone; commands are fire-and-forget.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn spawn(
        settings: FetchSettings,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let client = Arc::new(ReqwestJobsClient::new(settings)?);
        Self::spawn_with_client(client)
    }

    pub fn spawn_with_client(
        client: Arc<dyn JobsClient>,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("jobsearch-io")
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("jobsearch-engine".to_string())
            .spawn(move || run_loop(runtime, client, cmd_rx, event_tx))?;

        Ok((Self { cmd_tx }, event_rx))
    }

    /// Starts a fetch; `query: None` fetches the unfiltered corpus.
    pub fn fetch(&self, seq: RequestSeq, query: Option<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Fetch { seq, query });
    }

    pub fn cancel(&self, seq: RequestSeq) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { seq });
    }

    pub fn schedule_debounce(&self, generation: u64, delay: Duration) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::ScheduleDebounce { generation, delay });
    }

    pub fn cancel_debounce(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CancelDebounce);
    }

    /// Cancels all outstanding work and stops the engine thread.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
    }
}

fn run_loop(
    runtime: Runtime,
    client: Arc<dyn JobsClient>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let in_flight: InFlight = Arc::new(Mutex::new(HashMap::new()));
    let mut timer = DebounceTimer::new();
    search_info!("Engine started");

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::Fetch { seq, query } => {
                let token = CancellationToken::new();
                lock(&in_flight).insert(seq, token.clone());
                let client = client.clone();
                let event_tx = event_tx.clone();
                let in_flight = in_flight.clone();
                runtime.spawn(async move {
                    let result = client.fetch_jobs(query.as_deref(), &token).await;
                    lock(&in_flight).remove(&seq);
                    match &result {
                        Ok(payload) => {
                            search_debug!("Fetch seq={} returned {} jobs", seq, payload.jobs.len())
                        }
                        Err(err) if err.is_cancelled() => {
                            search_debug!("Fetch seq={} cancelled", seq)
                        }
                        Err(err) => search_warn!("Fetch seq={} failed: {}", seq, err),
                    }
                    let _ = event_tx.send(EngineEvent::FetchCompleted { seq, result });
                });
            }
            EngineCommand::Cancel { seq } => {
                if let Some(token) = lock(&in_flight).remove(&seq) {
                    search_debug!("Cancelling fetch seq={}", seq);
                    token.cancel();
                }
            }
            EngineCommand::ScheduleDebounce { generation, delay } => {
                timer.schedule(runtime.handle(), generation, delay, event_tx.clone());
            }
            EngineCommand::CancelDebounce => {
                timer.cancel();
            }
            EngineCommand::Shutdown => break,
        }
    }

    timer.cancel();
    for (_, token) in lock(&in_flight).drain() {
        token.cancel();
    }
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    search_info!("Engine stopped");
}

fn lock(
    in_flight: &InFlight,
) -> std::sync::MutexGuard<'_, HashMap<RequestSeq, CancellationToken>> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}
