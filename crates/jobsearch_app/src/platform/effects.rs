use std::sync::mpsc;
use std::thread;

use jobsearch_core::{
    DebounceTicket, Effect, FetchOutcome, JobPosting, Msg, RemoteJobs, Stats,
};
use jobsearch_engine::{
    EngineError, EngineEvent, EngineHandle, JobRecord, JobsPayload, StatsRecord,
};
use jobsearch_logging::{search_debug, search_info};

use super::config::AppConfig;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: &AppConfig, msg_tx: mpsc::Sender<Msg>) -> Result<Self, EngineError> {
        let (engine, events) = EngineHandle::spawn(config.fetch_settings())?;
        spawn_event_forwarder(events, msg_tx);
        Ok(Self { engine })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchJobs(request) => {
                    if request.is_master() {
                        search_info!("FetchJobs seq={} (master list)", request.seq);
                    } else {
                        search_info!(
                            "FetchJobs seq={} keyword={:?}",
                            request.seq,
                            request.keyword
                        );
                    }
                    self.engine.fetch(request.seq, request.keyword);
                }
                Effect::CancelFetch { seq } => {
                    search_debug!("CancelFetch seq={}", seq);
                    self.engine.cancel(seq);
                }
                Effect::ScheduleDebounce(ticket) => {
                    self.engine
                        .schedule_debounce(ticket.generation, ticket.delay);
                }
                Effect::CancelDebounce => self.engine.cancel_debounce(),
            }
        }
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }
}

fn spawn_event_forwarder(events: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Ok(event) = events.recv() {
            if msg_tx.send(map_event(event)).is_err() {
                break;
            }
        }
    });
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::FetchCompleted { seq, result } => {
            let outcome = match result {
                Ok(payload) => FetchOutcome::Loaded(map_payload(payload)),
                Err(err) if err.is_cancelled() => FetchOutcome::Cancelled,
                Err(err) => FetchOutcome::Failed(err.to_string()),
            };
            Msg::FetchCompleted { seq, outcome }
        }
        EngineEvent::DebounceElapsed { generation, delay } => Msg::DebounceElapsed {
            ticket: DebounceTicket { generation, delay },
        },
    }
}

fn map_payload(payload: JobsPayload) -> RemoteJobs {
    RemoteJobs {
        jobs: payload.jobs.into_iter().map(map_job).collect(),
        stats: payload.stats.map(map_stats),
        remote_authoritative: payload.remote_authoritative,
    }
}

fn map_job(job: JobRecord) -> JobPosting {
    JobPosting {
        id: job.id,
        title: job.title,
        company: job.company,
        location: job.location,
        category: job.category,
        industry: job.industry,
        url: job.url,
        source: job.source,
        description: job.description,
    }
}

fn map_stats(stats: StatsRecord) -> Stats {
    Stats {
        total_jobs: stats.total_jobs,
        jobs_per_company: stats.jobs_per_company,
        jobs_per_type: stats.jobs_per_type,
        jobs_per_location: stats.jobs_per_location,
    }
}
