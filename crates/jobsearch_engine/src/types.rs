use std::time::Duration;

use thiserror::Error;

pub type RequestSeq = u64;

/// A job posting after wire normalisation. Absent fields are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobRecord {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub category: String,
    pub industry: String,
    pub url: String,
    pub source: String,
    pub description: String,
}

/// Server-side analytics, each breakdown ordered by count then name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsRecord {
    pub total_jobs: usize,
    pub jobs_per_company: Vec<(String, usize)>,
    pub jobs_per_type: Vec<(String, usize)>,
    pub jobs_per_location: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobsPayload {
    pub jobs: Vec<JobRecord>,
    pub stats: Option<StatsRecord>,
    pub remote_authoritative: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    FetchCompleted {
        seq: RequestSeq,
        result: Result<JobsPayload, FetchError>,
    },
    DebounceElapsed {
        generation: u64,
        delay: Duration,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == FailureKind::Cancelled
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureKind {
    #[error("invalid url")]
    InvalidUrl,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("response too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
    #[error("undecodable response body")]
    Decode,
    #[error("cancelled")]
    Cancelled,
    #[error("network error")]
    Network,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] FetchError),
}
