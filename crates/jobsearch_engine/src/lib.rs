//! Jobsearch engine: remote job queries and effect execution.
mod engine;
mod fetch;
mod timer;
mod types;
mod wire;

pub use engine::EngineHandle;
pub use fetch::{FetchSettings, JobsClient, ReqwestJobsClient};
pub use types::{
    EngineError, EngineEvent, FailureKind, FetchError, JobRecord, JobsPayload, RequestSeq,
    StatsRecord,
};
pub use wire::decode_jobs_payload;
