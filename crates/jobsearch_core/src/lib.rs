//! Jobsearch core: pure search orchestration state machine and view-model helpers.
mod debounce;
mod effect;
mod filter;
mod job;
mod mode;
mod msg;
mod request;
mod state;
mod update;
mod view_model;

pub use debounce::{DebounceTicket, Debouncer, DEFAULT_DEBOUNCE};
pub use effect::Effect;
pub use filter::{apply_filter, FilterCriteria};
pub use job::{JobId, JobPosting, RemoteJobs, Stats, STATS_TOP_N};
pub use mode::{select_mode, FilterMode};
pub use msg::{FetchOutcome, Msg};
pub use request::{RequestLedger, RequestSeq, SearchRequest};
pub use state::{AppState, Phase, SearchSettings, DEFAULT_PAGE_SIZE};
pub use update::update;
pub use view_model::AppViewModel;
