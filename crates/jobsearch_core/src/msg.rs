use crate::{DebounceTicket, RemoteJobs, RequestSeq};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Runtime is up; load the master list.
    Started,
    /// User edited the keyword box (raw, undebounced text).
    KeywordInput(String),
    /// The runtime timer for `ticket` ran out.
    DebounceElapsed { ticket: DebounceTicket },
    /// User pressed Search; skip the debounce wait.
    ExplicitSearch,
    /// User picked a category. Empty clears the filter.
    CategorySelected(String),
    /// User picked an industry. Empty clears the filter.
    IndustrySelected(String),
    /// User narrowed by location. Empty clears the filter.
    LocationSelected(String),
    /// User moved to another page (1-based).
    PageSelected(usize),
    /// Engine finished a fetch.
    FetchCompleted {
        seq: RequestSeq,
        outcome: FetchOutcome,
    },
    /// Session is ending.
    Shutdown,
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded(RemoteJobs),
    /// Network, HTTP status, timeout or decode failure.
    Failed(String),
    /// The request was cancelled before it completed.
    Cancelled,
}
