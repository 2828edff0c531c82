use crate::{DebounceTicket, RequestSeq, SearchRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchJobs(SearchRequest),
    /// Best-effort; a late response is still discarded by sequence number.
    CancelFetch { seq: RequestSeq },
    /// Arm the debounce timer, replacing any pending one.
    ScheduleDebounce(DebounceTicket),
    CancelDebounce,
}
