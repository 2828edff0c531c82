//! Request lifecycle bookkeeping.
//!
//! Every fetch draws a number from one monotonic counter. A search response is
//! only accepted while its number is both the highest issued and the search
//! still marked in flight; everything else is stale no matter when it arrives.
//! The query-less master fetch is tracked on its own slot so that searches
//! never cancel it and it never blocks them.

pub type RequestSeq = u64;

/// A fetch the runtime should perform. `keyword: None` is the query-less master fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: RequestSeq,
    pub keyword: Option<String>,
}

impl SearchRequest {
    pub fn is_master(&self) -> bool {
        self.keyword.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestLedger {
    latest: RequestSeq,
    in_flight: Option<RequestSeq>,
    master: Option<RequestSeq>,
}

impl RequestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> RequestSeq {
        self.latest
    }

    pub fn in_flight(&self) -> Option<RequestSeq> {
        self.in_flight
    }

    pub fn master_pending(&self) -> bool {
        self.master.is_some()
    }

    fn next_seq(&mut self) -> RequestSeq {
        self.latest += 1;
        self.latest
    }

    pub fn issue_master(&mut self) -> SearchRequest {
        let seq = self.next_seq();
        self.master = Some(seq);
        SearchRequest { seq, keyword: None }
    }

    /// Issues a keyword search. Returns the request and the search it supersedes, if any.
    pub fn issue_search(&mut self, keyword: String) -> (SearchRequest, Option<RequestSeq>) {
        let superseded = self.in_flight.take();
        let seq = self.next_seq();
        self.in_flight = Some(seq);
        (
            SearchRequest {
                seq,
                keyword: Some(keyword),
            },
            superseded,
        )
    }

    /// Advances the counter without issuing anything, invalidating every
    /// outstanding search. Returns the search that should be cancelled.
    pub fn supersede(&mut self) -> Option<RequestSeq> {
        self.next_seq();
        self.in_flight.take()
    }

    /// Takes the in-flight search without advancing the counter.
    pub fn abandon(&mut self) -> Option<RequestSeq> {
        self.in_flight.take()
    }

    pub fn is_current_search(&self, seq: RequestSeq) -> bool {
        self.latest == seq && self.in_flight == Some(seq)
    }

    pub fn is_current_master(&self, seq: RequestSeq) -> bool {
        self.master == Some(seq)
    }

    /// Marks a search finished. Returns `false` (and changes nothing) when stale.
    pub fn complete_search(&mut self, seq: RequestSeq) -> bool {
        if !self.is_current_search(seq) {
            return false;
        }
        self.in_flight = None;
        true
    }

    /// Marks the master fetch finished. Returns `false` when a newer master fetch replaced it.
    pub fn complete_master(&mut self, seq: RequestSeq) -> bool {
        if !self.is_current_master(seq) {
            return false;
        }
        self.master = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_search_invalidates_older_one() {
        let mut ledger = RequestLedger::new();
        let (first, superseded) = ledger.issue_search("x".to_string());
        assert_eq!(superseded, None);
        let (second, superseded) = ledger.issue_search("y".to_string());
        assert_eq!(superseded, Some(first.seq));
        assert!(second.seq > first.seq);

        assert!(!ledger.complete_search(first.seq));
        assert!(ledger.complete_search(second.seq));
        assert!(!ledger.complete_search(second.seq));
    }

    #[test]
    fn supersede_invalidates_without_issuing() {
        let mut ledger = RequestLedger::new();
        let (search, _) = ledger.issue_search("x".to_string());

        assert_eq!(ledger.supersede(), Some(search.seq));
        assert_eq!(ledger.in_flight(), None);
        assert!(!ledger.complete_search(search.seq));
        assert_eq!(ledger.latest(), search.seq + 1);
    }

    #[test]
    fn master_fetch_is_tracked_independently() {
        let mut ledger = RequestLedger::new();
        let master = ledger.issue_master();
        assert!(master.is_master());
        let (search, superseded) = ledger.issue_search("x".to_string());

        assert_eq!(superseded, None);
        assert!(ledger.master_pending());
        assert!(ledger.complete_master(master.seq));
        assert!(!ledger.master_pending());
        assert!(ledger.complete_search(search.seq));
    }
}
