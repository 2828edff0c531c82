use std::time::Duration;

use jobsearch_logging::{search_debug, search_info, search_warn};

use crate::debounce::{Debouncer, DEFAULT_DEBOUNCE};
use crate::filter::{apply_filter, FilterCriteria};
use crate::mode::{select_mode, FilterMode};
use crate::request::{RequestLedger, RequestSeq, SearchRequest};
use crate::view_model::AppViewModel;
use crate::{DebounceTicket, Effect, FetchOutcome, JobPosting, RemoteJobs, Stats};

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Not started yet.
    #[default]
    Idle,
    /// A master fetch or keyword search is outstanding.
    Loading,
    /// Showing a remote-authoritative result verbatim.
    Remote,
    /// Showing a locally filtered list.
    Local,
    /// The last fetch failed; showing the locally filtered master list.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub page_size: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    debouncer: Debouncer,
    ledger: RequestLedger,
    phase: Phase,
    master: Vec<JobPosting>,
    /// Last accepted search response. `None` means the master list is the display source.
    remote: Option<RemoteJobs>,
    raw_keyword: String,
    keyword: String,
    category: Option<String>,
    industry: Option<String>,
    location: Option<String>,
    /// The current keyword's search failed; reported once the master list settles.
    search_failed: bool,
    visible: Vec<JobPosting>,
    remote_authoritative: bool,
    stats: Stats,
    page: usize,
    page_size: usize,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(SearchSettings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: SearchSettings) -> Self {
        Self {
            debouncer: Debouncer::new(settings.debounce),
            ledger: RequestLedger::new(),
            phase: Phase::Idle,
            master: Vec::new(),
            remote: None,
            raw_keyword: String::new(),
            keyword: String::new(),
            category: None,
            industry: None,
            location: None,
            search_failed: false,
            visible: Vec::new(),
            remote_authoritative: false,
            stats: Stats::default(),
            page: 1,
            page_size: settings.page_size.max(1),
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let page_count = self.page_count();
        let start = (self.page - 1) * self.page_size;
        let page_jobs = self
            .visible
            .iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();

        AppViewModel {
            phase: self.phase,
            raw_keyword: self.raw_keyword.clone(),
            keyword: self.keyword.clone(),
            category: self.category.clone(),
            industry: self.industry.clone(),
            location: self.location.clone(),
            visible_jobs: self.visible.clone(),
            loading: self.is_loading(),
            remote_authoritative: self.remote_authoritative,
            stats: self.stats.clone(),
            page: self.page,
            page_count,
            page_size: self.page_size,
            page_jobs,
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn master(&self) -> &[JobPosting] {
        &self.master
    }

    pub fn visible_jobs(&self) -> &[JobPosting] {
        &self.visible
    }

    pub fn remote_authoritative(&self) -> bool {
        self.remote_authoritative
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn latest_seq(&self) -> RequestSeq {
        self.ledger.latest()
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn page_count(&self) -> usize {
        self.visible.len().div_ceil(self.page_size).max(1)
    }

    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            category: self.category.clone(),
            industry: self.industry.clone(),
            location: self.location.clone(),
            keyword: (!self.keyword.is_empty()).then(|| self.keyword.clone()),
        }
    }

    /// Rebuilds the visible list from the current display source.
    fn refresh_display(&mut self) {
        let criteria = self.criteria();
        let (visible, stats, remote_authoritative) = match &self.remote {
            Some(remote) => match select_mode(remote.remote_authoritative) {
                FilterMode::Remote => {
                    let stats = remote
                        .stats
                        .clone()
                        .unwrap_or_else(|| Stats::from_jobs(&remote.jobs));
                    (remote.jobs.clone(), stats, true)
                }
                FilterMode::Local => {
                    let visible = apply_filter(&remote.jobs, &criteria);
                    let stats = Stats::from_jobs(&visible);
                    (visible, stats, false)
                }
            },
            None => {
                let visible = apply_filter(&self.master, &criteria);
                let stats = Stats::from_jobs(&visible);
                (visible, stats, false)
            }
        };

        self.visible = visible;
        self.stats = stats;
        self.remote_authoritative = remote_authoritative;
        self.page = 1;
        self.mark_dirty();
    }

    pub(crate) fn start(&mut self) -> Option<SearchRequest> {
        if self.phase != Phase::Idle {
            return None;
        }
        self.phase = Phase::Loading;
        self.mark_dirty();
        let request = self.ledger.issue_master();
        search_info!("Loading master list seq={}", request.seq);
        Some(request)
    }

    pub(crate) fn set_raw_keyword(&mut self, raw: String) -> DebounceTicket {
        self.raw_keyword = raw.clone();
        self.mark_dirty();
        self.debouncer.schedule(raw)
    }

    pub(crate) fn raw_keyword(&self) -> &str {
        &self.raw_keyword
    }

    pub(crate) fn fire_debounce(&mut self, ticket: DebounceTicket) -> Option<String> {
        let fired = self.debouncer.fire(ticket);
        match &fired {
            Some(keyword) => search_debug!("Debounce {} fired for {:?}", ticket.generation, keyword),
            None => search_debug!("Ignoring stale debounce ticket {}", ticket.generation),
        }
        fired
    }

    pub(crate) fn cancel_debounce(&mut self) -> bool {
        self.debouncer.cancel()
    }

    /// Applies a debounced (or explicitly submitted) keyword.
    ///
    /// Unless `force` is set, an unchanged keyword is a no-op.
    pub(crate) fn apply_keyword(&mut self, keyword: &str, force: bool) -> Vec<Effect> {
        let keyword = keyword.trim();
        if !force && keyword == self.keyword {
            return Vec::new();
        }
        self.keyword = keyword.to_string();
        self.search_failed = false;

        let mut effects = Vec::with_capacity(2);
        if keyword.is_empty() {
            if let Some(seq) = self.ledger.supersede() {
                search_debug!("Cancelling search seq={} for cleared keyword", seq);
                effects.push(Effect::CancelFetch { seq });
            }
            self.remote = None;
            self.phase = if self.ledger.master_pending() {
                Phase::Loading
            } else {
                Phase::Local
            };
            self.refresh_display();
            return effects;
        }

        let (request, superseded) = self.ledger.issue_search(keyword.to_string());
        if let Some(seq) = superseded {
            search_debug!("Cancelling superseded search seq={}", seq);
            effects.push(Effect::CancelFetch { seq });
        }
        search_info!("Issuing search seq={} keyword={:?}", request.seq, keyword);
        self.phase = Phase::Loading;
        self.mark_dirty();
        effects.push(Effect::FetchJobs(request));
        effects
    }

    pub(crate) fn set_category(&mut self, category: &str) {
        self.category = normalize_choice(category);
        self.refresh_display();
    }

    pub(crate) fn set_industry(&mut self, industry: &str) {
        self.industry = normalize_choice(industry);
        self.refresh_display();
    }

    pub(crate) fn set_location(&mut self, location: &str) {
        self.location = normalize_choice(location);
        self.refresh_display();
    }

    pub(crate) fn select_page(&mut self, page: usize) {
        let page = page.clamp(1, self.page_count());
        if page != self.page {
            self.page = page;
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_fetch(&mut self, seq: RequestSeq, outcome: FetchOutcome) {
        if self.ledger.is_current_master(seq) {
            self.apply_master_fetch(seq, outcome);
        } else {
            self.apply_search_fetch(seq, outcome);
        }
    }

    fn apply_master_fetch(&mut self, seq: RequestSeq, outcome: FetchOutcome) {
        let failed = match outcome {
            FetchOutcome::Cancelled => {
                search_debug!("Master fetch seq={} cancelled", seq);
                return;
            }
            FetchOutcome::Loaded(payload) => {
                search_info!("Master list loaded seq={} jobs={}", seq, payload.jobs.len());
                self.master = payload.jobs;
                false
            }
            FetchOutcome::Failed(reason) => {
                search_warn!("Master list fetch seq={} failed: {}", seq, reason);
                true
            }
        };
        self.ledger.complete_master(seq);

        if self.ledger.in_flight().is_none() {
            if failed || self.search_failed {
                self.phase = Phase::Error;
            } else if self.phase == Phase::Loading {
                self.phase = Phase::Local;
            }
        }
        if self.remote.is_none() {
            self.refresh_display();
        }
        self.mark_dirty();
    }

    fn apply_search_fetch(&mut self, seq: RequestSeq, outcome: FetchOutcome) {
        if outcome == FetchOutcome::Cancelled {
            search_debug!("Search seq={} cancelled", seq);
            return;
        }
        if !self.ledger.complete_search(seq) {
            search_debug!(
                "Discarding stale response seq={} latest={}",
                seq,
                self.ledger.latest()
            );
            return;
        }

        match outcome {
            FetchOutcome::Loaded(payload) => {
                let mode = select_mode(payload.remote_authoritative);
                search_info!(
                    "Search seq={} returned {} jobs mode={:?}",
                    seq,
                    payload.jobs.len(),
                    mode
                );
                self.phase = match mode {
                    FilterMode::Remote => Phase::Remote,
                    FilterMode::Local => Phase::Local,
                };
                self.search_failed = false;
                self.remote = Some(payload);
            }
            FetchOutcome::Failed(reason) => {
                search_warn!(
                    "Search seq={} failed, falling back to master list: {}",
                    seq,
                    reason
                );
                self.search_failed = true;
                self.phase = if self.ledger.master_pending() {
                    Phase::Loading
                } else {
                    Phase::Error
                };
                self.remote = None;
            }
            FetchOutcome::Cancelled => return,
        }
        self.refresh_display();
    }

    pub(crate) fn shutdown(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.debouncer.cancel() {
            effects.push(Effect::CancelDebounce);
        }
        if let Some(seq) = self.ledger.abandon() {
            effects.push(Effect::CancelFetch { seq });
        }
        effects
    }
}

fn normalize_choice(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
