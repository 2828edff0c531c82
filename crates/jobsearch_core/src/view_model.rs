use crate::{JobPosting, Phase, Stats};

/// Everything the rendering layer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    /// Keyword as typed, for echoing back into the input box.
    pub raw_keyword: String,
    /// Keyword the current results were requested for.
    pub keyword: String,
    pub category: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub visible_jobs: Vec<JobPosting>,
    pub loading: bool,
    pub remote_authoritative: bool,
    pub stats: Stats,
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub page_jobs: Vec<JobPosting>,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn job_count(&self) -> usize {
        self.visible_jobs.len()
    }
}
