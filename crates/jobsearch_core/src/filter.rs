//! Local filter engine: stable, non-mutating predicate filtering over a job list.

use crate::JobPosting;

/// Predicates applied when the current list is not remote-authoritative.
///
/// Unset (`None`) or empty criteria pass everything through.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    /// Exact match against `JobPosting::category`.
    pub category: Option<String>,
    /// Exact match against `JobPosting::industry`.
    pub industry: Option<String>,
    /// Case-insensitive substring of `JobPosting::location`.
    pub location: Option<String>,
    /// Case-insensitive substring of title, company or description.
    pub keyword: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.industry.is_none()
            && self.location.is_none()
            && self.keyword.is_none()
    }

    pub fn matches(&self, job: &JobPosting) -> bool {
        exact(self.category.as_deref(), &job.category)
            && exact(self.industry.as_deref(), &job.industry)
            && self.matches_location(job)
            && self.matches_keyword(job)
    }

    fn matches_location(&self, job: &JobPosting) -> bool {
        match self.location.as_deref() {
            Some(location) if !location.is_empty() => contains_ci(&job.location, location),
            _ => true,
        }
    }

    fn matches_keyword(&self, job: &JobPosting) -> bool {
        match self.keyword.as_deref() {
            Some(keyword) if !keyword.is_empty() => {
                contains_ci(&job.title, keyword)
                    || contains_ci(&job.company, keyword)
                    || contains_ci(&job.description, keyword)
            }
            _ => true,
        }
    }
}

/// Returns the jobs matching `criteria`, in source order.
pub fn apply_filter(jobs: &[JobPosting], criteria: &FilterCriteria) -> Vec<JobPosting> {
    if criteria.is_empty() {
        return jobs.to_vec();
    }
    jobs.iter()
        .filter(|job| criteria.matches(job))
        .cloned()
        .collect()
}

fn exact(wanted: Option<&str>, value: &str) -> bool {
    match wanted {
        Some(wanted) if !wanted.is_empty() => value == wanted,
        _ => true,
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
