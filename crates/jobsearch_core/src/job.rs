use std::collections::BTreeMap;

/// Identity of a posting; unique within a response.
pub type JobId = String;

/// A single job posting as received from the remote service.
///
/// Absent text fields are carried as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobPosting {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    /// Enumerated tag such as "On-site" or "Remote".
    pub category: String,
    /// Free-form sector label, e.g. "Logistics".
    pub industry: String,
    pub url: String,
    /// Origin feed identifier.
    pub source: String,
    pub description: String,
}

/// A remote response payload, before the orchestrator decides how to use it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteJobs {
    pub jobs: Vec<JobPosting>,
    pub stats: Option<Stats>,
    pub remote_authoritative: bool,
}

/// Keys beyond this many are dropped from each breakdown.
pub const STATS_TOP_N: usize = 50;

const UNKNOWN: &str = "Unknown";

/// Aggregate counts over a job list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stats {
    pub total_jobs: usize,
    pub jobs_per_company: Vec<(String, usize)>,
    pub jobs_per_type: Vec<(String, usize)>,
    pub jobs_per_location: Vec<(String, usize)>,
}

impl Stats {
    pub fn from_jobs(jobs: &[JobPosting]) -> Self {
        Self {
            total_jobs: jobs.len(),
            jobs_per_company: most_common(jobs.iter().map(|job| job.company.as_str())),
            jobs_per_type: most_common(jobs.iter().map(|job| job.category.as_str())),
            jobs_per_location: most_common(jobs.iter().map(|job| job.location.as_str())),
        }
    }
}

/// Counts keys, descending by count then ascending by name, capped at [`STATS_TOP_N`].
fn most_common<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        let key = if value.trim().is_empty() {
            UNKNOWN
        } else {
            value
        };
        *counts.entry(key).or_default() += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(key, count)| (key.to_string(), count))
        .collect();
    // Stable sort keeps the BTreeMap's alphabetical order among ties.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(STATS_TOP_N);
    ranked
}
