//! Decoding of the `/jobs/` response body.
//!
//! Feeds disagree on field names and types, so each field is looked up under
//! its known aliases in priority order and the first non-empty value wins.
//! Strings, numbers and booleans are accepted as text; anything else is empty.

use std::collections::{BTreeMap, HashSet};

use jobsearch_logging::search_warn;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{FailureKind, FetchError, JobRecord, JobsPayload, StatsRecord};

type RawObject = Map<String, Value>;

const ID_KEYS: &[&str] = &["id", "dedup_key"];
const TITLE_KEYS: &[&str] = &["title", "jobTitle"];
const COMPANY_KEYS: &[&str] = &["company", "company_name", "companyName"];
const LOCATION_KEYS: &[&str] = &["location", "jobGeo", "candidate_required_location"];
const CATEGORY_KEYS: &[&str] = &["category", "jobType", "job_type", "type"];
const INDUSTRY_KEYS: &[&str] = &["industry", "jobIndustry"];
const URL_KEYS: &[&str] = &["url", "jobUrl", "link", "apply_url"];
const SOURCE_KEYS: &[&str] = &["source"];
const DESCRIPTION_KEYS: &[&str] = &["description", "jobDescription"];
const AUTHORITATIVE_KEYS: &[&str] = &["remoteAuthoritative", "remote_authoritative", "ai_powered"];

#[derive(Debug, Default, Deserialize)]
struct RawStats {
    #[serde(default)]
    total_jobs: usize,
    #[serde(default)]
    jobs_per_company: BTreeMap<String, usize>,
    #[serde(default)]
    jobs_per_type: BTreeMap<String, usize>,
    #[serde(default)]
    jobs_per_location: BTreeMap<String, usize>,
}

/// Decodes and normalises a response body.
///
/// Only a body that is not a JSON object fails. A null or missing `jobs`
/// is an empty list, and irregular records or stats are skipped with a warning.
pub fn decode_jobs_payload(body: &[u8]) -> Result<JobsPayload, FetchError> {
    let envelope: RawObject = serde_json::from_slice(body)
        .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;

    let records: &[Value] = match envelope.get("jobs") {
        Some(Value::Array(items)) => items.as_slice(),
        Some(Value::Null) | None => &[],
        Some(other) => {
            search_warn!("Ignoring non-list jobs field of type {}", type_name(other));
            &[]
        }
    };

    Ok(JobsPayload {
        jobs: normalize_jobs(records),
        stats: decode_stats(envelope.get("stats")),
        remote_authoritative: AUTHORITATIVE_KEYS
            .iter()
            .filter_map(|key| envelope.get(*key))
            .find_map(Value::as_bool)
            .unwrap_or(false),
    })
}

/// Fills in missing ids and drops repeated ones, keeping the first occurrence.
fn normalize_jobs(records: &[Value]) -> Vec<JobRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut jobs = Vec::with_capacity(records.len());
    for record in records {
        let Some(raw) = record.as_object() else {
            search_warn!("Skipping job record of type {}", type_name(record));
            continue;
        };
        let mut job = JobRecord {
            id: pick(raw, ID_KEYS),
            title: pick(raw, TITLE_KEYS),
            company: pick(raw, COMPANY_KEYS),
            location: pick(raw, LOCATION_KEYS),
            category: pick(raw, CATEGORY_KEYS),
            industry: pick(raw, INDUSTRY_KEYS),
            url: pick(raw, URL_KEYS),
            source: pick(raw, SOURCE_KEYS),
            description: pick(raw, DESCRIPTION_KEYS),
        };
        if job.id.is_empty() {
            job.id = derive_id(&job);
        }
        if !seen.insert(job.id.clone()) {
            search_warn!("Dropping duplicate job id {:?} from response", job.id);
            continue;
        }
        jobs.push(job);
    }
    jobs
}

/// First non-empty value among `keys`.
fn pick(raw: &RawObject, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .map(scalar_text)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn derive_id(job: &JobRecord) -> String {
    if job.url.is_empty() {
        format!("{}:{}:{}", job.source, job.company, job.title)
    } else {
        format!("{}:{}", job.source, job.url)
    }
}

fn decode_stats(value: Option<&Value>) -> Option<StatsRecord> {
    let value = value.filter(|value| !value.is_null())?;
    match RawStats::deserialize(value) {
        Ok(raw) => Some(normalize_stats(raw)),
        Err(err) => {
            search_warn!("Ignoring malformed stats: {}", err);
            None
        }
    }
}

fn normalize_stats(raw: RawStats) -> StatsRecord {
    StatsRecord {
        total_jobs: raw.total_jobs,
        jobs_per_company: rank(raw.jobs_per_company),
        jobs_per_type: rank(raw.jobs_per_type),
        jobs_per_location: rank(raw.jobs_per_location),
    }
}

fn rank(counts: BTreeMap<String, usize>) -> Vec<(String, usize)> {
    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_canonical_shape() {
        let body = br#"{
            "jobs": [{
                "id": "remotive-1",
                "title": "Backend Engineer",
                "company": "Acme",
                "location": "Riyadh",
                "category": "On-site",
                "industry": "Software",
                "url": "https://jobs.example/1",
                "source": "remotive",
                "description": "Rust services"
            }],
            "stats": {"total_jobs": 1, "jobs_per_company": {"Acme": 1}},
            "remoteAuthoritative": true
        }"#;

        let payload = decode_jobs_payload(body).unwrap();
        assert!(payload.remote_authoritative);
        assert_eq!(
            payload.jobs,
            vec![JobRecord {
                id: "remotive-1".to_string(),
                title: "Backend Engineer".to_string(),
                company: "Acme".to_string(),
                location: "Riyadh".to_string(),
                category: "On-site".to_string(),
                industry: "Software".to_string(),
                url: "https://jobs.example/1".to_string(),
                source: "remotive".to_string(),
                description: "Rust services".to_string(),
            }]
        );
        let stats = payload.stats.unwrap();
        assert_eq!(stats.total_jobs, 1);
        assert_eq!(stats.jobs_per_company, vec![("Acme".to_string(), 1)]);
        assert!(stats.jobs_per_type.is_empty());
    }

    #[test]
    fn accepts_legacy_field_names() {
        let body = br#"{
            "jobs": [{
                "dedup_key": "adzuna-9",
                "jobTitle": "  Driver ",
                "company_name": "Fleet",
                "jobGeo": "Jeddah",
                "jobType": "On-site",
                "jobIndustry": "Logistics",
                "jobUrl": "https://jobs.example/9",
                "source": "adzuna",
                "jobDescription": null
            }],
            "ai_powered": false
        }"#;

        let payload = decode_jobs_payload(body).unwrap();
        let job = &payload.jobs[0];
        assert_eq!(job.id, "adzuna-9");
        assert_eq!(job.title, "Driver");
        assert_eq!(job.company, "Fleet");
        assert_eq!(job.location, "Jeddah");
        assert_eq!(job.category, "On-site");
        assert_eq!(job.industry, "Logistics");
        assert_eq!(job.description, "");
        assert!(!payload.remote_authoritative);
        assert_eq!(payload.stats, None);
    }

    #[test]
    fn missing_ids_are_derived_and_duplicates_dropped() {
        let body = br#"{
            "jobs": [
                {"title": "A", "url": "https://x/1", "source": "feed", "id": 42},
                {"title": "B", "url": "https://x/2", "source": "feed"},
                {"title": "C", "url": "https://x/2", "source": "feed"}
            ]
        }"#;

        let payload = decode_jobs_payload(body).unwrap();
        let ids: Vec<_> = payload.jobs.iter().map(|job| job.id.as_str()).collect();
        assert_eq!(ids, vec!["42", "feed:https://x/2"]);
        assert_eq!(payload.jobs[1].title, "B");
    }

    #[test]
    fn stats_breakdowns_are_ranked() {
        let body = br#"{
            "jobs": [],
            "stats": {"total_jobs": 5, "jobs_per_type": {"Remote": 1, "On-site": 4}}
        }"#;

        let stats = decode_jobs_payload(body).unwrap().stats.unwrap();
        assert_eq!(
            stats.jobs_per_type,
            vec![("On-site".to_string(), 4), ("Remote".to_string(), 1)]
        );
    }

    #[test]
    fn overlapping_aliases_resolve_by_priority() {
        let body = br#"{
            "jobs": [{
                "id": 1,
                "dedup_key": "remotive-1",
                "title": "Backend Engineer",
                "category": "Software Development",
                "job_type": "full_time",
                "url": "",
                "link": "https://jobs.example/1"
            }],
            "remoteAuthoritative": true,
            "ai_powered": false
        }"#;

        let payload = decode_jobs_payload(body).unwrap();
        let job = &payload.jobs[0];
        assert_eq!(job.id, "1");
        assert_eq!(job.category, "Software Development");
        assert_eq!(job.url, "https://jobs.example/1");
        assert!(payload.remote_authoritative);
    }

    #[test]
    fn null_jobs_and_irregular_entries_are_tolerated() {
        let payload = decode_jobs_payload(br#"{"jobs": null, "stats": null, "ai_powered": false}"#).unwrap();
        assert!(payload.jobs.is_empty());
        assert_eq!(payload.stats, None);

        let body = br#"{
            "jobs": [42, {"id": "a", "title": "Kept"}, null],
            "stats": {"total_jobs": -1}
        }"#;
        let payload = decode_jobs_payload(body).unwrap();
        let ids: Vec<_> = payload.jobs.iter().map(|job| job.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
        assert_eq!(payload.stats, None);
    }

    #[test]
    fn malformed_body_is_a_decode_failure() {
        let err = decode_jobs_payload(b"<html>oops</html>").unwrap_err();
        assert_eq!(err.kind, FailureKind::Decode);
        let err = decode_jobs_payload(b"[]").unwrap_err();
        assert_eq!(err.kind, FailureKind::Decode);
    }
}
