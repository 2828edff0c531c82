use jobsearch_core::{AppViewModel, JobPosting, Phase};

use super::constants::TOP_COMPANIES;

/// Renders one frame of the view model as terminal lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::with_capacity(view.page_jobs.len() * 2 + 4);
    lines.push(status_line(view));

    if view.loading && view.visible_jobs.is_empty() {
        lines.push("  Loading...".to_string());
    } else if view.visible_jobs.is_empty() {
        lines.push("  No jobs found. Try adjusting your search filters.".to_string());
    } else {
        let offset = view.page.saturating_sub(1) * view.page_size;
        for (index, job) in view.page_jobs.iter().enumerate() {
            lines.push(job_line(offset + index + 1, job));
            if !job.url.is_empty() {
                lines.push(format!("      {}", job.url));
            }
        }
    }

    if let Some(companies) = top_companies(view) {
        lines.push(companies);
    }
    lines
}

fn status_line(view: &AppViewModel) -> String {
    let phase = match view.phase {
        Phase::Idle => "Idle",
        Phase::Loading => "Loading",
        Phase::Remote => "Remote",
        Phase::Local => "Local",
        Phase::Error => "Offline",
    };
    let mode = if view.remote_authoritative {
        "ranked by service"
    } else {
        "filtered locally"
    };

    let mut parts = vec![
        format!("[{phase}]"),
        format!("{} jobs ({mode})", view.job_count()),
    ];
    if !view.keyword.is_empty() {
        parts.push(format!("keyword {:?}", view.keyword));
    }
    if let Some(category) = &view.category {
        parts.push(format!("category {category}"));
    }
    if let Some(industry) = &view.industry {
        parts.push(format!("industry {industry}"));
    }
    if let Some(location) = &view.location {
        parts.push(format!("location {location}"));
    }
    parts.push(format!("page {}/{}", view.page, view.page_count));
    parts.join(" | ")
}

fn job_line(number: usize, job: &JobPosting) -> String {
    let mut line = format!("  {number:>3}. {}", display_or(&job.title, "(untitled)"));
    if !job.company.is_empty() {
        line.push_str(&format!(" @ {}", job.company));
    }
    if !job.location.is_empty() {
        line.push_str(&format!(" ({})", job.location));
    }
    if !job.category.is_empty() {
        line.push_str(&format!(" [{}]", job.category));
    }
    if !job.source.is_empty() {
        line.push_str(&format!(" via {}", job.source));
    }
    line
}

fn top_companies(view: &AppViewModel) -> Option<String> {
    if view.stats.jobs_per_company.is_empty() {
        return None;
    }
    let listed = view
        .stats
        .jobs_per_company
        .iter()
        .take(TOP_COMPANIES)
        .map(|(company, count)| format!("{company} ({count})"))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!(
        "  Total jobs: {} | Top companies: {listed}",
        view.stats.total_jobs
    ))
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
