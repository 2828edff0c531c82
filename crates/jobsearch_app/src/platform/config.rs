use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use jobsearch_core::SearchSettings;
use jobsearch_engine::FetchSettings;
use jobsearch_logging::search_info;
use serde::Deserialize;
use thiserror::Error;

use super::logging::LogDestination;

const CONFIG_FILENAME: &str = "jobsearch.ron";
const CONFIG_PATH_ENV: &str = "JOBSEARCH_CONFIG";
const API_BASE_ENV: &str = "JOBSEARCH_API_BASE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base: String,
    pub debounce_ms: u64,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_response_bytes: u64,
    pub page_size: usize,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        let search = SearchSettings::default();
        Self {
            api_base: fetch.base_url,
            debounce_ms: search.debounce.as_millis() as u64,
            request_timeout_secs: fetch.request_timeout.as_secs(),
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            max_response_bytes: fetch.max_bytes,
            page_size: search.page_size,
            log_destination: LogDestination::default(),
        }
    }
}

impl AppConfig {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            base_url: self.api_base.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_response_bytes,
        }
    }

    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            page_size: self.page_size,
        }
    }

    fn apply_overrides(mut self, api_base: Option<String>) -> Self {
        if let Some(api_base) = api_base.filter(|value| !value.trim().is_empty()) {
            self.api_base = api_base.trim().to_string();
        }
        self
    }
}

/// Loads the config at `path`; a missing file yields the defaults.
pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    search_info!("Loaded config from {:?}", path);
    Ok(config)
}

/// Loads `$JOBSEARCH_CONFIG` (or `./jobsearch.ron`) and applies `$JOBSEARCH_API_BASE`.
pub fn load_from_env() -> Result<AppConfig, ConfigError> {
    let path = std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
    Ok(load(&path)?.apply_overrides(std::env::var(API_BASE_ENV).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load(&temp.path().join("absent.ron")).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.api_base, "http://localhost:7070");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            "(api_base: \"https://jobs.example\", debounce_ms: 250, log_destination: Both)",
        )
        .unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.api_base, "https://jobs.example");
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(
            config.search_settings().debounce,
            Duration::from_millis(250)
        );
        assert_eq!(config.page_size, 20);
        assert_eq!(config.fetch_settings().request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "(debounce_ms: \"soon\")").unwrap();

        assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn api_base_override_wins_unless_blank() {
        let config = AppConfig::default().apply_overrides(Some(" http://other:8080 ".to_string()));
        assert_eq!(config.api_base, "http://other:8080");

        let config = AppConfig::default().apply_overrides(Some("  ".to_string()));
        assert_eq!(config.api_base, "http://localhost:7070");
    }
}
