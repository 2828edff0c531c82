use std::time::Duration;

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::wire::decode_jobs_payload;
use crate::{FailureKind, FetchError, JobsPayload};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Service root; `/jobs/` is appended to its path.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Upper bound for the whole request, body included.
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:7070".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 8 * 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait JobsClient: Send + Sync {
    /// Fetches `/jobs/`, with `query` as the search term when present.
    ///
    /// Resolves to a `FailureKind::Cancelled` error once `cancel` fires.
    async fn fetch_jobs(
        &self,
        query: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<JobsPayload, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobsClient {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestJobsClient {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    /// Builds `{base_url}/jobs/?query=...`; blank queries are omitted.
    pub fn jobs_url(&self, query: Option<&str>) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.settings.base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::new(FailureKind::InvalidUrl, "base url cannot have a path"))?
            .pop_if_empty()
            .push("jobs")
            .push("");
        if let Some(query) = query.map(str::trim).filter(|query| !query.is_empty()) {
            url.query_pairs_mut().append_pair("query", query);
        }
        Ok(url)
    }

    async fn execute(&self, url: Url) -> Result<JobsPayload, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            body.extend_from_slice(&chunk);
        }

        decode_jobs_payload(&body)
    }
}

#[async_trait::async_trait]
impl JobsClient for ReqwestJobsClient {
    async fn fetch_jobs(
        &self,
        query: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<JobsPayload, FetchError> {
        let url = self.jobs_url(query)?;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::new(FailureKind::Cancelled, "request cancelled")),
            result = self.execute(url) => result,
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base_url: &str) -> ReqwestJobsClient {
        ReqwestJobsClient::new(FetchSettings {
            base_url: base_url.to_string(),
            ..FetchSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn jobs_url_appends_path_and_query() {
        let client = client_for("http://localhost:7070");
        assert_eq!(
            client.jobs_url(None).unwrap().as_str(),
            "http://localhost:7070/jobs/"
        );
        assert_eq!(
            client.jobs_url(Some(" data engineer ")).unwrap().as_str(),
            "http://localhost:7070/jobs/?query=data+engineer"
        );
        assert_eq!(
            client.jobs_url(Some("   ")).unwrap().as_str(),
            "http://localhost:7070/jobs/"
        );
    }

    #[test]
    fn jobs_url_keeps_base_path() {
        let client = client_for("https://api.example.com/v1/");
        assert_eq!(
            client.jobs_url(None).unwrap().as_str(),
            "https://api.example.com/v1/jobs/"
        );
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let client = client_for("not a url");
        assert_eq!(client.jobs_url(None).unwrap_err().kind, FailureKind::InvalidUrl);
    }
}
