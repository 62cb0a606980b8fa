//! Stop-monitoring HTTP client.
//!
//! Queries the SIRI Lite stop-monitoring endpoint for one stop area and one
//! line at a time. The API key is read from a shared [`Credential`] on every
//! request, so a key saved while a refresh is running applies from the next
//! request onwards.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderValue;
use serde_json::Value;
use tokio::sync::{RwLock, Semaphore};
use tracing::debug;

use super::error::FeedError;

/// Default stop-monitoring endpoint.
const DEFAULT_BASE_URL: &str = "https://prim.iledefrance-mobilites.fr/marketplace/stop-monitoring";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 2;

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Shared, updatable API key.
///
/// Readers see whatever value is current when they read; there is no
/// snapshot across several requests.
#[derive(Debug, Clone, Default)]
pub struct Credential {
    inner: Arc<RwLock<String>>,
}

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(key.into())),
        }
    }

    /// The key as of now.
    pub async fn current(&self) -> String {
        self.inner.read().await.clone()
    }

    /// Replace the key for all future requests.
    pub async fn set(&self, key: impl Into<String>) {
        *self.inner.write().await = key.into();
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

/// Configuration for the stop-monitoring client.
#[derive(Debug, Clone)]
pub struct SiriConfig {
    /// Endpoint URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
}

impl SiriConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Set a custom endpoint URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }
}

impl Default for SiriConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// `MonitoringRef` query value for a stop area.
pub fn monitoring_ref(stop_area_id: &str) -> String {
    format!("STIF:StopArea:SP:{stop_area_id}:")
}

/// `LineRef` query value for a line.
pub fn line_ref(line_id: &str) -> String {
    format!("STIF:Line::{line_id}:")
}

/// Stop-monitoring API client.
#[derive(Debug, Clone)]
pub struct SiriClient {
    http: reqwest::Client,
    base_url: String,
    credential: Credential,
    semaphore: Arc<Semaphore>,
}

impl SiriClient {
    /// Create a new client reading its key from `credential`.
    pub fn new(config: SiriConfig, credential: Credential) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            credential,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Fetch the raw stop-monitoring payload for one stop area and line.
    ///
    /// Transport failures and non-success statuses are errors. A body that
    /// is not JSON is a [`FeedError::Json`]; a JSON body of any shape is
    /// returned as-is.
    pub async fn stop_monitoring(
        &self,
        stop_area_id: &str,
        line_id: &str,
    ) -> Result<Value, FeedError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| FeedError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let key = self.credential.current().await;
        let key = HeaderValue::from_str(&key).map_err(|_| FeedError::InvalidCredential)?;

        debug!(stop_area_id, line_id, "requesting stop monitoring");

        let response = self
            .http
            .get(&self.base_url)
            .header("apikey", key)
            .query(&[
                ("MonitoringRef", monitoring_ref(stop_area_id)),
                ("LineRef", line_ref(line_id)),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(FeedError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FeedError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| FeedError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = SiriConfig::new()
            .with_base_url("http://localhost:8080")
            .with_max_concurrent(4)
            .with_timeout(5);

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_concurrent, 4);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn config_defaults() {
        let config = SiriConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn request_references() {
        assert_eq!(monitoring_ref("50980"), "STIF:StopArea:SP:50980:");
        assert_eq!(line_ref("C02000"), "STIF:Line::C02000:");
    }

    #[test]
    fn client_creation() {
        let client = SiriClient::new(SiriConfig::new(), Credential::new("key"));
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn credential_updates_are_visible() {
        let cred = Credential::new("old");
        let shared = cred.clone();
        assert_eq!(shared.current().await, "old");

        cred.set("new").await;
        assert_eq!(shared.current().await, "new");
        assert!(!shared.is_empty().await);
        assert!(Credential::default().is_empty().await);
    }

    #[tokio::test]
    async fn invalid_credential_is_rejected_before_sending() {
        let client = SiriClient::new(
            SiriConfig::new().with_base_url("http://127.0.0.1:9"),
            Credential::new("bad\nkey"),
        )
        .unwrap();

        let err = client.stop_monitoring("1", "L").await.unwrap_err();
        assert!(matches!(err, FeedError::InvalidCredential));
    }
}
