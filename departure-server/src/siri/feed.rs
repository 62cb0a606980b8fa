//! The live-feed seam used by the pipeline.

use std::future::Future;

use serde_json::Value;

use super::client::SiriClient;
use super::error::FeedError;
use super::mock::MockFeed;

/// Source of stop-monitoring payloads.
///
/// Implemented by the HTTP client and by [`MockFeed`]; the pipeline only
/// depends on this trait.
pub trait LiveFeed: Send + Sync {
    /// Fetch the payload for one stop area and line.
    fn stop_monitoring(
        &self,
        stop_area_id: &str,
        line_id: &str,
    ) -> impl Future<Output = Result<Value, FeedError>> + Send;
}

impl LiveFeed for SiriClient {
    async fn stop_monitoring(&self, stop_area_id: &str, line_id: &str) -> Result<Value, FeedError> {
        SiriClient::stop_monitoring(self, stop_area_id, line_id).await
    }
}

impl LiveFeed for MockFeed {
    async fn stop_monitoring(&self, stop_area_id: &str, line_id: &str) -> Result<Value, FeedError> {
        MockFeed::stop_monitoring(self, stop_area_id, line_id)
    }
}

/// The feed selected at startup.
#[derive(Debug, Clone)]
pub enum FeedBackend {
    Live(SiriClient),
    Mock(MockFeed),
}

impl LiveFeed for FeedBackend {
    async fn stop_monitoring(&self, stop_area_id: &str, line_id: &str) -> Result<Value, FeedError> {
        match self {
            FeedBackend::Live(client) => client.stop_monitoring(stop_area_id, line_id).await,
            FeedBackend::Mock(mock) => mock.stop_monitoring(stop_area_id, line_id),
        }
    }
}
