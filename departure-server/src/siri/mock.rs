//! Mock stop-monitoring feed for testing without API access.
//!
//! Serves canned payloads keyed by (stop area, line) and records every
//! request it receives, so callers can assert how many live calls a
//! pipeline pass would have made.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::domain::GroupKey;

use super::error::FeedError;

#[derive(Debug, Clone)]
enum Canned {
    Payload(Value),
    Status(u16),
    Body(String),
}

#[derive(Debug, Default)]
struct Inner {
    responses: HashMap<GroupKey, Canned>,
    calls: Vec<GroupKey>,
}

/// Mock feed serving payloads from memory.
#[derive(Debug, Clone, Default)]
pub struct MockFeed {
    inner: Arc<Mutex<Inner>>,
}

fn group(stop_area_id: &str, line_id: &str) -> GroupKey {
    GroupKey {
        stop_area_id: stop_area_id.to_string(),
        line_id: line_id.to_string(),
    }
}

impl MockFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load payloads from a directory of `{stop_area_id}_{line_id}.json` files.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, FeedError> {
        let data_dir = data_dir.as_ref();
        let feed = Self::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| FeedError::Api {
            status: 0,
            message: format!("Failed to read mock data directory: {}", e),
        })?;

        for entry in entries {
            let path = entry
                .map_err(|e| FeedError::Api {
                    status: 0,
                    message: format!("Failed to read directory entry: {}", e),
                })?
                .path();

            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let Some((stop_area_id, line_id)) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.split_once('_'))
            else {
                continue;
            };

            let json = std::fs::read_to_string(&path).map_err(|e| FeedError::Api {
                status: 0,
                message: format!("Failed to read {:?}: {}", path, e),
            })?;

            let payload: Value = serde_json::from_str(&json).map_err(|e| FeedError::Json {
                message: format!("Failed to parse {:?}: {}", path, e),
                body: None,
            })?;

            feed.insert(stop_area_id, line_id, payload);
        }

        Ok(feed)
    }

    /// Serve `payload` for this stop area and line.
    pub fn insert(&self, stop_area_id: &str, line_id: &str, payload: Value) {
        self.lock()
            .responses
            .insert(group(stop_area_id, line_id), Canned::Payload(payload));
    }

    /// Answer this stop area and line with an HTTP error status.
    pub fn fail_with(&self, stop_area_id: &str, line_id: &str, status: u16) {
        self.lock()
            .responses
            .insert(group(stop_area_id, line_id), Canned::Status(status));
    }

    /// Answer this stop area and line with a body that is not JSON.
    pub fn respond_with_body(&self, stop_area_id: &str, line_id: &str, body: impl Into<String>) {
        self.lock()
            .responses
            .insert(group(stop_area_id, line_id), Canned::Body(body.into()));
    }

    /// Every request received so far, in order.
    pub fn calls(&self) -> Vec<GroupKey> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Answer a request the way the live API would.
    pub fn stop_monitoring(&self, stop_area_id: &str, line_id: &str) -> Result<Value, FeedError> {
        let mut inner = self.lock();
        let key = group(stop_area_id, line_id);
        inner.calls.push(key.clone());

        match inner.responses.get(&key) {
            Some(Canned::Payload(payload)) => Ok(payload.clone()),
            Some(Canned::Body(body)) => serde_json::from_str(body).map_err(|e| FeedError::Json {
                message: e.to_string(),
                body: Some(body.clone()),
            }),
            Some(Canned::Status(401)) => Err(FeedError::Unauthorized),
            Some(Canned::Status(429)) => Err(FeedError::RateLimited),
            Some(Canned::Status(status)) => Err(FeedError::Api {
                status: *status,
                message: "mock failure".to_string(),
            }),
            None => Err(FeedError::Api {
                status: 404,
                message: format!("No mock data for {}/{}", stop_area_id, line_id),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A panic while holding the lock leaves the data usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
