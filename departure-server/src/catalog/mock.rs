//! In-memory catalog for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use super::client::StaticCatalog;
use super::error::CatalogError;
use super::types::{LineRecord, StopLineRecord, StopRecord};

/// Catalog serving fixed records and logging every query.
#[derive(Debug, Default)]
pub struct MockCatalog {
    lines: Vec<LineRecord>,
    routes: HashMap<String, Vec<StopLineRecord>>,
    stops: HashMap<String, StopRecord>,
    fail_status: Option<u16>,
    line_queries: Mutex<Vec<(String, String)>>,
    stop_lookups: Mutex<Vec<String>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines returned by every search, whatever the filters.
    pub fn with_lines(mut self, lines: Vec<LineRecord>) -> Self {
        self.lines = lines;
        self
    }

    pub fn with_route(mut self, route_id: &str, members: Vec<StopLineRecord>) -> Self {
        self.routes.insert(route_id.to_string(), members);
        self
    }

    pub fn with_stop(mut self, stop_id: &str, name: &str, stop_area_id: &str) -> Self {
        self.stops.insert(
            stop_id.to_string(),
            StopRecord {
                arrname: Some(name.to_string()),
                zdaid: Some(serde_json::Value::String(stop_area_id.to_string())),
            },
        );
        self
    }

    /// Fail every query with this HTTP status.
    pub fn failing(mut self, status: u16) -> Self {
        self.fail_status = Some(status);
        self
    }

    pub fn line_queries(&self) -> Vec<(String, String)> {
        self.line_queries.lock().unwrap().clone()
    }

    pub fn stop_lookups(&self) -> Vec<String> {
        self.stop_lookups.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), CatalogError> {
        match self.fail_status {
            Some(status) => Err(CatalogError::Api {
                status,
                message: "mock failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl StaticCatalog for MockCatalog {
    async fn search_lines(&self, query: &str, mode: &str) -> Result<Vec<LineRecord>, CatalogError> {
        self.line_queries
            .lock()
            .unwrap()
            .push((query.to_string(), mode.to_string()));
        self.check()?;
        Ok(self.lines.clone())
    }

    async fn stops_on_route(&self, route_id: &str) -> Result<Vec<StopLineRecord>, CatalogError> {
        self.check()?;
        Ok(self.routes.get(route_id).cloned().unwrap_or_default())
    }

    async fn find_stop(&self, stop_id: &str) -> Result<Option<StopRecord>, CatalogError> {
        self.stop_lookups.lock().unwrap().push(stop_id.to_string());
        self.check()?;
        Ok(self.stops.get(stop_id).cloned())
    }
}
