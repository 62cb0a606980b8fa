//! Open-data catalog client (Opendatasoft explore API v2.1).

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::error::CatalogError;
use super::types::{LineRecord, StopLineRecord, StopRecord};

/// Default base URL for the open-data portal.
const DEFAULT_BASE_URL: &str = "https://data.iledefrance-mobilites.fr/api/explore/v2.1";

const STOPS_DATASET: &str = "arrets";
const STOP_LINES_DATASET: &str = "arrets-lignes";
const LINES_DATASET: &str = "referentiel-des-lignes";

const LINE_FIELDS: &str =
    "id_line,shortname_line,name_line,transportmode,colourweb_hexa,textcolourweb_hexa";
const STOP_LINE_FIELDS: &str = "stop_name,stop_id";
const STOP_FIELDS: &str = "arrname,zdaid";

/// Configuration for the catalog client.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum lines returned by a search
    pub line_search_limit: u32,
    /// Maximum membership records fetched for one route
    pub stops_on_line_limit: u32,
}

impl CatalogConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
            line_search_limit: 20,
            stops_on_line_limit: 100,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Source of static catalog records.
pub trait StaticCatalog: Send + Sync {
    /// Lines whose short name matches `query`, optionally restricted to one
    /// transport mode. Either filter may be empty.
    fn search_lines(
        &self,
        query: &str,
        mode: &str,
    ) -> impl Future<Output = Result<Vec<LineRecord>, CatalogError>> + Send;

    /// Stop memberships of a route.
    fn stops_on_route(
        &self,
        route_id: &str,
    ) -> impl Future<Output = Result<Vec<StopLineRecord>, CatalogError>> + Send;

    /// The stop with this catalog-specific id, if any.
    fn find_stop(
        &self,
        stop_id: &str,
    ) -> impl Future<Output = Result<Option<StopRecord>, CatalogError>> + Send;
}

/// Remove characters that would end a quoted filter literal.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', ""))
}

/// `where` clause for a line search, `None` when unfiltered.
pub fn line_search_filter(query: &str, mode: &str) -> Option<String> {
    let mut parts = Vec::new();
    if !query.is_empty() {
        parts.push(format!("search(shortname_line, {})", quote(query)));
    }
    if !mode.is_empty() {
        parts.push(format!("transportmode={}", quote(mode)));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" AND "))
    }
}

/// `where` clause selecting one route's memberships.
pub fn route_filter(route_id: &str) -> String {
    format!("id={}", quote(route_id))
}

/// `where` clause selecting one stop by catalog id.
pub fn stop_filter(stop_id: &str) -> String {
    format!("arrid={}", quote(stop_id))
}

/// Decode records one by one, skipping those that don't fit `T`.
fn decode_records<T: DeserializeOwned>(records: Vec<Value>) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|r| match serde_json::from_value(r) {
            Ok(rec) => Some(rec),
            Err(e) => {
                debug!(error = %e, "skipping undecodable catalog record");
                None
            }
        })
        .collect()
}

/// Client for the open-data catalogs.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    config: CatalogConfig,
}

impl CatalogClient {
    /// Create a new catalog client.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    /// Query a dataset's records.
    ///
    /// A JSON body without a `results` array yields no records.
    async fn records(
        &self,
        dataset: &str,
        filter: Option<String>,
        select: &str,
        limit: u32,
    ) -> Result<Vec<Value>, CatalogError> {
        let url = format!(
            "{}/catalog/datasets/{}/records",
            self.config.base_url, dataset
        );

        let mut params = vec![
            ("select", select.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(filter) = filter {
            params.push(("where", filter));
        }

        debug!(dataset, ?params, "querying catalog");

        let response = self.http.get(&url).query(&params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let value: Value = serde_json::from_str(&body).map_err(|e| CatalogError::Json {
            message: e.to_string(),
        })?;

        match value.get("results") {
            Some(Value::Array(results)) => Ok(results.clone()),
            _ => {
                debug!(dataset, "catalog response has no results array");
                Ok(Vec::new())
            }
        }
    }
}

impl StaticCatalog for CatalogClient {
    async fn search_lines(&self, query: &str, mode: &str) -> Result<Vec<LineRecord>, CatalogError> {
        let records = self
            .records(
                LINES_DATASET,
                line_search_filter(query, mode),
                LINE_FIELDS,
                self.config.line_search_limit,
            )
            .await?;
        Ok(decode_records(records))
    }

    async fn stops_on_route(&self, route_id: &str) -> Result<Vec<StopLineRecord>, CatalogError> {
        let records = self
            .records(
                STOP_LINES_DATASET,
                Some(route_filter(route_id)),
                STOP_LINE_FIELDS,
                self.config.stops_on_line_limit,
            )
            .await?;
        Ok(decode_records(records))
    }

    async fn find_stop(&self, stop_id: &str) -> Result<Option<StopRecord>, CatalogError> {
        let records = self
            .records(STOPS_DATASET, Some(stop_filter(stop_id)), STOP_FIELDS, 1)
            .await?;
        Ok(decode_records(records).into_iter().next())
    }
}
