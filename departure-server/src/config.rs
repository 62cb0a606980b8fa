//! Process configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::catalog::CatalogConfig;
use crate::pipeline::AggregatorConfig;
use crate::siri::SiriConfig;

const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Errors reading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name}: {value:?}: {message}")]
    Invalid {
        name: &'static str,
        value: String,
        message: String,
    },
}

/// Everything the server binary needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Initial live-feed API token; a token saved in settings wins.
    pub api_token: String,
    pub bind: SocketAddr,
    /// Directory holding `favourites.json` and `settings.json`.
    pub data_dir: PathBuf,
    /// Serve recorded payloads from this directory instead of the live feed.
    pub mock_dir: Option<PathBuf>,
    pub siri: SiriConfig,
    pub catalog: CatalogConfig,
    pub aggregator: AggregatorConfig,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    ///
    /// - `API_TOKEN`
    /// - `DEPARTURES_BIND` (default `127.0.0.1:3000`)
    /// - `DEPARTURES_DATA_DIR` (default `.`)
    /// - `DEPARTURES_MOCK_DIR`
    /// - `DEPARTURES_CONCURRENT_GROUPS` (default 1)
    /// - `SIRI_BASE_URL`, `CATALOG_BASE_URL`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_text = var("DEPARTURES_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_text.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            name: "DEPARTURES_BIND",
            value: bind_text.clone(),
            message: e.to_string(),
        })?;

        let mut aggregator = AggregatorConfig::default();
        if let Some(text) = var("DEPARTURES_CONCURRENT_GROUPS") {
            aggregator.max_concurrent_groups = match text.parse::<usize>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        name: "DEPARTURES_CONCURRENT_GROUPS",
                        value: text,
                        message: "must be at least 1".to_string(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        name: "DEPARTURES_CONCURRENT_GROUPS",
                        value: text,
                        message: e.to_string(),
                    });
                }
            };
        }

        let mut siri = SiriConfig::default();
        if let Some(url) = var("SIRI_BASE_URL") {
            siri = siri.with_base_url(url);
        }

        let mut catalog = CatalogConfig::default();
        if let Some(url) = var("CATALOG_BASE_URL") {
            catalog = catalog.with_base_url(url);
        }

        Ok(Self {
            api_token: var("API_TOKEN").unwrap_or_default(),
            bind,
            data_dir: var("DEPARTURES_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            mock_dir: var("DEPARTURES_MOCK_DIR").map(PathBuf::from),
            siri,
            catalog,
            aggregator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.api_token, "");
        assert_eq!(config.bind, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert!(config.mock_dir.is_none());
        assert_eq!(config.aggregator.max_concurrent_groups, 1);
        assert_eq!(config.aggregator.max_departures, 5);
        assert_eq!(config.siri.timeout_secs, 15);
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("API_TOKEN", "secret"),
            ("DEPARTURES_BIND", "0.0.0.0:8080"),
            ("DEPARTURES_DATA_DIR", "/var/lib/departures"),
            ("DEPARTURES_MOCK_DIR", "recorded"),
            ("DEPARTURES_CONCURRENT_GROUPS", "3"),
            ("SIRI_BASE_URL", "http://localhost:9000/siri"),
            ("CATALOG_BASE_URL", "http://localhost:9001"),
        ])
        .unwrap();

        assert_eq!(config.api_token, "secret");
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/departures"));
        assert_eq!(config.mock_dir, Some(PathBuf::from("recorded")));
        assert_eq!(config.aggregator.max_concurrent_groups, 3);
        assert_eq!(config.siri.base_url, "http://localhost:9000/siri");
        assert_eq!(config.catalog.base_url, "http://localhost:9001");
    }

    #[test]
    fn blank_values_are_unset() {
        let config = config(&[("API_TOKEN", "  "), ("DEPARTURES_BIND", "")]).unwrap();
        assert_eq!(config.api_token, "");
        assert_eq!(config.bind.port(), 3000);
    }

    #[test]
    fn invalid_values_rejected() {
        let err = config(&[("DEPARTURES_BIND", "localhost")]).unwrap_err();
        assert!(err.to_string().contains("DEPARTURES_BIND"));

        assert!(config(&[("DEPARTURES_CONCURRENT_GROUPS", "0")]).is_err());
        assert!(config(&[("DEPARTURES_CONCURRENT_GROUPS", "many")]).is_err());
    }
}
