//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::catalog::CatalogClient;
use crate::pipeline::AggregatorConfig;
use crate::siri::{Credential, FeedBackend};
use crate::store::{FavouriteStore, SettingsStore};

/// Shared application state.
///
/// Generic over the live feed and the catalog so tests can run the real
/// handlers against in-memory fakes.
pub struct AppState<F = FeedBackend, C = CatalogClient> {
    /// Live stop-monitoring feed
    pub feed: Arc<F>,

    /// Static open-data catalogs
    pub catalog: Arc<C>,

    /// API key read by every live-feed call
    pub credential: Credential,

    /// Favourites file; the lock serialises read-modify-write updates
    pub favourites: Arc<Mutex<FavouriteStore>>,

    pub settings: Arc<Mutex<SettingsStore>>,

    pub aggregator: Arc<AggregatorConfig>,
}

impl<F, C> AppState<F, C> {
    pub fn new(
        feed: F,
        catalog: C,
        credential: Credential,
        favourites: FavouriteStore,
        settings: SettingsStore,
        aggregator: AggregatorConfig,
    ) -> Self {
        Self {
            feed: Arc::new(feed),
            catalog: Arc::new(catalog),
            credential,
            favourites: Arc::new(Mutex::new(favourites)),
            settings: Arc::new(Mutex::new(settings)),
            aggregator: Arc::new(aggregator),
        }
    }
}

impl<F, C> Clone for AppState<F, C> {
    fn clone(&self) -> Self {
        Self {
            feed: Arc::clone(&self.feed),
            catalog: Arc::clone(&self.catalog),
            credential: self.credential.clone(),
            favourites: Arc::clone(&self.favourites),
            settings: Arc::clone(&self.settings),
            aggregator: Arc::clone(&self.aggregator),
        }
    }
}
