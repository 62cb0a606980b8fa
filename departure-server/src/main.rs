use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use departure_server::catalog::CatalogClient;
use departure_server::config::AppConfig;
use departure_server::refresh::{self, RefreshSchedule};
use departure_server::siri::{Credential, FeedBackend, MockFeed, SiriClient};
use departure_server::store::{FavouriteStore, SettingsStore};
use departure_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("departure_server=info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let favourites = FavouriteStore::in_dir(&config.data_dir);
    let settings_store = SettingsStore::in_dir(&config.data_dir);
    let settings = settings_store.load();

    // A token saved through the settings endpoint wins over the environment.
    let token = if settings.api_token.is_empty() {
        config.api_token.clone()
    } else {
        settings.api_token.clone()
    };
    let credential = Credential::new(token);
    if credential.is_empty().await {
        warn!("no API token: set API_TOKEN or save one in settings; live-feed calls will fail");
    }

    let feed = match &config.mock_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "serving recorded stop-monitoring payloads");
            FeedBackend::Mock(MockFeed::from_dir(dir)?)
        }
        None => FeedBackend::Live(SiriClient::new(config.siri.clone(), credential.clone())?),
    };
    let catalog = CatalogClient::new(config.catalog.clone())?;

    let state = AppState::new(
        feed,
        catalog,
        credential,
        favourites,
        settings_store,
        config.aggregator.clone(),
    );

    tokio::spawn(refresh::run(
        state.feed.clone(),
        state.favourites.clone(),
        config.aggregator.clone(),
        RefreshSchedule::every(settings.refresh_secs),
    ));

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(addr = %config.bind, data_dir = %config.data_dir.display(), "departure board listening");
    info!("  GET    /health");
    info!("  GET    /api/departures");
    info!("  GET    /api/lines?q=&mode=");
    info!("  GET    /api/stops?route_id=&filter=");
    info!("  GET    /api/directions?stop_id=&line_id=&stop_name=");
    info!("  GET    /api/favourites  (POST to add, DELETE to remove)");
    info!("  PUT    /api/settings/token");

    axum::serve(listener, app).await?;
    Ok(())
}
