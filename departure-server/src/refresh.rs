//! Periodic departure refresh.
//!
//! The board refreshes on a fixed period. Automatic refreshes pause during
//! the night, when nothing runs; refreshes a user asks for always run.

use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Timelike, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::Favourite;
use crate::jobs;
use crate::pipeline::{AggregatorConfig, DepartureMap};
use crate::siri::LiveFeed;
use crate::store::{DEFAULT_REFRESH_SECS, FavouriteStore};

/// Local hours during which automatic refreshes are skipped.
pub const QUIET_HOURS: Range<u32> = 2..5;

/// When automatic refreshes run.
#[derive(Debug, Clone)]
pub struct RefreshSchedule {
    pub period: Duration,
    pub quiet_hours: Range<u32>,
}

impl Default for RefreshSchedule {
    fn default() -> Self {
        Self::every(DEFAULT_REFRESH_SECS)
    }
}

impl RefreshSchedule {
    pub fn every(secs: u64) -> Self {
        Self {
            period: Duration::from_secs(secs.max(1)),
            quiet_hours: QUIET_HOURS,
        }
    }

    /// Whether `hour` (0-23, local) falls in the quiet period.
    pub fn is_quiet(&self, hour: u32) -> bool {
        self.quiet_hours.contains(&hour)
    }

    /// Whether an automatic refresh should run now.
    pub fn should_run_now(&self) -> bool {
        !self.is_quiet(Local::now().hour())
    }
}

/// One summary line per favourite, e.g. `Auber A -> Saint-Germain: 4 min, 12 min`.
pub fn summarize(departures: &DepartureMap, favourites: &[Favourite]) -> Vec<String> {
    let now = Utc::now().timestamp_millis() as f64 / 1000.0;
    favourites
        .iter()
        .map(|fav| {
            let label = if fav.destination_name.is_empty() {
                format!("{} {}", fav.stop_name, fav.line_name)
            } else {
                format!("{} {} -> {}", fav.stop_name, fav.line_name, fav.destination_name)
            };
            match departures.get(&fav.key()) {
                Some(deps) if !deps.is_empty() => {
                    let times: Vec<String> =
                        deps.iter().map(|d| d.countdown(now).to_string()).collect();
                    format!("{label}: {}", times.join(", "))
                }
                Some(_) => format!("{label}: no departures"),
                None => format!("{label}: unavailable"),
            }
        })
        .collect()
}

/// Refresh departures for the stored favourites forever.
///
/// Favourites are re-read on every cycle so additions and removals made
/// through the web layer are picked up. Reads take the same lock as the web
/// layer's writes.
pub async fn run<F>(
    feed: Arc<F>,
    favourites: Arc<Mutex<FavouriteStore>>,
    config: AggregatorConfig,
    schedule: RefreshSchedule,
) where
    F: LiveFeed + 'static,
{
    let mut ticker = tokio::time::interval(schedule.period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        if !schedule.should_run_now() {
            debug!("quiet hours, skipping automatic refresh");
            continue;
        }

        let favs = current_favourites(&favourites).await;
        if favs.is_empty() {
            debug!("no favourites to refresh");
            continue;
        }

        let outcome = jobs::departures(feed.clone(), favs.clone(), config.clone())
            .outcome()
            .await;

        info!(
            favourites = favs.len(),
            errors = outcome.errors.len(),
            "automatic refresh complete"
        );
        for line in summarize(&outcome.result, &favs) {
            info!("{line}");
        }
    }
}

async fn current_favourites(store: &Mutex<FavouriteStore>) -> Vec<Favourite> {
    store.lock().await.load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Departure;
    use tempfile::tempdir;

    #[tokio::test]
    async fn favourites_are_read_under_the_shared_lock() {
        let dir = tempdir().unwrap();
        let store = Arc::new(Mutex::new(FavouriteStore::in_dir(dir.path())));
        store
            .lock()
            .await
            .add(Favourite::new("1", "Auber", "L", "A"))
            .unwrap();

        let guard = store.lock().await;
        let pending = tokio::spawn({
            let store = Arc::clone(&store);
            async move { current_favourites(&store).await }
        });
        tokio::task::yield_now().await;
        assert!(!pending.is_finished());

        guard.add(Favourite::new("2", "Gare", "L", "A")).unwrap();
        drop(guard);

        let favs = pending.await.unwrap();
        let stops: Vec<_> = favs.iter().map(|f| f.stop_name.as_str()).collect();
        assert_eq!(stops, vec!["Auber", "Gare"]);
    }

    #[test]
    fn quiet_between_two_and_five() {
        let schedule = RefreshSchedule::default();
        assert!(!schedule.is_quiet(1));
        assert!(schedule.is_quiet(2));
        assert!(schedule.is_quiet(4));
        assert!(!schedule.is_quiet(5));
        assert!(!schedule.is_quiet(23));
    }

    #[test]
    fn default_period_is_one_minute() {
        assert_eq!(RefreshSchedule::default().period, Duration::from_secs(60));
        assert_eq!(RefreshSchedule::every(0).period, Duration::from_secs(1));
    }

    #[test]
    fn summary_lines() {
        let with_deps = Favourite::new("1", "Auber", "L", "A").with_direction("1", "Saint-Germain");
        let empty = Favourite::new("2", "Gare", "L", "A");
        let failed = Favourite::new("3", "Mairie", "L", "A");

        let mut map = DepartureMap::new();
        map.insert(
            with_deps.key(),
            vec![Departure {
                line_name: "A".into(),
                line_id: "L".into(),
                destination: "Saint-Germain-en-Laye".into(),
                expected_iso: String::new(),
                departure_status: String::new(),
                vehicle_at_stop: false,
                direction_ref: "1".into(),
                fetch_timestamp: 0.0,
                eta_seconds: 0.0,
            }],
        );
        map.insert(empty.key(), Vec::new());

        let lines = summarize(&map, &[with_deps, empty, failed]);
        assert_eq!(
            lines,
            vec![
                "Auber A -> Saint-Germain: --".to_string(),
                "Gare A: no departures".to_string(),
                "Mairie A: unavailable".to_string(),
            ]
        );
    }
}
