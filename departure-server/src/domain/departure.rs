//! Real-time departures.

use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::Serialize;

/// Seconds past the expected time after which a vehicle counts as gone.
const DEPARTED_GRACE_SECS: f64 = 30.0;

/// One upcoming vehicle call, recomputed on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Departure {
    pub line_name: String,
    pub line_id: String,
    pub destination: String,
    /// ISO-8601 expected time with offset, or empty when the feed gave none.
    pub expected_iso: String,
    pub departure_status: String,
    pub vehicle_at_stop: bool,
    pub direction_ref: String,
    /// Epoch seconds at which the response was received.
    pub fetch_timestamp: f64,
    /// Seconds from `fetch_timestamp` to the expected time.
    ///
    /// 0 when the expected time is missing or unparseable, which is
    /// indistinguishable from "departing now".
    pub eta_seconds: f64,
}

impl Departure {
    /// Seconds left at epoch time `now`, counting down from the fetch.
    pub fn remaining_seconds(&self, now: f64) -> f64 {
        self.eta_seconds - (now - self.fetch_timestamp)
    }

    /// Countdown shown for this departure at epoch time `now`.
    pub fn countdown(&self, now: f64) -> Countdown {
        if self.eta_seconds <= 0.0 {
            return Countdown::Unknown;
        }
        let remaining = self.remaining_seconds(now);
        if remaining < -DEPARTED_GRACE_SECS {
            Countdown::Departed
        } else if remaining < 60.0 {
            Countdown::Imminent
        } else {
            Countdown::Minutes((remaining / 60.0) as u32)
        }
    }
}

/// Display state of a departure's countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "minutes", rename_all = "snake_case")]
pub enum Countdown {
    /// No usable expected time (or due at fetch time).
    Unknown,
    /// More than the grace period past the expected time.
    Departed,
    /// Under a minute to go.
    Imminent,
    /// Whole minutes remaining.
    Minutes(u32),
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Unknown => write!(f, "--"),
            Countdown::Departed => write!(f, "departed"),
            Countdown::Imminent => write!(f, "< 1 min"),
            Countdown::Minutes(m) => write!(f, "{m} min"),
        }
    }
}

/// Seconds between `fetch_timestamp` and an ISO-8601 instant.
///
/// A time without an offset is read as local time. Returns 0 for an empty
/// or unparseable time.
pub fn eta_seconds(expected_iso: &str, fetch_timestamp: f64) -> f64 {
    if expected_iso.is_empty() {
        return 0.0;
    }
    match parse_instant(expected_iso) {
        Some((secs, millis)) => secs as f64 + f64::from(millis) / 1000.0 - fetch_timestamp,
        None => 0.0,
    }
}

/// Epoch seconds and sub-second millis of an ISO-8601 time.
fn parse_instant(iso: &str) -> Option<(i64, u32)> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return Some((dt.timestamp(), dt.timestamp_subsec_millis()));
    }
    let naive = NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    let local = Local.from_local_datetime(&naive).earliest()?;
    Some((local.timestamp(), local.timestamp_subsec_millis()))
}
