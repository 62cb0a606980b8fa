//! Catalog-side line and stop records, and resolution results.

use serde::Serialize;

/// A line found by catalog search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineAtStop {
    pub line_id: String,
    pub line_name: String,
    pub mode: String,
    pub line_color: String,
    pub line_text_color: String,
    /// Route identifier used by the stop/line membership catalog.
    pub route_id: String,
}

/// A stop served by a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopOnLine {
    pub stop_name: String,
    pub stop_id: String,
}

/// Outcome of mapping a stop identifier to a stop area.
///
/// An empty `stop_area_id` means the stop could not be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub stop_area_id: String,
    pub stop_name: String,
}

impl Resolution {
    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn is_resolved(&self) -> bool {
        !self.stop_area_id.is_empty()
    }
}

/// A destination seen in live data and the direction reference serving it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionOption {
    pub destination: String,
    pub direction_ref: String,
}
