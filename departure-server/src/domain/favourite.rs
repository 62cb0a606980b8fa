//! Saved monitoring targets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default badge background colour (hex, no `#`).
pub const DEFAULT_LINE_COLOR: &str = "FFFFFF";

/// Default badge text colour (hex, no `#`).
pub const DEFAULT_LINE_TEXT_COLOR: &str = "000000";

fn default_line_color() -> String {
    DEFAULT_LINE_COLOR.to_string()
}

fn default_line_text_color() -> String {
    DEFAULT_LINE_TEXT_COLOR.to_string()
}

/// A saved (stop, line, direction, destination) monitoring target.
///
/// Identity for storage is `(stop_area_id, line_id, destination_name)`.
/// An empty `direction` accepts departures in any direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favourite {
    pub stop_area_id: String,
    pub stop_name: String,
    pub line_id: String,
    pub line_name: String,
    #[serde(default = "default_line_color")]
    pub line_color: String,
    #[serde(default = "default_line_text_color")]
    pub line_text_color: String,
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub destination_name: String,
}

impl Favourite {
    /// Create a favourite with default colours, any direction and no destination filter.
    pub fn new(
        stop_area_id: impl Into<String>,
        stop_name: impl Into<String>,
        line_id: impl Into<String>,
        line_name: impl Into<String>,
    ) -> Self {
        Self {
            stop_area_id: stop_area_id.into(),
            stop_name: stop_name.into(),
            line_id: line_id.into(),
            line_name: line_name.into(),
            line_color: default_line_color(),
            line_text_color: default_line_text_color(),
            direction: String::new(),
            destination_name: String::new(),
        }
    }

    /// Restrict to one direction reference and destination.
    pub fn with_direction(
        mut self,
        direction: impl Into<String>,
        destination_name: impl Into<String>,
    ) -> Self {
        self.direction = direction.into();
        self.destination_name = destination_name.into();
        self
    }

    /// Set the badge colours.
    pub fn with_colors(mut self, color: impl Into<String>, text_color: impl Into<String>) -> Self {
        self.line_color = color.into();
        self.line_text_color = text_color.into();
        self
    }

    /// Key under which this favourite's departures are returned.
    pub fn key(&self) -> FavouriteKey {
        FavouriteKey {
            stop_area_id: self.stop_area_id.clone(),
            line_id: self.line_id.clone(),
            direction: self.direction.clone(),
        }
    }

    /// Key of the live-feed request this favourite shares with others.
    pub fn group(&self) -> GroupKey {
        GroupKey {
            stop_area_id: self.stop_area_id.clone(),
            line_id: self.line_id.clone(),
        }
    }

    /// Whether two favourites are the same saved target.
    pub fn same_target(&self, other: &Favourite) -> bool {
        self.stop_area_id == other.stop_area_id
            && self.line_id == other.line_id
            && self.destination_name == other.destination_name
    }
}

/// Lookup key for one favourite's departure list.
///
/// Two favourites with the same stop, line and direction but different
/// destinations share a key; the later one in a pass wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FavouriteKey {
    pub stop_area_id: String,
    pub line_id: String,
    pub direction: String,
}

impl fmt::Display for FavouriteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.stop_area_id, self.line_id, self.direction)
    }
}

/// One live-feed request: a stop area and a line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub stop_area_id: String,
    pub line_id: String,
}
