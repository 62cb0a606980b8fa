//! Record DTOs for the open-data catalogs.
//!
//! Only selected fields are requested, and any of them may be null.

use serde::Deserialize;
use serde_json::Value;

/// A record of the line reference dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineRecord {
    pub id_line: Option<String>,
    pub shortname_line: Option<String>,
    pub name_line: Option<String>,
    pub transportmode: Option<String>,
    pub colourweb_hexa: Option<String>,
    pub textcolourweb_hexa: Option<String>,
}

/// A record of the stop/line membership dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopLineRecord {
    pub stop_name: Option<String>,
    pub stop_id: Option<String>,
}

/// A record of the stops dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopRecord {
    pub arrname: Option<String>,
    /// Stop-area id; published as a number by some dataset versions.
    pub zdaid: Option<Value>,
}

impl StopRecord {
    /// The stop-area id as a string, empty when absent.
    pub fn stop_area_id(&self) -> String {
        match &self.zdaid {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }
}
