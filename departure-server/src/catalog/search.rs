//! Line search and stops-on-line lookups.
//!
//! Turns raw catalog records into display-ready lists: lines in natural
//! order of their label, stops deduplicated by name and sorted.

use std::collections::HashSet;

use crate::domain::{
    DEFAULT_LINE_COLOR, DEFAULT_LINE_TEXT_COLOR, LineAtStop, NaturalKey, StopOnLine,
};

use super::client::StaticCatalog;
use super::error::CatalogError;
use super::types::{LineRecord, StopLineRecord};

/// Prefix that turns a line id into a membership route id.
const ROUTE_PREFIX: &str = "IDFM:";

/// Search lines by label and optional transport mode.
pub async fn search_lines<C: StaticCatalog>(
    catalog: &C,
    query: &str,
    mode: &str,
) -> Result<Vec<LineAtStop>, CatalogError> {
    let records = catalog.search_lines(query, mode).await?;
    Ok(lines_from_records(records))
}

/// List the distinct stops of a route.
pub async fn stops_on_line<C: StaticCatalog>(
    catalog: &C,
    route_id: &str,
) -> Result<Vec<StopOnLine>, CatalogError> {
    let records = catalog.stops_on_route(route_id).await?;
    Ok(stops_from_records(records))
}

/// Build display lines, sorted naturally by label.
pub fn lines_from_records(records: Vec<LineRecord>) -> Vec<LineAtStop> {
    let mut lines: Vec<LineAtStop> = records
        .into_iter()
        .map(|r| {
            let line_id = r.id_line.unwrap_or_default();
            LineAtStop {
                route_id: format!("{ROUTE_PREFIX}{line_id}"),
                line_name: r
                    .shortname_line
                    .filter(|s| !s.is_empty())
                    .or(r.name_line)
                    .unwrap_or_default(),
                mode: r.transportmode.unwrap_or_default(),
                line_color: r
                    .colourweb_hexa
                    .unwrap_or_else(|| DEFAULT_LINE_COLOR.to_string()),
                line_text_color: r
                    .textcolourweb_hexa
                    .unwrap_or_else(|| DEFAULT_LINE_TEXT_COLOR.to_string()),
                line_id,
            }
        })
        .collect();

    lines.sort_by_cached_key(|l| NaturalKey::new(&l.line_name));
    lines
}

/// Build the stop list: first record per name wins, nameless records are
/// dropped, result sorted by name.
pub fn stops_from_records(records: Vec<StopLineRecord>) -> Vec<StopOnLine> {
    let mut seen = HashSet::new();
    let mut stops: Vec<StopOnLine> = records
        .into_iter()
        .filter_map(|r| {
            let name = r.stop_name.filter(|n| !n.is_empty())?;
            if !seen.insert(name.clone()) {
                return None;
            }
            Some(StopOnLine {
                stop_name: name,
                stop_id: r.stop_id.unwrap_or_default(),
            })
        })
        .collect();

    stops.sort_by(|a, b| a.stop_name.cmp(&b.stop_name));
    stops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock::MockCatalog;

    fn line(id: &str, short: Option<&str>, long: Option<&str>) -> LineRecord {
        LineRecord {
            id_line: Some(id.to_string()),
            shortname_line: short.map(str::to_string),
            name_line: long.map(str::to_string),
            transportmode: Some("bus".to_string()),
            colourweb_hexa: Some("E2231A".to_string()),
            textcolourweb_hexa: Some("FFFFFF".to_string()),
        }
    }

    fn member(name: &str, id: &str) -> StopLineRecord {
        StopLineRecord {
            stop_name: Some(name.to_string()),
            stop_id: Some(id.to_string()),
        }
    }

    #[test]
    fn lines_sorted_naturally() {
        let lines = lines_from_records(vec![
            line("C3", Some("10"), None),
            line("C4", Some("T3a"), None),
            line("C2", Some("2"), None),
            line("C5", Some("T1"), None),
            line("C1", Some("1"), None),
        ]);
        let names: Vec<_> = lines.iter().map(|l| l.line_name.as_str()).collect();
        assert_eq!(names, vec!["1", "2", "10", "T1", "T3a"]);
    }

    #[test]
    fn line_fields_and_route_id() {
        let lines = lines_from_records(vec![line("C01259", Some("259"), Some("Bus 259"))]);
        let l = &lines[0];
        assert_eq!(l.line_id, "C01259");
        assert_eq!(l.line_name, "259");
        assert_eq!(l.mode, "bus");
        assert_eq!(l.line_color, "E2231A");
        assert_eq!(l.line_text_color, "FFFFFF");
        assert_eq!(l.route_id, "IDFM:C01259");
    }

    #[test]
    fn long_name_used_without_short_name() {
        let lines = lines_from_records(vec![line("C1", None, Some("Tram T2"))]);
        assert_eq!(lines[0].line_name, "Tram T2");
        let lines = lines_from_records(vec![line("C1", Some(""), Some("Tram T2"))]);
        assert_eq!(lines[0].line_name, "Tram T2");
    }

    #[test]
    fn default_colours() {
        let lines = lines_from_records(vec![LineRecord {
            id_line: Some("C1".into()),
            ..Default::default()
        }]);
        assert_eq!(lines[0].line_color, "FFFFFF");
        assert_eq!(lines[0].line_text_color, "000000");
        assert_eq!(lines[0].line_name, "");
    }

    #[test]
    fn stops_deduplicated_by_name_first_kept() {
        let stops = stops_from_records(vec![
            member("Nation", "IDFM:1"),
            member("Bastille", "IDFM:2"),
            member("Nation", "IDFM:3"),
        ]);
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].stop_name, "Bastille");
        assert_eq!(stops[1].stop_name, "Nation");
        assert_eq!(stops[1].stop_id, "IDFM:1");
    }

    #[test]
    fn nameless_stops_dropped() {
        let stops = stops_from_records(vec![
            StopLineRecord {
                stop_name: None,
                stop_id: Some("IDFM:9".into()),
            },
            member("", "IDFM:8"),
            member("Nation", "IDFM:1"),
        ]);
        assert_eq!(stops.len(), 1);
    }

    #[tokio::test]
    async fn search_passes_filters_through() {
        let catalog = MockCatalog::new().with_lines(vec![line("C01259", Some("259"), None)]);

        let lines = search_lines(&catalog, "259", "bus").await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(
            catalog.line_queries(),
            vec![("259".to_string(), "bus".to_string())]
        );
    }

    #[tokio::test]
    async fn stops_on_line_queries_route() {
        let catalog = MockCatalog::new().with_route(
            "IDFM:C01259",
            vec![member("Nation", "IDFM:1"), member("Nation", "IDFM:2")],
        );

        let stops = stops_on_line(&catalog, "IDFM:C01259").await.unwrap();
        assert_eq!(stops.len(), 1);

        let none = stops_on_line(&catalog, "IDFM:other").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn transport_error_propagates() {
        let catalog = MockCatalog::new().failing(503);
        let err = search_lines(&catalog, "259", "").await.unwrap_err();
        assert!(err.is_transport());
    }
}
