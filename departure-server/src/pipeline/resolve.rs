//! Stop resolution: catalog stop id to live-feed stop area.
//!
//! Rail and metro stops are published as `IDFM:monomodalStopPlace:<n>`,
//! where `<n>` already is the stop-area id. Bus and tram stops are published
//! as `IDFM:<n>` with a catalog-specific stop id that has to be looked up.

use tracing::debug;

use crate::catalog::{CatalogError, StaticCatalog};
use crate::domain::Resolution;

/// Segment marking a rail/metro stop identifier.
pub const RAIL_MARKER: &str = "monomodalStopPlace";

/// How a stop identifier maps to a stop area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopIdScheme {
    /// The trailing segment is the stop-area id.
    StopArea(String),
    /// The trailing segment is a catalog stop id.
    CatalogStop(String),
}

impl StopIdScheme {
    /// Classify an identifier by its shape alone.
    pub fn classify(stop_id: &str) -> Self {
        let trailing = stop_id.rsplit(':').next().unwrap_or(stop_id).to_string();
        if stop_id.split(':').any(|segment| segment == RAIL_MARKER) {
            StopIdScheme::StopArea(trailing)
        } else {
            StopIdScheme::CatalogStop(trailing)
        }
    }
}

/// Map a stop identifier to its stop area and display name.
///
/// Rail identifiers resolve without any catalog call and with an empty name.
/// Other identifiers cost one bounded catalog lookup; no match gives
/// [`Resolution::unresolved`]. Only transport failures are errors.
pub async fn resolve_stop<C: StaticCatalog>(
    catalog: &C,
    stop_id: &str,
) -> Result<Resolution, CatalogError> {
    match StopIdScheme::classify(stop_id) {
        StopIdScheme::StopArea(stop_area_id) => Ok(Resolution {
            stop_area_id,
            stop_name: String::new(),
        }),
        StopIdScheme::CatalogStop(catalog_id) => {
            let Some(record) = catalog.find_stop(&catalog_id).await? else {
                debug!(stop_id, "no catalog stop matches");
                return Ok(Resolution::unresolved());
            };
            Ok(Resolution {
                stop_area_id: record.stop_area_id(),
                stop_name: record.arrname.unwrap_or_default(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock::MockCatalog;

    #[test]
    fn classify_rail_identifier() {
        assert_eq!(
            StopIdScheme::classify("IDFM:monomodalStopPlace:43114"),
            StopIdScheme::StopArea("43114".to_string())
        );
    }

    #[test]
    fn classify_bus_identifier() {
        assert_eq!(
            StopIdScheme::classify("IDFM:423181"),
            StopIdScheme::CatalogStop("423181".to_string())
        );
        assert_eq!(
            StopIdScheme::classify("423181"),
            StopIdScheme::CatalogStop("423181".to_string())
        );
    }

    #[test]
    fn marker_must_be_a_whole_segment() {
        assert_eq!(
            StopIdScheme::classify("IDFM:xmonomodalStopPlace:1"),
            StopIdScheme::CatalogStop("1".to_string())
        );
    }

    #[tokio::test]
    async fn rail_resolves_without_catalog_call() {
        let catalog = MockCatalog::new();
        let res = resolve_stop(&catalog, "IDFM:monomodalStopPlace:43114")
            .await
            .unwrap();

        assert_eq!(res.stop_area_id, "43114");
        assert_eq!(res.stop_name, "");
        assert!(catalog.stop_lookups().is_empty());
    }

    #[tokio::test]
    async fn bus_resolves_with_one_lookup() {
        let catalog = MockCatalog::new().with_stop("423181", "Mairie de Montreuil", "70604");
        let res = resolve_stop(&catalog, "IDFM:423181").await.unwrap();

        assert_eq!(res.stop_area_id, "70604");
        assert_eq!(res.stop_name, "Mairie de Montreuil");
        assert_eq!(catalog.stop_lookups(), vec!["423181".to_string()]);
    }

    #[tokio::test]
    async fn unknown_bus_stop_is_unresolved() {
        let catalog = MockCatalog::new();
        let res = resolve_stop(&catalog, "IDFM:999").await.unwrap();

        assert!(!res.is_resolved());
        assert_eq!(res, Resolution::unresolved());
        assert_eq!(catalog.stop_lookups().len(), 1);
    }

    #[tokio::test]
    async fn catalog_failure_is_an_error() {
        let catalog = MockCatalog::new().failing(500);
        assert!(resolve_stop(&catalog, "IDFM:423181").await.is_err());
    }
}
