//! Municipality boundary parsing.

use geo::MultiPolygon;
use parking_map_dataset_models::MunicipalityBoundary;

use crate::{LoadError, is_surveyed, parse_features};

/// Property holding a boundary's municipality name.
const NAME_PROPERTY: &str = "muni_name";

/// Parses the boundary `FeatureCollection`, keeping surveyed
/// municipalities only.
///
/// # Errors
///
/// Returns [`LoadError::GeoJson`] if the document is not valid `GeoJSON`.
pub fn parse_boundaries(text: &str) -> Result<Vec<MunicipalityBoundary>, LoadError> {
    let features = parse_features(text)?;
    let total = features.len();

    let boundaries: Vec<MunicipalityBoundary> = features
        .into_iter()
        .filter_map(|feature| {
            let name = feature
                .property(NAME_PROPERTY)
                .and_then(serde_json::Value::as_str)?
                .to_owned();
            if !is_surveyed(&name) {
                return None;
            }
            let Some(polygon) = feature.geometry.and_then(to_multipolygon) else {
                log::warn!("Boundary for {name} has no polygon geometry");
                return None;
            };
            Some(MunicipalityBoundary { name, polygon })
        })
        .collect();

    log::debug!(
        "Kept {} of {total} municipality boundaries",
        boundaries.len()
    );
    Ok(boundaries)
}

/// Converts a `GeoJSON` geometry into a [`MultiPolygon`]. Handles both
/// `Polygon` and `MultiPolygon` geometry types.
pub(crate) fn to_multipolygon(geometry: geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geometry: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geometry {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "muni_name": "Somerville" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-71.13, 42.37], [-71.07, 42.37], [-71.07, 42.42], [-71.13, 42.37]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "muni_name": "Worcester" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-71.9, 42.2], [-71.7, 42.2], [-71.7, 42.3], [-71.9, 42.2]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "muni_name": "Nahant" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-70.93, 42.42], [-70.90, 42.42], [-70.90, 42.44], [-70.93, 42.42]]],
                        [[[-70.95, 42.41], [-70.94, 42.41], [-70.94, 42.42], [-70.95, 42.41]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "muni_name": "Boston" },
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn keeps_only_surveyed_polygons() {
        let boundaries = parse_boundaries(BOUNDARIES).unwrap();

        let names: Vec<&str> = boundaries.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Somerville", "Nahant"]);
        assert_eq!(boundaries[0].polygon.0.len(), 1);
        assert_eq!(boundaries[1].polygon.0.len(), 2);
        assert!(boundaries[0].is_named("SOMERVILLE"));
    }

    #[test]
    fn invalid_document_is_an_error() {
        assert!(matches!(
            parse_boundaries("{ not json"),
            Err(LoadError::GeoJson(_))
        ));
    }
}
