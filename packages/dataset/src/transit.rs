//! Commuter rail and rapid transit line parsing.

use parking_map_dataset_models::{TransitKind, TransitLine};

use crate::{LoadError, parse_features};

/// Rapid transit property naming the line, which doubles as its colour.
const LINE_PROPERTY: &str = "LINE";

/// Commuter rail property naming the line.
const COMMUTER_LINE_PROPERTY: &str = "COMM_LINE";

/// Parses a transit `FeatureCollection` into lines of `kind`.
///
/// Features without a geometry are skipped.
///
/// # Errors
///
/// Returns [`LoadError::GeoJson`] if the document is not valid `GeoJSON`.
pub fn parse_transit_lines(text: &str, kind: TransitKind) -> Result<Vec<TransitLine>, LoadError> {
    let mut lines = Vec::new();

    for feature in parse_features(text)? {
        let string_property = |key: &str| {
            feature
                .property(key)
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        };
        let (name, color) = match kind {
            TransitKind::RapidTransit => {
                let line = string_property(LINE_PROPERTY);
                (line.clone(), line)
            }
            TransitKind::CommuterRail => (string_property(COMMUTER_LINE_PROPERTY), None),
        };

        let Some(geometry) = feature.geometry else {
            log::debug!("Skipping {kind:?} feature without geometry");
            continue;
        };
        let geometry: geo::Geometry<f64> = match geometry.try_into() {
            Ok(geometry) => geometry,
            Err(e) => {
                log::warn!("Skipping {kind:?} feature with unsupported geometry: {e}");
                continue;
            }
        };

        lines.push(TransitLine {
            kind,
            name,
            color,
            geometry,
        });
    }

    log::debug!("Parsed {} {kind:?} lines", lines.len());
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_map_dataset_models::COMMUTER_RAIL_COLOR;

    const RAPID: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "LINE": "RED" },
                "geometry": { "type": "LineString", "coordinates": [[-71.12, 42.39], [-71.06, 42.35]] }
            },
            {
                "type": "Feature",
                "properties": { "LINE": "ORANGE" },
                "geometry": null
            }
        ]
    }"#;

    const RAIL: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "COMM_LINE": "Fitchburg" },
                "geometry": {
                    "type": "MultiLineString",
                    "coordinates": [[[-71.3, 42.4], [-71.1, 42.38]], [[-71.1, 42.38], [-71.06, 42.36]]]
                }
            }
        ]
    }"#;

    #[test]
    fn rapid_transit_keeps_line_colour() {
        let lines = parse_transit_lines(RAPID, TransitKind::RapidTransit).unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].stroke(), "RED");
        assert!(matches!(lines[0].geometry, geo::Geometry::LineString(_)));
    }

    #[test]
    fn commuter_rail_uses_fixed_colour() {
        let lines = parse_transit_lines(RAIL, TransitKind::CommuterRail).unwrap();

        assert_eq!(lines[0].name.as_deref(), Some("Fitchburg"));
        assert_eq!(lines[0].stroke(), COMMUTER_RAIL_COLOR);
        assert!(matches!(lines[0].geometry, geo::Geometry::MultiLineString(_)));
    }
}
