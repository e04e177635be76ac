//! Jobs-accessibility regions from a `TopoJSON` topology.
//!
//! Only what the heatmap needs is decoded: polygon and multipolygon
//! geometries of one named object, with their `OBJECTID` category. Arcs
//! may be quantized (delta-encoded integers plus a transform) or absolute.

use std::collections::BTreeMap;

use geo::{Coord, LineString, MultiPolygon, Polygon};
use parking_map_dataset_models::JobRegion;
use serde::Deserialize;

use crate::LoadError;

/// Property holding a region's accessibility category.
const CATEGORY_PROPERTY: &str = "OBJECTID";

#[derive(Debug, Deserialize)]
struct Topology {
    #[serde(default)]
    transform: Option<Transform>,
    arcs: Vec<Vec<Vec<f64>>>,
    objects: BTreeMap<String, TopoGeometry>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum TopoGeometry {
    GeometryCollection {
        geometries: Vec<TopoGeometry>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        properties: serde_json::Map<String, serde_json::Value>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default)]
        properties: serde_json::Map<String, serde_json::Value>,
    },
    #[serde(other)]
    Unsupported,
}

/// Parses the topology and returns the regions of object `object_name`.
///
/// Geometries without a category in 1-255 are skipped.
///
/// # Errors
///
/// Returns [`LoadError::Json`] for malformed JSON,
/// [`LoadError::MissingObject`] if the object does not exist, and
/// [`LoadError::Data`] if a geometry references an arc that does not
/// exist.
pub fn parse_job_regions(text: &str, object_name: &str) -> Result<Vec<JobRegion>, LoadError> {
    let topology: Topology = serde_json::from_str(text)?;
    let arcs = decode_arcs(&topology.arcs, topology.transform);

    let object = topology
        .objects
        .get(object_name)
        .ok_or_else(|| LoadError::MissingObject {
            name: object_name.to_owned(),
        })?;

    let mut regions = Vec::new();
    collect_regions(object, &arcs, &mut regions)?;
    log::debug!("Decoded {} job regions from '{object_name}'", regions.len());
    Ok(regions)
}

fn collect_regions(
    geometry: &TopoGeometry,
    arcs: &[Vec<Coord<f64>>],
    regions: &mut Vec<JobRegion>,
) -> Result<(), LoadError> {
    let (polygons, properties) = match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for geometry in geometries {
                collect_regions(geometry, arcs, regions)?;
            }
            return Ok(());
        }
        TopoGeometry::Polygon {
            arcs: rings,
            properties,
        } => (vec![polygon(rings, arcs)?], properties),
        TopoGeometry::MultiPolygon {
            arcs: polygons,
            properties,
        } => (
            polygons
                .iter()
                .map(|rings| polygon(rings, arcs))
                .collect::<Result<Vec<_>, _>>()?,
            properties,
        ),
        TopoGeometry::Unsupported => {
            log::debug!("Skipping non-polygon geometry in job topology");
            return Ok(());
        }
    };

    let category = properties
        .get(CATEGORY_PROPERTY)
        .and_then(serde_json::Value::as_u64)
        .and_then(|value| u8::try_from(value).ok())
        .filter(|value| *value > 0);
    let Some(category) = category else {
        log::warn!("Skipping job region without a usable {CATEGORY_PROPERTY}");
        return Ok(());
    };

    regions.push(JobRegion {
        category,
        polygon: MultiPolygon(polygons),
    });
    Ok(())
}

/// Converts every arc to absolute coordinates.
fn decode_arcs(arcs: &[Vec<Vec<f64>>], transform: Option<Transform>) -> Vec<Vec<Coord<f64>>> {
    arcs.iter()
        .map(|arc| {
            let positions = arc.iter().filter_map(|p| Some((*p.first()?, *p.get(1)?)));
            match transform {
                Some(t) => {
                    let (mut x, mut y) = (0.0, 0.0);
                    positions
                        .map(|(dx, dy)| {
                            x += dx;
                            y += dy;
                            Coord {
                                x: x.mul_add(t.scale[0], t.translate[0]),
                                y: y.mul_add(t.scale[1], t.translate[1]),
                            }
                        })
                        .collect()
                }
                None => positions.map(|(x, y)| Coord { x, y }).collect(),
            }
        })
        .collect()
}

fn polygon(rings: &[Vec<i64>], arcs: &[Vec<Coord<f64>>]) -> Result<Polygon<f64>, LoadError> {
    let mut rings = rings.iter().map(|ring| ring_coords(ring, arcs));
    let exterior = rings.next().transpose()?.unwrap_or_default();
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(
        LineString::new(exterior),
        interiors.into_iter().map(LineString::new).collect(),
    ))
}

/// Stitches arcs into one ring. A negative index `i` means arc `!i`
/// traversed backwards; the first point of every arc after the first
/// repeats the previous arc's last point and is dropped.
fn ring_coords(indices: &[i64], arcs: &[Vec<Coord<f64>>]) -> Result<Vec<Coord<f64>>, LoadError> {
    let mut coords: Vec<Coord<f64>> = Vec::new();

    for &index in indices {
        let (arc_index, reversed) = if index < 0 {
            (!index, true)
        } else {
            (index, false)
        };
        let arc = usize::try_from(arc_index)
            .ok()
            .and_then(|i| arcs.get(i))
            .ok_or_else(|| LoadError::Data {
                message: format!("TopoJSON arc index {index} out of range"),
            })?;

        let mut points: Vec<Coord<f64>> = arc.clone();
        if reversed {
            points.reverse();
        }
        let skip = usize::from(!coords.is_empty());
        coords.extend(points.into_iter().skip(skip));
    }

    Ok(coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    // Two unit squares sharing the edge x = 1, quantized with scale 1.
    const TOPOLOGY: &str = r#"{
        "type": "Topology",
        "transform": { "scale": [1, 1], "translate": [10, 20] },
        "arcs": [
            [[1, 0], [0, 1]],
            [[1, 1], [-1, 0], [0, -1], [1, 0]],
            [[1, 1], [1, 0], [0, -1], [-1, 0]]
        ],
        "objects": {
            "jobs": {
                "type": "GeometryCollection",
                "geometries": [
                    { "type": "Polygon", "arcs": [[0, 1]], "properties": { "OBJECTID": 3 } },
                    { "type": "MultiPolygon", "arcs": [[[2, -1]]], "properties": { "OBJECTID": 8 } },
                    { "type": "Point", "coordinates": [0, 0] },
                    { "type": "Polygon", "arcs": [[0, 1]], "properties": {} }
                ]
            }
        }
    }"#;

    #[test]
    fn decodes_quantized_arcs_and_categories() {
        let regions = parse_job_regions(TOPOLOGY, "jobs").unwrap();

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].category, 3);
        assert_eq!(regions[1].category, 8);
        assert_eq!(regions[1].color(), "#084594");

        let exterior = regions[0].polygon.0[0].exterior();
        assert_eq!(exterior.0.first(), Some(&Coord { x: 11.0, y: 20.0 }));
        assert!(exterior.is_closed());
        for region in &regions {
            assert!((region.polygon.unsigned_area() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn missing_object_is_reported_by_name() {
        let err = parse_job_regions(TOPOLOGY, "UMN_8cats").unwrap_err();
        assert!(matches!(err, LoadError::MissingObject { name } if name == "UMN_8cats"));
    }

    #[test]
    fn out_of_range_arc_is_a_data_error() {
        let text = r#"{
            "type": "Topology",
            "arcs": [[[0, 0], [1, 0]]],
            "objects": { "jobs": { "type": "Polygon", "arcs": [[5]], "properties": { "OBJECTID": 1 } } }
        }"#;
        assert!(matches!(
            parse_job_regions(text, "jobs"),
            Err(LoadError::Data { .. })
        ));
    }
}
