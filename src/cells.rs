//! Hexagonal cell index on the sphere.
//!
//! Wraps the hierarchical H3 index: converts a (lat, lng) to a cell
//! identifier at a given resolution and a cell identifier back to its
//! center and boundary ring, with antimeridian correction so a cell
//! straddling the date line never renders wrapped around the map.

use crate::error::{GlobeError, Result};
#[cfg(feature = "geojson")]
use geo::{Contains, Polygon};
use geo::{Coord, Point};
use h3o::{CellIndex, LatLng, Resolution};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Longitude gap in degrees beyond which a boundary vertex is treated as
/// having wrapped around the antimeridian relative to the cell center.
const ANTIMERIDIAN_GAP_DEG: f64 = 170.0;

/// Closed boundary ring of (lng, lat) vertices. Hexagons close at 7
/// vertices; pentagon-adjacent distortion can add a few more.
pub type BoundaryRing = SmallVec<[Coord; 8]>;

/// Opaque, stable identifier of one hexagonal cell at a fixed resolution.
///
/// Two points map to the same `CellId` iff they fall inside the same
/// hexagonal region at that resolution. The `Display`/`FromStr` forms give
/// the canonical string representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(CellIndex);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for CellId {
    type Err = GlobeError;

    fn from_str(s: &str) -> Result<Self> {
        CellIndex::from_str(s)
            .map(CellId)
            .map_err(|_| GlobeError::InvalidCellId(s.to_string()))
    }
}

/// Center and boundary of one hexagonal cell, derived deterministically
/// from its [`CellId`].
#[derive(Debug, Clone, PartialEq)]
pub struct CellGeometry {
    pub id: CellId,
    /// Cell center; `x` is longitude, `y` is latitude (geo convention).
    pub center: Point,
    /// Closed ring of (lng, lat) vertices, antimeridian-corrected.
    pub boundary: BoundaryRing,
}

/// Map a geographic coordinate to its hexagonal cell at `resolution`.
///
/// Deterministic: identical inputs always return the same `CellId`.
///
/// # Errors
///
/// Returns [`GlobeError::InvalidResolution`] for resolutions outside the
/// index range and [`GlobeError::InvalidCoordinate`] for non-finite or
/// out-of-range coordinates.
pub fn to_cell(lat: f64, lng: f64, resolution: u8) -> Result<CellId> {
    let resolution =
        Resolution::try_from(resolution).map_err(|_| GlobeError::InvalidResolution(resolution))?;
    let coords =
        LatLng::new(lat, lng).map_err(|_| GlobeError::InvalidCoordinate { lat, lng })?;
    Ok(CellId(coords.to_cell(resolution)))
}

/// Derive the center and boundary ring of a cell.
///
/// The boundary is returned as a closed ring (first vertex repeated at the
/// end) wound to match the renderer's polygon convention. Any vertex whose
/// longitude differs from the center longitude by more than 170 degrees is
/// shifted by ±360 so it lies on the same side of the date line as the
/// center.
pub fn cell_geometry(id: CellId) -> CellGeometry {
    let center = LatLng::from(id.0);
    let center_lng = center.lng();

    let mut boundary: BoundaryRing = id
        .0
        .boundary()
        .iter()
        .map(|vertex| Coord {
            x: vertex.lng(),
            y: vertex.lat(),
        })
        .collect();
    boundary.reverse();
    if let Some(&first) = boundary.first() {
        boundary.push(first);
    }

    for vertex in boundary.iter_mut() {
        if (center_lng - vertex.x).abs() > ANTIMERIDIAN_GAP_DEG {
            vertex.x += if center_lng > vertex.x { 360.0 } else { -360.0 };
        }
    }

    CellGeometry {
        id,
        center: Point::new(center_lng, center.lat()),
        boundary,
    }
}

/// Shrink a cell boundary toward its center by a relative `margin`.
///
/// A margin of 0 returns the ring unchanged; 1 collapses every vertex onto
/// the center. Used to pad bar footprints so adjacent bars do not touch.
pub fn inset_boundary(geometry: &CellGeometry, margin: f64) -> BoundaryRing {
    if margin == 0.0 {
        return geometry.boundary.clone();
    }
    let margin = margin.clamp(0.0, 1.0);
    let center = geometry.center;
    geometry
        .boundary
        .iter()
        .map(|vertex| Coord {
            x: vertex.x - (vertex.x - center.x()) * margin,
            y: vertex.y - (vertex.y - center.y()) * margin,
        })
        .collect()
}

/// Cover GeoJSON region features with cells at `resolution`.
///
/// Only `Polygon` and `MultiPolygon` geometries are supported; features
/// carrying any other geometry type are skipped with a warning, since this
/// path feeds the static background hex mesh where partial coverage is
/// tolerated.
///
/// # Errors
///
/// Returns [`GlobeError::InvalidResolution`] for an out-of-range resolution
/// and [`GlobeError::Geometry`] when a supported geometry fails to convert.
#[cfg(feature = "geojson")]
pub fn region_to_cells(
    collection: &geojson::FeatureCollection,
    resolution: u8,
) -> Result<Vec<CellId>> {
    let resolution =
        Resolution::try_from(resolution).map_err(|_| GlobeError::InvalidResolution(resolution))?;

    let mut cells = Vec::new();
    for feature in &collection.features {
        let Some(geometry) = feature.geometry.as_ref() else {
            continue;
        };
        match &geometry.value {
            geojson::Value::Polygon(_) | geojson::Value::MultiPolygon(_) => {
                let shape = geo::Geometry::<f64>::try_from(geometry.value.clone())
                    .map_err(|e| GlobeError::Geometry(e.to_string()))?;
                match shape {
                    geo::Geometry::Polygon(polygon) => {
                        cover_polygon(&polygon, resolution, &mut cells);
                    }
                    geo::Geometry::MultiPolygon(multi) => {
                        for polygon in &multi {
                            cover_polygon(polygon, resolution, &mut cells);
                        }
                    }
                    _ => unreachable!("matched polygon variants above"),
                }
            }
            other => {
                log::warn!(
                    "Unsupported GeoJson geometry type ({}), skipping feature",
                    other.type_name()
                );
            }
        }
    }
    Ok(cells)
}

/// Collect every cell at `resolution` whose center lies inside `polygon`.
#[cfg(feature = "geojson")]
fn cover_polygon(polygon: &Polygon, resolution: Resolution, out: &mut Vec<CellId>) {
    for cell in CellIndex::base_cells().flat_map(|base| base.children(resolution)) {
        let center = LatLng::from(cell);
        if polygon.contains(&Point::new(center.lng(), center.lat())) {
            out.push(CellId(cell));
        }
    }
}
