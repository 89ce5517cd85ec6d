//! Point-to-cell bucketing and value aggregation.
//!
//! Buckets input points into hexagonal cells, merges co-located records,
//! sums the metric value, and computes each cell's count-based rank and bar
//! height. One aggregation pass produces the whole batch; updates replace
//! the batch wholesale.

use crate::cells::{self, CellGeometry, CellId};
use crate::error::{GlobeError, Result};
use crate::height;
use crate::types::GeoPoint;

/// One value-weighted hexagonal cell produced by aggregation.
#[derive(Debug, Clone)]
pub struct AggregatedCell {
    pub id: CellId,
    pub geometry: CellGeometry,
    /// Distinct first-seen city names joined with ", ".
    pub label: String,
    /// Country of the first point merged into this cell.
    pub country: Option<String>,
    /// Sum of all merged point values.
    pub value: f64,
    /// 1 + number of cells with strictly greater value. Equal-value cells
    /// share a rank number; this is a count, not a dense ranking.
    pub rank: usize,
    /// Radial distance from the globe center to the bar top.
    pub height_offset: f64,
}

/// Bucket `points` into cells at `resolution` and aggregate per cell.
///
/// Output order is the insertion order of first-seen cells. An empty input
/// returns an empty batch; callers treat that as "nothing to visualize".
/// Points whose coordinates cannot be indexed are skipped with a warning.
///
/// # Errors
///
/// Returns [`GlobeError::InvalidResolution`] when `resolution` is outside
/// the index range; individual bad points never fail the batch.
pub fn aggregate(
    points: &[GeoPoint],
    resolution: u8,
    globe_radius: f64,
    highest_bar_fraction: f64,
) -> Result<Vec<AggregatedCell>> {
    let mut batch: Vec<AggregatedCell> = Vec::new();

    for point in points {
        let id = match cells::to_cell(point.coordinates.lat, point.coordinates.lon, resolution) {
            Ok(id) => id,
            Err(err @ GlobeError::InvalidResolution(_)) => return Err(err),
            Err(err) => {
                log::warn!("Skipping point \"{}\": {err}", point.city);
                continue;
            }
        };

        // Linear scan keeps the first-seen cell order stable.
        if let Some(existing) = batch.iter_mut().find(|cell| cell.id == id) {
            existing.value += point.value;
            if !point.city.is_empty()
                && !existing.label.split(", ").any(|city| city == point.city)
            {
                if existing.label.is_empty() {
                    existing.label.push_str(&point.city);
                } else {
                    existing.label.push_str(", ");
                    existing.label.push_str(&point.city);
                }
            }
        } else {
            batch.push(AggregatedCell {
                id,
                geometry: cells::cell_geometry(id),
                label: point.city.clone(),
                country: point.country.clone(),
                value: point.value,
                rank: 0,
                height_offset: globe_radius,
            });
        }
    }

    let max_value = batch.iter().map(|cell| cell.value).fold(0.0, f64::max);
    for index in 0..batch.len() {
        let value = batch[index].value;
        batch[index].rank = 1 + batch.iter().filter(|cell| cell.value > value).count();
        batch[index].height_offset =
            height::height_offset(value, max_value, globe_radius, highest_bar_fraction);
    }

    Ok(batch)
}
