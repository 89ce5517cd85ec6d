//! Bar and background-mesh geometry parameters for the external renderer.
//!
//! The core never builds meshes; it hands the renderer boundary rings plus
//! bottom/top heights and keeps just enough world-space data per bar (base,
//! top, circumradius) to serve as the picking proxy for selection.

use crate::aggregate::AggregatedCell;
use crate::cells::{self, BoundaryRing, CellId};
use crate::height;
use crate::projection;
use glam::DVec3;
use uuid::Uuid;

/// Geometry parameters for one value bar.
///
/// `instance_id` identifies the built mesh instance across renderer and
/// highlight commands; `cell` identifies the logical cell. A new id is
/// minted on every data update, matching the wholesale rebuild lifecycle.
#[derive(Debug, Clone)]
pub struct BarInstance {
    pub instance_id: Uuid,
    pub cell: CellId,
    /// Footprint ring (lng, lat), inset by the configured hex margin.
    pub ring: BoundaryRing,
    /// Radial distance of the bar bottom (the sphere surface).
    pub bottom_height: f64,
    /// Radial distance of the bar top.
    pub top_height: f64,
    /// World-space point at the cell center on the sphere surface.
    pub base_point: DVec3,
    /// World-space point at the cell center at `top_height`.
    pub top_point: DVec3,
    /// Circumradius of the footprint in world units; picking proxy radius.
    pub pick_radius: f64,
}

/// One flat cell of the static background hex mesh.
#[derive(Debug, Clone)]
pub struct HexTile {
    pub cell: CellId,
    pub ring: BoundaryRing,
    /// Radial distance of the flat tile, slightly above the surface.
    pub height: f64,
}

/// Build bar geometry parameters for an aggregated batch.
pub fn build_bars(
    batch: &[AggregatedCell],
    hex_margin: f64,
    globe_radius: f64,
) -> Vec<BarInstance> {
    batch
        .iter()
        .map(|cell| {
            let ring = cells::inset_boundary(&cell.geometry, hex_margin);
            let center = cell.geometry.center;
            let base_point = projection::project(center.y(), center.x(), globe_radius, 0.0);
            let top_point = projection::project(center.y(), center.x(), cell.height_offset, 0.0);
            let pick_radius = cell
                .geometry
                .boundary
                .iter()
                .map(|vertex| {
                    projection::project(vertex.y, vertex.x, globe_radius, 0.0)
                        .distance(base_point)
                })
                .fold(0.0, f64::max);

            BarInstance {
                instance_id: Uuid::new_v4(),
                cell: cell.id,
                ring,
                bottom_height: globe_radius,
                top_height: cell.height_offset,
                base_point,
                top_point,
                pick_radius,
            }
        })
        .collect()
}

/// Build the flat tiles covering `cell_ids`, lifted just above the surface.
pub fn build_background_mesh(
    cell_ids: &[CellId],
    hex_margin: f64,
    globe_radius: f64,
    resolution: u8,
) -> Vec<HexTile> {
    let offset = height::hex_mesh_offset(globe_radius, resolution);
    cell_ids
        .iter()
        .map(|&id| {
            let geometry = cells::cell_geometry(id);
            HexTile {
                cell: id,
                ring: cells::inset_boundary(&geometry, hex_margin),
                height: globe_radius + offset,
            }
        })
        .collect()
}
