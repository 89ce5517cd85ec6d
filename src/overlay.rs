//! Per-frame overlay anchor ranking, scaling, and occlusion.
//!
//! Every rendered frame the ranker recomputes camera distance and screen
//! position for each anchor, sorts by distance, keeps the configured number
//! visible, scales them by depth, force-shows the hovered/clicked anchor on
//! top, and finally hides any anchor whose line of sight is blocked by the
//! solid sphere. The frame's inputs fully determine the outcome; no state
//! survives between frames except the anchors' last-computed fields.

use crate::aggregate::AggregatedCell;
use crate::camera::CameraSnapshot;
use crate::cells::CellId;
use crate::projection;
use crate::selection::SelectionState;
use glam::{DVec2, DVec3};
use rustc_hash::FxHashMap;
use uuid::Uuid;

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Visibility state of one anchor after ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorState {
    /// Beyond the rank limit or occluded by the globe.
    Hidden,
    /// Visible through distance ranking.
    Ranked,
    /// Hovered or clicked; always topmost at full emphasis.
    Forced,
}

/// Screen-space placement state for one overlay label.
///
/// Anchors live exactly as long as their aggregated batch: built in bulk
/// after aggregation, discarded in bulk on the next update.
#[derive(Debug, Clone)]
pub struct OverlayAnchor {
    /// Mesh instance id shared with the corresponding bar.
    pub id: Uuid,
    pub cell: CellId,
    /// World-space reference point (bar top at the cell center).
    pub position: DVec3,
    pub distance_to_camera: f64,
    pub screen_ndc: DVec2,
    pub pixel_position: DVec2,
    pub state: AnchorState,
    /// Depth emphasis in [0.5, 1.0] while visible, 0 while hidden.
    pub scale: f64,
    /// Stacking order; higher renders on top.
    pub z_order: i64,
}

/// Build one anchor per aggregated cell, anchored at the bar top.
///
/// `instance_ids` maps each cell to the mesh instance id of its bar so
/// labels and bars share an identity.
pub fn build_anchors(
    batch: &[AggregatedCell],
    instance_ids: &FxHashMap<CellId, Uuid>,
) -> Vec<OverlayAnchor> {
    batch
        .iter()
        .map(|cell| {
            let center = cell.geometry.center;
            OverlayAnchor {
                id: instance_ids.get(&cell.id).copied().unwrap_or_else(Uuid::new_v4),
                cell: cell.id,
                position: projection::project(center.y(), center.x(), cell.height_offset, 0.0),
                distance_to_camera: 0.0,
                screen_ndc: DVec2::ZERO,
                pixel_position: DVec2::ZERO,
                state: AnchorState::Hidden,
                scale: 0.0,
                z_order: 0,
            }
        })
        .collect()
}

/// Linear depth emphasis: 1.0 at `min_distance`, 0.5 at `max_distance`,
/// clamped in between. Equal bounds return 1.0.
///
/// # Panics
///
/// Panics when `min_distance > max_distance`; that means the caller failed
/// to sort anchors by distance and must surface as a bug, not a clamp.
pub fn depth_scale(distance: f64, min_distance: f64, max_distance: f64) -> f64 {
    assert!(
        min_distance <= max_distance,
        "min_distance ({min_distance}) cannot be greater than max_distance ({max_distance})"
    );
    if min_distance == max_distance {
        return 1.0;
    }
    let cropped = distance.clamp(min_distance, max_distance);
    (max_distance - cropped) / (max_distance - min_distance) * 0.5 + 0.5
}

/// Per-frame visibility, stacking, and scale decisions for overlay anchors.
#[derive(Debug, Clone)]
pub struct VisibilityRanker {
    /// Maximum rank-visible anchors; `None` shows all.
    limit: Option<usize>,
    globe_radius: f64,
}

impl VisibilityRanker {
    pub fn new(limit: Option<usize>, globe_radius: f64) -> Self {
        Self {
            limit,
            globe_radius,
        }
    }

    /// Recompute every anchor's placement and visibility for this frame.
    ///
    /// Anchors are reordered in place (ascending camera distance). The
    /// hovered/clicked anchor is forced visible and topmost regardless of
    /// its rank; occlusion by the solid sphere overrides everything.
    pub fn update(
        &self,
        anchors: &mut [OverlayAnchor],
        camera: &CameraSnapshot,
        viewport: Viewport,
        selection: &SelectionState,
    ) {
        if anchors.is_empty() {
            return;
        }

        for anchor in anchors.iter_mut() {
            anchor.distance_to_camera = anchor.position.distance(camera.position);
            let ndc = camera.project_to_ndc(anchor.position);
            anchor.screen_ndc = DVec2::new(ndc.x, ndc.y);
            anchor.pixel_position =
                projection::pixel_position(anchor.screen_ndc, viewport.width, viewport.height);
        }

        anchors.sort_by(|a, b| a.distance_to_camera.total_cmp(&b.distance_to_camera));

        let limit = self.limit.unwrap_or(anchors.len());
        let visible_count = limit.min(anchors.len());
        let min_distance = anchors[0].distance_to_camera;
        let max_distance = if visible_count > 0 {
            anchors[visible_count - 1].distance_to_camera
        } else {
            min_distance
        };

        for (index, anchor) in anchors.iter_mut().enumerate() {
            if selection.is_selected(anchor.cell) {
                anchor.state = AnchorState::Forced;
                anchor.scale = 1.0;
                anchor.z_order = limit as i64 + 1;
            } else if index < visible_count {
                anchor.state = AnchorState::Ranked;
                anchor.scale = depth_scale(anchor.distance_to_camera, min_distance, max_distance);
                anchor.z_order = (limit - index) as i64;
            } else {
                anchor.state = AnchorState::Hidden;
                anchor.scale = 0.0;
                anchor.z_order = 0;
            }
        }

        // Occlusion overrides rank and forced emphasis, never the reverse.
        for anchor in anchors.iter_mut() {
            if anchor.state == AnchorState::Hidden {
                continue;
            }
            let ray = camera.ray_toward(anchor.position);
            if let Some(hit) = ray.intersect_sphere(DVec3::ZERO, self.globe_radius)
                && hit < anchor.distance_to_camera
            {
                anchor.state = AnchorState::Hidden;
                anchor.scale = 0.0;
            }
        }
    }
}
