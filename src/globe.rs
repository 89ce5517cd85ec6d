//! The globe context: data lifecycle plus the per-frame tick.
//!
//! [`HexGlobe`] owns the aggregated batch, the bar geometry built from it,
//! the overlay anchors, and the selection state. The renderer feeds it data
//! updates and pointer events and calls [`HexGlobe::on_frame`] once per
//! rendered frame with the current camera and viewport.

use crate::aggregate::{self, AggregatedCell};
use crate::camera::CameraSnapshot;
use crate::error::{GlobeError, Result};
#[cfg(feature = "geojson")]
use crate::geometry::HexTile;
use crate::geometry::{self, BarInstance};
use crate::overlay::{self, OverlayAnchor, Viewport, VisibilityRanker};
use crate::selection::{HighlightCommand, PointerEvent, SelectionController, SelectionState};
use crate::types::{GeoPoint, GlobeConfig, Theme};
use glam::DVec2;
use rustc_hash::FxHashMap;
use uuid::Uuid;

/// Result of one frame tick, handed to the renderer.
#[derive(Debug)]
pub struct FrameOutput<'a> {
    /// Anchors with fresh screen positions, scales, and visibility.
    pub anchors: &'a [OverlayAnchor],
    /// Material changes to apply to bar meshes this frame.
    pub highlights: Vec<HighlightCommand>,
}

/// Top-level context tying aggregation, geometry, overlay, and selection
/// together under one configuration.
pub struct HexGlobe {
    config: GlobeConfig,
    theme: Theme,
    cells: Vec<AggregatedCell>,
    bars: Vec<BarInstance>,
    anchors: Vec<OverlayAnchor>,
    ranker: VisibilityRanker,
    selection: SelectionController,
}

impl HexGlobe {
    /// Create a context from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError::Other`] when the configuration fails
    /// validation.
    pub fn new(config: GlobeConfig, theme: Theme) -> Result<Self> {
        config.validate().map_err(GlobeError::Other)?;
        let ranker = VisibilityRanker::new(config.tooltips_limit, config.globe_radius);
        let selection = SelectionController::new(config.globe_radius);
        Ok(Self {
            config,
            theme,
            cells: Vec::new(),
            bars: Vec::new(),
            anchors: Vec::new(),
            ranker,
            selection,
        })
    }

    /// Create a context and load the initial batch in one step.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration or an out-of-range resolution,
    /// as [`HexGlobe::new`] and [`HexGlobe::update`] do.
    pub fn initialize(config: GlobeConfig, theme: Theme, points: &[GeoPoint]) -> Result<Self> {
        let mut globe = Self::new(config, theme)?;
        globe.update(points)?;
        Ok(globe)
    }

    /// Replace the displayed data with a fresh aggregation of `points`.
    ///
    /// The previous batch, bars, anchors, and selection are discarded
    /// wholesale; mesh instance ids are minted anew.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError::InvalidResolution`] when the configured
    /// resolution is out of range. Individual bad points are skipped.
    pub fn update(&mut self, points: &[GeoPoint]) -> Result<()> {
        self.clean();

        self.cells = aggregate::aggregate(
            points,
            self.config.hex_resolution,
            self.config.globe_radius,
            self.config.highest_bar_fraction,
        )?;
        if self.cells.is_empty() && !points.is_empty() {
            log::warn!("No points could be aggregated; globe stays empty");
        }

        self.bars = geometry::build_bars(
            &self.cells,
            self.config.hex_margin,
            self.config.globe_radius,
        );
        let instance_ids: FxHashMap<_, Uuid> = self
            .bars
            .iter()
            .map(|bar| (bar.cell, bar.instance_id))
            .collect();
        self.anchors = overlay::build_anchors(&self.cells, &instance_ids);
        Ok(())
    }

    /// Drop all displayed data and selection state.
    pub fn clean(&mut self) {
        self.cells.clear();
        self.bars.clear();
        self.anchors.clear();
        self.selection.clear();
    }

    /// Queue a pointer move, coordinates in NDC.
    pub fn pointer_moved(&mut self, ndc: DVec2) {
        self.selection.enqueue(PointerEvent::Moved(ndc));
    }

    /// Queue a click at the last known pointer position.
    pub fn clicked(&mut self) {
        self.selection.enqueue(PointerEvent::Clicked);
    }

    /// Run one frame tick: drain pointer input, resolve selection, then
    /// rank and place the overlay anchors for this camera.
    pub fn on_frame(&mut self, camera: &CameraSnapshot, viewport: Viewport) -> FrameOutput<'_> {
        let highlights = self.selection.update(&self.bars, camera, &self.theme);
        let state = self.selection.state();
        self.ranker
            .update(&mut self.anchors, camera, viewport, &state);
        FrameOutput {
            anchors: &self.anchors,
            highlights,
        }
    }

    /// Current selection snapshot.
    pub fn selection(&self) -> SelectionState {
        self.selection.state()
    }

    /// The aggregated batch backing the current bars.
    pub fn cells(&self) -> &[AggregatedCell] {
        &self.cells
    }

    /// Bar geometry parameters for the renderer.
    pub fn bars(&self) -> &[BarInstance] {
        &self.bars
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Flat background tiles covering the given regions, for the static
    /// hex mesh under the bars.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError::InvalidResolution`] when the configured
    /// resolution is out of range, or [`GlobeError::Geometry`] when a
    /// feature cannot be interpreted.
    #[cfg(feature = "geojson")]
    pub fn background_mesh(
        &self,
        regions: &geojson::FeatureCollection,
    ) -> Result<Vec<HexTile>> {
        let ids = crate::cells::region_to_cells(regions, self.config.hex_resolution)?;
        Ok(geometry::build_background_mesh(
            &ids,
            self.config.hex_margin,
            self.config.globe_radius,
            self.config.hex_resolution,
        ))
    }
}
