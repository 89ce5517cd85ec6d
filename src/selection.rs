//! Pointer-driven hover/click selection over bar instances.
//!
//! External input handlers enqueue pointer events; the frame tick drains the
//! queue, resolves the hovered bar by casting a ray against the bar picking
//! proxies and the solid globe, and emits highlight commands for the
//! renderer's materials. Selection state is plain data owned by the globe
//! context; nothing here touches globals.

use crate::camera::CameraSnapshot;
use crate::cells::CellId;
use crate::geometry::BarInstance;
use crate::types::Theme;
use glam::{DVec2, DVec3};
use rustc_hash::FxHashMap;
use uuid::Uuid;

/// Hover/click snapshot read by the overlay ranker.
///
/// `hovered` is recomputed every frame from intersection testing; `clicked`
/// persists across frames until the next click toggles it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub hovered: Option<CellId>,
    pub clicked: Option<CellId>,
}

impl SelectionState {
    pub fn is_selected(&self, cell: CellId) -> bool {
        self.hovered == Some(cell) || self.clicked == Some(cell)
    }
}

/// Pointer events enqueued by input handlers, drained once per frame tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer moved; coordinates in NDC ([-1, 1] on both axes).
    Moved(DVec2),
    Clicked,
}

/// Material change the renderer applies to one bar mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightCommand {
    pub target: Uuid,
    pub color: String,
    pub opacity: f64,
}

/// Hover/click state machine over the bar picking proxies.
pub struct SelectionController {
    state: SelectionState,
    pointer_ndc: Option<DVec2>,
    queue: Vec<PointerEvent>,
    globe_radius: f64,
}

impl SelectionController {
    pub fn new(globe_radius: f64) -> Self {
        Self {
            state: SelectionState::default(),
            pointer_ndc: None,
            queue: Vec::new(),
            globe_radius,
        }
    }

    /// Current selection snapshot.
    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Queue a pointer event for the next frame tick. Handlers never mutate
    /// selection directly; only the frame tick does.
    pub fn enqueue(&mut self, event: PointerEvent) {
        self.queue.push(event);
    }

    /// Drop all selection and queued input, for a data `clean`.
    pub fn clear(&mut self) {
        self.state = SelectionState::default();
        self.pointer_ndc = None;
        self.queue.clear();
    }

    /// Drain queued events, recompute hover from the latest pointer
    /// position, apply clicks, and emit the resulting highlight commands.
    ///
    /// A bar that is both hovered and clicked only reverts to the base
    /// style once both states have cleared.
    pub fn update(
        &mut self,
        bars: &[BarInstance],
        camera: &CameraSnapshot,
        theme: &Theme,
    ) -> Vec<HighlightCommand> {
        let mut clicks = 0usize;
        for event in self.queue.drain(..) {
            match event {
                PointerEvent::Moved(ndc) => self.pointer_ndc = Some(ndc),
                PointerEvent::Clicked => clicks += 1,
            }
        }

        let instance_ids: FxHashMap<CellId, Uuid> = bars
            .iter()
            .map(|bar| (bar.cell, bar.instance_id))
            .collect();
        let mut commands = Vec::new();

        let hovered = self
            .pointer_ndc
            .and_then(|ndc| hovered_bar(bars, camera, ndc, self.globe_radius));

        if hovered != self.state.hovered {
            if let Some(previous) = self.state.hovered
                && Some(previous) != self.state.clicked
                && let Some(&target) = instance_ids.get(&previous)
            {
                commands.push(unhighlight(target, theme));
            }
            if let Some(current) = hovered
                && let Some(&target) = instance_ids.get(&current)
            {
                commands.push(highlight(target, theme));
            }
            self.state.hovered = hovered;
        }

        for _ in 0..clicks {
            let previous = self.state.clicked;
            // Click with a hover selects it; click on empty space clears.
            self.state.clicked = self.state.hovered;

            if let Some(last) = previous
                && Some(last) != self.state.clicked
                && Some(last) != self.state.hovered
                && let Some(&target) = instance_ids.get(&last)
            {
                commands.push(unhighlight(target, theme));
            }
            if let Some(current) = self.state.clicked
                && let Some(&target) = instance_ids.get(&current)
            {
                commands.push(highlight(target, theme));
            }
        }

        commands
    }
}

fn highlight(target: Uuid, theme: &Theme) -> HighlightCommand {
    HighlightCommand {
        target,
        color: theme.bar_active_color.clone(),
        opacity: theme.bar_active_opacity,
    }
}

fn unhighlight(target: Uuid, theme: &Theme) -> HighlightCommand {
    HighlightCommand {
        target,
        color: theme.bar_color.clone(),
        opacity: theme.bar_opacity,
    }
}

/// Nearest bar hit by the pointer ray, unless the solid globe is hit first.
fn hovered_bar(
    bars: &[BarInstance],
    camera: &CameraSnapshot,
    pointer_ndc: DVec2,
    globe_radius: f64,
) -> Option<CellId> {
    let ray = camera.ray_through_ndc(pointer_ndc);
    let globe_hit = ray.intersect_sphere(DVec3::ZERO, globe_radius);

    let mut nearest: Option<(f64, CellId)> = None;
    for bar in bars {
        let Some(hit) = ray.intersect_capsule(bar.base_point, bar.top_point, bar.pick_radius)
        else {
            continue;
        };
        if nearest.is_none_or(|(best, _)| hit < best) {
            nearest = Some((hit, bar.cell));
        }
    }

    let (bar_hit, cell) = nearest?;
    match globe_hit {
        // A small tolerance keeps bars rooted on the surface pickable.
        Some(globe_t) if globe_t + 1e-6 < bar_hit => None,
        _ => Some(cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::geometry::build_bars;
    use crate::types::{Coordinates, GeoPoint};

    const RADIUS: f64 = 100.0;

    fn opposing_bars() -> Vec<BarInstance> {
        // One tall bar facing the camera (+Z side), one on the far side.
        let points = vec![
            GeoPoint {
                city: "Front".to_string(),
                country: None,
                coordinates: Coordinates { lat: 0.0, lon: 0.0 },
                value: 100.0,
            },
            GeoPoint {
                city: "Back".to_string(),
                country: None,
                coordinates: Coordinates {
                    lat: 0.0,
                    lon: 180.0,
                },
                value: 100.0,
            },
        ];
        let batch = aggregate(&points, 1, RADIUS, 0.5).unwrap();
        build_bars(&batch, 0.0, RADIUS)
    }

    fn front_camera() -> CameraSnapshot {
        CameraSnapshot::look_at(
            DVec3::new(0.0, 0.0, 400.0),
            DVec3::ZERO,
            55.0,
            1.0,
            1.0,
            1000.0,
        )
    }

    fn front_cell(bars: &[BarInstance]) -> CellId {
        bars.iter()
            .max_by(|a, b| a.top_point.z.total_cmp(&b.top_point.z))
            .unwrap()
            .cell
    }

    #[test]
    fn test_pointer_over_bar_hovers_it() {
        let bars = opposing_bars();
        let camera = front_camera();
        let theme = Theme::default();
        let mut controller = SelectionController::new(RADIUS);

        controller.enqueue(PointerEvent::Moved(DVec2::ZERO));
        let commands = controller.update(&bars, &camera, &theme);

        assert_eq!(controller.state().hovered, Some(front_cell(&bars)));
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].color, theme.bar_active_color);
    }

    #[test]
    fn test_pointer_off_bars_clears_hover() {
        let bars = opposing_bars();
        let camera = front_camera();
        let theme = Theme::default();
        let mut controller = SelectionController::new(RADIUS);

        controller.enqueue(PointerEvent::Moved(DVec2::ZERO));
        controller.update(&bars, &camera, &theme);
        assert!(controller.state().hovered.is_some());

        // Far corner of the screen: nothing there.
        controller.enqueue(PointerEvent::Moved(DVec2::new(0.95, 0.95)));
        let commands = controller.update(&bars, &camera, &theme);

        assert_eq!(controller.state().hovered, None);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].color, theme.bar_color);
    }

    #[test]
    fn test_back_bar_is_shadowed_by_globe() {
        let bars = opposing_bars();
        let camera = front_camera();
        let theme = Theme::default();
        let mut controller = SelectionController::new(RADIUS);

        controller.enqueue(PointerEvent::Moved(DVec2::ZERO));
        controller.update(&bars, &camera, &theme);

        // The ray passes through both bars; the globe blocks the far one,
        // so the front bar is the hover target.
        assert_eq!(controller.state().hovered, Some(front_cell(&bars)));
    }

    #[test]
    fn test_click_sets_and_clears_clicked() {
        let bars = opposing_bars();
        let camera = front_camera();
        let theme = Theme::default();
        let mut controller = SelectionController::new(RADIUS);
        let front = front_cell(&bars);

        controller.enqueue(PointerEvent::Moved(DVec2::ZERO));
        controller.enqueue(PointerEvent::Clicked);
        controller.update(&bars, &camera, &theme);
        assert_eq!(controller.state().clicked, Some(front));

        // Click on empty space clears the selection.
        controller.enqueue(PointerEvent::Moved(DVec2::new(0.95, 0.95)));
        controller.enqueue(PointerEvent::Clicked);
        let commands = controller.update(&bars, &camera, &theme);
        assert_eq!(controller.state().clicked, None);
        assert_eq!(controller.state().hovered, None);

        // Base-style revert for the formerly hovered+clicked bar.
        assert!(commands.iter().any(|c| c.color == theme.bar_color));
    }

    #[test]
    fn test_clicked_bar_stays_highlighted_after_unhover() {
        let bars = opposing_bars();
        let camera = front_camera();
        let theme = Theme::default();
        let mut controller = SelectionController::new(RADIUS);
        let front = front_cell(&bars);

        controller.enqueue(PointerEvent::Moved(DVec2::ZERO));
        controller.enqueue(PointerEvent::Clicked);
        controller.update(&bars, &camera, &theme);

        // Pointer leaves; the bar is still clicked, so no unhighlight.
        controller.enqueue(PointerEvent::Moved(DVec2::new(0.95, 0.95)));
        let commands = controller.update(&bars, &camera, &theme);

        assert_eq!(controller.state().hovered, None);
        assert_eq!(controller.state().clicked, Some(front));
        assert!(commands.is_empty());
    }

    #[test]
    fn test_clear_resets_everything() {
        let bars = opposing_bars();
        let camera = front_camera();
        let theme = Theme::default();
        let mut controller = SelectionController::new(RADIUS);

        controller.enqueue(PointerEvent::Moved(DVec2::ZERO));
        controller.enqueue(PointerEvent::Clicked);
        controller.update(&bars, &camera, &theme);

        controller.clear();
        assert_eq!(controller.state(), SelectionState::default());

        // No stale pointer position survives a clear.
        let commands = controller.update(&bars, &camera, &theme);
        assert!(commands.is_empty());
        assert_eq!(controller.state().hovered, None);
    }
}
