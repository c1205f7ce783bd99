//! Viewport controller: zoom, pan, grid.
//!
//! Zoom is a continuous UI control, so out-of-range values are clamped,
//! never rejected. Pan is accumulated in pre-scale units: a screen delta
//! is divided by the zoom in effect *at that moment* before it is added,
//! which keeps a pan gesture consistent when zoom changes mid-gesture.

use crate::config::EditorConfig;
use crate::geometry::{ViewTransform, snap_point};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Snapshot of the view, as handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub zoom: f64,
    pub pan: Vec2,
    pub show_grid: bool,
    pub snap_to_grid: bool,
    /// Grid cell in pixels at zoom 1.
    pub grid_size: u32,
    /// Drawing surface size in screen pixels; its centre is the transform
    /// origin.
    pub surface: Size,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
            show_grid: true,
            snap_to_grid: false,
            grid_size: crate::config::DEFAULT_GRID_SIZE,
            surface: Size::ZERO,
        }
    }
}

impl ViewportState {
    pub fn transform(&self) -> ViewTransform {
        ViewTransform {
            zoom: self.zoom,
            pan: self.pan,
            origin: Point::new(self.surface.width / 2.0, self.surface.height / 2.0),
        }
    }
}

/// Drop float noise accumulated by repeated stepping (1.0 + 0.1 + ...).
fn normalize(zoom: f64) -> f64 {
    (zoom * 1e6).round() / 1e6
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    state: ViewportState,
    min_zoom: f64,
    max_zoom: f64,
    zoom_step: f64,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl ViewportController {
    /// Expects a validated config (`EditorConfig::validate`); inverted or
    /// NaN zoom bounds panic in `f64::clamp`.
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            state: ViewportState {
                grid_size: config.grid_size.max(1),
                zoom: 1.0_f64.clamp(config.min_zoom, config.max_zoom),
                ..ViewportState::default()
            },
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            zoom_step: config.zoom_step,
        }
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    pub fn pan_offset(&self) -> Vec2 {
        self.state.pan
    }

    pub fn transform(&self) -> ViewTransform {
        self.state.transform()
    }

    pub fn screen_to_canvas(&self, p: Point) -> Point {
        self.transform().screen_to_canvas(p)
    }

    pub fn canvas_to_screen(&self, p: Point) -> Point {
        self.transform().canvas_to_screen(p)
    }

    /// Snap a canvas point per the current grid settings.
    pub fn snap(&self, p: Point) -> Point {
        snap_point(p, self.state.grid_size, self.state.snap_to_grid)
    }

    /// Grid size to snap to, if snapping is on.
    pub fn snap_grid(&self) -> Option<u32> {
        self.state.snap_to_grid.then_some(self.state.grid_size)
    }

    // ─── Zoom ────────────────────────────────────────────────────────────

    /// Clamp and store `value`; returns the stored zoom. NaN is ignored.
    pub fn set_zoom(&mut self, value: f64) -> f64 {
        if value.is_nan() {
            return self.state.zoom;
        }
        self.state.zoom = value.clamp(self.min_zoom, self.max_zoom);
        self.state.zoom
    }

    /// Step zoom up. Returns false (no-op) when already at the bound.
    pub fn zoom_in(&mut self) -> bool {
        self.step_zoom(self.zoom_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.step_zoom(-self.zoom_step)
    }

    fn step_zoom(&mut self, delta: f64) -> bool {
        let before = self.state.zoom;
        let target = normalize((before + delta).clamp(self.min_zoom, self.max_zoom));
        self.state.zoom = target.clamp(self.min_zoom, self.max_zoom);
        (self.state.zoom - before).abs() > f64::EPSILON
    }

    /// Multiply zoom by `factor`, keeping the canvas point under
    /// `screen_point` fixed on screen. Returns whether zoom changed.
    pub fn zoom_at(&mut self, factor: f64, screen_point: Point) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let before = self.state.zoom;
        let anchor = self.screen_to_canvas(screen_point);
        let zoom = self.set_zoom(before * factor);
        if (zoom - before).abs() <= f64::EPSILON {
            return false;
        }
        let origin = self.transform().origin.to_vec2();
        self.state.pan = (screen_point.to_vec2() - origin) / zoom + origin - anchor.to_vec2();
        true
    }

    // ─── Pan ─────────────────────────────────────────────────────────────

    /// Accumulate a screen-space delta, divided by the current zoom.
    pub fn pan(&mut self, delta_screen_x: f64, delta_screen_y: f64) {
        self.state.pan += Vec2::new(delta_screen_x, delta_screen_y) / self.state.zoom;
    }

    pub fn reset_view(&mut self) {
        self.state.zoom = 1.0_f64.clamp(self.min_zoom, self.max_zoom);
        self.state.pan = Vec2::ZERO;
    }

    // ─── Grid ────────────────────────────────────────────────────────────

    pub fn toggle_grid(&mut self) -> bool {
        self.state.show_grid = !self.state.show_grid;
        self.state.show_grid
    }

    pub fn toggle_snap(&mut self) -> bool {
        self.state.snap_to_grid = !self.state.snap_to_grid;
        self.state.snap_to_grid
    }

    pub fn set_snap(&mut self, enabled: bool) {
        self.state.snap_to_grid = enabled;
    }

    /// Set the grid size; 0 is raised to 1.
    pub fn set_grid_size(&mut self, size: u32) {
        if size == 0 {
            log::warn!("grid size 0 requested, using 1");
        }
        self.state.grid_size = size.max(1);
    }

    pub fn set_surface_size(&mut self, surface: Size) {
        self.state.surface = surface;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_zoom_clamps_any_magnitude() {
        let mut vp = ViewportController::default();
        for input in [-1e9, -3.0, 0.0, 0.1, 0.25, 1.3, 2.0, 7.5, 1e12, f64::INFINITY] {
            let z = vp.set_zoom(input);
            assert!((0.25..=2.0).contains(&z), "{input} -> {z}");
            // Clamping is idempotent.
            assert_eq!(vp.set_zoom(z), z);
        }
    }

    #[test]
    fn set_zoom_ignores_nan() {
        let mut vp = ViewportController::default();
        vp.set_zoom(1.5);
        assert_eq!(vp.set_zoom(f64::NAN), 1.5);
    }

    #[test]
    fn zoom_steps_stop_at_bounds() {
        let mut vp = ViewportController::default();
        let mut steps = 0;
        while vp.zoom_in() {
            steps += 1;
        }
        assert_eq!(vp.zoom(), 2.0);
        assert_eq!(steps, 10);
        assert!(!vp.zoom_in());

        vp.reset_view();
        while vp.zoom_out() {}
        assert_eq!(vp.zoom(), 0.25);
        assert!(!vp.zoom_out());
    }

    #[test]
    fn zoom_in_lands_on_clean_values() {
        let mut vp = ViewportController::default();
        vp.zoom_in();
        vp.zoom_in();
        vp.zoom_in();
        assert_eq!(vp.zoom(), 1.3);
    }

    #[test]
    fn pan_divides_by_zoom_before_accumulating() {
        let mut vp = ViewportController::default();
        vp.set_zoom(2.0);
        vp.pan(30.0, 0.0);
        assert_eq!(vp.pan_offset(), Vec2::new(15.0, 0.0));

        // A zoom change mid-gesture only affects later deltas.
        vp.set_zoom(1.0);
        vp.pan(30.0, 0.0);
        assert_eq!(vp.pan_offset(), Vec2::new(45.0, 0.0));
    }

    #[test]
    fn reset_view_restores_identity() {
        let mut vp = ViewportController::default();
        vp.set_zoom(1.7);
        vp.pan(-40.0, 12.0);
        vp.reset_view();
        assert_eq!(vp.zoom(), 1.0);
        assert_eq!(vp.pan_offset(), Vec2::ZERO);
    }

    #[test]
    fn zoom_at_keeps_cursor_anchor() {
        let mut vp = ViewportController::default();
        vp.set_surface_size(Size::new(800.0, 600.0));
        vp.pan(35.0, -10.0);
        let cursor = Point::new(620.0, 140.0);
        let before = vp.screen_to_canvas(cursor);

        assert!(vp.zoom_at(1.5, cursor));
        let after = vp.screen_to_canvas(cursor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn zoom_at_bound_is_noop() {
        let mut vp = ViewportController::default();
        vp.set_zoom(2.0);
        let pan = vp.pan_offset();
        assert!(!vp.zoom_at(1.2, Point::new(10.0, 10.0)));
        assert_eq!(vp.pan_offset(), pan);
    }

    #[test]
    fn toggles_and_grid_size() {
        let mut vp = ViewportController::default();
        assert!(vp.state().show_grid);
        assert!(!vp.toggle_grid());
        assert!(vp.toggle_snap());
        assert_eq!(vp.snap_grid(), Some(20));
        vp.set_grid_size(0);
        assert_eq!(vp.state().grid_size, 1);
    }
}
