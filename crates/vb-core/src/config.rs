//! Editor tunables.
//!
//! Hosts usually take `EditorConfig::default()`; `from_json` accepts a
//! partial object where missing keys keep their defaults.

use crate::error::{EditorError, EditorResult};
use kurbo::{Size, Vec2};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 2.0;
pub const ZOOM_STEP: f64 = 0.1;
pub const DEFAULT_GRID_SIZE: u32 = 20;

/// Configuration for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Lower zoom bound. Default: **0.25**.
    pub min_zoom: f64,
    /// Upper zoom bound. Default: **2.0**.
    pub max_zoom: f64,
    /// Increment used by zoom in/out. Default: **0.1**.
    pub zoom_step: f64,
    /// Grid cell size in pixels at zoom 1. Default: **20**.
    pub grid_size: u32,
    /// Offset applied to duplicated elements, in canvas units.
    pub duplicate_offset: Vec2,
    /// Size of a dropped component when its descriptor has none.
    pub default_component_size: Size,
    /// Resize never shrinks an element below this, in canvas units.
    pub min_element_size: f64,
    /// Side of a resize handle hit zone, in screen pixels.
    pub handle_size: f64,
    /// Distance of the rotate handle above the top edge, in screen pixels.
    pub rotate_handle_offset: f64,
    /// Zoom change per wheel pixel when zooming with the wheel.
    pub wheel_zoom_sensitivity: f64,
    /// Maximum undo depth.
    pub history_depth: usize,
    /// Rotation increment when Shift is held during a rotate gesture.
    pub rotation_snap_degrees: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            grid_size: DEFAULT_GRID_SIZE,
            duplicate_offset: Vec2::new(20.0, 20.0),
            default_component_size: Size::new(200.0, 100.0),
            min_element_size: 1.0,
            handle_size: 8.0,
            rotate_handle_offset: 24.0,
            wheel_zoom_sensitivity: 0.002,
            history_depth: 100,
            rotation_snap_degrees: 15.0,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants every other module relies on.
    pub fn validate(&self) -> EditorResult<()> {
        if !(self.min_zoom > 0.0 && self.min_zoom.is_finite()) {
            return Err(EditorError::Config(format!(
                "min_zoom must be positive and finite, got {}",
                self.min_zoom
            )));
        }
        if !self.max_zoom.is_finite() {
            return Err(EditorError::Config(format!(
                "max_zoom must be finite, got {}",
                self.max_zoom
            )));
        }
        if !(self.min_zoom <= self.max_zoom) {
            return Err(EditorError::Config(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.zoom_step > 0.0 && self.zoom_step.is_finite()) {
            return Err(EditorError::Config(format!(
                "zoom_step must be positive, got {}",
                self.zoom_step
            )));
        }
        if self.grid_size == 0 {
            return Err(EditorError::Config("grid_size must be at least 1".into()));
        }
        if !(self.min_element_size >= 0.0 && self.min_element_size.is_finite()) {
            return Err(EditorError::Config(format!(
                "min_element_size must be non-negative, got {}",
                self.min_element_size
            )));
        }
        if self.history_depth == 0 {
            return Err(EditorError::Config("history_depth must be at least 1".into()));
        }
        Ok(())
    }
}
