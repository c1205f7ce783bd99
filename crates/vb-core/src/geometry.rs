//! Viewport transform and grid math.
//!
//! Pure functions over finite floats: no state, no errors. The view maps
//! canvas-space to screen-space as
//!
//! ```text
//! screen = origin + (canvas + pan - origin) * zoom
//! ```
//!
//! where `origin` is the transform origin (the centre of the drawing
//! surface) and `pan` is stored in pre-scale units. With `zoom = 1` and
//! `pan = 0` screen and canvas coordinates coincide.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

// ─── Grid snapping ───────────────────────────────────────────────────────

/// Quantize `value` to the nearest multiple of `grid_size`.
///
/// Returns `value` unchanged when `enabled` is false or `grid_size` is 0.
/// Ties round half away from zero (`f64::round`).
pub fn snap(value: f64, grid_size: u32, enabled: bool) -> f64 {
    if !enabled || grid_size == 0 {
        return value;
    }
    let g = f64::from(grid_size);
    (value / g).round() * g
}

/// Snap both coordinates of a point.
pub fn snap_point(p: Point, grid_size: u32, enabled: bool) -> Point {
    Point::new(
        snap(p.x, grid_size, enabled),
        snap(p.y, grid_size, enabled),
    )
}

// ─── View transform ──────────────────────────────────────────────────────

/// The canvas ↔ screen mapping for one viewport configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub zoom: f64,
    pub pan: Vec2,
    pub origin: Point,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
            origin: Point::ZERO,
        }
    }
}

impl ViewTransform {
    #[inline]
    pub fn canvas_to_screen(&self, p: Point) -> Point {
        let o = self.origin.to_vec2();
        (o + (p.to_vec2() + self.pan - o) * self.zoom).to_point()
    }

    #[inline]
    pub fn screen_to_canvas(&self, p: Point) -> Point {
        let o = self.origin.to_vec2();
        ((p.to_vec2() - o) / self.zoom + o - self.pan).to_point()
    }

    /// Convert a screen-space delta to canvas units (drag operations).
    #[inline]
    pub fn delta_to_canvas(&self, delta: Vec2) -> Vec2 {
        delta / self.zoom
    }

    #[inline]
    pub fn delta_to_screen(&self, delta: Vec2) -> Vec2 {
        delta * self.zoom
    }
}

// ─── Rotation helpers ────────────────────────────────────────────────────

/// Rotate `p` about `center` by `degrees` (clockwise in a y-down space).
pub fn rotate_about(p: Point, center: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let d = p - center;
    center + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Angle of `p` around `center`, in degrees.
pub fn angle_around(p: Point, center: Point) -> f64 {
    (p - center).atan2().to_degrees()
}

/// Signed sweep from angle `from` to angle `to`, in (-180, 180].
pub fn angle_delta(from: f64, to: f64) -> f64 {
    let sweep = (to - from).rem_euclid(360.0);
    if sweep > 180.0 { sweep - 360.0 } else { sweep }
}

/// Round `degrees` to the nearest multiple of `increment`.
pub fn snap_angle(degrees: f64, increment: f64) -> f64 {
    if increment <= 0.0 {
        return degrees;
    }
    (degrees / increment).round() * increment
}

// ─── Resize handles ──────────────────────────────────────────────────────

/// The eight resize handles around an element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::TopLeft,
        ResizeHandle::Top,
        ResizeHandle::TopRight,
        ResizeHandle::Right,
        ResizeHandle::BottomRight,
        ResizeHandle::Bottom,
        ResizeHandle::BottomLeft,
        ResizeHandle::Left,
    ];

    /// Which edges this handle moves: `(horizontal, vertical)`, each -1
    /// (left/top), 0 (fixed) or 1 (right/bottom).
    pub fn edges(self) -> (i8, i8) {
        match self {
            ResizeHandle::TopLeft => (-1, -1),
            ResizeHandle::Top => (0, -1),
            ResizeHandle::TopRight => (1, -1),
            ResizeHandle::Right => (1, 0),
            ResizeHandle::BottomRight => (1, 1),
            ResizeHandle::Bottom => (0, 1),
            ResizeHandle::BottomLeft => (-1, 1),
            ResizeHandle::Left => (-1, 0),
        }
    }

    /// The handle across the box, which stays put while this one moves.
    pub fn opposite(self) -> ResizeHandle {
        match self {
            ResizeHandle::TopLeft => ResizeHandle::BottomRight,
            ResizeHandle::Top => ResizeHandle::Bottom,
            ResizeHandle::TopRight => ResizeHandle::BottomLeft,
            ResizeHandle::Right => ResizeHandle::Left,
            ResizeHandle::BottomRight => ResizeHandle::TopLeft,
            ResizeHandle::Bottom => ResizeHandle::Top,
            ResizeHandle::BottomLeft => ResizeHandle::TopRight,
            ResizeHandle::Left => ResizeHandle::Right,
        }
    }

    pub fn is_corner(self) -> bool {
        let (h, v) = self.edges();
        h != 0 && v != 0
    }

    /// Where the handle sits on `rect` (unrotated).
    pub fn anchor_on(self, rect: Rect) -> Point {
        let (h, v) = self.edges();
        let x = match h {
            -1 => rect.x0,
            1 => rect.x1,
            _ => rect.center().x,
        };
        let y = match v {
            -1 => rect.y0,
            1 => rect.y1,
            _ => rect.center().y,
        };
        Point::new(x, y)
    }
}

/// Resize `start` by dragging `handle` through canvas-space `delta`.
///
/// Edges not owned by the handle stay anchored. Moving edges snap to the
/// grid when `grid` is `Some`, and the result never shrinks below
/// `min_size` on either axis (the opposite edge stays put).
pub fn resize_rect(
    start: Rect,
    handle: ResizeHandle,
    delta: Vec2,
    min_size: f64,
    grid: Option<u32>,
) -> Rect {
    let (h, v) = handle.edges();
    let snap_edge = |value: f64| match grid {
        Some(g) => snap(value, g, true),
        None => value,
    };

    let (mut x0, mut x1) = (start.x0, start.x1);
    match h {
        -1 => x0 = snap_edge(start.x0 + delta.x).min(x1 - min_size),
        1 => x1 = snap_edge(start.x1 + delta.x).max(x0 + min_size),
        _ => {}
    }

    let (mut y0, mut y1) = (start.y0, start.y1);
    match v {
        -1 => y0 = snap_edge(start.y0 + delta.y).min(y1 - min_size),
        1 => y1 = snap_edge(start.y1 + delta.y).max(y0 + min_size),
        _ => {}
    }

    Rect::new(x0, y0, x1, y1)
}

/// Shift `resized` so the handle opposite `handle` lands where it was on
/// `start` once both boxes are rotated by `degrees` about their centres.
///
/// `resize_rect` works in the element's unrotated frame; the rotation pivot
/// is the box centre, which moves as the box grows.
pub fn pin_rotated(start: Rect, resized: Rect, handle: ResizeHandle, degrees: f64) -> Rect {
    if degrees == 0.0 {
        return resized;
    }
    let fixed = handle.opposite();
    let before = rotate_about(fixed.anchor_on(start), start.center(), degrees);
    let after = rotate_about(fixed.anchor_on(resized), resized.center(), degrees);
    resized + (before - after)
}

/// Size of a rect as a `kurbo::Size`, clamped to non-negative.
pub fn rect_size(rect: Rect) -> Size {
    Size::new(rect.width().max(0.0), rect.height().max(0.0))
}
