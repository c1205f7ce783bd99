//! Hit testing: point → element lookup.
//!
//! Walks elements in reverse paint order (topmost first). Hidden elements
//! are skipped; locked elements are still hit so they absorb clicks.

use crate::geometry::{ResizeHandle, ViewTransform, rotate_about};
use crate::id::ElementId;
use crate::model::CanvasElement;
use crate::store::ElementStore;
use kurbo::Point;
use smallvec::SmallVec;

/// Whether canvas point `p` lies inside `element`, honouring rotation.
pub fn contains_point(element: &CanvasElement, p: Point) -> bool {
    let local = if element.rotation == 0.0 {
        p
    } else {
        rotate_about(p, element.center(), -element.rotation)
    };
    element.bounds().contains(local)
}

/// Find the topmost visible element at canvas point `p`.
/// Returns `None` over empty canvas.
pub fn hit_test(store: &ElementStore, p: Point) -> Option<ElementId> {
    store
        .paint_order()
        .into_iter()
        .rev()
        .find(|e| e.visible && contains_point(e, p))
        .map(|e| e.id)
}

/// Every visible element at `p`, topmost first.
pub fn hit_test_all(store: &ElementStore, p: Point) -> SmallVec<[ElementId; 4]> {
    store
        .paint_order()
        .into_iter()
        .rev()
        .filter(|e| e.visible && contains_point(e, p))
        .map(|e| e.id)
        .collect()
}

/// A manipulation handle on the selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleHit {
    Resize(ResizeHandle),
    Rotate,
}

/// Screen-space sizing of handles; constant on screen at every zoom.
#[derive(Debug, Clone, Copy)]
pub struct HandleMetrics {
    /// Side of a resize handle hit zone, in screen pixels.
    pub handle_size: f64,
    /// Rotate handle distance above the top edge, in screen pixels.
    pub rotate_offset: f64,
}

/// Find the handle of `element` under `screen_p`.
///
/// The rotate handle wins over resize handles where they overlap.
pub fn hit_test_handles(
    element: &CanvasElement,
    view: &ViewTransform,
    screen_p: Point,
    metrics: HandleMetrics,
) -> Option<HandleHit> {
    let canvas_p = view.screen_to_canvas(screen_p);
    let center = element.center();
    let local = rotate_about(canvas_p, center, -element.rotation);
    let bounds = element.bounds();
    let half = metrics.handle_size / 2.0 / view.zoom;

    let near =
        |anchor: Point| (local.x - anchor.x).abs() <= half && (local.y - anchor.y).abs() <= half;

    let rotate_anchor = Point::new(center.x, bounds.y0 - metrics.rotate_offset / view.zoom);
    if near(rotate_anchor) {
        return Some(HandleHit::Rotate);
    }

    ResizeHandle::ALL
        .into_iter()
        .find(|h| near(h.anchor_on(bounds)))
        .map(HandleHit::Resize)
}
