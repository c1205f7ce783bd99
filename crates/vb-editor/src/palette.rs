//! Palette drop reconciliation.
//!
//! The palette is an external drag source. When one of its descriptors is
//! dropped over the canvas, the drop point is mapped into canvas-space,
//! snapped, and a new `component` element is materialized from the
//! descriptor. Drops anywhere else create nothing.

use std::collections::BTreeMap;

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use vb_core::error::EditorResult;
use vb_core::id::ElementId;
use vb_core::model::{CanvasElement, ComponentContent, ElementContent, ElementKind};
use vb_core::store::ElementStore;
use vb_core::viewport::ViewportController;

/// A draggable template offered by the palette. Read-only to the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteDescriptor {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Size of the placed element; the session default applies when absent.
    #[serde(default)]
    pub default_size: Option<Size>,
    #[serde(default)]
    pub markup: String,
    #[serde(default)]
    pub props: BTreeMap<String, String>,
}

impl PaletteDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            default_size: None,
            markup: String::new(),
            props: BTreeMap::new(),
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.default_size = Some(size);
        self
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    fn content(&self) -> ComponentContent {
        ComponentContent {
            source_id: self.id.clone(),
            name: self.name.clone(),
            markup: self.markup.clone(),
            props: self.props.clone(),
        }
    }

    /// The descriptor's size if it is usable, else `fallback`.
    fn size_or(&self, fallback: Size) -> Size {
        self.default_size
            .filter(|s| s.width > 0.0 && s.height > 0.0 && s.is_finite())
            .unwrap_or(fallback)
    }
}

/// Where the palette reports the drag ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropTarget {
    Canvas,
    Outside,
}

/// Snapped canvas position a drop at `screen` lands on.
pub fn drop_position(viewport: &ViewportController, screen: Point) -> Point {
    viewport.snap(viewport.screen_to_canvas(screen))
}

/// Build the element a drop at `screen` would create, without inserting it.
///
/// The new element sits at `z = element count`, unlocked and visible,
/// under a fresh `component_N` id.
pub fn materialize(
    descriptor: &PaletteDescriptor,
    store: &ElementStore,
    viewport: &ViewportController,
    screen: Point,
    default_size: Size,
) -> CanvasElement {
    let id = store.fresh_id(ElementKind::Component);
    let z_index = u32::try_from(store.len()).unwrap_or(u32::MAX);
    CanvasElement::new(
        id,
        ElementContent::Component(descriptor.content()),
        drop_position(viewport, screen),
        descriptor.size_or(default_size),
    )
    .with_z_index(z_index)
}

/// Reconcile a finished palette drag with the store.
///
/// Returns the new element's id, or `None` when the drop missed the canvas.
pub fn reconcile_drop(
    descriptor: &PaletteDescriptor,
    target: DropTarget,
    screen: Point,
    store: &mut ElementStore,
    viewport: &ViewportController,
    default_size: Size,
) -> EditorResult<Option<ElementId>> {
    if target != DropTarget::Canvas {
        log::debug!("palette drop of '{}' outside canvas, discarded", descriptor.id);
        return Ok(None);
    }
    let element = materialize(descriptor, store, viewport, screen, default_size);
    let id = element.id;
    log::debug!("palette drop of '{}' → {id} at {:?}", descriptor.id, element.position);
    store.add(element)?;
    Ok(Some(id))
}
