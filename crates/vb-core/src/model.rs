//! Canvas element data model.
//!
//! A `CanvasElement` is one placed object: geometry, paint order, the
//! lock/visibility flags, and a content payload whose variant decides the
//! element's kind. Positions are canvas-space (unscaled, unpanned).

use crate::id::ElementId;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`. The `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let byte = |i: usize| -> Option<f32> {
            Some(f32::from(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?) / 255.0)
        };

        match bytes.len() {
            3 => {
                let short = |i: usize| hex_val(bytes[i]).map(|v| f32::from(v * 17) / 255.0);
                Some(Self::rgba(short(0)?, short(1)?, short(2)?, 1.0))
            }
            6 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, 1.0)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (
            channel(self.r),
            channel(self.g),
            channel(self.b),
            channel(self.a),
        );
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

// ─── Stroke / Font ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub weight: u16, // 100..900
    pub size: f32,
    pub italic: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "Inter".into(),
            weight: 400,
            size: 16.0,
            italic: false,
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

// ─── Content payloads ────────────────────────────────────────────────────

/// The element kinds a canvas can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Component,
    Text,
    Shape,
    Image,
    Chart,
    Drawing,
}

impl ElementKind {
    /// Prefix used when minting IDs for this kind.
    pub fn id_prefix(self) -> &'static str {
        match self {
            ElementKind::Component => "component",
            ElementKind::Text => "text",
            ElementKind::Shape => "shape",
            ElementKind::Image => "image",
            ElementKind::Chart => "chart",
            ElementKind::Drawing => "drawing",
        }
    }
}

/// A component materialized from a palette entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentContent {
    /// ID of the palette entry this was created from.
    pub source_id: String,
    pub name: String,
    /// Markup handed to the presentation layer as-is.
    pub markup: String,
    pub props: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    #[default]
    Rectangle,
    Ellipse,
    Triangle,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
    Fill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Pie,
    Area,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    pub values: Vec<f64>,
}

/// A single path command for freehand drawings (SVG-like, simplified).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathCmd {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    QuadTo(f64, f64, f64, f64),            // control, end
    CubicTo(f64, f64, f64, f64, f64, f64), // c1, c2, end
    Close,
}

/// Kind-specific payload. The variant *is* the element's kind, so a text
/// element can never carry a shape type and vice versa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementContent {
    Component(ComponentContent),
    Text {
        text: String,
        font: FontSpec,
        color: Color,
        align: TextAlign,
    },
    Shape {
        shape: ShapeType,
        fill: Option<Color>,
        stroke: Option<Stroke>,
        corner_radius: f32,
    },
    Image {
        src: String,
        alt: String,
        fit: ImageFit,
    },
    Chart {
        chart: ChartType,
        series: Vec<ChartSeries>,
    },
    Drawing {
        commands: Vec<PathCmd>,
        stroke: Stroke,
    },
}

impl ElementContent {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementContent::Component(_) => ElementKind::Component,
            ElementContent::Text { .. } => ElementKind::Text,
            ElementContent::Shape { .. } => ElementKind::Shape,
            ElementContent::Image { .. } => ElementKind::Image,
            ElementContent::Chart { .. } => ElementKind::Chart,
            ElementContent::Drawing { .. } => ElementKind::Drawing,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        ElementContent::Text {
            text: text.into(),
            font: FontSpec::default(),
            color: Color::BLACK,
            align: TextAlign::default(),
        }
    }

    pub fn shape(shape: ShapeType) -> Self {
        ElementContent::Shape {
            shape,
            fill: Some(Color::from_hex("#D9D9D9").unwrap_or(Color::BLACK)),
            stroke: None,
            corner_radius: 0.0,
        }
    }
}

// ─── Canvas element ──────────────────────────────────────────────────────

/// A placed object on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasElement {
    pub id: ElementId,
    /// Top-left corner in canvas-space.
    pub position: Point,
    pub size: Size,
    /// Degrees, clockwise, about the element centre. Not normalized.
    pub rotation: f64,
    /// Paint and hit-test priority; only relative order matters.
    pub z_index: u32,
    /// Immune to pointer move/resize/rotate and pointer selection.
    pub locked: bool,
    /// Hidden elements keep their slot but are neither painted nor hit.
    pub visible: bool,
    pub content: ElementContent,
    /// Presentation-only overrides (border, opacity, ...). Never consulted
    /// by the editing model.
    #[serde(default)]
    pub styles: BTreeMap<String, String>,
}

impl CanvasElement {
    /// An unlocked, visible element at `position` with z-index 0.
    pub fn new(id: ElementId, content: ElementContent, position: Point, size: Size) -> Self {
        Self {
            id,
            position,
            size,
            rotation: 0.0,
            z_index: 0,
            locked: false,
            visible: true,
            content,
            styles: BTreeMap::new(),
        }
    }

    pub fn with_z_index(mut self, z_index: u32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.content.kind()
    }

    /// Unrotated bounding box in canvas-space.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }
}

/// Partial update for `ElementStore::update`. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub rotation: Option<f64>,
    pub z_index: Option<u32>,
    pub locked: Option<bool>,
    pub visible: Option<bool>,
    pub content: Option<ElementContent>,
    /// Style overrides to merge; an empty value removes the key.
    pub styles: Option<BTreeMap<String, String>>,
}

impl ElementPatch {
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn bounds(rect: Rect) -> Self {
        Self {
            position: Some(rect.origin()),
            size: Some(rect.size()),
            ..Self::default()
        }
    }

    pub fn rotation(degrees: f64) -> Self {
        Self {
            rotation: Some(degrees),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether the patch touches geometry (what a pointer gesture moves).
    pub fn touches_geometry(&self) -> bool {
        self.position.is_some() || self.size.is_some() || self.rotation.is_some()
    }

    /// Merge into `element`. Returns whether anything changed.
    pub(crate) fn apply_to(self, element: &mut CanvasElement) -> bool {
        let before = element.clone();
        if let Some(position) = self.position {
            element.position = position;
        }
        if let Some(size) = self.size {
            element.size = size;
        }
        if let Some(rotation) = self.rotation {
            element.rotation = rotation;
        }
        if let Some(z_index) = self.z_index {
            element.z_index = z_index;
        }
        if let Some(locked) = self.locked {
            element.locked = locked;
        }
        if let Some(visible) = self.visible {
            element.visible = visible;
        }
        if let Some(content) = self.content {
            element.content = content;
        }
        if let Some(styles) = self.styles {
            for (key, value) in styles {
                if value.is_empty() {
                    element.styles.remove(&key);
                } else {
                    element.styles.insert(key, value);
                }
            }
        }
        *element != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hex_roundtrip() {
        let c = Color::from_hex("#6C5CE7").unwrap();
        assert_eq!(c.to_hex(), "#6C5CE7");
        let short = Color::from_hex("fff").unwrap();
        assert_eq!(short.to_hex(), "#FFFFFF");
        let alpha = Color::from_hex("#00000080").unwrap();
        assert_eq!(alpha.to_hex(), "#00000080");
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("#GG0000").is_none());
    }

    #[test]
    fn content_variant_decides_kind() {
        assert_eq!(ElementContent::text("Hi").kind(), ElementKind::Text);
        assert_eq!(
            ElementContent::shape(ShapeType::Ellipse).kind(),
            ElementKind::Shape
        );
        assert_eq!(
            ElementContent::Component(ComponentContent::default()).kind(),
            ElementKind::Component
        );
    }

    #[test]
    fn content_serializes_with_kind_tag() {
        let json = serde_json::to_value(ElementContent::Image {
            src: "hero.png".into(),
            alt: "Hero".into(),
            fit: ImageFit::Contain,
        })
        .unwrap();
        assert_eq!(json["kind"], "image");
        assert_eq!(json["fit"], "contain");
    }

    #[test]
    fn patch_merges_and_reports_change() {
        let mut el = CanvasElement::new(
            ElementId::intern("patch_target"),
            ElementContent::text("a"),
            Point::new(0.0, 0.0),
            Size::new(10.0, 10.0),
        );
        el.styles.insert("opacity".into(), "0.5".into());

        let mut styles = BTreeMap::new();
        styles.insert("opacity".into(), String::new());
        styles.insert("border".into(), "1px solid".into());
        let changed = ElementPatch {
            position: Some(Point::new(5.0, 6.0)),
            styles: Some(styles),
            ..ElementPatch::default()
        }
        .apply_to(&mut el);

        assert!(changed);
        assert_eq!(el.position, Point::new(5.0, 6.0));
        assert_eq!(el.size, Size::new(10.0, 10.0));
        assert_eq!(el.styles.get("border").map(String::as_str), Some("1px solid"));
        assert!(!el.styles.contains_key("opacity"));

        let unchanged = ElementPatch::position(Point::new(5.0, 6.0)).apply_to(&mut el);
        assert!(!unchanged);
    }
}
