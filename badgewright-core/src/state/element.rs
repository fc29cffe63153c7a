//! # Elements
//!
//! One visual object on a badge. The shared fields (geometry, visibility, paint order) live on [`Element`],
//! everything type specific is carried by [`ElementKind`].

use crate::color::Color;
use crate::units::{Millimeters, Pixels};

pub type ElementID = crate::LocalID<Element>;

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    #[serde(deserialize_with = "crate::units::deserialize_length")]
    pub x: Millimeters,
    #[serde(deserialize_with = "crate::units::deserialize_length")]
    pub y: Millimeters,
}
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    #[serde(deserialize_with = "crate::units::deserialize_length")]
    pub width: Millimeters,
    #[serde(deserialize_with = "crate::units::deserialize_length")]
    pub height: Millimeters,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Assigned at creation, never changes. Used to find this element's primitive on the surface.
    pub id: ElementID,
    pub name: String,
    /// Top-left corner, relative to the document's top-left.
    pub position: Position,
    pub size: Size,
    /// Degrees, clockwise.
    pub rotation: f64,
    /// Always within `[0, 1]`
    pub opacity: f64,
    pub locked: bool,
    pub visible: bool,
    /// Paint order hint. The order of the document's element list is authoritative.
    pub layer: i32,
    pub kind: ElementKind,
}
impl Element {
    /// Give a draft its identity.
    #[must_use]
    pub fn from_draft(draft: ElementDraft) -> Self {
        let ElementDraft {
            name,
            position,
            size,
            rotation,
            opacity,
            locked,
            visible,
            layer,
            kind,
        } = draft;
        Self {
            id: ElementID::next(),
            name,
            position,
            size,
            rotation,
            opacity: opacity.clamp(0.0, 1.0),
            locked,
            visible,
            layer,
            kind,
        }
    }
    /// Strip the identity, e.g. for writing into a template.
    #[must_use]
    pub fn to_draft(&self) -> ElementDraft {
        ElementDraft {
            name: self.name.clone(),
            position: self.position,
            size: self.size,
            rotation: self.rotation,
            opacity: self.opacity,
            locked: self.locked,
            visible: self.visible,
            layer: self.layer,
            kind: self.kind.clone(),
        }
    }
}

/// An element that has not been added to a document yet, and thus has no id.
///
/// This is also the serialized form of an element.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDraft {
    pub name: String,
    #[serde(default)]
    pub position: Position,
    pub size: Size,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "opaque")]
    pub opacity: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "shown")]
    pub visible: bool,
    #[serde(default)]
    pub layer: i32,
    #[serde(flatten)]
    pub kind: ElementKind,
}
fn opaque() -> f64 {
    1.0
}
fn shown() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "KindRepr", into = "KindRepr")]
pub enum ElementKind {
    Text(TextProperties),
    Shape(ShapeProperties),
    Image(ImageProperties),
    Qr(QrProperties),
    /// A type tag this version does not know. Only the tag is kept, its properties are dropped on load.
    /// Never rendered.
    Unsupported(String),
}
impl ElementKind {
    /// The serialized type tag.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Text(_) => "text",
            Self::Shape(_) => "shape",
            Self::Image(_) => "image",
            Self::Qr(_) => "qr",
            Self::Unsupported(ty) => ty,
        }
    }
    #[must_use]
    pub fn text(&self) -> Option<&TextProperties> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }
    #[must_use]
    pub fn shape(&self) -> Option<&ShapeProperties> {
        match self {
            Self::Shape(s) => Some(s),
            _ => None,
        }
    }
    #[must_use]
    pub fn image(&self) -> Option<&ImageProperties> {
        match self {
            Self::Image(i) => Some(i),
            _ => None,
        }
    }
}

// Known kinds are adjacently tagged (`type` + `properties`). Anything else falls through to
// the untagged `Unsupported` arm, which only needs to see the `type` key.
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "properties", rename_all = "lowercase")]
enum KnownKind {
    Text(TextProperties),
    Shape(ShapeProperties),
    Image(ImageProperties),
    Qr(QrProperties),
}
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum KindRepr {
    Known(KnownKind),
    Unsupported {
        #[serde(rename = "type")]
        ty: String,
    },
}
impl From<KindRepr> for ElementKind {
    fn from(value: KindRepr) -> Self {
        match value {
            KindRepr::Known(KnownKind::Text(t)) => Self::Text(t),
            KindRepr::Known(KnownKind::Shape(s)) => Self::Shape(s),
            KindRepr::Known(KnownKind::Image(i)) => Self::Image(i),
            KindRepr::Known(KnownKind::Qr(q)) => Self::Qr(q),
            KindRepr::Unsupported { ty } => Self::Unsupported(ty),
        }
    }
}
impl From<ElementKind> for KindRepr {
    fn from(value: ElementKind) -> Self {
        match value {
            ElementKind::Text(t) => Self::Known(KnownKind::Text(t)),
            ElementKind::Shape(s) => Self::Known(KnownKind::Shape(s)),
            ElementKind::Image(i) => Self::Known(KnownKind::Image(i)),
            ElementKind::Qr(q) => Self::Known(KnownKind::Qr(q)),
            ElementKind::Unsupported(ty) => Self::Unsupported { ty },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Light,
    #[default]
    Normal,
    Medium,
    Bold,
}
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProperties {
    pub text: String,
    /// Surface pixels, mapped 1:1 and not scaled with the document resolution.
    pub font_size: Pixels,
    pub font_family: String,
    #[serde(default)]
    pub font_weight: FontWeight,
    pub color: Color,
    #[serde(default)]
    pub alignment: Alignment,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    /// Width driven, height is ignored when rendering.
    Circle,
}
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeProperties {
    pub shape: ShapeKind,
    pub fill_color: Color,
    pub stroke_color: Color,
    #[serde(default)]
    pub stroke_width: Pixels,
    /// Corner radius in *surface pixels*. Never converted through the document resolution.
    #[serde(default)]
    pub border_radius: Pixels,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProperties {
    pub src: String,
    /// Surface pixels, see [`ShapeProperties::border_radius`]
    #[serde(default)]
    pub border_radius: Pixels,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QrProperties {
    pub data: String,
}
