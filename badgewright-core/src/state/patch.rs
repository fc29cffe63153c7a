//! # Patches
//!
//! Partial updates to an element. Top-level fields are replaced when present, while `position`, `size`
//! and `properties` merge field-by-field, so that changing one font setting never erases another.

use super::element::{
    Alignment, Element, ElementKind, FontWeight, ImageProperties, QrProperties, ShapeKind,
    ShapeProperties, TextProperties,
};
use crate::color::Color;
use crate::units::{Millimeters, Pixels};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("cannot apply {patch} properties to a {element} element")]
    KindMismatch {
        patch: &'static str,
        element: String,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementPatch {
    pub name: Option<String>,
    pub position: Option<PositionPatch>,
    pub size: Option<SizePatch>,
    pub rotation: Option<f64>,
    /// Clamped into `[0, 1]` when applied.
    pub opacity: Option<f64>,
    pub locked: Option<bool>,
    pub visible: Option<bool>,
    pub layer: Option<i32>,
    pub properties: Option<PropertiesPatch>,
}
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PositionPatch {
    pub x: Option<Millimeters>,
    pub y: Option<Millimeters>,
}
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SizePatch {
    pub width: Option<Millimeters>,
    pub height: Option<Millimeters>,
}
#[derive(Clone, Debug, PartialEq)]
pub enum PropertiesPatch {
    Text(TextPatch),
    Shape(ShapePatch),
    Image(ImagePatch),
    Qr(QrPatch),
}
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextPatch {
    pub text: Option<String>,
    pub font_size: Option<Pixels>,
    pub font_family: Option<String>,
    pub font_weight: Option<FontWeight>,
    pub color: Option<Color>,
    pub alignment: Option<Alignment>,
}
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapePatch {
    pub shape: Option<ShapeKind>,
    pub fill_color: Option<Color>,
    pub stroke_color: Option<Color>,
    pub stroke_width: Option<Pixels>,
    pub border_radius: Option<Pixels>,
}
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImagePatch {
    pub src: Option<String>,
    pub border_radius: Option<Pixels>,
}
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QrPatch {
    pub data: Option<String>,
}

impl ElementPatch {
    #[must_use]
    pub fn position(x: Millimeters, y: Millimeters) -> Self {
        Self {
            position: Some(PositionPatch {
                x: Some(x),
                y: Some(y),
            }),
            ..Default::default()
        }
    }
    #[must_use]
    pub fn size(width: Millimeters, height: Millimeters) -> Self {
        Self {
            size: Some(SizePatch {
                width: Some(width),
                height: Some(height),
            }),
            ..Default::default()
        }
    }
    #[must_use]
    pub fn properties(properties: impl Into<PropertiesPatch>) -> Self {
        Self {
            properties: Some(properties.into()),
            ..Default::default()
        }
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
impl From<TextPatch> for PropertiesPatch {
    fn from(value: TextPatch) -> Self {
        Self::Text(value)
    }
}
impl From<ShapePatch> for PropertiesPatch {
    fn from(value: ShapePatch) -> Self {
        Self::Shape(value)
    }
}
impl From<ImagePatch> for PropertiesPatch {
    fn from(value: ImagePatch) -> Self {
        Self::Image(value)
    }
}
impl From<QrPatch> for PropertiesPatch {
    fn from(value: QrPatch) -> Self {
        Self::Qr(value)
    }
}
impl PropertiesPatch {
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Shape(_) => "shape",
            Self::Image(_) => "image",
            Self::Qr(_) => "qr",
        }
    }
}

/// Overwrite `target` if `value` is set.
fn merge<T: Clone>(target: &mut T, value: Option<&T>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}

impl TextPatch {
    fn apply(&self, to: &mut TextProperties) {
        merge(&mut to.text, self.text.as_ref());
        merge(&mut to.font_size, self.font_size.as_ref());
        merge(&mut to.font_family, self.font_family.as_ref());
        merge(&mut to.font_weight, self.font_weight.as_ref());
        merge(&mut to.color, self.color.as_ref());
        merge(&mut to.alignment, self.alignment.as_ref());
    }
}
impl ShapePatch {
    fn apply(&self, to: &mut ShapeProperties) {
        merge(&mut to.shape, self.shape.as_ref());
        merge(&mut to.fill_color, self.fill_color.as_ref());
        merge(&mut to.stroke_color, self.stroke_color.as_ref());
        merge(&mut to.stroke_width, self.stroke_width.as_ref());
        merge(&mut to.border_radius, self.border_radius.as_ref());
    }
}
impl ImagePatch {
    fn apply(&self, to: &mut ImageProperties) {
        merge(&mut to.src, self.src.as_ref());
        merge(&mut to.border_radius, self.border_radius.as_ref());
    }
}
impl QrPatch {
    fn apply(&self, to: &mut QrProperties) {
        merge(&mut to.data, self.data.as_ref());
    }
}

impl Element {
    /// Merge the patch into this element. On error, the element is left untouched.
    pub fn apply_patch(&mut self, patch: &ElementPatch) -> Result<(), PatchError> {
        // Check the only failure case before touching anything.
        if let Some(properties) = &patch.properties {
            let matches = matches!(
                (properties, &self.kind),
                (PropertiesPatch::Text(_), ElementKind::Text(_))
                    | (PropertiesPatch::Shape(_), ElementKind::Shape(_))
                    | (PropertiesPatch::Image(_), ElementKind::Image(_))
                    | (PropertiesPatch::Qr(_), ElementKind::Qr(_))
            );
            if !matches {
                return Err(PatchError::KindMismatch {
                    patch: properties.type_name(),
                    element: self.kind.type_name().to_owned(),
                });
            }
        }

        merge(&mut self.name, patch.name.as_ref());
        if let Some(position) = &patch.position {
            merge(&mut self.position.x, position.x.as_ref());
            merge(&mut self.position.y, position.y.as_ref());
        }
        if let Some(size) = &patch.size {
            merge(&mut self.size.width, size.width.as_ref());
            merge(&mut self.size.height, size.height.as_ref());
        }
        merge(&mut self.rotation, patch.rotation.as_ref());
        if let Some(opacity) = patch.opacity.filter(|opacity| opacity.is_finite()) {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
        merge(&mut self.locked, patch.locked.as_ref());
        merge(&mut self.visible, patch.visible.as_ref());
        merge(&mut self.layer, patch.layer.as_ref());

        match (&patch.properties, &mut self.kind) {
            (Some(PropertiesPatch::Text(p)), ElementKind::Text(t)) => p.apply(t),
            (Some(PropertiesPatch::Shape(p)), ElementKind::Shape(s)) => p.apply(s),
            (Some(PropertiesPatch::Image(p)), ElementKind::Image(i)) => p.apply(i),
            (Some(PropertiesPatch::Qr(p)), ElementKind::Qr(q)) => p.apply(q),
            // Mismatches rejected above.
            _ => (),
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::state::element::{ElementDraft, Position, Size};

    fn hello() -> Element {
        Element::from_draft(ElementDraft {
            name: "Greeting".into(),
            position: Position::default(),
            size: Size {
                width: Millimeters(40.0),
                height: Millimeters(10.0),
            },
            rotation: 0.0,
            opacity: 1.0,
            locked: false,
            visible: true,
            layer: 0,
            kind: ElementKind::Text(TextProperties {
                text: "Hello".into(),
                font_size: Pixels(16.0),
                font_family: "Arial".into(),
                font_weight: FontWeight::Normal,
                color: Color::BLACK,
                alignment: Alignment::Left,
            }),
        })
    }

    #[test]
    fn font_size_keeps_siblings() {
        let mut element = hello();
        element
            .apply_patch(&ElementPatch::properties(TextPatch {
                font_size: Some(Pixels(30.0)),
                ..Default::default()
            }))
            .unwrap();
        let text = element.kind.text().unwrap();
        assert_eq!(text.font_size, Pixels(30.0));
        assert_eq!(text.text, "Hello");
        assert_eq!(text.color, Color::BLACK);
        assert_eq!(text.font_family, "Arial");
    }
    #[test]
    fn position_merges_per_axis() {
        let mut element = hello();
        element.position = Position {
            x: Millimeters(3.0),
            y: Millimeters(4.0),
        };
        element
            .apply_patch(&ElementPatch {
                position: Some(PositionPatch {
                    x: Some(Millimeters(10.0)),
                    y: None,
                }),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(element.position.x, Millimeters(10.0));
        assert_eq!(element.position.y, Millimeters(4.0));
        assert_eq!(element.size.width, Millimeters(40.0));
    }
    #[test]
    fn mismatch_is_untouched() {
        let mut element = hello();
        let before = element.clone();
        let patch = ElementPatch {
            name: Some("Renamed".into()),
            properties: Some(PropertiesPatch::Qr(QrPatch {
                data: Some("https://example.com".into()),
            })),
            ..Default::default()
        };
        assert_eq!(
            element.apply_patch(&patch),
            Err(PatchError::KindMismatch {
                patch: "qr",
                element: "text".into()
            })
        );
        assert_eq!(element, before);
    }
    #[test]
    fn opacity_clamps() {
        let mut element = hello();
        element
            .apply_patch(&ElementPatch {
                opacity: Some(1.5),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(element.opacity, 1.0);
        element
            .apply_patch(&ElementPatch {
                opacity: Some(-0.5),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(element.opacity, 0.0);
        element
            .apply_patch(&ElementPatch {
                opacity: Some(f64::NAN),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(element.opacity, 0.0);
    }
}
