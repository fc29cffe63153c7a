//! The properties panel shows whatever is selected, or the design itself, and edits it one field at a time.

use either::Either;

use crate::color::Color;
use crate::state::element::{Alignment, ElementKind, FontWeight, ShapeKind};
use crate::state::patch::{
    ImagePatch, PositionPatch, PropertiesPatch, QrPatch, ShapePatch, SizePatch, TextPatch,
};
use crate::state::{Background, Dimensions, Element, ElementPatch};
use crate::store::{DesignStore, StoreError};
use crate::units::{Millimeters, Pixels};

/// A change to one field of an element.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyEdit {
    Name(String),
    X(Millimeters),
    Y(Millimeters),
    Width(Millimeters),
    Height(Millimeters),
    Rotation(f64),
    Opacity(f64),
    Locked(bool),
    Visible(bool),
    Layer(i32),
    Text(String),
    FontSize(Pixels),
    FontFamily(String),
    FontWeight(FontWeight),
    TextColor(Color),
    Alignment(Alignment),
    Shape(ShapeKind),
    Fill(Color),
    Stroke(Color),
    StrokeWidth(Pixels),
    /// Applies to shapes and images alike.
    BorderRadius(Pixels),
    ImageSource(String),
    QrData(String),
}
impl PropertyEdit {
    /// Build the patch for an element of the given kind.
    ///
    /// The kind is only consulted where the same field exists on several kinds. Anything else that doesn't
    /// fit is caught when the patch is applied.
    #[must_use]
    pub fn to_patch(&self, kind: &ElementKind) -> ElementPatch {
        let mut patch = ElementPatch::default();
        let properties: PropertiesPatch = match self.clone() {
            Self::Name(name) => {
                patch.name = Some(name);
                return patch;
            }
            Self::X(x) => {
                patch.position = Some(PositionPatch {
                    x: Some(x),
                    y: None,
                });
                return patch;
            }
            Self::Y(y) => {
                patch.position = Some(PositionPatch {
                    x: None,
                    y: Some(y),
                });
                return patch;
            }
            Self::Width(width) => {
                patch.size = Some(SizePatch {
                    width: Some(width),
                    height: None,
                });
                return patch;
            }
            Self::Height(height) => {
                patch.size = Some(SizePatch {
                    width: None,
                    height: Some(height),
                });
                return patch;
            }
            Self::Rotation(rotation) => {
                patch.rotation = Some(rotation);
                return patch;
            }
            Self::Opacity(opacity) => {
                patch.opacity = Some(opacity);
                return patch;
            }
            Self::Locked(locked) => {
                patch.locked = Some(locked);
                return patch;
            }
            Self::Visible(visible) => {
                patch.visible = Some(visible);
                return patch;
            }
            Self::Layer(layer) => {
                patch.layer = Some(layer);
                return patch;
            }
            Self::Text(text) => TextPatch {
                text: Some(text),
                ..Default::default()
            }
            .into(),
            Self::FontSize(size) => TextPatch {
                font_size: Some(size),
                ..Default::default()
            }
            .into(),
            Self::FontFamily(family) => TextPatch {
                font_family: Some(family),
                ..Default::default()
            }
            .into(),
            Self::FontWeight(weight) => TextPatch {
                font_weight: Some(weight),
                ..Default::default()
            }
            .into(),
            Self::TextColor(color) => TextPatch {
                color: Some(color),
                ..Default::default()
            }
            .into(),
            Self::Alignment(alignment) => TextPatch {
                alignment: Some(alignment),
                ..Default::default()
            }
            .into(),
            Self::Shape(shape) => ShapePatch {
                shape: Some(shape),
                ..Default::default()
            }
            .into(),
            Self::Fill(color) => ShapePatch {
                fill_color: Some(color),
                ..Default::default()
            }
            .into(),
            Self::Stroke(color) => ShapePatch {
                stroke_color: Some(color),
                ..Default::default()
            }
            .into(),
            Self::StrokeWidth(width) => ShapePatch {
                stroke_width: Some(width),
                ..Default::default()
            }
            .into(),
            Self::BorderRadius(radius) => match kind {
                ElementKind::Image(_) => ImagePatch {
                    border_radius: Some(radius),
                    ..Default::default()
                }
                .into(),
                _ => ShapePatch {
                    border_radius: Some(radius),
                    ..Default::default()
                }
                .into(),
            },
            Self::ImageSource(src) => ImagePatch {
                src: Some(src),
                ..Default::default()
            }
            .into(),
            Self::QrData(data) => QrPatch { data: Some(data) }.into(),
        };
        patch.properties = Some(properties);
        patch
    }
}

/// A change to the design as a whole, available when nothing is selected.
#[derive(Clone, Debug, PartialEq)]
pub enum DocumentEdit {
    Background(Background),
    Dimensions(Dimensions),
}

/// Edit the selected element.
pub fn edit_selected(store: &mut DesignStore, edit: &PropertyEdit) -> Result<(), StoreError> {
    let element = store.selected_element().ok_or(StoreError::NothingSelected)?;
    let (id, patch) = (element.id, edit.to_patch(&element.kind));
    store.update_element(id, &patch)
}
pub fn edit_document(store: &mut DesignStore, edit: DocumentEdit) -> Result<(), StoreError> {
    match edit {
        DocumentEdit::Background(background) => store.set_background(background),
        DocumentEdit::Dimensions(dimensions) => store.set_dimensions(dimensions),
    }
}
pub fn delete_selected(store: &mut DesignStore) -> Result<Element, StoreError> {
    let id = store
        .selected_element_id()
        .ok_or(StoreError::NothingSelected)?;
    store.remove_element(id)
}

/// Label and value of every field the panel shows for the current projection.
#[must_use]
pub fn fields(view: Either<&Element, &crate::state::Document>) -> Vec<(&'static str, String)> {
    match view {
        Either::Right(document) => vec![
            ("Template", document.name.clone()),
            ("Width", document.dimensions.width.to_string()),
            ("Height", document.dimensions.height.to_string()),
            ("Resolution", document.dimensions.resolution.to_string()),
            ("Background", document.background.resolve_color().to_string()),
            ("Elements", document.len().to_string()),
        ],
        Either::Left(element) => {
            let mut fields = vec![
                ("Name", element.name.clone()),
                ("Type", element.kind.type_name().to_owned()),
                ("X", element.position.x.to_string()),
                ("Y", element.position.y.to_string()),
                ("Width", element.size.width.to_string()),
                ("Height", element.size.height.to_string()),
                ("Rotation", format!("{}°", element.rotation)),
                ("Opacity", format!("{:.0}%", element.opacity * 100.0)),
                ("Locked", element.locked.to_string()),
                ("Visible", element.visible.to_string()),
            ];
            match &element.kind {
                ElementKind::Text(text) => fields.extend([
                    ("Text", text.text.clone()),
                    ("Font", format!("{} {}", text.font_family, text.font_size)),
                    ("Color", text.color.to_string()),
                ]),
                ElementKind::Shape(shape) => fields.extend([
                    ("Fill", shape.fill_color.to_string()),
                    ("Stroke", shape.stroke_color.to_string()),
                    ("Border radius", shape.border_radius.to_string()),
                ]),
                ElementKind::Image(image) => fields.push(("Source", image.src.clone())),
                ElementKind::Qr(qr) => fields.push(("Data", qr.data.clone())),
                ElementKind::Unsupported(_) => (),
            }
            fields
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::panels::tools::Tool;
    use crate::state::{PatchError, Template};

    fn store_with(tool: Tool) -> DesignStore {
        let mut store = DesignStore::default();
        store.initialize_design(&Template::cr80());
        let id = tool.place(&mut store).unwrap();
        store.set_selected_element(Some(id)).unwrap();
        store
    }

    #[test]
    fn font_size_keeps_text() {
        let mut store = store_with(Tool::Text);
        edit_selected(&mut store, &PropertyEdit::Text("Jane Doe".into())).unwrap();
        edit_selected(&mut store, &PropertyEdit::FontSize(Pixels(30.0))).unwrap();
        let text = store.selected_element().unwrap().kind.text().unwrap();
        assert_eq!(text.text, "Jane Doe");
        assert_eq!(text.font_size, Pixels(30.0));
    }
    #[test]
    fn wrong_kind_rejected() {
        let mut store = store_with(Tool::Qr);
        let before = store.selected_element().cloned();
        assert_eq!(
            edit_selected(&mut store, &PropertyEdit::FontSize(Pixels(30.0))),
            Err(StoreError::Patch(PatchError::KindMismatch {
                patch: "text",
                element: "qr".into()
            }))
        );
        assert_eq!(store.selected_element().cloned(), before);
    }
    #[test]
    fn border_radius_follows_kind() {
        let mut store = store_with(Tool::Image);
        edit_selected(&mut store, &PropertyEdit::BorderRadius(Pixels(6.0))).unwrap();
        let image = store.selected_element().unwrap().kind.image().unwrap();
        assert_eq!(image.border_radius, Pixels(6.0));
    }
    #[test]
    fn nothing_selected() {
        let mut store = store_with(Tool::Rectangle);
        store.set_selected_element(None).unwrap();
        assert_eq!(
            edit_selected(&mut store, &PropertyEdit::Opacity(0.5)),
            Err(StoreError::NothingSelected)
        );
        assert_eq!(
            delete_selected(&mut store).map(|_| ()),
            Err(StoreError::NothingSelected)
        );
        edit_document(
            &mut store,
            DocumentEdit::Background(Background::Color {
                color: Some(Color::BLACK),
            }),
        )
        .unwrap();
        let fields = fields(store.inspect().unwrap());
        assert!(fields.contains(&("Background", "#000000".to_owned())));
    }
    #[test]
    fn delete() {
        let mut store = store_with(Tool::Circle);
        delete_selected(&mut store).unwrap();
        assert!(store.current_design().unwrap().is_empty());
        assert_eq!(store.selected_element_id(), None);
    }
}
