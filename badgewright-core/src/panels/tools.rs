//! The tools panel: one button per kind of element.

use crate::color::Color;
use crate::state::element::{
    Alignment, ElementDraft, ElementKind, FontWeight, ImageProperties, Position, QrProperties,
    ShapeKind, ShapeProperties, Size, TextProperties,
};
use crate::state::{Dimensions, ElementID};
use crate::store::{DesignStore, StoreError};
use crate::units::{Millimeters, Pixels};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumIter)]
pub enum Tool {
    Text,
    Rectangle,
    Circle,
    Image,
    #[strum(serialize = "QR Code")]
    Qr,
}
impl Tool {
    /// Size of a freshly placed element.
    #[must_use]
    pub fn default_size(self) -> Size {
        let (width, height) = match self {
            Self::Text => (40.0, 8.0),
            Self::Rectangle => (20.0, 15.0),
            Self::Circle | Self::Qr => (20.0, 20.0),
            Self::Image => (25.0, 25.0),
        };
        Size {
            width: Millimeters(width),
            height: Millimeters(height),
        }
    }
    fn default_kind(self) -> ElementKind {
        let shape = |shape| {
            ElementKind::Shape(ShapeProperties {
                shape,
                fill_color: Color::rgb(0x3b, 0x82, 0xf6),
                stroke_color: Color::rgb(0x1e, 0x40, 0xaf),
                stroke_width: Pixels(1.0),
                border_radius: Pixels(0.0),
            })
        };
        match self {
            Self::Text => ElementKind::Text(TextProperties {
                text: "Text".into(),
                font_size: Pixels(16.0),
                font_family: "Arial".into(),
                font_weight: FontWeight::Normal,
                color: Color::BLACK,
                alignment: Alignment::Left,
            }),
            Self::Rectangle => shape(ShapeKind::Rectangle),
            Self::Circle => shape(ShapeKind::Circle),
            Self::Image => ElementKind::Image(ImageProperties {
                src: String::new(),
                border_radius: Pixels(0.0),
            }),
            Self::Qr => ElementKind::Qr(QrProperties {
                data: "https://example.com".into(),
            }),
        }
    }
    /// A new element of this kind, centered on a card of the given size.
    #[must_use]
    pub fn draft(self, dimensions: &Dimensions) -> ElementDraft {
        let size = self.default_size();
        ElementDraft {
            name: self.as_ref().to_owned(),
            position: Position {
                x: (dimensions.width - size.width) / 2.0,
                y: (dimensions.height - size.height) / 2.0,
            },
            size,
            rotation: 0.0,
            opacity: 1.0,
            locked: false,
            visible: true,
            layer: 0,
            kind: self.default_kind(),
        }
    }
    /// Add a new element of this kind to the current design.
    pub fn place(self, store: &mut DesignStore) -> Result<ElementID, StoreError> {
        let dimensions = store
            .current_design()
            .ok_or(StoreError::NoDesign)?
            .dimensions;
        let id = store.add_element(self.draft(&dimensions))?;
        log::debug!("Placed {} as {id}", self.as_ref());
        Ok(id)
    }
}

#[cfg(test)]
mod test {
    use super::Tool;
    use crate::state::{Dimensions, Template};
    use crate::store::DesignStore;
    use crate::units::Millimeters;

    #[test]
    fn every_tool_centers() {
        let dimensions = Dimensions::CR80;
        for tool in <Tool as strum::IntoEnumIterator>::iter() {
            let draft = tool.draft(&dimensions);
            let center_x = draft.position.x + draft.size.width / 2.0;
            let center_y = draft.position.y + draft.size.height / 2.0;
            assert!((center_x - Millimeters(42.8)).get().abs() < 1e-9, "{tool:?}");
            assert!((center_y - Millimeters(26.99)).get().abs() < 1e-9, "{tool:?}");
            assert_ne!(draft.kind.type_name(), "unsupported");
        }
    }
    #[test]
    fn place_appends() {
        let mut store = DesignStore::default();
        store.initialize_design(&Template::cr80());
        let a = Tool::Text.place(&mut store).unwrap();
        let b = Tool::Qr.place(&mut store).unwrap();
        let design = store.current_design().unwrap();
        assert_eq!(design.index_of(a), Some(0));
        assert_eq!(design.index_of(b), Some(1));
        assert_eq!(design.get(b).unwrap().name, "QR Code");
    }
}
