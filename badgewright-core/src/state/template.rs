//! # Templates
//!
//! A template is the plain-data description of a new badge: everything a [`Document`] has, minus the ids.
//! Choosing a template creates a fresh document with freshly allocated ids.

use super::background::Background;
use super::document::{Dimensions, Document};
use super::element::{Element, ElementDraft};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub elements: Vec<ElementDraft>,
}
impl Template {
    /// A blank, white CR80 card at print resolution.
    #[must_use]
    pub fn cr80() -> Self {
        Self {
            name: "CR80".into(),
            dimensions: Dimensions::CR80,
            background: Background::default(),
            elements: Vec::new(),
        }
    }
    /// Create a new document from this template.
    #[must_use]
    pub fn instantiate(&self) -> Document {
        let mut document = Document::new(
            self.name.clone(),
            self.dimensions,
            self.background.clone(),
        );
        for (index, draft) in self.elements.iter().enumerate() {
            // Fresh ids never collide, and we only ever append.
            let _ = document.insert(index, Element::from_draft(draft.clone()));
        }
        document
    }
}
impl From<&Document> for Template {
    fn from(document: &Document) -> Self {
        Self {
            name: document.name.clone(),
            dimensions: document.dimensions,
            background: document.background.clone(),
            elements: document.iter().map(Element::to_draft).collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Template;
    use crate::state::element::{ElementDraft, ElementKind, QrProperties, Size};
    use crate::units::Millimeters;

    #[test]
    fn instantiate_assigns_fresh_ids() {
        let mut template = Template::cr80();
        let draft = ElementDraft {
            name: "QR".into(),
            position: Default::default(),
            size: Size {
                width: Millimeters(20.0),
                height: Millimeters(20.0),
            },
            rotation: 0.0,
            opacity: 1.0,
            locked: false,
            visible: true,
            layer: 0,
            kind: ElementKind::Qr(QrProperties { data: "x".into() }),
        };
        template.elements = vec![draft.clone(), draft];

        let a = template.instantiate();
        let b = template.instantiate();
        assert_eq!(a.len(), 2);
        assert_ne!(a.elements()[0].id, a.elements()[1].id);
        assert_ne!(a.elements()[0].id, b.elements()[0].id);
        assert_ne!(a.id, b.id);
        // Exporting loses only the ids.
        assert_eq!(Template::from(&a), template);
    }
}
