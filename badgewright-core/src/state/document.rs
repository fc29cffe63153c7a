use super::background::Background;
use super::element::{Element, ElementID};
use crate::units::{Dpi, Millimeters, Pixels};

pub type DocumentID = crate::LocalID<Document>;

/// Physical size of the printed card, and the resolution used to turn it into pixels.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    #[serde(deserialize_with = "crate::units::deserialize_length")]
    pub width: Millimeters,
    #[serde(deserialize_with = "crate::units::deserialize_length")]
    pub height: Millimeters,
    #[serde(default)]
    pub resolution: Dpi,
}
impl Dimensions {
    /// ISO/IEC 7810 ID-1, the usual badge and payment card size, in landscape.
    pub const CR80: Self = Self {
        width: Millimeters(85.6),
        height: Millimeters(53.98),
        resolution: Dpi::PRINT,
    };
    /// Get the size of the card, in pixels.
    #[must_use]
    pub fn size_pixels(&self) -> [Pixels; 2] {
        [
            self.width.to_pixels(self.resolution),
            self.height.to_pixels(self.resolution),
        ]
    }
    /// Get the size of the card, in rounded whole pixels.
    #[must_use]
    pub fn size_whole_pixels(&self) -> [u32; 2] {
        self.size_pixels().map(|px| px.get().round().max(0.0) as u32)
    }
}
impl Default for Dimensions {
    fn default() -> Self {
        Self::CR80
    }
}

/// One badge design. Elements are in paint order, later elements on top.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub id: DocumentID,
    /// Name of the template this was created from.
    pub name: String,
    pub dimensions: Dimensions,
    pub background: Background,
    // Not public! Ids must stay unique, which only the insert path checks.
    elements: Vec<Element>,
}
impl Default for Document {
    fn default() -> Self {
        Self::new("New Badge".into(), Dimensions::default(), Background::default())
    }
}
// Public methods for readers
impl Document {
    #[must_use]
    pub fn new(name: String, dimensions: Dimensions, background: Background) -> Self {
        Self {
            id: DocumentID::next(),
            name,
            dimensions,
            background,
            elements: Vec::new(),
        }
    }
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Element> + '_ {
        self.elements.iter()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
    #[must_use]
    pub fn get(&self, id: ElementID) -> Option<&Element> {
        self.elements.iter().find(|element| element.id == id)
    }
    #[must_use]
    pub fn index_of(&self, id: ElementID) -> Option<usize> {
        self.elements.iter().position(|element| element.id == id)
    }
    #[must_use]
    pub fn contains(&self, id: ElementID) -> bool {
        self.index_of(id).is_some()
    }
    /// Center of the card, in document space.
    #[must_use]
    pub fn center(&self) -> [Millimeters; 2] {
        [self.dimensions.width / 2.0, self.dimensions.height / 2.0]
    }
}
// Private methods for the writer and command applier
impl Document {
    /// Insert at `index`, or `None` if the index is out of range or the id is already used.
    #[must_use]
    pub(crate) fn insert(&mut self, index: usize, element: Element) -> Option<()> {
        if index > self.elements.len() || self.contains(element.id) {
            return None;
        }
        self.elements.insert(index, element);
        Some(())
    }
    pub(crate) fn get_mut(&mut self, id: ElementID) -> Option<&mut Element> {
        self.elements.iter_mut().find(|element| element.id == id)
    }
    pub(crate) fn remove(&mut self, id: ElementID) -> Option<(usize, Element)> {
        let index = self.index_of(id)?;
        Some((index, self.elements.remove(index)))
    }
    pub(crate) fn remove_at(&mut self, index: usize) -> Option<Element> {
        (index < self.elements.len()).then(|| self.elements.remove(index))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::state::element::{ElementDraft, ElementKind, QrProperties, Size};

    fn qr() -> Element {
        Element::from_draft(ElementDraft {
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
            kind: ElementKind::Qr(QrProperties {
                data: "hello".into(),
            }),
        })
    }

    #[test]
    fn cr80_pixels() {
        // 85.6mm at 300dpi
        assert_eq!(Dimensions::CR80.size_whole_pixels(), [1011, 638]);
    }
    #[test]
    fn ids_stay_unique() {
        let mut document = Document::default();
        let element = qr();
        assert!(document.insert(0, element.clone()).is_some());
        assert!(document.insert(1, element).is_none());
        assert!(document.insert(5, qr()).is_none());
        assert_eq!(document.len(), 1);
    }
    #[test]
    fn remove_reports_index() {
        let mut document = Document::default();
        let (a, b) = (qr(), qr());
        let b_id = b.id;
        document.insert(0, a).unwrap();
        document.insert(1, b).unwrap();
        let (index, removed) = document.remove(b_id).unwrap();
        assert_eq!(index, 1);
        assert_eq!(removed.id, b_id);
        assert!(!document.contains(b_id));
    }
}
