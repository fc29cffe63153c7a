//! # Rendering Surface
//!
//! The live, interactive canvas is an external collaborator. It is described here only by what the canvas
//! controller needs from it: an ordered list of tagged primitives, an active selection, a zoom and
//! overlay flags, and a stream of notifications about what the user did to it.
//!
//! All programmatic changes made through [`RenderSurface`] are silent. Only user interaction produces
//! [`SurfaceEvent`]s, which is what keeps selection from echoing back and forth.

pub mod memory;

use crate::color::Color;
use crate::state::element::TextProperties;
use crate::state::ElementID;
use crate::units::Pixels;

/// Where a primitive sits on the surface, in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceGeometry {
    pub left: Pixels,
    pub top: Pixels,
    /// Unscaled width. The visible width is `width * scale_x`.
    pub width: Pixels,
    pub height: Pixels,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Degrees, clockwise.
    pub angle: f64,
    pub opacity: f64,
}
impl SurfaceGeometry {
    #[must_use]
    pub fn scaled_width(&self) -> Pixels {
        self.width * self.scale_x
    }
    #[must_use]
    pub fn scaled_height(&self) -> Pixels {
        self.height * self.scale_y
    }
    /// Is the point inside the (unrotated) bounds?
    #[must_use]
    pub fn contains(&self, x: Pixels, y: Pixels) -> bool {
        let right = self.left + self.scaled_width();
        let bottom = self.top + self.scaled_height();
        x >= self.left && x <= right && y >= self.top && y <= bottom
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PrimitiveShape {
    /// Editable text.
    TextBox(TextProperties),
    Rect {
        fill: Color,
        stroke: Color,
        stroke_width: Pixels,
        corner_radius: Pixels,
    },
    Circle {
        radius: Pixels,
        fill: Color,
        stroke: Color,
        stroke_width: Pixels,
    },
    Image {
        src: String,
        /// Decoded size in pixels, before being fit into the geometry.
        natural_size: [u32; 2],
        corner_radius: Pixels,
    },
}
impl PrimitiveShape {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::TextBox(_) => "textbox",
            Self::Rect { .. } => "rect",
            Self::Circle { .. } => "circle",
            Self::Image { .. } => "image",
        }
    }
}

/// One renderable object, correlated with its element through `tag`.
#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    pub tag: ElementID,
    pub geometry: SurfaceGeometry,
    pub visible: bool,
    /// Whether the user may select (and thus move) this primitive.
    pub selectable: bool,
    pub shape: PrimitiveShape,
}

/// Everything needed to create a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceConfig {
    pub width: Pixels,
    pub height: Pixels,
    pub background: Color,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Overlays {
    pub grid: bool,
    pub guides: bool,
}

/// Notifications of user interaction.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
    /// A selection was made where there was none. `None` for an untagged primitive.
    SelectionCreated(Option<ElementID>),
    /// The selection moved to another primitive.
    SelectionUpdated(Option<ElementID>),
    SelectionCleared,
    /// The user finished moving, scaling, or rotating a primitive.
    ObjectModified {
        tag: ElementID,
        geometry: SurfaceGeometry,
    },
    /// The user deleted a primitive. It is already gone from the surface.
    ObjectRemoved { tag: ElementID },
}

pub trait RenderSurface {
    fn config(&self) -> &SurfaceConfig;
    /// Every primitive, in paint order.
    fn primitives(&self) -> &[Primitive];
    fn primitive(&self, tag: ElementID) -> Option<&Primitive> {
        self.primitives().iter().find(|p| p.tag == tag)
    }
    fn contains(&self, tag: ElementID) -> bool {
        self.primitive(tag).is_some()
    }
    /// Insert at a paint position, clamped to the end.
    fn insert(&mut self, index: usize, primitive: Primitive);
    /// Swap out the primitive with the same tag, keeping its paint position.
    /// Returns false if there was none.
    fn replace(&mut self, primitive: Primitive) -> bool;
    fn remove(&mut self, tag: ElementID) -> Option<Primitive>;
    fn set_background(&mut self, color: Color);

    fn active(&self) -> Option<ElementID>;
    /// Set the active selection without notifying. Returns false if `tag` names nothing selectable,
    /// in which case the selection is cleared.
    fn set_active(&mut self, tag: Option<ElementID>) -> bool;

    /// Zoom as a factor, 1.0 is 100%.
    fn zoom(&self) -> f64;
    fn set_zoom(&mut self, zoom: f64);
    fn overlays(&self) -> Overlays;
    fn set_overlays(&mut self, overlays: Overlays);

    /// Take every notification since the last poll, oldest first.
    fn poll_events(&mut self) -> Vec<SurfaceEvent>;
    /// Tear down the surface. It is unusable afterwards.
    fn dispose(self)
    where
        Self: Sized,
    {
    }
}

/// Creates surfaces. The controller disposes the old surface before asking for another.
pub trait SurfaceFactory {
    type Surface: RenderSurface;
    fn create(&mut self, config: SurfaceConfig) -> Self::Surface;
}
