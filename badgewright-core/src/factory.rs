//! # Element Factory
//!
//! Turns elements into surface primitives, and surface geometry back into element patches. Every length
//! crossing between document millimeters and surface pixels does so in here.

use crate::color::Color;
use crate::images::DecodedImage;
use crate::state::element::{Element, ElementKind, ShapeKind};
use crate::state::ElementPatch;
use crate::surface::{Primitive, PrimitiveShape, SurfaceGeometry};
use crate::units::{Dpi, Pixels};

/// Stroke of the QR code placeholder.
const QR_STROKE: Pixels = Pixels(2.0);

/// Geometry of an element, converted through `dpi`.
#[must_use]
pub fn geometry(element: &Element, dpi: Dpi) -> SurfaceGeometry {
    SurfaceGeometry {
        left: element.position.x.to_pixels(dpi),
        top: element.position.y.to_pixels(dpi),
        width: element.size.width.to_pixels(dpi),
        height: element.size.height.to_pixels(dpi),
        scale_x: 1.0,
        scale_y: 1.0,
        angle: element.rotation,
        opacity: element.opacity,
    }
}

fn primitive(element: &Element, dpi: Dpi, shape: PrimitiveShape) -> Primitive {
    Primitive {
        tag: element.id,
        geometry: geometry(element, dpi),
        visible: element.visible,
        // Hidden things can't be clicked on, locked things can't be moved.
        selectable: element.visible && !element.locked,
        shape,
    }
}

/// Create the primitive for an element, or `None` if it has no synchronous representation.
///
/// Images are never created here, see [`create_image_primitive`].
#[must_use]
pub fn create_primitive(element: &Element, dpi: Dpi) -> Option<Primitive> {
    let shape = match &element.kind {
        ElementKind::Text(text) => PrimitiveShape::TextBox(text.clone()),
        ElementKind::Shape(shape) => match shape.shape {
            ShapeKind::Rectangle => PrimitiveShape::Rect {
                fill: shape.fill_color,
                stroke: shape.stroke_color,
                stroke_width: shape.stroke_width,
                corner_radius: shape.border_radius,
            },
            ShapeKind::Circle => PrimitiveShape::Circle {
                radius: element.size.width.to_pixels(dpi) / 2.0,
                fill: shape.fill_color,
                stroke: shape.stroke_color,
                stroke_width: shape.stroke_width,
            },
        },
        ElementKind::Qr(_) => PrimitiveShape::Rect {
            fill: Color::WHITE,
            stroke: Color::BLACK,
            stroke_width: QR_STROKE,
            corner_radius: Pixels(0.0),
        },
        ElementKind::Image(_) | ElementKind::Unsupported(_) => return None,
    };
    Some(primitive(element, dpi, shape))
}

/// Create the primitive for an image element once its source has been decoded.
#[must_use]
pub fn create_image_primitive(
    element: &Element,
    dpi: Dpi,
    image: &DecodedImage,
) -> Option<Primitive> {
    let properties = element.kind.image()?;
    Some(primitive(
        element,
        dpi,
        PrimitiveShape::Image {
            src: properties.src.clone(),
            natural_size: image.size(),
            corner_radius: properties.border_radius,
        },
    ))
}

/// Read surface geometry back into document space.
///
/// The effective size is the base size times the scale, as the surface scales rather than resizing.
#[must_use]
pub fn read_back(geometry: &SurfaceGeometry, dpi: Dpi) -> ElementPatch {
    let mut patch = ElementPatch::position(
        geometry.left.to_millimeters(dpi),
        geometry.top.to_millimeters(dpi),
    );
    patch.size = ElementPatch::size(
        geometry.scaled_width().to_millimeters(dpi),
        geometry.scaled_height().to_millimeters(dpi),
    )
    .size;
    patch.rotation = Some(geometry.angle);
    // Non-finite opacity leaves the element's own.
    patch.opacity = geometry
        .opacity
        .is_finite()
        .then(|| geometry.opacity.clamp(0.0, 1.0));
    patch
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::state::element::{
        ElementDraft, ImageProperties, Position, QrProperties, ShapeProperties, Size,
    };
    use crate::units::Millimeters;

    fn element(kind: ElementKind) -> Element {
        Element::from_draft(ElementDraft {
            name: "Test".into(),
            position: Position {
                x: Millimeters(25.4),
                y: Millimeters(12.7),
            },
            size: Size {
                width: Millimeters(25.4),
                height: Millimeters(50.8),
            },
            rotation: 30.0,
            opacity: 0.5,
            locked: false,
            visible: true,
            layer: 0,
            kind,
        })
    }
    fn shape(shape: ShapeKind) -> ElementKind {
        ElementKind::Shape(ShapeProperties {
            shape,
            fill_color: Color::rgb(255, 0, 0),
            stroke_color: Color::BLACK,
            stroke_width: Pixels(1.0),
            border_radius: Pixels(8.0),
        })
    }

    #[test]
    fn rectangle() {
        let element = element(shape(ShapeKind::Rectangle));
        let primitive = create_primitive(&element, Dpi(300.0)).unwrap();
        assert_eq!(primitive.tag, element.id);
        assert_eq!(primitive.geometry.left, Pixels(300.0));
        assert_eq!(primitive.geometry.top, Pixels(150.0));
        assert_eq!(primitive.geometry.width, Pixels(300.0));
        assert_eq!(primitive.geometry.angle, 30.0);
        assert_eq!(primitive.geometry.opacity, 0.5);
        // Radius stays in pixels no matter the resolution.
        let PrimitiveShape::Rect { corner_radius, .. } = primitive.shape else {
            panic!("expected a rect, got {:?}", primitive.shape);
        };
        assert_eq!(corner_radius, Pixels(8.0));
        let PrimitiveShape::Rect { corner_radius, .. } =
            create_primitive(&element, Dpi(600.0)).unwrap().shape
        else {
            unreachable!()
        };
        assert_eq!(corner_radius, Pixels(8.0));
    }
    #[test]
    fn circle_ignores_height() {
        let element = element(shape(ShapeKind::Circle));
        let primitive = create_primitive(&element, Dpi(300.0)).unwrap();
        assert!(matches!(
            primitive.shape,
            PrimitiveShape::Circle { radius, .. } if radius == Pixels(150.0)
        ));
    }
    #[test]
    fn qr_placeholder() {
        let element = element(ElementKind::Qr(QrProperties {
            data: "https://example.com".into(),
        }));
        let primitive = create_primitive(&element, Dpi::PRINT).unwrap();
        assert_eq!(
            primitive.shape,
            PrimitiveShape::Rect {
                fill: Color::WHITE,
                stroke: Color::BLACK,
                stroke_width: Pixels(2.0),
                corner_radius: Pixels(0.0),
            }
        );
    }
    #[test]
    fn no_synchronous_primitive() {
        let image = element(ElementKind::Image(ImageProperties {
            src: "logo.png".into(),
            border_radius: Pixels(0.0),
        }));
        assert!(create_primitive(&image, Dpi::PRINT).is_none());
        let unknown = element(ElementKind::Unsupported("hologram".into()));
        assert!(create_primitive(&unknown, Dpi::PRINT).is_none());
    }
    #[test]
    fn locked_and_hidden() {
        let mut element = element(shape(ShapeKind::Rectangle));
        element.locked = true;
        let primitive = create_primitive(&element, Dpi::PRINT).unwrap();
        assert!(primitive.visible && !primitive.selectable);
        element.locked = false;
        element.visible = false;
        let primitive = create_primitive(&element, Dpi::PRINT).unwrap();
        assert!(!primitive.visible && !primitive.selectable);
    }
    #[test]
    fn read_back_round_trip() {
        let element = element(shape(ShapeKind::Rectangle));
        let dpi = Dpi(300.0);
        let mut geometry = create_primitive(&element, dpi).unwrap().geometry;
        let mut copy = element.clone();
        copy.apply_patch(&read_back(&geometry, dpi)).unwrap();
        assert!((copy.position.x - element.position.x).get().abs() < 1e-9);
        assert!((copy.size.height - element.size.height).get().abs() < 1e-9);

        geometry.scale_x = 2.0;
        geometry.opacity = 1.3;
        let patch = read_back(&geometry, dpi);
        let size = patch.size.unwrap();
        assert!((size.width.unwrap().get() - 50.8).abs() < 1e-9);
        assert_eq!(patch.opacity, Some(1.0));

        geometry.opacity = f64::NAN;
        let patch = read_back(&geometry, dpi);
        assert_eq!(patch.opacity, None);
        let mut faded = Element {
            opacity: 0.4,
            ..element
        };
        faded.apply_patch(&patch).unwrap();
        assert_eq!(faded.opacity, 0.4);
    }
}
