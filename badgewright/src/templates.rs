//! Template files, written in TOML.
//!
//! ```toml
//! name = "Conference"
//!
//! [dimensions]
//! width = "3.375in"   # Bare numbers are millimeters
//! height = "2.125in"
//! resolution = 300
//!
//! [background]
//! kind = "color"      # or "gradient" with `from` and `to`, or "image" with `src`
//! color = "#f0f0f0"
//!
//! [[elements]]
//! name = "Attendee"
//! type = "text"
//! position = { x = 5, y = 20 }
//! size = { width = 60, height = "1cm" }
//! properties = { text = "Jane Doe", fontSize = 24, fontFamily = "Inter", color = "#111" }
//! ```

use anyhow::Context;
use badgewright_core::state::Template;

pub fn parse(text: &str) -> anyhow::Result<Template> {
    Ok(toml::from_str(text)?)
}

pub fn load(path: &std::path::Path) -> anyhow::Result<Template> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading template {}", path.display()))?;
    parse(&text).with_context(|| format!("parsing template {}", path.display()))
}

#[cfg(test)]
mod test {
    use badgewright_core::state::{Background, ElementKind};
    use badgewright_core::units::{Dpi, Millimeters};
    use badgewright_core::Color;

    const CONFERENCE: &str = r##"
name = "Conference"

[dimensions]
width = "3.375in"
height = "2.125in"
resolution = 600

[background]
kind = "gradient"
from = "#123"
to = "#ffffff"

[[elements]]
name = "Attendee"
type = "text"
position = { x = 5, y = 20 }
size = { width = 60, height = "1cm" }
properties = { text = "Jane Doe", fontSize = 24, fontFamily = "Inter", color = "#111", fontWeight = "bold" }

[[elements]]
name = "Badge frame"
type = "shape"
size = { width = 85.725, height = 53.975 }
opacity = 0.5
locked = true
properties = { shape = "rectangle", fillColor = "#ffffff00", strokeColor = "#000", strokeWidth = 3, borderRadius = 12 }

[[elements]]
name = "Sparkles"
type = "hologram"
size = { width = 10, height = 10 }
"##;

    #[test]
    fn conference() {
        let template = super::parse(CONFERENCE).unwrap();
        assert_eq!(template.name, "Conference");
        assert!((template.dimensions.width.get() - 85.725).abs() < 1e-9);
        assert_eq!(template.dimensions.resolution, Dpi(600.0));
        assert_eq!(
            template.background,
            Background::Gradient {
                from: Color::rgb(0x11, 0x22, 0x33),
                to: Color::WHITE,
            }
        );
        let [attendee, frame, sparkles] = &template.elements[..] else {
            panic!("expected three elements, got {:?}", template.elements);
        };

        let text = attendee.kind.text().unwrap();
        assert_eq!(text.text, "Jane Doe");
        assert_eq!(attendee.size.height, Millimeters(10.0));
        assert_eq!(attendee.opacity, 1.0);
        assert!(attendee.visible);

        let shape = frame.kind.shape().unwrap();
        assert_eq!(shape.fill_color.a, 0);
        assert!(frame.locked);

        assert_eq!(sparkles.kind, ElementKind::Unsupported("hologram".into()));
    }
    #[test]
    fn defaults_to_cr80() {
        let template = super::parse(r#"name = "Blank""#).unwrap();
        assert_eq!(template.dimensions, badgewright_core::state::Dimensions::CR80);
        assert!(template.elements.is_empty());
    }
    #[test]
    fn bad_length_rejected() {
        let result = super::parse(
            r#"
            name = "Bad"
            [dimensions]
            width = "10px"
            height = 20
            "#,
        );
        assert!(result.is_err());
    }
    #[test]
    fn missing_file() {
        let path = std::env::temp_dir().join("badgewright-no-such-template.toml");
        let err = super::load(&path).unwrap_err();
        assert!(err.to_string().contains("reading template"));
    }
}
