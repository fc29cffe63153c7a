use crate::color::Color;

/// What is painted behind every element.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Background {
    Color {
        #[serde(default)]
        color: Option<Color>,
    },
    /// Linear, top to bottom.
    Gradient { from: Color, to: Color },
    Image { src: String },
}
impl Default for Background {
    fn default() -> Self {
        Self::Color {
            color: Some(Color::WHITE),
        }
    }
}
impl Background {
    /// The single fill color of the rendering surface.
    ///
    /// Surfaces have no multi-stop fill, so a gradient is approximated by its first stop. Image backgrounds
    /// are not drawn by the surface at all and leave it white.
    #[must_use]
    pub fn resolve_color(&self) -> Color {
        match self {
            Self::Color { color } => color.unwrap_or(Color::WHITE),
            Self::Gradient { from, .. } => *from,
            Self::Image { .. } => Color::WHITE,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Background, Color};
    #[test]
    fn resolve() {
        let red = Color::rgb(255, 0, 0);
        let blue = Color::rgb(0, 0, 255);
        assert_eq!(
            Background::Color { color: Some(red) }.resolve_color(),
            red
        );
        assert_eq!(Background::Color { color: None }.resolve_color(), Color::WHITE);
        assert_eq!(
            Background::Gradient {
                from: blue,
                to: red
            }
            .resolve_color(),
            blue
        );
        assert_eq!(
            Background::Image {
                src: "logo.png".into()
            }
            .resolve_color(),
            Color::WHITE
        );
    }
}
