/// An 8-bit sRGB color with straight alpha, written in CSS hex notation.
///
/// Parses `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa`. Always displays in the long form, omitting alpha when opaque.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}
impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.a == u8::MAX
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color must start with '#'")]
    MissingHash,
    #[error("expected 3, 4, 6, or 8 hex digits, found {0}")]
    BadLength(usize),
    #[error("invalid hex digit")]
    BadDigit,
}

impl std::str::FromStr for Color {
    type Err = ColorParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix('#')
            .ok_or(ColorParseError::MissingHash)?;
        // Only ascii hex is valid, so bytes are fine. Validate before slicing.
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigit);
        }
        let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).map(|n| n * 17);
        let byte = |i: usize| u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16);
        let parsed = match digits.len() {
            3 => Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?),
            4 => Self::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?),
            6 => Self::rgb(byte(0)?, byte(1)?, byte(2)?),
            8 => Self::rgba(byte(0)?, byte(1)?, byte(2)?, byte(3)?),
            other => return Err(ColorParseError::BadLength(other)),
        };
        Ok(parsed)
    }
}
impl From<std::num::ParseIntError> for ColorParseError {
    fn from(_: std::num::ParseIntError) -> Self {
        Self::BadDigit
    }
}
impl TryFrom<String> for Color {
    type Error = ColorParseError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}
impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self { r, g, b, a } = *self;
        if self.is_opaque() {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Color, ColorParseError};
    #[test]
    fn parse_forms() {
        assert_eq!("#000".parse(), Ok(Color::BLACK));
        assert_eq!("#fff".parse(), Ok(Color::WHITE));
        assert_eq!("#FFFFFF".parse(), Ok(Color::WHITE));
        assert_eq!("#11223344".parse(), Ok(Color::rgba(0x11, 0x22, 0x33, 0x44)));
        assert_eq!("#1234".parse(), Ok(Color::rgba(0x11, 0x22, 0x33, 0x44)));
    }
    #[test]
    fn parse_errors() {
        assert_eq!("fff".parse::<Color>(), Err(ColorParseError::MissingHash));
        assert_eq!("#ff".parse::<Color>(), Err(ColorParseError::BadLength(2)));
        assert_eq!("#ggg".parse::<Color>(), Err(ColorParseError::BadDigit));
        assert_eq!("#ffé".parse::<Color>(), Err(ColorParseError::BadDigit));
    }
    #[test]
    fn display() {
        assert_eq!(Color::rgb(0x1a, 0x2b, 0x3c).to_string(), "#1a2b3c");
        assert_eq!(Color::TRANSPARENT.to_string(), "#00000000");
    }
}
