//! # Units
//!
//! Documents are authored in physical millimeters, the rendering surface works in pixels.
//! Every crossing between the two goes through [`Millimeters::to_pixels`] or [`Pixels::to_millimeters`],
//! under the [`Dpi`] the document was built with.

pub const MM_PER_IN: f64 = 25.4;
pub const MM_PER_CM: f64 = 10.0;
/// Constant varies by who you ask - but this is the one defined by W3C.
pub const PT_PER_IN: f64 = 72.0;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UnitParseError {
    #[error(transparent)]
    Value(#[from] std::num::ParseFloatError),
    #[error("unknown unit")]
    UnrecognizedUnit,
}

/// A physical length, as stored in the design document.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// A length on the rendering surface.
///
/// Some style fields (border radius, stroke width) are authored directly in pixels and are *never*
/// converted through the document resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Pixels(pub f64);

/// Dots (pixels) per inch.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Dpi(pub f64);

impl Millimeters {
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
    /// `length / 25.4 * dpi`
    #[must_use]
    pub fn to_pixels(self, dpi: Dpi) -> Pixels {
        Pixels(self.0 / MM_PER_IN * dpi.0)
    }
    #[must_use]
    pub fn from_inches(inches: f64) -> Self {
        Self(inches * MM_PER_IN)
    }
    #[must_use]
    pub fn from_points(points: f64) -> Self {
        Self(points / PT_PER_IN * MM_PER_IN)
    }
}
impl Pixels {
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
    /// `length / dpi * 25.4`, the inverse of [`Millimeters::to_pixels`].
    #[must_use]
    pub fn to_millimeters(self, dpi: Dpi) -> Millimeters {
        Millimeters(self.0 / dpi.0 * MM_PER_IN)
    }
}
impl Dpi {
    /// Print resolution used by the stock badge templates.
    pub const PRINT: Self = Self(300.0);
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}
impl Default for Dpi {
    fn default() -> Self {
        Self::PRINT
    }
}

macro_rules! length_ops {
    ($ty:ty) => {
        impl std::ops::Add for $ty {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }
        impl std::ops::Sub for $ty {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }
        impl std::ops::Mul<f64> for $ty {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }
        impl std::ops::Div<f64> for $ty {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }
        impl std::ops::Neg for $ty {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }
    };
}
length_ops!(Millimeters);
length_ops!(Pixels);

impl std::fmt::Display for Millimeters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}mm", self.0)
    }
}
impl std::fmt::Display for Pixels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}px", self.0)
    }
}
impl std::fmt::Display for Dpi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}dpi", self.0)
    }
}

impl std::str::FromStr for Millimeters {
    type Err = UnitParseError;
    /// Parse a physical length with a unit suffix, normalizing to millimeters.
    /// Accepts `mm`, `cm`, `in`, and `pt`. Pixels are rejected, as they are resolution dependent.
    fn from_str(mut s: &str) -> Result<Self, Self::Err> {
        s = s.trim_ascii_end();
        // All suffixes are two ascii chars. Still must not split a multi-byte char!
        if s.len() < 2 || !s.is_char_boundary(s.len() - 2) {
            return Err(UnitParseError::UnrecognizedUnit);
        }
        let (value, unit) = s.split_at(s.len() - 2);
        let scale: fn(f64) -> Self = match unit {
            "mm" => Self,
            "cm" => |cm| Self(cm * MM_PER_CM),
            "in" => Self::from_inches,
            "pt" => Self::from_points,
            _ => return Err(UnitParseError::UnrecognizedUnit),
        };
        Ok(scale(value.trim_ascii().parse()?))
    }
}

/// Lengths in templates may be written either as bare millimeter numbers or as unit-suffixed strings.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum LengthRepr {
    Millimeters(f64),
    Text(String),
}
/// `#[serde(deserialize_with)]` helper accepting `54` or `"5.4cm"`.
pub fn deserialize_length<'de, D>(deserializer: D) -> Result<Millimeters, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    match LengthRepr::deserialize(deserializer)? {
        LengthRepr::Millimeters(mm) => Ok(Millimeters(mm)),
        LengthRepr::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod test {
    use super::{Dpi, Millimeters, Pixels, UnitParseError};

    #[test]
    fn one_inch_is_dpi_pixels() {
        assert_eq!(Millimeters(25.4).to_pixels(Dpi(300.0)), Pixels(300.0));
        assert_eq!(Millimeters(25.4).to_pixels(Dpi(96.0)), Pixels(96.0));
    }
    #[test]
    fn round_trip() {
        let dpi = Dpi::PRINT;
        for mm in [0.0, 0.1, 5.0, 53.98, 85.6, 1000.0] {
            let back = Millimeters(mm).to_pixels(dpi).to_millimeters(dpi);
            assert!((back.get() - mm).abs() < 1e-9, "{mm} came back as {back}");
        }
    }
    #[test]
    fn parse_suffixes() {
        assert_eq!("54mm".parse(), Ok(Millimeters(54.0)));
        assert_eq!("5.4 cm".parse(), Ok(Millimeters(54.0)));
        assert_eq!("1in".parse(), Ok(Millimeters(25.4)));
        assert_eq!("72pt".parse(), Ok(Millimeters(25.4)));
        assert_eq!(
            "10px".parse::<Millimeters>(),
            Err(UnitParseError::UnrecognizedUnit)
        );
        assert!(matches!(
            "abcmm".parse::<Millimeters>(),
            Err(UnitParseError::Value(_))
        ));
        // Multibyte tail mustn't panic.
        assert_eq!(
            "5ü".parse::<Millimeters>(),
            Err(UnitParseError::UnrecognizedUnit)
        );
    }
}
