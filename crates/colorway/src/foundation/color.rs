//! Color types and scene-lighting adjustment
//!
//! Colors enter the engine as user-facing hex literals and flow through
//! synthesis as 8-bit RGBA. Near-white colors are softened before they reach
//! a texture so they do not blow out under the host scene's lighting.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors produced when parsing color literals
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// The literal is not a recognized hex color form
    #[error("invalid color literal '{0}': expected #RGB, #RRGGBB, or #RRGGBBAA")]
    InvalidColor(String),
}

/// Perceived brightness above which a color is considered overbright
///
/// Measured on the 0-255 scale with Rec. 601 luma weights.
pub const OVERBRIGHT_THRESHOLD: f32 = 200.0;

/// Channel scale applied to overbright colors
const OVERBRIGHT_SCALE: f32 = 0.95;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (255 = opaque)
    pub a: u8,
}

impl Rgba {
    /// Opaque white
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque black
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Neutral mid-gray used for decode placeholders and fallback tiles
    pub const NEUTRAL_GRAY: Self = Self::rgb(180, 180, 180);

    /// Create a new color from all four channels
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from RGB channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a hex color literal
    ///
    /// Accepts `#RGB`, `#RRGGBB`, and `#RRGGBBAA`, with or without the
    /// leading `#`. Case-insensitive.
    pub fn from_hex(literal: &str) -> Result<Self, ColorError> {
        let digits = literal.strip_prefix('#').unwrap_or(literal);
        let invalid = || ColorError::InvalidColor(literal.to_string());

        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range: &str| u8::from_str_radix(range, 16).map_err(|_| invalid());

        match digits.len() {
            3 => {
                let nibble = |i: usize| -> Result<u8, ColorError> {
                    let v = channel(&digits[i..=i])?;
                    Ok(v << 4 | v)
                };
                Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            8 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
                channel(&digits[6..8])?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Format as an uppercase hex literal
    ///
    /// Opaque colors render as `#RRGGBB`; translucent ones as `#RRGGBBAA`.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Perceived brightness on the 0-255 scale (Rec. 601 luma)
    pub fn perceived_brightness(self) -> f32 {
        0.299 * f32::from(self.r) + 0.587 * f32::from(self.g) + 0.114 * f32::from(self.b)
    }

    /// Soften an overbright color so it does not blow out under scene lighting
    ///
    /// If perceived brightness exceeds [`OVERBRIGHT_THRESHOLD`], each RGB
    /// channel is scaled by 0.95. Single-pass contract: synthesis applies
    /// this exactly once per color, at the entry to a synthesis routine.
    pub fn soften_overbright(self) -> Self {
        if self.perceived_brightness() <= OVERBRIGHT_THRESHOLD {
            return self;
        }
        let scale = |c: u8| (f32::from(c) * OVERBRIGHT_SCALE) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b), self.a)
    }

    /// Linearly interpolate toward another color
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// Replace the alpha channel
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Scale the RGB channels by a factor, leaving alpha untouched
    pub fn scaled(self, factor: f32) -> Self {
        let scale = |c: u8| (f32::from(c) * factor).clamp(0.0, 255.0) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b), self.a)
    }

    /// Raw channel array in RGBA order
    pub const fn channels(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HexVisitor;

        impl Visitor<'_> for HexVisitor {
            type Value = Rgba;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a hex color literal like \"#1A2B3C\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Rgba, E> {
                Rgba::from_hex(v).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(HexVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Rgba::from_hex("#FF0000"), Ok(Rgba::rgb(255, 0, 0)));
        assert_eq!(Rgba::from_hex("00ff00"), Ok(Rgba::rgb(0, 255, 0)));
        assert_eq!(Rgba::from_hex("#F0C"), Ok(Rgba::rgb(255, 0, 204)));
        assert_eq!(
            Rgba::from_hex("#11223344"),
            Ok(Rgba::new(0x11, 0x22, 0x33, 0x44))
        );
    }

    #[test]
    fn test_parse_rejects_malformed_literals() {
        for bad in ["", "#", "#12345", "#GGGGGG", "not a color", "#12 34 56"] {
            assert!(matches!(
                Rgba::from_hex(bad),
                Err(ColorError::InvalidColor(_))
            ));
        }
    }

    #[test]
    fn test_soften_overbright_white() {
        let softened = Rgba::from_hex("#FFFFFF").unwrap().soften_overbright();
        assert_eq!(softened.to_hex(), "#F2F2F2");
    }

    #[test]
    fn test_soften_leaves_dark_colors_unchanged() {
        let navy = Rgba::from_hex("#102040").unwrap();
        assert_eq!(navy.soften_overbright(), navy);
    }

    #[test]
    fn test_soften_is_not_idempotent_above_threshold() {
        // A softened white is still above the threshold, so a second pass
        // would darken it further. This is why the single-pass contract
        // exists: callers apply the adjustment exactly once per color.
        let once = Rgba::WHITE.soften_overbright();
        assert!(once.perceived_brightness() > OVERBRIGHT_THRESHOLD);
        let twice = once.soften_overbright();
        assert!(twice.perceived_brightness() < once.perceived_brightness());
    }

    #[test]
    fn test_brightness_weights() {
        assert!((Rgba::rgb(255, 0, 0).perceived_brightness() - 76.245).abs() < 0.01);
        assert!((Rgba::WHITE.perceived_brightness() - 255.0).abs() < 0.001);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgba::rgb(0, 0, 0);
        let b = Rgba::rgb(200, 100, 50);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgba::rgb(100, 50, 25));
    }

    #[test]
    fn test_hex_round_trip() {
        let color = Rgba::from_hex("#4A90D9").unwrap();
        assert_eq!(color.to_hex(), "#4A90D9");
    }
}
