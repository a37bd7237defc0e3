//! Studio configuration
//!
//! The full customization state: per-zone part finishes, the lace color, and
//! the logo style. Config types are serde-serializable and can be loaded
//! from TOML (image sources are runtime-only and never serialized).
//! Validation happens up front so synthesis never sees out-of-range
//! parameters.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::foundation::color::Rgba;
use crate::synthesis::{image, PartZone, Synthesizer, MAX_SPLATTER_DENSITY};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed values are out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Raw image bytes supplied by the user or an upstream generator
///
/// Compared and cache-addressed by a fingerprint of the bytes.
#[derive(Clone)]
pub struct ImageSource {
    bytes: Arc<Vec<u8>>,
    fingerprint: u64,
}

impl ImageSource {
    /// Wrap raw encoded image bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        let fingerprint = image::fingerprint(&bytes);
        Self {
            bytes: Arc::new(bytes),
            fingerprint,
        }
    }

    /// The encoded bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Content fingerprint
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageSource")
            .field("len", &self.bytes.len())
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

impl PartialEq for ImageSource {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }
}

/// Two-color gradient parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientParams {
    /// Sweep start color
    pub start: Rgba,
    /// Sweep end color
    pub end: Rgba,
}

/// Splatter effect parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplatterParams {
    /// Primary dot color
    pub color: Rgba,
    /// Secondary dot color, used in dual mode
    #[serde(default)]
    pub secondary_color: Option<Rgba>,
    /// Explicit background color; falls back to the part's base color
    #[serde(default)]
    pub base_color: Option<Rgba>,
    /// Whether dots alternate between the two colors
    #[serde(default)]
    pub dual_mode: bool,
    /// Dot density
    #[serde(default = "SplatterParams::default_density")]
    pub density: u16,
}

impl SplatterParams {
    /// Default dot density
    pub const DEFAULT_DENSITY: u16 = 400;

    fn default_density() -> u16 {
        Self::DEFAULT_DENSITY
    }

    /// Create single-color params with the default density
    pub fn single(color: Rgba) -> Self {
        Self {
            color,
            secondary_color: None,
            base_color: None,
            dual_mode: false,
            density: Self::DEFAULT_DENSITY,
        }
    }

    /// The secondary color, when dual mode is actually in effect
    pub fn effective_secondary(&self) -> Option<Rgba> {
        if self.dual_mode {
            self.secondary_color
        } else {
            None
        }
    }
}

/// The effect currently in force for a part, after precedence resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedEffect<'a> {
    /// An external raster image
    Image(&'a ImageSource),
    /// A brush-stroke gradient
    Gradient(&'a GradientParams),
    /// A splatter pattern
    Splatter(&'a SplatterParams),
    /// The plain base color
    Base,
}

/// Finish configuration for one part zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartFinish {
    /// Base color, also the background for most effects
    pub base_color: Rgba,
    /// Optional gradient effect
    pub gradient: Option<GradientParams>,
    /// Optional splatter effect
    pub splatter: Option<SplatterParams>,
    /// Optional external image; runtime-only, never serialized
    #[serde(skip)]
    pub image: Option<ImageSource>,
}

impl Default for PartFinish {
    fn default() -> Self {
        Self {
            base_color: Rgba::rgb(215, 215, 215),
            gradient: None,
            splatter: None,
            image: None,
        }
    }
}

impl PartFinish {
    /// Resolve which effect is in force
    ///
    /// Precedence: external image, then gradient, then splatter, then the
    /// plain base color. The stored effects are independent; this resolution
    /// is the single place the mutual-exclusion rule lives.
    pub fn resolved_effect(&self) -> ResolvedEffect<'_> {
        if let Some(image) = &self.image {
            ResolvedEffect::Image(image)
        } else if let Some(gradient) = &self.gradient {
            ResolvedEffect::Gradient(gradient)
        } else if let Some(splatter) = &self.splatter {
            ResolvedEffect::Splatter(splatter)
        } else {
            ResolvedEffect::Base
        }
    }
}

/// Logo styling: three semantic colors plus an optional decal image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoStyle {
    /// Ring color
    pub primary: Rgba,
    /// Center disc color
    pub secondary: Rgba,
    /// Chevron mark color
    pub accent: Rgba,
    /// Optional decal image; runtime-only, never serialized
    #[serde(skip)]
    pub decal: Option<ImageSource>,
}

impl Default for LogoStyle {
    fn default() -> Self {
        Self {
            primary: Rgba::rgb(200, 16, 46),
            secondary: Rgba::WHITE,
            accent: Rgba::rgb(29, 29, 27),
            decal: None,
        }
    }
}

/// The complete customization state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Upper finish
    pub upper: PartFinish,
    /// Sole finish
    pub sole: PartFinish,
    /// Lace color
    pub lace_color: Rgba,
    /// Logo styling
    pub logo: LogoStyle,
    /// Edge length of synthesized textures
    pub texture_size: u32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            upper: PartFinish::default(),
            sole: PartFinish {
                base_color: Rgba::rgb(230, 230, 230),
                ..PartFinish::default()
            },
            lace_color: Rgba::rgb(250, 250, 250),
            logo: LogoStyle::default(),
            texture_size: Synthesizer::DEFAULT_TEXTURE_SIZE,
        }
    }
}

impl StudioConfig {
    /// Load configuration from a TOML string
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        log::info!("loaded studio config from {:?}", path.as_ref());
        Self::from_toml_str(&source)
    }

    /// The finish for a zone
    pub fn finish(&self, zone: PartZone) -> &PartFinish {
        match zone {
            PartZone::Upper => &self.upper,
            PartZone::Sole => &self.sole,
        }
    }

    /// Mutable access to a zone's finish
    pub fn finish_mut(&mut self, zone: PartZone) -> &mut PartFinish {
        match zone {
            PartZone::Upper => &mut self.upper,
            PartZone::Sole => &mut self.sole,
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (zone, finish) in [(PartZone::Upper, &self.upper), (PartZone::Sole, &self.sole)] {
            if let Some(splatter) = &finish.splatter {
                if splatter.density == 0 || splatter.density > MAX_SPLATTER_DENSITY {
                    return Err(ConfigError::Invalid(format!(
                        "{zone:?} splatter density {} outside 1-{MAX_SPLATTER_DENSITY}",
                        splatter.density
                    )));
                }
                if splatter.dual_mode && splatter.secondary_color.is_none() {
                    return Err(ConfigError::Invalid(format!(
                        "{zone:?} splatter dual mode requires a secondary color"
                    )));
                }
            }
        }
        if !(64..=4096).contains(&self.texture_size) {
            return Err(ConfigError::Invalid(format!(
                "texture size {} outside 64-4096",
                self.texture_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(StudioConfig::default().validate().is_ok());
    }

    #[test]
    fn test_effect_precedence() {
        let mut finish = PartFinish::default();
        assert_eq!(finish.resolved_effect(), ResolvedEffect::Base);

        let splatter = SplatterParams::single(Rgba::BLACK);
        finish.splatter = Some(splatter);
        assert!(matches!(finish.resolved_effect(), ResolvedEffect::Splatter(_)));

        let gradient = GradientParams {
            start: Rgba::WHITE,
            end: Rgba::BLACK,
        };
        finish.gradient = Some(gradient);
        assert!(matches!(finish.resolved_effect(), ResolvedEffect::Gradient(_)));

        finish.image = Some(ImageSource::new(vec![1, 2, 3]));
        assert!(matches!(finish.resolved_effect(), ResolvedEffect::Image(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let source = r##"
            lace_color = "#FAF0E6"
            texture_size = 512

            [upper]
            base_color = "#4A90D9"

            [sole]
            base_color = "#222222"

            [sole.splatter]
            color = "#F0F0F0"
            secondary_color = "#D94A4A"
            dual_mode = true
            density = 600

            [logo]
            primary = "#C8102E"
        "##;
        let config = StudioConfig::from_toml_str(source).unwrap();
        assert_eq!(config.upper.base_color, Rgba::rgb(0x4A, 0x90, 0xD9));
        assert_eq!(config.texture_size, 512);
        let splatter = config.sole.splatter.unwrap();
        assert!(splatter.dual_mode);
        assert_eq!(splatter.density, 600);
        assert_eq!(splatter.effective_secondary(), Some(Rgba::rgb(0xD9, 0x4A, 0x4A)));
    }

    #[test]
    fn test_density_validation() {
        let mut config = StudioConfig::default();
        config.upper.splatter = Some(SplatterParams {
            density: 0,
            ..SplatterParams::single(Rgba::BLACK)
        });
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_dual_mode_requires_secondary() {
        let mut config = StudioConfig::default();
        config.sole.splatter = Some(SplatterParams {
            dual_mode: true,
            ..SplatterParams::single(Rgba::BLACK)
        });
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_image_source_fingerprint_equality() {
        let a = ImageSource::new(vec![1, 2, 3]);
        let b = ImageSource::new(vec![1, 2, 3]);
        let c = ImageSource::new(vec![4, 5, 6]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
