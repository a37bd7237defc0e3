//! Procedural texture synthesis
//!
//! Pure raster producers for the engine's effect modes: flat fills, the
//! sole's baked ground-contact shading, brush-stroke gradients, stochastic
//! splatter, and decoded external images. Every producer is addressed by a
//! [`TextureKey`] and its output is memoized in the [`cache::TextureCache`];
//! randomized modes seed their PRNG from the key so identical parameters
//! always produce identical pixels.

pub mod brush;
pub mod cache;
pub mod flat;
pub mod image;
pub mod key;
pub mod shadow;
pub mod splatter;

use thiserror::Error;

use crate::device::DeviceTextureId;
use crate::foundation::color::ColorError;
use crate::raster::Surface;

pub use cache::TextureCache;
pub use key::{PartZone, TextureKey};

/// Largest accepted splatter density
pub const MAX_SPLATTER_DENSITY: u16 = 2000;

/// Errors produced during texture synthesis
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// A color literal failed to parse
    #[error(transparent)]
    Color(#[from] ColorError),

    /// Splatter density outside the supported range
    #[error("splatter density {0} outside supported range 1-2000")]
    DensityOutOfRange(u16),

    /// An external image failed to decode
    #[error("failed to decode external image: {0}")]
    Decode(String),

    /// An external-image key was rendered without its source bytes
    #[error("external-image textures require source bytes")]
    MissingImageSource,
}

/// A synthesized texture: immutable raster content plus its device handle
///
/// Created once per unique [`TextureKey`], uploaded once, and shared by
/// reference across every part that resolves to the same key.
#[derive(Debug)]
pub struct SynthesizedTexture {
    key: TextureKey,
    surface: Surface,
    device_texture: DeviceTextureId,
}

impl SynthesizedTexture {
    /// Bundle a finished surface with its device handle
    pub fn new(key: TextureKey, surface: Surface, device_texture: DeviceTextureId) -> Self {
        Self {
            key,
            surface,
            device_texture,
        }
    }

    /// The key this texture was synthesized for
    pub fn key(&self) -> &TextureKey {
        &self.key
    }

    /// The raster content
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Handle of the uploaded device texture
    pub fn device_texture(&self) -> DeviceTextureId {
        self.device_texture
    }
}

/// Renders procedural texture content for cache keys
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer {
    texture_size: u32,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TEXTURE_SIZE)
    }
}

impl Synthesizer {
    /// Default edge length of synthesized textures, in pixels
    pub const DEFAULT_TEXTURE_SIZE: u32 = 1024;

    /// Create a synthesizer producing square textures of the given size
    pub fn new(texture_size: u32) -> Self {
        Self { texture_size }
    }

    /// Edge length of produced textures
    pub fn texture_size(&self) -> u32 {
        self.texture_size
    }

    /// Render the raster content for a procedural key
    ///
    /// External-image keys cannot be rendered from the key alone (the pixel
    /// source lives outside the key) and yield
    /// [`SynthesisError::MissingImageSource`].
    pub fn render(&self, key: &TextureKey) -> Result<Surface, SynthesisError> {
        let size = self.texture_size;
        match key {
            TextureKey::Flat { color, .. } => Ok(flat::render(size, *color)),
            TextureKey::Shadowed { color } => Ok(shadow::render(size, *color)),
            TextureKey::BrushGradient { zone, start, end } => {
                Ok(brush::render(size, *zone, *start, *end, key.seed()))
            }
            TextureKey::Splatter {
                zone,
                background,
                primary,
                secondary,
                density,
            } => splatter::render(
                size,
                *zone,
                *background,
                *primary,
                *secondary,
                *density,
                key.seed(),
            ),
            TextureKey::DecodePlaceholder => Ok(image::placeholder(size)),
            TextureKey::ExternalImage { .. } => Err(SynthesisError::MissingImageSource),
        }
    }
}
