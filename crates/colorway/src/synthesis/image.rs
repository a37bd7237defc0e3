//! External raster images (user or AI supplied)
//!
//! While an upload is decoding the part shows an opaque neutral placeholder
//! (never transparent, so the model cannot flash to black). A successful
//! decode is drawn full-bleed and sharpened; a failed decode degrades to a
//! flat neutral tile instead of leaving the part blank.

use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

use crate::foundation::color::Rgba;
use crate::raster::{filter, Surface};
use crate::synthesis::SynthesisError;

/// Fill color of the while-decoding placeholder
const PLACEHOLDER_COLOR: Rgba = Rgba::NEUTRAL_GRAY;

/// Fill color of the decode-failure tile, slightly darker than the
/// placeholder so the two states are distinguishable
const FALLBACK_COLOR: Rgba = Rgba::rgb(168, 168, 168);

/// Fingerprint of raw image bytes for cache addressing
pub fn fingerprint(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write(bytes);
    hasher.finish()
}

/// Opaque neutral tile shown while a decode is pending
pub fn placeholder(size: u32) -> Surface {
    Surface::filled(size, size, PLACEHOLDER_COLOR)
}

/// Flat neutral tile substituted when a decode fails
pub fn fallback_tile(size: u32) -> Surface {
    Surface::filled(size, size, FALLBACK_COLOR)
}

/// Decode image bytes, draw them full-bleed at the target size, and sharpen
///
/// The sharpening pass touches RGB only; alpha from the source is preserved.
pub fn decode_full_bleed(bytes: &[u8], size: u32) -> Result<Surface, SynthesisError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| SynthesisError::Decode(e.to_string()))?
        .to_rgba8();
    log::debug!(
        "decoded external image {}x{} ({} bytes)",
        decoded.width(),
        decoded.height(),
        bytes.len()
    );

    let mut surface = Surface::filled(size, size, PLACEHOLDER_COLOR);
    surface.draw_image(&Surface::from_image(decoded));
    Ok(filter::sharpen(&surface))
}
