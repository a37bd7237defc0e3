//! Convolution filters
//!
//! External decal images get a mild sharpening pass after the full-bleed
//! draw so resampled uploads do not read as blurry on the model.

use crate::foundation::color::Rgba;
use crate::raster::surface::Surface;

/// Weight applied to the center pixel of the sharpen kernel
const SHARPEN_CENTER: f32 = 2.0;

/// Weight applied to the four edge-adjacent neighbors
const SHARPEN_ADJACENT: f32 = -0.25;

/// Apply a 3x3 sharpening convolution to the RGB channels
///
/// Kernel: center 2.0, edge-adjacent neighbors -0.25, corners 0. The weights
/// sum to 1, so flat regions are unchanged. Alpha is left untouched. Edge
/// pixels sample with clamped coordinates.
pub fn sharpen(surface: &Surface) -> Surface {
    let (w, h) = (surface.width(), surface.height());
    let mut out = surface.clone();

    for y in 0..h {
        for x in 0..w {
            let at = |dx: i64, dy: i64| {
                let sx = (i64::from(x) + dx).clamp(0, i64::from(w) - 1);
                let sy = (i64::from(y) + dy).clamp(0, i64::from(h) - 1);
                surface.pixel(sx, sy)
            };
            let center = at(0, 0);
            let neighbors = [at(-1, 0), at(1, 0), at(0, -1), at(0, 1)];

            let channel = |pick: fn(Rgba) -> u8| {
                let mut v = f32::from(pick(center)) * SHARPEN_CENTER;
                for n in &neighbors {
                    v += f32::from(pick(*n)) * SHARPEN_ADJACENT;
                }
                v.clamp(0.0, 255.0).round() as u8
            };

            out.set_pixel(
                x,
                y,
                Rgba::new(
                    channel(|p| p.r),
                    channel(|p| p.g),
                    channel(|p| p.b),
                    center.a,
                ),
            );
        }
    }
    out
}
