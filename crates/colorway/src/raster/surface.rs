//! RGBA raster surface
//!
//! Thin drawing layer over an [`image::RgbaImage`] pixel buffer. Surfaces are
//! the unit of texture content in the engine: synthesis draws into one, the
//! device uploads it, and tests fingerprint it via [`Surface::content_hash`].

use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

use image::{Rgba as ImageRgba, RgbaImage};

use crate::foundation::color::Rgba;

/// Pixel compositing modes supported by the drawing primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    /// Standard source-over alpha compositing
    Normal,
    /// Multiply the destination by the source, weighted by source alpha
    Multiply,
}

/// CPU-side RGBA raster surface
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
}

impl Surface {
    /// Create a surface filled with a solid color
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let pixels = RgbaImage::from_pixel(width, height, ImageRgba(color.channels()));
        Self { pixels }
    }

    /// Wrap an already-decoded image buffer
    pub fn from_image(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Surface width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Surface height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Read a pixel; out-of-bounds coordinates return transparent black
    pub fn pixel(&self, x: i64, y: i64) -> Rgba {
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
            return Rgba::new(0, 0, 0, 0);
        }
        let p = self.pixels.get_pixel(x as u32, y as u32).0;
        Rgba::new(p[0], p[1], p[2], p[3])
    }

    /// Write a pixel without blending
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x < self.width() && y < self.height() {
            self.pixels.put_pixel(x, y, ImageRgba(color.channels()));
        }
    }

    /// Composite a pixel using the given blend mode
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba, blend: Blend) {
        if x >= self.width() || y >= self.height() {
            return;
        }
        let dst = self.pixels.get_pixel_mut(x, y);
        let blended = match blend {
            Blend::Normal => source_over(dst.0, color),
            Blend::Multiply => multiply(dst.0, color),
        };
        *dst = ImageRgba(blended);
    }

    /// Flood the whole surface with a solid color
    pub fn fill(&mut self, color: Rgba) {
        for p in self.pixels.pixels_mut() {
            *p = ImageRgba(color.channels());
        }
    }

    /// Draw another surface full-bleed over this one, resampling to fit
    ///
    /// Nearest-neighbor resampling; the source fully replaces destination
    /// pixels (decals arrive pre-composited).
    pub fn draw_image(&mut self, src: &Self) {
        let (dw, dh) = (self.width(), self.height());
        if src.width() == 0 || src.height() == 0 || dw == 0 || dh == 0 {
            return;
        }
        for y in 0..dh {
            let sy = y * src.height() / dh;
            for x in 0..dw {
                let sx = x * src.width() / dw;
                let p = *src.pixels.get_pixel(sx, sy);
                self.pixels.put_pixel(x, y, p);
            }
        }
    }

    /// Stable fingerprint of the pixel content
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        hasher.write(self.pixels.as_raw());
        hasher.finish()
    }

    /// Raw RGBA byte view of the pixel buffer
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Size of the pixel buffer in bytes
    pub fn size_bytes(&self) -> usize {
        self.pixels.as_raw().len()
    }
}

fn source_over(dst: [u8; 4], src: Rgba) -> [u8; 4] {
    let sa = f32::from(src.a) / 255.0;
    if sa >= 1.0 {
        return src.channels();
    }
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }
    let mix = |s: u8, d: u8| {
        let v = (f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a;
        v.round() as u8
    };
    [
        mix(src.r, dst[0]),
        mix(src.g, dst[1]),
        mix(src.b, dst[2]),
        (out_a * 255.0).round() as u8,
    ]
}

fn multiply(dst: [u8; 4], src: Rgba) -> [u8; 4] {
    let sa = f32::from(src.a) / 255.0;
    let mul = |s: u8, d: u8| {
        let product = f32::from(s) * f32::from(d) / 255.0;
        let v = f32::from(d) * (1.0 - sa) + product * sa;
        v.round() as u8
    };
    [
        mul(src.r, dst[0]),
        mul(src.g, dst[1]),
        mul(src.b, dst[2]),
        dst[3],
    ]
}
