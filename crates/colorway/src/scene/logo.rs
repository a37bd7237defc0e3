//! Persistent logo decal canvases
//!
//! Recoloring the logo must never swap the texture object bound to a logo
//! material: a swap is a visible pop on the live model. Each logo part gets
//! one [`LogoCanvas`] for the whole session; recolor and decal requests are
//! debounced, redraw the canvas pixels in place, and re-upload through the
//! existing device texture. The only public mutation is
//! [`LogoCanvas::redraw`]; there is no way to replace the underlying buffer.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::device::{DeviceTextureId, RenderDevice};
use crate::foundation::color::Rgba;
use crate::foundation::math::Vec2;
use crate::foundation::time::Debounce;
use crate::raster::{Blend, Blob, Surface};
use crate::scene::material::{PartMaterial, TextureAttachment};
use crate::scene::mesh::UvTransform;

/// Outer radius of the roundel ring, as a fraction of the short canvas edge
const RING_OUTER: f32 = 0.42;

/// Inner radius of the ring / radius of the center disc
const RING_INNER: f32 = 0.30;

/// Radius of the circular decal clip zone
const DECAL_ZONE: f32 = 0.28;

/// Chevron mark outline, normalized around the canvas center
const CHEVRON_ANCHORS: [(f32, f32); 6] = [
    (-0.14, 0.10),
    (0.0, -0.12),
    (0.14, 0.10),
    (0.08, 0.10),
    (0.0, -0.02),
    (-0.08, 0.10),
];

/// The logo's three semantic colors plus an optional user decal
#[derive(Debug, Clone)]
pub struct LogoArtwork {
    /// Ring color
    pub primary: Rgba,
    /// Center disc color
    pub secondary: Rgba,
    /// Chevron mark color
    pub accent: Rgba,
    /// Decoded user decal, clipped into the center zone
    pub decal: Option<Arc<Surface>>,
}

impl Default for LogoArtwork {
    fn default() -> Self {
        Self {
            primary: Rgba::rgb(200, 16, 46),
            secondary: Rgba::WHITE,
            accent: Rgba::rgb(29, 29, 27),
            decal: None,
        }
    }
}

/// One persistent raster surface per logo part
///
/// Allocated at the original texture's resolution (fallback 1024x1024),
/// uploaded once, and only ever redrawn in place.
#[derive(Debug)]
pub struct LogoCanvas {
    surface: Surface,
    device_texture: DeviceTextureId,
    uv: UvTransform,
}

impl LogoCanvas {
    /// Canvas resolution used when the original material has no texture
    pub const FALLBACK_RESOLUTION: u32 = 1024;

    fn allocate<D: RenderDevice>(original: &PartMaterial, device: &mut D) -> Self {
        let (width, height, uv) = match original.map() {
            Some(TextureAttachment::Host(host)) => (host.width, host.height, host.uv.clone()),
            _ => (
                Self::FALLBACK_RESOLUTION,
                Self::FALLBACK_RESOLUTION,
                UvTransform::default(),
            ),
        };
        let surface = Surface::filled(width, height, Rgba::WHITE);
        let device_texture = device.create_texture(&surface);
        log::debug!("allocated {width}x{height} logo canvas for '{}'", original.name());
        Self {
            surface,
            device_texture,
            uv,
        }
    }

    /// Redraw the canvas content and re-upload it through the same texture
    pub fn redraw<D: RenderDevice>(&mut self, artwork: &LogoArtwork, device: &mut D) {
        draw_artwork(&mut self.surface, artwork);
        device.update_texture(self.device_texture, &self.surface);
    }

    /// The device texture this canvas uploads through, stable for life
    pub fn device_texture(&self) -> DeviceTextureId {
        self.device_texture
    }

    /// UV transform copied from the original texture
    pub fn uv(&self) -> &UvTransform {
        &self.uv
    }

    /// Canvas dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.surface.width(), self.surface.height())
    }

    /// Fingerprint of the current canvas content
    pub fn content_hash(&self) -> u64 {
        self.surface.content_hash()
    }
}

/// Session-wide owner of logo canvases and their update timers
#[derive(Debug)]
pub struct LogoBank {
    canvases: HashMap<String, LogoCanvas>,
    artwork: LogoArtwork,
    redraw: Debounce,
    restore: Debounce,
}

impl Default for LogoBank {
    fn default() -> Self {
        Self::new()
    }
}

impl LogoBank {
    /// Settle delay for a burst of recolor/decal requests
    pub const REDRAW_DEBOUNCE: Duration = Duration::from_millis(50);

    /// Delay before verifying the logo attachment after unrelated updates
    pub const RESTORE_DELAY: Duration = Duration::from_millis(100);

    /// Create an empty bank with default artwork
    pub fn new() -> Self {
        Self {
            canvases: HashMap::new(),
            artwork: LogoArtwork::default(),
            redraw: Debounce::new(Self::REDRAW_DEBOUNCE),
            restore: Debounce::new(Self::RESTORE_DELAY),
        }
    }

    /// Current artwork
    pub fn artwork(&self) -> &LogoArtwork {
        &self.artwork
    }

    /// Replace the artwork and schedule a debounced redraw
    ///
    /// Rapid successive calls coalesce; only the last artwork in a burst is
    /// drawn.
    pub fn set_artwork(&mut self, artwork: LogoArtwork, now: f64) {
        self.artwork = artwork;
        self.redraw.trigger(now);
    }

    /// Get or create the persistent canvas for a logo part
    ///
    /// On first encounter the canvas is allocated, drawn with the current
    /// artwork, and uploaded. Later calls return the existing canvas.
    pub fn ensure_canvas<D: RenderDevice>(
        &mut self,
        part_name: &str,
        original: &PartMaterial,
        device: &mut D,
    ) -> DeviceTextureId {
        if let Some(canvas) = self.canvases.get(part_name) {
            return canvas.device_texture();
        }
        let mut canvas = LogoCanvas::allocate(original, device);
        canvas.redraw(&self.artwork, device);
        let id = canvas.device_texture();
        self.canvases.insert(part_name.to_string(), canvas);
        id
    }

    /// Canvas for a part, if one exists
    pub fn canvas(&self, part_name: &str) -> Option<&LogoCanvas> {
        self.canvases.get(part_name)
    }

    /// Number of canvases allocated so far
    pub fn canvas_count(&self) -> usize {
        self.canvases.len()
    }

    /// Note that an unrelated material update ran, scheduling a restore check
    pub fn note_unrelated_update(&mut self, now: f64) {
        self.restore.trigger(now);
    }

    /// Whether the debounced redraw is due this tick
    pub fn poll_redraw(&mut self, now: f64) -> bool {
        self.redraw.poll(now)
    }

    /// Whether the restore check is due this tick
    pub fn poll_restore(&mut self, now: f64) -> bool {
        self.restore.poll(now)
    }

    /// Redraw every canvas with the current artwork
    pub fn redraw_all<D: RenderDevice>(&mut self, device: &mut D) {
        for (name, canvas) in &mut self.canvases {
            canvas.redraw(&self.artwork, device);
            log::trace!("redrew logo canvas for '{name}'");
        }
    }

    /// Redraw a single canvas with the current artwork
    pub fn redraw_one<D: RenderDevice>(&mut self, part_name: &str, device: &mut D) {
        if let Some(canvas) = self.canvases.get_mut(part_name) {
            canvas.redraw(&self.artwork, device);
        }
    }

    /// Destroy every canvas texture and clear pending timers
    pub fn teardown<D: RenderDevice>(&mut self, device: &mut D) {
        self.redraw.cancel();
        self.restore.cancel();
        for (name, canvas) in self.canvases.drain() {
            device.destroy_texture(canvas.device_texture());
            log::debug!("disposed logo canvas for '{name}'");
        }
    }
}

/// Draw the three-zone roundel plus optional clipped decal
fn draw_artwork(surface: &mut Surface, artwork: &LogoArtwork) {
    surface.fill(Rgba::WHITE);

    let (w, h) = (surface.width(), surface.height());
    let short_edge = w.min(h) as f32;
    let center = Vec2::new(w as f32 / 2.0, h as f32 / 2.0);
    let outer = RING_OUTER * short_edge;
    let inner = RING_INNER * short_edge;

    for y in 0..h {
        for x in 0..w {
            let d = (Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center).norm();
            if d <= inner {
                surface.set_pixel(x, y, artwork.secondary);
            } else if d <= outer {
                surface.set_pixel(x, y, artwork.primary);
            }
        }
    }

    if let Some(decal) = &artwork.decal {
        clip_decal(surface, decal, center, DECAL_ZONE * short_edge);
    }

    let anchors: Vec<Vec2> = CHEVRON_ANCHORS
        .iter()
        .map(|(x, y)| center + Vec2::new(x * short_edge, y * short_edge))
        .collect();
    Blob::through_anchors(&anchors).fill(surface, artwork.accent, Blend::Normal);
}

/// Composite a decal into a circular zone, nearest-neighbor scaled
fn clip_decal(surface: &mut Surface, decal: &Surface, center: Vec2, radius: f32) {
    if decal.width() == 0 || decal.height() == 0 {
        return;
    }
    let side = radius * 2.0;
    let origin = center - Vec2::new(radius, radius);
    let y_range = (origin.y.max(0.0) as u32)..((origin.y + side).min(surface.height() as f32) as u32);
    for y in y_range {
        for x in (origin.x.max(0.0) as u32)..((origin.x + side).min(surface.width() as f32) as u32) {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            if (p - center).norm() > radius {
                continue;
            }
            let u = ((p.x - origin.x) / side).clamp(0.0, 1.0);
            let v = ((p.y - origin.y) / side).clamp(0.0, 1.0);
            let sx = ((u * decal.width() as f32) as i64).min(i64::from(decal.width()) - 1);
            let sy = ((v * decal.height() as f32) as i64).min(i64::from(decal.height()) - 1);
            surface.blend_pixel(x, y, decal.pixel(sx, sy), Blend::Normal);
        }
    }
}
