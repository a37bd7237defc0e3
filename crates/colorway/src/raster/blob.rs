//! Organic bezier blob outlines
//!
//! Splatter dots and gradient brush strokes are drawn as closed, slightly
//! irregular blobs: anchor points scattered around a circle, joined by smooth
//! cubic bezier segments, rasterized with an even-odd scanline fill.

use std::f32::consts::TAU;

use rand::Rng;

use crate::foundation::color::Rgba;
use crate::foundation::math::{cubic_bezier, Vec2};
use crate::raster::surface::{Blend, Surface};

/// Samples taken along each bezier segment of the outline
const SEGMENT_SAMPLES: usize = 8;

/// Closed blob outline ready for rasterization
#[derive(Debug, Clone)]
pub struct Blob {
    outline: Vec<Vec2>,
}

impl Blob {
    /// Generate a near-circular organic blob
    ///
    /// `irregularity` in `[0, 1]` controls how far anchor radii may wander
    /// from `radius`; 0 produces an almost perfect circle.
    pub fn organic<R: Rng>(center: Vec2, radius: f32, irregularity: f32, rng: &mut R) -> Self {
        let anchor_count = 8;
        let mut anchors = Vec::with_capacity(anchor_count);
        for i in 0..anchor_count {
            let base_angle = i as f32 / anchor_count as f32 * TAU;
            let angle = base_angle + rng.gen_range(-0.3..0.3) * TAU / anchor_count as f32;
            let r = radius * (1.0 + irregularity * rng.gen_range(-1.0..1.0_f32));
            anchors.push(center + Vec2::new(angle.cos(), angle.sin()) * r.max(0.5));
        }
        Self::through_anchors(&anchors)
    }

    /// Build a smooth closed outline through the given anchor points
    ///
    /// Control points are derived Catmull-Rom style from neighboring anchors,
    /// so the curve passes through every anchor without cusps.
    pub fn through_anchors(anchors: &[Vec2]) -> Self {
        let n = anchors.len();
        let mut outline = Vec::with_capacity(n * SEGMENT_SAMPLES);
        for i in 0..n {
            let prev = anchors[(i + n - 1) % n];
            let p0 = anchors[i];
            let p3 = anchors[(i + 1) % n];
            let next = anchors[(i + 2) % n];
            let c1 = p0 + (p3 - prev) / 6.0;
            let c2 = p3 - (next - p0) / 6.0;
            for step in 0..SEGMENT_SAMPLES {
                let t = step as f32 / SEGMENT_SAMPLES as f32;
                outline.push(cubic_bezier(p0, c1, c2, p3, t));
            }
        }
        Self { outline }
    }

    /// Rasterize into a surface with the given color and blend mode
    pub fn fill(&self, surface: &mut Surface, color: Rgba, blend: Blend) {
        if self.outline.len() < 3 {
            return;
        }

        let (min_y, max_y) = self
            .outline
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        let y_start = (min_y.floor().max(0.0)) as u32;
        let y_end = (max_y.ceil().min(surface.height() as f32)) as u32;

        let mut crossings: Vec<f32> = Vec::with_capacity(16);
        for y in y_start..y_end {
            let scan_y = y as f32 + 0.5;
            crossings.clear();
            for (i, a) in self.outline.iter().enumerate() {
                let b = &self.outline[(i + 1) % self.outline.len()];
                if (a.y <= scan_y) != (b.y <= scan_y) {
                    let t = (scan_y - a.y) / (b.y - a.y);
                    crossings.push(a.x + (b.x - a.x) * t);
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));

            for pair in crossings.chunks_exact(2) {
                let x_start = (pair[0].round().max(0.0)) as u32;
                let x_end = (pair[1].round().min(surface.width() as f32)) as u32;
                for x in x_start..x_end {
                    surface.blend_pixel(x, y, color, blend);
                }
            }
        }
    }

    /// Number of points in the sampled outline
    pub fn outline_len(&self) -> usize {
        self.outline.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_organic_blob_covers_center() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut surface = Surface::filled(64, 64, Rgba::WHITE);
        let blob = Blob::organic(Vec2::new(32.0, 32.0), 12.0, 0.2, &mut rng);
        blob.fill(&mut surface, Rgba::rgb(200, 0, 0), Blend::Normal);

        assert_eq!(surface.pixel(32, 32), Rgba::rgb(200, 0, 0));
        // Far corner stays untouched
        assert_eq!(surface.pixel(2, 2), Rgba::WHITE);
    }

    #[test]
    fn test_blob_stays_near_requested_radius() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut surface = Surface::filled(64, 64, Rgba::WHITE);
        let blob = Blob::organic(Vec2::new(32.0, 32.0), 8.0, 0.1, &mut rng);
        blob.fill(&mut surface, Rgba::BLACK, Blend::Normal);

        // Nothing lands further than ~2x the radius from the center
        for y in 0..64_i64 {
            for x in 0..64_i64 {
                if surface.pixel(x, y) == Rgba::BLACK {
                    let dx = x as f32 - 32.0;
                    let dy = y as f32 - 32.0;
                    assert!((dx * dx + dy * dy).sqrt() < 16.0);
                }
            }
        }
    }

    #[test]
    fn test_degenerate_outline_is_ignored() {
        let mut surface = Surface::filled(8, 8, Rgba::WHITE);
        let blob = Blob::through_anchors(&[]);
        blob.fill(&mut surface, Rgba::BLACK, Blend::Normal);
        assert_eq!(surface.pixel(4, 4), Rgba::WHITE);
    }

    #[test]
    fn test_outline_sample_density() {
        let anchors = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        let blob = Blob::through_anchors(&anchors);
        assert_eq!(blob.outline_len(), anchors.len() * 8);
    }
}
