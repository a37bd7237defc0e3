//! Radial and linear gradient passes
//!
//! Gradients are defined by color stops and composited over an existing
//! surface, in normal or multiply mode. Multiply passes with a dark,
//! partially transparent center are the building block of the sole's
//! inner-shadow shading.

use crate::foundation::color::Rgba;
use crate::foundation::math::Vec2;
use crate::raster::surface::{Blend, Surface};

/// A single color stop along a gradient ramp
#[derive(Debug, Clone, Copy)]
pub struct ColorStop {
    /// Position along the ramp in `[0, 1]`
    pub offset: f32,
    /// Color at this position
    pub color: Rgba,
}

impl ColorStop {
    /// Create a color stop
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Sample a stop ramp at parameter `t`
///
/// Stops must be ordered by offset. Values outside the ramp clamp to the
/// first/last stop.
fn sample_stops(stops: &[ColorStop], t: f32) -> Rgba {
    match stops {
        [] => Rgba::new(0, 0, 0, 0),
        [only] => only.color,
        _ => {
            if t <= stops[0].offset {
                return stops[0].color;
            }
            for pair in stops.windows(2) {
                if t <= pair[1].offset {
                    let span = pair[1].offset - pair[0].offset;
                    let local = if span > f32::EPSILON {
                        (t - pair[0].offset) / span
                    } else {
                        1.0
                    };
                    return pair[0].color.lerp(pair[1].color, local);
                }
            }
            stops[stops.len() - 1].color
        }
    }
}

/// Composite a radial gradient centered at `center` with the given radius
pub fn radial_pass(
    surface: &mut Surface,
    center: Vec2,
    radius: f32,
    stops: &[ColorStop],
    blend: Blend,
) {
    if radius <= 0.0 {
        return;
    }
    for y in 0..surface.height() {
        for x in 0..surface.width() {
            let d = (Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center).norm();
            let color = sample_stops(stops, (d / radius).min(1.0));
            if color.a > 0 {
                surface.blend_pixel(x, y, color, blend);
            }
        }
    }
}

/// Composite a linear gradient running from `from` to `to`
pub fn linear_pass(surface: &mut Surface, from: Vec2, to: Vec2, stops: &[ColorStop], blend: Blend) {
    let axis = to - from;
    let len_sq = axis.norm_squared();
    if len_sq <= f32::EPSILON {
        return;
    }
    for y in 0..surface.height() {
        for x in 0..surface.width() {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - from;
            let t = (p.dot(&axis) / len_sq).clamp(0.0, 1.0);
            let color = sample_stops(stops, t);
            if color.a > 0 {
                surface.blend_pixel(x, y, color, blend);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_ramp_interpolates() {
        let stops = [
            ColorStop::new(0.0, Rgba::BLACK),
            ColorStop::new(1.0, Rgba::WHITE),
        ];
        assert_eq!(sample_stops(&stops, 0.0), Rgba::BLACK);
        assert_eq!(sample_stops(&stops, 1.0), Rgba::WHITE);
        let mid = sample_stops(&stops, 0.5);
        assert!(mid.r > 120 && mid.r < 135);
    }

    #[test]
    fn test_radial_multiply_darkens_center_only() {
        let mut surface = Surface::filled(32, 32, Rgba::rgb(200, 200, 200));
        let stops = [
            ColorStop::new(0.0, Rgba::BLACK.with_alpha(128)),
            ColorStop::new(1.0, Rgba::BLACK.with_alpha(0)),
        ];
        radial_pass(&mut surface, Vec2::new(16.0, 16.0), 10.0, &stops, Blend::Multiply);

        let center = surface.pixel(16, 16);
        let corner = surface.pixel(0, 0);
        assert!(center.r < 130, "center should darken, got {}", center.r);
        assert_eq!(corner, Rgba::rgb(200, 200, 200));
    }

    #[test]
    fn test_linear_pass_direction() {
        let mut surface = Surface::filled(16, 4, Rgba::WHITE);
        let stops = [
            ColorStop::new(0.0, Rgba::BLACK),
            ColorStop::new(1.0, Rgba::WHITE),
        ];
        linear_pass(
            &mut surface,
            Vec2::new(0.0, 0.0),
            Vec2::new(16.0, 0.0),
            &stops,
            Blend::Normal,
        );
        assert!(surface.pixel(0, 1).r < 40);
        assert!(surface.pixel(15, 1).r > 220);
    }

    #[test]
    fn test_zero_radius_is_noop() {
        let mut surface = Surface::filled(4, 4, Rgba::WHITE);
        radial_pass(
            &mut surface,
            Vec2::new(2.0, 2.0),
            0.0,
            &[ColorStop::new(0.0, Rgba::BLACK)],
            Blend::Normal,
        );
        assert_eq!(surface.pixel(2, 2), Rgba::WHITE);
    }
}
