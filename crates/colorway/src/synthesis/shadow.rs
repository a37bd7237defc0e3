//! Baked ground-contact shading for the sole
//!
//! The sole's default finish is its base color with shading drawn in:
//! concentric radial multiply passes centered near the arch, extra radial
//! darkening at heel and toe, and linear edge darkening on the left and
//! right rims. This stands in for real-time ambient occlusion.

use crate::foundation::color::Rgba;
use crate::foundation::math::Vec2;
use crate::raster::gradient::{linear_pass, radial_pass, ColorStop};
use crate::raster::{Blend, Surface};

/// Concentric arch passes: (radius fraction of texture size, shade alpha)
///
/// Radius and opacity both decrease across the passes; the overlap near the
/// arch accumulates into the deepest shading.
const ARCH_PASSES: [(f32, u8); 4] = [(0.72, 56), (0.58, 48), (0.45, 40), (0.33, 33)];

/// Arch center in normalized texture coordinates
const ARCH_CENTER: (f32, f32) = (0.5, 0.58);

/// Fraction of each radial pass that stays unshaded before the rim ramp
const ARCH_CLEAR_STOP: f32 = 0.55;

/// Heel darkening: (center y fraction, radius fraction, alpha)
const HEEL_PASS: (f32, f32, u8) = (0.92, 0.28, 60);

/// Toe darkening: (center y fraction, radius fraction, alpha)
const TOE_PASS: (f32, f32, u8) = (0.08, 0.28, 50);

/// Side edge darkening: (inset fraction, alpha)
const EDGE_PASS: (f32, u8) = (0.16, 55);

/// Render the base color with baked contact shading
pub fn render(size: u32, color: Rgba) -> Surface {
    let mut surface = Surface::filled(size, size, color);
    let extent = size as f32;
    let arch = Vec2::new(ARCH_CENTER.0 * extent, ARCH_CENTER.1 * extent);

    for (radius_fraction, alpha) in ARCH_PASSES {
        let stops = [
            ColorStop::new(0.0, Rgba::BLACK.with_alpha(0)),
            ColorStop::new(ARCH_CLEAR_STOP, Rgba::BLACK.with_alpha(0)),
            ColorStop::new(1.0, Rgba::BLACK.with_alpha(alpha)),
        ];
        radial_pass(
            &mut surface,
            arch,
            radius_fraction * extent,
            &stops,
            Blend::Multiply,
        );
    }

    for (center_y, radius_fraction, alpha) in [HEEL_PASS, TOE_PASS] {
        let stops = [
            ColorStop::new(0.0, Rgba::BLACK.with_alpha(alpha)),
            ColorStop::new(1.0, Rgba::BLACK.with_alpha(0)),
        ];
        radial_pass(
            &mut surface,
            Vec2::new(0.5 * extent, center_y * extent),
            radius_fraction * extent,
            &stops,
            Blend::Multiply,
        );
    }

    let (inset, alpha) = EDGE_PASS;
    let edge_stops = [
        ColorStop::new(0.0, Rgba::BLACK.with_alpha(alpha)),
        ColorStop::new(1.0, Rgba::BLACK.with_alpha(0)),
    ];
    linear_pass(
        &mut surface,
        Vec2::new(0.0, 0.0),
        Vec2::new(inset * extent, 0.0),
        &edge_stops,
        Blend::Multiply,
    );
    linear_pass(
        &mut surface,
        Vec2::new(extent, 0.0),
        Vec2::new(extent - inset * extent, 0.0),
        &edge_stops,
        Blend::Multiply,
    );

    surface
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_darker_than_center_interior() {
        let surface = render(64, Rgba::rgb(200, 200, 200));
        let interior = surface.pixel(32, 24);
        let left_edge = surface.pixel(1, 24);
        let heel = surface.pixel(32, 61);
        assert!(left_edge.r < interior.r);
        assert!(heel.r < interior.r);
    }

    #[test]
    fn test_shading_is_deterministic() {
        let a = render(32, Rgba::rgb(150, 120, 90));
        let b = render(32, Rgba::rgb(150, 120, 90));
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_preserves_hue_of_base() {
        // Multiply passes only darken; a pure red base stays pure red
        let surface = render(32, Rgba::rgb(180, 0, 0));
        for y in 0..32_i64 {
            for x in 0..32_i64 {
                let p = surface.pixel(x, y);
                assert_eq!(p.g, 0);
                assert_eq!(p.b, 0);
            }
        }
    }
}
