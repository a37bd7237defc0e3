//! Stochastic splatter / speckle synthesis
//!
//! Scatters near-circular blob dots over a background. Dot radii follow a
//! right-skewed distribution (mostly tiny dots, rare large ones), opacity is
//! high but varied, and in dual mode dots alternate between two colors with
//! a 60/40 weighting. A fraction of dots carry a faint dark offset shadow
//! for depth. The PRNG is seeded from the cache key, so a given parameter
//! tuple always produces the same pattern.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::foundation::color::Rgba;
use crate::foundation::math::Vec2;
use crate::raster::{Blend, Blob, Surface};
use crate::synthesis::key::PartZone;
use crate::synthesis::{SynthesisError, MAX_SPLATTER_DENSITY};

/// Density and radius constants for one zone/color-mode combination
#[derive(Debug, Clone, Copy)]
struct SplatterProfile {
    /// Base dot density before user scaling
    base_density: f32,
    /// Extra dot multiplier applied in this mode
    multiplier: f32,
    /// Smallest dot radius at a 1024px texture
    min_radius: f32,
    /// Largest dot radius at a 1024px texture
    max_radius: f32,
}

const UPPER_SINGLE: SplatterProfile = SplatterProfile {
    base_density: 12.0,
    multiplier: 1.0,
    min_radius: 2.0,
    max_radius: 30.0,
};

const UPPER_DUAL: SplatterProfile = SplatterProfile {
    base_density: 12.0,
    multiplier: 1.4,
    min_radius: 2.0,
    max_radius: 24.0,
};

const SOLE_SINGLE: SplatterProfile = SplatterProfile {
    base_density: 8.0,
    multiplier: 1.0,
    min_radius: 1.5,
    max_radius: 22.0,
};

const SOLE_DUAL: SplatterProfile = SplatterProfile {
    base_density: 8.0,
    multiplier: 1.25,
    min_radius: 1.5,
    max_radius: 18.0,
};

/// Dot alpha range
const DOT_ALPHA: (u8, u8) = (178, 255);

/// Probability that a dot is drawn in the primary color in dual mode
const PRIMARY_WEIGHT: f64 = 0.6;

/// Probability that a dot carries an offset shadow duplicate
const SHADOW_CHANCE: f64 = 0.3;

/// Shadow offset at a 1024px texture
const SHADOW_OFFSET: (f32, f32) = (2.5, 3.5);

/// Shadow opacity
const SHADOW_ALPHA: u8 = 45;

/// Outline irregularity of dots (near-circular)
const DOT_IRREGULARITY: f32 = 0.12;

fn profile(zone: PartZone, dual: bool) -> SplatterProfile {
    match (zone, dual) {
        (PartZone::Upper, false) => UPPER_SINGLE,
        (PartZone::Upper, true) => UPPER_DUAL,
        (PartZone::Sole, false) => SOLE_SINGLE,
        (PartZone::Sole, true) => SOLE_DUAL,
    }
}

/// Number of dots for a zone, color mode, and user density
///
/// `floor(base_density x density x multiplier / 10)`, so dot count scales
/// linearly with the user's density setting.
pub fn dot_count(zone: PartZone, dual: bool, density: u16) -> usize {
    let p = profile(zone, dual);
    (p.base_density * f32::from(density) * p.multiplier / 10.0).floor() as usize
}

/// Render a splatter texture
///
/// `background` and the dot colors must already be lighting-softened by the
/// caller. `secondary` being present selects dual mode.
pub fn render(
    size: u32,
    zone: PartZone,
    background: Rgba,
    primary: Rgba,
    secondary: Option<Rgba>,
    density: u16,
    seed: u64,
) -> Result<Surface, SynthesisError> {
    if density == 0 || density > MAX_SPLATTER_DENSITY {
        return Err(SynthesisError::DensityOutOfRange(density));
    }

    let dual = secondary.is_some();
    let p = profile(zone, dual);
    let count = dot_count(zone, dual, density);
    let scale = size as f32 / 1024.0;

    let mut surface = Surface::filled(size, size, background);
    let mut rng = StdRng::seed_from_u64(seed);

    for _ in 0..count {
        let center = Vec2::new(
            rng.gen_range(0.0..size as f32),
            rng.gen_range(0.0..size as f32),
        );

        // Right-skewed radius: u^4 keeps most dots tiny with rare large ones
        let u: f32 = rng.gen_range(0.0..1.0);
        let radius = (p.min_radius + (p.max_radius - p.min_radius) * u.powi(4)) * scale;

        let alpha = rng.gen_range(DOT_ALPHA.0..=DOT_ALPHA.1);
        let color = match secondary {
            Some(secondary) if !rng.gen_bool(PRIMARY_WEIGHT) => secondary,
            _ => primary,
        }
        .with_alpha(alpha);

        let dot = Blob::organic(center, radius.max(0.75), DOT_IRREGULARITY, &mut rng);

        if rng.gen_bool(SHADOW_CHANCE) {
            let offset = Vec2::new(SHADOW_OFFSET.0 * scale, SHADOW_OFFSET.1 * scale);
            Blob::organic(center + offset, radius.max(0.75), DOT_IRREGULARITY, &mut rng).fill(
                &mut surface,
                Rgba::BLACK.with_alpha(SHADOW_ALPHA),
                Blend::Normal,
            );
        }

        dot.fill(&mut surface, color, Blend::Normal);
    }

    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_count_scales_linearly_with_density() {
        let low = dot_count(PartZone::Upper, false, 100);
        let high = dot_count(PartZone::Upper, false, 1000);
        assert_eq!(high, low * 10);
    }

    #[test]
    fn test_dot_count_formula() {
        // floor(12.0 * 100 * 1.0 / 10) = 120
        assert_eq!(dot_count(PartZone::Upper, false, 100), 120);
        // floor(8.0 * 100 * 1.25 / 10) = 100
        assert_eq!(dot_count(PartZone::Sole, true, 100), 100);
    }

    #[test]
    fn test_dual_mode_uses_more_dots_than_single() {
        assert!(dot_count(PartZone::Upper, true, 200) > dot_count(PartZone::Upper, false, 200));
    }

    #[test]
    fn test_density_out_of_range_is_rejected() {
        let err = render(
            64,
            PartZone::Upper,
            Rgba::WHITE,
            Rgba::BLACK,
            None,
            0,
            1,
        );
        assert!(matches!(err, Err(SynthesisError::DensityOutOfRange(0))));

        let err = render(
            64,
            PartZone::Upper,
            Rgba::WHITE,
            Rgba::BLACK,
            None,
            MAX_SPLATTER_DENSITY + 1,
            1,
        );
        assert!(matches!(err, Err(SynthesisError::DensityOutOfRange(_))));
    }

    #[test]
    fn test_same_seed_reproduces_pixels() {
        let a = render(
            64,
            PartZone::Sole,
            Rgba::rgb(20, 20, 20),
            Rgba::rgb(230, 230, 40),
            Some(Rgba::rgb(40, 230, 230)),
            300,
            99,
        )
        .unwrap();
        let b = render(
            64,
            PartZone::Sole,
            Rgba::rgb(20, 20, 20),
            Rgba::rgb(230, 230, 40),
            Some(Rgba::rgb(40, 230, 230)),
            300,
            99,
        )
        .unwrap();
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_splatter_lands_dots_on_background() {
        let background = Rgba::rgb(10, 10, 10);
        let surface = render(
            128,
            PartZone::Upper,
            background,
            Rgba::rgb(240, 240, 240).soften_overbright(),
            None,
            500,
            5,
        )
        .unwrap();

        let mut dotted = 0_u32;
        for y in 0..128_i64 {
            for x in 0..128_i64 {
                if surface.pixel(x, y) != background {
                    dotted += 1;
                }
            }
        }
        assert!(dotted > 50, "expected visible dots, got {dotted} pixels");
    }
}
