//! Brush-stroke gradient paint
//!
//! Fills the surface with the sweep's start color, then lays down a field of
//! organic blob strokes whose color is interpolated toward the end color as
//! the sweep progresses: diagonally across the upper, top to bottom on the
//! sole. Stroke size and opacity are randomized per stroke.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::foundation::color::Rgba;
use crate::foundation::math::Vec2;
use crate::raster::{Blend, Blob, Surface};
use crate::synthesis::key::PartZone;

/// Strokes in an upper sweep
const UPPER_STROKES: usize = 150;

/// Sole sweeps are shorter, so fewer strokes cover them
const SOLE_STROKES: usize = 100;

/// Stroke radius range as a fraction of texture size
const STROKE_RADIUS: (f32, f32) = (0.035, 0.10);

/// Stroke alpha range
const STROKE_ALPHA: (u8, u8) = (90, 200);

/// Perpendicular jitter as a fraction of texture size
const SWEEP_JITTER: f32 = 0.18;

/// Outline irregularity of a stroke blob
const STROKE_IRREGULARITY: f32 = 0.45;

/// Number of strokes used for a zone's sweep
pub fn stroke_count(zone: PartZone) -> usize {
    match zone {
        PartZone::Upper => UPPER_STROKES,
        PartZone::Sole => SOLE_STROKES,
    }
}

/// Render a brush-stroke gradient between two (already softened) colors
pub fn render(size: u32, zone: PartZone, start: Rgba, end: Rgba, seed: u64) -> Surface {
    let mut surface = Surface::filled(size, size, start);
    let mut rng = StdRng::seed_from_u64(seed);
    let extent = size as f32;
    let strokes = stroke_count(zone);

    for index in 0..strokes {
        let t = index as f32 / (strokes - 1) as f32;
        let center = stroke_center(zone, t, extent, &mut rng);
        let radius = extent * rng.gen_range(STROKE_RADIUS.0..STROKE_RADIUS.1);
        let alpha = rng.gen_range(STROKE_ALPHA.0..=STROKE_ALPHA.1);
        let color = start.lerp(end, t).with_alpha(alpha);

        Blob::organic(center, radius, STROKE_IRREGULARITY, &mut rng).fill(
            &mut surface,
            color,
            Blend::Normal,
        );
    }

    surface
}

fn stroke_center(zone: PartZone, t: f32, extent: f32, rng: &mut StdRng) -> Vec2 {
    let jitter = SWEEP_JITTER * extent;
    match zone {
        // Diagonal sweep corner to corner
        PartZone::Upper => Vec2::new(
            t * extent + rng.gen_range(-jitter..jitter),
            t * extent + rng.gen_range(-jitter..jitter),
        ),
        // Vertical sweep, free horizontal placement
        PartZone::Sole => Vec2::new(
            rng.gen_range(0.0..extent),
            t * extent + rng.gen_range(-jitter..jitter),
        ),
    }
}
