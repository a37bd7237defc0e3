//! Math utilities and types
//!
//! Provides the 2D math types used by raster synthesis.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// Linear interpolation between two scalars
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Remap a value from one range to another, clamped to the target range
pub fn remap_clamped(value: f32, from: (f32, f32), to: (f32, f32)) -> f32 {
    let span = from.1 - from.0;
    if span.abs() < f32::EPSILON {
        return to.0;
    }
    let t = ((value - from.0) / span).clamp(0.0, 1.0);
    lerp(to.0, to.1, t)
}

/// Evaluate a cubic bezier segment at parameter `t`
pub fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}
