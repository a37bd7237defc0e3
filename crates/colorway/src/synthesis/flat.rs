//! Flat base-color fill

use crate::foundation::color::Rgba;
use crate::raster::Surface;

/// Render a solid fill of the (already softened) base color
pub fn render(size: u32, color: Rgba) -> Surface {
    Surface::filled(size, size, color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_fill() {
        let surface = render(16, Rgba::rgb(12, 34, 56));
        assert_eq!(surface.pixel(0, 0), Rgba::rgb(12, 34, 56));
        assert_eq!(surface.pixel(15, 15), Rgba::rgb(12, 34, 56));
    }
}
