/// Drawable area in logical pixels; the projection's `right` and `bottom`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Converts a surface size in physical pixels. A non-positive or
    /// non-finite `scale_factor` is treated as 1.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
        Self::new((width as f64 / scale) as f32, (height as f64 / scale) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidpi_surface_maps_to_logical_pixels() {
        assert_eq!(Viewport::from_physical(2560, 1440, 2.0), Viewport::new(1280.0, 720.0));
        assert_eq!(Viewport::from_physical(800, 600, 1.0), Viewport::new(800.0, 600.0));
    }

    #[test]
    fn bogus_scale_factor_falls_back_to_one() {
        assert_eq!(Viewport::from_physical(640, 480, 0.0), Viewport::new(640.0, 480.0));
        assert_eq!(Viewport::from_physical(640, 480, f64::NAN), Viewport::new(640.0, 480.0));
    }
}
