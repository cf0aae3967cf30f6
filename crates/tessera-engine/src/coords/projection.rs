use glam::Mat4;

use super::Viewport;

/// Orthographic projection for screen-space 2D drawing.
///
/// Maps logical pixels with a top-left origin and +Y down onto clip space:
/// `(0, 0)` lands on the top-left corner, `(width, height)` on the
/// bottom-right. Depth `-1..1` maps onto wgpu's `0..1` range. Degenerate
/// viewports are clamped to one pixel so the matrix stays invertible.
pub fn ortho_projection(viewport: Viewport) -> Mat4 {
    let w = viewport.width.max(1.0);
    let h = viewport.height.max(1.0);
    Mat4::orthographic_rh(0.0, w, h, 0.0, -1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    fn project(m: Mat4, x: f32, y: f32) -> Vec3 {
        let p = m * Vec4::new(x, y, 0.0, 1.0);
        p.truncate() / p.w
    }

    #[test]
    fn corners_map_to_clip_space() {
        let m = ortho_projection(Viewport::new(1280.0, 720.0));

        let top_left = project(m, 0.0, 0.0);
        assert!((top_left.x + 1.0).abs() < 1e-6);
        assert!((top_left.y - 1.0).abs() < 1e-6);

        let bottom_right = project(m, 1280.0, 720.0);
        assert!((bottom_right.x - 1.0).abs() < 1e-6);
        assert!((bottom_right.y + 1.0).abs() < 1e-6);

        let center = project(m, 640.0, 360.0);
        assert!(center.x.abs() < 1e-6 && center.y.abs() < 1e-6);
    }

    #[test]
    fn z_zero_lands_inside_wgpu_depth_range() {
        let p = project(ortho_projection(Viewport::new(100.0, 100.0)), 50.0, 50.0);
        assert!((0.0..=1.0).contains(&p.z));
    }

    #[test]
    fn degenerate_viewport_is_clamped() {
        let m = ortho_projection(Viewport::new(0.0, 0.0));
        assert!(m.is_finite());
        assert_ne!(m.determinant(), 0.0);
    }
}
