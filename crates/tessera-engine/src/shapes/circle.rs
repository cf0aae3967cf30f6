use std::f32::consts::TAU;

use crate::coords::Vec2;
use crate::paint::Color;

use super::FillMode;

pub const DEFAULT_CIRCLE_SEGMENTS: u32 = 32;
pub const MIN_CIRCLE_SEGMENTS: u32 = 3;

/// Circle approximated by `segments` perimeter samples.
///
/// Filled circles are a triangle fan around a center vertex (`segments + 1`
/// vertices). Outlined circles emit only the perimeter samples (`segments`
/// vertices) joined by line segments, so the vertex layout differs by fill
/// mode.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
    pub fill: FillMode,
    segments: u32,
}

impl Circle {
    #[inline]
    pub fn new(center: Vec2, radius: f32, color: Color) -> Self {
        Self {
            center,
            radius,
            color,
            fill: FillMode::Filled,
            segments: DEFAULT_CIRCLE_SEGMENTS,
        }
    }

    /// Segment counts below [`MIN_CIRCLE_SEGMENTS`] are raised to it.
    #[inline]
    pub fn with_segments(mut self, segments: u32) -> Self {
        self.segments = segments.max(MIN_CIRCLE_SEGMENTS);
        self
    }

    #[inline]
    pub fn with_fill(mut self, fill: FillMode) -> Self {
        self.fill = fill;
        self
    }

    #[inline]
    pub fn outlined(self) -> Self {
        self.with_fill(FillMode::Outlined)
    }

    #[inline]
    pub fn segments(&self) -> u32 {
        self.segments
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        let s = self.segments as usize;
        match self.fill {
            FillMode::Filled => s + 1,
            FillMode::Outlined => s,
        }
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        let s = self.segments as usize;
        match self.fill {
            FillMode::Filled => 3 * s,
            FillMode::Outlined => 2 * s,
        }
    }

    fn perimeter(&self) -> impl Iterator<Item = Vec2> + '_ {
        let n = self.segments;
        (0..n).map(move |i| self.center.polar_offset(self.radius, i as f32 * TAU / n as f32))
    }

    pub fn write_vertices(&self, out: &mut Vec<Vec2>) {
        if self.fill.is_filled() {
            out.push(self.center);
        }
        out.extend(self.perimeter());
    }

    pub fn write_indices(&self, start: u32, out: &mut Vec<u32>) {
        let n = self.segments;
        match self.fill {
            FillMode::Filled => {
                // Perimeter vertex i sits at start + 1 + i; the last triangle
                // closes the fan back onto the first perimeter vertex.
                for i in 0..n {
                    out.extend([start, start + 1 + i, start + 1 + (i + 1) % n]);
                }
            }
            FillMode::Outlined => {
                for i in 0..n {
                    out.extend([start + i, start + (i + 1) % n]);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(segments: u32) -> Circle {
        Circle::new(Vec2::new(50.0, 50.0), 10.0, Color::WHITE).with_segments(segments)
    }

    #[test]
    fn filled_counts_follow_segment_count() {
        for s in [3, 8, 32, 100] {
            let c = circle(s);
            let mut v = Vec::new();
            let mut i = Vec::new();
            c.write_vertices(&mut v);
            c.write_indices(0, &mut i);
            assert_eq!(v.len(), s as usize + 1);
            assert_eq!(i.len(), 3 * s as usize);
            assert!(i.iter().all(|&idx| (idx as usize) < v.len()));
        }
    }

    #[test]
    fn filled_fan_closes_on_first_perimeter_vertex() {
        let mut i = Vec::new();
        circle(4).write_indices(10, &mut i);
        assert_eq!(&i[..3], &[10, 11, 12]);
        assert_eq!(&i[9..], &[10, 14, 11]);
    }

    #[test]
    fn outline_has_no_center_and_wraps() {
        let c = circle(5).outlined();
        let mut v = Vec::new();
        let mut i = Vec::new();
        c.write_vertices(&mut v);
        c.write_indices(0, &mut i);
        assert_eq!(v.len(), 5);
        assert_eq!(i.len(), 10);
        assert_eq!(&i[8..], &[4, 0]);
        assert!(v.iter().all(|p| (p.distance(c.center) - 10.0).abs() < 1e-4));
    }

    #[test]
    fn perimeter_starts_at_angle_zero() {
        let mut v = Vec::new();
        circle(4).write_vertices(&mut v);
        assert_eq!(v[0], Vec2::new(50.0, 50.0));
        assert!((v[1].x - 60.0).abs() < 1e-4 && (v[1].y - 50.0).abs() < 1e-4);
    }

    #[test]
    fn tiny_segment_counts_are_raised() {
        assert_eq!(circle(0).segments(), MIN_CIRCLE_SEGMENTS);
    }
}
