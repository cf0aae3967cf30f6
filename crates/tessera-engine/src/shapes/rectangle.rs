use crate::coords::Vec2;
use crate::paint::Color;

use super::FillMode;

/// Axis-aligned rectangle anchored at its top-left corner (logical pixels).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rectangle {
    pub position: Vec2,
    pub size: Vec2,
    pub color: Color,
    pub fill: FillMode,
}

impl Rectangle {
    pub const VERTEX_COUNT: usize = 4;

    const FILLED_PATTERN: [u32; 6] = [0, 1, 2, 0, 2, 3];
    const OUTLINE_PATTERN: [u32; 8] = [0, 1, 1, 2, 2, 3, 3, 0];

    #[inline]
    pub fn new(position: Vec2, size: Vec2, color: Color) -> Self {
        Self {
            position,
            size,
            color,
            fill: FillMode::Filled,
        }
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
    pub fn vertex_count(&self) -> usize {
        Self::VERTEX_COUNT
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        match self.fill {
            FillMode::Filled => Self::FILLED_PATTERN.len(),
            FillMode::Outlined => Self::OUTLINE_PATTERN.len(),
        }
    }

    /// Corners in winding order: origin, +x, +x+y, +y.
    pub fn corners(&self) -> [Vec2; 4] {
        quad_corners(self.position, self.size)
    }

    pub fn write_vertices(&self, out: &mut Vec<Vec2>) {
        out.extend_from_slice(&self.corners());
    }

    /// Two triangles when filled, four edge segments when outlined.
    pub fn write_indices(&self, start: u32, out: &mut Vec<u32>) {
        let pattern: &[u32] = match self.fill {
            FillMode::Filled => &Self::FILLED_PATTERN,
            FillMode::Outlined => &Self::OUTLINE_PATTERN,
        };
        out.extend(pattern.iter().map(|i| start + i));
    }
}

pub(super) fn quad_corners(position: Vec2, size: Vec2) -> [Vec2; 4] {
    [
        position,
        Vec2::new(position.x + size.x, position.y),
        Vec2::new(position.x + size.x, position.y + size.y),
        Vec2::new(position.x, position.y + size.y),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rectangle {
        Rectangle::new(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0), Color::WHITE)
    }

    #[test]
    fn corners_bake_in_position() {
        let mut v = Vec::new();
        rect().write_vertices(&mut v);
        assert_eq!(
            v,
            vec![
                Vec2::new(10.0, 20.0),
                Vec2::new(40.0, 20.0),
                Vec2::new(40.0, 60.0),
                Vec2::new(10.0, 60.0),
            ]
        );
    }

    #[test]
    fn filled_indices_are_relative_to_start() {
        let mut i = Vec::new();
        rect().write_indices(5, &mut i);
        assert_eq!(i, vec![5, 6, 7, 5, 7, 8]);
    }

    #[test]
    fn outlined_indices_walk_the_edges() {
        let mut i = Vec::new();
        rect().outlined().write_indices(0, &mut i);
        assert_eq!(i, vec![0, 1, 1, 2, 2, 3, 3, 0]);
        assert_eq!(rect().outlined().index_count(), 8);
    }
}
