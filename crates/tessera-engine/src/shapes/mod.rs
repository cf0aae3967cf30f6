//! Geometry providers.
//!
//! Each shape produces its vertices with the position already baked in and
//! an index pattern relative to a caller-supplied start index. Shapes know
//! nothing about other primitives already sitting in a batch.
//!
//! Extending:
//! - add a shape module here
//! - add a variant to [`Shape`]
//! - teach `render::batch::Batcher` how to tag its vertices

mod circle;
mod fill;
mod rectangle;
mod sprite;

pub use circle::{Circle, DEFAULT_CIRCLE_SEGMENTS, MIN_CIRCLE_SEGMENTS};
pub use fill::FillMode;
pub use rectangle::Rectangle;
pub use sprite::{Sprite, SPRITE_UVS};

use crate::coords::Vec2;
use crate::paint::Color;
use crate::render::resources::TextureHandle;

/// Closed set of drawable primitives.
///
/// `T` is the texture handle carried by sprites; the GPU renderer uses
/// [`TextureHandle`], headless code can use plain texture ids.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape<T = TextureHandle> {
    Rectangle(Rectangle),
    Circle(Circle),
    Sprite(Sprite<T>),
}

impl<T> Shape<T> {
    #[inline]
    pub fn fill(&self) -> FillMode {
        match self {
            Shape::Rectangle(r) => r.fill,
            Shape::Circle(c) => c.fill,
            Shape::Sprite(_) => FillMode::Filled,
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        match self {
            Shape::Rectangle(r) => r.color,
            Shape::Circle(c) => c.color,
            Shape::Sprite(s) => s.color,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        match self {
            Shape::Rectangle(r) => r.vertex_count(),
            Shape::Circle(c) => c.vertex_count(),
            Shape::Sprite(s) => s.vertex_count(),
        }
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        match self {
            Shape::Rectangle(r) => r.index_count(),
            Shape::Circle(c) => c.index_count(),
            Shape::Sprite(s) => s.index_count(),
        }
    }

    /// Appends this shape's vertices to `out`.
    pub fn write_vertices(&self, out: &mut Vec<Vec2>) {
        match self {
            Shape::Rectangle(r) => r.write_vertices(out),
            Shape::Circle(c) => c.write_vertices(out),
            Shape::Sprite(s) => s.write_vertices(out),
        }
    }

    /// Appends this shape's indices, offset by `start`, to `out`.
    pub fn write_indices(&self, start: u32, out: &mut Vec<u32>) {
        match self {
            Shape::Rectangle(r) => r.write_indices(start, out),
            Shape::Circle(c) => c.write_indices(start, out),
            Shape::Sprite(s) => s.write_indices(start, out),
        }
    }

    pub fn vertices(&self) -> Vec<Vec2> {
        let mut out = Vec::with_capacity(self.vertex_count());
        self.write_vertices(&mut out);
        out
    }

    pub fn indices(&self, start: u32) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.index_count());
        self.write_indices(start, &mut out);
        out
    }
}

impl<T> From<Rectangle> for Shape<T> {
    fn from(r: Rectangle) -> Self {
        Shape::Rectangle(r)
    }
}

impl<T> From<Circle> for Shape<T> {
    fn from(c: Circle) -> Self {
        Shape::Circle(c)
    }
}

impl<T> From<Sprite<T>> for Shape<T> {
    fn from(s: Sprite<T>) -> Self {
        Shape::Sprite(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::resources::TextureId;

    #[test]
    fn dispatch_matches_variant_geometry() {
        let rect: Shape<TextureId> =
            Rectangle::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0), Color::WHITE).into();
        assert_eq!(rect.indices(5), vec![5, 6, 7, 5, 7, 8]);

        let ring: Shape<TextureId> =
            Circle::new(Vec2::zero(), 4.0, Color::WHITE).with_segments(6).outlined().into();
        assert_eq!(ring.fill(), FillMode::Outlined);
        assert_eq!((ring.vertex_count(), ring.index_count()), (6, 12));

        let sprite: Shape<TextureId> =
            Sprite::new(TextureId::from_raw(1), Vec2::zero(), Vec2::new(8.0, 8.0)).into();
        assert_eq!(sprite.fill(), FillMode::Filled);
        assert_eq!(sprite.vertices().len(), 4);
    }
}
