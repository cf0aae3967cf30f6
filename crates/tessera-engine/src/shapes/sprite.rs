use crate::coords::Vec2;
use crate::paint::Color;
use crate::render::resources::TextureHandle;

use super::rectangle::quad_corners;

/// Texture coordinates for the four sprite corners, in vertex order
/// (bottom-left, bottom-right, top-right, top-left of the texture image).
pub const SPRITE_UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

/// Textured quad. Always filled.
///
/// The texture is shared with the caller; the renderer only keeps a clone of
/// the handle in its slot list until the next flush.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite<T = TextureHandle> {
    pub texture: T,
    pub position: Vec2,
    pub size: Vec2,
    /// Multiplied with the texel color.
    pub color: Color,
}

impl<T> Sprite<T> {
    pub const VERTEX_COUNT: usize = 4;
    pub const INDEX_COUNT: usize = 6;

    #[inline]
    pub fn new(texture: T, position: Vec2, size: Vec2) -> Self {
        Self {
            texture,
            position,
            size,
            color: Color::WHITE,
        }
    }

    #[inline]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        Self::VERTEX_COUNT
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        Self::INDEX_COUNT
    }

    pub fn corners(&self) -> [Vec2; 4] {
        quad_corners(self.position, self.size)
    }

    pub fn write_vertices(&self, out: &mut Vec<Vec2>) {
        out.extend_from_slice(&self.corners());
    }

    pub fn write_indices(&self, start: u32, out: &mut Vec<u32>) {
        out.extend([start, start + 1, start + 2, start, start + 2, start + 3]);
    }
}

impl Sprite<TextureHandle> {
    /// Sprite drawn at the texture's pixel size. A zero `size` component
    /// passed to [`Sprite::sized`] falls back to the texture dimension too.
    pub fn from_texture(texture: TextureHandle, position: Vec2) -> Self {
        Self::sized(texture, position, Vec2::zero())
    }

    pub fn sized(texture: TextureHandle, position: Vec2, size: Vec2) -> Self {
        let (tw, th) = texture.size();
        let w = if size.x == 0.0 { tw as f32 } else { size.x };
        let h = if size.y == 0.0 { th as f32 } else { size.y };
        Self::new(texture, position, Vec2::new(w, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::resources::TextureId;

    #[test]
    fn quad_geometry() {
        let s = Sprite::new(TextureId::from_raw(7), Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0));
        let mut v = Vec::new();
        let mut i = Vec::new();
        s.write_vertices(&mut v);
        s.write_indices(4, &mut i);
        assert_eq!(v[2], Vec2::new(4.0, 6.0));
        assert_eq!(i, vec![4, 5, 6, 4, 6, 7]);
        assert_eq!(s.color, Color::WHITE);
    }
}
