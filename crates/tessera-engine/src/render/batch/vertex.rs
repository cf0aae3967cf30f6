use bytemuck::{Pod, Zeroable};
use std::mem::{offset_of, size_of};

use crate::render::resources::VertexLayout;

/// Quad batch vertex (36 bytes).
///
///  offset  0  position      [f32; 2]   loc 0
///  offset  8  uv            [f32; 2]   loc 1
///  offset 16  color         [f32; 4]   loc 2  (premultiplied)
///  offset 32  texture_index f32        loc 3  (-1 = untextured)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
    pub texture_index: f32,
}

impl QuadVertex {
    pub const UNTEXTURED: f32 = -1.0;

    pub fn layout() -> VertexLayout {
        VertexLayout::new(size_of::<Self>() as u64)
            .link_attribute(0, wgpu::VertexFormat::Float32x2, offset_of!(Self, position) as u64)
            .link_attribute(1, wgpu::VertexFormat::Float32x2, offset_of!(Self, uv) as u64)
            .link_attribute(2, wgpu::VertexFormat::Float32x4, offset_of!(Self, color) as u64)
            .link_attribute(3, wgpu::VertexFormat::Float32, offset_of!(Self, texture_index) as u64)
    }

    #[inline]
    pub fn slot(&self) -> Option<usize> {
        (self.texture_index >= 0.0).then_some(self.texture_index as usize)
    }
}

/// Circle batch vertex (44 bytes).
///
///  offset  0  position  [f32; 2]   loc 0
///  offset  8  uv        [f32; 2]   loc 1  (unused)
///  offset 16  color     [f32; 4]   loc 2  (premultiplied)
///  offset 32  center    [f32; 2]   loc 3
///  offset 40  radius    f32        loc 4
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CircleVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
    pub center: [f32; 2],
    pub radius: f32,
}

impl CircleVertex {
    pub fn layout() -> VertexLayout {
        VertexLayout::new(size_of::<Self>() as u64)
            .link_attribute(0, wgpu::VertexFormat::Float32x2, offset_of!(Self, position) as u64)
            .link_attribute(1, wgpu::VertexFormat::Float32x2, offset_of!(Self, uv) as u64)
            .link_attribute(2, wgpu::VertexFormat::Float32x4, offset_of!(Self, color) as u64)
            .link_attribute(3, wgpu::VertexFormat::Float32x2, offset_of!(Self, center) as u64)
            .link_attribute(4, wgpu::VertexFormat::Float32, offset_of!(Self, radius) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(layout: &VertexLayout) -> Vec<(u32, u64)> {
        layout
            .attributes()
            .iter()
            .map(|a| (a.shader_location, a.offset))
            .collect()
    }

    #[test]
    fn quad_layout_matches_struct() {
        let layout = QuadVertex::layout();
        assert_eq!(layout.stride(), 36);
        assert_eq!(offsets(&layout), vec![(0, 0), (1, 8), (2, 16), (3, 32)]);
    }

    #[test]
    fn circle_layout_matches_struct() {
        let layout = CircleVertex::layout();
        assert_eq!(layout.stride(), 44);
        assert_eq!(offsets(&layout), vec![(0, 0), (1, 8), (2, 16), (3, 32), (4, 40)]);
    }

    #[test]
    fn negative_index_means_untextured() {
        let v = QuadVertex {
            texture_index: QuadVertex::UNTEXTURED,
            ..Zeroable::zeroed()
        };
        assert_eq!(v.slot(), None);
        assert_eq!(QuadVertex { texture_index: 3.0, ..v }.slot(), Some(3));
    }
}
