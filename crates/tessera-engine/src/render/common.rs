//! Shared GPU types and helpers used by the 2D programs.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

// ── blend ─────────────────────────────────────────────────────────────────

/// Colors reaching the blender are premultiplied.
pub(crate) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}

// ── projection uniform ────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct ProjectionUniform {
    pub proj: [[f32; 4]; 4],
}

impl ProjectionUniform {
    pub const SIZE: u64 = std::mem::size_of::<ProjectionUniform>() as u64;

    #[inline]
    pub fn new(m: Mat4) -> Self {
        Self {
            proj: m.to_cols_array_2d(),
        }
    }
}
