/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior). FIFO is supported everywhere.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface (hint).
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    /// Device requirements of the 2D batching renderer.
    ///
    /// The quad pipeline samples from a `binding_array` of `texture_slots`
    /// textures indexed per fragment, which needs texture binding arrays with
    /// non-uniform indexing and a raised binding-array element limit.
    pub fn for_batching(texture_slots: u32) -> Self {
        let base = Self::default();
        Self {
            required_features: base.required_features
                | wgpu::Features::TEXTURE_BINDING_ARRAY
                | wgpu::Features::SAMPLED_TEXTURE_AND_STORAGE_BUFFER_ARRAY_NON_UNIFORM_INDEXING,
            required_limits: wgpu::Limits {
                max_binding_array_elements_per_shader_stage: texture_slots,
                ..base.required_limits
            },
            ..base
        }
    }
}

/// Features in `required` that an adapter offering `available` lacks.
pub(crate) fn missing_features(
    available: wgpu::Features,
    required: wgpu::Features,
) -> wgpu::Features {
    required.difference(available)
}
