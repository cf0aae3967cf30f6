/// Interleaved vertex attribute layout for a single vertex buffer.
///
/// Built once per vertex type and handed to pipeline creation. Offsets and
/// formats must match the `#[repr(C)]` vertex struct exactly; a mismatch is
/// not detected by the GPU, only by the layout tests.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayout {
    stride: u64,
    attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayout {
    pub fn new(stride: u64) -> Self {
        Self {
            stride,
            attributes: Vec::new(),
        }
    }

    /// Declares one attribute at `offset` bytes into each vertex.
    ///
    /// Panics if the attribute spills past the stride or reuses a location.
    pub fn link_attribute(mut self, location: u32, format: wgpu::VertexFormat, offset: u64) -> Self {
        assert!(
            offset + format.size() <= self.stride,
            "attribute @location({location}) ends at {} past stride {}",
            offset + format.size(),
            self.stride
        );
        assert!(
            self.attributes.iter().all(|a| a.shader_location != location),
            "attribute @location({location}) declared twice"
        );

        self.attributes.push(wgpu::VertexAttribute {
            format,
            offset,
            shader_location: location,
        });
        self
    }

    #[inline]
    pub fn stride(&self) -> u64 {
        self.stride
    }

    #[inline]
    pub fn attributes(&self) -> &[wgpu::VertexAttribute] {
        &self.attributes
    }

    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}
