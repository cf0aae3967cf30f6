//! Scoped GPU resource handles used by the batching renderer.
//!
//! Every handle owns its wgpu object and releases it on drop. Buffers are
//! allocated once at their maximum per-frame payload and never grow.

mod buffer;
mod layout;
mod shader;
mod texture;

pub use buffer::GpuBuffer;
pub use layout::VertexLayout;
pub use shader::{ProgramDesc, ShaderProgram, validate_wgsl};
pub use texture::{SlotTexture, Texture, TextureConfig, TextureHandle, TextureId};
