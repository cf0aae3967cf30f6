//! GPU rendering subsystem.
//!
//! [`Renderer2D`] owns the GPU resources; the CPU-side batching policy lives
//! in [`batch`] and is usable without a device.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders map to clip space with the projection uniform.

pub mod batch;
mod common;
mod ctx;
mod renderer_2d;
pub mod resources;

pub use ctx::{RenderCtx, RenderTarget};
pub use renderer_2d::{Frame2D, MAX_TEXTURE_SLOTS, Renderer2D, Renderer2DConfig};
