//! Tessera engine crate.
//!
//! Platform + GPU runtime pieces and an immediate-mode 2D batching renderer.
//! Sprites, rectangles and circles submitted between `begin` and `end` are
//! accumulated into as few indexed draw calls as the batch limits allow.
//!
//! # Adapter requirements
//!
//! Textured quads sample from a `binding_array` of 32 textures indexed per
//! fragment, so [`render::Renderer2D`] needs `TEXTURE_BINDING_ARRAY` with
//! non-uniform indexing and a binding-array limit of at least 32. Request
//! them with [`device::GpuInit::for_batching`]. Vulkan, Metal and DX12
//! adapters generally qualify; GL and WebGL adapters do not and are rejected
//! at startup with the backend named in the error.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod io;
pub mod shapes;
pub mod render;
