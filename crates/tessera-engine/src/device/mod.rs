//! Device, queue and swapchain ownership.
//!
//! One [`Gpu`] exists per window. It is created by the runtime and lent to
//! renderers through [`crate::core::FrameCtx`]; nothing here is global.

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
