//! CPU side of the batching renderer.
//!
//! Nothing in here touches wgpu state: the [`Batcher`] decides when a batch
//! must be drawn and hands the pending data to a [`FlushSink`]. The GPU
//! renderer is one sink; tests use a recording sink.

mod batch;
mod batcher;
mod vertex;

pub use batch::Batch;
pub use batcher::{BatchLimits, Batcher, BatcherState, DrawCall, FlushSink, FrameStats};
pub use vertex::{CircleVertex, QuadVertex};
