//! Coordinate and geometry types shared by shapes and renderers.
//!
//! Canonical CPU space:
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Shapes bake their position into the vertices they emit; the only transform
//! applied on the GPU is the orthographic projection.

mod projection;
mod vec2;
mod viewport;

pub use projection::ortho_projection;
pub use vec2::Vec2;
pub use viewport::Viewport;
