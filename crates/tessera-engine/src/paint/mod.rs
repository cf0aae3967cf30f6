//! Color model shared between shapes and renderers.

pub mod color;

pub use color::Color;
