//! File and image input.
//!
//! Both loaders report failures through the log and hand back an "empty"
//! result; callers treat empty as "fall back to the default".

mod file;
mod image;

pub use file::read_file;
pub use image::{load_image, Image, ImageOptions};
