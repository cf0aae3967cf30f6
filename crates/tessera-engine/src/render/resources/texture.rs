use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::io::{ImageOptions, load_image};

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Stable texture identity used for slot deduplication.
///
/// Ids are handed out once per created texture and never reused, so two
/// handles compare equal only if they refer to the same GPU texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TextureId(u64);

impl TextureId {
    fn next() -> Self {
        Self(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wraps a raw id. Intended for headless batching, where no GPU texture
    /// backs the handle.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// A cheap, cloneable reference to a texture that can occupy a batch slot.
pub trait SlotTexture: Clone {
    fn texture_id(&self) -> TextureId;
}

impl SlotTexture for TextureId {
    #[inline]
    fn texture_id(&self) -> TextureId {
        *self
    }
}

/// Shared texture handle. Sprites and the renderer's slot list hold clones;
/// the GPU texture is released when the last one is dropped.
pub type TextureHandle = Rc<Texture>;

impl SlotTexture for TextureHandle {
    #[inline]
    fn texture_id(&self) -> TextureId {
        self.id
    }
}

/// Upload options for image-backed textures.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextureConfig {
    /// Must be a 4-byte RGBA format.
    pub format: wgpu::TextureFormat,
    /// Store rows bottom-up so the fixed sprite UVs show the image upright.
    pub flip_vertically: bool,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            flip_vertically: true,
        }
    }
}

/// 2D RGBA texture plus its default view.
///
/// Dropping the last handle does not invalidate passes already recorded
/// against it; wgpu keeps the texture alive until that work is submitted.
#[derive(Debug)]
pub struct Texture {
    id: TextureId,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl Texture {
    const PLACEHOLDER_RGBA: [u8; 4] = [255, 0, 255, 255];

    /// Loads an image file. On failure the error is logged and a 1x1 magenta
    /// placeholder is returned instead, so a missing asset shows up on screen
    /// rather than aborting the frame.
    pub fn from_path(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
        config: TextureConfig,
    ) -> TextureHandle {
        let path = path.as_ref();
        let options = ImageOptions {
            flip_vertically: config.flip_vertically,
        };

        match load_image(path, options) {
            Some(img) => {
                log::debug!(
                    "texture {}: {}x{} ({} source channels)",
                    path.display(),
                    img.width,
                    img.height,
                    img.source_channels
                );
                Self::from_rgba8(device, queue, &img.pixels, img.width, img.height, config.format)
            }
            None => {
                log::warn!("texture {}: using placeholder", path.display());
                Self::placeholder(device, queue)
            }
        }
    }

    /// Uploads tightly packed RGBA8 pixels, first row first.
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &[u8],
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> TextureHandle {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            log::error!(
                "texture data for {width}x{height} must be {expected} bytes, got {}",
                pixels.len()
            );
            return Self::placeholder(device, queue);
        }

        Rc::new(Self::create(device, queue, "tessera texture", pixels, width, height, format))
    }

    /// 1x1 magenta texture.
    pub fn placeholder(device: &wgpu::Device, queue: &wgpu::Queue) -> TextureHandle {
        Rc::new(Self::solid(device, queue, "tessera placeholder texture", Self::PLACEHOLDER_RGBA))
    }

    /// 1x1 texture of a single sRGB color.
    pub fn solid(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &'static str,
        rgba: [u8; 4],
    ) -> Self {
        Self::create(device, queue, label, &rgba, 1, 1, wgpu::TextureFormat::Rgba8UnormSrgb)
    }

    fn create(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &'static str,
        pixels: &[u8],
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            id: TextureId::next(),
            texture,
            view,
            width,
            height,
        }
    }

    #[inline]
    pub fn id(&self) -> TextureId {
        self.id
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn raw(&self) -> &wgpu::Texture {
        &self.texture
    }
}

impl PartialEq for Texture {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = TextureId::next();
        let b = TextureId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn raw_ids_round_trip_through_slot_trait() {
        let id = TextureId::from_raw(42);
        assert_eq!(id.texture_id().raw(), 42);
    }

    #[test]
    fn default_config_flips_srgb() {
        let c = TextureConfig::default();
        assert!(c.flip_vertically);
        assert_eq!(c.format, wgpu::TextureFormat::Rgba8UnormSrgb);
    }
}
