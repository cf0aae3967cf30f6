use std::path::Path;

/// Decoded image as tightly packed RGBA8 rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Channel count of the source file before expansion to RGBA.
    pub source_channels: u8,
}

impl Image {
    /// Bytes per row of `pixels`.
    #[inline]
    pub fn stride(&self) -> u32 {
        self.width * 4
    }
}

/// Decode options.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImageOptions {
    /// Store the bottom row first.
    ///
    /// Sprites use the fixed UVs bottom-left `(0, 1)` .. top-left `(0, 0)`,
    /// so textures are uploaded flipped to appear upright.
    pub flip_vertically: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self { flip_vertically: true }
    }
}

/// Loads and decodes an image file into RGBA8.
///
/// Returns `None` and logs a diagnostic on failure.
pub fn load_image(path: impl AsRef<Path>, options: ImageOptions) -> Option<Image> {
    let path = path.as_ref();
    let decoded = match ::image::open(path) {
        Ok(img) => img,
        Err(e) => {
            log::error!("failed to load image {}: {e}", path.display());
            return None;
        }
    };

    let source_channels = decoded.color().channel_count();
    let decoded = if options.flip_vertically { decoded.flipv() } else { decoded };
    let rgba = decoded.into_rgba8();

    Some(Image {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
        source_channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_two_row_png(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("tessera-{name}-{}.png", std::process::id()));
        let mut img = ::image::RgbImage::new(1, 2);
        img.put_pixel(0, 0, ::image::Rgb([255, 0, 0]));
        img.put_pixel(0, 1, ::image::Rgb([0, 0, 255]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn flips_rows_and_expands_to_rgba() {
        let path = write_two_row_png("flip");
        let img = load_image(&path, ImageOptions::default()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!((img.width, img.height, img.source_channels), (1, 2, 3));
        assert_eq!(img.stride(), 4);
        // Bottom (blue) row first.
        assert_eq!(img.pixels, vec![0, 0, 255, 255, 255, 0, 0, 255]);
    }

    #[test]
    fn keeps_row_order_without_flip() {
        let path = write_two_row_png("noflip");
        let img = load_image(&path, ImageOptions { flip_vertically: false }).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(&img.pixels[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn missing_file_yields_none() {
        assert!(load_image("nope/missing.png", ImageOptions::default()).is_none());
    }
}
