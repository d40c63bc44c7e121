//! Texture images.
//!
//! [`TextureImage`] holds decoded RGBA8 pixels ready for upload. Rows are stored bottom-up so
//! that OBJ texture coordinates, which put `(0, 0)` at the bottom-left, map directly.

use std::path::Path;

use image::{DynamicImage, RgbaImage};

use crate::error::TextureError;

/// A decoded texture in RGBA8, with the first row at the bottom of the image.
#[derive(Debug, Clone)]
pub struct TextureImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TextureImage {
    /// Loads a texture from disk. The format is guessed from the file contents (BMP, PNG).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| TextureError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let texture = Self::from_image(&image);
        log::debug!(
            "Loaded texture {} ({}x{})",
            path.display(),
            texture.width,
            texture.height
        );
        Ok(texture)
    }

    /// Converts an already decoded image.
    pub fn from_image(image: &DynamicImage) -> Self {
        let rgba: RgbaImage = image::imageops::flip_vertical(&image.to_rgba8());
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            pixels: rgba.into_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixel data, `width * height * 4` bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    #[test]
    fn test_rows_are_flipped() {
        let mut image = RgbaImage::new(1, 2);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(0, 1, Rgba([0, 0, 255, 255]));

        let texture = TextureImage::from_image(&DynamicImage::ImageRgba8(image));
        assert_eq!(texture.width(), 1);
        assert_eq!(texture.height(), 2);
        // The bottom row (blue) comes first.
        assert_eq!(&texture.pixels()[0..4], &[0, 0, 255, 255]);
        assert_eq!(&texture.pixels()[4..8], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_missing_file() {
        let err = TextureImage::load("does/not/exist.bmp").unwrap_err();
        assert!(matches!(err, TextureError::Load { .. }));
    }
}
