use std::path::Path;

use crate::error::EngineError;

/// Decoded RGBA8 image, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// Wraps raw RGBA8 pixels. Fails if the buffer does not match the dimensions.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, EngineError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(EngineError::asset(
                "<memory>",
                format!("expected {expected} bytes for {width}x{height} rgba, got {}", rgba.len()),
            ));
        }
        Ok(Self { width, height, rgba })
    }

    /// Bytes per row of the tightly packed pixel buffer.
    #[inline]
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

/// Loads and decodes an image file (any format `image` understands, DDS included).
pub fn load_texture(path: impl AsRef<Path>) -> Result<TextureImage, EngineError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| EngineError::asset(path, e))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    log::info!("loaded texture '{}' ({width}x{height})", path.display());

    TextureImage::from_rgba(width, height, rgba.into_raw())
        .map_err(|e| EngineError::asset(path, e))
}
