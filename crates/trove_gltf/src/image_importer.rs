//! Image decoding collaborator.
//!
//! The importer never decodes images itself. For every image request it
//! resolves the payload, hands it to an [`ImageImporter`] with
//! [`ImageImporter::open_data`], queries it and calls
//! [`ImageImporter::close`] right after. The payload is only borrowed for the
//! duration of `open_data()`.

use ::image::DynamicImage;
use thiserror::Error;

use crate::texture::{ImageData2D, PixelFormat};

/// Errors that can occur during image decoding.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image decoding error: {0}")]
    Decode(#[from] ::image::ImageError),

    #[error("no image opened")]
    NotOpened,

    #[error("level {level} out of range for {count} levels")]
    LevelOutOfRange { level: usize, count: usize },

    #[error("Unsupported image: {0}")]
    Unsupported(String),
}

pub type ImageResult<T> = Result<T, ImageError>;

/// Decodes image payloads handed over by the importer.
pub trait ImageImporter {
    /// Open an encoded image. `data` must not be referenced after return.
    ///
    /// `mime_type` is passed through from the document if present.
    fn open_data(&mut self, data: &[u8], mime_type: Option<&str>) -> ImageResult<()>;

    /// Number of levels in the opened image.
    fn level_count(&self) -> ImageResult<usize>;

    /// Decode one level of the opened image.
    fn image2d(&mut self, level: usize) -> ImageResult<ImageData2D>;

    /// Release the opened image.
    fn close(&mut self);
}

/// Decodes PNG, JPEG, BMP and GIF images with the `image` crate.
///
/// Images always have a single level.
#[derive(Default)]
pub struct DecodingImageImporter {
    opened: Option<DynamicImage>,
}

impl DecodingImageImporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageImporter for DecodingImageImporter {
    fn open_data(&mut self, data: &[u8], mime_type: Option<&str>) -> ImageResult<()> {
        self.opened = None;

        if mime_type == Some("image/x-basis") {
            return Err(ImageError::Unsupported(
                "Basis Universal images need a dedicated image importer".to_string(),
            ));
        }

        self.opened = Some(::image::load_from_memory(data)?);
        Ok(())
    }

    fn level_count(&self) -> ImageResult<usize> {
        self.opened.as_ref().map(|_| 1).ok_or(ImageError::NotOpened)
    }

    fn image2d(&mut self, level: usize) -> ImageResult<ImageData2D> {
        let image = self.opened.as_ref().ok_or(ImageError::NotOpened)?;
        if level != 0 {
            return Err(ImageError::LevelOutOfRange { level, count: 1 });
        }

        let (width, height) = (image.width(), image.height());
        let (format, data) = match image {
            DynamicImage::ImageLuma8(buffer) => (PixelFormat::R8Unorm, buffer.as_raw().clone()),
            DynamicImage::ImageLumaA8(buffer) => (PixelFormat::RG8Unorm, buffer.as_raw().clone()),
            DynamicImage::ImageRgb8(buffer) => (PixelFormat::RGB8Unorm, buffer.as_raw().clone()),
            // Everything else (16-bit, float) is converted down to RGBA8
            other => (PixelFormat::RGBA8Unorm, other.to_rgba8().into_raw()),
        };

        log::debug!(
            "Decoded image: {}x{} {:?} ({:.1} KB)",
            width,
            height,
            format,
            data.len() as f32 / 1024.0
        );

        Ok(ImageData2D {
            width,
            height,
            format,
            data,
            provenance: None,
        })
    }

    fn close(&mut self) {
        self.opened = None;
    }
}
