//! Textures and images produced by the importer.

use crate::document::json::texture::{MagFilter, MinFilter, WrappingMode};
use crate::provenance::Provenance;

/// Texture filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplerFilter {
    Nearest,
    Linear,
}

/// Mipmap selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplerMipmap {
    /// Only the base level is used
    Base,
    Nearest,
    Linear,
}

/// Texture coordinate wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplerWrapping {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

impl From<MagFilter> for SamplerFilter {
    fn from(filter: MagFilter) -> Self {
        match filter {
            MagFilter::Nearest => SamplerFilter::Nearest,
            MagFilter::Linear => SamplerFilter::Linear,
        }
    }
}

impl SamplerFilter {
    /// Split a `minFilter` into filter and mipmap parts.
    pub fn from_min_filter(filter: MinFilter) -> (Self, SamplerMipmap) {
        match filter {
            MinFilter::Nearest => (SamplerFilter::Nearest, SamplerMipmap::Base),
            MinFilter::Linear => (SamplerFilter::Linear, SamplerMipmap::Base),
            MinFilter::NearestMipmapNearest => (SamplerFilter::Nearest, SamplerMipmap::Nearest),
            MinFilter::LinearMipmapNearest => (SamplerFilter::Linear, SamplerMipmap::Nearest),
            MinFilter::NearestMipmapLinear => (SamplerFilter::Nearest, SamplerMipmap::Linear),
            MinFilter::LinearMipmapLinear => (SamplerFilter::Linear, SamplerMipmap::Linear),
        }
    }
}

impl From<WrappingMode> for SamplerWrapping {
    fn from(mode: WrappingMode) -> Self {
        match mode {
            WrappingMode::Repeat => SamplerWrapping::Repeat,
            WrappingMode::MirroredRepeat => SamplerWrapping::MirroredRepeat,
            WrappingMode::ClampToEdge => SamplerWrapping::ClampToEdge,
        }
    }
}

/// Texture type. glTF only has 2D textures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureType {
    Texture2D,
}

/// Imported texture: an image plus sampler state.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub texture_type: TextureType,
    pub minification_filter: SamplerFilter,
    pub magnification_filter: SamplerFilter,
    pub mipmap_filter: SamplerMipmap,
    /// Wrapping on X, Y and Z. Z is always repeat.
    pub wrapping: [SamplerWrapping; 3],
    /// Image index
    pub image: usize,
    pub provenance: Option<Provenance>,
}

/// Pixel layout of decoded image data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    R8Unorm,
    RG8Unorm,
    RGB8Unorm,
    RGBA8Unorm,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn pixel_size(self) -> usize {
        match self {
            PixelFormat::R8Unorm => 1,
            PixelFormat::RG8Unorm => 2,
            PixelFormat::RGB8Unorm => 3,
            PixelFormat::RGBA8Unorm => 4,
        }
    }
}

/// A decoded 2D image.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageData2D {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// Row-major pixel data, first row at the top
    pub data: Vec<u8>,
    pub provenance: Option<Provenance>,
}

impl ImageData2D {
    /// Get total size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}
