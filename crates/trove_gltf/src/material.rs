//! Phong-style material produced by the importer.
//!
//! glTF materials are physically based; only the subset that maps onto a
//! diffuse/specular/normal model is imported. Every channel records whether
//! its value came from a texture or a constant.

use trove_math::{Mat3, Vec4};

use crate::provenance::Provenance;

/// A texture bound to a material channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureBinding {
    /// Index of the texture (same as the importer's texture index)
    pub texture: usize,

    /// Texture coordinate set the texture is sampled with
    pub coordinate_set: u32,
}

/// Where a color channel's value comes from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChannelSource {
    Texture(TextureBinding),
    Constant(Vec4),
}

impl ChannelSource {
    pub fn texture(&self) -> Option<TextureBinding> {
        match self {
            ChannelSource::Texture(binding) => Some(*binding),
            ChannelSource::Constant(_) => None,
        }
    }

    pub fn color(&self) -> Option<Vec4> {
        match self {
            ChannelSource::Constant(color) => Some(*color),
            ChannelSource::Texture(_) => None,
        }
    }
}

/// Alpha handling of a material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AlphaMode {
    Opaque,
    /// Alpha-tested with the given cutoff
    Mask(f32),
    Blend,
}

/// Which physically based model the material was translated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceModel {
    MetallicRoughness,
    SpecularGlossiness,
}

/// Normal map binding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalTexture {
    pub binding: TextureBinding,
    pub scale: f32,
}

/// Imported material.
#[derive(Clone, Debug, PartialEq)]
pub struct PhongMaterialData {
    pub source_model: SourceModel,

    /// Always a constant black, glTF has no ambient term
    pub ambient: ChannelSource,

    pub diffuse: ChannelSource,

    pub specular: ChannelSource,

    pub normal: Option<NormalTexture>,

    /// Always 1.0, glTF has no shininess term
    pub shininess: f32,

    pub alpha_mode: AlphaMode,

    pub double_sided: bool,

    /// Transform shared by all textures of the material
    pub texture_matrix: Option<Mat3>,

    /// Source record this material came from
    pub provenance: Option<Provenance>,
}

impl PhongMaterialData {
    /// Check if this material uses any textures.
    pub fn has_textures(&self) -> bool {
        self.diffuse.texture().is_some()
            || self.specular.texture().is_some()
            || self.normal.is_some()
    }

    /// Check if any texture uses a coordinate set other than the first.
    pub fn has_texture_coordinate_sets(&self) -> bool {
        self.texture_bindings().any(|b| b.coordinate_set != 0)
    }

    /// Check if a texture transform is present.
    pub fn has_texture_transformation(&self) -> bool {
        self.texture_matrix.is_some()
    }

    /// All texture bindings in channel order (diffuse, specular, normal).
    pub fn texture_bindings(&self) -> impl Iterator<Item = TextureBinding> + '_ {
        self.diffuse
            .texture()
            .into_iter()
            .chain(self.specular.texture())
            .chain(self.normal.map(|n| n.binding))
    }
}
