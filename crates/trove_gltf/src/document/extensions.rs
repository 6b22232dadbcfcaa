//! Extensions without a typed counterpart in `gltf::json`.
//!
//! These are looked up by name in the raw extension maps.

use gltf::json::extensions::texture::TextureTransform;
use gltf::json::material::NormalTexture;
use gltf::json::{Material, Texture};

pub const KHR_TEXTURE_TRANSFORM: &str = "KHR_texture_transform";
pub const KHR_MATERIALS_UNLIT: &str = "KHR_materials_unlit";
pub const GOOGLE_TEXTURE_BASIS: &str = "GOOGLE_texture_basis";

/// Image source from `GOOGLE_texture_basis`, if the texture has one.
pub fn texture_basis_source(texture: &Texture) -> Option<usize> {
    let basis = texture.extensions.as_ref()?.others.get(GOOGLE_TEXTURE_BASIS)?;
    let source = basis.get("source")?.as_u64();
    if source.is_none() {
        log::warn!("{} without a valid source, ignoring", GOOGLE_TEXTURE_BASIS);
    }
    usize::try_from(source?).ok()
}

/// Whether the material uses `KHR_materials_unlit`.
pub fn is_unlit(material: &Material) -> bool {
    material
        .extensions
        .as_ref()
        .is_some_and(|extensions| extensions.others.contains_key(KHR_MATERIALS_UNLIT))
}

/// `KHR_texture_transform` of a normal texture.
///
/// `gltf::json` only types the extension on plain texture infos.
pub fn normal_texture_transform(info: &NormalTexture) -> Option<TextureTransform> {
    let value = info.extensions.as_ref()?.others.get(KHR_TEXTURE_TRANSFORM)?;
    match serde_json::from_value(value.clone()) {
        Ok(transform) => Some(transform),
        Err(e) => {
            log::warn!("Malformed {} on normal texture, ignoring: {}", KHR_TEXTURE_TRANSFORM, e);
            None
        }
    }
}
