//! Material conversion.

use trove_math::{khr_texture_transform, texture_y_flip, Mat3, Vec2, Vec3, Vec4};

use gltf::json::extensions::texture::TextureTransform;
use gltf::json::material::AlphaMode as SourceAlphaMode;
use gltf::json::texture::Info;
use gltf::json::validation::Checked;

use crate::config::ImporterConfig;
use crate::document::{is_unlit, normal_texture_transform};
use crate::error::{ImportError, ImportResult};
use crate::material::{
    AlphaMode, ChannelSource, NormalTexture, PhongMaterialData, SourceModel, TextureBinding,
};
use crate::provenance::EntityRef;

use super::session::Session;

const DEFAULT_ALPHA_CUTOFF: f32 = 0.5;

/// A material channel's texture reference, whichever record it came from.
struct TextureRef {
    index: usize,
    tex_coord: u32,
    transform: Option<TextureTransform>,
}

impl From<&Info> for TextureRef {
    fn from(info: &Info) -> Self {
        Self {
            index: info.index.value(),
            tex_coord: info.tex_coord,
            transform: info
                .extensions
                .as_ref()
                .and_then(|extensions| extensions.texture_transform.clone()),
        }
    }
}

/// Resolves texture bindings of one material, tracking the transform all of
/// them have to share.
struct BindingResolver<'a> {
    config: &'a ImporterConfig,
    texture_count: usize,
    /// First transform seen and the channel it came from
    transform: Option<(Mat3, &'static str)>,
}

impl BindingResolver<'_> {
    fn bind(&mut self, channel: &'static str, info: &TextureRef) -> ImportResult<TextureBinding> {
        if info.index >= self.texture_count {
            return Err(ImportError::dangling("texture", info.index, self.texture_count));
        }

        if info.tex_coord != 0 && !self.config.allow_material_texture_coordinate_sets {
            return Err(ImportError::TextureCoordinateSetNotAllowed {
                channel,
                set: info.tex_coord,
            });
        }

        if let Some(transform) = &info.transform {
            if let Some(set) = transform.tex_coord.filter(|&set| set != 0) {
                return Err(ImportError::ConflictingTextureTransform(format!(
                    "{channel} texture transform targets coordinate set {set}"
                )));
            }

            let matrix = khr_texture_transform(
                Vec2::from(transform.offset.0),
                transform.rotation.0,
                Vec2::from(transform.scale.0),
            );

            match self.transform {
                None => self.transform = Some((matrix, channel)),
                Some((first, first_channel)) if !first.abs_diff_eq(matrix, 1.0e-6) => {
                    return Err(ImportError::ConflictingTextureTransform(format!(
                        "{channel} texture transform differs from {first_channel}"
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(TextureBinding {
            texture: info.index,
            coordinate_set: info.tex_coord,
        })
    }

    fn channel(
        &mut self,
        channel: &'static str,
        texture: Option<&Info>,
        factor: Vec4,
    ) -> ImportResult<ChannelSource> {
        Ok(match texture {
            Some(info) => ChannelSource::Texture(self.bind(channel, &info.into())?),
            None => ChannelSource::Constant(factor),
        })
    }
}

/// Combine a texture transform with the Y-flip convention.
///
/// Flipped coordinate data needs the transform conjugated by the flip; data
/// left as-is gets the flip applied after the transform.
fn texture_matrix(transform: Option<Mat3>, has_textures: bool, y_flip_in_material: bool) -> Option<Mat3> {
    let flip = texture_y_flip();
    match (transform, y_flip_in_material) {
        (Some(matrix), false) => Some(flip * matrix * flip),
        (Some(matrix), true) => Some(flip * matrix),
        (None, true) if has_textures => Some(flip),
        (None, _) => None,
    }
}

pub(crate) fn convert_material(
    session: &Session,
    config: &ImporterConfig,
    id: usize,
) -> ImportResult<PhongMaterialData> {
    let root = session.document().root();
    let material = root
        .materials
        .get(id)
        .ok_or_else(|| ImportError::dangling("material", id, root.materials.len()))?;

    if is_unlit(material) {
        log::warn!("Material {} uses KHR_materials_unlit, ignoring", id);
    }

    let mut resolver = BindingResolver {
        config,
        texture_count: root.textures.len(),
        transform: None,
    };

    let specular_glossiness = material
        .extensions
        .as_ref()
        .and_then(|extensions| extensions.pbr_specular_glossiness.as_ref());

    let (source_model, diffuse, specular) =
        if let Some(sg) = specular_glossiness {
            let diffuse = resolver.channel(
                "diffuse",
                sg.diffuse_texture.as_ref(),
                Vec4::from(sg.diffuse_factor.0),
            )?;
            // Glossiness in the alpha channel is dropped, only RGB is used
            let specular = resolver.channel(
                "specular",
                sg.specular_glossiness_texture.as_ref(),
                Vec3::from(sg.specular_factor.0).extend(1.0),
            )?;
            (SourceModel::SpecularGlossiness, diffuse, specular)
        } else {
            let pbr = &material.pbr_metallic_roughness;
            let diffuse = resolver.channel(
                "base color",
                pbr.base_color_texture.as_ref(),
                Vec4::from(pbr.base_color_factor.0),
            )?;
            (
                SourceModel::MetallicRoughness,
                diffuse,
                ChannelSource::Constant(Vec4::ONE),
            )
        };

    let normal = match &material.normal_texture {
        Some(info) => {
            let texture = TextureRef {
                index: info.index.value(),
                tex_coord: info.tex_coord,
                transform: normal_texture_transform(info),
            };
            Some(NormalTexture {
                binding: resolver.bind("normal", &texture)?,
                scale: info.scale,
            })
        }
        None => None,
    };

    let alpha_mode = match material.alpha_mode {
        Checked::Valid(SourceAlphaMode::Opaque) => AlphaMode::Opaque,
        Checked::Valid(SourceAlphaMode::Mask) => AlphaMode::Mask(
            material
                .alpha_cutoff
                .as_ref()
                .map_or(DEFAULT_ALPHA_CUTOFF, |cutoff| cutoff.0),
        ),
        Checked::Valid(SourceAlphaMode::Blend) => AlphaMode::Blend,
        Checked::Invalid => {
            return Err(ImportError::Malformed(format!("material {id} has an unknown alpha mode")));
        }
    };

    let has_textures = diffuse.texture().is_some() || specular.texture().is_some() || normal.is_some();
    let transform = resolver.transform.map(|(matrix, _)| matrix);

    Ok(PhongMaterialData {
        source_model,
        ambient: ChannelSource::Constant(Vec4::new(0.0, 0.0, 0.0, 1.0)),
        diffuse,
        specular,
        normal,
        shininess: 1.0,
        alpha_mode,
        double_sided: material.double_sided,
        texture_matrix: texture_matrix(transform, has_textures, session.y_flip_in_material),
        provenance: session.provenance(EntityRef::Material(id)),
    })
}
