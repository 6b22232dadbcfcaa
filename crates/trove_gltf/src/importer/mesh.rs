//! Mesh primitive conversion.

use gltf::json::accessor::GenericComponentType;
use gltf::json::validation::Checked;

use crate::document::{is_integer, is_signed_integer, DataType, Document};
use crate::error::{ImportError, ImportResult};
use crate::mesh::{MeshAttribute, MeshAttributeData, MeshData, MeshIndices, MeshPrimitive, VertexFormat};
use crate::provenance::EntityRef;
use crate::registry::AttributeRegistry;

use super::accessor::read_accessor;
use super::session::Session;

/// Map a glTF attribute name to a builtin attribute.
pub(crate) fn builtin_attribute(name: &str, object_id_attribute: &str) -> Option<MeshAttribute> {
    if name == "POSITION" {
        Some(MeshAttribute::Position)
    } else if name == "NORMAL" {
        Some(MeshAttribute::Normal)
    } else if name.starts_with("TEXCOORD_") {
        Some(MeshAttribute::TextureCoordinates)
    } else if name.starts_with("COLOR_") {
        Some(MeshAttribute::Color)
    } else if name == object_id_attribute {
        Some(MeshAttribute::ObjectId)
    } else {
        None
    }
}

/// Register every non-builtin attribute name in document order.
pub(crate) fn register_custom_attributes(
    document: &Document,
    object_id_attribute: &str,
    registry: &mut AttributeRegistry,
) {
    let names = document
        .all_primitive_attributes()
        .flat_map(|attributes| attributes.keys());

    for name in names {
        if builtin_attribute(name, object_id_attribute).is_some() {
            continue;
        }
        match registry.register(name) {
            Some(id) => log::debug!("Registered custom attribute {} as {}", name, id),
            None => log::warn!("Out of custom attribute IDs, {} won't be importable", name),
        }
    }
}

/// Whether texture coordinates have to be Y-flipped in materials instead of
/// in the data.
///
/// Non-normalized and signed normalized integer coordinates can't be flipped
/// in place without changing their range, so a single such accessor decides
/// for the whole document.
pub(crate) fn texture_coordinates_need_flip_in_material(document: &Document) -> bool {
    let accessors = &document.root().accessors;
    document
        .all_primitive_attributes()
        .flatten()
        .filter(|(name, _)| name.starts_with("TEXCOORD_"))
        .filter_map(|(_, &accessor)| accessors.get(accessor))
        .any(|accessor| match accessor.component_type {
            Checked::Valid(GenericComponentType(component)) => {
                is_integer(component) && (!accessor.normalized || is_signed_integer(component))
            }
            Checked::Invalid => false,
        })
}

/// Whether `format` is importable for a builtin attribute. Custom attributes
/// take any representable format.
fn is_allowed_format(attribute: MeshAttribute, format: VertexFormat) -> bool {
    use DataType::*;

    if format.is_matrix() {
        return matches!(attribute, MeshAttribute::Custom(_)) && format.is_valid();
    }

    let small_integer = matches!(format.component, U8 | I8 | U16 | I16);
    match attribute {
        MeshAttribute::Position => {
            format.components == 3 && ((format.component == F32 && !format.normalized) || small_integer)
        }
        MeshAttribute::Normal => {
            format.components == 3
                && match format.component {
                    F32 => !format.normalized,
                    I8 | I16 => format.normalized,
                    _ => false,
                }
        }
        MeshAttribute::TextureCoordinates => {
            format.components == 2 && ((format.component == F32 && !format.normalized) || small_integer)
        }
        MeshAttribute::Color => {
            matches!(format.components, 3 | 4)
                && match format.component {
                    F32 => !format.normalized,
                    U8 | U16 => format.normalized,
                    _ => false,
                }
        }
        MeshAttribute::ObjectId => {
            format.components == 1
                && !format.normalized
                && matches!(format.component, U8 | U16 | U32)
        }
        MeshAttribute::Custom(_) => format.is_valid(),
    }
}

/// Y-flip two-component texture coordinates in place.
///
/// Only float, normalized unsigned byte and normalized unsigned short
/// coordinates end up here; anything else is flipped in the material.
fn flip_texture_coordinates(data: &mut [u8], format: VertexFormat) {
    let size = format.component.size();
    for element in data.chunks_exact_mut(format.size()) {
        let y = &mut element[size..2 * size];
        match (format.component, format.normalized) {
            (DataType::F32, _) => {
                let value = f32::from_bits(u32::from_le(bytemuck::pod_read_unaligned(y)));
                y.copy_from_slice(&(1.0 - value).to_le_bytes());
            }
            (DataType::U8, true) => y[0] = u8::MAX - y[0],
            (DataType::U16, true) => {
                let value = u16::from_le(bytemuck::pod_read_unaligned(y));
                y.copy_from_slice(&(u16::MAX - value).to_le_bytes());
            }
            _ => {}
        }
    }
}

/// Convert one entry of the primitive expansion.
pub(crate) fn convert_mesh(session: &Session, id: usize) -> ImportResult<MeshData> {
    let document = session.document();
    let root = document.root();

    let (mesh_index, primitive_index) = session
        .meshes
        .entry(id)
        .ok_or_else(|| ImportError::dangling("mesh", id, session.meshes.len()))?;
    let primitive = root
        .meshes
        .get(mesh_index)
        .and_then(|mesh| mesh.primitives.get(primitive_index))
        .ok_or_else(|| ImportError::dangling("mesh", mesh_index, root.meshes.len()))?;
    let primitive_attributes = document
        .primitive_attributes(mesh_index, primitive_index)
        .ok_or_else(|| ImportError::dangling("mesh", mesh_index, root.meshes.len()))?;

    let Checked::Valid(mode) = primitive.mode else {
        return Err(ImportError::Malformed(format!(
            "mesh {mesh_index} primitive {primitive_index} has an invalid mode"
        )));
    };
    let primitive_type = MeshPrimitive::from(mode);

    let targets = primitive.targets.as_ref().map_or(0, Vec::len);
    if targets > 0 {
        log::warn!(
            "Mesh {} primitive {} has {} morph targets, ignoring",
            mesh_index,
            primitive_index,
            targets
        );
    }

    let mut attributes = Vec::with_capacity(primitive_attributes.len());
    let mut vertex_count: Option<usize> = None;

    for (name, &accessor_index) in primitive_attributes {
        let attribute = builtin_attribute(name, &session.object_id_attribute)
            .or_else(|| session.attributes.id(name).map(MeshAttribute::Custom))
            .ok_or_else(|| {
                ImportError::Unsupported(format!("attribute {name} has no custom attribute ID"))
            })?;

        let accessor = read_accessor(document, accessor_index)?;
        let format = accessor.vertex_format();
        if !is_allowed_format(attribute, format) {
            return Err(ImportError::UnsupportedAttributeType {
                attribute: name.clone(),
                format: format.to_string(),
            });
        }

        match vertex_count {
            None => vertex_count = Some(accessor.count),
            Some(count) if count != accessor.count => {
                return Err(ImportError::Malformed(format!(
                    "mismatched vertex count for attribute {name}, expected {count} but got {}",
                    accessor.count
                )));
            }
            Some(_) => {}
        }

        let mut data = accessor.data;
        if attribute == MeshAttribute::TextureCoordinates && !session.y_flip_in_material {
            flip_texture_coordinates(&mut data, format);
        }

        attributes.push(MeshAttributeData {
            name: attribute,
            format,
            data,
        });
    }

    let vertex_count = vertex_count.unwrap_or(0);

    let indices = match &primitive.indices {
        None => None,
        Some(accessor_index) => {
            let accessor = read_accessor(document, accessor_index.value())?;
            let indices = accessor.unsigned_ints().ok_or_else(|| {
                ImportError::Unsupported(format!(
                    "index type {} is not supported",
                    accessor.vertex_format()
                ))
            })?;

            if !attributes.is_empty() {
                if let Some(&max) = indices.iter().max() {
                    if max as usize >= vertex_count {
                        return Err(ImportError::Malformed(format!(
                            "index {max} out of range for {vertex_count} vertices"
                        )));
                    }
                }
            }

            Some(MeshIndices::from_u32(indices))
        }
    };

    Ok(MeshData {
        primitive: primitive_type,
        indices,
        attributes,
        vertex_count,
        provenance: session.provenance(EntityRef::Mesh {
            mesh: mesh_index,
            primitive: primitive_index,
        }),
    })
}
