//! Reading accessor contents out of resolved buffers.

use trove_math::{Quat, Vec3};

use gltf::json::accessor::GenericComponentType;
use gltf::json::validation::Checked;

use crate::document::{DataType, Dimensions, Document, ElementLayout};
use crate::error::{ImportError, ImportResult};
use crate::mesh::VertexFormat;

/// Accessor contents, de-interleaved into tightly packed elements.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AccessorData {
    pub component: DataType,
    pub element: Dimensions,
    pub normalized: bool,
    pub count: usize,
    /// `count * element.byte_size(component)` bytes, little-endian
    pub data: Vec<u8>,
}

impl AccessorData {
    pub fn vertex_format(&self) -> VertexFormat {
        if self.element.is_matrix() {
            VertexFormat::matrix(
                self.component,
                self.element.columns() as u8,
                self.element.rows() as u8,
                self.normalized,
            )
        } else {
            VertexFormat::vector(self.component, self.element.rows() as u8, self.normalized)
        }
    }

    /// Whether this is a non-normalized float accessor of given shape.
    pub fn is_float(&self, element: Dimensions) -> bool {
        self.component == DataType::F32 && self.element == element && !self.normalized
    }

    /// All components as floats. Only meaningful for float accessors.
    pub fn floats(&self) -> Vec<f32> {
        self.data
            .chunks_exact(4)
            .map(|b| f32::from_bits(u32::from_le(bytemuck::pod_read_unaligned(b))))
            .collect()
    }

    pub fn vec3s(&self) -> Vec<Vec3> {
        self.floats()
            .chunks_exact(3)
            .map(Vec3::from_slice)
            .collect()
    }

    /// Quaternions from `[x, y, z, w]` float quadruples.
    pub fn quats(&self) -> Vec<Quat> {
        self.floats()
            .chunks_exact(4)
            .map(Quat::from_slice)
            .collect()
    }

    /// Scalar unsigned integers widened to `u32`. `None` for other types.
    pub fn unsigned_ints(&self) -> Option<Vec<u32>> {
        if self.element != Dimensions::Scalar || self.normalized {
            return None;
        }
        let values = match self.component {
            DataType::U8 => self.data.iter().map(|&v| v as u32).collect(),
            DataType::U16 => self
                .data
                .chunks_exact(2)
                .map(|b| u16::from_le(bytemuck::pod_read_unaligned(b)) as u32)
                .collect(),
            DataType::U32 => self
                .data
                .chunks_exact(4)
                .map(|b| u32::from_le(bytemuck::pod_read_unaligned(b)))
                .collect(),
            _ => return None,
        };
        Some(values)
    }
}

/// Upper bound on the zero-filled data of an accessor without a buffer view.
const MAX_IMPLICIT_ACCESSOR_SIZE: usize = 1 << 30;

fn too_large(index: usize) -> ImportError {
    ImportError::Malformed(format!("accessor {index} is too large"))
}

/// Read an accessor.
///
/// Accessors without a buffer view read as zeros. Sparse accessors are not
/// supported.
pub(crate) fn read_accessor(document: &Document, index: usize) -> ImportResult<AccessorData> {
    let root = document.root();
    let accessor = root
        .accessors
        .get(index)
        .ok_or_else(|| ImportError::dangling("accessor", index, root.accessors.len()))?;

    if accessor.sparse.is_some() {
        return Err(ImportError::Unsupported(format!(
            "accessor {index} is sparse"
        )));
    }

    let Checked::Valid(GenericComponentType(component)) = &accessor.component_type else {
        return Err(ImportError::Malformed(format!(
            "accessor {index} has an invalid component type"
        )));
    };
    let Checked::Valid(element) = &accessor.type_ else {
        return Err(ImportError::Malformed(format!(
            "accessor {index} has an invalid type"
        )));
    };
    let (component, element) = (*component, *element);

    let element_size = element.byte_size(component);
    let count = usize::try_from(accessor.count.0).map_err(|_| too_large(index))?;
    let byte_offset = accessor
        .byte_offset
        .as_ref()
        .map_or(Ok(0), |offset| usize::try_from(offset.0))
        .map_err(|_| too_large(index))?;
    let total = count.checked_mul(element_size).ok_or_else(|| too_large(index))?;

    let Some(view_index) = accessor.buffer_view.as_ref().map(|view| view.value()) else {
        if total > MAX_IMPLICIT_ACCESSOR_SIZE {
            return Err(ImportError::Malformed(format!(
                "accessor {index} without a buffer view needs {total} bytes"
            )));
        }
        let mut data = Vec::new();
        data.try_reserve_exact(total).map_err(|_| too_large(index))?;
        data.resize(total, 0);
        return Ok(AccessorData {
            component,
            element,
            normalized: accessor.normalized,
            count,
            data,
        });
    };

    let view = root
        .buffer_views
        .get(view_index)
        .ok_or_else(|| ImportError::dangling("buffer view", view_index, root.buffer_views.len()))?;
    let bytes = document.buffer_view_bytes(view_index).ok_or_else(|| {
        ImportError::Malformed(format!(
            "buffer view {view_index} is out of bounds of buffer {}",
            view.buffer.value()
        ))
    })?;

    let stride = view.byte_stride.as_ref().map_or(element_size, |stride| stride.0);
    if stride < element_size {
        return Err(ImportError::Malformed(format!(
            "buffer view {view_index} stride {stride} is smaller than accessor {index} element size {element_size}"
        )));
    }

    // Last element only needs its own size, not a full stride
    let needed = match count {
        0 => Some(byte_offset),
        _ => (count - 1)
            .checked_mul(stride)
            .and_then(|n| n.checked_add(byte_offset))
            .and_then(|n| n.checked_add(element_size)),
    }
    .ok_or_else(|| too_large(index))?;
    if needed > bytes.len() {
        return Err(ImportError::Malformed(format!(
            "accessor {index} needs {needed} bytes but buffer view {view_index} has only {}",
            bytes.len()
        )));
    }

    let bytes = &bytes[byte_offset..];
    let data = if stride == element_size {
        bytes[..total].to_vec()
    } else {
        let mut data = Vec::with_capacity(total);
        for i in 0..count {
            let start = i * stride;
            data.extend_from_slice(&bytes[start..start + element_size]);
        }
        data
    };

    Ok(AccessorData {
        component,
        element,
        normalized: accessor.normalized,
        count,
        data,
    })
}
