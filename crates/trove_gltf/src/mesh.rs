//! Mesh data produced by the importer.
//!
//! A [`MeshData`] is always a single glTF primitive: one draw mode, one
//! optional index buffer and a set of typed vertex attributes. Attribute data
//! is stored tightly packed in its original numeric format; the typed
//! readers (`positions_3d_as_array()` and friends) unpack it on request.

use std::fmt;

use trove_math::{Vec2, Vec3, Vec4};

use crate::document::json::mesh::Mode;
use crate::document::{is_signed_integer, DataType};
use crate::provenance::Provenance;

/// How vertices are assembled into primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshPrimitive {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl From<Mode> for MeshPrimitive {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Points => MeshPrimitive::Points,
            Mode::Lines => MeshPrimitive::Lines,
            Mode::LineLoop => MeshPrimitive::LineLoop,
            Mode::LineStrip => MeshPrimitive::LineStrip,
            Mode::Triangles => MeshPrimitive::Triangles,
            Mode::TriangleStrip => MeshPrimitive::TriangleStrip,
            Mode::TriangleFan => MeshPrimitive::TriangleFan,
        }
    }
}

/// Semantic kind of a vertex attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshAttribute {
    Position,
    Normal,
    TextureCoordinates,
    Color,
    ObjectId,
    /// Custom attribute, name available through the importer's attribute
    /// registry.
    Custom(u16),
}

/// Numeric format of one vertex attribute element.
///
/// `components` is the component count per column and `columns` is 1 for
/// scalars and vectors. Matrix columns are padded to 4 bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexFormat {
    pub component: DataType,
    pub components: u8,
    pub columns: u8,
    pub normalized: bool,
}

impl VertexFormat {
    pub const fn vector(component: DataType, components: u8, normalized: bool) -> Self {
        Self {
            component,
            components,
            columns: 1,
            normalized,
        }
    }

    pub const fn matrix(component: DataType, columns: u8, rows: u8, normalized: bool) -> Self {
        Self {
            component,
            components: rows,
            columns,
            normalized,
        }
    }

    pub fn is_matrix(&self) -> bool {
        self.columns > 1
    }

    /// Whether this combination can be represented at all.
    ///
    /// Normalization only applies to 8 and 16 bit integers, and matrices are
    /// either floating-point or normalized signed 8/16 bit.
    pub fn is_valid(&self) -> bool {
        let normalizable = matches!(
            self.component,
            DataType::I8
                | DataType::U8
                | DataType::I16
                | DataType::U16
        );
        if self.normalized && !normalizable {
            return false;
        }
        if self.is_matrix() {
            return self.component == DataType::F32
                || (self.normalized && is_signed_integer(self.component));
        }
        true
    }

    /// Size of one element in bytes, including matrix column padding.
    pub fn size(&self) -> usize {
        let column = self.components as usize * self.component.size();
        if self.is_matrix() {
            column.next_multiple_of(4) * self.columns as usize
        } else {
            column
        }
    }
}

impl fmt::Display for VertexFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (scalar, suffix) = match self.component {
            DataType::F32 => ("Float", ""),
            DataType::U8 => ("UnsignedByte", "ub"),
            DataType::I8 => ("Byte", "b"),
            DataType::U16 => ("UnsignedShort", "us"),
            DataType::I16 => ("Short", "s"),
            DataType::U32 => ("UnsignedInt", "ui"),
        };

        if self.is_matrix() {
            write!(f, "Matrix{}x{}{}", self.columns, self.components, suffix)?;
        } else if self.components > 1 {
            write!(f, "Vector{}{}", self.components, suffix)?;
        } else {
            write!(f, "{}", scalar)?;
        }

        if self.normalized {
            write!(f, "Normalized")?;
        }
        Ok(())
    }
}

/// One vertex attribute: its meaning, format and packed data.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshAttributeData {
    pub name: MeshAttribute,
    pub format: VertexFormat,
    /// `vertex_count * format.size()` bytes, little-endian
    pub data: Vec<u8>,
}

impl MeshAttributeData {
    /// Number of elements in the attribute.
    pub fn len(&self) -> usize {
        self.data.len() / self.format.size().max(1)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Unpack every component to `f32`, normalizing integers if the format
    /// says so. Matrices are not unpacked.
    pub fn unpack_f32(&self) -> Option<Vec<f32>> {
        if self.format.is_matrix() {
            return None;
        }
        let size = self.format.component.size();
        Some(
            self.data
                .chunks_exact(size)
                .map(|bytes| unpack_component(bytes, self.format.component, self.format.normalized))
                .collect(),
        )
    }

    /// Unpack a scalar integer attribute to `u32`.
    pub fn unpack_u32(&self) -> Option<Vec<u32>> {
        if self.format.components != 1 || self.format.is_matrix() || self.format.normalized {
            return None;
        }
        let values = match self.format.component {
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

/// Read one little-endian component as `f32`.
pub(crate) fn unpack_component(bytes: &[u8], component: DataType, normalized: bool) -> f32 {
    match component {
        DataType::F32 => f32::from_bits(u32::from_le(bytemuck::pod_read_unaligned(bytes))),
        DataType::U8 => {
            let v = bytes[0] as f32;
            if normalized { v / 255.0 } else { v }
        }
        DataType::I8 => {
            let v = bytes[0] as i8 as f32;
            if normalized { (v / 127.0).max(-1.0) } else { v }
        }
        DataType::U16 => {
            let v = u16::from_le(bytemuck::pod_read_unaligned(bytes)) as f32;
            if normalized { v / 65535.0 } else { v }
        }
        DataType::I16 => {
            let v = i16::from_le(bytemuck::pod_read_unaligned(bytes)) as f32;
            if normalized { (v / 32767.0).max(-1.0) } else { v }
        }
        DataType::U32 => u32::from_le(bytemuck::pod_read_unaligned(bytes)) as f32,
    }
}

/// Index type of an indexed mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshIndexType {
    UnsignedByte,
    UnsignedShort,
    UnsignedInt,
}

/// Index buffer, stored in the narrowest type that fits the largest index.
#[derive(Clone, Debug, PartialEq)]
pub enum MeshIndices {
    UnsignedByte(Vec<u8>),
    UnsignedShort(Vec<u16>),
    UnsignedInt(Vec<u32>),
}

impl MeshIndices {
    /// Pack indices into the narrowest type covering the maximum index.
    pub fn from_u32(indices: Vec<u32>) -> Self {
        let max = indices.iter().copied().max().unwrap_or(0);
        if max <= u8::MAX as u32 {
            MeshIndices::UnsignedByte(indices.into_iter().map(|i| i as u8).collect())
        } else if max <= u16::MAX as u32 {
            MeshIndices::UnsignedShort(indices.into_iter().map(|i| i as u16).collect())
        } else {
            MeshIndices::UnsignedInt(indices)
        }
    }

    pub fn index_type(&self) -> MeshIndexType {
        match self {
            MeshIndices::UnsignedByte(_) => MeshIndexType::UnsignedByte,
            MeshIndices::UnsignedShort(_) => MeshIndexType::UnsignedShort,
            MeshIndices::UnsignedInt(_) => MeshIndexType::UnsignedInt,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            MeshIndices::UnsignedByte(v) => v.len(),
            MeshIndices::UnsignedShort(v) => v.len(),
            MeshIndices::UnsignedInt(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Widen all indices to `u32`.
    pub fn to_u32(&self) -> Vec<u32> {
        match self {
            MeshIndices::UnsignedByte(v) => v.iter().map(|&i| i as u32).collect(),
            MeshIndices::UnsignedShort(v) => v.iter().map(|&i| i as u32).collect(),
            MeshIndices::UnsignedInt(v) => v.clone(),
        }
    }
}

/// A single imported mesh primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    pub primitive: MeshPrimitive,

    /// Index buffer, `None` for non-indexed meshes
    pub indices: Option<MeshIndices>,

    /// Vertex attributes in document order (attribute names sorted)
    pub attributes: Vec<MeshAttributeData>,

    /// Vertex count. Zero for attribute-less meshes, even if indexed.
    pub vertex_count: usize,

    /// Source record this mesh came from
    pub provenance: Option<Provenance>,
}

impl MeshData {
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Number of indices, zero for non-indexed meshes.
    pub fn index_count(&self) -> usize {
        self.indices.as_ref().map_or(0, MeshIndices::len)
    }

    /// Number of attributes with given semantic.
    pub fn attribute_count(&self, name: MeshAttribute) -> usize {
        self.attributes.iter().filter(|a| a.name == name).count()
    }

    /// `id`-th attribute with given semantic, e.g. the second texture
    /// coordinate set.
    pub fn attribute(&self, name: MeshAttribute, id: usize) -> Option<&MeshAttributeData> {
        self.attributes.iter().filter(|a| a.name == name).nth(id)
    }

    pub fn has_attribute(&self, name: MeshAttribute) -> bool {
        self.attribute(name, 0).is_some()
    }

    /// Positions unpacked to floats.
    pub fn positions_3d_as_array(&self) -> Option<Vec<Vec3>> {
        let values = self.attribute(MeshAttribute::Position, 0)?.unpack_f32()?;
        Some(values.chunks_exact(3).map(Vec3::from_slice).collect())
    }

    /// Normals unpacked to floats.
    pub fn normals_as_array(&self) -> Option<Vec<Vec3>> {
        let values = self.attribute(MeshAttribute::Normal, 0)?.unpack_f32()?;
        Some(values.chunks_exact(3).map(Vec3::from_slice).collect())
    }

    /// Texture coordinates of given set unpacked to floats.
    pub fn texture_coordinates_2d_as_array(&self, set: usize) -> Option<Vec<Vec2>> {
        let values = self
            .attribute(MeshAttribute::TextureCoordinates, set)?
            .unpack_f32()?;
        Some(values.chunks_exact(2).map(Vec2::from_slice).collect())
    }

    /// Colors of given set as RGBA, alpha is 1 for three-component colors.
    pub fn colors_as_array(&self, set: usize) -> Option<Vec<Vec4>> {
        let attribute = self.attribute(MeshAttribute::Color, set)?;
        let values = attribute.unpack_f32()?;
        let colors = match attribute.format.components {
            3 => values
                .chunks_exact(3)
                .map(|c| Vec3::from_slice(c).extend(1.0))
                .collect(),
            _ => values.chunks_exact(4).map(Vec4::from_slice).collect(),
        };
        Some(colors)
    }

    /// Per-vertex object IDs.
    pub fn object_ids_as_array(&self) -> Option<Vec<u32>> {
        self.attribute(MeshAttribute::ObjectId, 0)?.unpack_u32()
    }

    /// Indices widened to `u32`.
    pub fn indices_as_array(&self) -> Option<Vec<u32>> {
        self.indices.as_ref().map(MeshIndices::to_u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute(name: MeshAttribute, format: VertexFormat, data: Vec<u8>) -> MeshAttributeData {
        MeshAttributeData { name, format, data }
    }

    #[test]
    fn test_vertex_format_display() {
        let f = VertexFormat::vector(DataType::U16, 3, true);
        assert_eq!(f.to_string(), "Vector3usNormalized");

        let f = VertexFormat::vector(DataType::F32, 1, false);
        assert_eq!(f.to_string(), "Float");

        let f = VertexFormat::matrix(DataType::I8, 3, 3, true);
        assert_eq!(f.to_string(), "Matrix3x3bNormalized");
    }

    #[test]
    fn test_vertex_format_validity() {
        assert!(VertexFormat::vector(DataType::U8, 2, true).is_valid());
        assert!(!VertexFormat::vector(DataType::F32, 3, true).is_valid());
        assert!(!VertexFormat::vector(DataType::U32, 1, true).is_valid());
        assert!(VertexFormat::matrix(DataType::F32, 4, 4, false).is_valid());
        assert!(VertexFormat::matrix(DataType::I16, 3, 3, true).is_valid());
        assert!(!VertexFormat::matrix(DataType::U8, 2, 2, false).is_valid());
        assert!(!VertexFormat::matrix(DataType::U8, 2, 2, true).is_valid());
    }

    #[test]
    fn test_vertex_format_size() {
        assert_eq!(VertexFormat::vector(DataType::F32, 3, false).size(), 12);
        assert_eq!(VertexFormat::matrix(DataType::I8, 2, 2, true).size(), 8);
    }

    #[test]
    fn test_narrowest_index_type() {
        assert_eq!(
            MeshIndices::from_u32(vec![0, 1, 255]).index_type(),
            MeshIndexType::UnsignedByte
        );
        assert_eq!(
            MeshIndices::from_u32(vec![0, 256]).index_type(),
            MeshIndexType::UnsignedShort
        );
        assert_eq!(
            MeshIndices::from_u32(vec![70000, 1]).index_type(),
            MeshIndexType::UnsignedInt
        );
        assert_eq!(MeshIndices::from_u32(vec![3, 300]).to_u32(), vec![3, 300]);
    }

    #[test]
    fn test_unpack_normalized() {
        let data = vec![0, 0, 255, 255, 0x00, 0x80];
        let a = attribute(
            MeshAttribute::TextureCoordinates,
            VertexFormat::vector(DataType::U16, 1, true),
            data.clone(),
        );
        let values = a.unpack_f32().unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[1], 1.0);

        let b = attribute(
            MeshAttribute::TextureCoordinates,
            VertexFormat::vector(DataType::I16, 1, true),
            data,
        );
        let values = b.unpack_f32().unwrap();
        // i16::MIN clamps to -1
        assert_eq!(values[2], -1.0);
    }

    #[test]
    fn test_typed_readers() {
        let positions: Vec<u8> = [0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let mesh = MeshData {
            primitive: MeshPrimitive::Triangles,
            indices: Some(MeshIndices::from_u32(vec![0, 1, 0])),
            attributes: vec![
                attribute(
                    MeshAttribute::Position,
                    VertexFormat::vector(DataType::F32, 3, false),
                    positions,
                ),
                attribute(
                    MeshAttribute::Color,
                    VertexFormat::vector(DataType::U8, 3, true),
                    vec![255, 0, 0, 0, 255, 0],
                ),
                attribute(
                    MeshAttribute::ObjectId,
                    VertexFormat::vector(DataType::U16, 1, false),
                    vec![7, 0, 1, 1],
                ),
            ],
            vertex_count: 2,
            provenance: None,
        };

        assert_eq!(
            mesh.positions_3d_as_array().unwrap(),
            vec![Vec3::new(0.0, 1.0, 2.0), Vec3::new(3.0, 4.0, 5.0)]
        );
        assert_eq!(mesh.colors_as_array(0).unwrap()[1], Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(mesh.object_ids_as_array().unwrap(), vec![7, 257]);
        assert_eq!(mesh.indices_as_array().unwrap(), vec![0, 1, 0]);
        assert_eq!(mesh.index_count(), 3);
        assert!(mesh.normals_as_array().is_none());
        assert_eq!(mesh.attribute_count(MeshAttribute::TextureCoordinates), 0);
    }
}
