//! The parsed source document.
//!
//! glTF JSON / GLB bytes are parsed into [`gltf::json::Root`] and buffer
//! payloads are resolved here, once, at open time. The resulting
//! [`Document`] is immutable and is what every per-entity conversion in
//! [`crate::importer`] reads from.
//!
//! The JSON is deserialized without running `gltf`'s validation pass, so a
//! dangling index or an unknown enum value only fails the entity that uses
//! it, not the whole document.
//!
//! ## Recognized extensions
//!
//! - `KHR_lights_punctual`
//! - `KHR_texture_transform`
//! - `KHR_materials_pbrSpecularGlossiness`
//! - `KHR_mesh_quantization`
//! - `GOOGLE_texture_basis`
//!
//! Image payloads are *not* resolved here; they are loaded on demand when an
//! image is requested.

mod accessor;
mod attributes;
mod extensions;
mod file;
mod parser;

pub use accessor::*;
pub use extensions::*;
pub use file::*;
pub use gltf::json::{self, Root};
pub use parser::*;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use attributes::PrimitiveAttributes;

/// An opened glTF document: the JSON records plus resolved buffer data.
#[derive(Clone, Debug, Default)]
pub struct Document {
    root: Root,
    attributes: PrimitiveAttributes,
    buffers: Vec<Vec<u8>>,
    base_dir: Option<PathBuf>,
}

impl Document {
    /// Parse glTF JSON. Buffers are left unresolved.
    pub fn from_json(json: &[u8]) -> DocumentResult<Self> {
        let root: Root = serde_json::from_slice(json)?;
        let attributes = attributes::read_attribute_names(json)?;
        Ok(Self {
            root,
            attributes,
            buffers: Vec::new(),
            base_dir: None,
        })
    }

    /// Attach resolved buffer payloads, `buffers[i]` holding the data of
    /// `root.buffers[i]`.
    pub fn with_buffers(mut self, buffers: Vec<Vec<u8>>) -> Self {
        self.buffers = buffers;
        self
    }

    pub fn with_base_dir(mut self, base_dir: Option<PathBuf>) -> Self {
        self.base_dir = base_dir;
        self
    }

    /// The glTF JSON records.
    pub fn root(&self) -> &Root {
        &self.root
    }

    /// Attribute name to accessor index of a mesh primitive, in name order.
    pub fn primitive_attributes(&self, mesh: usize, primitive: usize) -> Option<&BTreeMap<String, usize>> {
        self.attributes.get(mesh)?.get(primitive)
    }

    /// Every primitive's attributes, in mesh and then primitive order.
    pub fn all_primitive_attributes(&self) -> impl Iterator<Item = &BTreeMap<String, usize>> {
        self.attributes.iter().flatten()
    }

    /// Directory external URIs are resolved against.
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Resolved data of a buffer.
    pub fn buffer(&self, index: usize) -> Option<&[u8]> {
        self.buffers.get(index).map(Vec::as_slice)
    }

    /// Number of resolved buffers.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Bytes covered by a buffer view, or `None` if the view or its range is
    /// invalid.
    pub fn buffer_view_bytes(&self, index: usize) -> Option<&[u8]> {
        let view = self.root.buffer_views.get(index)?;
        let buffer = self.buffer(view.buffer.value())?;
        let offset = usize::try_from(view.byte_offset.as_ref().map_or(0, |offset| offset.0)).ok()?;
        let length = usize::try_from(view.byte_length.0).ok()?;
        buffer.get(offset..offset.checked_add(length)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_view_bytes() {
        let document = Document::from_json(
            br#"{
                "asset": {"version": "2.0"},
                "buffers": [{"byteLength": 8}],
                "bufferViews": [
                    {"buffer": 0, "byteOffset": 2, "byteLength": 4},
                    {"buffer": 0, "byteOffset": 6, "byteLength": 4},
                    {"buffer": 1, "byteLength": 1},
                    {"buffer": 0, "byteOffset": 18446744073709551615, "byteLength": 4}
                ]
            }"#,
        )
        .unwrap()
        .with_buffers(vec![vec![0, 1, 2, 3, 4, 5, 6, 7]]);

        assert_eq!(document.buffer_view_bytes(0), Some(&[2u8, 3, 4, 5][..]));
        // Past the end of the buffer
        assert_eq!(document.buffer_view_bytes(1), None);
        // Missing buffer
        assert_eq!(document.buffer_view_bytes(2), None);
        // Offset overflows
        assert_eq!(document.buffer_view_bytes(3), None);
        // Missing view
        assert_eq!(document.buffer_view_bytes(4), None);
    }

    #[test]
    fn test_attribute_names_kept_verbatim() {
        let document = Document::from_json(
            br#"{
                "asset": {"version": "2.0"},
                "meshes": [{"primitives": [
                    {"attributes": {"POSITION": 0, "_CUSTOM": 1, "TANGENT": 2}},
                    {"attributes": {"_A": 0, "_B": 1}}
                ]}]
            }"#,
        )
        .unwrap();

        let names: Vec<&str> = document
            .primitive_attributes(0, 1)
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(names, ["_A", "_B"]);
        assert_eq!(document.primitive_attributes(0, 0).unwrap()["TANGENT"], 2);
        assert_eq!(document.all_primitive_attributes().count(), 2);
        assert!(document.primitive_attributes(1, 0).is_none());
    }
}
