//! Primitive attribute names as written in the file.
//!
//! `json::mesh::Primitive` keys attributes by semantic and folds every name
//! it doesn't recognize into a single invalid key, so the names are read a
//! second time straight from the JSON.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Attribute name to accessor index, by mesh and then primitive.
pub(crate) type PrimitiveAttributes = Vec<Vec<BTreeMap<String, usize>>>;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Meshes {
    meshes: Vec<Mesh>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Mesh {
    primitives: Vec<Primitive>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Primitive {
    attributes: BTreeMap<String, usize>,
}

pub(crate) fn read_attribute_names(json: &[u8]) -> serde_json::Result<PrimitiveAttributes> {
    let meshes: Meshes = serde_json::from_slice(json)?;
    Ok(meshes
        .meshes
        .into_iter()
        .map(|mesh| mesh.primitives.into_iter().map(|p| p.attributes).collect())
        .collect())
}
