//! State derived from an opened document.

use std::sync::Arc;

use crate::config::ImporterConfig;
use gltf::json::extensions::scene::khr_lights_punctual::Light;

use crate::document::{Document, Root};
use crate::expansion::{node_expansion, primitive_expansion, Expansion};
use crate::provenance::{EntityRef, Provenance};
use crate::registry::{AttributeRegistry, NameMap};

use super::mesh::{register_custom_attributes, texture_coordinates_need_flip_in_material};

/// Name maps for every entity category.
#[derive(Debug, Default)]
pub(crate) struct NameMaps {
    pub animations: NameMap,
    pub cameras: NameMap,
    pub lights: NameMap,
    pub scenes: NameMap,
    pub objects: NameMap,
    pub meshes: NameMap,
    pub materials: NameMap,
    pub textures: NameMap,
    pub images: NameMap,
}

/// Everything built when a document is opened. Dropped as a whole on close.
#[derive(Debug)]
pub(crate) struct Session {
    document: Arc<Document>,
    pub meshes: Expansion,
    pub nodes: Expansion,
    pub attributes: AttributeRegistry,
    pub names: NameMaps,
    /// Texture coordinates stay as-is and materials do the Y-flip
    pub y_flip_in_material: bool,
    pub object_id_attribute: String,
}

/// Lights from `KHR_lights_punctual`, empty if the extension isn't used.
pub(crate) fn lights(root: &Root) -> &[Light] {
    root.extensions
        .as_ref()
        .and_then(|extensions| extensions.khr_lights_punctual.as_ref())
        .map(|extension| extension.lights.as_slice())
        .unwrap_or_default()
}

impl Session {
    pub fn new(document: Document, config: &ImporterConfig) -> Self {
        let root = document.root();

        let meshes = primitive_expansion(root);
        let nodes = node_expansion(root);

        let mut attributes = AttributeRegistry::new();
        register_custom_attributes(&document, &config.object_id_attribute, &mut attributes);

        let y_flip_in_material = if config.texture_coordinate_y_flip_in_material {
            true
        } else if texture_coordinates_need_flip_in_material(&document) {
            log::debug!(
                "Integer or signed normalized texture coordinates found, Y-flipping in materials"
            );
            true
        } else {
            false
        };

        let names = NameMaps {
            animations: NameMap::from_names(root.animations.iter().map(|a| a.name.as_deref())),
            cameras: NameMap::from_names(root.cameras.iter().map(|c| c.name.as_deref())),
            lights: NameMap::from_names(lights(root).iter().map(|l| l.name.as_deref())),
            scenes: NameMap::from_names(root.scenes.iter().map(|s| s.name.as_deref())),
            objects: NameMap::from_names(
                (0..nodes.len())
                    .filter_map(|i| nodes.entry(i))
                    .map(|(node, _)| root.nodes[node].name.as_deref()),
            ),
            meshes: NameMap::from_names(
                (0..meshes.len())
                    .filter_map(|i| meshes.entry(i))
                    .map(|(mesh, _)| root.meshes[mesh].name.as_deref()),
            ),
            materials: NameMap::from_names(root.materials.iter().map(|m| m.name.as_deref())),
            textures: NameMap::from_names(root.textures.iter().map(|t| t.name.as_deref())),
            images: NameMap::from_names(root.images.iter().map(|i| i.name.as_deref())),
        };

        Self {
            document: Arc::new(document),
            meshes,
            nodes,
            attributes,
            names,
            y_flip_in_material,
            object_id_attribute: config.object_id_attribute.clone(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn provenance(&self, entity: EntityRef) -> Option<Provenance> {
        Some(Provenance::new(&self.document, entity))
    }
}
