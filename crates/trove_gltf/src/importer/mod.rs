//! The glTF importer.
//!
//! [`GltfImporter`] opens a document once, builds the lookup tables every
//! conversion needs and then converts entities on request, by index. Every
//! category (animations, cameras, lights, scenes, objects, meshes, materials,
//! textures, images) offers the same set of queries:
//!
//! - `*_count()`, zero when nothing is opened
//! - `*_name(id)`, empty for unnamed entities
//! - `*_for_name(name)`, `None` if no entity has that name
//! - a conversion by index returning an [`ImportResult`]
//!
//! A failed conversion only affects the entity in question. The reason is
//! logged and returned; the importer stays usable.
//!
//! # Example
//!
//! ```ignore
//! use trove_gltf::GltfImporter;
//!
//! let mut importer = GltfImporter::new();
//! importer.open_file("scene.gltf")?;
//! if let Some(scene) = importer.default_scene() {
//!     for &object in &importer.scene(scene)?.children {
//!         println!("{:?}", importer.object(object)?.instance);
//!     }
//! }
//! ```

mod accessor;
mod animation;
mod camera;
mod material;
mod mesh;
mod scene;
mod session;
mod texture;

use std::path::Path;

use crate::animation::AnimationData;
use crate::camera::{CameraData, LightData};
use crate::config::ImporterConfig;
use crate::document::{parse_document, Document, DocumentError, FileLoader, FsLoader};
use crate::error::{ImportError, ImportResult};
use crate::image_importer::{DecodingImageImporter, ImageImporter};
use crate::material::PhongMaterialData;
use crate::mesh::{MeshAttribute, MeshData};
use crate::provenance::EntityRef;
use crate::scene::{ObjectData, SceneData};
use crate::texture::{ImageData2D, TextureData};

use session::Session;

/// Imports scenes, meshes, materials, textures, images, cameras, lights and
/// animations from glTF 2.0 documents.
pub struct GltfImporter {
    config: ImporterConfig,
    file_loader: Box<dyn FileLoader>,
    image_importer: Box<dyn ImageImporter>,
    session: Option<Session>,
}

impl Default for GltfImporter {
    fn default() -> Self {
        Self::new()
    }
}

fn open_failed(err: DocumentError) -> ImportError {
    log::error!("Failed to open glTF document: {}", err);
    err.into()
}

fn logged<T>(kind: &str, id: usize, result: ImportResult<T>) -> ImportResult<T> {
    if let Err(err) = &result {
        log::error!("Failed to import {} {}: {}", kind, id, err);
    }
    result
}

fn check_index(kind: &'static str, index: usize, count: usize) -> ImportResult<()> {
    if index < count {
        Ok(())
    } else {
        Err(ImportError::IndexOutOfRange { kind, index, count })
    }
}

impl GltfImporter {
    pub fn new() -> Self {
        Self::with_config(ImporterConfig::default())
    }

    pub fn with_config(config: ImporterConfig) -> Self {
        Self {
            config,
            file_loader: Box::new(FsLoader),
            image_importer: Box::new(DecodingImageImporter::new()),
            session: None,
        }
    }

    /// Load external buffers and images through `loader` instead of the
    /// filesystem.
    pub fn with_file_loader(mut self, loader: impl FileLoader + 'static) -> Self {
        self.file_loader = Box::new(loader);
        self
    }

    /// Decode images with `importer` instead of the builtin decoder.
    pub fn with_image_importer(mut self, importer: impl ImageImporter + 'static) -> Self {
        self.image_importer = Box::new(importer);
        self
    }

    pub fn config(&self) -> &ImporterConfig {
        &self.config
    }

    /// Mutable access to the configuration.
    ///
    /// `object_id_attribute` and `texture_coordinate_y_flip_in_material`
    /// only take effect on the next open.
    pub fn config_mut(&mut self) -> &mut ImporterConfig {
        &mut self.config
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Open glTF JSON or binary glTF from memory.
    ///
    /// Relative URIs are resolved against the current directory.
    pub fn open_data(&mut self, data: &[u8]) -> ImportResult<()> {
        self.close();
        let document =
            parse_document(data, None, self.file_loader.as_mut()).map_err(open_failed)?;
        self.open_document(document);
        Ok(())
    }

    /// Open a `.gltf` or `.glb` file. Relative URIs are resolved against the
    /// file's directory.
    pub fn open_file<P: AsRef<Path>>(&mut self, path: P) -> ImportResult<()> {
        self.close();
        let path = path.as_ref();

        let data = self
            .file_loader
            .load(path)
            .map_err(|err| open_failed(err.into()))?;
        let parsed = parse_document(&data, path.parent(), self.file_loader.as_mut());
        drop(data);
        self.file_loader.close(path);

        self.open_document(parsed.map_err(open_failed)?);
        Ok(())
    }

    /// Open an already parsed document.
    pub fn open_document(&mut self, document: Document) {
        self.close();
        let session = Session::new(document, &self.config);

        let root = session.document().root();
        log::info!(
            "Opened glTF document: {} scenes, {} objects, {} meshes ({} source meshes), {} materials, {} textures, {} images, {} animations, {} cameras, {} lights",
            root.scenes.len(),
            session.nodes.len(),
            session.meshes.len(),
            root.meshes.len(),
            root.materials.len(),
            root.textures.len(),
            root.images.len(),
            root.animations.len(),
            session.names.cameras.len(),
            session.names.lights.len(),
        );

        self.session = Some(session);
    }

    /// Close the document. Provenance handles of imported data stop
    /// resolving.
    pub fn close(&mut self) {
        self.session = None;
    }

    pub fn is_opened(&self) -> bool {
        self.session.is_some()
    }

    /// The opened document.
    pub fn importer_state(&self) -> Option<&Document> {
        self.session.as_ref().map(Session::document)
    }

    fn convert<T>(
        &self,
        kind: &'static str,
        id: usize,
        count: usize,
        f: impl FnOnce(&Session) -> ImportResult<T>,
    ) -> ImportResult<T> {
        let result = match &self.session {
            None => Err(ImportError::NotOpened),
            Some(session) => check_index(kind, id, count).and_then(|()| f(session)),
        };
        logged(kind, id, result)
    }

    // ========================================================================
    // Animations
    // ========================================================================

    /// Animation count. With `merge_animation_clips` it's at most 1.
    pub fn animation_count(&self) -> usize {
        let count = self.session.as_ref().map_or(0, |s| s.names.animations.len());
        if self.config.merge_animation_clips {
            count.min(1)
        } else {
            count
        }
    }

    pub fn animation_name(&self, id: usize) -> Option<&str> {
        if self.config.merge_animation_clips {
            return (id < self.animation_count()).then_some("");
        }
        self.session.as_ref()?.names.animations.name(id)
    }

    /// Always `None` with `merge_animation_clips`, as the merged clip has no
    /// name.
    pub fn animation_for_name(&self, name: &str) -> Option<usize> {
        if self.config.merge_animation_clips {
            return None;
        }
        self.session.as_ref()?.names.animations.index_for(name)
    }

    pub fn animation(&self, id: usize) -> ImportResult<AnimationData> {
        self.convert("animation", id, self.animation_count(), |session| {
            animation::convert_animation(session, &self.config, id)
        })
    }

    // ========================================================================
    // Cameras
    // ========================================================================

    pub fn camera_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.names.cameras.len())
    }

    pub fn camera_name(&self, id: usize) -> Option<&str> {
        self.session.as_ref()?.names.cameras.name(id)
    }

    pub fn camera_for_name(&self, name: &str) -> Option<usize> {
        self.session.as_ref()?.names.cameras.index_for(name)
    }

    pub fn camera(&self, id: usize) -> ImportResult<CameraData> {
        self.convert("camera", id, self.camera_count(), |session| {
            camera::convert_camera(session, id)
        })
    }

    // ========================================================================
    // Lights
    // ========================================================================

    pub fn light_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.names.lights.len())
    }

    pub fn light_name(&self, id: usize) -> Option<&str> {
        self.session.as_ref()?.names.lights.name(id)
    }

    pub fn light_for_name(&self, name: &str) -> Option<usize> {
        self.session.as_ref()?.names.lights.index_for(name)
    }

    pub fn light(&self, id: usize) -> ImportResult<LightData> {
        self.convert("light", id, self.light_count(), |session| {
            camera::convert_light(session, id)
        })
    }

    // ========================================================================
    // Scenes
    // ========================================================================

    /// The scene to show by default, `None` if there are no scenes.
    pub fn default_scene(&self) -> Option<usize> {
        scene::default_scene(self.session.as_ref()?.document().root())
    }

    pub fn scene_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.names.scenes.len())
    }

    pub fn scene_name(&self, id: usize) -> Option<&str> {
        self.session.as_ref()?.names.scenes.name(id)
    }

    pub fn scene_for_name(&self, name: &str) -> Option<usize> {
        self.session.as_ref()?.names.scenes.index_for(name)
    }

    pub fn scene(&self, id: usize) -> ImportResult<SceneData> {
        self.convert("scene", id, self.scene_count(), |session| {
            scene::convert_scene(session, id)
        })
    }

    // ========================================================================
    // Objects
    // ========================================================================

    /// Object count: one per node, plus one per extra primitive of a node's
    /// mesh.
    pub fn object_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.nodes.len())
    }

    /// Object name. Extra objects of a multi-primitive node share its name.
    pub fn object_name(&self, id: usize) -> Option<&str> {
        self.session.as_ref()?.names.objects.name(id)
    }

    pub fn object_for_name(&self, name: &str) -> Option<usize> {
        self.session.as_ref()?.names.objects.index_for(name)
    }

    pub fn object(&self, id: usize) -> ImportResult<ObjectData> {
        self.convert("object", id, self.object_count(), |session| {
            scene::convert_object(session, &self.config, id)
        })
    }

    // ========================================================================
    // Meshes
    // ========================================================================

    /// Mesh count: one per primitive of every glTF mesh.
    pub fn mesh_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.meshes.len())
    }

    /// Mesh name. All primitives of a glTF mesh share its name.
    pub fn mesh_name(&self, id: usize) -> Option<&str> {
        self.session.as_ref()?.names.meshes.name(id)
    }

    pub fn mesh_for_name(&self, name: &str) -> Option<usize> {
        self.session.as_ref()?.names.meshes.index_for(name)
    }

    /// Level count of a mesh, always 1.
    pub fn mesh_level_count(&self, id: usize) -> ImportResult<usize> {
        self.convert("mesh", id, self.mesh_count(), |_| Ok(1))
    }

    pub fn mesh(&self, id: usize, level: usize) -> ImportResult<MeshData> {
        self.convert("mesh", id, self.mesh_count(), |session| {
            check_index("mesh level", level, 1)?;
            mesh::convert_mesh(session, id)
        })
    }

    /// Custom attribute registered for `name`, e.g. `TANGENT`.
    pub fn mesh_attribute_for_name(&self, name: &str) -> Option<MeshAttribute> {
        self.session
            .as_ref()?
            .attributes
            .id(name)
            .map(MeshAttribute::Custom)
    }

    /// Name of a custom attribute. `None` for builtin attributes.
    pub fn mesh_attribute_name(&self, attribute: MeshAttribute) -> Option<&str> {
        match attribute {
            MeshAttribute::Custom(id) => self.session.as_ref()?.attributes.name(id),
            _ => None,
        }
    }

    // ========================================================================
    // Materials
    // ========================================================================

    pub fn material_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.names.materials.len())
    }

    pub fn material_name(&self, id: usize) -> Option<&str> {
        self.session.as_ref()?.names.materials.name(id)
    }

    pub fn material_for_name(&self, name: &str) -> Option<usize> {
        self.session.as_ref()?.names.materials.index_for(name)
    }

    pub fn material(&self, id: usize) -> ImportResult<PhongMaterialData> {
        self.convert("material", id, self.material_count(), |session| {
            material::convert_material(session, &self.config, id)
        })
    }

    // ========================================================================
    // Textures
    // ========================================================================

    pub fn texture_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.names.textures.len())
    }

    pub fn texture_name(&self, id: usize) -> Option<&str> {
        self.session.as_ref()?.names.textures.name(id)
    }

    pub fn texture_for_name(&self, name: &str) -> Option<usize> {
        self.session.as_ref()?.names.textures.index_for(name)
    }

    pub fn texture(&self, id: usize) -> ImportResult<TextureData> {
        self.convert("texture", id, self.texture_count(), |session| {
            texture::convert_texture(session, id)
        })
    }

    // ========================================================================
    // Images
    // ========================================================================

    pub fn image2d_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.names.images.len())
    }

    pub fn image2d_name(&self, id: usize) -> Option<&str> {
        self.session.as_ref()?.names.images.name(id)
    }

    pub fn image2d_for_name(&self, name: &str) -> Option<usize> {
        self.session.as_ref()?.names.images.index_for(name)
    }

    /// Level count of an image, as reported by the image importer.
    pub fn image2d_level_count(&mut self, id: usize) -> ImportResult<usize> {
        let count = self.image2d_count();
        let result = match &self.session {
            None => Err(ImportError::NotOpened),
            Some(session) => check_index("image", id, count).and_then(|()| {
                texture::with_opened_image(
                    session,
                    self.file_loader.as_mut(),
                    self.image_importer.as_mut(),
                    id,
                    |importer| importer.level_count(),
                )
            }),
        };
        logged("image", id, result)
    }

    /// Decode one level of an image through the image importer.
    pub fn image2d(&mut self, id: usize, level: usize) -> ImportResult<ImageData2D> {
        let count = self.image2d_count();
        let result = match &self.session {
            None => Err(ImportError::NotOpened),
            Some(session) => check_index("image", id, count).and_then(|()| {
                let mut image = texture::with_opened_image(
                    session,
                    self.file_loader.as_mut(),
                    self.image_importer.as_mut(),
                    id,
                    |importer| importer.image2d(level),
                )?;
                image.provenance = session.provenance(EntityRef::Image(id));
                Ok(image)
            }),
        };
        logged("image", id, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(json: serde_json::Value) -> GltfImporter {
        let mut importer = GltfImporter::new();
        importer.open_data(json.to_string().as_bytes()).unwrap();
        importer
    }

    #[test]
    fn test_nothing_opened() {
        let importer = GltfImporter::new();

        assert!(!importer.is_opened());
        assert_eq!(importer.mesh_count(), 0);
        assert_eq!(importer.object_count(), 0);
        assert_eq!(importer.default_scene(), None);
        assert_eq!(importer.mesh_name(0), None);
        assert_eq!(importer.mesh_for_name("a"), None);
        assert!(matches!(importer.mesh(0, 0), Err(ImportError::NotOpened)));
        assert!(matches!(importer.animation(0), Err(ImportError::NotOpened)));
    }

    #[test]
    fn test_failed_open_leaves_importer_closed() {
        let mut importer = open(serde_json::json!({"asset": {"version": "2.0"}}));
        assert!(importer.is_opened());

        assert!(importer.open_data(b"{ not json").is_err());
        assert!(!importer.is_opened());
    }

    #[test]
    fn test_index_out_of_range() {
        let importer = open(serde_json::json!({
            "asset": {"version": "2.0"},
            "cameras": [{"type": "perspective", "perspective": {"yfov": 1.0, "znear": 0.1}}]
        }));

        assert!(importer.camera(0).is_ok());
        assert!(matches!(
            importer.camera(1),
            Err(ImportError::IndexOutOfRange { kind: "camera", index: 1, count: 1 })
        ));
    }

    #[test]
    fn test_mesh_levels() {
        let importer = open(serde_json::json!({
            "asset": {"version": "2.0"},
            "meshes": [{"primitives": [{"attributes": {}}]}]
        }));

        assert_eq!(importer.mesh_level_count(0).unwrap(), 1);
        assert!(importer.mesh(0, 0).is_ok());
        assert!(matches!(
            importer.mesh(0, 1),
            Err(ImportError::IndexOutOfRange { kind: "mesh level", .. })
        ));
    }

    #[test]
    fn test_close_invalidates_provenance() {
        let mut importer = open(serde_json::json!({
            "asset": {"version": "2.0"},
            "scenes": [{"nodes": []}]
        }));

        let scene = importer.scene(0).unwrap();
        let provenance = scene.provenance.unwrap();
        assert_eq!(provenance.entity(), EntityRef::Scene(0));
        assert!(provenance.document().is_some());

        importer.close();
        assert!(provenance.document().is_none());
    }
}
