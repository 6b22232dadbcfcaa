//! Trove glTF - glTF 2.0 scene import.
//!
//! This crate provides:
//!
//! - **Document model**: `Document`, the parsed glTF JSON plus resolved buffers
//! - **Importer**: `GltfImporter`, converting documents entity by entity into
//!   meshes, materials, textures, images, cameras, lights, objects, scenes and
//!   animations
//! - **Image delegation**: the `ImageImporter` trait and a default decoder
//!
//! # Example
//!
//! ```ignore
//! use trove_gltf::GltfImporter;
//!
//! let mut importer = GltfImporter::new();
//! importer.open_file("scene.glb")?;
//! println!("Loaded {} meshes, {} objects",
//!     importer.mesh_count(),
//!     importer.object_count());
//!
//! let mesh = importer.mesh(0, 0)?;
//! println!("{} vertices", mesh.vertex_count);
//! ```

pub mod animation;
pub mod camera;
pub mod config;
pub mod document;
pub mod error;
pub mod expansion;
pub mod image_importer;
pub mod importer;
pub mod material;
pub mod mesh;
pub mod provenance;
pub mod registry;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use animation::{AnimationData, AnimationTrack, Interpolation, TrackTarget, TrackValues};
pub use camera::{CameraData, LightData, LightType, Projection};
pub use config::ImporterConfig;
pub use document::{Document, DocumentError, FileLoader, FsLoader};
pub use error::{ImportError, ImportResult};
pub use image_importer::{DecodingImageImporter, ImageError, ImageImporter};
pub use importer::GltfImporter;
pub use material::{AlphaMode, ChannelSource, PhongMaterialData, TextureBinding};
pub use mesh::{MeshAttribute, MeshData, MeshIndices, MeshPrimitive, VertexFormat};
pub use provenance::{EntityRef, Provenance};
pub use scene::{ObjectData, ObjectInstance, ObjectTransform, SceneData, Transform};
pub use texture::{ImageData2D, PixelFormat, TextureData};
