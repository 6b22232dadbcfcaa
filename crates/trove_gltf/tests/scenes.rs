//! Scenes, cameras, lights, textures and images through the importer.

mod common;

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use common::*;
use serde_json::json;
use trove_gltf::image_importer::ImageResult;
use trove_gltf::texture::{SamplerFilter, SamplerMipmap, SamplerWrapping};
use trove_gltf::{
    EntityRef, FileLoader, GltfImporter, ImageData2D, ImageError, ImageImporter, ImportError,
    LightType, ObjectInstance, PixelFormat, Projection,
};
use trove_math::{Vec2, Vec3};

type Log = Rc<RefCell<Vec<String>>>;

/// Serves files from memory and records every load and close.
struct MemoryLoader {
    files: HashMap<PathBuf, Vec<u8>>,
    log: Log,
}

impl FileLoader for MemoryLoader {
    fn load(&mut self, path: &Path) -> io::Result<Vec<u8>> {
        self.log.borrow_mut().push(format!("load {}", path.display()));
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn close(&mut self, path: &Path) {
        self.log.borrow_mut().push(format!("close {}", path.display()));
    }
}

/// Reports the payload size as image width and records every call.
struct RecordingImageImporter {
    opened: Option<usize>,
    log: Log,
}

impl ImageImporter for RecordingImageImporter {
    fn open_data(&mut self, data: &[u8], mime_type: Option<&str>) -> ImageResult<()> {
        self.log
            .borrow_mut()
            .push(format!("open {} {}", data.len(), mime_type.unwrap_or("-")));
        self.opened = Some(data.len());
        Ok(())
    }

    fn level_count(&self) -> ImageResult<usize> {
        self.opened.map(|_| 2).ok_or(ImageError::NotOpened)
    }

    fn image2d(&mut self, level: usize) -> ImageResult<ImageData2D> {
        let width = self.opened.ok_or(ImageError::NotOpened)? as u32;
        self.log.borrow_mut().push(format!("image {level}"));
        Ok(ImageData2D {
            width,
            height: level as u32 + 1,
            format: PixelFormat::R8Unorm,
            data: vec![0; width as usize * (level + 1)],
            provenance: None,
        })
    }

    fn close(&mut self) {
        self.log.borrow_mut().push("close".to_string());
        self.opened = None;
    }
}

#[test]
fn test_default_scene() {
    let importer = open(&json!({"asset": {"version": "2.0"}}));
    assert_eq!(importer.default_scene(), None);
    assert_eq!(importer.scene_count(), 0);

    let importer = open(&json!({
        "asset": {"version": "2.0"},
        "nodes": [{"name": "root"}],
        "scenes": [{"name": "main", "nodes": [0]}]
    }));
    assert_eq!(importer.default_scene(), Some(0));
    assert_eq!(importer.scene_for_name("main"), Some(0));
    assert_eq!(importer.scene(0).unwrap().children, vec![0]);

    let importer = open(&json!({
        "asset": {"version": "2.0"},
        "scene": 1,
        "scenes": [{"nodes": []}, {"nodes": []}]
    }));
    assert_eq!(importer.default_scene(), Some(1));
}

#[test]
fn test_object_instances() {
    let mut b = Builder::new();
    let positions = b.floats(&[0.0; 9], "VEC3");
    let document = b.finish(json!({
        "meshes": [{"primitives": [{"attributes": {"POSITION": positions}}]}],
        "cameras": [{"type": "orthographic", "orthographic": {"xmag": 1, "ymag": 1, "znear": 0, "zfar": 1}}],
        "extensions": {"KHR_lights_punctual": {"lights": [{"type": "point"}]}},
        "nodes": [
            {"mesh": 0, "camera": 0},
            {"camera": 0},
            {"extensions": {"KHR_lights_punctual": {"light": 0}}},
            {"matrix": [2, 0, 0, 0, 0, 2, 0, 0, 0, 0, 2, 0, 0, 0, 0, 1]},
            {"camera": 3}
        ]
    }));
    let importer = open(&document);

    assert_eq!(
        importer.object(0).unwrap().instance,
        ObjectInstance::Mesh { mesh: 0, material: None }
    );
    assert_eq!(importer.object(1).unwrap().instance, ObjectInstance::Camera(0));
    assert_eq!(importer.object(2).unwrap().instance, ObjectInstance::Light(0));

    let empty = importer.object(3).unwrap();
    assert_eq!(empty.instance, ObjectInstance::Empty);
    assert!(!empty.has_translation_rotation_scaling());
    assert_eq!(
        empty.transformation().transform_point3(Vec3::ONE),
        Vec3::splat(2.0)
    );

    assert!(matches!(importer.object(4), Err(ImportError::Malformed(_))));
    // Untransformed nodes still report separate components
    assert!(importer.object(1).unwrap().has_translation_rotation_scaling());
}

#[test]
fn test_cameras() {
    let importer = open(&json!({
        "asset": {"version": "2.0"},
        "cameras": [
            {"name": "wide", "type": "perspective", "perspective": {"yfov": 1.0, "aspectRatio": 2.0, "znear": 0.1}},
            {"type": "orthographic", "orthographic": {"xmag": 2.0, "ymag": 1.0, "znear": 0.5, "zfar": 10.0}},
            {"type": "fisheye"}
        ]
    }));

    assert_eq!(importer.camera_count(), 3);
    assert_eq!(importer.camera_for_name("wide"), Some(0));

    let camera = importer.camera(0).unwrap();
    match camera.projection {
        Projection::Perspective { fov, aspect_ratio } => {
            let expected = 2.0 * ((0.5f32).tan() * 2.0).atan();
            assert!((fov - expected).abs() < 0.001);
            assert_eq!(aspect_ratio, 2.0);
        }
        other => panic!("expected perspective, got {other:?}"),
    }
    assert!((camera.near - 0.1).abs() < 0.001);
    assert!(camera.far.is_infinite());

    let camera = importer.camera(1).unwrap();
    assert_eq!(
        camera.projection,
        Projection::Orthographic { size: Vec2::new(4.0, 2.0) }
    );
    assert_eq!(camera.far, 10.0);

    assert!(matches!(importer.camera(2), Err(ImportError::Malformed(_))));
}

#[test]
fn test_lights() {
    let importer = open(&json!({
        "asset": {"version": "2.0"},
        "extensions": {"KHR_lights_punctual": {"lights": [
            {"name": "sun", "type": "directional"},
            {"type": "point", "color": [1.0, 0.0, 0.0], "intensity": 5.0},
            {"type": "spot", "spot": {"outerConeAngle": 0.5}},
            {"type": "area"}
        ]}}
    }));

    assert_eq!(importer.light_count(), 4);
    assert_eq!(importer.light_for_name("sun"), Some(0));

    let sun = importer.light(0).unwrap();
    assert_eq!(sun.light_type, LightType::Infinite);
    assert_eq!(sun.color, Vec3::ONE);
    assert_eq!(sun.intensity, 1.0);

    let point = importer.light(1).unwrap();
    assert_eq!(point.light_type, LightType::Point);
    assert_eq!(point.color, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(point.intensity, 5.0);

    assert_eq!(importer.light(2).unwrap().light_type, LightType::Spot);
    assert!(matches!(importer.light(3), Err(ImportError::Malformed(_))));
}

#[test]
fn test_textures() {
    let importer = open(&json!({
        "asset": {"version": "2.0"},
        "images": [{"uri": "a.png"}, {"uri": "b.png"}, {"uri": "c.basis"}],
        "samplers": [
            {"magFilter": 9728, "minFilter": 9984, "wrapS": 33071, "wrapT": 33648},
            {"magFilter": 1}
        ],
        "textures": [
            {"name": "plain", "source": 0},
            {"source": 1, "sampler": 0, "extensions": {"GOOGLE_texture_basis": {"source": 2}}},
            {"source": 0, "sampler": 1},
            {"source": 7, "sampler": 0}
        ]
    }));

    assert_eq!(importer.texture_for_name("plain"), Some(0));

    let texture = importer.texture(0).unwrap();
    assert_eq!(texture.image, 0);
    assert_eq!(texture.magnification_filter, SamplerFilter::Linear);
    assert_eq!(texture.minification_filter, SamplerFilter::Linear);
    assert_eq!(texture.mipmap_filter, SamplerMipmap::Linear);
    assert_eq!(texture.wrapping, [SamplerWrapping::Repeat; 3]);
    assert_eq!(texture.provenance.unwrap().entity(), EntityRef::Texture(0));

    let texture = importer.texture(1).unwrap();
    assert_eq!(texture.image, 2);
    assert_eq!(texture.magnification_filter, SamplerFilter::Nearest);
    assert_eq!(texture.minification_filter, SamplerFilter::Nearest);
    assert_eq!(texture.mipmap_filter, SamplerMipmap::Nearest);
    assert_eq!(
        texture.wrapping,
        [
            SamplerWrapping::ClampToEdge,
            SamplerWrapping::MirroredRepeat,
            SamplerWrapping::Repeat
        ]
    );

    assert!(matches!(importer.texture(2), Err(ImportError::Malformed(_))));
    assert!(matches!(importer.texture(3), Err(ImportError::Malformed(_))));
}

#[test]
fn test_texture_without_source_fails_open() {
    init_logger();
    let mut importer = GltfImporter::new();
    let document = json!({
        "asset": {"version": "2.0"},
        "images": [{"uri": "a.png"}],
        "textures": [{"extensions": {"GOOGLE_texture_basis": {"source": 0}}}]
    });

    assert!(matches!(
        importer.open_data(document.to_string().as_bytes()),
        Err(ImportError::Document(_))
    ));
    assert!(!importer.is_opened());
}

#[test]
fn test_file_loading_and_image_delegation() {
    init_logger();
    let log: Log = Rc::default();

    let document = json!({
        "asset": {"version": "2.0"},
        "buffers": [{"uri": "data.bin", "byteLength": 4}],
        "bufferViews": [{"buffer": 0, "byteOffset": 1, "byteLength": 3}],
        "images": [
            {"name": "external", "uri": "tex.png"},
            {"uri": "data:image/png;base64,AAECAwQ="},
            {"bufferView": 0, "mimeType": "image/x-basis"},
            {"name": "broken"}
        ]
    });
    let files = HashMap::from([
        (PathBuf::from("dir/scene.gltf"), document.to_string().into_bytes()),
        (PathBuf::from("dir/data.bin"), vec![9, 8, 7, 6]),
        (PathBuf::from("dir/tex.png"), vec![1; 7]),
    ]);

    let mut importer = GltfImporter::new()
        .with_file_loader(MemoryLoader {
            files,
            log: log.clone(),
        })
        .with_image_importer(RecordingImageImporter {
            opened: None,
            log: log.clone(),
        });
    importer.open_file("dir/scene.gltf").unwrap();

    assert_eq!(
        log.borrow().as_slice(),
        [
            "load dir/scene.gltf",
            "load dir/data.bin",
            "close dir/data.bin",
            "close dir/scene.gltf"
        ]
    );
    log.borrow_mut().clear();

    // External file: loaded, handed over, closed before decoding
    let image = importer.image2d(0, 1).unwrap();
    assert_eq!((image.width, image.height), (7, 2));
    assert_eq!(image.provenance.unwrap().entity(), EntityRef::Image(0));
    assert_eq!(
        log.borrow().as_slice(),
        [
            "load dir/tex.png",
            "open 7 -",
            "close dir/tex.png",
            "image 1",
            "close"
        ]
    );
    log.borrow_mut().clear();

    // Embedded data URI
    assert_eq!(importer.image2d_level_count(1).unwrap(), 2);
    assert_eq!(importer.image2d(1, 0).unwrap().width, 5);

    // Buffer view, with the MIME type passed through
    assert_eq!(importer.image2d(2, 0).unwrap().width, 3);
    assert!(log.borrow().contains(&"open 3 image/x-basis".to_string()));

    assert_eq!(importer.image2d_for_name("broken"), Some(3));
    assert!(matches!(importer.image2d(3, 0), Err(ImportError::Malformed(_))));
    assert!(matches!(
        importer.image2d(4, 0),
        Err(ImportError::IndexOutOfRange { kind: "image", .. })
    ));
}

#[test]
fn test_missing_file_fails_open() {
    init_logger();
    let mut importer = GltfImporter::new().with_file_loader(MemoryLoader {
        files: HashMap::new(),
        log: Rc::default(),
    });

    assert!(matches!(
        importer.open_file("nowhere.gltf"),
        Err(ImportError::Document(_))
    ));
    assert!(!importer.is_opened());
}

#[test]
fn test_default_image_importer_decodes_png() {
    let mut png = Vec::new();
    image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 255]))
        .write_to(&mut io::Cursor::new(&mut png), image::ImageOutputFormat::Png)
        .unwrap();

    let mut b = Builder::new();
    // Accessor-less view would do too, this just reuses the builder's buffer
    b.accessor(&png, UNSIGNED_BYTE, "SCALAR", png.len(), false);
    let mut document = b.finish(json!({}));
    document["images"] = json!([{"bufferView": 0, "mimeType": "image/png"}]);

    let mut importer = open(&document);
    assert_eq!(importer.image2d_level_count(0).unwrap(), 1);

    let image = importer.image2d(0, 0).unwrap();
    assert_eq!((image.width, image.height), (2, 3));
    assert_eq!(image.format, PixelFormat::RGBA8Unorm);
    assert_eq!(&image.data[..4], &[10, 20, 30, 255]);

    assert!(matches!(importer.image2d(0, 1), Err(ImportError::Image(_))));
}

#[test]
fn test_binary_gltf() {
    let json = json!({
        "asset": {"version": "2.0"},
        "buffers": [{"byteLength": 12}],
        "bufferViews": [{"buffer": 0, "byteLength": 12}],
        "accessors": [{"bufferView": 0, "componentType": FLOAT, "count": 1, "type": "VEC3"}],
        "meshes": [{"name": "point", "primitives": [{"attributes": {"POSITION": 0}, "mode": 0}]}]
    })
    .to_string();

    let mut json_chunk = json.into_bytes();
    while json_chunk.len() % 4 != 0 {
        json_chunk.push(b' ');
    }
    let bin_chunk = f32_bytes(&[1.0, 2.0, 3.0]);

    let mut glb = Vec::new();
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&((12 + 8 + json_chunk.len() + 8 + bin_chunk.len()) as u32).to_le_bytes());
    glb.extend_from_slice(&(json_chunk.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"JSON");
    glb.extend_from_slice(&json_chunk);
    glb.extend_from_slice(&(bin_chunk.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"BIN\0");
    glb.extend_from_slice(&bin_chunk);

    init_logger();
    let mut importer = GltfImporter::new();
    importer.open_data(&glb).unwrap();

    assert_eq!(importer.mesh_for_name("point"), Some(0));
    let mesh = importer.mesh(0, 0).unwrap();
    assert_eq!(mesh.positions_3d_as_array(), Some(vec![Vec3::new(1.0, 2.0, 3.0)]));
}

#[test]
fn test_reopen_replaces_document() {
    let mut importer = open(&json!({
        "asset": {"version": "2.0"},
        "nodes": [{"name": "old"}]
    }));
    let object = importer.object(0).unwrap();

    importer
        .open_data(json!({"asset": {"version": "2.0"}, "nodes": [{}, {}]}).to_string().as_bytes())
        .unwrap();

    assert_eq!(importer.object_count(), 2);
    assert_eq!(importer.object_for_name("old"), None);
    assert!(object.provenance.unwrap().document().is_none());
    assert!(importer.importer_state().is_some());
}
