//! Example: Open a glTF file and print what it contains.
//!
//! Run with: cargo run --example inspect_gltf -- path/to/scene.gltf

use std::env;

use anyhow::Context;
use trove_gltf::{GltfImporter, ObjectInstance};

fn print_object(importer: &GltfImporter, id: usize, depth: usize) -> anyhow::Result<()> {
    let object = importer.object(id)?;
    let position = object.transformation().transform_point3(trove_math::Vec3::ZERO);
    let instance = match object.instance {
        ObjectInstance::Empty => "empty".to_string(),
        ObjectInstance::Mesh { mesh, material } => match material {
            Some(material) => format!("mesh {} with material {}", mesh, material),
            None => format!("mesh {}", mesh),
        },
        ObjectInstance::Camera(camera) => format!("camera {}", camera),
        ObjectInstance::Light(light) => format!("light {}", light),
    };

    println!(
        "{:indent$}[{}] '{}' {} at ({:.2}, {:.2}, {:.2})",
        "",
        id,
        importer.object_name(id).unwrap_or_default(),
        instance,
        position.x,
        position.y,
        position.z,
        indent = depth * 2
    );

    for &child in &object.children {
        print_object(importer, child, depth + 1)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_gltf <path-to-gltf-or-glb>");
        println!("\nExample:");
        println!("  cargo run --example inspect_gltf -- assets/box.gltf");
        return Ok(());
    }

    let path = &args[1];
    println!("Opening glTF file: {}", path);

    let mut importer = GltfImporter::new();
    importer
        .open_file(path)
        .with_context(|| format!("failed to open {}", path))?;

    println!("\n--- Meshes ---");
    for id in 0..importer.mesh_count() {
        match importer.mesh(id, 0) {
            Ok(mesh) => println!(
                "  [{}] '{}' {:?}: {} vertices, {} indices, {} attributes",
                id,
                importer.mesh_name(id).unwrap_or_default(),
                mesh.primitive,
                mesh.vertex_count,
                mesh.index_count(),
                mesh.attributes.len()
            ),
            Err(e) => println!("  [{}] failed: {}", id, e),
        }
    }

    println!("\n--- Materials ---");
    for id in 0..importer.material_count() {
        match importer.material(id) {
            Ok(material) => println!(
                "  [{}] '{}' {:?}, {:?}, textured: {}",
                id,
                importer.material_name(id).unwrap_or_default(),
                material.source_model,
                material.alpha_mode,
                material.has_textures()
            ),
            Err(e) => println!("  [{}] failed: {}", id, e),
        }
    }

    println!("\n--- Animations ---");
    for id in 0..importer.animation_count() {
        match importer.animation(id) {
            Ok(animation) => println!(
                "  [{}] '{}' {} tracks, {:.2}s to {:.2}s",
                id,
                importer.animation_name(id).unwrap_or_default(),
                animation.track_count(),
                animation.duration.min,
                animation.duration.max
            ),
            Err(e) => println!("  [{}] failed: {}", id, e),
        }
    }

    println!("\n--- Images ---");
    for id in 0..importer.image2d_count() {
        match importer.image2d(id, 0) {
            Ok(image) => println!(
                "  [{}] '{}' {}x{} {:?}",
                id,
                importer.image2d_name(id).unwrap_or_default(),
                image.width,
                image.height,
                image.format
            ),
            Err(e) => println!("  [{}] failed: {}", id, e),
        }
    }

    if let Some(scene) = importer.default_scene() {
        println!("\n--- Scene {} ---", scene);
        for &object in &importer.scene(scene)?.children {
            print_object(&importer, object, 1)?;
        }
    }

    Ok(())
}
