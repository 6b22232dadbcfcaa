//! Object and scene conversion.

use trove_math::{is_unit_quat, normalize_or_identity, Mat4, Quat, Vec3};

use crate::config::ImporterConfig;
use crate::document::json::Node;
use crate::document::Root;
use crate::error::{ImportError, ImportResult};
use crate::provenance::EntityRef;
use crate::scene::{ObjectData, ObjectInstance, ObjectTransform, SceneData, Transform};

use super::session::{lights, Session};

/// Scene to show by default: the `scene` field, else the first scene if any.
pub(crate) fn default_scene(root: &Root) -> Option<usize> {
    root.scene
        .as_ref()
        .map(|scene| scene.value())
        .or_else(|| (!root.scenes.is_empty()).then_some(0))
}

fn node_transform(config: &ImporterConfig, node_index: usize, node: &Node) -> ObjectTransform {
    if let Some(matrix) = &node.matrix {
        return ObjectTransform::Matrix(Mat4::from_cols_array(matrix));
    }

    let mut rotation = node
        .rotation
        .as_ref()
        .map_or(Quat::IDENTITY, |rotation| Quat::from_array(rotation.0));
    if config.normalize_quaternions && !is_unit_quat(rotation) {
        if rotation.length_squared() > 0.0 {
            log::warn!(
                "Rotation of node {} is not normalized, renormalizing",
                node_index
            );
        } else {
            log::warn!("Rotation of node {} has zero length, using identity", node_index);
        }
        rotation = normalize_or_identity(rotation);
    }

    ObjectTransform::TranslationRotationScaling(Transform {
        translation: node.translation.map_or(Vec3::ZERO, Vec3::from),
        rotation,
        scale: node.scale.map_or(Vec3::ONE, Vec3::from),
    })
}

fn mesh_instance(
    session: &Session,
    root: &Root,
    mesh: usize,
    primitive: usize,
) -> ImportResult<ObjectInstance> {
    let first = session.meshes.first(mesh).ok_or_else(|| {
        if mesh < root.meshes.len() {
            ImportError::Malformed(format!("mesh {mesh} has no primitives"))
        } else {
            ImportError::dangling("mesh", mesh, root.meshes.len())
        }
    })?;

    let material = root
        .meshes
        .get(mesh)
        .and_then(|m| m.primitives.get(primitive))
        .and_then(|p| p.material.as_ref())
        .map(|material| material.value());
    if let Some(material) = material.filter(|&m| m >= root.materials.len()) {
        return Err(ImportError::dangling("material", material, root.materials.len()));
    }

    Ok(ObjectInstance::Mesh {
        mesh: first + primitive,
        material,
    })
}

/// Convert one entry of the node expansion.
///
/// The first entry of a node carries its transform and children. Entries
/// for extra mesh primitives are identity-transformed children of it.
pub(crate) fn convert_object(
    session: &Session,
    config: &ImporterConfig,
    id: usize,
) -> ImportResult<ObjectData> {
    let root = session.document().root();
    let (node_index, part) = session
        .nodes
        .entry(id)
        .ok_or_else(|| ImportError::dangling("object", id, session.nodes.len()))?;
    let node = root
        .nodes
        .get(node_index)
        .ok_or_else(|| ImportError::dangling("node", node_index, root.nodes.len()))?;
    let provenance = session.provenance(EntityRef::Node(node_index));

    let mesh = node.mesh.as_ref().map(|mesh| mesh.value());
    if part > 0 {
        let mesh = mesh
            .ok_or_else(|| ImportError::Malformed(format!("node {node_index} has no mesh")))?;
        return Ok(ObjectData {
            children: Vec::new(),
            transform: ObjectTransform::Matrix(Mat4::IDENTITY),
            instance: mesh_instance(session, root, mesh, part)?,
            provenance,
        });
    }

    let mut children: Vec<usize> = session.nodes.sequence(node_index).skip(1).collect();
    for child in node.children.iter().flatten().map(|child| child.value()) {
        let object = session
            .nodes
            .first(child)
            .ok_or_else(|| ImportError::dangling("node", child, root.nodes.len()))?;
        children.push(object);
    }

    let light = node
        .extensions
        .as_ref()
        .and_then(|extensions| extensions.khr_lights_punctual.as_ref())
        .map(|extension| extension.light.value());
    let camera = node.camera.as_ref().map(|camera| camera.value());
    let instance = if let Some(mesh) = mesh {
        if camera.is_some() || light.is_some() {
            log::warn!(
                "Node {} has a mesh together with a camera or light, importing only the mesh",
                node_index
            );
        }
        mesh_instance(session, root, mesh, 0)?
    } else if let Some(camera) = camera {
        if camera >= root.cameras.len() {
            return Err(ImportError::dangling("camera", camera, root.cameras.len()));
        }
        ObjectInstance::Camera(camera)
    } else if let Some(light) = light {
        let count = lights(root).len();
        if light >= count {
            return Err(ImportError::dangling("light", light, count));
        }
        ObjectInstance::Light(light)
    } else {
        ObjectInstance::Empty
    };

    Ok(ObjectData {
        children,
        transform: node_transform(config, node_index, node),
        instance,
        provenance,
    })
}

pub(crate) fn convert_scene(session: &Session, id: usize) -> ImportResult<SceneData> {
    let root = session.document().root();
    let scene = root
        .scenes
        .get(id)
        .ok_or_else(|| ImportError::dangling("scene", id, root.scenes.len()))?;

    let children = scene
        .nodes
        .iter()
        .map(|node| {
            let node = node.value();
            session
                .nodes
                .first(node)
                .ok_or_else(|| ImportError::dangling("node", node, root.nodes.len()))
        })
        .collect::<ImportResult<Vec<_>>>()?;

    Ok(SceneData {
        children,
        provenance: session.provenance(EntityRef::Scene(id)),
    })
}
