//! Camera and light conversion.

use gltf::json::camera::Type as CameraType;
use gltf::json::extensions::scene::khr_lights_punctual::Type as SourceLightType;
use gltf::json::validation::Checked;
use trove_math::{Vec2, Vec3};

use crate::camera::{CameraData, LightData, LightType, Projection};
use crate::error::{ImportError, ImportResult};
use crate::provenance::EntityRef;

use super::session::{lights, Session};

pub(crate) fn convert_camera(session: &Session, id: usize) -> ImportResult<CameraData> {
    let root = session.document().root();
    let camera = root
        .cameras
        .get(id)
        .ok_or_else(|| ImportError::dangling("camera", id, root.cameras.len()))?;
    let provenance = session.provenance(EntityRef::Camera(id));

    match camera.type_ {
        Checked::Valid(CameraType::Perspective) => {
            let p = camera.perspective.as_ref().ok_or_else(|| {
                ImportError::Malformed(format!("perspective camera {id} has no perspective properties"))
            })?;
            Ok(CameraData::from_vertical_fov(
                p.yfov,
                p.aspect_ratio.unwrap_or(1.0),
                p.znear,
                p.zfar.unwrap_or(f32::INFINITY),
                provenance,
            ))
        }
        Checked::Valid(CameraType::Orthographic) => {
            let o = camera.orthographic.as_ref().ok_or_else(|| {
                ImportError::Malformed(format!(
                    "orthographic camera {id} has no orthographic properties"
                ))
            })?;
            Ok(CameraData {
                projection: Projection::Orthographic {
                    size: Vec2::new(o.xmag, o.ymag) * 2.0,
                },
                near: o.znear,
                far: o.zfar,
                provenance,
            })
        }
        Checked::Invalid => Err(ImportError::Malformed(format!("camera {id} has an unknown type"))),
    }
}

pub(crate) fn convert_light(session: &Session, id: usize) -> ImportResult<LightData> {
    let lights = lights(session.document().root());
    let light = lights
        .get(id)
        .ok_or_else(|| ImportError::dangling("light", id, lights.len()))?;

    let light_type = match light.type_ {
        Checked::Valid(SourceLightType::Directional) => LightType::Infinite,
        Checked::Valid(SourceLightType::Point) => LightType::Point,
        Checked::Valid(SourceLightType::Spot) => LightType::Spot,
        Checked::Invalid => {
            return Err(ImportError::Malformed(format!("light {id} has an unknown type")));
        }
    };

    Ok(LightData {
        light_type,
        color: Vec3::from(light.color),
        intensity: light.intensity,
        provenance: session.provenance(EntityRef::Light(id)),
    })
}
