//! Cameras and lights produced by the importer.

use trove_math::{Vec2, Vec3};

use crate::provenance::Provenance;

/// Camera projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    Perspective {
        /// Horizontal field of view in radians
        fov: f32,
        /// Width / height
        aspect_ratio: f32,
    },
    Orthographic {
        /// Full width and height of the view volume
        size: Vec2,
    },
}

/// Imported camera.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraData {
    pub projection: Projection,
    pub near: f32,
    /// Infinity for perspective cameras without a far plane
    pub far: f32,
    pub provenance: Option<Provenance>,
}

impl CameraData {
    /// Build a perspective camera from glTF's vertical field of view and
    /// aspect ratio.
    pub fn from_vertical_fov(
        yfov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
        provenance: Option<Provenance>,
    ) -> Self {
        let fov = 2.0 * ((yfov * 0.5).tan() * aspect_ratio).atan();
        Self {
            projection: Projection::Perspective { fov, aspect_ratio },
            near,
            far,
            provenance,
        }
    }
}

/// Light type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightType {
    /// Directional light, infinitely far away
    Infinite,
    Point,
    Spot,
}

/// Imported light.
#[derive(Clone, Debug, PartialEq)]
pub struct LightData {
    pub light_type: LightType,
    pub color: Vec3,
    pub intensity: f32,
    pub provenance: Option<Provenance>,
}
