//! Scene graph types produced by the importer.
//!
//! Objects reference each other, meshes, cameras and lights by index; nothing
//! is owned across entities.

use trove_math::{Mat4, Quat, Vec3};

use crate::provenance::Provenance;

/// Transform components that can be composed into a matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Translation
    pub translation: Vec3,

    /// Rotation (as quaternion)
    pub rotation: Quat,

    /// Scale
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Convert to a 4x4 transformation matrix.
    ///
    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// How an object's transform was specified in the source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObjectTransform {
    /// A combined matrix
    Matrix(Mat4),

    /// Separate translation, rotation and scaling
    TranslationRotationScaling(Transform),
}

/// What an object instantiates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectInstance {
    Empty,
    Mesh {
        mesh: usize,
        material: Option<usize>,
    },
    Camera(usize),
    Light(usize),
}

/// One object in the scene graph.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectData {
    /// Child object indices
    pub children: Vec<usize>,

    pub transform: ObjectTransform,

    pub instance: ObjectInstance,

    /// Source record this object came from
    pub provenance: Option<Provenance>,
}

impl ObjectData {
    /// Local transformation matrix.
    pub fn transformation(&self) -> Mat4 {
        match &self.transform {
            ObjectTransform::Matrix(m) => *m,
            ObjectTransform::TranslationRotationScaling(trs) => trs.to_matrix(),
        }
    }

    /// Whether the transform came as separate TRS components.
    pub fn has_translation_rotation_scaling(&self) -> bool {
        matches!(
            self.transform,
            ObjectTransform::TranslationRotationScaling(_)
        )
    }

    pub fn translation(&self) -> Option<Vec3> {
        self.trs().map(|t| t.translation)
    }

    pub fn rotation(&self) -> Option<Quat> {
        self.trs().map(|t| t.rotation)
    }

    pub fn scaling(&self) -> Option<Vec3> {
        self.trs().map(|t| t.scale)
    }

    fn trs(&self) -> Option<&Transform> {
        match &self.transform {
            ObjectTransform::TranslationRotationScaling(trs) => Some(trs),
            ObjectTransform::Matrix(_) => None,
        }
    }
}

/// A scene: the set of root objects.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneData {
    /// Root object indices
    pub children: Vec<usize>,

    /// Source record this scene came from
    pub provenance: Option<Provenance>,
}
