//! Keyframe animation produced by the importer.

use trove_math::{CubicHermite, Interval, Quat, Vec3};

use crate::document::json;
use crate::provenance::Provenance;

/// How values between keyframes are computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
    /// Hold the previous keyframe (glTF `STEP`)
    Constant,
    Linear,
    /// Cubic Hermite spline (glTF `CUBICSPLINE`)
    Spline,
}

impl From<json::animation::Interpolation> for Interpolation {
    fn from(interpolation: json::animation::Interpolation) -> Self {
        match interpolation {
            json::animation::Interpolation::Step => Interpolation::Constant,
            json::animation::Interpolation::Linear => Interpolation::Linear,
            json::animation::Interpolation::CubicSpline => Interpolation::Spline,
        }
    }
}

/// What happens outside of the keyframe range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extrapolation {
    /// Hold the first / last value
    Constant,
}

/// Animated object property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackTarget {
    Translation3D,
    Rotation3D,
    Scaling3D,
}

/// Keyframe values of a track.
#[derive(Clone, Debug, PartialEq)]
pub enum TrackValues {
    Vector3(Vec<Vec3>),
    Quaternion(Vec<Quat>),
    CubicHermite3D(Vec<CubicHermite<Vec3>>),
    CubicHermiteQuaternion(Vec<CubicHermite<Quat>>),
}

impl TrackValues {
    pub fn len(&self) -> usize {
        match self {
            TrackValues::Vector3(v) => v.len(),
            TrackValues::Quaternion(v) => v.len(),
            TrackValues::CubicHermite3D(v) => v.len(),
            TrackValues::CubicHermiteQuaternion(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One animated property of one object.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationTrack {
    /// Object index, always the first object of a node's expansion
    pub target_object: usize,
    pub target: TrackTarget,
    pub interpolation: Interpolation,
    pub before: Extrapolation,
    pub after: Extrapolation,
    pub times: Vec<f32>,
    pub values: TrackValues,
}

impl AnimationTrack {
    /// Time range covered by the keyframes.
    pub fn duration(&self) -> Interval {
        Interval::enclosing(&self.times)
    }
}

/// Imported animation clip.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationData {
    pub tracks: Vec<AnimationTrack>,

    /// Time range covered by all tracks
    pub duration: Interval,

    /// Source record; `None` for merged clips
    pub provenance: Option<Provenance>,
}

impl AnimationData {
    pub fn new(tracks: Vec<AnimationTrack>, provenance: Option<Provenance>) -> Self {
        let duration = tracks
            .iter()
            .map(AnimationTrack::duration)
            .fold(Interval::EMPTY, |acc, d| Interval::surrounding(&acc, &d));
        Self {
            tracks,
            duration,
            provenance,
        }
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }
}
