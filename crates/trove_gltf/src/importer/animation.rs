//! Animation conversion.

use gltf::json::animation::Property;
use gltf::json::validation::Checked;
use trove_math::{CubicHermite, QuatTrackExt};

use crate::animation::{
    AnimationData, AnimationTrack, Extrapolation, Interpolation, TrackTarget, TrackValues,
};
use crate::config::ImporterConfig;
use crate::document::Dimensions;
use crate::error::{ImportError, ImportResult};
use crate::provenance::EntityRef;

use super::accessor::read_accessor;
use super::session::Session;

fn track_target(path: &Checked<Property>) -> ImportResult<TrackTarget> {
    match path {
        Checked::Valid(Property::Translation) => Ok(TrackTarget::Translation3D),
        Checked::Valid(Property::Rotation) => Ok(TrackTarget::Rotation3D),
        Checked::Valid(Property::Scale) => Ok(TrackTarget::Scaling3D),
        Checked::Valid(Property::MorphTargetWeights) => Err(ImportError::Unsupported(
            "morph target weight animation".to_string(),
        )),
        Checked::Invalid => Err(ImportError::Malformed(
            "unknown animation target".to_string(),
        )),
    }
}

/// Append the tracks of one source animation.
fn append_tracks(
    session: &Session,
    config: &ImporterConfig,
    animation_index: usize,
    tracks: &mut Vec<AnimationTrack>,
) -> ImportResult<()> {
    let document = session.document();
    let root = document.root();
    let animation = root
        .animations
        .get(animation_index)
        .ok_or_else(|| ImportError::dangling("animation", animation_index, root.animations.len()))?;

    for (channel_index, channel) in animation.channels.iter().enumerate() {
        let node = channel.target.node.value();
        let sampler_index = channel.sampler.value();
        let sampler = animation.samplers.get(sampler_index).ok_or_else(|| {
            ImportError::dangling("animation sampler", sampler_index, animation.samplers.len())
        })?;
        let target_object = session
            .nodes
            .first(node)
            .ok_or_else(|| ImportError::dangling("node", node, root.nodes.len()))?;
        let target = track_target(&channel.target.path)?;
        let interpolation = match &sampler.interpolation {
            Checked::Valid(interpolation) => Interpolation::from(*interpolation),
            Checked::Invalid => {
                return Err(ImportError::Malformed(format!(
                    "animation {animation_index} sampler {sampler_index} has an unknown interpolation"
                )));
            }
        };

        let input = read_accessor(document, sampler.input.value())?;
        if !input.is_float(Dimensions::Scalar) {
            return Err(ImportError::Unsupported(format!(
                "time track type {}",
                input.vertex_format()
            )));
        }

        let output = read_accessor(document, sampler.output.value())?;
        let element = match target {
            TrackTarget::Rotation3D => Dimensions::Vec4,
            TrackTarget::Translation3D | TrackTarget::Scaling3D => Dimensions::Vec3,
        };
        if !output.is_float(element) {
            return Err(ImportError::Unsupported(format!(
                "{:?} track type {}",
                target,
                output.vertex_format()
            )));
        }

        let keys_per_time = if interpolation == Interpolation::Spline { 3 } else { 1 };
        if output.count != input.count * keys_per_time {
            return Err(ImportError::Malformed(format!(
                "animation {} sampler {} has {} times but {} values",
                animation_index, sampler_index, input.count, output.count
            )));
        }

        let values = match (target, interpolation) {
            (TrackTarget::Rotation3D, Interpolation::Spline) => {
                TrackValues::CubicHermiteQuaternion(CubicHermite::from_triplets(&output.quats()))
            }
            (TrackTarget::Rotation3D, Interpolation::Linear) => {
                let mut rotations = output.quats();
                if config.normalize_quaternions {
                    let changed = rotations.renormalize();
                    if changed > 0 {
                        log::warn!(
                            "Animation {} channel {}: {} rotation keyframes were not normalized, renormalizing",
                            animation_index,
                            channel_index,
                            changed
                        );
                    }
                }
                if config.optimize_quaternion_shortest_path {
                    rotations.make_shortest_path();
                }
                TrackValues::Quaternion(rotations)
            }
            (TrackTarget::Rotation3D, _) => TrackValues::Quaternion(output.quats()),
            (_, Interpolation::Spline) => {
                TrackValues::CubicHermite3D(CubicHermite::from_triplets(&output.vec3s()))
            }
            (_, _) => TrackValues::Vector3(output.vec3s()),
        };

        tracks.push(AnimationTrack {
            target_object,
            target,
            interpolation,
            before: Extrapolation::Constant,
            after: Extrapolation::Constant,
            times: input.floats(),
            values,
        });
    }

    Ok(())
}

/// Convert one animation, or all of them merged into one when configured.
pub(crate) fn convert_animation(
    session: &Session,
    config: &ImporterConfig,
    id: usize,
) -> ImportResult<AnimationData> {
    let mut tracks = Vec::new();

    if config.merge_animation_clips {
        let count = session.document().root().animations.len();
        if id != 0 || count == 0 {
            return Err(ImportError::dangling("animation", id, count.min(1)));
        }
        for animation in 0..count {
            append_tracks(session, config, animation, &mut tracks)?;
        }
        return Ok(AnimationData::new(tracks, None));
    }

    append_tracks(session, config, id, &mut tracks)?;
    Ok(AnimationData::new(
        tracks,
        session.provenance(EntityRef::Animation(id)),
    ))
}
