// Quaternion track utilities
//
// Post-processing applied to imported rotations so consumers can rely on
// unit-length keyframes and use plain (non shortest-path) interpolation.

use glam::Quat;

/// Tolerance on the squared length when deciding a quaternion is unit length.
const UNIT_LENGTH_SQUARED_EPSILON: f32 = 2.0e-5;

/// Returns true if the quaternion is unit length within float tolerance.
pub fn is_unit_quat(q: Quat) -> bool {
    (q.length_squared() - 1.0).abs() < UNIT_LENGTH_SQUARED_EPSILON
}

/// Normalize a quaternion, mapping a zero-length one to identity.
pub fn normalize_or_identity(q: Quat) -> Quat {
    if q.length_squared() > 0.0 {
        q.normalize()
    } else {
        Quat::IDENTITY
    }
}

/// Extension trait for slices of keyframe quaternions.
pub trait QuatTrackExt {
    /// Normalize every non-unit quaternion in place. Zero-length keys
    /// become identity.
    ///
    /// Returns the number of quaternions that were changed.
    fn renormalize(&mut self) -> usize;

    /// Flip signs so that the dot product of every adjacent pair is
    /// non-negative.
    ///
    /// Each key is compared against its already-flipped predecessor, so the
    /// result is a pairwise choice, not a global optimum over the track.
    fn make_shortest_path(&mut self);
}

impl QuatTrackExt for [Quat] {
    fn renormalize(&mut self) -> usize {
        let mut changed = 0;
        for q in self.iter_mut() {
            if !is_unit_quat(*q) {
                *q = normalize_or_identity(*q);
                changed += 1;
            }
        }
        changed
    }

    fn make_shortest_path(&mut self) {
        for i in 1..self.len() {
            if self[i - 1].dot(self[i]) < 0.0 {
                self[i] = -self[i];
            }
        }
    }
}
