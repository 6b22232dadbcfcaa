// Texture coordinate transforms
//
// 2D homogeneous matrices operating on texture coordinates. glTF puts the
// texture origin at the top left with Y going down; imported data uses a
// bottom-left origin, which is what `texture_y_flip()` converts between.

use glam::{Mat3, Vec2};

/// Matrix mapping `(u, v)` to `(u, 1 - v)`. It is its own inverse.
pub fn texture_y_flip() -> Mat3 {
    Mat3::from_translation(Vec2::Y) * Mat3::from_scale(Vec2::new(1.0, -1.0))
}

/// Matrix for a `KHR_texture_transform` offset/rotation/scale triple.
///
/// The extension applies scale first, then a rotation of the coordinates
/// counter-clockwise in its Y-down space, then the offset.
pub fn khr_texture_transform(offset: Vec2, rotation: f32, scale: Vec2) -> Mat3 {
    Mat3::from_translation(offset) * Mat3::from_angle(-rotation) * Mat3::from_scale(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_y_flip() {
        let flip = texture_y_flip();
        let p = flip.transform_point2(Vec2::new(0.25, 0.25));

        assert!((p.x - 0.25).abs() < 0.001);
        assert!((p.y - 0.75).abs() < 0.001);
    }

    #[test]
    fn test_y_flip_involution() {
        let twice = texture_y_flip() * texture_y_flip();
        assert!(twice.abs_diff_eq(Mat3::IDENTITY, 0.0001));
    }

    #[test]
    fn test_khr_offset_and_scale() {
        let m = khr_texture_transform(Vec2::new(0.5, 0.0), 0.0, Vec2::splat(2.0));
        let p = m.transform_point2(Vec2::new(1.0, 1.0));

        assert!((p.x - 2.5).abs() < 0.001);
        assert!((p.y - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_khr_rotation_direction() {
        use std::f32::consts::FRAC_PI_2;

        // A quarter turn moves +U onto -V in the Y-down space
        let m = khr_texture_transform(Vec2::ZERO, FRAC_PI_2, Vec2::ONE);
        let p = m.transform_point2(Vec2::X);

        assert!(p.x.abs() < 0.001);
        assert!((p.y + 1.0).abs() < 0.001);
    }
}
