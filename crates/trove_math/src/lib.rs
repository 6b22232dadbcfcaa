// Re-export glam for convenience
pub use glam::*;

// Trove math types
mod interval;
mod quat;
mod spline;
mod texture_transform;

pub use interval::Interval;
pub use quat::{is_unit_quat, normalize_or_identity, QuatTrackExt};
pub use spline::CubicHermite;
pub use texture_transform::{khr_texture_transform, texture_y_flip};
