//! Importer configuration.

use serde::{Deserialize, Serialize};

/// Default name of the per-vertex object ID attribute.
pub const DEFAULT_OBJECT_ID_ATTRIBUTE: &str = "_OBJECT_ID";

/// Options tuning the import.
///
/// Field names serialize as camelCase, e.g. `normalizeQuaternions`.
///
/// `object_id_attribute` and `texture_coordinate_y_flip_in_material` shape
/// the tables built when a document is opened, so changing them only affects
/// the next open. Everything else is read at conversion time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImporterConfig {
    /// Flip linear rotation keyframes so consecutive quaternions have a
    /// non-negative dot product
    pub optimize_quaternion_shortest_path: bool,

    /// Renormalize non-unit node rotations and linear rotation keyframes,
    /// with a warning
    pub normalize_quaternions: bool,

    /// Merge all animations into a single unnamed clip
    pub merge_animation_clips: bool,

    /// Keep texture coordinates as-is and Y-flip in the material texture
    /// transform instead
    pub texture_coordinate_y_flip_in_material: bool,

    /// Name of the per-vertex object ID attribute
    pub object_id_attribute: String,

    /// Allow material textures to use coordinate sets other than the first
    pub allow_material_texture_coordinate_sets: bool,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            optimize_quaternion_shortest_path: true,
            normalize_quaternions: true,
            merge_animation_clips: false,
            texture_coordinate_y_flip_in_material: false,
            object_id_attribute: DEFAULT_OBJECT_ID_ATTRIBUTE.to_string(),
            allow_material_texture_coordinate_sets: false,
        }
    }
}

impl ImporterConfig {
    /// Parse options from a JSON object. Missing options keep their defaults.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ImporterConfig::default();
        assert!(config.optimize_quaternion_shortest_path);
        assert!(config.normalize_quaternions);
        assert!(!config.merge_animation_clips);
        assert!(!config.texture_coordinate_y_flip_in_material);
        assert_eq!(config.object_id_attribute, "_OBJECT_ID");
        assert!(!config.allow_material_texture_coordinate_sets);
    }

    #[test]
    fn test_from_json_partial() {
        let config = ImporterConfig::from_json_str(
            r#"{"mergeAnimationClips": true, "objectIdAttribute": "_ID"}"#,
        )
        .unwrap();

        assert!(config.merge_animation_clips);
        assert_eq!(config.object_id_attribute, "_ID");
        // Untouched options keep defaults
        assert!(config.normalize_quaternions);
    }

    #[test]
    fn test_unknown_type_fails() {
        assert!(ImporterConfig::from_json_str(r#"{"normalizeQuaternions": "yes"}"#).is_err());
    }
}
