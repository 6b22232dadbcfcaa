//! Error types for document loading and per-entity conversion.

use thiserror::Error;

use crate::document::DocumentError;
use crate::image_importer::ImageError;

/// Errors that can occur while converting a single entity.
///
/// Everything except [`ImportError::Document`] is local to the entity being
/// converted; the opened document stays usable.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("no file opened")]
    NotOpened,

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("{kind} index {index} out of range for {count} entries")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        count: usize,
    },

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("unsupported {attribute} attribute type {format}")]
    UnsupportedAttributeType { attribute: String, format: String },

    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    #[error("conflicting texture transform: {0}")]
    ConflictingTextureTransform(String),

    #[error("{channel} texture uses texture coordinate set {set}, enable allowMaterialTextureCoordinateSets to import it")]
    TextureCoordinateSetNotAllowed { channel: &'static str, set: u32 },

    #[error("Image error: {0}")]
    Image(#[from] ImageError),
}

impl ImportError {
    /// Shorthand for a dangling reference between document records.
    pub(crate) fn dangling(what: &str, index: usize, count: usize) -> Self {
        ImportError::Malformed(format!(
            "{what} index {index} out of range for {count} entries"
        ))
    }
}

/// Result type for conversion operations.
pub type ImportResult<T> = Result<T, ImportError>;
