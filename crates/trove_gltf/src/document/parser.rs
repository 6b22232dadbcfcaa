//! glTF / GLB parsing and buffer resolution.
//!
//! Only what's needed to produce a [`Document`]: the GLB container (if any)
//! is unpacked by [`gltf::Glb`], the JSON is deserialized into
//! [`gltf::json::Root`] and every buffer is resolved to bytes. Embedded
//! `data:` URIs are recognized only with one of the MIME prefixes in
//! [`DATA_URI_PREFIXES`]; anything else is treated as a file name, which is
//! why non-standard payloads have to be embedded as
//! `data:application/octet-stream`.

use std::borrow::Cow;
use std::path::Path;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use gltf::json::Root;
use gltf::Glb;
use thiserror::Error;

use super::file::{resolve_uri, with_loaded_file, FileLoader};
use super::Document;

/// Errors that can occur while opening a document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid GLB container: {0}")]
    Glb(#[from] gltf::Error),

    #[error("Unsupported glTF version {0:?}")]
    Version(String),

    #[error("Buffer {index}: {message}")]
    Buffer { index: usize, message: String },

    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Data URI prefixes recognized as embedded payloads.
pub const DATA_URI_PREFIXES: &[&str] = &[
    "data:application/octet-stream;base64,",
    "data:application/gltf-buffer;base64,",
    "data:image/jpeg;base64,",
    "data:image/png;base64,",
    "data:image/bmp;base64,",
    "data:image/gif;base64,",
];

const GLB_MAGIC: &[u8; 4] = b"glTF";

/// Extensions the importer understands. Others only produce a warning.
const SUPPORTED_EXTENSIONS: &[&str] = &[
    "KHR_lights_punctual",
    "KHR_texture_transform",
    "KHR_materials_pbrSpecularGlossiness",
    "KHR_mesh_quantization",
    "GOOGLE_texture_basis",
];

/// Base64 payload of a recognized data URI.
pub fn data_uri_payload(uri: &str) -> Option<&str> {
    DATA_URI_PREFIXES
        .iter()
        .find_map(|prefix| uri.strip_prefix(prefix))
}

/// Decode a recognized data URI, or `None` if `uri` isn't one.
pub fn decode_data_uri(uri: &str) -> Option<DocumentResult<Vec<u8>>> {
    data_uri_payload(uri).map(|payload| BASE64_STANDARD.decode(payload).map_err(Into::into))
}

/// Parse glTF JSON or binary glTF and resolve all buffers.
///
/// External buffers are loaded through `loader`, relative to `base_dir`.
pub fn parse_document(
    data: &[u8],
    base_dir: Option<&Path>,
    loader: &mut dyn FileLoader,
) -> DocumentResult<Document> {
    let (json, bin) = if data.starts_with(GLB_MAGIC) {
        let glb = Glb::from_slice(data)?;
        (glb.json, glb.bin)
    } else {
        (Cow::Borrowed(data), None)
    };

    let document = Document::from_json(&json)?;
    let root = document.root();

    if !root.asset.version.starts_with("2.") {
        return Err(DocumentError::Version(root.asset.version.clone()));
    }

    for extension in &root.extensions_required {
        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            log::warn!("Required extension {} is not supported, ignoring", extension);
        }
    }

    let buffers = resolve_buffers(root, bin.as_deref(), base_dir, loader)?;

    Ok(document
        .with_buffers(buffers)
        .with_base_dir(base_dir.map(Path::to_path_buf)))
}

fn resolve_buffers(
    root: &Root,
    bin: Option<&[u8]>,
    base_dir: Option<&Path>,
    loader: &mut dyn FileLoader,
) -> DocumentResult<Vec<Vec<u8>>> {
    let mut buffers = Vec::with_capacity(root.buffers.len());

    for (index, buffer) in root.buffers.iter().enumerate() {
        let data = match &buffer.uri {
            None => match bin {
                Some(bin) if index == 0 => bin.to_vec(),
                _ => {
                    return Err(DocumentError::Buffer {
                        index,
                        message: "no URI and no GLB binary chunk".to_string(),
                    })
                }
            },
            Some(uri) => match decode_data_uri(uri) {
                Some(decoded) => decoded?,
                None => {
                    let path = resolve_uri(base_dir, uri);
                    with_loaded_file(loader, &path, <[u8]>::to_vec).map_err(|e| {
                        DocumentError::Buffer {
                            index,
                            message: format!("failed to load {}: {}", path.display(), e),
                        }
                    })?
                }
            },
        };

        if (data.len() as u64) < buffer.byte_length.0 {
            return Err(DocumentError::Buffer {
                index,
                message: format!(
                    "expected {} bytes but got {}",
                    buffer.byte_length.0,
                    data.len()
                ),
            });
        }

        buffers.push(data);
    }

    Ok(buffers)
}
