//! Texture conversion and image delegation.

use gltf::json::validation::Checked;

use crate::document::{
    decode_data_uri, resolve_uri, texture_basis_source, with_loaded_file, DocumentError, FileLoader,
};
use crate::error::{ImportError, ImportResult};
use crate::image_importer::{ImageImporter, ImageResult};
use crate::provenance::EntityRef;
use crate::texture::{SamplerFilter, SamplerMipmap, SamplerWrapping, TextureData, TextureType};

use super::session::Session;

fn valid<T: Clone>(value: &Checked<T>, what: &str, sampler: usize) -> ImportResult<T> {
    match value {
        Checked::Valid(value) => Ok(value.clone()),
        Checked::Invalid => Err(ImportError::Malformed(format!(
            "sampler {sampler} has an invalid {what}"
        ))),
    }
}

pub(crate) fn convert_texture(session: &Session, id: usize) -> ImportResult<TextureData> {
    let root = session.document().root();
    let texture = root
        .textures
        .get(id)
        .ok_or_else(|| ImportError::dangling("texture", id, root.textures.len()))?;

    // GOOGLE_texture_basis takes precedence over the core source
    let image = texture_basis_source(texture).unwrap_or(texture.source.value());
    if image >= root.images.len() {
        return Err(ImportError::dangling("image", image, root.images.len()));
    }

    let mut magnification_filter = SamplerFilter::Linear;
    let mut minification_filter = SamplerFilter::Linear;
    let mut mipmap_filter = SamplerMipmap::Linear;
    let mut wrapping_xy = [SamplerWrapping::Repeat; 2];

    if let Some(sampler_index) = texture.sampler.as_ref().map(|sampler| sampler.value()) {
        let sampler = root
            .samplers
            .get(sampler_index)
            .ok_or_else(|| ImportError::dangling("sampler", sampler_index, root.samplers.len()))?;

        if let Some(filter) = &sampler.mag_filter {
            magnification_filter = valid(filter, "magnification filter", sampler_index)?.into();
        }
        if let Some(filter) = &sampler.min_filter {
            (minification_filter, mipmap_filter) =
                SamplerFilter::from_min_filter(valid(filter, "minification filter", sampler_index)?);
        }
        wrapping_xy = [
            valid(&sampler.wrap_s, "wrapping", sampler_index)?.into(),
            valid(&sampler.wrap_t, "wrapping", sampler_index)?.into(),
        ];
    }

    Ok(TextureData {
        texture_type: TextureType::Texture2D,
        minification_filter,
        magnification_filter,
        mipmap_filter,
        wrapping: [wrapping_xy[0], wrapping_xy[1], SamplerWrapping::Repeat],
        image,
        provenance: session.provenance(EntityRef::Texture(id)),
    })
}

/// Open an image's payload in `importer`, run `f` on it and close it again.
///
/// Payloads come from a buffer view, an embedded data URI or an external file
/// loaded through `loader`. External files are closed as soon as the image
/// importer has taken them.
pub(crate) fn with_opened_image<T>(
    session: &Session,
    loader: &mut dyn FileLoader,
    importer: &mut dyn ImageImporter,
    id: usize,
    f: impl FnOnce(&mut dyn ImageImporter) -> ImageResult<T>,
) -> ImportResult<T> {
    let document = session.document();
    let root = document.root();
    let image = root
        .images
        .get(id)
        .ok_or_else(|| ImportError::dangling("image", id, root.images.len()))?;
    let mime_type = image.mime_type.as_ref().map(|mime_type| mime_type.0.as_str());

    let opened = if let Some(view) = image.buffer_view.as_ref().map(|view| view.value()) {
        let data = document.buffer_view_bytes(view).ok_or_else(|| {
            ImportError::Malformed(format!("buffer view {view} of image {id} is out of bounds"))
        })?;
        importer.open_data(data, mime_type).map_err(ImportError::from)
    } else if let Some(uri) = &image.uri {
        if let Some(decoded) = decode_data_uri(uri) {
            let data = decoded?;
            importer.open_data(&data, mime_type).map_err(ImportError::from)
        } else {
            let path = resolve_uri(document.base_dir(), uri);
            log::debug!("Loading image {} from {}", id, path.display());
            with_loaded_file(loader, &path, |data| importer.open_data(data, mime_type))
                .map_err(DocumentError::from)?
                .map_err(ImportError::from)
        }
    } else {
        return Err(ImportError::Malformed(format!(
            "image {id} has neither a URI nor a buffer view"
        )));
    };

    let result = opened.and_then(|()| f(&mut *importer).map_err(ImportError::from));
    importer.close();
    result
}
