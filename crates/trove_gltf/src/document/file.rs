//! External file access for buffers and images.

use std::io;
use std::path::{Path, PathBuf};

/// Loads external resources referenced by a document.
///
/// Every successful [`FileLoader::load`] is followed by exactly one
/// [`FileLoader::close`] for the same path once the data is no longer
/// needed. Data is never kept past that call.
pub trait FileLoader {
    /// Load the whole file at `path`.
    fn load(&mut self, path: &Path) -> io::Result<Vec<u8>>;

    /// Release whatever backs a previous `load()` of `path`.
    fn close(&mut self, _path: &Path) {}
}

/// Loads files straight from the filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsLoader;

impl FileLoader for FsLoader {
    fn load(&mut self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// Load a file temporarily, hand it to `f`, then close it again.
pub fn with_loaded_file<T>(
    loader: &mut dyn FileLoader,
    path: &Path,
    f: impl FnOnce(&[u8]) -> T,
) -> io::Result<T> {
    let data = loader.load(path)?;
    let result = f(&data);
    drop(data);
    loader.close(path);
    Ok(result)
}

/// Resolve a relative URI against the document's base directory.
pub fn resolve_uri(base_dir: Option<&Path>, uri: &str) -> PathBuf {
    let path = Path::new(uri);

    if path.is_absolute() {
        path.to_path_buf()
    } else if let Some(base) = base_dir {
        base.join(path)
    } else {
        path.to_path_buf()
    }
}
