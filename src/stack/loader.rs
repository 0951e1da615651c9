use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One slice of the stack: its zero-based index and the file it comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContourLayer {
    pub index: usize,
    pub path: PathBuf,
}

impl ContourLayer {
    pub fn new(index: usize, path: PathBuf) -> Self {
        Self { index, path }
    }
}

/// File name of layer `index`: zero-padded to four digits plus the extension
pub fn layer_file_name(index: usize, extension: &str) -> String {
    format!("{index:04}.{extension}")
}

/// Whether `name` follows the `NNNN.ext` convention (four or more digits)
fn matches_convention(name: &str, extension: &str) -> bool {
    let Some((stem, ext)) = name.rsplit_once('.') else {
        return false;
    };
    ext == extension && stem.len() >= 4 && stem.bytes().all(|b| b.is_ascii_digit())
}

/// Enumerate and validate the layer files of `dir`
///
/// The number of layers N is the number of files following the naming
/// convention; each index in `0..N` must then exist as `{index:04}.{extension}`.
/// The whole stack is validated before anything is imported.
pub fn load_stack(dir: &Path, extension: &str) -> Result<Vec<ContourLayer>> {
    let read_err = |source| Error::ReadDir {
        dir: dir.to_path_buf(),
        source,
    };

    let mut count = 0;
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if is_file && matches_convention(&entry.file_name().to_string_lossy(), extension) {
            count += 1;
        }
    }

    if count == 0 {
        return Err(Error::EmptyStack {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
        });
    }

    let layers = (0..count)
        .map(|index| {
            let path = dir.join(layer_file_name(index, extension));
            if path.is_file() {
                Ok(ContourLayer::new(index, path))
            } else {
                Err(Error::MissingIndex {
                    index,
                    expected: path,
                })
            }
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(layers = layers.len(), dir = %dir.display(), "loaded contour stack");
    Ok(layers)
}
