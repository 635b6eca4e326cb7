// StableBuddy - platform/fs.rs
//
// Output directory creation and the overwrite-in-place image write.

use crate::core::model::GeneratedImage;
use crate::util::error::OutputError;
use std::path::Path;

/// Create the output directory (and parents) if it does not exist.
pub fn ensure_output_dir(dir: &Path) -> Result<(), OutputError> {
    std::fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    tracing::debug!(dir = %dir.display(), "Output directory ready");
    Ok(())
}

/// Write the image's PNG bytes to `path`, replacing any existing file.
///
/// Plain overwrite: no temporary file, no rename, no backup of the previous
/// content. Returns the number of bytes written.
pub fn write_image(path: &Path, image: &GeneratedImage) -> Result<usize, OutputError> {
    let bytes = image.png_bytes();
    std::fs::write(path, bytes).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Image written");
    Ok(bytes.len())
}
