//! Importing an avatar image as an inline `data:` URL.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::debug;

use crate::error::{Error, Result};

/// Encode image bytes as a `data:` URL, sniffing the format from the bytes.
///
/// # Errors
///
/// Returns [`Error::AvatarImport`] if the bytes are not a recognised image.
pub fn encode_data_url(bytes: &[u8], origin: &Path) -> Result<String> {
    let format = image::guess_format(bytes)
        .map_err(|_| Error::avatar_import(origin, "unrecognised image format"))?;
    Ok(format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        STANDARD.encode(bytes)
    ))
}

/// Read an image file and encode it as a `data:` URL.
///
/// # Errors
///
/// Returns [`Error::AvatarImport`] if the file cannot be read or is not an image.
pub fn import(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| Error::avatar_import(path, e.to_string()))?;
    let data_url = encode_data_url(&bytes, path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "Avatar imported");
    Ok(data_url)
}
