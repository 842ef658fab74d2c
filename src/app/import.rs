//! Dropped and pasted content
//!
//! In `geo` mode text is read as WKT and files by their suffix; the
//! features go into the active layer. In `style` mode a single image file
//! (or an image URL) becomes the point image of the active layer.

use crate::host::{DropMode, GeoFormat, Host, HostError};
use base64::Engine as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Something dropped onto (or pasted into) the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPayload {
    /// Plain text
    Text(String),
    /// Files, in drop order
    Files(Vec<PathBuf>),
}

impl DropPayload {
    /// Classify pasted text: an existing file path becomes a file drop
    #[must_use]
    pub fn from_paste(text: &str) -> Self {
        let trimmed = text.trim();
        let path = Path::new(trimmed);
        if !trimmed.is_empty() && !trimmed.contains('\n') && path.is_file() {
            Self::Files(vec![path.to_path_buf()])
        } else {
            Self::Text(text.to_string())
        }
    }
}

/// What a drop did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Features added to the active layer
    Imported(usize),
    /// Some files were imported before one was refused
    Partial {
        /// Features added before the failure
        imported: usize,
        /// Why the remaining files were not imported
        reason: String,
    },
    /// The active layer's point image was replaced
    StyleImage,
}

/// Apply `payload` to `host` according to `mode`
///
/// Files in `geo` mode are all checked and read before anything is
/// imported. If the host then refuses one of them, the features added so
/// far stay and the outcome is [`DropOutcome::Partial`].
///
/// # Errors
///
/// Returns an error if a file cannot be read or interpreted, or the host
/// refuses the content before anything was added
pub fn handle_drop(
    mode: DropMode,
    payload: &DropPayload,
    host: &mut dyn Host,
) -> Result<DropOutcome, HostError> {
    match mode {
        DropMode::Geo => handle_geo(payload, host),
        DropMode::Style => handle_style(payload, host).map(|()| DropOutcome::StyleImage),
    }
}

fn handle_geo(payload: &DropPayload, host: &mut dyn Host) -> Result<DropOutcome, HostError> {
    match payload {
        DropPayload::Text(text) => {
            debug!("Got text; reading it as WKT");
            host.import_geo(GeoFormat::Wkt, text).map(DropOutcome::Imported)
        }
        DropPayload::Files(files) => {
            let documents = files
                .iter()
                .map(|file| -> Result<_, HostError> {
                    let format = suffix(file)
                        .and_then(GeoFormat::from_suffix)
                        .ok_or_else(|| HostError::UnknownSuffix(file.display().to_string()))?;
                    Ok((file, format, fs::read_to_string(file)?))
                })
                .collect::<Result<Vec<_>, HostError>>()?;

            let mut imported = 0;
            for (file, format, contents) in documents {
                match host.import_geo(format, &contents) {
                    Ok(count) => {
                        info!(file = %file.display(), %format, count, "Imported file");
                        imported += count;
                    }
                    Err(e) if imported == 0 => return Err(e),
                    Err(e) => {
                        warn!(file = %file.display(), error = %e, imported, "Drop stopped");
                        return Ok(DropOutcome::Partial {
                            imported,
                            reason: format!("{}: {e}", file.display()),
                        });
                    }
                }
            }
            Ok(DropOutcome::Imported(imported))
        }
    }
}

fn handle_style(payload: &DropPayload, host: &mut dyn Host) -> Result<(), HostError> {
    match payload {
        DropPayload::Text(text) => {
            let url = text.trim();
            if url.starts_with("data:image/")
                || url.starts_with("http://")
                || url.starts_with("https://")
            {
                host.set_style_image(url)
            } else {
                Err(HostError::NotAnImage(url.to_string()))
            }
        }
        DropPayload::Files(files) => {
            let [file] = files.as_slice() else {
                return Err(HostError::NotAnImage(format!(
                    "{} files (drop exactly one image)",
                    files.len()
                )));
            };
            let url = image_data_url(file)?;
            info!(file = %file.display(), "Using image as point style");
            host.set_style_image(&url)
        }
    }
}

fn suffix(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

fn image_mime(path: &Path) -> Option<&'static str> {
    let mime = match suffix(path)?.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => return None,
    };
    Some(mime)
}

/// Read an image file into a `data:` URL
///
/// # Errors
///
/// Returns an error if the file is not an image or cannot be read
pub fn image_data_url(path: &Path) -> Result<String, HostError> {
    let mime = image_mime(path).ok_or_else(|| HostError::NotAnImage(path.display().to_string()))?;
    let bytes = fs::read(path)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{mime};base64,{encoded}"))
}
