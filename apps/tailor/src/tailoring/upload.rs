//! Upload validation and the per-request scratch file.

use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tempfile::TempPath;
use tracing::{error, info};

use crate::tailoring::error::TailorError;

/// The only accepted resume format.
pub const ALLOWED_EXTENSION: &str = "docx";

/// An uploaded file part as received from the form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

/// A file part that passed validation, carrying its sanitized name.
#[derive(Debug)]
pub struct ValidUpload {
    pub safe_name: String,
    pub data: Bytes,
}

/// True when `filename` ends in `.docx`, in any case.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(ALLOWED_EXTENSION))
}

/// Reduces a client-supplied filename to `[A-Za-z0-9._-]`, spaces becoming `_`.
/// Names with path separators, NUL, or `..` are rejected outright.
pub fn sanitize_filename(filename: &str) -> Option<String> {
    if filename.contains(&['/', '\\', '\0'][..]) || filename.contains("..") {
        return None;
    }
    let cleaned: String = filename
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches(&['.', '_'][..]).to_string();
    if allowed_file(&cleaned) && cleaned.len() > ALLOWED_EXTENSION.len() + 1 {
        Some(cleaned)
    } else {
        None
    }
}

/// Checks the file part in form order: present, named, `.docx`, safe name.
/// Nothing touches disk here.
pub fn validate_upload(file: Option<UploadedFile>) -> Result<ValidUpload, TailorError> {
    let file = file.ok_or(TailorError::MissingFilePart)?;
    if file.filename.is_empty() {
        return Err(TailorError::EmptyFilename);
    }
    if !allowed_file(&file.filename) {
        return Err(TailorError::UnsupportedFileType);
    }
    let safe_name = sanitize_filename(&file.filename).ok_or(TailorError::UnsafeFilename)?;
    Ok(ValidUpload {
        safe_name,
        data: file.data,
    })
}

/// The upload's on-disk copy. Removed when dropped, on every path out of a
/// request, including unwinding.
#[derive(Debug)]
pub struct ScratchUpload {
    path: PathBuf,
    temp: Option<TempPath>,
}

impl ScratchUpload {
    /// Writes `upload` into `dir` under a unique name derived from its sanitized filename.
    pub fn persist(dir: &Path, upload: &ValidUpload) -> std::io::Result<Self> {
        let stem = upload
            .safe_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&upload.safe_name);

        let mut file = tempfile::Builder::new()
            .prefix(&format!("{stem}-"))
            .suffix(&format!(".{ALLOWED_EXTENSION}"))
            .tempfile_in(dir)?;
        file.write_all(&upload.data)?;
        file.flush()?;

        let temp = file.into_temp_path();
        let path = temp.to_path_buf();
        info!("Resume file saved to: {}", path.display());
        Ok(Self {
            path,
            temp: Some(temp),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchUpload {
    fn drop(&mut self) {
        if let Some(temp) = self.temp.take() {
            match temp.close() {
                Ok(()) => info!("Cleaned up uploaded file: {}", self.path.display()),
                Err(e) => error!("Error removing uploaded file {}: {e}", self.path.display()),
            }
        }
    }
}
