//! Files pushed directly into the backup directory by clients.

use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// Body of a save request. `file_content` is the hex encoding of the bytes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavePayload {
    pub filename: String,
    pub file_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub filename: String,
    pub size: usize,
    pub path: PathBuf,
}

#[derive(thiserror::Error, Debug)]
pub enum IngressError {
    #[error("Filename is required")]
    MissingFilename,

    #[error("File content is required")]
    MissingContent,

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Invalid file content format")]
    InvalidEncoding(#[from] hex::FromHexError),

    #[error("Failed to save file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SavePayload {
    /// Check the request and decode its content. Touches nothing on disk.
    pub fn decode(&self) -> Result<Vec<u8>, IngressError> {
        if self.filename.is_empty() {
            return Err(IngressError::MissingFilename);
        }
        if self.file_content.is_empty() {
            return Err(IngressError::MissingContent);
        }
        if !is_plain_file_name(&self.filename) {
            return Err(IngressError::InvalidFilename(self.filename.clone()));
        }
        Ok(hex::decode(&self.file_content)?)
    }
}

/// A name is accepted only if it is exactly one normal path component, so a
/// write can never land outside the backup root.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if c == name
    )
}

/// Validate `payload` and write its bytes to `backup_dir/filename`,
/// truncating any existing file of that name.
pub async fn save_payload(backup_dir: &Path, payload: &SavePayload) -> Result<SavedFile, IngressError> {
    let bytes = payload.decode()?;
    let path = backup_dir.join(&payload.filename);

    tokio::fs::create_dir_all(backup_dir)
        .await
        .map_err(|e| IngressError::Write {
            path: backup_dir.to_path_buf(),
            source: e,
        })?;
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| IngressError::Write {
            path: path.clone(),
            source: e,
        })?;

    tracing::info!(filename = %payload.filename, size = bytes.len(), "Saved ingress file");

    Ok(SavedFile {
        filename: payload.filename.clone(),
        size: bytes.len(),
        path,
    })
}
