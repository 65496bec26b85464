pub mod server;

use crate::models::photo::PhotoRecord;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode photo metadata: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The whole photo collection, kept as a single JSON array on disk.
///
/// Reads fail open: a missing, unreadable or corrupt document is an empty
/// collection. Writes replace the document through a sibling temp file and a
/// rename, so a reader sees either the old array or the new one.
#[derive(Clone, Debug)]
pub struct PhotoStore {
    path: PathBuf,
}

impl PhotoStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Vec<PhotoRecord> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                log::warn!("could not read {}, treating as empty: {e}", self.path.display());
                return Vec::new();
            }
        };
        if raw.trim().is_empty() {
            return Vec::new();
        }
        match serde_json::from_str(&raw) {
            Ok(photos) => photos,
            Err(e) => {
                log::warn!("could not parse {}, treating as empty: {e}", self.path.display());
                Vec::new()
            }
        }
    }

    pub fn save(&self, photos: &[PhotoRecord]) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(photos)?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io { path: dir.clone(), source })?;

        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("database.json");
        let tmp = dir.join(format!(".{}.{}.tmp", name, uuid::Uuid::new_v4()));
        fs::write(&tmp, &body).map_err(|source| StoreError::Io { path: tmp.clone(), source })?;
        if let Err(source) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::Io { path: self.path.clone(), source });
        }
        Ok(())
    }

    /// Read-modify-write of the whole document. Callers must not run two of
    /// these at once against the same path; see [`server::StoreServer`].
    pub fn append(&self, record: PhotoRecord) -> Result<PhotoRecord, StoreError> {
        let mut photos = self.load();
        photos.push(record.clone());
        self.save(&photos)?;
        Ok(record)
    }
}
