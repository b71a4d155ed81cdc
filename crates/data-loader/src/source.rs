//! Where the ratings table comes from.
//!
//! An upload (bytes the user handed over) always wins; otherwise the
//! loader falls back to the default ratings path from `LoaderConfig`.

use crate::config::LoaderConfig;
use crate::error::{DataLoadError, Result};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A ratings file supplied explicitly by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read an uploaded file from disk.
    ///
    /// A file that does not exist is reported as missing ratings, the same
    /// as a missing default file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| not_found_as_missing_ratings(e, path))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// The resolved ratings input for one load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingsSource {
    Upload(Upload),
    Path(PathBuf),
}

impl RatingsSource {
    /// Pick the upload if there is one, else the configured default path
    pub fn resolve(upload: Option<Upload>, config: &LoaderConfig) -> Self {
        match upload {
            Some(upload) => RatingsSource::Upload(upload),
            None => RatingsSource::Path(config.default_ratings_path.clone()),
        }
    }

    /// Name used in logs and error messages
    pub fn name(&self) -> String {
        match self {
            RatingsSource::Upload(upload) => upload.name.clone(),
            RatingsSource::Path(path) => path.display().to_string(),
        }
    }

    /// Identity of the input, used as the cache key.
    ///
    /// Uploads are identified by content; files by path, size and
    /// modification time so an edited file invalidates the cache.
    pub fn fingerprint(&self) -> Result<SourceFingerprint> {
        match self {
            RatingsSource::Upload(upload) => {
                let mut hasher = DefaultHasher::new();
                upload.bytes.hash(&mut hasher);
                Ok(SourceFingerprint::Upload {
                    name: upload.name.clone(),
                    len: upload.bytes.len() as u64,
                    content_hash: hasher.finish(),
                })
            }
            RatingsSource::Path(path) => {
                let metadata =
                    fs::metadata(path).map_err(|e| not_found_as_missing_ratings(e, path))?;
                Ok(SourceFingerprint::File {
                    path: path.clone(),
                    len: metadata.len(),
                    modified: metadata.modified().ok(),
                })
            }
        }
    }
}

/// Cache identity of a `RatingsSource`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceFingerprint {
    Upload {
        name: String,
        len: u64,
        content_hash: u64,
    },
    File {
        path: PathBuf,
        len: u64,
        modified: Option<SystemTime>,
    },
}

pub(crate) fn not_found_as_missing_ratings(err: io::Error, path: &Path) -> DataLoadError {
    if err.kind() == io::ErrorKind::NotFound {
        DataLoadError::RatingsNotFound {
            path: path.display().to_string(),
        }
    } else {
        DataLoadError::IoError(err)
    }
}
