use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use crate::media::MediaEntry;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to write manifest {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("manifest key {0:?} is not a numeric identifier")]
    InvalidKey(String),

    #[error("identifier range {first}..={last} is empty")]
    InvalidRange { first: u32, last: u32 },
}

/// Media found in one numbered folder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextRecord {
    pub media: Vec<MediaEntry>,
}

impl ContextRecord {
    pub fn is_empty(&self) -> bool {
        self.media.is_empty()
    }
}

/// Identifier -> record, serialized as a JSON object keyed "1", "2", ... in numeric order
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, ContextRecord>")]
pub struct Manifest {
    contexts: BTreeMap<u32, ContextRecord>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: u32, record: ContextRecord) {
        self.contexts.insert(id, record);
    }

    pub fn get(&self, id: u32) -> Option<&ContextRecord> {
        self.contexts.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.contexts.contains_key(&id)
    }

    /// Number of identifiers present
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &ContextRecord)> {
        self.contexts.iter().map(|(id, record)| (*id, record))
    }

    /// Total media entries across all identifiers
    pub fn total_media(&self) -> usize {
        self.contexts.values().map(|r| r.media.len()).sum()
    }

    /// Pretty JSON with two-space indent and non-ASCII kept literal
    pub fn render(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// blake3 digest of the rendered manifest
    pub fn digest(&self) -> Result<String, ManifestError> {
        let rendered = self.render()?;
        Ok(digest_bytes(rendered.as_bytes()))
    }

    /// Write the manifest as UTF-8, replacing `path` only once the whole document is on disk
    pub fn write(&self, path: &Path) -> Result<(), ManifestError> {
        let data = self.render()?;

        let mut temp = OsString::from(path.as_os_str());
        temp.push(".tmp");
        let temp_path = PathBuf::from(temp);

        let to_write_error = |source: io::Error| ManifestError::Write {
            path: path.to_path_buf(),
            source,
        };

        fs::write(&temp_path, data.as_bytes()).map_err(to_write_error)?;
        if let Err(source) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(to_write_error(source));
        }

        Ok(())
    }

    /// True when `path` holds exactly the bytes `write` would produce now
    pub fn is_current(&self, path: &Path) -> Result<bool, ManifestError> {
        if !path.exists() {
            return Ok(false);
        }
        let on_disk = fs::read(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(digest_bytes(&on_disk) == self.digest()?)
    }

    /// Read a manifest previously written by `write`
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let data = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// blake3 hex digest of raw bytes, used to compare an on-disk manifest with a fresh one
pub fn digest_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.contexts.len()))?;
        for (id, record) in &self.contexts {
            map.serialize_entry(&id.to_string(), record)?;
        }
        map.end()
    }
}

impl TryFrom<BTreeMap<String, ContextRecord>> for Manifest {
    type Error = ManifestError;

    fn try_from(raw: BTreeMap<String, ContextRecord>) -> Result<Self, Self::Error> {
        let mut manifest = Manifest::new();
        for (key, record) in raw {
            let id = key
                .parse::<u32>()
                .map_err(|_| ManifestError::InvalidKey(key.clone()))?;
            manifest.insert(id, record);
        }
        Ok(manifest)
    }
}
