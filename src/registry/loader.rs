//! Input loading from disk.
//!
//! The only fallible surface of the crate: everything inside the derivation
//! recovers locally, but unreadable or unparsable input files abort the run.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::placement::PlacementRecord;
use crate::registry::snapshot::RegistrySnapshot;

/// Error type for input loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File could not be read.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// File contents did not parse as the expected structure.
    #[error("Parse error in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Load a registry snapshot from a JSON file.
pub fn load_registry(path: &Path) -> Result<RegistrySnapshot, LoadError> {
    load_json(path)
}

/// Load placement records from a JSON file. Records are expected pre-sorted
/// by ordering key ascending, as documented on [`PlacementRecord`].
pub fn load_placements(path: &Path) -> Result<Vec<PlacementRecord>, LoadError> {
    load_json(path)
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.display().to_string(),
        source,
    })
}
