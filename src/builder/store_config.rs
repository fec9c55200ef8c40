//! Configuration for opening and rebuilding a dictionary store.
//!
//! # Examples
//!
//! ```no_run
//! use dictrie::builder::StoreConfig;
//!
//! # fn main() -> dictrie::Result<()> {
//! // Side-car files next to the corpus: words.idx and words.dat
//! let config = StoreConfig::from_source("/data/words.txt");
//!
//! // Or load everything from JSON
//! let config = StoreConfig::from_json_file("dictrie.json")?;
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::storage::snapshot::snapshot_temp_path;
use crate::{DictError, Result};

/// Maximum length of a dictionary keyword in bytes.
pub const MAX_KEYWORD_LENGTH: usize = 255;

pub const INDEX_EXT: &str = "idx";
pub const DATA_EXT: &str = "dat";

/// Locations of the three files a store works with, plus indexing limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Snapshot of the prefix index
    pub index_path: PathBuf,
    /// Append-only definition store
    pub data_path: PathBuf,
    /// `word:meaning` source corpus
    pub source_path: PathBuf,
    /// Words longer than this many bytes are skipped during indexing
    pub max_keyword_length: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            index_path: PathBuf::from("dict.idx"),
            data_path: PathBuf::from("dict.dat"),
            source_path: PathBuf::from("dict.txt"),
            max_keyword_length: MAX_KEYWORD_LENGTH,
        }
    }
}

impl StoreConfig {
    /// Derives the snapshot and definition store paths from the corpus path
    /// by swapping its extension.
    pub fn from_source<P: AsRef<Path>>(source_path: P) -> Self {
        let source_path = source_path.as_ref().to_path_buf();
        Self {
            index_path: source_path.with_extension(INDEX_EXT),
            data_path: source_path.with_extension(DATA_EXT),
            source_path,
            max_keyword_length: MAX_KEYWORD_LENGTH,
        }
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that the corpus, the definition store, the snapshot and the
    /// snapshot's staging file are four different files.
    ///
    /// Rebuilding truncates the store and replaces the snapshot, so any
    /// overlap would destroy the corpus or the freshly written definitions.
    pub fn validate(&self) -> Result<()> {
        let snapshot_tmp = snapshot_temp_path(&self.index_path);
        let files = [
            ("source_path", self.source_path.as_path()),
            ("data_path", self.data_path.as_path()),
            ("index_path", self.index_path.as_path()),
            ("snapshot staging file", snapshot_tmp.as_path()),
        ];
        let resolved: Vec<PathBuf> = files.iter().map(|(_, path)| resolve_path(path)).collect();
        for i in 0..files.len() {
            for j in i + 1..files.len() {
                if resolved[i] == resolved[j] {
                    return Err(DictError::invalid_parameter(format!(
                        "{} and {} both refer to {}",
                        files[i].0,
                        files[j].0,
                        files[i].1.display()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Canonical form of existing files, absolute form of files still to be
/// created.
fn resolve_path(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_source_swaps_extension() {
        let config = StoreConfig::from_source("/tmp/words.txt");
        assert_eq!(config.index_path, PathBuf::from("/tmp/words.idx"));
        assert_eq!(config.data_path, PathBuf::from("/tmp/words.dat"));
        assert_eq!(config.source_path, PathBuf::from("/tmp/words.txt"));
    }

    #[test]
    fn test_json_round_trip() {
        let config = StoreConfig::from_source("corpus.txt");
        let json = config.to_json_string().unwrap();
        assert_eq!(StoreConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_json_missing_fields_use_defaults() {
        let config = StoreConfig::from_json_str(r#"{"source_path": "en.txt"}"#).unwrap();
        assert_eq!(config.source_path, PathBuf::from("en.txt"));
        assert_eq!(config.index_path, PathBuf::from("dict.idx"));
        assert_eq!(config.max_keyword_length, MAX_KEYWORD_LENGTH);
    }

    #[test]
    fn test_default_config_is_valid() {
        StoreConfig::default().validate().unwrap();
        StoreConfig::from_source("/tmp/words.txt").validate().unwrap();
    }

    #[test]
    fn test_rejects_corpus_shared_with_side_car_files() {
        for name in ["words.dat", "words.idx"] {
            let err = StoreConfig::from_source(name).validate().err().unwrap();
            assert!(matches!(err, DictError::InvalidParameter { .. }), "name={name}");
        }
    }

    #[test]
    fn test_rejects_corpus_named_like_staging_file() {
        let mut config = StoreConfig::from_source("words.txt");
        config.source_path = PathBuf::from("words.idx.tmp");
        assert!(config.validate().is_err());
        // The staging file is derived from the full snapshot name.
        StoreConfig::from_source("words.tmp").validate().unwrap();
    }

    #[test]
    fn test_rejects_same_file_through_different_spelling() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("words.txt");
        fs::write(&source, "dog:canine\n").unwrap();
        let mut config = StoreConfig::from_source(&source);
        config.data_path = dir.path().join(".").join("words.txt");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_with_colliding_paths() {
        let json = r#"{"source_path": "en.txt", "data_path": "en.txt"}"#;
        assert!(matches!(
            StoreConfig::from_json_str(json),
            Err(DictError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            StoreConfig::from_json_str("{not json"),
            Err(DictError::ParserError { .. })
        ));
    }
}
