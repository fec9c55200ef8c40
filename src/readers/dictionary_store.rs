//! High-level dictionary store.
//!
//! A [`DictionaryStore`] owns one prefix index and the definition store its
//! offsets point into. Opening a store tries the persisted snapshot first
//! and falls back to a full rebuild from the source corpus whenever the
//! snapshot or the definition store cannot be used.
//!
//! The store is single-owner: reads seek the shared definition file handle,
//! so [`DictionaryStore::read_definition`] takes `&mut self`.

use log::*;

use crate::builder::index_builder::IndexBuilder;
use crate::builder::store_config::StoreConfig;
use crate::storage::definition_store::DefinitionStore;
use crate::storage::snapshot::read_snapshot;
use crate::storage::trie_node::PrefixIndex;
use crate::utils::progress_report::ProgressReportFn;
use crate::{DictError, Result};

/// How a store reached the ready state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Index loaded from an existing snapshot
    Snapshot,
    /// Index and definition store rebuilt from the source corpus
    Rebuilt,
}

/// Prefix index plus definition store, ready to answer queries.
#[derive(Debug)]
pub struct DictionaryStore {
    config: StoreConfig,
    index: PrefixIndex,
    definitions: DefinitionStore,
    origin: LoadOrigin,
}

impl DictionaryStore {
    /// Opens the store described by `config`, rebuilding it if needed.
    ///
    /// A missing or corrupt snapshot, or a missing definition store, only
    /// triggers a rebuild.
    ///
    /// # Errors
    ///
    /// Fails if two configured paths name the same file, or if a rebuild is
    /// needed and the source corpus cannot be read.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dictrie::{DictionaryStore, StoreConfig};
    ///
    /// # fn main() -> dictrie::Result<()> {
    /// let mut store = DictionaryStore::open(StoreConfig::from_source("dict.txt"))?;
    /// for (word, offset) in store.search("cat") {
    ///     println!("{}: {}", word, store.read_definition(offset)?);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(config: StoreConfig) -> Result<Self> {
        Self::open_with_progress(config, None)
    }

    /// Like [`DictionaryStore::open`], reporting rebuild progress to `prog_rpt`.
    pub fn open_with_progress(config: StoreConfig, prog_rpt: Option<ProgressReportFn>) -> Result<Self> {
        config.validate()?;
        match Self::load(&config) {
            Ok((index, definitions)) => {
                info!(
                    "Index file loaded: {} ({} keys)",
                    config.index_path.display(),
                    index.len()
                );
                Ok(Self { config, index, definitions, origin: LoadOrigin::Snapshot })
            }
            Err(e) => {
                info!("Index file not usable ({}), indexing {}", e, config.source_path.display());
                Self::rebuild_with_progress(config, prog_rpt)
            }
        }
    }

    /// Rebuilds the store from its source corpus regardless of what is on disk.
    pub fn rebuild(config: StoreConfig) -> Result<Self> {
        Self::rebuild_with_progress(config, None)
    }

    pub fn rebuild_with_progress(config: StoreConfig, prog_rpt: Option<ProgressReportFn>) -> Result<Self> {
        let (index, definitions, _) = IndexBuilder::build(&config, prog_rpt)?;
        Ok(Self { config, index, definitions, origin: LoadOrigin::Rebuilt })
    }

    fn load(config: &StoreConfig) -> Result<(PrefixIndex, DefinitionStore)> {
        let (index, info) = read_snapshot(&config.index_path)?;
        let definitions = DefinitionStore::open_read_only(&config.data_path)?;
        if info.store_len != definitions.len() {
            warn!(
                "Snapshot was built against {} bytes of definitions, store has {}",
                info.store_len,
                definitions.len()
            );
            return Err(DictError::invalid_data_format("Snapshot does not match definition store"));
        }
        Ok((index, definitions))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn index(&self) -> &PrefixIndex {
        &self.index
    }

    pub fn origin(&self) -> LoadOrigin {
        self.origin
    }

    /// Number of distinct words in the index.
    pub fn entry_count(&self) -> usize {
        self.index.len()
    }

    /// Candidate `(word, offset)` pairs for a word or word prefix.
    ///
    /// An unknown term yields an empty vector, never an error. Callers must
    /// not assume a single result.
    pub fn search(&self, term: &str) -> Vec<(String, u64)> {
        let hits = self.index.search(term);
        debug!("search({:?}) -> {} candidates", term, hits.len());
        hits
    }

    /// Definition text stored at `offset`.
    ///
    /// # Errors
    ///
    /// [`DictError::OffsetOutOfRange`] or [`DictError::TruncatedDefinition`]
    /// for offsets that do not start a complete record.
    pub fn read_definition(&mut self, offset: u64) -> Result<String> {
        self.definitions.read_definition(offset)
    }

    /// Searches `term` and reads the definition of every candidate.
    pub fn lookup(&mut self, term: &str) -> Result<Vec<(String, String)>> {
        self.search(term)
            .into_iter()
            .map(|(word, offset)| Ok((word, self.read_definition(offset)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;

    const CORPUS: &str = "dog:a domestic animal\ncat:feline\ncatalog:a list of items\ncatapult:a siege engine\nratio:relation a:b\n";

    fn config_in(dir: &Path, corpus: &str) -> StoreConfig {
        let source = dir.join("dict.txt");
        fs::write(&source, corpus).unwrap();
        StoreConfig::from_source(source)
    }

    #[test]
    fn test_first_open_rebuilds_then_loads() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), CORPUS);

        let first = DictionaryStore::open(config.clone()).unwrap();
        assert_eq!(first.origin(), LoadOrigin::Rebuilt);
        drop(first);

        let mut second = DictionaryStore::open(config).unwrap();
        assert_eq!(second.origin(), LoadOrigin::Snapshot);
        assert_eq!(second.entry_count(), 5);
        assert_eq!(
            second.lookup("Dog").unwrap(),
            vec![("dog".to_string(), "a domestic animal".to_string())]
        );
    }

    #[test]
    fn test_definition_retrieval() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DictionaryStore::open(config_in(dir.path(), CORPUS)).unwrap();
        let hits = store.search("dog");
        assert_eq!(hits.len(), 1);
        assert_eq!(store.read_definition(hits[0].1).unwrap(), "a domestic animal");
        assert_eq!(store.lookup("ratio").unwrap()[0].1, "relation a:b");
    }

    #[test]
    fn test_exact_match_and_expansion() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DictionaryStore::open(config_in(dir.path(), CORPUS)).unwrap();
        assert_eq!(store.lookup("cat").unwrap(), vec![("cat".to_string(), "feline".to_string())]);
        let words: Vec<String> = store.search("cata").into_iter().map(|(w, _)| w).collect();
        assert_eq!(words, vec!["catalog", "catapult"]);
        assert!(store.search("zzz").is_empty());
        assert!(store.lookup("zzz").unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_snapshot_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), CORPUS);
        drop(DictionaryStore::open(config.clone()).unwrap());
        fs::write(&config.index_path, b"\x00garbage\xffgarbage garbage garbage garbage").unwrap();

        let mut store = DictionaryStore::open(config).unwrap();
        assert_eq!(store.origin(), LoadOrigin::Rebuilt);
        assert_eq!(store.lookup("cat").unwrap()[0].1, "feline");
    }

    #[test]
    fn test_missing_store_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), CORPUS);
        drop(DictionaryStore::open(config.clone()).unwrap());
        fs::remove_file(&config.data_path).unwrap();

        let mut store = DictionaryStore::open(config).unwrap();
        assert_eq!(store.origin(), LoadOrigin::Rebuilt);
        assert_eq!(store.lookup("dog").unwrap()[0].1, "a domestic animal");
    }

    #[test]
    fn test_mismatched_store_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), CORPUS);
        drop(DictionaryStore::open(config.clone()).unwrap());
        fs::write(&config.data_path, b"other\0").unwrap();

        let store = DictionaryStore::open(config).unwrap();
        assert_eq!(store.origin(), LoadOrigin::Rebuilt);
    }

    #[test]
    fn test_missing_corpus_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::from_source(dir.path().join("absent.txt"));
        let err = DictionaryStore::open(config).err().unwrap();
        assert!(err.is_source_unavailable());
    }

    #[test]
    fn test_tmp_named_corpus_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("words.tmp");
        fs::write(&source, "dog:canine\n").unwrap();
        let config = StoreConfig::from_source(&source);

        drop(DictionaryStore::open(config.clone()).unwrap());
        assert_eq!(fs::read_to_string(&source).unwrap(), "dog:canine\n");
        let mut store = DictionaryStore::rebuild(config).unwrap();
        assert_eq!(store.lookup("dog").unwrap()[0].1, "canine");
    }

    #[test]
    fn test_colliding_paths_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("words.dat");
        fs::write(&source, "dog:canine\n").unwrap();

        let err = DictionaryStore::open(StoreConfig::from_source(&source)).err().unwrap();
        assert!(matches!(err, DictError::InvalidParameter { .. }));
        assert_eq!(fs::read(&source).unwrap(), b"dog:canine\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_store_loads_without_rebuild() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), CORPUS);
        drop(DictionaryStore::open(config.clone()).unwrap());
        fs::set_permissions(&config.data_path, fs::Permissions::from_mode(0o444)).unwrap();

        let mut store = DictionaryStore::open(config).unwrap();
        assert_eq!(store.origin(), LoadOrigin::Snapshot);
        assert_eq!(store.lookup("dog").unwrap()[0].1, "a domestic animal");
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), CORPUS);
        let first = DictionaryStore::rebuild(config.clone()).unwrap();
        let first_hits: Vec<_> = ["c", "cat", "dog", "r", "x"].iter().map(|t| first.search(t)).collect();
        drop(first);

        fs::remove_file(&config.index_path).unwrap();
        fs::remove_file(&config.data_path).unwrap();
        let second = DictionaryStore::rebuild(config).unwrap();
        let second_hits: Vec<_> = ["c", "cat", "dog", "r", "x"].iter().map(|t| second.search(t)).collect();
        assert_eq!(first_hits, second_hits);
    }

    #[test]
    fn test_bad_offsets_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DictionaryStore::open(config_in(dir.path(), CORPUS)).unwrap();
        assert!(matches!(
            store.read_definition(10_000),
            Err(DictError::OffsetOutOfRange { .. })
        ));
    }

    #[test]
    fn test_lines_after_blank_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::open(config_in(dir.path(), "a:first\n\nb:second\n")).unwrap();
        assert_eq!(store.entry_count(), 1);
        assert!(store.search("b").is_empty());
    }
}
