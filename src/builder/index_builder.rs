//! Builds a prefix index and definition store from a source corpus.
//!
//! Indexing is all-or-nothing:
//!
//! 1. The configured paths are checked to be distinct files, then the corpus
//!    is opened; if either fails nothing on disk is touched.
//! 2. Any existing snapshot is removed, then the definition store is truncated.
//! 3. Every record's meaning is appended to the store and its word inserted
//!    into the index with the offset the append started at.
//! 4. The snapshot is written once, after the last record.
//!
//! A crash anywhere before step 4 leaves no snapshot behind, so the next open
//! rebuilds again.
//!
//! # Examples
//!
//! ```no_run
//! use dictrie::builder::{IndexBuilder, StoreConfig};
//!
//! # fn main() -> dictrie::Result<()> {
//! let config = StoreConfig::from_source("words.txt");
//! let (index, _store, stats) = IndexBuilder::build(&config, None)?;
//! println!("{} entries, {} keys", stats.entries, index.len());
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::io::{self, BufRead};

use log::*;

use crate::builder::source_loader::SourceLoader;
use crate::builder::store_config::StoreConfig;
use crate::storage::definition_store::DefinitionStore;
use crate::storage::snapshot::write_snapshot;
use crate::storage::trie_node::PrefixIndex;
use crate::utils::progress_report::{ProgressReportFn, ProgressState};
use crate::{DictError, Result};

/// Counters from one indexing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Records appended to the store (duplicates included)
    pub entries: u64,
    /// Malformed lines that were not indexed
    pub skipped: u64,
}

pub struct IndexBuilder;

impl IndexBuilder {
    /// Rebuilds the definition store and snapshot named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DictError::InvalidParameter`] if two configured paths name
    /// the same file, [`DictError::SourceUnavailable`] if the corpus cannot
    /// be opened, and [`DictError::UserInterrupted`] if `prog_rpt` cancels.
    pub fn build(config: &StoreConfig, prog_rpt: Option<ProgressReportFn>) -> Result<(PrefixIndex, DefinitionStore, BuildStats)> {
        config.validate()?;
        let (loader, total_size) = SourceLoader::open(&config.source_path, config.max_keyword_length)?;

        match fs::remove_file(&config.index_path) {
            Ok(()) => debug!("Removed stale snapshot {}", config.index_path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        let mut store = DefinitionStore::create(&config.data_path)?;
        let mut progress = ProgressState::new("IndexBuilder::build", total_size, 10, prog_rpt);

        let (index, stats) = Self::index_records(loader, &mut store, &mut progress)?;
        store.sync()?;
        write_snapshot(&config.index_path, &index, store.len())?;

        info!(
            "Indexing done with {} entries ({} keys, {} lines skipped)",
            stats.entries,
            index.len(),
            stats.skipped
        );
        Ok((index, store, stats))
    }

    /// Drains `loader` into `store` and a fresh index.
    pub fn index_records<R: BufRead>(
        mut loader: SourceLoader<R>,
        store: &mut DefinitionStore,
        progress: &mut ProgressState,
    ) -> Result<(PrefixIndex, BuildStats)> {
        let mut index = PrefixIndex::new();
        let mut stats = BuildStats::default();

        while let Some(record) = loader.next_record()? {
            let offset = store.append(&record.meaning)?;
            index.insert(&record.word, offset);
            stats.entries += 1;
            if progress.report(loader.bytes_read()) {
                info!("Indexing cancelled at line {}", record.line_no);
                return Err(DictError::user_interrupted());
            }
        }
        stats.skipped = loader.skipped();
        Ok((index, stats))
    }
}
