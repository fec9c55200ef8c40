//! # dictrie - Persistent prefix-search dictionary index
//!
//! This crate resolves a typed word or word prefix to dictionary entries
//! drawn from a flat `word:meaning` text corpus.
//!
//! ## Features
//!
//! - **Prefix index**: a character trie over lowercased words, with exact
//!   matches taking priority over prefix expansion
//! - **Definition store**: an append-only file of NUL-terminated definitions
//!   addressed by byte offset
//! - **Snapshots**: the index is persisted to a checksummed side-car file and
//!   reloaded on startup instead of re-indexing
//! - **Self-healing startup**: missing or corrupt files trigger a full rebuild
//!   from the corpus
//!
//! ## Quick Start
//!
//! ```no_run
//! use dictrie::{DictionaryStore, StoreConfig};
//!
//! # fn main() -> dictrie::Result<()> {
//! // Uses dict.idx and dict.dat next to the corpus
//! let mut store = DictionaryStore::open(StoreConfig::from_source("dict.txt"))?;
//!
//! for (word, offset) in store.search("cat") {
//!     let definition = store.read_definition(offset)?;
//!     println!("{}: {}", word, definition);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **Storage**: [`storage`] for the trie, the definition store and snapshots
//! - **Builder**: [`builder`] for corpus parsing and (re)indexing
//! - **Readers**: [`readers`] for the query-side [`DictionaryStore`]
//! - **Utilities**: [`utils`] for progress reporting
//!
//! ## Error Handling
//!
//! All fallible operations return a [`Result<T>`], where errors are
//! represented by [`DictError`]. A search that finds nothing is not an error;
//! reading a bad definition offset is.

pub mod builder;
pub mod error;
pub mod readers;
pub mod storage;
pub mod utils;

// Re-export commonly used types for convenience
pub use builder::{IndexBuilder, StoreConfig};
pub use readers::{DictionaryStore, LoadOrigin};
pub use storage::{DefinitionStore, PrefixIndex, TrieNode};

// Re-export error types for convenience
pub use error::{DictError, Result, snafu};
