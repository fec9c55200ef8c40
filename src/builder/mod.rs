//! Builder module for (re)indexing a source corpus
//!
//! This module contains everything that runs while a store is rebuilt:
//! corpus parsing, definition appends, index construction and the final
//! snapshot write.

pub mod index_builder;
pub mod source_loader;
pub mod store_config;

// Re-export commonly used types for convenience
pub use index_builder::{BuildStats, IndexBuilder};
pub use source_loader::{SourceLoader, SourceRecord};
pub use store_config::StoreConfig;
