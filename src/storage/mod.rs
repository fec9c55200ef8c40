// Storage and core data structures for the dictionary index
//
// This module provides the in-memory prefix tree, the append-only definition
// store it points into, and the snapshot codec that persists the tree.

pub mod trie_node;
pub mod definition_store;
pub mod snapshot;

pub use trie_node::{PrefixIndex, TrieNode};
pub use definition_store::DefinitionStore;
pub use snapshot::{read_snapshot, write_snapshot, SnapshotInfo};
