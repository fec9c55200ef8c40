// Readers for built dictionaries
//
// This module provides the store that loads (or rebuilds) an index and
// answers searches and definition reads against it.

pub mod dictionary_store;

pub use dictionary_store::{DictionaryStore, LoadOrigin};
