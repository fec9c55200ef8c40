//! Append-only definition store.
//!
//! The store is a headerless concatenation of `UTF-8 text || 0x00` records.
//! Records are addressed only by the byte offset of their first text byte,
//! which the prefix index keeps as the value of each key.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::Path;

use log::debug;

use crate::{DictError, Result};

/// Record terminator.
pub const DEFINITION_TERMINATOR: u8 = 0;

/// Owns the single file handle used for both appends and reads.
#[derive(Debug)]
pub struct DefinitionStore {
    file: File,
    len: u64,
}

impl DefinitionStore {
    /// Opens an existing store for reading and appending.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = OpenOptions::new().read(true).write(true).open(path)?;
        let len = file.seek(SeekFrom::End(0))?;
        Ok(Self { file, len })
    }

    /// Opens an existing store for reading only, as used by queries.
    /// [`DefinitionStore::append`] fails on a store opened this way.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let len = file.seek(SeekFrom::End(0))?;
        Ok(Self { file, len })
    }

    /// Creates a store, truncating any previous content.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self { file, len: 0 })
    }

    /// Total store length in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends one definition and returns the offset of its first byte.
    ///
    /// The offset is the end-of-store position at call time. Text containing
    /// a NUL byte cannot be stored and is rejected.
    pub fn append(&mut self, text: &str) -> Result<u64> {
        if text.as_bytes().contains(&DEFINITION_TERMINATOR) {
            return Err(DictError::invalid_parameter("Definition text contains a NUL byte"));
        }
        let offset = self.file.seek(SeekFrom::End(0))?;
        let mut record = Vec::with_capacity(text.len() + 1);
        record.extend_from_slice(text.as_bytes());
        record.push(DEFINITION_TERMINATOR);
        self.file.write_all(&record)?;
        self.len = offset + record.len() as u64;
        Ok(offset)
    }

    /// Flushes appended records to disk.
    pub fn sync(&mut self) -> Result<()> {
        self.file.flush()?;
        self.file.sync_data()?;
        Ok(())
    }

    /// Reads the definition starting at `offset`, up to (excluding) the next
    /// terminator.
    pub fn read_definition(&mut self, offset: u64) -> Result<String> {
        if offset >= self.len {
            return Err(DictError::offset_out_of_range(offset, self.len));
        }
        self.file.seek(SeekFrom::Start(offset))?;
        let mut reader = BufReader::new(&mut self.file);
        let mut data = Vec::new();
        reader.read_until(DEFINITION_TERMINATOR, &mut data)?;
        if data.pop() != Some(DEFINITION_TERMINATOR) {
            debug!("No terminator after offset {} ({} bytes read)", offset, data.len());
            return Err(DictError::truncated_definition(offset));
        }
        Ok(String::from_utf8(data)?)
    }
}
