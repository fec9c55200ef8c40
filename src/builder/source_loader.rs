use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use log::warn;
use snafu::ResultExt;

use crate::error::SourceUnavailableSnafu;
use crate::storage::definition_store::DEFINITION_TERMINATOR;
use crate::Result;

/// Separates the word from its meaning; only the first occurrence counts.
pub const KEY_SEPARATOR: char = ':';

/// One `word:meaning` line of the source corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    pub word: String,
    pub meaning: String,
    /// 1-based line number in the corpus
    pub line_no: u64,
}

fn skip_utf8_bom(line: &str) -> &str {
    line.strip_prefix('\u{FEFF}').unwrap_or(line)
}

/// Splits a line on its first separator. Meanings may contain further
/// separators; words are assumed not to.
pub fn split_record(line: &str) -> Option<(&str, &str)> {
    line.split_once(KEY_SEPARATOR)
}

/// Streams [`SourceRecord`]s out of a corpus.
///
/// Reading stops at end of input or at the first blank line; anything after
/// a blank line is not part of the dictionary. Malformed lines are skipped
/// with a warning and counted.
pub struct SourceLoader<R: BufRead> {
    reader: R,
    max_keyword_length: usize,
    line_no: u64,
    bytes_read: u64,
    skipped: u64,
    finished: bool,
    line_buffer: Vec<u8>,
}

impl SourceLoader<BufReader<File>> {
    /// Opens the corpus at `path`, returning the loader and the corpus size
    /// in bytes.
    pub fn open<P: AsRef<Path>>(path: P, max_keyword_length: usize) -> Result<(Self, u64)> {
        let path = path.as_ref();
        let file = File::open(path).context(SourceUnavailableSnafu { path })?;
        let mut reader = BufReader::new(file);
        let total_size = reader.seek(SeekFrom::End(0)).context(SourceUnavailableSnafu { path })?;
        reader.seek(SeekFrom::Start(0)).context(SourceUnavailableSnafu { path })?;
        Ok((Self::from_reader(reader, max_keyword_length), total_size))
    }
}

impl<R: BufRead> SourceLoader<R> {
    pub fn from_reader(reader: R, max_keyword_length: usize) -> Self {
        Self {
            reader,
            max_keyword_length,
            line_no: 0,
            bytes_read: 0,
            skipped: 0,
            finished: false,
            line_buffer: Vec::new(),
        }
    }

    /// Bytes consumed from the corpus so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Malformed lines skipped so far.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Returns the next well-formed record, or `None` once the corpus ends.
    pub fn next_record(&mut self) -> Result<Option<SourceRecord>> {
        while !self.finished {
            self.line_buffer.clear();
            let n = self.reader.read_until(b'\n', &mut self.line_buffer)?;
            if n == 0 {
                self.finished = true;
                break;
            }
            self.bytes_read += n as u64;
            self.line_no += 1;

            let line = match std::str::from_utf8(&self.line_buffer) {
                Ok(line) => line,
                Err(e) => {
                    warn!("Skipping line {}: invalid UTF-8 ({})", self.line_no, e);
                    self.skipped += 1;
                    continue;
                }
            };
            let mut line = line.trim_end_matches(['\r', '\n']);
            if self.line_no == 1 {
                line = skip_utf8_bom(line);
            }
            if line.is_empty() {
                self.finished = true;
                break;
            }

            let Some((word, meaning)) = split_record(line) else {
                warn!("Skipping line {}: no '{}' separator", self.line_no, KEY_SEPARATOR);
                self.skipped += 1;
                continue;
            };
            if word.is_empty() {
                warn!("Skipping line {}: empty word", self.line_no);
                self.skipped += 1;
                continue;
            }
            if word.len() > self.max_keyword_length {
                warn!(
                    "Skipping line {}: word longer than {} bytes",
                    self.line_no, self.max_keyword_length
                );
                self.skipped += 1;
                continue;
            }
            if meaning.as_bytes().contains(&DEFINITION_TERMINATOR) {
                warn!("Skipping line {}: meaning contains a NUL byte", self.line_no);
                self.skipped += 1;
                continue;
            }
            return Ok(Some(SourceRecord {
                word: word.to_string(),
                meaning: meaning.to_string(),
                line_no: self.line_no,
            }));
        }
        Ok(None)
    }
}
