//! On-disk snapshot of a [`PrefixIndex`].
//!
//! Layout (big-endian):
//!
//! ```text
//! magic "DTIX" | version u8 | reserved [u8; 3]
//! store_len u64 | key_count u64 | payload_len u64
//! payload | adler32(payload) u32
//! ```
//!
//! The payload is a pre-order walk of the tree. Each node is written as
//! `value i64 | child_count u32` followed by `char u32 | node` for every
//! child in ascending character order. A value of [`NOT_TERMINAL`] marks an
//! inner node.
//!
//! `store_len` records the definition store length the index was built
//! against, so a snapshot paired with a different store can be rejected.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::storage::trie_node::{PrefixIndex, TrieNode};
use crate::{DictError, Result};

pub const SNAPSHOT_MAGIC: &[u8; 4] = b"DTIX";
pub const SNAPSHOT_VERSION: u8 = 1;
/// Stored value of a node that does not complete a key.
pub const NOT_TERMINAL: i64 = -1;

const HEADER_LENGTH: usize = 4 + 1 + 3 + 8 + 8 + 8;

/// Header fields of a decoded snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotInfo {
    pub store_len: u64,
    pub key_count: u64,
}

/// Serializes `index` into a snapshot buffer.
pub fn encode_snapshot(index: &PrefixIndex, store_len: u64) -> Result<Vec<u8>> {
    let mut payload = Vec::new();
    encode_node(index.root(), &mut payload)?;
    let crc = adler::adler32_slice(&payload);

    let mut buf = Vec::with_capacity(HEADER_LENGTH + payload.len() + 4);
    buf.write_all(SNAPSHOT_MAGIC)?;
    buf.write_u8(SNAPSHOT_VERSION)?;
    buf.write_all(&[0u8; 3])?; // reserved
    buf.write_u64::<BigEndian>(store_len)?;
    buf.write_u64::<BigEndian>(index.len() as u64)?;
    buf.write_u64::<BigEndian>(payload.len() as u64)?;
    buf.write_all(&payload)?;
    buf.write_u32::<BigEndian>(crc)?;
    Ok(buf)
}

fn encode_node<W: Write>(node: &TrieNode, writer: &mut W) -> Result<()> {
    let value = match node.value {
        Some(offset) => i64::try_from(offset)
            .map_err(|_| DictError::invalid_parameter(format!("Offset {} too large", offset)))?,
        None => NOT_TERMINAL,
    };
    writer.write_i64::<BigEndian>(value)?;
    writer.write_u32::<BigEndian>(node.children.len() as u32)?;
    for (c, child) in &node.children {
        writer.write_u32::<BigEndian>(u32::from(*c))?;
        encode_node(child, writer)?;
    }
    Ok(())
}

/// Deserializes a snapshot buffer, verifying magic, version, length and
/// checksum.
pub fn decode_snapshot(data: &[u8]) -> Result<(PrefixIndex, SnapshotInfo)> {
    if data.len() < HEADER_LENGTH {
        return Err(DictError::invalid_data_format("Snapshot header too short"));
    }
    if &data[..4] != SNAPSHOT_MAGIC {
        return Err(DictError::invalid_data_format("Invalid snapshot magic"));
    }
    if data[4] != SNAPSHOT_VERSION {
        return Err(DictError::invalid_data_format(format!(
            "Unsupported snapshot version: {}",
            data[4]
        )));
    }
    let mut cursor = Cursor::new(&data[8..HEADER_LENGTH]);
    let store_len = cursor.read_u64::<BigEndian>()?;
    let key_count = cursor.read_u64::<BigEndian>()?;
    let payload_len = cursor.read_u64::<BigEndian>()?;

    let expected = (HEADER_LENGTH as u64)
        .checked_add(payload_len)
        .and_then(|n| n.checked_add(4))
        .ok_or_else(|| DictError::invalid_data_format("Snapshot payload length overflow"))?;
    if data.len() as u64 != expected {
        return Err(DictError::invalid_data_format(format!(
            "Snapshot length mismatch: expected {} bytes, got {}",
            expected,
            data.len()
        )));
    }
    let payload_end = HEADER_LENGTH + payload_len as usize;
    let payload = &data[HEADER_LENGTH..payload_end];
    let expected_crc = Cursor::new(&data[payload_end..]).read_u32::<BigEndian>()?;
    let crc = adler::adler32_slice(payload);
    if crc != expected_crc {
        return Err(DictError::crc_mismatch(expected_crc, crc));
    }

    let root = decode_tree(payload)?;
    let index = PrefixIndex::from_root(root);
    if index.len() as u64 != key_count {
        return Err(DictError::invalid_data_format("Snapshot key count mismatch"));
    }
    Ok((index, SnapshotInfo { store_len, key_count }))
}

fn read_node_header<R: Read>(reader: &mut R) -> Result<(TrieNode, u32)> {
    let value = match reader.read_i64::<BigEndian>()? {
        NOT_TERMINAL => None,
        v if v >= 0 => Some(v as u64),
        v => return Err(DictError::invalid_data_format(format!("Invalid node value: {}", v))),
    };
    let child_count = reader.read_u32::<BigEndian>()?;
    Ok((TrieNode { children: Default::default(), value }, child_count))
}

/// Iterative pre-order decode, so hostile input cannot exhaust the stack.
fn decode_tree(payload: &[u8]) -> Result<TrieNode> {
    let mut cursor = Cursor::new(payload);
    let (root, root_children) = read_node_header(&mut cursor)?;
    // (edge char, node, children still to read)
    let mut stack: Vec<(char, TrieNode, u32)> = vec![('\0', root, root_children)];

    let root = loop {
        let Some(top) = stack.last_mut() else {
            return Err(DictError::invalid_data_format("Snapshot tree is empty"));
        };
        if top.2 == 0 {
            let (c, node, _) = stack.pop().ok_or_else(|| DictError::invalid_data_format("Snapshot stack underflow"))?;
            match stack.last_mut() {
                Some(parent) => {
                    if parent.1.children.insert(c, node).is_some() {
                        return Err(DictError::invalid_data_format(format!("Duplicate child '{}'", c)));
                    }
                }
                None => break node,
            }
            continue;
        }
        top.2 -= 1;
        let raw = cursor.read_u32::<BigEndian>()?;
        let c = char::from_u32(raw)
            .ok_or_else(|| DictError::invalid_data_format(format!("Invalid character {:#x}", raw)))?;
        let (node, child_count) = read_node_header(&mut cursor)?;
        stack.push((c, node, child_count));
    };

    if cursor.position() != payload.len() as u64 {
        return Err(DictError::invalid_data_format("Trailing bytes in snapshot payload"));
    }
    Ok(root)
}

/// Sibling file a snapshot is staged in before being renamed onto `path`:
/// the full file name with `.tmp` appended (`dict.idx` -> `dict.idx.tmp`).
pub fn snapshot_temp_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes a snapshot of `index` to `path`.
///
/// The data goes to a temporary sibling first and is renamed into place, so
/// readers never observe a half-written snapshot.
pub fn write_snapshot<P: AsRef<Path>>(path: P, index: &PrefixIndex, store_len: u64) -> Result<()> {
    let path = path.as_ref();
    let data = encode_snapshot(index, store_len)?;
    let tmp_path = snapshot_temp_path(path);
    {
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        writer.write_all(&data)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Reads and decodes the snapshot at `path`.
pub fn read_snapshot<P: AsRef<Path>>(path: P) -> Result<(PrefixIndex, SnapshotInfo)> {
    let data = fs::read(path)?;
    decode_snapshot(&data)
}
