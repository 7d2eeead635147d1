//! The record directory: one 12-byte entry per field.
//!
//! Each entry is a 3-byte tag, a 4-digit field length (including the field's
//! trailing terminator) and a 5-digit starting position relative to the base
//! address of data. The directory ends with a single field terminator.

use crate::error::{FormatError, Result};
use crate::leader::{write_digits, LEADER_LEN};
use crate::tag::Tag;
use crate::FIELD_TERMINATOR;
use serde::Serialize;

/// Length of one directory entry in bytes.
pub const ENTRY_LEN: usize = 12;

/// Largest field length a 4-digit entry can declare.
pub const MAX_FIELD_LENGTH: usize = 9_999;

/// Largest starting position a 5-digit entry can declare.
pub const MAX_FIELD_START: usize = 99_999;

/// One directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    /// Tag of the field this entry indexes
    pub tag: Tag,
    /// Field length in bytes, trailing field terminator included
    pub length: usize,
    /// Offset of the field from the base address of data
    pub start: usize,
}

impl DirectoryEntry {
    /// Offset one past the field's last byte, relative to the base address.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Number of entries implied by a base address of data.
///
/// # Errors
///
/// Returns `FormatError::BadDirectoryEntry` if the region between the leader
/// and the base address is not a whole number of entries plus a terminator.
pub fn entry_count(base_address: usize) -> Result<usize> {
    let region = base_address
        .checked_sub(LEADER_LEN + 1)
        .ok_or_else(|| FormatError::BadDirectoryEntry {
            index: 0,
            detail: format!("base address {base_address} leaves no room for a directory"),
        })?;
    if region % ENTRY_LEN != 0 {
        return Err(FormatError::BadDirectoryEntry {
            index: region / ENTRY_LEN,
            detail: format!(
                "directory region of {region} bytes is not a multiple of {ENTRY_LEN}"
            ),
        });
    }
    Ok(region / ENTRY_LEN)
}

/// Decode `entry_count` entries followed by the directory terminator.
///
/// `bytes` is the whole directory region, `entry_count * 12 + 1` bytes.
///
/// # Errors
///
/// Returns `FormatError::BadDirectoryEntry` on a region of the wrong size, a
/// malformed tag, a non-digit length or start, or a missing terminator.
pub fn decode(bytes: &[u8], entry_count: usize) -> Result<Vec<DirectoryEntry>> {
    let entries_len =
        entry_count
            .checked_mul(ENTRY_LEN)
            .ok_or_else(|| FormatError::BadDirectoryEntry {
                index: 0,
                detail: format!("entry count {entry_count} overflows the directory size"),
            })?;
    if let Some(pos) = memchr::memchr(FIELD_TERMINATOR, &bytes[..entries_len.min(bytes.len())]) {
        return Err(FormatError::BadDirectoryEntry {
            index: pos / ENTRY_LEN,
            detail: format!("directory terminator at byte {pos}, inside entry region"),
        });
    }
    if bytes.len() < entries_len {
        return Err(FormatError::BadDirectoryEntry {
            index: bytes.len() / ENTRY_LEN,
            detail: format!(
                "directory region holds {} bytes, {entry_count} entries need {entries_len}",
                bytes.len()
            ),
        });
    }
    match bytes.get(entries_len) {
        Some(&FIELD_TERMINATOR) if bytes.len() == entries_len + 1 => {},
        Some(&FIELD_TERMINATOR) => {
            return Err(FormatError::BadDirectoryEntry {
                index: entry_count,
                detail: format!(
                    "{} unexpected bytes after directory terminator",
                    bytes.len() - entries_len - 1
                ),
            });
        },
        Some(&b) => {
            return Err(FormatError::BadDirectoryEntry {
                index: entry_count,
                detail: format!("expected directory terminator, got byte 0x{b:02X}"),
            });
        },
        None => {
            return Err(FormatError::BadDirectoryEntry {
                index: entry_count,
                detail: "directory terminator missing".to_string(),
            });
        },
    }

    bytes[..entries_len]
        .chunks_exact(ENTRY_LEN)
        .enumerate()
        .map(|(index, chunk)| decode_entry(index, chunk))
        .collect()
}

fn decode_entry(index: usize, chunk: &[u8]) -> Result<DirectoryEntry> {
    let bad = |detail: String| FormatError::BadDirectoryEntry { index, detail };
    let tag = Tag::from_bytes(&chunk[0..3]).map_err(|e| bad(e.to_string()))?;
    let length = parse_number(&chunk[3..7])
        .ok_or_else(|| bad(format!("non-digit field length for tag {tag}")))?;
    let start = parse_number(&chunk[7..12])
        .ok_or_else(|| bad(format!("non-digit starting position for tag {tag}")))?;
    Ok(DirectoryEntry { tag, length, start })
}

fn parse_number(bytes: &[u8]) -> Option<usize> {
    bytes.iter().try_fold(0usize, |acc, &b| {
        b.is_ascii_digit().then(|| acc * 10 + usize::from(b - b'0'))
    })
}

/// Encode entries in order, followed by the directory terminator.
///
/// # Errors
///
/// Returns `FormatError::ValueOutOfRange` if a length exceeds 9999 or a
/// starting position exceeds 99999.
pub fn encode(entries: &[DirectoryEntry]) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; entries.len() * ENTRY_LEN];
    for (entry, out) in entries.iter().zip(bytes.chunks_exact_mut(ENTRY_LEN)) {
        out[0..3].copy_from_slice(entry.tag.as_bytes());
        write_digits(&mut out[3..7], entry.length, "field length")?;
        write_digits(&mut out[7..12], entry.start, "field starting position")?;
    }
    bytes.push(FIELD_TERMINATOR);
    Ok(bytes)
}

/// Check that entries tile the data region exactly, in declared order.
///
/// # Errors
///
/// Returns `FormatError::BadDirectoryEntry` naming the first entry that
/// leaves a gap or overlaps its predecessor, or the entry count when the
/// entries do not end where the data region ends.
pub fn check_contiguous(entries: &[DirectoryEntry], data_len: usize) -> Result<()> {
    let covered = entries.iter().enumerate().try_fold(0usize, |expected, (index, entry)| {
        if entry.start == expected {
            Ok(entry.end())
        } else {
            Err(FormatError::BadDirectoryEntry {
                index,
                detail: format!(
                    "field {} starts at {}, expected {expected}",
                    entry.tag, entry.start
                ),
            })
        }
    })?;
    if covered != data_len {
        return Err(FormatError::BadDirectoryEntry {
            index: entries.len(),
            detail: format!("entries cover {covered} bytes, data region holds {data_len}"),
        });
    }
    Ok(())
}
