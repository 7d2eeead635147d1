//! Conversion between records and their wire parts.
//!
//! [`to_parts`] is the only place in the crate that computes directory
//! offsets, the base address of data and the record length; every encoder
//! goes through it. [`from_parts`] and [`decode`] run the reverse path.

use crate::directory::{self, DirectoryEntry, ENTRY_LEN, MAX_FIELD_LENGTH, MAX_FIELD_START};
use crate::error::{FormatError, Result};
use crate::field::Field;
use crate::leader::{Leader, LEADER_LEN, MAX_FIVE_DIGITS};
use crate::record::Record;
use crate::recovery::RecoveryContext;
use crate::{FIELD_TERMINATOR, RECORD_TERMINATOR};

/// A record split into the three regions of its wire form.
///
/// Produced by [`to_parts`], whose leader, directory and data always agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordParts {
    /// Leader with record length and base address filled in
    pub leader: Leader,
    /// One entry per field, in record order
    pub directory: Vec<DirectoryEntry>,
    /// Field data, each field followed by its terminator
    pub data: Vec<u8>,
}

impl RecordParts {
    /// Concatenate leader, directory, data and record terminator.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::ValueOutOfRange` or `FormatError::BadLeaderField`
    /// if the leader or directory cannot be encoded.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let leader = self.leader.encode()?;
        let directory = directory::encode(&self.directory)?;

        let mut bytes = Vec::with_capacity(self.leader.record_length as usize);
        bytes.extend_from_slice(&leader);
        bytes.extend_from_slice(&directory);
        bytes.extend_from_slice(&self.data);
        bytes.push(RECORD_TERMINATOR);
        Ok(bytes)
    }
}

/// Serialize a record's fields and compute a consistent leader.
///
/// Fields are written in record order. The directory and data area come out
/// of one fold over the fields; the base address and record length are then
/// derived from them. The leader's indicator count, subfield code length and
/// entry map (`4500`) are set to the geometry actually written.
///
/// # Errors
///
/// Returns the field's validation error if a field invariant does not hold,
/// or `FormatError::ValueOutOfRange` if a length or offset outgrows its
/// fixed-width encoding.
pub fn to_parts(record: &Record) -> Result<RecordParts> {
    let (directory, data) = record.fields().iter().try_fold(
        (Vec::with_capacity(record.fields().len()), Vec::new()),
        |(mut directory, mut data): (Vec<DirectoryEntry>, Vec<u8>), field| {
            field.validate()?;
            let start = data.len();
            field.write_body(&mut data);
            data.push(FIELD_TERMINATOR);
            let length = data.len() - start;
            check_range("field length", length, MAX_FIELD_LENGTH)?;
            check_range("field starting position", start, MAX_FIELD_START)?;
            directory.push(DirectoryEntry {
                tag: field.tag(),
                length,
                start,
            });
            Ok::<_, FormatError>((directory, data))
        },
    )?;

    let base_address = LEADER_LEN + directory.len() * ENTRY_LEN + 1;
    let record_length = base_address + data.len() + 1;

    let mut leader = record.leader.clone();
    leader.data_base_address = five_digits("base address of data", base_address)?;
    leader.record_length = five_digits("record length", record_length)?;
    leader.indicator_count = 2;
    leader.subfield_code_count = 2;
    leader.length_of_field_length = 4;
    leader.length_of_starting_position = 5;
    leader.length_of_implementation_defined = 0;
    leader.undefined = 0;

    Ok(RecordParts {
        leader,
        directory,
        data,
    })
}

fn check_range(what: &'static str, value: usize, max: usize) -> Result<()> {
    if value > max {
        return Err(FormatError::ValueOutOfRange { what, value, max });
    }
    Ok(())
}

fn five_digits(what: &'static str, value: usize) -> Result<u32> {
    check_range(what, value, MAX_FIVE_DIGITS)?;
    u32::try_from(value).map_err(|_| FormatError::ValueOutOfRange {
        what,
        value,
        max: MAX_FIVE_DIGITS,
    })
}

/// Build a record from a decoded leader, its directory and the data region.
///
/// `data` starts at the base address of data and excludes the record
/// terminator. Each entry's slice must end with a field terminator, which is
/// stripped before the body is handed to the field model.
///
/// # Errors
///
/// Returns `FormatError::TruncatedRecord` if an entry runs past `data`,
/// `FormatError::DanglingTerminator` if an entry's last byte is not a field
/// terminator, or the field model's error for a malformed body.
pub fn from_parts(leader: Leader, directory: &[DirectoryEntry], data: &[u8]) -> Result<Record> {
    let fields = directory
        .iter()
        .map(|entry| {
            let slice = data.get(entry.start..entry.end()).ok_or(
                FormatError::TruncatedRecord {
                    expected: entry.end(),
                    actual: data.len(),
                },
            )?;
            match slice.split_last() {
                Some((&FIELD_TERMINATOR, body)) => Field::decode(entry.tag, body),
                _ => Err(FormatError::DanglingTerminator {
                    detail: format!(
                        "field {} at offset {} does not end with a field terminator",
                        entry.tag, entry.start
                    ),
                }),
            }
        })
        .collect::<Result<Vec<Field>>>()?;
    Ok(Record::from_fields(leader, fields))
}

/// Decode one complete record buffer, strictly.
///
/// # Errors
///
/// Returns `FormatError::TruncatedRecord` when `bytes` is shorter than the
/// declared record length, `FormatError::TrailingData` when it is longer,
/// `FormatError::DanglingTerminator` when the record terminator is missing,
/// and any leader, directory or field error found along the way.
///
/// # Examples
///
/// ```
/// use marc21_codec::{decode, FormatError};
///
/// let result = decode(b"00026nam a2200025   4500");
/// assert!(matches!(result, Err(FormatError::TruncatedRecord { expected: 26, actual: 24 })));
/// ```
pub fn decode(bytes: &[u8]) -> Result<Record> {
    decode_with(bytes, &mut RecoveryContext::default())
}

/// Decode one complete record buffer under the given recovery context.
///
/// In lenient mode malformed leader counts are replaced by conventional
/// values and non-contiguous directories are accepted, each with a message
/// recorded in `context`.
///
/// # Errors
///
/// Same as [`decode`], minus the errors `context` recovers from.
pub fn decode_with(bytes: &[u8], context: &mut RecoveryContext) -> Result<Record> {
    let leader_bytes = bytes.get(..LEADER_LEN).ok_or(FormatError::TruncatedRecord {
        expected: LEADER_LEN,
        actual: bytes.len(),
    })?;
    let leader = Leader::decode_with(leader_bytes, context)?;
    leader.validate_for_reading()?;

    let declared = leader.record_length as usize;
    if bytes.len() < declared {
        return Err(FormatError::TruncatedRecord {
            expected: declared,
            actual: bytes.len(),
        });
    }
    if bytes.len() > declared {
        return Err(FormatError::TrailingData {
            declared,
            actual: bytes.len(),
        });
    }

    let base_address = leader.data_base_address as usize;
    let count = directory::entry_count(base_address)?;
    let entries = directory::decode(&bytes[LEADER_LEN..base_address], count)?;

    let (data, terminator) = bytes[base_address..]
        .split_last()
        .map(|(last, data)| (data, *last))
        .ok_or_else(|| FormatError::DanglingTerminator {
            detail: "record terminator missing".to_string(),
        })?;
    if terminator != RECORD_TERMINATOR {
        return Err(FormatError::DanglingTerminator {
            detail: format!("expected record terminator, got byte 0x{terminator:02X}"),
        });
    }

    if let Err(e) = directory::check_contiguous(&entries, data.len()) {
        context.recover::<()>(e, "directory layout")?;
    }

    from_parts(leader, &entries, data)
}
