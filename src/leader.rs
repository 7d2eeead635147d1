//! MARC record leader parsing and construction.
//!
//! The leader is a 24-byte fixed-length header at the start of every record.
//! It declares the record's total length and the geometry of its directory.
//!
//! # Structure
//!
//! - Positions 0-4: Record length (5 digits)
//! - Position 5: Record status
//! - Position 6: Record type (a = language material, c = music, etc.)
//! - Position 7: Bibliographic level (m = monograph, s = serial, etc.)
//! - Position 8: Control record type
//! - Position 9: Character coding (space = MARC-8, a = UCS/Unicode)
//! - Position 10: Indicator count (usually 2)
//! - Position 11: Subfield code count (usually 2)
//! - Positions 12-16: Base address of data (5 digits)
//! - Positions 17-19: Encoding level, cataloging form, multipart level
//! - Positions 20-23: Entry map (usually "4500")

use crate::error::{FormatError, Result};
use crate::recovery::RecoveryContext;
use serde::Serialize;

/// Length of every leader in bytes.
pub const LEADER_LEN: usize = 24;

/// Largest value a 5-digit leader number can hold.
pub const MAX_FIVE_DIGITS: usize = 99_999;

/// Character coding scheme declared at leader position 9.
///
/// The codec only transports bytes; this value tells an external
/// transliteration step how to interpret them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CharacterCoding {
    /// MARC-8 (blank at position 9)
    Marc8,
    /// UCS/Unicode (`a` at position 9)
    Ucs,
    /// Any other value found at position 9
    Other(char),
}

impl CharacterCoding {
    /// Interpret the character found at leader position 9.
    #[must_use]
    pub fn from_leader_char(c: char) -> Self {
        match c {
            ' ' => CharacterCoding::Marc8,
            'a' => CharacterCoding::Ucs,
            other => CharacterCoding::Other(other),
        }
    }

    /// The character written to leader position 9.
    #[must_use]
    pub fn as_leader_char(&self) -> char {
        match self {
            CharacterCoding::Marc8 => ' ',
            CharacterCoding::Ucs => 'a',
            CharacterCoding::Other(c) => *c,
        }
    }
}

/// MARC Leader - 24 bytes at the start of every MARC record.
///
/// `record_length` and `data_base_address` are recomputed from the fields
/// whenever a record is encoded, so values set by hand only matter for
/// leaders encoded on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leader {
    /// Record length (5 digits) - positions 0-4
    pub record_length: u32,
    /// Record status (1 char) - position 5
    pub record_status: char,
    /// Type of record (1 char) - position 6
    pub record_type: char,
    /// Bibliographic level (1 char) - position 7
    pub bibliographic_level: char,
    /// Type of control record (1 char) - position 8
    pub control_record_type: char,
    /// Character coding scheme (1 char) - position 9
    pub character_coding: char,
    /// Indicator count (1 digit) - position 10 (usually 2)
    pub indicator_count: u8,
    /// Subfield code count (1 digit) - position 11 (usually 2)
    pub subfield_code_count: u8,
    /// Base address of data (5 digits) - positions 12-16
    pub data_base_address: u32,
    /// Encoding level (1 char) - position 17
    pub encoding_level: char,
    /// Cataloging form (1 char) - position 18
    pub cataloging_form: char,
    /// Multipart resource record level (1 char) - position 19
    pub multipart_level: char,
    /// Length of the length-of-field portion of a directory entry - position 20
    pub length_of_field_length: u8,
    /// Length of the starting-position portion of a directory entry - position 21
    pub length_of_starting_position: u8,
    /// Length of the implementation-defined portion of a directory entry - position 22
    pub length_of_implementation_defined: u8,
    /// Undefined entry map digit - position 23
    pub undefined: u8,
}

impl Default for Leader {
    fn default() -> Self {
        Leader::new('n', 'a')
    }
}

impl Leader {
    /// Create a leader with the given record status and type and
    /// conventional values everywhere else.
    ///
    /// # Examples
    ///
    /// ```
    /// use marc21_codec::Leader;
    ///
    /// let leader = Leader::new('c', 'j');
    /// assert_eq!(&leader.encode()?, b"00000cjm a2200000   4500");
    /// # Ok::<(), marc21_codec::FormatError>(())
    /// ```
    #[must_use]
    pub fn new(record_status: char, record_type: char) -> Self {
        Leader {
            record_length: 0,
            record_status,
            record_type,
            bibliographic_level: 'm',
            control_record_type: ' ',
            character_coding: 'a',
            indicator_count: 2,
            subfield_code_count: 2,
            data_base_address: 0,
            encoding_level: ' ',
            cataloging_form: ' ',
            multipart_level: ' ',
            length_of_field_length: 4,
            length_of_starting_position: 5,
            length_of_implementation_defined: 0,
            undefined: 0,
        }
    }

    /// Parse a leader from exactly 24 bytes, rejecting any malformed numeric
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::BadLeaderLength` if `bytes` is not 24 bytes long,
    /// or `FormatError::BadLeaderField` if a numeric position holds a
    /// non-digit.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::decode_with(bytes, &mut RecoveryContext::default())
    }

    /// Parse a leader, letting `context` decide how malformed counts and
    /// entry map digits are handled.
    ///
    /// In lenient mode the indicator count, subfield code count and entry map
    /// fall back to their conventional values and the substitution is
    /// recorded in `context`. The record length and base address are always
    /// strict.
    ///
    /// # Errors
    ///
    /// Same as [`Leader::decode`], minus the errors `context` recovers from.
    pub fn decode_with(bytes: &[u8], context: &mut RecoveryContext) -> Result<Self> {
        if bytes.len() != LEADER_LEN {
            return Err(FormatError::BadLeaderLength {
                actual: bytes.len(),
            });
        }

        let record_length = parse_digits(bytes, 0, 5)?;
        let data_base_address = parse_digits(bytes, 12, 5)?;

        let mut digit_or = |position: usize, fallback: u8, what: &str| -> Result<u8> {
            match parse_digit(bytes, position) {
                Ok(value) => Ok(value),
                Err(e) => Ok(context.recover::<u8>(e, what)?.unwrap_or(fallback)),
            }
        };
        let indicator_count = digit_or(10, 2, "indicator count")?;
        let subfield_code_count = digit_or(11, 2, "subfield code count")?;
        let length_of_field_length = digit_or(20, 4, "entry map length-of-field")?;
        let length_of_starting_position = digit_or(21, 5, "entry map starting-position")?;
        let length_of_implementation_defined =
            digit_or(22, 0, "entry map implementation-defined")?;
        let undefined = digit_or(23, 0, "entry map undefined")?;

        Ok(Leader {
            record_length,
            record_status: char::from(bytes[5]),
            record_type: char::from(bytes[6]),
            bibliographic_level: char::from(bytes[7]),
            control_record_type: char::from(bytes[8]),
            character_coding: char::from(bytes[9]),
            indicator_count,
            subfield_code_count,
            data_base_address,
            encoding_level: char::from(bytes[17]),
            cataloging_form: char::from(bytes[18]),
            multipart_level: char::from(bytes[19]),
            length_of_field_length,
            length_of_starting_position,
            length_of_implementation_defined,
            undefined,
        })
    }

    /// Validate that the leader's geometry can describe a record.
    ///
    /// Checks that the base address leaves room for a directory terminator
    /// and lies inside the declared record length, which is required before
    /// performing arithmetic on these values.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::BadLeaderField` if the geometry is impossible.
    pub fn validate_for_reading(&self) -> Result<()> {
        if (self.data_base_address as usize) < LEADER_LEN + 1 {
            return Err(FormatError::BadLeaderField {
                position: 12,
                detail: format!(
                    "Base address of data must be at least {}, got {}",
                    LEADER_LEN + 1,
                    self.data_base_address
                ),
            });
        }
        if self.record_length <= self.data_base_address {
            return Err(FormatError::BadLeaderField {
                position: 0,
                detail: format!(
                    "Record length {} must exceed base address {}",
                    self.record_length, self.data_base_address
                ),
            });
        }
        Ok(())
    }

    /// Serialize the leader to its 24-byte form.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::ValueOutOfRange` if a number does not fit its
    /// digit width, or `FormatError::BadLeaderField` if a character position
    /// holds a value that is not a single byte.
    pub fn encode(&self) -> Result<[u8; LEADER_LEN]> {
        let mut bytes = [b' '; LEADER_LEN];

        write_digits(&mut bytes[0..5], self.record_length as usize, "record length")?;
        bytes[5] = char_byte(self.record_status, 5)?;
        bytes[6] = char_byte(self.record_type, 6)?;
        bytes[7] = char_byte(self.bibliographic_level, 7)?;
        bytes[8] = char_byte(self.control_record_type, 8)?;
        bytes[9] = char_byte(self.character_coding, 9)?;
        bytes[10] = single_digit(self.indicator_count, "indicator count")?;
        bytes[11] = single_digit(self.subfield_code_count, "subfield code count")?;
        write_digits(
            &mut bytes[12..17],
            self.data_base_address as usize,
            "base address of data",
        )?;
        bytes[17] = char_byte(self.encoding_level, 17)?;
        bytes[18] = char_byte(self.cataloging_form, 18)?;
        bytes[19] = char_byte(self.multipart_level, 19)?;
        bytes[20] = single_digit(self.length_of_field_length, "length of field length")?;
        bytes[21] = single_digit(
            self.length_of_starting_position,
            "length of starting position",
        )?;
        bytes[22] = single_digit(
            self.length_of_implementation_defined,
            "length of implementation-defined portion",
        )?;
        bytes[23] = single_digit(self.undefined, "undefined entry map digit")?;

        Ok(bytes)
    }

    /// Interpret leader position 9.
    #[must_use]
    pub fn coding(&self) -> CharacterCoding {
        CharacterCoding::from_leader_char(self.character_coding)
    }
}

/// Smallest possible record: leader, directory terminator, record terminator.
pub const MIN_RECORD_LEN: usize = LEADER_LEN + 2;

/// Read the record length from the first five bytes of a record.
///
/// This is all a stream needs to find the next record boundary.
///
/// # Errors
///
/// Returns `FormatError::BadLeaderField` if the prefix is not five digits or
/// declares a length too short to hold a record.
pub fn declared_length(prefix: &[u8; 5]) -> Result<usize> {
    let length = parse_digits(prefix, 0, 5)? as usize;
    if length < MIN_RECORD_LEN {
        return Err(FormatError::BadLeaderField {
            position: 0,
            detail: format!("record length {length} is shorter than the minimum {MIN_RECORD_LEN}"),
        });
    }
    Ok(length)
}

/// Parse a run of ASCII digits at `start..start + len`.
fn parse_digits(bytes: &[u8], start: usize, len: usize) -> Result<u32> {
    bytes[start..start + len]
        .iter()
        .enumerate()
        .try_fold(0u32, |acc, (i, &b)| {
            if b.is_ascii_digit() {
                Ok(acc * 10 + u32::from(b - b'0'))
            } else {
                Err(FormatError::BadLeaderField {
                    position: start + i,
                    detail: format!("expected digit, got byte 0x{b:02X}"),
                })
            }
        })
}

fn parse_digit(bytes: &[u8], position: usize) -> Result<u8> {
    let b = bytes[position];
    if b.is_ascii_digit() {
        Ok(b - b'0')
    } else {
        Err(FormatError::BadLeaderField {
            position,
            detail: format!("expected digit, got byte 0x{b:02X}"),
        })
    }
}

/// Write `value` zero-padded into `out`, which fixes the digit width.
pub(crate) fn write_digits(out: &mut [u8], value: usize, what: &'static str) -> Result<()> {
    let max = 10usize.pow(u32::try_from(out.len()).unwrap_or(u32::MAX)) - 1;
    if value > max {
        return Err(FormatError::ValueOutOfRange { what, value, max });
    }
    let mut rest = value;
    for slot in out.iter_mut().rev() {
        // rest % 10 < 10
        *slot = b'0' + (rest % 10) as u8;
        rest /= 10;
    }
    Ok(())
}

fn single_digit(value: u8, what: &'static str) -> Result<u8> {
    if value > 9 {
        return Err(FormatError::ValueOutOfRange {
            what,
            value: usize::from(value),
            max: 9,
        });
    }
    Ok(b'0' + value)
}

fn char_byte(c: char, position: usize) -> Result<u8> {
    u8::try_from(c).map_err(|_| FormatError::BadLeaderField {
        position,
        detail: format!("character {c:?} does not fit in one byte"),
    })
}
