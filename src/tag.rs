//! Three-character field tags.
//!
//! A tag identifies a field in the directory and in the field model. Tags
//! whose first two characters are `'0'` denote control fields; every other tag
//! denotes a data field.

use crate::error::{FormatError, Result};
use crate::{FIELD_TERMINATOR, RECORD_TERMINATOR, SUBFIELD_DELIMITER};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A validated three-byte ASCII field tag.
///
/// # Examples
///
/// ```
/// use marc21_codec::Tag;
///
/// let tag: Tag = "245".parse()?;
/// assert!(!tag.is_control());
/// assert!(Tag::new("001")?.is_control());
/// # Ok::<(), marc21_codec::FormatError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag([u8; 3]);

impl Tag {
    /// Parse a tag from a string slice.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::InvalidField` unless `tag` is exactly three
    /// printable ASCII characters.
    pub fn new(tag: &str) -> Result<Self> {
        Self::from_bytes(tag.as_bytes())
    }

    /// Parse a tag from raw directory bytes.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::InvalidField` unless `bytes` is exactly three
    /// printable ASCII bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; 3] = bytes.try_into().map_err(|_| {
            FormatError::InvalidField(format!("Tag must be 3 bytes, got {}", bytes.len()))
        })?;
        if let Some(&b) = raw.iter().find(|&&b| !is_tag_byte(b)) {
            return Err(FormatError::InvalidField(format!(
                "Tag byte 0x{b:02X} is not printable ASCII"
            )));
        }
        Ok(Tag(raw))
    }

    /// Whether this tag denotes a control field (`00X`).
    #[must_use]
    pub fn is_control(&self) -> bool {
        self.0[0] == b'0' && self.0[1] == b'0'
    }

    /// The tag as raw bytes, as written to the directory.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 3] {
        &self.0
    }

    /// The tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // construction admits printable ASCII only
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

fn is_tag_byte(b: u8) -> bool {
    b.is_ascii_graphic()
        && b != FIELD_TERMINATOR
        && b != SUBFIELD_DELIMITER
        && b != RECORD_TERMINATOR
}

impl FromStr for Tag {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self> {
        Tag::new(s)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for Tag {
    fn eq(&self, other: &str) -> bool {
        self.0.as_slice() == other.as_bytes()
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_slice() == other.as_bytes()
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
