//! The field model: control fields, data fields and subfields.
//!
//! [`Field`] is an explicit tagged variant. Callers match on
//! [`Field::Control`] / [`Field::Data`] or use [`Field::as_control`] /
//! [`Field::as_data`]; nothing dispatches on tag shape at call sites.
//!
//! Every constructor and setter validates its input and leaves the target
//! untouched on failure, so a value of any of these types is always
//! encodable.
//!
//! # Examples
//!
//! ```
//! use marc21_codec::{DataField, Subfield};
//!
//! let mut field = DataField::new("650", ' ', '0', vec![Subfield::new('a', "Cats")?])?;
//! field.add_subfield('x', "Behavior")?;
//!
//! assert_eq!(field.subfield('x'), Some(&b"Behavior"[..]));
//! assert!(field.add_subfield('v', "bad\x1Fvalue").is_err());
//! assert_eq!(field.subfields().len(), 2);
//! # Ok::<(), marc21_codec::FormatError>(())
//! ```

use crate::error::{FormatError, Result};
use crate::tag::Tag;
use crate::{FIELD_TERMINATOR, RECORD_TERMINATOR, SUBFIELD_DELIMITER};
use serde::Serialize;
use smallvec::SmallVec;

/// Reject content holding any structural delimiter.
fn check_content(value: &[u8]) -> Result<()> {
    match memchr::memchr3(FIELD_TERMINATOR, SUBFIELD_DELIMITER, RECORD_TERMINATOR, value) {
        Some(position) => Err(FormatError::IllegalDelimiter {
            byte: value[position],
            position,
        }),
        None => Ok(()),
    }
}

/// Validate a subfield code: one printable ASCII character.
fn check_code(code: char) -> Result<()> {
    if code.is_ascii_graphic() {
        Ok(())
    } else {
        Err(FormatError::InvalidField(format!(
            "Subfield code {code:?} is not a printable ASCII character"
        )))
    }
}

/// Validate an indicator: one ASCII character that is not a control byte.
fn check_indicator(indicator: char) -> Result<()> {
    if indicator.is_ascii() && !indicator.is_ascii_control() {
        Ok(())
    } else {
        Err(FormatError::InvalidField(format!(
            "Indicator {indicator:?} is not a printable ASCII character"
        )))
    }
}

/// A subfield within a data field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subfield {
    code: char,
    value: Vec<u8>,
}

impl Subfield {
    /// Create a subfield.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::InvalidField` for a code that is not printable
    /// ASCII, or `FormatError::IllegalDelimiter` if `value` holds 0x1D, 0x1E
    /// or 0x1F.
    pub fn new(code: char, value: impl Into<Vec<u8>>) -> Result<Self> {
        check_code(code)?;
        let value = value.into();
        check_content(&value)?;
        Ok(Subfield { code, value })
    }

    /// Subfield code
    #[must_use]
    pub fn code(&self) -> char {
        self.code
    }

    /// Raw subfield content
    #[must_use]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Subfield content as UTF-8, if it is valid UTF-8.
    #[must_use]
    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.value).ok()
    }

    /// Replace the content.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::IllegalDelimiter` if `value` holds a delimiter;
    /// the subfield keeps its previous content.
    pub fn set_value(&mut self, value: impl Into<Vec<u8>>) -> Result<()> {
        let value = value.into();
        check_content(&value)?;
        self.value = value;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        check_code(self.code)?;
        check_content(&self.value)
    }
}

/// A control field (tags `00X`): raw content with no indicators or subfields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlField {
    tag: Tag,
    value: Vec<u8>,
}

impl ControlField {
    /// Create a control field.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::InvalidField` if `tag` is malformed or is not a
    /// control tag, or `FormatError::IllegalDelimiter` if `value` holds a
    /// delimiter.
    pub fn new(tag: &str, value: impl Into<Vec<u8>>) -> Result<Self> {
        Self::with_tag(Tag::new(tag)?, value.into())
    }

    pub(crate) fn with_tag(tag: Tag, value: Vec<u8>) -> Result<Self> {
        if !tag.is_control() {
            return Err(FormatError::InvalidField(format!(
                "Tag {tag} is not a control tag"
            )));
        }
        check_content(&value)?;
        Ok(ControlField { tag, value })
    }

    /// Field tag
    #[must_use]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Raw field content
    #[must_use]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Field content as UTF-8, if it is valid UTF-8.
    #[must_use]
    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.value).ok()
    }

    /// Replace the content.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::IllegalDelimiter` if `value` holds a delimiter;
    /// the field keeps its previous content.
    pub fn set_value(&mut self, value: impl Into<Vec<u8>>) -> Result<()> {
        let value = value.into();
        check_content(&value)?;
        self.value = value;
        Ok(())
    }
}

/// A data field: two indicators and a non-empty list of subfields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataField {
    tag: Tag,
    indicator1: char,
    indicator2: char,
    /// Stored in a `SmallVec` to avoid allocation for typical fields with 4 or fewer subfields
    subfields: SmallVec<[Subfield; 4]>,
}

impl DataField {
    /// Create a data field.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::InvalidField` if `tag` is malformed or is a
    /// control tag, if an indicator is not printable ASCII, or if
    /// `subfields` is empty.
    pub fn new(
        tag: &str,
        indicator1: char,
        indicator2: char,
        subfields: impl IntoIterator<Item = Subfield>,
    ) -> Result<Self> {
        Self::with_tag(Tag::new(tag)?, indicator1, indicator2, subfields.into_iter().collect())
    }

    fn with_tag(
        tag: Tag,
        indicator1: char,
        indicator2: char,
        subfields: SmallVec<[Subfield; 4]>,
    ) -> Result<Self> {
        if tag.is_control() {
            return Err(FormatError::InvalidField(format!(
                "Tag {tag} is a control tag and cannot carry indicators"
            )));
        }
        check_indicator(indicator1)?;
        check_indicator(indicator2)?;
        if subfields.is_empty() {
            return Err(FormatError::InvalidField(format!(
                "Data field {tag} must have at least one subfield"
            )));
        }
        Ok(DataField {
            tag,
            indicator1,
            indicator2,
            subfields,
        })
    }

    /// Field tag
    #[must_use]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// First indicator
    #[must_use]
    pub fn indicator1(&self) -> char {
        self.indicator1
    }

    /// Second indicator
    #[must_use]
    pub fn indicator2(&self) -> char {
        self.indicator2
    }

    /// Replace both indicators.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::InvalidField` if either indicator is not
    /// printable ASCII; the field is left unchanged.
    pub fn set_indicators(&mut self, indicator1: char, indicator2: char) -> Result<()> {
        check_indicator(indicator1)?;
        check_indicator(indicator2)?;
        self.indicator1 = indicator1;
        self.indicator2 = indicator2;
        Ok(())
    }

    /// All subfields in field order
    #[must_use]
    pub fn subfields(&self) -> &[Subfield] {
        &self.subfields
    }

    /// Mutable access to the subfields for in-place value updates.
    ///
    /// The slice cannot grow or shrink, so the field stays non-empty.
    pub fn subfields_mut(&mut self) -> &mut [Subfield] {
        &mut self.subfields
    }

    /// Append a subfield.
    ///
    /// # Errors
    ///
    /// Same as [`Subfield::new`]; the field is left unchanged.
    pub fn add_subfield(&mut self, code: char, value: impl Into<Vec<u8>>) -> Result<()> {
        let subfield = Subfield::new(code, value)?;
        self.subfields.push(subfield);
        Ok(())
    }

    /// First value for a subfield code
    #[must_use]
    pub fn subfield(&self, code: char) -> Option<&[u8]> {
        self.subfields_by_code(code).next()
    }

    /// First value for a subfield code, as UTF-8
    #[must_use]
    pub fn subfield_str(&self, code: char) -> Option<&str> {
        self.subfield(code)
            .and_then(|value| std::str::from_utf8(value).ok())
    }

    /// Iterate over the values of every subfield with the given code
    pub fn subfields_by_code(&self, code: char) -> impl Iterator<Item = &[u8]> {
        self.subfields
            .iter()
            .filter(move |s| s.code == code)
            .map(Subfield::value)
    }

    /// Values of every subfield whose code is in `codes`, in field order
    #[must_use]
    pub fn get_subfields(&self, codes: &[char]) -> Vec<&[u8]> {
        self.subfields
            .iter()
            .filter(|s| codes.contains(&s.code))
            .map(Subfield::value)
            .collect()
    }

    /// Remove every subfield with the given code.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::InvalidField` if that would leave the field
    /// without subfields; nothing is removed in that case.
    pub fn remove_subfields(&mut self, code: char) -> Result<Vec<Subfield>> {
        if self.subfields.iter().all(|s| s.code == code) {
            return Err(FormatError::InvalidField(format!(
                "Removing subfield {code:?} would leave data field {} empty",
                self.tag
            )));
        }
        let (removed, kept): (SmallVec<[Subfield; 4]>, SmallVec<[Subfield; 4]>) =
            self.subfields.drain(..).partition(|s| s.code == code);
        self.subfields = kept;
        Ok(removed.into_vec())
    }

    /// Concatenated subfield values, without codes or delimiters
    #[must_use]
    pub fn value(&self) -> Vec<u8> {
        self.subfields
            .iter()
            .flat_map(|s| s.value.iter().copied())
            .collect()
    }

    /// Parse a data field body (field terminator already stripped).
    fn decode(tag: Tag, body: &[u8]) -> Result<Self> {
        let (indicators, rest) = match body {
            [i1, i2, rest @ ..] => ((*i1, *i2), rest),
            _ => {
                return Err(FormatError::InvalidField(format!(
                    "Data field {tag} too short for indicators"
                )))
            },
        };
        let rest = match rest.split_first() {
            Some((&SUBFIELD_DELIMITER, rest)) => rest,
            Some((&b, _)) => {
                return Err(FormatError::InvalidField(format!(
                    "Data field {tag}: expected subfield delimiter after indicators, got byte 0x{b:02X}"
                )))
            },
            None => {
                return Err(FormatError::InvalidField(format!(
                    "Data field {tag} has no subfields"
                )))
            },
        };

        let subfields = rest
            .split(|&b| b == SUBFIELD_DELIMITER)
            .map(|chunk| match chunk.split_first() {
                Some((&code, value)) => {
                    let code = char::from(code);
                    check_code(code)?;
                    check_content(value)?;
                    Ok(Subfield {
                        code,
                        value: value.to_vec(),
                    })
                },
                None => Err(FormatError::InvalidField(format!(
                    "Data field {tag} has an empty subfield"
                ))),
            })
            .collect::<Result<SmallVec<[Subfield; 4]>>>()?;

        Self::with_tag(
            tag,
            char::from(indicators.0),
            char::from(indicators.1),
            subfields,
        )
    }

    fn write_body(&self, out: &mut Vec<u8>) {
        // indicators and codes are ASCII by construction
        out.push(self.indicator1 as u8);
        out.push(self.indicator2 as u8);
        for subfield in &self.subfields {
            out.push(SUBFIELD_DELIMITER);
            out.push(subfield.code as u8);
            out.extend_from_slice(&subfield.value);
        }
    }
}

/// A field in a MARC record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Field {
    /// Control field (`00X`)
    Control(ControlField),
    /// Data field with indicators and subfields
    Data(DataField),
}

impl Field {
    /// Create a control field.
    ///
    /// # Errors
    ///
    /// Same as [`ControlField::new`].
    pub fn control(tag: &str, value: impl Into<Vec<u8>>) -> Result<Self> {
        ControlField::new(tag, value).map(Field::Control)
    }

    /// Create a data field.
    ///
    /// # Errors
    ///
    /// Same as [`DataField::new`].
    pub fn data(
        tag: &str,
        indicator1: char,
        indicator2: char,
        subfields: impl IntoIterator<Item = Subfield>,
    ) -> Result<Self> {
        DataField::new(tag, indicator1, indicator2, subfields).map(Field::Data)
    }

    /// Field tag
    #[must_use]
    pub fn tag(&self) -> Tag {
        match self {
            Field::Control(field) => field.tag,
            Field::Data(field) => field.tag,
        }
    }

    /// Whether this is a control field
    #[must_use]
    pub fn is_control(&self) -> bool {
        matches!(self, Field::Control(_))
    }

    /// The control field, if this is one
    #[must_use]
    pub fn as_control(&self) -> Option<&ControlField> {
        match self {
            Field::Control(field) => Some(field),
            Field::Data(_) => None,
        }
    }

    /// The control field, if this is one
    pub fn as_control_mut(&mut self) -> Option<&mut ControlField> {
        match self {
            Field::Control(field) => Some(field),
            Field::Data(_) => None,
        }
    }

    /// The data field, if this is one
    #[must_use]
    pub fn as_data(&self) -> Option<&DataField> {
        match self {
            Field::Data(field) => Some(field),
            Field::Control(_) => None,
        }
    }

    /// The data field, if this is one
    pub fn as_data_mut(&mut self) -> Option<&mut DataField> {
        match self {
            Field::Data(field) => Some(field),
            Field::Control(_) => None,
        }
    }

    /// Build a field from its tag and body bytes (field terminator stripped),
    /// choosing the variant from the tag shape.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::InvalidField` for a malformed data field body, or
    /// `FormatError::IllegalDelimiter` for a delimiter inside content.
    pub fn decode(tag: Tag, body: &[u8]) -> Result<Self> {
        if tag.is_control() {
            ControlField::with_tag(tag, body.to_vec()).map(Field::Control)
        } else {
            DataField::decode(tag, body).map(Field::Data)
        }
    }

    /// Re-check every invariant of this field.
    ///
    /// # Errors
    ///
    /// Returns the error the corresponding constructor would have returned.
    pub fn validate(&self) -> Result<()> {
        match self {
            Field::Control(field) => {
                if !field.tag.is_control() {
                    return Err(FormatError::InvalidField(format!(
                        "Tag {} is not a control tag",
                        field.tag
                    )));
                }
                check_content(&field.value)
            },
            Field::Data(field) => {
                if field.tag.is_control() {
                    return Err(FormatError::InvalidField(format!(
                        "Tag {} is a control tag and cannot carry indicators",
                        field.tag
                    )));
                }
                check_indicator(field.indicator1)?;
                check_indicator(field.indicator2)?;
                if field.subfields.is_empty() {
                    return Err(FormatError::InvalidField(format!(
                        "Data field {} must have at least one subfield",
                        field.tag
                    )));
                }
                field.subfields.iter().try_for_each(Subfield::validate)
            },
        }
    }

    /// Append the field body (without its terminator) to `out`.
    pub fn write_body(&self, out: &mut Vec<u8>) {
        match self {
            Field::Control(field) => out.extend_from_slice(&field.value),
            Field::Data(field) => field.write_body(out),
        }
    }
}

impl From<ControlField> for Field {
    fn from(field: ControlField) -> Self {
        Field::Control(field)
    }
}

impl From<DataField> for Field {
    fn from(field: DataField) -> Self {
        Field::Data(field)
    }
}
