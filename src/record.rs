//! MARC record structure and operations.
//!
//! A [`Record`] owns its [`Leader`] and an ordered list of [`Field`]s. Field
//! order is the order fields are written to the directory and the data area,
//! so it is preserved exactly across decode and encode.
//!
//! # Examples
//!
//! ```
//! use marc21_codec::{Field, Leader, Record, Subfield};
//!
//! let record = Record::builder(Leader::new('n', 'a'))
//!     .field(Field::control("001", "12345")?)
//!     .field(Field::data("650", ' ', '0', vec![Subfield::new('a', "Cats")?])?)
//!     .field(Field::data("650", ' ', '0', vec![Subfield::new('a', "Dogs")?])?)
//!     .build();
//!
//! let subjects: Vec<_> = record
//!     .data_fields("650")
//!     .filter_map(|f| f.subfield_str('a'))
//!     .collect();
//! assert_eq!(subjects, ["Cats", "Dogs"]);
//! # Ok::<(), marc21_codec::FormatError>(())
//! ```

use crate::error::{FormatError, Result};
use crate::field::{ControlField, DataField, Field};
use crate::leader::Leader;
use serde::Serialize;

/// A MARC bibliographic record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Record leader (24 bytes)
    pub leader: Leader,
    fields: Vec<Field>,
}

impl Record {
    /// Create an empty record with the given record status and type
    #[must_use]
    pub fn new(record_status: char, record_type: char) -> Self {
        Self::with_leader(Leader::new(record_status, record_type))
    }

    /// Create an empty record with the given leader
    #[must_use]
    pub fn with_leader(leader: Leader) -> Self {
        Record {
            leader,
            fields: Vec::new(),
        }
    }

    pub(crate) fn from_fields(leader: Leader, fields: Vec<Field>) -> Self {
        Record { leader, fields }
    }

    /// Create a builder for fluently constructing records
    #[must_use]
    pub fn builder(leader: Leader) -> RecordBuilder {
        RecordBuilder {
            record: Record::with_leader(leader),
        }
    }

    /// All fields in record order
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Mutable access to the fields for in-place edits.
    pub fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    /// Append a field
    pub fn add_field(&mut self, field: impl Into<Field>) {
        self.fields.push(field.into());
    }

    /// Insert a field at `index`, shifting later fields back.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::InvalidField` if `index` is past the end.
    pub fn insert_field(&mut self, index: usize, field: impl Into<Field>) -> Result<()> {
        if index > self.fields.len() {
            return Err(FormatError::InvalidField(format!(
                "Insert position {index} is past the last of {} fields",
                self.fields.len()
            )));
        }
        self.fields.insert(index, field.into());
        Ok(())
    }

    /// Remove and return the field at `index`
    pub fn remove_field(&mut self, index: usize) -> Option<Field> {
        (index < self.fields.len()).then(|| self.fields.remove(index))
    }

    /// Remove and return every field with the given tag
    pub fn remove_fields_by_tag(&mut self, tag: &str) -> Vec<Field> {
        let (removed, kept) = std::mem::take(&mut self.fields)
            .into_iter()
            .partition(|f| f.tag() == tag);
        self.fields = kept;
        removed
    }

    /// Remove every field
    pub fn clear_fields(&mut self) {
        self.fields.clear();
    }

    /// Iterate over fields with a given tag, in record order
    pub fn fields_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.iter().filter(move |f| f.tag() == tag)
    }

    /// Iterate mutably over fields with a given tag, in record order
    pub fn fields_by_tag_mut<'a>(
        &'a mut self,
        tag: &'a str,
    ) -> impl Iterator<Item = &'a mut Field> + 'a {
        self.fields.iter_mut().filter(move |f| f.tag() == tag)
    }

    /// First field with a given tag
    #[must_use]
    pub fn field(&self, tag: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.tag() == tag)
    }

    /// First field with a given tag, mutably
    pub fn field_mut(&mut self, tag: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.tag() == tag)
    }

    /// First control field with a given tag
    #[must_use]
    pub fn control_field(&self, tag: &str) -> Option<&ControlField> {
        self.fields
            .iter()
            .filter(|f| f.tag() == tag)
            .find_map(Field::as_control)
    }

    /// Iterate over data fields with a given tag, in record order
    pub fn data_fields<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a DataField> + 'a {
        self.fields_by_tag(tag).filter_map(Field::as_data)
    }

    /// Iterate mutably over data fields with a given tag, in record order
    pub fn data_fields_mut<'a>(
        &'a mut self,
        tag: &'a str,
    ) -> impl Iterator<Item = &'a mut DataField> + 'a {
        self.fields_by_tag_mut(tag).filter_map(Field::as_data_mut)
    }
}

/// Builder for fluently constructing records
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    /// Append a field
    #[must_use]
    pub fn field(mut self, field: impl Into<Field>) -> Self {
        self.record.add_field(field);
        self
    }

    /// Append several fields
    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.record.fields.extend(fields);
        self
    }

    /// Build the record
    #[must_use]
    pub fn build(self) -> Record {
        self.record
    }
}
