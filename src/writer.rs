//! Encoding records to ISO 2709 bytes.
//!
//! [`encode_one`] and [`encode_many`] return complete byte buffers; a record
//! either encodes completely or not at all. [`StreamWriter`] writes encoded
//! records to any destination implementing [`std::io::Write`].
//!
//! # Examples
//!
//! ```
//! use marc21_codec::{encode_many, Field, Record, Subfield};
//!
//! let mut record = Record::new('n', 'a');
//! record.add_field(Field::data("245", '1', '0', vec![Subfield::new('a', "Title")?])?);
//!
//! let bytes = encode_many([&record, &record])?;
//! assert_eq!(&bytes[0..5], b"00048");
//! assert_eq!(bytes.len(), 2 * 48);
//! # Ok::<(), marc21_codec::FormatError>(())
//! ```

use crate::assembler::to_parts;
use crate::error::{FormatError, Result};
use crate::options::EncodeOptions;
use crate::record::Record;
use std::io::Write;

/// Encode one record.
///
/// # Errors
///
/// Returns the first invariant or range error found; no bytes are produced
/// in that case.
pub fn encode_one(record: &Record) -> Result<Vec<u8>> {
    encode_with(record, &EncodeOptions::default())
}

/// Encode one record under explicit options.
///
/// # Errors
///
/// Same as [`encode_one`].
pub fn encode_with(record: &Record, options: &EncodeOptions) -> Result<Vec<u8>> {
    let mut parts = to_parts(record)?;
    if let Some(coding) = options.character_coding {
        parts.leader.character_coding = coding.as_leader_char();
    }
    parts.to_bytes()
}

/// Encode records back to back.
///
/// The stream format has no container header, so this is the plain
/// concatenation of [`encode_one`] for each record.
///
/// # Errors
///
/// Returns the first record's error; no partial output is returned.
pub fn encode_many<'a>(records: impl IntoIterator<Item = &'a Record>) -> Result<Vec<u8>> {
    records.into_iter().try_fold(Vec::new(), |mut out, record| {
        out.extend_from_slice(&encode_one(record)?);
        Ok(out)
    })
}

/// Writer for ISO 2709 binary MARC format.
///
/// Each record is encoded in full before any of its bytes reach the
/// destination, so an encoding error never leaves half a record behind.
///
/// # Examples
///
/// ```
/// use marc21_codec::{Record, StreamWriter};
///
/// let mut buffer = Vec::new();
/// let mut writer = StreamWriter::new(&mut buffer);
/// writer.write_record(&Record::new('n', 'a'))?;
/// writer.finish()?;
/// assert_eq!(writer.records_written(), 1);
/// # Ok::<(), marc21_codec::FormatError>(())
/// ```
#[derive(Debug)]
pub struct StreamWriter<W: Write> {
    writer: W,
    options: EncodeOptions,
    records_written: usize,
    finished: bool,
}

impl<W: Write> StreamWriter<W> {
    /// Create a new writer.
    pub fn new(writer: W) -> Self {
        StreamWriter {
            writer,
            options: EncodeOptions::default(),
            records_written: 0,
            finished: false,
        }
    }

    /// Set the options applied to every record written.
    #[must_use]
    pub fn with_options(mut self, options: EncodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Encode and write a single record.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer is finished, the record cannot be
    /// encoded, or the destination fails.
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        if self.finished {
            return Err(FormatError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "Cannot write to a finished writer",
            )));
        }
        let bytes = encode_with(record, &self.options)?;
        self.writer.write_all(&bytes)?;
        self.records_written += 1;
        Ok(())
    }

    /// Encode and write several records, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Same as [`StreamWriter::write_record`].
    pub fn write_records<'a>(&mut self, records: impl IntoIterator<Item = &'a Record>) -> Result<()> {
        records
            .into_iter()
            .try_for_each(|record| self.write_record(record))
    }

    /// Flush the writer and mark it as finished.
    ///
    /// After calling `finish`, no more records can be written.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing the underlying writer fails.
    pub fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.finished = true;
        Ok(())
    }

    /// Returns the number of records written so far.
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Recover the underlying destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
