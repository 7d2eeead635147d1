//! Reading MARC records from concatenated byte streams.
//!
//! This module provides [`StreamReader`] for walking ISO 2709 records from any
//! source that implements [`std::io::Read`]. Each record declares its own
//! length in its first five bytes, so the reader finds boundaries without
//! scanning for terminators.
//!
//! # Examples
//!
//! Reading records from a file:
//!
//! ```no_run
//! use marc21_codec::StreamReader;
//! use std::fs::File;
//!
//! let file = File::open("records.mrc")?;
//! let mut reader = StreamReader::new(file);
//!
//! while let Some(record) = reader.read_record()? {
//!     println!("Record type: {}", record.leader.record_type);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Collecting per-record results:
//!
//! ```
//! use marc21_codec::{encode_many, Record, StreamReader};
//! use std::io::Cursor;
//!
//! let data = encode_many([&Record::new('n', 'a'), &Record::new('c', 'a')])?;
//! let results: Vec<_> = StreamReader::new(Cursor::new(data)).collect();
//! assert_eq!(results.len(), 2);
//! # Ok::<(), marc21_codec::FormatError>(())
//! ```

use crate::assembler::decode_with;
use crate::error::{FormatError, Result};
use crate::leader::declared_length;
use crate::options::DecodeOptions;
use crate::record::Record;
use crate::recovery::RecoveryMode;
use std::io::{ErrorKind, Read};

/// The undecoded bytes of one record, with their position in the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Byte offset of the record from the start of the stream
    pub offset: u64,
    /// The record's bytes, exactly as long as its leader declares
    pub bytes: Vec<u8>,
}

impl RawRecord {
    /// Decode the record under the given options.
    ///
    /// # Errors
    ///
    /// Same as [`crate::assembler::decode_with`].
    pub fn decode(&self, options: &DecodeOptions) -> Result<Record> {
        decode_with(&self.bytes, &mut options.context())
    }
}

/// Reader for concatenated ISO 2709 records.
///
/// Yields one `Result<Record>` per record. A record that fails to decode is
/// reported and reading continues with the next record, whose position is
/// known from the failed record's length prefix. Failures that lose the
/// position of the next record (an unreadable length prefix, a truncated
/// stream or an I/O error) are reported once and end the iteration.
///
/// The reader only moves forward; to read again, open a new reader over the
/// source from its start.
#[derive(Debug)]
pub struct StreamReader<R: Read> {
    reader: R,
    options: DecodeOptions,
    offset: u64,
    records_read: usize,
    finished: bool,
    warnings: Vec<String>,
}

impl<R: Read> StreamReader<R> {
    /// Create a new strict reader.
    pub fn new(reader: R) -> Self {
        StreamReader {
            reader,
            options: DecodeOptions::default(),
            offset: 0,
            records_read: 0,
            finished: false,
            warnings: Vec::new(),
        }
    }

    /// Set the decode options applied to every record.
    #[must_use]
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the recovery mode for non-conformant records.
    ///
    /// # Examples
    ///
    /// ```
    /// use marc21_codec::{RecoveryMode, StreamReader};
    /// use std::io::Cursor;
    ///
    /// let reader = StreamReader::new(Cursor::new(Vec::new()))
    ///     .with_recovery_mode(RecoveryMode::Lenient);
    /// ```
    #[must_use]
    pub fn with_recovery_mode(mut self, mode: RecoveryMode) -> Self {
        self.options.recovery_mode = mode;
        self
    }

    /// Read the next record's bytes without decoding them.
    ///
    /// Returns `Ok(None)` at the end of the stream. Fewer than five trailing
    /// bytes that are all whitespace also count as the end of the stream.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::TruncatedStream` if the stream ends inside a
    /// record, `FormatError::BadLeaderField` for an unreadable length prefix,
    /// or `FormatError::Io`. All of these end the stream.
    pub fn next_raw(&mut self) -> Result<Option<RawRecord>> {
        if self.finished {
            return Ok(None);
        }
        let result = self.read_raw();
        if !matches!(result, Ok(Some(_))) {
            self.finished = true;
        }
        result
    }

    fn read_raw(&mut self) -> Result<Option<RawRecord>> {
        let offset = self.offset;

        let mut prefix = [0u8; 5];
        let got = self.fill(&mut prefix)?;
        if got < prefix.len() {
            if prefix[..got].iter().all(u8::is_ascii_whitespace) {
                return Ok(None);
            }
            return Err(FormatError::TruncatedStream {
                offset,
                detail: format!("{got} bytes left, a length prefix needs 5"),
            });
        }
        let declared = declared_length(&prefix)?;

        let mut bytes = vec![0u8; declared];
        bytes[..5].copy_from_slice(&prefix);
        let got = 5 + self.fill(&mut bytes[5..])?;
        self.offset += got as u64;
        if got < declared {
            return Err(FormatError::TruncatedStream {
                offset,
                detail: format!("record declares {declared} bytes, only {got} available"),
            });
        }

        self.records_read += 1;
        Ok(Some(RawRecord { offset, bytes }))
    }

    /// Read until `buf` is full or the source is exhausted.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {},
                Err(e) => return Err(FormatError::Io(e)),
            }
        }
        Ok(filled)
    }

    /// Read and decode a single record.
    ///
    /// Returns `Ok(Some(record))` if a record was decoded, `Ok(None)` at the
    /// end of the stream, or `Err` for a record that could not be read or
    /// decoded.
    ///
    /// # Errors
    ///
    /// Any error from [`StreamReader::next_raw`] or from decoding the record.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        let Some(raw) = self.next_raw()? else {
            return Ok(None);
        };
        let mut context = self.options.context();
        let result = decode_with(&raw.bytes, &mut context);
        self.warnings.extend(
            context
                .take_messages()
                .into_iter()
                .map(|message| format!("record at offset {}: {message}", raw.offset)),
        );
        result.map(Some)
    }

    /// Byte offset of the next record from the start of the stream.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of records whose bytes were read completely.
    #[must_use]
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Messages recorded while decoding leniently.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Recover the underlying source.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Iterator for StreamReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}
