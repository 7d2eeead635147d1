//! Record boundary detection over in-memory buffers.
//!
//! Each record declares its own length in its first five bytes, so the
//! scanner hops from prefix to prefix without looking at record bodies.
//! Boundaries are returned as (offset, length) tuples for use in parallel
//! decoding.
//!
//! # Example
//!
//! ```
//! use marc21_codec::{encode_many, Record, RecordBoundaryScanner};
//!
//! let buffer = encode_many([&Record::new('n', 'a'), &Record::new('n', 'a')])?;
//! let mut scanner = RecordBoundaryScanner::new();
//! let boundaries = scanner.scan(&buffer)?;
//!
//! assert_eq!(boundaries, vec![(0, 26), (26, 26)]);
//! # Ok::<(), marc21_codec::FormatError>(())
//! ```

use crate::error::{FormatError, Result};
use crate::leader::declared_length;

/// Record boundary scanner driven by length prefixes.
///
/// Trailing bytes that are too short to hold a length prefix and are all
/// whitespace are ignored, the same as at the end of a stream.
#[derive(Debug, Default)]
pub struct RecordBoundaryScanner {
    /// Pre-allocated buffer for reuse across scans
    boundaries: Vec<(usize, usize)>,
}

impl RecordBoundaryScanner {
    /// Create a new boundary scanner with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            boundaries: Vec::with_capacity(100),
        }
    }

    /// Scan a buffer for record boundaries.
    ///
    /// Returns one (offset, length) tuple per record, in buffer order. The
    /// length includes the record terminator. An empty buffer holds no
    /// records.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::BadLeaderField` for an unreadable length prefix
    /// or `FormatError::TruncatedStream` if the buffer ends inside a record.
    pub fn scan(&mut self, buffer: &[u8]) -> Result<Vec<(usize, usize)>> {
        self.scan_limited(buffer, usize::MAX)
    }

    /// Scan a buffer and return boundaries up to a maximum limit.
    ///
    /// Scanning stops once `limit` records are found, so anything after them
    /// is never examined.
    ///
    /// # Errors
    ///
    /// Same as [`RecordBoundaryScanner::scan`], for the records examined.
    pub fn scan_limited(&mut self, buffer: &[u8], limit: usize) -> Result<Vec<(usize, usize)>> {
        self.boundaries.clear();
        let mut offset = 0;

        while self.boundaries.len() < limit && offset < buffer.len() {
            let rest = &buffer[offset..];
            let Some(prefix) = rest.get(..5).and_then(|p| <&[u8; 5]>::try_from(p).ok()) else {
                if rest.iter().all(u8::is_ascii_whitespace) {
                    break;
                }
                return Err(FormatError::TruncatedStream {
                    offset: offset as u64,
                    detail: format!("{} bytes left, a length prefix needs 5", rest.len()),
                });
            };
            let length = declared_length(prefix)?;
            if length > rest.len() {
                return Err(FormatError::TruncatedStream {
                    offset: offset as u64,
                    detail: format!(
                        "record declares {length} bytes, only {} available",
                        rest.len()
                    ),
                });
            }
            self.boundaries.push((offset, length));
            offset += length;
        }

        Ok(self.boundaries.clone())
    }

    /// Count the records in a buffer without decoding them.
    ///
    /// # Errors
    ///
    /// Same as [`RecordBoundaryScanner::scan`].
    pub fn count_records(&mut self, buffer: &[u8]) -> Result<usize> {
        self.scan(buffer).map(|boundaries| boundaries.len())
    }

    /// Get the current capacity of the scanner.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.boundaries.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, Subfield};
    use crate::record::Record;
    use crate::writer::{encode_many, encode_one};

    fn titled(title: &str) -> Record {
        let mut record = Record::new('n', 'a');
        record.add_field(
            Field::data("245", '0', '0', vec![Subfield::new('a', title).unwrap()]).unwrap(),
        );
        record
    }

    #[test]
    fn test_scan_multiple_records() {
        let a = titled("A");
        let b = titled("Longer title");
        let a_len = encode_one(&a).unwrap().len();
        let b_len = encode_one(&b).unwrap().len();
        let buffer = encode_many([&a, &b, &a]).unwrap();

        let mut scanner = RecordBoundaryScanner::new();
        let boundaries = scanner.scan(&buffer).unwrap();
        assert_eq!(
            boundaries,
            vec![(0, a_len), (a_len, b_len), (a_len + b_len, a_len)]
        );
    }

    #[test]
    fn test_scan_ignores_terminator_bytes_in_bodies() {
        // the scanner never looks past the length prefix
        let mut buffer = b"00030".to_vec();
        buffer.extend_from_slice(&[0x1D; 25]);
        let mut scanner = RecordBoundaryScanner::new();
        assert_eq!(scanner.scan(&buffer).unwrap(), vec![(0, 30)]);
    }

    #[test]
    fn test_scan_empty_buffer() {
        let mut scanner = RecordBoundaryScanner::new();
        assert!(scanner.scan(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_scan_trailing_whitespace() {
        let mut buffer = encode_one(&titled("A")).unwrap();
        let len = buffer.len();
        buffer.extend_from_slice(b"\n");
        let mut scanner = RecordBoundaryScanner::new();
        assert_eq!(scanner.scan(&buffer).unwrap(), vec![(0, len)]);
    }

    #[test]
    fn test_scan_truncated_record() {
        let buffer = encode_one(&titled("A")).unwrap();
        let mut scanner = RecordBoundaryScanner::new();
        assert!(matches!(
            scanner.scan(&buffer[..buffer.len() - 1]),
            Err(FormatError::TruncatedStream { offset: 0, .. })
        ));
        assert!(matches!(
            scanner.scan(b"000"),
            Err(FormatError::TruncatedStream { offset: 0, .. })
        ));
    }

    #[test]
    fn test_scan_bad_prefix() {
        let mut scanner = RecordBoundaryScanner::new();
        assert!(matches!(
            scanner.scan(b"00010nam a2200025   4500"),
            Err(FormatError::BadLeaderField { position: 0, .. })
        ));
        assert!(matches!(
            scanner.scan(b"abcdefghijklmnopqrstuvwxyz"),
            Err(FormatError::BadLeaderField { .. })
        ));
    }

    #[test]
    fn test_scan_limited() {
        let record = titled("A");
        let len = encode_one(&record).unwrap().len();
        let mut buffer = encode_many([&record, &record]).unwrap();
        // garbage after the limit is never examined
        buffer.extend_from_slice(b"garbage");

        let mut scanner = RecordBoundaryScanner::new();
        let boundaries = scanner.scan_limited(&buffer, 2).unwrap();
        assert_eq!(boundaries, vec![(0, len), (len, len)]);
    }

    #[test]
    fn test_reuse_scanner() {
        let mut scanner = RecordBoundaryScanner::new();
        let record = titled("A");
        let len = encode_one(&record).unwrap().len();

        let first = encode_many([&record, &record]).unwrap();
        assert_eq!(scanner.count_records(&first).unwrap(), 2);

        let second = encode_one(&record).unwrap();
        assert_eq!(scanner.scan(&second).unwrap(), vec![(0, len)]);
        assert!(scanner.capacity() >= 2);
    }
}
