//! Parallel record decoding using Rayon.
//!
//! Boundaries are found sequentially by [`RecordBoundaryScanner`]; each record
//! body is then decoded independently on Rayon's work-stealing thread pool.
//! Results come back in buffer order, one per record, so a bad record does
//! not hide the good ones around it.
//!
//! # Examples
//!
//! ```
//! use marc21_codec::parallel::decode_buffer_parallel;
//! use marc21_codec::{encode_many, DecodeOptions, Record};
//!
//! let records = vec![Record::new('n', 'a'); 8];
//! let buffer = encode_many(&records)?;
//!
//! let decoded = decode_buffer_parallel(&buffer, &DecodeOptions::default())?;
//! assert_eq!(decoded.len(), 8);
//! assert!(decoded.iter().all(Result::is_ok));
//! # Ok::<(), marc21_codec::FormatError>(())
//! ```

use crate::assembler::decode_with;
use crate::boundary_scanner::RecordBoundaryScanner;
use crate::error::{FormatError, Result};
use crate::options::DecodeOptions;
use crate::record::Record;
use rayon::prelude::*;

/// Decode the records at the given (offset, length) spans in parallel.
///
/// The thread pool respects the `RAYON_NUM_THREADS` environment variable.
/// A span that runs past the end of `buffer` yields
/// `FormatError::TruncatedStream` in its slot.
#[must_use]
pub fn decode_batch_parallel(
    buffer: &[u8],
    spans: &[(usize, usize)],
    options: &DecodeOptions,
) -> Vec<Result<Record>> {
    spans
        .par_iter()
        .map(|&(offset, length)| {
            let bytes = offset
                .checked_add(length)
                .and_then(|end| buffer.get(offset..end))
                .ok_or_else(|| FormatError::TruncatedStream {
                    offset: offset as u64,
                    detail: format!(
                        "span of {length} bytes exceeds buffer size {}",
                        buffer.len()
                    ),
                })?;
            decode_with(bytes, &mut options.context())
        })
        .collect()
}

/// Find every record in `buffer` and decode them in parallel.
///
/// # Errors
///
/// Returns the boundary scanner's error if the buffer cannot be split into
/// records; per-record decode errors are returned in their slots instead.
pub fn decode_buffer_parallel(
    buffer: &[u8],
    options: &DecodeOptions,
) -> Result<Vec<Result<Record>>> {
    let spans = RecordBoundaryScanner::new().scan(buffer)?;
    Ok(decode_batch_parallel(buffer, &spans, options))
}
