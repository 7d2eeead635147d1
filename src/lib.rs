#![warn(missing_docs)]

//! # marc21-codec
//!
//! A byte-exact codec for MARC21 bibliographic records in the ISO 2709 binary
//! format.
//!
//! ## Quick Start
//!
//! ### Decoding a stream of records
//!
//! ```no_run
//! use marc21_codec::StreamReader;
//! use std::fs::File;
//!
//! let file = File::open("records.mrc")?;
//! for result in StreamReader::new(file) {
//!     match result {
//!         Ok(record) => println!("{} fields", record.fields().len()),
//!         Err(e) => eprintln!("skipping record: {e}"),
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Building and encoding a record
//!
//! ```
//! use marc21_codec::{decode, encode_one, DataField, Field, Record, Subfield};
//!
//! let mut record = Record::new('n', 'a');
//! record.add_field(Field::control("001", "123456")?);
//! record.add_field(Field::Data(DataField::new(
//!     "245",
//!     '1',
//!     '0',
//!     vec![Subfield::new('a', "Title :")?, Subfield::new('b', "a subtitle")?],
//! )?));
//!
//! let bytes = encode_one(&record)?;
//! let decoded = decode(&bytes)?;
//! assert_eq!(decoded.fields(), record.fields());
//! # Ok::<(), marc21_codec::FormatError>(())
//! ```
//!
//! ## Modules
//!
//! - [`leader`]: 24-byte record header codec
//! - [`directory`]: 12-byte offset table entries
//! - [`tag`] and [`field`]: the field model
//! - [`record`]: the owning [`Record`] type
//! - [`assembler`]: record ⇄ (leader, directory, data) conversion
//! - [`reader`] and [`boundary_scanner`]: walking concatenated streams
//! - [`writer`]: encoding records to bytes and sinks
//! - [`parallel`]: decoding independently-delimited records on rayon
//! - [`options`] and [`recovery`]: explicit decode/encode configuration
//! - [`error`]: error types and result alias

pub mod assembler;
pub mod boundary_scanner;
pub mod directory;
pub mod error;
pub mod field;
pub mod leader;
pub mod options;
pub mod parallel;
pub mod reader;
pub mod record;
pub mod recovery;
pub mod tag;
pub mod writer;

/// Terminates every field and the directory.
pub const FIELD_TERMINATOR: u8 = 0x1E;
/// Introduces every subfield inside a data field.
pub const SUBFIELD_DELIMITER: u8 = 0x1F;
/// Terminates every record.
pub const RECORD_TERMINATOR: u8 = 0x1D;

pub use assembler::{decode, decode_with, from_parts, to_parts, RecordParts};
pub use boundary_scanner::RecordBoundaryScanner;
pub use directory::DirectoryEntry;
pub use error::{FormatError, Result};
pub use field::{ControlField, DataField, Field, Subfield};
pub use leader::{CharacterCoding, Leader};
pub use options::{DecodeOptions, EncodeOptions};
pub use reader::{RawRecord, StreamReader};
pub use record::{Record, RecordBuilder};
pub use recovery::{RecoveryContext, RecoveryMode};
pub use tag::Tag;
pub use writer::{encode_many, encode_one, encode_with, StreamWriter};
