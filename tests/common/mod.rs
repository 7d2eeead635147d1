//! Common test helpers and utilities shared across test suite.

#![allow(dead_code)]

use marc21_codec::{Field, Leader, Record, Subfield};

/// Creates a default leader for test records.
pub fn create_test_leader() -> Leader {
    Leader::new('n', 'a')
}

/// The two-field record used throughout the codec tests:
/// control field 001 and a 245 title with two subfields.
pub fn create_title_record() -> Record {
    Record::builder(create_test_leader())
        .field(Field::control("001", "123456").unwrap())
        .field(
            Field::data(
                "245",
                '1',
                '0',
                vec![
                    Subfield::new('a', "Title :").unwrap(),
                    Subfield::new('b', "a subtitle").unwrap(),
                ],
            )
            .unwrap(),
        )
        .build()
}

/// Hand-assembled bytes of [`create_title_record`].
pub fn title_record_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"00081nam a2200049   4500");
    bytes.extend_from_slice(b"001000700000245002400007\x1E");
    bytes.extend_from_slice(b"123456\x1E");
    bytes.extend_from_slice(b"10\x1FaTitle :\x1Fba subtitle\x1E");
    bytes.push(0x1D);
    bytes
}

/// Creates a realistic record with repeated and mixed field types.
pub fn create_realistic_record() -> Record {
    Record::builder(create_test_leader())
        .field(Field::control("001", "ocm12345678").unwrap())
        .field(Field::control("008", "850101s1925    nyu           000 1 eng d").unwrap())
        .field(
            Field::data(
                "100",
                '1',
                ' ',
                vec![Subfield::new('a', "Fitzgerald, F. Scott,").unwrap()],
            )
            .unwrap(),
        )
        .field(
            Field::data(
                "245",
                '1',
                '4',
                vec![
                    Subfield::new('a', "The Great Gatsby /").unwrap(),
                    Subfield::new('c', "F. Scott Fitzgerald.").unwrap(),
                ],
            )
            .unwrap(),
        )
        .field(
            Field::data(
                "650",
                ' ',
                '0',
                vec![
                    Subfield::new('a', "Rich people").unwrap(),
                    Subfield::new('z', "New York (State)").unwrap(),
                    Subfield::new('v', "Fiction.").unwrap(),
                ],
            )
            .unwrap(),
        )
        .field(
            Field::data(
                "650",
                ' ',
                '0',
                vec![Subfield::new('a', "Long Island (N.Y.)").unwrap()],
            )
            .unwrap(),
        )
        .build()
}

/// A record whose encoding is exactly `length` bytes.
///
/// One 500 field padded with filler: 37 bytes of header, 5 bytes of field
/// framing and the record terminator, so `length` must be at least 43.
pub fn record_of_length(length: usize) -> Record {
    let filler = "x".repeat(length - 43);
    Record::builder(create_test_leader())
        .field(Field::data("500", ' ', ' ', vec![Subfield::new('a', filler).unwrap()]).unwrap())
        .build()
}
