//! Integration tests for decoding and encoding single records.

mod common;

use common::{create_realistic_record, create_title_record, title_record_bytes};
use marc21_codec::{
    decode, decode_with, directory, encode_one, to_parts, DecodeOptions, Field, FormatError,
    Leader, Record, RecoveryMode, Subfield, FIELD_TERMINATOR, RECORD_TERMINATOR,
};

#[test]
fn test_decode_title_record_fields_in_order() {
    let record = decode(&title_record_bytes()).expect("Failed to decode record");

    assert_eq!(record.fields().len(), 2);
    assert_eq!(
        record.fields()[0],
        Field::control("001", "123456").unwrap()
    );

    let title = record.fields()[1].as_data().expect("245 is a data field");
    assert_eq!(title.tag(), "245");
    assert_eq!(title.indicator1(), '1');
    assert_eq!(title.indicator2(), '0');
    let codes: Vec<char> = title.subfields().iter().map(Subfield::code).collect();
    assert_eq!(codes, vec!['a', 'b']);
    assert_eq!(title.subfield_str('a'), Some("Title :"));
    assert_eq!(title.subfield_str('b'), Some("a subtitle"));
}

#[test]
fn test_decode_then_encode_is_byte_exact() {
    let bytes = title_record_bytes();
    let record = decode(&bytes).unwrap();
    assert_eq!(encode_one(&record).unwrap(), bytes);
    assert_eq!(encode_one(&create_title_record()).unwrap(), bytes);
}

#[test]
fn test_encoded_length_and_base_address_are_consistent() {
    let record = create_realistic_record();
    let bytes = encode_one(&record).unwrap();
    let leader = Leader::decode(&bytes[..24]).unwrap();

    assert_eq!(leader.record_length as usize, bytes.len());
    let fields = record.fields().len();
    assert_eq!(leader.data_base_address as usize, 24 + 12 * fields + 1);
    assert_eq!(bytes[leader.data_base_address as usize - 1], FIELD_TERMINATOR);
    assert_eq!(bytes[bytes.len() - 1], RECORD_TERMINATOR);
}

#[test]
fn test_directory_entries_tile_the_data_region() {
    let record = create_realistic_record();
    let parts = to_parts(&record).unwrap();

    let mut expected_start = 0;
    for (entry, field) in parts.directory.iter().zip(record.fields()) {
        assert_eq!(entry.tag, field.tag());
        assert_eq!(entry.start, expected_start);
        assert_eq!(parts.data[entry.end() - 1], FIELD_TERMINATOR);
        expected_start = entry.end();
    }
    assert_eq!(expected_start, parts.data.len());
    assert!(directory::check_contiguous(&parts.directory, parts.data.len()).is_ok());
}

#[test]
fn test_realistic_record_survives_round_trip() {
    let record = create_realistic_record();
    let decoded = decode(&encode_one(&record).unwrap()).unwrap();
    assert_eq!(decoded.fields(), record.fields());
    assert_eq!(decoded.leader.bibliographic_level, 'm');

    let subjects: Vec<_> = decoded
        .data_fields("650")
        .filter_map(|f| f.subfield_str('a'))
        .collect();
    assert_eq!(subjects, vec!["Rich people", "Long Island (N.Y.)"]);
}

#[test]
fn test_truncated_buffer_is_an_error_not_a_partial_record() {
    let bytes = title_record_bytes();
    let result = decode(&bytes[..bytes.len() - 10]);
    assert!(matches!(
        result,
        Err(FormatError::TruncatedRecord {
            expected: 81,
            actual: 71
        })
    ));

    for cut in 0..bytes.len() {
        assert!(decode(&bytes[..cut]).is_err(), "prefix of {cut} bytes decoded");
    }
}

#[test]
fn test_illegal_subfield_value_leaves_record_unchanged() {
    let mut record = create_title_record();
    let before = record.clone();

    let title = record.data_fields_mut("245").next().unwrap();
    let result = title.add_subfield('a', b"before\x1Fafter".to_vec());

    assert!(matches!(
        result,
        Err(FormatError::IllegalDelimiter { byte: 0x1F, .. })
    ));
    assert_eq!(record, before);
    assert_eq!(encode_one(&record).unwrap(), title_record_bytes());
}

#[test]
fn test_illegal_delimiters_rejected_everywhere() {
    for byte in [0x1Du8, 0x1E, 0x1F] {
        let value = vec![b'a', byte, b'b'];
        assert!(Field::control("001", value.clone()).is_err());
        assert!(Subfield::new('a', value).is_err());
    }
    assert!(Field::data("245", '\x1F', '0', vec![]).is_err());
    assert!(Subfield::new('\x1E', "x").is_err());
}

#[test]
fn test_empty_record_round_trip() {
    let record = Record::new('n', 'a');
    let bytes = encode_one(&record).unwrap();
    assert_eq!(bytes.len(), 26);
    assert_eq!(&bytes[..24], b"00026nam a2200025   4500");
    assert_eq!(decode(&bytes).unwrap(), {
        let mut expected = record;
        expected.leader.record_length = 26;
        expected.leader.data_base_address = 25;
        expected
    });
}

#[test]
fn test_strict_and_lenient_leader_handling() {
    let mut bytes = title_record_bytes();
    // indicator count and entry map
    bytes[10] = b' ';
    bytes[20] = b'?';

    assert!(matches!(
        decode(&bytes),
        Err(FormatError::BadLeaderField { position: 10, .. })
    ));

    let mut context = DecodeOptions::new()
        .with_recovery_mode(RecoveryMode::Lenient)
        .context();
    let record = decode_with(&bytes, &mut context).unwrap();
    assert_eq!(record.leader.indicator_count, 2);
    assert_eq!(record.leader.length_of_field_length, 4);
    assert_eq!(context.recovery_messages.len(), 2);
    assert_eq!(record.fields(), create_title_record().fields());
}

#[test]
fn test_lenient_mode_never_recovers_record_length() {
    let mut bytes = title_record_bytes();
    bytes[2] = b'Z';
    let mut context = DecodeOptions::new()
        .with_recovery_mode(RecoveryMode::Lenient)
        .context();
    assert!(matches!(
        decode_with(&bytes, &mut context),
        Err(FormatError::BadLeaderField { position: 2, .. })
    ));
}

#[test]
fn test_record_serializes_to_json() {
    let json = serde_json::to_value(create_title_record()).unwrap();
    assert_eq!(json["leader"]["record_type"], "a");
    assert_eq!(json["fields"][0]["kind"], "control");
    assert_eq!(json["fields"][0]["tag"], "001");
    assert_eq!(json["fields"][1]["kind"], "data");
    assert_eq!(json["fields"][1]["tag"], "245");
}
