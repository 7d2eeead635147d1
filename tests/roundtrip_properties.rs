//! Property tests: any record built through the field model survives
//! encode then decode unchanged, with a consistent header.

use marc21_codec::{decode, encode_one, Field, Leader, Record, Subfield, FIELD_TERMINATOR};
use proptest::prelude::*;

fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    // any bytes except the three delimiters
    prop::collection::vec(
        any::<u8>().prop_filter("delimiter", |b| !(0x1D..=0x1F).contains(b)),
        0..40,
    )
}

fn code_strategy() -> impl Strategy<Value = char> {
    prop::char::range('a', 'z').prop_union(prop::char::range('0', '9'))
}

fn indicator_strategy() -> impl Strategy<Value = char> {
    prop::sample::select(vec![' ', '0', '1', '2', '4', '7'])
}

fn field_strategy() -> impl Strategy<Value = Field> {
    let control = (1u8..10, value_strategy())
        .prop_map(|(n, value)| Field::control(&format!("00{n}"), value).unwrap());
    let data = (
        10u16..1000,
        indicator_strategy(),
        indicator_strategy(),
        prop::collection::vec((code_strategy(), value_strategy()), 1..6),
    )
        .prop_map(|(n, ind1, ind2, subfields)| {
            let subfields = subfields
                .into_iter()
                .map(|(code, value)| Subfield::new(code, value).unwrap());
            Field::data(&format!("{n:03}"), ind1, ind2, subfields).unwrap()
        });
    prop_oneof![control, data]
}

fn record_strategy() -> impl Strategy<Value = Record> {
    (
        prop::sample::select(vec!['a', 'c', 'd', 'n', 'p']),
        prop::sample::select(vec!['a', 'c', 'e', 'g', 'j', 'm']),
        prop::collection::vec(field_strategy(), 0..20),
    )
        .prop_map(|(status, kind, fields)| {
            Record::builder(Leader::new(status, kind))
                .fields(fields)
                .build()
        })
}

proptest! {
    #[test]
    fn encode_then_decode_preserves_fields(record in record_strategy()) {
        let bytes = encode_one(&record).unwrap();
        let decoded = decode(&bytes).unwrap();

        prop_assert_eq!(decoded.fields(), record.fields());
        prop_assert_eq!(decoded.leader.record_status, record.leader.record_status);
        prop_assert_eq!(decoded.leader.record_type, record.leader.record_type);
        prop_assert_eq!(encode_one(&decoded).unwrap(), bytes);
    }

    #[test]
    fn header_is_consistent(record in record_strategy()) {
        let bytes = encode_one(&record).unwrap();
        let leader = Leader::decode(&bytes[..24]).unwrap();
        let base = leader.data_base_address as usize;

        prop_assert_eq!(leader.record_length as usize, bytes.len());
        prop_assert_eq!(base, 24 + 12 * record.fields().len() + 1);
        prop_assert_eq!(bytes[base - 1], FIELD_TERMINATOR);
    }

    #[test]
    fn decode_never_panics_on_arbitrary_bytes(bytes in prop::collection::vec(any::<u8>(), 0..200)) {
        let _ = decode(&bytes);
    }
}
