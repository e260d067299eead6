//! Unit tests for UTF-8 decoding and conversion

use ecma_string::{unicode_from_utf8, utf};

#[test]
fn test_decode_table() {
    let cases: &[(&[u8], i32)] = &[
        (&[0x00], 0),
        (&[0x7E], 126),
        (&[0x7F], 127),
        (&[0x80], -1),
        (&[0xDF, 0xBF], 2047),
        (&[0xEF, 0xBF, 0xBF], 65535),
        (&[0xF7, 0xBF, 0xBF, 0xBF], 2_097_151),
        (&[0xC2, 0x7F], -1),
        (&[0xF0, 0x9F, 0x98], -1),
    ];
    for &(bytes, expected) in cases {
        let mut cursor = 0;
        assert_eq!(unicode_from_utf8(bytes, bytes.len(), &mut cursor), expected, "{:02X?}", bytes);
        if expected < 0 {
            assert_eq!(cursor, 0, "cursor moved on failure for {:02X?}", bytes);
        } else {
            assert_eq!(cursor, bytes.len());
        }
    }
}

#[test]
fn test_decode_sequence_advances_cursor() {
    let bytes = "a中😀".as_bytes();
    let mut cursor = 0;
    let mut decoded = Vec::new();
    while cursor < bytes.len() {
        let remaining = bytes.len() - cursor;
        decoded.push(unicode_from_utf8(bytes, remaining, &mut cursor));
    }
    assert_eq!(decoded, vec![0x61, 0x4E2D, 0x1F600]);
}

#[test]
fn test_round_trip_preserves_lone_surrogates() {
    let units = [0x0041, 0xDC00, 0xD83D, 0xDE00, 0xD800];
    let bytes = utf::utf16_to_utf8(&units);
    assert_eq!(bytes.len(), utf::utf16_to_utf8_size(&units));
    assert_eq!(utf::utf8_to_utf16(&bytes), units);
}
