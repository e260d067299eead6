//! Tagged Values, Heap and String Integration Tests
//!
//! Drives tagged values through the collector and builds strings across
//! allocations, checking that everything a handle or root refers to
//! survives and stays consistent.

use core_types::TaggedValue;
use ecma_string::{hash, locale_for_tag, unicode_from_utf8, EcmaString, StringTable, TrimMode};
use memory_manager::{HandleScope, Heap, HeapConfig};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Test: "Hello " + "World!" and the substring that recovers "World!"
#[test]
fn test_concat_and_substring_under_collection() {
    init_tracing();
    let heap = Heap::new(HeapConfig::stress());
    let scope = HandleScope::new(&heap);
    let hello = scope.handle(EcmaString::create_from_utf8(&heap, b"Hello ", true));
    let world = scope.handle(EcmaString::create_from_utf8(&heap, b"World!", true));
    let joined = scope.handle(EcmaString::concat(hello, world));
    let tail = scope.handle(EcmaString::fast_sub_string(joined, 6, 6));
    heap.collect_garbage();

    let no_gc = heap.no_gc();
    assert_eq!(joined.get().to_std_string(&no_gc), "Hello World!");
    assert!(joined.get().is_utf8());
    assert!(EcmaString::strings_are_equal(tail.get(), world.get(), &no_gc));
    assert_eq!(
        tail.get().get_hashcode(&no_gc),
        world.get().get_hashcode(&no_gc)
    );
    assert!(heap.stats().collections > 0);
}

/// Test: mixing encodings widens, slicing back narrows
#[test]
fn test_mixed_encoding_round_trip() {
    let heap = Heap::new(HeapConfig::stress());
    let scope = HandleScope::new(&heap);
    let ascii = scope.handle(EcmaString::create_from_str(&heap, "price: "));
    let wide = scope.handle(EcmaString::create_from_str(&heap, "\u{20ac}42"));
    let joined = scope.handle(EcmaString::concat(ascii, wide));
    let digits = scope.handle(EcmaString::fast_sub_string(joined, 8, 2));
    let label = scope.handle(EcmaString::fast_sub_string(joined, 0, 5));

    let no_gc = heap.no_gc();
    assert!(joined.get().is_utf16());
    assert!(digits.get().is_utf8());
    assert_eq!(digits.get().to_std_string(&no_gc), "42");
    assert_eq!(label.get().to_std_string(&no_gc), "price");
    assert!(joined.get().equal_to_spliced_string(ascii.get(), wide.get(), &no_gc));
    assert_eq!(EcmaString::index_of(joined.get(), digits.get(), 0, &no_gc), 8);
}

/// Test: the one-code-point UTF-8 decoder at its boundaries
#[test]
fn test_utf8_decode_boundaries() {
    let cases: [(&[u8], i32); 9] = [
        (&[0x00], 0),
        (&[0x7E], 126),
        (&[0x7F], 127),
        (&[0x80], -1),
        (&[0xDF, 0xBF], 2047),
        (&[0xEF, 0xBF, 0xBF], 65535),
        (&[0xF7, 0xBF, 0xBF, 0xBF], 2_097_151),
        (&[0xE0, 0x41, 0xBF], -1),
        (&[0xC0, 0x80], -1),
    ];
    for (bytes, expected) in cases {
        let mut cursor = 0;
        let decoded = unicode_from_utf8(bytes, bytes.len(), &mut cursor);
        assert_eq!(decoded, expected, "{:02x?}", bytes);
        let advanced = if expected < 0 { 0 } else { bytes.len() };
        assert_eq!(cursor, advanced, "{:02x?}", bytes);
    }
}

/// Test: ints and doubles survive as tagged values next to heap objects
#[test]
fn test_tagged_numbers_alongside_heap_values() {
    let heap = Heap::new(HeapConfig::stress());
    let scope = HandleScope::new(&heap);
    let int = scope.handle(TaggedValue::from_i32(-7));
    let double = scope.handle(TaggedValue::from_f64(2.5));
    let text = scope.handle(EcmaString::create_from_str(&heap, "kept").to_value());
    heap.collect_garbage();

    assert!(int.get().is_int());
    assert_eq!(int.get().get_int(), -7);
    assert!(double.get().is_double());
    assert_eq!(double.get().get_number(), 2.5);
    assert!(text.get().is_heap_object());
    assert_eq!(TaggedValue::from_number(3.0), TaggedValue::from_i32(3));
    let string = EcmaString::cast(text.get()).unwrap();
    let no_gc = heap.no_gc();
    assert_eq!(string.to_std_string(&no_gc), "kept");
}

/// Test: weak references follow a live referent and clear for a dead one
#[test]
fn test_weak_reference_round_trip() {
    let heap = Heap::default();
    let scope = HandleScope::new(&heap);
    let live = scope.handle(EcmaString::create_from_str(&heap, "live"));
    let weak_live = heap.add_weak_root(live.value().create_and_get_weak_ref());
    let dead = EcmaString::create_from_str(&heap, "dead");
    let weak_dead = heap.add_weak_root(dead.to_value().create_and_get_weak_ref());
    heap.collect_garbage();

    let followed = heap.weak_root(weak_live).unwrap();
    assert!(followed.is_weak());
    assert_eq!(followed.get_weak_raw_value(), live.value());
    assert_eq!(heap.weak_root(weak_dead), None);
    heap.remove_weak_root(weak_live);
    heap.remove_weak_root(weak_dead);
}

/// Test: interning across collections and encodings
#[test]
fn test_intern_table_across_collections() {
    let heap = Heap::new(HeapConfig::stress());
    let mut table = StringTable::new();
    let scope = HandleScope::new(&heap);
    let first = scope.handle(table.get_or_intern_utf8(&heap, "ключ".as_bytes()));
    let units: Vec<u16> = "ключ".encode_utf16().collect();
    let second = table.get_or_intern_utf16(&heap, &units);
    assert_eq!(first.get(), second);
    assert!(second.is_intern_string());
    assert_eq!(table.len(&heap), 1);

    let no_gc = heap.no_gc();
    assert_eq!(
        second.get_hashcode(&no_gc),
        hash::compute_hashcode_utf16(&units)
    );
}

/// Test: case mapping and trimming pipeline
#[test]
fn test_case_and_trim_pipeline() {
    let heap = Heap::new(HeapConfig::stress());
    let scope = HandleScope::new(&heap);
    let padded = scope.handle(EcmaString::create_from_str(&heap, "\u{3000} Istanbul \n"));
    let trimmed = scope.handle(EcmaString::trim(padded, TrimMode::Trim));
    let upper = scope.handle(EcmaString::to_upper(trimmed));
    let turkish = locale_for_tag("tr");
    let lower = scope.handle(EcmaString::to_locale_lower(trimmed, turkish.as_ref()));

    let no_gc = heap.no_gc();
    assert!(trimmed.get().is_utf8());
    assert_eq!(upper.get().to_std_string(&no_gc), "ISTANBUL");
    assert_eq!(lower.get().to_std_string(&no_gc), "\u{131}stanbul");
}
