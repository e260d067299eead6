//! Unit tests for string objects under collection pressure

use std::cmp::Ordering;

use ecma_string::{hash, EcmaString, StringTable, TrimMode};
use memory_manager::{HandleScope, Heap, HeapConfig};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_concat_then_substring() {
    init_tracing();
    let heap = Heap::new(HeapConfig::stress());
    let scope = HandleScope::new(&heap);
    let hello = scope.handle(EcmaString::create_from_utf8(&heap, b"Hello ", true));
    let world = scope.handle(EcmaString::create_from_utf8(&heap, b"World!", true));
    let joined = scope.handle(EcmaString::concat(hello, world));
    let tail = scope.handle(EcmaString::fast_sub_string(joined, 6, 6));

    let no_gc = heap.no_gc();
    assert_eq!(joined.get().get_length(), 12);
    assert!(joined.get().is_utf8());
    assert_eq!(joined.get().to_std_string(&no_gc), "Hello World!");
    assert!(EcmaString::strings_are_equal(tail.get(), world.get(), &no_gc));
}

#[test]
fn test_compression_matches_content() {
    let heap = Heap::default();
    let samples = ["", "plain", "tab\there", "é", "中文", "😀", "a\u{0}b"];
    for sample in samples {
        let string = EcmaString::create_from_str(&heap, sample);
        let units: Vec<u16> = sample.encode_utf16().collect();
        let no_gc = heap.no_gc();
        assert_eq!(string.is_utf8(), hash::can_be_compressed_utf16(&units), "{:?}", sample);
        assert_eq!(string.to_u16_string(&no_gc), units);
    }
}

#[test]
fn test_hash_is_stable_and_pure() {
    let heap = Heap::new(HeapConfig::stress());
    let scope = HandleScope::new(&heap);
    let string = scope.handle(EcmaString::create_from_str(&heap, "hash me 中"));
    let first = {
        let no_gc = heap.no_gc();
        assert_eq!(string.get().raw_hashcode(), 0);
        string.get().get_hashcode(&no_gc)
    };
    heap.collect_garbage();
    let no_gc = heap.no_gc();
    assert_eq!(string.get().raw_hashcode(), first);
    assert_eq!(string.get().get_hashcode(&no_gc), first);
    assert_eq!(string.get().compute_hashcode(&no_gc, 0), first);
    assert_eq!(hash::compute_hashcode_utf8("hash me 中".as_bytes()), first);
}

#[test]
fn test_equal_strings_have_equal_hashes_across_factories() {
    let heap = Heap::default();
    let from_utf8 = EcmaString::create_from_utf8(&heap, b"abc", false);
    let from_utf16 = EcmaString::create_from_utf16(&heap, &[0x61, 0x62, 0x63], false);
    let no_gc = heap.no_gc();
    assert!(EcmaString::strings_are_equal(from_utf8, from_utf16, &no_gc));
    assert_eq!(from_utf8.get_hashcode(&no_gc), from_utf16.get_hashcode(&no_gc));
    assert_eq!(EcmaString::compare(from_utf8, from_utf16, &no_gc), Ordering::Equal);
}

#[test]
fn test_pipeline_under_stress() {
    let heap = Heap::new(HeapConfig::stress());
    let scope = HandleScope::new(&heap);
    let mut table = StringTable::new();
    let padded = scope.handle(EcmaString::create_from_str(&heap, "  Grüße  "));
    let trimmed = scope.handle(EcmaString::trim(padded, TrimMode::Trim));
    let upper = scope.handle(EcmaString::to_upper(trimmed));
    let interned = table.get_or_intern_string(upper);

    let no_gc = heap.no_gc();
    assert_eq!(interned.to_std_string(&no_gc), "GRÜSSE");
    assert!(interned.is_intern_string());
    assert_eq!(EcmaString::index_of(upper.get(), trimmed.get(), 0, &no_gc), -1);
}
