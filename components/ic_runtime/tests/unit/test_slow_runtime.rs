//! Unit tests for the generic comparison algorithms

use core_types::TaggedValue;
use ecma_string::EcmaString;
use ic_runtime::{strict_equal, to_number, JsObject, JsThread, PrimitiveRef, SlowRuntime};
use memory_manager::{HandleScope, HeapConfig};

fn string(thread: &JsThread, text: &str) -> TaggedValue {
    EcmaString::create_from_str(thread.heap(), text).to_value()
}

#[test]
fn test_strict_equality_never_coerces() {
    let thread = JsThread::default();
    let heap = thread.heap();
    let one = string(&thread, "1");
    let other_one = string(&thread, "1");
    assert_ne!(one, other_one);
    assert!(strict_equal(heap, one, other_one));
    assert!(!strict_equal(heap, one, TaggedValue::from_i32(1)));
    assert!(strict_equal(heap, TaggedValue::from_i32(1), TaggedValue::from_f64(1.0)));
    assert!(strict_equal(heap, TaggedValue::from_f64(-0.0), TaggedValue::from_i32(0)));
    assert!(!strict_equal(heap, TaggedValue::NULL, TaggedValue::UNDEFINED));
}

#[test]
fn test_strings_compare_by_code_unit_across_encodings() {
    let thread = JsThread::default();
    let ascii = string(&thread, "abc");
    let wide = string(&thread, "ab\u{4e2d}");
    let prefix = string(&thread, "ab");
    assert!(SlowRuntime::less(&thread, ascii, wide).is_true());
    assert!(SlowRuntime::less(&thread, prefix, ascii).is_true());
    assert!(SlowRuntime::greater_eq(&thread, wide, prefix).is_true());
    assert!(SlowRuntime::eq(&thread, wide, string(&thread, "ab\u{4e2d}")).is_true());
}

#[test]
fn test_numeric_strings() {
    let thread = JsThread::default();
    let padded = string(&thread, "\n 0x10 \t");
    assert!(SlowRuntime::eq(&thread, padded, TaggedValue::from_i32(16)).is_true());
    let empty = string(&thread, "");
    assert!(SlowRuntime::eq(&thread, empty, TaggedValue::from_i32(0)).is_true());
    assert!(SlowRuntime::eq(&thread, empty, TaggedValue::FALSE).is_true());
    let junk = string(&thread, "1px");
    assert!(SlowRuntime::eq(&thread, junk, TaggedValue::from_i32(1)).is_false());
    assert!(SlowRuntime::not_eq(&thread, junk, junk).is_false());
}

#[test]
fn test_object_conversion_survives_collection() {
    let thread = JsThread::new(HeapConfig::stress());
    let scope = HandleScope::new(thread.heap());
    let object = scope.handle(JsObject::create(thread.heap()).to_value());
    let text = scope.handle(string(&thread, "[object Object]"));

    assert!(SlowRuntime::eq(&thread, object.get(), text.get()).is_true());
    assert!(SlowRuntime::eq(&thread, text.get(), object.get()).is_true());
    assert!(SlowRuntime::less(&thread, object.get(), TaggedValue::from_i32(1)).is_false());
    assert!(to_number(&thread, object.get()).unwrap().is_nan());
}

#[test]
fn test_wrapped_string_compares_as_string() {
    let thread = JsThread::new(HeapConfig::stress());
    let scope = HandleScope::new(thread.heap());
    let ten = string(&thread, "10");
    let boxed = scope.handle(PrimitiveRef::create(thread.heap(), ten).to_value());
    let nine = scope.handle(string(&thread, "9"));
    assert!(SlowRuntime::less(&thread, boxed.get(), nine.get()).is_true());
    assert!(SlowRuntime::greater(&thread, boxed.get(), TaggedValue::from_i32(9)).is_true());
}

#[test]
fn test_wide_hex_string_rounds_once() {
    let thread = JsThread::default();
    let text = string(&thread, "0x200000000000011");
    let nearest = TaggedValue::from_f64(144_115_188_075_855_904.0);
    let truncated = TaggedValue::from_f64(144_115_188_075_855_872.0);
    assert!(SlowRuntime::eq(&thread, text, nearest).is_true());
    assert!(SlowRuntime::eq(&thread, text, truncated).is_false());
    assert!(SlowRuntime::less(&thread, truncated, text).is_true());
}
