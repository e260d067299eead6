//! Comparison Runtime Integration Tests
//!
//! Simulates comparison sites that collect IC feedback and then execute
//! with the resulting hint, checking results against the generic runtime.

use core_types::{CompareIcSlot, CompareOpType, IcState, TaggedValue};
use ecma_string::EcmaString;
use ic_runtime::{CompareOp, JsThread, PrimitiveRef, SlowRuntime};
use memory_manager::{HandleScope, HeapConfig};

/// Test: a site warms up, goes monomorphic and keeps answering correctly
#[test]
fn test_monomorphic_site_lifecycle() {
    let thread = JsThread::new(HeapConfig::stress());
    let scope = HandleScope::new(thread.heap());
    let mut slot = CompareIcSlot::new();
    let texts: Vec<_> = ["3", "10", " 7 ", "x"]
        .iter()
        .map(|text| scope.handle(EcmaString::create_from_str(thread.heap(), text).to_value()))
        .collect();
    let limit = TaggedValue::from_i32(5);

    let mut below = Vec::new();
    for text in &texts {
        let hint = slot.hint();
        CompareOp::record_feedback(&mut slot, text.get(), limit);
        let result = CompareOp::less_with_ic(&thread, text.get(), limit, hint);
        assert_eq!(result, SlowRuntime::less(&thread, text.get(), limit));
        below.push(result.is_true());
    }

    assert_eq!(slot.state(), IcState::Monomorphic(CompareOpType::StringNumber));
    assert_eq!(slot.execution_count, 4);
    assert_eq!(below, [true, false, false, false]);
}

/// Test: a polymorphic site degrades to the generic path without changing answers
#[test]
fn test_polymorphic_site() {
    let thread = JsThread::default();
    let mut slot = CompareIcSlot::new();
    let boxed = PrimitiveRef::create(thread.heap(), TaggedValue::from_i32(1)).to_value();
    let one = EcmaString::create_from_str(thread.heap(), "1").to_value();
    let operands = [
        (TaggedValue::from_i32(1), TaggedValue::from_f64(1.0)),
        (one, TaggedValue::TRUE),
        (boxed, TaggedValue::from_i32(1)),
        (TaggedValue::NULL, TaggedValue::UNDEFINED),
    ];

    for (lhs, rhs) in operands {
        CompareOp::record_feedback(&mut slot, lhs, rhs);
        assert!(CompareOp::equal_with_ic(&thread, lhs, rhs, slot.hint()).is_true());
    }
    assert_eq!(slot.state(), IcState::Polymorphic);
    assert_eq!(slot.hint(), CompareOpType::Other);
}

/// Test: an exception from a comparison is left pending for the caller
#[test]
fn test_exception_is_pending_after_comparison() {
    let thread = JsThread::default();
    let symbol = ic_runtime::Symbol::create(thread.heap(), TaggedValue::UNDEFINED).to_value();
    let result = CompareOp::greater_eq_with_ic(&thread, TaggedValue::from_i32(0), symbol, CompareOpType::NumberObj);
    assert!(result.is_exception());
    assert!(thread.has_pending_exception());

    let error = thread.take_pending_exception().unwrap();
    assert_eq!(error.to_string(), "TypeError: Cannot convert a Symbol value to a number");
    assert!(!thread.has_pending_exception());
}

/// Test: heap configuration from JSON drives the runtime
#[test]
fn test_thread_from_json_config() {
    let thread = JsThread::from_json_config(r#"{"gc_stress": true}"#).unwrap();
    let scope = HandleScope::new(thread.heap());
    let a = scope.handle(thread.intern("same").to_value());
    let b = scope.handle(EcmaString::create_from_str(thread.heap(), "same").to_value());
    assert!(CompareOp::equal_with_ic(&thread, a.get(), b.get(), CompareOpType::StringString).is_true());
    assert!(thread.heap().stats().collections > 0);
}
