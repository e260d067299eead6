//! Unit tests for IC-guided comparisons

use core_types::{CompareIcSlot, CompareOpType, TaggedValue};
use ecma_string::EcmaString;
use ic_runtime::{CompareOp, JsObject, JsThread, PrimitiveRef, SlowRuntime, Symbol};
use memory_manager::{Handle, HandleScope, HeapConfig};

type IcOp = fn(&JsThread, TaggedValue, TaggedValue, CompareOpType) -> TaggedValue;
type SlowOp = fn(&JsThread, TaggedValue, TaggedValue) -> TaggedValue;

const OPS: [(&str, IcOp, SlowOp); 6] = [
    ("==", CompareOp::equal_with_ic, SlowRuntime::eq),
    ("!=", CompareOp::not_equal_with_ic, SlowRuntime::not_eq),
    ("<", CompareOp::less_with_ic, SlowRuntime::less),
    ("<=", CompareOp::less_eq_with_ic, SlowRuntime::less_eq),
    (">", CompareOp::greater_with_ic, SlowRuntime::greater),
    (">=", CompareOp::greater_eq_with_ic, SlowRuntime::greater_eq),
];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn string(thread: &JsThread, text: &str) -> TaggedValue {
    EcmaString::create_from_str(thread.heap(), text).to_value()
}

/// One value of every operand kind, plus the awkward ones.
fn samples<'s>(
    thread: &JsThread,
    scope: &'s HandleScope<'_>,
) -> Vec<(&'static str, Handle<'s, TaggedValue>)> {
    let heap = thread.heap();
    let mut out = Vec::new();
    macro_rules! push {
        ($name:expr, $value:expr) => {{
            let value = $value;
            out.push(($name, scope.handle(value)));
        }};
    }

    push!("0", TaggedValue::from_i32(0));
    push!("1", TaggedValue::from_i32(1));
    push!("0.5", TaggedValue::from_f64(0.5));
    push!("-0", TaggedValue::from_f64(-0.0));
    push!("NaN", TaggedValue::from_f64(f64::NAN));
    push!("Infinity", TaggedValue::from_f64(f64::INFINITY));
    push!("\"\"", string(thread, ""));
    push!("\"0\"", string(thread, "0"));
    push!("\"1\"", string(thread, "1"));
    push!("\" 1 \"", string(thread, " 1 "));
    push!("\"abc\"", string(thread, "abc"));
    push!("\"中\"", string(thread, "中"));
    push!("\"[object Object]\"", string(thread, "[object Object]"));
    push!("true", TaggedValue::TRUE);
    push!("false", TaggedValue::FALSE);
    push!("null", TaggedValue::NULL);
    push!("undefined", TaggedValue::UNDEFINED);
    push!("new Boolean(true)", PrimitiveRef::create(heap, TaggedValue::TRUE).to_value());
    push!("new Number(1)", PrimitiveRef::create(heap, TaggedValue::from_i32(1)).to_value());
    let one = string(thread, "1");
    push!("new String(\"1\")", PrimitiveRef::create(heap, one).to_value());
    let symbol = scope.handle(Symbol::create(heap, TaggedValue::UNDEFINED).to_value());
    push!("Symbol()", symbol.get());
    push!("Object(Symbol())", PrimitiveRef::create(heap, symbol.get()).to_value());
    push!("{}", JsObject::create(heap).to_value());
    out
}

fn hints() -> impl Iterator<Item = CompareOpType> {
    CompareOpType::PAIRS.into_iter().chain(std::iter::once(CompareOpType::Other))
}

/// Every hint, right or wrong, must agree with the generic algorithm.
#[test]
fn test_every_hint_matches_slow_runtime() {
    init_tracing();
    let thread = JsThread::new(HeapConfig::stress());
    let scope = HandleScope::new(thread.heap());
    let values = samples(&thread, &scope);

    for (lhs_name, lhs) in &values {
        for (rhs_name, rhs) in &values {
            for (op_name, ic, slow) in OPS {
                let expected = slow(&thread, lhs.get(), rhs.get());
                let expected_error = thread.take_pending_exception();
                for hint in hints() {
                    let actual = ic(&thread, lhs.get(), rhs.get(), hint);
                    let actual_error = thread.take_pending_exception();
                    assert_eq!(
                        actual, expected,
                        "{} {} {} with {:?}",
                        lhs_name, op_name, rhs_name, hint
                    );
                    assert_eq!(actual_error, expected_error);
                }
            }
        }
    }
}

#[test]
fn test_string_number_pairs() {
    let thread = JsThread::default();
    let zero = string(&thread, "0");
    let one = string(&thread, "1");
    let n = TaggedValue::from_i32(1);
    let hint = CompareOpType::StringNumber;

    assert!(CompareOp::equal_with_ic(&thread, zero, n, hint).is_false());
    assert!(CompareOp::equal_with_ic(&thread, one, n, hint).is_true());
    assert!(CompareOp::less_with_ic(&thread, zero, n, hint).is_true());
    assert!(CompareOp::greater_eq_with_ic(&thread, one, n, hint).is_true());
    assert!(CompareOp::not_equal_with_ic(&thread, zero, n, hint).is_true());
}

#[test]
fn test_string_boolean_pairs() {
    let thread = JsThread::default();
    let one = string(&thread, "1");
    let hint = CompareOpType::StringBoolean;
    assert!(CompareOp::equal_with_ic(&thread, one, TaggedValue::TRUE, hint).is_true());
    assert!(CompareOp::equal_with_ic(&thread, one, TaggedValue::FALSE, hint).is_false());
    assert!(CompareOp::greater_with_ic(&thread, one, TaggedValue::FALSE, hint).is_true());
}

#[test]
fn test_boxed_boolean_pairs() {
    let thread = JsThread::default();
    let boxed = PrimitiveRef::create(thread.heap(), TaggedValue::from_bool(true)).to_value();
    assert!(CompareOp::equal_with_ic(&thread, boxed, TaggedValue::TRUE, CompareOpType::ObjBoolean).is_true());
    assert!(
        CompareOp::equal_with_ic(&thread, TaggedValue::from_i32(1), boxed, CompareOpType::NumberObj).is_true()
    );
    assert!(
        CompareOp::less_with_ic(&thread, TaggedValue::from_i32(0), boxed, CompareOpType::NumberObj).is_true()
    );
}

#[test]
fn test_nullish_pairs() {
    let thread = JsThread::default();
    let (undefined, null) = (TaggedValue::UNDEFINED, TaggedValue::NULL);
    assert!(CompareOp::equal_with_ic(&thread, undefined, null, CompareOpType::UndefinedNull).is_true());
    assert!(CompareOp::less_eq_with_ic(&thread, undefined, null, CompareOpType::UndefinedNull).is_false());
    assert!(CompareOp::less_eq_with_ic(&thread, null, null, CompareOpType::NullNull).is_true());

    // feedback for `undefined == true` is unusable; the generic path answers
    assert!(CompareOp::equal_with_ic(&thread, undefined, TaggedValue::TRUE, CompareOpType::Other).is_false());
}

#[test]
fn test_number_pairs() {
    let thread = JsThread::default();
    let one = TaggedValue::from_i32(1);
    let hint = CompareOpType::NumberNumber;
    let cases = [
        (0.5, [false, true, false, false, true, true]),
        (1.0, [true, false, false, true, false, true]),
        (2.0, [false, true, true, true, false, false]),
    ];
    for (other, expected) in cases {
        let other = TaggedValue::from_f64(other);
        for ((name, ic, _), want) in OPS.into_iter().zip(expected) {
            assert_eq!(ic(&thread, one, other, hint).is_true(), want, "1 {} {:?}", name, other);
        }
    }
}

#[test]
fn test_symbol_relational_throws() {
    let thread = JsThread::default();
    let symbol = Symbol::create(thread.heap(), TaggedValue::UNDEFINED).to_value();
    let result = CompareOp::less_with_ic(&thread, symbol, TaggedValue::from_i32(1), CompareOpType::ObjNumber);
    assert!(result.is_exception());
    let error = thread.take_pending_exception().unwrap();
    assert_eq!(error.message, "Cannot convert a Symbol value to a number");
}

#[test]
fn test_feedback_drives_hint() {
    let thread = JsThread::default();
    let mut slot = CompareIcSlot::new();
    let text = string(&thread, "2");
    let two = TaggedValue::from_i32(2);

    CompareOp::record_feedback(&mut slot, text, two);
    assert_eq!(slot.hint(), CompareOpType::StringNumber);
    assert!(CompareOp::equal_with_ic(&thread, text, two, slot.hint()).is_true());

    CompareOp::record_feedback(&mut slot, two, two);
    assert_eq!(slot.hint(), CompareOpType::Other);
    assert!(CompareOp::equal_with_ic(&thread, text, two, slot.hint()).is_true());
}
