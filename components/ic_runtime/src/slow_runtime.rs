//! Generic comparison operators.
//!
//! These implement the full abstract equality and relational comparison
//! algorithms for any pair of values. Results are tagged booleans, or
//! [`TaggedValue::EXCEPTION`] with the error left pending on the thread.

use std::cmp::Ordering;

use core_types::{JsResult, TaggedValue};
use ecma_string::EcmaString;
use memory_manager::{Handle, HandleScope, Heap};

use crate::conversions::{primitive_to_number, to_primitive, type_of, JsType, PreferredType};
use crate::thread::JsThread;

/// Entry points for the generic comparison algorithms.
pub struct SlowRuntime;

impl SlowRuntime {
    /// `lhs == rhs`
    pub fn eq(thread: &JsThread, lhs: TaggedValue, rhs: TaggedValue) -> TaggedValue {
        Self::run(thread, lhs, rhs, |x, y| loose_equal(thread, x, y))
    }

    /// `lhs != rhs`
    pub fn not_eq(thread: &JsThread, lhs: TaggedValue, rhs: TaggedValue) -> TaggedValue {
        Self::run(thread, lhs, rhs, |x, y| loose_equal(thread, x, y).map(|r| !r))
    }

    /// `lhs === rhs`
    pub fn strict_equal(thread: &JsThread, lhs: TaggedValue, rhs: TaggedValue) -> TaggedValue {
        TaggedValue::from_bool(strict_equal(thread.heap(), lhs, rhs))
    }

    /// `lhs < rhs`
    pub fn less(thread: &JsThread, lhs: TaggedValue, rhs: TaggedValue) -> TaggedValue {
        Self::run(thread, lhs, rhs, |x, y| {
            Ok(is_less_than(thread, x, y, true)? == Some(true))
        })
    }

    /// `lhs <= rhs`
    pub fn less_eq(thread: &JsThread, lhs: TaggedValue, rhs: TaggedValue) -> TaggedValue {
        Self::run(thread, lhs, rhs, |x, y| {
            Ok(is_less_than(thread, y, x, false)? == Some(false))
        })
    }

    /// `lhs > rhs`
    pub fn greater(thread: &JsThread, lhs: TaggedValue, rhs: TaggedValue) -> TaggedValue {
        Self::run(thread, lhs, rhs, |x, y| {
            Ok(is_less_than(thread, y, x, false)? == Some(true))
        })
    }

    /// `lhs >= rhs`
    pub fn greater_eq(thread: &JsThread, lhs: TaggedValue, rhs: TaggedValue) -> TaggedValue {
        Self::run(thread, lhs, rhs, |x, y| {
            Ok(is_less_than(thread, x, y, true)? == Some(false))
        })
    }

    fn run(
        thread: &JsThread,
        lhs: TaggedValue,
        rhs: TaggedValue,
        op: impl FnOnce(Handle<'_, TaggedValue>, Handle<'_, TaggedValue>) -> JsResult<bool>,
    ) -> TaggedValue {
        let scope = HandleScope::new(thread.heap());
        let x = scope.handle(lhs);
        let y = scope.handle(rhs);
        match op(x, y) {
            Ok(result) => TaggedValue::from_bool(result),
            Err(error) => thread.throw(error),
        }
    }
}

/// Strict equality. Never allocates.
pub fn strict_equal(heap: &Heap, x: TaggedValue, y: TaggedValue) -> bool {
    match (type_of(x), type_of(y)) {
        (JsType::Number, JsType::Number) => x.get_number() == y.get_number(),
        (JsType::String, JsType::String) => strings_equal(heap, x, y),
        (a, b) if a == b => x == y,
        _ => false,
    }
}

pub(crate) fn strings_equal(heap: &Heap, x: TaggedValue, y: TaggedValue) -> bool {
    match (EcmaString::cast(x), EcmaString::cast(y)) {
        (Some(a), Some(b)) => {
            let no_gc = heap.no_gc();
            EcmaString::strings_are_equal(a, b, &no_gc)
        }
        _ => false,
    }
}

pub(crate) fn string_ordering(heap: &Heap, x: TaggedValue, y: TaggedValue) -> Ordering {
    match (EcmaString::cast(x), EcmaString::cast(y)) {
        (Some(a), Some(b)) => {
            let no_gc = heap.no_gc();
            EcmaString::compare(a, b, &no_gc)
        }
        _ => panic!("string comparison on non-strings: {:#x}, {:#x}", x.raw(), y.raw()),
    }
}

fn bool_to_number(value: TaggedValue) -> TaggedValue {
    TaggedValue::from_i32(i32::from(value.is_true()))
}

/// Abstract equality. The operands live in handles because converting an
/// object may allocate.
fn loose_equal(
    thread: &JsThread,
    x: Handle<'_, TaggedValue>,
    y: Handle<'_, TaggedValue>,
) -> JsResult<bool> {
    let heap = thread.heap();
    loop {
        let (a, b) = (x.get(), y.get());
        let (ta, tb) = (type_of(a), type_of(b));
        if ta == tb {
            return Ok(strict_equal(heap, a, b));
        }
        match (ta, tb) {
            (JsType::Undefined | JsType::Null, JsType::Undefined | JsType::Null) => return Ok(true),
            (JsType::Number, JsType::String) | (JsType::String, JsType::Number) => {
                return Ok(primitive_to_number(heap, a)? == primitive_to_number(heap, b)?);
            }
            (JsType::Boolean, _) => x.set(bool_to_number(a)),
            (_, JsType::Boolean) => y.set(bool_to_number(b)),
            (JsType::Number | JsType::String | JsType::Symbol, JsType::Object) => {
                let primitive = to_primitive(thread, b, PreferredType::Default)?;
                y.set(primitive);
            }
            (JsType::Object, JsType::Number | JsType::String | JsType::Symbol) => {
                let primitive = to_primitive(thread, a, PreferredType::Default)?;
                x.set(primitive);
            }
            _ => return Ok(false),
        }
    }
}

/// IsLessThan: `Some(x < y)`, or `None` when either side is NaN.
///
/// `left_first` fixes the order in which the operands are converted.
fn is_less_than(
    thread: &JsThread,
    x: Handle<'_, TaggedValue>,
    y: Handle<'_, TaggedValue>,
    left_first: bool,
) -> JsResult<Option<bool>> {
    let heap = thread.heap();
    if left_first {
        x.set(to_primitive(thread, x.get(), PreferredType::Number)?);
        y.set(to_primitive(thread, y.get(), PreferredType::Number)?);
    } else {
        y.set(to_primitive(thread, y.get(), PreferredType::Number)?);
        x.set(to_primitive(thread, x.get(), PreferredType::Number)?);
    }
    let (px, py) = (x.get(), y.get());
    if type_of(px) == JsType::String && type_of(py) == JsType::String {
        return Ok(Some(string_ordering(heap, px, py) == Ordering::Less));
    }
    let (nx, ny) = if left_first {
        let nx = primitive_to_number(heap, px)?;
        (nx, primitive_to_number(heap, py)?)
    } else {
        let ny = primitive_to_number(heap, py)?;
        (primitive_to_number(heap, px)?, ny)
    };
    if nx.is_nan() || ny.is_nan() {
        return Ok(None);
    }
    Ok(Some(nx < ny))
}
