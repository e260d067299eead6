//! Inline-cache-guided comparisons.
//!
//! Each entry point takes the operand-kind pair an IC site observed. The
//! hint is only a guess: the operands are classified first and the
//! specialised path runs only when they match. Everything else, including
//! `CompareOpType::Other`, goes through [`SlowRuntime`]. Both routes give
//! the same result for every input.

use std::cmp::Ordering;

use core_types::{CompareIcSlot, CompareOpType, OperandKind, TaggedValue};
use ecma_string::EcmaString;
use memory_manager::Heap;
use tracing::trace;

use crate::conversions::string_to_double;
use crate::primitive::{JsObject, PrimitiveRef, Symbol};
use crate::slow_runtime::{string_ordering, strings_equal, SlowRuntime};
use crate::thread::JsThread;

/// Classifies a value for IC feedback. Internal markers have no kind.
pub fn operand_kind(value: TaggedValue) -> Option<OperandKind> {
    if value.is_number() {
        Some(OperandKind::Number)
    } else if value.is_boolean() {
        Some(OperandKind::Boolean)
    } else if value.is_undefined() {
        Some(OperandKind::Undefined)
    } else if value.is_null() {
        Some(OperandKind::Null)
    } else if EcmaString::cast(value).is_some() {
        Some(OperandKind::String)
    } else if Symbol::cast(value).is_some()
        || PrimitiveRef::cast(value).is_some()
        || JsObject::cast(value).is_some()
    {
        Some(OperandKind::Obj)
    } else {
        None
    }
}

/// Outcome of comparing two values that are both ordered or unordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Ordered(Ordering),
    Unordered,
}

#[derive(Debug, Clone, Copy)]
enum Relational {
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

impl Relational {
    fn holds(self, relation: Relation) -> bool {
        let Relation::Ordered(ordering) = relation else {
            return false;
        };
        match self {
            Relational::Less => ordering == Ordering::Less,
            Relational::LessEq => ordering != Ordering::Greater,
            Relational::Greater => ordering == Ordering::Greater,
            Relational::GreaterEq => ordering != Ordering::Less,
        }
    }

    fn slow(self, thread: &JsThread, lhs: TaggedValue, rhs: TaggedValue) -> TaggedValue {
        match self {
            Relational::Less => SlowRuntime::less(thread, lhs, rhs),
            Relational::LessEq => SlowRuntime::less_eq(thread, lhs, rhs),
            Relational::Greater => SlowRuntime::greater(thread, lhs, rhs),
            Relational::GreaterEq => SlowRuntime::greater_eq(thread, lhs, rhs),
        }
    }
}

/// Comparison entry points used by the interpreter.
pub struct CompareOp;

impl CompareOp {
    /// Records the operand kinds of one execution into an IC slot.
    pub fn record_feedback(slot: &mut CompareIcSlot, lhs: TaggedValue, rhs: TaggedValue) {
        if let (Some(l), Some(r)) = (operand_kind(lhs), operand_kind(rhs)) {
            slot.record(l, r);
        }
    }

    /// `lhs == rhs`
    pub fn equal_with_ic(
        thread: &JsThread,
        lhs: TaggedValue,
        rhs: TaggedValue,
        hint: CompareOpType,
    ) -> TaggedValue {
        match verify(hint, lhs, rhs).and_then(|kinds| fast_equal(thread.heap(), kinds, lhs, rhs)) {
            Some(result) => TaggedValue::from_bool(result),
            None => SlowRuntime::eq(thread, lhs, rhs),
        }
    }

    /// `lhs != rhs`
    pub fn not_equal_with_ic(
        thread: &JsThread,
        lhs: TaggedValue,
        rhs: TaggedValue,
        hint: CompareOpType,
    ) -> TaggedValue {
        match verify(hint, lhs, rhs).and_then(|kinds| fast_equal(thread.heap(), kinds, lhs, rhs)) {
            Some(result) => TaggedValue::from_bool(!result),
            None => SlowRuntime::not_eq(thread, lhs, rhs),
        }
    }

    /// `lhs < rhs`
    pub fn less_with_ic(
        thread: &JsThread,
        lhs: TaggedValue,
        rhs: TaggedValue,
        hint: CompareOpType,
    ) -> TaggedValue {
        Self::relational(thread, lhs, rhs, hint, Relational::Less)
    }

    /// `lhs <= rhs`
    pub fn less_eq_with_ic(
        thread: &JsThread,
        lhs: TaggedValue,
        rhs: TaggedValue,
        hint: CompareOpType,
    ) -> TaggedValue {
        Self::relational(thread, lhs, rhs, hint, Relational::LessEq)
    }

    /// `lhs > rhs`
    pub fn greater_with_ic(
        thread: &JsThread,
        lhs: TaggedValue,
        rhs: TaggedValue,
        hint: CompareOpType,
    ) -> TaggedValue {
        Self::relational(thread, lhs, rhs, hint, Relational::Greater)
    }

    /// `lhs >= rhs`
    pub fn greater_eq_with_ic(
        thread: &JsThread,
        lhs: TaggedValue,
        rhs: TaggedValue,
        hint: CompareOpType,
    ) -> TaggedValue {
        Self::relational(thread, lhs, rhs, hint, Relational::GreaterEq)
    }

    fn relational(
        thread: &JsThread,
        lhs: TaggedValue,
        rhs: TaggedValue,
        hint: CompareOpType,
        op: Relational,
    ) -> TaggedValue {
        match verify(hint, lhs, rhs).and_then(|kinds| fast_relation(thread.heap(), kinds, lhs, rhs)) {
            Some(relation) => TaggedValue::from_bool(op.holds(relation)),
            None => op.slow(thread, lhs, rhs),
        }
    }
}

/// Returns the hint's operand kinds if the operands really have them.
fn verify(
    hint: CompareOpType,
    lhs: TaggedValue,
    rhs: TaggedValue,
) -> Option<(OperandKind, OperandKind)> {
    let (l, r) = hint.kinds()?;
    if operand_kind(lhs) == Some(l) && operand_kind(rhs) == Some(r) {
        Some((l, r))
    } else {
        trace!(?hint, "compare IC hint does not match operands");
        None
    }
}

fn bool_number(value: TaggedValue) -> f64 {
    if value.is_true() {
        1.0
    } else {
        0.0
    }
}

fn string_number(heap: &Heap, value: TaggedValue) -> f64 {
    let string = EcmaString::cast(value)
        .unwrap_or_else(|| panic!("verified string operand is not a string: {:#x}", value.raw()));
    string_to_double(heap, string)
}

/// Number value of a verified non-object primitive.
fn primitive_number(heap: &Heap, kind: OperandKind, value: TaggedValue) -> f64 {
    match kind {
        OperandKind::Number => value.get_number(),
        OperandKind::Boolean => bool_number(value),
        OperandKind::String => string_number(heap, value),
        OperandKind::Null => 0.0,
        OperandKind::Undefined => f64::NAN,
        OperandKind::Obj => panic!("object operand has no primitive number: {:#x}", value.raw()),
    }
}

/// The primitive behind a wrapper together with its kind. `None` for
/// anything that needs the generic conversion.
fn unwrap_obj(value: TaggedValue) -> Option<(OperandKind, TaggedValue)> {
    let primitive = PrimitiveRef::cast(value)?.value();
    let kind = operand_kind(primitive)?;
    (kind != OperandKind::Obj).then_some((kind, primitive))
}

/// Specialised `==`. `None` asks for the generic algorithm.
fn fast_equal(
    heap: &Heap,
    kinds: (OperandKind, OperandKind),
    lhs: TaggedValue,
    rhs: TaggedValue,
) -> Option<bool> {
    use OperandKind::*;

    let result = match kinds {
        (Number, Number) => lhs.get_number() == rhs.get_number(),
        (String, String) => strings_equal(heap, lhs, rhs),
        (Boolean, Boolean) => lhs == rhs,
        (Undefined | Null, Undefined | Null) => true,
        (Undefined | Null, _) | (_, Undefined | Null) => false,
        (Number, String) => lhs.get_number() == string_number(heap, rhs),
        (String, Number) => string_number(heap, lhs) == rhs.get_number(),
        (Number | String, Boolean) => primitive_number(heap, kinds.0, lhs) == bool_number(rhs),
        (Boolean, Number | String) => bool_number(lhs) == primitive_number(heap, kinds.1, rhs),
        (Obj, Obj) => {
            // identity only holds within one object type
            let same_type = PrimitiveRef::cast(lhs).is_some() == PrimitiveRef::cast(rhs).is_some()
                && Symbol::cast(lhs).is_some() == Symbol::cast(rhs).is_some();
            if !same_type {
                return None;
            }
            lhs == rhs
        }
        (Obj, other) => {
            let (kind, primitive) = unwrap_obj(lhs)?;
            return fast_equal(heap, (kind, other), primitive, rhs);
        }
        (other, Obj) => {
            let (kind, primitive) = unwrap_obj(rhs)?;
            return fast_equal(heap, (other, kind), lhs, primitive);
        }
    };
    Some(result)
}

/// Specialised relational comparison. `None` asks for the generic
/// algorithm.
fn fast_relation(
    heap: &Heap,
    kinds: (OperandKind, OperandKind),
    lhs: TaggedValue,
    rhs: TaggedValue,
) -> Option<Relation> {
    use OperandKind::*;

    match kinds {
        (String, String) => Some(Relation::Ordered(string_ordering(heap, lhs, rhs))),
        (Obj, other) => {
            let (kind, primitive) = unwrap_obj(lhs)?;
            if other == Obj {
                let (other_kind, other_primitive) = unwrap_obj(rhs)?;
                return fast_relation(heap, (kind, other_kind), primitive, other_primitive);
            }
            fast_relation(heap, (kind, other), primitive, rhs)
        }
        (other, Obj) => {
            let (kind, primitive) = unwrap_obj(rhs)?;
            fast_relation(heap, (other, kind), lhs, primitive)
        }
        (l, r) => {
            let x = primitive_number(heap, l, lhs);
            let y = primitive_number(heap, r, rhs);
            Some(x.partial_cmp(&y).map_or(Relation::Unordered, Relation::Ordered))
        }
    }
}
