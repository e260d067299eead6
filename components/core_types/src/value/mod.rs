//! JavaScript value representation using NaN-boxing.
//!
//! This module provides [`TaggedValue`], the one-word encoding of every runtime
//! value, and [`ValueKind`], a checked enum view of it. The raw bit helpers
//! live in [`encoding`].

pub mod encoding;

use std::fmt;
use std::ptr::NonNull;

use crate::object::TaggedObject;
use encoding::*;

/// Represents any JavaScript value in a single 64-bit word.
///
/// Integers, doubles, booleans, the special singletons and heap object
/// pointers all share the word; see [`encoding`] for the layout.
///
/// Equality (`==`) compares the raw bits. It is identity on the encoding,
/// not any of the language-level equality algorithms.
///
/// # Examples
///
/// ```
/// use core_types::TaggedValue;
///
/// let int = TaggedValue::from_i32(42);
/// assert!(int.is_int());
/// assert_eq!(int.get_int(), 42);
///
/// let double = TaggedValue::from_f64(3.5);
/// assert!(double.is_double());
/// assert_eq!(double.get_number(), 3.5);
///
/// assert!(TaggedValue::undefined().is_undefined_or_null());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct TaggedValue {
    raw: TaggedType,
}

/// Checked view of a [`TaggedValue`].
///
/// Produced by [`TaggedValue::kind`]. Matching on this is the safe way to
/// branch over the encoding without touching raw bits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueKind {
    /// 32-bit signed integer
    Int(i32),
    /// IEEE-754 double
    Double(f64),
    /// Strong reference to a heap object
    HeapObject(NonNull<TaggedObject>),
    /// Weak reference to a heap object
    WeakRef(NonNull<TaggedObject>),
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// `true` or `false`
    Boolean(bool),
    /// Uninitialized slot marker
    Hole,
    /// Pending-exception marker
    Exception,
    /// Value eliminated by the optimizing compiler
    OptimizedOut,
}

impl TaggedValue {
    /// `true`.
    pub const TRUE: TaggedValue = TaggedValue::from_raw(VALUE_TRUE);
    /// `false`.
    pub const FALSE: TaggedValue = TaggedValue::from_raw(VALUE_FALSE);
    /// `undefined`.
    pub const UNDEFINED: TaggedValue = TaggedValue::from_raw(VALUE_UNDEFINED);
    /// `null`.
    pub const NULL: TaggedValue = TaggedValue::from_raw(VALUE_NULL);
    /// Uninitialized slot marker.
    pub const HOLE: TaggedValue = TaggedValue::from_raw(VALUE_HOLE);
    /// Signals that an exception is pending; callers must propagate it.
    pub const EXCEPTION: TaggedValue = TaggedValue::from_raw(VALUE_EXCEPTION);
    /// Optimized-out marker.
    pub const OPTIMIZED_OUT: TaggedValue = TaggedValue::from_raw(VALUE_OPTIMIZED_OUT);

    /// Wraps a raw word without any checks.
    #[inline]
    pub const fn from_raw(raw: TaggedType) -> Self {
        TaggedValue { raw }
    }

    /// Creates an integer value.
    #[inline]
    pub const fn from_i32(value: i32) -> Self {
        TaggedValue::from_raw(encode_int(value))
    }

    /// Creates a number from an unsigned integer.
    ///
    /// Values that would be negative as `i32` are stored as doubles.
    #[inline]
    pub fn from_u32(value: u32) -> Self {
        if (value as i32) < 0 {
            return TaggedValue::from_f64(f64::from(value));
        }
        TaggedValue::from_i32(value as i32)
    }

    /// Creates a number from a 64-bit integer.
    ///
    /// Values outside the `i32` range are stored as doubles, never truncated.
    #[inline]
    pub fn from_i64(value: i64) -> Self {
        match i32::try_from(value) {
            Ok(int) => TaggedValue::from_i32(int),
            Err(_) => TaggedValue::from_f64(value as f64),
        }
    }

    /// Creates a double value.
    ///
    /// Passing an impure NaN (one whose bits fall into the integer band once
    /// encoded) is a contract violation. Use [`TaggedValue::from_number`] for
    /// values of unknown provenance.
    #[inline]
    pub fn from_f64(value: f64) -> Self {
        debug_assert!(
            !is_impure_nan(value),
            "impure NaN would break the tagged double encoding: {:#x}",
            value.to_bits()
        );
        TaggedValue::from_raw(encode_double(value))
    }

    /// Creates a number, canonicalising NaN and preferring the int encoding.
    pub fn from_number(value: f64) -> Self {
        if value.is_nan() {
            return TaggedValue::from_f64(f64::NAN);
        }
        let int = TaggedValue::try_cast_double_to_int32(value);
        if int.is_int() {
            return int;
        }
        TaggedValue::from_f64(value)
    }

    /// Creates a boolean.
    #[inline]
    pub const fn from_bool(value: bool) -> Self {
        TaggedValue::from_raw(TAG_BOOLEAN_MASK | value as TaggedType)
    }

    /// Creates a strong reference to a heap object.
    ///
    /// The address must fit in 48 bits and keep its low bit clear.
    #[inline]
    pub fn from_object(object: NonNull<TaggedObject>) -> Self {
        let address = object.as_ptr() as usize as TaggedType;
        debug_assert!(
            address & TAG_MARK == 0,
            "heap address does not fit in 48 bits: {:#x}",
            address
        );
        debug_assert!(address & TAG_WEAK == 0, "heap address is misaligned: {:#x}", address);
        TaggedValue::from_raw(address)
    }

    /// Returns `True()` or `False()`.
    #[inline]
    pub const fn true_value() -> Self {
        TaggedValue::TRUE
    }

    /// Returns `False()`.
    #[inline]
    pub const fn false_value() -> Self {
        TaggedValue::FALSE
    }

    /// Returns `undefined`.
    #[inline]
    pub const fn undefined() -> Self {
        TaggedValue::UNDEFINED
    }

    /// Returns `null`.
    #[inline]
    pub const fn null() -> Self {
        TaggedValue::NULL
    }

    /// Returns the hole marker.
    #[inline]
    pub const fn hole() -> Self {
        TaggedValue::HOLE
    }

    /// Returns the exception marker.
    #[inline]
    pub const fn exception() -> Self {
        TaggedValue::EXCEPTION
    }

    /// Returns the raw word.
    #[inline]
    pub const fn raw(self) -> TaggedType {
        self.raw
    }

    // Predicates

    /// Whether this is a 32-bit integer.
    #[inline]
    pub const fn is_int(self) -> bool {
        (self.raw & TAG_MARK) == TAG_INT
    }

    /// Whether this is an encoded double.
    #[inline]
    pub const fn is_double(self) -> bool {
        !self.is_int() && !self.is_object()
    }

    /// Whether this is an int or a double.
    #[inline]
    pub const fn is_number(self) -> bool {
        !self.is_object()
    }

    /// Whether the tag bits are zero: heap objects and all specials.
    #[inline]
    pub const fn is_object(self) -> bool {
        (self.raw & TAG_MARK) == TAG_OBJECT
    }

    /// Whether this is a heap object reference, strong or weak.
    #[inline]
    pub const fn is_heap_object(self) -> bool {
        (self.raw & TAG_HEAPOBJECT_MASK) == 0
    }

    /// Whether this is a weak heap object reference.
    #[inline]
    pub const fn is_weak(self) -> bool {
        (self.raw & TAG_WEAK_MASK) == TAG_WEAK
    }

    /// Whether this is one of the special singletons, booleans included.
    #[inline]
    pub const fn is_special(self) -> bool {
        (self.raw & TAG_SPECIAL_MASK) == TAG_SPECIAL || self.is_hole()
    }

    /// Whether this is the hole marker (or an all-zero word).
    #[inline]
    pub const fn is_hole(self) -> bool {
        self.raw == VALUE_HOLE || self.raw == 0
    }

    /// Whether this is `undefined`.
    #[inline]
    pub const fn is_undefined(self) -> bool {
        self.raw == VALUE_UNDEFINED
    }

    /// Whether this is `null`.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.raw == VALUE_NULL
    }

    /// Whether this is `undefined` or `null`.
    #[inline]
    pub const fn is_undefined_or_null(self) -> bool {
        (self.raw & TAG_HEAPOBJECT_MASK) == TAG_SPECIAL
    }

    /// Whether this is `true`.
    #[inline]
    pub const fn is_true(self) -> bool {
        self.raw == VALUE_TRUE
    }

    /// Whether this is `false`.
    #[inline]
    pub const fn is_false(self) -> bool {
        self.raw == VALUE_FALSE
    }

    /// Whether this is a boolean.
    #[inline]
    pub const fn is_boolean(self) -> bool {
        self.is_true() || self.is_false()
    }

    /// Whether this is the exception marker.
    #[inline]
    pub const fn is_exception(self) -> bool {
        self.raw == VALUE_EXCEPTION
    }

    /// Whether this is the optimized-out marker.
    #[inline]
    pub const fn is_optimized_out(self) -> bool {
        self.raw == VALUE_OPTIMIZED_OUT
    }

    /// Whether the raw word is too small to be a real heap address.
    #[inline]
    pub const fn is_invalid_value(self) -> bool {
        self.raw <= INVALID_VALUE_LIMIT
    }

    /// Whether `value` cannot be encoded with [`TaggedValue::from_f64`].
    #[inline]
    pub fn is_impure_nan(value: f64) -> bool {
        is_impure_nan(value)
    }

    // Accessors

    /// Returns the integer payload.
    #[inline]
    pub fn get_int(self) -> i32 {
        debug_assert!(self.is_int(), "can not convert TaggedValue to Int: {:#x}", self.raw);
        decode_int(self.raw)
    }

    /// Returns the double payload.
    #[inline]
    pub fn get_double(self) -> f64 {
        debug_assert!(self.is_double(), "can not convert TaggedValue to Double: {:#x}", self.raw);
        decode_double(self.raw)
    }

    /// Returns the numeric value of an int or double.
    #[inline]
    pub fn get_number(self) -> f64 {
        if self.is_int() {
            f64::from(self.get_int())
        } else {
            self.get_double()
        }
    }

    /// Returns the referenced object. The value must be a strong reference.
    #[inline]
    pub fn get_tagged_object(self) -> NonNull<TaggedObject> {
        debug_assert!(
            self.is_heap_object() && (self.raw & TAG_WEAK) == 0,
            "can not convert TaggedValue to HeapObject: {:#x}",
            self.raw
        );
        address_to_object(self.raw)
    }

    /// Returns the referenced object whether the reference is weak or strong.
    #[inline]
    pub fn get_heap_object(self) -> NonNull<TaggedObject> {
        if self.is_weak() {
            return self.get_weak_referent();
        }
        self.get_tagged_object()
    }

    /// Returns the heap pointer bits, weak tag included.
    #[inline]
    pub fn get_raw_heap_object(self) -> NonNull<TaggedObject> {
        debug_assert!(
            self.is_heap_object(),
            "can not convert TaggedValue to HeapObject: {:#x}",
            self.raw
        );
        address_to_object(self.raw)
    }

    /// Returns the referent of a weak reference.
    #[inline]
    pub fn get_weak_referent(self) -> NonNull<TaggedObject> {
        debug_assert!(
            self.is_weak(),
            "can not convert TaggedValue to WeakRef HeapObject: {:#x}",
            self.raw
        );
        address_to_object(self.raw & !TAG_WEAK)
    }

    // Weak references

    /// Turns this strong reference into a weak one in place.
    #[inline]
    pub fn create_weak_ref(&mut self) {
        debug_assert!(
            self.is_heap_object() && (self.raw & TAG_WEAK) == 0,
            "only a strong heap reference can become weak: {:#x}",
            self.raw
        );
        self.raw |= TAG_WEAK;
    }

    /// Returns a weak copy of this strong reference.
    #[inline]
    pub fn create_and_get_weak_ref(self) -> Self {
        debug_assert!(
            self.is_heap_object() && (self.raw & TAG_WEAK) == 0,
            "only a strong heap reference can become weak: {:#x}",
            self.raw
        );
        TaggedValue::from_raw(self.raw | TAG_WEAK)
    }

    /// Clears the weak tag in place.
    #[inline]
    pub fn remove_weak_tag(&mut self) {
        debug_assert!(
            self.is_heap_object() && (self.raw & TAG_WEAK) == TAG_WEAK,
            "the tagged value is not a weak ref: {:#x}",
            self.raw
        );
        self.raw &= !TAG_WEAK;
    }

    /// Returns the strong form of a heap reference; other values unchanged.
    ///
    /// Collectors use this to visit a slot whether or not it is weak.
    #[inline]
    pub fn get_weak_raw_value(self) -> Self {
        if self.is_heap_object() {
            return TaggedValue::from_raw(self.raw & !TAG_WEAK);
        }
        self
    }

    // Numbers

    /// Returns an int value if `value` is an integral double in `i32` range
    /// (and not `-0.0`), otherwise the hole marker.
    pub fn try_cast_double_to_int32(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 {
            let in_range = value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX);
            let negative_zero = value == 0.0 && value.is_sign_negative();
            if in_range && !negative_zero {
                return TaggedValue::from_i32(value as i32);
            }
        }
        TaggedValue::HOLE
    }

    /// Returns the checked variant view of this value.
    pub fn kind(self) -> ValueKind {
        if self.is_int() {
            ValueKind::Int(self.get_int())
        } else if self.is_double() {
            ValueKind::Double(self.get_double())
        } else if self.is_hole() {
            ValueKind::Hole
        } else if self.is_weak() {
            ValueKind::WeakRef(self.get_weak_referent())
        } else if self.is_heap_object() {
            ValueKind::HeapObject(self.get_tagged_object())
        } else if self.is_undefined() {
            ValueKind::Undefined
        } else if self.is_null() {
            ValueKind::Null
        } else if self.is_boolean() {
            ValueKind::Boolean(self.is_true())
        } else if self.is_exception() {
            ValueKind::Exception
        } else {
            ValueKind::OptimizedOut
        }
    }
}

#[inline]
fn address_to_object(raw: TaggedType) -> NonNull<TaggedObject> {
    let pointer = (raw & OBJECT_ADDRESS_MASK) as usize as *mut TaggedObject;
    NonNull::new(pointer).unwrap_or_else(|| panic!("null heap reference in tagged value"))
}

impl Default for TaggedValue {
    fn default() -> Self {
        TaggedValue::from_raw(NULL_POINTER)
    }
}

impl From<i32> for TaggedValue {
    fn from(value: i32) -> Self {
        TaggedValue::from_i32(value)
    }
}

impl From<u32> for TaggedValue {
    fn from(value: u32) -> Self {
        TaggedValue::from_u32(value)
    }
}

impl From<i64> for TaggedValue {
    fn from(value: i64) -> Self {
        TaggedValue::from_i64(value)
    }
}

impl From<f64> for TaggedValue {
    fn from(value: f64) -> Self {
        TaggedValue::from_f64(value)
    }
}

impl From<bool> for TaggedValue {
    fn from(value: bool) -> Self {
        TaggedValue::from_bool(value)
    }
}

impl fmt::Debug for TaggedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ValueKind::Int(n) => f.debug_tuple("Int").field(&n).finish(),
            ValueKind::Double(n) => f.debug_tuple("Double").field(&n).finish(),
            ValueKind::HeapObject(ptr) => write!(f, "HeapObject({:p})", ptr),
            ValueKind::WeakRef(ptr) => write!(f, "WeakRef({:p})", ptr),
            ValueKind::Undefined => write!(f, "Undefined"),
            ValueKind::Null => write!(f, "Null"),
            ValueKind::Boolean(b) => f.debug_tuple("Boolean").field(&b).finish(),
            ValueKind::Hole => write!(f, "Hole"),
            ValueKind::Exception => write!(f, "Exception"),
            ValueKind::OptimizedOut => write!(f, "OptimizedOut"),
        }
    }
}
