//! Raw bit layout of [`TaggedValue`](super::TaggedValue).
//!
//! Everything in this module works on the bare `u64` word. The constants are
//! consumed by generated code and persisted snapshots, so their values are
//! part of the ABI and must not change.
//!
//! ```text
//! Object:        [0x0000] [48 bit direct pointer]
//! WeakRef:       [0x0000] [47 bit direct pointer] | 1
//!              / [0x0001] [48 bit any value]
//! TaggedDouble:  ......
//!              \ [0xFFFE] [48 bit any value]
//! TaggedInt:     [0xFFFF] [0x0000] [32 bit signed integer]
//!
//! False:         [56 bits 0] | 0x06
//! True:          [56 bits 0] | 0x07
//! Undefined:     [56 bits 0] | 0x02
//! Null:          [56 bits 0] | 0x03
//! Hole:          [56 bits 0] | 0x05
//! Exception:     [56 bits 0] | 0x0A
//! OptimizedOut:  [56 bits 0] | 0x12
//! ```
//!
//! A double is stored as its IEEE-754 bits plus [`DOUBLE_ENCODE_OFFSET`], which
//! moves every pure double into the `0x0001..=0xFFFE` tag band.

/// Raw machine word behind a tagged value.
pub type TaggedType = u64;

/// Number of high bits used as tag.
pub const TAG_BITS_SIZE: u32 = 16;
/// Shift that brings the tag bits down to the low end of the word.
pub const TAG_BITS_SHIFT: u32 = TaggedType::BITS - TAG_BITS_SIZE;
/// Mask selecting the tag bits.
pub const TAG_MARK: TaggedType = 0xFFFF << TAG_BITS_SHIFT;

/// Tag of a 32-bit integer.
pub const TAG_INT: TaggedType = TAG_MARK;
/// Tag of a heap object pointer.
pub const TAG_OBJECT: TaggedType = 0x0000 << TAG_BITS_SHIFT;
/// Low bit marking a weak heap reference.
pub const TAG_WEAK: TaggedType = TAG_OBJECT | 0x01;

/// Distinguishes `null` from `undefined` inside the special space.
pub const TAG_NULL: TaggedType = 0x01;
/// Set on every special (non-pointer, non-number) value.
pub const TAG_SPECIAL: TaggedType = 0x02;
/// Set on both booleans.
pub const TAG_BOOLEAN: TaggedType = 0x04;
/// Set on the exception marker.
pub const TAG_EXCEPTION: TaggedType = 0x08;
/// Marker for values the optimizing compiler eliminated.
pub const TAG_OPTIMIZED_OUT: TaggedType = 0x12;

/// Mask used to recognise special values.
pub const TAG_SPECIAL_MASK: TaggedType = TAG_MARK | TAG_SPECIAL;
/// Mask used to recognise booleans.
pub const TAG_BOOLEAN_MASK: TaggedType = TAG_SPECIAL | TAG_BOOLEAN;
/// A word is a heap object iff none of these bits are set.
pub const TAG_HEAPOBJECT_MASK: TaggedType = TAG_MARK | TAG_SPECIAL | TAG_BOOLEAN;
/// A word is a weak reference iff masking with this yields [`TAG_WEAK`].
pub const TAG_WEAK_MASK: TaggedType = TAG_HEAPOBJECT_MASK | TAG_WEAK;

/// Uninitialized slot marker. An all-zero word also reads as a hole.
pub const VALUE_HOLE: TaggedType = 0x05;
/// `null`.
pub const VALUE_NULL: TaggedType = TAG_OBJECT | TAG_SPECIAL | TAG_NULL;
/// `false`.
pub const VALUE_FALSE: TaggedType = TAG_BOOLEAN_MASK;
/// `true`.
pub const VALUE_TRUE: TaggedType = TAG_BOOLEAN_MASK | 1;
/// `undefined`.
pub const VALUE_UNDEFINED: TaggedType = TAG_SPECIAL;
/// Pending-exception marker; never a language value.
pub const VALUE_EXCEPTION: TaggedType = TAG_SPECIAL | TAG_EXCEPTION;
/// Integer zero.
pub const VALUE_ZERO: TaggedType = TAG_INT;
/// Optimized-out marker.
pub const VALUE_OPTIMIZED_OUT: TaggedType = TAG_SPECIAL | TAG_OPTIMIZED_OUT;

/// Bit position of the offset added to encoded doubles.
pub const DOUBLE_ENCODE_OFFSET_BIT: u32 = 48;
/// Offset added to the IEEE-754 bits of every encoded double.
pub const DOUBLE_ENCODE_OFFSET: TaggedType = 1 << DOUBLE_ENCODE_OFFSET_BIT;

/// Default-constructed slots hold a hole.
pub const NULL_POINTER: TaggedType = VALUE_HOLE;
/// Raw words at or below this limit are never valid heap addresses.
pub const INVALID_VALUE_LIMIT: TaggedType = 0x40000;

/// Mask of the addressable bits of a heap pointer.
pub const OBJECT_ADDRESS_MASK: TaggedType = !TAG_MARK;

/// Whether `value` would collide with the integer band once encoded.
#[inline]
pub fn is_impure_nan(value: f64) -> bool {
    value.to_bits() >= TAG_INT - DOUBLE_ENCODE_OFFSET
}

/// Encodes the bits of a pure double.
#[inline]
pub fn encode_double(value: f64) -> TaggedType {
    value.to_bits().wrapping_add(DOUBLE_ENCODE_OFFSET)
}

/// Recovers the IEEE-754 value of an encoded double.
#[inline]
pub fn decode_double(raw: TaggedType) -> f64 {
    f64::from_bits(raw.wrapping_sub(DOUBLE_ENCODE_OFFSET))
}

/// Encodes a 32-bit integer. The bits between tag and payload stay zero.
#[inline]
pub const fn encode_int(value: i32) -> TaggedType {
    (value as u32 as TaggedType) | TAG_INT
}

/// Recovers the payload of an integer word.
#[inline]
pub const fn decode_int(raw: TaggedType) -> i32 {
    (raw & !TAG_MARK) as u32 as i32
}
