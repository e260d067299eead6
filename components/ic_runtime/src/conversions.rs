//! Type conversions used by the comparison runtime.

use core_types::{ErrorKind, JsError, JsResult, TaggedValue};
use ecma_string::{is_white_space_or_line_terminator, EcmaString};
use memory_manager::Heap;

use crate::primitive::{JsObject, PrimitiveRef, Symbol};
use crate::thread::JsThread;

/// Hint passed to [`to_primitive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredType {
    /// No preference (`==`)
    Default,
    /// Prefer numbers (relational operators)
    Number,
    /// Prefer strings
    String,
}

/// Language-level type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsType {
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// `true` / `false`
    Boolean,
    /// Int or double
    Number,
    /// String object
    String,
    /// Symbol object
    Symbol,
    /// Wrappers and ordinary objects
    Object,
}

/// Returns the language-level type of `value`.
///
/// Internal markers (hole, exception) are a contract violation.
pub fn type_of(value: TaggedValue) -> JsType {
    if value.is_number() {
        JsType::Number
    } else if value.is_boolean() {
        JsType::Boolean
    } else if value.is_undefined() {
        JsType::Undefined
    } else if value.is_null() {
        JsType::Null
    } else if EcmaString::cast(value).is_some() {
        JsType::String
    } else if Symbol::cast(value).is_some() {
        JsType::Symbol
    } else {
        debug_assert!(
            PrimitiveRef::cast(value).is_some() || JsObject::cast(value).is_some(),
            "not a language value: {:#x}",
            value.raw()
        );
        JsType::Object
    }
}

/// Converts `value` to a primitive.
///
/// Wrappers yield their primitive. Ordinary objects yield the string
/// `"[object Object]"`, which allocates.
pub fn to_primitive(
    thread: &JsThread,
    value: TaggedValue,
    _preferred: PreferredType,
) -> JsResult<TaggedValue> {
    if type_of(value) != JsType::Object {
        return Ok(value);
    }
    if let Some(wrapper) = PrimitiveRef::cast(value) {
        return Ok(wrapper.value());
    }
    Ok(thread.intern("[object Object]").to_value())
}

/// Converts a primitive to a number without allocating.
pub fn primitive_to_number(heap: &Heap, value: TaggedValue) -> JsResult<f64> {
    match type_of(value) {
        JsType::Number => Ok(value.get_number()),
        JsType::Boolean => Ok(if value.is_true() { 1.0 } else { 0.0 }),
        JsType::Undefined => Ok(f64::NAN),
        JsType::Null => Ok(0.0),
        JsType::String => {
            let string = EcmaString::cast(value)
                .unwrap_or_else(|| panic!("string value lost its kind: {:#x}", value.raw()));
            Ok(string_to_double(heap, string))
        }
        JsType::Symbol => Err(JsError::type_error("Cannot convert a Symbol value to a number")),
        JsType::Object => Err(JsError::new(
            ErrorKind::InternalError,
            "object passed where a primitive was expected",
        )),
    }
}

/// Converts any value to a number.
pub fn to_number(thread: &JsThread, value: TaggedValue) -> JsResult<f64> {
    let primitive = to_primitive(thread, value, PreferredType::Number)?;
    primitive_to_number(thread.heap(), primitive)
}

/// Parses a string with the StringToNumber grammar.
///
/// Surrounding whitespace and line terminators are ignored, an empty string
/// is 0, and anything outside the grammar is NaN.
pub fn string_to_double(heap: &Heap, string: EcmaString) -> f64 {
    let units = {
        let no_gc = heap.no_gc();
        string.to_u16_string(&no_gc)
    };
    let start = units
        .iter()
        .position(|&u| !is_white_space_or_line_terminator(u))
        .unwrap_or(units.len());
    let end = units
        .iter()
        .rposition(|&u| !is_white_space_or_line_terminator(u))
        .map_or(start, |i| i + 1);
    let trimmed = &units[start..end];
    if trimmed.iter().any(|&u| u > 0x7F) {
        return f64::NAN;
    }
    let text: String = trimmed.iter().map(|&u| char::from(u as u8)).collect();
    parse_numeric_literal(&text)
}

fn parse_numeric_literal(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let bytes = text.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' {
        let radix = match bytes[1] {
            b'x' | b'X' => Some(16),
            b'o' | b'O' => Some(8),
            b'b' | b'B' => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            return parse_radix_digits(&text[2..], radix);
        }
    }

    if is_decimal_literal(text) {
        text.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// Parses digits of a power-of-two radix, rounding once to the nearest
/// double.
fn parse_radix_digits(digits: &str, radix: u32) -> f64 {
    debug_assert!(radix.is_power_of_two(), "unsupported radix {}", radix);
    let bits_per_digit = radix.trailing_zeros();
    let mut mantissa: u128 = 0;
    let mut dropped_bits: i32 = 0;
    let mut sticky = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else {
            return f64::NAN;
        };
        if mantissa >> (u128::BITS - bits_per_digit) == 0 {
            mantissa = (mantissa << bits_per_digit) | u128::from(d);
        } else {
            // far below the rounding position; only matters for ties
            dropped_bits += bits_per_digit as i32;
            sticky |= d != 0;
        }
    }
    let mantissa = mantissa | u128::from(sticky);
    // u128 -> f64 rounds to nearest, ties to even
    (mantissa as f64) * 2f64.powi(dropped_bits)
}

/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`
fn is_decimal_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;
    let mut frac_digits = 0;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
    }
    if int_digits + frac_digits == 0 {
        return false;
    }
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == bytes.len()
}
