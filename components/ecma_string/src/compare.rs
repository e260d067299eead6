//! Equality and ordering over string objects and raw data.

use std::cmp::Ordering;

use memory_manager::NoGc;

use crate::hash::can_be_compressed_utf8;
use crate::string::{CodeUnits, EcmaString};
use crate::utf;

fn units_equal(a: CodeUnits<'_>, b: CodeUnits<'_>) -> bool {
    match (a, b) {
        (CodeUnits::Utf8(x), CodeUnits::Utf8(y)) => x == y,
        (CodeUnits::Utf16(x), CodeUnits::Utf16(y)) => x == y,
        (CodeUnits::Utf8(x), CodeUnits::Utf16(y)) | (CodeUnits::Utf16(y), CodeUnits::Utf8(x)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(&b, &u)| u16::from(b) == u)
        }
    }
}

fn slice(units: CodeUnits<'_>, from: usize, to: usize) -> CodeUnits<'_> {
    match units {
        CodeUnits::Utf8(data) => CodeUnits::Utf8(&data[from..to]),
        CodeUnits::Utf16(data) => CodeUnits::Utf16(&data[from..to]),
    }
}

impl EcmaString {
    /// Content equality.
    ///
    /// Encodings are canonical, so strings with different encodings are
    /// never equal.
    pub fn strings_are_equal(a: EcmaString, b: EcmaString, no_gc: &NoGc<'_>) -> bool {
        if a == b {
            return true;
        }
        if a.is_utf8() != b.is_utf8() || a.get_length() != b.get_length() {
            return false;
        }
        if a.get_hashcode(no_gc) != b.get_hashcode(no_gc) {
            return false;
        }
        units_equal(a.code_units(no_gc), b.code_units(no_gc))
    }

    /// Three-way comparison by code units, then by length.
    pub fn compare(a: EcmaString, b: EcmaString, no_gc: &NoGc<'_>) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let (x, y) = (a.code_units(no_gc), b.code_units(no_gc));
        let common = x.len().min(y.len());
        for i in 0..common {
            match x.at(i).cmp(&y.at(i)) {
                Ordering::Equal => {}
                other => return other,
            }
        }
        x.len().cmp(&y.len())
    }

    /// Whether `self` equals the concatenation of `first` and `second`.
    pub fn equal_to_spliced_string(
        self,
        first: EcmaString,
        second: EcmaString,
        no_gc: &NoGc<'_>,
    ) -> bool {
        let len = self.get_length() as usize;
        let first_len = first.get_length() as usize;
        if len != first_len + second.get_length() as usize {
            return false;
        }
        if self.is_utf8() && (first.is_utf16() || second.is_utf16()) {
            return false;
        }
        let units = self.code_units(no_gc);
        units_equal(slice(units, 0, first_len), first.code_units(no_gc))
            && units_equal(slice(units, first_len, len), second.code_units(no_gc))
    }

    /// Whether the string equals the one [`EcmaString::create_from_utf8`]
    /// would build from `data`.
    pub fn strings_are_equal_utf8(string: EcmaString, data: &[u8], no_gc: &NoGc<'_>) -> bool {
        if can_be_compressed_utf8(data) {
            string.is_utf8() && string.data_utf8(no_gc) == data
        } else {
            string.is_utf16() && string.data_utf16(no_gc) == utf::utf8_to_utf16(data).as_slice()
        }
    }

    /// Whether the string's code units equal `data`.
    pub fn strings_are_equal_utf16(string: EcmaString, data: &[u16], no_gc: &NoGc<'_>) -> bool {
        string.get_length() as usize == data.len()
            && units_equal(string.code_units(no_gc), CodeUnits::Utf16(data))
    }
}
