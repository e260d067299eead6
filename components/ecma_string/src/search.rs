//! Substring search over mixed code-unit widths.

use memory_manager::NoGc;

use crate::string::{CodeUnits, EcmaString};

fn widen<T: Into<u16>>(unit: T) -> u16 {
    unit.into()
}

fn find_forward<A, B>(haystack: &[A], needle: &[B], pos: usize, max: usize) -> i32
where
    A: Copy + Into<u16>,
    B: Copy + Into<u16>,
{
    let first = widen(needle[0]);
    (pos..=max)
        .find(|&i| {
            widen(haystack[i]) == first
                && needle[1..]
                    .iter()
                    .zip(&haystack[i + 1..])
                    .all(|(&n, &h)| widen(n) == widen(h))
        })
        .map_or(-1, |i| i as i32)
}

fn find_backward<A, B>(haystack: &[A], needle: &[B], pos: usize) -> i32
where
    A: Copy + Into<u16>,
    B: Copy + Into<u16>,
{
    (0..=pos)
        .rev()
        .find(|&i| {
            needle
                .iter()
                .zip(&haystack[i..])
                .all(|(&n, &h)| widen(n) == widen(h))
        })
        .map_or(-1, |i| i as i32)
}

impl EcmaString {
    /// Index of the first occurrence of `needle` at or after `pos`, or -1.
    ///
    /// An empty needle matches at `pos` itself when `pos` is not past the
    /// end. A compressed haystack never contains a UTF-16 needle.
    pub fn index_of(haystack: EcmaString, needle: EcmaString, pos: i32, no_gc: &NoGc<'_>) -> i32 {
        let lhs_count = haystack.get_length() as i32;
        let rhs_count = needle.get_length() as i32;
        if pos > lhs_count {
            return -1;
        }
        if rhs_count == 0 {
            return pos;
        }
        let pos = pos.max(0) as usize;
        let max = lhs_count - rhs_count;
        if max < 0 {
            return -1;
        }
        let max = max as usize;
        match (haystack.code_units(no_gc), needle.code_units(no_gc)) {
            (CodeUnits::Utf8(h), CodeUnits::Utf8(n)) => find_forward(h, n, pos, max),
            (CodeUnits::Utf16(h), CodeUnits::Utf16(n)) => find_forward(h, n, pos, max),
            (CodeUnits::Utf16(h), CodeUnits::Utf8(n)) => find_forward(h, n, pos, max),
            (CodeUnits::Utf8(_), CodeUnits::Utf16(_)) => -1,
        }
    }

    /// Index of the last occurrence of `needle` starting at or before `pos`,
    /// or -1.
    pub fn last_index_of(
        haystack: EcmaString,
        needle: EcmaString,
        pos: i32,
        no_gc: &NoGc<'_>,
    ) -> i32 {
        let lhs_count = haystack.get_length() as i32;
        let rhs_count = needle.get_length() as i32;
        if lhs_count < rhs_count {
            return -1;
        }
        let mut pos = pos.clamp(0, lhs_count);
        if pos + rhs_count > lhs_count {
            pos = lhs_count - rhs_count;
        }
        if rhs_count == 0 {
            return pos;
        }
        let pos = pos as usize;
        match (haystack.code_units(no_gc), needle.code_units(no_gc)) {
            (CodeUnits::Utf8(h), CodeUnits::Utf8(n)) => find_backward(h, n, pos),
            (CodeUnits::Utf16(h), CodeUnits::Utf16(n)) => find_backward(h, n, pos),
            (CodeUnits::Utf16(h), CodeUnits::Utf8(n)) => find_backward(h, n, pos),
            (CodeUnits::Utf8(_), CodeUnits::Utf16(_)) => -1,
        }
    }
}
