//! Case conversion and trimming. Every transform returns a new string.

use memory_manager::Handle;

use crate::locale::{LocaleService, RootLocale};
use crate::string::EcmaString;

/// Which ends [`EcmaString::trim`] strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimMode {
    /// Both ends
    Trim,
    /// Leading whitespace only
    TrimStart,
    /// Trailing whitespace only
    TrimEnd,
}

/// ECMAScript WhiteSpace and LineTerminator code units.
pub fn is_white_space_or_line_terminator(unit: u16) -> bool {
    matches!(
        unit,
        0x0009..=0x000D
            | 0x0020
            | 0x00A0
            | 0x1680
            | 0x2000..=0x200A
            | 0x2028
            | 0x2029
            | 0x202F
            | 0x205F
            | 0x3000
            | 0xFEFF
    )
}

#[derive(Clone, Copy)]
enum Case {
    Lower,
    Upper,
}

impl EcmaString {
    /// Locale-independent lowercase.
    pub fn to_lower(src: Handle<'_, EcmaString>) -> EcmaString {
        Self::convert_case(src, Case::Lower, &RootLocale)
    }

    /// Locale-independent uppercase.
    pub fn to_upper(src: Handle<'_, EcmaString>) -> EcmaString {
        Self::convert_case(src, Case::Upper, &RootLocale)
    }

    /// Lowercase under `locale`.
    pub fn to_locale_lower(src: Handle<'_, EcmaString>, locale: &dyn LocaleService) -> EcmaString {
        Self::map_with_locale(src, Case::Lower, locale)
    }

    /// Uppercase under `locale`.
    pub fn to_locale_upper(src: Handle<'_, EcmaString>, locale: &dyn LocaleService) -> EcmaString {
        Self::map_with_locale(src, Case::Upper, locale)
    }

    fn convert_case(src: Handle<'_, EcmaString>, case: Case, locale: &dyn LocaleService) -> EcmaString {
        if src.get().is_utf16() {
            return Self::map_with_locale(src, case, locale);
        }
        let heap = src.heap();
        let length = src.get().get_length();
        if length == 0 {
            return Self::create_empty_string(heap);
        }
        let range = match case {
            Case::Lower => b'A'..=b'Z',
            Case::Upper => b'a'..=b'z',
        };
        let result = Self::alloc_string_object(heap, length, true);
        let no_gc = heap.no_gc();
        let mapped: Vec<u8> = src
            .get()
            .data_utf8(&no_gc)
            .iter()
            .map(|&c| if range.contains(&c) { c ^ 0x20 } else { c })
            .collect();
        result.object().write_bytes(Self::DATA_OFFSET, &mapped);
        result
    }

    fn map_with_locale(src: Handle<'_, EcmaString>, case: Case, locale: &dyn LocaleService) -> EcmaString {
        let heap = src.heap();
        let units = {
            let no_gc = heap.no_gc();
            src.get().to_u16_string(&no_gc)
        };
        let mapped = match case {
            Case::Lower => locale.to_lower(&units),
            Case::Upper => locale.to_upper(&units),
        };
        Self::create_from_utf16(heap, &mapped, false)
    }

    /// Strips whitespace and line terminators from the ends chosen by `mode`.
    pub fn trim(src: Handle<'_, EcmaString>, mode: TrimMode) -> EcmaString {
        let heap = src.heap();
        let length = src.get().get_length();
        if length == 0 {
            return Self::create_empty_string(heap);
        }
        let (start, end) = {
            let no_gc = heap.no_gc();
            let units = src.get().code_units(&no_gc);
            let len = units.len();
            let start = match mode {
                TrimMode::Trim | TrimMode::TrimStart => (0..len)
                    .find(|&i| !is_white_space_or_line_terminator(units.at(i)))
                    .unwrap_or(len),
                TrimMode::TrimEnd => 0,
            };
            let end = match mode {
                TrimMode::Trim | TrimMode::TrimEnd => (start..len)
                    .rev()
                    .find(|&i| !is_white_space_or_line_terminator(units.at(i)))
                    .map_or(start, |i| i + 1),
                TrimMode::TrimStart => len,
            };
            (start as u32, end as u32)
        };
        Self::fast_sub_string(src, start, end - start)
    }
}
