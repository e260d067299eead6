//! String construction: factories, concatenation and substrings.
//!
//! Every factory allocates and is therefore a collection point. Inputs that
//! live on the heap are passed as handles and re-read after the allocation.

use core_types::ObjectKind;
use memory_manager::{GlobalConstant, Handle, Heap};
use tracing::trace;

use crate::hash::{can_be_compressed_utf16, can_be_compressed_utf8};
use crate::string::{CodeUnits, EcmaString};
use crate::utf;

impl EcmaString {
    /// Allocates an uninitialized string of `length` code units.
    pub fn alloc_string_object(heap: &Heap, length: u32, compressed: bool) -> EcmaString {
        assert!(
            length <= Self::MAX_STRING_LENGTH,
            "string length {} exceeds the maximum",
            length
        );
        let size = Self::compute_size(length, compressed);
        let object = heap.allocate(ObjectKind::String, size);
        let string = EcmaString::from_object(object)
            .unwrap_or_else(|| panic!("fresh string object has the wrong kind"));
        string.set_mix_length(length, compressed);
        string.set_raw_hashcode(0);
        string
    }

    /// Returns the canonical empty string, creating it on first use.
    pub fn create_empty_string(heap: &Heap) -> EcmaString {
        if let Some(empty) = EcmaString::cast(heap.global_constant(GlobalConstant::EmptyString)) {
            return empty;
        }
        let empty = Self::alloc_string_object(heap, 0, true);
        heap.set_global_constant(GlobalConstant::EmptyString, empty.to_value());
        empty
    }

    /// Creates a string from UTF-8 input.
    ///
    /// `can_be_compress` is a hint; the canonical encoding is recomputed from
    /// the data. Malformed sequences decode to U+FFFD.
    pub fn create_from_utf8(heap: &Heap, utf8: &[u8], can_be_compress: bool) -> EcmaString {
        if utf8.is_empty() {
            return Self::create_empty_string(heap);
        }
        let compressible = can_be_compressed_utf8(utf8);
        if compressible != can_be_compress {
            trace!(len = utf8.len(), hint = can_be_compress, "utf8 compression hint overridden");
        }
        if compressible {
            let string = Self::alloc_string_object(heap, utf8.len() as u32, true);
            string.object().write_bytes(Self::DATA_OFFSET, utf8);
            string
        } else {
            let units = utf::utf8_to_utf16(utf8);
            Self::create_from_utf16(heap, &units, false)
        }
    }

    /// Creates a string from UTF-16 code units. The hint is advisory.
    pub fn create_from_utf16(heap: &Heap, utf16: &[u16], can_be_compress: bool) -> EcmaString {
        if utf16.is_empty() {
            return Self::create_empty_string(heap);
        }
        let compressible = can_be_compressed_utf16(utf16);
        if compressible != can_be_compress {
            trace!(len = utf16.len(), hint = can_be_compress, "utf16 compression hint overridden");
        }
        let string = Self::alloc_string_object(heap, utf16.len() as u32, compressible);
        if compressible {
            let bytes: Vec<u8> = utf16.iter().map(|&u| u as u8).collect();
            string.object().write_bytes(Self::DATA_OFFSET, &bytes);
        } else {
            string.object().write_units(Self::DATA_OFFSET, utf16);
        }
        string
    }

    /// Creates a string from a Rust string slice.
    pub fn create_from_str(heap: &Heap, text: &str) -> EcmaString {
        Self::create_from_utf8(heap, text.as_bytes(), text.is_ascii())
    }

    /// Concatenates two strings into a new one.
    ///
    /// An empty operand returns the other operand unchanged. The result is
    /// compressed iff both operands are.
    pub fn concat(first: Handle<'_, EcmaString>, second: Handle<'_, EcmaString>) -> EcmaString {
        let heap = first.heap();
        let (len1, len2) = (first.get().get_length(), second.get().get_length());
        if len1 + len2 == 0 {
            return Self::create_empty_string(heap);
        }
        if len1 == 0 {
            return second.get();
        }
        if len2 == 0 {
            return first.get();
        }
        let total = len1
            .checked_add(len2)
            .filter(|&total| total <= Self::MAX_STRING_LENGTH)
            .unwrap_or_else(|| panic!("concatenated string length overflows"));
        let compressed = first.get().is_utf8() && second.get().is_utf8();

        let result = Self::alloc_string_object(heap, total, compressed);
        let (s1, s2) = (first.get(), second.get());
        let no_gc = heap.no_gc();
        let target = result.object();
        if compressed {
            target.write_bytes(Self::DATA_OFFSET, s1.data_utf8(&no_gc));
            target.write_bytes(Self::DATA_OFFSET + len1 as usize, s2.data_utf8(&no_gc));
        } else {
            write_widened(result, 0, s1.code_units(&no_gc));
            write_widened(result, len1, s2.code_units(&no_gc));
        }
        result
    }

    /// Copies `length` code units of `src` starting at `start` into a new
    /// string.
    ///
    /// A UTF-16 range whose units are all compressible is stored compressed.
    pub fn fast_sub_string(src: Handle<'_, EcmaString>, start: u32, length: u32) -> EcmaString {
        let heap = src.heap();
        let src_len = src.get().get_length();
        assert!(
            start.checked_add(length).is_some_and(|end| end <= src_len),
            "substring [{}, +{}) out of range for string of length {}",
            start,
            length,
            src_len
        );
        if length == 0 {
            return Self::create_empty_string(heap);
        }
        let range = start as usize..(start + length) as usize;

        let compressed = {
            let no_gc = heap.no_gc();
            match src.get().code_units(&no_gc) {
                CodeUnits::Utf8(_) => true,
                CodeUnits::Utf16(data) => can_be_compressed_utf16(&data[range.clone()]),
            }
        };

        let result = Self::alloc_string_object(heap, length, compressed);
        let no_gc = heap.no_gc();
        let target = result.object();
        match src.get().code_units(&no_gc) {
            CodeUnits::Utf8(data) => target.write_bytes(Self::DATA_OFFSET, &data[range]),
            CodeUnits::Utf16(data) if compressed => {
                let bytes: Vec<u8> = data[range].iter().map(|&u| u as u8).collect();
                target.write_bytes(Self::DATA_OFFSET, &bytes);
            }
            CodeUnits::Utf16(data) => target.write_units(Self::DATA_OFFSET, &data[range]),
        }
        result
    }
}

fn write_widened(target: EcmaString, offset: u32, units: CodeUnits<'_>) {
    let at = EcmaString::DATA_OFFSET + offset as usize * 2;
    match units {
        CodeUnits::Utf8(data) => {
            let wide: Vec<u16> = data.iter().map(|&b| u16::from(b)).collect();
            target.object().write_units(at, &wide);
        }
        CodeUnits::Utf16(data) => target.object().write_units(at, data),
    }
}
