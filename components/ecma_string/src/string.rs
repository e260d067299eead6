//! The string object and its read-only accessors.
//!
//! Layout after the 8-byte object header:
//!
//! | offset | field        | contents                                         |
//! |--------|--------------|--------------------------------------------------|
//! | 8      | `mix_length` | `length << 2 \| intern << 1 \| utf16`            |
//! | 12     | `hashcode`   | cached hash, 0 until computed                    |
//! | 16     | data         | `length` bytes, or `length` UTF-16 code units    |
//!
//! Bit 0 of `mix_length` is clear for compressed (one byte per unit) strings
//! and set for UTF-16 strings.

use std::ffi::CString;

use core_types::{ObjectKind, TaggedObject, TaggedValue};
use memory_manager::{HandleTarget, HeapObject, NoGc};

use crate::hash;
use crate::utf;

/// Code units of a string, borrowed under a [`NoGc`] guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeUnits<'a> {
    /// Compressed payload
    Utf8(&'a [u8]),
    /// Uncompressed payload
    Utf16(&'a [u16]),
}

impl CodeUnits<'_> {
    /// Number of code units.
    pub fn len(&self) -> usize {
        match self {
            CodeUnits::Utf8(data) => data.len(),
            CodeUnits::Utf16(data) => data.len(),
        }
    }

    /// Whether there are no code units.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the code unit at `index`.
    pub fn at(&self, index: usize) -> u16 {
        match self {
            CodeUnits::Utf8(data) => u16::from(data[index]),
            CodeUnits::Utf16(data) => data[index],
        }
    }
}

/// View of a string object on the heap.
///
/// Like every object view it is only valid until the next allocation; keep a
/// [`Handle`](memory_manager::Handle) to hold a string across one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcmaString {
    object: HeapObject,
}

impl EcmaString {
    /// Offset of the packed length and flag word.
    pub const MIX_LENGTH_OFFSET: usize = TaggedObject::SIZE;
    /// Offset of the cached hashcode.
    pub const HASHCODE_OFFSET: usize = Self::MIX_LENGTH_OFFSET + 4;
    /// Offset of the payload.
    pub const DATA_OFFSET: usize = Self::HASHCODE_OFFSET + 4;

    /// Set in `mix_length` when the payload is UTF-16.
    pub const STRING_UNCOMPRESSED: u32 = 0x1;
    /// Set in `mix_length` when the string is interned.
    pub const STRING_INTERN_BIT: u32 = 0x2;
    /// Number of flag bits below the length.
    pub const LENGTH_SHIFT: u32 = 2;
    /// Longest representable string.
    pub const MAX_STRING_LENGTH: u32 = 0x3FFF_FFFF;

    /// Largest valid array index plus one.
    pub const MAX_ELEMENT_INDEX: u64 = u32::MAX as u64;
    /// Digits in the largest array index.
    pub const MAX_ELEMENT_INDEX_LEN: u32 = 10;

    /// Views `value` as a string, `None` if it is anything else.
    pub fn cast(value: TaggedValue) -> Option<Self> {
        HeapObject::from_value(value).and_then(Self::from_object)
    }

    /// Views `object` as a string, `None` if it has another kind.
    pub fn from_object(object: HeapObject) -> Option<Self> {
        if object.is_kind(ObjectKind::String) {
            Some(EcmaString { object })
        } else {
            None
        }
    }

    /// Returns the string as a tagged value.
    pub fn to_value(self) -> TaggedValue {
        self.object.to_value()
    }

    /// Returns the underlying object.
    pub fn object(self) -> HeapObject {
        self.object
    }

    fn mix_length(self) -> u32 {
        self.object.read_u32(Self::MIX_LENGTH_OFFSET)
    }

    pub(crate) fn set_mix_length(self, length: u32, compressed: bool) {
        debug_assert!(
            length <= Self::MAX_STRING_LENGTH,
            "string length {} exceeds the maximum",
            length
        );
        let flag = if compressed { 0 } else { Self::STRING_UNCOMPRESSED };
        self.object
            .write_u32(Self::MIX_LENGTH_OFFSET, (length << Self::LENGTH_SHIFT) | flag);
    }

    /// Number of code units.
    pub fn get_length(self) -> u32 {
        self.mix_length() >> Self::LENGTH_SHIFT
    }

    /// Whether the string has no code units.
    pub fn is_empty(self) -> bool {
        self.get_length() == 0
    }

    /// Whether the payload is stored one byte per unit.
    pub fn is_utf8(self) -> bool {
        self.mix_length() & Self::STRING_UNCOMPRESSED == 0
    }

    /// Whether the payload is stored as UTF-16 code units.
    pub fn is_utf16(self) -> bool {
        !self.is_utf8()
    }

    /// Whether the intern flag is set.
    pub fn is_intern_string(self) -> bool {
        self.mix_length() & Self::STRING_INTERN_BIT != 0
    }

    /// Sets the intern flag.
    pub fn set_intern_string(self) {
        let mix = self.mix_length() | Self::STRING_INTERN_BIT;
        self.object.write_u32(Self::MIX_LENGTH_OFFSET, mix);
    }

    /// Clears the intern flag.
    pub fn clear_intern_string_flag(self) {
        let mix = self.mix_length() & !Self::STRING_INTERN_BIT;
        self.object.write_u32(Self::MIX_LENGTH_OFFSET, mix);
    }

    /// The stored hashcode, 0 if not yet computed.
    pub fn raw_hashcode(self) -> u32 {
        self.object.read_u32(Self::HASHCODE_OFFSET)
    }

    pub(crate) fn set_raw_hashcode(self, hash: u32) {
        self.object.write_u32(Self::HASHCODE_OFFSET, hash);
    }

    /// Returns the hashcode, computing and caching it on first use.
    pub fn get_hashcode(self, no_gc: &NoGc<'_>) -> u32 {
        let hash = self.raw_hashcode();
        if hash != 0 || self.is_empty() {
            return hash;
        }
        let hash = self.compute_hashcode(no_gc, 0);
        self.set_raw_hashcode(hash);
        hash
    }

    /// Hashes the code units starting from `seed` without touching the cache.
    pub fn compute_hashcode(self, no_gc: &NoGc<'_>, seed: u32) -> u32 {
        match self.code_units(no_gc) {
            CodeUnits::Utf8(data) => hash::compute_hash_for_data(data, seed),
            CodeUnits::Utf16(data) => hash::compute_hash_for_data(data, seed),
        }
    }

    /// Borrows a compressed payload.
    pub fn data_utf8<'a>(self, no_gc: &'a NoGc<'_>) -> &'a [u8] {
        assert!(self.is_utf8(), "string is not compressed");
        self.object
            .bytes(no_gc, Self::DATA_OFFSET, self.get_length() as usize)
    }

    /// Borrows a UTF-16 payload.
    pub fn data_utf16<'a>(self, no_gc: &'a NoGc<'_>) -> &'a [u16] {
        assert!(self.is_utf16(), "string is not UTF-16");
        self.object
            .units(no_gc, Self::DATA_OFFSET, self.get_length() as usize)
    }

    /// Borrows the payload in whichever encoding it is stored.
    pub fn code_units<'a>(self, no_gc: &'a NoGc<'_>) -> CodeUnits<'a> {
        if self.is_utf8() {
            CodeUnits::Utf8(self.data_utf8(no_gc))
        } else {
            CodeUnits::Utf16(self.data_utf16(no_gc))
        }
    }

    /// Code unit at `index`.
    pub fn at(self, index: u32) -> u16 {
        assert!(
            index < self.get_length(),
            "index {} out of range for string of length {}",
            index,
            self.get_length()
        );
        let index = index as usize;
        if self.is_utf8() {
            u16::from(self.object.read_u8(Self::DATA_OFFSET + index))
        } else {
            self.object.read_u16(Self::DATA_OFFSET + index * 2)
        }
    }

    /// Object size needed for a payload of `length` units.
    pub fn compute_size(length: u32, compressed: bool) -> usize {
        let unit = if compressed { 1 } else { 2 };
        TaggedObject::align_size(Self::DATA_OFFSET + length as usize * unit)
    }

    /// Size of this object in bytes.
    pub fn object_size(self) -> usize {
        Self::compute_size(self.get_length(), self.is_utf8())
    }

    /// Whether every code unit fits the compressed encoding.
    pub fn can_be_compressed(self, no_gc: &NoGc<'_>) -> bool {
        match self.code_units(no_gc) {
            CodeUnits::Utf8(data) => hash::can_be_compressed_utf8(data),
            CodeUnits::Utf16(data) => hash::can_be_compressed_utf16(data),
        }
    }

    /// Length of the UTF-8 encoding produced by [`EcmaString::write_utf8`].
    pub fn utf8_length(self, no_gc: &NoGc<'_>) -> usize {
        match self.code_units(no_gc) {
            CodeUnits::Utf8(data) => data.len(),
            CodeUnits::Utf16(data) => utf::utf16_to_utf8_size(data),
        }
    }

    /// Copies the UTF-8 encoding into `buf`, returning the bytes written.
    ///
    /// Output is cut at `buf.len()`; a multi-byte sequence that does not fit
    /// entirely is left out.
    pub fn write_utf8(self, no_gc: &NoGc<'_>, buf: &mut [u8]) -> usize {
        match self.code_units(no_gc) {
            CodeUnits::Utf8(data) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                n
            }
            CodeUnits::Utf16(data) => utf::write_utf16_as_utf8(data, buf),
        }
    }

    /// Copies code units into `buf`, returning the units written.
    pub fn write_utf16(self, no_gc: &NoGc<'_>, buf: &mut [u16]) -> usize {
        let units = self.code_units(no_gc);
        let n = units.len().min(buf.len());
        match units {
            CodeUnits::Utf8(data) => {
                for (dst, &src) in buf.iter_mut().zip(&data[..n]) {
                    *dst = u16::from(src);
                }
            }
            CodeUnits::Utf16(data) => buf[..n].copy_from_slice(&data[..n]),
        }
        n
    }

    /// Returns the code units as an owned vector.
    pub fn to_u16_string(self, no_gc: &NoGc<'_>) -> Vec<u16> {
        match self.code_units(no_gc) {
            CodeUnits::Utf8(data) => data.iter().map(|&b| u16::from(b)).collect(),
            CodeUnits::Utf16(data) => data.to_vec(),
        }
    }

    /// Converts to a Rust string. Lone surrogates become U+FFFD.
    pub fn to_std_string(self, no_gc: &NoGc<'_>) -> String {
        match self.code_units(no_gc) {
            // compressed payloads are ASCII
            CodeUnits::Utf8(data) => data.iter().map(|&b| char::from(b)).collect(),
            CodeUnits::Utf16(data) => String::from_utf16_lossy(data),
        }
    }

    /// Parses a canonical array index (`"0"`, or digits without a leading
    /// zero below 2^32 - 1).
    pub fn to_element_index(self, no_gc: &NoGc<'_>) -> Option<u32> {
        let len = self.get_length();
        if len == 0 || len > Self::MAX_ELEMENT_INDEX_LEN || self.is_utf16() {
            return None;
        }
        let data = self.data_utf8(no_gc);
        if data[0] == b'0' {
            return if len == 1 { Some(0) } else { None };
        }
        let mut index: u64 = 0;
        for &c in data {
            if !c.is_ascii_digit() {
                return None;
            }
            index = index * 10 + u64::from(c - b'0');
        }
        if index < Self::MAX_ELEMENT_INDEX {
            Some(index as u32)
        } else {
            None
        }
    }

    /// Classifies a typed-array property key.
    ///
    /// `None` means an ordinary property name. A numeric key that cannot
    /// address an element (`"-1"`, `"1.5"`, or anything at or above
    /// 2^32 - 1) yields `Some(u32::MAX)`, which is never a valid index.
    pub fn to_typed_array_index(self, no_gc: &NoGc<'_>) -> Option<u32> {
        let len = self.get_length();
        if len == 0 || len > Self::MAX_ELEMENT_INDEX_LEN || self.is_utf16() {
            return None;
        }
        let data = self.data_utf8(no_gc);
        match data[0] {
            b'0' => (len == 1).then_some(0),
            b'1'..=b'9' => {
                let mut index: u64 = 0;
                for &c in data {
                    match c {
                        b'0'..=b'9' => index = index * 10 + u64::from(c - b'0'),
                        b'.' => return Some(u32::MAX),
                        _ => return None,
                    }
                }
                Some(index.min(Self::MAX_ELEMENT_INDEX) as u32)
            }
            b'-' => Some(u32::MAX),
            _ => None,
        }
    }

    /// UTF-8 bytes with a trailing NUL, for native callers. The result ends
    /// at the first NUL code unit.
    pub fn to_c_string(self, no_gc: &NoGc<'_>) -> CString {
        let mut bytes = match self.code_units(no_gc) {
            CodeUnits::Utf8(data) => data.to_vec(),
            CodeUnits::Utf16(data) => utf::utf16_to_utf8(data),
        };
        if let Some(end) = bytes.iter().position(|&b| b == 0) {
            bytes.truncate(end);
        }
        CString::new(bytes).unwrap_or_default()
    }
}

const _: () = assert!(EcmaString::DATA_OFFSET % TaggedObject::ALIGNMENT == 0);

impl HandleTarget for EcmaString {
    fn from_tagged(value: TaggedValue) -> Self {
        EcmaString::cast(value)
            .unwrap_or_else(|| panic!("handle slot does not hold a string: {:#x}", value.raw()))
    }

    fn to_tagged(self) -> TaggedValue {
        self.to_value()
    }
}
