//! String hashing and compressibility checks over raw code units.
//!
//! These work on plain slices so that callers can hash or classify data
//! exactly as a string object would, without allocating one.

use crate::utf;

/// Whether a code unit can be stored compressed. NUL is excluded.
#[inline]
pub fn is_compressible(unit: u16) -> bool {
    unit.wrapping_sub(1) < 0x7F
}

/// Whether every byte is compressible.
pub fn can_be_compressed_utf8(data: &[u8]) -> bool {
    data.iter().all(|&b| is_compressible(u16::from(b)))
}

/// Whether every UTF-16 unit is compressible.
pub fn can_be_compressed_utf16(data: &[u16]) -> bool {
    data.iter().all(|&u| is_compressible(u))
}

/// `hash * 31 + unit` over the code units, wrapping.
pub fn compute_hash_for_data<T>(data: &[T], seed: u32) -> u32
where
    T: Copy + Into<u32>,
{
    data.iter().fold(seed, |hash, &unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(unit.into())
    })
}

/// Hashes UTF-8 input as the string created from it would hash.
pub fn compute_hashcode_utf8(data: &[u8]) -> u32 {
    if can_be_compressed_utf8(data) {
        compute_hash_for_data(data, 0)
    } else {
        compute_hash_for_data(&utf::utf8_to_utf16(data), 0)
    }
}

/// Hashes UTF-16 input as the string created from it would hash.
pub fn compute_hashcode_utf16(data: &[u16]) -> u32 {
    compute_hash_for_data(data, 0)
}
