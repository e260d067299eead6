//! Checked view over a heap-allocated object.
//!
//! [`HeapObject`] is the only way the rest of the runtime touches object
//! memory. Every read and write is bounds-checked against the size stored in
//! the object header, so the crates built on top stay free of `unsafe`.
//!
//! # Validity
//!
//! A `HeapObject` is a plain address. It stays valid until the next
//! allocation, because any allocation may move objects. Code that needs an
//! object across an allocation keeps it in a [`Handle`](crate::Handle) and
//! re-reads it afterwards. Borrowed payload slices additionally require a
//! [`NoGc`] guard and cannot outlive it.

use std::ptr::{self, NonNull};

use core_types::{ObjectHeader, ObjectKind, TaggedObject, TaggedValue};

use crate::heap::NoGc;

/// Address of a live heap object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeapObject {
    ptr: NonNull<TaggedObject>,
}

impl HeapObject {
    /// Views a tagged value as an object. Returns `None` for anything but a
    /// strong heap reference.
    pub fn from_value(value: TaggedValue) -> Option<Self> {
        if value.is_heap_object() && !value.is_weak() {
            Some(HeapObject {
                ptr: value.get_tagged_object(),
            })
        } else {
            None
        }
    }

    pub(crate) fn from_raw_address(address: usize) -> Self {
        let ptr = NonNull::new(address as *mut TaggedObject)
            .unwrap_or_else(|| panic!("null heap object address"));
        HeapObject { ptr }
    }

    /// Returns the object as a strong tagged reference.
    pub fn to_value(self) -> TaggedValue {
        TaggedValue::from_object(self.ptr)
    }

    /// Returns the object's address.
    pub fn address(self) -> usize {
        self.ptr.as_ptr() as usize
    }

    fn base(self) -> *mut u8 {
        self.ptr.as_ptr() as *mut u8
    }

    /// Returns a copy of the object header.
    pub fn header(self) -> ObjectHeader {
        // SAFETY: every heap object starts with an initialized, 8-byte
        // aligned header
        unsafe { ptr::read(self.ptr.as_ptr() as *const ObjectHeader) }
    }

    fn write_header(self, header: ObjectHeader) {
        // SAFETY: see `header`
        unsafe { ptr::write(self.ptr.as_ptr() as *mut ObjectHeader, header) }
    }

    /// Returns the object kind. A corrupt kind byte is fatal.
    pub fn kind(self) -> ObjectKind {
        let header = self.header();
        header.object_kind().unwrap_or_else(|| {
            panic!(
                "corrupt object header at {:#x}: kind byte {:#x}",
                self.address(),
                header.kind
            )
        })
    }

    /// Whether the object has the given kind.
    pub fn is_kind(self, kind: ObjectKind) -> bool {
        self.header().kind == kind as u8
    }

    /// Total object size in bytes.
    pub fn size(self) -> usize {
        self.header().size as usize
    }

    fn check_range(self, offset: usize, len: usize) {
        let size = self.size();
        assert!(
            offset >= TaggedObject::SIZE && offset.checked_add(len).is_some_and(|end| end <= size),
            "field access [{}, +{}) outside object of {} bytes at {:#x}",
            offset,
            len,
            size,
            self.address()
        );
    }

    /// Reads one byte.
    pub fn read_u8(self, offset: usize) -> u8 {
        self.check_range(offset, 1);
        // SAFETY: range checked against the object size
        unsafe { ptr::read(self.base().add(offset)) }
    }

    /// Reads one UTF-16 code unit.
    pub fn read_u16(self, offset: usize) -> u16 {
        self.check_range(offset, 2);
        // SAFETY: range checked against the object size
        unsafe { ptr::read_unaligned(self.base().add(offset) as *const u16) }
    }

    /// Reads a `u32` field.
    pub fn read_u32(self, offset: usize) -> u32 {
        self.check_range(offset, 4);
        // SAFETY: range checked against the object size
        unsafe { ptr::read_unaligned(self.base().add(offset) as *const u32) }
    }

    /// Writes a `u32` field.
    pub fn write_u32(self, offset: usize, value: u32) {
        self.check_range(offset, 4);
        // SAFETY: range checked against the object size
        unsafe { ptr::write_unaligned(self.base().add(offset) as *mut u32, value) }
    }

    /// Reads a tagged-value field.
    pub fn read_tagged(self, offset: usize) -> TaggedValue {
        self.check_range(offset, 8);
        // SAFETY: range checked against the object size
        let raw = unsafe { ptr::read_unaligned(self.base().add(offset) as *const u64) };
        TaggedValue::from_raw(raw)
    }

    /// Writes a tagged-value field.
    pub fn write_tagged(self, offset: usize, value: TaggedValue) {
        self.check_range(offset, 8);
        // SAFETY: range checked against the object size
        unsafe { ptr::write_unaligned(self.base().add(offset) as *mut u64, value.raw()) }
    }

    /// Borrows `len` payload bytes starting at `offset`.
    pub fn bytes<'a>(self, _no_gc: &'a NoGc<'_>, offset: usize, len: usize) -> &'a [u8] {
        self.check_range(offset, len);
        // SAFETY: range checked; the guard prevents collections, so the
        // object cannot move while the slice is alive
        unsafe { std::slice::from_raw_parts(self.base().add(offset), len) }
    }

    /// Borrows `len` UTF-16 code units starting at `offset`.
    pub fn units<'a>(self, _no_gc: &'a NoGc<'_>, offset: usize, len: usize) -> &'a [u16] {
        assert!(offset % 2 == 0, "misaligned code unit offset {}", offset);
        self.check_range(offset, len * 2);
        // SAFETY: range and alignment checked; see `bytes`
        unsafe { std::slice::from_raw_parts(self.base().add(offset) as *const u16, len) }
    }

    /// Copies `data` into the object at `offset`.
    pub fn write_bytes(self, offset: usize, data: &[u8]) {
        self.check_range(offset, data.len());
        // SAFETY: range checked; `ptr::copy` tolerates overlap
        unsafe { ptr::copy(data.as_ptr(), self.base().add(offset), data.len()) }
    }

    /// Copies UTF-16 `data` into the object at `offset`.
    pub fn write_units(self, offset: usize, data: &[u16]) {
        assert!(offset % 2 == 0, "misaligned code unit offset {}", offset);
        self.check_range(offset, data.len() * 2);
        // SAFETY: range and alignment checked
        unsafe {
            ptr::copy(
                data.as_ptr(),
                self.base().add(offset) as *mut u16,
                data.len(),
            )
        }
    }

    /// Marks the object as copied to `target`.
    pub(crate) fn set_forwarding_address(self, target: HeapObject) {
        let mut header = self.header();
        header.gc_flags |= ObjectHeader::FORWARDED;
        self.write_header(header);
        // SAFETY: every object is at least `TaggedObject::MIN_SIZE` bytes,
        // so the word after the header exists
        unsafe {
            ptr::write_unaligned(
                self.base().add(TaggedObject::SIZE) as *mut u64,
                target.address() as u64,
            )
        }
    }

    /// Returns the new location of a forwarded object.
    pub(crate) fn forwarding_address(self) -> Option<HeapObject> {
        if !self.header().is_forwarded() {
            return None;
        }
        // SAFETY: see `set_forwarding_address`
        let raw = unsafe { ptr::read_unaligned(self.base().add(TaggedObject::SIZE) as *const u64) };
        Some(HeapObject::from_raw_address(raw as usize))
    }

    pub(crate) fn init_header(self, kind: ObjectKind, size: usize) {
        self.write_header(ObjectHeader::new(kind, size as u32));
    }
}
