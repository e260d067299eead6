//! Common header shared by every heap object.
//!
//! Objects are laid out as an 8-byte [`ObjectHeader`] followed by kind
//! specific fields. The header stores the object's total size so the
//! collector can walk and copy objects without knowing their kind.

/// Heap object kinds.
///
/// The discriminant is stored in the first header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ObjectKind {
    /// String with compressed or UTF-16 payload
    String = 1,
    /// Symbol with an optional description
    Symbol = 2,
    /// Wrapper around a primitive (`new Boolean(true)`, `new Number(1)`)
    PrimitiveRef = 3,
    /// Ordinary object with the default `valueOf`/`toString`
    Object = 4,
}

impl ObjectKind {
    /// Decodes a header kind byte.
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(ObjectKind::String),
            2 => Some(ObjectKind::Symbol),
            3 => Some(ObjectKind::PrimitiveRef),
            4 => Some(ObjectKind::Object),
            _ => None,
        }
    }

    /// Byte offsets of the tagged-value fields the collector must visit.
    pub fn tagged_field_offsets(self) -> &'static [usize] {
        match self {
            ObjectKind::String | ObjectKind::Object => &[],
            ObjectKind::Symbol | ObjectKind::PrimitiveRef => &[TaggedObject::SIZE],
        }
    }
}

/// Header at the start of every heap object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ObjectHeader {
    /// [`ObjectKind`] discriminant
    pub kind: u8,
    /// Collector bits; bit 0 marks a forwarded object
    pub gc_flags: u8,
    reserved: u16,
    /// Total object size in bytes, header included
    pub size: u32,
}

impl ObjectHeader {
    /// Set in `gc_flags` once the object was copied; the new address is
    /// stored in the first word after the header.
    pub const FORWARDED: u8 = 0x01;

    /// Creates a header for a fresh object.
    pub fn new(kind: ObjectKind, size: u32) -> Self {
        Self {
            kind: kind as u8,
            gc_flags: 0,
            reserved: 0,
            size,
        }
    }

    /// Returns the decoded object kind.
    pub fn object_kind(&self) -> Option<ObjectKind> {
        ObjectKind::from_u8(self.kind)
    }

    /// Whether the forwarded bit is set.
    pub fn is_forwarded(&self) -> bool {
        self.gc_flags & Self::FORWARDED != 0
    }
}

/// Opaque target of a heap reference stored in a
/// [`TaggedValue`](crate::TaggedValue).
#[repr(C)]
pub struct TaggedObject {
    header: ObjectHeader,
}

impl TaggedObject {
    /// Size of the common header.
    pub const SIZE: usize = std::mem::size_of::<ObjectHeader>();
    /// Alignment of every object start and size.
    pub const ALIGNMENT: usize = 8;
    /// Smallest object, large enough to hold a forwarding address.
    pub const MIN_SIZE: usize = Self::SIZE + 8;

    /// Rounds `size` up to the object alignment.
    pub const fn align_size(size: usize) -> usize {
        (size + Self::ALIGNMENT - 1) & !(Self::ALIGNMENT - 1)
    }

    /// Returns the header.
    pub fn header(&self) -> &ObjectHeader {
        &self.header
    }
}

const _: () = assert!(TaggedObject::SIZE == 8);
