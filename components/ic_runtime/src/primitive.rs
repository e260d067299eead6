//! Non-string heap values: primitive wrappers, symbols and plain objects.
//!
//! Each is a fixed 16-byte object. Wrappers and symbols carry one tagged
//! field at offset 8 that the collector traces.

use core_types::{ObjectKind, TaggedValue};
use memory_manager::{HandleScope, HandleTarget, Heap, HeapObject};

const FIELD_OFFSET: usize = 8;
const OBJECT_SIZE: usize = 16;

/// Allocates a one-field object, keeping `field` alive across the
/// allocation.
fn allocate_with_field(heap: &Heap, kind: ObjectKind, field: TaggedValue) -> HeapObject {
    let scope = HandleScope::new(heap);
    let field = scope.handle(field);
    let object = heap.allocate(kind, OBJECT_SIZE);
    object.write_tagged(FIELD_OFFSET, field.get());
    object
}

macro_rules! object_view {
    ($name:ident, $kind:expr) => {
        impl $name {
            /// Views `value` as this kind of object.
            pub fn cast(value: TaggedValue) -> Option<Self> {
                HeapObject::from_value(value)
                    .filter(|object| object.is_kind($kind))
                    .map(|object| $name { object })
            }

            /// Returns the object as a tagged value.
            pub fn to_value(self) -> TaggedValue {
                self.object.to_value()
            }
        }

        impl HandleTarget for $name {
            fn from_tagged(value: TaggedValue) -> Self {
                $name::cast(value).unwrap_or_else(|| {
                    panic!(concat!("handle slot does not hold a ", stringify!($name), ": {:#x}"), value.raw())
                })
            }

            fn to_tagged(self) -> TaggedValue {
                self.to_value()
            }
        }
    };
}

/// Wrapper object around a primitive (`new Boolean(true)`, `new Number(1)`,
/// `new String("s")`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveRef {
    object: HeapObject,
}

object_view!(PrimitiveRef, ObjectKind::PrimitiveRef);

impl PrimitiveRef {
    /// Wraps `value`. Allocates.
    pub fn create(heap: &Heap, value: TaggedValue) -> PrimitiveRef {
        debug_assert!(
            !value.is_heap_object() || is_string_or_symbol(value),
            "primitive wrapper around a non-primitive: {:#x}",
            value.raw()
        );
        PrimitiveRef {
            object: allocate_with_field(heap, ObjectKind::PrimitiveRef, value),
        }
    }

    /// The wrapped primitive.
    pub fn value(self) -> TaggedValue {
        self.object.read_tagged(FIELD_OFFSET)
    }
}

/// A symbol. Identity is the object address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    object: HeapObject,
}

object_view!(Symbol, ObjectKind::Symbol);

impl Symbol {
    /// Creates a symbol with the given description (a string or
    /// `undefined`). Allocates.
    pub fn create(heap: &Heap, description: TaggedValue) -> Symbol {
        Symbol {
            object: allocate_with_field(heap, ObjectKind::Symbol, description),
        }
    }

    /// The description.
    pub fn description(self) -> TaggedValue {
        self.object.read_tagged(FIELD_OFFSET)
    }
}

/// An ordinary object with the default `valueOf` and `toString`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsObject {
    object: HeapObject,
}

object_view!(JsObject, ObjectKind::Object);

impl JsObject {
    /// Allocates an empty object.
    pub fn create(heap: &Heap) -> JsObject {
        JsObject {
            object: heap.allocate(ObjectKind::Object, OBJECT_SIZE),
        }
    }
}

fn is_string_or_symbol(value: TaggedValue) -> bool {
    HeapObject::from_value(value)
        .is_some_and(|object| object.is_kind(ObjectKind::String) || object.is_kind(ObjectKind::Symbol))
}
