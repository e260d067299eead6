//! Handles: collector-visible slots for values held across allocations.
//!
//! A [`HandleScope`] owns a contiguous run of slots in the heap's handle
//! stack and releases them when dropped. A [`Handle`] names one slot and
//! re-reads it on every [`Handle::get`], so it always yields the object's
//! current address even after a collection moved it.

use std::marker::PhantomData;

use core_types::TaggedValue;

use crate::heap::Heap;
use crate::object::HeapObject;

/// Types that can live in a handle slot.
pub trait HandleTarget: Copy {
    /// Converts a slot value back into the typed view.
    fn from_tagged(value: TaggedValue) -> Self;

    /// Converts the typed view into a slot value.
    fn to_tagged(self) -> TaggedValue;
}

impl HandleTarget for TaggedValue {
    fn from_tagged(value: TaggedValue) -> Self {
        value
    }

    fn to_tagged(self) -> TaggedValue {
        self
    }
}

impl HandleTarget for HeapObject {
    fn from_tagged(value: TaggedValue) -> Self {
        HeapObject::from_value(value)
            .unwrap_or_else(|| panic!("handle slot does not hold an object: {:#x}", value.raw()))
    }

    fn to_tagged(self) -> TaggedValue {
        self.to_value()
    }
}

/// Owner of a group of handle slots.
///
/// Scopes nest: handles may only be created in the innermost live scope.
pub struct HandleScope<'h> {
    heap: &'h Heap,
    base: usize,
    depth: usize,
}

impl<'h> HandleScope<'h> {
    /// Opens a scope on top of the heap's handle stack.
    pub fn new(heap: &'h Heap) -> Self {
        let depth = heap.handle_scope_depth.get() + 1;
        heap.handle_scope_depth.set(depth);
        HandleScope {
            heap,
            base: heap.handles.borrow().len(),
            depth,
        }
    }

    /// Returns the heap this scope belongs to.
    pub fn heap(&self) -> &'h Heap {
        self.heap
    }

    /// Roots `value` in a new slot of this scope.
    pub fn handle<T: HandleTarget>(&self, value: T) -> Handle<'_, T> {
        assert_eq!(
            self.depth,
            self.heap.handle_scope_depth.get(),
            "handles must be created in the innermost scope"
        );
        let mut slots = self.heap.handles.borrow_mut();
        slots.push(value.to_tagged());
        Handle {
            heap: self.heap,
            index: slots.len() - 1,
            _marker: PhantomData,
        }
    }

    /// Number of slots owned by this scope.
    pub fn len(&self) -> usize {
        self.heap.handles.borrow().len() - self.base
    }

    /// Whether this scope owns no slots.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for HandleScope<'_> {
    fn drop(&mut self) {
        self.heap.handles.borrow_mut().truncate(self.base);
        self.heap.handle_scope_depth.set(self.depth - 1);
    }
}

/// Typed reference to a handle slot. Cannot outlive its scope.
pub struct Handle<'s, T: HandleTarget> {
    heap: &'s Heap,
    index: usize,
    _marker: PhantomData<T>,
}

impl<T: HandleTarget> Clone for Handle<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: HandleTarget> Copy for Handle<'_, T> {}

impl<'s, T: HandleTarget> Handle<'s, T> {
    /// Returns the current value of the slot.
    pub fn get(&self) -> T {
        T::from_tagged(self.value())
    }

    /// Returns the raw slot value.
    pub fn value(&self) -> TaggedValue {
        self.heap.handles.borrow()[self.index]
    }

    /// Overwrites the slot.
    pub fn set(&self, value: T) {
        self.heap.handles.borrow_mut()[self.index] = value.to_tagged();
    }

    /// Returns the heap this handle roots into.
    pub fn heap(&self) -> &'s Heap {
        self.heap
    }
}

impl<T: HandleTarget + std::fmt::Debug> std::fmt::Debug for Handle<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Handle").field(&self.get()).finish()
    }
}
