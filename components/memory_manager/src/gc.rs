//! Semi-space copying garbage collector.
//!
//! This module implements Cheney's algorithm:
//! - Allocation bumps a pointer in the current space
//! - A collection copies every object reachable from the roots into a
//!   fresh to-space, leaving a forwarding address behind
//! - Copied objects are scanned breadth-first for further references
//! - Weak roots are updated or cleared, then the spaces are swapped

use std::ptr;
use std::time::Instant;

use core_types::{TaggedObject, TaggedValue, VmError};
use tracing::{debug, warn};

use crate::heap::{Arena, Heap, WeakSlot};
use crate::object::HeapObject;

/// Copies live objects out of `from` into `to`.
struct Copier<'a> {
    from: &'a Arena,
    to: &'a mut Arena,
    bytes_copied: usize,
    survivors: usize,
}

impl Copier<'_> {
    /// Returns the post-collection form of a slot value.
    fn evacuate(&mut self, value: TaggedValue) -> TaggedValue {
        if !value.is_heap_object() {
            return value;
        }
        let object = HeapObject::from_raw_address(value.get_heap_object().as_ptr() as usize);
        if !self.from.contains(object.address()) {
            return value;
        }
        let target = match object.forwarding_address() {
            Some(target) => target,
            None => self.copy_object(object),
        };
        retag(target, value.is_weak())
    }

    fn copy_object(&mut self, object: HeapObject) -> HeapObject {
        let size = object.size();
        let dest = self
            .to
            .allocate(size)
            .unwrap_or_else(|| panic!("to-space overflow while copying {} bytes", size));

        // SAFETY: both ranges are `size` bytes inside two distinct arenas
        unsafe {
            ptr::copy_nonoverlapping(object.address() as *const u8, dest.as_ptr(), size);
        }

        let copy = HeapObject::from_raw_address(dest.as_ptr() as usize);
        object.set_forwarding_address(copy);
        self.bytes_copied += size;
        self.survivors += 1;
        copy
    }

    /// Scans copied objects until the scan pointer catches up.
    fn scan(&mut self) {
        let mut offset = 0;
        while offset < self.to.used() {
            let object = HeapObject::from_raw_address(self.to.base_address() + offset);
            for &field in object.kind().tagged_field_offsets() {
                let value = object.read_tagged(field);
                object.write_tagged(field, self.evacuate(value));
            }
            offset += object.size();
        }
    }

    /// Returns the updated weak slot, or `None` if the referent died.
    fn update_weak(&self, value: TaggedValue) -> Option<TaggedValue> {
        if !value.is_heap_object() {
            return Some(value);
        }
        let object = HeapObject::from_raw_address(value.get_heap_object().as_ptr() as usize);
        if !self.from.contains(object.address()) {
            return Some(value);
        }
        object
            .forwarding_address()
            .map(|target| retag(target, value.is_weak()))
    }
}

fn retag(object: HeapObject, weak: bool) -> TaggedValue {
    let value = object.to_value();
    if weak {
        value.create_and_get_weak_ref()
    } else {
        value
    }
}

/// Runs a collection that leaves room for `pending` more bytes.
pub(crate) fn collect(heap: &Heap, pending: usize) -> Result<(), VmError> {
    let start = Instant::now();
    let mut spaces = heap.spaces.borrow_mut();
    let used_before = spaces.from.used();
    let capacity = TaggedObject::align_size(heap.config.semi_space_size.max(used_before + pending));

    let mut to = match spaces.spare.take() {
        Some(mut arena) if arena.capacity() == capacity => {
            arena.reset();
            arena
        }
        _ => Arena::new(capacity),
    };

    let (bytes_copied, survivors) = {
        let mut copier = Copier {
            from: &spaces.from,
            to: &mut to,
            bytes_copied: 0,
            survivors: 0,
        };

        for slot in heap.handles.borrow_mut().iter_mut() {
            *slot = copier.evacuate(*slot);
        }
        for slot in heap.global_roots.borrow_mut().iter_mut().flatten() {
            *slot = copier.evacuate(*slot);
        }
        for slot in heap.constants.borrow_mut().iter_mut() {
            *slot = copier.evacuate(*slot);
        }
        copier.scan();

        for slot in heap.weak_roots.borrow_mut().iter_mut() {
            if let WeakSlot::Live(value) = *slot {
                *slot = match copier.update_weak(value) {
                    Some(value) => WeakSlot::Live(value),
                    None => WeakSlot::Cleared,
                };
            }
        }
        (copier.bytes_copied, copier.survivors)
    };

    let live = to.used();
    let old = std::mem::replace(&mut spaces.from, to);
    spaces.spare = Some(old);
    drop(spaces);

    let mut stats = heap.stats.get();
    stats.collections += 1;
    stats.bytes_copied += bytes_copied as u64;
    stats.last_live_bytes = live;
    heap.stats.set(stats);

    debug!(
        collection = stats.collections,
        before = used_before,
        after = live,
        survivors,
        elapsed_us = start.elapsed().as_micros() as u64,
        "garbage collection finished"
    );
    if capacity > heap.config.semi_space_size {
        warn!(
            capacity,
            configured = heap.config.semi_space_size,
            "semi-space grew past its configured size"
        );
    }

    if live + pending > heap.config.max_heap_size {
        return Err(VmError::HeapExhausted {
            requested: live + pending,
            limit: heap.config.max_heap_size,
        });
    }
    Ok(())
}
