//! Heap management with a semi-space copying collector.
//!
//! This module implements:
//! - [`Arena`]: bump-pointer allocation within one semi-space
//! - [`Heap`]: allocation, roots, statistics and the [`NoGc`] guard
//!
//! The copying itself lives in [`crate::gc`].

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::cell::{Cell, RefCell};
use std::ptr::{self, NonNull};

use core_types::{ObjectKind, TaggedObject, TaggedValue, VmError};
use tracing::{error, trace};

use crate::config::HeapConfig;
use crate::object::HeapObject;

/// Arena allocator for a semi-space.
///
/// Uses bump-pointer allocation. Memory is 8-byte aligned and zeroed when
/// the arena is created.
#[derive(Debug)]
pub struct Arena {
    /// Base pointer of the arena
    base: NonNull<u8>,
    /// Bytes handed out so far
    top: usize,
    /// Total capacity in bytes
    capacity: usize,
}

impl Arena {
    /// Creates a new arena with the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or memory allocation fails.
    pub fn new(capacity: usize) -> Self {
        let layout = Self::layout(capacity);
        // SAFETY: the layout has a non-zero size
        let base = unsafe { alloc_zeroed(layout) };
        let base = NonNull::new(base)
            .unwrap_or_else(|| panic!("Failed to allocate arena of size {}", capacity));
        Arena {
            base,
            top: 0,
            capacity,
        }
    }

    fn layout(capacity: usize) -> Layout {
        assert!(capacity > 0, "arena capacity must be non-zero");
        Layout::from_size_align(capacity, TaggedObject::ALIGNMENT)
            .unwrap_or_else(|_| panic!("Invalid arena layout of size {}", capacity))
    }

    /// Allocates `size` zeroed bytes, or `None` if the arena is full.
    ///
    /// `size` must already be aligned.
    pub fn allocate(&mut self, size: usize) -> Option<NonNull<u8>> {
        debug_assert_eq!(size % TaggedObject::ALIGNMENT, 0);
        let end = self.top.checked_add(size)?;
        if end > self.capacity {
            return None;
        }
        // SAFETY: [top, end) lies within the arena
        let ptr = unsafe {
            let ptr = self.base.as_ptr().add(self.top);
            ptr::write_bytes(ptr, 0, size);
            ptr
        };
        self.top = end;
        NonNull::new(ptr)
    }

    /// Returns the number of bytes currently allocated.
    pub fn used(&self) -> usize {
        self.top
    }

    /// Returns the total capacity of the arena.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of bytes still available.
    pub fn free(&self) -> usize {
        self.capacity - self.top
    }

    /// Resets the arena, effectively freeing all allocations.
    pub fn reset(&mut self) {
        self.top = 0;
    }

    /// Returns the address of the first byte.
    pub fn base_address(&self) -> usize {
        self.base.as_ptr() as usize
    }

    /// Whether `address` lies in the allocated part of the arena.
    pub fn contains(&self, address: usize) -> bool {
        let base = self.base_address();
        address >= base && address < base + self.top
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        // SAFETY: we're deallocating memory we allocated in new() with the
        // same layout
        unsafe { dealloc(self.base.as_ptr(), Self::layout(self.capacity)) }
    }
}

/// Collection statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GcStats {
    /// Number of collections performed
    pub collections: u64,
    /// Bytes handed out by `allocate` over the heap's lifetime
    pub bytes_allocated: u64,
    /// Bytes copied by all collections
    pub bytes_copied: u64,
    /// Live bytes after the most recent collection
    pub last_live_bytes: usize,
}

/// Heap-wide singletons that are always reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalConstant {
    /// The canonical zero-length string
    EmptyString,
}

impl GlobalConstant {
    pub(crate) const COUNT: usize = 1;
}

/// Identifies a strong global root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalRootId(usize);

/// Identifies a weak root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeakRootId(usize);

/// State of a weak root slot. Cleared slots stay reserved until removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WeakSlot {
    Free,
    Cleared,
    Live(TaggedValue),
}

pub(crate) struct Spaces {
    pub(crate) from: Arena,
    pub(crate) spare: Option<Arena>,
}

/// The garbage-collected heap.
///
/// All methods take `&self`: objects are reached through raw addresses and
/// the heap's own state lives in cells. The heap is neither `Send` nor
/// `Sync`.
///
/// # Examples
///
/// ```
/// use core_types::{ObjectKind, TaggedValue};
/// use memory_manager::{Heap, HeapConfig, HandleScope};
///
/// let heap = Heap::new(HeapConfig::default());
/// let scope = HandleScope::new(&heap);
/// let object = heap.allocate(ObjectKind::PrimitiveRef, 16);
/// object.write_tagged(8, TaggedValue::from_i32(7));
/// let handle = scope.handle(object);
///
/// heap.collect_garbage();
/// assert_eq!(handle.get().read_tagged(8), TaggedValue::from_i32(7));
/// ```
pub struct Heap {
    pub(crate) config: HeapConfig,
    pub(crate) spaces: RefCell<Spaces>,
    pub(crate) handles: RefCell<Vec<TaggedValue>>,
    pub(crate) handle_scope_depth: Cell<usize>,
    pub(crate) global_roots: RefCell<Vec<Option<TaggedValue>>>,
    pub(crate) weak_roots: RefCell<Vec<WeakSlot>>,
    free_weak_slots: RefCell<Vec<usize>>,
    pub(crate) constants: RefCell<[TaggedValue; GlobalConstant::COUNT]>,
    pub(crate) stats: Cell<GcStats>,
    no_gc_depth: Cell<usize>,
}

impl Heap {
    /// Creates a heap. The configuration must be valid.
    pub fn new(config: HeapConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid heap config: {:?}", config);
        let from = Arena::new(config.semi_space_size);
        Heap {
            config,
            spaces: RefCell::new(Spaces { from, spare: None }),
            handles: RefCell::new(Vec::new()),
            handle_scope_depth: Cell::new(0),
            global_roots: RefCell::new(Vec::new()),
            weak_roots: RefCell::new(Vec::new()),
            free_weak_slots: RefCell::new(Vec::new()),
            constants: RefCell::new([TaggedValue::HOLE; GlobalConstant::COUNT]),
            stats: Cell::new(GcStats::default()),
            no_gc_depth: Cell::new(0),
        }
    }

    /// Creates a heap from a JSON configuration document.
    pub fn from_json_config(json: &str) -> Result<Self, VmError> {
        Ok(Heap::new(HeapConfig::from_json(json)?))
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    /// Allocates a zeroed object of `size` bytes (header included).
    ///
    /// This is a collection point: every unrooted [`HeapObject`] becomes
    /// invalid. Exhausting the heap is fatal.
    pub fn allocate(&self, kind: ObjectKind, size: usize) -> HeapObject {
        match self.try_allocate(kind, size) {
            Ok(object) => object,
            Err(err) => {
                error!(%err, "fatal allocation failure");
                panic!("{}", err);
            }
        }
    }

    /// Allocates a zeroed object, reporting exhaustion as an error.
    pub fn try_allocate(&self, kind: ObjectKind, size: usize) -> Result<HeapObject, VmError> {
        let size = TaggedObject::align_size(size.max(TaggedObject::MIN_SIZE));
        if size > u32::MAX as usize {
            return Err(VmError::HeapExhausted {
                requested: size,
                limit: self.config.max_heap_size,
            });
        }

        if self.config.gc_stress && !self.is_gc_disallowed() {
            self.collect(size)?;
        }

        let ptr = match self.bump(size) {
            Some(ptr) => ptr,
            None => {
                trace!(size, "allocation does not fit, collecting");
                self.collect(size)?;
                self.bump(size).ok_or(VmError::HeapExhausted {
                    requested: size,
                    limit: self.config.max_heap_size,
                })?
            }
        };

        let object = HeapObject::from_raw_address(ptr.as_ptr() as usize);
        object.init_header(kind, size);
        let mut stats = self.stats.get();
        stats.bytes_allocated += size as u64;
        self.stats.set(stats);
        Ok(object)
    }

    fn bump(&self, size: usize) -> Option<NonNull<u8>> {
        self.spaces.borrow_mut().from.allocate(size)
    }

    /// Runs a full collection.
    pub fn collect_garbage(&self) {
        if let Err(err) = self.collect(0) {
            error!(%err, "fatal collection failure");
            panic!("{}", err);
        }
    }

    fn collect(&self, pending: usize) -> Result<(), VmError> {
        assert!(
            !self.is_gc_disallowed(),
            "garbage collection requested inside a no-GC scope"
        );
        crate::gc::collect(self, pending)
    }

    /// Opens a region in which collections are forbidden.
    ///
    /// Allocation is still allowed while the guard is alive, as long as it
    /// fits without collecting; otherwise it panics.
    pub fn no_gc(&self) -> NoGc<'_> {
        self.no_gc_depth.set(self.no_gc_depth.get() + 1);
        NoGc { heap: self }
    }

    /// Whether a [`NoGc`] guard is alive.
    pub fn is_gc_disallowed(&self) -> bool {
        self.no_gc_depth.get() > 0
    }

    /// Whether `value` refers to an object in the current space.
    pub fn contains(&self, value: TaggedValue) -> bool {
        value.is_heap_object()
            && self
                .spaces
                .borrow()
                .from
                .contains(value.get_heap_object().as_ptr() as usize)
    }

    /// Bytes allocated in the current space.
    pub fn used_bytes(&self) -> usize {
        self.spaces.borrow().from.used()
    }

    /// Capacity of the current space.
    pub fn capacity(&self) -> usize {
        self.spaces.borrow().from.capacity()
    }

    /// Returns the collection statistics.
    pub fn stats(&self) -> GcStats {
        self.stats.get()
    }

    /// Returns a global constant, `Hole` until it was set.
    pub fn global_constant(&self, constant: GlobalConstant) -> TaggedValue {
        self.constants.borrow()[constant as usize]
    }

    /// Installs a global constant.
    pub fn set_global_constant(&self, constant: GlobalConstant, value: TaggedValue) {
        self.constants.borrow_mut()[constant as usize] = value;
    }

    /// Registers a strong root that survives until removed.
    pub fn add_global_root(&self, value: TaggedValue) -> GlobalRootId {
        GlobalRootId(insert_slot(&mut self.global_roots.borrow_mut(), value))
    }

    /// Returns the current value of a global root.
    pub fn global_root(&self, id: GlobalRootId) -> TaggedValue {
        self.global_roots.borrow()[id.0]
            .unwrap_or_else(|| panic!("global root {} was removed", id.0))
    }

    /// Replaces the value of a global root.
    pub fn set_global_root(&self, id: GlobalRootId, value: TaggedValue) {
        self.global_roots.borrow_mut()[id.0] = Some(value);
    }

    /// Removes a global root.
    pub fn remove_global_root(&self, id: GlobalRootId) {
        self.global_roots.borrow_mut()[id.0] = None;
    }

    /// Registers a weak root. The collector clears it once the referent dies.
    ///
    /// A cleared root keeps its id until [`Heap::remove_weak_root`]; only
    /// removed ids are handed out again.
    pub fn add_weak_root(&self, value: TaggedValue) -> WeakRootId {
        let mut slots = self.weak_roots.borrow_mut();
        let index = match self.free_weak_slots.borrow_mut().pop() {
            Some(index) => {
                debug_assert!(slots[index] == WeakSlot::Free, "weak slot {} is in use", index);
                slots[index] = WeakSlot::Live(value);
                index
            }
            None => {
                slots.push(WeakSlot::Live(value));
                slots.len() - 1
            }
        };
        WeakRootId(index)
    }

    /// Returns the value of a weak root, `None` once it was cleared.
    pub fn weak_root(&self, id: WeakRootId) -> Option<TaggedValue> {
        match self.weak_roots.borrow().get(id.0) {
            Some(WeakSlot::Live(value)) => Some(*value),
            _ => None,
        }
    }

    /// Removes a weak root.
    pub fn remove_weak_root(&self, id: WeakRootId) {
        if let Some(slot) = self.weak_roots.borrow_mut().get_mut(id.0) {
            if *slot != WeakSlot::Free {
                *slot = WeakSlot::Free;
                self.free_weak_slots.borrow_mut().push(id.0);
            }
        }
    }

    /// Number of weak roots registered, cleared ones included.
    pub fn weak_root_count(&self) -> usize {
        self.weak_roots
            .borrow()
            .iter()
            .filter(|slot| **slot != WeakSlot::Free)
            .count()
    }

    /// Number of live handle slots.
    pub fn handle_count(&self) -> usize {
        self.handles.borrow().len()
    }
}

fn insert_slot(slots: &mut Vec<Option<TaggedValue>>, value: TaggedValue) -> usize {
    if let Some(index) = slots.iter().position(Option::is_none) {
        slots[index] = Some(value);
        index
    } else {
        slots.push(Some(value));
        slots.len() - 1
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new(HeapConfig::default())
    }
}

/// Forbids collections while alive.
///
/// Payload slices borrowed from heap objects are tied to this guard.
pub struct NoGc<'h> {
    heap: &'h Heap,
}

impl Drop for NoGc<'_> {
    fn drop(&mut self) {
        self.heap.no_gc_depth.set(self.heap.no_gc_depth.get() - 1);
    }
}
