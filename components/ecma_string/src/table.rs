//! Intern table.
//!
//! Entries are weak: an interned string nobody else references is dropped
//! by the next collection. Its entry is pruned by the first insert after
//! that collection, or by an explicit [`StringTable::sweep`].

use std::collections::HashMap;

use memory_manager::{Handle, Heap, NoGc, WeakRootId};
use tracing::trace;

use crate::hash;
use crate::string::EcmaString;

/// Canonical string instances keyed by hashcode.
#[derive(Debug, Default)]
pub struct StringTable {
    buckets: HashMap<u32, Vec<WeakRootId>>,
    /// Collection count at the last sweep
    swept_at: u64,
}

impl StringTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries whose string is still alive.
    pub fn len(&self, heap: &Heap) -> usize {
        self.buckets
            .values()
            .flatten()
            .filter(|&&id| heap.weak_root(id).is_some())
            .count()
    }

    /// Whether no live entries remain.
    pub fn is_empty(&self, heap: &Heap) -> bool {
        self.len(heap) == 0
    }

    /// Number of weak roots the table holds, dead entries included.
    pub fn id_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Releases every entry whose string was collected.
    pub fn sweep(&mut self, heap: &Heap) {
        let before = self.id_count();
        self.buckets.retain(|_, bucket| {
            prune(heap, bucket);
            !bucket.is_empty()
        });
        self.swept_at = heap.stats().collections;
        trace!(released = before - self.id_count(), "swept intern table");
    }

    fn lookup(
        &mut self,
        heap: &Heap,
        hash: u32,
        matches: impl Fn(EcmaString, &NoGc<'_>) -> bool,
    ) -> Option<EcmaString> {
        let bucket = self.buckets.get_mut(&hash)?;
        prune(heap, bucket);
        if bucket.is_empty() {
            self.buckets.remove(&hash);
            return None;
        }
        let no_gc = heap.no_gc();
        bucket.iter().find_map(|&id| {
            let value = heap.weak_root(id)?.get_weak_raw_value();
            EcmaString::cast(value).filter(|&string| matches(string, &no_gc))
        })
    }

    fn insert(&mut self, heap: &Heap, hash: u32, string: EcmaString) {
        if heap.stats().collections != self.swept_at {
            self.sweep(heap);
        }
        string.set_intern_string();
        let id = heap.add_weak_root(string.to_value().create_and_get_weak_ref());
        self.buckets.entry(hash).or_default().push(id);
    }

    /// Returns the interned string equal to `data`, creating it if needed.
    pub fn get_or_intern_utf8(&mut self, heap: &Heap, data: &[u8]) -> EcmaString {
        let hash = hash::compute_hashcode_utf8(data);
        if let Some(found) = self.lookup(heap, hash, |s, no_gc| {
            EcmaString::strings_are_equal_utf8(s, data, no_gc)
        }) {
            return found;
        }
        let string = EcmaString::create_from_utf8(heap, data, hash::can_be_compressed_utf8(data));
        self.insert(heap, hash, string);
        string
    }

    /// Returns the interned string equal to `data`, creating it if needed.
    pub fn get_or_intern_utf16(&mut self, heap: &Heap, data: &[u16]) -> EcmaString {
        let hash = hash::compute_hashcode_utf16(data);
        if let Some(found) = self.lookup(heap, hash, |s, no_gc| {
            EcmaString::strings_are_equal_utf16(s, data, no_gc)
        }) {
            return found;
        }
        let string =
            EcmaString::create_from_utf16(heap, data, hash::can_be_compressed_utf16(data));
        self.insert(heap, hash, string);
        string
    }

    /// Returns the canonical instance of `string`, adopting it if the table
    /// has none.
    pub fn get_or_intern_string(&mut self, string: Handle<'_, EcmaString>) -> EcmaString {
        let heap = string.heap();
        let candidate = string.get();
        if candidate.is_intern_string() {
            return candidate;
        }
        let hash = {
            let no_gc = heap.no_gc();
            candidate.get_hashcode(&no_gc)
        };
        if let Some(found) = self.lookup(heap, hash, |s, no_gc| {
            EcmaString::strings_are_equal(s, candidate, no_gc)
        }) {
            return found;
        }
        self.insert(heap, hash, candidate);
        candidate
    }
}

/// Drops cleared ids from `bucket` and gives their weak roots back.
fn prune(heap: &Heap, bucket: &mut Vec<WeakRootId>) {
    bucket.retain(|&id| {
        let alive = heap.weak_root(id).is_some();
        if !alive {
            heap.remove_weak_root(id);
        }
        alive
    });
}
