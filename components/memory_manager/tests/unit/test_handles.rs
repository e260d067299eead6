//! Unit tests for handle scopes

use core_types::{ObjectKind, TaggedValue};
use memory_manager::{HandleScope, Heap, HeapConfig, HeapObject};

#[test]
fn test_nested_scopes_under_stress() {
    let heap = Heap::new(HeapConfig::stress());
    let outer = HandleScope::new(&heap);
    let keep = outer.handle(heap.allocate(ObjectKind::Object, 32));
    {
        let inner = HandleScope::new(&heap);
        let temp = inner.handle(heap.allocate(ObjectKind::Object, 48));
        assert_eq!(temp.get().size(), 48);
        assert_eq!(keep.get().size(), 32);
    }
    heap.collect_garbage();
    assert_eq!(heap.used_bytes(), 32);
    assert_eq!(keep.get().kind(), ObjectKind::Object);
}

#[test]
fn test_value_handle_tracks_object() {
    let heap = Heap::default();
    let scope = HandleScope::new(&heap);
    let object = heap.allocate(ObjectKind::Object, 16);
    let handle = scope.handle(object.to_value());
    heap.collect_garbage();
    let moved = HeapObject::from_value(handle.get()).unwrap();
    assert!(heap.contains(moved.to_value()));
    assert!(scope.len() == 1 && !scope.is_empty());
}

#[test]
fn test_weak_handle_value_is_not_a_strong_root() {
    let heap = Heap::default();
    let scope = HandleScope::new(&heap);
    let object = heap.allocate(ObjectKind::Object, 16);
    let weak = heap.add_weak_root(object.to_value().create_and_get_weak_ref());
    let _unrelated = scope.handle(TaggedValue::from_i32(0));
    heap.collect_garbage();
    assert_eq!(heap.weak_root(weak), None);
}
