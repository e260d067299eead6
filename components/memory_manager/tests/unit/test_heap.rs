//! Unit tests for Heap allocation and collection

use core_types::{ObjectKind, TaggedValue};
use memory_manager::{GlobalConstant, HandleScope, Heap, HeapConfig, HeapObject};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn boxed(heap: &Heap, value: TaggedValue) -> HeapObject {
    let object = heap.allocate(ObjectKind::PrimitiveRef, 16);
    object.write_tagged(8, value);
    object
}

#[test]
fn test_linked_chain_survives_repeated_collections() {
    init_tracing();
    let heap = Heap::new(HeapConfig {
        semi_space_size: 512,
        max_heap_size: 64 * 1024,
        gc_stress: false,
    });
    let scope = HandleScope::new(&heap);
    let head = scope.handle(TaggedValue::UNDEFINED);
    for i in 0..100 {
        let node = heap.allocate(ObjectKind::Symbol, 16);
        node.write_tagged(8, head.get());
        head.set(node.to_value());
        boxed(&heap, TaggedValue::from_i32(i));
    }

    let mut length = 0;
    let mut cursor = head.get();
    while let Some(node) = HeapObject::from_value(cursor) {
        assert_eq!(node.kind(), ObjectKind::Symbol);
        length += 1;
        cursor = node.read_tagged(8);
    }
    assert_eq!(length, 100);
    assert!(heap.stats().collections > 0);
    assert_eq!(heap.stats().last_live_bytes % 16, 0);
}

#[test]
fn test_global_constant_is_a_root() {
    init_tracing();
    let heap = Heap::default();
    let object = boxed(&heap, TaggedValue::TRUE);
    heap.set_global_constant(GlobalConstant::EmptyString, object.to_value());
    heap.collect_garbage();
    let moved = HeapObject::from_value(heap.global_constant(GlobalConstant::EmptyString)).unwrap();
    assert_eq!(moved.read_tagged(8), TaggedValue::TRUE);
}

#[test]
fn test_allocation_under_no_gc_fits() {
    let heap = Heap::default();
    let _guard = heap.no_gc();
    let object = heap.allocate(ObjectKind::Object, 16);
    assert_eq!(object.kind(), ObjectKind::Object);
    assert_eq!(heap.stats().collections, 0);
}

#[test]
fn test_stress_config_skips_collection_under_no_gc() {
    let heap = Heap::new(HeapConfig::stress());
    let _guard = heap.no_gc();
    heap.allocate(ObjectKind::Object, 16);
    assert_eq!(heap.stats().collections, 0);
}
