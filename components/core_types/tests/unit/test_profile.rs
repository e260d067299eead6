//! Unit tests for comparison feedback

use core_types::{CompareIcSlot, CompareOpType, IcState, OperandKind};

#[test]
fn test_pairs_table_matches_discriminants() {
    for (index, op) in CompareOpType::PAIRS.iter().enumerate() {
        assert_eq!(*op as usize, index);
    }
    assert_eq!(CompareOpType::Other as usize, 36);
}

#[test]
fn test_hint_after_mixed_feedback() {
    let mut slot = CompareIcSlot::new();
    slot.record(OperandKind::Obj, OperandKind::Boolean);
    assert_eq!(slot.hint(), CompareOpType::ObjBoolean);
    slot.record(OperandKind::Boolean, OperandKind::Obj);
    assert_eq!(slot.state(), IcState::Polymorphic);
    assert_eq!(slot.hint(), CompareOpType::Other);
}
