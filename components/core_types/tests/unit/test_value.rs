//! Unit tests for TaggedValue

use core_types::value::encoding::{TAG_INT, VALUE_HOLE};
use core_types::{TaggedObject, TaggedValue, ValueKind};
use std::ptr::NonNull;

fn object_at(address: usize) -> NonNull<TaggedObject> {
    NonNull::new(address as *mut TaggedObject).unwrap()
}

fn samples() -> Vec<TaggedValue> {
    vec![
        TaggedValue::from_i32(0),
        TaggedValue::from_i32(-7),
        TaggedValue::from_f64(0.25),
        TaggedValue::from_f64(f64::NAN),
        TaggedValue::from_f64(-0.0),
        TaggedValue::TRUE,
        TaggedValue::FALSE,
        TaggedValue::UNDEFINED,
        TaggedValue::NULL,
        TaggedValue::HOLE,
        TaggedValue::EXCEPTION,
        TaggedValue::OPTIMIZED_OUT,
        TaggedValue::from_object(object_at(0x7f00_0000_1000)),
        TaggedValue::from_object(object_at(0x1000)).create_and_get_weak_ref(),
    ]
}

#[cfg(test)]
mod classification_tests {
    use super::*;

    #[test]
    fn test_classes_are_mutually_exclusive() {
        for value in samples() {
            let classes = [
                value.is_int(),
                value.is_double(),
                value.is_heap_object(),
                value.is_special(),
            ];
            let count = classes.iter().filter(|c| **c).count();
            assert_eq!(count, 1, "{:?} is in {} classes", value, count);
        }
    }

    #[test]
    fn test_zero_word_reads_as_hole() {
        let zero = TaggedValue::from_raw(0);
        assert!(zero.is_hole());
        assert_eq!(TaggedValue::default().raw(), VALUE_HOLE);
    }

    #[test]
    fn test_number_predicates() {
        assert!(TaggedValue::from_i32(1).is_number());
        assert!(TaggedValue::from_f64(1.5).is_number());
        assert!(!TaggedValue::TRUE.is_number());
        assert!(!TaggedValue::UNDEFINED.is_number());
    }

    #[test]
    fn test_int_tag() {
        assert_eq!(TaggedValue::from_i32(0).raw(), TAG_INT);
    }

    #[test]
    fn test_invalid_value_limit() {
        assert!(TaggedValue::UNDEFINED.is_invalid_value());
        assert!(!TaggedValue::from_object(object_at(0x7f00_0000_1000)).is_invalid_value());
    }
}

#[cfg(test)]
mod conversion_tests {
    use super::*;

    #[test]
    fn test_from_conversions() {
        assert_eq!(TaggedValue::from(5i32), TaggedValue::from_i32(5));
        assert_eq!(TaggedValue::from(true), TaggedValue::TRUE);
        assert!(TaggedValue::from(3_000_000_000u32).is_double());
        assert!(TaggedValue::from(i64::MIN).is_double());
        assert!(TaggedValue::from(2.5f64).is_double());
    }

    #[test]
    fn test_get_number_for_both_encodings() {
        assert_eq!(TaggedValue::from_i32(-3).get_number(), -3.0);
        assert_eq!(TaggedValue::from_f64(-3.5).get_number(), -3.5);
    }

    #[test]
    fn test_kind_of_weak_ref() {
        let object = object_at(0x4000);
        let weak = TaggedValue::from_object(object).create_and_get_weak_ref();
        assert_eq!(weak.kind(), ValueKind::WeakRef(object));
        assert_eq!(weak.get_raw_heap_object().as_ptr() as usize, 0x4001);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", TaggedValue::from_i32(3)), "Int(3)");
        assert_eq!(format!("{:?}", TaggedValue::UNDEFINED), "Undefined");
        assert_eq!(format!("{:?}", TaggedValue::TRUE), "Boolean(true)");
    }
}
