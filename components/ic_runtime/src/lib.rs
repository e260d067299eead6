//! Comparison runtime for the JavaScript engine.
//!
//! Two layers answer `==`, `!=`, `<`, `<=`, `>` and `>=`:
//! - [`SlowRuntime`] implements the generic algorithms for every pair of
//!   values, including conversions that allocate or throw
//! - [`CompareOp`] takes an operand-kind hint from an inline cache, checks
//!   it against the actual operands and runs a specialised path when it
//!   holds
//!
//! Both layers produce identical results. Errors are reported through the
//! thread's pending exception and the [`TaggedValue::EXCEPTION`] marker.
//!
//! # Examples
//!
//! ```
//! use core_types::{CompareOpType, TaggedValue};
//! use ic_runtime::{CompareOp, JsThread};
//!
//! let thread = JsThread::default();
//! let one = TaggedValue::from_i32(1);
//! let half = TaggedValue::from_f64(0.5);
//! let result = CompareOp::greater_with_ic(&thread, one, half, CompareOpType::NumberNumber);
//! assert!(result.is_true());
//! ```
//!
//! [`TaggedValue::EXCEPTION`]: core_types::TaggedValue::EXCEPTION

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod compare_op;
mod conversions;
mod primitive;
mod slow_runtime;
mod thread;

pub use compare_op::{operand_kind, CompareOp};
pub use conversions::{
    primitive_to_number, string_to_double, to_number, to_primitive, type_of, JsType, PreferredType,
};
pub use primitive::{JsObject, PrimitiveRef, Symbol};
pub use slow_runtime::{strict_equal, SlowRuntime};
pub use thread::JsThread;
