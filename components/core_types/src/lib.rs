//! Core value representation, object header and error types.
//!
//! This crate provides the foundational types of the runtime: the one-word
//! NaN-boxed value, the header shared by heap objects, comparison feedback,
//! and error types.
//!
//! # Overview
//!
//! - [`TaggedValue`] - NaN-boxed representation of every JavaScript value
//! - [`ValueKind`] - Checked enum view of a tagged value
//! - [`ObjectKind`] / [`ObjectHeader`] - Common heap object header
//! - [`CompareOpType`] / [`CompareIcSlot`] - Operand-kind feedback for comparisons
//! - [`JsError`] - JavaScript errors
//! - [`VmError`] - Host-level failures
//!
//! # Examples
//!
//! ```
//! use core_types::{JsError, ErrorKind, TaggedValue};
//!
//! let num = TaggedValue::from_i32(42);
//! assert!(num.is_number());
//! assert_eq!(num.get_number(), 42.0);
//!
//! let error = JsError::type_error("Cannot convert a Symbol value to a number");
//! assert_eq!(error.kind, ErrorKind::TypeError);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod object;
mod profile;
pub mod value;

pub use error::{ErrorKind, JsError, JsResult, VmError};
pub use object::{ObjectHeader, ObjectKind, TaggedObject};
pub use profile::{CompareIcSlot, CompareOpType, IcState, OperandKind};
pub use value::{TaggedValue, ValueKind};
