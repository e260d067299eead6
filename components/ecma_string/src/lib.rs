//! String objects for the JavaScript runtime.
//!
//! A string is stored once, in the narrowest encoding that can hold it:
//! one byte per code unit when every unit is in `0x01..=0x7F`, UTF-16
//! otherwise. This crate provides:
//! - [`EcmaString`] - checked view of a string object and its accessors
//! - Factories, concatenation and substrings (allocating, handle-based)
//! - Equality, ordering and substring search across both encodings
//! - Case conversion through a [`LocaleService`] and whitespace trimming
//! - UTF-8 / UTF-16 conversion helpers and the string hash
//! - [`StringTable`] for interning
//!
//! # Examples
//!
//! ```
//! use ecma_string::EcmaString;
//! use memory_manager::{HandleScope, Heap};
//!
//! let heap = Heap::default();
//! let scope = HandleScope::new(&heap);
//! let hello = scope.handle(EcmaString::create_from_str(&heap, "Hello "));
//! let world = scope.handle(EcmaString::create_from_str(&heap, "World!"));
//! let joined = scope.handle(EcmaString::concat(hello, world));
//! let tail = EcmaString::fast_sub_string(joined, 6, 6);
//!
//! let no_gc = heap.no_gc();
//! assert_eq!(tail.to_std_string(&no_gc), "World!");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod compare;
mod factory;
pub mod hash;
pub mod locale;
mod search;
mod string;
mod table;
mod transform;
pub mod utf;

pub use locale::{locale_for_tag, LocaleService, RootLocale, TurkicLocale};
pub use string::{CodeUnits, EcmaString};
pub use table::StringTable;
pub use transform::{is_white_space_or_line_terminator, TrimMode};
pub use utf::unicode_from_utf8;
