//! Memory Manager - Garbage collector and heap management
//!
//! This component provides:
//! - Semi-space copying garbage collection (Cheney's algorithm)
//! - Bump-pointer heap allocation with configurable sizing
//! - Handle scopes that keep objects alive and track their moves
//! - Global, weak and constant roots
//! - Checked object views that keep `unsafe` inside this crate

pub mod config;
pub mod gc;
pub mod handles;
pub mod heap;
pub mod object;

// Re-export main types
pub use config::HeapConfig;
pub use handles::{Handle, HandleScope, HandleTarget};
pub use heap::{Arena, GcStats, GlobalConstant, GlobalRootId, Heap, NoGc, WeakRootId};
pub use object::HeapObject;
