//! Integration test suite for the Corten value runtime
//!
//! These tests drive tagged values, the heap, strings and the comparison
//! runtime together across crate boundaries.

/// Re-export components for test convenience
pub mod components {
    pub use core_types;
    pub use ecma_string;
    pub use ic_runtime;
    pub use memory_manager;
}
