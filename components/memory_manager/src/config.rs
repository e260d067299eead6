//! Heap configuration.

use core_types::VmError;
use serde::{Deserialize, Serialize};

/// Sizing and debugging knobs for a [`Heap`](crate::Heap).
///
/// # Examples
///
/// ```
/// use memory_manager::HeapConfig;
///
/// let config = HeapConfig::from_json(r#"{ "gc_stress": true }"#).unwrap();
/// assert!(config.gc_stress);
/// assert_eq!(config.semi_space_size, HeapConfig::default().semi_space_size);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeapConfig {
    /// Capacity of each semi-space in bytes
    pub semi_space_size: usize,
    /// Live bytes above which allocation fails fatally
    pub max_heap_size: usize,
    /// Collect on every allocation
    pub gc_stress: bool,
}

impl Default for HeapConfig {
    fn default() -> Self {
        HeapConfig {
            semi_space_size: 256 * 1024,    // 256KB per semi-space
            max_heap_size: 64 * 1024 * 1024, // 64MB live data
            gc_stress: false,
        }
    }
}

impl HeapConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, VmError> {
        let config: HeapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the sizes are usable.
    pub fn validate(&self) -> Result<(), VmError> {
        if self.semi_space_size == 0 {
            return Err(VmError::InvalidConfig(
                "semi_space_size must be non-zero".to_string(),
            ));
        }
        if self.semi_space_size % 8 != 0 || self.max_heap_size % 8 != 0 {
            return Err(VmError::InvalidConfig(
                "heap sizes must be multiples of 8 bytes".to_string(),
            ));
        }
        if self.max_heap_size < self.semi_space_size {
            return Err(VmError::InvalidConfig(format!(
                "max_heap_size ({}) is smaller than semi_space_size ({})",
                self.max_heap_size, self.semi_space_size
            )));
        }
        Ok(())
    }

    /// Default sizes with `gc_stress` enabled.
    pub fn stress() -> Self {
        HeapConfig {
            gc_stress: true,
            ..HeapConfig::default()
        }
    }
}
