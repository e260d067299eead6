//! Per-mutator runtime state.

use std::cell::{RefCell, RefMut};

use core_types::{JsError, TaggedValue, VmError};
use ecma_string::{EcmaString, LocaleService, RootLocale, StringTable};
use memory_manager::{Heap, HeapConfig};
use tracing::trace;

/// The state one mutator thread works against: its heap, intern table,
/// case mapping service and pending exception.
///
/// # Examples
///
/// ```
/// use core_types::JsError;
/// use ic_runtime::JsThread;
///
/// let thread = JsThread::default();
/// let result = thread.throw(JsError::type_error("boom"));
/// assert!(result.is_exception());
/// assert!(thread.has_pending_exception());
/// assert_eq!(thread.take_pending_exception().unwrap().message, "boom");
/// ```
pub struct JsThread {
    heap: Heap,
    string_table: RefCell<StringTable>,
    locale: Box<dyn LocaleService>,
    pending_exception: RefCell<Option<JsError>>,
}

impl JsThread {
    /// Creates a thread with a fresh heap.
    pub fn new(config: HeapConfig) -> Self {
        JsThread {
            heap: Heap::new(config),
            string_table: RefCell::new(StringTable::new()),
            locale: Box::new(RootLocale),
            pending_exception: RefCell::new(None),
        }
    }

    /// Creates a thread from a JSON heap configuration.
    pub fn from_json_config(json: &str) -> Result<Self, VmError> {
        Ok(Self::new(HeapConfig::from_json(json)?))
    }

    /// Returns the heap.
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Borrows the intern table.
    pub fn string_table(&self) -> RefMut<'_, StringTable> {
        self.string_table.borrow_mut()
    }

    /// Returns the interned string for `text`.
    pub fn intern(&self, text: &str) -> EcmaString {
        self.string_table().get_or_intern_utf8(&self.heap, text.as_bytes())
    }

    /// Returns the case mapping service.
    pub fn locale(&self) -> &dyn LocaleService {
        self.locale.as_ref()
    }

    /// Replaces the case mapping service.
    pub fn set_locale(&mut self, locale: Box<dyn LocaleService>) {
        self.locale = locale;
    }

    /// Records `error` as pending and returns the exception marker.
    pub fn throw(&self, error: JsError) -> TaggedValue {
        trace!(%error, "exception raised");
        *self.pending_exception.borrow_mut() = Some(error);
        TaggedValue::EXCEPTION
    }

    /// Whether an exception is pending.
    pub fn has_pending_exception(&self) -> bool {
        self.pending_exception.borrow().is_some()
    }

    /// Returns a copy of the pending exception.
    pub fn pending_exception(&self) -> Option<JsError> {
        self.pending_exception.borrow().clone()
    }

    /// Removes and returns the pending exception.
    pub fn take_pending_exception(&self) -> Option<JsError> {
        self.pending_exception.borrow_mut().take()
    }

    /// Drops the pending exception.
    pub fn clear_pending_exception(&self) {
        self.pending_exception.borrow_mut().take();
    }
}

impl Default for JsThread {
    fn default() -> Self {
        Self::new(HeapConfig::default())
    }
}
