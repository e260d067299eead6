//! Operand-type feedback for comparison sites.
//!
//! This module is placed in core_types so both the interpreter side that
//! records feedback and the runtime that consumes the resulting hint can
//! depend on it without a cycle.

/// Coarse operand kind observed at a comparison site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OperandKind {
    /// Int or double
    Number = 0,
    /// String object
    String = 1,
    /// `true` or `false`
    Boolean = 2,
    /// Any other heap object (wrappers, symbols, ordinary objects)
    Obj = 3,
    /// `null`
    Null = 4,
    /// `undefined`
    Undefined = 5,
}

impl OperandKind {
    /// All kinds, in discriminant order.
    pub const ALL: [OperandKind; 6] = [
        OperandKind::Number,
        OperandKind::String,
        OperandKind::Boolean,
        OperandKind::Obj,
        OperandKind::Null,
        OperandKind::Undefined,
    ];
}

/// Operand-kind pair hint supplied by an inline cache.
///
/// The hint is never trusted: consumers verify the operands before taking
/// a specialised path. The discriminant of a pair variant is
/// `lhs * 6 + rhs` over [`OperandKind`] discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum CompareOpType {
    NumberNumber = 0,
    NumberString,
    NumberBoolean,
    NumberObj,
    NumberNull,
    NumberUndefined,
    StringNumber,
    StringString,
    StringBoolean,
    StringObj,
    StringNull,
    StringUndefined,
    BooleanNumber,
    BooleanString,
    BooleanBoolean,
    BooleanObj,
    BooleanNull,
    BooleanUndefined,
    ObjNumber,
    ObjString,
    ObjBoolean,
    ObjObj,
    ObjNull,
    ObjUndefined,
    NullNumber,
    NullString,
    NullBoolean,
    NullObj,
    NullNull,
    NullUndefined,
    UndefinedNumber,
    UndefinedString,
    UndefinedBoolean,
    UndefinedObj,
    UndefinedNull,
    UndefinedUndefined,
    /// No usable feedback
    Other,
}

impl CompareOpType {
    /// Every pair variant, indexed by discriminant.
    pub const PAIRS: [CompareOpType; 36] = [
        CompareOpType::NumberNumber,
        CompareOpType::NumberString,
        CompareOpType::NumberBoolean,
        CompareOpType::NumberObj,
        CompareOpType::NumberNull,
        CompareOpType::NumberUndefined,
        CompareOpType::StringNumber,
        CompareOpType::StringString,
        CompareOpType::StringBoolean,
        CompareOpType::StringObj,
        CompareOpType::StringNull,
        CompareOpType::StringUndefined,
        CompareOpType::BooleanNumber,
        CompareOpType::BooleanString,
        CompareOpType::BooleanBoolean,
        CompareOpType::BooleanObj,
        CompareOpType::BooleanNull,
        CompareOpType::BooleanUndefined,
        CompareOpType::ObjNumber,
        CompareOpType::ObjString,
        CompareOpType::ObjBoolean,
        CompareOpType::ObjObj,
        CompareOpType::ObjNull,
        CompareOpType::ObjUndefined,
        CompareOpType::NullNumber,
        CompareOpType::NullString,
        CompareOpType::NullBoolean,
        CompareOpType::NullObj,
        CompareOpType::NullNull,
        CompareOpType::NullUndefined,
        CompareOpType::UndefinedNumber,
        CompareOpType::UndefinedString,
        CompareOpType::UndefinedBoolean,
        CompareOpType::UndefinedObj,
        CompareOpType::UndefinedNull,
        CompareOpType::UndefinedUndefined,
    ];

    /// Returns the pair variant for the given operand kinds.
    pub fn from_kinds(lhs: OperandKind, rhs: OperandKind) -> Self {
        Self::PAIRS[lhs as usize * 6 + rhs as usize]
    }

    /// Returns the operand kinds of a pair variant, `None` for `Other`.
    pub fn kinds(self) -> Option<(OperandKind, OperandKind)> {
        if self == CompareOpType::Other {
            return None;
        }
        let index = self as usize;
        Some((OperandKind::ALL[index / 6], OperandKind::ALL[index % 6]))
    }
}

/// State of a comparison IC slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcState {
    /// Nothing recorded yet
    Uninitialized,
    /// Every observation had the same operand kinds
    Monomorphic(CompareOpType),
    /// Observations disagreed
    Polymorphic,
}

/// Per-site feedback recorder for a comparison.
///
/// # Examples
///
/// ```
/// use core_types::{CompareIcSlot, CompareOpType, OperandKind};
///
/// let mut slot = CompareIcSlot::new();
/// slot.record(OperandKind::Number, OperandKind::Number);
/// assert_eq!(slot.hint(), CompareOpType::NumberNumber);
///
/// slot.record(OperandKind::String, OperandKind::Number);
/// assert_eq!(slot.hint(), CompareOpType::Other);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareIcSlot {
    state: IcState,
    /// Number of observations recorded
    pub execution_count: u64,
}

impl CompareIcSlot {
    /// Creates an uninitialized slot.
    pub fn new() -> Self {
        Self {
            state: IcState::Uninitialized,
            execution_count: 0,
        }
    }

    /// Records one pair of operand kinds.
    pub fn record(&mut self, lhs: OperandKind, rhs: OperandKind) {
        self.execution_count += 1;
        let observed = CompareOpType::from_kinds(lhs, rhs);
        self.state = match self.state {
            IcState::Uninitialized => IcState::Monomorphic(observed),
            IcState::Monomorphic(seen) if seen == observed => IcState::Monomorphic(seen),
            IcState::Monomorphic(_) | IcState::Polymorphic => IcState::Polymorphic,
        };
    }

    /// Returns the current state.
    pub fn state(&self) -> IcState {
        self.state
    }

    /// Returns the hint to pass to the comparison entry points.
    pub fn hint(&self) -> CompareOpType {
        match self.state {
            IcState::Monomorphic(op) => op,
            IcState::Uninitialized | IcState::Polymorphic => CompareOpType::Other,
        }
    }

    /// Clear all collected feedback
    pub fn clear(&mut self) {
        self.state = IcState::Uninitialized;
        self.execution_count = 0;
    }
}

impl Default for CompareIcSlot {
    fn default() -> Self {
        Self::new()
    }
}
