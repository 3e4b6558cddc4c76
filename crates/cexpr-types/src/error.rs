//! Constant-expression error types.

use std::fmt;
use thiserror::Error;
use wasmparser::BinaryReaderError;

use crate::ty::StackType;

/// Which index space an out-of-range index was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSpace {
    Global,
    Function,
}

impl fmt::Display for IndexSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexSpace::Global => f.write_str("global"),
            IndexSpace::Function => f.write_str("function"),
        }
    }
}

/// What the host failed to allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationKind {
    Struct,
    Array,
}

impl fmt::Display for AllocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationKind::Struct => f.write_str("struct"),
            AllocationKind::Array => f.write_str("array"),
        }
    }
}

/// Errors raised while validating or evaluating a constant expression.
///
/// Every variant records the absolute byte offset it was raised at. All of
/// them are terminal for the expression being processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstExprError {
    /// The opcode is legal in a function body but not in a constant expression.
    #[error("at byte {offset}: invalid instruction for constant expression")]
    InvalidConstantExpression { offset: usize },

    #[error("at byte {offset}: {space} index {index} exceeds the number of {space}s {count}")]
    IndexOutOfRange {
        offset: usize,
        space: IndexSpace,
        index: u32,
        count: usize,
    },

    #[error("at byte {offset}: global {index} is mutable and cannot be read by a constant expression")]
    MutableGlobalNotAllowed { offset: usize, index: u32 },

    /// The host ran out of memory creating a struct or array.
    #[error("at byte {offset}: failed to allocate new {kind}")]
    AllocatorFailure { offset: usize, kind: AllocationKind },

    #[error("at byte {offset}: type index {index} is not a valid {expected} type")]
    InvalidTypeIndex {
        offset: usize,
        index: u32,
        expected: &'static str,
    },

    #[error("at byte {offset}: type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        offset: usize,
        expected: StackType,
        found: StackType,
    },

    #[error("at byte {offset}: expected {expected} value(s) on the stack, found {found}")]
    StackHeight {
        offset: usize,
        expected: usize,
        found: usize,
    },

    /// The byte stream could not be decoded.
    #[error("at byte {offset}: {message}")]
    Malformed { offset: usize, message: String },
}

impl ConstExprError {
    pub fn offset(&self) -> usize {
        match *self {
            ConstExprError::InvalidConstantExpression { offset }
            | ConstExprError::IndexOutOfRange { offset, .. }
            | ConstExprError::MutableGlobalNotAllowed { offset, .. }
            | ConstExprError::AllocatorFailure { offset, .. }
            | ConstExprError::InvalidTypeIndex { offset, .. }
            | ConstExprError::TypeMismatch { offset, .. }
            | ConstExprError::StackHeight { offset, .. }
            | ConstExprError::Malformed { offset, .. } => offset,
        }
    }
}

impl From<BinaryReaderError> for ConstExprError {
    fn from(err: BinaryReaderError) -> Self {
        ConstExprError::Malformed {
            offset: err.offset(),
            message: err.message().to_string(),
        }
    }
}

/// Result alias used across the constant-expression crates.
pub type ConstExprResult<T> = Result<T, ConstExprError>;
