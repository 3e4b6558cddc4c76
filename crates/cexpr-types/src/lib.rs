//! Shared types for constant-expression validation and evaluation.
//!
//! This crate defines the value model, the reference bit layout, the module
//! view an expression is checked against, and the error taxonomy used by
//! `cexpr-eval`.

mod error;
pub mod module_info;
pub mod reference;
pub mod ty;
pub mod value;

pub use error::{AllocationKind, ConstExprError, ConstExprResult, IndexSpace};
pub use module_info::{CompositeType, FieldType, GlobalDesc, ModuleInfo, Mutability, StorageType};
pub use reference::ObjectRef;
pub use ty::StackType;
pub use value::{ConstExprValue, ValueKind};

pub use wasmparser::ValType;
