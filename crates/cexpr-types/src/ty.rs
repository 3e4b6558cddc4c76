//! Operand types tracked on the decoder's stack.

use serde::{Deserialize, Serialize};
use std::fmt;
use wasmparser::ValType;

use crate::module_info::StorageType;

/// The coarse type of a stack operand.
///
/// All reference types collapse into [`StackType::Ref`]; subtyping between
/// heap types is left to full module validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackType {
    I32,
    I64,
    F32,
    F64,
    V128,
    Ref,
}

impl StackType {
    pub fn of(ty: ValType) -> Self {
        match ty {
            ValType::I32 => StackType::I32,
            ValType::I64 => StackType::I64,
            ValType::F32 => StackType::F32,
            ValType::F64 => StackType::F64,
            ValType::V128 => StackType::V128,
            ValType::Ref(_) => StackType::Ref,
        }
    }

    /// Packed storage (`i8`, `i16`) is read and written as `i32`.
    pub fn of_storage(storage: StorageType) -> Self {
        Self::of(storage.unpacked())
    }
}

impl fmt::Display for StackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StackType::I32 => "i32",
            StackType::I64 => "i64",
            StackType::F32 => "f32",
            StackType::F64 => "f64",
            StackType::V128 => "v128",
            StackType::Ref => "ref",
        };
        f.write_str(name)
    }
}
