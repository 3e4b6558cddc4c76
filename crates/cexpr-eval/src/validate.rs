//! Validate mode: legality checks without an instance.
//!
//! Every supported opcode performs the same bounds and mutability checks it
//! would in Evaluate mode, then produces a placeholder value. `ref.func`
//! targets are collected so the module can record them as declared.

use cexpr_types::{ConstExprResult, ConstExprValue, ModuleInfo};

use crate::ops::{ConstExprOps, Mode, OpcodeCursor};
use crate::resolver::Resolver;

/// Functions referenced by `ref.func`, in the order they appeared, plus the
/// offset just past the expression's `end`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredFunctions {
    indices: Vec<u32>,
    end_offset: usize,
}

impl DeclaredFunctions {
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Absolute offset of the first byte after `end`.
    pub fn end_offset(&self) -> usize {
        self.end_offset
    }
}

pub struct Validator<'a> {
    resolver: Resolver<'a>,
    cursor: OpcodeCursor,
    declared_functions: Vec<u32>,
}

impl<'a> Validator<'a> {
    pub fn new(info: &'a ModuleInfo) -> Self {
        Self {
            resolver: Resolver::new(info),
            cursor: OpcodeCursor::new(),
            declared_functions: Vec::new(),
        }
    }

    pub fn into_declared_functions(self, end_offset: usize) -> DeclaredFunctions {
        DeclaredFunctions {
            indices: self.declared_functions,
            end_offset,
        }
    }

    fn placeholder() -> ConstExprResult<ConstExprValue> {
        Ok(ConstExprValue::default())
    }
}

impl ConstExprOps for Validator<'_> {
    fn mode(&self) -> Mode {
        Mode::Validate
    }

    fn cursor(&self) -> &OpcodeCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut OpcodeCursor {
        &mut self.cursor
    }

    fn add_vector_constant(&mut self, _bits: u128) -> ConstExprValue {
        ConstExprValue::default()
    }

    fn get_global(&mut self, index: u32) -> ConstExprResult<ConstExprValue> {
        self.resolver.global(index, self.offset())?;
        Self::placeholder()
    }

    fn add_ref_func(&mut self, index: u32) -> ConstExprResult<ConstExprValue> {
        self.resolver.function(index, self.offset())?;
        self.declared_functions.push(index);
        Self::placeholder()
    }

    fn add_ref_i31(&mut self, _value: ConstExprValue) -> ConstExprResult<ConstExprValue> {
        Self::placeholder()
    }

    fn add_any_convert_extern(&mut self, _reference: ConstExprValue) -> ConstExprResult<ConstExprValue> {
        Self::placeholder()
    }

    fn add_i32_add(&mut self, _lhs: ConstExprValue, _rhs: ConstExprValue) -> ConstExprResult<ConstExprValue> {
        Self::placeholder()
    }

    fn add_i64_add(&mut self, _lhs: ConstExprValue, _rhs: ConstExprValue) -> ConstExprResult<ConstExprValue> {
        Self::placeholder()
    }

    fn add_i32_sub(&mut self, _lhs: ConstExprValue, _rhs: ConstExprValue) -> ConstExprResult<ConstExprValue> {
        Self::placeholder()
    }

    fn add_i64_sub(&mut self, _lhs: ConstExprValue, _rhs: ConstExprValue) -> ConstExprResult<ConstExprValue> {
        Self::placeholder()
    }

    fn add_i32_mul(&mut self, _lhs: ConstExprValue, _rhs: ConstExprValue) -> ConstExprResult<ConstExprValue> {
        Self::placeholder()
    }

    fn add_i64_mul(&mut self, _lhs: ConstExprValue, _rhs: ConstExprValue) -> ConstExprResult<ConstExprValue> {
        Self::placeholder()
    }

    fn add_struct_new(&mut self, type_index: u32, _args: &[ConstExprValue]) -> ConstExprResult<ConstExprValue> {
        self.resolver.struct_type(type_index, self.offset())?;
        Self::placeholder()
    }

    fn add_struct_new_default(&mut self, type_index: u32) -> ConstExprResult<ConstExprValue> {
        self.resolver.struct_type(type_index, self.offset())?;
        Self::placeholder()
    }

    fn add_array_new(
        &mut self,
        type_index: u32,
        _size: ConstExprValue,
        _value: ConstExprValue,
    ) -> ConstExprResult<ConstExprValue> {
        self.resolver.array_type(type_index, self.offset())?;
        Self::placeholder()
    }

    fn add_array_new_default(&mut self, type_index: u32, _size: ConstExprValue) -> ConstExprResult<ConstExprValue> {
        self.resolver.array_type(type_index, self.offset())?;
        Self::placeholder()
    }

    fn add_array_new_fixed(&mut self, type_index: u32, _args: &[ConstExprValue]) -> ConstExprResult<ConstExprValue> {
        self.resolver.array_type(type_index, self.offset())?;
        Self::placeholder()
    }
}
