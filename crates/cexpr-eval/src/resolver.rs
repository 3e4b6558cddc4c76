//! Bounds and mutability checks against the module view.
//!
//! These checks run identically in both modes; only what happens after a
//! successful check differs between Validate and Evaluate.

use cexpr_types::{
    CompositeType, ConstExprError, ConstExprResult, FieldType, GlobalDesc, IndexSpace, ModuleInfo,
};

#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    info: &'a ModuleInfo,
}

impl<'a> Resolver<'a> {
    pub fn new(info: &'a ModuleInfo) -> Self {
        Self { info }
    }

    pub fn info(&self) -> &'a ModuleInfo {
        self.info
    }

    /// A global a constant expression may read: in range and immutable.
    pub fn global(&self, index: u32, offset: usize) -> ConstExprResult<&'a GlobalDesc> {
        let globals = &self.info.globals;
        let global = globals
            .get(index as usize)
            .ok_or(ConstExprError::IndexOutOfRange {
                offset,
                space: IndexSpace::Global,
                index,
                count: globals.len(),
            })?;
        if global.is_mutable() {
            return Err(ConstExprError::MutableGlobalNotAllowed { offset, index });
        }
        Ok(global)
    }

    pub fn function(&self, index: u32, offset: usize) -> ConstExprResult<()> {
        if index >= self.info.function_count {
            return Err(ConstExprError::IndexOutOfRange {
                offset,
                space: IndexSpace::Function,
                index,
                count: self.info.function_count as usize,
            });
        }
        Ok(())
    }

    pub fn struct_type(&self, index: u32, offset: usize) -> ConstExprResult<&'a [FieldType]> {
        self.info
            .types
            .get(index as usize)
            .and_then(CompositeType::struct_fields)
            .ok_or(ConstExprError::InvalidTypeIndex {
                offset,
                index,
                expected: "struct",
            })
    }

    pub fn array_type(&self, index: u32, offset: usize) -> ConstExprResult<FieldType> {
        self.info
            .types
            .get(index as usize)
            .and_then(CompositeType::array_element)
            .ok_or(ConstExprError::InvalidTypeIndex {
                offset,
                index,
                expected: "array",
            })
    }
}
