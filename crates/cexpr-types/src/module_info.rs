//! The read-only module view a constant expression is checked against.

use std::collections::BTreeSet;
use wasmparser::ValType;

// ══════════════════════════════════════════════════════════════════════════════
// Globals
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutability {
    Immutable,
    Mutable,
}

/// Declared type and mutability of one entry in the global index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalDesc {
    pub ty: ValType,
    pub mutability: Mutability,
}

impl GlobalDesc {
    pub fn immutable(ty: ValType) -> Self {
        Self {
            ty,
            mutability: Mutability::Immutable,
        }
    }

    pub fn mutable(ty: ValType) -> Self {
        Self {
            ty,
            mutability: Mutability::Mutable,
        }
    }

    pub fn is_mutable(&self) -> bool {
        self.mutability == Mutability::Mutable
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Composite types
// ══════════════════════════════════════════════════════════════════════════════

/// How a struct field or array element is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    I8,
    I16,
    Val(ValType),
}

impl StorageType {
    /// The value type used on the operand stack for this storage.
    pub fn unpacked(self) -> ValType {
        match self {
            StorageType::I8 | StorageType::I16 => ValType::I32,
            StorageType::Val(ty) => ty,
        }
    }

    /// Vector storage is 128 bits wide; everything else fits in 64.
    pub fn is_v128(self) -> bool {
        self.unpacked() == ValType::V128
    }

    pub fn is_reference(self) -> bool {
        matches!(self.unpacked(), ValType::Ref(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldType {
    pub storage: StorageType,
    pub mutable: bool,
}

impl FieldType {
    pub fn new(storage: StorageType) -> Self {
        Self {
            storage,
            mutable: false,
        }
    }

    pub fn mutable(storage: StorageType) -> Self {
        Self {
            storage,
            mutable: true,
        }
    }
}

/// One entry of the type index space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositeType {
    Func,
    Struct(Vec<FieldType>),
    Array(FieldType),
}

impl CompositeType {
    pub fn kind_name(&self) -> &'static str {
        match self {
            CompositeType::Func => "func",
            CompositeType::Struct(_) => "struct",
            CompositeType::Array(_) => "array",
        }
    }

    pub fn struct_fields(&self) -> Option<&[FieldType]> {
        match self {
            CompositeType::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn array_element(&self) -> Option<FieldType> {
        match self {
            CompositeType::Array(element) => Some(*element),
            _ => None,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// ModuleInfo
// ══════════════════════════════════════════════════════════════════════════════

/// Everything about the enclosing module a constant expression may refer to.
///
/// Only entries that precede the expression in the module should be present
/// in `globals`; a table initializer, read before the global section, sees an
/// empty global space.
#[derive(Debug, Clone, Default)]
pub struct ModuleInfo {
    pub globals: Vec<GlobalDesc>,
    pub types: Vec<CompositeType>,
    /// Size of the function index space (imports included).
    pub function_count: u32,
    declared_functions: BTreeSet<u32>,
}

impl ModuleInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global(mut self, global: GlobalDesc) -> Self {
        self.globals.push(global);
        self
    }

    pub fn with_type(mut self, ty: CompositeType) -> Self {
        self.types.push(ty);
        self
    }

    pub fn with_function_count(mut self, count: u32) -> Self {
        self.function_count = count;
        self
    }

    /// Mark a function as referenced from a constant expression.
    pub fn add_declared_function(&mut self, index: u32) {
        self.declared_functions.insert(index);
    }

    /// Merge the `ref.func` targets collected while validating an expression.
    pub fn declare_functions(&mut self, indices: impl IntoIterator<Item = u32>) {
        self.declared_functions.extend(indices);
    }

    pub fn is_declared_function(&self, index: u32) -> bool {
        self.declared_functions.contains(&index)
    }

    pub fn declared_functions(&self) -> impl Iterator<Item = u32> + '_ {
        self.declared_functions.iter().copied()
    }
}
