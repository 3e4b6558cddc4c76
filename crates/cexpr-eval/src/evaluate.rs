//! Evaluate mode: compute the value against a live instance.

use cexpr_types::reference::{encode_i31, NULL_REF};
use cexpr_types::{
    AllocationKind, ConstExprError, ConstExprResult, ConstExprValue, ModuleInfo, ObjectRef, ValType,
};

use crate::host::{FieldValue, Instance};
use crate::keep_alive::KeepAlive;
use crate::ops::{ConstExprOps, Mode, OpcodeCursor};
use crate::resolver::Resolver;

/// The result of an evaluation together with the roots that keep its
/// objects alive.
///
/// Hold on to this until the value has been stored somewhere the host's
/// collector can see; dropping it releases every temporary root.
#[derive(Debug)]
pub struct Evaluated<R> {
    value: ConstExprValue,
    keep_alive: KeepAlive<R>,
}

impl<R> Evaluated<R> {
    pub fn value(&self) -> ConstExprValue {
        self.value
    }

    /// Number of objects created (and rooted) during evaluation.
    pub fn rooted(&self) -> usize {
        self.keep_alive.len()
    }

    /// The result as 64 raw bits.
    ///
    /// # Panics
    ///
    /// Panics if the result is a `v128`; callers evaluating into a vector
    /// slot have to use [`Evaluated::value`].
    pub fn bits(&self) -> u64 {
        assert!(
            !matches!(self.value, ConstExprValue::Vector(_)),
            "a v128 result does not fit in 64 bits"
        );
        self.value.numeric_bits()
    }

    pub fn into_parts(self) -> (ConstExprValue, KeepAlive<R>) {
        (self.value, self.keep_alive)
    }
}

pub struct Evaluator<'a, 'i, I: Instance> {
    resolver: Resolver<'a>,
    cursor: OpcodeCursor,
    instance: &'i mut I,
    keep_alive: KeepAlive<I::Root>,
}

impl<'a, 'i, I: Instance> Evaluator<'a, 'i, I> {
    pub fn new(info: &'a ModuleInfo, instance: &'i mut I) -> Self {
        Self {
            resolver: Resolver::new(info),
            cursor: OpcodeCursor::new(),
            instance,
            keep_alive: KeepAlive::new(),
        }
    }

    pub fn finish_with(self, value: ConstExprValue) -> Evaluated<I::Root> {
        Evaluated {
            value,
            keep_alive: self.keep_alive,
        }
    }

    /// Root `object` for the rest of the evaluation.
    fn keep(&mut self, object: ObjectRef) {
        let root = self.instance.root(object);
        self.keep_alive.push(root);
    }

    /// Allocate a default struct and root it before anything else happens.
    fn create_struct(&mut self, type_index: u32) -> Option<ObjectRef> {
        let object = self.instance.struct_new_default(type_index)?;
        self.keep(object);
        Some(object)
    }

    fn create_array(&mut self, type_index: u32, len: u32, init: FieldValue) -> Option<ObjectRef> {
        let object = self.instance.array_new(type_index, len, init)?;
        self.keep(object);
        Some(object)
    }

    fn allocation_failed(&self, kind: AllocationKind) -> ConstExprError {
        tracing::debug!(offset = self.offset(), %kind, "host allocation failed");
        ConstExprError::AllocatorFailure {
            offset: self.offset(),
            kind,
        }
    }
}

fn field_value(value: ConstExprValue) -> FieldValue {
    match value {
        ConstExprValue::Vector(bits) => FieldValue::Vector(bits),
        other => FieldValue::Scalar(other.numeric_bits()),
    }
}

impl<I: Instance> ConstExprOps for Evaluator<'_, '_, I> {
    fn mode(&self) -> Mode {
        Mode::Evaluate
    }

    fn cursor(&self) -> &OpcodeCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut OpcodeCursor {
        &mut self.cursor
    }

    fn add_vector_constant(&mut self, bits: u128) -> ConstExprValue {
        ConstExprValue::from_vector(bits)
    }

    fn get_global(&mut self, index: u32) -> ConstExprResult<ConstExprValue> {
        let global = self.resolver.global(index, self.offset())?;
        if global.ty == ValType::V128 {
            Ok(ConstExprValue::from_vector(self.instance.load_v128_global(index)))
        } else {
            Ok(ConstExprValue::from_numeric(self.instance.load_global(index)))
        }
    }

    fn add_ref_func(&mut self, index: u32) -> ConstExprResult<ConstExprValue> {
        self.resolver.function(index, self.offset())?;
        let wrapper = self.instance.function_wrapper(index);
        self.keep(wrapper);
        tracing::trace!(index, %wrapper, "materialised function reference");
        Ok(ConstExprValue::from_reference(wrapper.bits()))
    }

    fn add_ref_i31(&mut self, value: ConstExprValue) -> ConstExprResult<ConstExprValue> {
        Ok(ConstExprValue::from_reference(encode_i31(value.numeric_bits())))
    }

    fn add_any_convert_extern(&mut self, reference: ConstExprValue) -> ConstExprResult<ConstExprValue> {
        match reference {
            ConstExprValue::Numeric(bits) => {
                Ok(ConstExprValue::from_numeric(self.instance.extern_internalize(bits)))
            }
            other => Ok(other),
        }
    }

    fn add_i32_add(&mut self, lhs: ConstExprValue, rhs: ConstExprValue) -> ConstExprResult<ConstExprValue> {
        Ok((lhs + rhs).truncate_to_i32())
    }

    fn add_i64_add(&mut self, lhs: ConstExprValue, rhs: ConstExprValue) -> ConstExprResult<ConstExprValue> {
        Ok(lhs + rhs)
    }

    fn add_i32_sub(&mut self, lhs: ConstExprValue, rhs: ConstExprValue) -> ConstExprResult<ConstExprValue> {
        Ok((lhs - rhs).truncate_to_i32())
    }

    fn add_i64_sub(&mut self, lhs: ConstExprValue, rhs: ConstExprValue) -> ConstExprResult<ConstExprValue> {
        Ok(lhs - rhs)
    }

    fn add_i32_mul(&mut self, lhs: ConstExprValue, rhs: ConstExprValue) -> ConstExprResult<ConstExprValue> {
        Ok((lhs * rhs).truncate_to_i32())
    }

    fn add_i64_mul(&mut self, lhs: ConstExprValue, rhs: ConstExprValue) -> ConstExprResult<ConstExprValue> {
        Ok(lhs * rhs)
    }

    fn add_struct_new(&mut self, type_index: u32, args: &[ConstExprValue]) -> ConstExprResult<ConstExprValue> {
        let fields = self.resolver.struct_type(type_index, self.offset())?;
        debug_assert_eq!(fields.len(), args.len());
        let object = self
            .create_struct(type_index)
            .ok_or_else(|| self.allocation_failed(AllocationKind::Struct))?;
        for (field, &arg) in args.iter().enumerate() {
            self.instance.struct_set(object, field as u32, field_value(arg));
        }
        Ok(ConstExprValue::from_reference(object.bits()))
    }

    fn add_struct_new_default(&mut self, type_index: u32) -> ConstExprResult<ConstExprValue> {
        self.resolver.struct_type(type_index, self.offset())?;
        let object = self
            .create_struct(type_index)
            .ok_or_else(|| self.allocation_failed(AllocationKind::Struct))?;
        Ok(ConstExprValue::from_reference(object.bits()))
    }

    fn add_array_new(
        &mut self,
        type_index: u32,
        size: ConstExprValue,
        value: ConstExprValue,
    ) -> ConstExprResult<ConstExprValue> {
        self.resolver.array_type(type_index, self.offset())?;
        let len = size.numeric_bits() as u32;
        let object = self
            .create_array(type_index, len, field_value(value))
            .ok_or_else(|| self.allocation_failed(AllocationKind::Array))?;
        Ok(ConstExprValue::from_reference(object.bits()))
    }

    fn add_array_new_default(&mut self, type_index: u32, size: ConstExprValue) -> ConstExprResult<ConstExprValue> {
        let element = self.resolver.array_type(type_index, self.offset())?;
        let init = if element.storage.is_reference() {
            FieldValue::Scalar(NULL_REF)
        } else if element.storage.is_v128() {
            FieldValue::Vector(0)
        } else {
            FieldValue::Scalar(0)
        };
        let len = size.numeric_bits() as u32;
        let object = self
            .create_array(type_index, len, init)
            .ok_or_else(|| self.allocation_failed(AllocationKind::Array))?;
        Ok(ConstExprValue::from_reference(object.bits()))
    }

    fn add_array_new_fixed(&mut self, type_index: u32, args: &[ConstExprValue]) -> ConstExprResult<ConstExprValue> {
        let element = self.resolver.array_type(type_index, self.offset())?;
        let init = if element.storage.is_v128() {
            FieldValue::Vector(0)
        } else {
            FieldValue::Scalar(0)
        };
        let object = self
            .create_array(type_index, args.len() as u32, init)
            .ok_or_else(|| self.allocation_failed(AllocationKind::Array))?;
        for (index, &arg) in args.iter().enumerate() {
            self.instance.array_set(object, index as u32, field_value(arg));
        }
        Ok(ConstExprValue::from_reference(object.bits()))
    }
}
