//! Host services used by Evaluate mode.
//!
//! The interpreter never inspects host objects; it asks the instance to
//! read globals, allocate and fill GC objects, and materialise function
//! references, and it holds the returned [`Instance::Root`] guards until the
//! expression is finished.

use cexpr_types::ObjectRef;

/// A value written into a struct field or array element.
///
/// The variant has to match the storage width of the slot: `Vector` for
/// `v128` storage, `Scalar` for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(u64),
    Vector(u128),
}

/// A live module instance.
pub trait Instance {
    /// Strong handle that keeps one object alive until dropped.
    type Root;

    /// Current value of a scalar or reference global, as raw bits.
    fn load_global(&self, index: u32) -> u64;

    /// Current value of a `v128` global.
    fn load_v128_global(&self, index: u32) -> u128;

    /// Allocate a struct of `type_index` with every field defaulted.
    /// `None` means the host is out of memory.
    fn struct_new_default(&mut self, type_index: u32) -> Option<ObjectRef>;

    fn struct_set(&mut self, object: ObjectRef, field: u32, value: FieldValue);

    /// Allocate an array of `type_index` with `len` copies of `init`.
    /// `None` means the host is out of memory.
    fn array_new(&mut self, type_index: u32, len: u32, init: FieldValue) -> Option<ObjectRef>;

    fn array_set(&mut self, object: ObjectRef, index: u32, value: FieldValue);

    /// The wrapper object for function `index`, created on first use.
    fn function_wrapper(&mut self, index: u32) -> ObjectRef;

    /// Convert an external reference into the internal reference space.
    ///
    /// Called with raw bits from `ref.null` or a global, never with a
    /// reference created earlier in the same expression.
    fn extern_internalize(&mut self, bits: u64) -> u64;

    /// Root `object` for as long as the returned guard is alive.
    fn root(&mut self, object: ObjectRef) -> Self::Root;
}
