//! Integration tests for Evaluate mode.
//!
//! Tests cover:
//! - Numeric constants and extended-const arithmetic
//! - Global reads, scalar and v128
//! - Reference producers: ref.null, ref.func, ref.i31, conversions
//! - GC allocation, field initialisation and storage widths
//! - Keep-alive rooting across allocations that trigger collection
//! - Validated expressions evaluating without rejection
//! - Host allocation failure

mod common;

use cexpr_eval::reference::{decode_i31, I31_TAG};
use cexpr_eval::{
    evaluate_constant_expression, evaluate_rooted, validate_constant_expression, AllocationKind,
    CompositeType, ConstExprConfig, ConstExprError, ConstExprValue, FieldType, FieldValue, GlobalDesc,
    Instance, ModuleInfo, StorageType, ValType,
};
use common::{expr, MockInstance, Object};
use wasm_encoder::Instruction;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Module with one type of each shape the tests need.
///
/// 0: struct { i32, i64 }
/// 1: array (mut i32)
/// 2: array v128
/// 3: struct { externref }
/// 4: array funcref
/// 5: func
fn gc_module() -> ModuleInfo {
    ModuleInfo::new()
        .with_type(CompositeType::Struct(vec![
            FieldType::new(StorageType::Val(ValType::I32)),
            FieldType::new(StorageType::Val(ValType::I64)),
        ]))
        .with_type(CompositeType::Array(FieldType::mutable(StorageType::Val(ValType::I32))))
        .with_type(CompositeType::Array(FieldType::new(StorageType::Val(ValType::V128))))
        .with_type(CompositeType::Struct(vec![FieldType::new(StorageType::Val(ValType::EXTERNREF))]))
        .with_type(CompositeType::Array(FieldType::new(StorageType::Val(ValType::FUNCREF))))
        .with_type(CompositeType::Func)
        .with_function_count(3)
}

fn eval(bytes: &[u8], info: &ModuleInfo, expected: ValType) -> Result<u64, ConstExprError> {
    let mut instance = MockInstance::new(info);
    evaluate_constant_expression(bytes, &mut instance, info, expected)
}

fn eval_i32(instrs: &[Instruction<'_>]) -> u64 {
    eval(&expr(instrs), &ModuleInfo::new(), ValType::I32).expect("evaluation failed")
}

/// Offset of the instruction that would follow `prefix`.
fn offset_after(prefix: &[Instruction<'_>]) -> usize {
    expr(prefix).len() - 1
}

fn array_elements(instance: &MockInstance, bits: u64) -> Vec<FieldValue> {
    match instance.object(bits) {
        Some(Object::Array { elements, .. }) => elements,
        other => panic!("expected a live array at {bits:#x}, got {other:?}"),
    }
}

fn struct_fields(instance: &MockInstance, bits: u64) -> Vec<FieldValue> {
    match instance.object(bits) {
        Some(Object::Struct { fields, .. }) => fields,
        other => panic!("expected a live struct at {bits:#x}, got {other:?}"),
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Numeric
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_i32_add_end_to_end() {
    let result = eval_i32(&[Instruction::I32Const(2), Instruction::I32Const(3), Instruction::I32Add]);
    assert_eq!(result, 5);
}

#[test]
fn test_i32_add_wraps() {
    let result = eval_i32(&[Instruction::I32Const(i32::MAX), Instruction::I32Const(1), Instruction::I32Add]);
    assert_eq!(result, 0x8000_0000);
}

#[test]
fn test_i32_sub_below_zero_is_zero_extended() {
    let result = eval_i32(&[Instruction::I32Const(2), Instruction::I32Const(3), Instruction::I32Sub]);
    assert_eq!(result, 0xffff_ffff);
}

#[test]
fn test_i32_mul_truncates() {
    let result = eval_i32(&[
        Instruction::I32Const(0x1_0000),
        Instruction::I32Const(0x1_0000),
        Instruction::I32Mul,
    ]);
    assert_eq!(result, 0);
}

#[test]
fn test_i64_arithmetic_wraps() {
    let info = ModuleInfo::new();
    let add = expr(&[Instruction::I64Const(i64::MAX), Instruction::I64Const(1), Instruction::I64Add]);
    assert_eq!(eval(&add, &info, ValType::I64), Ok(i64::MIN as u64));

    let sub = expr(&[Instruction::I64Const(3), Instruction::I64Const(5), Instruction::I64Sub]);
    assert_eq!(eval(&sub, &info, ValType::I64), Ok(-2i64 as u64));

    let mul = expr(&[Instruction::I64Const(1 << 62), Instruction::I64Const(4), Instruction::I64Mul]);
    assert_eq!(eval(&mul, &info, ValType::I64), Ok(0));
}

#[test]
fn test_negative_i32_const() {
    assert_eq!(eval_i32(&[Instruction::I32Const(-7)]), u64::from(-7i32 as u32));
}

#[test]
fn test_float_constants_are_raw_bits() {
    let info = ModuleInfo::new();

    let mut f32_bytes = vec![0x43];
    f32_bytes.extend_from_slice(&1.5f32.to_le_bytes());
    f32_bytes.push(0x0b);
    assert_eq!(eval(&f32_bytes, &info, ValType::F32), Ok(u64::from(1.5f32.to_bits())));

    let mut f64_bytes = vec![0x44];
    f64_bytes.extend_from_slice(&(-0.25f64).to_le_bytes());
    f64_bytes.push(0x0b);
    assert_eq!(eval(&f64_bytes, &info, ValType::F64), Ok((-0.25f64).to_bits()));
}

// ══════════════════════════════════════════════════════════════════════════════
// Globals
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_global_get_reads_instance() {
    let info = ModuleInfo::new().with_global(GlobalDesc::immutable(ValType::I64));
    let mut instance = MockInstance::new(&info).with_global(0, 0xdead_beef_0000);
    let bytes = expr(&[Instruction::GlobalGet(0)]);
    assert_eq!(
        evaluate_constant_expression(&bytes, &mut instance, &info, ValType::I64),
        Ok(0xdead_beef_0000)
    );
}

#[test]
fn test_global_get_feeds_arithmetic() {
    let info = ModuleInfo::new().with_global(GlobalDesc::immutable(ValType::I32));
    let mut instance = MockInstance::new(&info).with_global(0, 40);
    let bytes = expr(&[Instruction::GlobalGet(0), Instruction::I32Const(2), Instruction::I32Add]);
    assert_eq!(
        evaluate_constant_expression(&bytes, &mut instance, &info, ValType::I32),
        Ok(42)
    );
}

#[test]
fn test_global_get_v128_is_vector() {
    let info = ModuleInfo::new().with_global(GlobalDesc::immutable(ValType::V128));
    let mut instance = MockInstance::new(&info).with_v128_global(0, u128::MAX - 5);
    let bytes = expr(&[Instruction::GlobalGet(0)]);
    let evaluated = evaluate_rooted(&bytes, &mut instance, &info, ValType::V128, &ConstExprConfig::default())
        .expect("evaluation failed");
    assert_eq!(evaluated.value(), ConstExprValue::Vector(u128::MAX - 5));
}

#[test]
fn test_mutable_global_rejected_at_evaluation() {
    let info = ModuleInfo::new().with_global(GlobalDesc::mutable(ValType::I32));
    let bytes = expr(&[Instruction::GlobalGet(0)]);
    assert_eq!(
        eval(&bytes, &info, ValType::I32),
        Err(ConstExprError::MutableGlobalNotAllowed { offset: 0, index: 0 })
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Vectors
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_v128_const_value() {
    let info = ModuleInfo::new();
    let mut instance = MockInstance::new(&info);
    let bits: u128 = 0x0102_0304_0506_0708_090a_0b0c_0d0e_0f10;
    let bytes = expr(&[Instruction::V128Const(bits as i128)]);
    let evaluated = evaluate_rooted(&bytes, &mut instance, &info, ValType::V128, &ConstExprConfig::default())
        .expect("evaluation failed");
    assert_eq!(evaluated.value(), ConstExprValue::Vector(bits));
}

#[test]
#[should_panic(expected = "v128")]
fn test_v128_result_does_not_fit_u64() {
    let bytes = expr(&[Instruction::V128Const(1)]);
    let _ = eval(&bytes, &ModuleInfo::new(), ValType::V128);
}

// ══════════════════════════════════════════════════════════════════════════════
// References
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_ref_null_is_zero() {
    assert_eq!(eval(&[0xd0, 0x70, 0x0b], &ModuleInfo::new(), ValType::FUNCREF), Ok(0));
    assert_eq!(eval(&[0xd0, 0x6f, 0x0b], &ModuleInfo::new(), ValType::EXTERNREF), Ok(0));
}

#[test]
fn test_ref_i31_drops_bit_31() {
    let bits = eval(
        &expr(&[Instruction::I32Const(0x8000_0001u32 as i32), Instruction::RefI31]),
        &ModuleInfo::new(),
        ValType::FUNCREF,
    )
    .unwrap();
    assert_eq!(bits, I31_TAG | 1);
    assert_eq!(decode_i31(bits), Some(1));
}

#[test]
fn test_ref_i31_sign_extends_bit_30() {
    let info = ModuleInfo::new();
    let bits = eval(
        &expr(&[Instruction::I32Const(0x4000_0000), Instruction::RefI31]),
        &info,
        ValType::FUNCREF,
    )
    .unwrap();
    assert_eq!(decode_i31(bits), Some(-0x4000_0000));

    let bits = eval(&expr(&[Instruction::I32Const(-1), Instruction::RefI31]), &info, ValType::FUNCREF).unwrap();
    assert_eq!(decode_i31(bits), Some(-1));
}

#[test]
fn test_ref_func_returns_cached_wrapper() {
    let info = gc_module();
    let mut instance = MockInstance::new(&info);
    let bytes = expr(&[Instruction::RefFunc(2)]);

    let first = evaluate_constant_expression(&bytes, &mut instance, &info, ValType::FUNCREF).unwrap();
    assert_eq!(instance.object(first), Some(Object::Function(2)));

    let second = evaluate_constant_expression(&bytes, &mut instance, &info, ValType::FUNCREF).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_ref_func_wrapper_is_rooted_during_evaluation() {
    let info = gc_module();
    let mut instance = MockInstance::new(&info);
    let bytes = expr(&[Instruction::RefFunc(0)]);
    let evaluated =
        evaluate_rooted(&bytes, &mut instance, &info, ValType::FUNCREF, &ConstExprConfig::default()).unwrap();
    assert_eq!(evaluated.rooted(), 1);
    assert_eq!(instance.rooted(), 1);
    drop(evaluated);
    assert_eq!(instance.rooted(), 0);
}

#[test]
fn test_any_convert_extern_internalizes_null() {
    let info = ModuleInfo::new();
    let mut instance = MockInstance::new(&info);
    let mut bytes = vec![0xd0, 0x6f];
    bytes.extend(expr(&[Instruction::AnyConvertExtern]));
    assert_eq!(
        evaluate_constant_expression(&bytes, &mut instance, &info, ValType::EXTERNREF),
        Ok(0)
    );
    assert_eq!(instance.internalized, vec![0]);
}

#[test]
fn test_any_convert_extern_internalizes_global() {
    let info = ModuleInfo::new().with_global(GlobalDesc::immutable(ValType::EXTERNREF));
    let mut instance = MockInstance::new(&info).with_global(0, 0x77);
    let bytes = expr(&[Instruction::GlobalGet(0), Instruction::AnyConvertExtern]);
    assert_eq!(
        evaluate_constant_expression(&bytes, &mut instance, &info, ValType::EXTERNREF),
        Ok(0x77)
    );
    assert_eq!(instance.internalized, vec![0x77]);
}

#[test]
fn test_conversions_pass_object_references_through() {
    let info = gc_module();
    let mut instance = MockInstance::new(&info);
    let bytes = expr(&[
        Instruction::StructNewDefault(0),
        Instruction::ExternConvertAny,
        Instruction::AnyConvertExtern,
    ]);
    let evaluated =
        evaluate_rooted(&bytes, &mut instance, &info, ValType::EXTERNREF, &ConstExprConfig::default()).unwrap();
    assert!(matches!(evaluated.value(), ConstExprValue::Reference(_)));
    assert!(instance.object(evaluated.bits()).is_some());
    assert!(instance.internalized.is_empty());
}

// ══════════════════════════════════════════════════════════════════════════════
// GC allocation
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_struct_new_sets_fields() {
    let info = gc_module();
    let mut instance = MockInstance::new(&info);
    let bytes = expr(&[Instruction::I32Const(-1), Instruction::I64Const(-2), Instruction::StructNew(0)]);
    let evaluated =
        evaluate_rooted(&bytes, &mut instance, &info, ValType::EXTERNREF, &ConstExprConfig::default()).unwrap();
    assert_eq!(
        struct_fields(&instance, evaluated.bits()),
        vec![FieldValue::Scalar(0xffff_ffff), FieldValue::Scalar(-2i64 as u64)]
    );
}

#[test]
fn test_struct_new_default() {
    let info = gc_module();
    let mut instance = MockInstance::new(&info);
    let bytes = expr(&[Instruction::StructNewDefault(0)]);
    let evaluated =
        evaluate_rooted(&bytes, &mut instance, &info, ValType::EXTERNREF, &ConstExprConfig::default()).unwrap();
    assert_eq!(
        struct_fields(&instance, evaluated.bits()),
        vec![FieldValue::Scalar(0), FieldValue::Scalar(0)]
    );
}

#[test]
fn test_array_new_repeats_init() {
    let info = gc_module();
    let mut instance = MockInstance::new(&info);
    let bytes = expr(&[Instruction::I32Const(7), Instruction::I32Const(3), Instruction::ArrayNew(1)]);
    let evaluated =
        evaluate_rooted(&bytes, &mut instance, &info, ValType::EXTERNREF, &ConstExprConfig::default()).unwrap();
    assert_eq!(array_elements(&instance, evaluated.bits()), vec![FieldValue::Scalar(7); 3]);
}

#[test]
fn test_array_new_v128_init() {
    let info = gc_module();
    let mut instance = MockInstance::new(&info);
    let bytes = expr(&[Instruction::V128Const(9), Instruction::I32Const(2), Instruction::ArrayNew(2)]);
    let evaluated =
        evaluate_rooted(&bytes, &mut instance, &info, ValType::EXTERNREF, &ConstExprConfig::default()).unwrap();
    assert_eq!(array_elements(&instance, evaluated.bits()), vec![FieldValue::Vector(9); 2]);
}

#[test]
fn test_array_new_default_by_element_kind() {
    let info = gc_module();
    let mut instance = MockInstance::new(&info);
    let config = ConstExprConfig::default();

    let refs = expr(&[Instruction::I32Const(2), Instruction::ArrayNewDefault(4)]);
    let evaluated = evaluate_rooted(&refs, &mut instance, &info, ValType::EXTERNREF, &config).unwrap();
    assert_eq!(array_elements(&instance, evaluated.bits()), vec![FieldValue::Scalar(0); 2]);

    let vectors = expr(&[Instruction::I32Const(2), Instruction::ArrayNewDefault(2)]);
    let evaluated = evaluate_rooted(&vectors, &mut instance, &info, ValType::EXTERNREF, &config).unwrap();
    assert_eq!(array_elements(&instance, evaluated.bits()), vec![FieldValue::Vector(0); 2]);

    let scalars = expr(&[Instruction::I32Const(0), Instruction::ArrayNewDefault(1)]);
    let evaluated = evaluate_rooted(&scalars, &mut instance, &info, ValType::EXTERNREF, &config).unwrap();
    assert!(array_elements(&instance, evaluated.bits()).is_empty());
}

#[test]
fn test_array_new_fixed_v128_elements() {
    let info = gc_module().with_global(GlobalDesc::immutable(ValType::V128));
    let mut instance = MockInstance::new(&info).with_v128_global(0, 0xabcd);
    let bytes = expr(&[
        Instruction::GlobalGet(0),
        Instruction::V128Const(5),
        Instruction::ArrayNewFixed {
            array_type_index: 2,
            array_size: 2,
        },
    ]);
    let evaluated =
        evaluate_rooted(&bytes, &mut instance, &info, ValType::EXTERNREF, &ConstExprConfig::default()).unwrap();
    assert_eq!(
        array_elements(&instance, evaluated.bits()),
        vec![FieldValue::Vector(0xabcd), FieldValue::Vector(5)]
    );
}

#[test]
fn test_array_new_fixed_three_vector_literals() {
    let info = gc_module();
    let mut instance = MockInstance::new(&info);
    let lanes: [u128; 3] = [1, 0xffff_0000_ffff_0000_ffff_0000_ffff_0000, u128::MAX];
    let bytes = expr(&[
        Instruction::V128Const(lanes[0] as i128),
        Instruction::V128Const(lanes[1] as i128),
        Instruction::V128Const(lanes[2] as i128),
        Instruction::ArrayNewFixed {
            array_type_index: 2,
            array_size: 3,
        },
    ]);
    let evaluated =
        evaluate_rooted(&bytes, &mut instance, &info, ValType::EXTERNREF, &ConstExprConfig::default()).unwrap();
    let elements = array_elements(&instance, evaluated.bits());
    assert_eq!(elements.len(), 3);
    for (element, lane) in elements.into_iter().zip(lanes) {
        assert_eq!(element, FieldValue::Vector(lane));
    }
}

#[test]
fn test_array_new_fixed_scalar_elements_in_order() {
    let info = gc_module();
    let mut instance = MockInstance::new(&info);
    let bytes = expr(&[
        Instruction::I32Const(10),
        Instruction::I32Const(20),
        Instruction::I32Const(30),
        Instruction::ArrayNewFixed {
            array_type_index: 1,
            array_size: 3,
        },
    ]);
    let evaluated =
        evaluate_rooted(&bytes, &mut instance, &info, ValType::EXTERNREF, &ConstExprConfig::default()).unwrap();
    assert_eq!(
        array_elements(&instance, evaluated.bits()),
        vec![FieldValue::Scalar(10), FieldValue::Scalar(20), FieldValue::Scalar(30)]
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Keep-alive
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_host_collects_unrooted_objects() {
    let info = gc_module();
    let mut instance = MockInstance::new(&info);
    let object = instance.struct_new_default(0).unwrap();
    instance.collect_now();
    assert!(instance.object(object.bits()).is_none());
}

#[test]
fn test_struct_new_default_survives_following_allocations() {
    let info = gc_module();
    let mut instance = MockInstance::new(&info);
    instance.collect_on_alloc = true;
    let bytes = expr(&[
        Instruction::StructNewDefault(0),
        Instruction::StructNewDefault(0),
        Instruction::ArrayNewFixed {
            array_type_index: 4,
            array_size: 2,
        },
    ]);
    let evaluated =
        evaluate_rooted(&bytes, &mut instance, &info, ValType::EXTERNREF, &ConstExprConfig::default()).unwrap();
    assert_eq!(evaluated.rooted(), 3);

    let elements = array_elements(&instance, evaluated.bits());
    assert_eq!(elements.len(), 2);
    for element in elements {
        let FieldValue::Scalar(bits) = element else {
            panic!("reference element stored as vector");
        };
        assert!(instance.object(bits).is_some(), "element {bits:#x} was collected");
    }
}

#[test]
fn test_struct_field_keeps_array_alive() {
    let info = gc_module();
    let mut instance = MockInstance::new(&info);
    instance.collect_on_alloc = true;
    let bytes = expr(&[
        Instruction::I32Const(2),
        Instruction::ArrayNewDefault(1),
        Instruction::StructNew(3),
    ]);
    let evaluated =
        evaluate_rooted(&bytes, &mut instance, &info, ValType::EXTERNREF, &ConstExprConfig::default()).unwrap();
    let fields = struct_fields(&instance, evaluated.bits());
    let FieldValue::Scalar(array) = fields[0] else {
        panic!("reference field stored as vector");
    };
    assert_eq!(array_elements(&instance, array), vec![FieldValue::Scalar(0); 2]);

    drop(evaluated);
    assert_eq!(instance.rooted(), 0);
    instance.collect_now();
    assert_eq!(instance.live_objects(), 0);
}

#[test]
fn test_roots_released_after_evaluate() {
    let info = gc_module();
    let mut instance = MockInstance::new(&info);
    let bytes = expr(&[Instruction::StructNewDefault(0)]);
    let bits = evaluate_constant_expression(&bytes, &mut instance, &info, ValType::EXTERNREF).unwrap();
    assert_eq!(instance.rooted(), 0);
    assert!(instance.object(bits).is_some());
}

// ══════════════════════════════════════════════════════════════════════════════
// Mode consistency
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_validated_expressions_evaluate() {
    let info = gc_module()
        .with_global(GlobalDesc::immutable(ValType::I32))
        .with_global(GlobalDesc::immutable(ValType::V128));
    let cases: Vec<(Vec<Instruction<'_>>, ValType)> = vec![
        (vec![Instruction::I32Const(2), Instruction::I32Const(3), Instruction::I32Add], ValType::I32),
        (vec![Instruction::GlobalGet(0), Instruction::I32Const(1), Instruction::I32Mul], ValType::I32),
        (vec![Instruction::I64Const(9), Instruction::I64Const(4), Instruction::I64Sub], ValType::I64),
        (vec![Instruction::RefFunc(1)], ValType::FUNCREF),
        (vec![Instruction::I32Const(5), Instruction::RefI31], ValType::EXTERNREF),
        (vec![Instruction::GlobalGet(1), Instruction::I32Const(2), Instruction::ArrayNew(2)], ValType::EXTERNREF),
        (vec![Instruction::I32Const(1), Instruction::I64Const(2), Instruction::StructNew(0)], ValType::EXTERNREF),
        (vec![Instruction::StructNewDefault(0), Instruction::ExternConvertAny], ValType::EXTERNREF),
    ];
    for (instrs, ty) in cases {
        let bytes = expr(&instrs);
        validate_constant_expression(&bytes, 0, &info, ty).unwrap_or_else(|e| panic!("{instrs:?}: {e}"));
        let mut instance = MockInstance::new(&info);
        evaluate_constant_expression(&bytes, &mut instance, &info, ty).unwrap_or_else(|e| panic!("{instrs:?}: {e}"));
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Allocation failure
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_struct_allocation_failure() {
    let info = gc_module();
    let mut instance = MockInstance::new(&info);
    instance.fail_after = Some(0);
    let bytes = expr(&[Instruction::StructNewDefault(0)]);
    assert_eq!(
        evaluate_constant_expression(&bytes, &mut instance, &info, ValType::EXTERNREF),
        Err(ConstExprError::AllocatorFailure {
            offset: 0,
            kind: AllocationKind::Struct,
        })
    );
}

#[test]
fn test_array_allocation_failure() {
    let info = gc_module();
    let mut instance = MockInstance::new(&info);
    instance.fail_after = Some(0);
    let prefix = [Instruction::I32Const(7), Instruction::I32Const(3)];
    let mut instrs = prefix.to_vec();
    instrs.push(Instruction::ArrayNew(1));
    assert_eq!(
        evaluate_constant_expression(&expr(&instrs), &mut instance, &info, ValType::EXTERNREF),
        Err(ConstExprError::AllocatorFailure {
            offset: offset_after(&prefix),
            kind: AllocationKind::Array,
        })
    );
}

#[test]
fn test_failure_releases_earlier_roots() {
    let info = gc_module();
    let mut instance = MockInstance::new(&info);
    instance.fail_after = Some(1);
    let prefix = [Instruction::I32Const(1), Instruction::ArrayNewDefault(1)];
    let mut instrs = prefix.to_vec();
    instrs.push(Instruction::StructNew(3));
    let err = evaluate_constant_expression(&expr(&instrs), &mut instance, &info, ValType::EXTERNREF)
        .unwrap_err();
    assert_eq!(
        err,
        ConstExprError::AllocatorFailure {
            offset: offset_after(&prefix),
            kind: AllocationKind::Struct,
        }
    );
    assert_eq!(instance.rooted(), 0);
    assert_eq!(err.to_string(), format!("at byte {}: failed to allocate new struct", err.offset()));
}
