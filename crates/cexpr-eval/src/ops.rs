//! The per-opcode interpreter contract.
//!
//! [`ConstExprOps`] has one method per opcode. The handful of opcodes legal
//! in a constant expression are required methods, implemented once for
//! Validate mode ([`crate::Validator`]) and once for Evaluate mode
//! ([`crate::Evaluator`]). Every other opcode has a default body that fails
//! with [`ConstExprError::InvalidConstantExpression`], so rejection is the
//! same in both modes.
//!
//! Rejected opcodes take only their immediates: the stub fails before any
//! operand would be consumed, so the error never depends on what happens to
//! be on the stack.

use cexpr_types::reference::NULL_REF;
use cexpr_types::{ConstExprError, ConstExprResult, ConstExprValue, StackType};
use wasmparser::Operator;

/// Which of the two interpreters is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No instance; checks legality and collects `ref.func` targets.
    Validate,
    /// Live instance; computes the value.
    Evaluate,
}

/// Position tracking shared by both interpreters.
#[derive(Debug, Clone, Default)]
pub struct OpcodeCursor {
    offset: usize,
    saw_disallowed_opcode: bool,
}

impl OpcodeCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn saw_disallowed_opcode(&self) -> bool {
        self.saw_disallowed_opcode
    }
}

macro_rules! rejecting_ops {
    ($( $(#[$meta:meta])* fn $name:ident($($arg:ident: $ty:ty),*); )*) => {
        $(
            $(#[$meta])*
            fn $name(&mut self $(, $arg: $ty)*) -> ConstExprResult<()> {
                $(let _ = $arg;)*
                Err(self.reject())
            }
        )*
    };
}

pub trait ConstExprOps {
    fn mode(&self) -> Mode;

    fn cursor(&self) -> &OpcodeCursor;

    fn cursor_mut(&mut self) -> &mut OpcodeCursor;

    /// Absolute byte offset of the opcode being processed.
    fn offset(&self) -> usize {
        self.cursor().offset
    }

    fn set_offset(&mut self, offset: usize) {
        self.cursor_mut().offset = offset;
    }

    /// The error every illegal opcode produces.
    fn reject(&self) -> ConstExprError {
        ConstExprError::InvalidConstantExpression {
            offset: self.offset(),
        }
    }

    /// Called after every decoded opcode, supported or not.
    ///
    /// `nop` never reaches a per-opcode method, so this hook is the only
    /// place it can be noticed; [`ConstExprOps::finish`] turns the flag into
    /// an error.
    fn did_parse_opcode(&mut self, op: &Operator<'_>) {
        if matches!(op, Operator::Nop) {
            self.cursor_mut().saw_disallowed_opcode = true;
        }
    }

    /// Close the expression and hand back its single result.
    ///
    /// # Panics
    ///
    /// Panics unless exactly one value is left; the decoder reports a
    /// stack-height error before getting here.
    fn finish(&mut self, mut stack: Vec<ConstExprValue>) -> ConstExprResult<ConstExprValue> {
        assert_eq!(stack.len(), 1, "constant expression must leave exactly one value");
        if self.cursor().saw_disallowed_opcode {
            return Err(self.reject());
        }
        Ok(stack.swap_remove(0))
    }

    // ── Constants ────────────────────────────────────────────────────────

    /// `i32/i64/f32/f64.const` and `ref.null`; the same in both modes.
    fn add_constant(&mut self, ty: StackType, bits: u64) -> ConstExprValue {
        match ty {
            StackType::I32 | StackType::I64 | StackType::F32 | StackType::F64 => {
                ConstExprValue::from_numeric(bits)
            }
            StackType::Ref => ConstExprValue::from_numeric(NULL_REF),
            StackType::V128 => unreachable!("v128 constants go through add_vector_constant"),
        }
    }

    fn add_vector_constant(&mut self, bits: u128) -> ConstExprValue;

    // ── Globals & references ─────────────────────────────────────────────

    fn get_global(&mut self, index: u32) -> ConstExprResult<ConstExprValue>;

    fn add_ref_func(&mut self, index: u32) -> ConstExprResult<ConstExprValue>;

    fn add_ref_i31(&mut self, value: ConstExprValue) -> ConstExprResult<ConstExprValue>;

    fn add_any_convert_extern(&mut self, reference: ConstExprValue) -> ConstExprResult<ConstExprValue>;

    /// Both reference spaces share one representation, so this is the
    /// identity in either mode.
    fn add_extern_convert_any(&mut self, reference: ConstExprValue) -> ConstExprResult<ConstExprValue> {
        Ok(reference)
    }

    // ── Extended-const arithmetic ────────────────────────────────────────

    fn add_i32_add(&mut self, lhs: ConstExprValue, rhs: ConstExprValue) -> ConstExprResult<ConstExprValue>;
    fn add_i64_add(&mut self, lhs: ConstExprValue, rhs: ConstExprValue) -> ConstExprResult<ConstExprValue>;
    fn add_i32_sub(&mut self, lhs: ConstExprValue, rhs: ConstExprValue) -> ConstExprResult<ConstExprValue>;
    fn add_i64_sub(&mut self, lhs: ConstExprValue, rhs: ConstExprValue) -> ConstExprResult<ConstExprValue>;
    fn add_i32_mul(&mut self, lhs: ConstExprValue, rhs: ConstExprValue) -> ConstExprResult<ConstExprValue>;
    fn add_i64_mul(&mut self, lhs: ConstExprValue, rhs: ConstExprValue) -> ConstExprResult<ConstExprValue>;

    // ── GC allocation ────────────────────────────────────────────────────

    fn add_struct_new(&mut self, type_index: u32, args: &[ConstExprValue]) -> ConstExprResult<ConstExprValue>;

    fn add_struct_new_default(&mut self, type_index: u32) -> ConstExprResult<ConstExprValue>;

    fn add_array_new(
        &mut self,
        type_index: u32,
        size: ConstExprValue,
        value: ConstExprValue,
    ) -> ConstExprResult<ConstExprValue>;

    fn add_array_new_default(&mut self, type_index: u32, size: ConstExprValue) -> ConstExprResult<ConstExprValue>;

    fn add_array_new_fixed(&mut self, type_index: u32, args: &[ConstExprValue]) -> ConstExprResult<ConstExprValue>;

    // ── Everything else is illegal ───────────────────────────────────────

    rejecting_ops! {
        /// Fallback for opcodes without a dedicated stub.
        fn unsupported();

        fn add_unreachable();
        fn add_block();
        fn add_loop();
        fn add_if();
        fn add_else();
        fn add_branch(relative_depth: u32);
        fn add_branch_if(relative_depth: u32);
        fn add_switch();
        fn add_return();
        fn add_call(function_index: u32);
        fn add_call_indirect();
        fn add_call_ref();
        fn add_return_call(function_index: u32);
        fn add_return_call_indirect();
        fn add_return_call_ref();
        fn add_try();
        fn add_try_table();
        fn add_catch();
        fn add_catch_all();
        fn add_delegate();
        fn add_throw();
        fn add_throw_ref();
        fn add_rethrow();
        fn add_branch_null();
        fn add_branch_non_null();
        fn add_branch_cast();
        fn add_branch_cast_fail();

        fn add_drop();
        fn add_select();
        fn get_local(local_index: u32);
        fn set_local(local_index: u32);
        fn tee_local(local_index: u32);
        fn set_global(global_index: u32);

        fn add_table_get();
        fn add_table_set();
        fn add_table_size();
        fn add_table_grow();
        fn add_table_fill();
        fn add_table_copy();
        fn add_table_init();
        fn add_elem_drop();

        fn load();
        fn store();
        fn add_current_memory();
        fn add_grow_memory();
        fn add_memory_fill();
        fn add_memory_copy();
        fn add_memory_init();
        fn add_data_drop();

        fn atomic_load();
        fn atomic_store();
        fn atomic_binary_rmw();
        fn atomic_compare_exchange();
        fn atomic_wait();
        fn atomic_notify();
        fn atomic_fence();

        fn add_i31_get_s();
        fn add_i31_get_u();
        fn add_struct_get();
        fn add_struct_set();
        fn add_array_new_data();
        fn add_array_new_elem();
        fn add_array_get();
        fn add_array_set();
        fn add_array_len();
        fn add_array_fill();
        fn add_array_copy();
        fn add_array_init_data();
        fn add_array_init_elem();
        fn add_ref_test();
        fn add_ref_cast();
        fn add_ref_is_null();
        fn add_ref_as_non_null();
        fn add_ref_eq();

        fn add_i32_eqz();
        fn add_i32_eq();
        fn add_i32_ne();
        fn add_i32_lt_s();
        fn add_i32_lt_u();
        fn add_i32_gt_s();
        fn add_i32_gt_u();
        fn add_i32_le_s();
        fn add_i32_le_u();
        fn add_i32_ge_s();
        fn add_i32_ge_u();
        fn add_i64_eqz();
        fn add_i64_eq();
        fn add_i64_ne();
        fn add_i64_lt_s();
        fn add_i64_lt_u();
        fn add_i64_gt_s();
        fn add_i64_gt_u();
        fn add_i64_le_s();
        fn add_i64_le_u();
        fn add_i64_ge_s();
        fn add_i64_ge_u();
        fn add_f32_eq();
        fn add_f32_ne();
        fn add_f32_lt();
        fn add_f32_gt();
        fn add_f32_le();
        fn add_f32_ge();
        fn add_f64_eq();
        fn add_f64_ne();
        fn add_f64_lt();
        fn add_f64_gt();
        fn add_f64_le();
        fn add_f64_ge();

        fn add_i32_clz();
        fn add_i32_ctz();
        fn add_i32_popcnt();
        fn add_i32_div_s();
        fn add_i32_div_u();
        fn add_i32_rem_s();
        fn add_i32_rem_u();
        fn add_i32_and();
        fn add_i32_or();
        fn add_i32_xor();
        fn add_i32_shl();
        fn add_i32_shr_s();
        fn add_i32_shr_u();
        fn add_i32_rotl();
        fn add_i32_rotr();
        fn add_i64_clz();
        fn add_i64_ctz();
        fn add_i64_popcnt();
        fn add_i64_div_s();
        fn add_i64_div_u();
        fn add_i64_rem_s();
        fn add_i64_rem_u();
        fn add_i64_and();
        fn add_i64_or();
        fn add_i64_xor();
        fn add_i64_shl();
        fn add_i64_shr_s();
        fn add_i64_shr_u();
        fn add_i64_rotl();
        fn add_i64_rotr();

        fn add_f32_abs();
        fn add_f32_neg();
        fn add_f32_ceil();
        fn add_f32_floor();
        fn add_f32_trunc();
        fn add_f32_nearest();
        fn add_f32_sqrt();
        fn add_f32_add();
        fn add_f32_sub();
        fn add_f32_mul();
        fn add_f32_div();
        fn add_f32_min();
        fn add_f32_max();
        fn add_f32_copysign();
        fn add_f64_abs();
        fn add_f64_neg();
        fn add_f64_ceil();
        fn add_f64_floor();
        fn add_f64_trunc();
        fn add_f64_nearest();
        fn add_f64_sqrt();
        fn add_f64_add();
        fn add_f64_sub();
        fn add_f64_mul();
        fn add_f64_div();
        fn add_f64_min();
        fn add_f64_max();
        fn add_f64_copysign();

        fn add_i32_wrap_i64();
        fn add_i32_trunc_f32_s();
        fn add_i32_trunc_f32_u();
        fn add_i32_trunc_f64_s();
        fn add_i32_trunc_f64_u();
        fn add_i64_extend_i32_s();
        fn add_i64_extend_i32_u();
        fn add_i64_trunc_f32_s();
        fn add_i64_trunc_f32_u();
        fn add_i64_trunc_f64_s();
        fn add_i64_trunc_f64_u();
        fn add_f32_convert_i32_s();
        fn add_f32_convert_i32_u();
        fn add_f32_convert_i64_s();
        fn add_f32_convert_i64_u();
        fn add_f32_demote_f64();
        fn add_f64_convert_i32_s();
        fn add_f64_convert_i32_u();
        fn add_f64_convert_i64_s();
        fn add_f64_convert_i64_u();
        fn add_f64_promote_f32();
        fn add_i32_reinterpret_f32();
        fn add_i64_reinterpret_f64();
        fn add_f32_reinterpret_i32();
        fn add_f64_reinterpret_i64();
        fn add_i32_extend8_s();
        fn add_i32_extend16_s();
        fn add_i64_extend8_s();
        fn add_i64_extend16_s();
        fn add_i64_extend32_s();
        fn trunc_saturated();

        fn add_simd_load();
        fn add_simd_store();
        fn add_simd_splat();
        fn add_simd_shuffle();
        fn add_extract_lane();
        fn add_replace_lane();
    }
}
