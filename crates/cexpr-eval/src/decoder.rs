//! Opcode decoding and dispatch.
//!
//! Reads operators with `wasmparser`, keeps a typed operand stack, and hands
//! each opcode to a [`ConstExprOps`] implementation. The stack is typed only
//! coarsely (see [`StackType`]); anything finer is the job of full module
//! validation.

use cexpr_types::{
    ConstExprError, ConstExprResult, ConstExprValue, ModuleInfo, StackType, ValType,
};
use wasmparser::{BinaryReader, ConstExpr, Operator, OperatorsReader};

use crate::config::{ConstExprConfig, Features};
use crate::ops::ConstExprOps;
use crate::resolver::Resolver;

/// What a successful run leaves behind.
pub struct Decoded<O> {
    pub value: ConstExprValue,
    /// Absolute offset just past the terminating `end`.
    pub end_offset: usize,
    pub ops: O,
}

pub struct Decoder<'a, O> {
    reader: OperatorsReader<'a>,
    resolver: Resolver<'a>,
    features: Features,
    stack: Vec<(StackType, ConstExprValue)>,
    ops: O,
}

impl<'a, O: ConstExprOps> Decoder<'a, O> {
    /// Decode the expression starting at `bytes[offset]`. Offsets in errors
    /// are absolute positions in `bytes`.
    pub fn new(
        bytes: &'a [u8],
        offset: usize,
        info: &'a ModuleInfo,
        config: &ConstExprConfig,
        ops: O,
    ) -> ConstExprResult<Self> {
        let body = bytes.get(offset..).ok_or_else(|| ConstExprError::Malformed {
            offset,
            message: format!("expression starts past the end of the input ({} bytes)", bytes.len()),
        })?;
        Ok(Self {
            reader: ConstExpr::new(BinaryReader::new(body, offset)).get_operators_reader(),
            resolver: Resolver::new(info),
            features: config.features,
            stack: Vec::new(),
            ops,
        })
    }

    pub fn run(mut self, expected: ValType) -> ConstExprResult<Decoded<O>> {
        loop {
            let (op, offset) = self.reader.read_with_offset()?;
            self.ops.set_offset(offset);
            tracing::trace!(offset, mode = ?self.ops.mode(), ?op, depth = self.stack.len(), "decoded operator");
            self.ops.did_parse_opcode(&op);
            if let Operator::End = op {
                return self.end(expected);
            }
            self.dispatch(op)?;
        }
    }

    fn end(mut self, expected: ValType) -> ConstExprResult<Decoded<O>> {
        let offset = self.ops.offset();
        // A disallowed opcode outranks any stack shape problem.
        if self.ops.cursor().saw_disallowed_opcode() {
            return Err(self.ops.reject());
        }
        if self.stack.len() != 1 {
            return Err(ConstExprError::StackHeight {
                offset,
                expected: 1,
                found: self.stack.len(),
            });
        }
        let expected = StackType::of(expected);
        let found = self.stack[0].0;
        if found != expected {
            return Err(ConstExprError::TypeMismatch {
                offset,
                expected,
                found,
            });
        }
        let end_offset = self.reader.original_position();
        let values = self.stack.into_iter().map(|(_, value)| value).collect();
        let value = self.ops.finish(values)?;
        Ok(Decoded {
            value,
            end_offset,
            ops: self.ops,
        })
    }

    // ── Stack ────────────────────────────────────────────────────────────

    fn push(&mut self, ty: StackType, value: ConstExprValue) {
        self.stack.push((ty, value));
    }

    fn produce(&mut self, ty: StackType, value: ConstExprResult<ConstExprValue>) -> ConstExprResult<()> {
        let value = value?;
        self.push(ty, value);
        Ok(())
    }

    fn pop(&mut self, expected: StackType) -> ConstExprResult<ConstExprValue> {
        let offset = self.ops.offset();
        let (found, value) = self.stack.pop().ok_or(ConstExprError::StackHeight {
            offset,
            expected: 1,
            found: 0,
        })?;
        if found != expected {
            return Err(ConstExprError::TypeMismatch {
                offset,
                expected,
                found,
            });
        }
        Ok(value)
    }

    /// Pop `count` operands of type `ty`, returned bottom-first.
    fn pop_n(&mut self, ty: StackType, count: usize) -> ConstExprResult<Vec<ConstExprValue>> {
        if count > self.stack.len() {
            return Err(ConstExprError::StackHeight {
                offset: self.ops.offset(),
                expected: count,
                found: self.stack.len(),
            });
        }
        let mut values = vec![ConstExprValue::default(); count];
        for slot in values.iter_mut().rev() {
            *slot = self.pop(ty)?;
        }
        Ok(values)
    }

    fn require(&self, enabled: bool) -> ConstExprResult<()> {
        if enabled {
            Ok(())
        } else {
            Err(self.ops.reject())
        }
    }

    // ── Dispatch ─────────────────────────────────────────────────────────

    fn binary(
        &mut self,
        ty: StackType,
        apply: fn(&mut O, ConstExprValue, ConstExprValue) -> ConstExprResult<ConstExprValue>,
    ) -> ConstExprResult<()> {
        self.require(self.features.extended_const)?;
        let rhs = self.pop(ty)?;
        let lhs = self.pop(ty)?;
        let result = apply(&mut self.ops, lhs, rhs);
        self.produce(ty, result)
    }

    fn dispatch(&mut self, op: Operator<'a>) -> ConstExprResult<()> {
        match op {
            // Supported
            Operator::Nop => Ok(()),
            Operator::I32Const { value } => {
                let value = self.ops.add_constant(StackType::I32, u64::from(value as u32));
                self.produce(StackType::I32, Ok(value))
            }
            Operator::I64Const { value } => {
                let value = self.ops.add_constant(StackType::I64, value as u64);
                self.produce(StackType::I64, Ok(value))
            }
            Operator::F32Const { value } => {
                let value = self.ops.add_constant(StackType::F32, u64::from(value.bits()));
                self.produce(StackType::F32, Ok(value))
            }
            Operator::F64Const { value } => {
                let value = self.ops.add_constant(StackType::F64, value.bits());
                self.produce(StackType::F64, Ok(value))
            }
            Operator::V128Const { value } => {
                self.require(self.features.simd)?;
                let value = self.ops.add_vector_constant(value.i128() as u128);
                self.produce(StackType::V128, Ok(value))
            }
            Operator::RefNull { .. } => {
                let value = self.ops.add_constant(StackType::Ref, 0);
                self.produce(StackType::Ref, Ok(value))
            }
            Operator::GlobalGet { global_index } => {
                let value = self.ops.get_global(global_index)?;
                let global = self.resolver.global(global_index, self.ops.offset())?;
                self.produce(StackType::of(global.ty), Ok(value))
            }
            Operator::RefFunc { function_index } => {
                let value = self.ops.add_ref_func(function_index);
                self.produce(StackType::Ref, value)
            }

            Operator::I32Add => self.binary(StackType::I32, O::add_i32_add),
            Operator::I32Sub => self.binary(StackType::I32, O::add_i32_sub),
            Operator::I32Mul => self.binary(StackType::I32, O::add_i32_mul),
            Operator::I64Add => self.binary(StackType::I64, O::add_i64_add),
            Operator::I64Sub => self.binary(StackType::I64, O::add_i64_sub),
            Operator::I64Mul => self.binary(StackType::I64, O::add_i64_mul),

            Operator::RefI31 => {
                self.require(self.features.gc)?;
                let operand = self.pop(StackType::I32)?;
                let value = self.ops.add_ref_i31(operand);
                self.produce(StackType::Ref, value)
            }
            Operator::AnyConvertExtern => {
                self.require(self.features.gc)?;
                let operand = self.pop(StackType::Ref)?;
                let value = self.ops.add_any_convert_extern(operand);
                self.produce(StackType::Ref, value)
            }
            Operator::ExternConvertAny => {
                self.require(self.features.gc)?;
                let operand = self.pop(StackType::Ref)?;
                let value = self.ops.add_extern_convert_any(operand);
                self.produce(StackType::Ref, value)
            }
            Operator::StructNew { struct_type_index } => {
                self.require(self.features.gc)?;
                let fields = self.resolver.struct_type(struct_type_index, self.ops.offset())?;
                let mut args = vec![ConstExprValue::default(); fields.len()];
                for (slot, field) in args.iter_mut().zip(fields).rev() {
                    *slot = self.pop(StackType::of_storage(field.storage))?;
                }
                let value = self.ops.add_struct_new(struct_type_index, &args);
                self.produce(StackType::Ref, value)
            }
            Operator::StructNewDefault { struct_type_index } => {
                self.require(self.features.gc)?;
                let value = self.ops.add_struct_new_default(struct_type_index);
                self.produce(StackType::Ref, value)
            }
            Operator::ArrayNew { array_type_index } => {
                self.require(self.features.gc)?;
                let element = self.resolver.array_type(array_type_index, self.ops.offset())?;
                let size = self.pop(StackType::I32)?;
                let init = self.pop(StackType::of_storage(element.storage))?;
                let value = self.ops.add_array_new(array_type_index, size, init);
                self.produce(StackType::Ref, value)
            }
            Operator::ArrayNewDefault { array_type_index } => {
                self.require(self.features.gc)?;
                self.resolver.array_type(array_type_index, self.ops.offset())?;
                let size = self.pop(StackType::I32)?;
                let value = self.ops.add_array_new_default(array_type_index, size);
                self.produce(StackType::Ref, value)
            }
            Operator::ArrayNewFixed {
                array_type_index,
                array_size,
            } => {
                self.require(self.features.gc)?;
                let element = self.resolver.array_type(array_type_index, self.ops.offset())?;
                let args = self.pop_n(StackType::of_storage(element.storage), array_size as usize)?;
                let value = self.ops.add_array_new_fixed(array_type_index, &args);
                self.produce(StackType::Ref, value)
            }

            // Control
            Operator::Unreachable => self.ops.add_unreachable(),
            Operator::Block { .. } => self.ops.add_block(),
            Operator::Loop { .. } => self.ops.add_loop(),
            Operator::If { .. } => self.ops.add_if(),
            Operator::Else => self.ops.add_else(),
            Operator::Br { relative_depth } => self.ops.add_branch(relative_depth),
            Operator::BrIf { relative_depth } => self.ops.add_branch_if(relative_depth),
            Operator::BrTable { .. } => self.ops.add_switch(),
            Operator::Return => self.ops.add_return(),
            Operator::Call { function_index } => self.ops.add_call(function_index),
            Operator::CallIndirect { .. } => self.ops.add_call_indirect(),
            Operator::CallRef { .. } => self.ops.add_call_ref(),
            Operator::ReturnCall { function_index } => self.ops.add_return_call(function_index),
            Operator::ReturnCallIndirect { .. } => self.ops.add_return_call_indirect(),
            Operator::ReturnCallRef { .. } => self.ops.add_return_call_ref(),
            Operator::Try { .. } => self.ops.add_try(),
            Operator::TryTable { .. } => self.ops.add_try_table(),
            Operator::Catch { .. } => self.ops.add_catch(),
            Operator::CatchAll => self.ops.add_catch_all(),
            Operator::Delegate { .. } => self.ops.add_delegate(),
            Operator::Throw { .. } => self.ops.add_throw(),
            Operator::ThrowRef => self.ops.add_throw_ref(),
            Operator::Rethrow { .. } => self.ops.add_rethrow(),
            Operator::BrOnNull { .. } => self.ops.add_branch_null(),
            Operator::BrOnNonNull { .. } => self.ops.add_branch_non_null(),
            Operator::BrOnCast { .. } => self.ops.add_branch_cast(),
            Operator::BrOnCastFail { .. } => self.ops.add_branch_cast_fail(),

            // Parametric & variables
            Operator::Drop => self.ops.add_drop(),
            Operator::Select | Operator::TypedSelect { .. } => self.ops.add_select(),
            Operator::LocalGet { local_index } => self.ops.get_local(local_index),
            Operator::LocalSet { local_index } => self.ops.set_local(local_index),
            Operator::LocalTee { local_index } => self.ops.tee_local(local_index),
            Operator::GlobalSet { global_index } => self.ops.set_global(global_index),

            // Tables
            Operator::TableGet { .. } => self.ops.add_table_get(),
            Operator::TableSet { .. } => self.ops.add_table_set(),
            Operator::TableSize { .. } => self.ops.add_table_size(),
            Operator::TableGrow { .. } => self.ops.add_table_grow(),
            Operator::TableFill { .. } => self.ops.add_table_fill(),
            Operator::TableCopy { .. } => self.ops.add_table_copy(),
            Operator::TableInit { .. } => self.ops.add_table_init(),
            Operator::ElemDrop { .. } => self.ops.add_elem_drop(),

            // Memory
            Operator::I32Load { .. }
            | Operator::I64Load { .. }
            | Operator::F32Load { .. }
            | Operator::F64Load { .. }
            | Operator::I32Load8S { .. }
            | Operator::I32Load8U { .. }
            | Operator::I32Load16S { .. }
            | Operator::I32Load16U { .. }
            | Operator::I64Load8S { .. }
            | Operator::I64Load8U { .. }
            | Operator::I64Load16S { .. }
            | Operator::I64Load16U { .. }
            | Operator::I64Load32S { .. }
            | Operator::I64Load32U { .. } => self.ops.load(),
            Operator::I32Store { .. }
            | Operator::I64Store { .. }
            | Operator::F32Store { .. }
            | Operator::F64Store { .. }
            | Operator::I32Store8 { .. }
            | Operator::I32Store16 { .. }
            | Operator::I64Store8 { .. }
            | Operator::I64Store16 { .. }
            | Operator::I64Store32 { .. } => self.ops.store(),
            Operator::MemorySize { .. } => self.ops.add_current_memory(),
            Operator::MemoryGrow { .. } => self.ops.add_grow_memory(),
            Operator::MemoryFill { .. } => self.ops.add_memory_fill(),
            Operator::MemoryCopy { .. } => self.ops.add_memory_copy(),
            Operator::MemoryInit { .. } => self.ops.add_memory_init(),
            Operator::DataDrop { .. } => self.ops.add_data_drop(),

            // Atomics
            Operator::I32AtomicLoad { .. } | Operator::I64AtomicLoad { .. } => self.ops.atomic_load(),
            Operator::I32AtomicStore { .. } | Operator::I64AtomicStore { .. } => self.ops.atomic_store(),
            Operator::I32AtomicRmwAdd { .. } | Operator::I64AtomicRmwAdd { .. } => {
                self.ops.atomic_binary_rmw()
            }
            Operator::I32AtomicRmwCmpxchg { .. } | Operator::I64AtomicRmwCmpxchg { .. } => {
                self.ops.atomic_compare_exchange()
            }
            Operator::MemoryAtomicWait32 { .. } | Operator::MemoryAtomicWait64 { .. } => {
                self.ops.atomic_wait()
            }
            Operator::MemoryAtomicNotify { .. } => self.ops.atomic_notify(),
            Operator::AtomicFence { .. } => self.ops.atomic_fence(),

            // GC accessors
            Operator::I31GetS => self.ops.add_i31_get_s(),
            Operator::I31GetU => self.ops.add_i31_get_u(),
            Operator::StructGet { .. } | Operator::StructGetS { .. } | Operator::StructGetU { .. } => {
                self.ops.add_struct_get()
            }
            Operator::StructSet { .. } => self.ops.add_struct_set(),
            Operator::ArrayNewData { .. } => self.ops.add_array_new_data(),
            Operator::ArrayNewElem { .. } => self.ops.add_array_new_elem(),
            Operator::ArrayGet { .. } | Operator::ArrayGetS { .. } | Operator::ArrayGetU { .. } => {
                self.ops.add_array_get()
            }
            Operator::ArraySet { .. } => self.ops.add_array_set(),
            Operator::ArrayLen => self.ops.add_array_len(),
            Operator::ArrayFill { .. } => self.ops.add_array_fill(),
            Operator::ArrayCopy { .. } => self.ops.add_array_copy(),
            Operator::ArrayInitData { .. } => self.ops.add_array_init_data(),
            Operator::ArrayInitElem { .. } => self.ops.add_array_init_elem(),
            Operator::RefTestNonNull { .. } | Operator::RefTestNullable { .. } => self.ops.add_ref_test(),
            Operator::RefCastNonNull { .. } | Operator::RefCastNullable { .. } => self.ops.add_ref_cast(),
            Operator::RefIsNull => self.ops.add_ref_is_null(),
            Operator::RefAsNonNull => self.ops.add_ref_as_non_null(),
            Operator::RefEq => self.ops.add_ref_eq(),

            // Comparisons
            Operator::I32Eqz => self.ops.add_i32_eqz(),
            Operator::I32Eq => self.ops.add_i32_eq(),
            Operator::I32Ne => self.ops.add_i32_ne(),
            Operator::I32LtS => self.ops.add_i32_lt_s(),
            Operator::I32LtU => self.ops.add_i32_lt_u(),
            Operator::I32GtS => self.ops.add_i32_gt_s(),
            Operator::I32GtU => self.ops.add_i32_gt_u(),
            Operator::I32LeS => self.ops.add_i32_le_s(),
            Operator::I32LeU => self.ops.add_i32_le_u(),
            Operator::I32GeS => self.ops.add_i32_ge_s(),
            Operator::I32GeU => self.ops.add_i32_ge_u(),
            Operator::I64Eqz => self.ops.add_i64_eqz(),
            Operator::I64Eq => self.ops.add_i64_eq(),
            Operator::I64Ne => self.ops.add_i64_ne(),
            Operator::I64LtS => self.ops.add_i64_lt_s(),
            Operator::I64LtU => self.ops.add_i64_lt_u(),
            Operator::I64GtS => self.ops.add_i64_gt_s(),
            Operator::I64GtU => self.ops.add_i64_gt_u(),
            Operator::I64LeS => self.ops.add_i64_le_s(),
            Operator::I64LeU => self.ops.add_i64_le_u(),
            Operator::I64GeS => self.ops.add_i64_ge_s(),
            Operator::I64GeU => self.ops.add_i64_ge_u(),
            Operator::F32Eq => self.ops.add_f32_eq(),
            Operator::F32Ne => self.ops.add_f32_ne(),
            Operator::F32Lt => self.ops.add_f32_lt(),
            Operator::F32Gt => self.ops.add_f32_gt(),
            Operator::F32Le => self.ops.add_f32_le(),
            Operator::F32Ge => self.ops.add_f32_ge(),
            Operator::F64Eq => self.ops.add_f64_eq(),
            Operator::F64Ne => self.ops.add_f64_ne(),
            Operator::F64Lt => self.ops.add_f64_lt(),
            Operator::F64Gt => self.ops.add_f64_gt(),
            Operator::F64Le => self.ops.add_f64_le(),
            Operator::F64Ge => self.ops.add_f64_ge(),

            // Integer arithmetic outside extended-const
            Operator::I32Clz => self.ops.add_i32_clz(),
            Operator::I32Ctz => self.ops.add_i32_ctz(),
            Operator::I32Popcnt => self.ops.add_i32_popcnt(),
            Operator::I32DivS => self.ops.add_i32_div_s(),
            Operator::I32DivU => self.ops.add_i32_div_u(),
            Operator::I32RemS => self.ops.add_i32_rem_s(),
            Operator::I32RemU => self.ops.add_i32_rem_u(),
            Operator::I32And => self.ops.add_i32_and(),
            Operator::I32Or => self.ops.add_i32_or(),
            Operator::I32Xor => self.ops.add_i32_xor(),
            Operator::I32Shl => self.ops.add_i32_shl(),
            Operator::I32ShrS => self.ops.add_i32_shr_s(),
            Operator::I32ShrU => self.ops.add_i32_shr_u(),
            Operator::I32Rotl => self.ops.add_i32_rotl(),
            Operator::I32Rotr => self.ops.add_i32_rotr(),
            Operator::I64Clz => self.ops.add_i64_clz(),
            Operator::I64Ctz => self.ops.add_i64_ctz(),
            Operator::I64Popcnt => self.ops.add_i64_popcnt(),
            Operator::I64DivS => self.ops.add_i64_div_s(),
            Operator::I64DivU => self.ops.add_i64_div_u(),
            Operator::I64RemS => self.ops.add_i64_rem_s(),
            Operator::I64RemU => self.ops.add_i64_rem_u(),
            Operator::I64And => self.ops.add_i64_and(),
            Operator::I64Or => self.ops.add_i64_or(),
            Operator::I64Xor => self.ops.add_i64_xor(),
            Operator::I64Shl => self.ops.add_i64_shl(),
            Operator::I64ShrS => self.ops.add_i64_shr_s(),
            Operator::I64ShrU => self.ops.add_i64_shr_u(),
            Operator::I64Rotl => self.ops.add_i64_rotl(),
            Operator::I64Rotr => self.ops.add_i64_rotr(),

            // Float arithmetic
            Operator::F32Abs => self.ops.add_f32_abs(),
            Operator::F32Neg => self.ops.add_f32_neg(),
            Operator::F32Ceil => self.ops.add_f32_ceil(),
            Operator::F32Floor => self.ops.add_f32_floor(),
            Operator::F32Trunc => self.ops.add_f32_trunc(),
            Operator::F32Nearest => self.ops.add_f32_nearest(),
            Operator::F32Sqrt => self.ops.add_f32_sqrt(),
            Operator::F32Add => self.ops.add_f32_add(),
            Operator::F32Sub => self.ops.add_f32_sub(),
            Operator::F32Mul => self.ops.add_f32_mul(),
            Operator::F32Div => self.ops.add_f32_div(),
            Operator::F32Min => self.ops.add_f32_min(),
            Operator::F32Max => self.ops.add_f32_max(),
            Operator::F32Copysign => self.ops.add_f32_copysign(),
            Operator::F64Abs => self.ops.add_f64_abs(),
            Operator::F64Neg => self.ops.add_f64_neg(),
            Operator::F64Ceil => self.ops.add_f64_ceil(),
            Operator::F64Floor => self.ops.add_f64_floor(),
            Operator::F64Trunc => self.ops.add_f64_trunc(),
            Operator::F64Nearest => self.ops.add_f64_nearest(),
            Operator::F64Sqrt => self.ops.add_f64_sqrt(),
            Operator::F64Add => self.ops.add_f64_add(),
            Operator::F64Sub => self.ops.add_f64_sub(),
            Operator::F64Mul => self.ops.add_f64_mul(),
            Operator::F64Div => self.ops.add_f64_div(),
            Operator::F64Min => self.ops.add_f64_min(),
            Operator::F64Max => self.ops.add_f64_max(),
            Operator::F64Copysign => self.ops.add_f64_copysign(),

            // Conversions
            Operator::I32WrapI64 => self.ops.add_i32_wrap_i64(),
            Operator::I32TruncF32S => self.ops.add_i32_trunc_f32_s(),
            Operator::I32TruncF32U => self.ops.add_i32_trunc_f32_u(),
            Operator::I32TruncF64S => self.ops.add_i32_trunc_f64_s(),
            Operator::I32TruncF64U => self.ops.add_i32_trunc_f64_u(),
            Operator::I64ExtendI32S => self.ops.add_i64_extend_i32_s(),
            Operator::I64ExtendI32U => self.ops.add_i64_extend_i32_u(),
            Operator::I64TruncF32S => self.ops.add_i64_trunc_f32_s(),
            Operator::I64TruncF32U => self.ops.add_i64_trunc_f32_u(),
            Operator::I64TruncF64S => self.ops.add_i64_trunc_f64_s(),
            Operator::I64TruncF64U => self.ops.add_i64_trunc_f64_u(),
            Operator::F32ConvertI32S => self.ops.add_f32_convert_i32_s(),
            Operator::F32ConvertI32U => self.ops.add_f32_convert_i32_u(),
            Operator::F32ConvertI64S => self.ops.add_f32_convert_i64_s(),
            Operator::F32ConvertI64U => self.ops.add_f32_convert_i64_u(),
            Operator::F32DemoteF64 => self.ops.add_f32_demote_f64(),
            Operator::F64ConvertI32S => self.ops.add_f64_convert_i32_s(),
            Operator::F64ConvertI32U => self.ops.add_f64_convert_i32_u(),
            Operator::F64ConvertI64S => self.ops.add_f64_convert_i64_s(),
            Operator::F64ConvertI64U => self.ops.add_f64_convert_i64_u(),
            Operator::F64PromoteF32 => self.ops.add_f64_promote_f32(),
            Operator::I32ReinterpretF32 => self.ops.add_i32_reinterpret_f32(),
            Operator::I64ReinterpretF64 => self.ops.add_i64_reinterpret_f64(),
            Operator::F32ReinterpretI32 => self.ops.add_f32_reinterpret_i32(),
            Operator::F64ReinterpretI64 => self.ops.add_f64_reinterpret_i64(),
            Operator::I32Extend8S => self.ops.add_i32_extend8_s(),
            Operator::I32Extend16S => self.ops.add_i32_extend16_s(),
            Operator::I64Extend8S => self.ops.add_i64_extend8_s(),
            Operator::I64Extend16S => self.ops.add_i64_extend16_s(),
            Operator::I64Extend32S => self.ops.add_i64_extend32_s(),
            Operator::I32TruncSatF32S
            | Operator::I32TruncSatF32U
            | Operator::I32TruncSatF64S
            | Operator::I32TruncSatF64U
            | Operator::I64TruncSatF32S
            | Operator::I64TruncSatF32U
            | Operator::I64TruncSatF64S
            | Operator::I64TruncSatF64U => self.ops.trunc_saturated(),

            // SIMD
            Operator::V128Load { .. } => self.ops.add_simd_load(),
            Operator::V128Store { .. } => self.ops.add_simd_store(),
            Operator::I8x16Splat
            | Operator::I16x8Splat
            | Operator::I32x4Splat
            | Operator::I64x2Splat
            | Operator::F32x4Splat
            | Operator::F64x2Splat => self.ops.add_simd_splat(),
            Operator::I8x16Shuffle { .. } => self.ops.add_simd_shuffle(),
            Operator::I8x16ExtractLaneS { .. }
            | Operator::I8x16ExtractLaneU { .. }
            | Operator::I16x8ExtractLaneS { .. }
            | Operator::I16x8ExtractLaneU { .. }
            | Operator::I32x4ExtractLane { .. }
            | Operator::I64x2ExtractLane { .. }
            | Operator::F32x4ExtractLane { .. }
            | Operator::F64x2ExtractLane { .. } => self.ops.add_extract_lane(),
            Operator::I8x16ReplaceLane { .. }
            | Operator::I16x8ReplaceLane { .. }
            | Operator::I32x4ReplaceLane { .. }
            | Operator::I64x2ReplaceLane { .. }
            | Operator::F32x4ReplaceLane { .. }
            | Operator::F64x2ReplaceLane { .. } => self.ops.add_replace_lane(),

            _ => self.ops.unsupported(),
        }
    }
}
