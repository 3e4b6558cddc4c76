//! Validation and evaluation of WebAssembly constant expressions.
//!
//! A constant expression is the small opcode sequence that initialises a
//! global, an element segment offset, a data segment offset or a table.
//! The same decoder drives two interpreters:
//!
//! - **Validate** ([`validate_constant_expression`]) runs at module-parse
//!   time without an instance. It checks that every opcode is legal, that
//!   globals are in range and immutable, that the result has the expected
//!   type, and collects the `ref.func` targets.
//! - **Evaluate** ([`evaluate_constant_expression`]) runs at instantiation
//!   against a live [`Instance`], allocating GC objects and keeping them
//!   rooted until the result has been computed.
//!
//! Everything else (memory, locals, calls, control flow, most arithmetic)
//! is rejected with [`ConstExprError::InvalidConstantExpression`].

pub mod config;
pub mod decoder;
pub mod evaluate;
pub mod host;
pub mod keep_alive;
pub mod ops;
pub mod resolver;
pub mod validate;

pub use cexpr_types::{
    reference, AllocationKind, CompositeType, ConstExprError, ConstExprResult, ConstExprValue, FieldType,
    GlobalDesc, IndexSpace, ModuleInfo, Mutability, ObjectRef, StackType, StorageType, ValType,
};
pub use config::{ConfigError, ConstExprConfig, Features};
pub use evaluate::{Evaluated, Evaluator};
pub use host::{FieldValue, Instance};
pub use keep_alive::KeepAlive;
pub use ops::{ConstExprOps, Mode};
pub use validate::{DeclaredFunctions, Validator};

use decoder::Decoder;

// ══════════════════════════════════════════════════════════════════════════════
// Validate
// ══════════════════════════════════════════════════════════════════════════════

/// Validate the expression starting at `bytes[offset]`.
///
/// Returns the functions referenced by `ref.func` together with the offset
/// just past the terminating `end`.
pub fn validate_constant_expression(
    bytes: &[u8],
    offset: usize,
    info: &ModuleInfo,
    expected: ValType,
) -> ConstExprResult<DeclaredFunctions> {
    validate_constant_expression_with_config(bytes, offset, info, expected, &ConstExprConfig::default())
}

pub fn validate_constant_expression_with_config(
    bytes: &[u8],
    offset: usize,
    info: &ModuleInfo,
    expected: ValType,
    config: &ConstExprConfig,
) -> ConstExprResult<DeclaredFunctions> {
    tracing::debug!(offset, ?expected, "validating constant expression");
    let decoded = Decoder::new(bytes, offset, info, config, Validator::new(info))?
        .run(expected)
        .inspect_err(|err| tracing::debug!(%err, "constant expression rejected"))?;
    let declared = decoded.ops.into_declared_functions(decoded.end_offset);
    tracing::debug!(
        end_offset = declared.end_offset(),
        declared = declared.len(),
        "constant expression is valid"
    );
    Ok(declared)
}

/// Validate, record every `ref.func` target in `info`, and return the
/// offset just past `end`.
pub fn validate_and_declare(
    bytes: &[u8],
    offset: usize,
    info: &mut ModuleInfo,
    expected: ValType,
) -> ConstExprResult<usize> {
    let declared = validate_constant_expression(bytes, offset, info, expected)?;
    info.declare_functions(declared.indices().iter().copied());
    Ok(declared.end_offset())
}

// ══════════════════════════════════════════════════════════════════════════════
// Evaluate
// ══════════════════════════════════════════════════════════════════════════════

/// Evaluate an already validated expression and return its 64-bit result.
///
/// Objects created along the way are rooted only until this returns; use
/// [`evaluate_rooted`] to keep them alive longer.
///
/// # Panics
///
/// Panics if the expression produces a `v128`.
pub fn evaluate_constant_expression<I: Instance>(
    bytes: &[u8],
    instance: &mut I,
    info: &ModuleInfo,
    expected: ValType,
) -> ConstExprResult<u64> {
    evaluate_constant_expression_with_config(bytes, instance, info, expected, &ConstExprConfig::default())
}

pub fn evaluate_constant_expression_with_config<I: Instance>(
    bytes: &[u8],
    instance: &mut I,
    info: &ModuleInfo,
    expected: ValType,
    config: &ConstExprConfig,
) -> ConstExprResult<u64> {
    let evaluated = evaluate_rooted(bytes, instance, info, expected, config)?;
    Ok(evaluated.bits())
}

/// Evaluate and hand back the result together with its temporary roots.
pub fn evaluate_rooted<I: Instance>(
    bytes: &[u8],
    instance: &mut I,
    info: &ModuleInfo,
    expected: ValType,
    config: &ConstExprConfig,
) -> ConstExprResult<Evaluated<I::Root>> {
    tracing::debug!(len = bytes.len(), ?expected, "evaluating constant expression");
    let decoded = Decoder::new(bytes, 0, info, config, Evaluator::new(info, instance))?
        .run(expected)
        .inspect_err(|err| tracing::debug!(%err, "constant expression evaluation failed"))?;
    let evaluated = decoded.ops.finish_with(decoded.value);
    tracing::debug!(value = ?evaluated.value(), rooted = evaluated.rooted(), "constant expression evaluated");
    Ok(evaluated)
}
