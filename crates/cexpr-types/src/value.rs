//! The value model for constant expressions.
//!
//! Every value a constant expression can produce fits in one of four shapes:
//!
//! | Variant     | Payload   | Produced by                                        |
//! |-------------|-----------|----------------------------------------------------|
//! | `Invalid`   | none      | a failed host allocation                           |
//! | `Numeric`   | `u64`     | `*.const`, `global.get`, `ref.null`, arithmetic    |
//! | `Vector`    | `u128`    | `v128.const`, `global.get` of a `v128` global      |
//! | `Reference` | `u64`     | `ref.func`, `ref.i31`, `struct.new*`, `array.new*` |
//!
//! `Numeric` and `Reference` share the same 64-bit slot but are tagged
//! apart, so arithmetic can never be applied to a host handle by accident.
//! See [`crate::reference`] for how reference bits are laid out.

use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A value produced while running a constant expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstExprValue {
    /// Allocation or evaluation failed; carries nothing.
    Invalid,
    /// A raw 64-bit pattern: i32/i64/f32/f64 bits or an encoded reference
    /// that came from `ref.null` or a global.
    Numeric(u64),
    /// A 128-bit SIMD constant.
    Vector(u128),
    /// A host reference handle (object, function wrapper or boxed i31).
    Reference(u64),
}

/// The tag of a [`ConstExprValue`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Invalid,
    Numeric,
    Vector,
    Reference,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Invalid => "invalid",
            ValueKind::Numeric => "numeric",
            ValueKind::Vector => "vector",
            ValueKind::Reference => "reference",
        };
        f.write_str(name)
    }
}

impl ConstExprValue {
    pub fn from_numeric(bits: u64) -> Self {
        ConstExprValue::Numeric(bits)
    }

    pub fn from_vector(bits: u128) -> Self {
        ConstExprValue::Vector(bits)
    }

    pub fn from_reference(bits: u64) -> Self {
        ConstExprValue::Reference(bits)
    }

    /// An `i32` stored zero-extended in the numeric slot.
    pub fn from_i32(value: i32) -> Self {
        ConstExprValue::Numeric(u64::from(value as u32))
    }

    pub fn from_i64(value: i64) -> Self {
        ConstExprValue::Numeric(value as u64)
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            ConstExprValue::Invalid => ValueKind::Invalid,
            ConstExprValue::Numeric(_) => ValueKind::Numeric,
            ConstExprValue::Vector(_) => ValueKind::Vector,
            ConstExprValue::Reference(_) => ValueKind::Reference,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ConstExprValue::Invalid)
    }

    /// The 64-bit payload of a `Numeric` or `Reference` value.
    ///
    /// # Panics
    ///
    /// Panics on `Invalid` and `Vector`; reaching that arm means the decoder
    /// handed the interpreter an operand of the wrong shape.
    pub fn numeric_bits(&self) -> u64 {
        match *self {
            ConstExprValue::Numeric(bits) | ConstExprValue::Reference(bits) => bits,
            other => panic!("invalid operand type: expected a 64-bit value, got {}", other.kind()),
        }
    }

    /// The 128-bit payload of a `Vector` value.
    ///
    /// # Panics
    ///
    /// Panics on every other variant.
    pub fn vector_bits(&self) -> u128 {
        match *self {
            ConstExprValue::Vector(bits) => bits,
            other => panic!("invalid operand type: expected a vector, got {}", other.kind()),
        }
    }

    /// Keep only the low 32 bits of a `Numeric` value.
    ///
    /// `i32` arithmetic runs on the full 64-bit slot and is truncated
    /// afterwards, which is the same as wrapping modulo 2^32.
    pub fn truncate_to_i32(self) -> Self {
        ConstExprValue::Numeric(u64::from(self.expect_numeric("i32 truncation") as u32))
    }

    fn expect_numeric(&self, op: &str) -> u64 {
        match *self {
            ConstExprValue::Numeric(bits) => bits,
            other => panic!("invalid operand type: {op} requires a numeric value, got {}", other.kind()),
        }
    }
}

impl Default for ConstExprValue {
    fn default() -> Self {
        ConstExprValue::Numeric(0)
    }
}

impl Add for ConstExprValue {
    type Output = ConstExprValue;

    fn add(self, rhs: Self) -> Self::Output {
        let lhs = self.expect_numeric("add");
        ConstExprValue::Numeric(lhs.wrapping_add(rhs.expect_numeric("add")))
    }
}

impl Sub for ConstExprValue {
    type Output = ConstExprValue;

    fn sub(self, rhs: Self) -> Self::Output {
        let lhs = self.expect_numeric("sub");
        ConstExprValue::Numeric(lhs.wrapping_sub(rhs.expect_numeric("sub")))
    }
}

impl Mul for ConstExprValue {
    type Output = ConstExprValue;

    fn mul(self, rhs: Self) -> Self::Output {
        let lhs = self.expect_numeric("mul");
        ConstExprValue::Numeric(lhs.wrapping_mul(rhs.expect_numeric("mul")))
    }
}
