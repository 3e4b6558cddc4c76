//! Bit layout of references in the 64-bit value slot.
//!
//! ```text
//! 0x0000_0000_0000_0000            null
//! 0xfffe_0000_xxxx_xxxx            i31; low 32 bits hold the sign-extended payload
//! anything else (non-zero)         host object handle
//! ```
//!
//! The host picks its own object handles; the only rule is that they are
//! non-zero and never carry the i31 tag.

use std::fmt;
use std::num::NonZeroU64;

/// Encoded null reference.
pub const NULL_REF: u64 = 0;

/// Upper-bit tag marking an unboxed i31 reference.
pub const I31_TAG: u64 = 0xfffe_0000_0000_0000;

const I31_TAG_MASK: u64 = 0xffff_ffff_0000_0000;

/// Apply the 31-bit boxing rule: drop bit 31, then sign-extend from bit 30.
pub fn wrap_i31(value: i32) -> i32 {
    ((value & 0x7fff_ffff) << 1) >> 1
}

/// Box the low 32 bits of `bits` as an i31 reference.
pub fn encode_i31(bits: u64) -> u64 {
    I31_TAG | u64::from(wrap_i31(bits as u32 as i32) as u32)
}

/// Unbox an i31 reference, or `None` if `bits` is not one.
pub fn decode_i31(bits: u64) -> Option<i32> {
    if bits & I31_TAG_MASK == I31_TAG {
        Some(bits as u32 as i32)
    } else {
        None
    }
}

pub fn is_null(bits: u64) -> bool {
    bits == NULL_REF
}

/// A handle to a host-allocated object (struct, array or function wrapper).
///
/// Non-null by construction, so a host returning one has already satisfied
/// the "non-null, object-typed" requirement on function wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef(NonZeroU64);

impl ObjectRef {
    /// Wrap host handle bits; `None` for null or i31-tagged bits.
    pub fn new(bits: u64) -> Option<Self> {
        if decode_i31(bits).is_some() {
            return None;
        }
        NonZeroU64::new(bits).map(ObjectRef)
    }

    pub fn bits(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj@{:#x}", self.0.get())
    }
}
