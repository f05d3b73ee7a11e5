//! Binary codec (C3): endianness-normalized primitive read/write, a
//! nesting-guarded `Context` threaded through every structural read/write,
//! and array read/write.
//!
//! The two generic traits below are the "generic encode/decode entry point"
//! spec.md §1 says the codec exposes to higher OPC UA service layers.

use std::io::{Read, Write};

use crate::error::{Error, Result};
use crate::limits::EncodingLimits;

pub mod array;
pub mod bytes;
pub mod primitive;

pub use bytes::{ByteString, UaString};

/// Remaining recursion budget threaded through structural encode/decode.
/// Carried by value: every recursive entry point calls
/// [`NestingBudget::enter_struct`] or [`NestingBudget::enter_diag_info`] to
/// obtain the budget for the next level down, and gives up before doing any
/// I/O if the budget is exhausted. The two counters are independent, per
/// spec.md's invariants 4 and 5.
#[derive(Debug, Clone, Copy)]
pub struct NestingBudget {
    struct_remaining: u32,
    diag_info_remaining: u32,
}

impl NestingBudget {
    pub fn new(max_nested_struct: u32, max_nested_diag_info: u32) -> Self {
        NestingBudget {
            struct_remaining: max_nested_struct,
            diag_info_remaining: max_nested_diag_info,
        }
    }

    /// Consume one level of general structural nesting (composites,
    /// Variant, ExtensionObject). Returns the budget to use for the nested
    /// call, or `invalid-state` if the cap was already reached.
    pub fn enter_struct(&self) -> Result<NestingBudget> {
        if self.struct_remaining == 0 {
            return Err(Error::invalid_state(
                "maximum nested structure depth exceeded",
            ));
        }
        Ok(NestingBudget {
            struct_remaining: self.struct_remaining - 1,
            diag_info_remaining: self.diag_info_remaining,
        })
    }

    /// Consume one level of `DiagnosticInfo.inner_diagnostic_info` nesting.
    pub fn enter_diag_info(&self) -> Result<NestingBudget> {
        if self.diag_info_remaining == 0 {
            return Err(Error::invalid_state(
                "maximum nested DiagnosticInfo depth exceeded",
            ));
        }
        Ok(NestingBudget {
            struct_remaining: self.struct_remaining,
            diag_info_remaining: self.diag_info_remaining - 1,
        })
    }
}

/// Everything a structural encode/decode call needs: the active limits and
/// the current nesting budget. Cheap to copy; a fresh child `Context` is
/// created at every recursive entry via [`Context::enter_struct`] /
/// [`Context::enter_diag_info`].
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    limits: &'a EncodingLimits,
    budget: NestingBudget,
}

impl<'a> Context<'a> {
    /// Create a root context with a fresh nesting budget from `limits`.
    pub fn new(limits: &'a EncodingLimits) -> Self {
        Context {
            limits,
            budget: NestingBudget::new(limits.max_nested_struct, limits.max_nested_diag_info),
        }
    }

    pub fn limits(&self) -> &'a EncodingLimits {
        self.limits
    }

    /// Context for one level deeper of general structural nesting.
    pub fn enter_struct(&self) -> Result<Context<'a>> {
        Ok(Context {
            limits: self.limits,
            budget: self.budget.enter_struct()?,
        })
    }

    /// Context for one level deeper of DiagnosticInfo nesting.
    pub fn enter_diag_info(&self) -> Result<Context<'a>> {
        Ok(Context {
            limits: self.limits,
            budget: self.budget.enter_diag_info()?,
        })
    }
}

/// Trait implemented by anything that can be encoded to OPC UA Binary.
///
/// `byte_len` must return a length exactly equal to what `encode` would
/// write, or `encode` must be guaranteed to fail; since `byte_len` is
/// infallible, implementers should avoid depending on it for correctness
/// beyond pre-sizing a buffer.
pub trait BinaryEncode {
    /// Exact byte length `encode` would write for this value.
    fn byte_len(&self, ctx: &Context<'_>) -> usize;

    /// Encode this value onto `stream`.
    fn encode<W: Write + ?Sized>(&self, stream: &mut W, ctx: &Context<'_>) -> Result<()>;

    /// Convenience: encode into a freshly allocated `Vec<u8>`. Prefer
    /// reusing a buffer outside of tests.
    fn encode_to_vec(&self, ctx: &Context<'_>) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.byte_len(ctx));
        self.encode(&mut buf, ctx)?;
        Ok(buf)
    }
}

/// Trait implemented by anything that can be decoded from OPC UA Binary.
///
/// On any partial decode failure, implementers must ensure the caller never
/// observes a half-built value: either the implementation only exposes a
/// concrete `Self` on `Ok`, or (for in-place decode into an existing
/// instance) the target is cleared before the error is returned.
pub trait BinaryDecode: Sized {
    fn decode<R: Read + ?Sized>(stream: &mut R, ctx: &Context<'_>) -> Result<Self>;
}
