//! Process-wide encoding limit record (C5).
//!
//! Grounded on `sopc_toolkit_config_constants.h`'s plain `#define`d constants
//! table, adapted to the idiom spec.md's Design Notes call for: "a write-once
//! cell with a one-way transition from unset to set; readers take a plain
//! immutable reference."

use std::sync::OnceLock;

use crate::constants::{DEFAULT_MAX_NESTED_DIAG_INFO, DEFAULT_MAX_NESTED_STRUCT};
use crate::error::Error;

/// Minimum single-chunk body byte capacity accepted by [`EncodingLimits::validate`],
/// mirroring `SOPC_MIN_BYTE_BUFFER_SIZE_READ_SOCKET`.
pub const MIN_BUFFER_SIZE: u32 = 1024;

/// The process-wide record described in spec.md §4.5. All fields are plain
/// values; `0` for a `*_max_*` field means "unbounded" except where noted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingLimits {
    /// Single-chunk body byte capacity.
    pub buffer_size: u32,
    /// Max chunks reassembled per received message. 0 means unbounded.
    pub receive_max_nb_chunks: u32,
    /// Max bytes per received message. 0 means derive from chunks x buffer.
    pub receive_max_msg_size: u32,
    /// Symmetric send-side chunk cap.
    pub send_max_nb_chunks: u32,
    /// Symmetric send-side byte cap.
    pub send_max_msg_size: u32,
    /// Cap applied in string/ByteString decode.
    pub max_string_length: u32,
    /// Cap applied in array decode.
    pub max_array_length: u32,
    /// Cap applied in DiagnosticInfo recursion.
    pub max_nested_diag_info: u32,
    /// Cap applied to all other composite recursion.
    pub max_nested_struct: u32,
}

impl EncodingLimits {
    /// OPC UA Binary-recommended defaults.
    pub fn standard() -> Self {
        EncodingLimits {
            buffer_size: 64 * 1024,
            receive_max_nb_chunks: 0,
            receive_max_msg_size: 16 * 1024 * 1024,
            send_max_nb_chunks: 0,
            send_max_msg_size: 16 * 1024 * 1024,
            max_string_length: 4 * 1024 * 1024,
            max_array_length: 1024 * 1024,
            max_nested_diag_info: DEFAULT_MAX_NESTED_DIAG_INFO,
            max_nested_struct: DEFAULT_MAX_NESTED_STRUCT,
        }
    }

    /// Start a builder seeded with [`EncodingLimits::standard`].
    pub fn builder() -> EncodingLimitsBuilder {
        EncodingLimitsBuilder {
            limits: Self::standard(),
        }
    }

    /// Re-check the cross-field invariants named in spec.md §4.5. Called by
    /// the builder, and safe to call again on a record built by hand.
    pub fn validate(&self) -> Result<(), Error> {
        if self.buffer_size < MIN_BUFFER_SIZE {
            return Err(Error::invalid_parameters(format!(
                "buffer_size {} is below the minimum chunk size {}",
                self.buffer_size, MIN_BUFFER_SIZE
            )));
        }
        if self.receive_max_nb_chunks == 0 && self.receive_max_msg_size == 0 {
            return Err(Error::invalid_parameters(
                "receive_max_nb_chunks and receive_max_msg_size cannot both be unbounded",
            ));
        }
        if self.send_max_nb_chunks == 0 && self.send_max_msg_size == 0 {
            return Err(Error::invalid_parameters(
                "send_max_nb_chunks and send_max_msg_size cannot both be unbounded",
            ));
        }
        if self.receive_max_msg_size != 0 && self.receive_max_msg_size < self.buffer_size {
            return Err(Error::invalid_parameters(
                "receive_max_msg_size cannot be smaller than buffer_size",
            ));
        }
        if self.send_max_msg_size != 0 && self.send_max_msg_size < self.buffer_size {
            return Err(Error::invalid_parameters(
                "send_max_msg_size cannot be smaller than buffer_size",
            ));
        }
        Ok(())
    }

    /// The byte cap a received message must respect, derived from chunk
    /// count x buffer size when `receive_max_msg_size` is left at 0.
    pub fn effective_receive_max_msg_size(&self) -> u32 {
        if self.receive_max_msg_size != 0 {
            self.receive_max_msg_size
        } else {
            self.receive_max_nb_chunks.saturating_mul(self.buffer_size)
        }
    }

    /// The byte cap a sent message must respect, same derivation as
    /// [`EncodingLimits::effective_receive_max_msg_size`].
    pub fn effective_send_max_msg_size(&self) -> u32 {
        if self.send_max_msg_size != 0 {
            self.send_max_msg_size
        } else {
            self.send_max_nb_chunks.saturating_mul(self.buffer_size)
        }
    }
}

/// Builder for [`EncodingLimits`], finished with [`EncodingLimitsBuilder::build`].
#[derive(Debug, Clone, Copy)]
pub struct EncodingLimitsBuilder {
    limits: EncodingLimits,
}

macro_rules! setter {
    ($name:ident: $ty:ty) => {
        pub fn $name(mut self, value: $ty) -> Self {
            self.limits.$name = value;
            self
        }
    };
}

impl EncodingLimitsBuilder {
    setter!(buffer_size: u32);
    setter!(receive_max_nb_chunks: u32);
    setter!(receive_max_msg_size: u32);
    setter!(send_max_nb_chunks: u32);
    setter!(send_max_msg_size: u32);
    setter!(max_string_length: u32);
    setter!(max_array_length: u32);
    setter!(max_nested_diag_info: u32);
    setter!(max_nested_struct: u32);

    /// Validate and produce the finished record.
    pub fn build(self) -> Result<EncodingLimits, Error> {
        self.limits.validate()?;
        Ok(self.limits)
    }
}

static GLOBAL_LIMITS: OnceLock<EncodingLimits> = OnceLock::new();

/// Set the process-wide limits exactly once. Returns `Err` without mutating
/// state if limits were already set, per spec.md's write-once semantics.
pub fn set_global(limits: EncodingLimits) -> Result<(), Error> {
    limits.validate()?;
    GLOBAL_LIMITS
        .set(limits)
        .map_err(|_| Error::invalid_state("encoding limits were already set"))
}

/// Fetch the process-wide limits, or `None` if [`set_global`] was never
/// called.
pub fn try_global() -> Option<&'static EncodingLimits> {
    GLOBAL_LIMITS.get()
}

/// Fetch the process-wide limits, falling back to [`EncodingLimits::standard`]
/// the first time this is observed (without ever overriding a value set by
/// [`set_global`]). Used by call sites that should work before explicit
/// configuration, e.g. unit tests.
pub fn global_or_standard() -> &'static EncodingLimits {
    GLOBAL_LIMITS.get_or_init(EncodingLimits::standard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_small_buffer() {
        let err = EncodingLimits::builder().buffer_size(10).build().unwrap_err();
        assert_eq!(err.kind(), crate::error::Kind::InvalidParameters);
    }

    #[test]
    fn rejects_doubly_unbounded_receive() {
        let err = EncodingLimits::builder()
            .receive_max_nb_chunks(0)
            .receive_max_msg_size(0)
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::Kind::InvalidParameters);
    }

    #[test]
    fn effective_msg_size_derives_from_chunks() {
        let limits = EncodingLimits::builder()
            .buffer_size(2048)
            .receive_max_nb_chunks(4)
            .receive_max_msg_size(0)
            .build()
            .unwrap();
        assert_eq!(limits.effective_receive_max_msg_size(), 8192);
    }

    #[test]
    fn set_global_is_write_once() {
        // Each test process may run this only effectively once because the
        // cell is truly global; assert the one-way transition behaviour.
        let first = set_global(EncodingLimits::standard());
        let second = set_global(EncodingLimits::standard());
        assert!(first.is_ok() || second.is_err());
        assert!(try_global().is_some());
    }
}
