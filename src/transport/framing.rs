//! Message Framing accounting (C7).
//!
//! This crate doesn't chunk messages itself -- the TCP UA Secure Conversation
//! layer that owns "HEL/ACK/OPN/MSG/CLO" chunk headers is a layer above this
//! one and outside this crate's scope. What lives here is the accounting
//! spec.md asks C7 to own: tracking chunk count and cumulative byte count as
//! a message is assembled or emitted, and turning a limit violation into the
//! standard TCP error code from `error.rs`'s `status` table rather than a
//! generic decode failure.

use crate::error::{self, Error, Result};
use crate::limits::EncodingLimits;

/// Accumulates chunk count and byte count for one message in flight (either
/// direction), enforcing the matching `*_max_nb_chunks` / `*_max_msg_size`
/// caps from [`EncodingLimits`] as each chunk arrives.
#[derive(Debug, Clone, Copy)]
pub struct FrameAccountant {
    max_nb_chunks: u32,
    max_msg_size: u32,
    chunks_so_far: u32,
    bytes_so_far: u64,
}

impl FrameAccountant {
    /// For a message being received.
    pub fn for_receive(limits: &EncodingLimits) -> Self {
        FrameAccountant {
            max_nb_chunks: limits.receive_max_nb_chunks,
            max_msg_size: limits.effective_receive_max_msg_size(),
            chunks_so_far: 0,
            bytes_so_far: 0,
        }
    }

    /// For a message being sent.
    pub fn for_send(limits: &EncodingLimits) -> Self {
        FrameAccountant {
            max_nb_chunks: limits.send_max_nb_chunks,
            max_msg_size: limits.effective_send_max_msg_size(),
            chunks_so_far: 0,
            bytes_so_far: 0,
        }
    }

    /// Register one more chunk of `chunk_len` bytes. Returns the TCP-mapped
    /// error the moment either cap is exceeded, so the caller can abort the
    /// message instead of reading/writing bytes it will have to discard.
    pub fn account_chunk(&mut self, chunk_len: usize) -> Result<()> {
        self.chunks_so_far += 1;
        self.bytes_so_far += chunk_len as u64;

        if self.max_nb_chunks != 0 && self.chunks_so_far > self.max_nb_chunks {
            return Err(too_large("chunk count exceeds the configured limit"));
        }
        if self.max_msg_size != 0 && self.bytes_so_far > self.max_msg_size as u64 {
            return Err(too_large("message size exceeds the configured limit"));
        }
        Ok(())
    }

    pub fn chunks_so_far(&self) -> u32 {
        self.chunks_so_far
    }

    pub fn bytes_so_far(&self) -> u64 {
        self.bytes_so_far
    }
}

fn too_large(message: &str) -> Error {
    log::debug!("framing cap exceeded: {message}");
    Error::encoding(message)
}

/// Map a framing failure to the wire status code a HEL/ACK-style
/// acknowledgement or an ERR message would carry. Every error
/// [`FrameAccountant::account_chunk`] produces is a cap overflow, which maps
/// to `BadTcpMessageTooLarge` specifically -- a more specific code than
/// `Error::to_tcp_status_code`'s generic kind-based table gives, since that
/// table only sees `EncodingError` and has no "too large" kind of its own.
pub fn status_code_for(_err: &Error) -> u32 {
    error::status::BAD_TCP_MESSAGE_TOO_LARGE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_chunks_within_budget() {
        let limits = EncodingLimits::builder()
            .buffer_size(1024)
            .receive_max_nb_chunks(4)
            .receive_max_msg_size(0)
            .build()
            .unwrap();
        let mut acct = FrameAccountant::for_receive(&limits);
        for _ in 0..4 {
            acct.account_chunk(1024).unwrap();
        }
        assert_eq!(acct.chunks_so_far(), 4);
        assert_eq!(acct.bytes_so_far(), 4096);
    }

    #[test]
    fn rejects_chunk_count_over_cap() {
        let limits = EncodingLimits::builder()
            .buffer_size(1024)
            .receive_max_nb_chunks(2)
            .receive_max_msg_size(0)
            .build()
            .unwrap();
        let mut acct = FrameAccountant::for_receive(&limits);
        acct.account_chunk(512).unwrap();
        acct.account_chunk(512).unwrap();
        let err = acct.account_chunk(512).unwrap_err();
        assert_eq!(status_code_for(&err), crate::error::status::BAD_TCP_MESSAGE_TOO_LARGE);
    }

    #[test]
    fn rejects_byte_count_over_cap() {
        let limits = EncodingLimits::builder()
            .buffer_size(1024)
            .receive_max_nb_chunks(0)
            .receive_max_msg_size(2048)
            .build()
            .unwrap();
        let mut acct = FrameAccountant::for_receive(&limits);
        acct.account_chunk(1024).unwrap();
        acct.account_chunk(1024).unwrap();
        assert!(acct.account_chunk(1).is_err());
    }
}
