//! Error types for Daence operations

use thiserror::Error;

/// Errors from sealing, opening, or constructing a Daence cipher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DaenceError {
    /// Key blob does not match the construction's key size
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Required key length in bytes
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// A nonce was supplied to a construction that takes none
    #[error("nonempty nonce passed to a nonce-less cipher: {len} bytes")]
    NonEmptyNonce {
        /// Length of the rejected nonce
        len: usize,
    },

    /// Message exceeds the sealing bound
    #[error("message too long: {len} bytes exceeds limit of {max}")]
    MessageTooLong {
        /// Message length in bytes
        len: u64,
        /// Maximum message length
        max: u64,
    },

    /// Sealed message exceeds the opening bound
    #[error("sealed message too long: {len} bytes exceeds limit of {max}")]
    CiphertextTooLong {
        /// Sealed message length in bytes
        len: u64,
        /// Maximum sealed message length
        max: u64,
    },

    /// Sealed message is shorter than the synthetic tag
    #[error("sealed message too short: {len} bytes, need at least {min}")]
    CiphertextTooShort {
        /// Sealed message length in bytes
        len: usize,
        /// Minimum sealed message length (the tag size)
        min: usize,
    },

    /// Recomputed tag does not match the received tag.
    ///
    /// Any speculative plaintext has already been zeroed when this is
    /// returned.
    #[error("forgery detected: authentication tag mismatch")]
    ForgeryDetected,
}

impl DaenceError {
    /// Returns true if this error reports a caller programming error.
    ///
    /// Contract violations are never produced by honest runtime input: a
    /// nonce on a nonce-less cipher or a buffer beyond the length bound means
    /// the caller is misusing the API.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::NonEmptyNonce { .. } | Self::MessageTooLong { .. } | Self::CiphertextTooLong { .. }
        )
    }

    /// Returns true if this error is fatal (unrecoverable)
    ///
    /// Fatal errors indicate a bug in the caller. Everything else is an
    /// expected outcome of handling untrusted input or configuration.
    pub fn is_fatal(&self) -> bool {
        self.is_contract_violation()
    }
}
