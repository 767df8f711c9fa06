//! CLI error types.

use std::{io, path::PathBuf};

use daence_crypto::DaenceError;
use thiserror::Error;

/// Errors from a seal, open or keygen run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input, key or associated-data file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Output file could not be written.
    ///
    /// Key generation refuses to overwrite an existing file, which also
    /// surfaces here.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Key file does not hold a key for the selected construction.
    #[error("unusable key in {}: {source}", .path.display())]
    Key {
        /// Key file
        path: PathBuf,
        /// Why the key was rejected
        #[source]
        source: DaenceError,
    },

    /// Seal or open failed.
    #[error(transparent)]
    Crypto(#[from] DaenceError),

    /// OS random number generator failed during key generation.
    #[error("OS random number generator failed: {0}")]
    Random(getrandom::Error),
}

impl CliError {
    /// Sealed input was rejected: forged, corrupted or truncated.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::Crypto(DaenceError::ForgeryDetected | DaenceError::CiphertextTooShort { .. })
        )
    }

    /// Process exit status: 2 for rejected sealed input, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_authentication_failure() { 2 } else { 1 }
    }
}
