//! Synthetic tag: authenticator and per-message nonce material in one

use subtle::{Choice, ConstantTimeEq};

/// Size of the synthetic tag (24 bytes)
pub const TAG_SIZE: usize = 24;

/// Bytes of the tag fed to the permutation to derive the stream subkey
const HALF_SIZE: usize = 16;

/// Bytes of the tag used as the stream cipher nonce
const SUFFIX_SIZE: usize = TAG_SIZE - HALF_SIZE;

/// A 24-byte synthetic tag.
///
/// Deterministic in (key, message, associated data). Sent in the clear as
/// the prefix of every sealed message, so it is not secret, but equality is
/// always checked in constant time.
///
/// ```text
/// 0                16        24
/// ├────────────────┼─────────┤
/// │    tag half    │ suffix  │
/// └────────────────┴─────────┘
///    → subkey        → sub-nonce
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SyntheticTag {
    half: [u8; HALF_SIZE],
    suffix: [u8; SUFFIX_SIZE],
}

impl SyntheticTag {
    /// Build a tag from its wire bytes.
    pub fn from_bytes(bytes: &[u8; TAG_SIZE]) -> Self {
        let mut half = [0u8; HALF_SIZE];
        let mut suffix = [0u8; SUFFIX_SIZE];
        half.copy_from_slice(&bytes[..HALF_SIZE]);
        suffix.copy_from_slice(&bytes[HALF_SIZE..]);
        Self { half, suffix }
    }

    /// Truncate a 32-byte permutation output to a tag.
    pub(crate) fn from_output(output: &[u8; 32]) -> Self {
        let mut half = [0u8; HALF_SIZE];
        let mut suffix = [0u8; SUFFIX_SIZE];
        half.copy_from_slice(&output[..HALF_SIZE]);
        suffix.copy_from_slice(&output[HALF_SIZE..TAG_SIZE]);
        Self { half, suffix }
    }

    /// Wire encoding of the tag.
    pub fn to_bytes(&self) -> [u8; TAG_SIZE] {
        let mut bytes = [0u8; TAG_SIZE];
        bytes[..HALF_SIZE].copy_from_slice(&self.half);
        bytes[HALF_SIZE..].copy_from_slice(&self.suffix);
        bytes
    }

    /// Bytes 0..16, the permutation input for the stream subkey.
    pub fn half(&self) -> &[u8; HALF_SIZE] {
        &self.half
    }

    /// Bytes 16..24, the stream cipher nonce.
    pub fn suffix(&self) -> &[u8; SUFFIX_SIZE] {
        &self.suffix
    }
}

impl ConstantTimeEq for SyntheticTag {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.half[..].ct_eq(&other.half[..]) & self.suffix[..].ct_eq(&other.suffix[..])
    }
}

impl PartialEq for SyntheticTag {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for SyntheticTag {}
