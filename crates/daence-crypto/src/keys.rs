//! Key schedule: splitting one key blob into a root key and hash keys
//!
//! Layout of a key blob with `N` hash keys:
//!
//! ```text
//! 0        32       48       64            32 + 16N
//! ├────────┼────────┼────────┼─── ... ──────┤
//! │  root  │ hash 1 │ hash 2 │    hash N    │
//! ```
//!
//! Sub-keys are copied out of the blob at construction and never handed
//! back out of the crate. They are zeroized on drop.

use poly1305::{Poly1305, universal_hash::KeyInit};
use zeroize::Zeroize;

use crate::error::DaenceError;

/// Size of the root permutation key (32 bytes)
pub const ROOT_KEY_SIZE: usize = 32;

/// Size of a universal-hash key (16 bytes)
pub const HASH_KEY_SIZE: usize = 16;

/// Key for the keyed permutation (`HChaCha20` / `HSalsa20`).
///
/// Used both to fold hash digests into a tag and to derive per-message
/// stream subkeys.
#[derive(Clone)]
pub struct RootKey([u8; ROOT_KEY_SIZE]);

impl RootKey {
    /// Raw key bytes for the permutation.
    pub(crate) fn as_bytes(&self) -> &[u8; ROOT_KEY_SIZE] {
        &self.0
    }
}

impl Drop for RootKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// One Poly1305 evaluation point.
#[derive(Clone)]
pub struct HashKey([u8; HASH_KEY_SIZE]);

impl HashKey {
    /// Fresh Poly1305 instance keyed with this evaluation point and a zero
    /// addend.
    pub(crate) fn poly1305(&self) -> Poly1305 {
        let mut key = [0u8; 32];
        key[..HASH_KEY_SIZE].copy_from_slice(&self.0);
        let mac = Poly1305::new(poly1305::Key::from_slice(&key));
        key.zeroize();
        mac
    }
}

impl Drop for HashKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Root key plus `N` independent hash keys, immutable after construction.
#[derive(Clone)]
pub struct KeySchedule<const N: usize> {
    root: RootKey,
    hash: [HashKey; N],
}

impl<const N: usize> KeySchedule<N> {
    /// Total key blob size in bytes.
    pub const SIZE: usize = ROOT_KEY_SIZE + N * HASH_KEY_SIZE;

    /// Split a key blob into its sub-keys.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`: if `key` is not exactly [`Self::SIZE`] bytes
    pub fn from_slice(key: &[u8]) -> Result<Self, DaenceError> {
        if key.len() != Self::SIZE {
            return Err(DaenceError::InvalidKeyLength { expected: Self::SIZE, actual: key.len() });
        }

        Ok(Self::split(key))
    }

    /// Split a key blob whose length is already known to be [`Self::SIZE`].
    pub fn split(key: &[u8]) -> Self {
        debug_assert_eq!(key.len(), Self::SIZE);

        let (root, hash) = key.split_at(ROOT_KEY_SIZE);
        Self {
            root: RootKey(copy_array(root)),
            hash: std::array::from_fn(|i| {
                HashKey(copy_array(&hash[i * HASH_KEY_SIZE..(i + 1) * HASH_KEY_SIZE]))
            }),
        }
    }

    /// Root permutation key.
    pub fn root(&self) -> &RootKey {
        &self.root
    }

    /// Hash keys in blob order (`hash_keys()[0]` is k1).
    pub fn hash_keys(&self) -> &[HashKey; N] {
        &self.hash
    }
}

/// Copy a slice whose length has already been checked into an array.
fn copy_array<const M: usize>(bytes: &[u8]) -> [u8; M] {
    let mut out = [0u8; M];
    out.copy_from_slice(bytes);
    out
}
