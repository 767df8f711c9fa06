//! ChaCha-Daence: streaming topology over `HChaCha20`, `ChaCha20` and
//! Poly1305
//!
//! Given 32-byte k0, 16-byte k1, 16-byte k2, header a and message m:
//!
//! ```text
//! h1 := Poly1305_{k1,0}(pad0(a) || pad0(m) || le64(|a|) || le64(|m|))
//! h2 := Poly1305_{k2,0}(pad0(a) || pad0(m) || le64(|a|) || le64(|m|))
//! u  := HChaCha20_k0(h1)
//! t  := HChaCha20_u(h2)[0..24]
//! c  := m ^ ChaCha20(HChaCha20_k0(t[0..16]), t[16..24])
//! return t || c
//! ```
//!
//! The stream step is exactly `XChaCha20` keyed by k0 with t as the 24-byte
//! nonce. `ChaCha20` here is the 8-byte-nonce variant, which for block
//! counters below 2^32 equals IETF `ChaCha20` with nonce `0^4 || t[16..24]`.

use std::fmt;

use chacha20::{
    ChaCha20Legacy, ChaCha20LegacyCore, LegacyNonce, hchacha,
    cipher::{
        KeyIvInit, StreamCipher, StreamCipherCore, StreamCipherSeekCore, consts::U10,
        generic_array::GenericArray,
    },
};
use zeroize::Zeroize;

use crate::{
    compress::{self, Digest},
    engine::{Construction, impl_deterministic_aead},
    error::DaenceError,
    keys::{KeySchedule, RootKey},
};

/// ChaCha20 block length
const BLOCK_SIZE: usize = 64;

/// Deterministic AEAD built on `ChaCha20` with the streaming compression
/// topology. Takes a 64-byte key.
#[derive(Clone)]
pub struct ChaChaDaence {
    keys: KeySchedule<2>,
}

impl ChaChaDaence {
    /// Key length in bytes: 32-byte root key plus two 16-byte hash keys.
    pub const KEY_SIZE: usize = KeySchedule::<2>::SIZE;

    /// Create a cipher from a 64-byte key blob.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`: if `key` is not exactly [`Self::KEY_SIZE`] bytes
    pub fn new(key: &[u8]) -> Result<Self, DaenceError> {
        Ok(Self::from_schedule(KeySchedule::from_slice(key)?))
    }

    /// Create a cipher from a key of exactly [`Self::KEY_SIZE`] bytes.
    pub fn from_bytes(key: &[u8; Self::KEY_SIZE]) -> Self {
        Self::from_schedule(KeySchedule::split(key))
    }

    pub(crate) fn from_schedule(keys: KeySchedule<2>) -> Self {
        Self { keys }
    }
}

impl Construction for ChaChaDaence {
    fn root_key(&self) -> &RootKey {
        self.keys.root()
    }

    fn compress(&self, message: &[u8], associated_data: &[u8]) -> [Digest; 2] {
        compress::streaming(self.keys.hash_keys(), message, associated_data)
    }

    fn permute(key: &[u8; 32], input: &Digest) -> [u8; 32] {
        hchacha::<U10>(chacha20::Key::from_slice(key), GenericArray::from_slice(input)).into()
    }

    fn apply_keystream(subkey: &[u8; 32], suffix: [u8; 8], buffer: &mut [u8]) {
        xor_keystream(subkey, suffix, 0, buffer);
    }
}

impl_deterministic_aead!(ChaChaDaence);

/// XOR the keystream starting at block `first_block` into `buffer`.
///
/// The block counter is 32 bits and a maximum-length message uses every
/// value of it. `ChaCha20Legacy` refuses to produce the block at counter
/// `u32::MAX`, so any bytes that fall there are taken from the core
/// directly. `buffer` must end at or before the end of that block.
fn xor_keystream(subkey: &[u8; 32], suffix: [u8; 8], first_block: u32, buffer: &mut [u8]) {
    let key = chacha20::Key::from_slice(subkey);
    let nonce = LegacyNonce::from_slice(&suffix);

    let counted = usize::try_from(u32::MAX - first_block)
        .ok()
        .and_then(|blocks| blocks.checked_mul(BLOCK_SIZE))
        .map_or(buffer.len(), |limit| buffer.len().min(limit));
    let (head, last) = buffer.split_at_mut(counted);

    let mut core = ChaCha20LegacyCore::new(key, nonce);
    core.set_block_pos(first_block);
    ChaCha20Legacy::from_core(core).apply_keystream(head);

    if last.is_empty() {
        return;
    }
    debug_assert!(last.len() <= BLOCK_SIZE);

    let mut core = ChaCha20LegacyCore::new(key, nonce);
    core.set_block_pos(u32::MAX);
    let mut block = [0u8; BLOCK_SIZE];
    core.write_keystream_block(GenericArray::from_mut_slice(&mut block));
    for (byte, key_byte) in last.iter_mut().zip(&block) {
        *byte ^= key_byte;
    }
    block.zeroize();
}

impl fmt::Debug for ChaChaDaence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChaChaDaence").finish_non_exhaustive()
    }
}
