//! Salsa20-Daence: tree topology over `HSalsa20`, `Salsa20` and Poly1305
//!
//! Given 32-byte k0, 16-byte k1..k4, header a and message m:
//!
//! ```text
//! ha := Poly1305^2_{k1,k2}(a)
//! hm := Poly1305^2_{k1,k2}(m)
//! h  := Poly1305^2_{k3,k4}(ha || hm)
//! u  := HSalsa20_k0(h3)
//! t  := HSalsa20_u(h4)[0..24]
//! c  := m ^ Salsa20(HSalsa20_k0(t[0..16]), t[16..24])
//! return t || c
//! ```
//!
//! The stream step is exactly `XSalsa20` keyed by k0 with t as the 24-byte
//! nonce.

use std::fmt;

use salsa20::{
    Salsa20, hsalsa,
    cipher::{KeyIvInit, StreamCipher, consts::U10, generic_array::GenericArray},
};

use crate::{
    compress::{self, Digest},
    engine::{Construction, impl_deterministic_aead},
    error::DaenceError,
    keys::{KeySchedule, RootKey},
};

/// Deterministic AEAD built on `Salsa20` with the tree compression topology.
/// Takes a 96-byte key.
#[derive(Clone)]
pub struct Salsa20Daence {
    keys: KeySchedule<4>,
}

impl Salsa20Daence {
    /// Key length in bytes: 32-byte root key plus four 16-byte hash keys.
    pub const KEY_SIZE: usize = KeySchedule::<4>::SIZE;

    /// Create a cipher from a 96-byte key blob.
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

    pub(crate) fn from_schedule(keys: KeySchedule<4>) -> Self {
        Self { keys }
    }
}

impl Construction for Salsa20Daence {
    fn root_key(&self) -> &RootKey {
        self.keys.root()
    }

    fn compress(&self, message: &[u8], associated_data: &[u8]) -> [Digest; 2] {
        compress::tree(self.keys.hash_keys(), message, associated_data)
    }

    fn permute(key: &[u8; 32], input: &Digest) -> [u8; 32] {
        hsalsa::<U10>(salsa20::Key::from_slice(key), GenericArray::from_slice(input)).into()
    }

    fn apply_keystream(subkey: &[u8; 32], suffix: [u8; 8], buffer: &mut [u8]) {
        let key = salsa20::Key::from_slice(subkey);
        let mut cipher = Salsa20::new(key, salsa20::Nonce::from_slice(&suffix));
        cipher.apply_keystream(buffer);
    }
}

impl_deterministic_aead!(Salsa20Daence);

impl fmt::Debug for Salsa20Daence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Salsa20Daence").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use salsa20::XSalsa20;

    use super::*;
    use crate::{DeterministicAead, SyntheticTag, TAG_SIZE, engine::compress_auth};

    fn test_key() -> Vec<u8> {
        (0x00..0x60).collect()
    }

    fn test_ad() -> Vec<u8> {
        (0x60..0x70).collect()
    }

    fn test_message() -> Vec<u8> {
        (0x70..=0x90).collect()
    }

    const EXPECTED_TAG: &str = "a5096e6cd6564131dcfbd186cb1e13728e2b6719b0bf7194";
    const EXPECTED_CIPHERTEXT: &str =
        "14fb8f328fca052acd4327d1371267961935566318553871b90cc90829a9d960f9";

    #[test]
    fn selftest() {
        let cipher = Salsa20Daence::new(&test_key()).unwrap();

        let sealed = cipher.seal(&test_message(), &test_ad()).unwrap();
        assert_eq!(hex::encode(&sealed[..TAG_SIZE]), EXPECTED_TAG);
        assert_eq!(hex::encode(&sealed[TAG_SIZE..]), EXPECTED_CIPHERTEXT);

        let opened = cipher.open(&sealed, &test_ad()).unwrap();
        assert_eq!(opened, test_message());
    }

    #[test]
    fn selftest_detached() {
        let cipher = Salsa20Daence::new(&test_key()).unwrap();
        let mut buffer = test_message();

        let tag = cipher.seal_in_place_detached(&test_ad(), &mut buffer).unwrap();
        assert_eq!(hex::encode(tag.to_bytes()), EXPECTED_TAG);
        assert_eq!(hex::encode(&buffer), EXPECTED_CIPHERTEXT);

        cipher.open_in_place_detached(&test_ad(), &mut buffer, &tag).unwrap();
        assert_eq!(buffer, test_message());
    }

    #[test]
    fn selftest_corruptions_are_forgeries() {
        let cipher = Salsa20Daence::new(&test_key()).unwrap();
        let sealed = cipher.seal(&test_message(), &test_ad()).unwrap();

        let mut flipped_tag = sealed.clone();
        flipped_tag[18] ^= 0x04;
        assert_eq!(cipher.open(&flipped_tag, &test_ad()), Err(DaenceError::ForgeryDetected));

        let mut tag_bytes = [0u8; TAG_SIZE];
        tag_bytes.copy_from_slice(&sealed[..TAG_SIZE]);
        tag_bytes[3] ^= 0x80;
        let tag = SyntheticTag::from_bytes(&tag_bytes);
        let mut buffer = sealed[TAG_SIZE..].to_vec();
        let result = cipher.open_in_place_detached(&test_ad(), &mut buffer, &tag);
        assert_eq!(result, Err(DaenceError::ForgeryDetected));
        assert!(buffer.iter().all(|&b| b == 0));
    }

    #[test]
    fn stream_step_matches_xsalsa20() {
        let key = test_key();
        let cipher = Salsa20Daence::new(&key).unwrap();
        let message = test_message();

        let tag = compress_auth(&cipher, &message, &test_ad());
        let mut expected = message.clone();
        let mut xsalsa = XSalsa20::new(
            salsa20::Key::from_slice(&key[..32]),
            salsa20::XNonce::from_slice(&tag.to_bytes()),
        );
        xsalsa.apply_keystream(&mut expected);

        let sealed = cipher.seal(&message, &test_ad()).unwrap();
        assert_eq!(&sealed[TAG_SIZE..], &expected[..]);
    }

    #[test]
    fn swapping_hash_keys_changes_tag() {
        let key = test_key();
        let mut swapped = key.clone();
        // Exchange k3 and k4
        swapped[64..80].copy_from_slice(&key[80..96]);
        swapped[80..96].copy_from_slice(&key[64..80]);

        let original = Salsa20Daence::new(&key).unwrap();
        let swapped = Salsa20Daence::new(&swapped).unwrap();

        assert_ne!(
            original.seal(&test_message(), &test_ad()).unwrap(),
            swapped.seal(&test_message(), &test_ad()).unwrap()
        );
    }

    #[test]
    fn rejects_chacha_sized_key() {
        let key = [0u8; 64];
        assert_eq!(
            Salsa20Daence::new(&key).err(),
            Some(DaenceError::InvalidKeyLength { expected: 96, actual: 64 })
        );
    }
}
