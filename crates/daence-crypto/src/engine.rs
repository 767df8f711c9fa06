//! Seal/open engine shared by both constructions
//!
//! Sealing:
//!
//! ```text
//! (h1, h2) := Compress(m, a)
//! u        := Permute(root, h1)
//! t        := Permute(u, h2)[0..24]
//! subkey   := Permute(root, t[0..16])
//! c        := m ^ Stream(subkey, t[16..24])
//! return t || c
//! ```
//!
//! Opening runs the stream first (the subkey depends only on the tag),
//! recomputes the tag from the candidate plaintext, and compares in constant
//! time. On mismatch the candidate plaintext is zeroed before the error is
//! returned.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::{
    compress::Digest,
    error::DaenceError,
    keys::RootKey,
    tag::{SyntheticTag, TAG_SIZE},
};

/// Maximum message length accepted by seal (2^38 bytes)
pub const MAX_MESSAGE_LEN: u64 = 1 << 38;

/// Maximum sealed message length accepted by open
pub const MAX_SEALED_LEN: u64 = MAX_MESSAGE_LEN + TAG_SIZE as u64;

pub(crate) mod sealed {
    /// Restricts [`super::DeterministicAead`] to the constructions in this
    /// crate.
    pub trait Sealed {}
}

/// Primitive family and compression topology of one Daence instantiation.
///
/// Crate-internal: these hooks expose the root key, raw hash digests and
/// the bare keystream, so the public [`DeterministicAead`] trait forwards to
/// the engine functions below instead of extending this trait.
pub(crate) trait Construction {
    /// Root permutation key.
    fn root_key(&self) -> &RootKey;

    /// Reduce (message, associated data) to two digests.
    fn compress(&self, message: &[u8], associated_data: &[u8]) -> [Digest; 2];

    /// Keyed permutation: 32-byte key, 16-byte input, 32-byte output.
    fn permute(key: &[u8; 32], input: &Digest) -> [u8; 32];

    /// XOR the keystream for (subkey, tag suffix) into `buffer`.
    fn apply_keystream(subkey: &[u8; 32], suffix: [u8; 8], buffer: &mut [u8]);
}

/// Deterministic, nonce-less authenticated encryption.
///
/// Implemented by [`crate::ChaChaDaence`] and [`crate::Salsa20Daence`]; the
/// trait is sealed. Sealing the same (message, associated data) under the
/// same key always yields the same output; there is no nonce to reuse.
///
/// Sealed messages are laid out as `tag (24 bytes) || ciphertext`.
///
/// Code generic over this trait sees only sealed and opened bytes, never
/// key material or intermediate digests:
///
/// ```compile_fail
/// use daence_crypto::DeterministicAead;
///
/// fn root_key_bytes<C: DeterministicAead>(cipher: &C) -> [u8; 32] {
///     *cipher.root_key().as_bytes()
/// }
/// ```
pub trait DeterministicAead: sealed::Sealed {
    /// Always 0. Any nonce passed to the `*_append` methods is rejected.
    fn nonce_size(&self) -> usize {
        0
    }

    /// Bytes added by sealing: the 24-byte synthetic tag.
    fn overhead(&self) -> usize {
        TAG_SIZE
    }

    /// Seal `message` into a fresh `tag || ciphertext` buffer.
    ///
    /// # Errors
    ///
    /// - `MessageTooLong`: `message` exceeds [`MAX_MESSAGE_LEN`] (contract
    ///   violation)
    fn seal(&self, message: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, DaenceError> {
        let mut sealed = Vec::with_capacity(message.len().saturating_add(TAG_SIZE));
        self.seal_append(&mut sealed, &[], message, associated_data)?;
        Ok(sealed)
    }

    /// Append `tag || ciphertext` to `dst`.
    ///
    /// Existing contents of `dst` are left untouched; spare capacity is
    /// reused when available.
    ///
    /// # Errors
    ///
    /// - `NonEmptyNonce`: `nonce` is not empty (contract violation)
    /// - `MessageTooLong`: `message` exceeds [`MAX_MESSAGE_LEN`] (contract
    ///   violation)
    fn seal_append(
        &self,
        dst: &mut Vec<u8>,
        nonce: &[u8],
        message: &[u8],
        associated_data: &[u8],
    ) -> Result<(), DaenceError>;

    /// Open a `tag || ciphertext` buffer into a fresh message buffer.
    ///
    /// # Errors
    ///
    /// Same as [`Self::open_append`].
    fn open(&self, sealed: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, DaenceError> {
        let mut message = Vec::with_capacity(sealed.len().saturating_sub(TAG_SIZE));
        self.open_append(&mut message, &[], sealed, associated_data)?;
        Ok(message)
    }

    /// Append the message recovered from `sealed` to `dst`.
    ///
    /// On failure `dst` is restored to its original length, and any
    /// plaintext that was speculatively written has been zeroed first.
    ///
    /// # Errors
    ///
    /// - `NonEmptyNonce`: `nonce` is not empty (contract violation)
    /// - `CiphertextTooShort`: `sealed` is shorter than a tag
    /// - `CiphertextTooLong`: `sealed` exceeds [`MAX_SEALED_LEN`] (contract
    ///   violation)
    /// - `ForgeryDetected`: tag does not authenticate the message and
    ///   associated data
    fn open_append(
        &self,
        dst: &mut Vec<u8>,
        nonce: &[u8],
        sealed: &[u8],
        associated_data: &[u8],
    ) -> Result<(), DaenceError>;

    /// Encrypt `buffer` in place and return the tag separately.
    ///
    /// # Errors
    ///
    /// - `MessageTooLong`: `buffer` exceeds [`MAX_MESSAGE_LEN`] (contract
    ///   violation)
    fn seal_in_place_detached(
        &self,
        associated_data: &[u8],
        buffer: &mut [u8],
    ) -> Result<SyntheticTag, DaenceError>;

    /// Decrypt `buffer` in place and verify it against `tag`.
    ///
    /// On `ForgeryDetected` the whole buffer has been overwritten with
    /// zeros.
    ///
    /// # Errors
    ///
    /// - `MessageTooLong`: `buffer` exceeds [`MAX_MESSAGE_LEN`] (contract
    ///   violation)
    /// - `ForgeryDetected`: `tag` does not authenticate the buffer
    fn open_in_place_detached(
        &self,
        associated_data: &[u8],
        buffer: &mut [u8],
        tag: &SyntheticTag,
    ) -> Result<(), DaenceError>;

    /// Authenticate `data` without encrypting anything.
    ///
    /// The tag is that of sealing an empty message with `data` as the
    /// associated data, so it equals `seal(b"", data)`.
    fn authenticate(&self, data: &[u8]) -> SyntheticTag;

    /// Check a tag produced by [`Self::authenticate`].
    ///
    /// # Errors
    ///
    /// - `ForgeryDetected`: `tag` does not authenticate `data`
    fn verify(&self, data: &[u8], tag: &SyntheticTag) -> Result<(), DaenceError>;
}

/// Implement [`DeterministicAead`] for a [`Construction`] by forwarding to
/// the engine functions.
macro_rules! impl_deterministic_aead {
    ($cipher:ty) => {
        impl $crate::engine::sealed::Sealed for $cipher {}

        impl $crate::engine::DeterministicAead for $cipher {
            fn seal_append(
                &self,
                dst: &mut Vec<u8>,
                nonce: &[u8],
                message: &[u8],
                associated_data: &[u8],
            ) -> Result<(), $crate::DaenceError> {
                $crate::engine::seal_append(self, dst, nonce, message, associated_data)
            }

            fn open_append(
                &self,
                dst: &mut Vec<u8>,
                nonce: &[u8],
                sealed: &[u8],
                associated_data: &[u8],
            ) -> Result<(), $crate::DaenceError> {
                $crate::engine::open_append(self, dst, nonce, sealed, associated_data)
            }

            fn seal_in_place_detached(
                &self,
                associated_data: &[u8],
                buffer: &mut [u8],
            ) -> Result<$crate::SyntheticTag, $crate::DaenceError> {
                $crate::engine::seal_in_place(self, associated_data, buffer)
            }

            fn open_in_place_detached(
                &self,
                associated_data: &[u8],
                buffer: &mut [u8],
                tag: &$crate::SyntheticTag,
            ) -> Result<(), $crate::DaenceError> {
                $crate::engine::open_in_place(self, associated_data, buffer, tag)
            }

            fn authenticate(&self, data: &[u8]) -> $crate::SyntheticTag {
                $crate::engine::compress_auth(self, &[], data)
            }

            fn verify(
                &self,
                data: &[u8],
                tag: &$crate::SyntheticTag,
            ) -> Result<(), $crate::DaenceError> {
                $crate::engine::open_in_place(self, data, &mut [], tag)
            }
        }
    };
}

pub(crate) use impl_deterministic_aead;

/// Append `tag || ciphertext` to `dst`; see [`DeterministicAead::seal_append`].
pub(crate) fn seal_append<C: Construction + ?Sized>(
    cipher: &C,
    dst: &mut Vec<u8>,
    nonce: &[u8],
    message: &[u8],
    associated_data: &[u8],
) -> Result<(), DaenceError> {
    check_nonce(nonce)?;
    check_message_len(message.len())?;

    let start = dst.len();
    dst.reserve(TAG_SIZE + message.len());
    dst.resize(start + TAG_SIZE, 0);
    dst.extend_from_slice(message);

    let (tag_out, body) = dst[start..].split_at_mut(TAG_SIZE);
    let tag = seal_in_place(cipher, associated_data, body)?;
    tag_out.copy_from_slice(&tag.to_bytes());
    Ok(())
}

/// Append the opened message to `dst`; see [`DeterministicAead::open_append`].
pub(crate) fn open_append<C: Construction + ?Sized>(
    cipher: &C,
    dst: &mut Vec<u8>,
    nonce: &[u8],
    sealed: &[u8],
    associated_data: &[u8],
) -> Result<(), DaenceError> {
    check_nonce(nonce)?;
    check_sealed_len(sealed.len())?;

    let Some((tag, ciphertext)) = sealed.split_first_chunk::<TAG_SIZE>() else {
        return Err(DaenceError::CiphertextTooShort { len: sealed.len(), min: TAG_SIZE });
    };
    let tag = SyntheticTag::from_bytes(tag);

    let start = dst.len();
    dst.extend_from_slice(ciphertext);

    if let Err(err) = open_in_place(cipher, associated_data, &mut dst[start..], &tag) {
        dst.truncate(start);
        return Err(err);
    }
    Ok(())
}

/// `t := Permute(Permute(root, h1), h2)[0..24]`
pub(crate) fn compress_auth<C: Construction + ?Sized>(
    cipher: &C,
    message: &[u8],
    associated_data: &[u8],
) -> SyntheticTag {
    let [mut h1, mut h2] = cipher.compress(message, associated_data);

    let mut intermediate = C::permute(cipher.root_key().as_bytes(), &h1);
    let mut output = C::permute(&intermediate, &h2);
    let tag = SyntheticTag::from_output(&output);

    h1.zeroize();
    h2.zeroize();
    intermediate.zeroize();
    output.zeroize();
    tag
}

/// Encrypt `buffer` in place; returns the synthetic tag.
pub(crate) fn seal_in_place<C: Construction + ?Sized>(
    cipher: &C,
    associated_data: &[u8],
    buffer: &mut [u8],
) -> Result<SyntheticTag, DaenceError> {
    check_message_len(buffer.len())?;

    let tag = compress_auth(cipher, buffer, associated_data);
    apply_tag_keystream(cipher, &tag, buffer);
    Ok(tag)
}

/// Decrypt `buffer` in place and verify it against `tag`.
///
/// Zeroes `buffer` before returning `ForgeryDetected`.
pub(crate) fn open_in_place<C: Construction + ?Sized>(
    cipher: &C,
    associated_data: &[u8],
    buffer: &mut [u8],
    tag: &SyntheticTag,
) -> Result<(), DaenceError> {
    check_message_len(buffer.len())?;

    apply_tag_keystream(cipher, tag, buffer);
    let expected = compress_auth(cipher, buffer, associated_data);

    if bool::from(expected.ct_eq(tag)) {
        return Ok(());
    }

    buffer.zeroize();
    tracing::debug!(len = buffer.len(), "forgery detected, candidate plaintext zeroed");
    Err(DaenceError::ForgeryDetected)
}

/// `buffer ^= Stream(Permute(root, t[0..16]), t[16..24])`
fn apply_tag_keystream<C: Construction + ?Sized>(
    cipher: &C,
    tag: &SyntheticTag,
    buffer: &mut [u8],
) {
    let mut subkey = C::permute(cipher.root_key().as_bytes(), tag.half());
    C::apply_keystream(&subkey, *tag.suffix(), buffer);
    subkey.zeroize();
}

fn check_nonce(nonce: &[u8]) -> Result<(), DaenceError> {
    if nonce.is_empty() {
        return Ok(());
    }
    tracing::warn!(len = nonce.len(), "nonempty nonce passed to nonce-less cipher");
    Err(DaenceError::NonEmptyNonce { len: nonce.len() })
}

fn check_message_len(len: usize) -> Result<(), DaenceError> {
    let len = len as u64;
    if len <= MAX_MESSAGE_LEN {
        return Ok(());
    }
    tracing::warn!(len, max = MAX_MESSAGE_LEN, "message exceeds length bound");
    Err(DaenceError::MessageTooLong { len, max: MAX_MESSAGE_LEN })
}

fn check_sealed_len(len: usize) -> Result<(), DaenceError> {
    if len < TAG_SIZE {
        return Err(DaenceError::CiphertextTooShort { len, min: TAG_SIZE });
    }
    let len = len as u64;
    if len > MAX_SEALED_LEN {
        tracing::warn!(len, max = MAX_SEALED_LEN, "sealed message exceeds length bound");
        return Err(DaenceError::CiphertextTooLong { len, max: MAX_SEALED_LEN });
    }
    Ok(())
}
