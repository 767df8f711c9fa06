//! RustCrypto `aead` trait integration
//!
//! Both ciphers implement `KeyInit`, `AeadCore` and `AeadInPlace`, and so
//! pick up the blanket `Aead` impl. The nonce type is zero-length, which
//! makes passing a nonce impossible at compile time.
//!
//! `encrypt_in_place` and `decrypt_in_place` are overridden so that the tag
//! is a prefix, matching the `tag || ciphertext` wire format of
//! [`DeterministicAead::seal`].
//!
//! # Errors
//!
//! `aead::Error` is opaque, so every failure on this path looks the same: a
//! forgery, a truncated input and a message beyond [`crate::MAX_MESSAGE_LEN`]
//! all surface as `Err(aead::Error)`. The contract violation is still
//! logged at `warn` by the engine. Callers that must tell a caller bug from
//! hostile input use [`DeterministicAead`], whose [`crate::DaenceError`]
//! carries [`crate::DaenceError::is_contract_violation`].

use aead::{
    AeadCore, AeadInPlace, Buffer, Error, Key, KeyInit, KeySizeUser, Nonce, Tag,
    consts::{U0, U24, U64, U96},
};

use crate::{
    ChaChaDaence, DeterministicAead, Salsa20Daence, SyntheticTag, TAG_SIZE, keys::KeySchedule,
};

macro_rules! impl_aead {
    ($cipher:ty, $key_size:ty) => {
        impl KeySizeUser for $cipher {
            type KeySize = $key_size;
        }

        impl KeyInit for $cipher {
            fn new(key: &Key<Self>) -> Self {
                Self::from_schedule(KeySchedule::split(key))
            }
        }

        impl AeadCore for $cipher {
            type NonceSize = U0;
            type TagSize = U24;
            type CiphertextOverhead = U0;
        }

        /// All failures map to the opaque [`aead::Error`]; use
        /// [`DeterministicAead`] to distinguish contract violations from
        /// forgeries.
        impl AeadInPlace for $cipher {
            fn encrypt_in_place(
                &self,
                nonce: &Nonce<Self>,
                associated_data: &[u8],
                buffer: &mut dyn Buffer,
            ) -> aead::Result<()> {
                let len = buffer.len();
                let tag = self.encrypt_in_place_detached(nonce, associated_data, buffer.as_mut())?;
                buffer.extend_from_slice(&tag)?;

                let bytes = buffer.as_mut();
                bytes.copy_within(..len, TAG_SIZE);
                bytes[..TAG_SIZE].copy_from_slice(&tag);
                Ok(())
            }

            fn encrypt_in_place_detached(
                &self,
                _nonce: &Nonce<Self>,
                associated_data: &[u8],
                buffer: &mut [u8],
            ) -> aead::Result<Tag<Self>> {
                let tag =
                    self.seal_in_place_detached(associated_data, buffer).map_err(|_| Error)?;
                Ok(Tag::<Self>::clone_from_slice(&tag.to_bytes()))
            }

            fn decrypt_in_place(
                &self,
                _nonce: &Nonce<Self>,
                associated_data: &[u8],
                buffer: &mut dyn Buffer,
            ) -> aead::Result<()> {
                let len = buffer.len();
                let Some((tag, body)) = buffer.as_mut().split_first_chunk_mut::<TAG_SIZE>()
                else {
                    return Err(Error);
                };
                let tag = SyntheticTag::from_bytes(tag);
                self.open_in_place_detached(associated_data, body, &tag).map_err(|_| Error)?;

                buffer.as_mut().copy_within(TAG_SIZE.., 0);
                buffer.truncate(len - TAG_SIZE);
                Ok(())
            }

            fn decrypt_in_place_detached(
                &self,
                _nonce: &Nonce<Self>,
                associated_data: &[u8],
                buffer: &mut [u8],
                tag: &Tag<Self>,
            ) -> aead::Result<()> {
                let tag = SyntheticTag::from_bytes(&(*tag).into());
                self.open_in_place_detached(associated_data, buffer, &tag).map_err(|_| Error)
            }
        }
    };
}

impl_aead!(ChaChaDaence, U64);
impl_aead!(Salsa20Daence, U96);

#[cfg(test)]
mod tests {
    use aead::{Aead, Payload};

    use super::*;
    use crate::DaenceError;

    fn chacha() -> ChaChaDaence {
        let key: Vec<u8> = (0x00..0x40).collect();
        <ChaChaDaence as KeyInit>::new_from_slice(&key).unwrap()
    }

    fn salsa20() -> Salsa20Daence {
        let key: Vec<u8> = (0x00..0x60).collect();
        <Salsa20Daence as KeyInit>::new_from_slice(&key).unwrap()
    }

    #[test]
    fn key_init_rejects_wrong_length() {
        assert!(<ChaChaDaence as KeyInit>::new_from_slice(&[0u8; 96]).is_err());
        assert!(<Salsa20Daence as KeyInit>::new_from_slice(&[0u8; 64]).is_err());
    }

    #[test]
    fn aead_encrypt_matches_seal() {
        let cipher = chacha();
        let nonce = Nonce::<ChaChaDaence>::default();
        let payload = Payload { msg: b"generic aead path", aad: b"header" };

        let via_aead = cipher.encrypt(&nonce, payload).unwrap();
        let via_seal = cipher.seal(b"generic aead path", b"header").unwrap();
        assert_eq!(via_aead, via_seal);
    }

    #[test]
    fn aead_round_trip_salsa20() {
        let cipher = salsa20();
        let nonce = Nonce::<Salsa20Daence>::default();

        let sealed = cipher.encrypt(&nonce, Payload { msg: b"message", aad: b"ad" }).unwrap();
        assert_eq!(sealed.len(), b"message".len() + TAG_SIZE);

        let opened = cipher.decrypt(&nonce, Payload { msg: &sealed, aad: b"ad" }).unwrap();
        assert_eq!(opened, b"message");
    }

    #[test]
    fn aead_decrypt_rejects_tampering() {
        let cipher = chacha();
        let nonce = Nonce::<ChaChaDaence>::default();

        let mut sealed = cipher.encrypt(&nonce, &b"message"[..]).unwrap();
        sealed[TAG_SIZE] ^= 0x01;
        assert!(cipher.decrypt(&nonce, &sealed[..]).is_err());
    }

    #[test]
    fn aead_decrypt_rejects_short_input() {
        let cipher = salsa20();
        let nonce = Nonce::<Salsa20Daence>::default();
        assert!(cipher.decrypt(&nonce, &[0u8; TAG_SIZE - 1][..]).is_err());
    }

    #[test]
    fn decrypt_in_place_zeroes_body_on_forgery() {
        let cipher = salsa20();
        let nonce = Nonce::<Salsa20Daence>::default();

        let mut buffer = b"in place message".to_vec();
        cipher.encrypt_in_place(&nonce, b"ad", &mut buffer).unwrap();
        buffer[0] ^= 0x10;

        assert!(cipher.decrypt_in_place(&nonce, b"ad", &mut buffer).is_err());
        assert!(buffer[TAG_SIZE..].iter().all(|&b| b == 0));
    }

    #[test]
    fn detached_tag_matches_prefix() {
        let cipher = chacha();
        let nonce = Nonce::<ChaChaDaence>::default();

        let mut buffer = b"detached".to_vec();
        let tag = cipher.encrypt_in_place_detached(&nonce, b"", &mut buffer).unwrap();
        let sealed = cipher.seal(b"detached", b"").unwrap();

        assert_eq!(tag.as_slice(), &sealed[..TAG_SIZE]);
        assert_eq!(&buffer[..], &sealed[TAG_SIZE..]);

        cipher.decrypt_in_place_detached(&nonce, b"", &mut buffer, &tag).unwrap();
        assert_eq!(buffer, b"detached");
    }

    #[test]
    fn generic_errors_are_opaque_native_errors_are_classified() {
        let cipher = chacha();
        let nonce = Nonce::<ChaChaDaence>::default();
        let mut sealed = cipher.seal(b"message", b"ad").unwrap();
        sealed[0] ^= 0x01;

        let generic = cipher.decrypt(&nonce, Payload { msg: &sealed, aad: b"ad" });
        assert_eq!(generic, Err(Error));
        let generic_short = cipher.decrypt(&nonce, &sealed[..TAG_SIZE - 1]);
        assert_eq!(generic_short, Err(Error));

        let forgery = cipher.open(&sealed, b"ad").unwrap_err();
        assert_eq!(forgery, DaenceError::ForgeryDetected);
        assert!(!forgery.is_contract_violation());

        let misuse = cipher.open_append(&mut Vec::new(), &[0u8; 12], &sealed, b"ad").unwrap_err();
        assert_eq!(misuse, DaenceError::NonEmptyNonce { len: 12 });
        assert!(misuse.is_contract_violation());
    }
}
