//! Daence Deterministic Authenticated Encryption
//!
//! Nonce-less authenticated encryption built from `ChaCha20`/`Salsa20` and
//! Poly1305. Sealing is a pure function of (key, message, associated data):
//! equal inputs give equal outputs and there is no nonce to misuse. The only
//! thing an observer learns beyond lengths is whether two sealed messages
//! carry the same (message, associated data) pair.
//!
//! # Constructions
//!
//! | Cipher             | Key      | Compression | Stream step |
//! |--------------------|----------|-------------|-------------|
//! | [`ChaChaDaence`]   | 64 bytes | streaming   | `XChaCha20` |
//! | [`Salsa20Daence`]  | 96 bytes | tree        | `XSalsa20`  |
//!
//! # Data Flow
//!
//! ```text
//! (message, associated data)
//!        │
//!        ▼
//! Poly1305 compression → two 16-byte digests (h1, h2)
//!        │
//!        ▼
//! Keyed permutation (twice) → 24-byte synthetic tag t
//!        │
//!        ▼
//! Permute(root, t[0..16]) → stream subkey
//!        │
//!        ▼
//! Stream cipher (nonce t[16..24]) → t || ciphertext
//! ```
//!
//! Opening decrypts first, recomputes t from the candidate plaintext and
//! compares tags in constant time. A mismatch zeroes the candidate plaintext
//! and returns [`DaenceError::ForgeryDetected`].
//!
//! # Security
//!
//! - Deterministic: identical (key, message, associated data) reveal
//!   equality. Not suitable where that leak matters.
//! - Misuse-resistant: there is no nonce, so there is no nonce reuse.
//! - Sub-keys and intermediate digests are zeroized after use.
//! - Messages are bounded by [`MAX_MESSAGE_LEN`] (2^38 bytes).
//!
//! # Usage
//!
//! ```
//! use daence_crypto::{ChaChaDaence, DeterministicAead};
//!
//! let cipher = ChaChaDaence::new(&[0x42; ChaChaDaence::KEY_SIZE])?;
//! let sealed = cipher.seal(b"message", b"header")?;
//! assert_eq!(cipher.open(&sealed, b"header")?, b"message");
//! # Ok::<(), daence_crypto::DaenceError>(())
//! ```
//!
//! Both ciphers also implement the RustCrypto [`aead`] traits with a
//! zero-length nonce.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod aead_traits;
mod chacha;
mod compress;
mod engine;
mod error;
mod keys;
mod salsa;
mod tag;

pub use aead;
pub use chacha::ChaChaDaence;
pub use engine::{DeterministicAead, MAX_MESSAGE_LEN, MAX_SEALED_LEN};
pub use error::DaenceError;
pub use salsa::Salsa20Daence;
pub use tag::{SyntheticTag, TAG_SIZE};
