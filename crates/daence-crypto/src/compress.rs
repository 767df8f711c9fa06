//! Message compression: (message, associated data) → two 16-byte digests
//!
//! Both topologies reduce their input with Poly1305 under independent hash
//! keys. The two digests are then folded through the root permutation by
//! the engine to produce the synthetic tag.
//!
//! # Streaming (ChaCha-Daence)
//!
//! ```text
//! h_i := Poly1305_{k_i}(pad0(a) || pad0(m) || le64(|a|) || le64(|m|))   i = 1, 2
//! ```
//!
//! One pass per key. Each segment is zero-padded to a block boundary and
//! the length trailer binds where one segment ends and the next begins.
//!
//! # Tree (Salsa20-Daence)
//!
//! ```text
//! ha1 := Poly1305_{k1}(a)    hm1 := Poly1305_{k1}(m)
//! ha2 := Poly1305_{k2}(a)    hm2 := Poly1305_{k2}(m)
//! h3  := Poly1305_{k3}(ha1 || ha2 || hm1 || hm2)
//! h4  := Poly1305_{k4}(ha1 || ha2 || hm1 || hm2)
//! ```

use poly1305::universal_hash::UniversalHash;
use zeroize::Zeroize;

use crate::keys::HashKey;

/// A 16-byte universal-hash digest
pub type Digest = [u8; 16];

/// Streaming topology: two length-bound digests over the framed input.
pub fn streaming(keys: &[HashKey; 2], message: &[u8], associated_data: &[u8]) -> [Digest; 2] {
    let [k1, k2] = keys;
    [
        length_bound_digest(k1, message, associated_data),
        length_bound_digest(k2, message, associated_data),
    ]
}

/// Tree topology: each input hashed under k1 and k2, then the four digests
/// hashed again under k3 and k4.
pub fn tree(keys: &[HashKey; 4], message: &[u8], associated_data: &[u8]) -> [Digest; 2] {
    let [k1, k2, k3, k4] = keys;

    let mut inner = [0u8; 64];
    inner[0..16].copy_from_slice(&one_shot_digest(k1, associated_data));
    inner[16..32].copy_from_slice(&one_shot_digest(k2, associated_data));
    inner[32..48].copy_from_slice(&one_shot_digest(k1, message));
    inner[48..64].copy_from_slice(&one_shot_digest(k2, message));

    let digests = [one_shot_digest(k3, &inner), one_shot_digest(k4, &inner)];
    inner.zeroize();
    digests
}

/// `Poly1305_k(pad0(a) || pad0(m) || le64(|a|) || le64(|m|))`
fn length_bound_digest(key: &HashKey, message: &[u8], associated_data: &[u8]) -> Digest {
    let mut lengths = [0u8; 16];
    lengths[..8].copy_from_slice(&(associated_data.len() as u64).to_le_bytes());
    lengths[8..].copy_from_slice(&(message.len() as u64).to_le_bytes());

    let mut mac = key.poly1305();
    mac.update_padded(associated_data);
    mac.update_padded(message);
    mac.update_padded(&lengths);
    mac.finalize().into()
}

/// Plain Poly1305 with its standard final-block padding, no length binding.
fn one_shot_digest(key: &HashKey, data: &[u8]) -> Digest {
    key.poly1305().compute_unpadded(data).into()
}
