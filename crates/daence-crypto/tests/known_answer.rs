//! Known-answer vectors for both constructions
//!
//! Key, associated data and message are consecutive byte ranges; the
//! expected sealed outputs are the published Daence vectors and must
//! be reproduced bit for bit.

use daence_crypto::{
    ChaChaDaence, DaenceError, DeterministicAead, Salsa20Daence, SyntheticTag, TAG_SIZE,
};

const CHACHA_KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f\
                          202122232425262728292a2b2c2d2e2f303132333435363738393a3b3c3d3e3f";
const CHACHA_AD: &str = "404142434445464748494a4b4c4d4e4f";
const CHACHA_MESSAGE: &str = "505152535455565758595a5b5c5d5e5f\
                              606162636465666768696a6b6c6d6e6f70";
const CHACHA_SEALED: &str = "9976709c453c8f94e492efa770e3c221e08ea6a0e588d54e\
                             227d2c0cdee408bce9d0532a3a3627010f11f2b2e47267e533e95aa3b2e71efb68";

const SALSA20_KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f\
                           202122232425262728292a2b2c2d2e2f303132333435363738393a3b3c3d3e3f\
                           404142434445464748494a4b4c4d4e4f505152535455565758595a5b5c5d5e5f";
const SALSA20_AD: &str = "606162636465666768696a6b6c6d6e6f";
const SALSA20_MESSAGE: &str = "707172737475767778797a7b7c7d7e7f\
                               808182838485868788898a8b8c8d8e8f90";
const SALSA20_SEALED: &str = "a5096e6cd6564131dcfbd186cb1e13728e2b6719b0bf7194\
                              14fb8f328fca052acd4327d1371267961935566318553871b90cc90829a9d960f9";

fn decode(encoded: &str) -> Vec<u8> {
    hex::decode(encoded).unwrap()
}

fn check_vector<C: DeterministicAead>(cipher: &C, ad: &str, message: &str, sealed: &str) {
    let ad = decode(ad);
    let message = decode(message);
    let expected = decode(sealed);

    let actual = cipher.seal(&message, &ad).unwrap();
    assert_eq!(hex::encode(actual), sealed, "sealed output diverged from vector");
    assert_eq!(cipher.open(&expected, &ad).unwrap(), message);
}

fn check_flip_is_forgery<C: DeterministicAead>(cipher: &C, ad: &str, sealed: &str) {
    let ad = decode(ad);
    let mut sealed = decode(sealed);
    sealed[18] ^= 0x04;

    assert_eq!(cipher.open(&sealed, &ad), Err(DaenceError::ForgeryDetected));
}

#[test]
fn chacha_vector() {
    let cipher = ChaChaDaence::new(&decode(CHACHA_KEY)).unwrap();
    check_vector(&cipher, CHACHA_AD, CHACHA_MESSAGE, CHACHA_SEALED);
}

#[test]
fn chacha_tag_flip_is_forgery() {
    let cipher = ChaChaDaence::new(&decode(CHACHA_KEY)).unwrap();
    check_flip_is_forgery(&cipher, CHACHA_AD, CHACHA_SEALED);
}

#[test]
fn salsa20_vector() {
    let cipher = Salsa20Daence::new(&decode(SALSA20_KEY)).unwrap();
    check_vector(&cipher, SALSA20_AD, SALSA20_MESSAGE, SALSA20_SEALED);
}

#[test]
fn salsa20_tag_flip_is_forgery() {
    let cipher = Salsa20Daence::new(&decode(SALSA20_KEY)).unwrap();
    check_flip_is_forgery(&cipher, SALSA20_AD, SALSA20_SEALED);
}

/// The detached API produces the same bytes as the combined form, split at
/// the tag boundary.
#[test]
fn detached_matches_combined_vectors() {
    let cipher = Salsa20Daence::new(&decode(SALSA20_KEY)).unwrap();
    let expected = decode(SALSA20_SEALED);

    let mut buffer = decode(SALSA20_MESSAGE);
    let tag = cipher.seal_in_place_detached(&decode(SALSA20_AD), &mut buffer).unwrap();

    assert_eq!(&tag.to_bytes()[..], &expected[..TAG_SIZE]);
    assert_eq!(buffer, &expected[TAG_SIZE..]);
}

#[test]
fn detached_forgery_zeroes_buffer() {
    let cipher = ChaChaDaence::new(&decode(CHACHA_KEY)).unwrap();
    let sealed = decode(CHACHA_SEALED);

    let mut tag = [0u8; TAG_SIZE];
    tag.copy_from_slice(&sealed[..TAG_SIZE]);
    tag[18] ^= 0x04;
    let tag = SyntheticTag::from_bytes(&tag);

    let mut buffer = sealed[TAG_SIZE..].to_vec();
    let result = cipher.open_in_place_detached(&decode(CHACHA_AD), &mut buffer, &tag);

    assert_eq!(result, Err(DaenceError::ForgeryDetected));
    assert_eq!(buffer.len(), sealed.len() - TAG_SIZE);
    assert!(buffer.iter().all(|&b| b == 0));
}

/// Keys of one construction are never accepted by the other.
#[test]
fn key_sizes_are_not_interchangeable() {
    assert!(ChaChaDaence::new(&decode(SALSA20_KEY)).is_err());
    assert!(Salsa20Daence::new(&decode(CHACHA_KEY)).is_err());
}

/// Authentication-only mode is sealing an empty message under the data.
#[test]
fn authenticate_matches_empty_seal() {
    let cipher = Salsa20Daence::new(&decode(SALSA20_KEY)).unwrap();
    let data = decode(SALSA20_MESSAGE);

    let tag = cipher.authenticate(&data);
    assert_eq!(&cipher.seal(b"", &data).unwrap()[..], &tag.to_bytes()[..]);
    assert!(cipher.verify(&data, &tag).is_ok());

    let mut bytes = tag.to_bytes();
    bytes[18] ^= 0x04;
    let forged = SyntheticTag::from_bytes(&bytes);
    assert_eq!(cipher.verify(&data, &forged), Err(DaenceError::ForgeryDetected));
}
