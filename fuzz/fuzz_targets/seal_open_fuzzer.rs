//! Fuzz target for seal/open round trips and tampering
//!
//! # Strategy
//!
//! - Arbitrary keys, messages and associated data
//! - One arbitrary mutation of the sealed output or the associated data
//!
//! # Invariants
//!
//! - Seal is deterministic
//! - Sealed length is message length plus 24
//! - Open recovers the message
//! - Any single-bit flip is `ForgeryDetected`, and the in-place buffer is
//!   zeroed

#![no_main]

use arbitrary::Arbitrary;
use daence_crypto::{
    ChaChaDaence, DaenceError, DeterministicAead, Salsa20Daence, SyntheticTag, TAG_SIZE,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct RoundTripScenario {
    key: [u8; Salsa20Daence::KEY_SIZE],
    message: Vec<u8>,
    associated_data: Vec<u8>,
    tamper: Tamper,
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum Tamper {
    /// Leave everything intact
    None,
    /// Flip one bit of the sealed output (index taken modulo length)
    Sealed { index: u16, bit: u8 },
    /// Flip one bit of the associated data (skipped when empty)
    AssociatedData { index: u16, bit: u8 },
}

fn check_round_trip<C: DeterministicAead>(cipher: &C, scenario: &RoundTripScenario) {
    let message = &scenario.message;
    let ad = &scenario.associated_data;

    // INVARIANT 1: Deterministic output of the right size
    let sealed = cipher.seal(message, ad).unwrap();
    assert_eq!(sealed, cipher.seal(message, ad).unwrap(), "seal must be deterministic");
    assert_eq!(sealed.len(), message.len() + TAG_SIZE);

    // INVARIANT 2: Round trip
    assert_eq!(&cipher.open(&sealed, ad).unwrap(), message);

    match scenario.tamper {
        Tamper::None => {},
        Tamper::Sealed { index, bit } => {
            let index = usize::from(index) % sealed.len();
            let mut forged = sealed.clone();
            forged[index] ^= 1 << (bit % 8);

            // INVARIANT 3: Tampered sealed output is a forgery
            assert_eq!(cipher.open(&forged, ad), Err(DaenceError::ForgeryDetected));

            // INVARIANT 4: Detached open zeroes the buffer on forgery
            let mut tag = [0u8; TAG_SIZE];
            tag.copy_from_slice(&forged[..TAG_SIZE]);
            let mut buffer = forged[TAG_SIZE..].to_vec();
            let result =
                cipher.open_in_place_detached(ad, &mut buffer, &SyntheticTag::from_bytes(&tag));
            assert_eq!(result, Err(DaenceError::ForgeryDetected));
            assert!(buffer.iter().all(|&b| b == 0), "buffer must be zeroed on forgery");
        },
        Tamper::AssociatedData { index, bit } => {
            if ad.is_empty() {
                return;
            }
            let mut other = ad.clone();
            other[usize::from(index) % ad.len()] ^= 1 << (bit % 8);

            // INVARIANT 5: Associated data is bound to the tag
            assert_eq!(cipher.open(&sealed, &other), Err(DaenceError::ForgeryDetected));
        },
    }
}

fuzz_target!(|scenario: RoundTripScenario| {
    let mut chacha_key = [0u8; ChaChaDaence::KEY_SIZE];
    chacha_key.copy_from_slice(&scenario.key[..ChaChaDaence::KEY_SIZE]);
    check_round_trip(&ChaChaDaence::from_bytes(&chacha_key), &scenario);

    check_round_trip(&Salsa20Daence::from_bytes(&scenario.key), &scenario);
});
