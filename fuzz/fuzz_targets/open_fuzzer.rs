//! Fuzz target for open on attacker-controlled sealed input
//!
//! Feeds arbitrary bytes to both constructions as a sealed message.
//!
//! # Strategy
//!
//! - Arbitrary sealed bytes (shorter than, equal to, longer than a tag)
//! - Arbitrary associated data
//! - Fixed or arbitrary keys
//!
//! # Invariants
//!
//! - Open never panics
//! - Input shorter than a tag is `CiphertextTooShort`
//! - Any other rejection is `ForgeryDetected` and leaves `dst` untouched
//! - Accepted input re-seals to exactly the same bytes

#![no_main]

use arbitrary::Arbitrary;
use daence_crypto::{ChaChaDaence, DaenceError, DeterministicAead, Salsa20Daence, TAG_SIZE};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct OpenScenario {
    key: [u8; Salsa20Daence::KEY_SIZE],
    sealed: Vec<u8>,
    associated_data: Vec<u8>,
    prefix: Vec<u8>,
}

fn check_open<C: DeterministicAead>(cipher: &C, scenario: &OpenScenario) {
    let mut dst = scenario.prefix.clone();
    let result = cipher.open_append(&mut dst, &[], &scenario.sealed, &scenario.associated_data);

    match result {
        Ok(()) => {
            // INVARIANT: Opening is the inverse of sealing
            let message = &dst[scenario.prefix.len()..];
            let resealed = cipher.seal(message, &scenario.associated_data).unwrap();
            assert_eq!(resealed, scenario.sealed, "accepted input must re-seal identically");
        },
        Err(DaenceError::CiphertextTooShort { .. }) => {
            assert!(scenario.sealed.len() < TAG_SIZE);
            assert_eq!(dst, scenario.prefix);
        },
        Err(DaenceError::ForgeryDetected) => {
            // INVARIANT: Failed open restores the destination
            assert_eq!(dst, scenario.prefix, "dst must be restored on forgery");
        },
        Err(err) => panic!("unexpected error: {err}"),
    }
}

fuzz_target!(|scenario: OpenScenario| {
    let chacha = ChaChaDaence::new(&scenario.key[..ChaChaDaence::KEY_SIZE]).unwrap();
    check_open(&chacha, &scenario);

    let salsa20 = Salsa20Daence::from_bytes(&scenario.key);
    check_open(&salsa20, &scenario);
});
