//! Short id generation for layers and markers.
//!
//! # Responsibility
//! - Produce fixed-length base-36 identifiers from a non-cryptographic
//!   random source.
//!
//! # Invariants
//! - Ids are exactly [`ID_LENGTH`] lowercase base-36 characters.
//! - Uniqueness is probabilistic, not guaranteed; callers scope ids to a
//!   single layer (markers) or a single map (layers), where the expected
//!   population is small enough for collisions to be negligible.

use rand::Rng;

/// Number of characters in a generated id.
pub const ID_LENGTH: usize = 8;

const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Returns a fresh 8-character base-36 id.
///
/// Not suitable for security-sensitive identifiers; the random source is
/// non-cryptographic by design.
pub fn next_id() -> String {
    let mut rng = rand::rng();
    (0..ID_LENGTH)
        .map(|_| {
            let index = rng.random_range(0..ID_ALPHABET.len());
            ID_ALPHABET[index] as char
        })
        .collect()
}
