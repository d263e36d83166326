//! Front-desk check-in codes.
//!
//! Short codes let the front desk pull up a booking without asking the
//! customer for an id or email. The alphabet drops easily-confused glyphs
//! (0/O, 1/I/L) since codes are read out loud or typed from a phone screen.

use rand::Rng;

/// Characters used in check-in codes.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Length of a generated check-in code.
pub const CODE_LENGTH: usize = 6;

/// Generate a random check-in code, e.g. `K7PM2X`.
///
/// Uniqueness is enforced by the store (unique column / retry on insert),
/// not here.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// True if `code` has the shape of a generated check-in code.
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH
        && code.bytes().all(|b| CODE_ALPHABET.contains(&b))
}
