//! Short code generation.
//!
//! Codes are 8 characters from the URL-safe base64 alphabet
//! (`A-Z a-z 0-9 - _`). Uniqueness is not checked here; the link store rejects
//! collisions on insert and the caller retries with a fresh code.

use base64::Engine as _;

/// Number of characters in a generated short code.
pub const CODE_LENGTH: usize = 8;

/// Random bytes per code. 6 bytes encode to exactly 8 base64 symbols, so every
/// symbol carries a full, uniform 6 bits.
const CODE_LENGTH_BYTES: usize = CODE_LENGTH * 6 / 8;

/// Generates a cryptographically secure random short code.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding.
///
/// # Panics
///
/// Panics if the operating system random number generator fails.
pub fn generate_code() -> String {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}

/// Returns true if `code` has the shape of a generated short code.
///
/// Lets the redirect path answer 404 for obviously foreign paths without a
/// store round trip.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH
        && code
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
