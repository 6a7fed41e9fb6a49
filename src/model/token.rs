//! Webhook token generation.

use rand::RngCore;
use rand::rngs::OsRng;

/// Number of random bytes in a token (256 bits of entropy).
pub const TOKEN_BYTES: usize = 32;

/// Generates a new webhook token: [`TOKEN_BYTES`] bytes from the operating
/// system's CSPRNG, hex-encoded.
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
