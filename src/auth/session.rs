//! Session token generation.

use base64::{Engine as _, engine::general_purpose};
use rand::Rng;

/// Generates a random session token: 32 bytes of OS-seeded randomness,
/// base64url encoded without padding (43 characters)
pub fn generate_session_token() -> String {
    let mut token_bytes = [0u8; 32];
    rand::rng().fill(&mut token_bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(token_bytes)
}
