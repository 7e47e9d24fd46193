// ============================
// accountgate-backend-lib/src/auth/token_generator.rs
// ============================
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
/** Random secret generation for accounts
Auth keys are embedded in every session token, so they come from the
thread-local CSPRNG. Account ids mimic the 12-byte object-id shape used by
the credential store. */
use rand::RngCore;

/// Auth key size in bytes (32 bytes = 256 bits of entropy)
const AUTH_KEY_BYTES: usize = 32;

/// Object id size in bytes, rendered as 24 hex characters
const OBJECT_ID_BYTES: usize = 12;

fn random_bytes(len: usize) -> Vec<u8> {
    let mut buffer = vec![0u8; len];
    rand::rng().fill_bytes(&mut buffer);
    buffer
}

/** Generate a fresh auth key
# Returns
A base64 URL-safe encoded string without padding */
pub fn generate_auth_key() -> String {
    URL_SAFE_NO_PAD.encode(random_bytes(AUTH_KEY_BYTES))
}

/// Generate a new object-id shaped account identifier
pub fn generate_object_id() -> String {
    random_bytes(OBJECT_ID_BYTES)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
