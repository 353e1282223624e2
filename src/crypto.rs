use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Generates a cryptographically random `state` parameter for the
/// authorization request.
///
/// Returns a 22-character URL-safe string (16 random bytes → base64url).
/// Store it before redirecting and compare it with
/// [`AuthorizationResult::state`](crate::AuthorizationResult::state).
#[must_use]
pub fn generate_state() -> String {
    let random_bytes: [u8; 16] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(random_bytes)
}

/// Digest the Smartsheet token endpoint checks in the `hash` parameter.
///
/// `hash = HEX(SHA256("{client_secret}|{credential}"))`, where the credential
/// is the authorization code or the refresh token being redeemed.
#[must_use]
pub(crate) fn token_hash(client_secret: &str, credential: &str) -> String {
    let digest = Sha256::digest(format!("{client_secret}|{credential}").as_bytes());
    hex::encode(digest)
}
