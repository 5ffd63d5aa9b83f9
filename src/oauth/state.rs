use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Bytes of entropy in an authorization `state` value.
pub const STATE_BYTES: usize = 16;

/// Generate a random, URL-safe `state` value for one login attempt.
pub fn generate_state() -> String {
    let mut buf = [0u8; STATE_BYTES];
    rand::Rng::fill_bytes(&mut rand::rng(), &mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}
