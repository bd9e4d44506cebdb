/// Onboarding session tokens
///
/// Tokens are opaque bearer handles for an onboarding session: `onb_`
/// followed by 32 random base62 characters. They are stored as-is; a
/// session is useless once completed or expired, so there is no hashing.

use rand::Rng;

const TOKEN_PREFIX: &str = "onb_";
const TOKEN_RANDOM_LENGTH: usize = 32;
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Total token length (prefix + random part)
pub const SESSION_TOKEN_LENGTH: usize = TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH;

/// Generates a new random session token
pub fn generate_session_token() -> String {
    let mut rng = rand::thread_rng();
    let random_part: String = (0..TOKEN_RANDOM_LENGTH)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();

    format!("{}{}", TOKEN_PREFIX, random_part)
}

/// Cheap shape check, used to reject junk before hitting the database
pub fn is_valid_session_token_format(token: &str) -> bool {
    token.len() == SESSION_TOKEN_LENGTH
        && token
            .strip_prefix(TOKEN_PREFIX)
            .is_some_and(|rest| rest.bytes().all(|b| b.is_ascii_alphanumeric()))
}
