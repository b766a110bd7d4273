pub mod url_validator;

pub use url_validator::{UrlValidationError, validate_url};

/// 短码字母表：62 个字母和数字
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a short code of `length` characters.
///
/// Each character is drawn independently and uniformly from [`CODE_ALPHABET`]
/// using the thread-local CSPRNG (ChaCha, seeded from the OS). No collision
/// check happens here; uniqueness is enforced by the link store.
pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}
