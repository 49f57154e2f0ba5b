//! Short code generation and format checks.
//!
//! Codes are 6-8 ASCII letters or digits. Generated codes are always 6
//! characters long and come from the OS random source.

use base64::Engine as _;
use regex::Regex;
use std::sync::LazyLock;

/// Pattern every short code must match, caller-supplied or generated.
pub static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{6,8}$").expect("code pattern is valid"));

/// Number of random bytes drawn per candidate (4 bytes encode to 6 base64 chars).
const CODE_RANDOM_BYTES: usize = 4;

/// Length of generated codes.
pub const GENERATED_CODE_LENGTH: usize = 6;

/// Replacement for base64url characters outside `[A-Za-z0-9]` (`-` and `_`).
pub const FALLBACK_CODE_CHAR: char = 'A';

/// Returns true if `code` is a well-formed short code.
pub fn is_valid_code(code: &str) -> bool {
    CODE_REGEX.is_match(code)
}

/// Generates a random candidate code.
///
/// The candidate is not checked for uniqueness; see
/// [`crate::application::services::LinkService`] for the retry loop.
///
/// # Errors
///
/// Returns an error if the system random number generator fails.
pub fn generate_code() -> Result<String, getrandom::Error> {
    let mut buffer = [0u8; CODE_RANDOM_BYTES];
    getrandom::fill(&mut buffer)?;

    Ok(encode_candidate(&buffer))
}

/// Encodes raw bytes into a code that always satisfies [`CODE_REGEX`].
fn encode_candidate(bytes: &[u8]) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD
        .encode(bytes)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c
            } else {
                FALLBACK_CODE_CHAR
            }
        })
        .take(GENERATED_CODE_LENGTH)
        .collect()
}
