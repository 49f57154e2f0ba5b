//! Destination URL checks.

use url::Url;

/// Errors that can occur while checking a destination URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must not contain control characters")]
    ControlCharacter,
}

/// Checks that `input` is an absolute `http` or `https` URL.
///
/// The URL is stored exactly as submitted; nothing is normalized. The
/// parser strips tabs and newlines silently, so they are rejected up front:
/// the stored string must stay a valid `Location` header value.
///
/// # Errors
///
/// - [`UrlValidationError::ControlCharacter`] if any ASCII control character is present
/// - [`UrlValidationError::InvalidFormat`] for strings that do not parse as an absolute URL
/// - [`UrlValidationError::UnsupportedProtocol`] for any other scheme
///   (`ftp:`, `javascript:`, `data:`, `file:` ...)
pub fn validate_destination_url(input: &str) -> Result<(), UrlValidationError> {
    if input.chars().any(|c| c.is_ascii_control()) {
        return Err(UrlValidationError::ControlCharacter);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(UrlValidationError::UnsupportedProtocol),
    }
}
