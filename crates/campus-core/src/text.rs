//! Name normalization.
//!
//! Usernames are derived from human names, which arrive with accents,
//! spaces and mixed case. [`normalize`] reduces a name to a lowercase,
//! whitespace-free, ASCII-only token:
//!
//! 1. Canonical decomposition (NFD) splits accented letters into a base
//!    letter followed by combining marks.
//! 2. Whitespace is removed.
//! 3. Every non-ASCII code point is dropped, which removes the combining
//!    marks and keeps the base letters.
//! 4. The result is lower-cased.
//!
//! ```ignore
//! use campus_core::text::normalize;
//!
//! assert_eq!(normalize("Clàudia Martí"), "claudiamarti");
//! assert_eq!(normalize("Asel·lia"), "asellia");
//! ```

use unicode_normalization::UnicodeNormalization;

/// Capability for turning a raw name part into a username token.
///
/// The provisioning service takes any sanitizer, so callers can swap in a
/// different policy (for example one that keeps case) without touching
/// the username search itself.
pub trait TextSanitizer: Send + Sync {
    fn normalize(&self, input: &str) -> String;
}

/// Default sanitizer: NFD, strip whitespace, strip non-ASCII, lower-case.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiNormalizer;

impl TextSanitizer for AsciiNormalizer {
    fn normalize(&self, input: &str) -> String {
        normalize(input)
    }
}

/// Normalizes a name part into a lowercase ASCII token.
pub fn normalize(input: &str) -> String {
    input
        .nfd()
        .filter(|c| c.is_ascii() && !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
