//! Generic compressor stage
//!
//! The dictionary-substituted payload is handed to a reversible
//! string-to-string compressor whose output is safe in a URL query. The
//! codec then swaps every `-` for `_` so host pages that break long
//! lines at hyphens cannot split a token.

/// Character removed from compressed output
pub const URL_UNSAFE_CHAR: char = '-';

/// Character written in its place
pub const URL_SAFE_REPLACEMENT: char = '_';

/// Reversible text compressor with a URL-safe output alphabet.
///
/// Implementations must never emit [`URL_SAFE_REPLACEMENT`], otherwise
/// the URL-safety substitution cannot be undone.
pub trait Compressor {
    /// Compress text into a URL-safe string
    fn compress(&self, input: &str) -> String;

    /// Restore the original text, `None` if the input is not valid
    fn decompress(&self, input: &str) -> Option<String>;
}

impl<C: Compressor + ?Sized> Compressor for &C {
    fn compress(&self, input: &str) -> String {
        (**self).compress(input)
    }

    fn decompress(&self, input: &str) -> Option<String> {
        (**self).decompress(input)
    }
}

impl<C: Compressor + ?Sized> Compressor for Box<C> {
    fn compress(&self, input: &str) -> String {
        (**self).compress(input)
    }

    fn decompress(&self, input: &str) -> Option<String> {
        (**self).decompress(input)
    }
}

/// LZ-string compression to the URI-component alphabet
/// (`A-Z a-z 0-9 + - $`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LzStringCompressor;

impl Compressor for LzStringCompressor {
    fn compress(&self, input: &str) -> String {
        lz_str::compress_to_encoded_uri_component(input)
    }

    fn decompress(&self, input: &str) -> Option<String> {
        let wide = lz_str::decompress_from_encoded_uri_component(input)?;
        String::from_utf16(&wide).ok()
    }
}

/// Replace every `-` with `_`
pub fn to_url_safe(compressed: &str) -> String {
    compressed.replace(URL_UNSAFE_CHAR, &URL_SAFE_REPLACEMENT.to_string())
}

/// Undo [`to_url_safe`]
pub fn from_url_safe(token: &str) -> String {
    token.replace(URL_SAFE_REPLACEMENT, &URL_UNSAFE_CHAR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lz_roundtrip() {
        let lz = LzStringCompressor;
        let text = "{a:T,b:<03:~07}\u{1f}alpha/beta ünïcødé €";
        let compressed = lz.compress(text);
        assert_eq!(lz.decompress(&compressed).as_deref(), Some(text));
    }

    #[test]
    fn test_lz_alphabet_has_no_underscore() {
        let lz = LzStringCompressor;
        let text: String = (0..2000u32)
            .filter_map(|i| char::from_u32(i * 7 + 32))
            .collect();
        let compressed = lz.compress(&text);
        assert!(!compressed.contains(URL_SAFE_REPLACEMENT));
        assert!(compressed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '$')));
    }

    #[test]
    fn test_url_safe_substitution() {
        assert_eq!(to_url_safe("a-b--c"), "a_b__c");
        assert_eq!(from_url_safe("a_b__c"), "a-b--c");
        assert_eq!(to_url_safe("plain"), "plain");
    }

    #[test]
    fn test_lz_rejects_garbage() {
        let lz = LzStringCompressor;
        let restored = lz.decompress("not!a*token");
        assert!(restored.map_or(true, |text| text != "not!a*token"));
    }
}
