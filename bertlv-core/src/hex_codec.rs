//! Hex text <-> byte conversion
//!
//! Every codec in this workspace talks hex at its boundary: uppercase, two
//! characters per byte, no `0x` prefix and no separators. Input is accepted
//! in either case and may contain whitespace, which is stripped before
//! validation.

use crate::error::{CodecError, CodecResult};

/// Hex interchange codec
pub struct HexCodec;

impl HexCodec {
    /// Convert bytes to uppercase hex text
    pub fn bytes_to_hex(bytes: &[u8]) -> String {
        hex::encode_upper(bytes)
    }

    /// Convert hex text to bytes
    ///
    /// Whitespace is stripped first.
    ///
    /// # Error Handling
    /// Returns `CodecError::Format` if the cleaned string has odd length or
    /// contains a non-hex character.
    pub fn hex_to_bytes(hex: &str) -> CodecResult<Vec<u8>> {
        let cleaned = strip_whitespace(hex);
        check_hex(&cleaned)?;
        hex::decode(&cleaned).map_err(|e| CodecError::Format(e.to_string()))
    }

    /// Check whether `s` is even-length hex text
    ///
    /// No whitespace is tolerated here; the empty string counts as hex.
    pub fn is_hex(s: &str) -> bool {
        s.len() % 2 == 0 && s.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Strip whitespace, validate and uppercase hex text
    ///
    /// Decoders run their input through this so that tag comparisons and
    /// the remainder they hand back are always in canonical form.
    pub fn normalize(hex: &str) -> CodecResult<String> {
        let cleaned = strip_whitespace(hex);
        check_hex(&cleaned)?;
        Ok(cleaned.to_ascii_uppercase())
    }
}

/// Validate whitespace-free hex text
///
/// Errors name the length or the first offending character, never the
/// input itself.
fn check_hex(cleaned: &str) -> CodecResult<()> {
    if cleaned.len() % 2 != 0 {
        return Err(CodecError::Format(format!(
            "Hex string must have even length, got {}",
            cleaned.len()
        )));
    }

    match cleaned.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
        Some((index, c)) => Err(CodecError::Format(format!(
            "Invalid hex character '{}' at index {}",
            c, index
        ))),
        None => Ok(()),
    }
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_bytes_to_hex_uppercase() {
        assert_eq!(HexCodec::bytes_to_hex(&[0x01, 0x02, 0xab, 0xff]), "0102ABFF");
        assert_eq!(HexCodec::bytes_to_hex(&[]), "");
    }

    #[test]
    fn test_hex_to_bytes_mixed_case_and_whitespace() {
        let bytes = HexCodec::hex_to_bytes("0a Bc\n\tDE").unwrap();
        assert_eq!(bytes, vec![0x0a, 0xbc, 0xde]);
    }

    #[test]
    fn test_hex_to_bytes_odd_length() {
        let err = HexCodec::hex_to_bytes("0102ABF").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_hex_to_bytes_invalid_character() {
        let err = HexCodec::hex_to_bytes("01gh").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.to_string().contains("'g'"));
    }

    #[test]
    fn test_is_hex() {
        assert!(HexCodec::is_hex(""));
        assert!(HexCodec::is_hex("00ffAA"));
        assert!(!HexCodec::is_hex("0"));
        assert!(!HexCodec::is_hex("0x01"));
        assert!(!HexCodec::is_hex("01 02"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(HexCodec::normalize(" 5f 37 ").unwrap(), "5F37");
        assert!(HexCodec::normalize("5F3").is_err());
        assert!(HexCodec::normalize("ZZ").is_err());
    }

    #[test]
    fn test_normalize_error_names_character_not_input() {
        let payload = format!("{}Q1{}", "AB".repeat(5_000), "CD".repeat(5_000));
        let err = HexCodec::normalize(&payload).unwrap_err();
        assert_eq!(
            err,
            CodecError::Format("Invalid hex character 'Q' at index 10000".to_string())
        );

        let err = HexCodec::normalize(&"A".repeat(20_001)).unwrap_err();
        assert_eq!(
            err,
            CodecError::Format("Hex string must have even length, got 20001".to_string())
        );
    }
}
