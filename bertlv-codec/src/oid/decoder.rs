//! OBJECT IDENTIFIER content decoder

use bertlv_core::{CodecError, CodecResult, HexCodec};

use crate::oid::types::Oid;

impl Oid {
    /// Decode BER contents octets (no tag, no length)
    ///
    /// # Decoding Process
    /// Bytes are read left to right, accumulating 7 bits each, until a
    /// byte with bit 8 clear ends one subidentifier. The first
    /// subidentifier is split into the first two arcs with the first-arc
    /// rules; the rest are arcs as-is.
    ///
    /// # Error Handling
    /// Returns error if:
    /// - `bytes` is empty (`Format`)
    /// - The last byte still has bit 8 set (`IncompleteEncoding`)
    /// - A subidentifier does not fit in 64 bits (`ArcOverflow`)
    pub fn from_ber(bytes: &[u8]) -> CodecResult<Self> {
        if bytes.is_empty() {
            return Err(CodecError::Format(
                "Empty object identifier encoding".to_string(),
            ));
        }

        let mut subidentifiers = Vec::new();
        let mut value = 0u64;
        let mut in_progress = false;

        for (pos, &byte) in bytes.iter().enumerate() {
            if value > u64::MAX >> 7 {
                return Err(CodecError::ArcOverflow(format!(
                    "Subidentifier {} exceeds 64 bits at byte {}",
                    subidentifiers.len(),
                    pos
                )));
            }
            value = (value << 7) | u64::from(byte & 0x7F);
            in_progress = byte & 0x80 != 0;

            if !in_progress {
                subidentifiers.push(value);
                value = 0;
            }
        }

        if in_progress {
            return Err(CodecError::IncompleteEncoding(format!(
                "Last byte 0x{:02X} has its continuation bit set",
                bytes[bytes.len() - 1]
            )));
        }

        Ok(Oid::from_subidentifiers(
            subidentifiers[0],
            &subidentifiers[1..],
        ))
    }

    /// Decode hex contents octets, whitespace tolerated
    pub fn from_hex(hex: &str) -> CodecResult<Self> {
        let bytes = HexCodec::hex_to_bytes(hex)?;
        Self::from_ber(&bytes)
    }
}

/// Convert BER-encoded hex to dot notation
///
/// # Error Handling
/// Returns `CodecError::Format` for empty, odd-length or non-hex input and
/// `CodecError::IncompleteEncoding` if the last subidentifier never
/// terminates.
pub fn hex_to_dot_notation(hex: &str) -> CodecResult<String> {
    Ok(Oid::from_hex(hex)?.to_string())
}
