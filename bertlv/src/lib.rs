//! bertlv - BER TLV and OBJECT IDENTIFIER hex codec
//!
//! A practical subset of ITU-T X.690 Basic Encoding Rules, spoken in hex
//! text: definite-length TLV encoding/decoding, depth-first tag search in
//! nested TLV streams, and OID dot notation <-> BER contents.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `bertlv-core`: Error taxonomy, hex interchange codec, decoder config
//! - `bertlv-codec`: BER TLV encoder/decoder/search and OID codec
//!
//! # Usage
//!
//! ```
//! use bertlv::{dot_notation_to_hex, fetch_value, parse, to_tlv};
//!
//! let tlv = to_tlv("9F01", "AABBCC").unwrap();
//! assert_eq!(tlv, "9F0103AABBCC");
//!
//! let outcome = parse("5F370101", "5F37");
//! assert!(outcome.is_success());
//! assert_eq!(outcome.value(), "01");
//!
//! let stream = format!("{}{}", tlv, to_tlv("9F02", "DDEEFF").unwrap());
//! assert_eq!(fetch_value("9F02", &stream).as_deref(), Some("DDEEFF"));
//!
//! assert_eq!(dot_notation_to_hex("1.2.840.113549").unwrap(), "2A864886F70D");
//! ```
//!
//! # Error model
//!
//! - `parse` never fails loudly; inspect the returned [`ParseOutcome`]
//! - `fetch_value` folds "absent" and "malformed" into `None`; `search`
//!   tells them apart
//! - `to_tlv`, `dot_notation_to_hex` and `hex_to_dot_notation` return
//!   [`CodecResult`] and fail on invalid caller input

// Re-export core types
pub use bertlv_core::{CodecError, CodecResult, DecoderConfig, ErrorKind, HexCodec};

// Re-export codec types
pub use bertlv_codec::{
    BerLength, BerTag, BerTagClass, FirstArcRule, Oid, ParseOutcome, SearchResult, TlvDecoder,
    TlvEncoder, TlvItem, TlvRecord, TlvRecords, TlvSearch,
};

pub use bertlv_codec::{
    dot_notation_to_hex, fetch_value, hex_to_dot_notation, parse, search, to_tlv,
};

pub mod ber {
    pub use bertlv_codec::ber::*;
}

pub mod oid {
    pub use bertlv_codec::oid::*;
}

/// Convert bytes to uppercase hex text
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    HexCodec::bytes_to_hex(bytes)
}

/// Convert hex text (whitespace tolerated) to bytes
pub fn hex_to_bytes(hex: &str) -> CodecResult<Vec<u8>> {
    HexCodec::hex_to_bytes(hex)
}

/// Check whether `s` is even-length hex text
pub fn is_hex(s: &str) -> bool {
    HexCodec::is_hex(s)
}
