//! BER TLV and OBJECT IDENTIFIER codec
//!
//! This crate provides the `ber` module (definite-length TLV encoding,
//! decoding and nested tag search) and the `oid` module (dot notation to
//! BER contents and back).
//!
//! # Error model
//!
//! TLV decoding returns a [`ber::ParseOutcome`] instead of an `Err`, since
//! malformed wire data is expected input. Encoding and OID decoding return
//! `CodecResult` and fail on the first contract violation.

pub mod ber;
pub mod oid;

pub use ber::{
    fetch_value, parse, search, to_tlv, BerLength, BerTag, BerTagClass, ParseOutcome,
    SearchResult, TlvDecoder, TlvEncoder, TlvItem, TlvRecord, TlvRecords, TlvSearch,
};
pub use oid::{dot_notation_to_hex, hex_to_dot_notation, FirstArcRule, Oid};
