//! BER (Basic Encoding Rules) definite-length TLV codec
//!
//! Each value is encoded as a TLV (Tag-Length-Value) triplet:
//!
//! ```text
//! [Tag] [Length] [Value]
//! ```
//!
//! ## Tag Encoding
//!
//! ```text
//! Bits: 8 7 6 5 4 3 2 1
//!       C C P T T T T T
//! ```
//! - CC = Class (00=Universal, 01=Application, 10=Context, 11=Private)
//! - P = Primitive (0) or Constructed (1)
//! - TTTTT = Tag number (0-30), or 11111 when the number continues in
//!   following bytes (bit 8 set on all but the last)
//!
//! ## Length Encoding
//!
//! - **Short form** (1 byte): lengths 0-127
//! - **Long form**: `0x80 | n`, then `n` big-endian length bytes
//!
//! Indefinite length (`0x80` alone) is not supported.
//!
//! ## Value Encoding
//!
//! - **Primitive**: raw content bytes
//! - **Constructed**: a stream of nested TLV records
//!
//! Everything at this module's boundary is hex text; see
//! [`bertlv_core::HexCodec`].

pub mod decoder;
pub mod encoder;
pub mod search;
pub mod types;

pub use decoder::{parse, ParseOutcome, TlvDecoder, TlvItem, TlvRecord, TlvRecords};
pub use encoder::{to_tlv, TlvEncoder};
pub use search::{fetch_value, search, SearchResult, TlvSearch};
pub use types::{BerLength, BerTag, BerTagClass};
