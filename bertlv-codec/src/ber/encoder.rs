//! BER definite-length TLV encoder
//!
//! # Usage Example
//!
//! ```rust
//! use bertlv_codec::ber::{to_tlv, TlvEncoder};
//!
//! assert_eq!(to_tlv("9F01", "AABBCC").unwrap(), "9F0103AABBCC");
//!
//! let mut encoder = TlvEncoder::new();
//! encoder
//!     .encode_constructed("70", |inner| inner.encode_tlv("5A", &[0x12, 0x34]))
//!     .unwrap();
//! assert_eq!(encoder.into_hex(), "70045A021234");
//! ```

use bertlv_core::{CodecResult, HexCodec};

use crate::ber::types::{BerLength, BerTag};

/// Build a single TLV record as hex text
///
/// The length field is the BER definite length of `value_hex` in bytes. An
/// empty `tag` is allowed and emits no tag bytes. Whitespace is stripped
/// and the output is uppercase.
///
/// # Error Handling
/// Returns `CodecError::Format` if `tag` or `value_hex` is not even-length
/// hex text.
pub fn to_tlv(tag: &str, value_hex: &str) -> CodecResult<String> {
    let tag = HexCodec::normalize(tag)?;
    let value = HexCodec::normalize(value_hex)?;
    let length = HexCodec::bytes_to_hex(&BerLength::new(value.len() / 2).encode());

    let mut tlv = String::with_capacity(tag.len() + length.len() + value.len());
    tlv.push_str(&tag);
    tlv.push_str(&length);
    tlv.push_str(&value);
    Ok(tlv)
}

/// Buffer-accumulating TLV encoder
///
/// Records are appended one after the other, so the buffer holds a stream
/// of sibling TLVs. Nested structures are built with
/// [`TlvEncoder::encode_constructed`].
#[derive(Debug, Clone, Default)]
pub struct TlvEncoder {
    buffer: Vec<u8>,
}

impl TlvEncoder {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Create a new encoder with initial capacity in bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Append a TLV record whose tag is given as hex text
    ///
    /// # Error Handling
    /// Returns `CodecError::Format` if `tag_hex` is not valid hex.
    pub fn encode_tlv(&mut self, tag_hex: &str, value: &[u8]) -> CodecResult<()> {
        let tag = HexCodec::hex_to_bytes(tag_hex)?;
        self.append(&tag, value);
        Ok(())
    }

    /// Append a TLV record with a structured tag
    pub fn encode_tag(&mut self, tag: &BerTag, value: &[u8]) {
        self.append(&tag.encode(), value);
    }

    /// Append a record whose value is the stream built by `build`
    ///
    /// The closure receives a fresh encoder; its output becomes the value of
    /// the record tagged `tag_hex`.
    pub fn encode_constructed<F>(&mut self, tag_hex: &str, build: F) -> CodecResult<()>
    where
        F: FnOnce(&mut TlvEncoder) -> CodecResult<()>,
    {
        let mut inner = TlvEncoder::new();
        build(&mut inner)?;
        self.encode_tlv(tag_hex, &inner.buffer)
    }

    fn append(&mut self, tag: &[u8], value: &[u8]) {
        self.buffer.extend_from_slice(tag);
        self.buffer
            .extend_from_slice(&BerLength::new(value.len()).encode());
        self.buffer.extend_from_slice(value);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the encoded stream as uppercase hex text
    pub fn into_hex(self) -> String {
        HexCodec::bytes_to_hex(&self.buffer)
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
