//! BER definite-length TLV decoder
//!
//! The decoder reads one record from the front of a hex string and hands
//! back everything after it as `remaining_data`. Sibling records are read by
//! feeding that remainder into the next call; the decoder itself keeps no
//! position between calls.
//!
//! Whole streams are better read with [`TlvDecoder::records`], which decodes
//! the hex once and walks the bytes by offset.
//!
//! # Usage Example
//!
//! ```rust
//! use bertlv_codec::ber::parse;
//!
//! let outcome = parse("5F3701019F0201FF", "5F37");
//! assert!(outcome.is_success());
//! assert_eq!(outcome.value(), "01");
//!
//! let next = parse(outcome.remaining_data(), "");
//! assert_eq!(next.tag(), "9F02");
//! ```

use std::ops::Range;

use bertlv_core::{CodecError, CodecResult, DecoderConfig, ErrorKind, HexCodec};
use serde::{Deserialize, Serialize};

use crate::ber::types::{BerLength, BerTag};

/// One successfully decoded TLV record
///
/// All hex fields are uppercase. `length` is always `value.len() / 2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlvRecord {
    pub tag: String,
    pub length: usize,
    pub value: String,
    pub remaining_data: String,
}

impl TlvRecord {
    /// Structural view of the tag (class, constructed flag, number)
    ///
    /// Returns `None` when the tag was supplied by the caller and is not a
    /// single well-formed BER identifier, or its number exceeds 32 bits.
    pub fn tag_info(&self) -> Option<BerTag> {
        single_identifier(&self.tag)
    }
}

/// One record yielded by [`TlvRecords`]
///
/// Unlike [`TlvRecord`] it carries its byte offset in the stream instead of
/// a copy of everything after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlvItem {
    /// Byte offset of the tag within the stream
    pub offset: usize,
    pub tag: String,
    pub length: usize,
    pub value: String,
}

impl TlvItem {
    /// Structural view of the tag, see [`TlvRecord::tag_info`]
    pub fn tag_info(&self) -> Option<BerTag> {
        single_identifier(&self.tag)
    }
}

fn single_identifier(tag_hex: &str) -> Option<BerTag> {
    let bytes = HexCodec::hex_to_bytes(tag_hex).ok()?;
    match BerTag::decode(&bytes) {
        Ok((tag, consumed)) if consumed == bytes.len() => Some(tag),
        _ => None,
    }
}

/// Byte layout of one record at the front of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TlvFrame {
    pub(crate) tag_len: usize,
    pub(crate) length_len: usize,
    pub(crate) value_len: usize,
}

impl TlvFrame {
    pub(crate) fn value_range(&self) -> Range<usize> {
        let start = self.tag_len + self.length_len;
        start..start + self.value_len
    }

    /// Total encoded size of the record
    pub(crate) fn len(&self) -> usize {
        self.tag_len + self.length_len + self.value_len
    }
}

/// Immutable result of a single [`TlvDecoder::parse`] call
///
/// Decoding never fails loudly: malformed input is reported through
/// [`is_success`](Self::is_success), [`error_kind`](Self::error_kind) and
/// [`error_message`](Self::error_message). On failure the tag and value
/// are empty and `remaining_data` is the input, unconsumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    result: Result<TlvRecord, CodecError>,
    error_message: Option<String>,
    unconsumed: String,
}

impl ParseOutcome {
    fn success(record: TlvRecord) -> Self {
        Self {
            result: Ok(record),
            error_message: None,
            unconsumed: String::new(),
        }
    }

    fn failure(error: CodecError, data: &str) -> Self {
        Self {
            error_message: Some(error.to_string()),
            result: Err(error),
            unconsumed: data.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.result.as_ref().err().map(CodecError::kind)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn error(&self) -> Option<&CodecError> {
        self.result.as_ref().err()
    }

    pub fn tag(&self) -> &str {
        self.result.as_ref().map_or("", |r| r.tag.as_str())
    }

    pub fn value(&self) -> &str {
        self.result.as_ref().map_or("", |r| r.value.as_str())
    }

    pub fn value_length(&self) -> usize {
        self.result.as_ref().map_or(0, |r| r.length)
    }

    pub fn remaining_data(&self) -> &str {
        match &self.result {
            Ok(r) => &r.remaining_data,
            Err(_) => &self.unconsumed,
        }
    }

    pub fn record(&self) -> Option<&TlvRecord> {
        self.result.as_ref().ok()
    }

    /// Tagged `Result` view of the outcome
    pub fn into_result(self) -> CodecResult<TlvRecord> {
        self.result
    }
}

/// BER definite-length TLV decoder
///
/// Holds only its [`DecoderConfig`], so one decoder can serve any number
/// of independent parse chains.
#[derive(Debug, Clone, Copy, Default)]
pub struct TlvDecoder {
    config: DecoderConfig,
}

impl TlvDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Parse one TLV record from the front of `data`
    ///
    /// # Arguments
    /// * `data` - Hex text, case-insensitive, whitespace tolerated
    /// * `expected_tag` - Tag `data` must start with; blank to read
    ///   whatever BER tag is present
    ///
    /// # Decoding Process
    /// 1. Empty `data` fails with `EmptyData`, non-hex with `Format`
    /// 2. A non-blank `expected_tag` must prefix `data`, else `TagMismatch`.
    ///    An `expected_tag` that is not whole hex bytes (odd length, non-hex
    ///    characters) never prefixes a record and is also a `TagMismatch`.
    /// 3. The tag is consumed: `expected_tag`'s bytes, or the BER
    ///    identifier octets when no tag was given
    /// 4. The definite length is read (`TruncatedLength` if cut short)
    /// 5. That many value bytes are read (`TruncatedValue` if cut short)
    pub fn parse(&self, data: &str, expected_tag: &str) -> ParseOutcome {
        match self.decode(data, expected_tag) {
            Ok(record) => {
                log::trace!(
                    "Decoded TLV tag {} with {} value bytes",
                    record.tag,
                    record.length
                );
                ParseOutcome::success(record)
            }
            Err(e) => {
                log::debug!("TLV decode failed: {}", e);
                ParseOutcome::failure(e, data)
            }
        }
    }

    fn decode(&self, data: &str, expected_tag: &str) -> CodecResult<TlvRecord> {
        if data.trim().is_empty() {
            return Err(CodecError::EmptyData);
        }
        let hex = HexCodec::normalize(data)?;
        let bytes = HexCodec::hex_to_bytes(&hex)?;

        let tag_len = if expected_tag.trim().is_empty() {
            BerTag::identifier_len(&bytes)?
        } else {
            expected_tag_len(&hex, expected_tag)?
        };

        let frame = self.frame_after_tag(&bytes, tag_len)?;
        let value = frame.value_range();

        Ok(TlvRecord {
            tag: hex[..tag_len * 2].to_string(),
            length: frame.value_len,
            value: hex[value.start * 2..value.end * 2].to_string(),
            remaining_data: hex[frame.len() * 2..].to_string(),
        })
    }

    /// Locate the record at the front of `bytes` using its BER identifier
    pub(crate) fn frame(&self, bytes: &[u8]) -> CodecResult<TlvFrame> {
        let tag_len = BerTag::identifier_len(bytes)?;
        self.frame_after_tag(bytes, tag_len)
    }

    fn frame_after_tag(&self, bytes: &[u8], tag_len: usize) -> CodecResult<TlvFrame> {
        let (length, length_len) =
            BerLength::decode(&bytes[tag_len..], self.config.max_length_octets)?;
        let value_len = length.value();
        let available = bytes.len() - tag_len - length_len;
        if available < value_len {
            return Err(CodecError::TruncatedValue {
                needed: value_len,
                available,
            });
        }

        Ok(TlvFrame {
            tag_len,
            length_len,
            value_len,
        })
    }

    /// Iterate over the sibling records of a stream
    ///
    /// `data` is decoded from hex once up front and then walked by byte
    /// offset. Each record is read with no expected tag. Iteration stops
    /// after the first error, which is yielded once.
    pub fn records(&self, data: &str) -> TlvRecords {
        let (bytes, pending) = match HexCodec::hex_to_bytes(data) {
            Ok(bytes) => (bytes, None),
            Err(e) => (Vec::new(), Some(e)),
        };

        TlvRecords {
            decoder: *self,
            bytes,
            offset: 0,
            pending,
            done: false,
        }
    }

    /// Decode every sibling record of a stream
    pub fn parse_all(&self, data: &str) -> CodecResult<Vec<TlvItem>> {
        self.records(data).collect()
    }
}

/// Byte width of `expected_tag` when `hex` starts with it
fn expected_tag_len(hex: &str, expected_tag: &str) -> CodecResult<usize> {
    let expected: String = expected_tag
        .split_whitespace()
        .collect::<String>()
        .to_ascii_uppercase();

    if HexCodec::is_hex(&expected) && hex.starts_with(&expected) {
        return Ok(expected.len() / 2);
    }

    let found = &hex[..expected.len().min(hex.len())];
    Err(CodecError::TagMismatch {
        expected,
        found: found.to_string(),
    })
}

/// Iterator over sibling TLV records, see [`TlvDecoder::records`]
pub struct TlvRecords {
    decoder: TlvDecoder,
    bytes: Vec<u8>,
    offset: usize,
    pending: Option<CodecError>,
    done: bool,
}

impl Iterator for TlvRecords {
    type Item = CodecResult<TlvItem>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(e) = self.pending.take() {
            self.done = true;
            return Some(Err(e));
        }

        let rest = &self.bytes[self.offset..];
        if rest.is_empty() {
            return None;
        }

        match self.decoder.frame(rest) {
            Ok(frame) => {
                let item = TlvItem {
                    offset: self.offset,
                    tag: HexCodec::bytes_to_hex(&rest[..frame.tag_len]),
                    length: frame.value_len,
                    value: HexCodec::bytes_to_hex(&rest[frame.value_range()]),
                };
                self.offset += frame.len();
                Some(Ok(item))
            }
            Err(e) => {
                log::debug!("TLV stream stopped at byte {}: {}", self.offset, e);
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Parse one record with the default configuration
pub fn parse(data: &str, expected_tag: &str) -> ParseOutcome {
    TlvDecoder::new().parse(data, expected_tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::encoder::to_tlv;
    use crate::ber::types::BerTagClass;
    use quickcheck::{Arbitrary, Gen, TestResult};
    use std::time::{Duration, Instant};

    #[test]
    fn test_parse_expected_tag() {
        let outcome = parse("5F370101", "5F37");
        assert!(outcome.is_success());
        assert_eq!(outcome.tag(), "5F37");
        assert_eq!(outcome.value(), "01");
        assert_eq!(outcome.value_length(), 1);
        assert_eq!(outcome.remaining_data(), "");
        assert_eq!(outcome.error_kind(), None);
        assert_eq!(outcome.error_message(), None);
    }

    #[test]
    fn test_parse_truncated_length() {
        let outcome = parse("5F37", "5F37");
        assert!(!outcome.is_success());
        assert_eq!(outcome.error_kind(), Some(ErrorKind::TruncatedLength));
        assert_eq!(outcome.tag(), "");
        assert_eq!(outcome.remaining_data(), "5F37");
    }

    #[test]
    fn test_parse_truncated_long_length() {
        let outcome = parse("048201", "");
        assert_eq!(outcome.error_kind(), Some(ErrorKind::TruncatedLength));
    }

    #[test]
    fn test_parse_empty_data() {
        assert_eq!(parse("", "5F37").error_kind(), Some(ErrorKind::EmptyData));
        assert_eq!(parse("  ", "").error_kind(), Some(ErrorKind::EmptyData));
    }

    #[test]
    fn test_parse_format_error() {
        let outcome = parse("5F3701G1", "5F37");
        assert_eq!(outcome.error_kind(), Some(ErrorKind::Format));
        assert!(outcome.error_message().is_some());
        assert_eq!(parse("5F3", "").error_kind(), Some(ErrorKind::Format));
    }

    #[test]
    fn test_parse_tag_mismatch_leaves_data() {
        let outcome = parse("9F0101AA", "5F37");
        assert_eq!(outcome.error_kind(), Some(ErrorKind::TagMismatch));
        assert_eq!(outcome.remaining_data(), "9F0101AA");
        assert_eq!(
            outcome.error(),
            Some(&CodecError::TagMismatch {
                expected: "5F37".to_string(),
                found: "9F01".to_string()
            })
        );
    }

    #[test]
    fn test_parse_malformed_expected_tag_is_mismatch() {
        let outcome = parse("5F370101", "5F3");
        assert_eq!(
            outcome.error(),
            Some(&CodecError::TagMismatch {
                expected: "5F3".to_string(),
                found: "5F3".to_string()
            })
        );
        assert_eq!(outcome.remaining_data(), "5F370101");

        assert_eq!(
            parse("5F370101", "5G").error_kind(),
            Some(ErrorKind::TagMismatch)
        );
        assert!(parse("5F370101", " 5f 37 ").is_success());
    }

    #[test]
    fn test_parse_truncated_value() {
        let outcome = parse("9F010BAABBCC", "");
        assert_eq!(
            outcome.error(),
            Some(&CodecError::TruncatedValue {
                needed: 11,
                available: 3
            })
        );
    }

    #[test]
    fn test_parse_indefinite_length() {
        assert_eq!(
            parse("30800000", "").error_kind(),
            Some(ErrorKind::IndefiniteLength)
        );
    }

    #[test]
    fn test_parse_length_octet_limit() {
        let decoder = TlvDecoder::with_config(DecoderConfig::new().with_max_length_octets(1));
        let outcome = decoder.parse("0482010000", "");
        assert_eq!(outcome.error_kind(), Some(ErrorKind::LengthOverflow));
    }

    #[test]
    fn test_parse_case_and_whitespace_insensitive() {
        let outcome = parse("5f 37 02 ab cd 9f", "5f37");
        assert!(outcome.is_success());
        assert_eq!(outcome.tag(), "5F37");
        assert_eq!(outcome.value(), "ABCD");
        assert_eq!(outcome.remaining_data(), "9F");
    }

    #[test]
    fn test_parse_without_tag_uses_ber_identifier() {
        let outcome = parse("9F0203DDEEFF", "");
        assert_eq!(outcome.tag(), "9F02");
        assert_eq!(outcome.value(), "DDEEFF");

        let outcome = parse("0401FF", "");
        assert_eq!(outcome.tag(), "04");
        assert_eq!(outcome.value(), "FF");

        let outcome = parse("9F", "");
        assert_eq!(outcome.error_kind(), Some(ErrorKind::TruncatedTag));
    }

    #[test]
    fn test_parse_long_form_length() {
        let value = "CD".repeat(300);
        let tlv = to_tlv("DF8101", &value).unwrap();
        let outcome = parse(&format!("{}0000", tlv), "DF8101");
        assert!(outcome.is_success());
        assert_eq!(outcome.value_length(), 300);
        assert_eq!(outcome.value(), value);
        assert_eq!(outcome.remaining_data(), "0000");
    }

    #[test]
    fn test_sequential_parse() {
        let data = "5F2403251231570812345678901234565A0100";
        let first = parse(data, "5F24");
        assert_eq!(first.value(), "251231");

        let second = parse(first.remaining_data(), "57");
        assert_eq!(second.value(), "1234567890123456");

        let third = parse(second.remaining_data(), "5A");
        assert_eq!(third.value(), "00");
        assert_eq!(third.remaining_data(), "");

        let fourth = parse(third.remaining_data(), "");
        assert_eq!(fourth.error_kind(), Some(ErrorKind::EmptyData));
    }

    #[test]
    fn test_records_iterator() {
        let decoder = TlvDecoder::new();
        let records = decoder.parse_all("9F0101AA820201025A00").unwrap();
        let tags: Vec<&str> = records.iter().map(|r| r.tag.as_str()).collect();
        assert_eq!(tags, vec!["9F01", "82", "5A"]);
        assert_eq!(records[1].value, "0102");
        assert_eq!(records[2].length, 0);
        let offsets: Vec<usize> = records.iter().map(|r| r.offset).collect();
        assert_eq!(offsets, vec![0, 4, 8]);
        assert!(records[1].tag_info().is_some());

        let mut iter = decoder.records("9F0101AA9F0205");
        assert!(iter.next().unwrap().is_ok());
        assert_eq!(
            iter.next().unwrap().unwrap_err().kind(),
            ErrorKind::TruncatedValue
        );
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_records_rejects_non_hex_once() {
        let mut iter = TlvDecoder::new().records("9F0101AZ");
        assert_eq!(iter.next().unwrap().unwrap_err().kind(), ErrorKind::Format);
        assert!(iter.next().is_none());

        assert!(TlvDecoder::new().records(" ").next().is_none());
    }

    #[test]
    fn test_records_large_stream_within_budget() {
        let data = "5A01FF".repeat(50_000);
        let started = Instant::now();
        let records = TlvDecoder::new().parse_all(&data).unwrap();
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(records.len(), 50_000);
        assert_eq!(records[49_999].offset, 149_997);
        assert_eq!(records[49_999].value, "FF");
    }

    #[test]
    fn test_into_result() {
        let record = parse("0401FF", "04").into_result().unwrap();
        assert_eq!(
            record,
            TlvRecord {
                tag: "04".to_string(),
                length: 1,
                value: "FF".to_string(),
                remaining_data: String::new(),
            }
        );
        assert!(parse("", "").into_result().is_err());
    }

    #[test]
    fn test_tag_info() {
        let record = parse("BF0C0100", "").into_result().unwrap();
        let tag = record.tag_info().unwrap();
        assert_eq!(tag.class(), BerTagClass::ContextSpecific);
        assert!(tag.is_constructed());
        assert_eq!(tag.number(), 0x0C);

        // caller-supplied tag spanning two identifiers
        let record = parse("04020100", "0402").into_result().unwrap();
        assert!(record.tag_info().is_none());
    }

    #[test]
    fn test_length_field_boundaries() {
        for len in [0usize, 1, 127, 128, 255, 256, 65535, 65536] {
            let tlv = to_tlv("04", &"5A".repeat(len)).unwrap();
            let outcome = parse(&tlv, "04");
            assert_eq!(outcome.value_length(), len, "length {}", len);
            assert_eq!(outcome.remaining_data(), "");
        }
    }

    #[derive(Clone, Debug)]
    struct HexBytes(String);

    impl Arbitrary for HexBytes {
        fn arbitrary(g: &mut Gen) -> Self {
            HexBytes(HexCodec::bytes_to_hex(&Vec::<u8>::arbitrary(g)))
        }
    }

    #[quickcheck_macros::quickcheck]
    fn prop_tlv_round_trip(tag: HexBytes, value: HexBytes) -> TestResult {
        if tag.0.is_empty() {
            return TestResult::discard();
        }
        let Ok(tlv) = to_tlv(&tag.0, &value.0) else {
            return TestResult::failed();
        };
        let outcome = parse(&tlv, &tag.0);
        TestResult::from_bool(
            outcome.tag() == tag.0
                && outcome.value() == value.0
                && outcome.remaining_data().is_empty(),
        )
    }

    #[quickcheck_macros::quickcheck]
    fn prop_length_round_trip(len: u16, extra: u8) -> bool {
        let len = len as usize + extra as usize;
        let Ok(tlv) = to_tlv("", &"00".repeat(len)) else {
            return false;
        };
        let Ok(bytes) = HexCodec::hex_to_bytes(&tlv) else {
            return false;
        };
        BerLength::decode(&bytes, 8).map(|(length, _)| length.value()) == Ok(len)
    }
}
