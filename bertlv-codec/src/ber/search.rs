//! Depth-first tag search over nested TLV streams
//!
//! Records are visited in pre-order: a record is checked against the target
//! tag before its value is searched, and a value is searched before the
//! record's next sibling. Every value is tried as a nested TLV stream; one
//! that does not parse as such is primitive content and is simply not
//! descended into.

use bertlv_core::{CodecError, DecoderConfig, HexCodec};

use crate::ber::decoder::TlvDecoder;

/// Outcome of [`TlvSearch::search`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    /// Value of the first record carrying the target tag
    Found(String),
    /// The whole stream was walked without a match
    NotFound,
    /// The top-level stream stopped parsing before a match was found
    Corrupt {
        /// Byte offset of the record that failed to decode
        offset: usize,
        error: CodecError,
    },
}

impl SearchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found(_))
    }

    /// Collapse into the found value, if any
    ///
    /// `NotFound` and `Corrupt` both become `None`.
    pub fn into_found(self) -> Option<String> {
        match self {
            SearchResult::Found(value) => Some(value),
            _ => None,
        }
    }
}

/// Nested TLV search
#[derive(Debug, Clone, Copy, Default)]
pub struct TlvSearch {
    decoder: TlvDecoder,
}

impl TlvSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            decoder: TlvDecoder::with_config(config),
        }
    }

    /// Search `data` for the first record tagged `target_tag`
    ///
    /// `data` is decoded from hex once and walked by byte offset, so the
    /// cost is linear in its length for a given depth limit.
    ///
    /// # Returns
    /// - `Found(value)` for the first match in pre-order
    /// - `NotFound` if the stream is exhausted without a match (a blank or
    ///   non-hex target never matches)
    /// - `Corrupt` if `data` itself is not hex, or one of its top-level
    ///   records fails to decode before a match is reached
    pub fn search(&self, target_tag: &str, data: &str) -> SearchResult {
        let target = match HexCodec::hex_to_bytes(target_tag) {
            Ok(t) if !t.is_empty() => t,
            _ => return SearchResult::NotFound,
        };
        let stream = match HexCodec::hex_to_bytes(data) {
            Ok(s) => s,
            Err(error) => return SearchResult::Corrupt { offset: 0, error },
        };

        let result = self.walk(&target, &stream, 0);
        if let SearchResult::Corrupt { offset, error } = &result {
            log::debug!(
                "Search for tag {} stopped at byte {}: {}",
                HexCodec::bytes_to_hex(&target),
                offset,
                error
            );
        }
        result
    }

    fn walk(&self, target: &[u8], stream: &[u8], depth: usize) -> SearchResult {
        let mut offset = 0;

        while offset < stream.len() {
            let rest = &stream[offset..];
            let frame = match self.decoder.frame(rest) {
                Ok(frame) => frame,
                Err(error) => return SearchResult::Corrupt { offset, error },
            };

            let value = &rest[frame.value_range()];
            if &rest[..frame.tag_len] == target {
                return SearchResult::Found(HexCodec::bytes_to_hex(value));
            }

            if depth < self.decoder.config().max_depth && !value.is_empty() {
                match self.walk(target, value, depth + 1) {
                    SearchResult::Found(found) => return SearchResult::Found(found),
                    SearchResult::Corrupt { .. } => {
                        log::trace!("Value at byte {} is primitive content", offset);
                    }
                    SearchResult::NotFound => {}
                }
            }

            offset += frame.len();
        }

        SearchResult::NotFound
    }
}

/// Find the value of `target_tag` anywhere in `data`
///
/// Absent tags and malformed data both give `None`; use
/// [`TlvSearch::search`] to tell them apart.
pub fn fetch_value(target_tag: &str, data: &str) -> Option<String> {
    search(target_tag, data).into_found()
}

/// [`TlvSearch::search`] with the default configuration
pub fn search(target_tag: &str, data: &str) -> SearchResult {
    TlvSearch::new().search(target_tag, data)
}
