//! Decoder limits

use serde::{Deserialize, Serialize};

/// Limits applied by the TLV decoder and the nested search
///
/// Both limits exist so that hostile input cannot request a length wider
/// than the platform can address, or drive the search arbitrarily deep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Maximum number of octets after a long-form length indicator
    pub max_length_octets: usize,
    /// Maximum nesting depth the search descends into
    pub max_depth: usize,
}

impl DecoderConfig {
    /// Default limit on long-form length octets (width of `usize`)
    pub const DEFAULT_MAX_LENGTH_OCTETS: usize = std::mem::size_of::<usize>();
    /// Default limit on search depth
    pub const DEFAULT_MAX_DEPTH: usize = 32;

    pub fn new() -> Self {
        Self::default()
    }

    /// Set the long-form length octet limit
    ///
    /// Values above the width of `usize` are clamped, since such a length
    /// could not be represented anyway.
    pub fn with_max_length_octets(mut self, octets: usize) -> Self {
        self.max_length_octets = octets.min(Self::DEFAULT_MAX_LENGTH_OCTETS);
        self
    }

    /// Set the search depth limit
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_length_octets: Self::DEFAULT_MAX_LENGTH_OCTETS,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
