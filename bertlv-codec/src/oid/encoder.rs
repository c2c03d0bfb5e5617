//! OBJECT IDENTIFIER content encoder
//!
//! Produces the BER contents octets only (no `06` tag, no length), which is
//! the form OIDs take when they are embedded in larger TLV structures by
//! hand.

use bertlv_core::{CodecResult, HexCodec};

use crate::ber::types::base128_groups;
use crate::oid::types::Oid;

impl Oid {
    /// Encode to BER contents octets
    ///
    /// The first subidentifier (`40 * arc0 + arc1`) and every following arc
    /// are written as big-endian base-128 groups, bit 8 set on all groups
    /// but the last of each subidentifier.
    pub fn to_ber(&self) -> Vec<u8> {
        let mut bytes = base128_groups(self.combined());
        for &arc in &self.arcs()[2..] {
            bytes.extend(base128_groups(arc));
        }
        bytes
    }

    /// Encode to uppercase hex contents octets
    pub fn to_hex(&self) -> String {
        HexCodec::bytes_to_hex(&self.to_ber())
    }
}

/// Convert dot notation to BER-encoded hex
///
/// # Error Handling
/// Returns `CodecError::InvalidComponent` for fewer than two components, an
/// empty or non-numeric component, or first arcs outside the X.690 rules.
pub fn dot_notation_to_hex(oid: &str) -> CodecResult<String> {
    Ok(oid.parse::<Oid>()?.to_hex())
}
