//! OBJECT IDENTIFIER dot notation <-> BER hex
//!
//! # OID Encoding Rules (X.690 §8.19)
//! - The first two arcs X.Y are packed into one subidentifier `40*X + Y`
//!   (see [`FIRST_ARC_RULES`])
//! - Every subidentifier is written in base-128, most significant group
//!   first, bit 8 set on all bytes but the last
//!
//! Only the contents octets are produced and consumed here; wrap them with
//! [`crate::ber::to_tlv`] and tag `06` for a complete OBJECT IDENTIFIER.

pub mod decoder;
pub mod encoder;
pub mod types;

pub use decoder::hex_to_dot_notation;
pub use encoder::dot_notation_to_hex;
pub use types::{FirstArcRule, Oid, FIRST_ARC_RULES};
