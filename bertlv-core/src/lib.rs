//! Core types and utilities for the BER TLV/OID codec
//!
//! This crate provides the error taxonomy, the hex interchange codec and
//! the decoder configuration used throughout the workspace.

pub mod config;
pub mod error;
pub mod hex_codec;

pub use config::DecoderConfig;
pub use error::{CodecError, CodecResult, ErrorKind};
pub use hex_codec::HexCodec;
