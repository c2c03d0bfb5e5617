//! BER encoding types (Tag, Length)

use bertlv_core::{CodecError, CodecResult};

/// BER Tag Class
///
/// ASN.1 defines four tag classes:
/// - **Universal**: Standard ASN.1 types (INTEGER, OCTET STRING, etc.)
/// - **Application**: Application-specific types
/// - **Context-specific**: Context-dependent types (used in SEQUENCE/SET)
/// - **Private**: Private/implementation-specific types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerTagClass {
    /// Universal class (00)
    Universal = 0,
    /// Application class (01)
    Application = 1,
    /// Context-specific class (10)
    ContextSpecific = 2,
    /// Private class (11)
    Private = 3,
}

impl BerTagClass {
    /// Get tag class from bits 8-7 of the first identifier byte
    pub fn from_bits(byte: u8) -> Self {
        match (byte >> 6) & 0x03 {
            0 => BerTagClass::Universal,
            1 => BerTagClass::Application,
            2 => BerTagClass::ContextSpecific,
            _ => BerTagClass::Private,
        }
    }

    /// Convert tag class to bits (for encoding)
    pub fn to_bits(self) -> u8 {
        (self as u8) << 6
    }
}

/// Low five bits of the first identifier byte when the tag number
/// continues in subsequent bytes (X.690 §8.1.2.4)
const HIGH_TAG_NUMBER: u8 = 0x1F;

/// BER Tag
///
/// A BER tag identifies the type of an ASN.1 value. It consists of:
/// - **Class**: Universal, Application, Context-specific, or Private
/// - **Constructed/Primitive**: Whether the value contains nested TLVs
/// - **Tag Number**: 0-30 in the first byte, or continued in base-128 bytes
///
/// # Encoding Format
///
/// Short form (tag number 0-30):
/// ```text
/// Bits: 8 7 6 5 4 3 2 1
///       C C P T T T T T
/// ```
///
/// High-tag-number form (tag number > 30):
/// ```text
/// First byte:  C C P 1 1 1 1 1
/// Following bytes: 1 T T T T T T T ... 0 T T T T T T T
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BerTag {
    class: BerTagClass,
    constructed: bool,
    number: u32,
}

impl BerTag {
    pub fn new(class: BerTagClass, constructed: bool, number: u32) -> Self {
        Self {
            class,
            constructed,
            number,
        }
    }

    /// Create a Universal class tag
    pub fn universal(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::Universal, constructed, number)
    }

    /// Create an Application class tag
    pub fn application(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::Application, constructed, number)
    }

    /// Create a Context-specific class tag
    pub fn context_specific(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::ContextSpecific, constructed, number)
    }

    /// Create a Private class tag
    pub fn private(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::Private, constructed, number)
    }

    pub fn class(&self) -> BerTagClass {
        self.class
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Encode tag to identifier octets
    pub fn encode(&self) -> Vec<u8> {
        let class_bits = self.class.to_bits();
        let constructed_bit = if self.constructed { 0x20 } else { 0x00 };

        if self.number < HIGH_TAG_NUMBER as u32 {
            return vec![class_bits | constructed_bit | self.number as u8];
        }

        let mut result = vec![class_bits | constructed_bit | HIGH_TAG_NUMBER];
        result.extend(base128_groups(u64::from(self.number)));
        result
    }

    /// Count the identifier octets at the front of `data`
    ///
    /// This only looks at the continuation bits, so it accepts tag numbers
    /// of any size.
    ///
    /// # Error Handling
    /// Returns `CodecError::TruncatedTag` if `data` is empty or ends before
    /// the last identifier byte.
    pub fn identifier_len(data: &[u8]) -> CodecResult<usize> {
        let first = *data.first().ok_or(CodecError::TruncatedTag)?;
        if first & HIGH_TAG_NUMBER != HIGH_TAG_NUMBER {
            return Ok(1);
        }

        data[1..]
            .iter()
            .position(|b| b & 0x80 == 0)
            .map(|last| last + 2)
            .ok_or(CodecError::TruncatedTag)
    }

    /// Decode tag from identifier octets
    ///
    /// # Returns
    /// Returns `Ok((BerTag, bytes_consumed))` if successful.
    ///
    /// # Error Handling
    /// Returns error if the identifier is truncated or its tag number does
    /// not fit in 32 bits.
    pub fn decode(data: &[u8]) -> CodecResult<(Self, usize)> {
        let consumed = Self::identifier_len(data)?;
        let first = data[0];
        let class = BerTagClass::from_bits(first);
        let constructed = first & 0x20 != 0;

        if consumed == 1 {
            return Ok((
                Self::new(class, constructed, u32::from(first & HIGH_TAG_NUMBER)),
                1,
            ));
        }

        let mut number = 0u32;
        for &byte in &data[1..consumed] {
            number = number
                .checked_mul(128)
                .map(|n| n | u32::from(byte & 0x7F))
                .ok_or_else(|| {
                    CodecError::Format("Tag number too large for 32 bits".to_string())
                })?;
        }

        Ok((Self::new(class, constructed, number), consumed))
    }
}

/// Split a value into big-endian base-128 groups
///
/// Every group except the last has bit 8 set. Shared by high tag numbers
/// and OID arcs.
pub(crate) fn base128_groups(value: u64) -> Vec<u8> {
    let mut groups = vec![(value & 0x7F) as u8];
    let mut remaining = value >> 7;
    while remaining > 0 {
        groups.push(0x80 | (remaining & 0x7F) as u8);
        remaining >>= 7;
    }
    groups.reverse();
    groups
}

/// BER definite length
///
/// - **Short form**: For lengths 0-127 (1 byte)
/// - **Long form**: For lengths > 127, `0x80 | n` followed by `n` big-endian
///   length bytes
///
/// # Encoding Format
///
/// Short form:
/// ```text
/// Byte: 0 L L L L L L L
/// ```
///
/// Long form:
/// ```text
/// First byte:  1 N N N N N N N  (N = number of length bytes)
/// Following bytes: L L L L L L L L  (big-endian length value)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerLength {
    /// Short form: length 0-127
    Short(u8),
    /// Long form, encoded with length-of-length
    Long(usize),
}

impl BerLength {
    /// Create a new BER length, choosing the shortest form
    pub fn new(length: usize) -> Self {
        if length < 128 {
            BerLength::Short(length as u8)
        } else {
            BerLength::Long(length)
        }
    }

    pub fn value(&self) -> usize {
        match self {
            BerLength::Short(l) => *l as usize,
            BerLength::Long(l) => *l,
        }
    }

    /// Encode length to bytes
    ///
    /// The long form uses the minimum number of length bytes, so
    /// 128..=255 gives `81 xx`, 256..=65535 gives `82 xx xx`, and so on.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            BerLength::Short(length) => vec![*length],
            BerLength::Long(length) => {
                let be = length.to_be_bytes();
                let skip = be.iter().take_while(|&&b| b == 0).count();
                // a long form of zero still needs one length byte
                let significant = &be[skip.min(be.len() - 1)..];

                let mut result = Vec::with_capacity(1 + significant.len());
                result.push(0x80 | significant.len() as u8);
                result.extend_from_slice(significant);
                result
            }
        }
    }

    /// Decode length from bytes
    ///
    /// # Arguments
    /// * `data` - Bytes starting at the length indicator
    /// * `max_octets` - Largest accepted number of long-form length bytes
    ///
    /// # Returns
    /// Returns `Ok((BerLength, bytes_consumed))` if successful.
    ///
    /// # Error Handling
    /// Returns error if:
    /// - The length indicator or its length bytes are missing
    /// - The indicator is `0x80` (indefinite form)
    /// - More than `max_octets` length bytes are announced
    pub fn decode(data: &[u8], max_octets: usize) -> CodecResult<(Self, usize)> {
        let first_byte = *data.first().ok_or(CodecError::TruncatedLength {
            needed: 1,
            available: 0,
        })?;

        if first_byte & 0x80 == 0 {
            return Ok((BerLength::Short(first_byte), 1));
        }

        let num_bytes = (first_byte & 0x7F) as usize;
        if num_bytes == 0 {
            return Err(CodecError::IndefiniteLength);
        }

        let max = max_octets.min(std::mem::size_of::<usize>());
        if num_bytes > max {
            return Err(CodecError::LengthOverflow {
                octets: num_bytes,
                max,
            });
        }

        if data.len() < 1 + num_bytes {
            return Err(CodecError::TruncatedLength {
                needed: 1 + num_bytes,
                available: data.len(),
            });
        }

        let length = data[1..=num_bytes]
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | b as usize);

        Ok((BerLength::Long(length), 1 + num_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bertlv_core::ErrorKind;

    #[test]
    fn test_ber_tag_short_form() {
        let tag = BerTag::universal(false, 2); // INTEGER tag
        assert_eq!(tag.encode(), vec![0x02]);
    }

    #[test]
    fn test_ber_tag_constructed() {
        let tag = BerTag::universal(true, 16); // SEQUENCE
        assert_eq!(tag.encode(), vec![0x30]);
    }

    #[test]
    fn test_ber_tag_high_number_encode() {
        // EMV application expiration date
        assert_eq!(BerTag::application(false, 0x24).encode(), vec![0x5F, 0x24]);
        assert_eq!(BerTag::context_specific(false, 2).encode(), vec![0x82]);
        assert_eq!(BerTag::private(true, 1).encode(), vec![0xE1]);
        assert_eq!(
            BerTag::context_specific(false, 201).encode(),
            vec![0x9F, 0x81, 0x49]
        );
    }

    #[test]
    fn test_ber_tag_decode() {
        let (tag, consumed) = BerTag::decode(&[0x02]).unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(tag.class(), BerTagClass::Universal);
        assert!(!tag.is_constructed());
        assert_eq!(tag.number(), 2);

        let (tag, consumed) = BerTag::decode(&[0x5F, 0x37, 0x01]).unwrap();
        assert_eq!(consumed, 2);
        assert_eq!(tag.class(), BerTagClass::Application);
        assert_eq!(tag.number(), 0x37);
    }

    #[test]
    fn test_identifier_len() {
        assert_eq!(BerTag::identifier_len(&[0x30, 0x00]).unwrap(), 1);
        assert_eq!(BerTag::identifier_len(&[0x9F, 0x02, 0x03]).unwrap(), 2);
        assert_eq!(BerTag::identifier_len(&[0xBF, 0x81, 0x81, 0x01]).unwrap(), 4);
        assert_eq!(
            BerTag::identifier_len(&[0x9F]).unwrap_err().kind(),
            ErrorKind::TruncatedTag
        );
        assert_eq!(
            BerTag::identifier_len(&[0x9F, 0x81]).unwrap_err().kind(),
            ErrorKind::TruncatedTag
        );
    }

    #[test]
    fn test_ber_length_boundaries() {
        assert_eq!(BerLength::new(0).encode(), vec![0x00]);
        assert_eq!(BerLength::new(127).encode(), vec![0x7F]);
        assert_eq!(BerLength::new(128).encode(), vec![0x81, 0x80]);
        assert_eq!(BerLength::new(255).encode(), vec![0x81, 0xFF]);
        assert_eq!(BerLength::new(256).encode(), vec![0x82, 0x01, 0x00]);
        assert_eq!(BerLength::new(65535).encode(), vec![0x82, 0xFF, 0xFF]);
        assert_eq!(BerLength::new(65536).encode(), vec![0x83, 0x01, 0x00, 0x00]);
        assert_eq!(
            BerLength::new(16_777_215).encode(),
            vec![0x83, 0xFF, 0xFF, 0xFF]
        );
        assert_eq!(BerLength::Long(0).encode(), vec![0x81, 0x00]);
    }

    #[test]
    fn test_ber_length_decode() {
        let (length, consumed) = BerLength::decode(&[100], 8).unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(length.value(), 100);

        let (length, consumed) = BerLength::decode(&[0x82, 0x01, 0x00, 0xAA], 8).unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(length.value(), 256);
    }

    #[test]
    fn test_ber_length_decode_errors() {
        assert_eq!(
            BerLength::decode(&[], 8).unwrap_err().kind(),
            ErrorKind::TruncatedLength
        );
        assert_eq!(
            BerLength::decode(&[0x82, 0x01], 8).unwrap_err(),
            CodecError::TruncatedLength {
                needed: 3,
                available: 2
            }
        );
        assert_eq!(
            BerLength::decode(&[0x80], 8).unwrap_err().kind(),
            ErrorKind::IndefiniteLength
        );
        assert_eq!(
            BerLength::decode(&[0x83, 0x01, 0x00, 0x00], 2).unwrap_err(),
            CodecError::LengthOverflow { octets: 3, max: 2 }
        );
    }

    #[test]
    fn test_base128_groups() {
        assert_eq!(base128_groups(0), vec![0x00]);
        assert_eq!(base128_groups(127), vec![0x7F]);
        assert_eq!(base128_groups(128), vec![0x81, 0x00]);
        assert_eq!(base128_groups(113_549), vec![0x86, 0xF7, 0x0D]);
    }
}
