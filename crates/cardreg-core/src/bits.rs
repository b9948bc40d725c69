//! Hexadecimal register images expanded to bit level.
//!
//! Register files expose their content as a single hex string; the decoders
//! work on the expanded bit sequence so that field widths which do not fall
//! on nibble boundaries stay trivial to consume.

use crate::error::DecodeError;

/// An immutable bit sequence produced from a hexadecimal register image.
///
/// Each hex digit contributes four bits, most significant bit first, so the
/// length is always exactly four times the number of input characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitstream {
    bits: Vec<bool>,
}

impl Bitstream {
    /// Expands a hexadecimal string into its bit representation.
    ///
    /// Empty input yields an empty bitstream. Any non-hex character fails
    /// the whole conversion with [`DecodeError::MalformedInput`]; no
    /// partial result is returned.
    pub fn from_hex(hex: &str) -> Result<Self, DecodeError> {
        let mut bits = Vec::with_capacity(hex.len() * 4);
        for ch in hex.chars() {
            let digit = ch.to_digit(16).ok_or(DecodeError::MalformedInput)?;
            for shift in (0..4).rev() {
                bits.push((digit >> shift) & 1 == 1);
            }
        }
        Ok(Self { bits })
    }

    /// Number of bits in the stream.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True when the stream holds no bits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns the bit at `index`, or `None` past the end.
    #[must_use]
    pub fn bit(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    /// Re-encodes every four bits back into a lowercase hex digit.
    ///
    /// For streams produced by [`Bitstream::from_hex`] this is the inverse
    /// transform up to letter case.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.bits
            .chunks(4)
            .map(|nibble| {
                let digit = nibble.iter().fold(0, |acc, &bit| (acc << 1) | u32::from(bit));
                char::from_digit(digit, 16).unwrap_or('0')
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Bitstream;
    use crate::error::DecodeError;

    #[test]
    fn empty_input_is_an_empty_stream() {
        let bits = Bitstream::from_hex("").expect("empty input is valid");
        assert!(bits.is_empty());
        assert_eq!(bits.len(), 0);
    }

    #[test]
    fn each_digit_contributes_four_bits_msb_first() {
        let bits = Bitstream::from_hex("a1").expect("valid hex");
        assert_eq!(bits.len(), 8);
        let expected = [true, false, true, false, false, false, false, true];
        for (index, want) in expected.iter().enumerate() {
            assert_eq!(bits.bit(index), Some(*want), "bit {index}");
        }
    }

    #[test]
    fn upper_and_lower_case_digits_are_equivalent() {
        let lower = Bitstream::from_hex("deadbeef").expect("valid hex");
        let upper = Bitstream::from_hex("DEADBEEF").expect("valid hex");
        assert_eq!(lower, upper);
    }

    #[test]
    fn non_hex_character_fails_whole_conversion() {
        assert_eq!(
            Bitstream::from_hex("0g"),
            Err(DecodeError::MalformedInput)
        );
        assert_eq!(
            Bitstream::from_hex("  12"),
            Err(DecodeError::MalformedInput)
        );
    }

    #[test]
    fn out_of_range_bit_reads_are_none() {
        let bits = Bitstream::from_hex("f").expect("valid hex");
        assert_eq!(bits.bit(3), Some(true));
        assert_eq!(bits.bit(4), None);
    }

    #[test]
    fn to_hex_round_trips_lowercase() {
        let bits = Bitstream::from_hex("0123456789abcdef").expect("valid hex");
        assert_eq!(bits.to_hex(), "0123456789abcdef");
        let bits = Bitstream::from_hex("ABCDEF").expect("valid hex");
        assert_eq!(bits.to_hex(), "abcdef");
    }
}
