//! Declarative field layouts and the bit-field extraction engine.
//!
//! A register layout is a static ordered list of [`FieldSpec`] records.
//! [`extract`] walks the layout over a [`Bitstream`] and captures one value
//! per non-reserved field, strictly left to right, most significant bit
//! first. Layouts are compile-time constants; there is no runtime schema.

use crate::bits::Bitstream;

/// How a field's bits are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FieldKind {
    /// Big-endian unsigned integer, at most 32 bits wide.
    Unsigned,
    /// Run of 8-bit characters; the width must be a multiple of eight.
    Ascii,
    /// Bits consumed and discarded; produces no value.
    Reserved,
}

/// One field in a register layout: a bit width and an interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct FieldSpec {
    /// Field width in bits.
    pub width: u32,
    /// Interpretation of the consumed bits.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// An unsigned integer field of `width` bits.
    #[must_use]
    pub const fn unsigned(width: u32) -> Self {
        Self {
            width,
            kind: FieldKind::Unsigned,
        }
    }

    /// An ASCII run of `width` bits (`width / 8` characters).
    #[must_use]
    pub const fn ascii(width: u32) -> Self {
        Self {
            width,
            kind: FieldKind::Ascii,
        }
    }

    /// A reserved span of `width` bits, skipped without capture.
    #[must_use]
    pub const fn reserved(width: u32) -> Self {
        Self {
            width,
            kind: FieldKind::Reserved,
        }
    }
}

/// A value captured from one non-reserved field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FieldValue {
    /// Unsigned integer capture.
    Unsigned(u32),
    /// ASCII run capture.
    Ascii(String),
}

/// Walks `layout` over `bits` and captures one value per non-reserved field.
///
/// Fields are consumed in layout order with no backtracking. When the
/// bitstream ends before the layout does, extraction stops and the
/// remaining slots are `None`; short pre-check layouts rely on the same
/// tolerance to probe a leading discriminator, and layouts whose widths sum
/// to the stream length consume it exactly.
///
/// # Panics
///
/// Panics on a malformed layout: an unsigned field wider than 32 bits or
/// an ASCII field whose width is not a multiple of eight. Layouts are
/// static constants, so this is a usage error caught by tests, not a data
/// error.
#[must_use]
pub fn extract(bits: &Bitstream, layout: &[FieldSpec]) -> Vec<Option<FieldValue>> {
    let mut values = Vec::new();
    let mut cursor = 0usize;

    for spec in layout {
        let width = spec.width as usize;
        match spec.kind {
            FieldKind::Reserved => {}
            FieldKind::Unsigned => {
                assert!(spec.width <= 32, "unsigned field wider than 32 bits");
                values.push(read_unsigned(bits, cursor, width));
            }
            FieldKind::Ascii => {
                assert!(
                    spec.width % 8 == 0,
                    "ascii field width must be a multiple of eight"
                );
                values.push(read_ascii(bits, cursor, width));
            }
        }
        cursor += width;
    }

    values
}

fn read_unsigned(bits: &Bitstream, start: usize, width: usize) -> Option<FieldValue> {
    if start >= bits.len() {
        return None;
    }

    let mut value = 0u32;
    for offset in 0..width {
        let Some(bit) = bits.bit(start + offset) else {
            break;
        };
        value = (value << 1) | u32::from(bit);
    }

    Some(FieldValue::Unsigned(value))
}

fn read_ascii(bits: &Bitstream, start: usize, width: usize) -> Option<FieldValue> {
    if start >= bits.len() {
        return None;
    }

    let mut text = String::with_capacity(width / 8);
    let mut cursor = start;
    let end = start + width;
    while cursor < end && cursor < bits.len() {
        let mut byte = 0u8;
        for offset in 0..8 {
            let Some(bit) = bits.bit(cursor + offset) else {
                break;
            };
            byte = (byte << 1) | u8::from(bit);
        }
        // NUL padding inside a name field is dropped, not rendered.
        if byte != 0 {
            text.push(char::from(byte));
        }
        cursor += 8;
    }

    Some(FieldValue::Ascii(text))
}

/// Positional reader over an extraction result.
///
/// Decoders bind captures to named struct fields in layout order. Slots
/// missing due to a truncated image read as zero or an empty string, which
/// keeps truncated input tolerated end to end.
#[derive(Debug)]
pub struct Fields {
    values: std::vec::IntoIter<Option<FieldValue>>,
}

impl Fields {
    /// Extracts `layout` from `bits` and wraps the result for positional
    /// reads.
    #[must_use]
    pub fn extract(bits: &Bitstream, layout: &[FieldSpec]) -> Self {
        Self {
            values: extract(bits, layout).into_iter(),
        }
    }

    /// Reads the next capture as an unsigned integer.
    pub fn unsigned(&mut self) -> u32 {
        match self.values.next() {
            Some(Some(FieldValue::Unsigned(value))) => value,
            _ => 0,
        }
    }

    /// Reads the next capture as an ASCII string.
    pub fn ascii(&mut self) -> String {
        match self.values.next() {
            Some(Some(FieldValue::Ascii(text))) => text,
            _ => String::new(),
        }
    }
}
