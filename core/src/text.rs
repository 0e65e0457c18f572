//! Borrowed text buffers and code-point iteration in both directions.
//!
//! A [`Text`] never owns its code units. Indices are always expressed in the
//! buffer's native code-unit granularity: bytes for UTF-8, 16-bit units for
//! UTF-16 and 32-bit units for UTF-32 and scalar buffers.
//!
//! ```
//! use unicorn_core::Text;
//!
//! let text = Text::utf8("añb".as_bytes());
//! let first = text.next(0).unwrap().unwrap();
//! assert_eq!((first.scalar, first.index), ('a' as u32, 1));
//! let second = text.next(first.index).unwrap().unwrap();
//! assert_eq!((second.scalar, second.index), ('ñ' as u32, 3));
//! let back = text.prev(second.index).unwrap().unwrap();
//! assert_eq!(back.index, 1);
//! ```
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Unicode encoding form of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingForm {
    Utf8,
    Utf16,
    Utf32,
    /// Native-order 32-bit Unicode scalar values.
    Scalar,
}

impl EncodingForm {
    pub const ALL: [EncodingForm; 4] = [
        EncodingForm::Utf8,
        EncodingForm::Utf16,
        EncodingForm::Utf32,
        EncodingForm::Scalar,
    ];
}

impl fmt::Display for EncodingForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EncodingForm::Utf8 => "UTF-8",
            EncodingForm::Utf16 => "UTF-16",
            EncodingForm::Utf32 => "UTF-32",
            EncodingForm::Scalar => "scalar",
        };
        f.write_str(name)
    }
}

impl FromStr for EncodingForm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(EncodingForm::Utf8),
            "utf16" | "utf-16" => Ok(EncodingForm::Utf16),
            "utf32" | "utf-32" => Ok(EncodingForm::Utf32),
            "scalar" => Ok(EncodingForm::Scalar),
            other => Err(Error::invalid_argument(format!(
                "unknown encoding form '{other}'"
            ))),
        }
    }
}

/// Byte order of multi-byte code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Byte order of the target platform.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        ByteOrder::native()
    }
}

/// The borrowed code units behind a [`Text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeUnits<'a> {
    Utf8(&'a [u8]),
    Utf16(&'a [u16]),
    Utf32(&'a [u32]),
    Scalar(&'a [u32]),
}

impl CodeUnits<'_> {
    pub fn len(&self) -> usize {
        match self {
            CodeUnits::Utf8(units) => units.len(),
            CodeUnits::Utf16(units) => units.len(),
            CodeUnits::Utf32(units) | CodeUnits::Scalar(units) => units.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn form(&self) -> EncodingForm {
        match self {
            CodeUnits::Utf8(_) => EncodingForm::Utf8,
            CodeUnits::Utf16(_) => EncodingForm::Utf16,
            CodeUnits::Utf32(_) => EncodingForm::Utf32,
            CodeUnits::Scalar(_) => EncodingForm::Scalar,
        }
    }
}

/// How far a buffer extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    /// The first `n` code units are text.
    Explicit(usize),
    /// Text ends at the first zero code unit (or the end of the slice).
    Terminated,
}

/// One decoded code point and the index on its far side.
///
/// Moving forward `index` is just past the code point; moving backward it is
/// the first code unit of the code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub scalar: u32,
    pub index: usize,
}

/// Encoded text plus the attributes needed to iterate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Text<'a> {
    units: CodeUnits<'a>,
    length: Length,
    order: ByteOrder,
    trusted: bool,
}

impl<'a> From<&'a str> for Text<'a> {
    /// Borrow a string slice. It is already valid UTF-8, so it is trusted.
    fn from(s: &'a str) -> Self {
        Text::utf8(s.as_bytes()).trusted()
    }
}

impl<'a> Text<'a> {
    pub fn new(units: CodeUnits<'a>) -> Self {
        Self {
            length: Length::Explicit(units.len()),
            units,
            order: ByteOrder::native(),
            trusted: false,
        }
    }

    pub fn utf8(bytes: &'a [u8]) -> Self {
        Self::new(CodeUnits::Utf8(bytes))
    }

    pub fn utf16(units: &'a [u16]) -> Self {
        Self::new(CodeUnits::Utf16(units))
    }

    pub fn utf32(units: &'a [u32]) -> Self {
        Self::new(CodeUnits::Utf32(units))
    }

    pub fn scalars(values: &'a [u32]) -> Self {
        Self::new(CodeUnits::Scalar(values))
    }

    /// Limit the text to the first `len` code units.
    pub fn with_length(mut self, len: usize) -> Result<Self> {
        if len > self.units.len() {
            return Err(Error::invalid_argument(format!(
                "length {len} exceeds the buffer ({} code units)",
                self.units.len()
            )));
        }
        self.length = Length::Explicit(len);
        Ok(self)
    }

    /// Treat the first zero code unit as the end of the text.
    pub fn terminated(mut self) -> Self {
        self.length = Length::Terminated;
        self
    }

    /// Byte order of UTF-16 and UTF-32 code units. Ignored for UTF-8 and
    /// scalar buffers.
    pub fn with_byte_order(mut self, order: ByteOrder) -> Self {
        self.order = order;
        self
    }

    /// Skip well-formedness checks for input that was already validated.
    ///
    /// Iteration stays within the buffer; ill-formed input simply decodes to
    /// unspecified scalars.
    pub fn trusted(mut self) -> Self {
        self.trusted = true;
        self
    }

    pub fn units(&self) -> CodeUnits<'a> {
        self.units
    }

    pub fn form(&self) -> EncodingForm {
        self.units.form()
    }

    pub fn length(&self) -> Length {
        self.length
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    pub fn is_trusted(&self) -> bool {
        self.trusted
    }

    /// Index of the end of the text.
    pub fn end(&self) -> usize {
        match self.length {
            Length::Explicit(n) => n,
            Length::Terminated => (0..self.units.len())
                .find(|&i| self.unit(i) == Some(0))
                .unwrap_or(self.units.len()),
        }
    }

    /// True when `index` lies beyond the end of the text.
    ///
    /// Constant time: for terminated text only the code unit just before
    /// `index` is examined, so this never walks to the terminator.
    pub fn is_past_end(&self, index: usize) -> bool {
        index > self.limit()
            || (self.length == Length::Terminated && index > 0 && self.unit(index - 1) == Some(0))
    }

    /// True when no code point starts at `index`.
    pub fn is_at_end(&self, index: usize) -> bool {
        self.terminates(index)
    }

    /// Decode the code point starting at `index`.
    ///
    /// Returns `Ok(None)` at the end of the text.
    pub fn next(&self, index: usize) -> Result<Option<Decoded>> {
        self.check_index(index)?;
        if self.terminates(index) {
            return Ok(None);
        }
        let decoded = match self.units.form() {
            EncodingForm::Utf8 => self.utf8_next(index)?,
            EncodingForm::Utf16 => self.utf16_next(index)?,
            EncodingForm::Utf32 | EncodingForm::Scalar => Decoded {
                scalar: self.scalar_at(index)?,
                index: index + 1,
            },
        };
        Ok(Some(decoded))
    }

    /// Decode the code point that ends at `index`.
    ///
    /// Returns `Ok(None)` at the start of the text.
    pub fn prev(&self, index: usize) -> Result<Option<Decoded>> {
        self.check_index(index)?;
        if index == 0 {
            return Ok(None);
        }
        let decoded = match self.units.form() {
            EncodingForm::Utf8 => self.utf8_prev(index)?,
            EncodingForm::Utf16 => self.utf16_prev(index)?,
            EncodingForm::Utf32 | EncodingForm::Scalar => Decoded {
                scalar: self.scalar_at(index - 1)?,
                index: index - 1,
            },
        };
        Ok(Some(decoded))
    }

    /// Check that the whole text is well-formed.
    pub fn validate(&self) -> Result<()> {
        let mut index = 0;
        while let Some(decoded) = self.next(index)? {
            index = decoded.index;
        }
        Ok(())
    }

    fn limit(&self) -> usize {
        match self.length {
            Length::Explicit(n) => n,
            Length::Terminated => self.units.len(),
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index > self.limit() {
            return Err(Error::invalid_argument(format!(
                "index {index} is outside the text ({} code units)",
                self.limit()
            )));
        }
        Ok(())
    }

    /// Code unit at `i` in native order, or `None` past the limit.
    fn unit(&self, i: usize) -> Option<u32> {
        if i >= self.limit() {
            return None;
        }
        let value = match self.units {
            CodeUnits::Utf8(units) => u32::from(units[i]),
            CodeUnits::Utf16(units) => u32::from(match self.order {
                ByteOrder::Little => u16::from_le(units[i]),
                ByteOrder::Big => u16::from_be(units[i]),
            }),
            CodeUnits::Utf32(units) => match self.order {
                ByteOrder::Little => u32::from_le(units[i]),
                ByteOrder::Big => u32::from_be(units[i]),
            },
            CodeUnits::Scalar(units) => units[i],
        };
        Some(value)
    }

    fn terminates(&self, i: usize) -> bool {
        match self.unit(i) {
            None => true,
            Some(0) => self.length == Length::Terminated,
            Some(_) => false,
        }
    }

    /// Code unit at `i` that must continue a sequence started earlier.
    fn continuation(&self, i: usize) -> Result<u32> {
        if self.terminates(i) {
            return Err(self.malformed(i));
        }
        self.unit(i).ok_or_else(|| self.malformed(i))
    }

    fn malformed(&self, index: usize) -> Error {
        Error::MalformedEncoding {
            form: self.units.form(),
            index,
        }
    }

    fn scalar_at(&self, i: usize) -> Result<u32> {
        let value = self.unit(i).ok_or_else(|| self.malformed(i))?;
        if !self.trusted && !is_scalar_value(value) {
            return Err(self.malformed(i));
        }
        Ok(value)
    }

    fn utf8_next(&self, index: usize) -> Result<Decoded> {
        let lead = self.unit(index).ok_or_else(|| self.malformed(index))? as u8;
        let (width, second) = if self.trusted {
            utf8_width_lenient(lead)
        } else {
            utf8_sequence(lead).ok_or_else(|| self.malformed(index))?
        };

        let mut scalar = u32::from(lead & UTF8_LEAD_MASK[width]);
        for k in 1..width {
            let byte = self.continuation(index + k)? as u8;
            if !self.trusted {
                let valid = if k == 1 {
                    second.contains(&byte)
                } else {
                    (0x80..=0xBF).contains(&byte)
                };
                if !valid {
                    return Err(self.malformed(index));
                }
            }
            scalar = (scalar << 6) | u32::from(byte & 0x3F);
        }

        Ok(Decoded {
            scalar,
            index: index + width,
        })
    }

    fn utf8_prev(&self, index: usize) -> Result<Decoded> {
        // Walk back over at most three continuation bytes to the lead byte.
        let mut start = index - 1;
        let mut trailing = 0;
        while self.unit(start).is_some_and(is_utf8_continuation) {
            trailing += 1;
            if start == 0 || trailing > 3 {
                return Err(self.malformed(start));
            }
            start -= 1;
        }

        let decoded = self.utf8_next(start)?;
        if decoded.index != index {
            return Err(self.malformed(start));
        }
        Ok(Decoded {
            scalar: decoded.scalar,
            index: start,
        })
    }

    fn utf16_next(&self, index: usize) -> Result<Decoded> {
        let word = self.unit(index).ok_or_else(|| self.malformed(index))?;
        if !is_surrogate(word) {
            return Ok(Decoded {
                scalar: word,
                index: index + 1,
            });
        }
        if !is_high_surrogate(word) && !self.trusted {
            return Err(self.malformed(index));
        }
        let low = self.continuation(index + 1)?;
        if !is_low_surrogate(low) && !self.trusted {
            return Err(self.malformed(index));
        }
        Ok(Decoded {
            scalar: combine_surrogates(word, low),
            index: index + 2,
        })
    }

    fn utf16_prev(&self, index: usize) -> Result<Decoded> {
        let word = self.unit(index - 1).ok_or_else(|| self.malformed(index - 1))?;
        if !is_surrogate(word) {
            return Ok(Decoded {
                scalar: word,
                index: index - 1,
            });
        }
        if !is_low_surrogate(word) && !self.trusted {
            return Err(self.malformed(index - 1));
        }
        if index < 2 {
            return Err(self.malformed(index - 1));
        }
        let high = self.unit(index - 2).ok_or_else(|| self.malformed(index - 2))?;
        if !is_high_surrogate(high) && !self.trusted {
            return Err(self.malformed(index - 2));
        }
        Ok(Decoded {
            scalar: combine_surrogates(high, word),
            index: index - 2,
        })
    }
}

const UTF8_LEAD_MASK: [u8; 5] = [0x00, 0x7F, 0x1F, 0x0F, 0x07];

/// Width of a UTF-8 sequence and the valid range of its second byte
/// (Unicode Table 3-7).
fn utf8_sequence(lead: u8) -> Option<(usize, std::ops::RangeInclusive<u8>)> {
    let seq = match lead {
        0x00..=0x7F => (1, 0x80..=0xBF),
        0xC2..=0xDF => (2, 0x80..=0xBF),
        0xE0 => (3, 0xA0..=0xBF),
        0xE1..=0xEC | 0xEE..=0xEF => (3, 0x80..=0xBF),
        0xED => (3, 0x80..=0x9F),
        0xF0 => (4, 0x90..=0xBF),
        0xF1..=0xF3 => (4, 0x80..=0xBF),
        0xF4 => (4, 0x80..=0x8F),
        _ => return None,
    };
    Some(seq)
}

fn utf8_width_lenient(lead: u8) -> (usize, std::ops::RangeInclusive<u8>) {
    let width = match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    };
    (width, 0x80..=0xBF)
}

fn is_utf8_continuation(unit: u32) -> bool {
    (0x80..=0xBF).contains(&unit)
}

fn is_surrogate(unit: u32) -> bool {
    (0xD800..=0xDFFF).contains(&unit)
}

fn is_high_surrogate(unit: u32) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

fn is_low_surrogate(unit: u32) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

fn combine_surrogates(high: u32, low: u32) -> u32 {
    0x10000 + ((high.wrapping_sub(0xD800) & 0x3FF) << 10) + (low.wrapping_sub(0xDC00) & 0x3FF)
}

/// True for code points that are Unicode scalar values.
pub fn is_scalar_value(value: u32) -> bool {
    value <= 0x10FFFF && !is_surrogate(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_forward(text: &Text<'_>) -> Vec<(u32, usize)> {
        let mut out = Vec::new();
        let mut index = 0;
        while let Some(d) = text.next(index).unwrap() {
            out.push((d.scalar, d.index));
            index = d.index;
        }
        out
    }

    fn collect_backward(text: &Text<'_>) -> Vec<(u32, usize)> {
        let mut out = Vec::new();
        let mut index = text.end();
        while let Some(d) = text.prev(index).unwrap() {
            out.push((d.scalar, d.index));
            index = d.index;
        }
        out
    }

    #[test]
    fn test_utf8_forward_and_backward() {
        let s = "a\u{E9}\u{20AC}\u{1F600}";
        let text = Text::utf8(s.as_bytes());
        assert_eq!(
            collect_forward(&text),
            vec![(0x61, 1), (0xE9, 3), (0x20AC, 6), (0x1F600, 10)]
        );
        assert_eq!(
            collect_backward(&text),
            vec![(0x1F600, 6), (0x20AC, 3), (0xE9, 1), (0x61, 0)]
        );
    }

    #[test]
    fn test_lone_continuation_byte() {
        let text = Text::utf8(&[0x80]);
        assert_eq!(
            text.next(0),
            Err(Error::MalformedEncoding {
                form: EncodingForm::Utf8,
                index: 0
            })
        );
        assert!(text.prev(1).unwrap_err().is_malformed());
    }

    #[test]
    fn test_utf8_rejects_overlong_and_surrogates() {
        // Overlong '/' and an encoded surrogate.
        assert!(Text::utf8(&[0xC0, 0xAF]).next(0).is_err());
        assert!(Text::utf8(&[0xED, 0xA0, 0x80]).next(0).is_err());
        // Truncated sequence.
        assert!(Text::utf8(&[0xE2, 0x82]).next(0).is_err());
        assert!(Text::utf8(&[0xE2, 0x82]).prev(2).is_err());
    }

    #[test]
    fn test_terminated_utf8() {
        let text = Text::utf8(b"ab\0cd").terminated();
        assert_eq!(text.end(), 2);
        assert_eq!(collect_forward(&text), vec![(0x61, 1), (0x62, 2)]);
        assert!(text.is_at_end(2));
        // A terminator inside a multi-byte sequence is malformed.
        assert!(Text::utf8(&[0xC3, 0x00]).terminated().next(0).is_err());
    }

    #[test]
    fn test_explicit_length() {
        let text = Text::utf8(b"abcdef").with_length(3).unwrap();
        assert_eq!(text.end(), 3);
        assert_eq!(collect_forward(&text).len(), 3);
        assert!(Text::utf8(b"ab").with_length(3).is_err());
        assert!(matches!(
            text.next(5),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_utf16_surrogates() {
        let units: Vec<u16> = "x\u{1F600}y".encode_utf16().collect();
        let text = Text::utf16(&units);
        assert_eq!(
            collect_forward(&text),
            vec![(0x78, 1), (0x1F600, 3), (0x79, 4)]
        );
        assert_eq!(
            collect_backward(&text),
            vec![(0x79, 3), (0x1F600, 1), (0x78, 0)]
        );

        let lone_high = [0xD83Du16];
        assert!(Text::utf16(&lone_high).next(0).is_err());
        let lone_low = [0xDE00u16, 0x41];
        assert!(Text::utf16(&lone_low).next(0).is_err());
        assert!(Text::utf16(&lone_low).prev(1).is_err());
    }

    #[test]
    fn test_utf16_foreign_byte_order() {
        let foreign = match ByteOrder::native() {
            ByteOrder::Little => ByteOrder::Big,
            ByteOrder::Big => ByteOrder::Little,
        };
        let units = [0x41u16.swap_bytes(), 0x42u16.swap_bytes()];
        let text = Text::utf16(&units).with_byte_order(foreign);
        assert_eq!(collect_forward(&text), vec![(0x41, 1), (0x42, 2)]);
    }

    #[test]
    fn test_utf32_and_scalars() {
        let values = [0x41, 0x1F600, 0x10FFFF];
        assert_eq!(collect_forward(&Text::scalars(&values)).len(), 3);
        assert_eq!(collect_forward(&Text::utf32(&values)).len(), 3);

        let bad = [0x41, 0xD800];
        assert!(Text::scalars(&bad).validate().is_err());
        assert!(Text::scalars(&[0x110000]).next(0).is_err());
        assert!(Text::scalars(&bad).trusted().validate().is_ok());
    }

    #[test]
    fn test_str_is_trusted() {
        let text = Text::from("héllo");
        assert!(text.is_trusted());
        assert_eq!(text.end(), 6);
        assert!(text.validate().is_ok());
    }

    #[test]
    fn test_builders_record_attributes() {
        let units = [0x4100u16, 0];
        let text = Text::utf16(&units)
            .terminated()
            .with_byte_order(ByteOrder::Big);
        assert_eq!(text.units(), CodeUnits::Utf16(&units));
        assert_eq!(text.length(), Length::Terminated);
        assert_eq!(text.byte_order(), ByteOrder::Big);
        assert_eq!(Text::utf16(&units).byte_order(), ByteOrder::native());
        assert_eq!(Text::utf16(&units).length(), Length::Explicit(2));
    }

    #[test]
    fn test_past_end() {
        let text = Text::utf8(b"ab\0cd").terminated();
        assert!(!text.is_past_end(0));
        assert!(!text.is_past_end(2));
        assert!(text.is_past_end(3));
        assert!(text.is_past_end(6));

        let explicit = Text::utf8(b"ab\0cd");
        assert!(!explicit.is_past_end(3));
        assert!(!explicit.is_past_end(5));
        assert!(explicit.is_past_end(6));
        assert!(Text::utf8(b"abc").with_length(2).unwrap().is_past_end(3));
    }

    #[test]
    fn test_encoding_form_names() {
        assert_eq!("UTF-16".parse::<EncodingForm>().unwrap(), EncodingForm::Utf16);
        assert_eq!("utf8".parse::<EncodingForm>().unwrap(), EncodingForm::Utf8);
        assert!("latin1".parse::<EncodingForm>().is_err());
    }
}
