//! Framing of text messages into self-delimiting bitstreams and back.
//!
//! A message is serialized as its UTF-8 bytes, most significant bit first,
//! followed by [`TERMINATOR`], one all-zero byte.

use std::io::Cursor;
use std::ops::Deref;

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use log::warn;

use crate::result::Result;
use crate::StegoError;

/// marks the end of a message inside the carrier, a single null byte
pub const TERMINATOR: [bool; 8] = [false; 8];

/// decoded text above this ratio of printable ASCII is considered a genuine message
pub const PLAUSIBLE_PRINTABLE_RATIO: f64 = 0.7;

/// A text message that is about to be hidden
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    text: String,
}

impl Message {
    /// Creates a message, rejects texts containing `\0` since they would end the message early
    pub fn new<S: Into<String>>(text: S) -> Result<Self> {
        let text = text.into();
        if text.contains('\0') {
            return Err(StegoError::MessageContainsNul);
        }

        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// byte length of the UTF-8 representation
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn to_bitstream(&self) -> Bitstream {
        text_to_bits(&self.text)
    }
}

/// Ordered bits of a framed message, always a multiple of 8 long
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bitstream(Vec<bool>);

impl Bitstream {
    pub fn into_inner(self) -> Vec<bool> {
        self.0
    }
}

impl Deref for Bitstream {
    type Target = [bool];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Encodes `message` as UTF-8, 8 bits per byte MSB first, and appends the [`TERMINATOR`].
pub fn text_to_bits(message: &str) -> Bitstream {
    let bytes = message.as_bytes();
    let mut reader = BitReader::endian(Cursor::new(bytes), BigEndian);
    let mut bits: Vec<bool> = Vec::with_capacity((bytes.len() + 1) * 8);
    bits.extend(std::iter::from_fn(|| reader.read_bit().ok()));
    bits.extend_from_slice(&TERMINATOR);

    Bitstream(bits)
}

/// Packs bits into bytes MSB first, a trailing partial byte gets right padded with zeros.
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    let mut writer = BitWriter::endian(Vec::with_capacity(bits.len() / 8 + 1), BigEndian);
    for bit in bits {
        if writer.write_bit(*bit).is_err() {
            break;
        }
    }

    if !writer.byte_aligned() {
        warn!(
            "{} bits are not byte aligned, padding the last byte with zeros",
            bits.len()
        );
        if writer.byte_align().is_err() {
            warn!("Failed to align the last byte");
        }
    }

    writer.into_writer()
}

/// Decodes bits back into text. Invalid UTF-8 sequences turn into `U+FFFD`, it never fails.
pub fn bits_to_text(bits: &[bool]) -> String {
    String::from_utf8_lossy(&bits_to_bytes(bits)).into_owned()
}

/// share of characters in the printable ASCII range `32..=126`
pub fn printable_ratio(text: &str) -> f64 {
    let (printable, total) = text.chars().fold((0usize, 0usize), |(p, t), c| {
        (p + usize::from((' '..='~').contains(&c)), t + 1)
    });
    if total == 0 {
        return 0.0;
    }

    printable as f64 / total as f64
}

/// heuristic if a decoded text looks like a message rather than noise
pub fn is_plausible(text: &str) -> bool {
    !text.is_empty() && printable_ratio(text) > PLAUSIBLE_PRINTABLE_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> Vec<bool> {
        s.chars().filter(|c| *c != '_').map(|c| c == '1').collect()
    }

    #[test]
    fn should_encode_msb_first_and_append_terminator() {
        let b = text_to_bits("Hi");

        assert_eq!(b.len(), 24);
        assert_eq!(&b[..8], bits("0100_1000").as_slice(), "`H` is 0x48");
        assert_eq!(&b[8..16], bits("0110_1001").as_slice(), "`i` is 0x69");
        assert_eq!(&b[16..], &TERMINATOR[..]);
    }

    #[test]
    fn should_encode_empty_message_as_terminator_only() {
        assert_eq!(&text_to_bits("")[..], &TERMINATOR[..]);
    }

    #[test]
    fn should_encode_multibyte_code_points_as_utf8() {
        let b = text_to_bits("ä");

        // ä is 0xC3 0xA4 in UTF-8
        assert_eq!(b.len(), 24);
        assert_eq!(&b[..8], bits("1100_0011").as_slice());
        assert_eq!(&b[8..16], bits("1010_0100").as_slice());
    }

    #[test]
    fn should_decode_what_was_encoded() {
        let text = "Grüße, 世界! 🦀";
        let b = text_to_bits(text);

        assert_eq!(bits_to_text(&b[..b.len() - 8]), text);
    }

    #[test]
    fn should_pad_partial_bytes_with_zeros() {
        // 0100_1 + 000 padding = 0x48
        assert_eq!(bits_to_text(&bits("0100_1")), "H");
    }

    #[test]
    fn should_replace_invalid_utf8_instead_of_failing() {
        let text = bits_to_text(&bits("1111_1111_0100_1000"));

        assert_eq!(text, "\u{FFFD}H");
    }

    #[test]
    fn should_reject_nul_in_messages() {
        assert!(matches!(
            Message::new("a\0b"),
            Err(StegoError::MessageContainsNul)
        ));
        assert_eq!(Message::new("ab").unwrap().len(), 2);
    }

    #[test]
    fn should_compute_printable_ratio() {
        assert_eq!(printable_ratio(""), 0.0);
        assert_eq!(printable_ratio("Hello"), 1.0);
        assert_eq!(printable_ratio("ab\u{FFFD}\u{1}"), 0.5);
    }

    #[test]
    fn should_judge_plausibility() {
        assert!(is_plausible("Hello World"));
        assert!(!is_plausible(""));
        assert!(!is_plausible("\u{FFFD}\u{FFFD}a"));
    }
}
