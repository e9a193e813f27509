//! Streaming charset-to-charset conversion.
//!
//! Conversion pivots through Unicode text: source bytes are decoded with a
//! private `encoding_rs` session (or the engine's own wide-Unicode reader),
//! then encoded to the target charset. Both stages move data through a
//! fixed-size scratch buffer, so auxiliary memory stays bounded regardless
//! of input length. Sessions are plain owned values and are dropped on every
//! exit path.

use encoding_rs::{DecoderResult, Encoder, EncoderResult, Encoding, UTF_16BE, UTF_16LE};
use serde::{Deserialize, Serialize};

use crate::{bom, error::Error};

/// Bytes moved per round trip through a stage's scratch buffer. Tunable;
/// only bounds memory, never affects conversion results.
const BUFFER_SIZE: usize = 4096;

/// Conversion policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ConvertOptions {
    /// Fail with [`Error::IllegalSequence`] on the first malformed or
    /// unrepresentable sequence instead of dropping it.
    #[serde(default)]
    pub strict: bool,
    /// Strip the source charset's byte-order mark from the input, if present.
    #[serde(default)]
    pub handle_from_bom: bool,
    /// Prepend the target charset's byte-order mark to the output.
    #[serde(default)]
    pub handle_to_bom: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endian {
    Little,
    Big,
}

/// How to decode the source charset into Unicode text.
enum Source {
    Session(&'static Encoding),
    Utf32(Endian),
}

/// How to encode Unicode text into the target charset. The conversion
/// primitive is decode-only for UTF-16 and has no UTF-32 support, so the
/// engine serializes those itself.
enum Sink {
    Session(&'static Encoding),
    Utf16(Endian),
    Utf32(Endian),
}

fn utf32_endianness(charset: &str) -> Option<Endian> {
    if charset.eq_ignore_ascii_case("UTF-32LE") {
        Some(Endian::Little)
    } else if charset.eq_ignore_ascii_case("UTF-32BE") {
        Some(Endian::Big)
    } else {
        None
    }
}

fn resolve_source(charset: &str) -> Result<Source, Error> {
    if let Some(endian) = utf32_endianness(charset) {
        return Ok(Source::Utf32(endian));
    }
    Encoding::for_label(charset.as_bytes())
        .map(Source::Session)
        .ok_or_else(|| Error::UnsupportedCharset(charset.to_string()))
}

fn resolve_target(charset: &str) -> Result<Sink, Error> {
    if let Some(endian) = utf32_endianness(charset) {
        return Ok(Sink::Utf32(endian));
    }
    match Encoding::for_label(charset.as_bytes()) {
        Some(encoding) if encoding == UTF_16LE => Ok(Sink::Utf16(Endian::Little)),
        Some(encoding) if encoding == UTF_16BE => Ok(Sink::Utf16(Endian::Big)),
        Some(encoding) => Ok(Sink::Session(encoding)),
        None => Err(Error::UnsupportedCharset(charset.to_string())),
    }
}

/// Converts `bytes` from the `from` charset into the `to` charset.
///
/// Unrecognized charset names fail with [`Error::UnsupportedCharset`] before
/// any output is produced. In strict mode the first malformed or
/// unrepresentable sequence aborts the conversion with
/// [`Error::IllegalSequence`] and all accumulated output is discarded. In
/// lenient mode (the default) the offending unit is skipped and conversion
/// resumes, yielding a lossy but forward-progressing result with no
/// replacement characters inserted.
pub fn convert(
    to: &str,
    from: &str,
    bytes: &[u8],
    options: &ConvertOptions,
) -> Result<Vec<u8>, Error> {
    let source = resolve_source(from)?;
    let sink = resolve_target(to)?;

    let input = if options.handle_from_bom {
        strip_bom(from, bytes)
    } else {
        bytes
    };

    let text = match source {
        Source::Session(encoding) => decode_session(encoding, input, options.strict, from, to)?,
        Source::Utf32(endian) => decode_utf32(input, endian, options.strict, from, to)?,
    };

    let mut output = Vec::with_capacity(text.len());
    if options.handle_to_bom {
        output.extend_from_slice(bom::bom(to));
    }

    match sink {
        Sink::Session(encoding) => {
            encode_session(encoding, &text, options.strict, from, to, &mut output)?
        }
        Sink::Utf16(endian) => encode_utf16(&text, endian, &mut output),
        Sink::Utf32(endian) => encode_utf32(&text, endian, &mut output),
    }

    Ok(output)
}

/// Drops the source charset's signature from the head of the input, if both
/// exist.
fn strip_bom<'a>(from: &str, bytes: &'a [u8]) -> &'a [u8] {
    let signature = bom::bom(from);
    if !signature.is_empty() && bytes.starts_with(signature) {
        &bytes[signature.len()..]
    } else {
        bytes
    }
}

/// Decodes source bytes to Unicode text through an `encoding_rs` decoder
/// session.
fn decode_session(
    encoding: &'static Encoding,
    bytes: &[u8],
    strict: bool,
    from: &str,
    to: &str,
) -> Result<String, Error> {
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let mut scratch = [0u8; BUFFER_SIZE];
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut read = 0;

    loop {
        let (result, bytes_read, bytes_written) =
            decoder.decode_to_utf8_without_replacement(&bytes[read..], &mut scratch, true);
        read += bytes_read;
        decoded.extend_from_slice(&scratch[..bytes_written]);

        match result {
            DecoderResult::InputEmpty => break,
            DecoderResult::OutputFull => continue,
            DecoderResult::Malformed(_, _) => {
                if strict {
                    return Err(Error::illegal_sequence(from, to));
                }
                // Lenient: the decoder has already consumed the malformed
                // bytes, so looping resumes right past them.
            }
        }
    }

    // The decoder only ever emits well-formed UTF-8.
    Ok(String::from_utf8(decoded).expect("decoder output is valid UTF-8"))
}

/// Encodes Unicode text into the target charset through an `encoding_rs`
/// encoder session.
fn encode_session(
    encoding: &'static Encoding,
    text: &str,
    strict: bool,
    from: &str,
    to: &str,
    output: &mut Vec<u8>,
) -> Result<(), Error> {
    let mut encoder: Encoder = encoding.new_encoder();
    let mut scratch = [0u8; BUFFER_SIZE];
    let mut read = 0;

    loop {
        let (result, bytes_read, bytes_written) =
            encoder.encode_from_utf8_without_replacement(&text[read..], &mut scratch, true);
        read += bytes_read;
        output.extend_from_slice(&scratch[..bytes_written]);

        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => continue,
            EncoderResult::Unmappable(_) => {
                if strict {
                    return Err(Error::illegal_sequence(from, to));
                }
                // Lenient: the unmappable character is already consumed and
                // simply dropped.
            }
        }
    }

    Ok(())
}

/// Decodes UTF-32 bytes of the given endianness into Unicode text.
///
/// Code units that are not Unicode scalar values, and trailing bytes that do
/// not form a whole unit, are illegal sequences; in lenient mode exactly one
/// byte is skipped before resuming, so a later unit boundary can resync.
fn decode_utf32(
    bytes: &[u8],
    endian: Endian,
    strict: bool,
    from: &str,
    to: &str,
) -> Result<String, Error> {
    let mut text = String::with_capacity(bytes.len() / 4);
    let mut read = 0;

    while read < bytes.len() {
        let unit = if bytes.len() - read >= 4 {
            let word = [bytes[read], bytes[read + 1], bytes[read + 2], bytes[read + 3]];
            let code_point = match endian {
                Endian::Little => u32::from_le_bytes(word),
                Endian::Big => u32::from_be_bytes(word),
            };
            char::from_u32(code_point)
        } else {
            None
        };

        match unit {
            Some(c) => {
                text.push(c);
                read += 4;
            }
            None => {
                if strict {
                    return Err(Error::illegal_sequence(from, to));
                }
                read += 1;
            }
        }
    }

    Ok(text)
}

/// Serializes Unicode text as UTF-16 code units of the given endianness.
/// Infallible: every scalar value is representable.
fn encode_utf16(text: &str, endian: Endian, output: &mut Vec<u8>) {
    output.reserve(text.len() * 2);
    for unit in text.encode_utf16() {
        let bytes = match endian {
            Endian::Little => unit.to_le_bytes(),
            Endian::Big => unit.to_be_bytes(),
        };
        output.extend_from_slice(&bytes);
    }
}

/// Serializes Unicode text as UTF-32 code units of the given endianness.
/// Infallible: every scalar value is representable.
fn encode_utf32(text: &str, endian: Endian, output: &mut Vec<u8>) {
    output.reserve(text.len() * 4);
    for c in text.chars() {
        let bytes = match endian {
            Endian::Little => (c as u32).to_le_bytes(),
            Endian::Big => (c as u32).to_be_bytes(),
        };
        output.extend_from_slice(&bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_passthrough() {
        let output = convert("UTF-8", "UTF-8", b"hello", &ConvertOptions::default()).unwrap();
        assert_eq!(output, b"hello");
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let output = convert("WINDOWS-1251", "UTF-8", b"", &ConvertOptions::default()).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_unsupported_target_charset() {
        let error = convert("INVALID-NAME", "UTF-8", b"x", &ConvertOptions::default()).unwrap_err();
        assert!(matches!(error, Error::UnsupportedCharset(name) if name == "INVALID-NAME"));
    }

    #[test]
    fn test_unsupported_source_charset() {
        let error = convert("UTF-8", "INVALID-NAME", b"x", &ConvertOptions::default()).unwrap_err();
        assert!(matches!(error, Error::UnsupportedCharset(name) if name == "INVALID-NAME"));
    }

    #[test]
    fn test_utf7_is_detection_only() {
        let error = convert("UTF-8", "UTF-7", b"+/v8-", &ConvertOptions::default()).unwrap_err();
        assert!(matches!(error, Error::UnsupportedCharset(_)));
    }

    #[test]
    fn test_strict_malformed_source_fails_without_output() {
        let options = ConvertOptions {
            strict: true,
            ..ConvertOptions::default()
        };
        let error = convert("WINDOWS-1252", "UTF-8", b"ab\xFFcd", &options).unwrap_err();
        assert!(matches!(error, Error::IllegalSequence { .. }));
    }

    #[test]
    fn test_lenient_drops_exactly_the_malformed_byte() {
        let output =
            convert("WINDOWS-1252", "UTF-8", b"ab\xFFcd", &ConvertOptions::default()).unwrap();
        assert_eq!(output, b"abcd");
    }

    #[test]
    fn test_strict_unmappable_character_fails() {
        let options = ConvertOptions {
            strict: true,
            ..ConvertOptions::default()
        };
        // U+00E9 has no mapping in the Cyrillic code page.
        let error = convert("WINDOWS-1251", "UTF-8", "a\u{E9}b".as_bytes(), &options).unwrap_err();
        assert!(matches!(error, Error::IllegalSequence { .. }));
    }

    #[test]
    fn test_lenient_drops_unmappable_character() {
        let output = convert(
            "WINDOWS-1251",
            "UTF-8",
            "a\u{E9}b".as_bytes(),
            &ConvertOptions::default(),
        )
        .unwrap();
        assert_eq!(output, b"ab");
    }

    #[test]
    fn test_utf16le_target_serialization() {
        let output = convert("UTF-16LE", "UTF-8", b"Hi", &ConvertOptions::default()).unwrap();
        assert_eq!(output, &[0x48, 0x00, 0x69, 0x00]);
    }

    #[test]
    fn test_utf16be_target_serialization() {
        let output = convert("UTF-16BE", "UTF-8", b"Hi", &ConvertOptions::default()).unwrap();
        assert_eq!(output, &[0x00, 0x48, 0x00, 0x69]);
    }

    #[test]
    fn test_utf16_surrogate_pair() {
        let output = convert("UTF-16LE", "UTF-8", "🦀".as_bytes(), &ConvertOptions::default())
            .unwrap();
        assert_eq!(output, &[0x3E, 0xD8, 0x80, 0xDD]);
    }

    #[test]
    fn test_utf32_round_trip() {
        let text = "héllo 🦀";
        let wide = convert(
            "UTF-32BE",
            "UTF-8",
            text.as_bytes(),
            &ConvertOptions::default(),
        )
        .unwrap();
        assert_eq!(wide.len(), text.chars().count() * 4);
        let back = convert("UTF-8", "UTF-32BE", &wide, &ConvertOptions::default()).unwrap();
        assert_eq!(back, text.as_bytes());
    }

    #[test]
    fn test_utf32_strict_rejects_invalid_code_point() {
        let options = ConvertOptions {
            strict: true,
            ..ConvertOptions::default()
        };
        // 0x0011_0000 is above the Unicode range.
        let error = convert("UTF-8", "UTF-32LE", &[0x00, 0x00, 0x11, 0x00], &options).unwrap_err();
        assert!(matches!(error, Error::IllegalSequence { .. }));
    }

    #[test]
    fn test_utf32_lenient_skips_truncated_tail() {
        let mut wide = convert("UTF-32LE", "UTF-8", b"A", &ConvertOptions::default()).unwrap();
        wide.extend_from_slice(&[0x42, 0x00]); // half a unit
        let output = convert("UTF-8", "UTF-32LE", &wide, &ConvertOptions::default()).unwrap();
        assert_eq!(output, b"A");
    }

    #[test]
    fn test_handle_from_bom_strips_signature() {
        let output = convert(
            "WINDOWS-1252",
            "UTF-8",
            b"\xEF\xBB\xBFhello",
            &ConvertOptions {
                handle_from_bom: true,
                ..ConvertOptions::default()
            },
        )
        .unwrap();
        assert_eq!(output, b"hello");
    }

    #[test]
    fn test_handle_to_bom_prepends_signature() {
        let output = convert(
            "UTF-16LE",
            "UTF-8",
            b"A",
            &ConvertOptions {
                handle_to_bom: true,
                ..ConvertOptions::default()
            },
        )
        .unwrap();
        assert_eq!(output, &[0xFF, 0xFE, 0x41, 0x00]);
    }

    #[test]
    fn test_bom_options_are_noops_for_signatureless_charsets() {
        let options = ConvertOptions {
            handle_from_bom: true,
            handle_to_bom: true,
            ..ConvertOptions::default()
        };
        let output = convert("WINDOWS-1252", "WINDOWS-1252", b"abc", &options).unwrap();
        assert_eq!(output, b"abc");
    }

    #[test]
    fn test_gb18030_round_trip() {
        let text = "汉字";
        let gb = convert(
            "GB18030",
            "UTF-8",
            text.as_bytes(),
            &ConvertOptions {
                strict: true,
                ..ConvertOptions::default()
            },
        )
        .unwrap();
        let back = convert(
            "UTF-8",
            "GB18030",
            &gb,
            &ConvertOptions {
                strict: true,
                ..ConvertOptions::default()
            },
        )
        .unwrap();
        assert_eq!(back, text.as_bytes());
    }
}
