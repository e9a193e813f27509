//! Lenient structural UTF-8 validation.
//!
//! Statistical detectors can misclassify well-formed UTF-8 as a legacy
//! encoding, so detection runs this exact structural check first and only
//! falls back to the statistical step when it fails.

/// Checks whether `bytes` is structurally valid UTF-8 under a deliberately
/// lenient definition.
///
/// Single linear pass with O(1) state: a lead byte in `0xF0..=0xFF` opens a
/// run of 3 continuation bytes, `0xE0..=0xEF` opens 2, `0xC0..=0xDF` opens 1,
/// and any other byte outside a run is accepted standalone. A byte inside a
/// run must have its two high bits equal to `10` or the whole input is
/// rejected immediately.
///
/// Input ending with an open run (a truncated trailing multi-byte sequence)
/// is accepted. Detection precedence relies on this leniency; do not tighten
/// it to strict UTF-8 conformance.
pub fn is_valid_utf8(bytes: &[u8]) -> bool {
    let mut pending: u8 = 0;

    for &byte in bytes {
        if pending > 0 {
            if byte & 0xC0 != 0x80 {
                return false;
            }
            pending -= 1;
        } else if byte >= 0xF0 {
            pending = 3;
        } else if byte >= 0xE0 {
            pending = 2;
        } else if byte >= 0xC0 {
            pending = 1;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_ascii() {
        assert!(is_valid_utf8(b""));
        assert!(is_valid_utf8(b"plain ascii text\n"));
    }

    #[test]
    fn test_well_formed_multibyte() {
        assert!(is_valid_utf8("héllo wörld".as_bytes()));
        assert!(is_valid_utf8("日本語".as_bytes()));
        assert!(is_valid_utf8("🦀".as_bytes()));
    }

    #[test]
    fn test_broken_continuation_rejected() {
        // 0xC3 opens a 1-byte run; 'x' is not a continuation byte.
        assert!(!is_valid_utf8(&[0xC3, b'x']));
        // 0xE9 opens a 2-byte run; the space breaks it.
        assert!(!is_valid_utf8(b"caf\xE9 latte"));
        // 0xF0 opens a 3-byte run broken on the third byte.
        assert!(!is_valid_utf8(&[0xF0, 0x9F, 0x41, 0x80]));
    }

    #[test]
    fn test_truncated_trailing_sequence_accepted() {
        // Lenient by contract: an open run at end of input is valid.
        assert!(is_valid_utf8(&[b'a', 0xC3]));
        assert!(is_valid_utf8(&[b'a', 0xE9]));
        assert!(is_valid_utf8(&[0xF0, 0x9F, 0xA6]));
    }

    #[test]
    fn test_stray_continuation_byte_accepted_standalone() {
        // Outside a run, 0x80..=0xBF bytes fall in the "any other value"
        // class and pass. Lenient by contract.
        assert!(is_valid_utf8(&[0x80]));
        assert!(is_valid_utf8(&[b'a', 0xBF, b'b']));
    }
}
