//! Byte-order-mark signature table and matcher.
//!
//! The table is immutable process-wide state. Entry order is part of the
//! contract: UTF-32 variants must be tested before the UTF-16 variants that
//! share their `FF FE` prefix, and the first full match wins.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// One entry of the BOM table: a charset name and its leading byte signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Charset the signature identifies.
    pub charset: &'static str,
    /// The signature bytes (1 to 4 bytes).
    pub bytes: &'static [u8],
}

/// Ordered list of charsets that can carry a byte-order mark.
///
/// UTF-7 appears four times because its signature varies with the first
/// base64 character following `2B 2F 76`.
pub static BOM_TABLE: [Signature; 10] = [
    Signature {
        charset: "UTF-8",
        bytes: &[0xEF, 0xBB, 0xBF],
    },
    Signature {
        charset: "UTF-32LE",
        bytes: &[0xFF, 0xFE, 0x00, 0x00],
    },
    Signature {
        charset: "UTF-32BE",
        bytes: &[0x00, 0x00, 0xFE, 0xFF],
    },
    Signature {
        charset: "UTF-16LE",
        bytes: &[0xFF, 0xFE],
    },
    Signature {
        charset: "UTF-16BE",
        bytes: &[0xFE, 0xFF],
    },
    Signature {
        charset: "GB18030",
        bytes: &[0x84, 0x31, 0x95, 0x33],
    },
    Signature {
        charset: "UTF-7",
        bytes: &[0x2B, 0x2F, 0x76, 0x38],
    },
    Signature {
        charset: "UTF-7",
        bytes: &[0x2B, 0x2F, 0x76, 0x39],
    },
    Signature {
        charset: "UTF-7",
        bytes: &[0x2B, 0x2F, 0x76, 0x2B],
    },
    Signature {
        charset: "UTF-7",
        bytes: &[0x2B, 0x2F, 0x76, 0x2F],
    },
];

// Reverse index for `bom()`. First table entry wins for charsets with
// several signatures (UTF-7).
lazy_static! {
    static ref BOM_BY_CHARSET: HashMap<&'static str, &'static [u8]> = {
        let mut map = HashMap::new();
        for entry in &BOM_TABLE {
            map.entry(entry.charset).or_insert(entry.bytes);
        }
        map
    };
}

/// Detects the charset of `bytes` from its leading byte-order mark, if any.
///
/// Walks the table in declared order and returns the first entry whose full
/// signature is a prefix of the input, together with the signature length.
/// There is no longest-match search; the table order already resolves the
/// `FF FE` ambiguity between UTF-32LE and UTF-16LE.
pub fn charset_from_bom(bytes: &[u8]) -> Option<(&'static str, usize)> {
    BOM_TABLE
        .iter()
        .find(|entry| bytes.starts_with(entry.bytes))
        .map(|entry| (entry.charset, entry.bytes.len()))
}

/// Returns the byte-order mark for the given charset.
///
/// The lookup is exact and case-sensitive. Charsets without a defined
/// signature yield an empty slice, never an error.
pub fn bom(charset: &str) -> &'static [u8] {
    BOM_BY_CHARSET.get(charset).copied().unwrap_or(&[])
}
