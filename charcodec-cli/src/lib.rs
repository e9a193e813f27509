//! Helper functions shared between the charcodec CLI binary and its tests.

use std::fs;
use std::path::Path;

use charcodec::{ConvertOptions, Detection};

/// Reads a file and detects its encoding.
pub fn detect_file<P: AsRef<Path>>(path: P) -> Result<Detection, String> {
    let bytes = fs::read(&path)
        .map_err(|e| format!("cannot read {}: {}", path.as_ref().display(), e))?;
    charcodec::detect(&bytes).map_err(|e| e.to_string())
}

/// Reads `input`, converts it from `from` to `to`, and writes the result to
/// `output`.
pub fn convert_file<P: AsRef<Path>>(
    input: P,
    output: P,
    to: &str,
    from: &str,
    options: &ConvertOptions,
) -> Result<(), String> {
    let bytes = fs::read(&input)
        .map_err(|e| format!("cannot read {}: {}", input.as_ref().display(), e))?;
    let converted = charcodec::convert(to, from, &bytes, options).map_err(|e| e.to_string())?;
    fs::write(&output, converted)
        .map_err(|e| format!("cannot write {}: {}", output.as_ref().display(), e))
}

/// Formats a byte-order mark as uppercase space-separated hex pairs.
///
/// An empty signature formats as `(none)` so the output is never blank.
pub fn format_bom_hex(signature: &[u8]) -> String {
    if signature.is_empty() {
        return "(none)".to_string();
    }
    signature
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bom_hex() {
        assert_eq!(format_bom_hex(&[0xEF, 0xBB, 0xBF]), "EF BB BF");
        assert_eq!(format_bom_hex(&[0xFF, 0xFE]), "FF FE");
        assert_eq!(format_bom_hex(&[]), "(none)");
    }
}
