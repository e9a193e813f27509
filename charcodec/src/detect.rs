//! Encoding detection: statistical detector adapter and the detection
//! pipeline composing it with the BOM matcher and the UTF-8 validator.

use chardetng::EncodingDetector;
use serde::{Deserialize, Serialize};

use crate::{bom, error::Error, utf8};

/// The outcome of a successful detection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Detection {
    /// Name of the detected charset.
    pub charset: String,
    /// Whether the charset came from a matched byte-order mark.
    pub bom: bool,
}

impl Detection {
    fn new(charset: impl Into<String>, bom: bool) -> Self {
        Detection {
            charset: charset.into(),
            bom,
        }
    }
}

/// A best-effort heuristic charset classifier.
///
/// Implementations guess a charset from byte frequency and pattern analysis.
/// The result is advisory, may change across classifier versions, and is
/// only consulted after the exact checks (BOM, structural UTF-8) have failed.
pub trait StatisticalDetector {
    /// Returns a best-guess charset name for `bytes`, or `None` when the
    /// classifier cannot commit to one.
    fn guess(&self, bytes: &[u8]) -> Option<String>;
}

/// Statistical detection backed by `chardetng`.
///
/// Each call builds a private `EncodingDetector`, feeds it the whole buffer
/// in one finalizing pass, and drops it before returning, so the adapter is
/// re-entrant and keeps no classifier state between calls.
#[derive(Debug, Default)]
pub struct ChardetngDetector;

impl StatisticalDetector for ChardetngDetector {
    fn guess(&self, bytes: &[u8]) -> Option<String> {
        let mut detector = EncodingDetector::new();
        detector.feed(bytes, true);
        let encoding = detector.guess(None, true);
        Some(encoding.name().to_string())
    }
}

/// Detects the charset of `bytes` using the default statistical detector.
///
/// See [`detect_with`] for the precedence rules.
pub fn detect(bytes: &[u8]) -> Result<Detection, Error> {
    detect_with(bytes, &ChardetngDetector)
}

/// Detects the charset of `bytes`, falling back to the given statistical
/// detector when the exact checks are inconclusive.
///
/// Precedence, cheapest and most reliable first:
///
/// 1. Empty input is UTF-8 by convention (`bom` flag false).
/// 2. A matched byte-order mark is authoritative (`bom` flag true).
/// 3. Input that is structurally valid UTF-8 under the lenient check is
///    UTF-8 (`bom` flag false).
/// 4. Otherwise the statistical detector decides; if it reports nothing,
///    detection fails with [`Error::DetectionFailed`].
pub fn detect_with(bytes: &[u8], detector: &dyn StatisticalDetector) -> Result<Detection, Error> {
    if bytes.is_empty() {
        return Ok(Detection::new("UTF-8", false));
    }

    if let Some((charset, _)) = bom::charset_from_bom(bytes) {
        return Ok(Detection::new(charset, true));
    }

    if utf8::is_valid_utf8(bytes) {
        return Ok(Detection::new("UTF-8", false));
    }

    match detector.guess(bytes) {
        Some(charset) if !charset.is_empty() => Ok(Detection::new(charset, false)),
        _ => Err(Error::detection_failed("no charset matched the input")),
    }
}
