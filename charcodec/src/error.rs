//! All error types for the charcodec crate.
//!
//! These are returned from all fallible operations (detection and conversion).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No BOM matched, the input is not structurally valid UTF-8, and the
    /// statistical detector came back empty.
    #[error("could not detect the encoding: {0}")]
    DetectionFailed(String),

    /// The conversion primitive does not recognize the charset name.
    #[error("unsupported charset `{0}`")]
    UnsupportedCharset(String),

    /// Strict-mode conversion hit a byte sequence that is malformed for the
    /// source charset or unrepresentable in the target charset.
    #[error("illegal byte sequence while converting from `{from}` to `{to}`")]
    IllegalSequence { from: String, to: String },
}

impl Error {
    /// Creates a detection failure with a human-readable reason.
    pub fn detection_failed(message: impl Into<String>) -> Self {
        Error::DetectionFailed(message.into())
    }

    /// Creates an illegal-sequence error for the given conversion pair.
    pub fn illegal_sequence(from: impl Into<String>, to: impl Into<String>) -> Self {
        Error::IllegalSequence {
            from: from.into(),
            to: to.into(),
        }
    }
}
