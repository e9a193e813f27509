#![forbid(unsafe_code)]
//! Character encoding detection and conversion engine.
//!
//! Detects the charset of raw byte buffers (byte-order marks, a lenient
//! structural UTF-8 check, then a statistical fallback) and losslessly
//! transcodes text between charsets with configurable strictness. Built for
//! editor-like consumers that open files of unknown encoding, work on them
//! as Unicode, and write them back without corrupting byte-order marks.
//!
//! # Quick Start
//!
//! ```rust
//! use charcodec::{ConvertOptions, bom, convert, detect};
//!
//! let detection = detect(b"\xEF\xBB\xBFhello")?;
//! assert_eq!(detection.charset, "UTF-8");
//! assert!(detection.bom);
//!
//! let cyrillic = convert("WINDOWS-1251", "UTF-8", "Привет".as_bytes(), &ConvertOptions::default())?;
//! assert_eq!(cyrillic.len(), 6);
//!
//! assert_eq!(bom("UTF-16LE"), &[0xFF, 0xFE]);
//! # Ok::<(), charcodec::Error>(())
//! ```
//!
//! # Design
//!
//! - Detection precedence: BOM match > structural UTF-8 > statistical
//!   guess. A resolved BOM is always authoritative over heuristics.
//! - The statistical step is a pluggable [`StatisticalDetector`] seam;
//!   the default is backed by `chardetng`.
//! - Every call is synchronous, re-entrant, and creates its own private
//!   conversion or detection session. The only shared state is the
//!   immutable BOM table.

pub mod bom;
pub mod convert;
pub mod detect;
pub mod error;
pub mod utf8;

// Re-export the engine surface for easy consumption
pub use crate::{
    bom::bom,
    convert::{ConvertOptions, convert},
    detect::{ChardetngDetector, Detection, StatisticalDetector, detect, detect_with},
    error::Error,
};
