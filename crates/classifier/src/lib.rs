//! # Knowledge Base File Type Classifier
//!
//! Magic-byte file type detection for the ingestion pipeline, with content
//! heuristics and extension fallback for text formats.
//!
//! Detection order:
//!
//! 1. Magic-byte signatures at fixed offsets (PDF, ZIP, OLE, images, RTF)
//! 2. Deep inspection of ZIP containers to split docx/xlsx/pptx from
//!    plain archives
//! 3. Content heuristics over the first 4 KiB (JSON, CSV, Markdown, text)
//! 4. Filename extension mapping
//!
//! Classification never fails: unrecognizable input yields
//! [`FileKind::Unknown`] with zero confidence, and identical input always
//! produces identical output.
//!
//! ## Example
//!
//! ```rust
//! use kb_classifier::{detect_file_type_full, FileKind};
//!
//! let detected = detect_file_type_full(b"%PDF-1.7 ...", Some("report.pdf"));
//! assert_eq!(detected.kind, FileKind::Pdf);
//! assert!(detected.is_text_extractable());
//! ```

mod deep_inspect;
mod detector;
mod signatures;
mod types;

pub use deep_inspect::{deep_inspect_zip, detect_file_type_full};
pub use detector::detect_file_type;
pub use types::{Confidence, DetectedFileType, DetectionMethod, FileKind, ParserKind};
