use crate::types::{FileKind, ParserKind};

/// A magic-byte signature checked at a fixed offset.
pub(crate) struct MagicSignature {
    pub bytes: &'static [u8],
    pub offset: usize,
    pub kind: FileKind,
    pub mime: &'static str,
    pub parser: ParserKind,
    /// Container formats that need their contents probed to disambiguate
    pub requires_deep_inspection: bool,
    /// Signature-specific follow-up check over the whole buffer
    pub secondary: Option<fn(&[u8]) -> bool>,
}

/// Ordered signature table; the first match wins.
pub(crate) const SIGNATURES: &[MagicSignature] = &[
    MagicSignature {
        bytes: b"%PDF",
        offset: 0,
        kind: FileKind::Pdf,
        mime: "application/pdf",
        parser: ParserKind::Pdf,
        requires_deep_inspection: false,
        secondary: None,
    },
    // Office Open XML (docx/xlsx/pptx) shares the ZIP header; deep
    // inspection of the container decides the actual type.
    MagicSignature {
        bytes: &[0x50, 0x4B, 0x03, 0x04],
        offset: 0,
        kind: FileKind::Zip,
        mime: "application/zip",
        parser: ParserKind::Zip,
        requires_deep_inspection: true,
        secondary: None,
    },
    // Legacy Office formats (doc/xls/ppt) use the compound binary container.
    MagicSignature {
        bytes: &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1],
        offset: 0,
        kind: FileKind::Ole,
        mime: "application/x-ole-storage",
        parser: ParserKind::Ole,
        requires_deep_inspection: true,
        secondary: None,
    },
    MagicSignature {
        bytes: &[0xFF, 0xD8, 0xFF],
        offset: 0,
        kind: FileKind::Jpeg,
        mime: "image/jpeg",
        parser: ParserKind::Image,
        requires_deep_inspection: false,
        secondary: None,
    },
    MagicSignature {
        bytes: &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
        offset: 0,
        kind: FileKind::Png,
        mime: "image/png",
        parser: ParserKind::Image,
        requires_deep_inspection: false,
        secondary: None,
    },
    MagicSignature {
        bytes: b"GIF87a",
        offset: 0,
        kind: FileKind::Gif,
        mime: "image/gif",
        parser: ParserKind::Image,
        requires_deep_inspection: false,
        secondary: None,
    },
    MagicSignature {
        bytes: b"GIF89a",
        offset: 0,
        kind: FileKind::Gif,
        mime: "image/gif",
        parser: ParserKind::Image,
        requires_deep_inspection: false,
        secondary: None,
    },
    // RIFF is shared by several media formats; only WEBP belongs here.
    MagicSignature {
        bytes: b"RIFF",
        offset: 0,
        kind: FileKind::Webp,
        mime: "image/webp",
        parser: ParserKind::Image,
        requires_deep_inspection: false,
        secondary: Some(is_webp),
    },
    MagicSignature {
        bytes: b"{\\rtf",
        offset: 0,
        kind: FileKind::Rtf,
        mime: "application/rtf",
        parser: ParserKind::Rtf,
        requires_deep_inspection: false,
        secondary: None,
    },
];

fn is_webp(buffer: &[u8]) -> bool {
    buffer.len() >= 12 && &buffer[8..12] == b"WEBP"
}

/// ZIP-internal paths that identify specific Office formats, probed in order.
pub(crate) const OFFICE_ZIP_MARKERS: &[(&str, FileKind, &str, ParserKind)] = &[
    (
        "word/document.xml",
        FileKind::Docx,
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ParserKind::Docx,
    ),
    (
        "xl/workbook.xml",
        FileKind::Xlsx,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ParserKind::Xlsx,
    ),
    (
        "ppt/presentation.xml",
        FileKind::Pptx,
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        ParserKind::Pptx,
    ),
    (
        "[Content_Types].xml",
        FileKind::Ooxml,
        "application/x-ooxml",
        ParserKind::Ooxml,
    ),
];
