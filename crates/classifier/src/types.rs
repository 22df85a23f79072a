use serde::{Deserialize, Serialize};

/// Detected file kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    /// Generic ZIP container (may hide an Office format; see deep inspection)
    Zip,
    /// Legacy Office compound binary container
    Ole,
    Docx,
    Doc,
    Xlsx,
    Xls,
    Pptx,
    Ppt,
    /// OOXML container that is none of the known Office types
    Ooxml,
    Jpeg,
    Png,
    Gif,
    Webp,
    Svg,
    Rtf,
    Json,
    Csv,
    Markdown,
    Text,
    Unknown,
}

impl FileKind {
    /// Human-readable name matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Zip => "zip",
            Self::Ole => "ole",
            Self::Docx => "docx",
            Self::Doc => "doc",
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
            Self::Pptx => "pptx",
            Self::Ppt => "ppt",
            Self::Ooxml => "ooxml",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Svg => "svg",
            Self::Rtf => "rtf",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Markdown => "markdown",
            Self::Text => "text",
            Self::Unknown => "unknown",
        }
    }
}

/// Parsing strategy recommended for a detected type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    Pdf,
    Zip,
    Ole,
    Docx,
    Doc,
    Xlsx,
    Pptx,
    Ooxml,
    Image,
    Rtf,
    Json,
    Csv,
    Text,
}

impl ParserKind {
    /// Name of the downstream parser this core expects its collaborators to use.
    #[must_use]
    pub const fn recommended_parser(self) -> &'static str {
        match self {
            Self::Pdf => "pdf-extract",
            Self::Docx | Self::Doc => "office-text",
            Self::Xlsx => "spreadsheet",
            Self::Pptx | Self::Ooxml => "presentation",
            Self::Image => "vision-ocr",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Rtf => "rtf",
            Self::Text | Self::Zip | Self::Ole => "utf-8",
        }
    }
}

/// How confident the classifier is in its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    None,
    Low,
    Medium,
    High,
}

/// Which stage of the pipeline produced the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    MagicBytes,
    ZipDeepInspection,
    ContentAnalysis,
    Extension,
    None,
}

/// Outcome of file type classification.
///
/// Classification never fails: unrecognizable input yields
/// [`FileKind::Unknown`] with [`Confidence::None`].
// Serialize only: the mime is a static tag, and verdicts are produced
// here, never parsed back in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedFileType {
    pub kind: FileKind,
    pub mime: &'static str,
    /// `None` when no parsing strategy applies (unknown input)
    pub parser: Option<ParserKind>,
    pub confidence: Confidence,
    pub detected_by: DetectionMethod,
    /// Set for container formats that need their contents probed to
    /// disambiguate (ZIP-based Office formats, OLE compound files)
    pub requires_deep_inspection: bool,
    /// Lowercased filename extension, if one was supplied
    pub extension: Option<String>,
}

impl DetectedFileType {
    pub(crate) fn unknown(extension: Option<String>) -> Self {
        Self {
            kind: FileKind::Unknown,
            mime: "application/octet-stream",
            parser: None,
            confidence: Confidence::None,
            detected_by: DetectionMethod::None,
            requires_deep_inspection: false,
            extension,
        }
    }

    /// Whether this type can hand the segmenter a plain text string.
    #[must_use]
    pub fn is_text_extractable(&self) -> bool {
        matches!(
            self.parser,
            Some(
                ParserKind::Pdf
                    | ParserKind::Docx
                    | ParserKind::Doc
                    | ParserKind::Text
                    | ParserKind::Json
                    | ParserKind::Csv
                    | ParserKind::Rtf
            )
        )
    }

    /// Whether this type should go through the vision/OCR path instead.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.parser == Some(ParserKind::Image)
    }
}
