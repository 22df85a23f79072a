use crate::signatures::SIGNATURES;
use crate::types::{Confidence, DetectedFileType, DetectionMethod, FileKind, ParserKind};

/// Size of the sample taken for content-based detection.
const CONTENT_SAMPLE_BYTES: usize = 4096;
/// Lines sampled when probing for CSV structure.
const CSV_SAMPLE_LINES: usize = 10;
/// Prefix handed to the JSON parser when probing for JSON content.
const JSON_PROBE_CHARS: usize = 1000;

/// Detect the content type of a raw byte buffer.
///
/// Detection is layered: magic-byte signatures first, then content
/// heuristics over a text sample, then the filename extension. Identical
/// buffer + filename always yields identical output, and no input is an
/// error — unrecognizable bytes come back as [`FileKind::Unknown`].
#[must_use]
pub fn detect_file_type(buffer: &[u8], filename: Option<&str>) -> DetectedFileType {
    let extension = filename.and_then(extract_extension);

    for sig in SIGNATURES {
        let end = sig.offset + sig.bytes.len();
        if buffer.len() < end || &buffer[sig.offset..end] != sig.bytes {
            continue;
        }
        if let Some(check) = sig.secondary {
            if !check(buffer) {
                continue;
            }
        }
        return DetectedFileType {
            kind: sig.kind,
            mime: sig.mime,
            parser: Some(sig.parser),
            confidence: Confidence::High,
            detected_by: DetectionMethod::MagicBytes,
            requires_deep_inspection: sig.requires_deep_inspection,
            extension,
        };
    }

    if let Some((kind, mime, parser)) = detect_text_content(buffer) {
        return DetectedFileType {
            kind,
            mime,
            parser: Some(parser),
            confidence: Confidence::Medium,
            detected_by: DetectionMethod::ContentAnalysis,
            requires_deep_inspection: false,
            extension,
        };
    }

    if let Some((kind, mime, parser)) = extension.as_deref().and_then(detect_by_extension) {
        return DetectedFileType {
            kind,
            mime,
            parser: Some(parser),
            confidence: Confidence::Low,
            detected_by: DetectionMethod::Extension,
            requires_deep_inspection: false,
            extension,
        };
    }

    log::debug!(
        "unrecognized buffer ({} bytes, filename={:?})",
        buffer.len(),
        filename
    );
    DetectedFileType::unknown(extension)
}

fn extract_extension(filename: &str) -> Option<String> {
    let ext = filename.rsplit_once('.')?.1;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Content heuristics over the leading sample, applied in order:
/// binary reject, JSON, CSV, Markdown, plain text.
fn detect_text_content(buffer: &[u8]) -> Option<(FileKind, &'static str, ParserKind)> {
    if buffer.is_empty() {
        return None;
    }

    let sample = &buffer[..buffer.len().min(CONTENT_SAMPLE_BYTES)];
    let text = String::from_utf8_lossy(sample);

    if has_binary_bytes(&text) {
        return None;
    }

    let trimmed = text.trim();

    if looks_like_json(trimmed) {
        return Some((FileKind::Json, "application/json", ParserKind::Json));
    }

    if looks_like_csv(trimmed) {
        return Some((FileKind::Csv, "text/csv", ParserKind::Csv));
    }

    if looks_like_markdown(trimmed) {
        return Some((FileKind::Markdown, "text/markdown", ParserKind::Text));
    }

    Some((FileKind::Text, "text/plain", ParserKind::Text))
}

fn has_binary_bytes(text: &str) -> bool {
    text.bytes().any(|b| {
        matches!(b, 0x00..=0x08 | 0x0B | 0x0C | 0x0E..=0x1F)
    })
}

fn looks_like_json(trimmed: &str) -> bool {
    let plausible = (trimmed.starts_with('{') && trimmed.contains('"'))
        || (trimmed.starts_with('[') && trimmed.contains('{'));
    if !plausible {
        return false;
    }
    // A parseable prefix is good enough; the sample may cut mid-document.
    let probe_len = trimmed
        .char_indices()
        .nth(JSON_PROBE_CHARS)
        .map_or(trimmed.len(), |(i, _)| i);
    let probe = &trimmed[..probe_len];
    if serde_json::from_str::<serde_json::Value>(probe).is_ok() {
        return true;
    }
    if probe_len < trimmed.len() {
        let patched = format!("{probe}}}");
        return serde_json::from_str::<serde_json::Value>(&patched).is_ok();
    }
    false
}

/// CSV: a handful of leading lines with the same nonzero comma count.
fn looks_like_csv(trimmed: &str) -> bool {
    let lines: Vec<&str> = trimmed.lines().take(CSV_SAMPLE_LINES).collect();
    if lines.len() < 2 {
        return false;
    }
    let counts: Vec<usize> = lines
        .iter()
        .map(|l| l.matches(',').count())
        .collect();
    counts[0] >= 1 && counts.iter().all(|&c| c == counts[0])
}

fn looks_like_markdown(trimmed: &str) -> bool {
    let heading = trimmed.lines().any(|line| {
        let hashes = line.bytes().take_while(|&b| b == b'#').count();
        (1..=6).contains(&hashes) && line.as_bytes().get(hashes) == Some(&b' ')
    });
    if heading {
        return true;
    }
    // Inline link pattern [text](target)
    trimmed.contains("](") && trimmed.contains('[')
}

/// Extension-to-type fallback table.
fn detect_by_extension(extension: &str) -> Option<(FileKind, &'static str, ParserKind)> {
    let mapped = match extension {
        "pdf" => (FileKind::Pdf, "application/pdf", ParserKind::Pdf),
        "docx" => (
            FileKind::Docx,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            ParserKind::Docx,
        ),
        "doc" => (FileKind::Doc, "application/msword", ParserKind::Doc),
        "xlsx" => (
            FileKind::Xlsx,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ParserKind::Xlsx,
        ),
        "xls" => (FileKind::Xls, "application/vnd.ms-excel", ParserKind::Xlsx),
        "pptx" => (
            FileKind::Pptx,
            "application/vnd.openxmlformats-officedocument.presentationml.presentation",
            ParserKind::Pptx,
        ),
        "ppt" => (
            FileKind::Ppt,
            "application/vnd.ms-powerpoint",
            ParserKind::Pptx,
        ),
        "txt" => (FileKind::Text, "text/plain", ParserKind::Text),
        "md" => (FileKind::Markdown, "text/markdown", ParserKind::Text),
        "json" => (FileKind::Json, "application/json", ParserKind::Json),
        "csv" => (FileKind::Csv, "text/csv", ParserKind::Csv),
        "rtf" => (FileKind::Rtf, "application/rtf", ParserKind::Rtf),
        "jpg" | "jpeg" => (FileKind::Jpeg, "image/jpeg", ParserKind::Image),
        "png" => (FileKind::Png, "image/png", ParserKind::Image),
        "gif" => (FileKind::Gif, "image/gif", ParserKind::Image),
        "webp" => (FileKind::Webp, "image/webp", ParserKind::Image),
        "svg" => (FileKind::Svg, "image/svg+xml", ParserKind::Image),
        _ => return None,
    };
    Some(mapped)
}
