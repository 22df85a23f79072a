use crate::signatures::OFFICE_ZIP_MARKERS;
use crate::types::{Confidence, DetectedFileType, DetectionMethod, FileKind, ParserKind};
use std::io::Cursor;

/// Open a ZIP container and probe the ordered Office marker paths to
/// disambiguate docx/xlsx/pptx from a plain archive.
///
/// An unreadable container is still reported as a ZIP — deep inspection
/// degrades its confidence rather than erroring.
#[must_use]
pub fn deep_inspect_zip(buffer: &[u8], extension: Option<String>) -> DetectedFileType {
    let archive = match zip::ZipArchive::new(Cursor::new(buffer)) {
        Ok(archive) => archive,
        Err(err) => {
            log::warn!("ZIP deep inspection failed: {err}");
            return DetectedFileType {
                kind: FileKind::Zip,
                mime: "application/zip",
                parser: Some(ParserKind::Zip),
                confidence: Confidence::Medium,
                detected_by: DetectionMethod::MagicBytes,
                requires_deep_inspection: false,
                extension,
            };
        }
    };

    for &(marker, kind, mime, parser) in OFFICE_ZIP_MARKERS {
        if archive.index_for_name(marker).is_some() {
            return DetectedFileType {
                kind,
                mime,
                parser: Some(parser),
                confidence: Confidence::High,
                detected_by: DetectionMethod::ZipDeepInspection,
                requires_deep_inspection: false,
                extension,
            };
        }
    }

    // A ZIP, just not a known Office package.
    DetectedFileType {
        kind: FileKind::Zip,
        mime: "application/zip",
        parser: Some(ParserKind::Zip),
        confidence: Confidence::High,
        detected_by: DetectionMethod::ZipDeepInspection,
        requires_deep_inspection: false,
        extension,
    }
}

/// Legacy Office compound files share one OLE header; the extension is
/// the only cheap disambiguator between doc/xls/ppt.
fn refine_ole(mut detected: DetectedFileType) -> DetectedFileType {
    let (kind, mime, parser) = match detected.extension.as_deref() {
        Some("doc") => (FileKind::Doc, "application/msword", ParserKind::Doc),
        Some("xls") => (FileKind::Xls, "application/vnd.ms-excel", ParserKind::Xlsx),
        Some("ppt") => (
            FileKind::Ppt,
            "application/vnd.ms-powerpoint",
            ParserKind::Pptx,
        ),
        _ => {
            detected.requires_deep_inspection = false;
            return detected;
        }
    };
    detected.kind = kind;
    detected.mime = mime;
    detected.parser = Some(parser);
    detected.requires_deep_inspection = false;
    detected
}

/// Full detection: magic bytes / content / extension, then container deep
/// inspection when the first pass flags it.
#[must_use]
pub fn detect_file_type_full(buffer: &[u8], filename: Option<&str>) -> DetectedFileType {
    let basic = crate::detector::detect_file_type(buffer, filename);
    if basic.requires_deep_inspection {
        match basic.kind {
            FileKind::Zip => {
                let extension = basic.extension.clone();
                return deep_inspect_zip(buffer, extension);
            }
            FileKind::Ole => return refine_ole(basic),
            _ => {}
        }
    }
    basic
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn zip_with_entry(path: &str) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file(path, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"<xml/>").unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn identifies_docx_container() {
        let buf = zip_with_entry("word/document.xml");
        let detected = detect_file_type_full(&buf, Some("report.docx"));
        assert_eq!(detected.kind, FileKind::Docx);
        assert_eq!(detected.detected_by, DetectionMethod::ZipDeepInspection);
        assert_eq!(detected.confidence, Confidence::High);
    }

    #[test]
    fn identifies_xlsx_container() {
        let buf = zip_with_entry("xl/workbook.xml");
        let detected = detect_file_type_full(&buf, None);
        assert_eq!(detected.kind, FileKind::Xlsx);
    }

    #[test]
    fn identifies_pptx_container() {
        let buf = zip_with_entry("ppt/presentation.xml");
        let detected = detect_file_type_full(&buf, None);
        assert_eq!(detected.kind, FileKind::Pptx);
    }

    #[test]
    fn generic_ooxml_marker_wins_over_plain_zip() {
        let buf = zip_with_entry("[Content_Types].xml");
        let detected = detect_file_type_full(&buf, None);
        assert_eq!(detected.kind, FileKind::Ooxml);
    }

    #[test]
    fn plain_zip_stays_zip() {
        let buf = zip_with_entry("notes/readme.txt");
        let detected = detect_file_type_full(&buf, None);
        assert_eq!(detected.kind, FileKind::Zip);
        assert!(!detected.requires_deep_inspection);
    }

    #[test]
    fn ole_refines_by_extension() {
        let header = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0x00, 0x00];
        let detected = detect_file_type_full(&header, Some("legacy.doc"));
        assert_eq!(detected.kind, FileKind::Doc);
        assert!(!detected.requires_deep_inspection);

        let detected = detect_file_type_full(&header, Some("sheet.xls"));
        assert_eq!(detected.kind, FileKind::Xls);

        let detected = detect_file_type_full(&header, None);
        assert_eq!(detected.kind, FileKind::Ole);
    }

    #[test]
    fn truncated_zip_degrades_confidence() {
        // Valid ZIP local header, rest of the archive missing.
        let detected = deep_inspect_zip(&[0x50, 0x4B, 0x03, 0x04, 0x00], None);
        assert_eq!(detected.kind, FileKind::Zip);
        assert_eq!(detected.confidence, Confidence::Medium);
    }
}
