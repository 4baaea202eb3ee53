//! Cover letter rendering
//!
//! Plain text is laid out on US Letter pages in a fixed monospace font and
//! written to a scoped temporary PDF. Layout is computed separately from PDF
//! encoding so that positions can be checked without parsing the output.
//!
//! The builtin Courier font uses WinAnsiEncoding, so each line is transcoded
//! to Windows-1252 before it is written. Characters outside that code page
//! print as `?`.

use crate::error::Result;
use encoding_rs::WINDOWS_1252;
use log::debug;
use printpdf::{BuiltinFont, DictItem, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt};
use std::io::Write;
use tempfile::NamedTempFile;

/// US Letter, in points
pub const PAGE_WIDTH_PT: f32 = 612.0;
pub const PAGE_HEIGHT_PT: f32 = 792.0;

const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;

pub const MARGIN_PT: f32 = 50.0;
pub const LINE_HEIGHT_PT: f32 = 20.0;
pub const FONT_SIZE_PT: f32 = 12.0;

const FONT: BuiltinFont = BuiltinFont::Courier;
const DOCUMENT_TITLE: &str = "Cover Letter";
const UNMAPPABLE: u8 = b'?';

/// A single line of text at its baseline position, origin bottom-left
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    pub lines: Vec<PlacedLine>,
}

/// Number of baselines that fit between the top and bottom margins
pub fn lines_per_page() -> usize {
    ((PAGE_HEIGHT_PT - 2.0 * MARGIN_PT) / LINE_HEIGHT_PT).floor() as usize + 1
}

#[derive(Debug, Clone, Default)]
pub struct DocumentRenderer;

impl DocumentRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Place every line of `text` on pages. Always returns at least one page.
    pub fn layout(&self, text: &str) -> Vec<PageLayout> {
        let per_page = lines_per_page();
        let lines: Vec<&str> = text.lines().collect();

        if lines.is_empty() {
            return vec![PageLayout::default()];
        }

        lines
            .chunks(per_page)
            .map(|chunk| PageLayout {
                lines: chunk
                    .iter()
                    .enumerate()
                    .map(|(i, line)| PlacedLine {
                        text: (*line).to_string(),
                        x: MARGIN_PT,
                        y: PAGE_HEIGHT_PT - MARGIN_PT - LINE_HEIGHT_PT * i as f32,
                    })
                    .collect(),
            })
            .collect()
    }

    /// Encode `text` as PDF bytes
    pub fn render_bytes(&self, text: &str) -> Vec<u8> {
        let pages: Vec<PdfPage> = self
            .layout(text)
            .iter()
            .map(|page| PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), page_ops(page)))
            .collect();

        // Raw `Tj` operators are dropped when saving in secure mode
        let options = PdfSaveOptions {
            secure: false,
            ..PdfSaveOptions::default()
        };

        let mut warnings = Vec::new();
        let bytes = PdfDocument::new(DOCUMENT_TITLE)
            .with_pages(pages)
            .save(&options, &mut warnings);

        if !warnings.is_empty() {
            debug!("PDF encoder reported {} warnings", warnings.len());
        }
        bytes
    }

    /// Render `text` into a temporary PDF that is deleted when the handle drops
    pub fn render(&self, text: &str) -> Result<NamedTempFile> {
        let bytes = self.render_bytes(text);

        let mut file = tempfile::Builder::new()
            .prefix("cover-letter-")
            .suffix(".pdf")
            .tempfile()?;
        file.write_all(&bytes)?;
        file.flush()?;

        debug!(
            "Rendered cover letter ({} bytes) to {}",
            bytes.len(),
            file.path().display()
        );
        Ok(file)
    }
}

/// Windows-1252 bytes for `text`, one `?` per character the code page lacks
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        let (bytes, _, unmappable) = WINDOWS_1252.encode(ch.encode_utf8(&mut buf));
        if unmappable {
            out.push(UNMAPPABLE);
        } else {
            out.extend_from_slice(&bytes);
        }
    }
    out
}

// One text object per line, so each cursor position is absolute
fn page_ops(page: &PageLayout) -> Vec<Op> {
    // An empty builtin write emits nothing but registers the font resource
    let mut ops = Vec::with_capacity(page.lines.len() * 5 + 1);
    ops.push(Op::WriteTextBuiltinFont { items: Vec::new(), font: FONT });

    for line in page.lines.iter().filter(|l| !l.text.is_empty()) {
        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextCursor {
            pos: Point { x: Pt(line.x), y: Pt(line.y) },
        });
        ops.push(Op::SetFontSizeBuiltinFont { size: Pt(FONT_SIZE_PT), font: FONT });
        ops.push(show_text(&line.text));
        ops.push(Op::EndTextSection);
    }
    ops
}

fn show_text(text: &str) -> Op {
    Op::Unknown {
        key: "Tj".to_string(),
        value: vec![DictItem::String {
            data: encode_win_ansi(text),
            literal: false,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_is_placed_at_top_left_margin() {
        let pages = DocumentRenderer::new().layout("Dear Sir");

        assert_eq!(pages.len(), 1);
        assert_eq!(
            pages[0].lines,
            vec![PlacedLine { text: "Dear Sir".into(), x: 50.0, y: 742.0 }]
        );
    }

    #[test]
    fn test_lines_advance_by_line_height() {
        let pages = DocumentRenderer::new().layout("one\ntwo\r\nthree\n");
        let ys: Vec<f32> = pages[0].lines.iter().map(|l| l.y).collect();
        let texts: Vec<&str> = pages[0].lines.iter().map(|l| l.text.as_str()).collect();

        assert_eq!(texts, vec!["one", "two", "three"]);
        assert_eq!(ys, vec![742.0, 722.0, 702.0]);
        assert!(pages[0].lines.iter().all(|l| l.x == MARGIN_PT));
    }

    #[test]
    fn test_blank_lines_keep_their_slot() {
        let pages = DocumentRenderer::new().layout("top\n\nbottom");
        assert_eq!(pages[0].lines[1].text, "");
        assert_eq!(pages[0].lines[2].y, 702.0);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let renderer = DocumentRenderer::new();
        let text = "Dear Sir,\n\nplease find attached\nthe signed contract.\n\nRegards";
        assert_eq!(renderer.layout(text), renderer.layout(text));
    }

    #[test]
    fn test_overflow_starts_a_new_page() {
        assert_eq!(lines_per_page(), 35);

        let text: String = (1..=36).map(|i| format!("line {}\n", i)).collect();
        let pages = DocumentRenderer::new().layout(&text);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].lines.len(), 35);
        assert_eq!(pages[1].lines.len(), 1);
        assert_eq!(pages[1].lines[0], PlacedLine { text: "line 36".into(), x: 50.0, y: 742.0 });
        assert!(pages[0].lines.iter().all(|l| l.y >= MARGIN_PT));
    }

    #[test]
    fn test_empty_text_yields_one_blank_page() {
        let pages = DocumentRenderer::new().layout("");
        assert_eq!(pages, vec![PageLayout::default()]);
    }

    #[test]
    fn test_latin_text_is_encoded_as_win_ansi() {
        assert_eq!(
            encode_win_ansi("Grüße €5"),
            vec![0x47, 0x72, 0xFC, 0xDF, 0x65, 0x20, 0x80, 0x35]
        );
        assert_eq!(encode_win_ansi("plain ascii"), b"plain ascii".to_vec());
    }

    #[test]
    fn test_characters_outside_code_page_become_question_marks() {
        assert_eq!(encode_win_ansi("日本 ok"), b"?? ok".to_vec());
    }

    #[test]
    fn test_rendered_stream_carries_win_ansi_bytes() {
        let bytes = DocumentRenderer::new().render_bytes("Grüße €\nplain ascii");
        let contains = |needle: &[u8]| bytes.windows(needle.len()).any(|w| w == needle);

        assert!(contains(b"<4772FCDF652080>"), "Line should be written as Windows-1252");
        assert!(contains(b"<706C61696E206173636969>"));
        assert!(!contains(b"C3BC"), "UTF-8 bytes must not reach the content stream");
        assert!(contains(b"Courier"), "Builtin font resource should be present");
    }

    #[test]
    fn test_non_latin_text_still_renders() {
        let bytes = DocumentRenderer::new().render_bytes("日本");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_writes_pdf_and_cleans_up_on_drop() {
        let file = DocumentRenderer::new().render("Dear Sir").unwrap();
        let path = file.path().to_path_buf();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"), "Output missing PDF header");
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pdf"));

        drop(file);
        assert!(!path.exists(), "Temp cover letter should be removed on drop");
    }
}
