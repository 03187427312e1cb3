//! Minimal PDF 1.4 writer for plain text.
//!
//! Lays text out in Courier on A4 pages, one source line per PDF line.
//! Lines longer than [`MAX_LINE_CHARS`] wrap; characters outside printable
//! ASCII become `?`.

use chrono::{DateTime, Utc};

const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;
const MARGIN: u32 = 28;
const FONT_SIZE: u32 = 10;
const LEADING: u32 = 12;

/// Lines that fit between the top and bottom margins.
pub const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

/// Characters per line before wrapping.
pub const MAX_LINE_CHARS: usize = 90;

// Object ids: 1 catalog, 2 page tree, 3 font, 4 info, then page/content pairs.
const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FONT_ID: usize = 3;
const INFO_ID: usize = 4;
const FIRST_PAGE_ID: usize = 5;

/// Render `text` as a PDF document.
pub fn render_text(text: &str, created: DateTime<Utc>) -> Vec<u8> {
    let lines = wrap_lines(text);
    let pages: Vec<&[String]> = if lines.is_empty() {
        vec![&lines[..]]
    } else {
        lines.chunks(LINES_PER_PAGE).collect()
    };

    let page_ids: Vec<usize> = (0..pages.len()).map(|i| FIRST_PAGE_ID + 2 * i).collect();
    let kids = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");

    let mut writer = PdfWriter::new();
    writer.object(CATALOG_ID, &format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_ID));
    writer.object(
        PAGES_ID,
        &format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, pages.len()),
    );
    writer.object(
        FONT_ID,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Courier /Encoding /WinAnsiEncoding >>",
    );
    writer.object(
        INFO_ID,
        &format!(
            "<< /Title (mindmap) /Producer (mindmap-kernel) /CreationDate (D:{}Z) >>",
            created.format("%Y%m%d%H%M%S")
        ),
    );

    for (page_id, page_lines) in page_ids.iter().zip(&pages) {
        let content_id = page_id + 1;
        writer.object(
            *page_id,
            &format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 {} 0 R >> >> /Contents {} 0 R >>",
                PAGES_ID, PAGE_WIDTH, PAGE_HEIGHT, FONT_ID, content_id
            ),
        );
        let stream = content_stream(page_lines);
        writer.object(
            content_id,
            &format!("<< /Length {} >>\nstream\n{}\nendstream", stream.len(), stream),
        );
    }

    writer.finish()
}

fn wrap_lines(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.lines() {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            out.push(String::new());
            continue;
        }
        for chunk in chars.chunks(MAX_LINE_CHARS) {
            out.push(chunk.iter().collect());
        }
    }
    out
}

fn content_stream(lines: &[String]) -> String {
    let top = PAGE_HEIGHT - MARGIN - FONT_SIZE;
    let mut stream = format!(
        "BT\n/F1 {} Tf\n{} TL\n{} {} Td\n",
        FONT_SIZE, LEADING, MARGIN, top
    );
    for line in lines {
        stream.push('(');
        stream.push_str(&escape(line));
        stream.push_str(") Tj T*\n");
    }
    stream.push_str("ET");
    stream
}

fn escape(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            ' '..='~' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        Self {
            buf: b"%PDF-1.4\n".to_vec(),
            offsets: Vec::new(),
        }
    }

    /// Objects must be written in id order starting at 1.
    fn object(&mut self, id: usize, body: &str) {
        debug_assert_eq!(id, self.offsets.len() + 1);
        self.offsets.push(self.buf.len());
        self.buf
            .extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", id, body).as_bytes());
    }

    fn finish(mut self) -> Vec<u8> {
        let xref_offset = self.buf.len();
        let size = self.offsets.len() + 1;

        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", size);
        for offset in &self.offsets {
            xref.push_str(&format!("{:010} 00000 n \n", offset));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            size, CATALOG_ID, INFO_ID, xref_offset
        ));

        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}
