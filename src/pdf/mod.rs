//! # PDF Serializer
//!
//! The reference rendering backend: takes a composed [`Sheet`] and writes
//! a valid PDF file. This is a from-scratch PDF 1.7 writer; writing the
//! raw bytes ourselves keeps the crate self-contained, and the subset a
//! label sheet needs (outlined rectangles, single-font text rows, filled
//! squares for QR modules) is small.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (catalog, pages, font, content streams)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! Label text is short fixed-height rows, so a single base-14 Helvetica
//! reference with WinAnsiEncoding is enough; no font embedding. QR glyphs
//! are computed with the `qrcode` crate and painted as one filled square
//! per dark module; a payload the encoder rejects is skipped with a
//! warning, never aborting the run.

use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use miniz_oxide::deflate::compress_to_vec_zlib;
use qrcode::{Color, QrCode};
use tracing::warn;

use crate::error::EtiquetaError;
use crate::model::{DrawCommand, Page, Sheet};

pub struct PdfWriter;

struct PdfObject {
    data: Vec<u8>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write a composed sheet to a PDF byte vector.
    pub fn write(&self, sheet: &Sheet) -> Result<Vec<u8>, EtiquetaError> {
        if sheet.pages.is_empty() {
            return Err(EtiquetaError::Render("sheet has no pages".to_string()));
        }

        // Object IDs:
        // 0 = placeholder (PDF objects are 1-indexed)
        // 1 = Catalog
        // 2 = Pages (page tree root)
        // 3 = the Helvetica font
        // 4+ = per page: content stream, then page dict
        let mut objects: Vec<PdfObject> = vec![
            PdfObject { data: vec![] },
            PdfObject { data: vec![] },
            PdfObject { data: vec![] },
            PdfObject {
                data: b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica \
                        /Encoding /WinAnsiEncoding >>"
                    .to_vec(),
            },
        ];

        let mut page_obj_ids: Vec<usize> = Vec::new();
        for page in &sheet.pages {
            let content = self.build_content_stream(page);
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);

            let content_obj_id = objects.len();
            let mut content_data: Vec<u8> = Vec::new();
            let _ = write!(
                content_data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            content_data.extend_from_slice(&compressed);
            content_data.extend_from_slice(b"\nendstream");
            objects.push(PdfObject { data: content_data });

            let page_obj_id = objects.len();
            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << /Font << /F1 3 0 R >> >> >>",
                sheet.page_width, sheet.page_height, content_obj_id
            );
            objects.push(PdfObject {
                data: page_dict.into_bytes(),
            });
            page_obj_ids.push(page_obj_id);
        }

        objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_obj_id = objects.len();
        objects.push(PdfObject {
            data: b"<< /Producer (etiqueta 0.3) /Creator (etiqueta) >>".to_vec(),
        });

        Ok(self.serialize(&objects, info_obj_id))
    }

    /// Build the content stream for one page: every slot's commands in
    /// placement order.
    fn build_content_stream(&self, page: &Page) -> String {
        let mut stream = String::new();
        for slot in &page.slots {
            for command in &slot.commands {
                self.write_command(&mut stream, command);
            }
        }
        stream
    }

    /// Write a single draw command as PDF operators.
    fn write_command(&self, stream: &mut String, command: &DrawCommand) {
        match command {
            DrawCommand::Rect {
                x,
                y,
                width,
                height,
            } => {
                let _ = write!(stream, "{:.2} {:.2} {:.2} {:.2} re\nS\n", x, y, width, height);
            }

            DrawCommand::Text {
                x,
                y,
                content,
                font_size,
            } => {
                let _ = write!(
                    stream,
                    "BT\n/F1 {:.2} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
                    font_size,
                    x,
                    y,
                    Self::encode_pdf_string(content)
                );
            }

            DrawCommand::Qr { x, y, size, payload } => {
                let code = match QrCode::new(payload.as_bytes()) {
                    Ok(code) => code,
                    Err(e) => {
                        warn!(error = %e, "QR payload rejected by encoder; glyph skipped");
                        return;
                    }
                };
                let width = code.width();
                let module = size / width as f64;
                let colors = code.to_colors();

                let _ = write!(stream, "q\n0 0 0 rg\n");
                for (i, color) in colors.iter().enumerate() {
                    if *color != Color::Dark {
                        continue;
                    }
                    let col = i % width;
                    let row = i / width;
                    // Module row 0 sits at the top of the glyph.
                    let mx = x + col as f64 * module;
                    let my = y + size - (row + 1) as f64 * module;
                    let _ = write!(stream, "{:.2} {:.2} {:.2} {:.2} re\nf\n", mx, my, module, module);
                }
                let _ = write!(stream, "Q\n");
            }
        }
    }

    /// Encode text as a WinAnsi PDF string literal, escaping delimiters.
    ///
    /// Characters outside WinAnsi's Latin range degrade to '?': label rows
    /// are product codes and short descriptions, not shaped paragraphs.
    fn encode_pdf_string(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for ch in s.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '(' => out.push_str("\\("),
                ')' => out.push_str("\\)"),
                c if (c as u32) >= 0x20 && (c as u32) <= 0x7E => out.push(c),
                c if (c as u32) >= 0xA0 && (c as u32) <= 0xFF => {
                    // Latin-1 range maps directly onto WinAnsi; emit as an
                    // octal escape so the stream stays 7-bit clean.
                    let _ = write!(out, "\\{:03o}", c as u32);
                }
                _ => out.push('?'),
            }
        }
        out
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, objects: &[PdfObject], info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; objects.len()];

        // Header
        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let header = format!("{} 0 obj\n", i);
            output.extend_from_slice(header.as_bytes());
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len(),
            info_obj_id,
            xref_offset
        );

        output
    }
}
