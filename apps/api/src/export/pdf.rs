//! PDF rendering with the builtin Times fonts on A4 pages.
//!
//! Lines are wrapped with the static Times width table, so no font files are
//! embedded. A new page starts whenever the next line would cross the bottom margin.

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use crate::errors::AppError;
use crate::export::document::{build_blocks, Block};
use crate::export::metrics::{metrics_for, wrap_lines, FontStyle};
use crate::export::ExportOptions;
use crate::profiles::models::TailoredResume;

const PAGE_WIDTH_PT: f32 = 595.28;
const PAGE_HEIGHT_PT: f32 = 841.89;
const MARGIN_PT: f32 = 50.0;
const TEXT_WIDTH_PT: f32 = PAGE_WIDTH_PT - 2.0 * MARGIN_PT;
const LINE_SPACING: f32 = 1.25;
const BULLET_INDENT_PT: f32 = 10.0;
const BULLET_TEXT_INDENT_PT: f32 = 22.0;
const LAYER_NAME: &str = "Layer 1";

const NAME_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.5;
const META_SIZE: f32 = 9.5;

pub fn to_pdf(resume: &TailoredResume, opts: &ExportOptions) -> Result<Vec<u8>, AppError> {
    let blocks = build_blocks(resume, opts)?;
    let title = resume.personal_info.name.trim();

    let (doc, page, layer) = PdfDocument::new(
        title,
        pt_to_mm(PAGE_WIDTH_PT),
        pt_to_mm(PAGE_HEIGHT_PT),
        LAYER_NAME,
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::TimesRoman)
        .map_err(export_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::TimesBold)
        .map_err(export_error)?;
    let layer = doc.get_page(page).get_layer(layer);

    let mut writer = PdfWriter {
        doc,
        layer,
        regular,
        bold,
        cursor_pt: MARGIN_PT,
    };

    for block in &blocks {
        writer.render(block);
    }

    writer.doc.save_to_bytes().map_err(export_error)
}

struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Distance of the next baseline slot from the top edge.
    cursor_pt: f32,
}

impl PdfWriter {
    fn render(&mut self, block: &Block) {
        match block {
            Block::Name(name) => {
                self.centered(name, FontStyle::Bold, NAME_SIZE);
                self.space(4.0);
            }
            Block::Contact(line) | Block::Link(line) => {
                self.centered(line, FontStyle::Regular, META_SIZE)
            }
            Block::Heading(heading) => {
                self.space(8.0);
                self.wrapped(heading, FontStyle::Bold, HEADING_SIZE, 0.0);
                self.space(2.0);
            }
            Block::EntryTitle(line) => self.wrapped(line, FontStyle::Bold, BODY_SIZE, 0.0),
            Block::EntryMeta(line) => self.wrapped(line, FontStyle::Regular, META_SIZE, 0.0),
            Block::Paragraph(text) => self.wrapped(text, FontStyle::Regular, BODY_SIZE, 0.0),
            Block::Bullet(text) => {
                self.ensure_room(BODY_SIZE * LINE_SPACING);
                self.put("-", FontStyle::Regular, BODY_SIZE, BULLET_INDENT_PT);
                self.wrapped(text, FontStyle::Regular, BODY_SIZE, BULLET_TEXT_INDENT_PT);
            }
            Block::Labeled { label, value } => self.wrapped(
                &format!("{label}: {value}"),
                FontStyle::Regular,
                BODY_SIZE,
                0.0,
            ),
            Block::Gap => self.space(6.0),
        }
    }

    fn wrapped(&mut self, text: &str, style: FontStyle, size: f32, indent: f32) {
        for line in wrap_lines(text, style, size, TEXT_WIDTH_PT - indent) {
            self.ensure_room(size * LINE_SPACING);
            self.put(&line, style, size, indent);
            self.cursor_pt += size * LINE_SPACING;
        }
    }

    fn centered(&mut self, text: &str, style: FontStyle, size: f32) {
        for line in wrap_lines(text, style, size, TEXT_WIDTH_PT) {
            let width = metrics_for(style).measure_pt(&line, size);
            let indent = ((TEXT_WIDTH_PT - width) / 2.0).max(0.0);
            self.ensure_room(size * LINE_SPACING);
            self.put(&line, style, size, indent);
            self.cursor_pt += size * LINE_SPACING;
        }
    }

    /// Draws one line at the current cursor without advancing it.
    fn put(&self, text: &str, style: FontStyle, size: f32, indent: f32) {
        let font = match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
        };
        let baseline_from_top = self.cursor_pt + size;
        self.layer.use_text(
            text,
            size,
            pt_to_mm(MARGIN_PT + indent),
            pt_to_mm(PAGE_HEIGHT_PT - baseline_from_top),
            font,
        );
    }

    fn space(&mut self, pt: f32) {
        self.cursor_pt += pt;
    }

    fn ensure_room(&mut self, height: f32) {
        if self.cursor_pt + height > PAGE_HEIGHT_PT - MARGIN_PT {
            let (page, layer) = self.doc.add_page(
                pt_to_mm(PAGE_WIDTH_PT),
                pt_to_mm(PAGE_HEIGHT_PT),
                LAYER_NAME,
            );
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.cursor_pt = MARGIN_PT;
        }
    }
}

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn export_error(e: impl std::fmt::Display) -> AppError {
    AppError::Export(format!("PDF rendering failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::models::{ExperienceEntry, PersonalInfo};

    fn resume(bullets: usize) -> TailoredResume {
        TailoredResume {
            personal_info: PersonalInfo {
                name: "Jane Doe".to_string(),
                email: "j@x.com".to_string(),
                ..Default::default()
            },
            summary: "Backend engineer.".to_string(),
            experience: vec![ExperienceEntry {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                description: (0..bullets)
                    .map(|i| format!("Delivered measurable improvement number {i} to the platform team's deployment pipeline and tooling"))
                    .collect(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_pdf_has_pdf_header() {
        let bytes = to_pdf(&resume(3), &ExportOptions::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_resume_spills_onto_more_pages() {
        let short = to_pdf(&resume(2), &ExportOptions::default()).unwrap();
        let long = to_pdf(&resume(200), &ExportOptions::default()).unwrap();
        assert!(long.len() > short.len());
        assert!(long.starts_with(b"%PDF"));
    }

    #[test]
    fn test_pdf_rejects_empty_name() {
        let mut r = resume(1);
        r.personal_info.name = String::new();
        assert!(matches!(
            to_pdf(&r, &ExportOptions::default()),
            Err(AppError::EmptyResume)
        ));
    }
}
