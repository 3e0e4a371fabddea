//! DOCX rendering: one paragraph per block, bold headings and entry titles.

use std::io::Cursor;

use docx_rs::{AlignmentType, Docx, Paragraph, Run, RunFonts};

use crate::errors::AppError;
use crate::export::document::{build_blocks, Block};
use crate::export::ExportOptions;
use crate::profiles::models::TailoredResume;

const FONT: &str = "Times New Roman";

// Sizes are in half-points.
const NAME_SIZE: usize = 36;
const HEADING_SIZE: usize = 24;
const BODY_SIZE: usize = 21;
const META_SIZE: usize = 19;

pub fn to_docx(resume: &TailoredResume, opts: &ExportOptions) -> Result<Vec<u8>, AppError> {
    let blocks = build_blocks(resume, opts)?;

    let docx = blocks
        .iter()
        .fold(Docx::new(), |docx, block| docx.add_paragraph(paragraph(block)));

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| AppError::Export(format!("DOCX packaging failed: {e}")))?;
    Ok(buf.into_inner())
}

fn paragraph(block: &Block) -> Paragraph {
    match block {
        Block::Name(name) => Paragraph::new()
            .add_run(run(name, NAME_SIZE).bold())
            .align(AlignmentType::Center),
        Block::Contact(line) | Block::Link(line) => Paragraph::new()
            .add_run(run(line, META_SIZE))
            .align(AlignmentType::Center),
        Block::Heading(heading) => Paragraph::new().add_run(run(heading, HEADING_SIZE).bold()),
        Block::EntryTitle(line) => Paragraph::new().add_run(run(line, BODY_SIZE).bold()),
        Block::EntryMeta(line) => Paragraph::new().add_run(run(line, META_SIZE).italic()),
        Block::Paragraph(text) => Paragraph::new().add_run(run(text, BODY_SIZE)),
        Block::Bullet(text) => Paragraph::new().add_run(run(&format!("    • {text}"), BODY_SIZE)),
        Block::Labeled { label, value } => Paragraph::new()
            .add_run(run(&format!("{label}: "), BODY_SIZE).bold())
            .add_run(run(value, BODY_SIZE)),
        Block::Gap => Paragraph::new(),
    }
}

fn run(text: &str, size: usize) -> Run {
    Run::new()
        .add_text(text)
        .size(size)
        .fonts(RunFonts::new().ascii(FONT).hi_ansi(FONT))
}
