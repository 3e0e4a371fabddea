//! Plain-text rendering: ruled section headings and indented bullets.

use crate::errors::AppError;
use crate::export::document::{build_blocks, Block};
use crate::export::ExportOptions;
use crate::profiles::models::TailoredResume;

const RULE_WIDTH: usize = 80;

pub fn to_text(resume: &TailoredResume, opts: &ExportOptions) -> Result<String, AppError> {
    let blocks = build_blocks(resume, opts)?;
    let mut lines: Vec<String> = Vec::new();

    for block in blocks {
        match block {
            Block::Name(name) => {
                lines.push(name);
                lines.push("=".repeat(RULE_WIDTH));
            }
            Block::Contact(line) | Block::Link(line) => lines.push(line),
            Block::Heading(heading) => {
                if lines.last().is_some_and(|l| !l.is_empty()) {
                    lines.push(String::new());
                }
                lines.push(heading.to_string());
                lines.push("-".repeat(RULE_WIDTH));
            }
            Block::EntryTitle(line) | Block::EntryMeta(line) | Block::Paragraph(line) => {
                lines.push(line)
            }
            Block::Bullet(text) => lines.push(format!("  • {text}")),
            Block::Labeled { label, value } => lines.push(format!("{label}: {value}")),
            Block::Gap => lines.push(String::new()),
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let mut text = lines.join("\n");
    text.push('\n');
    Ok(text)
}
