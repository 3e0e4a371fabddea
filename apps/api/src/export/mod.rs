// Export: renders a TailoredResume as plain text, PDF or DOCX.
// All three formats share the block layout in `document`, so section order and
// the include/exclude options behave identically everywhere.

pub mod document;
pub mod docx;
pub mod handlers;
pub mod metrics;
pub mod pdf;
pub mod text;

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::Deserialize;

use crate::errors::AppError;
use crate::profiles::models::TailoredResume;

pub use docx::to_docx;
pub use pdf::to_pdf;
pub use text::to_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub include_summary: bool,
    pub include_projects: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_summary: true,
            include_projects: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Docx,
    Text,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Text => "text/plain; charset=utf-8",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Text => "txt",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" => Ok(ExportFormat::Docx),
            "txt" | "text" => Ok(ExportFormat::Text),
            other => Err(AppError::Validation(format!(
                "Unsupported export format '{other}'; expected pdf, docx or txt"
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Renders `resume` in `format`.
pub fn export(
    resume: &TailoredResume,
    format: ExportFormat,
    opts: &ExportOptions,
) -> Result<Bytes, AppError> {
    let bytes = match format {
        ExportFormat::Pdf => to_pdf(resume, opts)?,
        ExportFormat::Docx => to_docx(resume, opts)?,
        ExportFormat::Text => to_text(resume, opts)?.into_bytes(),
    };
    Ok(Bytes::from(bytes))
}

/// Download name such as `Jane_Doe_Resume.pdf`.
pub fn file_name(resume: &TailoredResume, format: ExportFormat) -> String {
    let stem: String = resume
        .personal_info
        .name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-')
                .collect::<String>()
        })
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    let stem = if stem.is_empty() { "resume".to_string() } else { format!("{stem}_Resume") };
    format!("{stem}.{}", format.extension())
}
