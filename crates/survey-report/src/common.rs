//! Common types for the report system.

use std::str::FromStr;

/// Valid formats for the generated report.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Format {
    /// A paginated PDF document.
    #[default]
    Pdf,
    /// An OOXML word-processing document.
    Docx,
}

impl Format {
    /// The file extension used for the suggested download name.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Pdf => "pdf",
            Format::Docx => "docx",
        }
    }

    /// The MIME type offered to the browser alongside the bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            Format::Pdf => "application/pdf",
            Format::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl FromStr for Format {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Format::Pdf),
            "docx" | "word" => Ok(Format::Docx),
            _ => Err(format!("unknown report format: {s}").into()),
        }
    }
}

/// Horizontal alignment of a block.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Flush with the left margin.
    #[default]
    Left,
    /// Centered between the margins.
    Center,
}
