//! Outline writer implementation - produces a plain text outline

use std::fmt::Write;

use crate::Result;
use crate::common::Align;
use crate::content::{DocumentSink, HeadingLevel, TableKind};
use crate::photo::RenderableImage;

/// Writes one line per block, in emission order.
///
/// Figures are listed with their pixel size instead of their content, so two
/// renders of the same record compare equal exactly when every backend would
/// draw the same text in the same order.
#[derive(Debug, Default)]
pub struct OutlineSink {
    output: String,
}

impl OutlineSink {
    /// Creates an empty outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// The outline written so far.
    pub fn as_str(&self) -> &str {
        &self.output
    }

    /// Returns the outline.
    pub fn finish(self) -> String {
        self.output
    }
}

impl DocumentSink for OutlineSink {
    fn heading(&mut self, level: HeadingLevel, text: &str, align: Align) -> Result<()> {
        let marker = match level {
            HeadingLevel::Title => "#",
            HeadingLevel::Section => "##",
            HeadingLevel::Subsection => "###",
        };
        let centered = if align == Align::Center { " (centered)" } else { "" };
        writeln!(self.output, "{marker} {text}{centered}")?;
        Ok(())
    }

    fn paragraph(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    fn bullet(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "• {text}")?;
        Ok(())
    }

    fn key_value_table(&mut self, _kind: TableKind, rows: &[(&str, &str)]) -> Result<()> {
        for (label, value) in rows {
            // Keep one row per line.
            let value = value.replace('\n', " / ");
            writeln!(self.output, "| {label} | {value} |")?;
        }
        Ok(())
    }

    fn image(&mut self, image: &RenderableImage, caption: &str) -> Result<()> {
        writeln!(self.output, "{caption} [{}x{}]", image.width(), image.height())?;
        Ok(())
    }
}
