//! DOCX document writer implementation

use std::io::Cursor;

use docx_rs::*;
use log::debug;

use crate::common::Align;
use crate::config::ReportFeat;
use crate::content::{DocumentSink, HeadingLevel, TableKind};
use crate::photo::RenderableImage;
use crate::{Error, Result};

use super::image_processor::DocxImageProcessor;
use super::numbering::{bullet_paragraph, initialize_numbering};
use super::styles::DocxStyles;

/// Twentieths of a point per point.
const TWIPS_PER_PT: usize = 20;

/// Writes a report as a flowing Word document.
///
/// Word repaginates on its own, so page break hints are ignored.
pub struct DocxSink {
    docx: Docx,
    image_processor: DocxImageProcessor,
    figures: usize,
}

impl DocxSink {
    /// Creates an empty document with the styles and numbering of `feat`.
    pub fn new(feat: &ReportFeat) -> Self {
        let styles = DocxStyles::new(&feat.docx_font, feat.docx_font_size_pt);
        let docx = styles.initialize_styles(Docx::new());
        let docx = initialize_numbering(docx);

        Self {
            docx,
            image_processor: DocxImageProcessor::new(feat.docx_image_width_in),
            figures: 0,
        }
    }

    fn push_paragraph(&mut self, para: Paragraph) {
        let docx = std::mem::replace(&mut self.docx, Docx::new());
        self.docx = docx.add_paragraph(para);
    }

    fn push_table(&mut self, table: Table) {
        let docx = std::mem::replace(&mut self.docx, Docx::new());
        self.docx = docx.add_table(table);
    }

    /// A run for `text`, with newlines turned into line breaks.
    fn text_run(text: &str) -> Run {
        let mut run = Run::new();
        for (idx, line) in text.split('\n').enumerate() {
            if idx > 0 {
                run = run.add_break(BreakType::TextWrapping);
            }
            run = run.add_text(line);
        }
        run
    }

    fn map_alignment(align: Align) -> AlignmentType {
        match align {
            Align::Left => AlignmentType::Left,
            Align::Center => AlignmentType::Center,
        }
    }

    /// Packs the document into DOCX bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        debug!("docx report: {} figures", self.figures);

        let mut buffer = Vec::new();
        self.docx
            .build()
            .pack(&mut Cursor::new(&mut buffer))
            .map_err(|e| Error::serialization(format!("Failed to pack DOCX: {e}")))?;

        Ok(buffer)
    }
}

impl DocumentSink for DocxSink {
    fn heading(&mut self, level: HeadingLevel, text: &str, align: Align) -> Result<()> {
        let style_name = match level {
            HeadingLevel::Title => "Heading1",
            HeadingLevel::Section => "Heading2",
            HeadingLevel::Subsection => "Heading3",
        };

        let para = Paragraph::new()
            .style(style_name)
            .align(Self::map_alignment(align))
            .add_run(Run::new().add_text(text));
        self.push_paragraph(para);
        Ok(())
    }

    fn paragraph(&mut self, text: &str) -> Result<()> {
        self.push_paragraph(Paragraph::new().add_run(Self::text_run(text)));
        Ok(())
    }

    fn bullet(&mut self, text: &str) -> Result<()> {
        self.push_paragraph(bullet_paragraph().add_run(Run::new().add_text(text)));
        Ok(())
    }

    fn key_value_table(&mut self, kind: TableKind, rows: &[(&str, &str)]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let (label_width, value_width) = match kind {
            TableKind::Header => (120 * TWIPS_PER_PT, 300 * TWIPS_PER_PT),
            TableKind::Detail => (150 * TWIPS_PER_PT, 270 * TWIPS_PER_PT),
        };

        let rows = rows
            .iter()
            .map(|(label, value)| {
                let label = TableCell::new()
                    .width(label_width, WidthType::Dxa)
                    .add_paragraph(
                        Paragraph::new()
                            .align(AlignmentType::Right)
                            .add_run(Run::new().add_text(*label).bold()),
                    );
                let value = TableCell::new()
                    .width(value_width, WidthType::Dxa)
                    .add_paragraph(Paragraph::new().add_run(Self::text_run(value)));
                TableRow::new(vec![label, value])
            })
            .collect();

        let table = Table::new(rows)
            .style("TableGrid")
            .align(TableAlignmentType::Center)
            .set_grid(vec![label_width, value_width]);
        self.push_table(table);
        // Word merges adjacent tables unless something separates them.
        self.push_paragraph(Paragraph::new());
        Ok(())
    }

    fn image(&mut self, image: &RenderableImage, caption: &str) -> Result<()> {
        let caption = Paragraph::new()
            .style("Caption")
            .add_run(Run::new().add_text(caption));
        self.push_paragraph(caption);

        let para = self.image_processor.image_paragraph(image)?;
        self.push_paragraph(para);
        self.figures += 1;
        Ok(())
    }
}
