//! Document style management for DOCX reports

use docx_rs::*;

/// Document style management
#[derive(Clone, Debug)]
pub struct DocxStyles {
    font: String,
    /// Body text size in half-points.
    size: usize,
}

impl DocxStyles {
    /// Create a style manager for a body font and size in points
    pub fn new(font: &str, size_pt: f32) -> Self {
        Self {
            font: font.to_owned(),
            size: (size_pt * 2.0).round().max(1.0) as usize,
        }
    }

    fn run_fonts(&self) -> RunFonts {
        RunFonts::new()
            .ascii(&self.font)
            .hi_ansi(&self.font)
            .east_asia(&self.font)
            .cs(&self.font)
    }

    fn create_heading_style(name: &str, display_name: &str, size: usize) -> Style {
        Style::new(name, StyleType::Paragraph)
            .name(display_name)
            .size(size)
            .bold()
    }

    /// Set the document defaults and register every style the writer uses
    pub fn initialize_styles(&self, docx: Docx) -> Docx {
        let heading1 = Self::create_heading_style("Heading1", "Heading 1", 32);
        let heading2 = Self::create_heading_style("Heading2", "Heading 2", 28);
        let heading3 = Self::create_heading_style("Heading3", "Heading 3", 26);

        let caption = Style::new("Caption", StyleType::Paragraph)
            .name("Caption")
            .italic()
            .size(self.size.saturating_sub(4).max(16))
            .align(AlignmentType::Center);

        let table = Style::new("TableGrid", StyleType::Table).name("Table Grid");

        docx.default_fonts(self.run_fonts())
            .default_size(self.size)
            .add_style(heading1)
            .add_style(heading2)
            .add_style(heading3)
            .add_style(caption)
            .add_style(table)
    }
}
