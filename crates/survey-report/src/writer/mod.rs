//! Writer implementations for different output formats

pub mod docx;
pub mod outline;
pub mod pdf;

pub use self::docx::DocxSink;
pub use outline::OutlineSink;
pub use pdf::PdfSink;

use crate::Result;
use crate::common::Format;
use crate::config::ReportFeat;
use crate::content::DocumentSink;
use crate::font::FontResolver;

/// A backend that turns the emitted content into a file.
pub trait ReportSink: DocumentSink {
    /// Consumes the sink and returns the encoded document.
    fn finish(self: Box<Self>) -> Result<Vec<u8>>;
}

impl ReportSink for PdfSink {
    fn finish(self: Box<Self>) -> Result<Vec<u8>> {
        PdfSink::finish(*self)
    }
}

impl ReportSink for DocxSink {
    fn finish(self: Box<Self>) -> Result<Vec<u8>> {
        DocxSink::finish(*self)
    }
}

/// Create a sink instance based on the specified format
///
/// Fonts are only resolved for PDF; Word documents name their font and leave
/// the lookup to the viewer.
pub fn create_sink(
    format: Format,
    feat: &ReportFeat,
    fonts: &dyn FontResolver,
) -> Result<Box<dyn ReportSink>> {
    Ok(match format {
        Format::Pdf => Box::new(PdfSink::new(feat, fonts.resolve())?),
        Format::Docx => Box::new(DocxSink::new(feat)),
    })
}
