//! DOCX backend using docx-rs
//!
//! - Writer: the [`DocumentSink`](crate::content::DocumentSink) that builds the document
//! - Styles: heading, caption and table styles
//! - Numbering: the bullet list definition
//! - Image processor: re-encoding and sizing of embedded photos

mod image_processor;
mod numbering;
mod styles;
mod writer;

pub use writer::DocxSink;
