//! The content model of a survey report.
//!
//! [`render_report`] walks a record exactly once and describes the report to
//! a [`DocumentSink`]. Every backend sees the same ordered sequence of
//! headings, tables, bullets and captioned figures; the backends only decide
//! how each block is drawn.

use chrono::NaiveDateTime;
use log::{debug, warn};

use crate::Result;
use crate::common::Align;
use crate::config::ReportFeat;
use crate::fetch::{AssetFetcher, declared_extension};
use crate::model::{PanelNote, ReportUser, SurveyRecord};
use crate::photo::{RenderableImage, normalize};

/// The level of a heading block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    /// The report title.
    Title,
    /// A top-level section, e.g. an area.
    Section,
    /// A subsection, e.g. the photos of an area.
    Subsection,
}

/// Which label/value table is being emitted. Backends pick column widths
/// from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Company name, address, phone and survey date.
    Header,
    /// Area, device and findings of one surveyed area.
    Detail,
}

/// A document backend driven by [`render_report`].
pub trait DocumentSink {
    /// A heading line.
    fn heading(&mut self, level: HeadingLevel, text: &str, align: Align) -> Result<()>;

    /// A plain paragraph. Newlines in `text` are line breaks.
    fn paragraph(&mut self, text: &str) -> Result<()>;

    /// A bulleted line. The bullet glyph is drawn by the backend.
    fn bullet(&mut self, text: &str) -> Result<()>;

    /// A two-column grid with one `(label, value)` pair per row.
    fn key_value_table(&mut self, kind: TableKind, rows: &[(&str, &str)]) -> Result<()>;

    /// A figure: the caption followed by the image, scaled by the backend.
    fn image(&mut self, image: &RenderableImage, caption: &str) -> Result<()>;

    /// Marks a point where a new page may start, before a self-contained
    /// block such as an area section. Flow backends may ignore it.
    fn page_break_hint(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: DocumentSink + ?Sized> DocumentSink for &mut S {
    fn heading(&mut self, level: HeadingLevel, text: &str, align: Align) -> Result<()> {
        (**self).heading(level, text, align)
    }

    fn paragraph(&mut self, text: &str) -> Result<()> {
        (**self).paragraph(text)
    }

    fn bullet(&mut self, text: &str) -> Result<()> {
        (**self).bullet(text)
    }

    fn key_value_table(&mut self, kind: TableKind, rows: &[(&str, &str)]) -> Result<()> {
        (**self).key_value_table(kind, rows)
    }

    fn image(&mut self, image: &RenderableImage, caption: &str) -> Result<()> {
        (**self).image(image, caption)
    }

    fn page_break_hint(&mut self) -> Result<()> {
        (**self).page_break_hint()
    }
}

/// Everything a render needs besides the record itself.
pub struct ReportContext<'a> {
    /// Features for the rendering.
    pub feat: &'a ReportFeat,
    /// Loads the photos of panel notes.
    pub fetcher: &'a dyn AssetFetcher,
    /// The user named in the footer.
    pub user: &'a ReportUser,
    /// The generation time printed in the footer.
    pub generated_at: NaiveDateTime,
}

/// The footer timestamp format: day/month/year hour:minute:second.
pub const FOOTER_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Walks `record` and emits the report into `sink`.
///
/// When the record has panel notes, each note becomes one area section and
/// its photos are fetched on the way. Otherwise a single section is built
/// from the legacy detail block, followed by `top_level_images`, which the
/// caller has already resolved. A `None` entry is a photo that could not be
/// loaded: it is skipped but keeps its position in the caption numbering.
/// The photos heading is drawn only when `top_level_images` is non-empty.
pub fn render_report<S: DocumentSink + ?Sized>(
    record: &SurveyRecord,
    top_level_images: &[Option<RenderableImage>],
    ctx: &ReportContext,
    sink: &mut S,
) -> Result<()> {
    sink.heading(HeadingLevel::Title, &ctx.feat.title, Align::Center)?;

    sink.key_value_table(
        TableKind::Header,
        &[
            ("Company name:", record.company_name.as_str()),
            ("Address:", record.address.as_str()),
            ("Phone:", record.phone.as_str()),
            ("Survey date:", record.survey_date.as_str()),
        ],
    )?;

    sink.heading(HeadingLevel::Section, "Participants:", Align::Left)?;
    for name in record.participant_lines() {
        sink.bullet(name)?;
    }

    sink.heading(HeadingLevel::Section, "Surveyors:", Align::Left)?;
    for name in record.surveyor_lines() {
        sink.bullet(name)?;
    }

    if record.panel_notes.is_empty() {
        debug!("rendering the legacy detail block");
        area_section(sink, 1, &record.area, &record.device, &record.findings)?;

        if !top_level_images.is_empty() {
            photos_heading(sink, 1)?;
            for (idx, image) in top_level_images.iter().enumerate() {
                if let Some(image) = image {
                    sink.image(image, &figure_caption(1, idx + 1))?;
                }
            }
        }
    } else {
        debug!("rendering {} panel notes", record.panel_notes.len());
        for (idx, note) in record.panel_notes.iter().enumerate() {
            panel_note_section(sink, idx + 1, note, ctx)?;
        }
    }

    let generated = ctx.generated_at.format(FOOTER_TIME_FORMAT);
    sink.paragraph(&format!("Report generated: {generated}"))?;
    sink.paragraph(&format!("Generated by: {}", ctx.user.full_name))?;

    Ok(())
}

/// The caption of the `image`-th photo of the `area`-th section, both
/// 1-based.
pub fn figure_caption(area: usize, image: usize) -> String {
    format!("Figure {area}.{image}")
}

fn area_section<S: DocumentSink + ?Sized>(
    sink: &mut S,
    number: usize,
    area: &str,
    device: &str,
    findings: &str,
) -> Result<()> {
    sink.page_break_hint()?;
    sink.heading(HeadingLevel::Section, &format!("Area #{number}"), Align::Center)?;
    sink.key_value_table(
        TableKind::Detail,
        &[("Area:", area), ("Device:", device), ("Findings:", findings)],
    )
}

fn photos_heading<S: DocumentSink + ?Sized>(sink: &mut S, number: usize) -> Result<()> {
    sink.heading(
        HeadingLevel::Subsection,
        &format!("Area #{number} photos"),
        Align::Center,
    )
}

fn panel_note_section<S: DocumentSink + ?Sized>(
    sink: &mut S,
    number: usize,
    note: &PanelNote,
    ctx: &ReportContext,
) -> Result<()> {
    area_section(sink, number, &note.area, &note.device, &note.findings)?;

    if note.images.is_empty() {
        return Ok(());
    }

    photos_heading(sink, number)?;
    for (idx, url) in note.images.iter().enumerate() {
        let Some(image) = load_remote_image(ctx.fetcher, url) else {
            continue;
        };
        sink.image(&image, &figure_caption(number, idx + 1))?;
    }

    Ok(())
}

/// Fetches and normalizes one photo. Failures are logged and yield `None`.
pub fn load_remote_image(fetcher: &dyn AssetFetcher, url: &str) -> Option<RenderableImage> {
    let data = fetcher.fetch(url)?;
    let image = normalize(&data, declared_extension(url).as_deref());
    if image.is_none() {
        warn!("skipping image {url}: cannot decode");
    }
    image
}
