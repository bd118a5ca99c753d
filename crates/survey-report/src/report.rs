//! The report orchestrator.

use chrono::NaiveDateTime;
use log::{debug, info};

use crate::Result;
use crate::common::Format;
use crate::config::ReportFeat;
use crate::content::{DocumentSink, ReportContext, load_remote_image, render_report};
use crate::fetch::{AssetFetcher, HttpFetcher};
use crate::font::{FontResolver, ProbeFontResolver};
use crate::model::{ReportUser, SurveyRecord};
use crate::photo::{RenderableImage, normalize_upload};
use crate::writer::{OutlineSink, create_sink};

/// The timestamp format of the suggested file name.
pub const FILENAME_TIME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A rendered report, ready to be offered for download.
#[derive(Debug, Clone)]
pub struct Report {
    /// The format of `bytes`.
    pub format: Format,
    /// The encoded document.
    pub bytes: Vec<u8>,
    /// The suggested download name.
    pub filename: String,
}

impl Report {
    /// The MIME type to serve the report with.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Builds reports for one user.
///
/// Every build runs to completion on the calling thread: photos are fetched
/// one after another and nothing is kept between builds.
pub struct SurveyReport {
    /// The user named in the footer.
    user: ReportUser,
    /// Features for the rendering.
    feat: ReportFeat,
    /// The format to build.
    format: Format,
    fetcher: Option<Box<dyn AssetFetcher + Send + Sync>>,
    fonts: Option<Box<dyn FontResolver + Send + Sync>>,
    clock: Option<NaiveDateTime>,
}

impl SurveyReport {
    /// Creates a builder with the default features, fetching photos over
    /// HTTP and probing the configured font directories.
    pub fn new(user: ReportUser) -> Self {
        Self {
            user,
            feat: ReportFeat::default(),
            format: Format::default(),
            fetcher: None,
            fonts: None,
            clock: None,
        }
    }

    /// Sets rendering features
    pub fn with_feature(mut self, feat: ReportFeat) -> Self {
        self.feat = feat;
        self
    }

    /// Sets the output format
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Replaces the HTTP fetcher, e.g. to serve photos from memory.
    pub fn with_fetcher(mut self, fetcher: impl AssetFetcher + Send + Sync + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    /// Replaces the font probe.
    pub fn with_font_resolver(mut self, fonts: impl FontResolver + Send + Sync + 'static) -> Self {
        self.fonts = Some(Box::new(fonts));
        self
    }

    /// Pins the generation time instead of reading the local clock.
    pub fn with_clock(mut self, at: NaiveDateTime) -> Self {
        self.clock = Some(at);
        self
    }

    /// Renders `record` in the configured format.
    pub fn build(&self, record: &SurveyRecord) -> Result<Report> {
        let generated_at = self.now();
        let probe;
        let fonts: &dyn FontResolver = match &self.fonts {
            Some(fonts) => fonts.as_ref(),
            None => {
                probe = ProbeFontResolver::from_feat(&self.feat);
                &probe
            }
        };

        let mut sink = create_sink(self.format, &self.feat, fonts)?;
        self.render(record, generated_at, &mut *sink)?;
        let bytes = sink.finish()?;

        let filename = suggested_filename(&record.company_name, generated_at, self.format);
        info!("built {filename} ({} bytes)", bytes.len());

        Ok(Report {
            format: self.format,
            bytes,
            filename,
        })
    }

    /// Renders `record` as a plain text outline, one line per block.
    pub fn outline(&self, record: &SurveyRecord) -> Result<String> {
        let mut sink = OutlineSink::new();
        self.render(record, self.now(), &mut sink)?;
        Ok(sink.finish())
    }

    /// Validates `record` and walks it into `sink`.
    pub fn render<S: DocumentSink + ?Sized>(
        &self,
        record: &SurveyRecord,
        generated_at: NaiveDateTime,
        sink: &mut S,
    ) -> Result<()> {
        record.validate()?;

        let http;
        let fetcher: &dyn AssetFetcher = match &self.fetcher {
            Some(fetcher) => fetcher.as_ref(),
            None => {
                http = HttpFetcher::new(&self.feat);
                &http
            }
        };

        let top_level_images = resolve_top_level_images(record, fetcher);
        let ctx = ReportContext {
            feat: &self.feat,
            fetcher,
            user: &self.user,
            generated_at,
        };

        render_report(record, &top_level_images, &ctx, sink)
    }

    fn now(&self) -> NaiveDateTime {
        self.clock.unwrap_or_else(|| chrono::Local::now().naive_local())
    }
}

/// Resolves the photos of the legacy detail block.
///
/// They are only drawn when the record has no panel notes, so nothing is
/// fetched otherwise. Pending uploads take precedence over stored URLs.
///
/// Unavailable URLs are dropped before numbering, while an upload that
/// fails to decode keeps its position.
fn resolve_top_level_images(
    record: &SurveyRecord,
    fetcher: &dyn AssetFetcher,
) -> Vec<Option<RenderableImage>> {
    if !record.panel_notes.is_empty() {
        if !record.images.is_empty() {
            debug!(
                "ignoring {} top-level images of a record with panel notes",
                record.images.len()
            );
        }
        return Vec::new();
    }

    if !record.uploads.is_empty() {
        return record.uploads.iter().map(normalize_upload).collect();
    }

    record
        .images
        .iter()
        .filter_map(|url| load_remote_image(fetcher, url))
        .map(Some)
        .collect()
}

/// The download name of a report:
/// `survey-report_{company}_{YYYYMMDD_HHMMSS}.{ext}`, with whitespace in the
/// company name replaced by underscores.
pub fn suggested_filename(company_name: &str, at: NaiveDateTime, format: Format) -> String {
    let company: String = company_name
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();

    format!(
        "survey-report_{company}_{}.{}",
        at.format(FILENAME_TIME_FORMAT),
        format.extension()
    )
}

/// Builds a report with the default features, fetcher and fonts.
pub fn build_report(format: Format, record: &SurveyRecord, user: &ReportUser) -> Result<Report> {
    SurveyReport::new(user.clone())
        .with_format(format)
        .build(record)
}
