//! Report configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::Result;

/// A font file to look for when rendering PDF reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontCandidate {
    /// The name the font is registered under in the document.
    pub name: String,
    /// The file name probed in each search directory.
    pub file: String,
}

impl FontCandidate {
    /// A candidate registered as `name` and stored as `file`.
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
        }
    }
}

/// Features for the report generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReportFeat {
    /// The title printed at the top of every report.
    pub title: String,
    /// Directories probed for [`Self::font_candidates`], in order.
    pub font_dirs: Vec<PathBuf>,
    /// Fonts with wide script coverage, most preferred first.
    pub font_candidates: Vec<FontCandidate>,
    /// The maximum width of an embedded PDF image, in points.
    pub pdf_image_max_width: f32,
    /// The maximum height of an embedded PDF image, in points.
    pub pdf_image_max_height: f32,
    /// The width of an embedded Word image, in inches.
    pub docx_image_width_in: f32,
    /// The document-wide font of Word reports.
    pub docx_font: String,
    /// The document-wide font size of Word reports, in points.
    pub docx_font_size_pt: f32,
    /// The `User-Agent` sent when fetching photos.
    pub user_agent: Option<String>,
    /// A per-request timeout for photo fetches. Unset keeps the transport
    /// default.
    pub fetch_timeout_secs: Option<u64>,
}

impl Default for ReportFeat {
    fn default() -> Self {
        Self {
            title: "SURVEY REPORT".to_owned(),
            font_dirs: [
                "assets/fonts",
                "assets",
                ".",
                "/usr/share/fonts/truetype",
                "/usr/share/fonts/truetype/dejavu",
                "/usr/share/fonts/TTF",
                "C:\\Windows\\Fonts",
            ]
            .into_iter()
            .map(PathBuf::from)
            .collect(),
            font_candidates: vec![
                FontCandidate::new("TimesTiengViet", "times.ttf"),
                FontCandidate::new("Arial", "arial.ttf"),
                FontCandidate::new("DejaVuSans", "DejaVuSans.ttf"),
            ],
            pdf_image_max_width: 400.0,
            pdf_image_max_height: 300.0,
            docx_image_width_in: 6.0,
            docx_font: "Times New Roman".to_owned(),
            docx_font_size_pt: 12.0,
            user_agent: None,
            fetch_timeout_secs: None,
        }
    }
}

impl ReportFeat {
    /// Parses features from a TOML document. Missing keys keep their
    /// defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| format!("invalid report config: {err}").into())
    }
}
