//! # Survey report
//!
//! Renders a completed on-site survey into a PDF or Word document: a header
//! table, the participants and surveyors, one section per surveyed area with
//! its captioned photos, and a footer naming who generated the report.
//!
//! ```no_run
//! use survey_report::{Format, ReportUser, SurveyRecord, SurveyReport};
//!
//! # fn main() -> survey_report::Result<()> {
//! let record: SurveyRecord = serde_json::from_str(r#"{
//!     "company_name": "Acme Co",
//!     "survey_date": "2024-05-01",
//!     "area": "Roof"
//! }"#).map_err(|e| e.to_string())?;
//!
//! let report = SurveyReport::new(ReportUser::new("Jane Doe"))
//!     .with_format(Format::Docx)
//!     .build(&record)?;
//! std::fs::write(&report.filename, &report.bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod config;
pub mod content;
mod error;
pub mod fetch;
pub mod font;
pub mod layout;
pub mod model;
pub mod photo;
pub mod report;
pub mod writer;

pub use error::*;

pub use crate::common::Format;
pub use crate::config::ReportFeat;
pub use crate::model::{PanelNote, ReportUser, SurveyRecord, UploadedImage};
pub use crate::report::{Report, SurveyReport, build_report, suggested_filename};

/// The result type for survey reports.
pub type Result<T, Err = Error> = std::result::Result<T, Err>;
