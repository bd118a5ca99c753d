//! Typed survey records as stored by the backend.
//!
//! The records deserialize from the JSON rows of the `surveys` and
//! `panel_notes` tables. A survey row carries its panel notes inline under
//! `panel_notes` once the caller has joined them.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// A backend-assigned identifier. The storage service hands out either
/// integers or strings (uuids), and the core never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// A numeric key.
    Int(i64),
    /// A textual key, usually a uuid.
    Str(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{id}"),
            RecordId::Str(id) => f.write_str(id),
        }
    }
}

/// One completed inspection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyRecord {
    /// The row id.
    pub id: Option<RecordId>,
    /// The surveyed company. Also names the report file.
    pub company_name: String,
    /// The company address. May span several lines.
    pub address: String,
    /// The company phone number.
    pub phone: String,
    /// The survey date, kept as the text the form produced.
    pub survey_date: String,
    /// Newline-joined participant names.
    pub participants: String,
    /// Newline-joined surveyor names.
    pub surveyors: String,
    /// Legacy detail block, rendered only when there are no panel notes.
    pub area: String,
    /// The inspected device of the legacy block.
    pub device: String,
    /// The findings of the legacy block.
    pub findings: String,
    /// Public URLs of the legacy top-level photos.
    #[serde(deserialize_with = "nullable_vec")]
    pub images: Vec<String>,
    /// The user who created the survey.
    pub created_by: Option<RecordId>,
    /// The creation timestamp, as stored.
    pub created_at: Option<String>,
    /// Per-area entries. When present they replace the legacy block.
    #[serde(deserialize_with = "nullable_vec")]
    pub panel_notes: Vec<PanelNote>,
    /// Photos that have not been uploaded yet. Only set on the preview path.
    #[serde(skip)]
    pub uploads: Vec<UploadedImage>,
}

/// One area/device/finding entry within a survey.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelNote {
    /// The row id.
    pub id: Option<RecordId>,
    /// The survey this note belongs to.
    pub survey_id: Option<RecordId>,
    /// The inspected area.
    pub area: String,
    /// The inspected device.
    pub device: String,
    /// What was found.
    pub findings: String,
    /// Public URLs of the photos, in caption order.
    #[serde(deserialize_with = "nullable_vec")]
    pub images: Vec<String>,
}

/// A photo held by the upload widget before it reaches storage.
#[derive(Clone)]
pub struct UploadedImage {
    /// The original file name, including its extension.
    pub name: String,
    /// The file content.
    pub data: Vec<u8>,
}

impl fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedImage")
            .field("name", &self.name)
            .field("len", &self.data.len())
            .finish()
    }
}

impl UploadedImage {
    /// An upload named `name` holding `data`.
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// The lowercase extension of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.name.rsplit_once('.')?;
        (!ext.is_empty()).then(|| ext.to_ascii_lowercase())
    }
}

/// The role of the acting user.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Manages users and every survey.
    Admin,
    /// Works on their own surveys.
    #[default]
    Member,
}

/// The authenticated user on whose behalf the report is generated.
///
/// Only `full_name` reaches the document. Authorization happens before the
/// core is invoked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportUser {
    /// The user id.
    pub id: Option<RecordId>,
    /// The name printed in the footer.
    pub full_name: String,
    /// The role of the user.
    pub role: Role,
}

impl ReportUser {
    /// A member named `full_name`.
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Default::default()
        }
    }
}

impl SurveyRecord {
    /// Participant names, skipping blank lines.
    pub fn participant_lines(&self) -> impl Iterator<Item = &str> {
        non_blank_lines(&self.participants)
    }

    /// Surveyor names, skipping blank lines.
    pub fn surveyor_lines(&self) -> impl Iterator<Item = &str> {
        non_blank_lines(&self.surveyors)
    }

    /// Whether any field of the legacy detail block is filled in.
    pub fn has_legacy_detail(&self) -> bool {
        [&self.area, &self.device, &self.findings]
            .iter()
            .any(|field| !field.trim().is_empty())
    }

    /// Checks the fields the report cannot do without.
    ///
    /// The company name names the output file and the survey date
    /// identifies the inspection. A record must also carry something to put
    /// in its area section: panel notes or the legacy detail block.
    pub fn validate(&self) -> Result<()> {
        if self.company_name.trim().is_empty() {
            return Err(Error::malformed("company_name"));
        }
        if self.survey_date.trim().is_empty() {
            return Err(Error::malformed("survey_date"));
        }
        if self.panel_notes.is_empty() && !self.has_legacy_detail() {
            return Err(Error::malformed("panel_notes"));
        }

        Ok(())
    }
}

fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|line| !line.trim().is_empty())
}

/// Treats an explicit `null` the same as a missing list.
fn nullable_vec<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
