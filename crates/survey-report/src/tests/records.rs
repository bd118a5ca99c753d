use super::*;
use crate::model::RecordId;

#[test]
fn test_record_from_json() {
    let record: SurveyRecord = serde_json::from_str(
        r#"{
            "id": 42,
            "company_name": "Acme Co",
            "survey_date": "2024-05-01",
            "images": null,
            "created_by": "b9e4c6d2",
            "panel_notes": [
                { "id": 1, "survey_id": 42, "area": "Roof", "images": null },
                { "area": "Basement", "images": ["https://cdn.example.com/a.png"] }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(record.id, Some(RecordId::Int(42)));
    assert_eq!(record.created_by, Some(RecordId::Str("b9e4c6d2".into())));
    assert!(record.images.is_empty());
    assert_eq!(record.address, "");
    assert_eq!(record.panel_notes.len(), 2);
    assert!(record.panel_notes[0].images.is_empty());
    assert_eq!(record.panel_notes[1].images.len(), 1);
    assert!(record.uploads.is_empty());
}

#[test]
fn test_name_lines() {
    let record = legacy_record();

    assert_eq!(record.participant_lines().collect::<Vec<_>>(), ["Alice", "Bob"]);
    assert_eq!(record.surveyor_lines().collect::<Vec<_>>(), ["Carol"]);
}

#[test]
fn test_validate() {
    assert!(legacy_record().validate().is_ok());

    let record = SurveyRecord {
        company_name: "  ".into(),
        ..legacy_record()
    };
    let err = record.validate().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedRecord);
    insta::assert_snapshot!(err, @"malformed survey record: `company_name` is required");

    let record = SurveyRecord {
        survey_date: String::new(),
        ..legacy_record()
    };
    assert_eq!(record.validate().unwrap_err().kind(), ErrorKind::MalformedRecord);

    // Address and phone are optional.
    let record = SurveyRecord {
        address: String::new(),
        phone: String::new(),
        ..legacy_record()
    };
    assert!(record.validate().is_ok());
}

#[test]
fn test_validate_needs_area_content() {
    let record = SurveyRecord {
        area: String::new(),
        device: String::new(),
        findings: String::new(),
        ..legacy_record()
    };
    let err = record.validate().unwrap_err();
    insta::assert_snapshot!(err, @"malformed survey record: `panel_notes` is required");

    let record = SurveyRecord {
        panel_notes: vec![note("Roof", &[])],
        ..record
    };
    assert!(record.validate().is_ok());
}

#[test]
fn test_config_from_toml() {
    let feat = ReportFeat::from_toml_str(
        r#"
title = "SITE SURVEY"
pdf-image-max-width = 200.0
fetch-timeout-secs = 10

[[font-candidates]]
name = "NotoSans"
file = "NotoSans-Regular.ttf"
"#,
    )
    .unwrap();

    assert_eq!(feat.title, "SITE SURVEY");
    assert_eq!(feat.pdf_image_max_width, 200.0);
    assert_eq!(feat.pdf_image_max_height, 300.0);
    assert_eq!(feat.fetch_timeout_secs, Some(10));
    assert_eq!(feat.font_candidates.len(), 1);
    assert_eq!(feat.font_candidates[0].file, "NotoSans-Regular.ttf");
    assert_eq!(feat.docx_font, "Times New Roman");
    assert_eq!(feat.font_dirs.len(), 7);
}

#[test]
fn test_config_invalid() {
    let err = ReportFeat::from_toml_str("pdf-image-max-width = \"wide\"").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Msg);
    assert!(err.to_string().starts_with("invalid report config"));
}

#[test]
fn test_format() {
    assert_eq!("PDF".parse::<Format>().unwrap(), Format::Pdf);
    assert_eq!("word".parse::<Format>().unwrap(), Format::Docx);
    assert!("odt".parse::<Format>().is_err());

    assert_eq!(Format::Docx.extension(), "docx");
    assert_eq!(Format::Pdf.mime_type(), "application/pdf");
}
