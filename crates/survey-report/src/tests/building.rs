use super::*;

#[test]
fn test_suggested_filename() {
    insta::assert_snapshot!(
        suggested_filename("Acme Co", clock(), Format::Pdf),
        @"survey-report_Acme_Co_20240501_143015.pdf"
    );
    insta::assert_snapshot!(
        suggested_filename(" Foo  Bar\tLtd ", clock(), Format::Docx),
        @"survey-report_Foo__Bar_Ltd_20240501_143015.docx"
    );
}

#[test]
fn test_build_pdf() {
    let report = builder(Format::Pdf).build(&legacy_record()).unwrap();

    assert!(report.bytes.starts_with(b"%PDF"));
    assert_eq!(report.filename, "survey-report_Acme_Co_20240501_143015.pdf");
    assert!(!report.filename.contains(' '));
    assert_eq!(report.mime_type(), "application/pdf");
}

#[test]
fn test_build_docx() {
    let record = SurveyRecord {
        panel_notes: vec![
            note("Roof", &["https://cdn.example.com/a.png"]),
            note("Basement", &["https://cdn.example.com/missing.png"]),
        ],
        ..legacy_record()
    };
    let report = builder(Format::Docx).build(&record).unwrap();

    assert!(report.bytes.starts_with(b"PK"));
    assert_eq!(report.format, Format::Docx);
    assert!(report.filename.ends_with(".docx"));
}

#[test]
fn test_build_paginates_many_photos() {
    let urls = ["https://cdn.example.com/a.png"; 12];
    let record = SurveyRecord {
        panel_notes: vec![note("Roof", &urls), note("Basement", &urls)],
        ..legacy_record()
    };

    for format in [Format::Pdf, Format::Docx] {
        let report = builder(format).build(&record).unwrap();
        assert!(!report.bytes.is_empty());
    }
}

#[test]
fn test_build_rejects_malformed_record() {
    let record = SurveyRecord {
        company_name: String::new(),
        ..legacy_record()
    };

    for format in [Format::Pdf, Format::Docx] {
        let err = builder(format).build(&record).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
    }
    assert!(builder(Format::Pdf).outline(&record).is_err());
}

#[test]
fn test_docx_contents() {
    let report = builder(Format::Docx).build(&legacy_record()).unwrap();
    let docx = docx_rs::read_docx(&report.bytes).unwrap();

    assert_eq!(
        docx_paragraphs(&docx),
        [
            "SURVEY REPORT",
            "Company name:",
            "Acme Co",
            "Address:",
            "1 Main St",
            "Phone:",
            "555-0100",
            "Survey date:",
            "2024-05-01",
            "Participants:",
            "Alice",
            "Bob",
            "Surveyors:",
            "Carol",
            "Area #1",
            "Area:",
            "Roof",
            "Device:",
            "Panel A",
            "Findings:",
            "Loose wiring",
            "Area #1 photos",
            "Figure 1.1",
            "Report generated: 01/05/2024 14:30:15",
            "Generated by: Jane Doe",
        ]
    );
    // `missing.png` is skipped, so only `a.png` is embedded.
    assert_eq!(docx.images.len(), 1);
}

#[test]
fn test_pdf_embeds_loaded_photos_only() {
    let report = builder(Format::Pdf).build(&legacy_record()).unwrap();
    assert_eq!(pdf_entries(&report.bytes, b"/Subtype", b"/Image"), 1);

    let record = SurveyRecord {
        panel_notes: vec![
            note("Roof", &["https://cdn.example.com/a.png"]),
            note(
                "Basement",
                &["https://cdn.example.com/missing.png", "https://cdn.example.com/b.png"],
            ),
        ],
        ..legacy_record()
    };
    let report = builder(Format::Pdf).build(&record).unwrap();
    assert_eq!(pdf_entries(&report.bytes, b"/Subtype", b"/Image"), 2);
}

#[test]
fn test_build_long_findings() {
    let findings = ["Loose wiring."; 400].join(" ");
    let record = SurveyRecord {
        findings: findings.clone(),
        images: Vec::new(),
        ..legacy_record()
    };

    let pdf = builder(Format::Pdf).build(&record).unwrap();
    assert!(pdf_entries(&pdf.bytes, b"/Type", b"/Page") > 1);

    let docx = builder(Format::Docx).build(&record).unwrap();
    let docx = docx_rs::read_docx(&docx.bytes).unwrap();
    let paragraphs = docx_paragraphs(&docx);
    assert!(paragraphs.iter().any(|text| *text == findings));
}
