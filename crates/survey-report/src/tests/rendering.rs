use super::*;
use crate::font::FontMetrics;
use crate::writer::OutlineSink;

fn outline(record: &SurveyRecord) -> String {
    builder(Format::Pdf).outline(record).unwrap()
}

#[test]
fn test_legacy_outline() {
    insta::assert_snapshot!(outline(&legacy_record()), @r"
    # SURVEY REPORT (centered)
    | Company name: | Acme Co |
    | Address: | 1 Main St |
    | Phone: | 555-0100 |
    | Survey date: | 2024-05-01 |
    ## Participants:
    • Alice
    • Bob
    ## Surveyors:
    • Carol
    ## Area #1 (centered)
    | Area: | Roof |
    | Device: | Panel A |
    | Findings: | Loose wiring |
    ### Area #1 photos (centered)
    Figure 1.1 [4x2]
    Report generated: 01/05/2024 14:30:15
    Generated by: Jane Doe
    ");
}

#[test]
fn test_panel_notes_replace_legacy_block() {
    let record = SurveyRecord {
        panel_notes: vec![note("Basement", &[])],
        ..legacy_record()
    };
    let outline = outline(&record);

    assert_eq!(outline.matches("## Area #").count(), 1);
    assert!(outline.contains("| Area: | Basement |"));
    assert!(outline.contains("| Findings: | Basement findings |"));
    assert!(!outline.contains("Roof"));
    // Neither the note nor the top-level images get a photos heading.
    assert!(!outline.contains("photos"));
    assert!(figure_lines(&outline).is_empty());
}

#[test]
fn test_caption_numbering() {
    let record = SurveyRecord {
        panel_notes: vec![
            note("Roof", &[]),
            note(
                "Basement",
                &["https://cdn.example.com/a.png", "https://cdn.example.com/b.png"],
            ),
        ],
        ..legacy_record()
    };
    let outline = outline(&record);

    assert_eq!(figure_lines(&outline), ["Figure 2.1 [4x2]", "Figure 2.2 [3x3]"]);
    assert!(!outline.contains("Area #1 photos"));
    assert!(outline.contains("### Area #2 photos (centered)"));
}

#[test]
fn test_unavailable_images_keep_their_index() {
    let record = SurveyRecord {
        panel_notes: vec![note(
            "Roof",
            &[
                "https://cdn.example.com/missing.png",
                "https://cdn.example.com/broken.png",
                "https://cdn.example.com/b.png",
            ],
        )],
        ..legacy_record()
    };
    let outline = outline(&record);

    assert_eq!(figure_lines(&outline), ["Figure 1.3 [3x3]"]);
}

#[test]
fn test_all_images_unavailable() {
    let record = SurveyRecord {
        images: vec!["https://cdn.example.com/missing.png".into()],
        ..legacy_record()
    };
    let outline = outline(&record);

    assert!(!outline.contains("photos"));
    assert!(figure_lines(&outline).is_empty());
    assert!(outline.contains("| Findings: | Loose wiring |"));
}

#[test]
fn test_legacy_images_numbered_after_skipping() {
    let record = SurveyRecord {
        images: vec![
            "https://cdn.example.com/missing.png".into(),
            "https://cdn.example.com/a.png".into(),
            "https://cdn.example.com/broken.png".into(),
            "https://cdn.example.com/b.png".into(),
        ],
        ..legacy_record()
    };
    let outline = outline(&record);

    assert!(outline.contains("### Area #1 photos (centered)"));
    assert_eq!(figure_lines(&outline), ["Figure 1.1 [4x2]", "Figure 1.2 [3x3]"]);
}

#[test]
fn test_uploads_take_precedence() {
    let record = SurveyRecord {
        uploads: vec![
            UploadedImage::new("first.png", png(2, 5, [0, 0, 0, 0])),
            UploadedImage::new("second.txt", b"text".to_vec()),
            UploadedImage::new("third.png", png(7, 1, [9, 9, 9, 255])),
        ],
        ..legacy_record()
    };
    let outline = outline(&record);

    assert_eq!(figure_lines(&outline), ["Figure 1.1 [2x5]", "Figure 1.3 [7x1]"]);
}

#[test]
fn test_multiline_cells_stay_on_one_row() {
    let record = SurveyRecord {
        address: "1 Main St\nSpringfield".into(),
        ..legacy_record()
    };
    assert!(outline(&record).contains("| Address: | 1 Main St / Springfield |"));
}

#[test]
fn test_custom_title() {
    let report = builder(Format::Pdf).with_feature(ReportFeat {
        title: "SITE INSPECTION".into(),
        ..Default::default()
    });
    let outline = report.outline(&legacy_record()).unwrap();

    assert_eq!(outline.lines().next(), Some("# SITE INSPECTION (centered)"));
}

#[test]
fn test_backends_see_the_same_content() {
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
    let report = builder(Format::Pdf);
    let feat = ReportFeat::default();

    let mut pdf = Tee(writer::PdfSink::new(&feat, None).unwrap(), OutlineSink::new());
    report.render(&record, clock(), &mut pdf).unwrap();
    let Tee(pdf, pdf_outline) = pdf;
    assert!(pdf.finish().unwrap().starts_with(b"%PDF"));

    let mut docx = Tee(writer::DocxSink::new(&feat), OutlineSink::new());
    report.render(&record, clock(), &mut docx).unwrap();
    let Tee(docx, docx_outline) = docx;
    assert!(docx.finish().unwrap().starts_with(b"PK"));

    assert_eq!(pdf_outline.as_str(), docx_outline.as_str());
    assert_eq!(
        figure_lines(pdf_outline.as_str()),
        ["Figure 1.1 [4x2]", "Figure 2.2 [3x3]"]
    );
}

#[test]
fn test_pdf_splits_tall_rows() {
    let findings = ["Loose wiring."; 400].join(" ");
    // The value column is 270 pt wide with 6 pt of padding on each side.
    let lines = FontMetrics::Builtin.wrap(&findings, 10.0, 258.0).len();
    // (841.89 - 72 - 72 - 2 * 3) / 12 rows of 10 pt text fit on a page.
    let per_page = 57;
    assert!(lines > per_page);

    let mut pdf = writer::PdfSink::new(&ReportFeat::default(), None).unwrap();
    pdf.key_value_table(TableKind::Detail, &[("Findings:", findings.as_str())])
        .unwrap();

    assert_eq!(pdf.pages(), lines.div_ceil(per_page));
    assert!(pdf.finish().unwrap().starts_with(b"%PDF"));
}
