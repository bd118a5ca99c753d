//! Bullet list numbering for DOCX reports

use docx_rs::*;

/// The numbering id every bullet paragraph refers to.
pub const BULLET_NUMBERING_ID: usize = 1;

/// Register the single-level bullet list used for participants and surveyors
pub fn initialize_numbering(docx: Docx) -> Docx {
    let level = Level::new(
        0,
        Start::new(1),
        NumberFormat::new("bullet"),
        LevelText::new("•"),
        LevelJc::new("left"),
    )
    .indent(Some(720), Some(SpecialIndentType::Hanging(360)), None, None);

    docx.add_abstract_numbering(AbstractNumbering::new(BULLET_NUMBERING_ID).add_level(level))
        .add_numbering(Numbering::new(BULLET_NUMBERING_ID, BULLET_NUMBERING_ID))
}

/// A paragraph in the bullet list
pub fn bullet_paragraph() -> Paragraph {
    Paragraph::new().numbering(
        NumberingId::new(BULLET_NUMBERING_ID),
        IndentLevel::new(0),
    )
}
