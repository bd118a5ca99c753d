//! Image processing for DOCX reports

use docx_rs::*;

use crate::Result;
use crate::layout::fixed_width_emu;
use crate::photo::RenderableImage;

/// Embeds normalized photos at a fixed physical width
pub struct DocxImageProcessor {
    width_in: f32,
}

impl DocxImageProcessor {
    /// Embeds images `width_in` inches wide.
    pub fn new(width_in: f32) -> Self {
        Self { width_in }
    }

    /// Build a paragraph holding `image` as JPEG, `width_in` inches wide
    pub fn image_paragraph(&self, image: &RenderableImage) -> Result<Paragraph> {
        let jpeg = image.to_jpeg()?;
        let (width, height) = fixed_width_emu(image.width(), image.height(), self.width_in);

        let pic = Pic::new(&jpeg).size(width, height);
        Ok(Paragraph::new()
            .align(AlignmentType::Center)
            .add_run(Run::new().add_image(pic)))
    }
}
