//! Paginated PDF backend built on `printpdf`.
//!
//! Layout is a single top-down pass: a cursor walks down the page and a new
//! A4 page starts whenever the next line, table row or figure does not fit
//! above the bottom margin.

use std::io::{BufWriter, Cursor, Write};

use log::{debug, warn};
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Px,
    Rgb,
};

use crate::common::Align;
use crate::config::ReportFeat;
use crate::content::{DocumentSink, HeadingLevel, TableKind};
use crate::font::{FontMetrics, ResolvedFont};
use crate::layout::scale;
use crate::photo::RenderableImage;
use crate::{Error, Result};

const PAGE_WIDTH_PT: f32 = 595.28;
const PAGE_HEIGHT_PT: f32 = 841.89;
const MARGIN_PT: f32 = 72.0;
const CONTENT_WIDTH_PT: f32 = PAGE_WIDTH_PT - 2.0 * MARGIN_PT;
const PT_TO_MM: f32 = 0.352_777_78;

const BODY_SIZE: f32 = 10.0;
const LEADING: f32 = 1.2;
const CELL_PADDING_X: f32 = 6.0;
const CELL_PADDING_Y: f32 = 3.0;
const GRID_WIDTH: f32 = 0.5;
/// Below this much room, an area section starts on a fresh page.
const SECTION_MIN_SPACE: f32 = 120.0;

fn mm(pt: f32) -> Mm {
    Mm(pt * PT_TO_MM)
}

/// Table grid lines are thin and black on every page.
fn set_grid_style(layer: &PdfLayerReference) {
    layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    layer.set_outline_thickness(GRID_WIDTH);
}

/// Writes a report as a paginated A4 PDF.
pub struct PdfSink {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    metrics: FontMetrics,
    /// Distance of the cursor from the bottom edge of the page, in points.
    cursor: f32,
    image_box: (f32, f32),
    pages: usize,
    figures: usize,
}

impl PdfSink {
    /// Creates an empty document. `font` is embedded when it loads; the
    /// built-in Times-Roman is used otherwise.
    pub fn new(feat: &ReportFeat, font: Option<ResolvedFont>) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(&feat.title, mm(PAGE_WIDTH_PT), mm(PAGE_HEIGHT_PT), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        set_grid_style(&layer);

        let external = font.and_then(|font| {
            let Some(metrics) = FontMetrics::from_font_data(&font.data) else {
                warn!("cannot measure font {}, skipping it", font.name);
                return None;
            };
            match doc.add_external_font(font.data.as_slice()) {
                Ok(font_ref) => {
                    debug!("embedding font {}", font.name);
                    Some((font_ref, metrics))
                }
                Err(err) => {
                    warn!("cannot embed font {}: {err}", font.name);
                    None
                }
            }
        });

        let (font, metrics) = match external {
            Some(external) => external,
            None => {
                let builtin = doc
                    .add_builtin_font(BuiltinFont::TimesRoman)
                    .map_err(|err| Error::serialization(format!("cannot add font: {err}")))?;
                (builtin, FontMetrics::Builtin)
            }
        };

        Ok(Self {
            doc,
            layer,
            font,
            metrics,
            cursor: PAGE_HEIGHT_PT - MARGIN_PT,
            image_box: (feat.pdf_image_max_width, feat.pdf_image_max_height),
            pages: 1,
            figures: 0,
        })
    }

    /// The number of pages started so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Serializes the document.
    pub fn finish(self) -> Result<Vec<u8>> {
        debug!("pdf report: {} pages, {} figures", self.pages, self.figures);

        let mut buffer = Vec::new();
        {
            let mut writer = BufWriter::new(Cursor::new(&mut buffer));
            self.doc
                .save(&mut writer)
                .map_err(|err| Error::serialization(format!("cannot write PDF: {err}")))?;
            writer
                .flush()
                .map_err(|err| Error::serialization(format!("cannot write PDF: {err}")))?;
        }

        Ok(buffer)
    }

    fn at_page_top(&self) -> bool {
        self.cursor >= PAGE_HEIGHT_PT - MARGIN_PT
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(mm(PAGE_WIDTH_PT), mm(PAGE_HEIGHT_PT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        set_grid_style(&self.layer);
        self.cursor = PAGE_HEIGHT_PT - MARGIN_PT;
        self.pages += 1;
    }

    /// Starts a new page unless `height` points fit above the bottom margin.
    fn ensure_space(&mut self, height: f32) {
        if self.cursor - height < MARGIN_PT && !self.at_page_top() {
            self.new_page();
        }
    }

    fn skip(&mut self, height: f32) {
        self.cursor = (self.cursor - height).max(MARGIN_PT);
    }

    fn draw_text(&self, text: &str, size: f32, x: f32, baseline: f32) {
        self.layer.use_text(text, size, mm(x), mm(baseline), &self.font);
    }

    fn text_block(&mut self, text: &str, size: f32, align: Align, indent: f32) {
        let width = CONTENT_WIDTH_PT - indent;
        for line in self.metrics.wrap(text, size, width) {
            let leading = size * LEADING;
            self.ensure_space(leading);

            let x = match align {
                Align::Left => MARGIN_PT + indent,
                Align::Center => {
                    MARGIN_PT + indent + (width - self.metrics.text_width(&line, size)) / 2.0
                }
            };
            self.draw_text(&line, size, x, self.cursor - size);
            self.cursor -= leading;
        }
    }

    fn stroke_rect(&self, x: f32, y: f32, w: f32, h: f32) {
        let points = vec![
            (Point::new(mm(x), mm(y)), false),
            (Point::new(mm(x + w), mm(y)), false),
            (Point::new(mm(x + w), mm(y + h)), false),
            (Point::new(mm(x), mm(y + h)), false),
        ];
        self.layer.add_line(Line {
            points,
            is_closed: true,
        });
    }
}

impl DocumentSink for PdfSink {
    fn heading(&mut self, level: HeadingLevel, text: &str, align: Align) -> Result<()> {
        let (size, before, after) = match level {
            HeadingLevel::Title => (16.0, 0.0, 32.0),
            HeadingLevel::Section => (14.0, 10.0, 6.0),
            HeadingLevel::Subsection => (12.0, 6.0, 6.0),
        };

        // Keep a heading together with the first line that follows it.
        self.ensure_space(before + size * LEADING + BODY_SIZE * LEADING * 2.0);
        if !self.at_page_top() {
            self.skip(before);
        }
        self.text_block(text, size, align, 0.0);
        self.skip(after);
        Ok(())
    }

    fn paragraph(&mut self, text: &str) -> Result<()> {
        self.text_block(text, BODY_SIZE, Align::Left, 0.0);
        self.skip(BODY_SIZE * 0.6);
        Ok(())
    }

    fn bullet(&mut self, text: &str) -> Result<()> {
        self.text_block(&format!("• {text}"), BODY_SIZE, Align::Left, 0.0);
        self.skip(BODY_SIZE * 0.6);
        Ok(())
    }

    fn key_value_table(&mut self, kind: TableKind, rows: &[(&str, &str)]) -> Result<()> {
        let (label_width, value_width) = match kind {
            TableKind::Header => (120.0, 300.0),
            TableKind::Detail => (150.0, 270.0),
        };
        let left = MARGIN_PT + (CONTENT_WIDTH_PT - label_width - value_width) / 2.0;
        let leading = BODY_SIZE * LEADING;

        for (label, value) in rows {
            let labels = self
                .metrics
                .wrap(label, BODY_SIZE, label_width - 2.0 * CELL_PADDING_X);
            let values = self
                .metrics
                .wrap(value, BODY_SIZE, value_width - 2.0 * CELL_PADDING_X);
            let lines = labels.len().max(values.len()).max(1);
            let height = lines as f32 * leading + 2.0 * CELL_PADDING_Y;

            // A row that fits on a page is kept whole. A taller one starts
            // where it is and continues on the following pages.
            if height <= PAGE_HEIGHT_PT - 2.0 * MARGIN_PT {
                self.ensure_space(height);
            } else {
                self.ensure_space(leading + 2.0 * CELL_PADDING_Y);
            }

            let mut first = 0;
            while first < lines {
                let room = (self.cursor - MARGIN_PT - 2.0 * CELL_PADDING_Y) / leading;
                let last = lines.min(first + (room.floor() as usize).max(1));
                let top = self.cursor;
                let bottom = top - (last - first) as f32 * leading - 2.0 * CELL_PADDING_Y;

                for idx in first..last {
                    let baseline =
                        top - CELL_PADDING_Y - BODY_SIZE - (idx - first) as f32 * leading;
                    if let Some(line) = labels.get(idx) {
                        // Labels are right-aligned against the value column.
                        let width = self.metrics.text_width(line, BODY_SIZE);
                        let x = left + label_width - CELL_PADDING_X - width;
                        self.draw_text(line, BODY_SIZE, x, baseline);
                    }
                    if let Some(line) = values.get(idx) {
                        let x = left + label_width + CELL_PADDING_X;
                        self.draw_text(line, BODY_SIZE, x, baseline);
                    }
                }

                self.stroke_rect(left, bottom, label_width, top - bottom);
                self.stroke_rect(left + label_width, bottom, value_width, top - bottom);
                self.cursor = bottom;

                first = last;
                if first < lines {
                    debug!("splitting a table row across pages");
                    self.new_page();
                }
            }
        }

        self.skip(10.0);
        Ok(())
    }

    fn image(&mut self, image: &RenderableImage, caption: &str) -> Result<()> {
        let (px_width, px_height) = (image.width() as f32, image.height() as f32);
        let (max_width, max_height) = self.image_box;
        let (width, height) = scale(
            px_width,
            px_height,
            max_width.min(CONTENT_WIDTH_PT),
            max_height,
        );

        // The caption stays on the page of its figure.
        self.ensure_space(BODY_SIZE * LEADING + height);
        self.text_block(caption, BODY_SIZE, Align::Left, 0.0);

        let x = MARGIN_PT + (CONTENT_WIDTH_PT - width) / 2.0;
        let y = self.cursor - height;
        let xobject = ImageXObject {
            width: Px(image.width() as usize),
            height: Px(image.height() as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: image.as_raw().to_vec(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        };

        // At 72 dpi one pixel is one point, so the scale maps pixels onto
        // the computed size.
        Image::from(xobject).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(mm(x)),
                translate_y: Some(mm(y)),
                scale_x: Some(if px_width > 0.0 { width / px_width } else { 1.0 }),
                scale_y: Some(if px_height > 0.0 { height / px_height } else { 1.0 }),
                dpi: Some(72.0),
                ..Default::default()
            },
        );

        self.cursor = y;
        self.skip(10.0);
        self.figures += 1;
        Ok(())
    }

    fn page_break_hint(&mut self) -> Result<()> {
        self.ensure_space(SECTION_MIN_SPACE);
        Ok(())
    }
}
