//! Image normalization.
//!
//! Every photo, whether fetched from storage or taken from the upload widget,
//! is decoded here into a flat RGB raster before a document backend sees it.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader, RgbImage, RgbaImage};
use log::{debug, warn};

use crate::model::UploadedImage;
use crate::{Error, Result};

/// A decoded photo ready for embedding: single layer, RGB, no alpha.
#[derive(Clone)]
pub struct RenderableImage {
    raster: RgbImage,
}

impl std::fmt::Debug for RenderableImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RenderableImage({}x{})", self.width(), self.height())
    }
}

impl RenderableImage {
    /// Wraps an RGB raster.
    pub fn new(raster: RgbImage) -> Self {
        Self { raster }
    }

    /// The width in pixels.
    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    /// The height in pixels.
    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// The RGB raster.
    pub fn raster(&self) -> &RgbImage {
        &self.raster
    }

    /// The interleaved 8-bit RGB samples, row by row.
    pub fn as_raw(&self) -> &[u8] {
        self.raster.as_raw()
    }

    /// Re-encodes the raster as a baseline JPEG.
    pub fn to_jpeg(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.raster
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
            .map_err(|err| Error::serialization(format!("JPEG encoding error: {err}")))?;
        Ok(buffer)
    }
}

/// Whether the extension names the vendor high-efficiency photo format.
pub fn is_heif_extension(ext: &str) -> bool {
    ext.eq_ignore_ascii_case("heic") || ext.eq_ignore_ascii_case("heif")
}

/// Decodes `data` into a [`RenderableImage`].
///
/// HEIC/HEIF input, as declared by `declared_extension`, goes through the
/// dedicated codec; everything else through the general raster decoder,
/// which guesses the format from the bytes. Returns `None` when the bytes
/// cannot be decoded; the caller skips the photo.
pub fn normalize(data: &[u8], declared_extension: Option<&str>) -> Option<RenderableImage> {
    let decoded = match declared_extension {
        Some(ext) if is_heif_extension(ext) => decode_heif(data),
        _ => decode_raster(data),
    }?;

    debug!(
        "decoded image {}x{} ({:?})",
        decoded.width(),
        decoded.height(),
        decoded.color()
    );

    Some(RenderableImage::new(flatten(decoded)))
}

/// Decodes a photo held by the upload widget, without any network access.
pub fn normalize_upload(upload: &UploadedImage) -> Option<RenderableImage> {
    let image = normalize(&upload.data, upload.extension().as_deref());
    if image.is_none() {
        warn!("skipping upload {:?}: cannot decode", upload.name);
    }
    image
}

/// Converts any decoded image to RGB, compositing transparent pixels onto
/// white.
pub fn flatten(image: DynamicImage) -> RgbImage {
    if image.color().has_alpha() {
        flatten_alpha(&image.to_rgba8())
    } else {
        image.to_rgb8()
    }
}

/// Composites an RGBA raster onto an opaque white background, using the
/// alpha channel as the blend mask.
pub fn flatten_alpha(source: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(source.width(), source.height(), |x, y| {
        let [r, g, b, a] = source.get_pixel(x, y).0;
        image::Rgb([blend(r, a), blend(g, a), blend(b, a)])
    })
}

/// `a * src + (1 - a) * 255`, rounded, on 8-bit samples.
fn blend(src: u8, alpha: u8) -> u8 {
    let (src, alpha) = (src as u32, alpha as u32);
    ((alpha * src + (255 - alpha) * 255 + 127) / 255) as u8
}

fn decode_raster(data: &[u8]) -> Option<DynamicImage> {
    let reader = match ImageReader::new(Cursor::new(data)).with_guessed_format() {
        Ok(reader) => reader,
        Err(err) => {
            warn!("cannot read image data: {err}");
            return None;
        }
    };

    match reader.decode() {
        Ok(image) => Some(image),
        Err(err) => {
            warn!("cannot decode image ({} bytes): {err}", data.len());
            None
        }
    }
}

#[cfg(feature = "heic")]
fn decode_heif(data: &[u8]) -> Option<DynamicImage> {
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    let lib = LibHeif::new();
    let decoded = HeifContext::read_from_bytes(data).and_then(|ctx| {
        let handle = ctx.primary_image_handle()?;
        let has_alpha = handle.has_alpha_channel();
        let chroma = if has_alpha {
            RgbChroma::Rgba
        } else {
            RgbChroma::Rgb
        };
        let image = lib.decode(&handle, ColorSpace::Rgb(chroma), None)?;
        Ok((image, has_alpha))
    });

    let (image, has_alpha) = match decoded {
        Ok(decoded) => decoded,
        Err(err) => {
            warn!("cannot decode HEIF image: {err}");
            return None;
        }
    };

    let planes = image.planes();
    let plane = planes.interleaved?;
    let channels = if has_alpha { 4 } else { 3 };
    let row_len = plane.width as usize * channels;

    // Rows may be padded up to `stride` bytes.
    let mut samples = Vec::with_capacity(row_len * plane.height as usize);
    for row in plane.data.chunks(plane.stride).take(plane.height as usize) {
        samples.extend_from_slice(row.get(..row_len)?);
    }

    if has_alpha {
        RgbaImage::from_raw(plane.width, plane.height, samples).map(DynamicImage::ImageRgba8)
    } else {
        RgbImage::from_raw(plane.width, plane.height, samples).map(DynamicImage::ImageRgb8)
    }
}

#[cfg(not(feature = "heic"))]
fn decode_heif(data: &[u8]) -> Option<DynamicImage> {
    warn!(
        "cannot decode HEIF image ({} bytes): built without the `heic` feature",
        data.len()
    );
    None
}
