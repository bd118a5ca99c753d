//! Proportional image sizing shared by every document backend.

/// English Metric Units per inch, the physical unit of OOXML drawings.
pub const EMU_PER_INCH: f32 = 914_400.0;

/// Scales `width`×`height` uniformly so it fits in `max_width`×`max_height`.
///
/// The result keeps the aspect ratio and touches the box on at least one
/// axis. A zero-sized input is returned unscaled.
pub fn scale(width: f32, height: f32, max_width: f32, max_height: f32) -> (f32, f32) {
    let ratio = if width > 0.0 && height > 0.0 {
        (max_width / width).min(max_height / height)
    } else {
        1.0
    };

    (width * ratio, height * ratio)
}

/// Sizes an image to a fixed physical width, deriving the height from its
/// aspect ratio. Returns `(width, height)` in EMU.
pub fn fixed_width_emu(width_px: u32, height_px: u32, width_in: f32) -> (u32, u32) {
    let box_width = width_in * EMU_PER_INCH;
    // Tall enough that the width is always the binding side.
    let box_height = box_width * 1_000.0;
    let (w, h) = scale(width_px as f32, height_px as f32, box_width, box_height);

    (w.round() as u32, h.round() as u32)
}
