//! Conversion between document length units and screen pixels
//!
//! Word measures layout in twips (1/1440 inch), drawings in EMU
//! (1/914400 inch) and border widths in eighths of a point. The HTML
//! output works in CSS pixels at 96 per inch.

/// Twips per CSS pixel (1440 twip/inch / 96 px/inch)
const TWIPS_PER_PIXEL: i64 = 15;

/// EMUs per CSS pixel (914400 EMU/inch / 96 px/inch)
const EMUS_PER_PIXEL: i64 = 9525;

/// Smallest rendered border width, keeps hairlines visible
const MIN_BORDER_PIXEL: f32 = 0.25;

/// Largest rendered border width
const MAX_BORDER_PIXEL: f32 = 12.0;

/// Convert twips to pixels, truncating
pub fn twip_to_pixel(twip: i64) -> i64 {
    twip / TWIPS_PER_PIXEL
}

/// Convert EMU to pixels, truncating
pub fn emu_to_pixel(emu: i64) -> i64 {
    emu / EMUS_PER_PIXEL
}

/// Convert a border size to a pixel width
///
/// Border sizes (`w:sz`) are expressed in eighths of a point. The result is
/// clamped to `0.25..=12.0`.
pub fn point_to_pixel(point: f32) -> f32 {
    (point / 8.0).clamp(MIN_BORDER_PIXEL, MAX_BORDER_PIXEL)
}

/// Convert typographic points (as used in VML shape styles) to pixels
pub fn pt_to_pixel(pt: f32) -> f32 {
    pt * 96.0 / 72.0
}
