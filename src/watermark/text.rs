//! Glyph measurement and text drawing.
//!
//! Measurement returns the tight ink bounding box of the rendered
//! glyphs, not the font's nominal line height. Nominal metrics differ
//! wildly between the embedded fallback and a platform font, and the
//! capsule and icon are sized from these numbers, so they must hug the
//! actual ink.
//!
//! `TextBlock` is derived data: it is recomputed whenever the text or
//! font size changes and never cached across calls.

use ab_glyph::{point, Font, FontArc, Glyph, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};

/// A measured, shaped line of text.
///
/// `origin_x`/`origin_y` locate the ink box relative to a pen start at
/// (0, baseline); `draw` uses them so ink lands exactly at the
/// requested top-left corner.
#[derive(Debug, Clone)]
pub struct TextBlock {
    pub text: String,
    pub width: u32,
    pub height: u32,
    origin_x: f32,
    origin_y: f32,
}

impl TextBlock {
    /// Measure `text` at `px_size`, recording the tight ink bounds.
    ///
    /// Whitespace-only or unoutlined text measures 0x0 and draws nothing.
    pub fn measure(text: &str, font: &FontArc, px_size: f32) -> Self {
        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;

        for_each_glyph(text, font, px_size, 0.0, 0.0, |outlined| {
            let bounds = outlined.px_bounds();
            min_x = min_x.min(bounds.min.x);
            min_y = min_y.min(bounds.min.y);
            max_x = max_x.max(bounds.max.x);
            max_y = max_y.max(bounds.max.y);
        });

        if min_x > max_x {
            return Self {
                text: text.to_owned(),
                width: 0,
                height: 0,
                origin_x: 0.0,
                origin_y: 0.0,
            };
        }

        Self {
            text: text.to_owned(),
            width: (max_x - min_x).ceil() as u32,
            height: (max_y - min_y).ceil() as u32,
            origin_x: min_x,
            origin_y: min_y,
        }
    }

    /// Draw the block onto `canvas` with its ink top-left at (x, y).
    ///
    /// Uses the same glyph walk as `measure`, so the drawn ink stays
    /// inside the measured box. Coverage is blended so anti-aliased
    /// edges compose correctly with whatever is already on the canvas.
    pub fn draw(&self, canvas: &mut RgbaImage, font: &FontArc, px_size: f32, x: i32, y: i32, color: Rgba<u8>) {
        let pen_x = x as f32 - self.origin_x;
        let baseline_y = y as f32 - self.origin_y;
        let (w, h) = (canvas.width() as i32, canvas.height() as i32);

        for_each_glyph(&self.text, font, px_size, pen_x, baseline_y, |outlined| {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let cx = px as i32 + bounds.min.x as i32;
                let cy = py as i32 + bounds.min.y as i32;
                if cx < 0 || cy < 0 || cx >= w || cy >= h {
                    return;
                }

                let alpha = (coverage * color[3] as f32) as u8;
                if alpha == 0 {
                    return;
                }
                let pixel = Rgba([color[0], color[1], color[2], alpha]);
                let existing = canvas.get_pixel(cx as u32, cy as u32);
                let blended = blend_pixels(*existing, pixel);
                canvas.put_pixel(cx as u32, cy as u32, blended);
            });
        });
    }
}

/// Walk the outlined glyphs of `text` with kerning applied, starting the
/// pen at (`pen_x`, `baseline_y`).
fn for_each_glyph<F>(text: &str, font: &FontArc, px_size: f32, pen_x: f32, baseline_y: f32, mut f: F)
where
    F: FnMut(ab_glyph::OutlinedGlyph),
{
    let scale = PxScale::from(px_size);
    let scaled_font = font.as_scaled(scale);

    let mut cursor_x = pen_x;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }

        let glyph: Glyph = glyph_id.with_scale_and_position(scale, point(cursor_x, baseline_y));
        if let Some(outlined) = font.outline_glyph(glyph) {
            f(outlined);
        }

        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }
}

/// Blend two RGBA pixels using the Porter-Duff "over" operator.
fn blend_pixels(bottom: Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
    let top_alpha = top[3] as f32 / 255.0;
    let bottom_alpha = bottom[3] as f32 / 255.0;

    let out_alpha = top_alpha + bottom_alpha * (1.0 - top_alpha);
    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |t: u8, b: u8| -> u8 {
        let t = t as f32 / 255.0;
        let b = b as f32 / 255.0;
        let result = (t * top_alpha + b * bottom_alpha * (1.0 - top_alpha)) / out_alpha;
        (result * 255.0) as u8
    };

    Rgba([
        blend(top[0], bottom[0]),
        blend(top[1], bottom[1]),
        blend(top[2], bottom[2]),
        (out_alpha * 255.0) as u8,
    ])
}
