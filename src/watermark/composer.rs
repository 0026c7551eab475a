//! Watermark layout and compositing.
//!
//! The layout engine anchors a content block (icon + one or two text
//! lines) in the bottom-right corner of the target image, backs it with
//! a translucent capsule, and composites the result over the base.
//!
//! All drawing happens on a transparent overlay of the base's
//! dimensions; the base pixels are only touched once, by the final
//! alpha composite. Every position is derived arithmetically from the
//! image dimensions, the margins and the measured text/icon sizes.

use ab_glyph::FontArc;
use image::{DynamicImage, Rgba, RgbImage, RgbaImage};

use super::icon::IconProvider;
use super::shaping::shape;
use super::text::TextBlock;
use crate::constants::{
    CAPSULE_FILL, FONT_DIVISOR_CAPSULE, FONT_DIVISOR_SUBTLE, ICON_SCALE_CAPSULE,
    ICON_SCALE_SUBTLE, MIN_FONT_SIZE, TEXT_COLOR, TEXT_COLOR_SUBTLE,
};

/// Watermark styling and layout parameters.
///
/// Every numeric default is derived from the font size, which is itself
/// a fixed fraction of the image width, so the watermark stays
/// proportionally stable across differently-sized generated images.
#[derive(Debug, Clone)]
pub struct WatermarkConfig {
    /// Top text line, always present.
    pub primary_text: String,
    /// Optional second line; when absent or empty the layout collapses
    /// to single-line centering.
    pub secondary_text: Option<String>,
    pub font_size: u32,
    pub margin_x: u32,
    pub margin_y: u32,
    /// Gap between the icon and the text block.
    pub gap: u32,
    pub capsule_padding_x: u32,
    pub capsule_padding_y: u32,
    pub capsule_radius: u32,
    /// Capsule fill; `None` draws no backing at all.
    pub capsule_color: Option<Rgba<u8>>,
    pub text_color: Rgba<u8>,
    /// Icon edge as a multiple of the tallest text line.
    pub icon_scale: f32,
    /// Vertical gap between stacked text lines.
    pub line_spacing: u32,
    /// Upward text shift correcting ascent/descent asymmetry
    /// (-4 px at the 1280 px reference width).
    pub text_nudge: i32,
}

impl WatermarkConfig {
    /// Default preset: translucent black capsule behind opaque text.
    pub fn capsule(image_width: u32, primary_text: String, secondary_text: Option<String>) -> Self {
        let font_size = derived_font_size(image_width, FONT_DIVISOR_CAPSULE);
        Self {
            primary_text,
            secondary_text,
            font_size,
            margin_x: font_size * 6 / 5,
            margin_y: font_size * 6 / 5,
            gap: font_size / 2,
            capsule_padding_x: font_size * 3 / 5,
            capsule_padding_y: font_size * 2 / 5,
            capsule_radius: font_size * 3 / 5,
            capsule_color: Some(Rgba(CAPSULE_FILL)),
            text_color: Rgba(TEXT_COLOR),
            icon_scale: ICON_SCALE_CAPSULE,
            line_spacing: font_size / 4,
            text_nudge: -((font_size * 4 / 25) as i32),
        }
    }

    /// Quieter preset: no capsule, smaller translucent text.
    pub fn subtle(image_width: u32, primary_text: String, secondary_text: Option<String>) -> Self {
        let font_size = derived_font_size(image_width, FONT_DIVISOR_SUBTLE);
        Self {
            capsule_color: None,
            text_color: Rgba(TEXT_COLOR_SUBTLE),
            icon_scale: ICON_SCALE_SUBTLE,
            ..Self::capsule(image_width, primary_text, secondary_text)
        }
        .rescaled(font_size)
    }

    fn rescaled(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self.margin_x = font_size * 6 / 5;
        self.margin_y = font_size * 6 / 5;
        self.gap = font_size / 2;
        self.capsule_padding_x = font_size * 3 / 5;
        self.capsule_padding_y = font_size * 2 / 5;
        self.capsule_radius = font_size * 3 / 5;
        self.line_spacing = font_size / 4;
        self.text_nudge = -((font_size * 4 / 25) as i32);
        self
    }
}

fn derived_font_size(image_width: u32, divisor: u32) -> u32 {
    (image_width / divisor).max(MIN_FONT_SIZE)
}

/// Axis-aligned rectangle in target-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl LayoutBox {
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn contains(&self, other: &LayoutBox) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }
}

/// Resolved watermark geometry for one image.
#[derive(Debug)]
pub struct Layout {
    /// Font size actually used (may be smaller than configured if a
    /// line had to shrink to fit).
    pub font_size: u32,
    pub capsule: LayoutBox,
    pub icon_box: LayoutBox,
    /// One box per rendered text line, top to bottom.
    pub line_boxes: Vec<LayoutBox>,
    lines: Vec<TextBlock>,
}

/// Compute the watermark geometry for an image of the given dimensions.
///
/// Shapes and measures each text line at the configured font size,
/// derives the icon size from the tallest line, and anchors the capsule
/// so its right edge sits at `image_width - margin_x` and the content's
/// vertical center at `image_height - margin_y - content_height / 2`.
///
/// If the capsule would exceed the image width the font shrinks in 10%
/// steps (re-shaping and re-measuring each time) down to a floor;
/// beyond that the text is allowed to overflow rather than fail.
pub fn compute_layout(
    image_width: u32,
    image_height: u32,
    config: &WatermarkConfig,
    font: &FontArc,
) -> Layout {
    let mut texts: Vec<String> = vec![shape(&config.primary_text)];
    if let Some(secondary) = config.secondary_text.as_deref() {
        if !secondary.is_empty() {
            texts.push(shape(secondary));
        }
    }

    let mut font_size = config.font_size;
    let (lines, icon_size, content_w, content_h) = loop {
        let lines: Vec<TextBlock> = texts
            .iter()
            .map(|t| TextBlock::measure(t, font, font_size as f32))
            .collect();

        let tallest = lines.iter().map(|l| l.height).max().unwrap_or(0).max(1);
        let widest = lines.iter().map(|l| l.width).max().unwrap_or(0);
        let icon_size = (tallest as f32 * config.icon_scale).round().max(1.0) as u32;

        let text_h: u32 = lines.iter().map(|l| l.height).sum::<u32>()
            + config.line_spacing * (lines.len() as u32 - 1);

        let content_w = icon_size + config.gap + widest;
        let content_h = icon_size.max(text_h);

        let capsule_w = content_w + 2 * config.capsule_padding_x;
        let fits = capsule_w + config.margin_x <= image_width;
        if fits || font_size <= MIN_FONT_SIZE {
            break (lines, icon_size, content_w, content_h);
        }
        font_size = (font_size * 9 / 10).max(MIN_FONT_SIZE);
    };

    let padding_x = config.capsule_padding_x as i32;
    let padding_y = config.capsule_padding_y as i32;

    let content_right = image_width as i32 - config.margin_x as i32 - padding_x;
    let content_left = content_right - content_w as i32;
    let center_y = image_height as i32 - config.margin_y as i32 - content_h as i32 / 2;
    let content_top = center_y - content_h as i32 / 2;

    let capsule = LayoutBox {
        x: content_left - padding_x,
        y: content_top - padding_y,
        width: content_w + 2 * config.capsule_padding_x,
        height: content_h + 2 * config.capsule_padding_y,
    };

    let icon_box = LayoutBox {
        x: content_left,
        y: center_y - icon_size as i32 / 2,
        width: icon_size,
        height: icon_size,
    };

    // Text lines stack to the icon's trailing side, the set vertically
    // centered within the content box, all sharing one left x-offset.
    let text_x = content_left + icon_size as i32 + config.gap as i32;
    let text_h: u32 = lines.iter().map(|l| l.height).sum::<u32>()
        + config.line_spacing * (lines.len() as u32 - 1);

    let mut line_boxes = Vec::with_capacity(lines.len());
    let mut line_y = center_y - text_h as i32 / 2;
    for line in &lines {
        line_boxes.push(LayoutBox {
            x: text_x,
            y: line_y + config.text_nudge,
            width: line.width,
            height: line.height,
        });
        line_y += line.height as i32 + config.line_spacing as i32;
    }

    Layout {
        font_size,
        capsule,
        icon_box,
        line_boxes,
        lines,
    }
}

/// Apply the watermark to a base image and flatten to opaque RGB.
///
/// Has no failure path: font and icon resolution degrade internally and
/// drawing clips at the image edges.
pub fn apply(
    base: DynamicImage,
    config: &WatermarkConfig,
    font: &FontArc,
    icons: &IconProvider,
) -> RgbImage {
    // 1. Promote to an alpha-capable model; draw on a transparent overlay.
    let mut composed = base.into_rgba8();
    let (width, height) = composed.dimensions();
    let mut overlay = RgbaImage::new(width, height);

    // 2-5. Measure text, size the icon, anchor the content block.
    let layout = compute_layout(width, height, config, font);

    // 6. Translucent backing capsule.
    if let Some(fill) = config.capsule_color {
        draw_rounded_rect(&mut overlay, &layout.capsule, config.capsule_radius, fill);
    }

    // 7. Icon at the leading edge, vertically centered.
    let icon = icons.icon(layout.icon_box.width);
    paste_over(&mut overlay, &icon, layout.icon_box.x, layout.icon_box.y);

    // 8. Text lines, stacked in source order.
    for (line, bounds) in layout.lines.iter().zip(&layout.line_boxes) {
        line.draw(
            &mut overlay,
            font,
            layout.font_size as f32,
            bounds.x,
            bounds.y,
            config.text_color,
        );
    }

    // 9. Composite the overlay over the base and flatten.
    for (x, y, pixel) in overlay.enumerate_pixels() {
        if pixel[3] > 0 {
            let below = composed.get_pixel(x, y);
            composed.put_pixel(x, y, blend_pixels(*below, *pixel));
        }
    }
    DynamicImage::ImageRgba8(composed).to_rgb8()
}

/// Draw a filled rounded rectangle with anti-aliased corners.
///
/// A radius of zero degrades to a plain rectangle; either way the
/// covered bounds are identical.
fn draw_rounded_rect(canvas: &mut RgbaImage, rect: &LayoutBox, radius: u32, fill: Rgba<u8>) {
    let radius = radius.min(rect.width / 2).min(rect.height / 2) as f32;

    let x0 = rect.x.max(0);
    let y0 = rect.y.max(0);
    let x1 = rect.right().min(canvas.width() as i32);
    let y1 = rect.bottom().min(canvas.height() as i32);

    for y in y0..y1 {
        for x in x0..x1 {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;

            // Distance into a corner disc, zero along the straight edges
            let dx = (rect.x as f32 + radius - px).max(px - (rect.right() as f32 - radius)).max(0.0);
            let dy = (rect.y as f32 + radius - py).max(py - (rect.bottom() as f32 - radius)).max(0.0);

            let coverage = if dx > 0.0 && dy > 0.0 {
                (radius - (dx * dx + dy * dy).sqrt() + 0.5).clamp(0.0, 1.0)
            } else {
                1.0
            };
            if coverage == 0.0 {
                continue;
            }

            let alpha = (fill[3] as f32 * coverage) as u8;
            let pixel = Rgba([fill[0], fill[1], fill[2], alpha]);
            let existing = canvas.get_pixel(x as u32, y as u32);
            canvas.put_pixel(x as u32, y as u32, blend_pixels(*existing, pixel));
        }
    }
}

/// Alpha-blend `top` onto `canvas` with its corner at (x, y), clipping
/// at the canvas edges.
fn paste_over(canvas: &mut RgbaImage, top: &RgbaImage, x: i32, y: i32) {
    let x_start = x.max(0);
    let y_start = y.max(0);
    let x_end = (x + top.width() as i32).min(canvas.width() as i32);
    let y_end = (y + top.height() as i32).min(canvas.height() as i32);

    for cy in y_start..y_end {
        for cx in x_start..x_end {
            let pixel = top.get_pixel((cx - x) as u32, (cy - y) as u32);
            if pixel[3] == 0 {
                continue;
            }
            let existing = canvas.get_pixel(cx as u32, cy as u32);
            canvas.put_pixel(cx as u32, cy as u32, blend_pixels(*existing, *pixel));
        }
    }
}

/// Blend two pixels using the Porter-Duff "over" operator.
fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    let fg_alpha = foreground[3] as f32 / 255.0;
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);
    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watermark::font::embedded_font;
    use rstest::rstest;

    fn capsule_config(width: u32) -> WatermarkConfig {
        WatermarkConfig::capsule(width, "@example".to_string(), None)
    }

    #[test]
    fn test_defaults_derive_from_width() {
        let config = capsule_config(1280);
        // width / 50 = 25, and the observed layout numbers follow
        assert_eq!(config.font_size, 25);
        assert_eq!(config.margin_x, 30);
        assert_eq!(config.margin_y, 30);
        assert_eq!(config.gap, 12);
        assert_eq!(config.capsule_padding_x, 15);
        assert_eq!(config.capsule_padding_y, 10);
        assert_eq!(config.capsule_radius, 15);
        assert_eq!(config.text_nudge, -4);

        // Halving the width halves the watermark proportions
        let small = capsule_config(640);
        assert_eq!(small.font_size, 12);
        assert!(small.margin_x < config.margin_x);
    }

    #[test]
    fn test_subtle_preset_differs_in_style_only() {
        let config = WatermarkConfig::subtle(1280, "@example".to_string(), None);
        assert!(config.capsule_color.is_none());
        assert_eq!(config.font_size, 1280 / 70);
        assert_eq!(config.icon_scale, 1.5);
    }

    // Capsule anchoring invariant across image sizes
    #[rstest]
    #[case(200, 200)]
    #[case(641, 481)]
    #[case(1280, 720)]
    #[case(1920, 1080)]
    fn test_capsule_anchoring(#[case] width: u32, #[case] height: u32) {
        let font = embedded_font();
        let config = capsule_config(width);
        let layout = compute_layout(width, height, &config, &font);

        assert_eq!(layout.capsule.right(), width as i32 - config.margin_x as i32);

        let expected_bottom =
            height as i32 - config.margin_y as i32 + config.capsule_padding_y as i32;
        assert!((layout.capsule.bottom() - expected_bottom).abs() <= 1);
    }

    // Capsule fully contains the icon and every text line
    #[rstest]
    #[case(None)]
    #[case(Some("صبا رسانه".to_string()))]
    fn test_capsule_contains_content(#[case] secondary: Option<String>) {
        let font = embedded_font();
        let config = WatermarkConfig::capsule(1280, "@example".to_string(), secondary);
        let layout = compute_layout(1280, 720, &config, &font);

        assert!(layout.capsule.contains(&layout.icon_box));
        for line in &layout.line_boxes {
            assert!(layout.capsule.contains(line));
        }
    }

    #[test]
    fn test_single_line_scenario_1280x720() {
        let font = embedded_font();
        let config = capsule_config(1280);
        let layout = compute_layout(1280, 720, &config, &font);

        // Capsule right edge at 1280 - 30
        assert!((layout.capsule.right() - 1250).abs() <= 1);

        // Icon sits left of the text block, separated by the gap
        assert_eq!(layout.line_boxes.len(), 1);
        assert_eq!(layout.line_boxes[0].x, layout.icon_box.right() + 12);

        // Output flattens to opaque RGB at the base dimensions
        let base = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            1280,
            720,
            image::Rgb([255, 255, 255]),
        ));
        let out = apply(base, &config, &font, &IconProvider::offline());
        assert_eq!(out.dimensions(), (1280, 720));
    }

    #[test]
    fn test_two_line_stacking() {
        let font = embedded_font();
        let config = WatermarkConfig::capsule(
            1280,
            "صبا رسانه".to_string(),
            Some("@example".to_string()),
        );
        let layout = compute_layout(1280, 720, &config, &font);

        assert_eq!(layout.line_boxes.len(), 2);
        let (top, bottom) = (&layout.line_boxes[0], &layout.line_boxes[1]);

        // Same left x-offset, stacked with exactly line_spacing between
        assert_eq!(top.x, bottom.x);
        assert_eq!(bottom.y, top.bottom() + config.line_spacing as i32);
        assert!(top.bottom() <= bottom.y, "lines must not overlap");
    }

    #[test]
    fn test_empty_secondary_collapses_to_single_line() {
        let font = embedded_font();
        let config = WatermarkConfig::capsule(1280, "@example".to_string(), Some(String::new()));
        let layout = compute_layout(1280, 720, &config, &font);
        assert_eq!(layout.line_boxes.len(), 1);
    }

    #[test]
    fn test_overlong_line_shrinks_font() {
        let font = embedded_font();
        let config = WatermarkConfig::capsule(
            600,
            "a very long watermark line ".repeat(5),
            None,
        );
        let layout = compute_layout(600, 600, &config, &font);

        assert!(layout.font_size < config.font_size);
        assert!(layout.font_size >= MIN_FONT_SIZE);
    }

    #[test]
    fn test_icon_vertically_centered_in_content() {
        let font = embedded_font();
        let config = capsule_config(1280);
        let layout = compute_layout(1280, 720, &config, &font);

        let content_center = 720 - config.margin_y as i32
            - (layout.capsule.height as i32 - 2 * config.capsule_padding_y as i32) / 2;
        let icon_center = layout.icon_box.y + layout.icon_box.height as i32 / 2;
        assert!((icon_center - content_center).abs() <= 1);
    }

    #[test]
    fn test_apply_darkens_capsule_region() {
        let font = embedded_font();
        let config = capsule_config(1280);
        let layout = compute_layout(1280, 720, &config, &font);

        let base = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            1280,
            720,
            image::Rgb([255, 255, 255]),
        ));
        let out = apply(base, &config, &font, &IconProvider::offline());

        // A point in the capsule's top padding band: pure translucent
        // black over white, away from icon and text ink.
        let x = (layout.capsule.x + layout.capsule.width as i32 / 2) as u32;
        let y = (layout.capsule.y + 2) as u32;
        let pixel = out.get_pixel(x, y);
        assert!(pixel[0] < 200, "capsule must darken the base");
        assert_eq!(pixel[0], pixel[1]);
        assert_eq!(pixel[1], pixel[2]);

        // Far corner untouched
        assert_eq!(*out.get_pixel(5, 5), image::Rgb([255, 255, 255]));
    }

    #[test]
    fn test_rounded_rect_radius_zero_is_plain() {
        let mut canvas = RgbaImage::new(40, 40);
        let rect = LayoutBox {
            x: 5,
            y: 5,
            width: 20,
            height: 10,
        };
        draw_rounded_rect(&mut canvas, &rect, 0, Rgba([0, 0, 0, 140]));

        // Corner pixel fully covered when radius is zero
        assert_eq!(canvas.get_pixel(5, 5)[3], 140);
        // Outside untouched
        assert_eq!(canvas.get_pixel(4, 4)[3], 0);
    }

    #[test]
    fn test_rounded_rect_clips_corners() {
        let mut canvas = RgbaImage::new(60, 60);
        let rect = LayoutBox {
            x: 10,
            y: 10,
            width: 40,
            height: 20,
        };
        draw_rounded_rect(&mut canvas, &rect, 8, Rgba([0, 0, 0, 255]));

        // The very corner is outside the rounded outline
        assert!(canvas.get_pixel(10, 10)[3] < 32);
        // Edge midpoints are fully covered
        assert_eq!(canvas.get_pixel(30, 10)[3], 255);
        assert_eq!(canvas.get_pixel(10, 20)[3], 255);
    }

    #[test]
    fn test_paste_over_clips_at_edges() {
        let mut canvas = RgbaImage::new(20, 20);
        let stamp = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));

        paste_over(&mut canvas, &stamp, 15, 15);
        paste_over(&mut canvas, &stamp, -5, -5);

        assert_eq!(canvas.get_pixel(16, 16)[0], 255);
        assert_eq!(canvas.get_pixel(2, 2)[0], 255);
        assert_eq!(canvas.get_pixel(10, 10)[3], 0);
    }

    #[test]
    fn test_blend_pixels_over_operator() {
        // 55% black over white lands mid-gray
        let result = blend_pixels(Rgba([255, 255, 255, 255]), Rgba([0, 0, 0, 140]));
        assert!(result[0] > 90 && result[0] < 130);
        assert_eq!(result[3], 255);
    }
}
