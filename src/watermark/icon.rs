//! Watermark icon provider.
//!
//! Fetches the channel emblem over HTTPS and resizes it to an exact
//! square with Lanczos3 resampling. Every failure mode (network, HTTP
//! status, decode, resize) falls back to a synthesized emblem drawn at
//! the requested size: a brand-blue disc with a white paper-plane
//! triangle. The fallback is deterministic and dimensionally identical
//! to the fetched icon, so layout never depends on network state.

use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::{DynamicImage, Rgba, RgbaImage};
use std::num::NonZeroU32;
use std::time::Duration;

use crate::constants::{ICON_BRAND_COLOR, ICON_TIMEOUT_SECS, ICON_URL};

/// Supplies the square emblem bitmap for the watermark.
#[derive(Debug, Clone)]
pub struct IconProvider {
    endpoint: Option<String>,
}

impl IconProvider {
    /// Provider that fetches the emblem from the default location.
    pub fn new() -> Self {
        Self {
            endpoint: Some(ICON_URL.to_string()),
        }
    }

    /// Provider that skips the network entirely and always synthesizes.
    pub fn offline() -> Self {
        Self { endpoint: None }
    }

    /// Produce an RGBA emblem of exactly `size` x `size` pixels.
    ///
    /// Total: any fetch problem degrades to the synthesized fallback.
    pub fn icon(&self, size: u32) -> RgbaImage {
        let size = size.max(1);

        if let Some(url) = self.endpoint.as_deref() {
            match fetch_icon(url, size) {
                Some(icon) => return icon,
                None => tracing::warn!("could not fetch emblem, using drawn fallback"),
            }
        }

        fallback_icon(size)
    }
}

impl Default for IconProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch, decode and square-resize the remote emblem.
fn fetch_icon(url: &str, size: u32) -> Option<RgbaImage> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(ICON_TIMEOUT_SECS))
        .build()
        .ok()?;

    let response = client.get(url).send().ok()?;
    if !response.status().is_success() {
        tracing::debug!(status = %response.status(), "emblem fetch rejected");
        return None;
    }

    let bytes = response.bytes().ok()?;
    let decoded = image::load_from_memory(&bytes).ok()?;
    resize_square(&decoded, size)
}

/// Resize to an exact square using fast-image-resize with Lanczos3.
fn resize_square(img: &DynamicImage, size: u32) -> Option<RgbaImage> {
    let src_width = NonZeroU32::new(img.width())?;
    let src_height = NonZeroU32::new(img.height())?;
    let dst_size = NonZeroU32::new(size)?;

    let src_image =
        Image::from_vec_u8(src_width, src_height, img.to_rgba8().into_raw(), PixelType::U8x4)
            .ok()?;

    let mut dst_image = Image::new(dst_size, dst_size, PixelType::U8x4);
    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));
    resizer.resize(&src_image.view(), &mut dst_image.view_mut()).ok()?;

    RgbaImage::from_raw(size, size, dst_image.into_vec())
}

/// Synthesize the fallback emblem: brand disc + white plane triangle.
///
/// 2x2 supersampling smooths the disc edge and the triangle; output is
/// fully deterministic for a given size.
fn fallback_icon(size: u32) -> RgbaImage {
    let s = size as f32;
    let center = s / 2.0;
    let radius = s / 2.0;

    // Plane glyph at fixed relative coordinates
    let a = (0.2 * s, 0.5 * s);
    let b = (0.8 * s, 0.2 * s);
    let c = (0.5 * s, 0.8 * s);

    let [br, bg, bb] = ICON_BRAND_COLOR;

    RgbaImage::from_fn(size, size, |x, y| {
        let mut disc_hits = 0u32;
        let mut plane_hits = 0u32;

        for (dx, dy) in [(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)] {
            let px = x as f32 + dx;
            let py = y as f32 + dy;

            let dist = ((px - center).powi(2) + (py - center).powi(2)).sqrt();
            if dist <= radius {
                disc_hits += 1;
                if in_triangle((px, py), a, b, c) {
                    plane_hits += 1;
                }
            }
        }

        if disc_hits == 0 {
            return Rgba([0, 0, 0, 0]);
        }

        let white = plane_hits as f32 / 4.0;
        let mix = |brand: u8| -> u8 {
            (brand as f32 * (1.0 - white) + 255.0 * white).round() as u8
        };

        Rgba([mix(br), mix(bg), mix(bb), (disc_hits * 255 / 4) as u8])
    })
}

/// Sign-consistent half-plane test, winding-agnostic.
fn in_triangle(p: (f32, f32), a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> bool {
    let edge = |p: (f32, f32), v0: (f32, f32), v1: (f32, f32)| -> f32 {
        (p.0 - v1.0) * (v0.1 - v1.1) - (v0.0 - v1.0) * (p.1 - v1.1)
    };

    let d0 = edge(p, a, b);
    let d1 = edge(p, b, c);
    let d2 = edge(p, c, a);

    let has_neg = d0 < 0.0 || d1 < 0.0 || d2 < 0.0;
    let has_pos = d0 > 0.0 || d1 > 0.0 || d2 > 0.0;
    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // Fallback icon is valid for any size, with no network involved
    #[rstest]
    #[case(1)]
    #[case(7)]
    #[case(40)]
    #[case(64)]
    #[case(480)]
    fn test_offline_icon_exact_square(#[case] size: u32) {
        let provider = IconProvider::offline();
        let icon = provider.icon(size);
        assert_eq!(icon.width(), size);
        assert_eq!(icon.height(), size);
    }

    #[test]
    fn test_zero_size_clamps_to_one() {
        let icon = IconProvider::offline().icon(0);
        assert_eq!((icon.width(), icon.height()), (1, 1));
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let a = fallback_icon(64);
        let b = fallback_icon(64);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_fallback_geometry() {
        let icon = fallback_icon(64);

        // Corners lie outside the disc
        assert_eq!(icon.get_pixel(0, 0)[3], 0);
        assert_eq!(icon.get_pixel(63, 63)[3], 0);

        // Center sits inside the plane glyph: white-ish, opaque
        let center = icon.get_pixel(32, 32);
        assert_eq!(center[3], 255);
        assert!(center[0] > 200 && center[1] > 200 && center[2] > 200);

        // Top of the disc is above the glyph: pure brand color
        let brand = icon.get_pixel(32, 7);
        assert_eq!(
            *brand,
            Rgba([ICON_BRAND_COLOR[0], ICON_BRAND_COLOR[1], ICON_BRAND_COLOR[2], 255])
        );
    }

    #[test]
    fn test_resize_square_exact_output() {
        let src = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 5, Rgba([9, 9, 9, 255])));
        let out = resize_square(&src, 16).unwrap();
        assert_eq!((out.width(), out.height()), (16, 16));
    }

    #[test]
    fn test_in_triangle() {
        let a = (0.0, 0.0);
        let b = (10.0, 0.0);
        let c = (0.0, 10.0);
        assert!(in_triangle((2.0, 2.0), a, b, c));
        assert!(!in_triangle((9.0, 9.0), a, b, c));
    }
}
