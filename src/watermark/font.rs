//! Font resolution with ordered fallback providers.
//!
//! Resolution tries, in order: a platform-installed font, a previously
//! cached download, a fresh download (cached for subsequent runs), and
//! finally the embedded fallback font. Each provider absorbs its own
//! failure and falls through silently; only the embedded font is
//! infallible, so resolution as a whole never fails.
//!
//! The cache file lives under the system temp directory. Concurrent
//! first-run races on it are tolerated: a torn write fails to parse and
//! resolution moves on to the next provider.

use ab_glyph::FontArc;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use crate::constants::{
    FONT_CACHE_DIR, FONT_CACHE_FILE, FONT_DOWNLOAD_URL, FONT_TIMEOUT_SECS, PLATFORM_FONT_PATHS,
};

/// Embedded fallback font (DejaVu Sans - free license, covers Latin and
/// the Arabic presentation forms emitted by the shaper).
const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSans.ttf");

static EMBEDDED_FONT: OnceLock<FontArc> = OnceLock::new();

/// Resolve a font for watermark rendering. Never fails.
pub fn resolve() -> FontArc {
    let providers: &[&dyn Fn() -> Option<FontArc>] =
        &[&platform_font, &cached_font, &downloaded_font];

    first_success(providers).unwrap_or_else(embedded_font)
}

/// Fold an ordered provider list, returning the first successful result.
pub fn first_success<T>(providers: &[&dyn Fn() -> Option<T>]) -> Option<T> {
    providers.iter().find_map(|attempt| attempt())
}

/// Provider 1: a platform-installed font from the known locations.
fn platform_font() -> Option<FontArc> {
    PLATFORM_FONT_PATHS
        .iter()
        .find_map(|path| load_font_file(PathBuf::from(path)))
}

/// Provider 2: a font downloaded by an earlier run.
fn cached_font() -> Option<FontArc> {
    load_font_file(cache_path())
}

/// Provider 3: download the font and persist it for subsequent runs.
///
/// The write is best-effort: if persisting fails the in-memory bytes
/// are still used for this run.
fn downloaded_font() -> Option<FontArc> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(FONT_TIMEOUT_SECS))
        .build()
        .ok()?;

    let response = client.get(FONT_DOWNLOAD_URL).send().ok()?;
    if !response.status().is_success() {
        tracing::debug!(status = %response.status(), "font download rejected");
        return None;
    }
    let bytes = response.bytes().ok()?.to_vec();

    let path = cache_path();
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    if std::fs::write(&path, &bytes).is_err() {
        tracing::debug!(path = %path.display(), "could not cache downloaded font");
    }

    FontArc::try_from_vec(bytes).ok()
}

/// Provider 4: the embedded fallback. Cannot fail.
pub fn embedded_font() -> FontArc {
    EMBEDDED_FONT
        .get_or_init(|| {
            FontArc::try_from_slice(EMBEDDED_FONT_DATA)
                .expect("Failed to load embedded font - this is a bug")
        })
        .clone()
}

/// Well-known cache location for the downloaded font.
pub fn cache_path() -> PathBuf {
    std::env::temp_dir().join(FONT_CACHE_DIR).join(FONT_CACHE_FILE)
}

fn load_font_file(path: PathBuf) -> Option<FontArc> {
    let bytes = std::fs::read(path).ok()?;
    FontArc::try_from_vec(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_font_always_loads() {
        let font = embedded_font();
        // Sanity: the fallback font knows basic Latin
        use ab_glyph::Font;
        assert_ne!(font.glyph_id('A').0, 0);
    }

    #[test]
    fn test_resolve_never_fails() {
        // Whatever the environment provides, resolution returns a font.
        let _font = resolve();
    }

    #[test]
    fn test_first_success_returns_first_some() {
        let a = || None::<u32>;
        let b = || Some(7);
        let c = || Some(9);
        let providers: &[&dyn Fn() -> Option<u32>] = &[&a, &b, &c];
        assert_eq!(first_success(providers), Some(7));
    }

    #[test]
    fn test_first_success_exhausts_to_none() {
        let a = || None::<u32>;
        let providers: &[&dyn Fn() -> Option<u32>] = &[&a, &a];
        assert_eq!(first_success(providers), None);
    }

    #[test]
    fn test_corrupt_font_file_is_skipped() {
        // A torn cache write must fall through, not crash.
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a font").unwrap();

        assert!(load_font_file(file.path().to_path_buf()).is_none());
    }

    #[test]
    fn test_missing_font_file_is_skipped() {
        assert!(load_font_file(PathBuf::from("/nonexistent/font.ttf")).is_none());
    }
}
