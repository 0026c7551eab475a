// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers improves maintainability
// and makes it easier to understand and modify defaults.

// =============================================================================
// Generation defaults
// =============================================================================

/// Image generation endpoint (prompt is appended, percent-encoded)
pub const GENERATION_ENDPOINT: &str = "https://image.pollinations.ai/prompt";

/// Generation model selector
pub const GENERATION_MODEL: &str = "flux";

/// Fixed target resolution for generated images
pub const GENERATION_WIDTH: u32 = 1280;
pub const GENERATION_HEIGHT: u32 = 720;

/// Upper bound (inclusive) for the randomized generation seed
pub const GENERATION_SEED_MAX: u64 = 1_000_000;

/// Per-request socket timeout for generation requests, in seconds
pub const GENERATION_TIMEOUT_SECS: u64 = 60;

/// Total attempts for a generation request (initial + retries)
pub const GENERATION_MAX_ATTEMPTS: u32 = 3;

/// Fixed delay between generation attempts, in seconds
pub const GENERATION_RETRY_DELAY_SECS: u64 = 5;

// =============================================================================
// Delivery defaults
// =============================================================================

/// Telegram Bot API base URL
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Per-request socket timeout for delivery requests, in seconds
pub const DELIVERY_TIMEOUT_SECS: u64 = 30;

/// JPEG quality for the delivered photo
pub const DELIVERY_JPEG_QUALITY: u8 = 95;

// =============================================================================
// Icon defaults
// =============================================================================

/// Emblem image fetched for the watermark icon
pub const ICON_URL: &str =
    "https://upload.wikimedia.org/wikipedia/commons/thumb/8/82/Telegram_logo.svg/480px-Telegram_logo.svg.png";

/// Per-request socket timeout for the icon fetch, in seconds
pub const ICON_TIMEOUT_SECS: u64 = 10;

/// Brand color of the fallback emblem (#24A1DE)
pub const ICON_BRAND_COLOR: [u8; 3] = [0x24, 0xA1, 0xDE];

// =============================================================================
// Font defaults
// =============================================================================

/// Remote source for a script-capable font, cached after first download
pub const FONT_DOWNLOAD_URL: &str =
    "https://github.com/rastikerdar/vazirmatn/raw/master/fonts/ttf/Vazirmatn-Regular.ttf";

/// File name of the cached downloaded font under the cache directory
pub const FONT_CACHE_FILE: &str = "Vazirmatn-Regular.ttf";

/// Cache directory name under the system temp directory
pub const FONT_CACHE_DIR: &str = "manzara-fonts";

/// Per-request socket timeout for the font fetch, in seconds
pub const FONT_TIMEOUT_SECS: u64 = 10;

/// Platform font locations probed before any download
pub const PLATFORM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\tahoma.ttf",
];

// =============================================================================
// Watermark layout defaults
// =============================================================================

/// Font size is image width divided by this (capsule preset)
pub const FONT_DIVISOR_CAPSULE: u32 = 50;

/// Font size divisor for the subtle preset (smaller text)
pub const FONT_DIVISOR_SUBTLE: u32 = 70;

/// Icon edge as a multiple of the tallest text line height
pub const ICON_SCALE_CAPSULE: f32 = 1.6;
pub const ICON_SCALE_SUBTLE: f32 = 1.5;

/// Font size floor when shrinking overlong lines to fit
pub const MIN_FONT_SIZE: u32 = 8;

/// Capsule fill: black at ~55% opacity
pub const CAPSULE_FILL: [u8; 4] = [0, 0, 0, 140];

/// Watermark text color (opaque white)
pub const TEXT_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Text color for the subtle preset (white at ~45% opacity)
pub const TEXT_COLOR_SUBTLE: [u8; 4] = [255, 255, 255, 115];
