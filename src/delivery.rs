//! Telegram delivery client.
//!
//! Encodes the finished image as JPEG and submits it to the channel via
//! the Bot API `sendPhoto` method as multipart form data. Delivery is
//! final: a failed post is logged and the image is discarded, there is
//! no retry and no local spool.

use image::RgbImage;
use std::io::Cursor;
use std::time::Duration;

use crate::config::Config;
use crate::constants::{DELIVERY_JPEG_QUALITY, DELIVERY_TIMEOUT_SECS, TELEGRAM_API_BASE};
use crate::error::BotError;
use crate::prompt::Prompt;

/// Left-to-right mark, pinning the Latin handle inside the RTL caption.
const LRM: char = '\u{200E}';

pub struct DeliveryClient {
    client: reqwest::blocking::Client,
}

impl DeliveryClient {
    pub fn new() -> Result<Self, BotError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(DELIVERY_TIMEOUT_SECS))
            .build()
            .map_err(|e| BotError::Delivery(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Compose the post caption: channel title and handle, then the
    /// location in native script and Latin.
    ///
    /// The LRM before the handle keeps the `@...` run reading left to
    /// right inside otherwise right-to-left text.
    pub fn caption(config: &Config, prompt: &Prompt) -> String {
        let title = config
            .watermark_title
            .as_deref()
            .unwrap_or(&config.watermark_text);

        format!(
            "( {}  ||  {}{} )\n\n\u{1F4CD} {}\n\u{1F4CD} {}",
            title, LRM, config.watermark_text, prompt.location_native, prompt.location_latin
        )
    }

    /// Post the image with its caption to the configured channel.
    ///
    /// Returns true on a 200 response; anything else is logged and
    /// treated as a final failure for this run.
    pub fn send_photo(&self, config: &Config, image: &RgbImage, caption: &str) -> bool {
        let jpeg = match encode_jpeg(image) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode photo");
                return false;
            }
        };

        let url = format!(
            "{}/bot{}/sendPhoto",
            TELEGRAM_API_BASE, config.telegram_bot_token
        );

        let photo = match reqwest::blocking::multipart::Part::bytes(jpeg)
            .file_name("image.jpg")
            .mime_str("image/jpeg")
        {
            Ok(part) => part,
            Err(e) => {
                tracing::error!(error = %e, "failed to build multipart body");
                return false;
            }
        };

        let form = reqwest::blocking::multipart::Form::new()
            .text("chat_id", config.telegram_channel_id.clone())
            .text("caption", caption.to_string())
            .part("photo", photo);

        tracing::info!(channel = %config.telegram_channel_id, "sending photo");

        match self.client.post(&url).multipart(form).send() {
            Ok(response) if response.status().is_success() => {
                tracing::info!("photo delivered");
                true
            }
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.text().unwrap_or_default();
                tracing::error!(status, body = %body, "delivery rejected");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "delivery request failed");
                false
            }
        }
    }
}

/// Encode the image as quality-95 JPEG in memory.
fn encode_jpeg(image: &RgbImage) -> Result<Vec<u8>, BotError> {
    let mut bytes = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
        Cursor::new(&mut bytes),
        DELIVERY_JPEG_QUALITY,
    );
    encoder
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ColorType::Rgb8,
        )
        .map_err(|e| BotError::Delivery(format!("JPEG encoding failed: {}", e)))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            telegram_bot_token: "123:abc".to_string(),
            telegram_channel_id: "@channel".to_string(),
            watermark_text: "@saba_rasanehh".to_string(),
            watermark_title: Some("صبا رسانه".to_string()),
        }
    }

    fn test_prompt() -> Prompt {
        Prompt {
            subject: "A lake",
            location_native: "دریاچه",
            location_latin: "Lake",
            style: "oil painting",
            atmosphere: "at dawn",
        }
    }

    #[test]
    fn test_caption_contains_lrm_before_handle() {
        let caption = DeliveryClient::caption(&test_config(), &test_prompt());
        assert!(caption.contains("\u{200E}@saba_rasanehh"));
    }

    #[test]
    fn test_caption_lists_both_location_labels() {
        let caption = DeliveryClient::caption(&test_config(), &test_prompt());
        assert!(caption.contains("دریاچه"));
        assert!(caption.contains("Lake"));
        assert!(caption.contains("صبا رسانه"));
    }

    #[test]
    fn test_caption_without_title_falls_back_to_handle() {
        let mut config = test_config();
        config.watermark_title = None;
        let caption = DeliveryClient::caption(&config, &test_prompt());
        assert!(caption.starts_with("( @saba_rasanehh  ||  "));
    }

    #[test]
    fn test_encode_jpeg_produces_decodable_output() {
        let image = RgbImage::from_pixel(32, 16, image::Rgb([120, 80, 40]));
        let bytes = encode_jpeg(&image).unwrap();

        // JPEG magic bytes
        assert_eq!(&bytes[0..3], &[0xFF, 0xD8, 0xFF]);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 16));
    }
}
