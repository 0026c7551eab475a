//! Image generation client.
//!
//! Turns a prompt string into a raster image via the generation API,
//! with a bounded fixed-delay retry loop. The HTTP transport sits
//! behind a trait so tests can drive the retry logic against a mock
//! endpoint without touching the network.
//!
//! Exhausting the retry cap is not an error: the caller receives `None`
//! and treats the run as a no-op.

use image::DynamicImage;
use rand::Rng;

use crate::constants::{
    GENERATION_ENDPOINT, GENERATION_HEIGHT, GENERATION_MODEL, GENERATION_SEED_MAX,
    GENERATION_TIMEOUT_SECS, GENERATION_WIDTH,
};
use crate::error::BotError;
use crate::retry::RetryPolicy;

#[cfg(test)]
use mockall::automock;

/// Transport abstraction for the generation endpoint.
#[cfg_attr(test, automock)]
pub trait ImageEndpoint {
    /// Perform a GET and return (status code, body bytes).
    ///
    /// Transport-level failures (DNS, connect, timeout) come back as
    /// `Err` with a description.
    fn fetch(&self, url: &str) -> Result<(u16, Vec<u8>), String>;
}

/// Production transport: blocking reqwest with a per-request timeout.
pub struct HttpEndpoint {
    client: reqwest::blocking::Client,
}

impl HttpEndpoint {
    pub fn new() -> Result<Self, BotError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(GENERATION_TIMEOUT_SECS))
            .build()
            .map_err(|e| BotError::Generation(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl ImageEndpoint for HttpEndpoint {
    fn fetch(&self, url: &str) -> Result<(u16, Vec<u8>), String> {
        let response = self.client.get(url).send().map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(|e| e.to_string())?;
        Ok((status, body.to_vec()))
    }
}

/// Client for the image generation API.
pub struct GenerationClient<E: ImageEndpoint> {
    endpoint: E,
    policy: RetryPolicy,
}

impl<E: ImageEndpoint> GenerationClient<E> {
    pub fn new(endpoint: E, policy: RetryPolicy) -> Self {
        Self { endpoint, policy }
    }

    /// Build the request URL for a prompt and seed.
    pub fn build_url(prompt: &str, seed: u64) -> String {
        format!(
            "{}/{}?width={}&height={}&seed={}&nologo=true&model={}",
            GENERATION_ENDPOINT,
            urlencoding::encode(prompt),
            GENERATION_WIDTH,
            GENERATION_HEIGHT,
            seed,
            GENERATION_MODEL,
        )
    }

    /// Request an image for the prompt, retrying per the policy.
    ///
    /// The seed is drawn once from `rng`; all attempts request the same
    /// render. Returns `None` when every attempt failed (transport
    /// error, non-200 status, or undecodable body).
    pub fn generate<R: Rng + ?Sized>(&self, prompt: &str, rng: &mut R) -> Option<DynamicImage> {
        let seed = rng.gen_range(0..=GENERATION_SEED_MAX);
        let url = Self::build_url(prompt, seed);

        tracing::info!(seed, "requesting image generation");

        let mut attempt = 0;
        loop {
            std::thread::sleep(self.policy.delay_before(attempt));
            if attempt > 0 {
                tracing::info!(
                    attempt = attempt + 1,
                    max = self.policy.max_attempts,
                    "retrying generation"
                );
            }

            match self.endpoint.fetch(&url) {
                Ok((status, body)) if !self.policy.is_retriable_status(status) => {
                    match image::load_from_memory(&body) {
                        Ok(img) => {
                            tracing::info!(
                                width = img.width(),
                                height = img.height(),
                                "image generated"
                            );
                            return Some(img);
                        }
                        Err(e) => tracing::warn!(error = %e, "generated image failed to decode"),
                    }
                }
                Ok((status, _)) => tracing::warn!(status, "generation request rejected"),
                Err(e) => tracing::warn!(error = %e, "generation request failed"),
            }

            if !self.policy.should_retry(attempt) {
                break;
            }
            attempt += 1;
        }

        tracing::error!(
            attempts = self.policy.max_attempts,
            "image generation failed after retries"
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::ZERO)
    }

    #[test]
    fn test_build_url_encodes_prompt() {
        let url = GenerationClient::<MockImageEndpoint>::build_url("a lake, at dawn", 42);
        assert_eq!(
            url,
            "https://image.pollinations.ai/prompt/a%20lake%2C%20at%20dawn?width=1280&height=720&seed=42&nologo=true&model=flux"
        );
    }

    // Retry cap: an always-failing endpoint sees exactly 3 attempts,
    // and the result is None, never a panic or error.
    #[test]
    fn test_retry_cap_on_transport_errors() {
        let mut endpoint = MockImageEndpoint::new();
        endpoint
            .expect_fetch()
            .times(3)
            .returning(|_| Err("connection refused".to_string()));

        let client = GenerationClient::new(endpoint, fast_policy());
        let result = client.generate("prompt", &mut StdRng::seed_from_u64(1));
        assert!(result.is_none());
    }

    #[test]
    fn test_retry_cap_on_server_errors() {
        let mut endpoint = MockImageEndpoint::new();
        endpoint
            .expect_fetch()
            .times(3)
            .returning(|_| Ok((503, Vec::new())));

        let client = GenerationClient::new(endpoint, fast_policy());
        assert!(client
            .generate("prompt", &mut StdRng::seed_from_u64(1))
            .is_none());
    }

    #[test]
    fn test_success_short_circuits() {
        let png = encode_test_png();
        let mut endpoint = MockImageEndpoint::new();
        endpoint
            .expect_fetch()
            .times(1)
            .returning(move |_| Ok((200, png.clone())));

        let client = GenerationClient::new(endpoint, fast_policy());
        let img = client
            .generate("prompt", &mut StdRng::seed_from_u64(1))
            .expect("should decode");
        assert_eq!((img.width(), img.height()), (2, 2));
    }

    #[test]
    fn test_recovers_after_one_failure() {
        let png = encode_test_png();
        let mut endpoint = MockImageEndpoint::new();
        let mut calls = 0;
        endpoint.expect_fetch().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok((502, Vec::new()))
            } else {
                Ok((200, png.clone()))
            }
        });

        let client = GenerationClient::new(endpoint, fast_policy());
        assert!(client
            .generate("prompt", &mut StdRng::seed_from_u64(1))
            .is_some());
    }

    #[test]
    fn test_undecodable_body_is_retried() {
        let mut endpoint = MockImageEndpoint::new();
        endpoint
            .expect_fetch()
            .times(3)
            .returning(|_| Ok((200, b"not an image".to_vec())));

        let client = GenerationClient::new(endpoint, fast_policy());
        assert!(client
            .generate("prompt", &mut StdRng::seed_from_u64(1))
            .is_none());
    }

    #[test]
    fn test_same_seed_for_all_attempts() {
        let mut endpoint = MockImageEndpoint::new();
        let mut seen = Vec::new();
        endpoint.expect_fetch().times(3).returning_st(move |url| {
            seen.push(url.to_string());
            assert!(seen.iter().all(|u| u == &seen[0]), "URL must not change across attempts");
            Err("down".to_string())
        });

        let client = GenerationClient::new(endpoint, fast_policy());
        let _ = client.generate("prompt", &mut StdRng::seed_from_u64(9));
    }

    fn encode_test_png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 255]));
        let mut buffer = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }
}
