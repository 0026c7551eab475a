// Error types module

use thiserror::Error;

/// Centralized error type for the bot.
///
/// Only configuration, generation and delivery failures are observable
/// at the top level. The watermark layer substitutes fallbacks for every
/// failure it can encounter and therefore has no error type.
#[derive(Debug, Error)]
pub enum BotError {
    /// Configuration errors (missing env vars, unreadable or invalid config.json)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Image generation failed after exhausting all retry attempts
    #[error("Generation error: {0}")]
    Generation(String),

    /// Telegram delivery failures (transport error or non-200 response)
    #[error("Delivery error: {0}")]
    Delivery(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BotError::Config("no config.json and no env vars".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: no config.json and no env vars"
        );

        let err = BotError::Generation("exhausted 3 attempts".to_string());
        assert_eq!(err.to_string(), "Generation error: exhausted 3 attempts");

        let err = BotError::Delivery("status 403".to_string());
        assert_eq!(err.to_string(), "Delivery error: status 403");
    }
}
