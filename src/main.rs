use manzara::config::Config;
use manzara::delivery::DeliveryClient;
use manzara::generation::{GenerationClient, HttpEndpoint};
use manzara::retry::RetryPolicy;
use manzara::watermark::{self, IconProvider, WatermarkConfig};
use manzara::{logging, prompt};

use anyhow::Context;

fn main() {
    // Initialize logging subsystem
    logging::init_subscriber().expect("Failed to initialize logging subsystem");

    // Configuration absence is fatal, before any network activity
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    tracing::info!(
        channel = %config.telegram_channel_id,
        watermark = %config.watermark_text,
        "Configuration loaded successfully"
    );

    if let Err(e) = run(&config) {
        tracing::error!(error = %e, "run aborted");
        std::process::exit(1);
    }
}

/// One complete run: draw a prompt, generate, watermark, deliver.
fn run(config: &Config) -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();

    let prompt = prompt::draw(&mut rng);
    tracing::info!(location = prompt.location_latin, "Prompt composed");

    let endpoint = HttpEndpoint::new().context("generation client setup")?;
    let generator = GenerationClient::new(endpoint, RetryPolicy::default());

    // Exhausted retries are a no-op for this run, not a failure
    let Some(image) = generator.generate(&prompt.text(), &mut rng) else {
        tracing::warn!("no image generated, nothing to post");
        return Ok(());
    };

    let font = watermark::resolve_font();
    let icons = IconProvider::new();

    // Title above handle when a title is configured, else a single line
    let wm_config = match &config.watermark_title {
        Some(title) => WatermarkConfig::capsule(
            image.width(),
            title.clone(),
            Some(config.watermark_text.clone()),
        ),
        None => WatermarkConfig::capsule(image.width(), config.watermark_text.clone(), None),
    };

    let branded = watermark::apply(image, &wm_config, &font, &icons);

    let delivery = DeliveryClient::new().context("delivery client setup")?;
    let caption = DeliveryClient::caption(config, &prompt);

    // Delivery failure is logged inside the client; the image is discarded
    if !delivery.send_photo(config, &branded, &caption) {
        tracing::warn!("photo was not delivered");
    }

    Ok(())
}
