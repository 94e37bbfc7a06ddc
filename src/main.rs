use anyhow::{Context, Result};
use parley::bus::MessageBus;
use parley::config::ControlConfig;
use parley::translator::Translator;
use std::io::BufRead;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::args()
        .nth(1)
        .context("Usage: parley <config.json>")?;

    info!("Loading control configuration from {}", config_path);
    let config = ControlConfig::from_path(&config_path)?;

    let bus = MessageBus::new();
    let translator = Translator::new(&config, &bus)?;

    // Drain the bus sink on a background thread so emissions are visible.
    let emissions = bus.emissions();
    std::thread::spawn(move || {
        for emission in emissions.iter() {
            info!(channel = %emission.channel, message = ?emission.message, "published");
        }
    });

    // Stand-in for the speech recognizer: one recognized phrase per line.
    info!("Listening for phrases on stdin");
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let phrase = line?.trim().to_lowercase();
        if phrase.is_empty() {
            continue;
        }
        translator.handle_phrase(&phrase)?;
    }

    Ok(())
}
