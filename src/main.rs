//! monoshot: capture the first display once and save it as a monochrome JPEG

use color_eyre::{eyre::eyre, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use monoshot::{pipeline, Settings, XcapSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling and logging
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("monoshot=info")),
        )
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_writer(std::io::stderr)
        .init();

    info!("monoshot starting");

    let settings = Settings::default();
    let source = XcapSource::new();

    // Interruptible until a frame is in hand; from then on the file gets written
    let captured = tokio::select! {
        result = pipeline::capture(&source, &settings) => result?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted before a frame was captured");
            return Err(eyre!("interrupted"));
        }
    };

    let snapshot = pipeline::save(captured, &settings).await?;

    println!("Saved to: {}", snapshot.path.display());
    Ok(())
}
