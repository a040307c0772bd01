use speedrun_bot::cli::Cli;
use speedrun_bot::config::Settings;
use speedrun_bot::core::store::RunStore;
use speedrun_bot::messaging::client::Messaging;
use speedrun_bot::storage::JsonFileStorage;

use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = Settings::new(&cli)?;

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(settings.get_trace_level())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Loading runs from {}.", settings.storage_path);
    let store = RunStore::load(Box::new(JsonFileStorage::new(&settings.storage_path)));

    info!("Initializing messaging engine.");
    let messaging = Messaging::new(&settings, store);
    messaging.announce_online().await;

    let result = messaging.listen().await;

    // Runs whether listening ended on a signal or on an error.
    messaging.announce_offline().await;
    info!("Shutting down.");

    Ok(result?)
}
