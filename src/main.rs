use anyhow::{Context, Result};
use fridge_assistant::api_connection::SpoonacularClient;
use fridge_assistant::cli::parse_args;
use fridge_assistant::config::AppConfig;
use fridge_assistant::store::JsonFileStore;
use fridge_assistant::{CommandRequest, FridgeCommandHandler};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok(); // Load .env file for API keys and RUST_LOG

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli_args = parse_args();
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let store_path = cli_args
        .store
        .clone()
        .unwrap_or_else(|| config.store_path.clone());
    tracing::debug!(path = ?store_path, "Using fridge store");

    let lookup = SpoonacularClient::from_config(&config).context("Failed to build recipe API client")?;
    let handler = FridgeCommandHandler::new(JsonFileStore::new(store_path), lookup, config.query_config());

    let request = CommandRequest {
        subcommand: cli_args.subcommand.clone(),
        flags: cli_args.flag_map(),
        user_id: cli_args.user.clone(),
    };
    let entries = handler
        .handle(&request)
        .await
        .with_context(|| format!("Command '{}' failed", cli_args.subcommand))?;

    if cli_args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!("{}", entry);
        }
    }

    Ok(())
}
